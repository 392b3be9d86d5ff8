use crate::models::{MONGODB_URI_VAR, ToolConfig};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Environment, FileFormat};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "devprobes.yaml";

/// Prefix for environment overrides, e.g. `DEVPROBES__API__LOCAL_URL`.
pub const ENV_PREFIX: &str = "DEVPROBES";

/// Prefix of the variables forwarded to the build child, e.g.
/// `DEVPROBES__BUILD__ENV__REACT_APP_API_URL`.
const BUILD_ENV_PREFIX: &str = "DEVPROBES__BUILD__ENV__";

/// The slice of the YAML file holding `build.env`, read without the `config`
/// crate so variable names keep their case and file order.
#[derive(Debug, Default, Deserialize)]
struct BuildEnvFile {
    #[serde(default)]
    build: Option<BuildEnvSection>,
}

#[derive(Debug, Default, Deserialize)]
struct BuildEnvSection {
    #[serde(default)]
    env: Option<IndexMap<String, String>>,
}

/// Configuration manager for the tool settings file.
///
/// Sources are layered lowest to highest:
/// - built-in defaults ([`ToolConfig::default`])
/// - the YAML file (optional)
/// - `DEVPROBES__<SECTION>__<KEY>` environment variables
/// - `MONGODB_URI` for the database connection string
///
/// Environment values are taken as strings and only converted where the
/// target field is not a string. `build.env` bypasses the layering: the
/// file's entries keep their order and `DEVPROBES__BUILD__ENV__<NAME>`
/// variables are added with `<NAME>` verbatim.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager reading `devprobes.yaml` from `config_dir`.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Self {
        Self::with_file(config_dir.as_ref().join(CONFIG_FILE_NAME))
    }

    /// Create a ConfigManager for an explicit file path.
    pub fn with_file<P: Into<Utf8PathBuf>>(config_path: P) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Load the configuration using the process environment for overrides.
    pub fn load(&self) -> Result<ToolConfig> {
        self.load_with_env(std::env::vars().collect())
    }

    /// Load the configuration using `vars` as the environment.
    pub fn load_with_env(&self, vars: config::Map<String, String>) -> Result<ToolConfig> {
        let mongodb_uri = vars.get(MONGODB_URI_VAR).cloned();
        let build_env_overrides: Vec<(String, String)> = vars
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(BUILD_ENV_PREFIX)
                    .filter(|name| !name.is_empty())
                    .map(|name| (name.to_string(), value.clone()))
            })
            .collect();

        let defaults = config::Config::try_from(&ToolConfig::default())
            .context("Failed to build default configuration")?;

        let builder = config::Config::builder()
            .add_source(defaults)
            .add_source(
                config::File::from(self.config_path.as_std_path())
                    .format(FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .source(Some(vars)),
            )
            .set_override_option("database.uri", mongodb_uri)
            .context("Failed to apply MONGODB_URI override")?;

        let mut config: ToolConfig = builder
            .build()
            .with_context(|| format!("Failed to load config: {}", self.config_path))?
            .try_deserialize()
            .with_context(|| format!("Failed to parse config: {}", self.config_path))?;

        config.build.env = self.read_build_env()?;
        config.build.env.extend(build_env_overrides);

        if self.config_path.exists() {
            tracing::debug!("Loaded config from {}", self.config_path);
        } else {
            tracing::debug!(
                "Config file not found at {}, using defaults and environment",
                self.config_path
            );
        }

        Ok(config)
    }

    /// `build.env` exactly as written in the file, empty when absent.
    fn read_build_env(&self) -> Result<IndexMap<String, String>> {
        if !self.config_path.exists() {
            return Ok(IndexMap::new());
        }

        let contents = fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read config: {}", self.config_path))?;
        let file: Option<BuildEnvFile> = serde_yaml_ng::from_str(&contents)
            .with_context(|| format!("Failed to parse build.env in {}", self.config_path))?;

        Ok(file
            .and_then(|f| f.build)
            .and_then(|b| b.env)
            .unwrap_or_default())
    }

    /// Write `config` to the configuration file as YAML.
    pub fn save(&self, config: &ToolConfig) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(config).context("Failed to serialize config to YAML")?;

        if let Some(parent) = self.config_path.parent() {
            if !parent.as_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory: {}", parent))?;
            }
        }

        fs::write(&self.config_path, yaml_string)
            .with_context(|| format!("Failed to write config: {}", self.config_path))?;

        tracing::info!("Saved config to {}", self.config_path);
        Ok(())
    }

    /// Get the configuration file path.
    pub fn config_path(&self) -> &Utf8Path {
        &self.config_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        (ConfigManager::new(&config_dir), temp_dir)
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let (manager, _temp_dir) = create_test_config_manager();

        let config = manager.load_with_env(config::Map::new()).unwrap();
        assert_eq!(config, ToolConfig::default());
    }

    #[test]
    fn test_config_path_uses_file_name() {
        let (manager, _temp_dir) = create_test_config_manager();
        assert!(manager.config_path().as_str().ends_with(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_mongodb_uri_from_environment() {
        let (manager, _temp_dir) = create_test_config_manager();

        let mut vars = config::Map::new();
        vars.insert(
            MONGODB_URI_VAR.to_string(),
            "mongodb://localhost:27017/app".to_string(),
        );

        let config = manager.load_with_env(vars).unwrap();
        assert_eq!(
            config.database.uri.as_deref(),
            Some("mongodb://localhost:27017/app")
        );
    }
}
