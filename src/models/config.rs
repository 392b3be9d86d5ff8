use camino::Utf8PathBuf;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the document database connection string.
pub const MONGODB_URI_VAR: &str = "MONGODB_URI";

/// Top-level tool configuration from `devprobes.yaml`
///
/// Every section has defaults matching the development setup, so an absent
/// file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub credentials: ProbeCredentials,

    #[serde(default)]
    pub registration: RegistrationTemplate,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub paths: PathSettings,

    #[serde(default)]
    pub build: BuildSettings,

    #[serde(default)]
    pub logging: LoggingSettings,

    /// Exit non-zero when a probe or cleaner reports a failure.
    #[serde(default)]
    pub strict_exit: bool,
}

/// Backend origins targeted by the HTTP probes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSettings {
    /// Local development backend (login, registration and server probes)
    #[serde(default = "default_local_url")]
    pub local_url: String,

    /// Deployed backend (CORS probe)
    #[serde(default = "default_deployed_url")]
    pub deployed_url: String,

    /// Origin header the CORS probe presents, i.e. the frontend's origin
    #[serde(default = "default_frontend_origin")]
    pub frontend_origin: String,

    /// Per-request timeout. `None` waits indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            local_url: default_local_url(),
            deployed_url: default_deployed_url(),
            frontend_origin: default_frontend_origin(),
            request_timeout_secs: None,
        }
    }
}

impl ApiSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn default_local_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_deployed_url() -> String {
    "https://mern-app-backend.onrender.com".to_string()
}

fn default_frontend_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Example account used by the login probe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeCredentials {
    #[serde(default = "default_email")]
    pub email: String,

    #[serde(default = "default_password")]
    pub password: String,
}

impl Default for ProbeCredentials {
    fn default() -> Self {
        Self {
            email: default_email(),
            password: default_password(),
        }
    }
}

fn default_email() -> String {
    "test@example.com".to_string()
}

fn default_password() -> String {
    "password123".to_string()
}

/// Template for the pseudo-unique users created by the registration probes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistrationTemplate {
    #[serde(default = "default_username_prefix")]
    pub username_prefix: String,

    #[serde(default = "default_email_prefix")]
    pub email_prefix: String,

    #[serde(default = "default_email_domain")]
    pub email_domain: String,

    #[serde(default = "default_password")]
    pub password: String,

    /// Exclusive upper bound of the random numeric suffix
    #[serde(default = "default_suffix_range")]
    pub suffix_range: u32,
}

impl Default for RegistrationTemplate {
    fn default() -> Self {
        Self {
            username_prefix: default_username_prefix(),
            email_prefix: default_email_prefix(),
            email_domain: default_email_domain(),
            password: default_password(),
            suffix_range: default_suffix_range(),
        }
    }
}

fn default_username_prefix() -> String {
    "testuser".to_string()
}

fn default_email_prefix() -> String {
    "test".to_string()
}

fn default_email_domain() -> String {
    "example.com".to_string()
}

fn default_suffix_range() -> u32 {
    10_000
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseSettings {
    /// Connection string; normally supplied through `MONGODB_URI`
    #[serde(default)]
    pub uri: Option<String>,

    /// Database to inspect when the URI names none
    #[serde(default = "default_database_name")]
    pub database_name: String,

    #[serde(default = "default_users_collection")]
    pub users_collection: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            uri: None,
            database_name: default_database_name(),
            users_collection: default_users_collection(),
        }
    }
}

fn default_database_name() -> String {
    "test".to_string()
}

fn default_users_collection() -> String {
    "users".to_string()
}

/// Filesystem locations, relative to the working directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathSettings {
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: Utf8PathBuf,

    #[serde(default = "default_cleanup_targets")]
    pub cleanup_targets: Vec<Utf8PathBuf>,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            uploads_dir: default_uploads_dir(),
            cleanup_targets: default_cleanup_targets(),
        }
    }
}

fn default_uploads_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("backend/uploads")
}

/// Test-data directories plus the root and frontend build outputs.
pub fn default_cleanup_targets() -> Vec<Utf8PathBuf> {
    ["test_data", "testing_data", "build", "frontend/build"]
        .into_iter()
        .map(Utf8PathBuf::from)
        .collect()
}

/// Frontend build wrapper settings
///
/// `env` holds extra variables for the child process; `NODE_ENV=production`
/// is always added by the wrapper. The wrapper never mutates its own
/// environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildSettings {
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,

    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Bundler entry script, relative to the frontend directory
    #[serde(default = "default_entry_script")]
    pub entry_script: Utf8PathBuf,

    #[serde(default)]
    pub env: IndexMap<String, String>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            frontend_dir: default_frontend_dir(),
            interpreter: default_interpreter(),
            entry_script: default_entry_script(),
            env: IndexMap::new(),
        }
    }
}

fn default_frontend_dir() -> String {
    "frontend".to_string()
}

fn default_interpreter() -> String {
    "node".to_string()
}

fn default_entry_script() -> Utf8PathBuf {
    Utf8PathBuf::from("node_modules/react-scripts/scripts/build.js")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// Directory for rotating log files; console only when unset
    #[serde(default)]
    pub dir: Option<Utf8PathBuf>,

    #[serde(default)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_config_defaults() {
        let config = ToolConfig::default();
        assert_eq!(config.api.local_url, "http://localhost:5000");
        assert_eq!(config.api.request_timeout_secs, None);
        assert_eq!(config.database.users_collection, "users");
        assert_eq!(config.paths.uploads_dir, Utf8PathBuf::from("backend/uploads"));
        assert!(!config.strict_exit);
    }

    #[test]
    fn test_default_cleanup_targets() {
        let targets = default_cleanup_targets();
        assert_eq!(targets.len(), 4);
        assert!(targets.contains(&Utf8PathBuf::from("frontend/build")));
    }

    #[test]
    fn test_build_defaults() {
        let settings = BuildSettings::default();
        assert_eq!(settings.interpreter, "node");
        assert!(settings.env.is_empty());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "api:\n  local_url: http://127.0.0.1:8080\nstrict_exit: true\n";
        let config: ToolConfig = serde_yaml_ng::from_str(yaml).unwrap();

        assert_eq!(config.api.local_url, "http://127.0.0.1:8080");
        assert_eq!(config.api.frontend_origin, "http://localhost:3000");
        assert_eq!(config.credentials.email, "test@example.com");
        assert!(config.strict_exit);
    }
}
