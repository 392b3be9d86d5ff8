//! Data models for the developer tools.
//!
//! - [`ToolConfig`]: Settings loaded from `devprobes.yaml` plus environment overrides
//! - [`UserSummary`]: Read-only projection of a stored user document (no password)
//!
//! Outcome types (reports) live next to the services that produce them.

pub mod config;
pub mod user;

pub use self::config::{
    ApiSettings, BuildSettings, DatabaseSettings, LoggingSettings, MONGODB_URI_VAR, PathSettings,
    ProbeCredentials, RegistrationTemplate, ToolConfig, default_cleanup_targets,
};
pub use user::UserSummary;
