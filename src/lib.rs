// devprobes - developer probes and housekeeping tools for a full-stack web app
//
// This is the library crate containing the logic of every tool.
// The binaries under src/bin/ are thin entry points, one per tool.

pub mod app;
pub mod config;
pub mod logging;
pub mod models;
pub mod services;
pub mod ui;

// Re-export commonly used types for convenience
pub use crate::config::ConfigManager;
pub use models::ToolConfig;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
