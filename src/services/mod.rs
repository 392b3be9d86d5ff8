//! Services module - the logic behind each developer tool.
//!
//! Every service returns a structured report instead of only printing, so the
//! binaries (and tests) can decide what counts as failure.
//!
//! # Components
//!
//! - [`uploads`]: Delete regular files in the uploads directory, creating it if absent
//! - [`cleanup`]: Empty test-data and build output directories, keeping the directories
//! - [`build`]: Locate the frontend bundler's entry script and run it with production env
//! - [`api`]: HTTP client that captures each request/response as an [`api::Exchange`]
//! - [`probes`]: Login, registration, server health and CORS smoke tests
//! - [`db_probe`]: Database connectivity check behind the [`db_probe::UserDirectory`] trait
//!
//! # Usage Example
//!
//! ```ignore
//! use devprobes::services::api::ApiClient;
//! use devprobes::services::probes::login_probe;
//!
//! let client = ApiClient::new("http://localhost:5000", None, false)?;
//! let report = login_probe(&client, &config.credentials).await;
//! if !report.passed() {
//!     // no token came back
//! }
//! ```

pub mod api;
pub mod build;
pub mod cleanup;
pub mod db_probe;
pub mod probes;
pub mod uploads;

pub use api::{ApiClient, Exchange, ProbeError};
pub use build::{BuildError, BuildPlan, FrontendBuilder};
pub use cleanup::{CleanupReport, TargetStatus, run_cleanup};
pub use db_probe::{DbProbeReport, MongoUserDirectory, UserDirectory, probe_database};
pub use probes::{GeneratedUser, ProbeReport, ProbeStep};
pub use uploads::{UploadCleanReport, clean_uploads};
