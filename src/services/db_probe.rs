//! Document database connectivity probe.
//!
//! The probe talks to storage only through [`UserDirectory`], a read-only
//! view of the database: ping, collection names, user count and one sample
//! user. [`MongoUserDirectory`] is the driver-backed implementation.
//!
//! Whatever happens after the client is created, [`run_probe`] disconnects
//! before returning.

use crate::models::{DatabaseSettings, UserSummary};
use mongodb::bson::{Document, doc};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use std::future::Future;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbProbeError {
    #[error("No connection string configured (set MONGODB_URI)")]
    MissingUri,

    #[error("Database error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// Failure reported by a directory implementation not backed by the driver
    #[error("Directory error: {0}")]
    Backend(String),
}

/// Read-only access to the users data the probe inspects
pub trait UserDirectory: Send + Sync {
    /// Name of the users collection
    fn users_collection(&self) -> &str;

    /// Single round-trip proving the server is reachable
    fn ping(&self) -> impl Future<Output = Result<(), DbProbeError>> + Send;

    fn collection_names(&self) -> impl Future<Output = Result<Vec<String>, DbProbeError>> + Send;

    fn count_users(&self) -> impl Future<Output = Result<u64, DbProbeError>> + Send;

    /// Any one user, with the password excluded
    fn sample_user(
        &self,
    ) -> impl Future<Output = Result<Option<UserSummary>, DbProbeError>> + Send;

    fn disconnect(self) -> impl Future<Output = ()> + Send;
}

/// [`UserDirectory`] over the MongoDB driver
pub struct MongoUserDirectory {
    client: Client,
    database: Database,
    users: Collection<Document>,
}

impl MongoUserDirectory {
    /// Build a client for `uri`. The driver connects lazily; the first
    /// [`ping`](UserDirectory::ping) is the actual connection attempt.
    ///
    /// The database is the one named in the URI, else `settings.database_name`.
    pub async fn new(uri: &str, settings: &DatabaseSettings) -> Result<Self, DbProbeError> {
        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some(crate::APP_NAME.to_string());

        let database_name = options
            .default_database
            .clone()
            .unwrap_or_else(|| settings.database_name.clone());

        let client = Client::with_options(options)?;
        let database = client.database(&database_name);
        let users = database.collection::<Document>(&settings.users_collection);

        tracing::info!("Using database {}", database_name);

        Ok(Self {
            client,
            database,
            users,
        })
    }
}

impl UserDirectory for MongoUserDirectory {
    fn users_collection(&self) -> &str {
        self.users.name()
    }

    async fn ping(&self) -> Result<(), DbProbeError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn collection_names(&self) -> Result<Vec<String>, DbProbeError> {
        Ok(self.database.list_collection_names().await?)
    }

    async fn count_users(&self) -> Result<u64, DbProbeError> {
        Ok(self.users.count_documents(Document::new()).await?)
    }

    async fn sample_user(&self) -> Result<Option<UserSummary>, DbProbeError> {
        let document = self
            .users
            .find_one(Document::new())
            .projection(doc! { "password": 0 })
            .await?;
        Ok(document.as_ref().map(UserSummary::from_document))
    }

    async fn disconnect(self) {
        self.client.shutdown().await;
    }
}

/// Outcome of a database probe run
#[derive(Debug, Clone, Default)]
pub struct DbProbeReport {
    pub connected: bool,
    pub collections: Vec<String>,
    /// `None` when the users collection is absent or was not reached
    pub user_count: Option<u64>,
    pub sample_user: Option<UserSummary>,
    pub error: Option<String>,
    pub disconnected: bool,
}

impl DbProbeReport {
    pub fn passed(&self) -> bool {
        self.connected && self.error.is_none()
    }

    fn record_error(&mut self, error: &DbProbeError) {
        tracing::error!("Database probe failed: {}", error);
        self.error = Some(error.to_string());
    }
}

async fn inspect<S: UserDirectory>(
    directory: &S,
    report: &mut DbProbeReport,
) -> Result<(), DbProbeError> {
    directory.ping().await?;
    report.connected = true;
    tracing::info!("Connected to database");

    report.collections = directory.collection_names().await?;
    tracing::info!("Collections: {}", report.collections.join(", "));

    let users = directory.users_collection();
    if !report.collections.iter().any(|c| c == users) {
        tracing::warn!("No {} collection found", users);
        return Ok(());
    }

    let count = directory.count_users().await?;
    report.user_count = Some(count);
    tracing::info!("{} collection holds {} documents", users, count);

    report.sample_user = directory.sample_user().await?;
    match &report.sample_user {
        Some(user) => tracing::info!("Sample user: {}", user.describe()),
        None => tracing::info!("No sample user available"),
    }

    Ok(())
}

/// Inspect `directory`, then disconnect on every path
pub async fn run_probe<S: UserDirectory>(directory: S) -> DbProbeReport {
    let mut report = DbProbeReport::default();

    if let Err(e) = inspect(&directory, &mut report).await {
        report.record_error(&e);
    }

    directory.disconnect().await;
    report.disconnected = true;
    tracing::info!("Disconnected from database");

    report
}

/// Probe the database configured in `settings`
pub async fn probe_database(settings: &DatabaseSettings) -> DbProbeReport {
    let mut report = DbProbeReport::default();

    let Some(uri) = settings.uri.as_deref() else {
        report.record_error(&DbProbeError::MissingUri);
        return report;
    };

    match MongoUserDirectory::new(uri, settings).await {
        Ok(directory) => run_probe(directory).await,
        Err(e) => {
            report.record_error(&e);
            report
        }
    }
}
