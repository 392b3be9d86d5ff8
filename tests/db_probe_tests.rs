//! Tests for the database probe flow against an in-memory directory
//!
//! These tests verify:
//! - Collections are listed and the users collection is counted and sampled
//! - A missing users collection is not an error
//! - Sample users with unexpected field types do not fail the probe
//! - Disconnect runs on every path, including a failed connection

use devprobes::models::UserSummary;
use devprobes::services::db_probe::{DbProbeError, UserDirectory, run_probe};
use mongodb::bson::{Bson, doc};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
struct FakeDirectory {
    reachable: bool,
    collections: Vec<String>,
    users: Vec<UserSummary>,
    fail_count: bool,
    disconnected: Arc<AtomicBool>,
    queries: Arc<AtomicUsize>,
}

impl FakeDirectory {
    fn reachable(collections: &[&str], users: Vec<UserSummary>) -> Self {
        Self {
            reachable: true,
            collections: collections.iter().map(|c| c.to_string()).collect(),
            users,
            ..Self::default()
        }
    }
}

impl UserDirectory for FakeDirectory {
    fn users_collection(&self) -> &str {
        "users"
    }

    async fn ping(&self) -> Result<(), DbProbeError> {
        if self.reachable {
            Ok(())
        } else {
            Err(DbProbeError::Backend("connection refused".to_string()))
        }
    }

    async fn collection_names(&self) -> Result<Vec<String>, DbProbeError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.collections.clone())
    }

    async fn count_users(&self) -> Result<u64, DbProbeError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_count {
            return Err(DbProbeError::Backend("count failed".to_string()));
        }
        Ok(self.users.len() as u64)
    }

    async fn sample_user(&self) -> Result<Option<UserSummary>, DbProbeError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.users.first().cloned())
    }

    async fn disconnect(self) {
        self.disconnected.store(true, Ordering::SeqCst);
    }
}

fn user(name: &str) -> UserSummary {
    UserSummary {
        username: Some(name.to_string()),
        email: Some(format!("{}@example.com", name)),
        role: Some("user".to_string()),
        active: Some(Bson::Boolean(true)),
        ..UserSummary::default()
    }
}

#[tokio::test]
async fn test_probe_counts_and_samples_users() {
    let directory = FakeDirectory::reachable(&["products", "users"], vec![user("alice"), user("bob")]);
    let disconnected = directory.disconnected.clone();

    let report = run_probe(directory).await;

    assert!(report.passed());
    assert_eq!(report.collections, vec!["products", "users"]);
    assert_eq!(report.user_count, Some(2));
    assert_eq!(
        report.sample_user.as_ref().and_then(|u| u.username.as_deref()),
        Some("alice")
    );
    assert!(report.disconnected);
    assert!(disconnected.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_probe_passes_with_loosely_typed_user() {
    let stored = UserSummary::from_document(&doc! {
        "_id": "user-1",
        "username": "legacy",
        "isActive": 1,
    });
    let directory = FakeDirectory::reachable(&["users"], vec![stored]);

    let report = run_probe(directory).await;

    assert!(report.passed());
    let sample = report.sample_user.unwrap();
    assert_eq!(sample.id, Some(Bson::String("user-1".to_string())));
    assert_eq!(sample.active, Some(Bson::Int32(1)));
}

#[tokio::test]
async fn test_probe_without_users_collection() {
    let directory = FakeDirectory::reachable(&["products"], Vec::new());
    let queries = directory.queries.clone();

    let report = run_probe(directory).await;

    assert!(report.passed());
    assert_eq!(report.user_count, None);
    assert!(report.sample_user.is_none());
    // Only the collection listing ran
    assert_eq!(queries.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unreachable_server_still_disconnects() {
    let directory = FakeDirectory::default();
    let disconnected = directory.disconnected.clone();
    let queries = directory.queries.clone();

    let report = run_probe(directory).await;

    assert!(!report.connected);
    assert!(!report.passed());
    assert!(report.error.as_deref().unwrap().contains("connection refused"));
    assert_eq!(queries.load(Ordering::SeqCst), 0);
    assert!(disconnected.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_failure_mid_probe_stops_and_disconnects() {
    let directory = FakeDirectory {
        fail_count: true,
        ..FakeDirectory::reachable(&["users"], vec![user("carol")])
    };
    let disconnected = directory.disconnected.clone();

    let report = run_probe(directory).await;

    assert!(report.connected);
    assert!(!report.passed());
    assert_eq!(report.user_count, None);
    // Sampling never ran after the count failed
    assert!(report.sample_user.is_none());
    assert!(disconnected.load(Ordering::SeqCst));
}
