use mongodb::bson::{Bson, Document};

/// Read-only view of a document in the users collection.
///
/// Built from whatever the stored document holds; no field has a required
/// type. The password hash is never part of this type and is also excluded
/// by projection when querying.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserSummary {
    pub id: Option<Bson>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    /// `isActive`, falling back to `active`
    pub active: Option<Bson>,
}

impl UserSummary {
    pub fn from_document(document: &Document) -> Self {
        Self {
            id: document.get("_id").cloned(),
            username: text_field(document, "username"),
            email: text_field(document, "email"),
            role: text_field(document, "role"),
            active: document
                .get("isActive")
                .or_else(|| document.get("active"))
                .cloned(),
        }
    }

    /// One-line description for the probe transcript
    pub fn describe(&self) -> String {
        format!(
            "username={}, email={}, role={}, active={}",
            self.username.as_deref().unwrap_or("<none>"),
            self.email.as_deref().unwrap_or("<none>"),
            self.role.as_deref().unwrap_or("<none>"),
            self.active
                .as_ref()
                .map(|a| a.to_string())
                .unwrap_or_else(|| "<unset>".to_string()),
        )
    }
}

/// Strings as-is, any other value in its display form
fn text_field(document: &Document, key: &str) -> Option<String> {
    document.get(key).map(|value| match value {
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_from_document_ignores_password() {
        let id = ObjectId::new();
        let document = doc! {
            "_id": id,
            "username": "alice",
            "email": "alice@example.com",
            "password": "$2a$10$hash",
            "role": "admin",
            "isActive": true,
        };

        let user = UserSummary::from_document(&document);
        assert_eq!(user.id, Some(Bson::ObjectId(id)));
        assert_eq!(user.username.as_deref(), Some("alice"));
        assert_eq!(user.active, Some(Bson::Boolean(true)));
        assert!(!user.describe().contains("hash"));
    }

    #[test]
    fn test_from_document_accepts_unexpected_types() {
        let document = doc! {
            "_id": "user-1",
            "username": "bob",
            "role": 2,
            "isActive": 1,
        };

        let user = UserSummary::from_document(&document);
        assert_eq!(user.id, Some(Bson::String("user-1".to_string())));
        assert_eq!(user.role.as_deref(), Some("2"));
        assert_eq!(user.active, Some(Bson::Int32(1)));
        assert!(user.describe().contains("active=1"));
    }

    #[test]
    fn test_active_falls_back_to_plain_field() {
        let user = UserSummary::from_document(&doc! { "active": false });
        assert_eq!(user.active, Some(Bson::Boolean(false)));
    }

    #[test]
    fn test_describe_missing_fields() {
        let user = UserSummary::default();
        assert!(user.describe().contains("username=<none>"));
        assert!(user.describe().contains("active=<unset>"));
    }
}
