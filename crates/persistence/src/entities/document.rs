//! Stored document entity.

use chrono::{DateTime, Utc};
use domain::models::ConfigRecord;
use sqlx::FromRow;
use uuid::Uuid;

/// A document as held by the store: the JSON body plus storage metadata.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentEntity {
    pub id: Uuid,
    pub body: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DocumentEntity> for ConfigRecord {
    type Error = serde_json::Error;

    fn try_from(entity: DocumentEntity) -> Result<Self, Self::Error> {
        ConfigRecord::from_document(entity.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entity(body: serde_json::Value) -> DocumentEntity {
        let now = Utc::now();
        DocumentEntity {
            id: Uuid::new_v4(),
            body,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_entity_to_config_record() {
        let record = ConfigRecord::try_from(entity(json!({"number": 5, "name": "five"}))).unwrap();
        assert_eq!(record, ConfigRecord::new(5, "five"));
    }

    #[test]
    fn test_entity_with_incompatible_body() {
        assert!(ConfigRecord::try_from(entity(json!({"number": "five"}))).is_err());
    }
}
