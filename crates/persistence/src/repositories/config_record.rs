//! Config record repository.
//!
//! Every operation runs on the caller's [`StoreSession`]; the repository
//! itself only knows which namespace the records live in.

use domain::models::config_record::{ConfigRecord, NUMBER_PATH, PRODUCT_ID_PATH};

use crate::entities::DocumentEntity;
use crate::metrics::{record_write, QueryTimer};
use crate::store::{Filter, FindOptions, Namespace, StoreError, StoreSession};

/// Repository for config record operations.
#[derive(Debug, Clone)]
pub struct ConfigRecordRepository {
    namespace: Namespace,
}

impl ConfigRecordRepository {
    pub fn new(namespace: Namespace) -> Self {
        Self { namespace }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Insert a record.
    pub async fn insert(
        &self,
        session: &mut dyn StoreSession,
        record: &ConfigRecord,
    ) -> Result<ConfigRecord, StoreError> {
        let document = record.to_document()?;

        let timer = QueryTimer::new("insert_config_record");
        let result = session.insert_one(&self.namespace, document).await;
        timer.record();

        let entity = result?;
        record_write("insert");
        decode(entity)
    }

    /// Get the most recently inserted records, newest first.
    pub async fn list_recent(
        &self,
        session: &mut dyn StoreSession,
        limit: i64,
    ) -> Result<Vec<ConfigRecord>, StoreError> {
        let timer = QueryTimer::new("list_recent_config_records");
        let result = session
            .find(&self.namespace, &Filter::All, FindOptions::newest(limit))
            .await;
        timer.record();

        decode_all(result?)
    }

    /// Get every record with the given number, in insertion order.
    pub async fn find_by_number(
        &self,
        session: &mut dyn StoreSession,
        number: i64,
    ) -> Result<Vec<ConfigRecord>, StoreError> {
        let timer = QueryTimer::new("find_config_records_by_number");
        let result = session
            .find(
                &self.namespace,
                &Filter::eq(NUMBER_PATH, number),
                FindOptions::default(),
            )
            .await;
        timer.record();

        decode_all(result?)
    }

    /// Get the earliest record whose `configBody.productId` matches.
    pub async fn find_by_product_id(
        &self,
        session: &mut dyn StoreSession,
        product_id: &str,
    ) -> Result<Option<ConfigRecord>, StoreError> {
        let timer = QueryTimer::new("find_config_record_by_product_id");
        let result = session
            .find(
                &self.namespace,
                &Filter::eq(PRODUCT_ID_PATH, product_id),
                FindOptions::first(),
            )
            .await;
        timer.record();

        result?.into_iter().next().map(decode).transpose()
    }

    /// Replace the first record with the given number by `record`.
    ///
    /// The stored body becomes exactly `record`; no fields of the old body survive.
    pub async fn replace_by_number(
        &self,
        session: &mut dyn StoreSession,
        number: i64,
        record: &ConfigRecord,
    ) -> Result<Option<ConfigRecord>, StoreError> {
        let document = record.to_document()?;

        let timer = QueryTimer::new("replace_config_record_by_number");
        let result = session
            .replace_one(&self.namespace, &Filter::eq(NUMBER_PATH, number), document)
            .await;
        timer.record();

        let replaced = result?;
        if replaced.is_some() {
            record_write("replace");
        }
        replaced.map(decode).transpose()
    }
}

fn decode(entity: DocumentEntity) -> Result<ConfigRecord, StoreError> {
    Ok(ConfigRecord::try_from(entity)?)
}

fn decode_all(entities: Vec<DocumentEntity>) -> Result<Vec<ConfigRecord>, StoreError> {
    entities.into_iter().map(decode).collect()
}
