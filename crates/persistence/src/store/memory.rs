//! Process-local document store.
//!
//! Used by tests and by development runs with `store.backend = "memory"`.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DocumentStore, Filter, FindOptions, Namespace, SortOrder, StoreError, StoreSession};
use crate::entities::DocumentEntity;

struct Inner {
    collections: RwLock<HashMap<Namespace, Vec<DocumentEntity>>>,
    sessions_opened: AtomicUsize,
    available: AtomicBool,
}

/// In-memory [`DocumentStore`]. Clones share the same data.
#[derive(Clone)]
pub struct MemoryDocumentStore {
    inner: Arc<Inner>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                collections: RwLock::new(HashMap::new()),
                sessions_opened: AtomicUsize::new(0),
                available: AtomicBool::new(true),
            }),
        }
    }

    /// Number of sessions handed out so far.
    pub fn sessions_opened(&self) -> usize {
        self.inner.sessions_opened.load(Ordering::SeqCst)
    }

    /// Makes subsequent `session` and `ping` calls fail with [`StoreError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.inner.available.store(available, Ordering::SeqCst);
    }

    /// Number of documents held in a namespace.
    pub async fn count(&self, namespace: &Namespace) -> usize {
        self.inner
            .collections
            .read()
            .await
            .get(namespace)
            .map_or(0, Vec::len)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.inner.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable(
                "memory store is offline".to_string(),
            ))
        }
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn session(&self) -> Result<Box<dyn StoreSession>, StoreError> {
        self.check_available()?;
        self.inner.sessions_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryStoreSession {
            inner: self.inner.clone(),
        }))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Session over a [`MemoryDocumentStore`].
pub struct MemoryStoreSession {
    inner: Arc<Inner>,
}

#[async_trait]
impl StoreSession for MemoryStoreSession {
    async fn insert_one(
        &mut self,
        namespace: &Namespace,
        body: Value,
    ) -> Result<DocumentEntity, StoreError> {
        let now = Utc::now();
        let entity = DocumentEntity {
            id: Uuid::new_v4(),
            body,
            created_at: now,
            updated_at: now,
        };

        self.inner
            .collections
            .write()
            .await
            .entry(namespace.clone())
            .or_default()
            .push(entity.clone());

        Ok(entity)
    }

    async fn find(
        &mut self,
        namespace: &Namespace,
        filter: &Filter,
        options: FindOptions,
    ) -> Result<Vec<DocumentEntity>, StoreError> {
        let collections = self.inner.collections.read().await;
        let Some(documents) = collections.get(namespace) else {
            return Ok(Vec::new());
        };

        let limit = options
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(0));
        let matching = documents.iter().filter(|d| filter.matches(&d.body));

        let found = match options.sort {
            SortOrder::OldestFirst => matching.take(limit).cloned().collect(),
            SortOrder::NewestFirst => matching.rev().take(limit).cloned().collect(),
        };

        Ok(found)
    }

    async fn replace_one(
        &mut self,
        namespace: &Namespace,
        filter: &Filter,
        body: Value,
    ) -> Result<Option<DocumentEntity>, StoreError> {
        let mut collections = self.inner.collections.write().await;
        let Some(documents) = collections.get_mut(namespace) else {
            return Ok(None);
        };

        let Some(document) = documents.iter_mut().find(|d| filter.matches(&d.body)) else {
            return Ok(None);
        };

        document.body = body;
        document.updated_at = Utc::now();
        Ok(Some(document.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn configs() -> Namespace {
        Namespace::new("avProductConfig", "configs")
    }

    #[tokio::test]
    async fn test_insert_and_find_all() {
        let store = MemoryDocumentStore::new();
        let mut session = store.session().await.unwrap();

        assert_ok!(session.insert_one(&configs(), json!({"number": 1})).await);
        assert_ok!(session.insert_one(&configs(), json!({"number": 2})).await);

        let found = session
            .find(&configs(), &Filter::All, FindOptions::default())
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].body["number"], 1);
        assert_eq!(found[1].body["number"], 2);
    }

    #[tokio::test]
    async fn test_find_newest_first_with_limit() {
        let store = MemoryDocumentStore::new();
        let mut session = store.session().await.unwrap();
        for n in 1..=5 {
            session
                .insert_one(&configs(), json!({ "number": n }))
                .await
                .unwrap();
        }

        let found = session
            .find(&configs(), &Filter::All, FindOptions::newest(2))
            .await
            .unwrap();
        let numbers: Vec<i64> = found.iter().map(|d| d.body["number"].as_i64().unwrap()).collect();
        assert_eq!(numbers, vec![5, 4]);
    }

    #[tokio::test]
    async fn test_find_in_unknown_namespace_is_empty() {
        let store = MemoryDocumentStore::new();
        let mut session = store.session().await.unwrap();
        let found = session
            .find(
                &Namespace::new("other", "configs"),
                &Filter::All,
                FindOptions::default(),
            )
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let store = MemoryDocumentStore::new();
        let mut session = store.session().await.unwrap();
        session
            .insert_one(&Namespace::new("a", "configs"), json!({"number": 1}))
            .await
            .unwrap();

        assert_eq!(store.count(&Namespace::new("a", "configs")).await, 1);
        assert_eq!(store.count(&Namespace::new("b", "configs")).await, 0);
    }

    #[tokio::test]
    async fn test_replace_one_replaces_first_match_only() {
        let store = MemoryDocumentStore::new();
        let mut session = store.session().await.unwrap();
        session
            .insert_one(&configs(), json!({"number": 1, "name": "first"}))
            .await
            .unwrap();
        session
            .insert_one(&configs(), json!({"number": 1, "name": "second"}))
            .await
            .unwrap();

        let replaced = session
            .replace_one(
                &configs(),
                &Filter::eq(&["number"], 1),
                json!({"number": 1, "name": "new"}),
            )
            .await
            .unwrap()
            .expect("document should match");
        assert_eq!(replaced.body["name"], "new");

        let found = session
            .find(&configs(), &Filter::eq(&["number"], 1), FindOptions::default())
            .await
            .unwrap();
        assert_eq!(found[0].body["name"], "new");
        assert_eq!(found[1].body["name"], "second");
    }

    #[tokio::test]
    async fn test_replace_one_without_match() {
        let store = MemoryDocumentStore::new();
        let mut session = store.session().await.unwrap();
        let replaced = session
            .replace_one(&configs(), &Filter::eq(&["number"], 9), json!({}))
            .await
            .unwrap();
        assert!(replaced.is_none());
    }

    #[tokio::test]
    async fn test_replace_does_not_merge() {
        let store = MemoryDocumentStore::new();
        let mut session = store.session().await.unwrap();
        session
            .insert_one(&configs(), json!({"number": 1, "name": "a", "extra": true}))
            .await
            .unwrap();
        let replaced = session
            .replace_one(&configs(), &Filter::eq(&["number"], 1), json!({"number": 1}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.body, json!({"number": 1}));
    }

    #[tokio::test]
    async fn test_sessions_are_counted() {
        let store = MemoryDocumentStore::new();
        assert_eq!(store.sessions_opened(), 0);
        drop(store.session().await.unwrap());
        drop(store.clone().session().await.unwrap());
        assert_eq!(store.sessions_opened(), 2);
    }

    #[tokio::test]
    async fn test_offline_store() {
        let store = MemoryDocumentStore::new();
        store.set_available(false);
        assert_err!(store.ping().await);
        assert!(matches!(
            store.session().await,
            Err(StoreError::Unavailable(_))
        ));
        assert_eq!(store.sessions_opened(), 0);

        store.set_available(true);
        assert_ok!(store.ping().await);
    }

    #[test]
    fn test_backend_name() {
        assert_eq!(MemoryDocumentStore::new().backend(), "memory");
    }
}
