//! Simulated data store
//!
//! JSON documents in a concurrent map keyed by `(collection, document id)`.

use async_trait::async_trait;
use dashmap::DashMap;
use mbk_domain::error::{Error, Result};
use mbk_domain::ports::providers::BackendDataStore;
use mbk_domain::value_objects::ProviderKey;
use tracing::debug;

type DocumentKey = (String, String);

/// In-memory document store
#[derive(Debug)]
pub struct SimulatedDataStore {
    key: ProviderKey,
    documents: DashMap<DocumentKey, serde_json::Value>,
}

impl SimulatedDataStore {
    /// Create an empty store registered under `key`
    pub fn new(key: ProviderKey) -> Self {
        Self {
            key,
            documents: DashMap::new(),
        }
    }

    /// Number of stored documents across all collections
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }
}

fn document_key(collection: &str, document_id: &str) -> Result<DocumentKey> {
    if collection.is_empty() {
        return Err(Error::invalid_argument("collection name must not be empty"));
    }
    if document_id.is_empty() {
        return Err(Error::invalid_argument("document id must not be empty"));
    }
    Ok((collection.to_owned(), document_id.to_owned()))
}

#[async_trait]
impl BackendDataStore for SimulatedDataStore {
    fn provider_key(&self) -> &ProviderKey {
        &self.key
    }

    async fn load(&self, collection: &str, document_id: &str) -> Result<Option<serde_json::Value>> {
        let key = document_key(collection, document_id)?;
        Ok(self.documents.get(&key).map(|doc| doc.value().clone()))
    }

    async fn save(
        &self,
        collection: &str,
        document_id: &str,
        data: serde_json::Value,
    ) -> Result<()> {
        let key = document_key(collection, document_id)?;
        debug!(provider = %self.key, collection, document_id, "Document saved");
        self.documents.insert(key, data);
        Ok(())
    }

    async fn delete(&self, collection: &str, document_id: &str) -> Result<bool> {
        let key = document_key(collection, document_id)?;
        Ok(self.documents.remove(&key).is_some())
    }
}
