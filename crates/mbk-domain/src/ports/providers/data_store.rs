//! Data Store Port
//!
//! Generic document storage addressed by collection (table) name and
//! document (record) id. Documents travel as JSON values; [`DataStoreExt`]
//! adds typed helpers on top.

use crate::error::Result;
use crate::value_objects::ProviderKey;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Backend document storage contract
#[async_trait]
pub trait BackendDataStore: Send + Sync {
    /// Key this implementation is registered under
    fn provider_key(&self) -> &ProviderKey;

    /// Read a document; `Ok(None)` when it does not exist
    async fn load(&self, collection: &str, document_id: &str) -> Result<Option<serde_json::Value>>;

    /// Write (overwrite) a document
    async fn save(&self, collection: &str, document_id: &str, data: serde_json::Value)
    -> Result<()>;

    /// Delete a document; returns whether it existed
    async fn delete(&self, collection: &str, document_id: &str) -> Result<bool>;
}

/// Typed helpers for any [`BackendDataStore`]
///
/// ```ignore
/// let profile: Option<Profile> = store.load_as("players", "user123").await?;
/// store.save_as("players", "user123", &profile).await?;
/// ```
#[async_trait]
pub trait DataStoreExt: BackendDataStore {
    /// Read and deserialize a document
    async fn load_as<T: DeserializeOwned>(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<Option<T>> {
        match self.load(collection, document_id).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Serialize and write a document
    async fn save_as<T: Serialize + Sync>(
        &self,
        collection: &str,
        document_id: &str,
        data: &T,
    ) -> Result<()> {
        let value = serde_json::to_value(data)?;
        self.save(collection, document_id, value).await
    }
}

impl<S: BackendDataStore + ?Sized> DataStoreExt for S {}
