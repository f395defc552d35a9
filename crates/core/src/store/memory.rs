//! In-memory [`DocumentStore`] used by tests and local development.
//!
//! Documents are kept as raw JSON values in insertion order and decoded on every read, so a
//! malformed record behaves the way it would coming out of a real document database.

use super::{Document, DocumentStore, DocumentStream};
use crate::{StoreError, StoreResult};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

type Records = Arc<RwLock<Vec<(String, serde_json::Value)>>>;

pub struct InMemoryStore<T> {
    records: Records,
    writes: Arc<AtomicUsize>,
    _document: PhantomData<fn() -> T>,
}

impl<T> Clone for InMemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
            writes: self.writes.clone(),
            _document: PhantomData,
        }
    }
}

impl<T: Document> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Document> InMemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            writes: Arc::new(AtomicUsize::new(0)),
            _document: PhantomData,
        }
    }

    /// Store an arbitrary JSON value under `id` without validating it against `T`.
    ///
    /// Lets tests plant records that fail to decode. Does not count as a write.
    pub async fn insert_raw(&self, id: impl Into<String>, value: serde_json::Value) {
        self.records.write().await.push((id.into(), value));
    }

    /// Number of successful create, update and delete calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn decode(value: serde_json::Value) -> StoreResult<T> {
        serde_json::from_value(value).map_err(|e| StoreError::Decode(e.to_string()))
    }

    fn encode(document: &T) -> StoreResult<serde_json::Value> {
        serde_json::to_value(document).map_err(|e| StoreError::Encode(e.to_string()))
    }
}

#[async_trait]
impl<T: Document> DocumentStore<T> for InMemoryStore<T> {
    async fn create_document(&self, id: &str, document: &T) -> StoreResult<()> {
        let value = Self::encode(document)?;
        let mut records = self.records.write().await;
        if records.iter().any(|(key, _)| key == id) {
            return Err(StoreError::Conflict);
        }
        records.push((id.to_string(), value));
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn find_document(&self, id: &str) -> StoreResult<T> {
        let records = self.records.read().await;
        let value = records
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, value)| value.clone())
            .ok_or(StoreError::NotFound)?;
        Self::decode(value)
    }

    async fn find_all_documents(&self) -> StoreResult<DocumentStream<T>> {
        let snapshot: Vec<serde_json::Value> = self
            .records
            .read()
            .await
            .iter()
            .map(|(_, value)| value.clone())
            .collect();
        Ok(stream::iter(snapshot).map(Self::decode).boxed())
    }

    async fn update_document(&self, id: &str, document: &T) -> StoreResult<()> {
        let value = Self::encode(document)?;
        let mut records = self.records.write().await;
        let position = records
            .iter()
            .position(|(key, _)| key == id)
            .ok_or(StoreError::NotFound)?;
        // Replacement may carry a new id; later lookups follow the stored document.
        let new_id = document.id();
        if new_id != id && records.iter().any(|(key, _)| key == new_id) {
            return Err(StoreError::Conflict);
        }
        records[position] = (new_id.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete_document(&self, id: &str) -> StoreResult<()> {
        let mut records = self.records.write().await;
        let position = records
            .iter()
            .position(|(key, _)| key == id)
            .ok_or(StoreError::NotFound)?;
        records.remove(position);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) {
        tracing::debug!(kind = T::KIND, "in-memory store released");
    }
}
