//! Generic document-collection access.
//!
//! [`DocumentStore`] is the single contract the handlers depend on. It is implemented by
//! [`MongoStore`] for production and by [`InMemoryStore`] for tests and local development. Each
//! entity kind gets its own instance bound to its own collection.
//!
//! ## Error kinds
//!
//! | Operation | Kinds besides backend failures |
//! |---|---|
//! | `create_document` | [`crate::StoreError::Conflict`] when the id is taken |
//! | `find_document` | [`crate::StoreError::NotFound`] |
//! | `find_all_documents` | [`crate::StoreError::Decode`] per stream item |
//! | `update_document` | [`crate::StoreError::NotFound`], [`crate::StoreError::Conflict`] when the new id is taken |
//! | `delete_document` | [`crate::StoreError::NotFound`] |
//!
//! Nothing is cached or retried here.

mod memory;
mod mongo;

pub use memory::InMemoryStore;
pub use mongo::{MongoConnection, MongoStore};

use crate::StoreResult;
use async_trait::async_trait;
use futures::stream::{BoxStream, TryStreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// An entity that can be stored in a document collection, keyed by a string id.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {
    /// Human-readable entity name used in log lines.
    const KIND: &'static str;

    /// Top-level timestamp fields. Stored natively as datetimes by backends that have them.
    const DATE_FIELDS: &'static [&'static str] = &[];

    fn id(&self) -> &str;
}

/// Lazy sequence over every document of a collection.
///
/// A fresh stream is produced per call; it cannot be resumed after being dropped.
pub type DocumentStream<T> = BoxStream<'static, StoreResult<T>>;

/// Create, read, update and delete access to one collection of `T`.
#[async_trait]
pub trait DocumentStore<T: Document>: Send + Sync {
    /// Insert `document` under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::Conflict`] if a document with `id` already exists.
    async fn create_document(&self, id: &str, document: &T) -> StoreResult<()>;

    /// Fetch the document stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::NotFound`] if there is no such document.
    async fn find_document(&self, id: &str) -> StoreResult<T>;

    /// Open a stream over all documents in the collection.
    ///
    /// Documents are decoded as they are pulled; a document that cannot be decoded into `T`
    /// yields a [`crate::StoreError::Decode`] item.
    async fn find_all_documents(&self) -> StoreResult<DocumentStream<T>>;

    /// Replace the document stored under `id` with `document` in full.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::NotFound`] if there is no such document, or
    /// [`crate::StoreError::Conflict`] if `document` carries a different id that another
    /// document already holds.
    async fn update_document(&self, id: &str, document: &T) -> StoreResult<()>;

    /// Remove the document stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::NotFound`] if there is no such document.
    async fn delete_document(&self, id: &str) -> StoreResult<()>;

    /// Release resources held by the store. Called once at shutdown.
    async fn disconnect(&self);
}

/// Drain a document stream into a vector, stopping at the first failing item.
pub async fn collect_documents<T: Document>(stream: DocumentStream<T>) -> StoreResult<Vec<T>> {
    stream.try_collect().await
}

/// Open a stream over `store` and collect it.
pub async fn find_all<T, S>(store: &S) -> StoreResult<Vec<T>>
where
    T: Document,
    S: DocumentStore<T> + ?Sized,
{
    let stream = store.find_all_documents().await?;
    collect_documents(stream).await
}
