//! MongoDB-backed [`DocumentStore`].
//!
//! One [`MongoConnection`] wraps the pooled driver client for the whole process. Each entity
//! kind gets a [`MongoStore`] bound to its own collection of that connection. Documents are
//! looked up by their `id` field, not by Mongo's `_id`.

use super::{Document, DocumentStore, DocumentStream};
use crate::config::MongoConfig;
use crate::constants::{ID_FIELD, MONGODB_APP_NAME};
use crate::{ConfigError, ConfigResult, StoreError, StoreResult};
use async_trait::async_trait;
use futures::stream::StreamExt;
use mongodb::bson::{
    from_document, to_document, Bson, DateTime as BsonDateTime, Document as BsonDocument,
};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, Credential, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Process-wide handle on the MongoDB deployment.
pub struct MongoConnection {
    client: Client,
    database: String,
    closed: AtomicBool,
}

impl MongoConnection {
    /// Build a client from `cfg`.
    ///
    /// The driver connects lazily, so this does not fail when the server is unreachable; the
    /// first operation will instead, after the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MongoOptions`] if the connection options are rejected.
    pub async fn connect(cfg: &MongoConfig) -> ConfigResult<Arc<Self>> {
        let mut options = ClientOptions::parse(cfg.connection_uri())
            .await
            .map_err(ConfigError::MongoOptions)?;
        options.app_name = Some(MONGODB_APP_NAME.to_string());
        options.connect_timeout = Some(cfg.timeout());
        options.server_selection_timeout = Some(cfg.timeout());
        if let Some(username) = cfg.username() {
            let mut credential = Credential::default();
            credential.username = Some(username.to_string());
            credential.password = cfg.password().map(str::to_string);
            options.credential = Some(credential);
        }

        let client = Client::with_options(options).map_err(ConfigError::MongoOptions)?;
        tracing::info!(
            uri = %cfg.connection_uri(),
            database = cfg.database(),
            "MongoDB client configured"
        );

        Ok(Arc::new(Self {
            client,
            database: cfg.database().to_string(),
            closed: AtomicBool::new(false),
        }))
    }

    /// Store for `T` over the collection `name`.
    pub fn store<T: Document>(self: &Arc<Self>, name: &str) -> MongoStore<T> {
        MongoStore {
            connection: self.clone(),
            collection: self.client.database(&self.database).collection(name),
            _document: PhantomData,
        }
    }

    /// Shut the client down. Later calls are no-ops.
    pub async fn shutdown(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.client.clone().shutdown().await;
        tracing::info!(database = %self.database, "MongoDB client shut down");
    }
}

pub struct MongoStore<T> {
    connection: Arc<MongoConnection>,
    collection: Collection<BsonDocument>,
    _document: PhantomData<fn() -> T>,
}

impl<T: Document> MongoStore<T> {
    /// Create a unique index on the `id` field so concurrent creates cannot both succeed.
    pub async fn ensure_id_index(&self) -> StoreResult<()> {
        let mut keys = BsonDocument::new();
        keys.insert(ID_FIELD, 1);
        let model = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(model).await?;
        Ok(())
    }
}

fn id_filter(id: &str) -> BsonDocument {
    let mut filter = BsonDocument::new();
    filter.insert(ID_FIELD, id);
    filter
}

/// Serialise `document`, turning its RFC 3339 date fields into BSON datetimes.
fn encode_record<T: Document>(document: &T) -> StoreResult<BsonDocument> {
    let mut record = to_document(document)?;
    for field in T::DATE_FIELDS {
        let instant = match record.get(*field) {
            Some(Bson::String(text)) => BsonDateTime::parse_rfc3339_str(text)
                .map_err(|e| StoreError::Encode(format!("{field}: {e}")))?,
            _ => continue,
        };
        record.insert(*field, instant);
    }
    Ok(record)
}

/// Inverse of [`encode_record`]. Date fields already stored as strings are left alone.
fn decode_record<T: Document>(mut record: BsonDocument) -> StoreResult<T> {
    for field in T::DATE_FIELDS {
        let text = match record.get(*field) {
            Some(Bson::DateTime(instant)) => instant
                .try_to_rfc3339_string()
                .map_err(|e| StoreError::Decode(format!("{field}: {e}")))?,
            _ => continue,
        };
        record.insert(*field, text);
    }
    Ok(from_document(record)?)
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

#[async_trait]
impl<T: Document> DocumentStore<T> for MongoStore<T> {
    async fn create_document(&self, id: &str, document: &T) -> StoreResult<()> {
        if self.collection.find_one(id_filter(id)).await?.is_some() {
            return Err(StoreError::Conflict);
        }

        let record = encode_record(document)?;
        match self.collection.insert_one(record).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(StoreError::Conflict),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_document(&self, id: &str) -> StoreResult<T> {
        let record = self
            .collection
            .find_one(id_filter(id))
            .await?
            .ok_or(StoreError::NotFound)?;
        decode_record(record)
    }

    async fn find_all_documents(&self) -> StoreResult<DocumentStream<T>> {
        let cursor = self.collection.find(BsonDocument::new()).await?;
        let documents = cursor.map(|item| -> StoreResult<T> { decode_record(item?) });
        Ok(documents.boxed())
    }

    async fn update_document(&self, id: &str, document: &T) -> StoreResult<()> {
        let record = encode_record(document)?;
        let result = match self.collection.replace_one(id_filter(id), record).await {
            Ok(result) => result,
            Err(e) if is_duplicate_key(&e) => return Err(StoreError::Conflict),
            Err(e) => return Err(e.into()),
        };
        if result.matched_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_document(&self, id: &str) -> StoreResult<()> {
        let result = self.collection.delete_one(id_filter(id)).await?;
        if result.deleted_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn disconnect(&self) {
        self.connection.shutdown().await;
    }
}
