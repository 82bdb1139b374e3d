//! # Document store
//!
//! The remote keyed document collection behind the inventory.
//!
//! One Redis hash holds the whole collection: field is the item name, value
//! is the JSON document for that item. Compact pairs and O(1) lookups, and
//! `HGETALL` gives us the read-everything path the tracker refreshes from.
//!
//! The hash layout means "read-all" returns fields in whatever order Redis
//! reports them; callers must not rely on any particular ordering across
//! refreshes.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hash key the whole inventory collection lives under.
pub const INVENTORY_KEY: &str = "inventory";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("remote store error: {0}")]
    Remote(#[from] redis::RedisError),

    #[error("malformed document for {name}: {source}")]
    Document {
        name: String,
        source: serde_json::Error,
    },

    #[error("storage error: {0}")]
    Storage(String),
}

/// Stored document body. The item name is the hash field, not part of the
/// document itself.
///
/// `description` and `vendor` default to the empty string so documents
/// written without them still deserialize.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDoc {
    pub quantity: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub vendor: String,
}

/// Keyed document collection: read-all, read-one, replace-by-key,
/// delete-by-key. No ordering or atomicity guarantees beyond single-key
/// writes.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn read_all(&self) -> Result<Vec<(String, ItemDoc)>, StoreError>;

    async fn read_one(&self, name: &str) -> Result<Option<ItemDoc>, StoreError>;

    /// Replace the document under `name` wholesale.
    async fn write(&self, name: &str, doc: &ItemDoc) -> Result<(), StoreError>;

    async fn delete(&self, name: &str) -> Result<(), StoreError>;
}

pub async fn init_redis(redis_url: &str) -> ConnectionManager {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url).unwrap();

    client
        .get_connection_manager_with_config(config)
        .await
        .unwrap()
}

/// Redis-backed collection. `ConnectionManager` is clone-per-call.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }
}

fn parse_doc(name: &str, raw: &str) -> Result<ItemDoc, StoreError> {
    serde_json::from_str(raw).map_err(|source| StoreError::Document {
        name: name.to_string(),
        source,
    })
}

fn encode_doc(name: &str, doc: &ItemDoc) -> Result<String, StoreError> {
    serde_json::to_string(doc).map_err(|source| StoreError::Document {
        name: name.to_string(),
        source,
    })
}

#[async_trait]
impl DocumentStore for RedisStore {
    async fn read_all(&self) -> Result<Vec<(String, ItemDoc)>, StoreError> {
        let mut connection = self.connection.clone();
        let entries: HashMap<String, String> = connection.hgetall(INVENTORY_KEY).await?;

        let mut docs = Vec::with_capacity(entries.len());
        for (name, raw) in entries {
            let doc = parse_doc(&name, &raw)?;
            docs.push((name, doc));
        }

        Ok(docs)
    }

    async fn read_one(&self, name: &str) -> Result<Option<ItemDoc>, StoreError> {
        let mut connection = self.connection.clone();
        let raw: Option<String> = connection.hget(INVENTORY_KEY, name).await?;

        raw.map(|raw| parse_doc(name, &raw)).transpose()
    }

    async fn write(&self, name: &str, doc: &ItemDoc) -> Result<(), StoreError> {
        let raw = encode_doc(name, doc)?;

        let mut connection = self.connection.clone();
        let _: i64 = connection.hset(INVENTORY_KEY, name, raw).await?;

        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        let _: i64 = connection.hdel(INVENTORY_KEY, name).await?;

        Ok(())
    }
}

/// Map-backed collection for tests and headless development. BTreeMap keeps
/// the read-all order deterministic, which the tests lean on; the trait
/// itself promises no order.
#[derive(Clone, Default)]
pub struct MemoryStore {
    docs: Arc<RwLock<BTreeMap<String, ItemDoc>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read_all(&self) -> Result<Vec<(String, ItemDoc)>, StoreError> {
        let docs = self
            .docs
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        Ok(docs
            .iter()
            .map(|(name, doc)| (name.clone(), doc.clone()))
            .collect())
    }

    async fn read_one(&self, name: &str) -> Result<Option<ItemDoc>, StoreError> {
        let docs = self
            .docs
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        Ok(docs.get(name).cloned())
    }

    async fn write(&self, name: &str, doc: &ItemDoc) -> Result<(), StoreError> {
        let mut docs = self
            .docs
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        docs.insert(name.to_string(), doc.clone());
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        let mut docs = self
            .docs
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        docs.remove(name);
        Ok(())
    }
}
