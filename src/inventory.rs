//! # Inventory tracker
//!
//! Keeps a local full copy of the shared inventory collection and applies
//! the three mutations against the remote store.
//!
//! Every mutation is one read-then-write pair against a single document,
//! followed by a full re-read of the collection. The pair is **not** atomic:
//! two callers mutating the same name concurrently race, and the last write
//! wins (the loser's increment is computed from a stale read). The source
//! system accepts this for a single-tenant shared collection, and so do we;
//! there is no compare-and-swap here on purpose.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::error;

use crate::store::{DocumentStore, ItemDoc, StoreError};

/// A named, quantified pantry entry. `name` is the document key in the
/// remote collection, case-sensitive and unnormalized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    pub quantity: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub vendor: String,
}

/// Local mirror of the remote collection plus the mutation operations.
///
/// The mirror is replaced wholesale on every `refresh`; a stored item always
/// has quantity > 0, because `remove_item` deletes the document exactly when
/// the quantity would hit zero.
pub struct InventoryTracker {
    store: Arc<dyn DocumentStore>,
    items: RwLock<Vec<InventoryItem>>,
}

impl InventoryTracker {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            items: RwLock::new(Vec::new()),
        }
    }

    /// Snapshot of the local full list, in the order the last refresh
    /// returned it.
    pub async fn items(&self) -> Vec<InventoryItem> {
        self.items.read().await.clone()
    }

    /// Re-read the entire collection and replace the local list. On a remote
    /// failure the error is logged and the local list is left stale; the
    /// caller sees nothing. No pagination, the collection fits in memory.
    pub async fn refresh(&self) {
        match self.store.read_all().await {
            Ok(docs) => {
                let list = docs
                    .into_iter()
                    .map(|(name, doc)| InventoryItem {
                        name,
                        quantity: doc.quantity,
                        description: doc.description,
                        vendor: doc.vendor,
                    })
                    .collect();

                *self.items.write().await = list;
            }
            Err(e) => error!("Failed to refresh inventory: {e}"),
        }
    }

    /// Add `quantity` units of `name`. An existing document accumulates the
    /// quantity and has its description/vendor overwritten with the supplied
    /// values; a new name creates the document. Callers guarantee a
    /// non-empty name and a positive quantity.
    pub async fn add_item(
        &self,
        name: &str,
        quantity: u32,
        description: &str,
        vendor: &str,
    ) -> Result<(), StoreError> {
        let existing = self.store.read_one(name).await?;

        let doc = ItemDoc {
            quantity: existing.map_or(quantity, |d| d.quantity.saturating_add(quantity)),
            description: description.to_string(),
            vendor: vendor.to_string(),
        };
        self.store.write(name, &doc).await?;

        #[cfg(feature = "verbose")]
        println!("Wrote {name}: {doc:?}");

        self.refresh().await;
        Ok(())
    }

    /// Overwrite the quantity of `name` absolutely, leaving description and
    /// vendor untouched. A missing document is created with empty ones.
    pub async fn update_item(&self, name: &str, quantity: u32) -> Result<(), StoreError> {
        let existing = self.store.read_one(name).await?;

        let doc = ItemDoc {
            quantity,
            ..existing.unwrap_or_default()
        };
        self.store.write(name, &doc).await?;

        self.refresh().await;
        Ok(())
    }

    /// Remove exactly one unit of `name`: delete the document at quantity 1,
    /// otherwise decrement. An unknown name issues no write at all.
    pub async fn remove_item(&self, name: &str) -> Result<(), StoreError> {
        if let Some(doc) = self.store.read_one(name).await? {
            if doc.quantity <= 1 {
                self.store.delete(name).await?;
            } else {
                let doc = ItemDoc {
                    quantity: doc.quantity - 1,
                    ..doc
                };
                self.store.write(name, &doc).await?;
            }
        }

        self.refresh().await;
        Ok(())
    }
}
