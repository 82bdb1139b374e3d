//! Headless tracker + filter integration tests over the in-memory store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use pantry::filter::{FilterState, filter_items};
use pantry::inventory::InventoryTracker;
use pantry::store::{DocumentStore, ItemDoc, MemoryStore, StoreError};

/// Wraps a real store, counting writes/deletes and failing on demand.
struct RecordingStore {
    inner: MemoryStore,
    fail: AtomicBool,
    writes: AtomicUsize,
    deletes: AtomicUsize,
}

impl RecordingStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            fail: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Storage("injected failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    async fn read_all(&self) -> Result<Vec<(String, ItemDoc)>, StoreError> {
        self.check()?;
        self.inner.read_all().await
    }

    async fn read_one(&self, name: &str) -> Result<Option<ItemDoc>, StoreError> {
        self.check()?;
        self.inner.read_one(name).await
    }

    async fn write(&self, name: &str, doc: &ItemDoc) -> Result<(), StoreError> {
        self.check()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.write(name, doc).await
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        self.check()?;
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(name).await
    }
}

#[tokio::test]
async fn empty_filter_equals_full_inventory() {
    let tracker = InventoryTracker::new(Arc::new(MemoryStore::new()));
    tracker.add_item("Eggs", 12, "large", "Acme").await.unwrap();
    tracker.add_item("flour", 2, "", "Mill Co").await.unwrap();
    tracker.add_item("butter", 1, "", "").await.unwrap();

    let items = tracker.items().await;
    let filtered = filter_items(&items, &FilterState::default());

    assert_eq!(filtered, items);
}

#[tokio::test]
async fn non_empty_filter_yields_a_subset() {
    let tracker = InventoryTracker::new(Arc::new(MemoryStore::new()));
    tracker.add_item("Eggs", 12, "large", "Acme").await.unwrap();
    tracker.add_item("flour", 2, "", "Mill Co").await.unwrap();

    let items = tracker.items().await;
    let filter = FilterState {
        vendor: "mill".into(),
        ..Default::default()
    };
    let filtered = filter_items(&items, &filter);

    assert!(filtered.iter().all(|f| items.contains(f)));
    assert_eq!(filtered.len(), 1);
    // source list untouched
    assert_eq!(tracker.items().await, items);
}

#[tokio::test]
async fn add_round_trip_accumulates() {
    let tracker = InventoryTracker::new(Arc::new(MemoryStore::new()));

    tracker.add_item("eggs", 12, "", "").await.unwrap();
    let items = tracker.items().await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "eggs");
    assert_eq!(items[0].quantity, 12);

    tracker.add_item("eggs", 6, "", "").await.unwrap();
    assert_eq!(tracker.items().await[0].quantity, 18);
}

#[tokio::test]
async fn deletion_boundary_at_quantity_one() {
    let tracker = InventoryTracker::new(Arc::new(MemoryStore::new()));
    tracker.add_item("milk", 2, "", "").await.unwrap();

    tracker.remove_item("milk").await.unwrap();
    let items = tracker.items().await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 1);

    tracker.remove_item("milk").await.unwrap();
    assert!(tracker.items().await.is_empty());
}

#[tokio::test]
async fn lowercase_search_matches_capitalized_name() {
    let tracker = InventoryTracker::new(Arc::new(MemoryStore::new()));
    tracker.add_item("Eggs", 1, "", "Acme").await.unwrap();

    let filter = FilterState {
        name: "egg".into(),
        ..Default::default()
    };
    let filtered = filter_items(&tracker.items().await, &filter);

    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name, "Eggs");
}

#[tokio::test]
async fn removing_nonexistent_item_issues_no_write() {
    let store = Arc::new(RecordingStore::new());
    let tracker = InventoryTracker::new(store.clone());

    tracker.remove_item("nonexistent").await.unwrap();

    assert!(tracker.items().await.is_empty());
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    assert_eq!(store.deletes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_refresh_leaves_local_list_stale() {
    let store = Arc::new(RecordingStore::new());
    let tracker = InventoryTracker::new(store.clone());
    tracker.add_item("eggs", 3, "", "").await.unwrap();
    let before = tracker.items().await;

    store.fail.store(true, Ordering::SeqCst);
    tracker.refresh().await;

    assert_eq!(tracker.items().await, before);
}

#[tokio::test]
async fn failed_write_surfaces_to_caller() {
    let store = Arc::new(RecordingStore::new());
    let tracker = InventoryTracker::new(store.clone());

    store.fail.store(true, Ordering::SeqCst);

    assert!(tracker.add_item("eggs", 1, "", "").await.is_err());
    assert!(tracker.update_item("eggs", 2).await.is_err());
    assert!(tracker.remove_item("eggs").await.is_err());
}
