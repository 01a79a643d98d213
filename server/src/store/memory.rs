use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use todo_core::{ObjectId, TodoChanges, TodoRecord};

use super::{StoreError, TodoStore};

/// Process-local store keeping records in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<Vec<TodoRecord>>,
    closed: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Whether `disconnect` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.is_closed() {
            Err(StoreError::Disconnected)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TodoStore for InMemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.ensure_open()
    }

    async fn find_all(&self) -> Result<Vec<TodoRecord>, StoreError> {
        self.ensure_open()?;
        Ok(self.records.read().await.clone())
    }

    async fn insert(&self, record: &TodoRecord) -> Result<ObjectId, StoreError> {
        self.ensure_open()?;
        let mut records = self.records.write().await;
        if records.iter().any(|existing| existing.id == record.id) {
            return Err(StoreError::Operation(format!(
                "duplicate key: _id {}",
                record.id
            )));
        }
        records.push(record.clone());
        Ok(record.id)
    }

    async fn update(&self, id: ObjectId, changes: &TodoChanges) -> Result<u64, StoreError> {
        self.ensure_open()?;
        let mut records = self.records.write().await;
        let modified = records
            .iter_mut()
            .find(|record| record.id == id)
            .is_some_and(|record| changes.apply(record));
        Ok(u64::from(modified))
    }

    async fn delete(&self, id: ObjectId) -> Result<u64, StoreError> {
        self.ensure_open()?;
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|record| record.id != id);
        Ok((before - records.len()) as u64)
    }

    async fn disconnect(&self) -> Result<(), StoreError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(StoreError::Disconnected);
        }
        Ok(())
    }
}
