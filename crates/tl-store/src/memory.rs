use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use tl_core::{Collection, RowId};

use crate::{RowStore, StoreError};

/// A row store held in memory.
///
/// Every collection starts with its header row. Rows are matched on their
/// first cell for update and delete. Used by tests and for dry runs.
#[derive(Debug)]
pub struct MemoryRowStore {
    tabs: Mutex<HashMap<Collection, Vec<Vec<String>>>>,
    list_calls: AtomicUsize,
}

impl Default for MemoryRowStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRowStore {
    pub fn new() -> Self {
        let tabs = Collection::ALL
            .into_iter()
            .map(|c| {
                let header = c.fields().iter().map(|f| (*f).to_string()).collect();
                (c, vec![header])
            })
            .collect();
        Self {
            tabs: Mutex::new(tabs),
            list_calls: AtomicUsize::new(0),
        }
    }

    /// Number of `list` calls served so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Data rows of `collection`, without the header.
    pub fn rows(&self, collection: Collection) -> Vec<Vec<String>> {
        self.tabs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&collection)
            .map(|rows| rows.iter().skip(1).cloned().collect())
            .unwrap_or_default()
    }

    fn with_tab<T>(
        &self,
        collection: Collection,
        f: impl FnOnce(&mut Vec<Vec<String>>) -> T,
    ) -> T {
        let mut tabs = self.tabs.lock().unwrap_or_else(PoisonError::into_inner);
        f(tabs.entry(collection).or_default())
    }

    fn position(rows: &[Vec<String>], id: &RowId) -> Option<usize> {
        rows.iter()
            .skip(1)
            .position(|row| row.first().is_some_and(|cell| cell == id.as_str()))
            .map(|i| i + 1)
    }
}

impl RowStore for MemoryRowStore {
    async fn list(&self, collection: Collection) -> Result<Vec<Vec<String>>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.with_tab(collection, |rows| rows.clone()))
    }

    async fn append(&self, collection: Collection, row: Vec<String>) -> Result<(), StoreError> {
        self.with_tab(collection, |rows| rows.push(row));
        Ok(())
    }

    async fn update(
        &self,
        collection: Collection,
        id: &RowId,
        row: Vec<String>,
    ) -> Result<(), StoreError> {
        self.with_tab(collection, |rows| {
            let index = Self::position(rows, id).ok_or_else(|| StoreError::RowNotFound {
                collection,
                id: id.to_string(),
            })?;
            rows[index] = row;
            Ok(())
        })
    }

    async fn delete(&self, collection: Collection, id: &RowId) -> Result<(), StoreError> {
        self.with_tab(collection, |rows| {
            let index = Self::position(rows, id).ok_or_else(|| StoreError::RowNotFound {
                collection,
                id: id.to_string(),
            })?;
            rows.remove(index);
            Ok(())
        })
    }
}
