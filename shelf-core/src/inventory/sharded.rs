//! Inventory striped across DashMap shards

use super::{put_copy, take_copy, Change, CommitListener, Inventory, InventoryOptions};
use crate::book::{Book, NewBook};
use crate::error::{InventoryError, Result};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Debug)]
struct Slot {
    /// Position in insertion order
    seq: u64,
    book: Book,
}

/// In-memory inventory with one lock per shard, chosen by id hash
///
/// Operations on different ids rarely contend. A mutation holds its shard's
/// write guard from lookup to update, so it is atomic for that id.
///
/// Creates take `membership` exclusively and `list_all` takes it shared, so
/// a listing never sees a record without the ones created before it.
/// Checkout and return skip it and only touch their own shard.
#[derive(Debug, Default)]
pub struct ShardedInventory {
    books: DashMap<String, Slot>,
    membership: RwLock<()>,
    next_seq: AtomicU64,
    options: InventoryOptions,
    listener: Option<Arc<dyn CommitListener>>,
}

impl ShardedInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: InventoryOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Report every commit to `listener` while the shard guard is held
    pub fn with_listener(mut self, listener: Arc<dyn CommitListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    fn notify(&self, change: Change, book: &Book) {
        if let Some(listener) = &self.listener {
            listener.on_commit(change, book);
        }
    }

    fn update(
        &self,
        id: &str,
        change: Change,
        apply: impl FnOnce(&mut Book) -> Result<()>,
    ) -> Result<Book> {
        let mut slot = self
            .books
            .get_mut(id)
            .ok_or_else(|| InventoryError::NotFound(id.to_string()))?;
        apply(&mut slot.book)?;
        let book = slot.book.clone();
        self.notify(change, &book);
        Ok(book)
    }
}

impl Inventory for ShardedInventory {
    fn list_all(&self) -> Result<Vec<Book>> {
        let _membership = self.membership.read().map_err(|_| InventoryError::Poisoned)?;
        let mut slots: Vec<(u64, Book)> = self
            .books
            .iter()
            .map(|entry| (entry.seq, entry.book.clone()))
            .collect();
        slots.sort_unstable_by_key(|(seq, _)| *seq);
        Ok(slots.into_iter().map(|(_, book)| book).collect())
    }

    fn get(&self, id: &str) -> Result<Book> {
        self.books
            .get(id)
            .map(|slot| slot.book.clone())
            .ok_or_else(|| InventoryError::NotFound(id.to_string()))
    }

    fn create(&self, book: NewBook) -> Result<Book> {
        let book = book.into_book(self.options.max_quantity)?;

        let _membership = self.membership.write().map_err(|_| InventoryError::Poisoned)?;
        match self.books.entry(book.id.clone()) {
            Entry::Occupied(_) => Err(InventoryError::DuplicateId(book.id)),
            Entry::Vacant(vacant) => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                let _slot = vacant.insert(Slot {
                    seq,
                    book: book.clone(),
                });
                self.notify(Change::Created, &book);
                Ok(book)
            }
        }
    }

    fn checkout(&self, id: &str) -> Result<Book> {
        self.update(id, Change::CheckedOut, take_copy)
    }

    fn return_book(&self, id: &str) -> Result<Book> {
        let options = self.options;
        self.update(id, Change::Returned, |book| put_copy(book, &options))
    }

    fn len(&self) -> Result<usize> {
        Ok(self.books.len())
    }
}
