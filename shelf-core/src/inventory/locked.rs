//! Inventory guarded by a single reader-writer lock

use super::{put_copy, take_copy, Change, CommitListener, Inventory, InventoryOptions};
use crate::book::{Book, NewBook};
use crate::error::{InventoryError, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Shelf {
    books: HashMap<String, Book>,
    /// Ids in insertion order
    order: Vec<String>,
}

/// In-memory inventory with one `RwLock` over the whole collection
///
/// Reads share the lock; create, checkout and return take it exclusively,
/// which makes every check-then-mutate sequence a single critical section.
#[derive(Debug, Default)]
pub struct LockedInventory {
    shelf: RwLock<Shelf>,
    options: InventoryOptions,
    listener: Option<Arc<dyn CommitListener>>,
}

impl LockedInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: InventoryOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Report every commit to `listener` while the write lock is held
    pub fn with_listener(mut self, listener: Arc<dyn CommitListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    fn notify(&self, change: Change, book: &Book) {
        if let Some(listener) = &self.listener {
            listener.on_commit(change, book);
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Shelf>> {
        self.shelf.read().map_err(|_| InventoryError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Shelf>> {
        self.shelf.write().map_err(|_| InventoryError::Poisoned)
    }

    fn update(
        &self,
        id: &str,
        change: Change,
        apply: impl FnOnce(&mut Book) -> Result<()>,
    ) -> Result<Book> {
        let mut shelf = self.write()?;
        let book = shelf
            .books
            .get_mut(id)
            .ok_or_else(|| InventoryError::NotFound(id.to_string()))?;
        apply(book)?;
        let book = book.clone();
        self.notify(change, &book);
        Ok(book)
    }
}

impl Inventory for LockedInventory {
    fn list_all(&self) -> Result<Vec<Book>> {
        let shelf = self.read()?;
        Ok(shelf
            .order
            .iter()
            .filter_map(|id| shelf.books.get(id).cloned())
            .collect())
    }

    fn get(&self, id: &str) -> Result<Book> {
        self.read()?
            .books
            .get(id)
            .cloned()
            .ok_or_else(|| InventoryError::NotFound(id.to_string()))
    }

    fn create(&self, book: NewBook) -> Result<Book> {
        let book = book.into_book(self.options.max_quantity)?;

        let mut shelf = self.write()?;
        if shelf.books.contains_key(&book.id) {
            return Err(InventoryError::DuplicateId(book.id));
        }
        shelf.order.push(book.id.clone());
        shelf.books.insert(book.id.clone(), book.clone());
        self.notify(Change::Created, &book);
        Ok(book)
    }

    fn checkout(&self, id: &str) -> Result<Book> {
        self.update(id, Change::CheckedOut, take_copy)
    }

    fn return_book(&self, id: &str) -> Result<Book> {
        let options = self.options;
        self.update(id, Change::Returned, |book| put_copy(book, &options))
    }

    fn len(&self) -> Result<usize> {
        Ok(self.read()?.books.len())
    }
}
