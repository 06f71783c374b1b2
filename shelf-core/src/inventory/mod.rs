//! Inventory store abstraction
//!
//! An inventory exclusively owns its book records. Every read hands back a
//! copy, and every mutation happens inside the backend's own critical
//! section, so operations on the same id are linearizable: a concurrent
//! checkout and return land in some definite order and no update is lost.
//!
//! A [`CommitListener`] attached to a backend is called inside that same
//! critical section, so it observes each id's changes in commit order.

mod locked;
mod sharded;

pub use locked::LockedInventory;
pub use sharded::ShardedInventory;

use crate::book::{Book, NewBook};
use crate::error::{InventoryError, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Kind of committed mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Created,
    CheckedOut,
    Returned,
}

/// Receives every committed mutation while the record is still locked
///
/// Implementations must not block and must not call back into the
/// inventory.
pub trait CommitListener: Send + Sync + fmt::Debug {
    fn on_commit(&self, change: Change, book: &Book);
}

/// Operations every inventory backend provides
pub trait Inventory: Send + Sync {
    /// Snapshot of all records in insertion order
    ///
    /// Record membership is consistent: a record never appears without every
    /// record created before it. Quantities of different ids may come from
    /// different moments, since operations on different ids are unordered.
    fn list_all(&self) -> Result<Vec<Book>>;

    /// Copy of the record with the given id
    fn get(&self, id: &str) -> Result<Book>;

    /// Register a new record
    ///
    /// Fails with `DuplicateId` if the id is taken, leaving the existing
    /// record untouched.
    fn create(&self, book: NewBook) -> Result<Book>;

    /// Take one copy out, failing with `Unavailable` when none are left
    fn checkout(&self, id: &str) -> Result<Book>;

    /// Put one copy back
    fn return_book(&self, id: &str) -> Result<Book>;

    /// Number of records held
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Tunables shared by all backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventoryOptions {
    /// Upper bound on any record's quantity; `None` means `u32::MAX`
    pub max_quantity: Option<u32>,
}

impl InventoryOptions {
    pub fn with_max_quantity(max_quantity: u32) -> Self {
        Self {
            max_quantity: Some(max_quantity),
        }
    }

    fn ceiling(&self) -> u32 {
        self.max_quantity.unwrap_or(u32::MAX)
    }
}

/// Available backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreKind {
    /// One reader-writer lock over the whole collection
    #[default]
    Locked,
    /// Lock striping by id hash
    Sharded,
}

impl StoreKind {
    /// Build an empty inventory of this kind
    pub fn build(self, options: InventoryOptions) -> Arc<dyn Inventory> {
        match self {
            StoreKind::Locked => Arc::new(LockedInventory::with_options(options)),
            StoreKind::Sharded => Arc::new(ShardedInventory::with_options(options)),
        }
    }

    /// Build an empty inventory that reports commits to `listener`
    pub fn build_with_listener(
        self,
        options: InventoryOptions,
        listener: Arc<dyn CommitListener>,
    ) -> Arc<dyn Inventory> {
        match self {
            StoreKind::Locked => Arc::new(
                LockedInventory::with_options(options).with_listener(listener),
            ),
            StoreKind::Sharded => Arc::new(
                ShardedInventory::with_options(options).with_listener(listener),
            ),
        }
    }
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "locked" => Ok(StoreKind::Locked),
            "sharded" => Ok(StoreKind::Sharded),
            other => Err(format!(
                "unknown store kind '{}', expected 'locked' or 'sharded'",
                other
            )),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Locked => f.write_str("locked"),
            StoreKind::Sharded => f.write_str("sharded"),
        }
    }
}

/// Decrement in place; the caller must hold exclusive access to `book`
fn take_copy(book: &mut Book) -> Result<()> {
    if book.quantity == 0 {
        return Err(InventoryError::Unavailable(book.id.clone()));
    }
    book.quantity -= 1;
    Ok(())
}

/// Increment in place; the caller must hold exclusive access to `book`
fn put_copy(book: &mut Book, options: &InventoryOptions) -> Result<()> {
    match book.quantity.checked_add(1) {
        Some(next) if next <= options.ceiling() => {
            book.quantity = next;
            Ok(())
        }
        _ => Err(InventoryError::CapacityExceeded(book.id.clone())),
    }
}
