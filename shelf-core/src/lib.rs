//! Shelf Core Library
//!
//! This crate provides the book record types and the concurrency-safe
//! inventory store behind the Shelf library service. The store owns every
//! record; callers only ever see copies.

pub mod book;
pub mod catalog;
pub mod error;
pub mod inventory;

pub use book::{Book, NewBook};
pub use catalog::Catalog;
pub use error::{CatalogError, InventoryError, Result};
pub use inventory::{
    Change, CommitListener, Inventory, InventoryOptions, LockedInventory, ShardedInventory,
    StoreKind,
};
