//! Seed catalogs
//!
//! A catalog is the list of records an inventory starts with. It is read
//! once at startup and never written back.

use crate::book::NewBook;
use crate::error::CatalogError;
use crate::inventory::Inventory;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ordered list of records to seed an inventory with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub books: Vec<NewBook>,
}

impl Default for Catalog {
    /// The three classics the service ships with
    fn default() -> Self {
        Self {
            books: vec![
                NewBook::new("1", "In Search of Lost Time", "Marcel Proust", 2),
                NewBook::new("2", "The Great Gatsby", "F. Scott Fitzgerald", 5),
                NewBook::new("3", "War and Peace", "Leo Tolstoy", 6),
            ],
        }
    }
}

impl Catalog {
    /// Parse a JSON array of records
    pub fn from_json(data: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(data)?)
    }

    /// Load a catalog from a JSON file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Create every record in order, stopping at the first rejection
    ///
    /// Entries go through `Inventory::create`, so duplicates and invalid
    /// fields are refused exactly as they would be for a client.
    pub fn seed_into(&self, inventory: &dyn Inventory) -> Result<usize, CatalogError> {
        for (index, book) in self.books.iter().enumerate() {
            inventory
                .create(book.clone())
                .map_err(|source| CatalogError::Rejected { index, source })?;
        }
        Ok(self.books.len())
    }
}
