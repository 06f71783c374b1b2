//! Book records and the creation payload

use crate::error::{InventoryError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One catalog entry as held by an inventory
///
/// Only `quantity` ever changes after creation. Callers always receive a
/// copy, so holding a `Book` never pins or aliases store state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Opaque unique identifier
    pub id: String,

    pub title: String,

    pub author: String,

    /// Copies currently available for checkout
    pub quantity: u32,
}

/// Payload for creating a book
///
/// `quantity` is signed so a negative count decodes and is then rejected as
/// invalid input instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    /// Identifier to register; a UUID is assigned when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub title: String,

    pub author: String,

    pub quantity: i64,
}

impl NewBook {
    /// Create a payload with an explicit id
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        quantity: i64,
    ) -> Self {
        Self {
            id: Some(id.into()),
            title: title.into(),
            author: author.into(),
            quantity,
        }
    }

    /// Create a payload whose id is assigned by the inventory
    pub fn untagged(title: impl Into<String>, author: impl Into<String>, quantity: i64) -> Self {
        Self {
            id: None,
            title: title.into(),
            author: author.into(),
            quantity,
        }
    }

    /// Validate the payload and turn it into a record
    ///
    /// `max_quantity` is the ceiling configured on the target inventory.
    pub fn into_book(self, max_quantity: Option<u32>) -> Result<Book> {
        let id = match self.id {
            Some(id) if id.trim().is_empty() => {
                return Err(InventoryError::InvalidInput("id must not be blank".into()))
            }
            Some(id) => id,
            None => Uuid::new_v4().to_string(),
        };

        if self.title.trim().is_empty() {
            return Err(InventoryError::InvalidInput("title must not be empty".into()));
        }
        if self.author.trim().is_empty() {
            return Err(InventoryError::InvalidInput(
                "author must not be empty".into(),
            ));
        }

        let quantity = u32::try_from(self.quantity).map_err(|_| {
            InventoryError::InvalidInput(format!(
                "quantity must be between 0 and {}, got {}",
                u32::MAX,
                self.quantity
            ))
        })?;
        if let Some(max) = max_quantity {
            if quantity > max {
                return Err(InventoryError::InvalidInput(format!(
                    "quantity {} exceeds the ceiling of {}",
                    quantity, max
                )));
            }
        }

        Ok(Book {
            id,
            title: self.title,
            author: self.author,
            quantity,
        })
    }
}
