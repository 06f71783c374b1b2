//! Application state

use crate::config::ServerConfig;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use shelf_core::{
    Book, Catalog, Change, CommitListener, Inventory, InventoryOptions, StoreKind,
};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Events buffered per subscriber before it starts lagging
const EVENT_CAPACITY: usize = 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Authoritative book records
    pub inventory: Arc<dyn Inventory>,

    /// Channel for SSE events
    pub event_tx: broadcast::Sender<ServerEvent>,
}

/// Server-sent events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// A book was added to the inventory
    BookCreated { book: Book, at: DateTime<Utc> },

    /// A copy was checked out
    BookCheckedOut {
        id: String,
        quantity: u32,
        at: DateTime<Utc>,
    },

    /// A copy was returned
    BookReturned {
        id: String,
        quantity: u32,
        at: DateTime<Utc>,
    },
}

/// Turns inventory commits into server events
///
/// Runs inside the inventory's critical section, so events for one id are
/// sent in the order the mutations committed.
#[derive(Debug)]
pub struct EventPublisher {
    tx: broadcast::Sender<ServerEvent>,
}

impl CommitListener for EventPublisher {
    fn on_commit(&self, change: Change, book: &Book) {
        let at = Utc::now();
        let event = match change {
            Change::Created => ServerEvent::BookCreated {
                book: book.clone(),
                at,
            },
            Change::CheckedOut => ServerEvent::BookCheckedOut {
                id: book.id.clone(),
                quantity: book.quantity,
                at,
            },
            Change::Returned => ServerEvent::BookReturned {
                id: book.id.clone(),
                quantity: book.quantity,
                at,
            },
        };
        // Ignore errors (no subscribers)
        let _ = self.tx.send(event);
    }
}

impl AppState {
    /// Build an empty inventory whose commits are published as events
    pub fn build(kind: StoreKind, options: InventoryOptions) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
        let publisher = EventPublisher {
            tx: event_tx.clone(),
        };
        Self {
            inventory: kind.build_with_listener(options, Arc::new(publisher)),
            event_tx,
        }
    }

    /// Build the configured backend and seed it
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let catalog = match &config.seed_path {
            Some(path) => Catalog::load(path)
                .with_context(|| format!("Failed to load catalog {}", path.display()))?,
            None => Catalog::default(),
        };

        let state = Self::build(config.store, config.options);
        let seeded = catalog
            .seed_into(state.inventory.as_ref())
            .context("Failed to seed inventory")?;
        tracing::info!(store = %config.store, seeded, "Inventory ready");

        Ok(state)
    }

    /// Subscribe to server events
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.event_tx.subscribe()
    }
}
