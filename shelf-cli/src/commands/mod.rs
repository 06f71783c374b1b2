//! CLI command implementations

mod drill;
mod list;
mod validate;

pub use drill::drill;
pub use list::{list, show};
pub use validate::validate;

use anyhow::{Context, Result};
use shelf_core::{Catalog, Inventory, LockedInventory};
use std::path::Path;

/// Load a catalog file and seed a fresh inventory with it
fn load_inventory(catalog: &str) -> Result<LockedInventory> {
    let catalog = Catalog::load(Path::new(catalog))
        .with_context(|| format!("Failed to read catalog {}", catalog))?;

    let inventory = LockedInventory::new();
    catalog.seed_into(&inventory)?;
    tracing::debug!(books = inventory.len()?, "Catalog loaded");

    Ok(inventory)
}
