//! Validate command implementation

use anyhow::{bail, Context, Result};
use shelf_core::{Catalog, Inventory, LockedInventory};
use std::path::Path;

/// Validate a seed catalog
///
/// The catalog is seeded into a scratch inventory, so it is held to the same
/// rules as records created over HTTP. Strict mode also requires every entry
/// to carry an explicit id.
pub fn validate(input: &str, strict: bool) -> Result<()> {
    let catalog = Catalog::load(Path::new(input))
        .with_context(|| format!("Failed to read catalog {}", input))?;

    if strict {
        let untagged: Vec<usize> = catalog
            .books
            .iter()
            .enumerate()
            .filter(|(_, book)| book.id.is_none())
            .map(|(index, _)| index)
            .collect();
        if !untagged.is_empty() {
            eprintln!("Entries without an id: {:?}", untagged);
            bail!("Validation failed for {}", input);
        }
    }

    let inventory = LockedInventory::new();
    match catalog.seed_into(&inventory) {
        Ok(count) => {
            println!("Valid catalog");
            println!("  Books:  {}", count);
            let copies: u64 = inventory
                .list_all()?
                .iter()
                .map(|b| u64::from(b.quantity))
                .sum();
            println!("  Copies: {}", copies);
            Ok(())
        }
        Err(e) => {
            eprintln!("Invalid catalog: {}", e);
            bail!("Validation failed for {}", input);
        }
    }
}
