//! Concurrent checkout drill

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use shelf_core::{InventoryError, InventoryOptions, NewBook, StoreKind};

const DRILL_ID: &str = "drill";

/// Race `borrowers` checkouts against a record holding `copies`
///
/// Fails if more checkouts succeed than there were copies, or if the final
/// quantity does not account for every success.
pub fn drill(copies: u32, borrowers: usize, store: StoreKind, jobs: usize) -> Result<()> {
    let inventory = store.build(InventoryOptions::default());
    inventory.create(NewBook::new(
        DRILL_ID,
        "Drill Copy",
        "Shelf",
        i64::from(copies),
    ))?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("Failed to build thread pool")?;

    tracing::info!(%store, copies, borrowers, jobs, "Starting drill");

    let results: Vec<_> = pool.install(|| {
        (0..borrowers)
            .into_par_iter()
            .map(|_| inventory.checkout(DRILL_ID))
            .collect::<Vec<_>>()
    });

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let unavailable = results
        .iter()
        .filter(|r| matches!(r, Err(InventoryError::Unavailable(_))))
        .count();
    let other_errors = results.len() - successes - unavailable;
    let remaining = inventory.get(DRILL_ID)?.quantity;

    println!("Drill complete ({} store):", store);
    println!("  Checked out: {}", successes);
    println!("  Unavailable: {}", unavailable);
    println!("  Remaining:   {}", remaining);

    if other_errors > 0 {
        bail!("{} checkouts failed unexpectedly", other_errors);
    }
    if successes > copies as usize {
        bail!("{} checkouts succeeded with only {} copies", successes, copies);
    }
    if u64::from(remaining) + successes as u64 != u64::from(copies) {
        bail!(
            "Lost update: {} remaining after {} of {} copies went out",
            remaining,
            successes,
            copies
        );
    }

    Ok(())
}
