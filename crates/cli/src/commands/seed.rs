//! Write the demo collections.

use tracing::info;

use quickbuy_store::RecordStore;
use quickbuy_store::db::seed_all;

/// Seed the record collections.
///
/// Without `force` collections that already hold data are left alone.
///
/// # Errors
///
/// Returns an error if a collection cannot be written.
pub fn run(store: &RecordStore, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let report = seed_all(store, force)?;

    info!("Seeding complete!");
    info!("  Seeded: {}", join_or_none(&report.seeded));
    info!("  Skipped (already hold data): {}", join_or_none(&report.skipped));
    if !report.skipped.is_empty() && !force {
        info!("  Use --force to overwrite them");
    }
    Ok(())
}

fn join_or_none(keys: &[&str]) -> String {
    if keys.is_empty() {
        "none".to_owned()
    } else {
        keys.join(", ")
    }
}
