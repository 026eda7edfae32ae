//! Data migrations.

use tracing::{info, warn};

use quickbuy_store::RecordStore;
use quickbuy_store::services::migrate_legacy_submissions;

/// Fold legacy sell-flow submissions into the canonical collection.
///
/// # Errors
///
/// Returns an error if the legacy key is not an array or a write fails.
pub fn legacy(store: &RecordStore) -> Result<(), Box<dyn std::error::Error>> {
    let report = migrate_legacy_submissions(store)?;

    if report.is_empty() {
        info!("No legacy submissions found");
        return Ok(());
    }

    info!("Migration complete!");
    info!("  Migrated: {}", report.migrated.len());
    for id in &report.migrated {
        info!("    - transaction {id}");
    }
    if !report.already_imported.is_empty() {
        info!(
            "  Already imported by an earlier run: {}",
            report.already_imported.len()
        );
    }
    if !report.skipped.is_empty() {
        warn!(
            "  Left in place: {} (fix them and run again)",
            report.skipped.len()
        );
        for entry in &report.skipped {
            warn!("    - entry {}: {}", entry.index, entry.reason);
        }
    }
    Ok(())
}
