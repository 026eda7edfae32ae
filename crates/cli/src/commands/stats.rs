//! Dashboard figures.

use tracing::info;

use quickbuy_store::RecordStore;
use quickbuy_store::services::DashboardStats;

/// Print the admin dashboard figures.
///
/// # Errors
///
/// Returns an error if a collection cannot be loaded.
pub fn show(store: &RecordStore) -> Result<(), Box<dyn std::error::Error>> {
    let stats = DashboardStats::collect(store)?;

    info!("Quickbuy Statistics");
    info!("===================");
    info!("Agents: {} ({} active)", stats.agents, stats.active_agents);
    info!(
        "Customers: {} ({} active)",
        stats.customers, stats.active_customers
    );
    info!(
        "Devices: {} ({} in stock, ${:.2} listed)",
        stats.devices, stats.devices_in_stock, stats.inventory_value
    );
    info!(
        "Transactions: {} ({} open)",
        stats.transactions, stats.open_transactions
    );
    for (status, count) in &stats.by_status {
        info!("  {status}: {count}");
    }
    info!("Total paid out: ${:.2}", stats.total_paid_out);
    Ok(())
}
