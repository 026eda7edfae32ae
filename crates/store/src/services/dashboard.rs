//! Admin dashboard figures.

use rust_decimal::Decimal;

use quickbuy_core::TransactionStatus;

use crate::db::{
    AgentRepository, CustomerRepository, DeviceRepository, RecordStore, RepositoryError,
    TransactionRepository,
};

/// Counts and totals shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub agents: usize,
    pub active_agents: usize,
    pub customers: usize,
    pub active_customers: usize,
    pub devices: usize,
    pub devices_in_stock: usize,
    /// Sum of listed prices of in-stock devices.
    pub inventory_value: Decimal,
    pub transactions: usize,
    /// Transactions per status, in workflow order, zeros included.
    pub by_status: Vec<(TransactionStatus, usize)>,
    /// Transactions not yet paid.
    pub open_transactions: usize,
    /// Sum of offered amounts over paid transactions.
    pub total_paid_out: Decimal,
}

impl DashboardStats {
    /// Gather the figures from every collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a collection cannot be loaded.
    pub fn collect(store: &RecordStore) -> Result<Self, RepositoryError> {
        let agents = AgentRepository::new(store).all()?;
        let customers = CustomerRepository::new(store).all()?;
        let devices = DeviceRepository::new(store).all()?;
        let transactions = TransactionRepository::new(store).all()?;

        let by_status = TransactionStatus::ALL
            .into_iter()
            .map(|status| {
                let count = transactions.iter().filter(|t| t.status == status).count();
                (status, count)
            })
            .collect();

        Ok(Self {
            agents: agents.len(),
            active_agents: agents.iter().filter(|a| a.status.is_active()).count(),
            customers: customers.len(),
            active_customers: customers.iter().filter(|c| c.status.is_active()).count(),
            devices: devices.len(),
            devices_in_stock: devices.iter().filter(|d| d.in_stock).count(),
            inventory_value: devices
                .iter()
                .filter(|d| d.in_stock)
                .map(|d| d.price)
                .sum(),
            transactions: transactions.len(),
            by_status,
            open_transactions: transactions
                .iter()
                .filter(|t| !t.status.is_terminal())
                .count(),
            total_paid_out: transactions
                .iter()
                .filter(|t| t.status == TransactionStatus::Paid)
                .filter_map(|t| t.offered_amount)
                .sum(),
        })
    }

    /// Number of transactions currently in `status`.
    #[must_use]
    pub fn count_in(&self, status: TransactionStatus) -> usize {
        self.by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map_or(0, |(_, n)| *n)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use quickbuy_core::TransactionId;

    use crate::services::WorkflowService;

    #[test]
    fn test_seed_stats() {
        let store = RecordStore::in_memory();
        let stats = DashboardStats::collect(&store).unwrap();
        assert_eq!(stats.agents, 2);
        assert_eq!(stats.active_agents, 2);
        assert_eq!(stats.customers, 1);
        assert_eq!(stats.devices, 1);
        assert_eq!(stats.devices_in_stock, 1);
        assert_eq!(stats.inventory_value, Decimal::new(750, 0));
        assert_eq!(stats.transactions, 2);
        assert_eq!(stats.open_transactions, 2);
        assert_eq!(stats.count_in(TransactionStatus::AwaitingConfirmation), 1);
        assert_eq!(stats.count_in(TransactionStatus::AssignedToAgent), 1);
        assert_eq!(stats.by_status.len(), 8);
        assert_eq!(stats.total_paid_out, Decimal::ZERO);
    }

    #[test]
    fn test_paid_out_counts_paid_only() {
        let store = RecordStore::in_memory();
        let workflow = WorkflowService::new(&store);
        let id = TransactionId::new(2);
        workflow.record_assessment(id, Decimal::new(580, 0)).unwrap();
        workflow.await_offer(id).unwrap();
        workflow.make_offer(id, Decimal::new(555, 0)).unwrap();
        workflow.accept_offer(id).unwrap();

        let before = DashboardStats::collect(&store).unwrap();
        assert_eq!(before.total_paid_out, Decimal::ZERO);

        workflow.mark_paid(id).unwrap();
        let after = DashboardStats::collect(&store).unwrap();
        assert_eq!(after.total_paid_out, Decimal::new(555, 0));
        assert_eq!(after.open_transactions, 1);
        assert_eq!(after.count_in(TransactionStatus::Paid), 1);
    }
}
