//! Trade-in transaction collection.

use rust_decimal::Decimal;

use quickbuy_core::{AgentId, DeviceCondition, DeviceType, TransactionId, TransactionStatus};

use super::{Record, Repository, RepositoryError, keys, seed_date, seed_email};
use crate::models::Transaction;

/// Repository for trade-in transactions.
pub type TransactionRepository<'a> = Repository<'a, Transaction>;

impl Record for Transaction {
    type Id = TransactionId;

    const KEY: &'static str = keys::TRANSACTIONS;
    const KIND: &'static str = "transaction";

    fn id(&self) -> TransactionId {
        self.id
    }

    fn set_id(&mut self, id: TransactionId) {
        self.id = id;
    }

    fn seed() -> Result<Vec<Self>, RepositoryError> {
        Ok(vec![
            Self {
                id: TransactionId::new(1),
                customer_name: "John Doe".to_owned(),
                customer_email: seed_email("john.doe@example.com")?,
                customer_phone: "+1 (555) 234-5678".to_owned(),
                device_type: DeviceType::Smartphone,
                brand: "Samsung".to_owned(),
                model: "Galaxy S21".to_owned(),
                condition: DeviceCondition::Good,
                description: "Minor scratches on the back, battery holds a full day".to_owned(),
                status: TransactionStatus::AwaitingConfirmation,
                estimated_value: Decimal::new(350, 0),
                offered_amount: None,
                submitted_date: seed_date(2024, 3, 18)?,
                agent_id: None,
                agent_name: None,
                paid_at: None,
                history: Vec::new(),
                legacy_source: None,
            },
            Self {
                id: TransactionId::new(2),
                customer_name: "Jane Smith".to_owned(),
                customer_email: seed_email("jane.smith@example.com")?,
                customer_phone: "+1 (555) 345-6789".to_owned(),
                device_type: DeviceType::Laptop,
                brand: "Apple".to_owned(),
                model: "MacBook Air M1".to_owned(),
                condition: DeviceCondition::Excellent,
                description: "Original box and charger included".to_owned(),
                status: TransactionStatus::AssignedToAgent,
                estimated_value: Decimal::new(600, 0),
                offered_amount: None,
                submitted_date: seed_date(2024, 3, 15)?,
                agent_id: Some(AgentId::new(1)),
                agent_name: Some("Sarah Mitchell".to_owned()),
                paid_at: None,
                history: Vec::new(),
                legacy_source: None,
            },
        ])
    }

    fn validate(&self) -> Result<(), RepositoryError> {
        if self.customer_name.trim().is_empty() {
            return Err(RepositoryError::invalid(Self::KIND, "customer name is required"));
        }
        if self.brand.trim().is_empty() || self.model.trim().is_empty() {
            return Err(RepositoryError::invalid(
                Self::KIND,
                "device brand and model are required",
            ));
        }
        if self.estimated_value < Decimal::ZERO {
            return Err(RepositoryError::invalid(
                Self::KIND,
                "estimated value cannot be negative",
            ));
        }
        if self.offered_amount.is_none() && self.status >= TransactionStatus::OfferMade {
            return Err(RepositoryError::invalid(
                Self::KIND,
                format!("status '{}' requires an offered amount", self.status),
            ));
        }
        Ok(())
    }
}

impl Repository<'_, Transaction> {
    /// Transactions currently in `status`, oldest submission first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the collection cannot be loaded.
    pub fn with_status(
        &self,
        status: TransactionStatus,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        let mut found: Vec<Transaction> = self
            .all()?
            .into_iter()
            .filter(|t| t.status == status)
            .collect();
        found.sort_by_key(|t| (t.submitted_date, t.id));
        Ok(found)
    }

    /// Transactions assigned to `agent_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the collection cannot be loaded.
    pub fn assigned_to(&self, agent_id: AgentId) -> Result<Vec<Transaction>, RepositoryError> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|t| t.agent_id == Some(agent_id))
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::db::RecordStore;

    #[test]
    fn test_seed_is_valid() {
        for tx in Transaction::seed().unwrap() {
            tx.validate().unwrap();
        }
    }

    #[test]
    fn test_with_status() {
        let store = RecordStore::in_memory();
        let transactions = TransactionRepository::new(&store);
        let awaiting = transactions
            .with_status(TransactionStatus::AwaitingConfirmation)
            .unwrap();
        assert_eq!(awaiting.len(), 1);
        assert_eq!(awaiting[0].model, "Galaxy S21");
        assert!(transactions.with_status(TransactionStatus::Paid).unwrap().is_empty());
    }

    #[test]
    fn test_assigned_to() {
        let store = RecordStore::in_memory();
        let transactions = TransactionRepository::new(&store);
        let assigned = transactions.assigned_to(AgentId::new(1)).unwrap();
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].id, TransactionId::new(2));
        assert!(transactions.assigned_to(AgentId::new(2)).unwrap().is_empty());
    }

    #[test]
    fn test_validate_requires_offer_once_made() {
        let mut tx = Transaction::seed().unwrap().remove(1);
        tx.status = TransactionStatus::OfferMade;
        assert!(tx.validate().is_err());
        tx.offered_amount = Some(Decimal::new(540, 0));
        tx.validate().unwrap();
    }
}
