//! Customer collection.

use quickbuy_core::{AccountStatus, CustomerId, Email};

use super::{Record, Repository, RepositoryError, keys, seed_date, seed_email};
use crate::models::Customer;

/// Repository for the customer collection.
pub type CustomerRepository<'a> = Repository<'a, Customer>;

impl Record for Customer {
    type Id = CustomerId;

    const KEY: &'static str = keys::CUSTOMERS;
    const KIND: &'static str = "customer";

    fn id(&self) -> CustomerId {
        self.id
    }

    fn set_id(&mut self, id: CustomerId) {
        self.id = id;
    }

    fn seed() -> Result<Vec<Self>, RepositoryError> {
        Ok(vec![Self {
            id: CustomerId::new(1),
            name: "John Doe".to_owned(),
            email: seed_email("john.doe@example.com")?,
            phone: "+1 (555) 234-5678".to_owned(),
            status: AccountStatus::Active,
            total_purchases: 3,
            total_sales: 2,
            join_date: seed_date(2024, 1, 10)?,
            last_activity: seed_date(2024, 3, 20)?,
        }])
    }

    fn validate(&self) -> Result<(), RepositoryError> {
        if self.name.trim().is_empty() {
            return Err(RepositoryError::invalid(Self::KIND, "name is required"));
        }
        if self.last_activity < self.join_date {
            return Err(RepositoryError::invalid(
                Self::KIND,
                "last activity precedes join date",
            ));
        }
        Ok(())
    }
}

impl Repository<'_, Customer> {
    /// Find a customer by email, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the collection cannot be loaded.
    pub fn find_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError> {
        Ok(self
            .all()?
            .into_iter()
            .find(|c| c.email.matches(email.as_str())))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::db::RecordStore;

    #[test]
    fn test_find_by_email_ignores_case() {
        let store = RecordStore::in_memory();
        let customers = CustomerRepository::new(&store);
        let email = Email::parse("JOHN.DOE@example.com").unwrap();
        let found = customers.find_by_email(&email).unwrap().unwrap();
        assert_eq!(found.id, CustomerId::new(1));
    }

    #[test]
    fn test_validate_dates() {
        let mut customer = Customer::seed().unwrap().remove(0);
        customer.last_activity = seed_date(2023, 1, 1).unwrap();
        assert!(matches!(
            customer.validate(),
            Err(RepositoryError::Invalid { kind: "customer", .. })
        ));
    }
}
