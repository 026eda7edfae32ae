//! Customer management commands.

use chrono::Utc;
use tracing::info;

use quickbuy_core::{AccountStatus, CustomerId, Email};
use quickbuy_store::RecordStore;
use quickbuy_store::db::CustomerRepository;
use quickbuy_store::models::Customer;

use super::CommandError;

/// List customers.
///
/// # Errors
///
/// Returns an error if the collection cannot be loaded.
pub fn list(store: &RecordStore) -> Result<(), Box<dyn std::error::Error>> {
    let customers = CustomerRepository::new(store).all()?;

    info!("{} customer(s)", customers.len());
    for c in &customers {
        info!(
            "  #{} {} <{}> - {}, {} bought, {} sold, last active {}",
            c.id, c.name, c.email, c.status, c.total_purchases, c.total_sales, c.last_activity
        );
    }
    Ok(())
}

/// Add a customer.
///
/// # Errors
///
/// Returns an error if a customer with this email exists or the write fails.
pub fn add(
    store: &RecordStore,
    name: &str,
    email: Email,
    phone: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let customers = CustomerRepository::new(store);
    if let Some(existing) = customers.find_by_email(&email)? {
        return Err(CommandError::DuplicateEmail {
            id: existing.id,
            email,
        }
        .into());
    }

    let today = Utc::now().date_naive();
    let customer = customers.insert(Customer {
        id: CustomerId::new(0),
        name: name.trim().to_owned(),
        email,
        phone: phone.to_owned(),
        status: AccountStatus::Active,
        total_purchases: 0,
        total_sales: 0,
        join_date: today,
        last_activity: today,
    })?;

    info!("Customer created successfully! ID: {}, Email: {}", customer.id, customer.email);
    Ok(())
}

/// Remove a customer. Their past transactions keep their snapshot.
///
/// # Errors
///
/// Returns an error if the customer does not exist.
pub fn remove(store: &RecordStore, id: CustomerId) -> Result<(), Box<dyn std::error::Error>> {
    let removed = CustomerRepository::new(store).delete(id)?;
    info!("Removed customer #{} ({})", removed.id, removed.email);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_add_rejects_duplicate_email() {
        let store = RecordStore::in_memory();
        let existing = CustomerRepository::new(&store).all().unwrap().remove(0);
        let shouted = Email::parse(&existing.email.as_str().to_ascii_uppercase()).unwrap();

        let err = add(&store, "Someone Else", shouted, "").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CommandError>(),
            Some(CommandError::DuplicateEmail { id, .. }) if *id == existing.id
        ));
        assert_eq!(CustomerRepository::new(&store).count().unwrap(), 1);

        add(
            &store,
            "Dana White",
            Email::parse("dana.white@example.com").unwrap(),
            "555-0142",
        )
        .unwrap();
        assert_eq!(CustomerRepository::new(&store).count().unwrap(), 2);
    }
}
