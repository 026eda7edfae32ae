//! Customer domain types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use quickbuy_core::{AccountStatus, CustomerId, Email};

/// A marketplace customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: Email,
    /// Contact phone number.
    pub phone: String,
    /// Account status.
    pub status: AccountStatus,
    /// Devices bought from the catalog.
    #[serde(default)]
    pub total_purchases: u32,
    /// Trade-ins paid out to this customer.
    #[serde(default)]
    pub total_sales: u32,
    /// Date the customer signed up.
    pub join_date: NaiveDate,
    /// Date of the customer's most recent activity.
    pub last_activity: NaiveDate,
}
