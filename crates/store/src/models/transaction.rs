//! Trade-in transaction types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use quickbuy_core::{
    AgentId, DeviceCondition, DeviceType, Email, TransactionId, TransactionStatus, TransitionError,
};

/// A customer's device trade-in and its evaluation progress.
///
/// Customer and device details are snapshots taken at submission time; they
/// do not follow later edits to customer records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique transaction ID.
    pub id: TransactionId,
    pub customer_name: String,
    pub customer_email: Email,
    pub customer_phone: String,
    pub device_type: DeviceType,
    pub brand: String,
    pub model: String,
    pub condition: DeviceCondition,
    /// Free-text description from the customer.
    #[serde(default)]
    pub description: String,
    /// Current workflow position.
    pub status: TransactionStatus,
    /// Estimated value; the customer's estimate until an agent assesses it.
    #[serde(alias = "amount")]
    pub estimated_value: Decimal,
    /// Amount offered to the customer, once an offer is made.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offered_amount: Option<Decimal>,
    /// Date the customer submitted the device.
    pub submitted_date: NaiveDate,
    /// Assigned agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<AgentId>,
    /// Name of the assigned agent at assignment time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    /// When the customer was paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    /// Accepted status changes, oldest first.
    #[serde(default)]
    pub history: Vec<StatusChange>,
    /// Identity of the legacy submission this was imported from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_source: Option<String>,
}

/// One accepted status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub from: TransactionStatus,
    pub to: TransactionStatus,
    pub at: DateTime<Utc>,
}

impl Transaction {
    /// Move to `target` if it is the next status, recording the change.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] and leaves the transaction untouched if
    /// `target` is not the immediate successor of the current status.
    pub fn advance_to(
        &mut self,
        target: TransactionStatus,
        at: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        let from = self.status;
        self.status = from.transition_to(target)?;
        self.history.push(StatusChange {
            from,
            to: target,
            at,
        });
        Ok(())
    }

    /// Completed steps out of the whole workflow, as a whole percentage.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        let last = TransactionStatus::ALL.len() - 1;
        let percent = self.status.position() * 100 / last;
        u8::try_from(percent).unwrap_or(100)
    }
}

/// Input from the sell form.
#[derive(Debug, Clone)]
pub struct SellSubmission {
    pub customer_name: String,
    pub customer_email: Email,
    pub customer_phone: String,
    pub device_type: DeviceType,
    pub brand: String,
    pub model: String,
    pub condition: DeviceCondition,
    pub description: String,
    /// The customer's own estimate.
    pub estimated_value: Decimal,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction {
            id: TransactionId::new(1),
            customer_name: "Ada Lovelace".to_owned(),
            customer_email: Email::parse("ada@example.com").unwrap(),
            customer_phone: "555-0100".to_owned(),
            device_type: DeviceType::Tablet,
            brand: "Apple".to_owned(),
            model: "iPad Air".to_owned(),
            condition: DeviceCondition::Good,
            description: String::new(),
            status: TransactionStatus::AwaitingConfirmation,
            estimated_value: Decimal::new(300, 0),
            offered_amount: None,
            submitted_date: NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
            agent_id: None,
            agent_name: None,
            legacy_source: None,
            paid_at: None,
            history: Vec::new(),
        }
    }

    #[test]
    fn test_advance_records_history() {
        let mut tx = sample();
        let at = Utc::now();
        tx.advance_to(TransactionStatus::Confirmed, at).unwrap();
        assert_eq!(tx.status, TransactionStatus::Confirmed);
        assert_eq!(
            tx.history,
            vec![StatusChange {
                from: TransactionStatus::AwaitingConfirmation,
                to: TransactionStatus::Confirmed,
                at,
            }]
        );
    }

    #[test]
    fn test_rejected_advance_leaves_state() {
        let mut tx = sample();
        assert!(tx.advance_to(TransactionStatus::Paid, Utc::now()).is_err());
        assert_eq!(tx.status, TransactionStatus::AwaitingConfirmation);
        assert!(tx.history.is_empty());
    }

    #[test]
    fn test_progress_percent() {
        let mut tx = sample();
        assert_eq!(tx.progress_percent(), 0);
        tx.status = TransactionStatus::AwaitingOffer;
        assert_eq!(tx.progress_percent(), 57);
        tx.status = TransactionStatus::Paid;
        assert_eq!(tx.progress_percent(), 100);
    }

    #[test]
    fn test_wire_format_uses_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["customerName"], "Ada Lovelace");
        assert_eq!(json["status"], "Awaiting Confirmation");
        assert_eq!(json["submittedDate"], "2024-04-02");
        assert!(json.get("offeredAmount").is_none());
    }

    #[test]
    fn test_amount_alias_accepted() {
        let mut json = serde_json::to_value(sample()).unwrap();
        let obj = json.as_object_mut().unwrap();
        let value = obj.remove("estimatedValue").unwrap();
        obj.insert("amount".to_owned(), value);
        let tx: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(tx.estimated_value, Decimal::new(300, 0));
    }
}
