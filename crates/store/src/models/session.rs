//! Session-related types.
//!
//! Single objects stored under the session keys in
//! [`crate::db::session::keys`].

use serde::{Deserialize, Serialize};

use quickbuy_core::{AgentId, AgentRole, CustomerId, Email};

use super::{Agent, Customer};

/// Session-stored customer identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCustomer {
    pub id: CustomerId,
    pub name: String,
    pub email: Email,
}

impl From<&Customer> for SessionCustomer {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name.clone(),
            email: customer.email.clone(),
        }
    }
}

/// Session-stored agent identity. Carries no credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAgent {
    pub id: AgentId,
    pub name: String,
    pub username: String,
    pub role: AgentRole,
}

impl From<&Agent> for SessionAgent {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            name: agent.name.clone(),
            username: agent.username.clone(),
            role: agent.role,
        }
    }
}

/// How a customer wants to be paid for a trade-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    BankTransfer,
    Paypal,
    StoreCredit,
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "bank_transfer" | "bank" => Ok(Self::BankTransfer),
            "paypal" => Ok(Self::Paypal),
            "store_credit" => Ok(Self::StoreCredit),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// Payout details entered at checkout of a trade-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub method: PaymentMethod,
    pub account_name: String,
    /// Account number, IBAN or `PayPal` address depending on `method`.
    pub account_reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
}

impl PaymentDetails {
    /// Account reference with all but the last four characters masked.
    #[must_use]
    pub fn masked_reference(&self) -> String {
        let chars: Vec<char> = self.account_reference.chars().collect();
        let keep = chars.len().min(4);
        let hidden = chars.len() - keep;
        let tail: String = chars.iter().skip(hidden).collect();
        format!("{}{tail}", "*".repeat(hidden))
    }
}

/// Admin profile shown in the admin settings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub phone: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_reference() {
        let details = PaymentDetails {
            method: PaymentMethod::BankTransfer,
            account_name: "Ada Lovelace".to_owned(),
            account_reference: "GB29NWBK60161331926819".to_owned(),
            bank_name: Some("NatWest".to_owned()),
        };
        assert_eq!(details.masked_reference(), "******************6819");
    }

    #[test]
    fn test_masked_reference_short() {
        let details = PaymentDetails {
            method: PaymentMethod::Paypal,
            account_name: String::new(),
            account_reference: "abc".to_owned(),
            bank_name: None,
        };
        assert_eq!(details.masked_reference(), "abc");
    }

    #[test]
    fn test_payment_method_from_str() {
        assert_eq!("bank".parse::<PaymentMethod>(), Ok(PaymentMethod::BankTransfer));
        assert_eq!("Store Credit".parse::<PaymentMethod>(), Ok(PaymentMethod::StoreCredit));
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }
}
