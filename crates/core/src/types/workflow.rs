//! Trade-in transaction status and its transition table.
//!
//! A transaction moves strictly forward, one step at a time:
//!
//! ```text
//! Awaiting Confirmation -> Confirmed -> Assigned to Agent -> Device Assessed
//!   -> Awaiting Offer -> Offer Made -> Awaiting Payment -> Paid
//! ```
//!
//! `Paid` is terminal. Any other requested move is a [`TransitionError`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Position of a trade-in submission in the evaluation workflow.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum TransactionStatus {
    #[default]
    #[serde(rename = "Awaiting Confirmation")]
    AwaitingConfirmation,
    #[serde(rename = "Confirmed")]
    Confirmed,
    #[serde(rename = "Assigned to Agent")]
    AssignedToAgent,
    #[serde(rename = "Device Assessed")]
    DeviceAssessed,
    #[serde(rename = "Awaiting Offer")]
    AwaitingOffer,
    #[serde(rename = "Offer Made")]
    OfferMade,
    #[serde(rename = "Awaiting Payment")]
    AwaitingPayment,
    #[serde(rename = "Paid")]
    Paid,
}

/// Rejected status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move transaction from '{from}' to '{to}'")]
pub struct TransitionError {
    /// Status the transaction was in.
    pub from: TransactionStatus,
    /// Status that was requested.
    pub to: TransactionStatus,
}

impl TransactionStatus {
    /// Every status in workflow order.
    pub const ALL: [Self; 8] = [
        Self::AwaitingConfirmation,
        Self::Confirmed,
        Self::AssignedToAgent,
        Self::DeviceAssessed,
        Self::AwaitingOffer,
        Self::OfferMade,
        Self::AwaitingPayment,
        Self::Paid,
    ];

    /// Zero-based position in the workflow.
    #[must_use]
    pub const fn position(self) -> usize {
        self as usize
    }

    /// The only status this one may move to, or `None` once paid.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::AwaitingConfirmation => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::AssignedToAgent),
            Self::AssignedToAgent => Some(Self::DeviceAssessed),
            Self::DeviceAssessed => Some(Self::AwaitingOffer),
            Self::AwaitingOffer => Some(Self::OfferMade),
            Self::OfferMade => Some(Self::AwaitingPayment),
            Self::AwaitingPayment => Some(Self::Paid),
            Self::Paid => None,
        }
    }

    /// Returns `true` if the workflow is finished.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Paid)
    }

    /// Whether `target` is the immediate successor of `self`.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }

    /// Validate a move to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] unless `target` is the immediate successor.
    pub fn transition_to(self, target: Self) -> Result<Self, TransitionError> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(TransitionError {
                from: self,
                to: target,
            })
        }
    }

    /// Display label, identical to the persisted form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AwaitingConfirmation => "Awaiting Confirmation",
            Self::Confirmed => "Confirmed",
            Self::AssignedToAgent => "Assigned to Agent",
            Self::DeviceAssessed => "Device Assessed",
            Self::AwaitingOffer => "Awaiting Offer",
            Self::OfferMade => "Offer Made",
            Self::AwaitingPayment => "Awaiting Payment",
            Self::Paid => "Paid",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        Self::ALL
            .into_iter()
            .find(|status| status.label().to_ascii_lowercase() == wanted)
            .ok_or_else(|| format!("invalid transaction status: {s}"))
    }
}
