//! Account status and role enums for agents and customers.
//!
//! Serialized with the labels the Quickbuy pages display ("Active",
//! "Field Agent", ...). `FromStr` accepts the `snake_case` spelling used on
//! the command line as well as the label itself.

use serde::{Deserialize, Serialize};

/// Whether an agent or customer account is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}

impl AccountStatus {
    /// Returns `true` for [`AccountStatus::Active`].
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Inactive => write!(f, "Inactive"),
        }
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(format!("invalid account status: {s}")),
        }
    }
}

/// Staff role tag carried by an agent record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AgentRole {
    /// Collects and assesses trade-in devices.
    #[default]
    #[serde(rename = "Field Agent")]
    FieldAgent,
    /// Assesses devices and signs off on offers.
    #[serde(rename = "Senior Agent")]
    SeniorAgent,
    /// Handles repair jobs.
    #[serde(rename = "Repair Technician")]
    RepairTechnician,
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldAgent => write!(f, "Field Agent"),
            Self::SeniorAgent => write!(f, "Senior Agent"),
            Self::RepairTechnician => write!(f, "Repair Technician"),
        }
    }
}

impl std::str::FromStr for AgentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(' ', "_").as_str() {
            "field_agent" => Ok(Self::FieldAgent),
            "senior_agent" => Ok(Self::SeniorAgent),
            "repair_technician" => Ok(Self::RepairTechnician),
            _ => Err(format!("invalid agent role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_role_wire_label() {
        let json = serde_json::to_string(&AgentRole::SeniorAgent).unwrap();
        assert_eq!(json, "\"Senior Agent\"");
    }

    #[test]
    fn test_agent_role_from_str_accepts_both_spellings() {
        assert_eq!("field_agent".parse::<AgentRole>().unwrap(), AgentRole::FieldAgent);
        assert_eq!(
            "Repair Technician".parse::<AgentRole>().unwrap(),
            AgentRole::RepairTechnician
        );
        assert!("manager".parse::<AgentRole>().is_err());
    }

    #[test]
    fn test_account_status_roundtrip_label() {
        let status: AccountStatus = serde_json::from_str("\"Inactive\"").unwrap();
        assert_eq!(status, AccountStatus::Inactive);
        assert!(!status.is_active());
        assert_eq!("ACTIVE".parse::<AccountStatus>().unwrap(), AccountStatus::Active);
    }
}
