//! Agent domain types.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use quickbuy_core::{AccountStatus, AgentId, AgentRole, Email};

/// A staff member who assesses trade-in devices and makes offers.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Unique agent ID.
    pub id: AgentId,
    /// Display name.
    pub name: String,
    /// Login name.
    pub username: String,
    /// Argon2 PHC string. Never the plain password.
    pub password_hash: String,
    /// Contact email.
    pub email: Email,
    /// Contact phone number.
    pub phone: String,
    /// Staff role.
    pub role: AgentRole,
    /// Whether the agent may log in and receive assignments.
    pub status: AccountStatus,
    /// Trade-ins ever assigned to this agent.
    #[serde(default)]
    pub assigned_devices: u32,
    /// Assessments this agent has recorded.
    #[serde(default)]
    pub completed_assessments: u32,
    /// Date the agent joined.
    pub join_date: NaiveDate,
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("role", &self.role)
            .field("status", &self.status)
            .field("assigned_devices", &self.assigned_devices)
            .field("completed_assessments", &self.completed_assessments)
            .field("join_date", &self.join_date)
            .finish()
    }
}

/// Input for registering an agent. The password is hashed before storage.
#[derive(Clone)]
pub struct NewAgent {
    pub name: String,
    pub username: String,
    pub password: String,
    pub email: Email,
    pub phone: String,
    pub role: AgentRole,
}

impl fmt::Debug for NewAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAgent")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("role", &self.role)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let agent = Agent {
            id: AgentId::new(7),
            name: "Priya Nair".to_owned(),
            username: "priya.nair".to_owned(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_owned(),
            email: Email::parse("priya@quickbuy.com").unwrap(),
            phone: String::new(),
            role: AgentRole::RepairTechnician,
            status: AccountStatus::Active,
            assigned_devices: 0,
            completed_assessments: 0,
            join_date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
        };
        let shown = format!("{agent:?}");
        assert!(shown.contains("priya.nair"));
        assert!(shown.contains("[REDACTED]"));
        assert!(!shown.contains("argon2"));

        let input = NewAgent {
            name: agent.name,
            username: agent.username,
            password: "hunter2hunter2".to_owned(),
            email: agent.email,
            phone: agent.phone,
            role: agent.role,
        };
        assert!(!format!("{input:?}").contains("hunter2"));
    }
}
