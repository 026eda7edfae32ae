//! Agent collection.

use quickbuy_core::{AccountStatus, AgentId, AgentRole};

use super::{Record, Repository, RepositoryError, keys, seed_date, seed_email};
use crate::models::Agent;

/// Argon2id hash of the demo password `password123`.
const SARAH_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$aOKpQv3qIDQNS6VVuCrzyw$tdM7JrjW4WvjqPqJFJofpjiUI9TZ5WF2yoWyIc6aMvE";

/// Argon2id hash of the demo password `password456`.
const JAMES_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$fo/uTsqmuzw9xlgOeBc8aw$eqivmueU0J25ITUjWFA6j3Xy/bI5A6gaIZkJdrdD39E";

/// Repository for the agent collection.
pub type AgentRepository<'a> = Repository<'a, Agent>;

impl Record for Agent {
    type Id = AgentId;

    const KEY: &'static str = keys::AGENTS;
    const KIND: &'static str = "agent";

    fn id(&self) -> AgentId {
        self.id
    }

    fn set_id(&mut self, id: AgentId) {
        self.id = id;
    }

    fn seed() -> Result<Vec<Self>, RepositoryError> {
        Ok(vec![
            Self {
                id: AgentId::new(1),
                name: "Sarah Mitchell".to_owned(),
                username: "sarah.mitchell".to_owned(),
                password_hash: SARAH_PASSWORD_HASH.to_owned(),
                email: seed_email("sarah.mitchell@quickbuy.com")?,
                phone: "+1 (555) 123-4567".to_owned(),
                role: AgentRole::SeniorAgent,
                status: AccountStatus::Active,
                assigned_devices: 12,
                completed_assessments: 45,
                join_date: seed_date(2023, 6, 15)?,
            },
            Self {
                id: AgentId::new(2),
                name: "James Carter".to_owned(),
                username: "james.carter".to_owned(),
                password_hash: JAMES_PASSWORD_HASH.to_owned(),
                email: seed_email("james.carter@quickbuy.com")?,
                phone: "+1 (555) 987-6543".to_owned(),
                role: AgentRole::FieldAgent,
                status: AccountStatus::Active,
                assigned_devices: 8,
                completed_assessments: 30,
                join_date: seed_date(2023, 9, 1)?,
            },
        ])
    }

    fn validate(&self) -> Result<(), RepositoryError> {
        if self.name.trim().is_empty() {
            return Err(RepositoryError::invalid(Self::KIND, "name is required"));
        }
        if self.username.is_empty() || self.username.chars().any(char::is_whitespace) {
            return Err(RepositoryError::invalid(
                Self::KIND,
                "username must be non-empty and contain no whitespace",
            ));
        }
        if self.password_hash.is_empty() {
            return Err(RepositoryError::invalid(Self::KIND, "password hash is missing"));
        }
        Ok(())
    }
}

impl Repository<'_, Agent> {
    /// Find an agent by exact username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the collection cannot be loaded.
    pub fn find_by_username(&self, username: &str) -> Result<Option<Agent>, RepositoryError> {
        Ok(self.all()?.into_iter().find(|a| a.username == username))
    }

    /// Agents that may receive assignments.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the collection cannot be loaded.
    pub fn active(&self) -> Result<Vec<Agent>, RepositoryError> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|a| a.status.is_active())
            .collect())
    }

    /// Insert an agent, rejecting a username that is already taken.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a duplicate username.
    pub fn insert_unique(&self, agent: Agent) -> Result<Agent, RepositoryError> {
        if self.find_by_username(&agent.username)?.is_some() {
            return Err(RepositoryError::Conflict(format!(
                "username '{}' is already taken",
                agent.username
            )));
        }
        self.insert(agent)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::db::RecordStore;
    use crate::services::auth::verify_password;

    #[test]
    fn test_seed_hashes_passwords() {
        let agents = Agent::seed().unwrap();
        assert_eq!(agents.len(), 2);
        for agent in &agents {
            assert!(agent.password_hash.starts_with("$argon2"));
            assert!(!agent.password_hash.contains("password"));
        }
    }

    #[test]
    fn test_seed_hashes_match_demo_passwords() {
        verify_password("password123", SARAH_PASSWORD_HASH).unwrap();
        verify_password("password456", JAMES_PASSWORD_HASH).unwrap();
        assert!(verify_password("password456", SARAH_PASSWORD_HASH).is_err());
    }

    #[test]
    fn test_find_by_username() {
        let store = RecordStore::in_memory();
        let agents = AgentRepository::new(&store);
        let sarah = agents.find_by_username("sarah.mitchell").unwrap().unwrap();
        assert_eq!(sarah.name, "Sarah Mitchell");
        assert!(agents.find_by_username("Sarah.Mitchell").unwrap().is_none());
    }

    #[test]
    fn test_insert_unique_rejects_duplicate() {
        let store = RecordStore::in_memory();
        let agents = AgentRepository::new(&store);
        let mut copy = agents.require(AgentId::new(2)).unwrap();
        copy.name = "Another James".to_owned();
        assert!(matches!(
            agents.insert_unique(copy),
            Err(RepositoryError::Conflict(_))
        ));
    }

    #[test]
    fn test_active_excludes_inactive() {
        let store = RecordStore::in_memory();
        let agents = AgentRepository::new(&store);
        let _: Agent = agents
            .update_with(AgentId::new(2), |a| {
                a.status = AccountStatus::Inactive;
                Ok::<(), RepositoryError>(())
            })
            .unwrap();
        let active = agents.active().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, AgentId::new(1));
    }

    #[test]
    fn test_validate_rejects_blank_username() {
        let mut agent = Agent::seed().unwrap().remove(0);
        agent.username = "two words".to_owned();
        assert!(agent.validate().is_err());
    }
}
