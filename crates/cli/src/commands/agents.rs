//! Agent management commands.
//!
//! # Usage
//!
//! ```bash
//! qb agents list --active
//! qb agents add -n "Priya Shah" -u priya.shah -p 's3cure-passw0rd' -e priya@quickbuy.com -r senior_agent
//! qb agents set-status 2 inactive
//! qb agents login -u sarah.mitchell -p password123
//! ```

use tracing::{info, warn};

use quickbuy_core::{AccountStatus, AgentId, AgentRole, Email};
use quickbuy_store::db::{AgentRepository, TransactionRepository};
use quickbuy_store::models::{Agent, NewAgent};
use quickbuy_store::services::AuthService;
use quickbuy_store::{RecordStore, RepositoryError, StoreConfig};

use super::CommandError;

/// Arguments of `agents add`.
pub struct NewAgentInput {
    pub name: String,
    pub username: String,
    pub password: String,
    pub email: Email,
    pub phone: String,
    pub role: AgentRole,
}

/// List agents.
///
/// # Errors
///
/// Returns an error if the collection cannot be loaded.
pub fn list(store: &RecordStore, active_only: bool) -> Result<(), Box<dyn std::error::Error>> {
    let agents = AgentRepository::new(store);
    let agents = if active_only {
        agents.active()?
    } else {
        agents.all()?
    };

    info!("{} agent(s)", agents.len());
    for agent in &agents {
        info!(
            "  #{} {} ({}) - {}, {}, {} assigned, {} assessed, joined {}",
            agent.id,
            agent.name,
            agent.username,
            agent.role,
            agent.status,
            agent.assigned_devices,
            agent.completed_assessments,
            agent.join_date
        );
    }
    Ok(())
}

/// Register a new agent.
///
/// # Errors
///
/// Returns an error if the password is too short or the username is taken.
pub fn add(
    store: &RecordStore,
    config: &StoreConfig,
    input: NewAgentInput,
) -> Result<(), Box<dyn std::error::Error>> {
    let auth = AuthService::new(store, &config.admin);
    let agent = auth.register_agent(NewAgent {
        name: input.name,
        username: input.username,
        password: input.password,
        email: input.email,
        phone: input.phone,
        role: input.role,
    })?;

    info!(
        "Agent created successfully! ID: {}, Username: {}, Role: {}",
        agent.id, agent.username, agent.role
    );
    Ok(())
}

/// Remove an agent.
///
/// Refused while the agent still has unpaid transactions.
///
/// # Errors
///
/// Returns an error if the agent does not exist or has open work.
pub fn remove(store: &RecordStore, id: AgentId) -> Result<(), Box<dyn std::error::Error>> {
    let open = TransactionRepository::new(store)
        .assigned_to(id)?
        .iter()
        .filter(|t| !t.status.is_terminal())
        .count();
    if open > 0 {
        return Err(CommandError::AgentHasOpenWork { id, open }.into());
    }

    let removed = AgentRepository::new(store).delete(id)?;
    info!("Removed agent #{} ({})", removed.id, removed.username);
    Ok(())
}

/// Activate or deactivate an agent.
///
/// # Errors
///
/// Returns an error if the agent does not exist.
pub fn set_status(
    store: &RecordStore,
    id: AgentId,
    status: AccountStatus,
) -> Result<(), Box<dyn std::error::Error>> {
    let agent: Agent = AgentRepository::new(store).update_with(id, |a| {
        a.status = status;
        Ok::<(), RepositoryError>(())
    })?;
    info!("Agent #{} ({}) is now {}", agent.id, agent.username, agent.status);
    Ok(())
}

/// Set a new password for an agent.
///
/// # Errors
///
/// Returns an error if the password is too short or the agent does not exist.
pub fn change_password(
    store: &RecordStore,
    config: &StoreConfig,
    id: AgentId,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    AuthService::new(store, &config.admin).change_agent_password(id, password)?;
    info!("Password updated for agent #{id}");
    Ok(())
}

/// Log in as an agent.
///
/// # Errors
///
/// Returns an error if the credentials are wrong or the agent is inactive.
pub fn login(
    store: &RecordStore,
    config: &StoreConfig,
    username: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let agent = AuthService::new(store, &config.admin).login_agent(username, password)?;
    info!("Logged in as {} ({})", agent.name, agent.role);

    let open: Vec<_> = TransactionRepository::new(store)
        .assigned_to(agent.id)?
        .into_iter()
        .filter(|t| !t.status.is_terminal())
        .collect();
    if open.is_empty() {
        info!("No open assignments");
    } else {
        warn!("{} open assignment(s):", open.len());
        for tx in &open {
            warn!("  #{} {} {} - {}", tx.id, tx.brand, tx.model, tx.status);
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use rust_decimal::Decimal;

    use quickbuy_core::TransactionId;
    use quickbuy_store::services::WorkflowService;

    #[test]
    fn test_remove_refuses_agent_with_open_work() {
        let store = RecordStore::in_memory();
        let err = remove(&store, AgentId::new(1)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CommandError>(),
            Some(CommandError::AgentHasOpenWork { open: 1, .. })
        ));
        assert!(AgentRepository::new(&store).get(AgentId::new(1)).unwrap().is_some());

        remove(&store, AgentId::new(2)).unwrap();
        assert!(AgentRepository::new(&store).get(AgentId::new(2)).unwrap().is_none());
    }

    #[test]
    fn test_remove_allowed_once_work_is_paid() {
        let store = RecordStore::in_memory();
        let workflow = WorkflowService::new(&store);
        let id = TransactionId::new(2);
        workflow.record_assessment(id, Decimal::new(580, 0)).unwrap();
        workflow.await_offer(id).unwrap();
        workflow.make_offer(id, Decimal::new(550, 0)).unwrap();
        workflow.accept_offer(id).unwrap();
        workflow.mark_paid(id).unwrap();

        remove(&store, AgentId::new(1)).unwrap();
        assert_eq!(AgentRepository::new(&store).count().unwrap(), 1);
    }
}
