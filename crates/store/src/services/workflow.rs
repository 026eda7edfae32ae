//! Trade-in workflow service.
//!
//! Every operation loads the transaction, checks the requested step against
//! [`TransactionStatus::transition_to`], applies the step's data and writes
//! the collection back. Agent and customer counters are updated after the
//! transaction is saved; the collections are written separately, so a
//! failure between the two writes leaves the counters one step behind.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use quickbuy_core::{AgentId, TransactionId, TransactionStatus, TransitionError};

use crate::db::{
    AgentRepository, CustomerRepository, RecordStore, RepositoryError, TransactionRepository,
};
use crate::models::{Agent, Customer, SellSubmission, Transaction};

/// Errors that can occur while moving a transaction through the workflow.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The requested step is not the next one.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// The agent exists but cannot take assignments.
    #[error("agent {0} is inactive")]
    AgentInactive(AgentId),

    /// A money amount was zero, negative or otherwise unusable.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The step needs data the transaction does not have.
    #[error("missing data: {0}")]
    MissingData(String),
}

/// Read-only view of a transaction for customer tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tracking {
    pub transaction: Transaction,
    /// Completed share of the workflow, 0 to 100.
    pub progress_percent: u8,
    /// Status the transaction will move to next, if any.
    pub next_status: Option<TransactionStatus>,
}

/// Trade-in workflow operations.
pub struct WorkflowService<'a> {
    transactions: TransactionRepository<'a>,
    agents: AgentRepository<'a>,
    customers: CustomerRepository<'a>,
}

impl<'a> WorkflowService<'a> {
    /// Create a new workflow service.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self {
            transactions: TransactionRepository::new(store),
            agents: AgentRepository::new(store),
            customers: CustomerRepository::new(store),
        }
    }

    /// Record a new trade-in in `Awaiting Confirmation`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidAmount` for a negative estimate, or a
    /// repository error if validation or the write fails.
    pub fn submit(&self, submission: SellSubmission) -> Result<Transaction, WorkflowError> {
        if submission.estimated_value < Decimal::ZERO {
            return Err(WorkflowError::InvalidAmount(format!(
                "estimate {} is negative",
                submission.estimated_value
            )));
        }

        let transaction = Transaction {
            id: TransactionId::new(0),
            customer_name: submission.customer_name.trim().to_owned(),
            customer_email: submission.customer_email,
            customer_phone: submission.customer_phone,
            device_type: submission.device_type,
            brand: submission.brand.trim().to_owned(),
            model: submission.model.trim().to_owned(),
            condition: submission.condition,
            description: submission.description,
            status: TransactionStatus::AwaitingConfirmation,
            estimated_value: submission.estimated_value,
            offered_amount: None,
            submitted_date: today(),
            agent_id: None,
            agent_name: None,
            paid_at: None,
            history: Vec::new(),
            legacy_source: None,
        };

        let transaction = self.transactions.insert(transaction)?;
        tracing::info!(
            transaction_id = %transaction.id,
            brand = %transaction.brand,
            model = %transaction.model,
            "Trade-in submitted"
        );
        Ok(transaction)
    }

    /// `Awaiting Confirmation` to `Confirmed`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Transition` from any other status.
    pub fn confirm(&self, id: TransactionId) -> Result<Transaction, WorkflowError> {
        self.step(id, TransactionStatus::Confirmed, |_| Ok(()))
    }

    /// `Confirmed` to `Assigned to Agent`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::AgentInactive` for a deactivated agent, a
    /// not-found repository error for an unknown one, or
    /// `WorkflowError::Transition` from any status but `Confirmed`.
    pub fn assign_agent(
        &self,
        id: TransactionId,
        agent_id: AgentId,
    ) -> Result<Transaction, WorkflowError> {
        let agent = self.agents.require(agent_id)?;
        if !agent.status.is_active() {
            return Err(WorkflowError::AgentInactive(agent_id));
        }

        let transaction = self.step(id, TransactionStatus::AssignedToAgent, |tx| {
            tx.agent_id = Some(agent.id);
            tx.agent_name = Some(agent.name.clone());
            Ok(())
        })?;

        self.bump_agent(agent_id, |a| {
            a.assigned_devices = a.assigned_devices.saturating_add(1);
        })?;
        Ok(transaction)
    }

    /// `Assigned to Agent` to `Device Assessed`, replacing the estimate with
    /// the agent's valuation.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidAmount` for a negative value,
    /// `WorkflowError::MissingData` if no agent is assigned, or
    /// `WorkflowError::Transition` from any other status.
    pub fn record_assessment(
        &self,
        id: TransactionId,
        estimated_value: Decimal,
    ) -> Result<Transaction, WorkflowError> {
        if estimated_value < Decimal::ZERO {
            return Err(WorkflowError::InvalidAmount(format!(
                "assessed value {estimated_value} is negative"
            )));
        }

        let transaction = self.step(id, TransactionStatus::DeviceAssessed, |tx| {
            if tx.agent_id.is_none() {
                return Err(WorkflowError::MissingData(format!(
                    "transaction {} has no assigned agent",
                    tx.id
                )));
            }
            tx.estimated_value = estimated_value;
            Ok(())
        })?;

        if let Some(agent_id) = transaction.agent_id {
            self.bump_agent(agent_id, |a| {
                a.completed_assessments = a.completed_assessments.saturating_add(1);
            })?;
        }
        Ok(transaction)
    }

    /// `Device Assessed` to `Awaiting Offer`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Transition` from any other status.
    pub fn await_offer(&self, id: TransactionId) -> Result<Transaction, WorkflowError> {
        self.step(id, TransactionStatus::AwaitingOffer, |_| Ok(()))
    }

    /// `Awaiting Offer` to `Offer Made`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidAmount` unless `amount` is positive, or
    /// `WorkflowError::Transition` from any other status.
    pub fn make_offer(
        &self,
        id: TransactionId,
        amount: Decimal,
    ) -> Result<Transaction, WorkflowError> {
        if amount <= Decimal::ZERO {
            return Err(WorkflowError::InvalidAmount(format!(
                "offer must be positive, got {amount}"
            )));
        }
        let transaction = self.step(id, TransactionStatus::OfferMade, |tx| {
            tx.offered_amount = Some(amount);
            Ok(())
        })?;
        tracing::info!(transaction_id = %id, %amount, "Offer made");
        Ok(transaction)
    }

    /// `Offer Made` to `Awaiting Payment`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Transition` from any other status.
    pub fn accept_offer(&self, id: TransactionId) -> Result<Transaction, WorkflowError> {
        self.step(id, TransactionStatus::AwaitingPayment, |_| Ok(()))
    }

    /// `Awaiting Payment` to `Paid`.
    ///
    /// Stamps `paid_at` and credits the sale to the customer record with the
    /// same email, if there is one.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Transition` from any other status.
    pub fn mark_paid(&self, id: TransactionId) -> Result<Transaction, WorkflowError> {
        let now = Utc::now();
        let transaction = self.step_at(id, TransactionStatus::Paid, now, |tx| {
            tx.paid_at = Some(now);
            Ok(())
        })?;

        match self.customers.find_by_email(&transaction.customer_email)? {
            Some(customer) => {
                let paid_on = now.date_naive();
                let _: Customer = self.customers.update_with(customer.id, |c| {
                    c.total_sales = c.total_sales.saturating_add(1);
                    c.last_activity = c.last_activity.max(paid_on);
                    Ok::<(), RepositoryError>(())
                })?;
            }
            None => tracing::debug!(
                transaction_id = %id,
                "No customer record for paid trade-in"
            ),
        }

        tracing::info!(
            transaction_id = %id,
            amount = ?transaction.offered_amount,
            "Trade-in paid"
        );
        Ok(transaction)
    }

    /// Move to the next status.
    ///
    /// Steps that need data (agent, valuation, offer) must go through their
    /// own operation and are refused here. `Awaiting Payment` is settled
    /// through [`WorkflowService::mark_paid`].
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Transition` for a paid transaction and
    /// `WorkflowError::MissingData` for steps that need input.
    pub fn advance(&self, id: TransactionId) -> Result<Transaction, WorkflowError> {
        let current = self.transactions.require(id)?;
        let Some(next) = current.status.next() else {
            return Err(TransitionError {
                from: current.status,
                to: current.status,
            }
            .into());
        };

        match next {
            TransactionStatus::Confirmed
            | TransactionStatus::AwaitingOffer
            | TransactionStatus::AwaitingPayment => self.step(id, next, |_| Ok(())),
            TransactionStatus::Paid => self.mark_paid(id),
            TransactionStatus::AssignedToAgent => Err(WorkflowError::MissingData(
                "assigning an agent needs an agent id".to_owned(),
            )),
            TransactionStatus::DeviceAssessed => Err(WorkflowError::MissingData(
                "recording an assessment needs a value".to_owned(),
            )),
            TransactionStatus::OfferMade => Err(WorkflowError::MissingData(
                "making an offer needs an amount".to_owned(),
            )),
            TransactionStatus::AwaitingConfirmation => Err(TransitionError {
                from: current.status,
                to: next,
            }
            .into()),
        }
    }

    /// Look up a transaction for the tracking view.
    ///
    /// # Errors
    ///
    /// Returns a not-found repository error for an unknown ID.
    pub fn track(&self, id: TransactionId) -> Result<Tracking, WorkflowError> {
        let transaction = self.transactions.require(id)?;
        Ok(Tracking {
            progress_percent: transaction.progress_percent(),
            next_status: transaction.status.next(),
            transaction,
        })
    }

    fn step<F>(
        &self,
        id: TransactionId,
        target: TransactionStatus,
        apply: F,
    ) -> Result<Transaction, WorkflowError>
    where
        F: FnOnce(&mut Transaction) -> Result<(), WorkflowError>,
    {
        self.step_at(id, target, Utc::now(), apply)
    }

    fn step_at<F>(
        &self,
        id: TransactionId,
        target: TransactionStatus,
        at: DateTime<Utc>,
        apply: F,
    ) -> Result<Transaction, WorkflowError>
    where
        F: FnOnce(&mut Transaction) -> Result<(), WorkflowError>,
    {
        let transaction = self.transactions.update_with(id, |tx| {
            tx.status.transition_to(target)?;
            apply(tx)?;
            tx.advance_to(target, at)?;
            Ok::<(), WorkflowError>(())
        })?;
        tracing::info!(transaction_id = %id, status = %target, "Transaction advanced");
        Ok(transaction)
    }

    fn bump_agent<F>(&self, agent_id: AgentId, bump: F) -> Result<(), WorkflowError>
    where
        F: FnOnce(&mut Agent),
    {
        match self.agents.update_with(agent_id, |a| {
            bump(a);
            Ok::<(), RepositoryError>(())
        }) {
            Ok(_) => Ok(()),
            // Agent removed after the assignment; the transaction keeps its name
            Err(RepositoryError::NotFound { .. }) => {
                tracing::warn!(%agent_id, "Assigned agent no longer exists");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use quickbuy_core::{AccountStatus, CustomerId, DeviceCondition, DeviceType, Email};

    fn submission() -> SellSubmission {
        SellSubmission {
            customer_name: "John Doe".to_owned(),
            customer_email: Email::parse("John.Doe@example.com").unwrap(),
            customer_phone: "+1 (555) 234-5678".to_owned(),
            device_type: DeviceType::Tablet,
            brand: "Apple".to_owned(),
            model: "iPad Pro 11".to_owned(),
            condition: DeviceCondition::Good,
            description: "Screen protector since day one".to_owned(),
            estimated_value: Decimal::new(480, 0),
        }
    }

    #[test]
    fn test_full_workflow() {
        let store = RecordStore::in_memory();
        let workflow = WorkflowService::new(&store);

        let tx = workflow.submit(submission()).unwrap();
        assert_eq!(tx.id, TransactionId::new(3));
        assert_eq!(tx.status, TransactionStatus::AwaitingConfirmation);

        workflow.confirm(tx.id).unwrap();
        let assigned = workflow.assign_agent(tx.id, AgentId::new(2)).unwrap();
        assert_eq!(assigned.agent_name.as_deref(), Some("James Carter"));

        let assessed = workflow
            .record_assessment(tx.id, Decimal::new(450, 0))
            .unwrap();
        assert_eq!(assessed.estimated_value, Decimal::new(450, 0));

        workflow.await_offer(tx.id).unwrap();
        workflow.make_offer(tx.id, Decimal::new(430, 0)).unwrap();
        workflow.accept_offer(tx.id).unwrap();
        let paid = workflow.mark_paid(tx.id).unwrap();

        assert_eq!(paid.status, TransactionStatus::Paid);
        assert!(paid.paid_at.is_some());
        assert_eq!(paid.offered_amount, Some(Decimal::new(430, 0)));
        assert_eq!(paid.history.len(), 7);
        assert_eq!(paid.history[0].from, TransactionStatus::AwaitingConfirmation);
        assert_eq!(paid.history[6].to, TransactionStatus::Paid);

        let james = AgentRepository::new(&store).require(AgentId::new(2)).unwrap();
        assert_eq!(james.assigned_devices, 9);
        assert_eq!(james.completed_assessments, 31);

        let john = CustomerRepository::new(&store)
            .require(CustomerId::new(1))
            .unwrap();
        assert_eq!(john.total_sales, 3);
        assert_eq!(john.last_activity, today());

        let tracking = workflow.track(tx.id).unwrap();
        assert_eq!(tracking.progress_percent, 100);
        assert_eq!(tracking.next_status, None);
    }

    #[test]
    fn test_skipping_a_step_is_rejected() {
        let store = RecordStore::in_memory();
        let workflow = WorkflowService::new(&store);
        let id = TransactionId::new(1);

        let err = workflow.make_offer(id, Decimal::new(300, 0)).unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Transition(TransitionError {
                from: TransactionStatus::AwaitingConfirmation,
                to: TransactionStatus::OfferMade,
            })
        ));
        let unchanged = TransactionRepository::new(&store).require(id).unwrap();
        assert_eq!(unchanged.offered_amount, None);
        assert_eq!(unchanged.status, TransactionStatus::AwaitingConfirmation);
    }

    #[test]
    fn test_going_back_is_rejected() {
        let store = RecordStore::in_memory();
        let workflow = WorkflowService::new(&store);
        // Seed transaction 2 is already assigned
        assert!(matches!(
            workflow.confirm(TransactionId::new(2)),
            Err(WorkflowError::Transition(_))
        ));
    }

    #[test]
    fn test_assign_inactive_agent_rejected() {
        let store = RecordStore::in_memory();
        let workflow = WorkflowService::new(&store);
        let _: Agent = AgentRepository::new(&store)
            .update_with(AgentId::new(2), |a| {
                a.status = AccountStatus::Inactive;
                Ok::<(), RepositoryError>(())
            })
            .unwrap();

        workflow.confirm(TransactionId::new(1)).unwrap();
        assert!(matches!(
            workflow.assign_agent(TransactionId::new(1), AgentId::new(2)),
            Err(WorkflowError::AgentInactive(_))
        ));
        assert!(matches!(
            workflow.assign_agent(TransactionId::new(1), AgentId::new(99)),
            Err(WorkflowError::Repository(RepositoryError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_offer_must_be_positive() {
        let store = RecordStore::in_memory();
        let workflow = WorkflowService::new(&store);
        assert!(matches!(
            workflow.make_offer(TransactionId::new(2), Decimal::ZERO),
            Err(WorkflowError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_submit_rejects_negative_estimate() {
        let store = RecordStore::in_memory();
        let workflow = WorkflowService::new(&store);
        let mut bad = submission();
        bad.estimated_value = Decimal::new(-1, 0);
        assert!(matches!(
            workflow.submit(bad),
            Err(WorkflowError::InvalidAmount(_))
        ));
        assert_eq!(TransactionRepository::new(&store).count().unwrap(), 2);
    }

    #[test]
    fn test_advance_handles_dataless_steps_only() {
        let store = RecordStore::in_memory();
        let workflow = WorkflowService::new(&store);
        let id = TransactionId::new(1);

        let confirmed = workflow.advance(id).unwrap();
        assert_eq!(confirmed.status, TransactionStatus::Confirmed);
        assert!(matches!(
            workflow.advance(id),
            Err(WorkflowError::MissingData(_))
        ));
    }

    #[test]
    fn test_paid_is_terminal() {
        let store = RecordStore::in_memory();
        let workflow = WorkflowService::new(&store);
        let id = TransactionId::new(2);
        workflow.record_assessment(id, Decimal::new(580, 0)).unwrap();
        workflow.await_offer(id).unwrap();
        workflow.make_offer(id, Decimal::new(560, 0)).unwrap();
        workflow.advance(id).unwrap();
        let paid = workflow.advance(id).unwrap();
        assert_eq!(paid.status, TransactionStatus::Paid);
        assert!(matches!(
            workflow.advance(id),
            Err(WorkflowError::Transition(_))
        ));
    }

    #[test]
    fn test_track_unknown_transaction() {
        let store = RecordStore::in_memory();
        let workflow = WorkflowService::new(&store);
        assert!(matches!(
            workflow.track(TransactionId::new(42)),
            Err(WorkflowError::Repository(RepositoryError::NotFound { .. }))
        ));
        let tracking = workflow.track(TransactionId::new(2)).unwrap();
        assert_eq!(tracking.progress_percent, 28);
        assert_eq!(tracking.next_status, Some(TransactionStatus::DeviceAssessed));
    }
}
