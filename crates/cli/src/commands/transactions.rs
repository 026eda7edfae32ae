//! Trade-in workflow commands.
//!
//! # Usage
//!
//! ```bash
//! qb transactions submit --name "Jane Smith" --email jane@example.com \
//!     --type laptop --brand Apple --model "MacBook Air M1" --estimate 600
//! qb transactions confirm 3
//! qb transactions assign 3 --agent 1
//! qb transactions assess 3 --value 560
//! qb transactions await-offer 3
//! qb transactions offer 3 --amount 540
//! qb transactions accept 3
//! qb transactions pay 3
//! ```

use rust_decimal::Decimal;
use tracing::info;

use quickbuy_core::{AgentId, TransactionId, TransactionStatus};
use quickbuy_store::RecordStore;
use quickbuy_store::db::TransactionRepository;
use quickbuy_store::models::{SellSubmission, Transaction};
use quickbuy_store::services::WorkflowService;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// List transactions, optionally by status or agent.
///
/// # Errors
///
/// Returns an error if the collection cannot be loaded.
pub fn list(
    store: &RecordStore,
    status: Option<TransactionStatus>,
    agent: Option<AgentId>,
) -> CommandResult {
    let repo = TransactionRepository::new(store);
    let mut transactions = match status {
        Some(status) => repo.with_status(status)?,
        None => repo.all()?,
    };
    if let Some(agent) = agent {
        transactions.retain(|t| t.agent_id == Some(agent));
    }

    info!("{} transaction(s)", transactions.len());
    for tx in &transactions {
        info!(
            "  #{} {} - {} {} ({}) - {} - est. ${:.2}{}",
            tx.id,
            tx.customer_name,
            tx.brand,
            tx.model,
            tx.condition,
            tx.status,
            tx.estimated_value,
            tx.agent_name
                .as_deref()
                .map(|name| format!(" - {name}"))
                .unwrap_or_default()
        );
    }
    Ok(())
}

/// Submit a device for trade-in.
///
/// # Errors
///
/// Returns an error if the submission is invalid or the write fails.
pub fn submit(store: &RecordStore, submission: SellSubmission) -> CommandResult {
    let tx = WorkflowService::new(store).submit(submission)?;
    info!("Submitted! Transaction ID: {} ({})", tx.id, tx.status);
    Ok(())
}

/// Show a transaction and its progress.
///
/// # Errors
///
/// Returns an error if the transaction does not exist.
pub fn show(store: &RecordStore, id: TransactionId) -> CommandResult {
    let tracking = WorkflowService::new(store).track(id)?;
    let tx = &tracking.transaction;

    info!("Transaction #{}", tx.id);
    info!("  Customer: {} <{}> {}", tx.customer_name, tx.customer_email, tx.customer_phone);
    info!("  Device: {} {} {} ({})", tx.device_type, tx.brand, tx.model, tx.condition);
    if !tx.description.is_empty() {
        info!("  Notes: {}", tx.description);
    }
    info!("  Submitted: {}", tx.submitted_date);
    info!("  Status: {} ({}% complete)", tx.status, tracking.progress_percent);
    if let Some(next) = tracking.next_status {
        info!("  Next: {next}");
    }
    info!("  Estimated value: ${:.2}", tx.estimated_value);
    if let Some(offer) = tx.offered_amount {
        info!("  Offer: ${offer:.2}");
    }
    if let Some(agent) = &tx.agent_name {
        info!("  Agent: {agent}");
    }
    if let Some(paid_at) = tx.paid_at {
        info!("  Paid at: {paid_at}");
    }
    for change in &tx.history {
        info!("    {} {} -> {}", change.at.format("%Y-%m-%d %H:%M"), change.from, change.to);
    }
    Ok(())
}

fn report(tx: &Transaction) {
    info!("Transaction #{} is now {}", tx.id, tx.status);
}

/// Confirm a submission.
///
/// # Errors
///
/// Returns an error if the transaction is not awaiting confirmation.
pub fn confirm(store: &RecordStore, id: TransactionId) -> CommandResult {
    report(&WorkflowService::new(store).confirm(id)?);
    Ok(())
}

/// Assign an agent.
///
/// # Errors
///
/// Returns an error if the agent is unknown or inactive, or the transaction
/// is not confirmed.
pub fn assign(store: &RecordStore, id: TransactionId, agent: AgentId) -> CommandResult {
    report(&WorkflowService::new(store).assign_agent(id, agent)?);
    Ok(())
}

/// Record the agent's valuation.
///
/// # Errors
///
/// Returns an error if the transaction is not assigned.
pub fn assess(store: &RecordStore, id: TransactionId, value: Decimal) -> CommandResult {
    report(&WorkflowService::new(store).record_assessment(id, value)?);
    Ok(())
}

/// Queue a transaction for an offer.
///
/// # Errors
///
/// Returns an error if the device has not been assessed.
pub fn await_offer(store: &RecordStore, id: TransactionId) -> CommandResult {
    report(&WorkflowService::new(store).await_offer(id)?);
    Ok(())
}

/// Make an offer.
///
/// # Errors
///
/// Returns an error if the amount is not positive or the transaction is not
/// awaiting an offer.
pub fn offer(store: &RecordStore, id: TransactionId, amount: Decimal) -> CommandResult {
    report(&WorkflowService::new(store).make_offer(id, amount)?);
    Ok(())
}

/// Record the customer's acceptance.
///
/// # Errors
///
/// Returns an error if no offer is outstanding.
pub fn accept(store: &RecordStore, id: TransactionId) -> CommandResult {
    report(&WorkflowService::new(store).accept_offer(id)?);
    Ok(())
}

/// Record payment.
///
/// # Errors
///
/// Returns an error if the transaction is not awaiting payment.
pub fn pay(store: &RecordStore, id: TransactionId) -> CommandResult {
    report(&WorkflowService::new(store).mark_paid(id)?);
    Ok(())
}

/// Move to the next status when it needs no input.
///
/// # Errors
///
/// Returns an error for paid transactions and steps that need input.
pub fn advance(store: &RecordStore, id: TransactionId) -> CommandResult {
    report(&WorkflowService::new(store).advance(id)?);
    Ok(())
}
