//! Integration tests for the trade-in workflow over the file backend.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use quickbuy_core::{
    AgentId, CustomerId, DeviceCondition, DeviceType, Email, TransactionId, TransactionStatus,
    TransitionError,
};
use quickbuy_integration_tests::TestContext;
use quickbuy_store::db::{AgentRepository, CustomerRepository, SessionStore, TransactionRepository};
use quickbuy_store::models::SellSubmission;
use quickbuy_store::services::{AuthService, DashboardStats, WorkflowError, WorkflowService};

fn galaxy_submission() -> SellSubmission {
    SellSubmission {
        customer_name: "John Doe".to_owned(),
        customer_email: Email::parse("john.doe@example.com").unwrap(),
        customer_phone: "+1 (555) 234-5678".to_owned(),
        device_type: DeviceType::Smartphone,
        brand: "Samsung".to_owned(),
        model: "Galaxy S22".to_owned(),
        condition: DeviceCondition::Excellent,
        description: "Always in a case".to_owned(),
        estimated_value: Decimal::new(420, 0),
    }
}

#[test]
fn test_trade_in_lifecycle_persists_across_handles() {
    let ctx = TestContext::new();

    // Agent logs in on one handle
    let auth = AuthService::new(&ctx.store, &ctx.config.admin);
    let sarah = auth.login_agent("sarah.mitchell", "password123").unwrap();

    // Each step goes through a fresh handle, as separate CLI runs would
    let id = WorkflowService::new(&ctx.reopen())
        .submit(galaxy_submission())
        .unwrap()
        .id;
    WorkflowService::new(&ctx.reopen()).confirm(id).unwrap();
    WorkflowService::new(&ctx.reopen())
        .assign_agent(id, sarah.id)
        .unwrap();
    WorkflowService::new(&ctx.reopen())
        .record_assessment(id, Decimal::new(400, 0))
        .unwrap();
    WorkflowService::new(&ctx.reopen()).await_offer(id).unwrap();
    WorkflowService::new(&ctx.reopen())
        .make_offer(id, Decimal::new(380, 0))
        .unwrap();
    WorkflowService::new(&ctx.reopen()).accept_offer(id).unwrap();
    WorkflowService::new(&ctx.reopen()).mark_paid(id).unwrap();

    let store = ctx.reopen();
    let tx = TransactionRepository::new(&store).require(id).unwrap();
    assert_eq!(tx.status, TransactionStatus::Paid);
    assert_eq!(tx.agent_id, Some(AgentId::new(1)));
    assert_eq!(tx.offered_amount, Some(Decimal::new(380, 0)));
    assert_eq!(tx.history.len(), 7);

    let sarah = AgentRepository::new(&store).require(sarah.id).unwrap();
    assert_eq!(sarah.assigned_devices, 13);
    assert_eq!(sarah.completed_assessments, 46);

    let john = CustomerRepository::new(&store)
        .require(CustomerId::new(1))
        .unwrap();
    assert_eq!(john.total_sales, 3);

    let session = SessionStore::new(&store).current_agent().unwrap().unwrap();
    assert_eq!(session.username, "sarah.mitchell");

    let stats = DashboardStats::collect(&store).unwrap();
    assert_eq!(stats.transactions, 3);
    assert_eq!(stats.total_paid_out, Decimal::new(380, 0));
}

#[test]
fn test_every_non_successor_transition_rejected() {
    for from in TransactionStatus::ALL {
        for to in TransactionStatus::ALL {
            let result = from.transition_to(to);
            if from.next() == Some(to) {
                assert_eq!(result, Ok(to));
            } else {
                assert_eq!(result, Err(TransitionError { from, to }));
            }
        }
    }
}

#[test]
fn test_rejected_step_leaves_file_untouched() {
    let ctx = TestContext::new();
    let workflow = WorkflowService::new(&ctx.store);
    let id = TransactionId::new(1);
    workflow.confirm(id).unwrap();
    let before = std::fs::read_to_string(ctx.dir.path().join("quickbuy_transactions.json")).unwrap();

    let err = workflow.accept_offer(id).unwrap_err();
    assert!(matches!(err, WorkflowError::Transition(_)));

    let after = std::fs::read_to_string(ctx.dir.path().join("quickbuy_transactions.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_admin_and_agent_logins_share_session_keys() {
    let ctx = TestContext::new();
    let auth = AuthService::new(&ctx.store, &ctx.config.admin);

    auth.login_admin("admin@quickbuy.com", "admin123").unwrap();
    assert!(SessionStore::new(&ctx.reopen()).is_admin().unwrap());

    auth.login_agent("james.carter", "password456").unwrap();
    let reopened = ctx.reopen();
    let session = SessionStore::new(&reopened);
    assert!(!session.is_admin().unwrap());
    assert_eq!(session.current_agent().unwrap().unwrap().id, AgentId::new(2));

    auth.logout().unwrap();
    let reopened = ctx.reopen();
    let session = SessionStore::new(&reopened);
    assert!(session.current_agent().unwrap().is_none());
    assert!(!session.is_admin().unwrap());
}
