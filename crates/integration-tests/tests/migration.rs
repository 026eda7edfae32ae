//! Integration tests for the legacy submissions migration.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use quickbuy_core::TransactionStatus;
use quickbuy_integration_tests::TestContext;
use quickbuy_store::db::{TransactionRepository, keys};
use quickbuy_store::services::migrate_legacy_submissions;

const LEGACY: &str = r#"[
  {"id": 1710000000000, "name": "Maria Garcia", "email": "maria@example.com",
   "deviceType": "tablet", "brand": "Samsung", "model": "Galaxy Tab S8",
   "condition": "good", "amount": 310, "status": "pending", "date": "2024-03-09"},
  {"id": 1710000000001, "name": "Tom Lee", "email": "tom@example.com",
   "deviceType": "console", "brand": "Sony", "model": "PlayStation 5",
   "condition": "excellent", "amount": "385.50", "status": "completed", "date": "2024-03-10"}
]"#;

#[test]
fn test_legacy_file_is_folded_in_and_removed() {
    let ctx = TestContext::new();
    std::fs::write(ctx.dir.path().join("transactions.json"), LEGACY).unwrap();

    let report = migrate_legacy_submissions(&ctx.store).unwrap();
    assert_eq!(report.migrated.len(), 2);
    assert!(report.skipped.is_empty());
    assert!(!ctx.dir.path().join("transactions.json").exists());

    let store = ctx.reopen();
    assert!(store.backend().get(keys::LEGACY_TRANSACTIONS).unwrap().is_none());

    let all = TransactionRepository::new(&store).all().unwrap();
    // Two seeds plus two migrated
    assert_eq!(all.len(), 4);
    let tab = all.iter().find(|t| t.model == "Galaxy Tab S8").unwrap();
    assert_eq!(tab.status, TransactionStatus::AwaitingConfirmation);
    let ps5 = all.iter().find(|t| t.model == "PlayStation 5").unwrap();
    assert_eq!(ps5.status, TransactionStatus::Paid);
    assert_eq!(ps5.estimated_value, Decimal::new(38_550, 2));
}

#[test]
fn test_migration_appends_after_existing_ids() {
    let ctx = TestContext::new();
    quickbuy_store::db::seed_all(&ctx.store, false).unwrap();
    std::fs::write(ctx.dir.path().join("transactions.json"), LEGACY).unwrap();

    let report = migrate_legacy_submissions(&ctx.store).unwrap();
    let ids: Vec<i64> = report.migrated.iter().map(|id| id.as_i64()).collect();
    assert_eq!(ids, vec![3, 4]);
}
