//! Folds the legacy `transactions` key into `quickbuy_transactions`.
//!
//! The old sell flow wrote submissions in a looser shape: flat objects with
//! `amount` or `estimatedValue` (number or string), a lowercase status
//! (`pending`, `processing`, `completed`) and free-form device fields. Each
//! entry is converted to a [`Transaction`], given a fresh ID and appended to
//! the canonical collection. Entries that cannot be converted are written
//! back under the legacy key; the key is removed once nothing is left.
//!
//! Every imported transaction remembers its legacy entry in `legacySource`,
//! so an entry still under the legacy key after an interrupted run is not
//! imported twice.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use quickbuy_core::{DeviceType, Email, TransactionId, TransactionStatus};

use crate::db::{Record, RecordStore, RepositoryError, TransactionRepository, keys};
use crate::models::Transaction;

/// A legacy entry left in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Position in the legacy array.
    pub index: usize,
    /// Why it could not be converted.
    pub reason: String,
}

/// Outcome of [`migrate_legacy_submissions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// IDs given to the converted entries, in legacy order.
    pub migrated: Vec<TransactionId>,
    /// Entries that could not be converted.
    pub skipped: Vec<SkippedEntry>,
    /// Positions of entries imported by an earlier run.
    pub already_imported: Vec<usize>,
}

impl MigrationReport {
    /// Whether there was nothing to migrate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.migrated.is_empty() && self.skipped.is_empty() && self.already_imported.is_empty()
    }
}

/// Move every convertible legacy submission into the canonical collection.
///
/// Running it again after a complete migration is a no-op.
///
/// # Errors
///
/// Returns `RepositoryError::DataCorruption` if the legacy key holds
/// something other than a JSON array, or a store error if a write fails.
pub fn migrate_legacy_submissions(store: &RecordStore) -> Result<MigrationReport, RepositoryError> {
    let Some(raw) = store.backend().get(keys::LEGACY_TRANSACTIONS)? else {
        tracing::debug!("No legacy submissions to migrate");
        return Ok(MigrationReport::default());
    };
    let entries = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) | Err(_) => {
            return Err(RepositoryError::DataCorruption(format!(
                "'{}' does not hold a JSON array",
                keys::LEGACY_TRANSACTIONS
            )));
        }
    };

    let repo = TransactionRepository::new(store);
    let mut transactions = repo.all()?;
    let mut next_id = transactions
        .iter()
        .map(|t| t.id)
        .max()
        .map_or(TransactionId::new(1), TransactionId::next);

    let mut imported: HashMap<String, usize> = HashMap::new();
    for source in transactions.iter().filter_map(|t| t.legacy_source.clone()) {
        *imported.entry(source).or_default() += 1;
    }

    let mut report = MigrationReport::default();
    let mut leftover = Vec::new();
    let today = Utc::now().date_naive();

    for (index, entry) in entries.into_iter().enumerate() {
        let source = source_of(&entry);
        if let Some(remaining) = imported.get_mut(&source).filter(|n| **n > 0) {
            *remaining -= 1;
            tracing::debug!(index, "Legacy submission already imported");
            report.already_imported.push(index);
            continue;
        }

        let converted = convert(&entry, next_id, today, source).and_then(|tx| {
            tx.validate().map_err(|e| e.to_string())?;
            Ok(tx)
        });
        match converted {
            Ok(tx) => {
                report.migrated.push(tx.id);
                transactions.push(tx);
                next_id = next_id.next();
            }
            Err(reason) => {
                tracing::warn!(index, %reason, "Skipping legacy submission");
                report.skipped.push(SkippedEntry { index, reason });
                leftover.push(entry);
            }
        }
    }

    if !report.migrated.is_empty() {
        repo.save_all(&transactions)?;
    }
    if leftover.is_empty() {
        store.remove(keys::LEGACY_TRANSACTIONS)?;
    } else {
        store.save(keys::LEGACY_TRANSACTIONS, &leftover)?;
    }

    tracing::info!(
        migrated = report.migrated.len(),
        skipped = report.skipped.len(),
        already_imported = report.already_imported.len(),
        "Migrated legacy submissions"
    );
    Ok(report)
}

/// Identity of a legacy entry: its own `id` if it has one, else its JSON text.
fn source_of(entry: &Value) -> String {
    match entry.get("id") {
        Some(Value::String(id)) if !id.trim().is_empty() => format!("id:{}", id.trim()),
        Some(Value::Number(id)) => format!("id:{id}"),
        _ => format!("json:{entry}"),
    }
}

fn convert(
    entry: &Value,
    id: TransactionId,
    today: NaiveDate,
    source: String,
) -> Result<Transaction, String> {
    let obj = entry
        .as_object()
        .ok_or_else(|| "entry is not an object".to_owned())?;

    let email = text(obj, &["customerEmail", "email"])
        .ok_or_else(|| "missing customer email".to_owned())?;
    let customer_email = Email::parse(&email).map_err(|e| format!("bad email: {e}"))?;

    let estimated_value = ["estimatedValue", "amount", "price"]
        .iter()
        .find_map(|key| obj.get(*key).and_then(money))
        .unwrap_or(Decimal::ZERO);

    let status = legacy_status(text(obj, &["status"]).as_deref());
    // A completed legacy sale was paid at the customer's price
    let offered_amount = (status >= TransactionStatus::OfferMade).then_some(estimated_value);

    let submitted_date = text(obj, &["submittedDate", "date", "createdAt"])
        .and_then(|d| date(&d))
        .unwrap_or(today);

    Ok(Transaction {
        id,
        customer_name: text(obj, &["customerName", "name", "fullName"]).unwrap_or_default(),
        customer_email,
        customer_phone: text(obj, &["customerPhone", "phone"]).unwrap_or_default(),
        device_type: parsed(obj, &["deviceType", "type", "category"]).unwrap_or(DeviceType::Other),
        brand: text(obj, &["brand"]).unwrap_or_default(),
        model: text(obj, &["model", "deviceModel"]).unwrap_or_default(),
        condition: parsed(obj, &["condition"]).unwrap_or_default(),
        description: text(obj, &["description", "notes"]).unwrap_or_default(),
        status,
        estimated_value,
        offered_amount,
        submitted_date,
        agent_id: None,
        agent_name: None,
        paid_at: None,
        history: Vec::new(),
        legacy_source: Some(source),
    })
}

fn legacy_status(raw: Option<&str>) -> TransactionStatus {
    let Some(raw) = raw else {
        return TransactionStatus::AwaitingConfirmation;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "pending" => TransactionStatus::AwaitingConfirmation,
        "processing" => TransactionStatus::Confirmed,
        "completed" => TransactionStatus::Paid,
        // Entries written after the rename already carry a display label
        other => other
            .parse()
            .unwrap_or(TransactionStatus::AwaitingConfirmation),
    }
}

/// First non-empty string among `keys`.
fn text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_owned)
}

fn parsed<T: FromStr>(obj: &Map<String, Value>, keys: &[&str]) -> Option<T> {
    text(obj, keys).and_then(|s| s.parse().ok())
}

/// Accepts `450`, `450.5`, `"450"` and `"$1,299.00"`.
fn money(value: &Value) -> Option<Decimal> {
    let raw = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().trim_start_matches('$').replace(',', ""),
        _ => return None,
    };
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .ok()
        .filter(|d| *d >= Decimal::ZERO)
}

/// Accepts `YYYY-MM-DD` and anything that starts with it (RFC 3339 stamps).
fn date(raw: &str) -> Option<NaiveDate> {
    raw.get(..10)
        .or(Some(raw))
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}
