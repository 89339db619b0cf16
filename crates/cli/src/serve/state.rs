//! In-memory checklist store behind the stub proxy.
//!
//! Records are kept as the JSON the client submitted, plus the fields a
//! real backend assigns: `_id`, `createdAt`, `updatedAt`, and upload paths
//! in place of raw base64 signature images.

use std::collections::{BTreeSet, HashMap};

use serde_json::{Map, Value};
use sts_core::lenient::{field, iso_date, path, text};
use sts_core::{trim_operation_ref, FormKind, SignatureRole};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tokio::sync::RwLock;

/// Application state shared across request handlers.
pub(crate) struct AppState {
    pub(crate) store: RwLock<Store>,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum StoreError {
    #[error("Validation failed: operationRef required")]
    MissingOperationRef,

    #[error("Validation failed: checklist data must be a JSON object")]
    NotAnObject,

    #[error("Checklist not found")]
    NotFound,

    #[error("A checklist with operation reference '{0}' already exists")]
    Duplicate(String),
}

#[derive(Debug, Default)]
pub(crate) struct Store {
    records: HashMap<(FormKind, String), Value>,
    next_id: u64,
}

impl Store {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn create(&mut self, kind: FormKind, payload: Value) -> Result<Value, StoreError> {
        let Value::Object(mut record) = payload else {
            return Err(StoreError::NotAnObject);
        };
        let operation_ref = record_ref(&record)?;
        let key = (kind, operation_ref.clone());
        if self.records.contains_key(&key) {
            return Err(StoreError::Duplicate(operation_ref));
        }

        self.next_id += 1;
        let now = timestamp();
        record.insert("operationRef".into(), Value::String(operation_ref.clone()));
        record.insert("_id".into(), Value::String(format!("{:024x}", self.next_id)));
        record.insert("createdAt".into(), Value::String(now.clone()));
        record.insert("updatedAt".into(), Value::String(now));
        store_uploads(kind, &operation_ref, &mut record);

        let record = Value::Object(record);
        self.records.insert(key, record.clone());
        Ok(record)
    }

    pub(crate) fn read(&self, kind: FormKind, operation_ref: &str) -> Result<Value, StoreError> {
        let operation_ref = required_ref(operation_ref)?;
        self.records
            .get(&(kind, operation_ref))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    /// Replace a record. `_id` and `createdAt` survive; the reference it is
    /// stored under does not change.
    pub(crate) fn update(
        &mut self,
        kind: FormKind,
        operation_ref: &str,
        payload: Value,
    ) -> Result<Value, StoreError> {
        let operation_ref = required_ref(operation_ref)?;
        let Value::Object(mut record) = payload else {
            return Err(StoreError::NotAnObject);
        };
        let existing = self
            .records
            .get(&(kind, operation_ref.clone()))
            .ok_or(StoreError::NotFound)?;

        for key in ["_id", "createdAt"] {
            if let Some(value) = existing.get(key) {
                record.insert(key.into(), value.clone());
            }
        }
        record.insert("operationRef".into(), Value::String(operation_ref.clone()));
        record.insert("updatedAt".into(), Value::String(timestamp()));
        store_uploads(kind, &operation_ref, &mut record);

        let record = Value::Object(record);
        self.records.insert((kind, operation_ref), record.clone());
        Ok(record)
    }

    /// Summaries of the records created in `year`, newest first, and every
    /// year that has records for this form, newest first.
    pub(crate) fn list(&self, kind: FormKind, year: i32) -> (Vec<Value>, Vec<i32>) {
        let mut years = BTreeSet::new();
        let mut rows: Vec<&Value> = Vec::new();
        for ((form, _), record) in &self.records {
            if *form != kind {
                continue;
            }
            if let Some(created) = created_year(record) {
                years.insert(created);
                if created == year {
                    rows.push(record);
                }
            }
        }
        rows.sort_by(|a, b| text(b, "createdAt").cmp(&text(a, "createdAt")));

        (
            rows.into_iter().map(summary).collect(),
            years.into_iter().rev().collect(),
        )
    }
}

fn required_ref(raw: &str) -> Result<String, StoreError> {
    match trim_operation_ref(raw) {
        "" => Err(StoreError::MissingOperationRef),
        op => Ok(op.to_string()),
    }
}

fn record_ref(record: &Map<String, Value>) -> Result<String, StoreError> {
    let raw = record.get("operationRef").and_then(Value::as_str).unwrap_or("");
    required_ref(raw)
}

fn timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}

fn created_year(record: &Value) -> Option<i32> {
    text(record, "createdAt").get(..4)?.parse().ok()
}

/// Upload path a raw image is stored under.
pub(crate) fn upload_path(kind: FormKind, operation_ref: &str, role: SignatureRole) -> String {
    format!(
        "/uploads/signatures/{}/{}-{}.png",
        kind.slug(),
        sanitize(operation_ref),
        role.key()
    )
}

fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Replace raw base64 (or data URL) images with their upload paths. Paths and
/// absolute URLs are kept.
fn store_uploads(kind: FormKind, operation_ref: &str, record: &mut Map<String, Value>) {
    let Some(Value::Object(signatures)) = record.get_mut("signatures") else {
        return;
    };
    for role in SignatureRole::ALL {
        let slot = match role {
            SignatureRole::Stamp => signatures.get_mut(role.key()),
            _ => signatures
                .get_mut(role.key())
                .and_then(|block| block.get_mut("signature")),
        };
        let Some(slot) = slot else { continue };
        let raw = slot.as_str().unwrap_or("").trim();
        if is_upload(raw) {
            tracing::info!(form = kind.slug(), operation_ref, role = role.key(), "stored signature image");
            *slot = Value::String(upload_path(kind, operation_ref, role));
        }
    }
}

fn is_upload(raw: &str) -> bool {
    let lower = raw.to_ascii_lowercase();
    !raw.is_empty()
        && !raw.starts_with('/')
        && !lower.starts_with("http://")
        && !lower.starts_with("https://")
}

fn summary(record: &Value) -> Value {
    serde_json::json!({
        "_id": text(record, "_id"),
        "operationRef": text(record, "operationRef"),
        "status": text(record, "status"),
        "constantHeadingShip": text(path(record, &["vessels", "constantHeading"]), "shipName"),
        "manoeuvringShip": text(path(record, &["vessels", "manoeuvring"]), "shipName"),
        "transferDate": iso_date(field(record, "transferInfo"), "date"),
        "createdAt": text(record, "createdAt"),
        "updatedAt": text(record, "updatedAt"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_assigns_server_fields_and_upload_paths() {
        let mut store = Store::new();
        let record = store
            .create(
                FormKind::PreFixture,
                json!({
                    "operationRef": "OP1, ",
                    "status": "DRAFT",
                    "signatures": {
                        "constantHeading": {"name": "A", "signature": "iVBORw=="},
                        "manoeuvring": {"name": "B", "signature": "/uploads/old.png"},
                        "stamp": ""
                    }
                }),
            )
            .unwrap();

        assert_eq!(record["operationRef"], "OP1");
        assert_eq!(record["_id"].as_str().unwrap().len(), 24);
        assert!(record["createdAt"].as_str().unwrap().contains('T'));
        assert_eq!(
            record["signatures"]["constantHeading"]["signature"],
            "/uploads/signatures/ops-ofd-001/OP1-constantHeading.png"
        );
        assert_eq!(record["signatures"]["manoeuvring"]["signature"], "/uploads/old.png");
        assert_eq!(record["signatures"]["stamp"], "");
    }

    #[test]
    fn create_rejects_missing_reference_and_duplicates() {
        let mut store = Store::new();
        assert_eq!(
            store.create(FormKind::PreFixture, json!({"operationRef": ","})),
            Err(StoreError::MissingOperationRef)
        );
        assert_eq!(
            store.create(FormKind::PreFixture, json!([1, 2])),
            Err(StoreError::NotAnObject)
        );
        store
            .create(FormKind::PreFixture, json!({"operationRef": "OP1"}))
            .unwrap();
        assert_eq!(
            store.create(FormKind::PreFixture, json!({"operationRef": "OP1"})),
            Err(StoreError::Duplicate("OP1".into()))
        );
        // Same reference on another form is a different record.
        assert!(store
            .create(FormKind::BeforeMooring, json!({"operationRef": "OP1"}))
            .is_ok());
    }

    #[test]
    fn update_keeps_identity() {
        let mut store = Store::new();
        let created = store
            .create(FormKind::BeforeTransfer, json!({"operationRef": "OP2", "generalRemarks": "a"}))
            .unwrap();
        let updated = store
            .update(
                FormKind::BeforeTransfer,
                "OP2",
                json!({"operationRef": "OTHER", "generalRemarks": "b"}),
            )
            .unwrap();
        assert_eq!(updated["_id"], created["_id"]);
        assert_eq!(updated["createdAt"], created["createdAt"]);
        assert_eq!(updated["operationRef"], "OP2");
        assert_eq!(
            store.read(FormKind::BeforeTransfer, "OP2").unwrap()["generalRemarks"],
            "b"
        );
        assert_eq!(
            store.update(FormKind::BeforeTransfer, "NOPE", json!({})),
            Err(StoreError::NotFound)
        );
    }

    #[test]
    fn list_filters_by_creation_year() {
        let mut store = Store::new();
        store
            .create(
                FormKind::BeforeUnmooring,
                json!({
                    "operationRef": "OP3",
                    "status": "DRAFT",
                    "vessels": {"constantHeading": {"shipName": "MT Alpha"}},
                    "transferInfo": {"date": "2025-01-02"}
                }),
            )
            .unwrap();
        let this_year = OffsetDateTime::now_utc().year();

        let (rows, years) = store.list(FormKind::BeforeUnmooring, this_year);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["constantHeadingShip"], "MT Alpha");
        assert_eq!(rows[0]["transferDate"], "2025-01-02");
        assert_eq!(years, vec![this_year]);

        let (rows, _) = store.list(FormKind::BeforeUnmooring, this_year - 1);
        assert!(rows.is_empty());
        let (rows, years) = store.list(FormKind::PreFixture, this_year);
        assert!(rows.is_empty() && years.is_empty());
    }

    #[test]
    fn upload_path_sanitizes_reference() {
        assert_eq!(
            upload_path(FormKind::BeforeMooring, "OP 1/2", SignatureRole::Stamp),
            "/uploads/signatures/ops-ofd-003/OP_1_2-stamp.png"
        );
    }
}
