//! Per-year record listings and the all-forms dashboard.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use sts_core::lenient::{array, field, iso_date, opt_text, path, text, unwrap_data};
use sts_core::{trim_operation_ref, FormKind, Status};
use time::OffsetDateTime;

use crate::proxy::ProxyClient;
use crate::transport::Transport;

/// One row of a listing, normalized leniently from whatever the backend sent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntry {
    pub id: String,
    pub operation_ref: String,
    pub status: Status,
    pub constant_heading_ship: String,
    pub manoeuvring_ship: String,
    /// ISO `YYYY-MM-DD`, empty when unknown.
    pub transfer_date: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ListEntry {
    /// Accepts both summary rows (`constantHeadingShip`, `transferDate`) and
    /// full records (`vessels.*.shipName`, `transferInfo.date`).
    pub fn from_backend(value: &Value) -> Self {
        let ship = |flat: &str, side: &str| {
            opt_text(value, flat)
                .unwrap_or_else(|| text(path(value, &["vessels", side]), "shipName"))
        };
        let transfer_date = match iso_date(value, "transferDate") {
            d if d.is_empty() => iso_date(field(value, "transferInfo"), "date"),
            d => d,
        };

        Self {
            id: opt_text(value, "_id").unwrap_or_else(|| text(value, "id")),
            operation_ref: trim_operation_ref(&text(value, "operationRef")).to_string(),
            status: Status::from_backend(&text(value, "status")),
            constant_heading_ship: ship("constantHeadingShip", "constantHeading"),
            manoeuvring_ship: ship("manoeuvringShip", "manoeuvring"),
            transfer_date,
            created_at: text(value, "createdAt"),
            updated_at: text(value, "updatedAt"),
        }
    }
}

/// Records of one form for one year, plus every year that has records.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Listing {
    pub entries: Vec<ListEntry>,
    pub years: Vec<i32>,
}

impl Listing {
    /// Read `{ data: [...], years: [...] }`. A bare array is taken as the
    /// entries. Years may arrive as numbers or numeric strings.
    pub fn from_body(body: &Value) -> Self {
        let rows = match unwrap_data(body) {
            Value::Array(items) => items.as_slice(),
            _ => &[],
        };
        let years = array(body, "years")
            .iter()
            .filter_map(|y| match y {
                Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
            .collect();

        Self {
            entries: rows.iter().map(ListEntry::from_backend).collect(),
            years,
        }
    }

    /// Number of entries per status. Statuses with no entries are absent.
    pub fn status_counts(&self) -> BTreeMap<Status, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.status).or_insert(0) += 1;
        }
        counts
    }
}

pub fn current_year() -> i32 {
    OffsetDateTime::now_utc().year()
}

/// One form's line on the dashboard: its listing, or the sentence explaining
/// why it could not be loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardRow {
    pub kind: FormKind,
    pub outcome: Result<Listing, String>,
}

/// List every form for `year`. A failing form does not stop the others.
pub fn dashboard<T: Transport>(client: &ProxyClient<T>, year: i32) -> Vec<DashboardRow> {
    FormKind::ALL
        .iter()
        .map(|&kind| {
            let outcome = client.list(kind, year).map_err(|err| {
                tracing::error!(form = kind.slug(), year, error = %err, "listing failed");
                err.user_message()
            });
            DashboardRow { kind, outcome }
        })
        .collect()
}
