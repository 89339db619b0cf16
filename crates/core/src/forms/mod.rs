//! Checklist form records.
//!
//! Every STS checklist shares one record shape: transfer particulars, the
//! two vessels, a fixed list of checklist items, general remarks and the
//! signature blocks. What differs per form is the static catalog (title,
//! controlled-document header, item wording) and one form-specific details
//! section. [`ChecklistForm`] carries those per-form parts;
//! [`ChecklistRecord`] is the record generic over them.
//!
//! A record has three JSON renderings:
//!
//! - [`ChecklistRecord::from_backend`] reads any JSON value defensively,
//! - [`ChecklistRecord::to_json`] is the in-memory view (images as stored),
//! - [`ChecklistRecord::to_payload`] is what gets submitted (`status` forced
//!   to `DRAFT`, data-URL images reduced to raw base64, no server fields).

mod before_mooring;
mod before_operation;
mod before_transfer;
mod before_unmooring;
mod pre_fixture;
mod sections;

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::lenient::{array, field, opt_text, text};
use crate::opref::{trim_operation_ref, OperationRef};
use crate::status::Status;

pub use before_mooring::{BeforeMooring, MooringPlan};
pub use before_operation::{BeforeOperation, OperationPlan};
pub use before_transfer::{BeforeTransfer, CargoTransfer};
pub use before_unmooring::{BeforeUnmooring, Unmooring};
pub use pre_fixture::{FixtureInfo, PreFixture};
pub use sections::{
    blank_checklist, checklist_from_backend, ChecklistItem, DocumentInfo, SignatureBlock,
    SignatureRole, Signatures, TransferInfo, VesselDetails, VesselPair,
};

use sections::WireSignatures;

// ── Form registry ────────────────────────────────────────────────────

/// The checklist forms this toolkit knows, addressed by their slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormKind {
    PreFixture,
    BeforeOperation,
    BeforeMooring,
    BeforeTransfer,
    BeforeUnmooring,
}

impl FormKind {
    pub const ALL: [FormKind; 5] = [
        FormKind::PreFixture,
        FormKind::BeforeOperation,
        FormKind::BeforeMooring,
        FormKind::BeforeTransfer,
        FormKind::BeforeUnmooring,
    ];

    /// Backend proxy path segment, e.g. `ops-ofd-001`.
    pub fn slug(self) -> &'static str {
        match self {
            FormKind::PreFixture => "ops-ofd-001",
            FormKind::BeforeOperation => "ops-ofd-002",
            FormKind::BeforeMooring => "ops-ofd-003",
            FormKind::BeforeTransfer => "ops-ofd-004",
            FormKind::BeforeUnmooring => "ops-ofd-005",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            FormKind::PreFixture => PreFixture::TITLE,
            FormKind::BeforeOperation => BeforeOperation::TITLE,
            FormKind::BeforeMooring => BeforeMooring::TITLE,
            FormKind::BeforeTransfer => BeforeTransfer::TITLE,
            FormKind::BeforeUnmooring => BeforeUnmooring::TITLE,
        }
    }

    pub fn item_count(self) -> usize {
        match self {
            FormKind::PreFixture => PreFixture::ITEMS.len(),
            FormKind::BeforeOperation => BeforeOperation::ITEMS.len(),
            FormKind::BeforeMooring => BeforeMooring::ITEMS.len(),
            FormKind::BeforeTransfer => BeforeTransfer::ITEMS.len(),
            FormKind::BeforeUnmooring => BeforeUnmooring::ITEMS.len(),
        }
    }

    pub fn from_slug(slug: &str) -> Option<FormKind> {
        let slug = slug.trim().trim_matches('/');
        FormKind::ALL
            .into_iter()
            .find(|k| k.slug().eq_ignore_ascii_case(slug))
    }

    /// Bare page path of the form, without query parameters.
    pub fn page_path(self) -> String {
        format!("/forms/{}", self.slug())
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for FormKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormKind::from_slug(s).ok_or_else(|| {
            let known: Vec<&str> = FormKind::ALL.iter().map(|k| k.slug()).collect();
            format!("unknown form '{}' (known forms: {})", s, known.join(", "))
        })
    }
}

// ── Per-form catalog ─────────────────────────────────────────────────

/// Static catalog and details section of one checklist form.
///
/// Implemented by zero-sized marker types ([`PreFixture`], ...).
pub trait ChecklistForm: fmt::Debug + Clone + Copy + PartialEq + Default + 'static {
    const KIND: FormKind;
    const TITLE: &'static str;
    const DOCUMENT: DocumentInfo;
    /// Checklist item wording, in display order.
    const ITEMS: &'static [&'static str];
    /// JSON key of the details section.
    const DETAILS_KEY: &'static str;

    type Details: fmt::Debug + Clone + PartialEq + Default + Serialize;

    /// Read the details section defensively.
    fn details_from_backend(value: &Value) -> Self::Details;
}

// ── Record ───────────────────────────────────────────────────────────

/// One checklist form's complete record.
#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistRecord<F: ChecklistForm> {
    /// As typed; trimmed by [`ChecklistRecord::operation_ref`] before use.
    pub operation_ref: String,
    pub status: Status,
    pub transfer_info: TransferInfo,
    pub vessels: VesselPair,
    pub checklist: Vec<ChecklistItem>,
    pub details: F::Details,
    pub general_remarks: String,
    pub signatures: Signatures,
    pub id: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl<F: ChecklistForm> ChecklistRecord<F> {
    /// The one factory for default records: initial state, create-mode
    /// reset and update-mode clear all start here.
    pub fn defaults(operation_ref: Option<&OperationRef>) -> Self {
        Self {
            operation_ref: operation_ref
                .map(|op| op.as_str().to_string())
                .unwrap_or_default(),
            status: Status::Draft,
            transfer_info: TransferInfo::default(),
            vessels: VesselPair::default(),
            checklist: blank_checklist(F::ITEMS),
            details: F::Details::default(),
            general_remarks: String::new(),
            signatures: Signatures::default(),
            id: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Build a complete record from backend JSON. Accepts the record itself
    /// or a `{ "data": record }` envelope; every missing or mistyped field
    /// takes its default.
    pub fn from_backend(value: &Value) -> Self {
        let value = crate::lenient::unwrap_data(value);
        Self {
            operation_ref: trim_operation_ref(&text(value, "operationRef")).to_string(),
            status: Status::from_backend(&text(value, "status")),
            transfer_info: TransferInfo::from_backend(field(value, "transferInfo")),
            vessels: VesselPair::from_backend(field(value, "vessels")),
            checklist: checklist_from_backend(F::ITEMS, array(value, "checklist")),
            details: F::details_from_backend(field(value, F::DETAILS_KEY)),
            general_remarks: text(value, "generalRemarks"),
            signatures: Signatures::from_backend(field(value, "signatures")),
            id: opt_text(value, "_id").or_else(|| opt_text(value, "id")),
            created_at: opt_text(value, "createdAt"),
            updated_at: opt_text(value, "updatedAt"),
        }
    }

    /// The trimmed operation reference, if any is left after trimming.
    pub fn operation_ref(&self) -> Option<OperationRef> {
        OperationRef::parse(&self.operation_ref)
    }

    /// In-memory JSON view, images as stored.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self.view(false))
    }

    /// Outgoing payload: `status` is always `DRAFT`, data-URL images carry
    /// raw base64 only and server-assigned fields are left out.
    pub fn to_payload(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self.view(true))
    }

    /// Copy with server-assigned fields cleared, for comparing editable content.
    pub fn editable(&self) -> Self {
        Self {
            status: Status::Draft,
            id: None,
            created_at: None,
            updated_at: None,
            ..self.clone()
        }
    }

    fn view(&self, wire: bool) -> RecordView<'_, F::Details> {
        let operation_ref = trim_operation_ref(&self.operation_ref);
        RecordView {
            operation_ref,
            status: if wire { Status::Draft } else { self.status },
            document_info: F::DOCUMENT,
            transfer_info: &self.transfer_info,
            vessels: &self.vessels,
            checklist: &self.checklist,
            details: Keyed {
                key: F::DETAILS_KEY,
                value: &self.details,
            },
            general_remarks: &self.general_remarks,
            signatures: SignaturesView {
                signatures: &self.signatures,
                wire,
            },
            id: if wire { None } else { self.id.as_deref() },
            created_at: if wire { None } else { self.created_at.as_deref() },
            updated_at: if wire { None } else { self.updated_at.as_deref() },
        }
    }
}

impl<F: ChecklistForm> Default for ChecklistRecord<F> {
    fn default() -> Self {
        Self::defaults(None)
    }
}

impl<F: ChecklistForm> Serialize for ChecklistRecord<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.view(false).serialize(serializer)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordView<'a, D: Serialize> {
    operation_ref: &'a str,
    status: Status,
    document_info: DocumentInfo,
    transfer_info: &'a TransferInfo,
    vessels: &'a VesselPair,
    checklist: &'a [ChecklistItem],
    #[serde(flatten)]
    details: Keyed<'a, D>,
    general_remarks: &'a str,
    signatures: SignaturesView<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<&'a str>,
}

/// A single-entry map whose key is only known at runtime.
struct Keyed<'a, D> {
    key: &'static str,
    value: &'a D,
}

impl<D: Serialize> Serialize for Keyed<'_, D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.key, self.value)?;
        map.end()
    }
}

struct SignaturesView<'a> {
    signatures: &'a Signatures,
    wire: bool,
}

impl Serialize for SignaturesView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.wire {
            WireSignatures(self.signatures).serialize(serializer)
        } else {
            self.signatures.serialize(serializer)
        }
    }
}
