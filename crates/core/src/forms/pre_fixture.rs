//! STS Checklist 1 – pre-fixture information.
//!
//! Exchanged between the ship operators and the STS organiser before the
//! fixture is concluded.

use serde::Serialize;
use serde_json::Value;

use super::{ChecklistForm, DocumentInfo, FormKind};
use crate::lenient::{flag, text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreFixture;

/// Commercial and organisational particulars of the intended transfer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureInfo {
    pub cargo_grade: String,
    pub cargo_quantity: String,
    pub sts_service_provider: String,
    /// Person in overall advisory control (POAC).
    pub poc_name: String,
    pub terms_agreed: bool,
}

impl ChecklistForm for PreFixture {
    const KIND: FormKind = FormKind::PreFixture;
    const TITLE: &'static str = "STS Checklist 1 – Pre-fixture information";
    const DOCUMENT: DocumentInfo = DocumentInfo {
        form_no: "OPS-OFD-001",
        revision_no: "1.2",
        issue_date: "2024-02-01",
        approved_by: "Marine Operations Manager",
    };
    const ITEMS: &'static [&'static str] = &[
        "The ship operator has been informed of the intended STS transfer and has agreed to it",
        "The ship's particulars questionnaire has been exchanged between both ships",
        "The STS service provider and the POAC have been nominated and agreed",
        "The transfer area and any applicable port state or coastal state requirements have been identified",
        "Both ships are compatible for the intended operation (freeboard, manifold, mooring arrangement)",
        "Fenders, hoses and mooring equipment to be supplied have been specified and certified",
        "The cargo to be transferred and its safety data sheet have been exchanged",
        "Both ships hold valid certificates and P&I entries for STS operations",
        "Communication arrangements between ships and the STS organiser have been agreed",
        "Weather and sea state limits for the operation have been agreed",
    ];
    const DETAILS_KEY: &'static str = "fixtureInfo";

    type Details = FixtureInfo;

    fn details_from_backend(value: &Value) -> FixtureInfo {
        FixtureInfo {
            cargo_grade: text(value, "cargoGrade"),
            cargo_quantity: text(value, "cargoQuantity"),
            sts_service_provider: text(value, "stsServiceProvider"),
            poc_name: text(value, "pocName"),
            terms_agreed: flag(value, "termsAgreed"),
        }
    }
}
