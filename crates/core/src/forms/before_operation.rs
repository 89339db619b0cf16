//! STS Checklist 2 – before operation commences.

use serde::Serialize;
use serde_json::Value;

use super::{ChecklistForm, DocumentInfo, FormKind};
use crate::lenient::{flag, text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BeforeOperation;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationPlan {
    pub plan_agreed: bool,
    pub vhf_channel: String,
    pub working_language: String,
    pub weather_forecast_obtained: bool,
    pub risk_assessment_reviewed: bool,
}

impl ChecklistForm for BeforeOperation {
    const KIND: FormKind = FormKind::BeforeOperation;
    const TITLE: &'static str = "STS Checklist 2 – Before operation commences";
    const DOCUMENT: DocumentInfo = DocumentInfo {
        form_no: "OPS-OFD-002",
        revision_no: "1.2",
        issue_date: "2024-02-01",
        approved_by: "Marine Operations Manager",
    };
    const ITEMS: &'static [&'static str] = &[
        "The STS operation plan has been received, read and agreed by both masters",
        "The roles of the POAC and the mooring master have been confirmed",
        "Radio communications have been tested and the working channel agreed",
        "A common working language has been agreed and understood by all involved",
        "Navigational warnings have been broadcast as required",
        "Main engines, steering gear and navigational equipment have been tested",
        "Emergency procedures and emergency signals have been agreed",
        "Fire-fighting and oil spill response equipment is ready for immediate use",
        "Deck watch and engine room manning levels for the operation are adequate",
        "The latest weather forecast has been obtained and is within agreed limits",
        "Personnel have been briefed on the operation and the hazards of the cargo",
        "Lifting equipment to be used has been inspected and is within its SWL",
    ];
    const DETAILS_KEY: &'static str = "operationPlan";

    type Details = OperationPlan;

    fn details_from_backend(value: &Value) -> OperationPlan {
        OperationPlan {
            plan_agreed: flag(value, "planAgreed"),
            vhf_channel: text(value, "vhfChannel"),
            working_language: text(value, "workingLanguage"),
            weather_forecast_obtained: flag(value, "weatherForecastObtained"),
            risk_assessment_reviewed: flag(value, "riskAssessmentReviewed"),
        }
    }
}
