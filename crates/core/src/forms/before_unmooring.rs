//! STS Checklist 5 – before unmooring.

use serde::Serialize;
use serde_json::Value;

use super::{ChecklistForm, DocumentInfo, FormKind};
use crate::lenient::{flag, text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BeforeUnmooring;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Unmooring {
    pub hoses_drained: bool,
    pub hoses_disconnected: bool,
    pub documents_exchanged: bool,
    pub quantity_transferred: String,
    pub unmooring_time: String,
}

impl ChecklistForm for BeforeUnmooring {
    const KIND: FormKind = FormKind::BeforeUnmooring;
    const TITLE: &'static str = "STS Checklist 5 – Before unmooring";
    const DOCUMENT: DocumentInfo = DocumentInfo {
        form_no: "OPS-OFD-005",
        revision_no: "1.1",
        issue_date: "2024-02-01",
        approved_by: "Marine Operations Manager",
    };
    const ITEMS: &'static [&'static str] = &[
        "Cargo hoses have been drained and purged",
        "Cargo hoses have been disconnected and manifolds blanked",
        "Hoses and lifting gear have been returned and secured",
        "Cargo documents have been completed and exchanged",
        "Overside obstructions are clear for unmooring",
        "The unmooring sequence has been agreed between both masters",
        "Engine and steering are ready and have been tested",
        "Mooring teams are in position and in communication with the bridge",
        "Fenders are secured for the separation manoeuvre",
        "Relevant authorities have been informed of the completion of the transfer",
    ];
    const DETAILS_KEY: &'static str = "unmooring";

    type Details = Unmooring;

    fn details_from_backend(value: &Value) -> Unmooring {
        Unmooring {
            hoses_drained: flag(value, "hosesDrained"),
            hoses_disconnected: flag(value, "hosesDisconnected"),
            documents_exchanged: flag(value, "documentsExchanged"),
            quantity_transferred: text(value, "quantityTransferred"),
            unmooring_time: text(value, "unmooringTime"),
        }
    }
}
