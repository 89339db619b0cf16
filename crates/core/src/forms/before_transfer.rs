//! STS Checklist 4 – before cargo transfer.

use serde::Serialize;
use serde_json::Value;

use super::{ChecklistForm, DocumentInfo, FormKind};
use crate::lenient::{flag, text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BeforeTransfer;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CargoTransfer {
    pub hoses_connected: bool,
    /// Nominal bore, inches.
    pub hose_size: String,
    pub hose_count: String,
    /// m³/h.
    pub max_transfer_rate: String,
    pub emergency_shutdown_tested: bool,
    /// bar.
    pub manifold_pressure: String,
}

impl ChecklistForm for BeforeTransfer {
    const KIND: FormKind = FormKind::BeforeTransfer;
    const TITLE: &'static str = "STS Checklist 4 – Before cargo transfer";
    const DOCUMENT: DocumentInfo = DocumentInfo {
        form_no: "OPS-OFD-004",
        revision_no: "1.3",
        issue_date: "2024-05-15",
        approved_by: "Marine Operations Manager",
    };
    const ITEMS: &'static [&'static str] = &[
        "Ships are securely moored and moorings are being monitored",
        "Cargo hoses are in good condition, tested and properly supported",
        "Hose connections are fully bolted or coupled with gaskets in place",
        "Unused manifold connections are blanked and fully bolted",
        "Insulating flanges or non-conductive hose sections are in place",
        "Scuppers are plugged and drip trays are in position",
        "The emergency shutdown procedure has been agreed and tested",
        "Maximum transfer rates and topping-off rates have been agreed",
        "Cargo and ballast plans have been exchanged and agreed",
        "Inert gas system is operational and tank atmospheres are within limits",
        "Smoking restrictions and designated smoking areas are enforced",
        "External doors and ports in the accommodation are closed",
        "Portable VHF/UHF sets are intrinsically safe",
    ];
    const DETAILS_KEY: &'static str = "cargoTransfer";

    type Details = CargoTransfer;

    fn details_from_backend(value: &Value) -> CargoTransfer {
        CargoTransfer {
            hoses_connected: flag(value, "hosesConnected"),
            hose_size: text(value, "hoseSize"),
            hose_count: text(value, "hoseCount"),
            max_transfer_rate: text(value, "maxTransferRate"),
            emergency_shutdown_tested: flag(value, "emergencyShutdownTested"),
            manifold_pressure: text(value, "manifoldPressure"),
        }
    }
}
