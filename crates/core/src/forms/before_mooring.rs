//! STS Checklist 3 – before run-in and mooring.

use serde::Serialize;
use serde_json::Value;

use super::{ChecklistForm, DocumentInfo, FormKind};
use crate::lenient::{flag, text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BeforeMooring;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MooringPlan {
    pub fenders_rigged: bool,
    pub fender_type: String,
    pub number_of_fenders: String,
    pub moorlines_ready: bool,
    /// Knots.
    pub approach_speed: String,
    /// Knots.
    pub wind_speed: String,
    pub sea_state: String,
}

impl ChecklistForm for BeforeMooring {
    const KIND: FormKind = FormKind::BeforeMooring;
    const TITLE: &'static str = "STS Checklist 3 – Before run-in and mooring";
    const DOCUMENT: DocumentInfo = DocumentInfo {
        form_no: "OPS-OFD-003",
        revision_no: "1.1",
        issue_date: "2024-02-01",
        approved_by: "Marine Operations Manager",
    };
    const ITEMS: &'static [&'static str] = &[
        "Checklist 2 has been completed and all items confirmed",
        "Primary fenders are rigged and secured in the agreed positions",
        "Secondary fenders are available and ready for use",
        "Mooring lines, messengers and rat guards are prepared and ready",
        "Mooring winches and windlasses have been tested",
        "Heaving lines and line-throwing arrangements are ready on both ships",
        "Overside obstructions (gangways, derricks, lifeboats) are clear",
        "Cargo manifolds on the mooring side are clear and blanked",
        "Weather, sea state and visibility are within the agreed limits",
        "Engine and steering are on standby and the anchor is ready for letting go",
        "Mooring teams are in position and in communication with the bridge",
    ];
    const DETAILS_KEY: &'static str = "mooringPlan";

    type Details = MooringPlan;

    fn details_from_backend(value: &Value) -> MooringPlan {
        MooringPlan {
            fenders_rigged: flag(value, "fendersRigged"),
            fender_type: text(value, "fenderType"),
            number_of_fenders: text(value, "numberOfFenders"),
            moorlines_ready: flag(value, "moorlinesReady"),
            approach_speed: text(value, "approachSpeed"),
            wind_speed: text(value, "windSpeed"),
            sea_state: text(value, "seaState"),
        }
    }
}
