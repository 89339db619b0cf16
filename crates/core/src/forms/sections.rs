//! Record sections shared by every checklist form.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::lenient::{field, flag, iso_date, text};
use crate::signature::SignatureImage;

/// Controlled-document header printed on every form. Static per form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub form_no: &'static str,
    pub revision_no: &'static str,
    pub issue_date: &'static str,
    pub approved_by: &'static str,
}

/// When and where the transfer takes place.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferInfo {
    /// ISO `YYYY-MM-DD`.
    pub date: String,
    pub time: String,
    pub location: String,
    pub sts_superintendent: String,
}

impl TransferInfo {
    pub fn from_backend(value: &Value) -> Self {
        Self {
            date: iso_date(value, "date"),
            time: text(value, "time"),
            location: text(value, "location"),
            sts_superintendent: text(value, "stsSuperintendent"),
        }
    }
}

/// Particulars of one of the two ships.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VesselDetails {
    pub ship_name: String,
    pub imo_number: String,
    pub flag: String,
    pub call_sign: String,
    pub master_name: String,
    pub dwt: String,
    pub loa: String,
    pub beam: String,
}

impl VesselDetails {
    pub fn from_backend(value: &Value) -> Self {
        Self {
            ship_name: text(value, "shipName"),
            imo_number: text(value, "imoNumber"),
            flag: text(value, "flag"),
            call_sign: text(value, "callSign"),
            master_name: text(value, "masterName"),
            dwt: text(value, "dwt"),
            loa: text(value, "loa"),
            beam: text(value, "beam"),
        }
    }
}

/// Constant heading ship (CHS) and manoeuvring ship (MS).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VesselPair {
    pub constant_heading: VesselDetails,
    pub manoeuvring: VesselDetails,
}

impl VesselPair {
    pub fn from_backend(value: &Value) -> Self {
        Self {
            constant_heading: VesselDetails::from_backend(field(value, "constantHeading")),
            manoeuvring: VesselDetails::from_backend(field(value, "manoeuvring")),
        }
    }
}

/// One checklist row, answered separately for each ship.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub item_no: u32,
    pub description: String,
    pub constant_heading: bool,
    pub manoeuvring: bool,
    pub remarks: String,
}

impl ChecklistItem {
    pub fn blank(item_no: u32, description: &str) -> Self {
        Self {
            item_no,
            description: description.to_string(),
            ..Self::default()
        }
    }
}

/// Build the fixed-size item list for a catalog, taking answers positionally
/// from `rows`. Extra rows are ignored, missing rows are blank. Descriptions
/// always come from the catalog.
pub fn checklist_from_backend(catalog: &[&str], rows: &[Value]) -> Vec<ChecklistItem> {
    catalog
        .iter()
        .enumerate()
        .map(|(idx, description)| {
            let mut item = ChecklistItem::blank(idx as u32 + 1, description);
            if let Some(row) = rows.get(idx) {
                item.constant_heading = flag(row, "constantHeading");
                item.manoeuvring = flag(row, "manoeuvring");
                item.remarks = text(row, "remarks");
            }
            item
        })
        .collect()
}

/// Blank item list for a catalog.
pub fn blank_checklist(catalog: &[&str]) -> Vec<ChecklistItem> {
    checklist_from_backend(catalog, &[])
}

/// Name, rank and signature of one master.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureBlock {
    pub name: String,
    pub rank: String,
    /// ISO `YYYY-MM-DD`.
    pub date: String,
    pub signature: SignatureImage,
}

impl SignatureBlock {
    pub fn from_backend(value: &Value) -> Self {
        Self {
            name: text(value, "name"),
            rank: text(value, "rank"),
            date: iso_date(value, "date"),
            signature: SignatureImage::classify(&text(value, "signature")),
        }
    }
}

/// Which image field a captured signature goes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureRole {
    ConstantHeading,
    Manoeuvring,
    Stamp,
}

impl SignatureRole {
    pub const ALL: [SignatureRole; 3] = [
        SignatureRole::ConstantHeading,
        SignatureRole::Manoeuvring,
        SignatureRole::Stamp,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SignatureRole::ConstantHeading => "constantHeading",
            SignatureRole::Manoeuvring => "manoeuvring",
            SignatureRole::Stamp => "stamp",
        }
    }

    /// Accepts the JSON key or the usual `chs` / `ms` abbreviations.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "constantheading" | "constant-heading" | "chs" => Some(SignatureRole::ConstantHeading),
            "manoeuvring" | "maneuvering" | "ms" => Some(SignatureRole::Manoeuvring),
            "stamp" => Some(SignatureRole::Stamp),
            _ => None,
        }
    }
}

/// Both masters' signatures and the company stamp.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Signatures {
    pub constant_heading: SignatureBlock,
    pub manoeuvring: SignatureBlock,
    pub stamp: SignatureImage,
}

impl Signatures {
    pub fn from_backend(value: &Value) -> Self {
        Self {
            constant_heading: SignatureBlock::from_backend(field(value, "constantHeading")),
            manoeuvring: SignatureBlock::from_backend(field(value, "manoeuvring")),
            stamp: SignatureImage::classify(&text(value, "stamp")),
        }
    }

    pub fn image(&self, role: SignatureRole) -> &SignatureImage {
        match role {
            SignatureRole::ConstantHeading => &self.constant_heading.signature,
            SignatureRole::Manoeuvring => &self.manoeuvring.signature,
            SignatureRole::Stamp => &self.stamp,
        }
    }

    pub fn image_mut(&mut self, role: SignatureRole) -> &mut SignatureImage {
        match role {
            SignatureRole::ConstantHeading => &mut self.constant_heading.signature,
            SignatureRole::Manoeuvring => &mut self.manoeuvring.signature,
            SignatureRole::Stamp => &mut self.stamp,
        }
    }
}

/// Serializes [`Signatures`] in wire form: data URLs become raw base64.
pub(crate) struct WireSignatures<'a>(pub(crate) &'a Signatures);

struct WireBlock<'a>(&'a SignatureBlock);

impl Serialize for WireBlock<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("SignatureBlock", 4)?;
        s.serialize_field("name", &self.0.name)?;
        s.serialize_field("rank", &self.0.rank)?;
        s.serialize_field("date", &self.0.date)?;
        s.serialize_field("signature", self.0.signature.to_wire())?;
        s.end()
    }
}

impl Serialize for WireSignatures<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Signatures", 3)?;
        s.serialize_field("constantHeading", &WireBlock(&self.0.constant_heading))?;
        s.serialize_field("manoeuvring", &WireBlock(&self.0.manoeuvring))?;
        s.serialize_field("stamp", self.0.stamp.to_wire())?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CATALOG: &[&str] = &["First", "Second", "Third"];

    #[test]
    fn checklist_is_padded_to_catalog_size() {
        let rows = vec![json!({"constantHeading": true, "remarks": "ok"})];
        let items = checklist_from_backend(CATALOG, &rows);
        assert_eq!(items.len(), 3);
        assert!(items[0].constant_heading);
        assert!(!items[0].manoeuvring);
        assert_eq!(items[0].remarks, "ok");
        assert_eq!(items[2], ChecklistItem::blank(3, "Third"));
    }

    #[test]
    fn checklist_is_truncated_and_descriptions_come_from_catalog() {
        let rows: Vec<Value> = (0..5)
            .map(|i| json!({"description": format!("tampered {i}"), "manoeuvring": "yes"}))
            .collect();
        let items = checklist_from_backend(CATALOG, &rows);
        assert_eq!(items.len(), 3);
        assert_eq!(items[1].description, "Second");
        assert_eq!(items[1].item_no, 2);
        assert!(items.iter().all(|i| i.manoeuvring));
    }

    #[test]
    fn signature_roles_parse_abbreviations() {
        assert_eq!(SignatureRole::parse("CHS"), Some(SignatureRole::ConstantHeading));
        assert_eq!(SignatureRole::parse("manoeuvring"), Some(SignatureRole::Manoeuvring));
        assert_eq!(SignatureRole::parse("stamp"), Some(SignatureRole::Stamp));
        assert_eq!(SignatureRole::parse("witness"), None);
    }

    #[test]
    fn wire_signatures_strip_data_urls() {
        let mut sigs = Signatures::default();
        sigs.constant_heading.name = "Capt. Lindqvist".into();
        sigs.constant_heading.signature = SignatureImage::from_base64("image/png", "QUJD");
        sigs.stamp = SignatureImage::classify("/uploads/stamp.png");

        let wire = serde_json::to_value(WireSignatures(&sigs)).unwrap();
        assert_eq!(wire["constantHeading"]["signature"], "QUJD");
        assert_eq!(wire["constantHeading"]["name"], "Capt. Lindqvist");
        assert_eq!(wire["manoeuvring"]["signature"], "");
        assert_eq!(wire["stamp"], "/uploads/stamp.png");

        let display = serde_json::to_value(&sigs).unwrap();
        assert_eq!(
            display["constantHeading"]["signature"],
            "data:image/png;base64,QUJD"
        );
    }
}
