//! sts-core: ship-to-ship transfer checklist records and failure wording.
//!
//! Provides the typed record shape shared by every STS checklist form, the
//! static questionnaire catalogs, lenient normalization of backend JSON into
//! complete records, and the error normalizer that turns any failure into a
//! single sentence suitable for an end user.
//!
//! # Public API
//!
//! - [`ChecklistRecord`] -- one form's complete in-memory record
//! - [`ChecklistForm`] / [`FormKind`] -- per-form catalog and slug registry
//! - [`OperationRef`] -- trimmed operation reference
//! - [`SignatureImage`] -- signature/stamp value with display resolution
//! - [`normalize()`] -- the ordered error-to-sentence cascade
//! - [`PageQuery`] -- `operationRef` / `mode` page parameters

pub mod forms;
pub mod lenient;
pub mod normalize;
pub mod opref;
pub mod query;
pub mod signature;
pub mod status;

// ── Convenience re-exports ───────────────────────────────────────────

pub use forms::{
    BeforeMooring, BeforeOperation, BeforeTransfer, BeforeUnmooring, ChecklistForm,
    ChecklistItem, ChecklistRecord, DocumentInfo, FormKind, PreFixture, SignatureBlock,
    SignatureRole, Signatures, TransferInfo, VesselDetails, VesselPair,
};
pub use normalize::{classify, normalize, FailureKind, Outcome};
pub use opref::{trim_operation_ref, OperationRef};
pub use query::{Mode, PageQuery};
pub use signature::SignatureImage;
pub use status::Status;
