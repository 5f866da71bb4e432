//! Quality-control validation for release submissions.
//!
//! The engine is a pure function of a [`SubmissionSnapshot`] and a
//! [`ValidationContext`]; step gating and the findings report only read
//! its results. Asset inspection is the one part that touches the disk.
//!
//! [`SubmissionSnapshot`]: release_qc_core::SubmissionSnapshot

pub mod assets;
pub mod engine;
pub mod finding;
pub mod identifiers;
pub mod report;
pub mod rules;
pub mod steps;
pub mod text;

pub use assets::inspect_assets;
pub use engine::{ValidationContext, validate_sections, validate_submission, validate_with};
pub use finding::{QcValidationResults, Severity, ValidationFinding};
pub use identifiers::{
    CodeKind, format_identifier, generate_ean, generate_upc, validate_ean, validate_upc,
};
pub use report::{FindingsReport, StatusBadge, apply_suggestion};
pub use steps::{Step, blocking_findings, can_go_back, can_proceed, can_submit};
