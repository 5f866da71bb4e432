use release_qc_core::{FieldPath, Section};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks navigation past the owning step and blocks submission
    Error,
    /// Advisory only
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// One reported validation issue, tied to a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFinding {
    pub field: FieldPath,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Id of the rule that produced this finding
    pub rule: &'static str,
}

impl ValidationFinding {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.field, self.message)
    }
}

/// Outcome of one validation pass over a snapshot.
///
/// `findings` holds every severity in rule-table order. It is serialized
/// as `errors` for the wizard pages that read that key; filter by severity
/// through [`by_severity`](Self::by_severity) rather than by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QcValidationResults {
    pub is_valid: bool,
    #[serde(rename = "errors")]
    pub findings: Vec<ValidationFinding>,
}

impl QcValidationResults {
    pub fn from_findings(findings: Vec<ValidationFinding>) -> Self {
        let is_valid = !findings.iter().any(ValidationFinding::is_error);
        Self { is_valid, findings }
    }

    pub fn by_severity(&self, severity: Severity) -> impl Iterator<Item = &ValidationFinding> {
        self.findings.iter().filter(move |f| f.severity == severity)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.by_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.by_severity(Severity::Warning)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.by_severity(severity).count()
    }

    pub fn for_section(&self, section: Section) -> impl Iterator<Item = &ValidationFinding> {
        self.findings
            .iter()
            .filter(move |f| f.field.section() == section)
    }

    pub fn for_field(&self, field: FieldPath) -> impl Iterator<Item = &ValidationFinding> {
        self.findings.iter().filter(move |f| f.field == field)
    }

    /// Append findings produced outside the rule table (asset inspection).
    pub fn merge(&mut self, extra: Vec<ValidationFinding>) {
        self.findings.extend(extra);
        self.is_valid = !self.findings.iter().any(ValidationFinding::is_error);
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(field: FieldPath, severity: Severity) -> ValidationFinding {
        ValidationFinding {
            field,
            severity,
            message: "test".to_string(),
            suggestion: None,
            rule: "test-rule",
        }
    }

    #[test]
    fn test_is_valid_ignores_warnings() {
        let results = QcValidationResults::from_findings(vec![finding(
            FieldPath::MarketingMoodTags,
            Severity::Warning,
        )]);
        assert!(results.is_valid);
        assert_eq!(results.count(Severity::Warning), 1);
        assert_eq!(results.count(Severity::Error), 0);
    }

    #[test]
    fn test_by_severity_keeps_order() {
        let results = QcValidationResults::from_findings(vec![
            finding(FieldPath::ArtistName, Severity::Error),
            finding(FieldPath::ArtistTranslations, Severity::Warning),
            finding(FieldPath::AlbumTitle, Severity::Error),
        ]);
        assert!(!results.is_valid);
        let errors: Vec<_> = results.errors().map(|f| f.field).collect();
        assert_eq!(errors, vec![FieldPath::ArtistName, FieldPath::AlbumTitle]);
    }

    #[test]
    fn test_merge_recomputes_validity() {
        let mut results = QcValidationResults::from_findings(vec![]);
        assert!(results.is_valid);
        results.merge(vec![finding(FieldPath::FilesCoverArt, Severity::Error)]);
        assert!(!results.is_valid);
        assert_eq!(results.for_section(Section::Files).count(), 1);
    }

    #[test]
    fn test_serializes_findings_under_errors_key() {
        let results = QcValidationResults::from_findings(vec![finding(
            FieldPath::TrackTitle(0),
            Severity::Error,
        )]);
        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(json["isValid"], false);
        assert_eq!(json["errors"][0]["field"], "tracks[0].title");
        assert_eq!(json["errors"][0]["severity"], "error");
        assert!(json["errors"][0].get("suggestion").is_none());
    }
}
