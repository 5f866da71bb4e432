//! Wizard step ownership and navigation gating.

use crate::finding::{QcValidationResults, ValidationFinding};
use release_qc_core::Section;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    ArtistInformation,
    AlbumInformation,
    TrackInformation,
    FileUpload,
    DistributionSettings,
    ReviewAndSubmit,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::ArtistInformation,
        Step::AlbumInformation,
        Step::TrackInformation,
        Step::FileUpload,
        Step::DistributionSettings,
        Step::ReviewAndSubmit,
    ];

    pub fn first() -> Step {
        Step::ArtistInformation
    }

    /// Zero-based position in the wizard.
    pub fn index(self) -> usize {
        Step::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Step> {
        Step::ALL.get(index).copied()
    }

    pub fn next(self) -> Option<Step> {
        Step::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Step> {
        self.index().checked_sub(1).and_then(Step::from_index)
    }

    /// Snapshot sections whose findings this step answers for.
    pub fn owned_sections(self) -> &'static [Section] {
        match self {
            Step::ArtistInformation => &[Section::Artist],
            Step::AlbumInformation => &[Section::Album],
            Step::TrackInformation => &[Section::Tracks],
            Step::FileUpload => &[Section::Files],
            Step::DistributionSettings => &[Section::Distribution, Section::Marketing],
            Step::ReviewAndSubmit => &Section::ALL,
        }
    }

    pub fn owns(self, finding: &ValidationFinding) -> bool {
        self.owned_sections().contains(&finding.field.section())
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::ArtistInformation => "Artist Information",
            Step::AlbumInformation => "Album Information",
            Step::TrackInformation => "Track Information",
            Step::FileUpload => "File Upload",
            Step::DistributionSettings => "Distribution Settings",
            Step::ReviewAndSubmit => "Review & Submit",
        }
    }

    /// Parse a CLI-style step name (`artist`, `album`, `tracks`, `files`,
    /// `distribution`, `review`) or a 1-based step number.
    pub fn parse(input: &str) -> Option<Step> {
        let lower = input.trim().to_lowercase();
        if let Ok(n) = lower.parse::<usize>() {
            return n.checked_sub(1).and_then(Step::from_index);
        }
        match lower.as_str() {
            "artist" | "artist-information" => Some(Step::ArtistInformation),
            "album" | "album-information" => Some(Step::AlbumInformation),
            "tracks" | "track-information" => Some(Step::TrackInformation),
            "files" | "file-upload" => Some(Step::FileUpload),
            "distribution" | "distribution-settings" => Some(Step::DistributionSettings),
            "review" | "review-and-submit" => Some(Step::ReviewAndSubmit),
            _ => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Error findings owned by `step`, in result order.
pub fn blocking_findings(step: Step, results: &QcValidationResults) -> Vec<&ValidationFinding> {
    results
        .errors()
        .filter(|finding| step.owns(finding))
        .collect()
}

/// Forward navigation is allowed unless an error falls in the step's own
/// sections. Findings owned by later steps never block.
pub fn can_proceed(step: Step, results: &QcValidationResults) -> bool {
    results.errors().all(|finding| !step.owns(finding))
}

/// Backward navigation ignores findings entirely.
pub fn can_go_back(step: Step) -> bool {
    step.previous().is_some()
}

/// The final submit is gated on the whole snapshot.
pub fn can_submit(results: &QcValidationResults) -> bool {
    results.is_valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::Severity;
    use release_qc_core::FieldPath;

    fn results(findings: &[(FieldPath, Severity)]) -> QcValidationResults {
        QcValidationResults::from_findings(
            findings
                .iter()
                .map(|(field, severity)| ValidationFinding {
                    field: *field,
                    severity: *severity,
                    message: "test".to_string(),
                    suggestion: None,
                    rule: "test-rule",
                })
                .collect(),
        )
    }

    #[test]
    fn test_error_blocks_owning_step_only() {
        let results = results(&[(FieldPath::ArtistName, Severity::Error)]);
        assert!(!can_proceed(Step::ArtistInformation, &results));
        assert!(can_proceed(Step::AlbumInformation, &results));
        assert!(can_proceed(Step::FileUpload, &results));
        assert!(!can_proceed(Step::ReviewAndSubmit, &results));
    }

    #[test]
    fn test_warnings_never_block() {
        let results = results(&[(FieldPath::ArtistTranslations, Severity::Warning)]);
        for step in Step::ALL {
            assert!(can_proceed(step, &results));
        }
        assert!(can_submit(&results));
    }

    #[test]
    fn test_marketing_belongs_to_distribution_step() {
        let results = results(&[(FieldPath::MarketingDescription, Severity::Error)]);
        assert!(!can_proceed(Step::DistributionSettings, &results));
        assert_eq!(blocking_findings(Step::DistributionSettings, &results).len(), 1);
    }

    #[test]
    fn test_every_section_has_an_editing_step() {
        for section in Section::ALL {
            let owners = Step::ALL
                .iter()
                .filter(|s| **s != Step::ReviewAndSubmit)
                .filter(|s| s.owned_sections().contains(&section))
                .count();
            assert_eq!(owners, 1, "{} must belong to exactly one step", section);
        }
    }

    #[test]
    fn test_navigation_order() {
        assert_eq!(Step::first().next(), Some(Step::AlbumInformation));
        assert_eq!(Step::ReviewAndSubmit.next(), None);
        assert_eq!(Step::ArtistInformation.previous(), None);
        assert!(!can_go_back(Step::ArtistInformation));
        assert!(can_go_back(Step::TrackInformation));
    }

    #[test]
    fn test_parse_step() {
        assert_eq!(Step::parse("artist"), Some(Step::ArtistInformation));
        assert_eq!(Step::parse("3"), Some(Step::TrackInformation));
        assert_eq!(Step::parse("Review"), Some(Step::ReviewAndSubmit));
        assert_eq!(Step::parse("0"), None);
        assert_eq!(Step::parse("7"), None);
        assert_eq!(Step::parse("payment"), None);
    }
}
