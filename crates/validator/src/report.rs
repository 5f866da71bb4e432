//! Consumer side of validation results: grouping, dismissal, rendering and
//! the auto-fix hook.

use crate::finding::{QcValidationResults, Severity, ValidationFinding};
use release_qc_core::{AlbumType, Error, FieldPath, Result, SubmissionSnapshot};
use std::collections::BTreeSet;
use std::fmt;

/// Findings shown in compact mode before the rest are summarized
const COMPACT_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBadge {
    Passed,
    Warnings(usize),
    Failed(usize),
}

impl fmt::Display for StatusBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusBadge::Passed => write!(f, "✅ passed"),
            StatusBadge::Warnings(n) => write!(f, "⚠️  warnings ({})", n),
            StatusBadge::Failed(n) => write!(f, "❌ failed ({})", n),
        }
    }
}

/// A view over one validation pass, errors first.
///
/// Indices used by [`dismiss`](Self::dismiss) are positions in
/// `results.findings`, so they stay valid however the report is grouped.
#[derive(Debug, Clone)]
pub struct FindingsReport<'a> {
    results: &'a QcValidationResults,
    dismissed: BTreeSet<usize>,
}

impl<'a> FindingsReport<'a> {
    pub fn new(results: &'a QcValidationResults) -> Self {
        Self {
            results,
            dismissed: BTreeSet::new(),
        }
    }

    /// Hide a warning. Errors cannot be dismissed; returns whether the
    /// finding is now hidden.
    pub fn dismiss(&mut self, index: usize) -> bool {
        match self.results.findings.get(index) {
            Some(finding) if finding.severity == Severity::Warning => {
                self.dismissed.insert(index);
                true
            }
            _ => false,
        }
    }

    pub fn is_dismissed(&self, index: usize) -> bool {
        self.dismissed.contains(&index)
    }

    /// Findings of one severity that are still shown, with their indices.
    pub fn group(&self, severity: Severity) -> Vec<(usize, &'a ValidationFinding)> {
        self.results
            .findings
            .iter()
            .enumerate()
            .filter(|(i, f)| f.severity == severity && !self.dismissed.contains(i))
            .collect()
    }

    /// Every shown finding: errors, then warnings, table order inside each.
    pub fn visible(&self) -> Vec<(usize, &'a ValidationFinding)> {
        let mut out = self.group(Severity::Error);
        out.extend(self.group(Severity::Warning));
        out
    }

    pub fn badge(&self) -> StatusBadge {
        let errors = self.group(Severity::Error).len();
        let warnings = self.group(Severity::Warning).len();
        if errors > 0 {
            StatusBadge::Failed(errors)
        } else if warnings > 0 {
            StatusBadge::Warnings(warnings)
        } else {
            StatusBadge::Passed
        }
    }

    pub fn render_compact(&self) -> String {
        let visible = self.visible();
        let mut out = self.badge().to_string();
        for (_, finding) in visible.iter().take(COMPACT_LIMIT) {
            out.push_str(&format!(
                "\n  {} {}: {}",
                marker(finding),
                finding.field,
                finding.message
            ));
        }
        if visible.len() > COMPACT_LIMIT {
            out.push_str(&format!("\n  ... and {} more", visible.len() - COMPACT_LIMIT));
        }
        out
    }
}

fn marker(finding: &ValidationFinding) -> &'static str {
    match finding.severity {
        Severity::Error => "✗",
        Severity::Warning => "⚠",
    }
}

impl fmt::Display for FindingsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.badge())?;
        for (severity, heading) in [(Severity::Error, "Errors"), (Severity::Warning, "Warnings")] {
            let group = self.group(severity);
            if group.is_empty() {
                continue;
            }
            writeln!(f, "\n{} ({}):", heading, group.len())?;
            for (_, finding) in group {
                writeln!(f, "  {} {}: {}", marker(finding), finding.field, finding.message)?;
                if let Some(suggestion) = &finding.suggestion {
                    writeln!(f, "      → suggestion: {}", suggestion)?;
                }
            }
        }
        Ok(())
    }
}

/// Produce a new snapshot with the finding's suggestion written into its
/// field. The input snapshot is left untouched.
pub fn apply_suggestion(
    snapshot: &SubmissionSnapshot,
    finding: &ValidationFinding,
) -> Result<SubmissionSnapshot> {
    let Some(suggestion) = &finding.suggestion else {
        return Err(Error::UnsupportedFix(format!(
            "{} has no suggested value",
            finding.field
        )));
    };

    let mut fixed = snapshot.clone();
    match finding.field {
        FieldPath::AlbumType => {
            let album_type = parse_album_type(suggestion).ok_or_else(|| {
                Error::InvalidData(format!("'{}' is not an album type", suggestion))
            })?;
            fixed.album.album_type = Some(album_type);
        }
        FieldPath::AlbumParentalAdvisory => {
            fixed.album.parental_advisory = suggestion.trim() == "true";
        }
        FieldPath::TrackArtists(i) => {
            let track = fixed.tracks.get_mut(i).ok_or_else(|| out_of_range(finding.field))?;
            track.artists = vec![suggestion.clone()];
        }
        field => {
            let target = text_field_mut(&mut fixed, field)?;
            *target = suggestion.clone();
        }
    }
    Ok(fixed)
}

fn parse_album_type(value: &str) -> Option<AlbumType> {
    match value.trim().to_lowercase().as_str() {
        "single" => Some(AlbumType::Single),
        "ep" => Some(AlbumType::Ep),
        "album" => Some(AlbumType::Album),
        "compilation" => Some(AlbumType::Compilation),
        _ => None,
    }
}

fn out_of_range(field: FieldPath) -> Error {
    Error::InvalidData(format!("{} does not exist in this submission", field))
}

fn text_field_mut(snapshot: &mut SubmissionSnapshot, field: FieldPath) -> Result<&mut String> {
    let artist = &mut snapshot.artist;
    let album = &mut snapshot.album;
    let target = match field {
        FieldPath::ArtistName => Some(&mut artist.name),
        FieldPath::ArtistDisplayName => Some(&mut artist.display_name),
        FieldPath::ArtistType => Some(&mut artist.artist_type),
        FieldPath::ArtistLabelName => Some(&mut artist.label_name),
        FieldPath::ArtistCountry => Some(&mut artist.country),
        FieldPath::ArtistTranslation(i) => artist.translations.get_mut(i).map(|t| &mut t.value),
        FieldPath::AlbumTitle => Some(&mut album.title),
        FieldPath::AlbumTitleTranslation(i) => {
            album.title_translations.get_mut(i).map(|t| &mut t.value)
        }
        FieldPath::AlbumReleaseDate => Some(&mut album.release_date),
        FieldPath::AlbumOriginalReleaseDate => Some(&mut album.original_release_date),
        FieldPath::AlbumReleaseTime => Some(&mut album.release_time),
        FieldPath::AlbumTimezone => Some(&mut album.timezone),
        FieldPath::AlbumCopyrightYear => Some(&mut album.copyright_year),
        FieldPath::AlbumCopyrightHolder => Some(&mut album.copyright_holder),
        FieldPath::AlbumProductionYear => Some(&mut album.production_year),
        FieldPath::AlbumProductionHolder => Some(&mut album.production_holder),
        FieldPath::AlbumUpc => Some(&mut album.upc),
        FieldPath::AlbumEan => Some(&mut album.ean),
        FieldPath::AlbumCatalogNumber => Some(&mut album.catalog_number),
        FieldPath::TrackTitle(i) => snapshot.tracks.get_mut(i).map(|t| &mut t.title),
        FieldPath::TrackTranslation(i, j) => snapshot
            .tracks
            .get_mut(i)
            .and_then(|t| t.translations.get_mut(j))
            .map(|t| &mut t.value),
        FieldPath::TrackVersion(i) => snapshot.tracks.get_mut(i).map(|t| &mut t.version),
        FieldPath::TrackFeaturing(i) => snapshot.tracks.get_mut(i).map(|t| &mut t.featuring),
        FieldPath::TrackIsrc(i) => snapshot.tracks.get_mut(i).map(|t| &mut t.isrc),
        FieldPath::TrackLanguage(i) => snapshot.tracks.get_mut(i).map(|t| &mut t.language),
        FieldPath::TrackGenre(i) => snapshot.tracks.get_mut(i).map(|t| &mut t.genre),
        FieldPath::TrackSubgenre(i) => snapshot.tracks.get_mut(i).map(|t| &mut t.subgenre),
        FieldPath::FilesCoverArt => Some(&mut snapshot.files.cover_art),
        FieldPath::FilesAudioFile(i) => snapshot.files.audio.get_mut(i),
        FieldPath::DistributionPriceType => Some(&mut snapshot.distribution.price_type),
        FieldPath::MarketingDescription => Some(&mut snapshot.marketing.description),
        FieldPath::MarketingAngle => Some(&mut snapshot.marketing.marketing_angle),
        other => {
            return Err(Error::UnsupportedFix(format!(
                "{} cannot be fixed automatically",
                other
            )));
        }
    };
    target.ok_or_else(|| out_of_range(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use release_qc_core::TrackInfo;

    fn finding(
        field: FieldPath,
        severity: Severity,
        suggestion: Option<&str>,
    ) -> ValidationFinding {
        ValidationFinding {
            field,
            severity,
            message: format!("problem with {}", field),
            suggestion: suggestion.map(str::to_string),
            rule: "test-rule",
        }
    }

    fn mixed() -> QcValidationResults {
        QcValidationResults::from_findings(vec![
            finding(FieldPath::ArtistTranslations, Severity::Warning, None),
            finding(FieldPath::AlbumTitle, Severity::Error, None),
            finding(FieldPath::MarketingMoodTags, Severity::Warning, None),
            finding(FieldPath::TrackTitle(0), Severity::Error, Some("Blueming")),
        ])
    }

    #[test]
    fn test_errors_listed_first_in_table_order() {
        let results = mixed();
        let report = FindingsReport::new(&results);
        let order: Vec<usize> = report.visible().iter().map(|(i, _)| *i).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_only_warnings_can_be_dismissed() {
        let results = mixed();
        let mut report = FindingsReport::new(&results);
        assert!(!report.dismiss(1));
        assert!(report.dismiss(0));
        assert!(!report.dismiss(99));
        assert!(report.is_dismissed(0));
        assert_eq!(report.visible().len(), 3);
        assert_eq!(report.badge(), StatusBadge::Failed(2));
    }

    #[test]
    fn test_badge_transitions() {
        let clean = QcValidationResults::from_findings(vec![]);
        assert_eq!(FindingsReport::new(&clean).badge(), StatusBadge::Passed);

        let warned = QcValidationResults::from_findings(vec![finding(
            FieldPath::MarketingMoodTags,
            Severity::Warning,
            None,
        )]);
        let mut report = FindingsReport::new(&warned);
        assert_eq!(report.badge(), StatusBadge::Warnings(1));
        report.dismiss(0);
        assert_eq!(report.badge(), StatusBadge::Passed);
    }

    #[test]
    fn test_full_rendering_shows_suggestions() {
        let results = mixed();
        let text = FindingsReport::new(&results).to_string();
        assert!(text.starts_with("❌ failed (2)"));
        assert!(text.contains("Errors (2):"));
        assert!(text.contains("Warnings (2):"));
        assert!(text.contains("tracks[0].title"));
        assert!(text.contains("→ suggestion: Blueming"));
    }

    #[test]
    fn test_compact_rendering_truncates() {
        let results = mixed();
        let text = FindingsReport::new(&results).render_compact();
        assert_eq!(text.lines().count(), 1 + COMPACT_LIMIT + 1);
        assert!(text.ends_with("... and 1 more"));
    }

    #[test]
    fn test_apply_suggestion_writes_new_snapshot() {
        let mut snapshot = SubmissionSnapshot::empty();
        snapshot.tracks.push(TrackInfo {
            title: "blueming ".to_string(),
            ..TrackInfo::default()
        });
        let fix = finding(FieldPath::TrackTitle(0), Severity::Error, Some("Blueming"));
        let fixed = apply_suggestion(&snapshot, &fix).unwrap();
        assert_eq!(fixed.tracks[0].title, "Blueming");
        assert_eq!(snapshot.tracks[0].title, "blueming ");
    }

    #[test]
    fn test_apply_suggestion_album_type() {
        let fix = finding(FieldPath::AlbumType, Severity::Error, Some("EP"));
        let fixed = apply_suggestion(&SubmissionSnapshot::empty(), &fix).unwrap();
        assert_eq!(fixed.album.album_type, Some(AlbumType::Ep));
    }

    #[test]
    fn test_apply_suggestion_rejects_unsupported() {
        let snapshot = SubmissionSnapshot::empty();

        let no_value = finding(FieldPath::AlbumTitle, Severity::Error, None);
        assert!(matches!(
            apply_suggestion(&snapshot, &no_value),
            Err(Error::UnsupportedFix(_))
        ));

        let list = finding(FieldPath::AlbumGenres, Severity::Error, Some("Pop"));
        assert!(matches!(
            apply_suggestion(&snapshot, &list),
            Err(Error::UnsupportedFix(_))
        ));

        let missing_track = finding(FieldPath::TrackIsrc(4), Severity::Error, Some("KRA381900001"));
        assert!(matches!(
            apply_suggestion(&snapshot, &missing_track),
            Err(Error::InvalidData(_))
        ));
    }
}
