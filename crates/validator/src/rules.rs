//! The quality-control rule table.
//!
//! [`RULES`] is evaluated top to bottom; findings come out in table order,
//! and within one rule in selector order (track 0 before track 1).

use crate::engine::ValidationContext;
use crate::finding::Severity;
use crate::identifiers::{ean_check_digit, upc_check_digit, validate_ean, validate_upc};
use crate::text::{self, Hit, TextLint};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use release_qc_core::{
    AlbumType, FieldPath, IdentifierKind, PRICE_TYPES, SUPPORTED_TIMEZONES, Section,
    SubmissionSnapshot, TrackInfo,
};
use std::ops::RangeInclusive;
use std::sync::OnceLock;

/// Picks the string values a rule looks at, each tagged with its field.
pub type Selector = fn(&SubmissionSnapshot) -> Vec<(FieldPath, &str)>;

pub type CrossFieldCheck = fn(&SubmissionSnapshot, &ValidationContext) -> Vec<Violation>;

/// A failed rule, before severity and default message are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: FieldPath,
    pub message: Option<String>,
    pub suggestion: Option<String>,
}

impl Violation {
    pub fn at(field: FieldPath) -> Self {
        Self {
            field,
            message: None,
            suggestion: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    fn from_hit(field: FieldPath, hit: Hit) -> Self {
        Self {
            field,
            message: hit.message,
            suggestion: hit.suggestion,
        }
    }
}

/// Allowed range for a counted quantity, with a label for the message.
pub struct Bounds {
    pub label: String,
    pub range: RangeInclusive<usize>,
}

pub enum Check {
    /// Every selected value must be non-empty after trimming.
    Required(Selector),
    /// Like `Required`, but only while the predicate holds.
    RequiredIf(Selector, fn(&SubmissionSnapshot) -> bool),
    /// A list must hold at least one entry.
    NonEmpty(FieldPath, fn(&SubmissionSnapshot) -> usize),
    /// Non-empty selected values must match the pattern.
    Format(Selector, fn() -> &'static Regex),
    /// Non-empty selected values are run through a text lint.
    Lint(Selector, TextLint),
    /// A counted quantity must fall inside the bounds, when there are any.
    Range {
        field: FieldPath,
        value: fn(&SubmissionSnapshot) -> usize,
        bounds: fn(&SubmissionSnapshot, &ValidationContext) -> Option<Bounds>,
    },
    /// Anything that reads more than one field.
    CrossField(CrossFieldCheck),
}

pub struct Rule {
    pub id: &'static str,
    pub section: Section,
    pub severity: Severity,
    /// Default message; a violation may carry a more specific one
    pub message: &'static str,
    pub check: Check,
}

impl Rule {
    pub fn evaluate(
        &self,
        snapshot: &SubmissionSnapshot,
        ctx: &ValidationContext,
    ) -> Vec<Violation> {
        match &self.check {
            Check::Required(select) => missing(select(snapshot)),
            Check::RequiredIf(select, when) => {
                if when(snapshot) {
                    missing(select(snapshot))
                } else {
                    Vec::new()
                }
            }
            Check::NonEmpty(field, count) => {
                if count(snapshot) == 0 {
                    vec![Violation::at(*field)]
                } else {
                    Vec::new()
                }
            }
            Check::Format(select, pattern) => {
                let re = pattern();
                select(snapshot)
                    .into_iter()
                    .filter(|(_, value)| !value.is_empty() && !re.is_match(value))
                    .map(|(field, _)| Violation::at(field))
                    .collect()
            }
            Check::Lint(select, lint) => select(snapshot)
                .into_iter()
                .filter(|(_, value)| !value.trim().is_empty())
                .filter_map(|(field, value)| lint(value).map(|hit| Violation::from_hit(field, hit)))
                .collect(),
            Check::Range {
                field,
                value,
                bounds,
            } => {
                let Some(bounds) = bounds(snapshot, ctx) else {
                    return Vec::new();
                };
                let actual = value(snapshot);
                if bounds.range.contains(&actual) {
                    return Vec::new();
                }
                vec![Violation::at(*field).with_message(format!(
                    "{}: {} expects {}, found {}",
                    self.message,
                    bounds.label,
                    describe_range(&bounds.range),
                    actual
                ))]
            }
            Check::CrossField(check) => check(snapshot, ctx),
        }
    }
}

fn missing(values: Vec<(FieldPath, &str)>) -> Vec<Violation> {
    values
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| Violation::at(field))
        .collect()
}

fn describe_range(range: &RangeInclusive<usize>) -> String {
    match (*range.start(), *range.end()) {
        (0, hi) => format!("at most {}", hi),
        (lo, usize::MAX) => format!("at least {}", lo),
        (lo, hi) if lo == hi => lo.to_string(),
        (lo, hi) => format!("{}-{}", lo, hi),
    }
}

// Patterns

fn country_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]{2}$").expect("country regex must compile"))
}

fn release_time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("time regex must compile"))
}

fn year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(19|20)\d{2}$").expect("year regex must compile"))
}

fn isrc_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]{2}[A-Z0-9]{3}\d{7}$").expect("ISRC regex must compile"))
}

fn spotify_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(spotify:artist:|https?://open\.spotify\.com/artist/)?[A-Za-z0-9]{22}$")
            .expect("spotify regex must compile")
    })
}

fn apple_music_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(https?://music\.apple\.com/.+/artist/.+/)?\d{8,12}$")
            .expect("apple music regex must compile")
    })
}

fn isni_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{15}[\dX]$").expect("ISNI regex must compile"))
}

fn youtube_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^https?://(www\.)?(youtube\.com/channel/|youtube\.com/@)[A-Za-z0-9_-]+$")
            .expect("youtube regex must compile")
    })
}

fn territory_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Z]{2}|WW)$").expect("territory regex must compile"))
}

// Selectors

fn artist_name(s: &SubmissionSnapshot) -> Vec<(FieldPath, &str)> {
    vec![(FieldPath::ArtistName, s.artist.name.as_str())]
}

fn artist_type(s: &SubmissionSnapshot) -> Vec<(FieldPath, &str)> {
    vec![(FieldPath::ArtistType, s.artist.artist_type.as_str())]
}

/// Name and display name: the strings stores print as the artist.
fn artist_credit_names(s: &SubmissionSnapshot) -> Vec<(FieldPath, &str)> {
    vec![
        (FieldPath::ArtistName, s.artist.name.as_str()),
        (FieldPath::ArtistDisplayName, s.artist.display_name.as_str()),
    ]
}

fn artist_all_names(s: &SubmissionSnapshot) -> Vec<(FieldPath, &str)> {
    let mut values = artist_credit_names(s);
    values.extend(
        s.artist
            .translations
            .iter()
            .enumerate()
            .map(|(i, t)| (FieldPath::ArtistTranslation(i), t.value.as_str())),
    );
    values
}

fn artist_country(s: &SubmissionSnapshot) -> Vec<(FieldPath, &str)> {
    vec![(FieldPath::ArtistCountry, s.artist.country.as_str())]
}

fn album_title(s: &SubmissionSnapshot) -> Vec<(FieldPath, &str)> {
    vec![(FieldPath::AlbumTitle, s.album.title.as_str())]
}

fn album_all_titles(s: &SubmissionSnapshot) -> Vec<(FieldPath, &str)> {
    let mut values = album_title(s);
    values.extend(
        s.album
            .title_translations
            .iter()
            .enumerate()
            .map(|(i, t)| (FieldPath::AlbumTitleTranslation(i), t.value.as_str())),
    );
    values
}

fn album_release_date(s: &SubmissionSnapshot) -> Vec<(FieldPath, &str)> {
    vec![(FieldPath::AlbumReleaseDate, s.album.release_date.as_str())]
}

fn album_release_time(s: &SubmissionSnapshot) -> Vec<(FieldPath, &str)> {
    vec![(FieldPath::AlbumReleaseTime, s.album.release_time.as_str())]
}

fn album_timezone(s: &SubmissionSnapshot) -> Vec<(FieldPath, &str)> {
    vec![(FieldPath::AlbumTimezone, s.album.timezone.as_str())]
}

fn album_copyright_holder(s: &SubmissionSnapshot) -> Vec<(FieldPath, &str)> {
    vec![(FieldPath::AlbumCopyrightHolder, s.album.copyright_holder.as_str())]
}

fn album_production_holder(s: &SubmissionSnapshot) -> Vec<(FieldPath, &str)> {
    vec![(FieldPath::AlbumProductionHolder, s.album.production_holder.as_str())]
}

fn album_years(s: &SubmissionSnapshot) -> Vec<(FieldPath, &str)> {
    vec![
        (FieldPath::AlbumCopyrightYear, s.album.copyright_year.as_str()),
        (FieldPath::AlbumProductionYear, s.album.production_year.as_str()),
    ]
}

fn album_upc(s: &SubmissionSnapshot) -> Vec<(FieldPath, &str)> {
    vec![(FieldPath::AlbumUpc, s.album.upc.as_str())]
}

fn per_track<'a>(
    s: &'a SubmissionSnapshot,
    pick: impl Fn(usize, &'a TrackInfo) -> (FieldPath, &'a str),
) -> Vec<(FieldPath, &'a str)> {
    s.tracks.iter().enumerate().map(|(i, t)| pick(i, t)).collect()
}

fn track_titles(s: &SubmissionSnapshot) -> Vec<(FieldPath, &str)> {
    per_track(s, |i, t| (FieldPath::TrackTitle(i), t.title.as_str()))
}

fn track_all_titles(s: &SubmissionSnapshot) -> Vec<(FieldPath, &str)> {
    let mut values = Vec::new();
    for (i, track) in s.tracks.iter().enumerate() {
        values.push((FieldPath::TrackTitle(i), track.title.as_str()));
        values.extend(
            track
                .translations
                .iter()
                .enumerate()
                .map(|(j, t)| (FieldPath::TrackTranslation(i, j), t.value.as_str())),
        );
    }
    values
}

fn track_isrcs(s: &SubmissionSnapshot) -> Vec<(FieldPath, &str)> {
    per_track(s, |i, t| (FieldPath::TrackIsrc(i), t.isrc.as_str()))
}

fn track_featuring(s: &SubmissionSnapshot) -> Vec<(FieldPath, &str)> {
    per_track(s, |i, t| (FieldPath::TrackFeaturing(i), t.featuring.as_str()))
}

fn track_versions(s: &SubmissionSnapshot) -> Vec<(FieldPath, &str)> {
    per_track(s, |i, t| (FieldPath::TrackVersion(i), t.version.as_str()))
}

fn cover_art(s: &SubmissionSnapshot) -> Vec<(FieldPath, &str)> {
    vec![(FieldPath::FilesCoverArt, s.files.cover_art.as_str())]
}

// Cross-field checks

fn artist_translations_recommended(
    s: &SubmissionSnapshot,
    _: &ValidationContext,
) -> Vec<Violation> {
    if s.artist.translations.is_empty() && !s.artist.name.trim().is_empty() {
        vec![Violation::at(FieldPath::ArtistTranslations)]
    } else {
        Vec::new()
    }
}

fn artist_translations_incomplete(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    s.artist
        .translations
        .iter()
        .enumerate()
        .filter(|(_, t)| t.language.trim().is_empty() || t.value.trim().is_empty())
        .map(|(i, _)| Violation::at(FieldPath::ArtistTranslation(i)))
        .collect()
}

fn artist_identifier_format(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    let mut out = Vec::new();
    for (i, id) in s.artist.identifiers.iter().enumerate() {
        let value = id.value.trim();
        let (ok, expected) = match id.kind {
            IdentifierKind::Spotify => (
                spotify_id_re().is_match(value),
                "a 22-character Spotify artist id or URL",
            ),
            IdentifierKind::AppleMusic => (
                apple_music_id_re().is_match(value),
                "a numeric Apple Music artist id or URL",
            ),
            IdentifierKind::Isni => {
                let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
                (isni_re().is_match(&compact), "a 16-character ISNI")
            }
            IdentifierKind::Youtube => (youtube_re().is_match(value), "a YouTube channel URL"),
            IdentifierKind::Other => (!value.is_empty(), "a value"),
        };
        if !ok {
            out.push(
                Violation::at(FieldPath::ArtistIdentifier(i))
                    .with_message(format!("Artist identifier must be {}", expected)),
            );
        }
    }
    out
}

fn album_title_translations_recommended(
    s: &SubmissionSnapshot,
    _: &ValidationContext,
) -> Vec<Violation> {
    if s.album.title_translations.is_empty() && !s.album.title.trim().is_empty() {
        vec![Violation::at(FieldPath::AlbumTitleTranslations)]
    } else {
        Vec::new()
    }
}

fn album_type_required(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    if s.album.album_type.is_some() {
        return Vec::new();
    }
    let mut violation = Violation::at(FieldPath::AlbumType);
    if let Some(suggested) = AlbumType::for_track_count(s.tracks.len()) {
        violation = violation.with_suggestion(suggested.to_string());
    }
    vec![violation]
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn album_dates_parse(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    [
        (FieldPath::AlbumReleaseDate, s.album.release_date.as_str()),
        (
            FieldPath::AlbumOriginalReleaseDate,
            s.album.original_release_date.as_str(),
        ),
    ]
    .into_iter()
    .filter(|(_, value)| !value.trim().is_empty() && parse_date(value).is_none())
    .map(|(field, value)| {
        Violation::at(field).with_message(format!("'{}' is not a valid YYYY-MM-DD date", value))
    })
    .collect()
}

fn release_date_in_past(s: &SubmissionSnapshot, ctx: &ValidationContext) -> Vec<Violation> {
    match parse_date(&s.album.release_date) {
        Some(date) if date < ctx.today => vec![Violation::at(FieldPath::AlbumReleaseDate)],
        _ => Vec::new(),
    }
}

fn release_date_notice(s: &SubmissionSnapshot, ctx: &ValidationContext) -> Vec<Violation> {
    let Some(date) = parse_date(&s.album.release_date) else {
        return Vec::new();
    };
    let days = (date - ctx.today).num_days();
    if (0..ctx.settings.min_notice_days).contains(&days) {
        vec![
            Violation::at(FieldPath::AlbumReleaseDate).with_message(format!(
                "Release is {} day(s) away; stores need at least {} days",
                days, ctx.settings.min_notice_days
            )),
        ]
    } else {
        Vec::new()
    }
}

fn release_before_original(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    match (
        parse_date(&s.album.release_date),
        parse_date(&s.album.original_release_date),
    ) {
        (Some(release), Some(original)) if release < original => {
            vec![Violation::at(FieldPath::AlbumReleaseDate).with_suggestion(original.to_string())]
        }
        _ => Vec::new(),
    }
}

fn timezone_needed(s: &SubmissionSnapshot) -> bool {
    !s.album.release_time.trim().is_empty()
}

fn timezone_supported(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    let tz = s.album.timezone.trim();
    if tz.is_empty() || SUPPORTED_TIMEZONES.contains(&tz) {
        return Vec::new();
    }
    vec![
        Violation::at(FieldPath::AlbumTimezone)
            .with_message(format!("Timezone '{}' is not supported for scheduled releases", tz)),
    ]
}

fn years_in_future(s: &SubmissionSnapshot, ctx: &ValidationContext) -> Vec<Violation> {
    let current = ctx.today.year();
    album_years(s)
        .into_iter()
        .filter_map(|(field, value)| {
            let year: i32 = value.trim().parse().ok()?;
            (year > current).then(|| Violation::at(field).with_suggestion(current.to_string()))
        })
        .collect()
}

fn upc_needed(s: &SubmissionSnapshot) -> bool {
    !s.album.auto_generate_upc
}

/// Completes an 11/12-digit payload with its check digit, when that is
/// what the user most likely meant.
fn completed_code(value: &str, check: fn(&str) -> Option<u8>) -> Option<String> {
    check(value).map(|digit| format!("{}{}", value, digit))
}

fn upc_checksum(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    let upc = s.album.upc.trim();
    if upc.is_empty() || validate_upc(upc) {
        return Vec::new();
    }
    let mut violation = Violation::at(FieldPath::AlbumUpc);
    if let Some(full) = completed_code(upc, upc_check_digit) {
        violation = violation.with_suggestion(full);
    }
    vec![violation]
}

fn ean_checksum(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    let ean = s.album.ean.trim();
    if ean.is_empty() || validate_ean(ean) {
        return Vec::new();
    }
    let mut violation = Violation::at(FieldPath::AlbumEan);
    if let Some(full) = completed_code(ean, ean_check_digit) {
        violation = violation.with_suggestion(full);
    }
    vec![violation]
}

fn is_explicit(track: &TrackInfo) -> bool {
    track.explicit_content
        || track.title.to_lowercase().contains("explicit")
        || track.version.trim().eq_ignore_ascii_case("explicit")
}

fn is_clean_version(track: &TrackInfo) -> bool {
    track.version.trim().eq_ignore_ascii_case("clean")
        || track.title.to_lowercase().contains("(clean")
}

fn parental_advisory_missing(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    if s.tracks.iter().any(is_explicit) && !s.album.parental_advisory {
        vec![Violation::at(FieldPath::AlbumParentalAdvisory).with_suggestion("true")]
    } else {
        Vec::new()
    }
}

fn parental_advisory_unnecessary(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    if s.album.parental_advisory && !s.tracks.is_empty() && !s.tracks.iter().any(is_explicit) {
        vec![Violation::at(FieldPath::AlbumParentalAdvisory)]
    } else {
        Vec::new()
    }
}

fn clean_without_explicit(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    if s.tracks.iter().any(is_clean_version) && !s.tracks.iter().any(is_explicit) {
        vec![Violation::at(FieldPath::Tracks)]
    } else {
        Vec::new()
    }
}

fn track_count(s: &SubmissionSnapshot) -> usize {
    s.tracks.len()
}

fn track_count_bounds(s: &SubmissionSnapshot, _: &ValidationContext) -> Option<Bounds> {
    // an empty track list is reported by `tracks-required`
    if s.tracks.is_empty() {
        return None;
    }
    let album_type = s.album.album_type?;
    let article = match album_type {
        AlbumType::Ep | AlbumType::Album => "an",
        AlbumType::Single | AlbumType::Compilation => "a",
    };
    Some(Bounds {
        label: format!("{} {}", article, album_type),
        range: album_type.expected_track_count()?,
    })
}

fn genre_count(s: &SubmissionSnapshot) -> usize {
    s.album.genres.len()
}

fn genre_bounds(_: &SubmissionSnapshot, ctx: &ValidationContext) -> Option<Bounds> {
    Some(Bounds {
        label: "the genre list".to_string(),
        range: 0..=ctx.settings.max_album_genres,
    })
}

fn single_title_consistency(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    if s.album.album_type != Some(AlbumType::Single) {
        return Vec::new();
    }
    let album_base = text::base_title(&s.album.title);
    if album_base.is_empty() {
        return Vec::new();
    }
    s.tracks
        .iter()
        .enumerate()
        .filter(|(_, t)| {
            let base = text::base_title(&t.title);
            !base.is_empty() && base != album_base
        })
        .map(|(i, _)| Violation::at(FieldPath::TrackTitle(i)).with_suggestion(s.album.title.trim()))
        .collect()
}

fn track_title_case(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    s.tracks
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.title.trim().is_empty() && !text::uses_sentence_case(&t.language))
        .filter_map(|(i, t)| {
            text::title_case(&t.title)
                .map(|hit| Violation::from_hit(FieldPath::TrackTitle(i), hit))
        })
        .collect()
}

fn track_sentence_case(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    s.tracks
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.title.trim().is_empty())
        .filter_map(|(i, t)| {
            text::sentence_case(&t.title, &t.language)
                .map(|hit| Violation::from_hit(FieldPath::TrackTitle(i), hit))
        })
        .collect()
}

fn track_german_orthography(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    s.tracks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.language.trim().eq_ignore_ascii_case("german"))
        .filter_map(|(i, t)| {
            text::german_orthography(&t.title)
                .map(|hit| Violation::from_hit(FieldPath::TrackTitle(i), hit))
        })
        .collect()
}

fn duplicate_isrcs(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    let mut out = Vec::new();
    for (i, track) in s.tracks.iter().enumerate() {
        let isrc = track.isrc.trim();
        if isrc.is_empty() {
            continue;
        }
        if let Some(first) = s.tracks[..i].iter().position(|t| t.isrc.trim() == isrc) {
            out.push(
                Violation::at(FieldPath::TrackIsrc(i))
                    .with_message(format!("ISRC {} is already used by track {}", isrc, first + 1)),
            );
        }
    }
    out
}

fn version_duplicated_in_title(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    s.tracks
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.version.trim().is_empty() && text::version_in_title(&t.title))
        .map(|(i, _)| Violation::at(FieldPath::TrackVersion(i)))
        .collect()
}

fn version_format(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    s.tracks
        .iter()
        .enumerate()
        .filter(|(_, t)| {
            text::version_in_title(&t.title) && text::version_outside_parentheses(&t.title)
        })
        .map(|(i, _)| Violation::at(FieldPath::TrackTitle(i)))
        .collect()
}

fn track_artists_missing(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    s.tracks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.artists.iter().all(|a| a.trim().is_empty()))
        .map(|(i, _)| {
            let mut violation = Violation::at(FieldPath::TrackArtists(i));
            if !s.artist.name.trim().is_empty() {
                violation = violation.with_suggestion(s.artist.name.trim());
            }
            violation
        })
        .collect()
}

fn contributors_incomplete(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    let mut out = Vec::new();
    for (i, track) in s.tracks.iter().enumerate() {
        for (j, contributor) in track.contributors.iter().enumerate() {
            if contributor.name.trim().is_empty() || contributor.role.trim().is_empty() {
                out.push(Violation::at(FieldPath::TrackContributor(i, j)));
            }
        }
    }
    out
}

const SONGWRITER_ROLES: &[&str] = &["composer", "songwriter", "writer", "lyricist", "author"];

fn songwriter_missing(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    s.tracks
        .iter()
        .enumerate()
        .filter(|(_, t)| {
            !t.contributors.iter().any(|c| {
                SONGWRITER_ROLES.contains(&c.role.trim().to_lowercase().as_str())
            })
        })
        .map(|(i, _)| Violation::at(FieldPath::TrackContributors(i)))
        .collect()
}

fn subgenre_without_genre(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    s.tracks
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.subgenre.trim().is_empty() && t.genre.trim().is_empty())
        .map(|(i, _)| Violation::at(FieldPath::TrackGenre(i)))
        .collect()
}

fn language_mix(s: &SubmissionSnapshot, ctx: &ValidationContext) -> Vec<Violation> {
    let mut languages: Vec<String> = s
        .tracks
        .iter()
        .map(|t| t.language.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect();
    languages.sort();
    languages.dedup();

    if languages.len() > ctx.settings.max_track_languages {
        vec![Violation::at(FieldPath::Tracks).with_message(format!(
            "Tracks use {} lyric languages ({}); check the language settings",
            languages.len(),
            languages.join(", ")
        ))]
    } else {
        Vec::new()
    }
}

fn audio_per_track(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    let mut out: Vec<Violation> = (0..s.tracks.len())
        .filter(|i| s.files.audio.get(*i).is_none_or(|a| a.trim().is_empty()))
        .map(|i| {
            Violation::at(FieldPath::FilesAudioFile(i))
                .with_message(format!("Track {} has no audio file", i + 1))
        })
        .collect();

    if s.files.audio.len() > s.tracks.len() {
        out.push(Violation::at(FieldPath::FilesAudio).with_message(format!(
            "{} audio files for {} tracks",
            s.files.audio.len(),
            s.tracks.len()
        )));
    }
    out
}

fn territory_count(s: &SubmissionSnapshot) -> usize {
    s.distribution.territories.len()
}

fn platform_count(s: &SubmissionSnapshot) -> usize {
    s.distribution.selected_platforms.len()
}

fn mood_tag_count(s: &SubmissionSnapshot) -> usize {
    s.marketing.mood_tags.len()
}

fn territory_codes(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    let lists = [
        (
            FieldPath::DistributionTerritories,
            &s.distribution.territories,
        ),
        (
            FieldPath::DistributionExcludedTerritories,
            &s.distribution.excluded_territories,
        ),
    ];
    lists
        .into_iter()
        .filter_map(|(field, codes)| {
            let bad: Vec<&str> = codes
                .iter()
                .map(|c| c.as_str())
                .filter(|c| !territory_re().is_match(c))
                .collect();
            (!bad.is_empty()).then(|| {
                Violation::at(field)
                    .with_message(format!("Unknown territory codes: {}", bad.join(", ")))
            })
        })
        .collect()
}

fn territory_overlap(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    let overlap: Vec<&str> = s
        .distribution
        .excluded_territories
        .iter()
        .filter(|code| s.distribution.territories.contains(code))
        .map(|code| code.as_str())
        .collect();
    if overlap.is_empty() {
        return Vec::new();
    }
    vec![Violation::at(FieldPath::DistributionExcludedTerritories).with_message(format!(
        "Territories both included and excluded: {}",
        overlap.join(", ")
    ))]
}

fn price_type(s: &SubmissionSnapshot, _: &ValidationContext) -> Vec<Violation> {
    let price = s.distribution.price_type.trim();
    if price.is_empty() {
        return vec![Violation::at(FieldPath::DistributionPriceType)];
    }
    if PRICE_TYPES.contains(&price) {
        return Vec::new();
    }
    let mut violation = Violation::at(FieldPath::DistributionPriceType)
        .with_message(format!("Unknown price type '{}'", price));
    let upper = price.to_uppercase();
    if PRICE_TYPES.contains(&upper.as_str()) {
        violation = violation.with_suggestion(upper);
    }
    vec![violation]
}

fn marketing_description(s: &SubmissionSnapshot, ctx: &ValidationContext) -> Vec<Violation> {
    let chars = s.marketing.description.trim().chars().count();
    let min = ctx.settings.min_marketing_description_chars;
    if chars == 0 {
        vec![Violation::at(FieldPath::MarketingDescription)]
    } else if chars < min {
        vec![
            Violation::at(FieldPath::MarketingDescription).with_message(format!(
                "Marketing description is {} characters; {} or more reads better in store pitches",
                chars, min
            )),
        ]
    } else {
        Vec::new()
    }
}

macro_rules! rule {
    ($id:literal, $section:ident, $severity:ident, $message:literal, $check:expr $(,)?) => {
        Rule {
            id: $id,
            section: Section::$section,
            severity: Severity::$severity,
            message: $message,
            check: $check,
        }
    };
}

pub static RULES: &[Rule] = &[
    // Artist
    rule!(
        "artist-name-required",
        Artist,
        Error,
        "Artist name is required",
        Check::Required(artist_name),
    ),
    rule!(
        "artist-type-recommended",
        Artist,
        Warning,
        "Artist type (solo, group, band) helps stores file the release",
        Check::Required(artist_type),
    ),
    rule!(
        "artist-name-double-spaces",
        Artist,
        Error,
        "Remove repeated spaces",
        Check::Lint(artist_all_names, text::double_spaces),
    ),
    rule!(
        "artist-name-edge-whitespace",
        Artist,
        Error,
        "Remove leading and trailing spaces",
        Check::Lint(artist_all_names, text::edge_whitespace),
    ),
    rule!(
        "artist-name-characters",
        Artist,
        Error,
        "Artist name contains characters stores reject",
        Check::Lint(artist_credit_names, text::forbidden_characters),
    ),
    rule!(
        "artist-name-promotional",
        Artist,
        Error,
        "Promotional wording is not allowed in artist names",
        Check::Lint(artist_all_names, text::promotional_terms),
    ),
    rule!(
        "artist-name-generic",
        Artist,
        Error,
        "Placeholder names are not accepted as artist names",
        Check::Lint(artist_credit_names, text::generic_artist_name),
    ),
    rule!(
        "artist-name-misleading",
        Artist,
        Error,
        "Artist name contains collaboration wording",
        Check::Lint(artist_credit_names, text::misleading_artist_terms),
    ),
    rule!(
        "artist-name-aka",
        Artist,
        Warning,
        "Alias wording ('aka') in artist names is usually rejected",
        Check::Lint(artist_credit_names, text::aka_in_artist_name),
    ),
    rule!(
        "artist-name-abbreviation",
        Artist,
        Error,
        "Spell out abbreviations in artist names",
        Check::Lint(artist_credit_names, text::abbreviations),
    ),
    rule!(
        "artist-country-format",
        Artist,
        Error,
        "Country must be a two-letter ISO code",
        Check::Format(artist_country, country_re),
    ),
    rule!(
        "artist-translations-recommended",
        Artist,
        Warning,
        "Add a translated artist name for international stores",
        Check::CrossField(artist_translations_recommended),
    ),
    rule!(
        "artist-translation-incomplete",
        Artist,
        Error,
        "Translations need both a language and a value",
        Check::CrossField(artist_translations_incomplete),
    ),
    rule!(
        "artist-identifier-format",
        Artist,
        Error,
        "Artist identifier is malformed",
        Check::CrossField(artist_identifier_format),
    ),

    // Album
    rule!(
        "album-title-required",
        Album,
        Error,
        "Album title is required",
        Check::Required(album_title),
    ),
    rule!(
        "album-title-double-spaces",
        Album,
        Error,
        "Remove repeated spaces",
        Check::Lint(album_all_titles, text::double_spaces),
    ),
    rule!(
        "album-title-edge-whitespace",
        Album,
        Error,
        "Remove leading and trailing spaces",
        Check::Lint(album_all_titles, text::edge_whitespace),
    ),
    rule!(
        "album-title-emoji",
        Album,
        Error,
        "Emoji are not allowed in titles",
        Check::Lint(album_all_titles, text::emoji),
    ),
    rule!(
        "album-title-promotional",
        Album,
        Error,
        "Promotional wording is not allowed in titles",
        Check::Lint(album_all_titles, text::promotional_terms),
    ),
    rule!(
        "album-title-brackets",
        Album,
        Error,
        "Brackets in the title are not balanced",
        Check::Lint(album_all_titles, text::unmatched_brackets),
    ),
    rule!(
        "album-title-case",
        Album,
        Warning,
        "English titles use title case",
        Check::Lint(album_title, text::title_case),
    ),
    rule!(
        "album-title-translations-recommended",
        Album,
        Warning,
        "Add a translated album title for international stores",
        Check::CrossField(album_title_translations_recommended),
    ),
    rule!(
        "album-type-required",
        Album,
        Error,
        "Album type is required",
        Check::CrossField(album_type_required),
    ),
    rule!(
        "album-genre-required",
        Album,
        Error,
        "Select at least one genre",
        Check::NonEmpty(FieldPath::AlbumGenres, genre_count),
    ),
    rule!(
        "album-genre-count",
        Album,
        Warning,
        "Too many genres",
        Check::Range {
            field: FieldPath::AlbumGenres,
            value: genre_count,
            bounds: genre_bounds,
        },
    ),
    rule!(
        "album-release-date-required",
        Album,
        Error,
        "Release date is required",
        Check::Required(album_release_date),
    ),
    rule!(
        "album-date-invalid",
        Album,
        Error,
        "Dates use the YYYY-MM-DD format",
        Check::CrossField(album_dates_parse),
    ),
    rule!(
        "album-release-date-past",
        Album,
        Error,
        "Release date is in the past",
        Check::CrossField(release_date_in_past),
    ),
    rule!(
        "album-release-date-notice",
        Album,
        Warning,
        "Release date leaves little time for store delivery",
        Check::CrossField(release_date_notice),
    ),
    rule!(
        "album-release-before-original",
        Album,
        Error,
        "Release date cannot precede the original release date",
        Check::CrossField(release_before_original),
    ),
    rule!(
        "album-release-time-format",
        Album,
        Error,
        "Release time uses 24-hour HH:MM",
        Check::Format(album_release_time, release_time_re),
    ),
    rule!(
        "album-timezone-required",
        Album,
        Error,
        "A scheduled release time needs a timezone",
        Check::RequiredIf(album_timezone, timezone_needed),
    ),
    rule!(
        "album-timezone-supported",
        Album,
        Error,
        "Timezone is not supported",
        Check::CrossField(timezone_supported),
    ),
    rule!(
        "album-copyright-holder-required",
        Album,
        Error,
        "Copyright holder (C line) is required",
        Check::Required(album_copyright_holder),
    ),
    rule!(
        "album-copyright-symbol",
        Album,
        Warning,
        "Leave the © symbol out of the C line; stores add it",
        Check::Lint(album_copyright_holder, text::copyright_symbol),
    ),
    rule!(
        "album-production-symbol",
        Album,
        Warning,
        "Leave the ℗ symbol out of the P line; stores add it",
        Check::Lint(album_production_holder, text::production_symbol),
    ),
    rule!(
        "album-year-format",
        Album,
        Error,
        "Years are four digits between 1900 and 2099",
        Check::Format(album_years, year_re),
    ),
    rule!(
        "album-year-future",
        Album,
        Error,
        "Copyright year cannot be in the future",
        Check::CrossField(years_in_future),
    ),
    rule!(
        "album-upc-required",
        Album,
        Error,
        "Enter a UPC or let one be generated",
        Check::RequiredIf(album_upc, upc_needed),
    ),
    rule!(
        "album-upc-checksum",
        Album,
        Error,
        "UPC must be 12 digits with a valid check digit",
        Check::CrossField(upc_checksum),
    ),
    rule!(
        "album-ean-checksum",
        Album,
        Error,
        "EAN must be 13 digits with a valid check digit",
        Check::CrossField(ean_checksum),
    ),
    rule!(
        "album-parental-advisory-missing",
        Album,
        Error,
        "Explicit tracks require the parental advisory flag",
        Check::CrossField(parental_advisory_missing),
    ),
    rule!(
        "album-parental-advisory-unnecessary",
        Album,
        Warning,
        "Parental advisory is set but no track is explicit",
        Check::CrossField(parental_advisory_unnecessary),
    ),

    // Tracks
    rule!(
        "tracks-required",
        Tracks,
        Error,
        "Add at least one track",
        Check::NonEmpty(FieldPath::Tracks, track_count),
    ),
    rule!(
        "tracks-count-matches-type",
        Tracks,
        Warning,
        "Track count does not match the album type",
        Check::Range {
            field: FieldPath::Tracks,
            value: track_count,
            bounds: track_count_bounds,
        },
    ),
    rule!(
        "track-title-required",
        Tracks,
        Error,
        "Track title is required",
        Check::Required(track_titles),
    ),
    rule!(
        "track-title-double-spaces",
        Tracks,
        Error,
        "Remove repeated spaces",
        Check::Lint(track_all_titles, text::double_spaces),
    ),
    rule!(
        "track-title-edge-whitespace",
        Tracks,
        Error,
        "Remove leading and trailing spaces",
        Check::Lint(track_all_titles, text::edge_whitespace),
    ),
    rule!(
        "track-title-emoji",
        Tracks,
        Error,
        "Emoji are not allowed in titles",
        Check::Lint(track_all_titles, text::emoji),
    ),
    rule!(
        "track-title-promotional",
        Tracks,
        Error,
        "Promotional wording is not allowed in titles",
        Check::Lint(track_all_titles, text::promotional_terms),
    ),
    rule!(
        "track-title-brackets",
        Tracks,
        Error,
        "Brackets in the title are not balanced",
        Check::Lint(track_all_titles, text::unmatched_brackets),
    ),
    rule!(
        "track-title-case",
        Tracks,
        Warning,
        "English titles use title case",
        Check::CrossField(track_title_case),
    ),
    rule!(
        "track-title-sentence-case",
        Tracks,
        Warning,
        "Titles in this language use sentence case",
        Check::CrossField(track_sentence_case),
    ),
    rule!(
        "track-title-german-orthography",
        Tracks,
        Warning,
        "Use umlauts and ß in German titles",
        Check::CrossField(track_german_orthography),
    ),
    rule!(
        "tracks-single-title",
        Tracks,
        Warning,
        "Tracks on a single share the album title",
        Check::CrossField(single_title_consistency),
    ),
    rule!(
        "track-isrc-missing",
        Tracks,
        Warning,
        "No ISRC yet; one will be assigned at delivery",
        Check::Required(track_isrcs),
    ),
    rule!(
        "track-isrc-format",
        Tracks,
        Error,
        "ISRC must look like CCXXXYYNNNNN (e.g. USKRE2400001)",
        Check::Format(track_isrcs, isrc_re),
    ),
    rule!(
        "track-isrc-duplicate",
        Tracks,
        Error,
        "ISRC is used by more than one track",
        Check::CrossField(duplicate_isrcs),
    ),
    rule!(
        "track-featuring-format",
        Tracks,
        Warning,
        "Featuring credits use 'feat. Name'",
        Check::Lint(track_featuring, text::featuring_format),
    ),
    rule!(
        "track-version-forbidden",
        Tracks,
        Error,
        "This version label is not accepted",
        Check::Lint(track_versions, text::forbidden_version_term),
    ),
    rule!(
        "track-version-capitalization",
        Tracks,
        Warning,
        "Version labels use standard capitalization",
        Check::Lint(track_versions, text::version_capitalization),
    ),
    rule!(
        "track-version-duplicated",
        Tracks,
        Warning,
        "The title already names a version",
        Check::CrossField(version_duplicated_in_title),
    ),
    rule!(
        "track-version-format",
        Tracks,
        Warning,
        "Versions are shown in parentheses after the title",
        Check::CrossField(version_format),
    ),
    rule!(
        "track-artists-missing",
        Tracks,
        Warning,
        "No performing artist credited on this track",
        Check::CrossField(track_artists_missing),
    ),
    rule!(
        "track-contributor-incomplete",
        Tracks,
        Error,
        "Contributors need a name and a role",
        Check::CrossField(contributors_incomplete),
    ),
    rule!(
        "track-songwriter-missing",
        Tracks,
        Warning,
        "No songwriter credited on this track",
        Check::CrossField(songwriter_missing),
    ),
    rule!(
        "track-subgenre-without-genre",
        Tracks,
        Error,
        "A subgenre needs a genre",
        Check::CrossField(subgenre_without_genre),
    ),
    rule!(
        "tracks-language-mix",
        Tracks,
        Warning,
        "Tracks use many lyric languages",
        Check::CrossField(language_mix),
    ),
    rule!(
        "tracks-clean-without-explicit",
        Tracks,
        Warning,
        "Clean versions are only needed alongside explicit ones",
        Check::CrossField(clean_without_explicit),
    ),

    // Files
    rule!(
        "files-cover-art-required",
        Files,
        Error,
        "Cover art is required",
        Check::Required(cover_art),
    ),
    rule!(
        "files-audio-per-track",
        Files,
        Error,
        "Every track needs exactly one audio file",
        Check::CrossField(audio_per_track),
    ),

    // Distribution
    rule!(
        "distribution-territories-required",
        Distribution,
        Error,
        "Select at least one territory",
        Check::NonEmpty(FieldPath::DistributionTerritories, territory_count),
    ),
    rule!(
        "distribution-territory-codes",
        Distribution,
        Error,
        "Territories use two-letter ISO codes or WW",
        Check::CrossField(territory_codes),
    ),
    rule!(
        "distribution-territory-overlap",
        Distribution,
        Warning,
        "Territories are both included and excluded",
        Check::CrossField(territory_overlap),
    ),
    rule!(
        "distribution-platforms-required",
        Distribution,
        Error,
        "Select at least one platform",
        Check::NonEmpty(FieldPath::DistributionPlatforms, platform_count),
    ),
    rule!(
        "distribution-price-type",
        Distribution,
        Error,
        "Price type is required",
        Check::CrossField(price_type),
    ),

    // Marketing
    rule!(
        "marketing-description",
        Marketing,
        Warning,
        "Add a marketing description",
        Check::CrossField(marketing_description),
    ),
    rule!(
        "marketing-mood-tags",
        Marketing,
        Warning,
        "Mood tags improve playlist placement",
        Check::NonEmpty(FieldPath::MarketingMoodTags, mood_tag_count),
    ),
];

/// Rules owned by one section, in table order.
pub fn rules_for(section: Section) -> impl Iterator<Item = &'static Rule> {
    RULES.iter().filter(move |rule| rule.section == section)
}
