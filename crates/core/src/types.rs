use serde::de::IntoDeserializer;
use serde::de::value::StrDeserializer;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// In-progress release submission, as held by the wizard.
///
/// Every field defaults, so a half-filled form always deserializes and the
/// validator turns missing data into findings rather than parse failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmissionSnapshot {
    pub artist: ArtistInfo,
    pub album: AlbumInfo,
    pub tracks: Vec<TrackInfo>,
    pub files: FileRefs,
    pub distribution: DistributionInfo,
    pub marketing: MarketingInfo,
}

impl SubmissionSnapshot {
    /// The state a freshly mounted wizard starts from.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }
}

/// Artist information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArtistInfo {
    pub name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub artist_type: String,
    pub label_name: String,
    /// ISO 3166-1 alpha-2
    pub country: String,
    pub translations: Vec<Translation>,
    pub identifiers: Vec<ArtistIdentifier>,
}

/// A localized rendering of a name or title
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Translation {
    pub language: String,
    pub value: String,
}

/// External profile identifier for an artist
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArtistIdentifier {
    pub kind: IdentifierKind,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdentifierKind {
    Spotify,
    AppleMusic,
    Isni,
    Youtube,
    #[default]
    Other,
}

/// Album metadata and release dates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlbumInfo {
    pub title: String,
    pub title_translations: Vec<Translation>,
    #[serde(
        rename = "type",
        deserialize_with = "blank_album_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub album_type: Option<AlbumType>,
    pub genres: Vec<String>,
    /// Consumer release date, `YYYY-MM-DD`
    pub release_date: String,
    /// Original release date for re-issues, `YYYY-MM-DD`
    pub original_release_date: String,
    /// Local release time, `HH:MM`
    pub release_time: String,
    pub timezone: String,
    pub copyright_year: String,
    pub copyright_holder: String,
    pub production_year: String,
    pub production_holder: String,
    pub upc: String,
    pub ean: String,
    /// The backend assigns a UPC when set
    pub auto_generate_upc: bool,
    pub catalog_number: String,
    pub parental_advisory: bool,
}

/// An unselected type arrives as `""` from the form.
fn blank_album_type<'de, D>(deserializer: D) -> Result<Option<AlbumType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(name) => {
            let name: StrDeserializer<'_, D::Error> = name.into_deserializer();
            AlbumType::deserialize(name).map(Some)
        }
    }
}

/// Declared release format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlbumType {
    Single,
    Ep,
    Album,
    Compilation,
}

impl AlbumType {
    /// Track counts a release of this type is expected to carry.
    ///
    /// `None` means the type places no constraint (compilations).
    pub fn expected_track_count(self) -> Option<RangeInclusive<usize>> {
        match self {
            AlbumType::Single => Some(1..=3),
            AlbumType::Ep => Some(4..=6),
            AlbumType::Album => Some(7..=usize::MAX),
            AlbumType::Compilation => None,
        }
    }

    /// The type a release with `count` tracks would normally be filed as.
    pub fn for_track_count(count: usize) -> Option<AlbumType> {
        match count {
            0 => None,
            1..=3 => Some(AlbumType::Single),
            4..=6 => Some(AlbumType::Ep),
            _ => Some(AlbumType::Album),
        }
    }
}

impl fmt::Display for AlbumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlbumType::Single => "single",
            AlbumType::Ep => "EP",
            AlbumType::Album => "album",
            AlbumType::Compilation => "compilation",
        };
        f.write_str(name)
    }
}

/// Individual track
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackInfo {
    pub title: String,
    pub translations: Vec<Translation>,
    /// Version designation, e.g. "Remix" or "Acoustic"
    pub version: String,
    pub featuring: String,
    pub isrc: String,
    pub explicit_content: bool,
    /// Lyrics language, lowercase English name ("korean", "french", ...)
    pub language: String,
    pub genre: String,
    pub subgenre: String,
    pub artists: Vec<String>,
    pub contributors: Vec<Contributor>,
}

/// Songwriter, producer or performer credit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Contributor {
    pub name: String,
    pub role: String,
}

/// References to uploaded or local assets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileRefs {
    pub cover_art: String,
    /// One entry per track, in track order
    pub audio: Vec<String>,
}

impl FileRefs {
    /// Whether a reference points at an already-uploaded asset.
    pub fn is_remote(reference: &str) -> bool {
        reference.starts_with("http://") || reference.starts_with("https://")
    }
}

/// Distribution settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DistributionInfo {
    /// ISO 3166-1 alpha-2 codes, or "WW" for worldwide
    pub territories: Vec<String>,
    pub excluded_territories: Vec<String>,
    pub selected_platforms: Vec<String>,
    pub price_type: String,
}

/// Marketing copy attached to the release
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarketingInfo {
    pub description: String,
    pub mood_tags: Vec<String>,
    pub marketing_angle: String,
}

/// Timezones the release scheduler accepts for a local release time.
pub const SUPPORTED_TIMEZONES: &[&str] = &[
    "UTC",
    "Asia/Seoul",
    "Asia/Tokyo",
    "Asia/Shanghai",
    "Asia/Singapore",
    "Asia/Bangkok",
    "Asia/Mumbai",
    "Europe/London",
    "Europe/Paris",
    "Europe/Berlin",
    "Europe/Moscow",
    "America/New_York",
    "America/Chicago",
    "America/Denver",
    "America/Los_Angeles",
    "America/Sao_Paulo",
    "Australia/Sydney",
    "Pacific/Auckland",
];

/// Accepted values for `distribution.priceType`.
pub const PRICE_TYPES: &[&str] = &["PAID", "FREE", "BUDGET", "MID", "FULL", "PREMIUM"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_type_expected_track_count() {
        assert_eq!(AlbumType::Single.expected_track_count(), Some(1..=3));
        assert_eq!(AlbumType::Ep.expected_track_count(), Some(4..=6));
        assert!(AlbumType::Album.expected_track_count().unwrap().contains(&40));
        assert!(!AlbumType::Album.expected_track_count().unwrap().contains(&6));
        assert_eq!(AlbumType::Compilation.expected_track_count(), None);
    }

    #[test]
    fn test_album_type_for_track_count() {
        assert_eq!(AlbumType::for_track_count(0), None);
        assert_eq!(AlbumType::for_track_count(3), Some(AlbumType::Single));
        assert_eq!(AlbumType::for_track_count(4), Some(AlbumType::Ep));
        assert_eq!(AlbumType::for_track_count(12), Some(AlbumType::Album));
    }

    #[test]
    fn test_partial_snapshot_deserializes() {
        let snapshot: SubmissionSnapshot =
            serde_json::from_str(r#"{"artist":{"name":"IU"},"tracks":[{"title":"A"}]}"#).unwrap();
        assert_eq!(snapshot.artist.name, "IU");
        assert_eq!(snapshot.album.album_type, None);
        assert_eq!(snapshot.track_count(), 1);
        assert!(snapshot.tracks[0].isrc.is_empty());
    }

    #[test]
    fn test_album_type_wire_names() {
        let album: AlbumInfo = serde_json::from_str(r#"{"type":"ep"}"#).unwrap();
        assert_eq!(album.album_type, Some(AlbumType::Ep));
    }

    #[test]
    fn test_remote_file_refs() {
        assert!(FileRefs::is_remote("https://cdn.example.com/cover.jpg"));
        assert!(!FileRefs::is_remote("artwork/cover.jpg"));
    }
}
