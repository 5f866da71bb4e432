//! Closed set of field paths into a [`SubmissionSnapshot`](crate::SubmissionSnapshot).
//!
//! Rules report findings against a `FieldPath` and the wizard decides step
//! ownership from the same value, so the two can never disagree about
//! which field a finding belongs to.

use serde::{Serialize, Serializer};
use std::fmt;

/// Top-level section of the snapshot a field lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    Artist,
    Album,
    Tracks,
    Files,
    Distribution,
    Marketing,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Artist,
        Section::Album,
        Section::Tracks,
        Section::Files,
        Section::Distribution,
        Section::Marketing,
    ];

    /// Dot-path prefix every field of this section starts with.
    pub fn prefix(self) -> &'static str {
        match self {
            Section::Artist => "artist",
            Section::Album => "album",
            Section::Tracks => "tracks",
            Section::Files => "files",
            Section::Distribution => "distribution",
            Section::Marketing => "marketing",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldPath {
    ArtistName,
    ArtistDisplayName,
    ArtistType,
    ArtistLabelName,
    ArtistCountry,
    ArtistTranslations,
    ArtistTranslation(usize),
    ArtistIdentifier(usize),

    AlbumTitle,
    AlbumTitleTranslations,
    AlbumTitleTranslation(usize),
    AlbumType,
    AlbumGenres,
    AlbumReleaseDate,
    AlbumOriginalReleaseDate,
    AlbumReleaseTime,
    AlbumTimezone,
    AlbumCopyrightYear,
    AlbumCopyrightHolder,
    AlbumProductionYear,
    AlbumProductionHolder,
    AlbumUpc,
    AlbumEan,
    AlbumCatalogNumber,
    AlbumParentalAdvisory,

    /// The track list as a whole
    Tracks,
    TrackTitle(usize),
    TrackTranslation(usize, usize),
    TrackVersion(usize),
    TrackFeaturing(usize),
    TrackIsrc(usize),
    TrackExplicitContent(usize),
    TrackLanguage(usize),
    TrackGenre(usize),
    TrackSubgenre(usize),
    TrackArtists(usize),
    /// The contributor list of one track
    TrackContributors(usize),
    TrackContributor(usize, usize),

    FilesCoverArt,
    FilesAudio,
    FilesAudioFile(usize),

    DistributionTerritories,
    DistributionExcludedTerritories,
    DistributionPlatforms,
    DistributionPriceType,

    MarketingDescription,
    MarketingMoodTags,
    MarketingAngle,
}

impl FieldPath {
    pub fn section(self) -> Section {
        use FieldPath::*;
        match self {
            ArtistName
            | ArtistDisplayName
            | ArtistType
            | ArtistLabelName
            | ArtistCountry
            | ArtistTranslations
            | ArtistTranslation(_)
            | ArtistIdentifier(_) => Section::Artist,

            AlbumTitle
            | AlbumTitleTranslations
            | AlbumTitleTranslation(_)
            | AlbumType
            | AlbumGenres
            | AlbumReleaseDate
            | AlbumOriginalReleaseDate
            | AlbumReleaseTime
            | AlbumTimezone
            | AlbumCopyrightYear
            | AlbumCopyrightHolder
            | AlbumProductionYear
            | AlbumProductionHolder
            | AlbumUpc
            | AlbumEan
            | AlbumCatalogNumber
            | AlbumParentalAdvisory => Section::Album,

            Tracks
            | TrackTitle(_)
            | TrackTranslation(_, _)
            | TrackVersion(_)
            | TrackFeaturing(_)
            | TrackIsrc(_)
            | TrackExplicitContent(_)
            | TrackLanguage(_)
            | TrackGenre(_)
            | TrackSubgenre(_)
            | TrackArtists(_)
            | TrackContributors(_)
            | TrackContributor(_, _) => Section::Tracks,

            FilesCoverArt | FilesAudio | FilesAudioFile(_) => Section::Files,

            DistributionTerritories
            | DistributionExcludedTerritories
            | DistributionPlatforms
            | DistributionPriceType => Section::Distribution,

            MarketingDescription | MarketingMoodTags | MarketingAngle => Section::Marketing,
        }
    }

    /// Index of the track this field belongs to, if any.
    pub fn track_index(self) -> Option<usize> {
        use FieldPath::*;
        match self {
            TrackTitle(i)
            | TrackTranslation(i, _)
            | TrackVersion(i)
            | TrackFeaturing(i)
            | TrackIsrc(i)
            | TrackExplicitContent(i)
            | TrackLanguage(i)
            | TrackGenre(i)
            | TrackSubgenre(i)
            | TrackArtists(i)
            | TrackContributors(i)
            | TrackContributor(i, _) => Some(i),
            _ => None,
        }
    }

    /// Dot-path rendering, e.g. `tracks[2].isrc`.
    pub fn path(self) -> String {
        self.to_string()
    }

    /// True when this field lives under the given dot-path prefix.
    pub fn starts_with(self, prefix: &str) -> bool {
        let path = self.path();
        path == prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('.') || rest.starts_with('['))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use FieldPath::*;
        match self {
            ArtistName => f.write_str("artist.name"),
            ArtistDisplayName => f.write_str("artist.displayName"),
            ArtistType => f.write_str("artist.type"),
            ArtistLabelName => f.write_str("artist.labelName"),
            ArtistCountry => f.write_str("artist.country"),
            ArtistTranslations => f.write_str("artist.translations"),
            ArtistTranslation(i) => write!(f, "artist.translations[{}]", i),
            ArtistIdentifier(i) => write!(f, "artist.identifiers[{}]", i),

            AlbumTitle => f.write_str("album.title"),
            AlbumTitleTranslations => f.write_str("album.titleTranslations"),
            AlbumTitleTranslation(i) => write!(f, "album.titleTranslations[{}]", i),
            AlbumType => f.write_str("album.type"),
            AlbumGenres => f.write_str("album.genres"),
            AlbumReleaseDate => f.write_str("album.releaseDate"),
            AlbumOriginalReleaseDate => f.write_str("album.originalReleaseDate"),
            AlbumReleaseTime => f.write_str("album.releaseTime"),
            AlbumTimezone => f.write_str("album.timezone"),
            AlbumCopyrightYear => f.write_str("album.copyrightYear"),
            AlbumCopyrightHolder => f.write_str("album.copyrightHolder"),
            AlbumProductionYear => f.write_str("album.productionYear"),
            AlbumProductionHolder => f.write_str("album.productionHolder"),
            AlbumUpc => f.write_str("album.upc"),
            AlbumEan => f.write_str("album.ean"),
            AlbumCatalogNumber => f.write_str("album.catalogNumber"),
            AlbumParentalAdvisory => f.write_str("album.parentalAdvisory"),

            Tracks => f.write_str("tracks"),
            TrackTitle(i) => write!(f, "tracks[{}].title", i),
            TrackTranslation(i, j) => write!(f, "tracks[{}].translations[{}]", i, j),
            TrackVersion(i) => write!(f, "tracks[{}].version", i),
            TrackFeaturing(i) => write!(f, "tracks[{}].featuring", i),
            TrackIsrc(i) => write!(f, "tracks[{}].isrc", i),
            TrackExplicitContent(i) => write!(f, "tracks[{}].explicitContent", i),
            TrackLanguage(i) => write!(f, "tracks[{}].language", i),
            TrackGenre(i) => write!(f, "tracks[{}].genre", i),
            TrackSubgenre(i) => write!(f, "tracks[{}].subgenre", i),
            TrackArtists(i) => write!(f, "tracks[{}].artists", i),
            TrackContributors(i) => write!(f, "tracks[{}].contributors", i),
            TrackContributor(i, j) => write!(f, "tracks[{}].contributors[{}]", i, j),

            FilesCoverArt => f.write_str("files.coverArt"),
            FilesAudio => f.write_str("files.audio"),
            FilesAudioFile(i) => write!(f, "files.audio[{}]", i),

            DistributionTerritories => f.write_str("distribution.territories"),
            DistributionExcludedTerritories => f.write_str("distribution.excludedTerritories"),
            DistributionPlatforms => f.write_str("distribution.selectedPlatforms"),
            DistributionPriceType => f.write_str("distribution.priceType"),

            MarketingDescription => f.write_str("marketing.description"),
            MarketingMoodTags => f.write_str("marketing.moodTags"),
            MarketingAngle => f.write_str("marketing.marketingAngle"),
        }
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
