use crate::error::{Error, Result};
use crate::types::SubmissionSnapshot;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// On-disk encoding of a submission snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Toml,
    Json,
}

impl SnapshotFormat {
    /// Pick the format from a file extension. Anything that is not `.json`
    /// is read as TOML.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SnapshotFormat::Json,
            _ => SnapshotFormat::Toml,
        }
    }
}

/// Load a submission snapshot from a `.toml` or `.json` file
pub fn load_submission<P: AsRef<Path>>(path: P) -> Result<SubmissionSnapshot> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    parse_submission_str(&content, SnapshotFormat::from_path(path))
}

/// Parse a submission snapshot from a string (useful for testing)
pub fn parse_submission_str(content: &str, format: SnapshotFormat) -> Result<SubmissionSnapshot> {
    let snapshot = match format {
        SnapshotFormat::Toml => toml::from_str(content)?,
        SnapshotFormat::Json => serde_json::from_str(content)?,
    };
    Ok(snapshot)
}

/// Serialize a snapshot back to its on-disk encoding
pub fn write_submission<P: AsRef<Path>>(path: P, snapshot: &SubmissionSnapshot) -> Result<()> {
    let path = path.as_ref();
    let content = match SnapshotFormat::from_path(path) {
        SnapshotFormat::Toml => toml::to_string_pretty(snapshot)
            .map_err(|e| Error::InvalidData(format!("Cannot encode snapshot: {}", e)))?,
        SnapshotFormat::Json => serde_json::to_string_pretty(snapshot)?,
    };
    fs::write(path, content)?;
    Ok(())
}

/// Tunable thresholds for the quality-control rules.
///
/// Every field has a default, so an empty or partial settings file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QcSettings {
    /// Releases scheduled sooner than this many days out get a warning
    pub min_notice_days: i64,
    pub max_album_genres: usize,
    /// Distinct lyric languages across the track list before a warning
    pub max_track_languages: usize,
    pub min_marketing_description_chars: usize,
    /// Minimum cover art edge, in pixels
    pub min_cover_art_px: u32,
    pub min_sample_rate_hz: u32,
    pub accepted_bit_depths: Vec<u8>,
}

impl Default for QcSettings {
    fn default() -> Self {
        Self {
            min_notice_days: 14,
            max_album_genres: 3,
            max_track_languages: 2,
            min_marketing_description_chars: 50,
            min_cover_art_px: 3000,
            min_sample_rate_hz: 44_100,
            accepted_bit_depths: vec![16, 24],
        }
    }
}

/// Load QC settings from a TOML file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<QcSettings> {
    let content = fs::read_to_string(path)?;
    parse_settings_str(&content)
}

pub fn parse_settings_str(content: &str) -> Result<QcSettings> {
    let settings: QcSettings = toml::from_str(content)?;
    if settings.min_notice_days < 0 {
        return Err(Error::ConfigParse(format!(
            "min_notice_days must not be negative, got {}",
            settings.min_notice_days
        )));
    }
    Ok(settings)
}

/// Validate and convert a path string taken from a snapshot to a PathBuf.
///
/// Rejects absolute paths, parent directory references (`..`) and empty
/// paths, so a submission file cannot point the asset inspector outside
/// its own directory.
///
/// ```text
/// validate_path("audio/01.flac", "files.audio[0]")  → Ok(PathBuf)
/// validate_path("/etc/passwd", "files.coverArt")    → Err("Absolute paths not allowed...")
/// validate_path("../cover.jpg", "files.coverArt")   → Err("Parent directory references...")
/// ```
pub fn validate_path(path_str: &str, field_name: &str) -> Result<PathBuf> {
    if path_str.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    let path = Path::new(path_str);

    if path.is_absolute() {
        return Err(Error::ConfigParse(format!(
            "Absolute paths not allowed in '{}': '{}'. Use relative paths only.",
            field_name, path_str
        )));
    }

    if path.components().any(|c| c == Component::ParentDir) {
        return Err(Error::ConfigParse(format!(
            "Parent directory references (..) not allowed in '{}': '{}'",
            field_name, path_str
        )));
    }

    Ok(path.to_path_buf())
}
