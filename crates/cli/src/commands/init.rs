use anyhow::{Context, Result};
use chrono::{Datelike, Duration, Local};
use lofty::prelude::*;
use lofty::probe::Probe;
use release_qc_core::AlbumType;
use release_qc_core::config::{SnapshotFormat, parse_submission_str};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

pub const SUBMISSION_FILE: &str = "submission.toml";

/// Lossless formats stores accept; lossy files are reported but not listed
const AUDIO_EXTENSIONS: &[&str] = &["wav", "flac", "aif", "aiff"];
const LOSSY_EXTENSIONS: &[&str] = &["mp3", "ogg", "m4a", "aac"];
const COVER_ART_NAMES: &[&str] = &[
    "cover.jpg",
    "cover.png",
    "artwork/cover.jpg",
    "artwork/cover.png",
    "folder.jpg",
    "folder.png",
];
const MAX_SCAN_DEPTH: usize = 2;
/// Default release date offset, comfortably past the store notice period
const DEFAULT_LEAD_DAYS: i64 = 28;

/// Escape a string for a TOML basic string.
///
/// The template carries comments, so it is assembled by hand instead of
/// through `toml::to_string`.
fn toml_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\x08', "\\b")
        .replace('\x0C', "\\f")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[derive(Debug)]
struct DetectedTrack {
    /// Relative to the release directory
    path: PathBuf,
    title: String,
    sample_rate: Option<u32>,
    bit_depth: Option<u8>,
}

/// Scan a release directory and write a `submission.toml` skeleton.
///
/// Detected audio becomes the track list (titles from tags, else from file
/// names) and the album type is chosen from the track count. The result is
/// parsed back as a snapshot before it is written, so a template that the
/// validator cannot read is never left on disk.
pub async fn run(path: PathBuf, artist: Option<String>, title: Option<String>) -> Result<()> {
    println!("📁 Preparing submission in: {}", path.display());

    if !path.is_dir() {
        anyhow::bail!(
            "Directory '{}' does not exist. Create it first: mkdir {}",
            path.display(),
            path.display()
        );
    }

    let submission_path = path.join(SUBMISSION_FILE);
    if submission_path.exists() {
        anyhow::bail!(
            "{} already exists at {}\nHint: Delete it first or use a different directory",
            SUBMISSION_FILE,
            submission_path.display()
        );
    }

    let (audio_files, lossy) = scan_audio_files(&path)?;
    for file in &lossy {
        println!(
            "⚠ Skipping lossy file {} (stores need WAV, FLAC or AIFF)",
            file.display()
        );
    }
    if audio_files.is_empty() {
        println!("⚠ No lossless audio files found; writing an empty track list");
    } else {
        println!("✓ Found {} audio file(s)", audio_files.len());
    }

    let cover_art = detect_cover_art(&path)?;
    match &cover_art {
        Some(cover) => println!("✓ Detected cover art: {}", cover.display()),
        None => println!("⚠ No cover art found"),
    }

    let tracks = extract_track_metadata(&path, &audio_files);
    for track in &tracks {
        if let (Some(rate), Some(depth)) = (track.sample_rate, track.bit_depth) {
            println!("  • {} ({} Hz, {}-bit)", track.title, rate, depth);
        } else {
            println!("  • {}", track.title);
        }
    }

    let template = generate_submission_toml(
        &tracks,
        cover_art.as_deref(),
        artist.as_deref(),
        title.as_deref(),
    )?;
    fs::write(&submission_path, template)
        .with_context(|| format!("Failed to write {}", submission_path.display()))?;

    println!("\n✅ Wrote {}", submission_path.display());
    println!("\nNext steps:");
    println!("  1. Fill in the TODO fields in {}", SUBMISSION_FILE);
    println!("  2. Check it: release-qc validate {} --assets", path.display());
    println!("  3. Submit:   release-qc submit {}", submission_path.display());

    Ok(())
}

/// Audio files up to `MAX_SCAN_DEPTH` deep, sorted: (lossless, lossy).
fn scan_audio_files(dir: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut lossless = Vec::new();
    let mut lossy = Vec::new();

    for entry in WalkDir::new(dir)
        .max_depth(MAX_SCAN_DEPTH)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(ext) = entry.path().extension() else {
            continue;
        };
        let ext = ext.to_string_lossy().to_lowercase();
        if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            lossless.push(entry.path().to_path_buf());
        } else if LOSSY_EXTENSIONS.contains(&ext.as_str()) {
            lossy.push(entry.path().to_path_buf());
        }
    }

    lossless.sort();
    lossy.sort();
    Ok((lossless, lossy))
}

/// Cover art relative to `dir`: well-known names first, then any JPG/PNG.
fn detect_cover_art(dir: &Path) -> Result<Option<PathBuf>> {
    for name in COVER_ART_NAMES {
        if dir.join(name).is_file() {
            return Ok(Some(PathBuf::from(name)));
        }
    }

    let mut candidates: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(MAX_SCAN_DEPTH)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path().extension().is_some_and(|ext| {
                matches!(
                    ext.to_string_lossy().to_lowercase().as_str(),
                    "jpg" | "jpeg" | "png"
                )
            })
        })
        .filter_map(|e| e.path().strip_prefix(dir).ok().map(Path::to_path_buf))
        .collect();
    candidates.sort();
    Ok(candidates.into_iter().next())
}

fn extract_track_metadata(base: &Path, audio_files: &[PathBuf]) -> Vec<DetectedTrack> {
    audio_files
        .iter()
        .enumerate()
        .map(|(idx, path)| {
            let probed = match Probe::open(path).and_then(|probe| probe.read()) {
                Ok(file) => Some(file),
                Err(e) => {
                    debug!(path = %path.display(), "no readable tags: {}", e);
                    None
                }
            };

            let tag_title = probed.as_ref().and_then(|file| {
                file.primary_tag()
                    .and_then(|tag| tag.title().map(|t| t.trim().to_string()))
                    .filter(|t| !t.is_empty())
            });
            let properties = probed.as_ref().map(|file| file.properties());

            DetectedTrack {
                path: path.strip_prefix(base).unwrap_or(path).to_path_buf(),
                title: tag_title.unwrap_or_else(|| extract_track_title(path, idx + 1)),
                sample_rate: properties.and_then(|p| p.sample_rate()),
                bit_depth: properties.and_then(|p| p.bit_depth()),
            }
        })
        .collect()
}

/// Human-readable title from a file name.
///
/// - `01-love-poem.flac` → "Love Poem"
/// - `02_blueming.wav` → "Blueming"
/// - `track-03.flac` → "Track 3"
fn extract_track_title(path: &Path, track_number: usize) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");

    let cleaned = stem
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == '-' || c == '_' || c == '.')
        .trim_start_matches("track")
        .trim_start_matches(['-', '_'])
        .trim();

    if cleaned.is_empty() || cleaned.chars().all(|c| c.is_ascii_digit()) {
        return format!("Track {}", track_number);
    }

    cleaned
        .replace(['_', '-'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn toml_path(path: &Path) -> String {
    toml_escape_string(&path.to_string_lossy().replace('\\', "/"))
}

fn generate_submission_toml(
    tracks: &[DetectedTrack],
    cover_art: Option<&Path>,
    artist: Option<&str>,
    title: Option<&str>,
) -> Result<String> {
    let today = Local::now().date_naive();
    let release_date = (today + Duration::days(DEFAULT_LEAD_DAYS)).format("%Y-%m-%d");
    let year = today.year();

    let artist_name = toml_escape_string(artist.unwrap_or(""));
    let album_title = toml_escape_string(title.unwrap_or(""));
    let artist_comment = if artist.is_some() { "" } else { "  # TODO: Set artist name" };
    let title_comment = if title.is_some() { "" } else { "  # TODO: Set album title" };
    let album_type = AlbumType::for_track_count(tracks.len())
        .map(|t| t.to_string().to_lowercase())
        .unwrap_or_else(|| "single".to_string());
    let cover = cover_art.map(toml_path).unwrap_or_default();

    let mut toml = format!(
        "# Generated by release-qc init\n\
# Validate with: release-qc validate <this file>\n\
\n\
[artist]\n\
name = \"{artist_name}\"{artist_comment}\n\
type = \"\"  # TODO: solo, group or band\n\
country = \"\"  # Two-letter ISO code, e.g. KR\n\
\n\
[album]\n\
title = \"{album_title}\"{title_comment}\n\
type = \"{album_type}\"  # Detected from the track count\n\
genres = []  # TODO: At least one genre\n\
releaseDate = \"{release_date}\"\n\
copyrightYear = \"{year}\"\n\
copyrightHolder = \"\"  # TODO: Rights holder, without the (C) symbol\n\
productionYear = \"{year}\"\n\
productionHolder = \"\"\n\
autoGenerateUpc = true\n\
parentalAdvisory = false\n\
\n"
    );

    if tracks.is_empty() {
        toml.push_str(
            r##"# Add one [[tracks]] table per audio file
# [[tracks]]
# title = "Track Name"
# isrc = ""
# language = "korean"

"##,
        );
    } else {
        for track in tracks {
            toml.push_str("[[tracks]]\n");
            toml.push_str(&format!("title = \"{}\"\n", toml_escape_string(&track.title)));
            toml.push_str("isrc = \"\"  # Leave empty to have one assigned\n");
            toml.push_str("language = \"\"\n");
            toml.push_str(&format!("artists = [\"{}\"]\n", artist_name));
            toml.push('\n');
        }
    }

    let audio: Vec<String> = tracks
        .iter()
        .map(|t| format!("\"{}\"", toml_path(&t.path)))
        .collect();
    toml.push_str(&format!(
        "[files]\n\
coverArt = \"{cover}\"\n\
audio = [{}]\n\
\n\
[distribution]\n\
territories = [\"WW\"]\n\
excludedTerritories = []\n\
selectedPlatforms = []  # TODO: e.g. [\"spotify\", \"apple-music\"]\n\
priceType = \"PAID\"\n\
\n\
[marketing]\n\
description = \"\"\n\
moodTags = []\n",
        audio.join(", ")
    ));

    parse_submission_str(&toml, SnapshotFormat::Toml)
        .context("Generated submission is invalid - this is a bug in the template generator")?;

    Ok(toml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir_with(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, b"fake data").unwrap();
        }
        dir
    }

    fn detected(path: &str, title: &str) -> DetectedTrack {
        DetectedTrack {
            path: PathBuf::from(path),
            title: title.to_string(),
            sample_rate: None,
            bit_depth: None,
        }
    }

    #[test]
    fn test_extract_track_title() {
        assert_eq!(
            extract_track_title(Path::new("01-love-poem.flac"), 1),
            "Love Poem"
        );
        assert_eq!(extract_track_title(Path::new("02_blueming.wav"), 2), "Blueming");
        assert_eq!(extract_track_title(Path::new("track-03.flac"), 3), "Track 3");
        assert_eq!(extract_track_title(Path::new("04.aiff"), 4), "Track 4");
        assert_eq!(
            extract_track_title(Path::new("05-UNLUCKY.flac"), 5),
            "Unlucky"
        );
    }

    #[test]
    fn test_scan_separates_lossy_files() {
        let dir = create_test_dir_with(&["b.flac", "a.wav", "c.mp3", "cover.jpg", "d.AIFF"]);
        let (lossless, lossy) = scan_audio_files(dir.path()).unwrap();
        let names: Vec<_> = lossless
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.wav", "b.flac", "d.AIFF"]);
        assert_eq!(lossy.len(), 1);
    }

    #[test]
    fn test_scan_respects_max_depth() {
        let dir = create_test_dir_with(&["audio/01.flac", "deep/er/still/02.flac"]);
        let (lossless, _) = scan_audio_files(dir.path()).unwrap();
        assert_eq!(lossless.len(), 1);
    }

    #[test]
    fn test_detect_cover_art_prefers_known_names() {
        let dir = create_test_dir_with(&["random.jpg", "artwork/cover.png"]);
        assert_eq!(
            detect_cover_art(dir.path()).unwrap(),
            Some(PathBuf::from("artwork/cover.png"))
        );

        let dir = create_test_dir_with(&["zeta.png", "alpha.JPG"]);
        assert_eq!(
            detect_cover_art(dir.path()).unwrap(),
            Some(PathBuf::from("alpha.JPG"))
        );

        let dir = create_test_dir_with(&["notes.txt"]);
        assert_eq!(detect_cover_art(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_unreadable_audio_falls_back_to_file_name() {
        let dir = create_test_dir_with(&["audio/01-love-poem.flac"]);
        let files = vec![dir.path().join("audio/01-love-poem.flac")];
        let tracks = extract_track_metadata(dir.path(), &files);
        assert_eq!(tracks[0].title, "Love Poem");
        assert_eq!(tracks[0].path, PathBuf::from("audio/01-love-poem.flac"));
        assert_eq!(tracks[0].sample_rate, None);
    }

    #[test]
    fn test_template_parses_as_snapshot() {
        let tracks = vec![
            detected("audio/01-love-poem.flac", "Love Poem"),
            detected("audio/02-blueming.flac", "Blueming"),
        ];
        let toml = generate_submission_toml(
            &tracks,
            Some(Path::new("artwork/cover.jpg")),
            Some("IU"),
            Some("Love Poem"),
        )
        .unwrap();

        let snapshot = parse_submission_str(&toml, SnapshotFormat::Toml).unwrap();
        assert_eq!(snapshot.artist.name, "IU");
        assert_eq!(snapshot.album.album_type, Some(AlbumType::Single));
        assert!(snapshot.album.auto_generate_upc);
        assert_eq!(snapshot.tracks.len(), 2);
        assert_eq!(snapshot.tracks[1].title, "Blueming");
        assert_eq!(snapshot.files.audio[0], "audio/01-love-poem.flac");
        assert_eq!(snapshot.files.cover_art, "artwork/cover.jpg");
        assert_eq!(snapshot.distribution.territories, vec!["WW"]);
    }

    #[test]
    fn test_template_escapes_user_input() {
        let toml = generate_submission_toml(
            &[detected("01.flac", "Say \"Hi\"")],
            None,
            Some("Back\\slash"),
            None,
        )
        .unwrap();
        let snapshot = parse_submission_str(&toml, SnapshotFormat::Toml).unwrap();
        assert_eq!(snapshot.artist.name, "Back\\slash");
        assert_eq!(snapshot.tracks[0].title, "Say \"Hi\"");
        assert_eq!(snapshot.tracks[0].artists, vec!["Back\\slash"]);
    }

    #[test]
    fn test_empty_template_is_valid_toml() {
        let toml = generate_submission_toml(&[], None, None, None).unwrap();
        assert!(toml.contains("# [[tracks]]"));
        let snapshot = parse_submission_str(&toml, SnapshotFormat::Toml).unwrap();
        assert!(snapshot.tracks.is_empty());
    }

    #[test]
    fn test_toml_escape_string() {
        assert_eq!(toml_escape_string("plain"), "plain");
        assert_eq!(toml_escape_string("a\"b"), "a\\\"b");
        assert_eq!(toml_escape_string("line\nbreak\ttab"), "line\\nbreak\\ttab");
    }

    #[tokio::test]
    async fn test_run_refuses_to_overwrite() {
        let dir = create_test_dir_with(&[SUBMISSION_FILE]);
        let err = run(dir.path().to_path_buf(), None, None).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_run_writes_submission() {
        let dir = create_test_dir_with(&["audio/01-love-poem.flac", "cover.jpg"]);
        run(dir.path().to_path_buf(), Some("IU".into()), Some("Love Poem".into()))
            .await
            .unwrap();
        let snapshot =
            release_qc_core::load_submission(dir.path().join(SUBMISSION_FILE)).unwrap();
        assert_eq!(snapshot.tracks.len(), 1);
        assert_eq!(snapshot.files.cover_art, "cover.jpg");
    }
}
