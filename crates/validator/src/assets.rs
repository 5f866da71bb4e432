//! Inspection of the local files a snapshot points at.
//!
//! This is the only validation that touches the filesystem, so it lives
//! outside the rule table; callers merge its findings into the engine's
//! results.

use crate::finding::{Severity, ValidationFinding};
use image::ImageFormat;
use lofty::file::FileType;
use lofty::prelude::*;
use lofty::probe::Probe;
use release_qc_core::config::validate_path;
use release_qc_core::{FieldPath, FileRefs, QcSettings, SubmissionSnapshot};
use std::path::Path;
use tracing::debug;

fn finding(
    field: FieldPath,
    severity: Severity,
    rule: &'static str,
    message: impl Into<String>,
) -> ValidationFinding {
    ValidationFinding {
        field,
        severity,
        message: message.into(),
        suggestion: None,
        rule,
    }
}

/// Check cover art and audio files referenced by `snapshot.files`.
///
/// Relative paths resolve against `base_dir`. URLs point at assets that were
/// already uploaded and are skipped; empty references are reported by the
/// rule table, not here.
pub fn inspect_assets(
    snapshot: &SubmissionSnapshot,
    base_dir: &Path,
    settings: &QcSettings,
) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();

    let cover = snapshot.files.cover_art.as_str();
    if !cover.trim().is_empty() && !FileRefs::is_remote(cover) {
        inspect_cover_art(cover, base_dir, settings, &mut findings);
    }

    for (i, audio) in snapshot.files.audio.iter().enumerate() {
        if audio.trim().is_empty() || FileRefs::is_remote(audio) {
            continue;
        }
        inspect_audio(FieldPath::FilesAudioFile(i), audio, base_dir, settings, &mut findings);
    }

    debug!(findings = findings.len(), "asset inspection finished");
    findings
}

fn inspect_cover_art(
    reference: &str,
    base_dir: &Path,
    settings: &QcSettings,
    findings: &mut Vec<ValidationFinding>,
) {
    let field = FieldPath::FilesCoverArt;
    let relative = match validate_path(reference, "files.coverArt") {
        Ok(path) => path,
        Err(e) => {
            findings.push(finding(field, Severity::Error, "files-path-unsafe", e.to_string()));
            return;
        }
    };
    let path = base_dir.join(relative);
    if !path.is_file() {
        findings.push(finding(
            field,
            Severity::Error,
            "files-not-found",
            format!("Cover art not found: {}", path.display()),
        ));
        return;
    }

    match ImageFormat::from_path(&path) {
        Ok(ImageFormat::Jpeg) | Ok(ImageFormat::Png) => {}
        _ => {
            findings.push(finding(
                field,
                Severity::Error,
                "files-cover-art-format",
                "Cover art must be a JPG or PNG image",
            ));
            return;
        }
    }

    let (width, height) = match image::image_dimensions(&path) {
        Ok(dimensions) => dimensions,
        Err(e) => {
            findings.push(finding(
                field,
                Severity::Error,
                "files-cover-art-unreadable",
                format!("Cover art could not be read: {}", e),
            ));
            return;
        }
    };

    if width != height {
        findings.push(finding(
            field,
            Severity::Error,
            "files-cover-art-square",
            format!("Cover art must be square, got {}x{}", width, height),
        ));
    }
    let min = settings.min_cover_art_px;
    if width.min(height) < min {
        findings.push(finding(
            field,
            Severity::Error,
            "files-cover-art-size",
            format!(
                "Cover art must be at least {}x{} pixels, got {}x{}",
                min, min, width, height
            ),
        ));
    }
}

fn inspect_audio(
    field: FieldPath,
    reference: &str,
    base_dir: &Path,
    settings: &QcSettings,
    findings: &mut Vec<ValidationFinding>,
) {
    let relative = match validate_path(reference, &field.to_string()) {
        Ok(path) => path,
        Err(e) => {
            findings.push(finding(field, Severity::Error, "files-path-unsafe", e.to_string()));
            return;
        }
    };
    let path = base_dir.join(relative);
    if !path.is_file() {
        findings.push(finding(
            field,
            Severity::Error,
            "files-not-found",
            format!("Audio file not found: {}", path.display()),
        ));
        return;
    }

    let tagged_file = match Probe::open(&path).and_then(|probe| probe.read()) {
        Ok(file) => file,
        Err(e) => {
            findings.push(finding(
                field,
                Severity::Error,
                "files-audio-unreadable",
                format!("Audio file could not be read: {}", e),
            ));
            return;
        }
    };

    if !matches!(
        tagged_file.file_type(),
        FileType::Wav | FileType::Flac | FileType::Aiff
    ) {
        findings.push(finding(
            field,
            Severity::Error,
            "files-audio-format",
            "Audio must be lossless WAV, FLAC or AIFF",
        ));
        return;
    }

    let properties = tagged_file.properties();
    if let Some(rate) = properties.sample_rate()
        && rate < settings.min_sample_rate_hz
    {
        findings.push(finding(
            field,
            Severity::Error,
            "files-audio-sample-rate",
            format!(
                "Sample rate {} Hz is below the {} Hz minimum",
                rate, settings.min_sample_rate_hz
            ),
        ));
    }
    if let Some(depth) = properties.bit_depth()
        && !settings.accepted_bit_depths.contains(&depth)
    {
        findings.push(finding(
            field,
            Severity::Warning,
            "files-audio-bit-depth",
            format!("{}-bit audio may be converted; 16 or 24 bit is preferred", depth),
        ));
    }
}
