use chrono::NaiveDate;
use release_qc_core::{
    AlbumType, Contributor, FieldPath, SubmissionSnapshot, TrackInfo, Translation,
};
use release_qc_validator::{
    QcValidationResults, Severity, Step, ValidationContext, apply_suggestion, can_proceed,
    can_submit, generate_ean, generate_upc, validate_ean, validate_upc, validate_with,
};
use std::collections::BTreeSet;

fn ctx() -> ValidationContext {
    ValidationContext::on(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
}

fn translation(language: &str, value: &str) -> Translation {
    Translation {
        language: language.to_string(),
        value: value.to_string(),
    }
}

/// A single that passes every rule on 2026-03-01.
fn complete_single() -> SubmissionSnapshot {
    let mut s = SubmissionSnapshot::empty();

    s.artist.name = "IU".to_string();
    s.artist.display_name = "IU".to_string();
    s.artist.artist_type = "solo".to_string();
    s.artist.country = "KR".to_string();
    s.artist.translations = vec![translation("ko", "아이유")];

    s.album.title = "Love Poem".to_string();
    s.album.title_translations = vec![translation("ko", "러브포엠")];
    s.album.album_type = Some(AlbumType::Single);
    s.album.genres = vec!["K-Pop".to_string()];
    s.album.release_date = "2026-04-15".to_string();
    s.album.copyright_year = "2026".to_string();
    s.album.copyright_holder = "EDAM Entertainment".to_string();
    s.album.production_year = "2026".to_string();
    s.album.production_holder = "EDAM Entertainment".to_string();
    s.album.upc = "036000291452".to_string();

    s.tracks = vec![TrackInfo {
        title: "Love Poem".to_string(),
        isrc: "KRA381900001".to_string(),
        language: "korean".to_string(),
        genre: "K-Pop".to_string(),
        artists: vec!["IU".to_string()],
        contributors: vec![Contributor {
            name: "IU".to_string(),
            role: "composer".to_string(),
        }],
        ..TrackInfo::default()
    }];

    s.files.cover_art = "artwork/cover.jpg".to_string();
    s.files.audio = vec!["audio/01-love-poem.flac".to_string()];

    s.distribution.territories = vec!["WW".to_string()];
    s.distribution.selected_platforms = vec!["spotify".to_string(), "apple-music".to_string()];
    s.distribution.price_type = "PAID".to_string();

    s.marketing.description =
        "A quiet piano ballad written as a letter of comfort to listeners.".to_string();
    s.marketing.mood_tags = vec!["calm".to_string()];
    s
}

fn error_keys(results: &QcValidationResults) -> BTreeSet<(String, &'static str)> {
    results
        .errors()
        .map(|f| (f.field.to_string(), f.rule))
        .collect()
}

/// Reference UPC-A check digit: weights 3,1,3,... counted from the digit
/// next to the check digit, leftward.
fn expected_upc_check_digit(payload: &str) -> u32 {
    let sum: u32 = payload
        .chars()
        .rev()
        .enumerate()
        .map(|(i, c)| c.to_digit(10).unwrap() * if i % 2 == 0 { 3 } else { 1 })
        .sum();
    (10 - sum % 10) % 10
}

#[test]
fn test_complete_snapshot_passes() {
    let results = validate_with(&complete_single(), &ctx());
    assert!(results.is_valid, "unexpected findings: {:#?}", results.findings);
    assert!(results.is_empty(), "unexpected findings: {:#?}", results.findings);
    assert!(can_submit(&results));
}

#[test]
fn test_generated_codes_validate() {
    for _ in 0..500 {
        assert!(validate_upc(&generate_upc()));
        assert!(validate_ean(&generate_ean()));
    }
}

#[test]
fn test_single_digit_mutation_is_rejected() {
    for _ in 0..20 {
        let checks: [(String, fn(&str) -> bool); 2] = [
            (generate_upc(), validate_upc),
            (generate_ean(), validate_ean),
        ];
        for (code, validate) in checks {
            for position in 0..code.len() {
                let original = code.as_bytes()[position];
                for replacement in b'0'..=b'9' {
                    if replacement == original {
                        continue;
                    }
                    let mut bytes = code.clone().into_bytes();
                    bytes[position] = replacement;
                    let mutated = String::from_utf8(bytes).unwrap();
                    assert!(
                        !validate(&mutated),
                        "{} (mutated from {}) still validates",
                        mutated,
                        code
                    );
                }
            }
        }
    }
}

#[test]
fn test_validation_is_deterministic() {
    let mut snapshot = complete_single();
    snapshot.artist.name = "  NEW IU  ".to_string();
    snapshot.tracks.push(TrackInfo::default());
    let first = validate_with(&snapshot, &ctx());
    let second = validate_with(&snapshot, &ctx());
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn test_filling_a_required_field_only_removes_errors() {
    let mut before = complete_single();
    before.album.copyright_holder.clear();
    before.artist.name.clear();
    let before_results = validate_with(&before, &ctx());
    assert!(
        before_results
            .errors()
            .any(|f| f.field == FieldPath::AlbumCopyrightHolder)
    );

    let mut after = before.clone();
    after.album.copyright_holder = "EDAM Entertainment".to_string();
    let after_results = validate_with(&after, &ctx());

    assert!(
        !after_results
            .errors()
            .any(|f| f.field == FieldPath::AlbumCopyrightHolder)
    );
    assert!(error_keys(&after_results).is_subset(&error_keys(&before_results)));
}

#[test]
fn test_step_gating_follows_field_ownership() {
    let mut snapshot = complete_single();
    snapshot.artist.name.clear();
    let results = validate_with(&snapshot, &ctx());

    assert!(!can_proceed(Step::ArtistInformation, &results));
    for step in [
        Step::AlbumInformation,
        Step::TrackInformation,
        Step::FileUpload,
        Step::DistributionSettings,
    ] {
        assert!(can_proceed(step, &results), "{} should not be blocked", step);
    }
    assert!(!can_proceed(Step::ReviewAndSubmit, &results));
}

#[test]
fn test_single_with_five_tracks_warns() {
    let mut snapshot = complete_single();
    let track = snapshot.tracks[0].clone();
    snapshot.tracks = (0..5)
        .map(|i| TrackInfo {
            isrc: format!("KRA38190000{}", i + 1),
            ..track.clone()
        })
        .collect();
    snapshot.files.audio = (1..=5).map(|i| format!("audio/{:02}.flac", i)).collect();

    let results = validate_with(&snapshot, &ctx());
    let mismatch: Vec<_> = results
        .findings
        .iter()
        .filter(|f| f.field == FieldPath::Tracks && f.message.contains("found 5"))
        .collect();
    assert_eq!(mismatch.len(), 1);
    assert_eq!(mismatch[0].severity, Severity::Warning);
    assert!(results.is_valid, "unexpected errors: {:#?}", results.findings);
}

#[test]
fn test_partial_iu_submission() {
    let json = r#"{
        "artist": { "name": "IU" },
        "album": { "title": "", "type": "single", "copyrightHolder": "", "upc": "123456789012" },
        "tracks": [ { "title": "A" } ]
    }"#;
    let snapshot: SubmissionSnapshot = serde_json::from_str(json).unwrap();
    let results = validate_with(&snapshot, &ctx());

    assert!(!results.is_valid);
    assert!(results.errors().any(|f| f.field == FieldPath::AlbumTitle));
    assert!(
        results
            .errors()
            .any(|f| f.field == FieldPath::AlbumCopyrightHolder)
    );

    // payload 12345678901, printed check digit 2
    let checksum_ok = expected_upc_check_digit("12345678901") == 2;
    assert!(checksum_ok);
    assert_eq!(validate_upc("123456789012"), checksum_ok);
    assert_eq!(
        results.for_field(FieldPath::AlbumUpc).any(|f| f.is_error()),
        !checksum_ok
    );
}

#[test]
fn test_filling_album_title_only_removes_errors() {
    let json = r#"{
        "artist": { "name": "IU" },
        "album": { "title": "", "type": "single", "copyrightHolder": "", "upc": "123456789012" },
        "tracks": [ { "title": "A" } ]
    }"#;
    let before: SubmissionSnapshot = serde_json::from_str(json).unwrap();
    let before_results = validate_with(&before, &ctx());

    let mut after = before.clone();
    after.album.title = "Love Poem".to_string();
    let after_results = validate_with(&after, &ctx());

    assert!(!after_results.errors().any(|f| f.field == FieldPath::AlbumTitle));
    assert!(
        error_keys(&after_results).is_subset(&error_keys(&before_results)),
        "new errors: {:?}",
        error_keys(&after_results).difference(&error_keys(&before_results))
    );
    assert!(
        after_results
            .warnings()
            .any(|f| f.rule == "tracks-single-title" && f.field == FieldPath::TrackTitle(0))
    );
}

#[test]
fn test_blank_album_type_is_a_finding() {
    let json = r#"{ "artist": { "name": "IU" }, "album": { "type": "" } }"#;
    let snapshot: SubmissionSnapshot = serde_json::from_str(json).unwrap();
    let results = validate_with(&snapshot, &ctx());
    assert!(
        results
            .errors()
            .any(|f| f.rule == "album-type-required" && f.field == FieldPath::AlbumType)
    );
}

#[test]
fn test_sentence_case_track_has_no_casing_finding() {
    let mut snapshot = complete_single();
    snapshot.album.title = "La vie en rose".to_string();
    snapshot.tracks[0].title = "La vie en rose".to_string();
    snapshot.tracks[0].language = "french".to_string();

    let results = validate_with(&snapshot, &ctx());
    let casing: Vec<&str> = results
        .for_field(FieldPath::TrackTitle(0))
        .map(|f| f.rule)
        .collect();
    assert!(casing.is_empty(), "unexpected findings: {:?}", casing);
}

#[test]
fn test_title_case_fix_settles_for_english_tracks() {
    let mut snapshot = complete_single();
    snapshot.album.title = "through the night".to_string();
    snapshot.tracks[0].title = "through the night".to_string();
    snapshot.tracks[0].language = "english".to_string();

    let results = validate_with(&snapshot, &ctx());
    let finding = results
        .for_field(FieldPath::TrackTitle(0))
        .find(|f| f.rule == "track-title-case")
        .unwrap();
    let fixed = apply_suggestion(&snapshot, finding).unwrap();
    assert_eq!(fixed.tracks[0].title, "Through the Night");

    let results = validate_with(&fixed, &ctx());
    assert!(
        !results
            .for_field(FieldPath::TrackTitle(0))
            .any(|f| f.rule.starts_with("track-title")),
        "{:#?}",
        results.findings
    );
}

#[test]
fn test_missing_songwriter_is_reported_on_contributors() {
    let mut snapshot = complete_single();
    snapshot.tracks[0].contributors[0].role = "producer".to_string();

    let results = validate_with(&snapshot, &ctx());
    let finding = results
        .findings
        .iter()
        .find(|f| f.rule == "track-songwriter-missing")
        .unwrap();
    assert_eq!(finding.field, FieldPath::TrackContributors(0));
    assert_eq!(finding.field.to_string(), "tracks[0].contributors");
}
