//! Metadata style lints for names, titles, credits and copyright lines.
//!
//! Each lint looks at one string and returns a [`Hit`] when it finds a
//! problem. Empty input never produces a hit; emptiness is the business of
//! the `Required` rules.

use regex::{Captures, Regex};
use std::sync::OnceLock;

/// A lint match: optional message override plus an optional replacement
/// value the user can accept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hit {
    pub message: Option<String>,
    pub suggestion: Option<String>,
}

impl Hit {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn suggest(value: impl Into<String>) -> Self {
        Self {
            message: None,
            suggestion: Some(value.into()),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

pub type TextLint = fn(&str) -> Option<Hit>;

const PROMOTIONAL_TERMS: &str = r"(?i)\b(NEW|HOT|EXCLUSIVE|FRESH|LATEST|BEST|TOP|SALE|FREE|DOWNLOAD|CLICK|STREAM NOW|OUT NOW|AVAILABLE NOW|LIMITED EDITION|SPECIAL EDITION|DELUXE|BONUS|PRE-ORDER|DIGITAL DOWNLOAD|STREAMING|MUST HAVE|HIT|CHART)\b";

const FORBIDDEN_ARTIST_CHARS: &[char] = &['<', '>', '{', '}', '[', ']', '\\', '|', '^', '`', '~'];

const GENERIC_ARTIST_NAMES: &[&str] = &[
    "various artists",
    "various",
    "unknown artist",
    "unknown",
    "artist",
    "tbd",
    "tba",
    "n/a",
    "none",
    "untitled",
];

const MISLEADING_ARTIST_TERMS: &[&str] = &[
    "feat.", "featuring", "with", "vs", "vs.", "versus", "presents", "pres.", "&", "and",
];

const ABBREVIATIONS: &[(&str, &str)] = &[
    ("feat.", "featuring"),
    ("ft.", "featuring"),
    ("vs.", "versus"),
    ("pres.", "presents"),
];

/// Words left lowercase in English title case unless they open the title.
const TITLE_CASE_MINOR_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with",
];

const FORBIDDEN_VERSION_TERMS: &[&str] = &[
    "original",
    "original mix",
    "original version",
    "studio version",
    "album version",
];

const VERSION_KEYWORDS: &[&str] = &[
    "remix",
    "acoustic",
    "live",
    "instrumental",
    "demo",
    "radio edit",
    "extended",
    "clean",
    "explicit",
    "remastered",
    "unplugged",
    "mix",
    "version",
    "special edition",
    "deluxe edition",
    "anniversary edition",
];

const PROPER_VERSIONS: &[(&str, &str)] = &[
    ("remix", "Remix"),
    ("acoustic", "Acoustic"),
    ("live", "Live"),
    ("instrumental", "Instrumental"),
    ("demo", "Demo"),
    ("radio edit", "Radio Edit"),
    ("extended", "Extended Mix"),
    ("extended mix", "Extended Mix"),
    ("clean", "Clean"),
    ("explicit", "Explicit"),
    ("remastered", "Remastered"),
    ("unplugged", "Unplugged"),
];

/// Languages whose titles use sentence case, with the articles that may
/// appear lowercase mid-title.
const SENTENCE_CASE_LANGUAGES: &[(&str, &[&str])] = &[
    ("french", &["le", "la", "les", "un", "une", "des", "du", "de"]),
    (
        "italian",
        &[
            "il", "lo", "la", "i", "gli", "le", "un", "uno", "una", "del", "dello", "della", "dei",
            "degli", "delle",
        ],
    ),
    (
        "spanish",
        &["el", "la", "los", "las", "un", "una", "unos", "unas", "del", "al"],
    ),
    ("swedish", &[]),
    ("norwegian", &[]),
    ("danish", &[]),
];

const GERMAN_SPELLINGS: &[(&str, &str)] = &[
    ("fuer", "für"),
    ("ueber", "über"),
    ("koennen", "können"),
    ("moechte", "möchte"),
    ("waehrend", "während"),
    ("grosse", "große"),
    ("strasse", "straße"),
];

fn abbreviation_res() -> &'static [(Regex, &'static str)] {
    static RES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RES.get_or_init(|| {
        ABBREVIATIONS
            .iter()
            .map(|(abbr, full)| {
                let pattern = format!(r"(?i)\b{}", regex::escape(abbr));
                let re = Regex::new(&pattern).expect("abbreviation regex must compile");
                (re, *full)
            })
            .collect()
    })
}

fn german_spelling_res() -> &'static [(Regex, &'static str)] {
    static RES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RES.get_or_init(|| {
        GERMAN_SPELLINGS
            .iter()
            .map(|(incorrect, correct)| {
                let pattern = format!(r"(?i)\b{}\b", incorrect);
                let re = Regex::new(&pattern).expect("German spelling regex must compile");
                (re, *correct)
            })
            .collect()
    })
}

fn multi_space_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r" {2,}").expect("multi-space regex must compile"))
}

fn promotional_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PROMOTIONAL_TERMS).expect("promotional regex must compile"))
}

fn aka_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(aka|a\.k\.a)\b").expect("aka regex must compile"))
}

fn duo_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^[a-z0-9 ]+ (&|and) [a-z0-9 ]+$").expect("duo regex must compile")
    })
}

fn featuring_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(feat\.?|ft\.?|featuring)\s+(.+)$")
            .expect("featuring prefix regex must compile")
    })
}

fn trailing_parenthetical_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\s*\([^)]*\)\s*$").expect("trailing parenthetical regex must compile")
    })
}

pub fn double_spaces(s: &str) -> Option<Hit> {
    if !s.contains("  ") {
        return None;
    }
    Some(Hit::suggest(multi_space_re().replace_all(s, " ")))
}

pub fn edge_whitespace(s: &str) -> Option<Hit> {
    let trimmed = s.trim();
    if trimmed.len() == s.len() {
        return None;
    }
    Some(Hit::suggest(trimmed))
}

pub fn forbidden_characters(s: &str) -> Option<Hit> {
    if !s.contains(FORBIDDEN_ARTIST_CHARS) {
        return None;
    }
    let cleaned: String = s
        .chars()
        .filter(|c| !FORBIDDEN_ARTIST_CHARS.contains(c))
        .collect();
    Some(Hit::suggest(cleaned))
}

pub fn promotional_terms(s: &str) -> Option<Hit> {
    let found = promotional_re().find(s)?;
    Some(Hit::plain().with_message(format!(
        "Promotional wording '{}' is not allowed in metadata",
        found.as_str()
    )))
}

fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F600..=0x1F64F
            | 0x1F300..=0x1F5FF
            | 0x1F680..=0x1F6FF
            | 0x1F1E0..=0x1F1FF
            | 0x2600..=0x26FF
            | 0x2700..=0x27BF
    )
}

pub fn emoji(s: &str) -> Option<Hit> {
    if !s.chars().any(is_emoji) {
        return None;
    }
    let cleaned: String = s.chars().filter(|c| !is_emoji(*c)).collect();
    Some(Hit::suggest(cleaned.trim()))
}

pub fn unmatched_brackets(s: &str) -> Option<Hit> {
    let unbalanced: Vec<String> = [('(', ')'), ('[', ']'), ('{', '}')]
        .iter()
        .filter(|(open, close)| s.matches(*open).count() != s.matches(*close).count())
        .map(|(open, close)| format!("{}{}", open, close))
        .collect();

    if unbalanced.is_empty() {
        return None;
    }
    Some(Hit::plain().with_message(format!(
        "Unmatched brackets: {}",
        unbalanced.join(", ")
    )))
}

fn is_minor_word(word: &str) -> bool {
    TITLE_CASE_MINOR_WORDS.contains(&word.to_lowercase().as_str())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// English title case. Only words that start with a lowercase ASCII letter
/// are flagged, so titles in non-Latin scripts pass untouched.
pub fn title_case(s: &str) -> Option<Hit> {
    let words: Vec<&str> = s.split(' ').collect();
    let needs_fix = words.iter().enumerate().any(|(i, word)| {
        if i > 0 && is_minor_word(word) {
            return false;
        }
        word.chars().next().is_some_and(|c| c.is_ascii_lowercase())
    });

    if !needs_fix {
        return None;
    }

    let fixed: Vec<String> = words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            if i > 0 && is_minor_word(word) {
                word.to_lowercase()
            } else {
                capitalize(word)
            }
        })
        .collect();
    Some(Hit::suggest(fixed.join(" ")))
}

pub fn generic_artist_name(s: &str) -> Option<Hit> {
    let lower = s.trim().to_lowercase();
    if GENERIC_ARTIST_NAMES.contains(&lower.as_str()) {
        Some(Hit::plain())
    } else {
        None
    }
}

/// Collaboration wording belongs in the track credits, not the artist name.
/// A plain two-name duo ("Simon & Garfunkel") is allowed.
pub fn misleading_artist_terms(s: &str) -> Option<Hit> {
    if duo_re().is_match(s.trim()) {
        return None;
    }
    let lower = s.to_lowercase();
    let term = lower
        .split_whitespace()
        .find(|word| MISLEADING_ARTIST_TERMS.contains(word))?;
    Some(Hit::plain().with_message(format!(
        "Artist name contains collaboration wording '{}'; credit collaborators separately",
        term
    )))
}

pub fn aka_in_artist_name(s: &str) -> Option<Hit> {
    if aka_re().is_match(s) {
        Some(Hit::plain())
    } else {
        None
    }
}

pub fn abbreviations(s: &str) -> Option<Hit> {
    let mut fixed = s.to_string();
    let mut found = false;
    for (re, full) in abbreviation_res() {
        if re.is_match(&fixed) {
            fixed = re.replace_all(&fixed, *full).into_owned();
            found = true;
        }
    }
    if found { Some(Hit::suggest(fixed)) } else { None }
}

fn strip_symbols(s: &str, symbols: &[&str]) -> Option<Hit> {
    if !symbols.iter().any(|sym| s.contains(sym)) {
        return None;
    }
    let mut cleaned = s.to_string();
    for sym in symbols {
        cleaned = cleaned.replace(sym, "");
    }
    Some(Hit::suggest(multi_space_re().replace_all(cleaned.trim(), " ")))
}

/// The © is added by the stores; the line should hold only the holder.
pub fn copyright_symbol(s: &str) -> Option<Hit> {
    strip_symbols(s, &["©", "(C)", "(c)"])
}

/// Same as [`copyright_symbol`] for the ℗ line.
pub fn production_symbol(s: &str) -> Option<Hit> {
    strip_symbols(s, &["℗", "(P)", "(p)"])
}

pub fn forbidden_version_term(version: &str) -> Option<Hit> {
    let lower = version.trim().to_lowercase();
    if FORBIDDEN_VERSION_TERMS.contains(&lower.as_str()) {
        Some(Hit::suggest("").with_message(format!(
            "'{}' is not a version; leave the version empty for the original recording",
            version.trim()
        )))
    } else {
        None
    }
}

pub fn version_capitalization(version: &str) -> Option<Hit> {
    let lower = version.trim().to_lowercase();
    let (_, proper) = PROPER_VERSIONS.iter().find(|(key, _)| *key == lower)?;
    if version.trim() == *proper {
        None
    } else {
        Some(Hit::suggest(*proper))
    }
}

/// Featured artists are credited as `feat. Name`.
pub fn featuring_format(featuring: &str) -> Option<Hit> {
    let trimmed = featuring.trim();
    match featuring_prefix_re().captures(trimmed) {
        Some(caps) => {
            if &caps[1] == "feat." {
                None
            } else {
                Some(
                    Hit::suggest(format!("feat. {}", &caps[2]))
                        .with_message(format!("Use 'feat.' instead of '{}'", &caps[1])),
                )
            }
        }
        None => Some(
            Hit::suggest(format!("feat. {}", trimmed))
                .with_message("Featuring credit is missing the 'feat.' prefix"),
        ),
    }
}

/// The title with any trailing parenthetical (version, feat.) removed,
/// trimmed and lowercased. Used to compare a single's tracks to its title.
pub fn base_title(title: &str) -> String {
    trailing_parenthetical_re()
        .replace(title, "")
        .trim()
        .to_lowercase()
}

/// True when the title already spells out a version keyword.
pub fn version_in_title(title: &str) -> bool {
    let words: Vec<String> = title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();
    let padded = format!(" {} ", words.join(" "));
    VERSION_KEYWORDS
        .iter()
        .any(|keyword| padded.contains(&format!(" {} ", keyword)))
}

/// True when the title does not end in a parenthetical.
pub fn version_outside_parentheses(title: &str) -> bool {
    !trailing_parenthetical_re().is_match(title)
}

/// Whether titles in `language` follow sentence case instead of English
/// title case.
pub fn uses_sentence_case(language: &str) -> bool {
    let lower_language = language.trim().to_lowercase();
    SENTENCE_CASE_LANGUAGES
        .iter()
        .any(|(name, _)| *name == lower_language)
}

/// Sentence-case check for languages that do not capitalize every word.
pub fn sentence_case(title: &str, language: &str) -> Option<Hit> {
    let lower_language = language.trim().to_lowercase();
    let (_, articles) = SENTENCE_CASE_LANGUAGES
        .iter()
        .find(|(name, _)| *name == lower_language)?;

    let offenders: Vec<&str> = title
        .split(' ')
        .skip(1)
        .filter(|word| !articles.contains(&word.to_lowercase().as_str()))
        .filter(|word| {
            word.chars().count() > 1
                && word.chars().next().is_some_and(char::is_uppercase)
                && *word != word.to_uppercase()
        })
        .collect();

    if offenders.is_empty() {
        return None;
    }
    Some(Hit::plain().with_message(format!(
        "{} titles use sentence case; check: {}",
        capitalize(&lower_language),
        offenders.join(", ")
    )))
}

/// Transliterated umlauts and ß in German titles. Only whole words are
/// replaced, keeping the case of their first letter.
pub fn german_orthography(text: &str) -> Option<Hit> {
    let mut fixed = text.to_string();
    let mut found = false;
    for (re, correct) in german_spelling_res() {
        if re.is_match(&fixed) {
            fixed = re
                .replace_all(&fixed, |caps: &Captures| match_first_case(&caps[0], correct))
                .into_owned();
            found = true;
        }
    }
    if found { Some(Hit::suggest(fixed)) } else { None }
}

fn match_first_case(found: &str, replacement: &str) -> String {
    if found.chars().next().is_some_and(char::is_uppercase) {
        capitalize(replacement)
    } else {
        replacement.to_string()
    }
}
