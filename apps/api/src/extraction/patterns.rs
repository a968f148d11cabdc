//! Pattern Library — compiled matchers shared by every extraction call.
//!
//! All regexes are compiled once into `Lazy` statics and never mutated, so
//! concurrent extraction calls read them without synchronisation.

use once_cell::sync::Lazy;
use regex::Regex;

pub static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}\b").unwrap());

pub static LINKEDIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?linkedin\.com/in/[a-zA-Z0-9-]+").unwrap()
});

pub static GITHUB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:https?://)?(?:www\.)?github\.com/[a-zA-Z0-9_-]+").unwrap());

pub static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)[0-9]{2}\b").unwrap());

/// Full degree words match anywhere (`Certificates`, `Postdoctoral`);
/// the short abbreviations must stand alone so `bash` or `SMS` do not count.
static DEGREE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)bachelor|master|doctorate|doctoral|diploma|certificate|associate",
        r"|(?:^|[^a-z])(?:ph\.?\s?d|m\.b\.a|mba)",
        r"|(?:^|[^a-z])(?:b\.?sc\.?|b\.?s\.?|b\.?a\.?|m\.?sc\.?|m\.?s\.?|m\.?a\.?)(?:[^a-z]|$)",
    ))
    .unwrap()
});

static INSTITUTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)university|college|institute|school|academy").unwrap());

/// Job-title words that mark a line inside an experience section as an entry.
pub const ROLE_KEYWORDS: &[&str] = &["manager", "developer", "analyst", "engineer", "specialist"];

// ────────────────────────────────────────────────────────────────────────────
// Phone matchers
// ────────────────────────────────────────────────────────────────────────────

/// A named phone-number shape. Matchers are tried in the order of
/// [`PHONE_MATCHERS`]; the first qualifying match wins.
pub struct PhoneMatcher {
    pub name: &'static str,
    pub regex: Regex,
}

/// Phone shapes ordered by specificity: strict formats first, bare digits last.
/// Separators accept tabs and any Unicode space (PDF text often carries
/// non-breaking spaces) but never a line break.
pub static PHONE_MATCHERS: Lazy<Vec<PhoneMatcher>> = Lazy::new(|| {
    [
        ("parenthesized", r"\([0-9]{3}\)[\t\p{Zs}]?[0-9]{3}-[0-9]{4}"),
        ("dashed", r"\b[0-9]{3}-[0-9]{3}-[0-9]{4}\b"),
        (
            "north_american",
            r"\+?1?[-.\t\p{Zs}]?\(?[0-9]{3}\)?[-.\t\p{Zs}]?[0-9]{3}[-.\t\p{Zs}]?[0-9]{4}",
        ),
        (
            "international",
            r"\+?[0-9]{1,3}[-.\t\p{Zs}]?[0-9]{3,4}[-.\t\p{Zs}]?[0-9]{3,4}[-.\t\p{Zs}]?[0-9]{3,4}",
        ),
        ("bare", r"[0-9]{10}"),
    ]
    .into_iter()
    .map(|(name, pattern)| PhoneMatcher {
        name,
        regex: Regex::new(pattern).unwrap(),
    })
    .collect()
});

// ────────────────────────────────────────────────────────────────────────────
// Predicates and helpers
// ────────────────────────────────────────────────────────────────────────────

/// Prefixes `https://` when the URL carries no scheme.
pub fn normalize_url(raw: &str) -> String {
    if raw.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("http")) {
        raw.to_string()
    } else {
        format!("https://{raw}")
    }
}

/// First four-digit year between 1900 and 2099 in `text`.
pub fn find_year(text: &str) -> Option<u16> {
    YEAR_RE.find(text).and_then(|m| m.as_str().parse().ok())
}

pub fn has_year(text: &str) -> bool {
    YEAR_RE.is_match(text)
}

pub fn has_degree_keyword(text: &str) -> bool {
    DEGREE_RE.is_match(text)
}

pub fn has_institution_keyword(text: &str) -> bool {
    INSTITUTION_RE.is_match(text)
}

/// `line_lower` must already be lower-cased.
pub fn has_role_keyword(line_lower: &str) -> bool {
    ROLE_KEYWORDS.iter().any(|k| line_lower.contains(k))
}
