//! Person-name recognition — the narrow capability the name extractor uses.
//!
//! `AppState` holds an `Arc<dyn PersonNameRecognizer>`, chosen at startup:
//! `RemoteRecognizer` when `NER_ENDPOINT` is set, `HeuristicRecognizer`
//! otherwise. Callers only rely on the span/label contract; no ordering or
//! precision guarantee is assumed.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Label carried by spans that name a person.
pub const PERSON_LABEL: &str = "PERSON";

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: String,
}

impl EntitySpan {
    pub fn person(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: PERSON_LABEL.to_string(),
        }
    }

    pub fn is_person(&self) -> bool {
        self.label.eq_ignore_ascii_case(PERSON_LABEL)
    }
}

#[derive(Debug, Error)]
pub enum RecognizerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("NER service error (status {status}): {message}")]
    Service { status: u16, message: String },

    #[error("NER service unavailable after {retries} retries")]
    Unavailable { retries: u32 },
}

/// Returns entity spans found in `text`. Implementations must be callable
/// from many threads at once.
pub trait PersonNameRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, RecognizerError>;
}

// ────────────────────────────────────────────────────────────────────────────
// HeuristicRecognizer — in-process default
// ────────────────────────────────────────────────────────────────────────────

/// One capitalised name word: `Doe`, `Smith-Jones`, `O'Brien`.
const NAME_WORD: &str = r"(?:[A-Z]'[A-Z][a-z]+|[A-Z][a-z]+(?:['-][A-Z]?[a-z]+)?)";

/// Two or three name words on one line, with an optional middle initial.
static NAME_RUN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b{NAME_WORD}(?:[ \t]+[A-Z]\.)?(?:[ \t]+{NAME_WORD}){{1,2}}\b"
    ))
    .unwrap()
});

/// Capitalised words that appear in resume headings, places, and titles
/// far more often than in names.
const NON_NAME_WORDS: &[&str] = &[
    "resume", "curriculum", "vitae", "profile", "summary", "objective", "experience", "education",
    "skills", "projects", "employment", "career", "work", "history", "professional", "contact",
    "references", "certifications", "university", "college", "institute", "school", "academy",
    "bachelor", "master", "science", "arts", "engineering", "computer", "software", "senior",
    "junior", "lead", "manager", "developer", "analyst", "engineer", "specialist", "intern",
    "street", "avenue", "road", "inc", "llc", "ltd", "corp", "company", "technologies",
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december", "present", "new", "san", "los", "united", "states",
];

/// Capitalisation-based recogniser. Cheap and dependency-free; expect false
/// positives on title-cased headings that slip past `NON_NAME_WORDS`.
#[derive(Debug, Clone, Default)]
pub struct HeuristicRecognizer;

impl HeuristicRecognizer {
    fn looks_like_name(candidate: &str) -> bool {
        candidate
            .split(|c: char| c.is_whitespace() || c == '-' || c == '\'' || c == '.')
            .filter(|w| !w.is_empty())
            .all(|w| !NON_NAME_WORDS.contains(&w.to_lowercase().as_str()))
    }
}

impl PersonNameRecognizer for HeuristicRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, RecognizerError> {
        let spans = text
            .lines()
            .flat_map(|line| NAME_RUN_RE.find_iter(line))
            .filter(|m| Self::looks_like_name(m.as_str()))
            .map(|m| EntitySpan::person(m.as_str()))
            .collect();
        Ok(spans)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// RemoteRecognizer — external NER service over HTTP
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct RecognizeRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    entities: Vec<EntitySpan>,
}

/// Blocking client for an NER service that accepts `{"text": ...}` and
/// answers `{"entities": [{"text", "label"}]}`.
///
/// Blocking by construction: extraction runs inside `spawn_blocking`.
/// Retries on 429 and 5xx with exponential backoff.
#[derive(Clone)]
pub struct RemoteRecognizer {
    client: Client,
    endpoint: String,
}

impl RemoteRecognizer {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, RecognizerError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Rate limiting and server faults are worth another attempt; other
/// failures are not.
fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

impl PersonNameRecognizer for RemoteRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, RecognizerError> {
        let mut last_error: Option<RecognizerError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // 200ms, 400ms
                let delay = Duration::from_millis(200 * (1 << (attempt - 1)));
                warn!(
                    "NER call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                std::thread::sleep(delay);
            }

            let response = match self
                .client
                .post(&self.endpoint)
                .json(&RecognizeRequest { text })
                .send()
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(RecognizerError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if is_retryable(status) {
                let body = response.text().unwrap_or_default();
                warn!("NER service returned {}: {}", status, body);
                last_error = Some(RecognizerError::Service {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                return Err(RecognizerError::Service {
                    status: status.as_u16(),
                    message: response.text().unwrap_or_default(),
                });
            }

            let parsed: RecognizeResponse = response.json()?;
            debug!("NER call returned {} entities", parsed.entities.len());
            return Ok(parsed.entities);
        }

        Err(last_error.unwrap_or(RecognizerError::Unavailable {
            retries: MAX_RETRIES,
        }))
    }
}
