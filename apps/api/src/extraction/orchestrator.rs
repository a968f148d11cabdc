//! Extraction Orchestrator — runs every field extractor over one document.
//!
//! `extract` is a pure function of (text, recognizer, vocabulary). It never
//! fails: a field that cannot be found is `None`, and unextractable input
//! yields a record with every field `None`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extraction::fields::{self, EducationEntry};
use crate::extraction::ner::PersonNameRecognizer;
use crate::extraction::segmenter::{segment, split_lines};
use crate::extraction::skills::SkillVocabulary;
use crate::ingest;

/// Structured fields pulled from one resume.
///
/// List fields are `None` rather than empty so callers can tell "nothing
/// found" apart from a present value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub experience: Option<Vec<String>>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub education: Option<Vec<EducationEntry>>,
    pub skills: Option<Vec<String>>,
}

impl ExtractionRecord {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    fn found_fields(&self) -> Vec<&'static str> {
        [
            ("name", self.name.is_some()),
            ("email", self.email.is_some()),
            ("phone", self.phone.is_some()),
            ("experience", self.experience.is_some()),
            ("linkedin", self.linkedin.is_some()),
            ("github", self.github.is_some()),
            ("education", self.education.is_some()),
            ("skills", self.skills.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, found)| found.then_some(field))
        .collect()
    }
}

/// True for input the pipeline should not attempt: blank text or an
/// ingestion failure message standing in for the document.
pub fn is_unextractable(text: &str) -> bool {
    text.trim().is_empty() || ingest::is_sentinel(text)
}

/// Extracts from raw text of unknown origin, which may be an ingestion
/// failure message.
pub fn extract(
    text: &str,
    recognizer: &dyn PersonNameRecognizer,
    vocabulary: &SkillVocabulary,
) -> ExtractionRecord {
    if is_unextractable(text) {
        debug!("Skipping extraction for unextractable input");
        return ExtractionRecord::default();
    }
    extract_document(text, recognizer, vocabulary)
}

/// Extracts from text already known to be a document, such as
/// [`ingest::Ingested::Document`]. Only blank text is skipped.
pub fn extract_document(
    text: &str,
    recognizer: &dyn PersonNameRecognizer,
    vocabulary: &SkillVocabulary,
) -> ExtractionRecord {
    if text.trim().is_empty() {
        debug!("Skipping extraction for blank document");
        return ExtractionRecord::default();
    }

    let lines = split_lines(text);
    let segments = segment(&lines);

    let record = ExtractionRecord {
        name: fields::extract_name(text, &lines, recognizer),
        email: fields::extract_email(text),
        phone: fields::extract_phone(text),
        experience: non_empty(fields::extract_experience(&lines, &segments)),
        linkedin: fields::extract_linkedin(text),
        github: fields::extract_github(text),
        education: non_empty(fields::extract_education(&lines, &segments)),
        skills: non_empty(fields::extract_skills(text, vocabulary)),
    };

    debug!(
        "Extracted {:?} from {} lines in {} segments",
        record.found_fields(),
        lines.len(),
        segments.len()
    );
    record
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
