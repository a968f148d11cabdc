//! Field extractors — one function per Extraction Record field.
//!
//! Scalar extractors return `Option<String>`; list extractors return a `Vec`
//! which the orchestrator turns into `None` when empty. Each extractor is
//! independent: nothing here reads another field's result.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::extraction::ner::PersonNameRecognizer;
use crate::extraction::patterns::{self, EMAIL_RE, GITHUB_RE, LINKEDIN_RE, PHONE_MATCHERS};
use crate::extraction::segmenter::{content_of, SectionLabel, Segment};
use crate::extraction::skills::SkillVocabulary;

/// Lines this short or shorter are treated as stray headers, not education entries.
const MIN_EDUCATION_LINE_LEN: usize = 5;

/// Number of leading non-blank lines checked for a name before the full document.
const NAME_PROBE_LINES: usize = 5;

const MIN_PHONE_DIGITS: usize = 10;

/// An education line plus the graduation year found on it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub text: String,
    pub year: Option<u16>,
}

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

/// Tries every phone matcher in declared order and returns the first match
/// carrying at least ten digits, as written in the source text.
pub fn extract_phone(text: &str) -> Option<String> {
    for matcher in PHONE_MATCHERS.iter() {
        for m in matcher.regex.find_iter(text) {
            let digits = m.as_str().chars().filter(char::is_ascii_digit).count();
            if digits >= MIN_PHONE_DIGITS {
                debug!("Phone matched by '{}' matcher", matcher.name);
                return Some(m.as_str().trim().to_string());
            }
        }
    }
    None
}

pub fn extract_linkedin(text: &str) -> Option<String> {
    LINKEDIN_RE
        .find(text)
        .map(|m| patterns::normalize_url(m.as_str()))
}

pub fn extract_github(text: &str) -> Option<String> {
    GITHUB_RE
        .find(text)
        .map(|m| patterns::normalize_url(m.as_str()))
}

/// Lines inside experience sections that carry a year or a role keyword.
pub fn extract_experience(lines: &[&str], segments: &[Segment]) -> Vec<String> {
    content_of(segments, SectionLabel::Experience)
        .flat_map(|range| lines[range].iter())
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .filter(|line| {
            patterns::has_year(line) || patterns::has_role_keyword(&line.to_lowercase())
        })
        .map(String::from)
        .collect()
}

/// Lines inside education sections, plus any line anywhere that names a
/// degree or an institution. Section headers are never entries.
pub fn extract_education(lines: &[&str], segments: &[Segment]) -> Vec<EducationEntry> {
    let mut in_education = vec![false; lines.len()];
    let mut is_header = vec![false; lines.len()];
    for segment in segments.iter().filter(|s| s.label == SectionLabel::Education) {
        if let Some(header) = segment.header {
            is_header[header] = true;
        }
        for idx in segment.content.clone() {
            in_education[idx] = true;
        }
    }

    lines
        .iter()
        .enumerate()
        .filter(|(idx, _)| !is_header[*idx])
        .map(|(idx, line)| (idx, line.trim()))
        .filter(|(_, line)| line.chars().count() > MIN_EDUCATION_LINE_LEN)
        .filter(|(idx, line)| {
            in_education[*idx]
                || patterns::has_degree_keyword(line)
                || patterns::has_institution_keyword(line)
        })
        .map(|(_, line)| EducationEntry {
            text: line.to_string(),
            year: patterns::find_year(line),
        })
        .collect()
}

pub fn extract_skills(text: &str, vocabulary: &SkillVocabulary) -> Vec<String> {
    vocabulary.find_in(&text.to_lowercase())
}

/// Asks the recognizer about each of the first few non-blank lines, then
/// about the whole document. Recognizer failures count as "no name here".
pub fn extract_name(
    text: &str,
    lines: &[&str],
    recognizer: &dyn PersonNameRecognizer,
) -> Option<String> {
    lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .take(NAME_PROBE_LINES)
        .find_map(|line| first_person(recognizer, line))
        .or_else(|| first_person(recognizer, text))
}

fn first_person(recognizer: &dyn PersonNameRecognizer, text: &str) -> Option<String> {
    match recognizer.recognize(text) {
        Ok(spans) => spans.into_iter().find(|s| s.is_person()).map(|s| s.text),
        Err(e) => {
            warn!("Person-name recognizer failed, treating as no match: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ner::{EntitySpan, RecognizerError};
    use crate::extraction::segmenter::segment;
    use std::sync::Mutex;

    /// Returns canned spans per exact input text and records every query.
    struct ScriptedRecognizer {
        answers: Vec<(&'static str, Vec<EntitySpan>)>,
        queries: Mutex<Vec<String>>,
    }

    impl ScriptedRecognizer {
        fn new(answers: Vec<(&'static str, Vec<EntitySpan>)>) -> Self {
            Self {
                answers,
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    impl PersonNameRecognizer for ScriptedRecognizer {
        fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, RecognizerError> {
            self.queries.lock().unwrap().push(text.to_string());
            Ok(self
                .answers
                .iter()
                .find(|(t, _)| *t == text)
                .map(|(_, spans)| spans.clone())
                .unwrap_or_default())
        }
    }

    struct FailingRecognizer;

    impl PersonNameRecognizer for FailingRecognizer {
        fn recognize(&self, _text: &str) -> Result<Vec<EntitySpan>, RecognizerError> {
            Err(RecognizerError::Unavailable { retries: 3 })
        }
    }

    // ── email ──────────────────────────────────────────────────────────────

    #[test]
    fn test_email_returned_unmodified() {
        assert_eq!(
            extract_email("Reach me: jane.doe+jobs@mail.example.co.uk today"),
            Some("jane.doe+jobs@mail.example.co.uk".to_string())
        );
    }

    #[test]
    fn test_email_first_match_wins() {
        assert_eq!(
            extract_email("a@one.com, b@two.com"),
            Some("a@one.com".to_string())
        );
    }

    #[test]
    fn test_email_absent_without_at_sign() {
        assert_eq!(extract_email("no address here, example.com"), None);
    }

    // ── phone ──────────────────────────────────────────────────────────────

    #[test]
    fn test_phone_dashed() {
        assert_eq!(
            extract_phone("Call me at 123-456-7890"),
            Some("123-456-7890".to_string())
        );
    }

    #[test]
    fn test_phone_too_short_is_absent() {
        assert_eq!(extract_phone("12345"), None);
        assert_eq!(extract_phone("ext 555-1234"), None);
    }

    #[test]
    fn test_phone_parenthesized() {
        assert_eq!(
            extract_phone("Phone: (555) 123-4567"),
            Some("(555) 123-4567".to_string())
        );
    }

    #[test]
    fn test_phone_keeps_source_formatting() {
        assert_eq!(
            extract_phone("Mobile: +44 7911 123 456"),
            Some("+44 7911 123 456".to_string())
        );
        assert_eq!(
            extract_phone("tel 555.123.4567"),
            Some("555.123.4567".to_string())
        );
    }

    #[test]
    fn test_phone_tab_and_non_breaking_separators() {
        assert_eq!(
            extract_phone("Phone:\t555\t123\t4567"),
            Some("555\t123\t4567".to_string())
        );
        assert_eq!(
            extract_phone("Phone: 555\u{a0}123\u{a0}4567"),
            Some("555\u{a0}123\u{a0}4567".to_string())
        );
    }

    #[test]
    fn test_phone_does_not_join_lines() {
        assert_eq!(extract_phone("Room 555\n123\n4567"), None);
    }

    #[test]
    fn test_phone_bare_digits() {
        assert_eq!(
            extract_phone("phone5551234567"),
            Some("5551234567".to_string())
        );
    }

    #[test]
    fn test_phone_strict_shape_preferred_over_earlier_loose_match() {
        let text = "ID 555 123 4567, office 800-555-0199";
        assert_eq!(extract_phone(text), Some("800-555-0199".to_string()));
    }

    // ── urls ───────────────────────────────────────────────────────────────

    #[test]
    fn test_linkedin_normalized() {
        assert_eq!(
            extract_linkedin("linkedin.com/in/jdoe"),
            Some("https://linkedin.com/in/jdoe".to_string())
        );
    }

    #[test]
    fn test_github_normalized() {
        assert_eq!(
            extract_github("github.com/jdoe"),
            Some("https://github.com/jdoe".to_string())
        );
    }

    #[test]
    fn test_urls_with_scheme_untouched() {
        assert_eq!(
            extract_github("see https://www.github.com/j_doe-2 for code"),
            Some("https://www.github.com/j_doe-2".to_string())
        );
        assert_eq!(extract_linkedin("github.com/jdoe"), None);
    }

    // ── experience / education ─────────────────────────────────────────────

    const RESUME: &str = "Jane Doe
jane@example.com

Experience
Senior Engineer, Acme Corp
2019 - Present
Led a team of five
Education
BS Computer Science
MIT 2015
Skills
Rust, Python
Certificate in Cloud Security, 2020";

    #[test]
    fn test_experience_keeps_year_and_role_lines() {
        let lines: Vec<&str> = RESUME.lines().collect();
        let segments = segment(&lines);
        assert_eq!(
            extract_experience(&lines, &segments),
            vec!["Senior Engineer, Acme Corp", "2019 - Present"]
        );
    }

    #[test]
    fn test_experience_empty_without_section() {
        let lines = vec!["Engineer at Initech 2019"];
        let segments = segment(&lines);
        assert!(extract_experience(&lines, &segments).is_empty());
    }

    #[test]
    fn test_education_section_and_keyword_lines() {
        let lines: Vec<&str> = RESUME.lines().collect();
        let segments = segment(&lines);
        let entries = extract_education(&lines, &segments);

        let texts: Vec<&str> = entries.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "BS Computer Science",
                "MIT 2015",
                "Certificate in Cloud Security, 2020"
            ]
        );
        assert_eq!(entries[0].year, None);
        assert_eq!(entries[1].year, Some(2015));
        assert_eq!(entries[2].year, Some(2020));
    }

    #[test]
    fn test_education_skips_short_lines_and_headers() {
        let lines = vec!["Education", "MIT", "Harvard University"];
        let segments = segment(&lines);
        let entries = extract_education(&lines, &segments);
        assert_eq!(
            entries,
            vec![EducationEntry {
                text: "Harvard University".to_string(),
                year: None
            }]
        );
    }

    // ── skills ─────────────────────────────────────────────────────────────

    #[test]
    fn test_skills_case_insensitive_title_cased() {
        let vocab = SkillVocabulary::new(["Python", "SQL"]);
        assert_eq!(
            extract_skills("Experienced in python and sql", &vocab),
            vec!["Python", "Sql"]
        );
    }

    #[test]
    fn test_skills_none_matched() {
        let vocab = SkillVocabulary::new(["Haskell"]);
        assert!(extract_skills("Experienced in python", &vocab).is_empty());
    }

    // ── name ───────────────────────────────────────────────────────────────

    #[test]
    fn test_name_from_leading_line_beats_later_span() {
        let text = "Jane Doe\nReferences\nJohn Smith";
        let lines: Vec<&str> = text.lines().collect();
        let recognizer = ScriptedRecognizer::new(vec![
            ("Jane Doe", vec![EntitySpan::person("Jane Doe")]),
            ("John Smith", vec![EntitySpan::person("John Smith")]),
            (
                text,
                vec![EntitySpan::person("John Smith"), EntitySpan::person("Jane Doe")],
            ),
        ]);

        assert_eq!(
            extract_name(text, &lines, &recognizer),
            Some("Jane Doe".to_string())
        );
        assert_eq!(recognizer.queries.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_name_skips_non_person_labels() {
        let text = "Acme Corp\nAda Lovelace";
        let lines: Vec<&str> = text.lines().collect();
        let recognizer = ScriptedRecognizer::new(vec![
            (
                "Acme Corp",
                vec![EntitySpan {
                    text: "Acme Corp".to_string(),
                    label: "ORG".to_string(),
                }],
            ),
            ("Ada Lovelace", vec![EntitySpan::person("Ada Lovelace")]),
        ]);
        assert_eq!(
            extract_name(text, &lines, &recognizer),
            Some("Ada Lovelace".to_string())
        );
    }

    #[test]
    fn test_name_probes_five_non_blank_lines_then_whole_document() {
        let text = "a\n\nb\nc\n\nd\ne\nf";
        let lines: Vec<&str> = text.lines().collect();
        let recognizer =
            ScriptedRecognizer::new(vec![(text, vec![EntitySpan::person("Late Name")])]);

        assert_eq!(
            extract_name(text, &lines, &recognizer),
            Some("Late Name".to_string())
        );
        let queries = recognizer.queries.lock().unwrap();
        assert_eq!(*queries, vec!["a", "b", "c", "d", "e", text]);
    }

    #[test]
    fn test_name_recognizer_failure_is_absent() {
        let lines = vec!["Jane Doe"];
        assert_eq!(extract_name("Jane Doe", &lines, &FailingRecognizer), None);
    }
}
