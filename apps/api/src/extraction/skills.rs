//! Skill Vocabulary — the canonical skill list matched against resume text.
//!
//! Loaded once at start-up and shared read-only (`Arc<SkillVocabulary>` in
//! `AppState`), so every extraction call sees the same list.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("Failed to read skills file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid skills file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// On-disk shape: `{"skills": ["Python", "SQL", ...]}`.
#[derive(Debug, Deserialize)]
struct SkillsFile {
    skills: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SkillVocabulary {
    skills: Vec<String>,
}

impl SkillVocabulary {
    /// Builds a vocabulary, keeping order and duplicates.
    /// Blank entries are dropped: an empty needle matches every document.
    pub fn new<I, S>(skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            skills: skills
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.trim().is_empty())
                .collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, VocabularyError> {
        let file: SkillsFile = serde_json::from_str(json)?;
        Ok(Self::new(file.skills))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, VocabularyError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| VocabularyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let vocabulary = Self::from_json(&json)?;
        info!(
            "Loaded {} skills from {}",
            vocabulary.len(),
            path.display()
        );
        Ok(vocabulary)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Skills whose lower-cased form occurs anywhere in `text_lower`,
    /// title-cased, in vocabulary order.
    pub fn find_in(&self, text_lower: &str) -> Vec<String> {
        self.skills
            .iter()
            .filter(|skill| text_lower.contains(&skill.to_lowercase()))
            .map(|skill| title_case(skill))
            .collect()
    }
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the
/// rest, so `"node.js"` becomes `"Node.Js"` and `"SQL"` becomes `"Sql"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("python"), "Python");
        assert_eq!(title_case("SQL"), "Sql");
        assert_eq!(title_case("machine learning"), "Machine Learning");
        assert_eq!(title_case("node.js"), "Node.Js");
        assert_eq!(title_case("c++"), "C++");
        assert_eq!(title_case("k8s"), "K8S");
    }

    #[test]
    fn test_find_in_follows_vocabulary_order() {
        let vocab = SkillVocabulary::new(["SQL", "Python"]);
        let found = vocab.find_in("python first, then sql");
        assert_eq!(found, vec!["Sql", "Python"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let vocab = SkillVocabulary::new(["Rust", "rust"]);
        assert_eq!(vocab.find_in("i write rust"), vec!["Rust", "Rust"]);
    }

    #[test]
    fn test_blank_entries_dropped() {
        let vocab = SkillVocabulary::new(["", "  ", "Go"]);
        assert_eq!(vocab.len(), 1);
        assert!(vocab.find_in("nothing relevant").is_empty());
    }

    #[test]
    fn test_from_json() {
        let vocab = SkillVocabulary::from_json(r#"{"skills": ["Python", "Docker"]}"#).unwrap();
        assert_eq!(vocab.len(), 2);
    }

    #[test]
    fn test_from_json_rejects_wrong_shape() {
        let err = SkillVocabulary::from_json(r#"["Python"]"#).unwrap_err();
        assert!(matches!(err, VocabularyError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"skills": ["Kubernetes", "Terraform", "AWS"]}}"#).unwrap();

        let vocab = SkillVocabulary::load(file.path()).unwrap();
        assert_eq!(vocab.find_in("deployed on aws with terraform"), vec!["Terraform", "Aws"]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SkillVocabulary::load("/definitely/not/here/skills.json").unwrap_err();
        assert!(matches!(err, VocabularyError::Io { .. }));
    }
}
