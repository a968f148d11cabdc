use std::sync::Arc;

use crate::config::Config;
use crate::extraction::ner::PersonNameRecognizer;
use crate::extraction::skills::SkillVocabulary;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Loaded once at startup, read-only afterwards.
    pub vocabulary: Arc<SkillVocabulary>,
    /// Pluggable name recognizer. Remote when NER_ENDPOINT is set, heuristic otherwise.
    pub recognizer: Arc<dyn PersonNameRecognizer>,
}
