// Rule-based resume field extraction.
// Leaves first: patterns and skills, then the segmenter, the per-field
// extractors, and the orchestrator that assembles the record.

pub mod fields;
pub mod handlers;
pub mod ner;
pub mod orchestrator;
pub mod patterns;
pub mod segmenter;
pub mod skills;
