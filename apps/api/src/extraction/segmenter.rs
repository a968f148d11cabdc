//! Section Segmenter — classifies runs of resume lines as experience,
//! education, or other.
//!
//! A finite-state scan over the document. The only mutable state is the
//! current [`SectionLabel`]; transitions are driven by keyword predicates on
//! the lower-cased, trimmed line:
//!
//! 1. **Close**: inside a labelled section, a closing keyword belonging to a
//!    different section ends the segment and reverts to `Other`. The line is
//!    not consumed, so step 2 may reopen a section on it.
//! 2. **Trigger**: a trigger line starts a new segment and becomes its
//!    header. Headers are never part of a segment's content.
//! 3. **Content**: any other line extends the current segment.

use std::ops::Range;

const EXPERIENCE_TRIGGERS: &[&str] = &[
    "experience",
    "work experience",
    "employment",
    "professional experience",
    "career",
    "work history",
    "job history",
];

const EDUCATION_TRIGGER: &str = "education";

/// Lines at least this long that mention "education" are treated as prose.
const EDUCATION_HEADER_MAX_LEN: usize = 50;

const EXPERIENCE_CLOSERS: &[&str] = &["education", "skills", "projects"];
const EDUCATION_CLOSERS: &[&str] = &["experience", "skills", "projects"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLabel {
    Experience,
    Education,
    Other,
}

impl SectionLabel {
    fn closers(self) -> &'static [&'static str] {
        match self {
            SectionLabel::Experience => EXPERIENCE_CLOSERS,
            SectionLabel::Education => EDUCATION_CLOSERS,
            SectionLabel::Other => &[],
        }
    }
}

/// A contiguous run of lines under one label.
///
/// The segment spans `header` (when present) through the end of `content`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub label: SectionLabel,
    pub header: Option<usize>,
    pub content: Range<usize>,
}

impl Segment {
    fn open(label: SectionLabel, header: Option<usize>, start: usize) -> Self {
        Self {
            label,
            header,
            content: start..start,
        }
    }

    /// First line index covered by this segment, header included.
    pub fn span_start(&self) -> usize {
        self.header.unwrap_or(self.content.start)
    }
}

/// Splits text into document lines, tolerating `\r\n` line endings.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// `trimmed` is the line as written; `line_lower` its lower-cased form.
/// Length is measured on the former since lower-casing may add chars.
fn trigger_for(trimmed: &str, line_lower: &str) -> Option<SectionLabel> {
    if EXPERIENCE_TRIGGERS.iter().any(|k| line_lower.contains(k)) {
        Some(SectionLabel::Experience)
    } else if line_lower.contains(EDUCATION_TRIGGER)
        && trimmed.chars().count() < EDUCATION_HEADER_MAX_LEN
    {
        Some(SectionLabel::Education)
    } else {
        None
    }
}

/// Partitions `lines` into segments in a single linear pass.
///
/// The returned segments are ordered, non-overlapping, and together cover
/// every line. Empty `Other` runs produced by back-to-back boundaries are
/// dropped.
pub fn segment(lines: &[&str]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = Segment::open(SectionLabel::Other, None, 0);

    for (idx, raw) in lines.iter().enumerate() {
        let trimmed = raw.trim();
        let line = trimmed.to_lowercase();

        if current.label != SectionLabel::Other
            && current.label.closers().iter().any(|k| line.contains(k))
        {
            push_segment(&mut segments, current);
            current = Segment::open(SectionLabel::Other, None, idx);
        }

        if let Some(label) = trigger_for(trimmed, &line) {
            push_segment(&mut segments, current);
            current = Segment::open(label, Some(idx), idx + 1);
            continue;
        }

        current.content.end = idx + 1;
    }

    push_segment(&mut segments, current);
    segments
}

fn push_segment(segments: &mut Vec<Segment>, segment: Segment) {
    if segment.header.is_none() && segment.content.is_empty() {
        return;
    }
    debug_assert_eq!(
        segment.span_start(),
        segments.last().map_or(0, |s| s.content.end),
        "segments must be contiguous"
    );
    segments.push(segment);
}

/// Content line ranges of every segment carrying `label`, in document order.
pub fn content_of(
    segments: &[Segment],
    label: SectionLabel,
) -> impl Iterator<Item = Range<usize>> + '_ {
    segments
        .iter()
        .filter(move |s| s.label == label)
        .map(|s| s.content.clone())
}
