//! Heuristic resume segmentation.
//!
//! Sections are found by searching the lowercased text for heading anchors.
//! Extraction tools sometimes emit one space per glyph ("s k i l l s"), so every
//! heading has a spaced variant that is tried before the compact one.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::config::{EngineConfig, SectionRule};

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid regex");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    Skills,
    Education,
    Experience,
}

/// Half-open byte range into the lowercased resume text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSpan {
    pub kind: SectionKind,
    pub start: usize,
    pub end: usize,
}

impl SectionSpan {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

#[derive(Debug, Clone)]
struct DetectedSection {
    span: SectionSpan,
    bonus: u32,
    /// Span text with whitespace runs collapsed to one space.
    normalized: String,
}

/// All sections found in one resume, computed once per ranking call.
#[derive(Debug, Clone, Default)]
pub struct Sections {
    found: Vec<DetectedSection>,
}

impl Sections {
    /// Segment `lowered`, which must already be lowercased.
    pub fn detect(lowered: &str, config: &EngineConfig) -> Self {
        let mut starts: Vec<(&SectionRule, usize, usize)> = Vec::new();
        for rule in &config.sections {
            if starts.iter().any(|(r, _, _)| r.kind == rule.kind) {
                continue;
            }
            if let Some((start, len)) = locate_heading(lowered, &rule.headings) {
                starts.push((rule, start, len));
            }
        }

        let found = starts
            .iter()
            .map(|&(rule, start, heading_len)| {
                let from = start + heading_len;
                let terminator = rule
                    .terminators
                    .iter()
                    .filter(|t| !t.is_empty())
                    .filter_map(|t| lowered[from..].find(t.as_str()).map(|i| from + i))
                    .min();
                let next_section = starts
                    .iter()
                    .filter(|(r, s, _)| r.kind != rule.kind && *s > start)
                    .map(|(_, s, _)| *s)
                    .min();
                // the fallback length only applies when no terminator follows
                let end = terminator
                    .unwrap_or_else(|| advance_chars(lowered, start, rule.fallback_chars));
                let end = next_section.map_or(end, |next| end.min(next));
                let span = SectionSpan { kind: rule.kind, start, end };
                tracing::trace!(kind = ?rule.kind, start, end, "section span");
                DetectedSection {
                    span,
                    bonus: rule.bonus,
                    normalized: normalize_whitespace(&lowered[start..end]),
                }
            })
            .collect();

        Self { found }
    }

    pub fn span(&self, kind: SectionKind) -> Option<SectionSpan> {
        self.found.iter().find(|s| s.span.kind == kind).map(|s| s.span)
    }

    pub fn spans(&self) -> impl Iterator<Item = SectionSpan> + '_ {
        self.found.iter().map(|s| s.span)
    }

    /// True when the section exists and its normalized text contains `phrase`.
    /// `phrase` must be lowercased and whitespace-normalized already.
    pub fn contains(&self, kind: SectionKind, phrase: &str) -> bool {
        self.found
            .iter()
            .find(|s| s.span.kind == kind)
            .map_or(false, |s| s.normalized.contains(phrase))
    }

    /// Sum of the bonuses of every section whose text contains `phrase`.
    pub fn bonus_for(&self, phrase: &str) -> u32 {
        self.found
            .iter()
            .filter(|s| s.normalized.contains(phrase))
            .map(|s| s.bonus)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.found.is_empty()
    }
}

/// Locate one section of `text`. Case-insensitive; offsets refer to the
/// lowercased text.
pub fn find_section(text: &str, kind: SectionKind, config: &EngineConfig) -> Option<SectionSpan> {
    Sections::detect(&text.to_lowercase(), config).span(kind)
}

/// Collapse every whitespace run to a single space.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").into_owned()
}

fn locate_heading(lowered: &str, headings: &[String]) -> Option<(usize, usize)> {
    headings
        .iter()
        .filter(|h| !h.is_empty())
        .find_map(|h| lowered.find(h.as_str()).map(|pos| (pos, h.len())))
}

fn advance_chars(text: &str, start: usize, chars: usize) -> usize {
    text[start..]
        .char_indices()
        .nth(chars)
        .map(|(i, _)| start + i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Sections {
        Sections::detect(&text.to_lowercase(), &EngineConfig::default())
    }

    #[test]
    fn spaced_heading_wins_over_compact() {
        let text = "skills mentioned early\ns k i l l s\nrust";
        let span = find_section(text, SectionKind::Skills, &EngineConfig::default()).unwrap();
        assert_eq!(span.start, text.find("s k i").unwrap());
    }

    #[test]
    fn missing_heading_means_no_section() {
        let sections = detect("Summary\nBuilt things.");
        assert!(sections.is_empty());
        assert!(!sections.contains(SectionKind::Skills, "built"));
    }

    #[test]
    fn skills_ends_at_education() {
        let text = "Skills\nRust, Go\nEducation\nBSc";
        let sections = detect(text);
        let span = sections.span(SectionKind::Skills).unwrap();
        assert_eq!(span.range(), 0..text.find("Education").unwrap());
        assert!(!sections.contains(SectionKind::Skills, "bsc"));
        assert!(sections.contains(SectionKind::Education, "bsc"));
    }

    #[test]
    fn experience_ends_at_interests() {
        let text = "Work Experience\nRust services\nInterests\nchess";
        let sections = detect(text);
        assert!(sections.contains(SectionKind::Experience, "rust services"));
        assert!(!sections.contains(SectionKind::Experience, "chess"));
    }

    #[test]
    fn fallback_length_is_counted_in_characters() {
        let body = "é".repeat(200);
        let text = format!("skills {body}");
        let span = detect(&text).span(SectionKind::Skills).unwrap();
        assert_eq!(text[span.range()].chars().count(), 150);
    }

    #[test]
    fn fallback_is_clamped_to_text_end() {
        let text = "work experience\nshort";
        let span = detect(text).span(SectionKind::Experience).unwrap();
        assert_eq!(span.end, text.len());
    }

    #[test]
    fn fallback_applies_before_a_distant_later_section() {
        let text = format!("Skills\nPython\n{}Java\nWork Experience\nled team", "x ".repeat(150));
        let sections = detect(&text);
        let span = sections.span(SectionKind::Skills).unwrap();
        assert_eq!(text[span.range()].chars().count(), 150);
        assert!(sections.contains(SectionKind::Skills, "python"));
        assert!(!sections.contains(SectionKind::Skills, "java"));
    }

    #[test]
    fn experience_fallback_applies_before_a_distant_education_heading() {
        let text = format!("Work Experience\nRust\n{}Haskell\nEducation\nBSc", "y ".repeat(350));
        let sections = detect(&text);
        let span = sections.span(SectionKind::Experience).unwrap();
        assert_eq!(text[span.range()].chars().count(), 350);
        assert!(sections.contains(SectionKind::Experience, "rust"));
        assert!(!sections.contains(SectionKind::Experience, "haskell"));
    }

    #[test]
    fn nearby_later_section_cuts_the_fallback_short() {
        let text = "Work Experience\nRust\nSkills\nGo";
        let span = detect(text).span(SectionKind::Experience).unwrap();
        assert_eq!(span.end, text.find("Skills").unwrap());
    }

    #[test]
    fn sections_do_not_overlap() {
        let text = "SKILLS\nPython\n\nWORK EXPERIENCE\nPython\n\nEDUCATION\nSQL";
        let sections = detect(text);
        let mut spans: Vec<_> = sections.spans().collect();
        assert_eq!(spans.len(), 3);
        spans.sort_by_key(|s| s.start);
        for pair in spans.windows(2) {
            assert!(pair[0].end <= pair[1].start, "{:?} overlaps {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn normalization_joins_wrapped_lines() {
        let sections = detect("Skills\nmachine\n   learning");
        assert!(sections.contains(SectionKind::Skills, "machine learning"));
        assert_eq!(normalize_whitespace("a \t\n b"), "a b");
    }
}
