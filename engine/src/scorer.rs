use serde::{Deserialize, Serialize};

use crate::section::{normalize_whitespace, Sections};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredSkill {
    pub name: String,
    pub score: u32,
}

/// Section bonuses plus the raw occurrence count across the whole text.
///
/// Both `lowered_text` and `lowered_skill` must already be lowercased.
pub fn score_skill(lowered_text: &str, lowered_skill: &str, sections: &Sections) -> u32 {
    let phrase = normalize_whitespace(lowered_skill);
    sections.bonus_for(&phrase) + count_lowered(lowered_text, lowered_skill)
}

/// Non-overlapping, case-insensitive substring count of `phrase` in `text`.
pub fn count_occurrences(text: &str, phrase: &str) -> u32 {
    count_lowered(&text.to_lowercase(), &phrase.to_lowercase())
}

fn count_lowered(text: &str, phrase: &str) -> u32 {
    if phrase.is_empty() { return 0; }
    // `matches` resumes after each hit, so "aa" in "aaaa" counts twice
    text.matches(phrase).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    #[test]
    fn overlapping_occurrences_count_once() {
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
        assert_eq!(count_occurrences("aaa", "aa"), 1);
    }

    #[test]
    fn counting_ignores_case_and_word_boundaries() {
        assert_eq!(count_occurrences("Java, JAVA and JavaScript", "java"), 3);
        assert_eq!(count_occurrences("anything", ""), 0);
    }

    #[test]
    fn bonuses_add_up_across_sections() {
        let text = "skills\nrust\n\nwork experience\nrust\n\neducation\nrust";
        let sections = Sections::detect(text, &EngineConfig::default());
        assert_eq!(score_skill(text, "rust", &sections), 10 + 7 + 5 + 3);
    }

    #[test]
    fn multi_word_skill_matches_wrapped_section_text() {
        let text = "skills\nmachine\nlearning";
        let sections = Sections::detect(text, &EngineConfig::default());
        // bonus via normalized containment, but the raw text has no exact phrase
        assert_eq!(score_skill(text, "machine learning", &sections), 10);
    }
}
