use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

use crate::catalog::SkillCatalog;

lazy_static! {
    static ref WORD_CHAR: Regex = Regex::new(r"\A\w\z").expect("valid regex");
}

/// One catalog skill compiled into a literal, boundary-anchored pattern.
#[derive(Debug, Clone)]
pub struct SkillPattern {
    pub name: String,
    pub(crate) lowered: String,
    regex: Option<Regex>,
}

impl SkillPattern {
    pub fn new(name: &str) -> Self {
        let lowered = name.to_lowercase();
        let regex = match RegexBuilder::new(&boundary_pattern(&lowered))
            .case_insensitive(true)
            .build()
        {
            Ok(re) => Some(re),
            Err(err) => {
                tracing::warn!(skill = name, error = %err, "skill pattern rejected, treating as unmatched");
                None
            }
        };
        Self { name: name.to_string(), lowered, regex }
    }

    /// Whole-word, case-insensitive presence test against lowercased text.
    pub fn is_match(&self, lowered_text: &str) -> bool {
        // cheap substring check first: a whole-word hit is always a substring hit
        if self.lowered.is_empty() || !lowered_text.contains(&self.lowered) {
            return false;
        }
        self.regex.as_ref().map_or(false, |re| re.is_match(lowered_text))
    }
}

/// Precompiled patterns for a whole catalog, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct SkillMatcher {
    patterns: Vec<SkillPattern>,
}

impl SkillMatcher {
    pub fn new(catalog: &SkillCatalog) -> Self {
        Self { patterns: catalog.iter().map(SkillPattern::new).collect() }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Skills with at least one whole-word occurrence in `lowered_text`.
    pub fn matches<'a>(&'a self, lowered_text: &'a str) -> impl Iterator<Item = &'a SkillPattern> + 'a {
        self.patterns.iter().filter(move |p| p.is_match(lowered_text))
    }
}

/// Builds the pattern for `skill`: the escaped literal with a boundary
/// assertion at each edge. A word-character edge needs `\b`; a non-word edge
/// (the `+` of "c++") needs `\B` so that its neighbour is also a non-word
/// character or a text edge.
pub fn boundary_pattern(skill: &str) -> String {
    let (Some(first), Some(last)) = (skill.chars().next(), skill.chars().last()) else {
        return String::new();
    };
    format!("{}{}{}", edge(first), regex::escape(skill), edge(last))
}

/// One-off whole-word test; prefer [`SkillMatcher`] for repeated use.
pub fn is_whole_word_match(text: &str, skill: &str) -> bool {
    SkillPattern::new(skill).is_match(&text.to_lowercase())
}

fn edge(c: char) -> &'static str {
    let mut buf = [0u8; 4];
    if WORD_CHAR.is_match(c.encode_utf8(&mut buf)) { r"\b" } else { r"\B" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn java_does_not_match_inside_javascript() {
        assert!(!is_whole_word_match("I use JavaScript daily", "Java"));
        assert!(is_whole_word_match("I use Java daily", "Java"));
    }

    #[test]
    fn multi_word_phrase_must_be_contiguous() {
        assert!(is_whole_word_match("Strong Data Structures background", "Data Structures"));
        assert!(!is_whole_word_match("data and structures", "Data Structures"));
    }

    #[test]
    fn metacharacters_are_literal() {
        assert!(is_whole_word_match("Fluent in C++ and C#.", "C++"));
        assert!(is_whole_word_match("Fluent in C++ and C#.", "C#"));
        assert!(!is_whole_word_match("Fluent in Cxx", "C++"));
        assert!(is_whole_word_match("Built with Node.js", "node.js"));
        assert!(!is_whole_word_match("Built with nodexjs", "node.js"));
        assert!(is_whole_word_match("(a|b) regex", "(a|b)"));
    }

    #[test]
    fn non_word_edge_still_needs_a_boundary() {
        assert!(!is_whole_word_match("xC++ compiler", "C++"));
        assert!(!is_whole_word_match("C++x compiler", "C++"));
        assert!(is_whole_word_match("C++", "C++"));
    }

    #[test]
    fn matcher_reports_only_present_skills() {
        let catalog: SkillCatalog = ["Python", "Rust", "Go"].into_iter().collect();
        let matcher = SkillMatcher::new(&catalog);
        let names: Vec<_> = matcher.matches("python and rust, going places").map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Python", "Rust"]);
    }
}
