use serde::{Deserialize, Serialize};

use crate::section::SectionKind;

pub const DEFAULT_TOP_K: usize = 10;

/// Heuristics for one resume section: where it starts, what ends it, and what
/// a skill earns for appearing inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRule {
    pub kind: SectionKind,
    /// Heading anchors in lookup order; the first one found marks the start.
    pub headings: Vec<String>,
    /// Anchors that close the section besides the headings of other sections.
    #[serde(default)]
    pub terminators: Vec<String>,
    /// Span length in characters when no terminator follows the heading.
    pub fallback_chars: usize,
    pub bonus: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub sections: Vec<SectionRule>,
    pub top_k: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sections: vec![
                SectionRule {
                    kind: SectionKind::Skills,
                    headings: strings(&["s k i l l s", "skills"]),
                    terminators: strings(&["e d u c a t i o n", "education"]),
                    fallback_chars: 150,
                    bonus: 10,
                },
                SectionRule {
                    kind: SectionKind::Experience,
                    // double space between the words is what extraction emits
                    headings: strings(&["w o r k  e x p e r i e n c e", "work experience"]),
                    terminators: strings(&["i n t e r e s t s", "interests"]),
                    fallback_chars: 350,
                    bonus: 7,
                },
                SectionRule {
                    kind: SectionKind::Education,
                    headings: strings(&["e d u c a t i o n", "education"]),
                    terminators: strings(&["w o r k  e x p e r i e n c e", "work experience"]),
                    fallback_chars: 150,
                    bonus: 5,
                },
            ],
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl EngineConfig {
    pub fn rule(&self, kind: SectionKind) -> Option<&SectionRule> {
        self.sections.iter().find(|r| r.kind == kind)
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_bonuses_and_fallbacks() {
        let cfg = EngineConfig::default();
        let skills = cfg.rule(SectionKind::Skills).unwrap();
        let exp = cfg.rule(SectionKind::Experience).unwrap();
        let edu = cfg.rule(SectionKind::Education).unwrap();
        assert_eq!((skills.bonus, skills.fallback_chars), (10, 150));
        assert_eq!((exp.bonus, exp.fallback_chars), (7, 350));
        assert_eq!((edu.bonus, edu.fallback_chars), (5, 150));
        assert_eq!(cfg.top_k, 10);
    }

    #[test]
    fn partial_json_keeps_default_sections() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"top_k": 3}"#).unwrap();
        assert_eq!(cfg.top_k, 3);
        assert_eq!(cfg.sections.len(), 3);
    }
}
