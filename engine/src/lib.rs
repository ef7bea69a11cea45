//! Resume skill extraction and ranking.
//!
//! Given resume text and a catalog of skill names, [`SkillEngine`] finds the
//! catalog skills that occur as whole words, scores them by the resume section
//! they appear in and how often they appear, and returns the best
//! [`EngineConfig::top_k`] names. Ranking is a pure function of its inputs.

pub mod catalog;
pub mod config;
pub mod matcher;
pub mod ranker;
pub mod scorer;
pub mod section;
pub mod text;

pub use catalog::SkillCatalog;
pub use config::{EngineConfig, SectionRule, DEFAULT_TOP_K};
pub use matcher::{is_whole_word_match, SkillMatcher};
pub use scorer::{count_occurrences, ScoredSkill};
pub use section::{find_section, SectionKind, SectionSpan, Sections};
pub use text::prepare_text;

/// A catalog compiled for repeated ranking.
#[derive(Debug, Clone)]
pub struct SkillEngine {
    config: EngineConfig,
    matcher: SkillMatcher,
}

impl SkillEngine {
    pub fn new(catalog: &SkillCatalog) -> Self {
        Self::with_config(catalog, EngineConfig::default())
    }

    pub fn with_config(catalog: &SkillCatalog, config: EngineConfig) -> Self {
        let matcher = SkillMatcher::new(catalog);
        tracing::debug!(skills = matcher.len(), "compiled skill catalog");
        Self { config, matcher }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ranked skills with their scores, highest first.
    pub fn rank_scored(&self, text: &str) -> Vec<ScoredSkill> {
        if text.trim().is_empty() || self.matcher.is_empty() {
            return Vec::new();
        }
        let lowered = text.to_lowercase();
        let sections = Sections::detect(&lowered, &self.config);
        let scored = self
            .matcher
            .matches(&lowered)
            .map(|p| ScoredSkill {
                name: p.name.clone(),
                score: scorer::score_skill(&lowered, &p.lowered, &sections),
            })
            .collect();
        ranker::rank(scored, self.config.top_k)
    }

    /// Ranked skill names, highest score first.
    pub fn rank(&self, text: &str) -> Vec<String> {
        self.rank_scored(text).into_iter().map(|s| s.name).collect()
    }
}

/// One-shot ranking with the default configuration.
pub fn rank_skills(text: &str, catalog: &SkillCatalog) -> Vec<String> {
    SkillEngine::new(catalog).rank(text)
}
