use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Canonical skill names the engine matches against.
///
/// Names are trimmed and deduplicated; empty names never enter the set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCatalog {
    names: BTreeSet<String>,
}

impl SkillCatalog {
    pub fn new() -> Self { Self::default() }

    /// Returns false when the name was empty or already present.
    pub fn insert(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() { return false; }
        self.names.insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool { self.names.contains(name.trim()) }

    pub fn len(&self) -> usize { self.names.len() }

    pub fn is_empty(&self) -> bool { self.names.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &str> { self.names.iter().map(String::as_str) }
}

impl<S: AsRef<str>> FromIterator<S> for SkillCatalog {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut catalog = SkillCatalog::new();
        for name in iter {
            catalog.insert(name.as_ref());
        }
        catalog
    }
}

impl<S: AsRef<str>> Extend<S> for SkillCatalog {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for name in iter {
            self.insert(name.as_ref());
        }
    }
}
