use crate::scorer::ScoredSkill;

/// Orders by score descending, then by name ascending, and keeps the first
/// `top_k`. Zero scores never rank.
pub fn rank(mut scored: Vec<ScoredSkill>, top_k: usize) -> Vec<ScoredSkill> {
    scored.retain(|s| s.score > 0);
    scored.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
    scored.truncate(top_k);
    for s in &scored {
        tracing::debug!(skill = %s.name, score = s.score, "selected skill");
    }
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(name: &str, score: u32) -> ScoredSkill {
        ScoredSkill { name: name.to_string(), score }
    }

    #[test]
    fn ties_break_on_name() {
        let ranked = rank(vec![s("Rust", 5), s("Go", 5), s("SQL", 9)], 10);
        let names: Vec<_> = ranked.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["SQL", "Go", "Rust"]);
    }

    #[test]
    fn zero_scores_are_dropped_and_output_is_bounded() {
        let mut input: Vec<_> = (1..=15).map(|i| s(&format!("skill{i:02}"), i)).collect();
        input.push(s("ghost", 0));
        let ranked = rank(input, 10);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].name, "skill15");
        assert!(ranked.iter().all(|s| s.name != "ghost"));
    }
}
