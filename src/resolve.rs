use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::models::Task;

/// Minimum skim score before a fuzzy hit counts as a match.
const FUZZY_MATCH_THRESHOLD: i64 = 40;

/// Resolve a user-typed name against the fetched list. An exact name match
/// always wins; otherwise the best fuzzy score above the threshold does.
pub fn resolve_task<'a>(tasks: &'a [Task], name: &str) -> Option<&'a Task> {
    if let Some(task) = tasks.iter().find(|t| t.name == name) {
        return Some(task);
    }

    let matcher = SkimMatcherV2::default();
    tasks
        .iter()
        .filter_map(|t| matcher.fuzzy_match(&t.name, name).map(|score| (score, t)))
        .filter(|(score, _)| *score >= FUZZY_MATCH_THRESHOLD)
        .max_by_key(|(score, _)| *score)
        .map(|(_, task)| task)
}
