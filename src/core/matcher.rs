// src/core/matcher.rs
//! Answer lookup for a selected string

use crate::core::knowledge::KnowledgeStore;

/// Find the answer for `query`.
///
/// A record matches when its question contains the query, ignoring case.
/// The direction matters: a short selection like "France" finds the question
/// "Capital of France?", while selecting a whole paragraph that merely
/// contains a question does not. Records are tried in store order and records
/// without correct answers are passed over. The answers of the first hit are
/// joined with newlines.
pub fn find_answer(store: &KnowledgeStore, query: &str) -> Option<String> {
    let needle = query.to_lowercase();

    store
        .iter()
        .filter(|record| record.has_answers())
        .find(|record| record.question.to_lowercase().contains(&needle))
        .map(|record| record.answers.join("\n"))
}
