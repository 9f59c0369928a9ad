// "Related projects" - other records ranked by how many tags they share
use serde::Serialize;
use std::collections::HashSet;

use crate::models::ProjectRecord;

/// A related record and how close it is (0.0 - 1.0]
#[derive(Debug, Clone, Serialize)]
pub struct RelatedProject<'a> {
    pub record: &'a ProjectRecord,
    pub score: f64,
}

/// Tag overlap between two records: shared tags over the larger tag set.
///
/// Tags are compared as sets, so a tag listed twice counts once. Two
/// untagged records score 0.
pub fn similarity(a: &ProjectRecord, b: &ProjectRecord) -> f64 {
    let tags_a: HashSet<&str> = a.tags.iter().map(String::as_str).collect();
    let tags_b: HashSet<&str> = b.tags.iter().map(String::as_str).collect();

    let denominator = tags_a.len().max(tags_b.len());
    if denominator == 0 {
        return 0.0;
    }

    let shared = tags_a.intersection(&tags_b).count();
    shared as f64 / denominator as f64
}

/// Records related to `target`, best first, at most `limit` of them.
///
/// Anything sharing no tags is left out entirely. Equal scores keep
/// collection order (the sort is stable).
pub fn related<'a>(
    target: &ProjectRecord,
    collection: &'a [ProjectRecord],
    limit: usize,
) -> Vec<RelatedProject<'a>> {
    let mut scored: Vec<RelatedProject<'a>> = collection
        .iter()
        .filter(|candidate| !is_same_record(target, candidate))
        .map(|candidate| RelatedProject {
            record: candidate,
            score: similarity(target, candidate),
        })
        .filter(|related| related.score > 0.0)
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(limit);
    scored
}

fn is_same_record(a: &ProjectRecord, b: &ProjectRecord) -> bool {
    std::ptr::eq(a, b) || (!a.slug.is_empty() && a.slug == b.slug)
}
