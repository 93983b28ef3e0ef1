//! Frequency ranking shared by the color and font pipelines.

use fnv::FnvHashMap;
use std::hash::Hash;

/// Rank distinct items by occurrence count, most frequent first.
///
/// Ties keep first-seen order. The result holds at most `limit` items.
pub fn rank_by_frequency<T: Eq + Hash + Clone>(items: &[T], limit: usize) -> Vec<T> {
    // item -> (count, first index)
    let mut counts: FnvHashMap<&T, (usize, usize)> = FnvHashMap::default();
    for (index, item) in items.iter().enumerate() {
        counts.entry(item).or_insert((0, index)).0 += 1;
    }

    let mut ranked: Vec<(&T, usize, usize)> = counts
        .into_iter()
        .map(|(item, (count, first))| (item, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(item, _, _)| item.clone())
        .collect()
}

/// Rank extracted font family names. Deduplication is exact-string.
pub fn rank_fonts(fonts: &[String], limit: usize) -> Vec<String> {
    rank_by_frequency(fonts, limit)
}
