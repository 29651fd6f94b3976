//! Score reconciliation and hybrid ordering.

use std::collections::HashMap;

use super::types::{RawScore, ScoredItem};

/// `relevance * alpha + original * (1 - alpha)`.
#[inline]
pub fn hybrid_score(relevance: f64, original: f64, alpha: f64) -> f64 {
    relevance * alpha + original * (1.0 - alpha)
}

/// Assigns a relevance score to each of `count` items from the endpoint's results.
///
/// Tried in order per item position `i`:
/// 1. a result whose `index` equals `i`;
/// 2. `results[i]`, if that result carries no `index`;
/// 3. `results[i]` regardless of its `index`, if there are exactly `count` results.
///
/// Tier 2 and 3 assume the endpoint kept request order. An endpoint that reorders results
/// without echoing indices is indistinguishable from one that does not, so scores can land on
/// the wrong item there. `None` means no tier matched.
pub fn reconcile_scores(results: &[RawScore], count: usize) -> Vec<Option<f64>> {
    let mut by_index: HashMap<usize, f64> = HashMap::with_capacity(results.len());
    for result in results {
        if let (Some(index), Some(value)) = (result.index, result.value()) {
            by_index.entry(index).or_insert(value);
        }
    }
    let length_matched = results.len() == count;

    (0..count)
        .map(|position| {
            by_index
                .get(&position)
                .copied()
                .or_else(|| {
                    results
                        .get(position)
                        .filter(|r| r.index.is_none())
                        .and_then(RawScore::value)
                })
                .or_else(|| {
                    length_matched
                        .then(|| results.get(position).and_then(RawScore::value))
                        .flatten()
                })
        })
        .collect()
}

/// Writes fusion fields onto `items` and sorts them by descending hybrid score.
///
/// Unmatched items get a relevance score of `0`. The sort is stable.
pub fn fuse(items: Vec<ScoredItem>, scores: &[Option<f64>], alpha: f64) -> Vec<ScoredItem> {
    let mut fused: Vec<ScoredItem> = items
        .into_iter()
        .enumerate()
        .map(|(position, mut item)| {
            let relevance = scores.get(position).copied().flatten().unwrap_or(0.0);
            item.rerank_score = Some(relevance);
            item.hybrid_score = Some(hybrid_score(relevance, item.original_score, alpha));
            item
        })
        .collect();

    fused.sort_by(|a, b| {
        let a = a.hybrid_score.unwrap_or(f64::NEG_INFINITY);
        let b = b.hybrid_score.unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });
    fused
}

/// Strips fusion fields and sorts by descending original score (stable).
pub fn original_order(items: Vec<ScoredItem>) -> Vec<ScoredItem> {
    let mut restored: Vec<ScoredItem> = items.into_iter().map(ScoredItem::strip_fusion).collect();
    restored.sort_by(|a, b| b.original_score.total_cmp(&a.original_score));
    restored
}
