//! Generic edge/node-set utilities shared by the reference builder
//! (spec.md §4.3.4), grounded on `makeEdgesAClique` and the
//! sort-then-pop adjacency dedup in `buildReference.c`'s
//! `getAdjacencyEdgesP`/`getWeightedAdjacencyEdges`.

use std::collections::BTreeSet;

/// Normalizes an undirected pair so `(u, v)` and `(v, u)` compare equal.
fn canonical_pair(u: usize, v: usize) -> (usize, usize) {
    if u <= v {
        (u, v)
    } else {
        (v, u)
    }
}

/// Collapses duplicate undirected edges between the same pair of nodes
/// into one, summing their weights — `getAdjacencyEdgesP`'s
/// sort-then-pop dedup, where repeated observations of the same
/// adjacency become one edge whose weight is the observation count.
pub fn dedup_weighted_edges(edges: &[(usize, usize, i64)]) -> Vec<(usize, usize, i64)> {
    let mut totals: std::collections::BTreeMap<(usize, usize), i64> = std::collections::BTreeMap::new();
    for &(u, v, w) in edges {
        *totals.entry(canonical_pair(u, v)).or_insert(0) += w;
    }
    totals.into_iter().map(|((u, v), w)| (u, v, w)).collect()
}

/// Completes a graph on `num_nodes` nodes into a clique, adding a
/// zero-weight edge for every pair not already present — `makeEdgesAClique`,
/// needed because a `PerfectMatcher` is only specified over complete
/// graphs.
pub fn make_clique(num_nodes: usize, edges: &[(usize, usize, i64)]) -> Vec<(usize, usize, i64)> {
    let mut present: BTreeSet<(usize, usize)> = edges.iter().map(|&(u, v, _)| canonical_pair(u, v)).collect();
    let mut out = edges.to_vec();
    for u in 0..num_nodes {
        for v in (u + 1)..num_nodes {
            if present.insert((u, v)) {
                out.push((u, v, 0));
            }
        }
    }
    out
}

/// Like [`make_clique`], but skips any pair `(u, v)` for which
/// `excluded(u, v)` holds — used by the reference builder to keep a
/// unit's own two sides from ever being offered to the matcher as a
/// candidate pair.
pub fn make_clique_excluding(num_nodes: usize, edges: &[(usize, usize, i64)], excluded: impl Fn(usize, usize) -> bool) -> Vec<(usize, usize, i64)> {
    let mut present: BTreeSet<(usize, usize)> = edges.iter().map(|&(u, v, _)| canonical_pair(u, v)).collect();
    let mut out = edges.to_vec();
    for u in 0..num_nodes {
        for v in (u + 1)..num_nodes {
            if excluded(u, v) {
                continue;
            }
            if present.insert((u, v)) {
                out.push((u, v, 0));
            }
        }
    }
    out
}
