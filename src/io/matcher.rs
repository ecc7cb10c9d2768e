//! The perfect-matching oracle the reference builder drives (spec.md
//! §4.3.5, §6). Finding a maximum-weight perfect matching on a general
//! graph is the province of a dedicated algorithm (Galil's Blossom
//! algorithm, in the original); this crate only specifies the interface
//! and consumes it, exactly as `buildReferenceTopDown` in
//! `buildReference.c` calls out to an external `matchingAlgorithm`
//! function pointer rather than inlining one.

use crate::error::Result;

/// Computes a perfect matching over a complete, undirected, weighted
/// graph on `num_nodes` nodes (`num_nodes` must be even). `edges` is
/// `(u, v, weight)` triples; implementations may assume every pair
/// appears exactly once (the caller cliques out the graph first via
/// [`crate::graphutil::make_clique`]).
///
/// Returns `num_nodes / 2` disjoint pairs covering every node exactly
/// once.
pub trait PerfectMatcher {
    fn perfect_matching(&self, num_nodes: usize, edges: &[(usize, usize, i64)]) -> Result<Vec<(usize, usize)>>;
}

/// A greedy maximum-weight matcher: repeatedly takes the heaviest
/// remaining edge between two unmatched nodes. Not optimal in general
/// (unlike Blossom), but deterministic and good enough to drive and test
/// the reference builder's matching loop without an external dependency.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPerfectMatcher;

impl PerfectMatcher for GreedyPerfectMatcher {
    fn perfect_matching(&self, num_nodes: usize, edges: &[(usize, usize, i64)]) -> Result<Vec<(usize, usize)>> {
        if num_nodes % 2 != 0 {
            return Err(crate::error::CactusError::InvariantViolation(format!("cannot perfectly match an odd number of nodes ({num_nodes})")));
        }
        let mut sorted: Vec<&(usize, usize, i64)> = edges.iter().collect();
        sorted.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)).then(a.1.cmp(&b.1)));
        let mut matched = vec![false; num_nodes];
        let mut result = Vec::with_capacity(num_nodes / 2);
        for &&(u, v, _) in &sorted {
            if !matched[u] && !matched[v] && u != v {
                matched[u] = true;
                matched[v] = true;
                result.push((u, v));
            }
        }
        if result.len() != num_nodes / 2 {
            return Err(crate::error::CactusError::MatchingInfeasible(format!(
                "greedy matcher covered {} of {} required pairs; supplied edge set was not a complete graph",
                result.len(),
                num_nodes / 2
            )));
        }
        Ok(result)
    }
}
