//! Following a genome's thread of Cap adjacencies, grounded on
//! `traceAdjacency` in `buildReference.c`: starting from a Cap, hop to
//! its adjacency partner, cross to the other Cap of that partner's
//! Segment, and repeat until landing on a Cap whose End is "active"
//! (a block End, or an attached stub) rather than a pass-through tangle
//! End still awaiting its own nested flower's reference.

use crate::error::Result;
use crate::model::Flower;
use crate::name::Name;
use std::collections::HashSet;

/// Whether an End counts as a stopping point for `trace_adjacency`: a
/// block End (real homology boundary) or a stub End already attached to
/// the parent flower's structure, as opposed to a free tangle End whose
/// nested flower hasn't been resolved yet.
pub fn is_active_end(flower: &Flower, end: Name) -> Result<bool> {
    let e = flower.end(end)?;
    Ok(e.is_block_end() || e.is_attached)
}

fn other_segment_cap(flower: &Flower, segment: Name, cap: Name) -> Result<Name> {
    for block in flower.blocks() {
        if let Some(seg) = block.segments.get(&segment) {
            return Ok(if seg.five_cap == cap { seg.three_cap } else { seg.five_cap });
        }
    }
    Err(crate::error::CactusError::MissingEntity(format!("segment {segment}")))
}

/// Walks from `start`'s adjacency partner across Segments until it
/// reaches a Cap on an active End, returning that Cap's name. Returns
/// `Ok(None)` if `start` has no adjacency set, or if the trace loops
/// back on itself without ever reaching an active End (a malformed
/// graph; callers treat this the same as "no adjacency information").
pub fn trace_adjacency(flower: &Flower, start: Name) -> Result<Option<Name>> {
    let mut current = start;
    let mut visited = HashSet::new();
    loop {
        if !visited.insert(current) {
            return Ok(None);
        }
        let cap = flower.cap(current)?;
        let next = match cap.adjacency {
            Some(n) => n,
            None => return Ok(None),
        };
        let next_cap = flower.cap(next)?;
        let segment = match next_cap.segment {
            Some(s) => s,
            None => return Ok(Some(next)),
        };
        let other = other_segment_cap(flower, segment, next)?;
        let other_cap = flower.cap(other)?;
        if is_active_end(flower, other_cap.end)? {
            return Ok(Some(other));
        }
        current = other;
    }
}
