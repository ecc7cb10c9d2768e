//! Blocks: a homologous column group shared by one or more genomes
//! (spec.md §3, §4.2). A `BlockRecord` is the single canonical record for
//! both orientations — see [`super::ids::BlockId`].

use crate::model::segment::SegmentRecord;
use crate::name::Name;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub name: Name,
    pub length: i32,
    /// The block's 5' `End`, in this record's own (positive) orientation.
    pub five_end: Name,
    /// The block's 3' `End`, in this record's own (positive) orientation.
    pub three_end: Name,
    pub segments: IndexMap<Name, SegmentRecord>,
}

impl BlockRecord {
    pub fn degree(&self) -> usize {
        self.segments.len()
    }
}

/// Flags controlling `Flower::block_segment_newick` (spec.md §4.2's
/// "Newick emission of a block's segment tree"; S6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentNewickConfig {
    /// `false` (the default) collapses a segment with exactly one child
    /// into that child's own rendering — the unary segment contributes
    /// no branching information and vanishes entirely, per child.
    pub include_unary_events: bool,
    /// Whether an internal (non-leaf) segment's own label is emitted
    /// alongside its children's parenthesized group.
    pub include_internal_names: bool,
}

impl Default for SegmentNewickConfig {
    fn default() -> Self {
        SegmentNewickConfig { include_unary_events: false, include_internal_names: true }
    }
}
