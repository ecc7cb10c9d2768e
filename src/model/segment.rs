//! Segments: a genome's individual instance of a `Block` (spec.md §3).

use crate::name::Name;
use serde::{Deserialize, Serialize};

/// Where a segment sits on its genome's underlying sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceCoords {
    pub contig: Name,
    pub start: i32,
    pub reverse: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub name: Name,
    pub block: Name,
    pub event: Name,
    pub five_cap: Name,
    pub three_cap: Name,
    pub sequence: Option<SequenceCoords>,
    pub parent: Option<Name>,
    pub children: Vec<Name>,
}
