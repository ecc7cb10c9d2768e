//! Caps: a genome's instance of an `End` (spec.md §3). A cap's
//! `adjacency` is the symmetric "next cap along this genome's thread"
//! link that `reference::trace_adjacency` walks.

use crate::name::Name;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapRecord {
    pub name: Name,
    pub end: Name,
    pub event: Name,
    /// Copied from the owning `End` at construction time; used the same
    /// way `cap_getSide` is in `buildReference.c`'s adjacency trace, to
    /// avoid walking (and double-counting) each adjacency from both ends.
    pub side: bool,
    pub segment: Option<Name>,
    pub coordinate: Option<(Name, i32)>,
    pub strand: Option<bool>,
    pub adjacency: Option<Name>,
    pub parent: Option<Name>,
    pub children: Vec<Name>,
}
