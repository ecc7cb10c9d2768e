//! Ends: one side of a `Block`, or a free-standing stub/cap attachment
//! point (spec.md §3).

use crate::model::cap::CapRecord;
use crate::name::Name;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndRecord {
    pub name: Name,
    /// `true` = 5' side, `false` = 3'. Fixed at construction and
    /// meaningful only for block ends; stubs carry `true` by convention.
    pub side: bool,
    pub block: Option<Name>,
    pub group: Option<Name>,
    /// Stub ends only: whether this free end is attached to a parent
    /// flower's adjacency (an "attached stub") or is truly free.
    pub is_attached: bool,
    pub caps: IndexMap<Name, CapRecord>,
}

impl EndRecord {
    pub fn is_block_end(&self) -> bool {
        self.block.is_some()
    }

    pub fn is_stub_end(&self) -> bool {
        self.block.is_none()
    }
}
