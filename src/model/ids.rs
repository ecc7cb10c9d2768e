//! Oriented handles into the cactus object graph.
//!
//! `Block`, `End`, `Segment` and `Cap` each have a reverse companion
//! (spec.md §3). Rather than store two heap objects per entity, we store
//! one record keyed by its positive-orientation [`Name`](crate::name::Name)
//! and address either view through a `(Name, Orientation)` pair, exactly
//! as `Piece`/`VertexId` reuse one record for both strands. Handles
//! canonicalize to `name` alone for map keys; `Orientation` only changes
//! how accessor methods interpret the record.

use crate::name::Name;
use serde::{Deserialize, Serialize};

/// Which strand/direction an oriented handle currently views its record
/// from. `Forward` is the record's own canonical orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Forward,
    Reverse,
}

impl Orientation {
    pub fn flip(self) -> Self {
        match self {
            Orientation::Forward => Orientation::Reverse,
            Orientation::Reverse => Orientation::Forward,
        }
    }

    pub fn is_forward(self) -> bool {
        matches!(self, Orientation::Forward)
    }
}

/// Which end of a block a handle refers to, independent of orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Five,
    Three,
}

macro_rules! oriented_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name {
            pub name: Name,
            pub orientation: Orientation,
        }

        impl $name {
            pub fn new(name: Name, orientation: Orientation) -> Self {
                $name { name, orientation }
            }

            pub fn positive(name: Name) -> Self {
                $name { name, orientation: Orientation::Forward }
            }

            /// The same underlying record, viewed from the other strand.
            pub fn reverse(self) -> Self {
                $name { name: self.name, orientation: self.orientation.flip() }
            }
        }
    };
}

oriented_id!(BlockId, "A handle onto one orientation of a `BlockRecord`.");
oriented_id!(EndId, "A handle onto one orientation of an `EndRecord`.");
oriented_id!(SegmentId, "A handle onto one orientation of a `SegmentRecord`.");
oriented_id!(CapId, "A handle onto one orientation of a `CapRecord`.");
