//! The cactus object graph: Blocks, Ends, Segments, Caps, Chains, Groups
//! and Flowers (spec.md §3, §4.2).
//!
//! Every entity with a reverse companion (`Block`, `End`, `Segment`,
//! `Cap`) is stored once, canonically, keyed by its positive-orientation
//! [`Name`](crate::name::Name); callers address either "view" through a
//! `(Name, Orientation)` handle. `Flower` is the arena: Blocks, Ends not
//! owned by a block, Chains and Groups all live in `IndexMap`s keyed by
//! `Name`, and every cross-reference between entities is a `Name` looked
//! up through the owning `Flower`, per DESIGN NOTES §9.

mod block;
mod cap;
mod chain;
mod end;
mod event;
mod flower;
mod group;
mod ids;
mod segment;

pub use block::{BlockRecord, SegmentNewickConfig};
pub use cap::CapRecord;
pub use chain::{ChainRecord, Link};
pub use end::EndRecord;
pub use event::{Event, EventTree, UNKNOWN_BRANCH_LENGTH};
pub use flower::{Cactus, Flower};
pub use group::GroupRecord;
pub use ids::{BlockId, CapId, EndId, Orientation, SegmentId, Side};
pub use segment::{SegmentRecord, SequenceCoords};
