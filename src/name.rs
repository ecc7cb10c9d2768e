//! Globally-unique entity identifiers.
//!
//! In the original store, `Name` is whatever the NetDisk's persistent
//! counter hands out. Here it is a thin `u64` wrapper with a total order,
//! issued by a `NameSupply` the caller constructs explicitly — see the
//! design note in SPEC_FULL.md §2.1 about avoiding implicit global state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// An opaque, globally-unique identifier for a cactus-graph entity.
///
/// Two `Name`s compare equal iff they denote the same entity; ordering is
/// otherwise arbitrary but total, which is all §3 requires of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Name(u64);

impl Name {
    /// Construct a `Name` from a raw value. Used by `StringStore`
    /// implementations that persist names and need to reconstruct them on
    /// load; ordinary callers should obtain `Name`s from a `NameSupply`.
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// The raw value, for encoding (`writeName` in SPEC_FULL.md §6).
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues fresh, process-unique `Name`s.
///
/// Implementations must be monotonic and unique across the supply's entire
/// lifetime (spec.md §5); they need not be unique *across* two independent
/// supplies. `AtomicNameSupply` is the crate's default, backed by a 64-bit
/// counter rather than a UUID or persistent store counter, per the
/// implementer's choice spec.md §5 leaves open.
pub trait NameSupply {
    /// Return a fresh `Name`, never returned by this supply before.
    fn next(&self) -> Name;
}

/// A `NameSupply` backed by an in-process atomic counter.
///
/// Must be constructed explicitly (`AtomicNameSupply::new()`) and held by
/// whatever owns the flower hierarchy (a `NetDisk`-equivalent, or the
/// top-level `Flower` in tests) — there is no implicit global instance to
/// rely on module-load-order for.
#[derive(Debug, Default)]
pub struct AtomicNameSupply {
    next: AtomicU64,
}

impl AtomicNameSupply {
    /// Create a supply starting at 0.
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Create a supply starting past `floor`, for resuming after a reload
    /// from a `StringStore`-backed snapshot whose highest issued `Name` was
    /// `floor`.
    pub fn starting_after(floor: Name) -> Self {
        Self {
            next: AtomicU64::new(floor.raw() + 1),
        }
    }
}

impl NameSupply for AtomicNameSupply {
    fn next(&self) -> Name {
        Name(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
