//! Reference-genome construction (spec.md §4.3): given a `Flower`
//! whose blocks and stub ends already exist, infer a single consistent
//! genome path (or several, for multiple chromosomes) threading through
//! them, recursing top-down into nested flowers.

mod builder;
mod trace;

pub use builder::{build_reference_top_down, ReferenceBuildStats, ReferenceBuilderConfig, WeightMode};
pub use trace::{is_active_end, trace_adjacency};
