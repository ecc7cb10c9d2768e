//! # cactus-core
//!
//! A comparative-genomics data structure library: the pinch graph, the
//! cactus object graph it quotients into (Flower/Block/End/Segment/Cap/
//! Chain/Group), and the top-down reference-genome construction
//! algorithm that walks a fixed cactus topology to a single consistent
//! adjacency matching. See `SPEC_FULL.md` for the full module map.

pub mod error;
pub mod graphutil;
pub mod io;
pub mod model;
pub mod name;
pub mod piece;
pub mod pinch;
pub mod reference;

pub use error::{CactusError, Result};
pub use name::{AtomicNameSupply, Name, NameSupply};
pub use piece::Piece;
