//! Pinch-graph (black) edge storage.

use super::vertex::VertexId;
use crate::piece::Piece;

/// A monotonically-assigned, never-reused handle to a directed pinch edge.
///
/// Every black edge has a reverse twin also addressable by its own
/// `EdgeId` — spec.md §3's `rEdge` — so a pinch column is two `EdgeId`s,
/// one per strand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub(crate) u32);

#[derive(Debug, Clone)]
pub(crate) struct EdgeData {
    pub(crate) from: VertexId,
    pub(crate) to: VertexId,
    pub(crate) piece: Piece,
    pub(crate) r_edge: EdgeId,
}

/// A read-only view of a black edge, returned by [`PinchGraph::edge`](
/// super::graph::PinchGraph::edge_view).
#[derive(Debug, Clone, Copy)]
pub struct PinchEdgeView {
    pub id: EdgeId,
    pub from: VertexId,
    pub to: VertexId,
    pub piece: Piece,
    pub r_edge: EdgeId,
}
