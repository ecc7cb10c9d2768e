//! The pinch graph itself and its mutation operators.

use super::component_map::ComponentMap;
use super::edge::{EdgeData, EdgeId, PinchEdgeView};
use super::vertex::{VertexData, VertexId, VertexView};
use crate::error::{CactusError, Result};
use crate::name::Name;
use crate::piece::Piece;
use std::collections::BTreeMap;

/// A sequence-interval graph: vertices partition piece endpoints, black
/// edges carry [`Piece`]s, grey edges are adjacency pointers.
///
/// Arena-backed per DESIGN NOTES §9: vertices and edges live in growable
/// `Vec<Option<_>>`s, ids are never reused, and every cross-reference is a
/// lookup through `self` rather than a pointer.
#[derive(Debug, Clone, Default)]
pub struct PinchGraph {
    vertices: Vec<Option<VertexData>>,
    edges: Vec<Option<EdgeData>>,
    /// Maps `(contig, start)` of every *forward*-oriented black edge to its
    /// id, giving `get_containing_black_edge` its O(log N) lookup via
    /// `BTreeMap::range`.
    coord_index: BTreeMap<(Name, i32), EdgeId>,
}

impl PinchGraph {
    /// An empty pinch graph.
    pub fn new() -> Self {
        Self::default()
    }

    // ----- vertex/edge storage -----------------------------------------

    fn vertex(&self, v: VertexId) -> &VertexData {
        self.vertices[v.0 as usize]
            .as_ref()
            .expect("VertexId refers to a removed vertex")
    }

    fn vertex_mut(&mut self, v: VertexId) -> &mut VertexData {
        self.vertices[v.0 as usize]
            .as_mut()
            .expect("VertexId refers to a removed vertex")
    }

    fn edge(&self, e: EdgeId) -> &EdgeData {
        self.edges[e.0 as usize]
            .as_ref()
            .expect("EdgeId refers to a removed edge")
    }

    fn edge_mut(&mut self, e: EdgeId) -> &mut EdgeData {
        self.edges[e.0 as usize]
            .as_mut()
            .expect("EdgeId refers to a removed edge")
    }

    /// A read-only view of a live vertex.
    pub fn vertex_view(&self, v: VertexId) -> VertexView<'_> {
        let data = self.vertex(v);
        VertexView {
            id: v,
            black_edges: &data.black,
            grey_edges: &data.grey,
            is_end: data.is_end,
            is_dead_end: data.is_dead_end,
        }
    }

    /// A read-only snapshot of a live edge.
    pub fn edge_view(&self, e: EdgeId) -> PinchEdgeView {
        let data = self.edge(e);
        PinchEdgeView {
            id: e,
            from: data.from,
            to: data.to,
            piece: data.piece,
            r_edge: data.r_edge,
        }
    }

    /// All currently-live vertex ids, in arena order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|_| VertexId(i as u32)))
    }

    // ----- vertex mutators -----------------------------------------------

    /// Add a fresh vertex with empty edge sets.
    pub fn add_vertex(&mut self, is_end: bool, is_dead_end: bool) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(Some(VertexData {
            black: Default::default(),
            grey: Default::default(),
            is_end,
            is_dead_end,
        }));
        id
    }

    /// Remove an empty vertex from the graph. Fails with
    /// `InvariantViolation` if it still has incident black or grey edges
    /// (spec.md §4.1: "Removal of a vertex requires its black and grey
    /// edge sets to be empty").
    pub fn remove_vertex(&mut self, v: VertexId) -> Result<()> {
        let data = self.vertex(v);
        if !data.black.is_empty() || !data.grey.is_empty() {
            return Err(CactusError::InvariantViolation(format!(
                "cannot remove vertex {:?} with non-empty edge sets",
                v
            )));
        }
        self.vertices[v.0 as usize] = None;
        Ok(())
    }

    /// Unify two vertices into one. All of `v2`'s black and grey edges are
    /// relocated onto `v1` and `v2` is removed. Idempotent when `v1 == v2`.
    pub fn merge_vertices(&mut self, v1: VertexId, v2: VertexId) -> VertexId {
        if v1 == v2 {
            return v1;
        }

        let black2: Vec<EdgeId> = self.vertex(v2).black.iter().copied().collect();
        for eid in black2 {
            let redge_id = self.edge(eid).r_edge;
            self.edge_mut(eid).from = v1;
            self.edge_mut(redge_id).to = v1;
            self.vertex_mut(v1).black.insert(eid);
        }

        let grey2: Vec<VertexId> = self.vertex(v2).grey.iter().copied().collect();
        for u in grey2 {
            self.vertex_mut(u).grey.remove(&v2);
            if u != v1 {
                self.vertex_mut(u).grey.insert(v1);
                self.vertex_mut(v1).grey.insert(u);
            }
            // u == v1: a grey edge between the two vertices being merged
            // collapses to a self-loop, which is not a meaningful
            // adjacency and is simply dropped.
        }

        self.vertex_mut(v2).black.clear();
        self.vertex_mut(v2).grey.clear();
        self.remove_vertex(v2)
            .expect("v2 was just emptied and cannot still have edges");
        v1
    }

    // ----- grey edges -----------------------------------------------------

    /// Add an undirected grey (adjacency) edge between `u` and `v`.
    pub fn add_grey_edge(&mut self, u: VertexId, v: VertexId) {
        self.vertex_mut(u).grey.insert(v);
        self.vertex_mut(v).grey.insert(u);
    }

    /// Remove the grey edge between `u` and `v`, if present.
    pub fn remove_grey_edge(&mut self, u: VertexId, v: VertexId) {
        self.vertex_mut(u).grey.remove(&v);
        self.vertex_mut(v).grey.remove(&u);
    }

    // ----- black edges ------------------------------------------------

    fn insert_edge_pair(&mut self, from: VertexId, to: VertexId, piece: Piece) -> (EdgeId, EdgeId) {
        let id = EdgeId(self.edges.len() as u32);
        let rid = EdgeId(self.edges.len() as u32 + 1);
        self.edges.push(Some(EdgeData {
            from,
            to,
            piece,
            r_edge: rid,
        }));
        self.edges.push(Some(EdgeData {
            from: to,
            to: from,
            piece: piece.mirror(),
            r_edge: id,
        }));
        (id, rid)
    }

    fn index_forward_piece(&mut self, piece: Piece, id: EdgeId) {
        if !piece.is_reverse() {
            self.coord_index.insert((piece.contig, piece.start), id);
        }
    }

    fn deindex_piece(&mut self, piece: &Piece) {
        if !piece.is_reverse() {
            self.coord_index.remove(&(piece.contig, piece.start));
        }
    }

    /// Add a new black edge carrying `piece`, from `from` to `to`. Returns
    /// the forward-direction `EdgeId`; the reverse twin is reachable via
    /// `edge_view(id).r_edge`.
    pub fn add_black_edge(&mut self, from: VertexId, to: VertexId, piece: Piece) -> EdgeId {
        let (id, rid) = self.insert_edge_pair(from, to, piece);
        self.vertex_mut(from).black.insert(id);
        self.vertex_mut(to).black.insert(rid);
        self.index_forward_piece(piece, id);
        id
    }

    /// `getContainingBlackEdge(contig, position)`: the edge whose piece
    /// covers base `position` on `contig`, found in O(log N) via a range
    /// lookup into the coordinate index.
    pub fn get_containing_black_edge(&self, contig: Name, position: i32) -> Result<EdgeId> {
        self.coord_index
            .range(..=(contig, position))
            .rev()
            .find(|((c, _), _)| *c == contig)
            .map(|(_, &id)| id)
            .filter(|&id| self.edge(id).piece.end >= position)
            .ok_or_else(|| {
                CactusError::OutOfRange(format!(
                    "no black edge contains position {} on contig {:?}",
                    position, contig
                ))
            })
    }

    /// Split whichever black edge contains the coordinate boundary
    /// immediately before base `position` (so `position` ranges over
    /// `piece.start ..= piece.end + 1`), returning the vertex now sitting
    /// at that boundary.
    ///
    /// `side` is accepted for API fidelity with spec.md §4.1 but is
    /// inert here: a coordinate boundary determines a single vertex
    /// regardless of which side a caller claims to want it from. See
    /// DESIGN.md's Open Question decisions.
    pub fn split_edge(&mut self, contig: Name, position: i32, _side: bool) -> Result<VertexId> {
        if let Ok(eid) = self.get_containing_black_edge(contig, position) {
            let piece = self.edge(eid).piece;
            if piece.start == position {
                return Ok(self.edge(eid).from);
            }
            return self.split_at(eid, position);
        }
        if position > 0 {
            if let Ok(eid) = self.get_containing_black_edge(contig, position - 1) {
                let piece = self.edge(eid).piece;
                if piece.end == position - 1 {
                    return Ok(self.edge(eid).to);
                }
            }
        }
        Err(CactusError::OutOfRange(format!(
            "no black edge straddles boundary {} on contig {:?}",
            position, contig
        )))
    }

    /// Split the edge `eid` strictly inside its piece, at the boundary
    /// immediately before base `position`. `eid`'s piece must satisfy
    /// `piece.start < position <= piece.end`.
    fn split_at(&mut self, eid: EdgeId, position: i32) -> Result<VertexId> {
        let edge = self.edge(eid).clone();
        let redge_id = edge.r_edge;
        let piece = edge.piece;
        if position <= piece.start || position > piece.end {
            return Err(CactusError::OutOfRange(format!(
                "split position {} not strictly inside piece [{}, {}]",
                position, piece.start, piece.end
            )));
        }

        let a = edge.from;
        let b = edge.to;
        let v = self.add_vertex(false, false);

        self.vertex_mut(a).black.remove(&eid);
        self.vertex_mut(b).black.remove(&redge_id);
        self.deindex_piece(&piece);
        self.edges[eid.0 as usize] = None;
        self.edges[redge_id.0 as usize] = None;

        let left = Piece::new(piece.contig, piece.start, position - 1);
        let right = Piece::new(piece.contig, position, piece.end);

        let (left_id, left_r_id) = self.insert_edge_pair(a, v, left);
        let (right_id, right_r_id) = self.insert_edge_pair(v, b, right);

        self.vertex_mut(a).black.insert(left_id);
        self.vertex_mut(v).black.insert(left_r_id);
        self.vertex_mut(v).black.insert(right_id);
        self.vertex_mut(b).black.insert(right_r_id);

        self.index_forward_piece(left, left_id);
        self.index_forward_piece(right, right_id);

        Ok(v)
    }

    /// Split the interval `[start, end]` on `contig` into per-base unit
    /// edges, returning the `len + 1` column-boundary vertices in order.
    fn split_into_columns(&mut self, contig: Name, start: i32, end: i32) -> Result<Vec<VertexId>> {
        let mut verts = Vec::with_capacity((end - start + 2) as usize);
        for pos in start..=end + 1 {
            verts.push(self.split_edge(contig, pos, true)?);
        }
        Ok(verts)
    }

    /// `pinch_merge(piece1, piece2, component_map)`: merge the two
    /// equal-length pieces column by column so they become parallel black
    /// edges at shared vertices (spec.md §4.1).
    ///
    /// `pinch_merge(p, p, _)` is a no-op up to vertex-id permutation: every
    /// column pair collapses to `merge_vertices(v, v)`, which is
    /// idempotent.
    pub fn pinch_merge(
        &mut self,
        piece1: Piece,
        piece2: Piece,
        components: &mut ComponentMap,
    ) -> Result<()> {
        if piece1.length() != piece2.length() {
            return Err(CactusError::InvariantViolation(
                "pinch_merge requires pieces of equal length".into(),
            ));
        }
        let verts1 = self.split_into_columns(piece1.contig, piece1.start, piece1.end)?;
        let verts2 = self.split_into_columns(piece2.contig, piece2.start, piece2.end)?;
        debug_assert_eq!(verts1.len(), verts2.len());
        for (a, b) in verts1.into_iter().zip(verts2.into_iter()) {
            components.union(a.raw(), b.raw());
            self.merge_vertices(a, b);
        }
        Ok(())
    }

    // ----- consistency checks --------------------------------------------

    /// `checkPinchGraph`: walk every edge and vertex, asserting the
    /// invariants of spec.md §4.1. Returns the first violation found.
    pub fn check(&self) -> Result<()> {
        self.check_degree(None)
    }

    /// `checkPinchGraphDegree(maxDegree)`: as `check`, additionally
    /// bounding every vertex's black-edge degree.
    pub fn check_degree(&self, max_degree: Option<usize>) -> Result<()> {
        for (i, slot) in self.vertices.iter().enumerate() {
            let Some(data) = slot else { continue };
            let v = VertexId(i as u32);
            if let Some(max) = max_degree {
                if data.black.len() > max {
                    return Err(CactusError::InvariantViolation(format!(
                        "vertex {:?} exceeds max black degree {}",
                        v, max
                    )));
                }
            }
            for &eid in &data.black {
                let edge = self.edge(eid);
                if edge.from != v {
                    return Err(CactusError::InvariantViolation(format!(
                        "edge {:?} stored in {:?}'s black set but from={:?}",
                        eid, v, edge.from
                    )));
                }
                let redge = self.edge(edge.r_edge);
                if redge.r_edge != eid {
                    return Err(CactusError::InvariantViolation(format!(
                        "rEdge involution broken for edge {:?}",
                        eid
                    )));
                }
                if !self.vertex(edge.to).black.contains(&edge.r_edge) {
                    return Err(CactusError::InvariantViolation(format!(
                        "reverse of edge {:?} not present in {:?}'s black set",
                        eid, edge.to
                    )));
                }
                if edge.piece.length() <= 0 {
                    return Err(CactusError::InvariantViolation(format!(
                        "edge {:?} carries a zero-length piece",
                        eid
                    )));
                }
            }
            for &u in &data.grey {
                if !self.vertex(u).grey.contains(&v) {
                    return Err(CactusError::InvariantViolation(format!(
                        "grey edge {:?}-{:?} is not symmetric",
                        v, u
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::Name;

    fn n(v: u64) -> Name {
        Name::from_raw(v)
    }

    #[test]
    fn pinch_two_equal_contigs_collapses_to_shared_columns() {
        // S2: two contigs of length 10, pinch_merge over the whole thing.
        let mut g = PinchGraph::new();
        let c1 = n(1);
        let c2 = n(2);
        let v1a = g.add_vertex(true, false);
        let v1b = g.add_vertex(true, false);
        let v2a = g.add_vertex(true, false);
        let v2b = g.add_vertex(true, false);
        g.add_black_edge(v1a, v1b, Piece::new(c1, 0, 9));
        g.add_black_edge(v2a, v2b, Piece::new(c2, 0, 9));

        let mut components = ComponentMap::new();
        g.pinch_merge(Piece::new(c1, 0, 9), Piece::new(c2, 0, 9), &mut components)
            .unwrap();

        g.check().unwrap();

        // 11 boundary columns total. The two outermost columns each have
        // one incident direction, so after merging the two contigs'
        // parallel pieces they hold 2 black edges; the 9 interior columns
        // have both directions incident and hold 4 (2 parallel edges on
        // each side).
        let live: Vec<_> = g.vertex_ids().collect();
        assert_eq!(live.len(), 11);
        let degrees: Vec<usize> = live.iter().map(|&v| g.vertex_view(v).black_edges.len()).collect();
        assert_eq!(degrees.iter().filter(|&&d| d == 2).count(), 2);
        assert_eq!(degrees.iter().filter(|&&d| d == 4).count(), 9);
    }

    #[test]
    fn self_pinch_is_a_noop() {
        let mut g = PinchGraph::new();
        let c1 = n(1);
        let a = g.add_vertex(true, false);
        let b = g.add_vertex(true, false);
        g.add_black_edge(a, b, Piece::new(c1, 0, 9));

        let before = g.vertex_ids().count();
        let mut components = ComponentMap::new();
        g.pinch_merge(Piece::new(c1, 0, 9), Piece::new(c1, 0, 9), &mut components)
            .unwrap();
        g.check().unwrap();
        assert_eq!(g.vertex_ids().count(), before);
    }

    #[test]
    fn split_edge_out_of_range_fails() {
        let mut g = PinchGraph::new();
        let c1 = n(1);
        let a = g.add_vertex(true, false);
        let b = g.add_vertex(true, false);
        g.add_black_edge(a, b, Piece::new(c1, 0, 9));
        assert!(matches!(
            g.split_edge(c1, 100, true),
            Err(CactusError::OutOfRange(_))
        ));
    }

    #[test]
    fn merge_vertices_is_idempotent() {
        let mut g = PinchGraph::new();
        let a = g.add_vertex(false, false);
        assert_eq!(g.merge_vertices(a, a), a);
    }

    #[test]
    fn remove_vertex_requires_empty_edge_sets() {
        let mut g = PinchGraph::new();
        let c1 = n(1);
        let a = g.add_vertex(true, false);
        let b = g.add_vertex(true, false);
        g.add_black_edge(a, b, Piece::new(c1, 0, 9));
        assert!(g.remove_vertex(a).is_err());
    }
}
