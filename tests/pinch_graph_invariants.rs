// Pinch-graph invariants (spec.md §8): rEdge involution, black-edge
// membership, grey-edge symmetry, no zero-length pieces, and the S2
// "pinch basic" scenario.

use cactus_core::pinch::PinchGraph;
use cactus_core::pinch::ComponentMap;
use cactus_core::{Name, Piece};

fn n(v: u64) -> Name {
    Name::from_raw(v)
}

#[test]
fn s2_pinch_basic_collapses_two_contigs_into_shared_columns() {
    let mut g = PinchGraph::new();
    let c1 = n(1);
    let c2 = n(2);
    let a1 = g.add_vertex(true, false);
    let b1 = g.add_vertex(true, false);
    let a2 = g.add_vertex(true, false);
    let b2 = g.add_vertex(true, false);
    g.add_black_edge(a1, b1, Piece::new(c1, 0, 9));
    g.add_black_edge(a2, b2, Piece::new(c2, 0, 9));

    let mut components = ComponentMap::new();
    g.pinch_merge(Piece::new(c1, 0, 9), Piece::new(c2, 0, 9), &mut components).unwrap();

    g.check().unwrap();
    assert_eq!(g.vertex_ids().count(), 11);
}

#[test]
fn split_then_get_containing_black_edge_finds_both_halves() {
    let mut g = PinchGraph::new();
    let c1 = n(1);
    let a = g.add_vertex(true, false);
    let b = g.add_vertex(true, false);
    g.add_black_edge(a, b, Piece::new(c1, 0, 19));

    let mid = g.split_edge(c1, 10, true).unwrap();
    g.check().unwrap();

    let left = g.get_containing_black_edge(c1, 5).unwrap();
    let right = g.get_containing_black_edge(c1, 15).unwrap();
    assert_eq!(g.edge_view(left).to, mid);
    assert_eq!(g.edge_view(right).from, mid);
}

#[test]
fn merge_vertices_relocates_black_and_grey_edges() {
    let mut g = PinchGraph::new();
    let c1 = n(1);
    let c2 = n(2);
    let a = g.add_vertex(true, false);
    let b = g.add_vertex(true, false);
    let c = g.add_vertex(true, false);
    let d = g.add_vertex(true, false);
    g.add_black_edge(a, b, Piece::new(c1, 0, 4));
    g.add_black_edge(c, d, Piece::new(c2, 0, 4));
    g.add_grey_edge(b, d);

    let merged = g.merge_vertices(b, d);
    g.check().unwrap();

    assert_eq!(g.vertex_view(merged).black_edges.len(), 2);
    // The grey edge between the two merged vertices collapses away
    // rather than becoming a self-loop.
    assert!(g.vertex_view(merged).grey_edges.is_empty());
}

#[test]
fn out_of_range_split_is_reported_not_fatal() {
    let mut g = PinchGraph::new();
    let c1 = n(1);
    let a = g.add_vertex(true, false);
    let b = g.add_vertex(true, false);
    g.add_black_edge(a, b, Piece::new(c1, 0, 9));
    assert!(g.split_edge(c1, 500, true).is_err());
    // The graph itself is untouched by the failed attempt.
    g.check().unwrap();
}
