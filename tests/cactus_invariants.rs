// Cactus object-graph invariants (spec.md §8 items 1-2, 5, 6) exercised
// through the public `Flower` API.

use cactus_core::model::{BlockId, EndId, EventTree, Flower, Orientation, Side};
use cactus_core::name::AtomicNameSupply;

fn fresh_flower(supply: &AtomicNameSupply) -> Flower {
    Flower::new(supply.next(), EventTree::new(supply.next()))
}

#[test]
fn block_reverse_is_involutive_and_flips_orientation() {
    let supply = AtomicNameSupply::new();
    let mut f = fresh_flower(&supply);
    let b = f.construct_block(&supply, 42).unwrap();
    let fwd = BlockId::positive(b);
    let rev = fwd.reverse();
    assert_eq!(rev.reverse(), fwd);
    assert_eq!(rev.orientation, Orientation::Reverse);
    assert_eq!(fwd.orientation, Orientation::Forward);
    // length is orientation-independent
    assert_eq!(f.block(fwd.name).unwrap().length, f.block(rev.name).unwrap().length);
}

#[test]
fn end_block_orientation_matches_owning_block_orientation() {
    let supply = AtomicNameSupply::new();
    let mut f = fresh_flower(&supply);
    let b = f.construct_block(&supply, 10).unwrap();
    let block = f.block(b).unwrap().clone();

    let five_rev = EndId::new(block.five_end, Orientation::Reverse);
    let owner = f.end_block(five_rev).unwrap().unwrap();
    assert_eq!(owner.name, b);
    assert_eq!(owner.orientation, Orientation::Reverse);
}

#[test]
fn s3_split_and_rejoin_adjacency() {
    // Block length 20, one segment with 5'-adjacent cap X and 3'-adjacent
    // cap Y. After split_block(b, 7): X stays adjacent to left.5Cap, Y
    // stays adjacent to right.3Cap, and left.3Cap <-> right.5Cap.
    let supply = AtomicNameSupply::new();
    let mut f = fresh_flower(&supply);
    let event = f.event_tree.root;

    let stub_x = f.construct_stub_end(&supply, true);
    let stub_y = f.construct_stub_end(&supply, true);
    let b = f.construct_block(&supply, 20).unwrap();
    let seg = f.construct_segment(&supply, b, event, None).unwrap();
    let block = f.block(b).unwrap().clone();
    let seg_rec = block.segments.get(&seg).unwrap().clone();

    let cap_x = f.construct_cap(&supply, stub_x, event, None).unwrap();
    let cap_y = f.construct_cap(&supply, stub_y, event, None).unwrap();
    f.make_adjacent(cap_x, seg_rec.five_cap).unwrap();
    f.make_adjacent(seg_rec.three_cap, cap_y).unwrap();

    let (left, right) = f.split_block(&supply, b, 7).unwrap();
    assert_eq!(f.block(left).unwrap().length, 7);
    assert_eq!(f.block(right).unwrap().length, 13);

    let left_seg = f.block(left).unwrap().segments.values().next().unwrap().clone();
    let right_seg = f.block(right).unwrap().segments.values().next().unwrap().clone();

    assert_eq!(f.cap(cap_x).unwrap().adjacency, Some(left_seg.five_cap));
    assert_eq!(f.cap(cap_y).unwrap().adjacency, Some(right_seg.three_cap));
    assert_eq!(f.cap(left_seg.three_cap).unwrap().adjacency, Some(right_seg.five_cap));
    assert_eq!(f.cap(right_seg.five_cap).unwrap().adjacency, Some(left_seg.three_cap));
}

#[test]
fn s6_newick_skips_unary_nodes_unless_asked_to_keep_them() {
    // r -> a -> b -> leaf, a and b each single-child; collapsed they read
    // as just "leaf" with the summed branch length.
    let supply = AtomicNameSupply::new();
    let mut tree = EventTree::new(supply.next());
    let a = supply.next();
    let b = supply.next();
    let leaf = supply.next();
    tree.add_event(a, None, 1, tree.root).unwrap();
    tree.add_event(b, None, 2, a).unwrap();
    tree.add_event(leaf, Some("leaf".into()), 3, b).unwrap();

    let newick = tree.to_newick();
    assert!(newick.starts_with("(leaf:6)"));
}

#[test]
fn other_block_end_is_the_sibling_side_same_orientation() {
    let supply = AtomicNameSupply::new();
    let mut f = fresh_flower(&supply);
    let b = f.construct_block(&supply, 8).unwrap();
    let block = f.block(b).unwrap().clone();

    let five = EndId::positive(block.five_end);
    let three = f.other_block_end(five).unwrap();
    assert_eq!(three.name, block.three_end);

    let back = f.other_block_end(three).unwrap();
    assert_eq!(back.name, block.five_end);
}

#[test]
fn block_end_side_lookup_respects_orientation_flip() {
    let supply = AtomicNameSupply::new();
    let mut f = fresh_flower(&supply);
    let b = f.construct_block(&supply, 8).unwrap();
    let fwd = BlockId::positive(b);
    let rev = fwd.reverse();

    let five_forward = f.block_end(fwd, Side::Five).unwrap();
    let three_reverse = f.block_end(rev, Side::Three).unwrap();
    assert_eq!(five_forward.name, three_reverse.name);
}
