//! `Flower`: a nested comparative-genomics subproblem, and `Cactus`, the
//! whole hierarchy of flowers it takes to describe one alignment
//! (spec.md §3, §4.2).
//!
//! A `Flower` owns its `Block`s, the `End`s not belonging to a block, its
//! `Chain`s and `Group`s, and an `EventTree`; ownership here means arena
//! storage keyed by [`Name`](crate::name::Name) — destruction cascades
//! (e.g. `remove_block` clearing the block's ends) are implemented as
//! plain methods rather than relied on via drop order.

use crate::error::{CactusError, Result};
use crate::model::block::BlockRecord;
use crate::model::cap::CapRecord;
use crate::model::chain::{ChainRecord, Link};
use crate::model::end::EndRecord;
use crate::model::event::EventTree;
use crate::model::group::GroupRecord;
use crate::model::ids::{BlockId, EndId, Orientation, Side};
use crate::model::segment::SegmentRecord;
use crate::name::{Name, NameSupply};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

impl Side {
    pub fn flip(self) -> Self {
        match self {
            Side::Five => Side::Three,
            Side::Three => Side::Five,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flower {
    pub name: Name,
    /// The Group, in the parent Flower, this Flower is nested under. The
    /// root Flower of a `Cactus` has none.
    pub parent: Option<(Name, Name)>,
    blocks: IndexMap<Name, BlockRecord>,
    ends: IndexMap<Name, EndRecord>,
    chains: IndexMap<Name, ChainRecord>,
    groups: IndexMap<Name, GroupRecord>,
    pub event_tree: EventTree,
}

impl Flower {
    pub fn new(name: Name, event_tree: EventTree) -> Self {
        Flower { name, parent: None, blocks: IndexMap::new(), ends: IndexMap::new(), chains: IndexMap::new(), groups: IndexMap::new(), event_tree }
    }

    // -- accessors -----------------------------------------------------

    pub fn block(&self, name: Name) -> Result<&BlockRecord> {
        self.blocks.get(&name).ok_or_else(|| CactusError::MissingEntity(format!("block {name}")))
    }

    pub fn block_mut(&mut self, name: Name) -> Result<&mut BlockRecord> {
        self.blocks.get_mut(&name).ok_or_else(|| CactusError::MissingEntity(format!("block {name}")))
    }

    pub fn blocks(&self) -> impl Iterator<Item = &BlockRecord> {
        self.blocks.values()
    }

    pub fn end(&self, name: Name) -> Result<&EndRecord> {
        self.ends.get(&name).ok_or_else(|| CactusError::MissingEntity(format!("end {name}")))
    }

    pub fn end_mut(&mut self, name: Name) -> Result<&mut EndRecord> {
        self.ends.get_mut(&name).ok_or_else(|| CactusError::MissingEntity(format!("end {name}")))
    }

    pub fn ends(&self) -> impl Iterator<Item = &EndRecord> {
        self.ends.values()
    }

    pub fn chain(&self, name: Name) -> Result<&ChainRecord> {
        self.chains.get(&name).ok_or_else(|| CactusError::MissingEntity(format!("chain {name}")))
    }

    pub fn chain_mut(&mut self, name: Name) -> Result<&mut ChainRecord> {
        self.chains.get_mut(&name).ok_or_else(|| CactusError::MissingEntity(format!("chain {name}")))
    }

    pub fn chains(&self) -> impl Iterator<Item = &ChainRecord> {
        self.chains.values()
    }

    pub fn group(&self, name: Name) -> Result<&GroupRecord> {
        self.groups.get(&name).ok_or_else(|| CactusError::MissingEntity(format!("group {name}")))
    }

    pub fn group_mut(&mut self, name: Name) -> Result<&mut GroupRecord> {
        self.groups.get_mut(&name).ok_or_else(|| CactusError::MissingEntity(format!("group {name}")))
    }

    pub fn groups(&self) -> impl Iterator<Item = &GroupRecord> {
        self.groups.values()
    }

    // -- construction ----------------------------------------------------

    /// Builds a Block and its two Ends in one call, mirroring
    /// `block_construct`/`block_construct2` in cactusBlock.c, which always
    /// create both ends of a block together rather than one at a time.
    pub fn construct_block(&mut self, supply: &dyn NameSupply, length: i32) -> Result<Name> {
        if length <= 0 {
            return Err(CactusError::InvariantViolation(format!("block length must be positive, got {length}")));
        }
        let block_name = supply.next();
        let five = supply.next();
        let three = supply.next();
        self.ends.insert(five, EndRecord { name: five, side: true, block: Some(block_name), group: None, is_attached: false, caps: IndexMap::new() });
        self.ends.insert(three, EndRecord { name: three, side: false, block: Some(block_name), group: None, is_attached: false, caps: IndexMap::new() });
        self.blocks.insert(block_name, BlockRecord { name: block_name, length, five_end: five, three_end: three, segments: IndexMap::new() });
        Ok(block_name)
    }

    /// A free-standing stub end, not belonging to any block.
    pub fn construct_stub_end(&mut self, supply: &dyn NameSupply, is_attached: bool) -> Name {
        let name = supply.next();
        self.ends.insert(name, EndRecord { name, side: true, block: None, group: None, is_attached, caps: IndexMap::new() });
        name
    }

    pub fn construct_chain(&mut self, supply: &dyn NameSupply) -> Name {
        let name = supply.next();
        self.chains.insert(name, ChainRecord { name, links: Vec::new() });
        name
    }

    pub fn append_link(&mut self, chain: Name, three_end_a: Name, five_end_b: Name) -> Result<()> {
        self.chain_mut(chain)?.links.push(Link { three_end_a, five_end_b });
        Ok(())
    }

    pub fn construct_group(&mut self, supply: &dyn NameSupply, ends: BTreeSet<Name>, link: Option<(Name, usize)>) -> Result<Name> {
        let name = supply.next();
        for &e in &ends {
            self.end_mut(e)?.group = Some(name);
        }
        self.groups.insert(name, GroupRecord { name, ends, link, nested_flower: None });
        Ok(name)
    }

    pub fn set_nested_flower(&mut self, group: Name, flower: Name) -> Result<()> {
        self.group_mut(group)?.nested_flower = Some(flower);
        Ok(())
    }

    pub fn construct_segment(&mut self, supply: &dyn NameSupply, block: Name, event: Name, sequence: Option<crate::model::segment::SequenceCoords>) -> Result<Name> {
        let (five_end, three_end) = {
            let b = self.block(block)?;
            (b.five_end, b.three_end)
        };
        let segment_name = supply.next();
        let five_cap = self.construct_cap(supply, five_end, event, Some(segment_name))?;
        let three_cap = self.construct_cap(supply, three_end, event, Some(segment_name))?;
        self.block_mut(block)?.segments.insert(
            segment_name,
            SegmentRecord { name: segment_name, block, event, five_cap, three_cap, sequence, parent: None, children: Vec::new() },
        );
        Ok(segment_name)
    }

    pub fn construct_cap(&mut self, supply: &dyn NameSupply, end: Name, event: Name, segment: Option<Name>) -> Result<Name> {
        let side = self.end(end)?.side;
        let cap_name = supply.next();
        self.end_mut(end)?.caps.insert(
            cap_name,
            CapRecord { name: cap_name, end, event, side, segment, coordinate: None, strand: None, adjacency: None, parent: None, children: Vec::new() },
        );
        Ok(cap_name)
    }

    /// Symmetric: sets each cap's `adjacency` to point at the other.
    pub fn make_adjacent(&mut self, a: Name, b: Name) -> Result<()> {
        let end_a = self.cap(a)?.end;
        let end_b = self.cap(b)?.end;
        self.end_mut(end_a)?.caps.get_mut(&a).unwrap().adjacency = Some(b);
        self.end_mut(end_b)?.caps.get_mut(&b).unwrap().adjacency = Some(a);
        Ok(())
    }

    pub fn cap(&self, name: Name) -> Result<&CapRecord> {
        for end in self.ends.values() {
            if let Some(c) = end.caps.get(&name) {
                return Ok(c);
            }
        }
        Err(CactusError::MissingEntity(format!("cap {name}")))
    }

    // -- oriented navigation ---------------------------------------------

    /// The 5' or 3' End of a Block, as viewed from `id`'s orientation.
    pub fn block_end(&self, id: BlockId, side: Side) -> Result<EndId> {
        let b = self.block(id.name)?;
        let canonical = if id.orientation.is_forward() { side } else { side.flip() };
        let end_name = match canonical {
            Side::Five => b.five_end,
            Side::Three => b.three_end,
        };
        Ok(EndId::new(end_name, id.orientation))
    }

    /// The owning Block of an End, in the same orientation as `id` —
    /// orientation passes straight through regardless of which side `id`
    /// names, matching `end_getOrientation(end) == block_getOrientation(block)`.
    pub fn end_block(&self, id: EndId) -> Result<Option<BlockId>> {
        let rec = self.end(id.name)?;
        Ok(rec.block.map(|b| BlockId::new(b, id.orientation)))
    }

    /// The other End of the same Block, same orientation.
    pub fn other_block_end(&self, id: EndId) -> Result<EndId> {
        let rec = self.end(id.name)?;
        let block_name = rec.block.ok_or_else(|| CactusError::InvariantViolation(format!("end {} is a stub, has no sibling end", id.name)))?;
        let b = self.block(block_name)?;
        let other = if rec.side { b.three_end } else { b.five_end };
        Ok(EndId::new(other, id.orientation))
    }

    // -- block split -------------------------------------------------------

    /// Splits a Block of length `l` into two Blocks of length
    /// `split_point` and `l - split_point`, threading a fresh End pair
    /// between them and giving every Segment a matching split plus an
    /// adjacency Cap pair at the new boundary (spec.md §4.2).
    pub fn split_block(&mut self, supply: &dyn NameSupply, block: Name, split_point: i32) -> Result<(Name, Name)> {
        let (length, five_end, three_end, segments) = {
            let b = self.block(block)?;
            (b.length, b.five_end, b.three_end, b.segments.clone())
        };
        if split_point <= 0 || split_point >= length {
            return Err(CactusError::OutOfRange(format!("split point {split_point} must lie strictly within block of length {length}")));
        }

        let left_name = supply.next();
        let right_name = supply.next();
        let left_three = supply.next();
        let right_five = supply.next();

        self.ends.insert(left_three, EndRecord { name: left_three, side: false, block: Some(left_name), group: None, is_attached: false, caps: IndexMap::new() });
        self.ends.insert(right_five, EndRecord { name: right_five, side: true, block: Some(right_name), group: None, is_attached: false, caps: IndexMap::new() });

        // The original outer ends are reassigned to the new blocks.
        self.end_mut(five_end)?.block = Some(left_name);
        self.end_mut(three_end)?.block = Some(right_name);

        // Every segment in the source block is split independently, but the
        // phylogenetic tree threading them together (parent/child Names) is
        // preserved by splitting in lockstep: the old tree's shape is
        // reproduced once among the left halves and once among the right
        // halves, via this old-segment-name -> new-segment-name map
        // (spec.md §4.2 step 4 — "recurse down the segment tree making
        // parent/child relations in the new blocks").
        let mut left_name_of: std::collections::HashMap<Name, Name> = std::collections::HashMap::new();
        let mut right_name_of: std::collections::HashMap<Name, Name> = std::collections::HashMap::new();
        let mut left_segments = IndexMap::new();
        let mut right_segments = IndexMap::new();
        for (seg_name, seg) in &segments {
            let left_seg_name = supply.next();
            let right_seg_name = supply.next();
            left_name_of.insert(*seg_name, left_seg_name);
            right_name_of.insert(*seg_name, right_seg_name);
            let left_three_cap = self.construct_cap(supply, left_three, seg.event, Some(left_seg_name))?;
            let right_five_cap = self.construct_cap(supply, right_five, seg.event, Some(right_seg_name))?;
            self.make_adjacent(left_three_cap, right_five_cap)?;

            let (left_seq, right_seq) = match seg.sequence {
                None => (None, None),
                Some(coords) => {
                    if coords.reverse {
                        (
                            Some(crate::model::segment::SequenceCoords { contig: coords.contig, start: coords.start + (length - split_point), reverse: true }),
                            Some(coords),
                        )
                    } else {
                        (Some(coords), Some(crate::model::segment::SequenceCoords { contig: coords.contig, start: coords.start + split_point, reverse: false }))
                    }
                }
            };

            left_segments.insert(left_seg_name, SegmentRecord { name: left_seg_name, block: left_name, event: seg.event, five_cap: seg.five_cap, three_cap: left_three_cap, sequence: left_seq, parent: None, children: Vec::new() });
            right_segments.insert(right_seg_name, SegmentRecord { name: right_seg_name, block: right_name, event: seg.event, five_cap: right_five_cap, three_cap: seg.three_cap, sequence: right_seq, parent: None, children: Vec::new() });

            // Re-home the original caps to point at their new segment.
            self.end_mut(five_end)?.caps.get_mut(&seg.five_cap).unwrap().segment = Some(left_seg_name);
            self.end_mut(three_end)?.caps.get_mut(&seg.three_cap).unwrap().segment = Some(right_seg_name);
        }

        // Second pass: re-wire parent/children for every segment whose
        // relatives survived the split (both ends of a tree edge must have
        // been in the source block's segment set). A segment whose parent
        // was destroyed on the other side of the split becomes a new root
        // (parent: None) — this is the "otherwise... set each new block's
        // root to null" half of step 4, applied per-segment since this
        // model has no separate root-instance field.
        for (seg_name, seg) in &segments {
            if let Some(parent) = seg.parent {
                if let Some(&lp) = left_name_of.get(&parent) {
                    if let Some(&ls) = left_name_of.get(seg_name) {
                        left_segments.get_mut(&ls).unwrap().parent = Some(lp);
                        left_segments.get_mut(&lp).unwrap().children.push(ls);
                    }
                }
                if let Some(&rp) = right_name_of.get(&parent) {
                    if let Some(&rs) = right_name_of.get(seg_name) {
                        right_segments.get_mut(&rs).unwrap().parent = Some(rp);
                        right_segments.get_mut(&rp).unwrap().children.push(rs);
                    }
                }
            }
        }

        self.blocks.insert(left_name, BlockRecord { name: left_name, length: split_point, five_end, three_end: left_three, segments: left_segments });
        self.blocks.insert(right_name, BlockRecord { name: right_name, length: length - split_point, five_end: right_five, three_end, segments: right_segments });
        self.blocks.swap_remove(&block);
        Ok((left_name, right_name))
    }

    // -- Newick emission ---------------------------------------------------

    /// Renders a block's segment tree as a Newick string (spec.md §4.2,
    /// S6). A segment's label is its event's header if the event has
    /// one, else the segment's own `Name`.
    pub fn block_segment_newick(&self, block: Name, config: &crate::model::SegmentNewickConfig) -> Result<String> {
        let b = self.block(block)?;
        let roots: Vec<Name> = b.segments.values().filter(|s| s.parent.is_none()).map(|s| s.name).collect();
        if roots.is_empty() {
            return Ok(String::new());
        }
        let rendered: Vec<String> = roots.iter().map(|&r| self.segment_newick_node(b, r, config)).collect();
        Ok(format!("{};", rendered.join(",")))
    }

    fn segment_label(&self, seg: &SegmentRecord) -> String {
        self.event_tree.get(seg.event).ok().and_then(|e| e.header.clone()).unwrap_or_else(|| seg.name.to_string())
    }

    /// Follows a chain of single-child segments down to the first leaf
    /// or genuine branch point.
    fn collapse_unary_segment(&self, block: &BlockRecord, name: Name) -> Name {
        match block.segments.get(&name) {
            Some(s) if s.children.len() == 1 => self.collapse_unary_segment(block, s.children[0]),
            _ => name,
        }
    }

    fn segment_newick_node(&self, block: &BlockRecord, name: Name, config: &crate::model::SegmentNewickConfig) -> String {
        let effective = if config.include_unary_events { name } else { self.collapse_unary_segment(block, name) };
        let seg = match block.segments.get(&effective) {
            Some(s) => s,
            None => return effective.to_string(),
        };
        if seg.children.is_empty() {
            return self.segment_label(seg);
        }
        let inner: Vec<String> = seg.children.iter().map(|&c| self.segment_newick_node(block, c, config)).collect();
        let label = if config.include_internal_names { self.segment_label(seg) } else { String::new() };
        format!("({}){}", inner.join(","), label)
    }
}

/// The whole hierarchy of nested `Flower`s describing one alignment
/// (spec.md §1's "universe" the reference builder walks top-down).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cactus {
    flowers: IndexMap<Name, Flower>,
}

impl Cactus {
    pub fn new() -> Self {
        Cactus { flowers: IndexMap::new() }
    }

    pub fn insert(&mut self, flower: Flower) {
        self.flowers.insert(flower.name, flower);
    }

    pub fn flower(&self, name: Name) -> Result<&Flower> {
        self.flowers.get(&name).ok_or_else(|| CactusError::MissingEntity(format!("flower {name}")))
    }

    pub fn flower_mut(&mut self, name: Name) -> Result<&mut Flower> {
        self.flowers.get_mut(&name).ok_or_else(|| CactusError::MissingEntity(format!("flower {name}")))
    }

    pub fn flowers(&self) -> impl Iterator<Item = &Flower> {
        self.flowers.values()
    }

    pub fn root(&self) -> Result<&Flower> {
        self.flowers.values().find(|f| f.parent.is_none()).ok_or_else(|| CactusError::MissingEntity("root flower".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::AtomicNameSupply;

    fn new_flower(supply: &AtomicNameSupply) -> Flower {
        Flower::new(supply.next(), EventTree::new(supply.next()))
    }

    #[test]
    fn construct_block_creates_both_ends() {
        let supply = AtomicNameSupply::new();
        let mut f = new_flower(&supply);
        let b = f.construct_block(&supply, 10).unwrap();
        let block = f.block(b).unwrap();
        assert_eq!(f.end(block.five_end).unwrap().side, true);
        assert_eq!(f.end(block.three_end).unwrap().side, false);
        assert_eq!(f.end(block.five_end).unwrap().block, Some(b));
    }

    #[test]
    fn block_end_orientation_mapping_matches_reverse_invariant() {
        let supply = AtomicNameSupply::new();
        let mut f = new_flower(&supply);
        let b = f.construct_block(&supply, 5).unwrap();
        let fwd = BlockId::positive(b);
        let rev = fwd.reverse();
        let five_fwd = f.block_end(fwd, Side::Five).unwrap();
        let three_rev = f.block_end(rev, Side::Three).unwrap();
        assert_eq!(five_fwd.name, three_rev.name);
        assert_eq!(three_rev.orientation, Orientation::Reverse);
    }

    #[test]
    fn other_block_end_returns_sibling() {
        let supply = AtomicNameSupply::new();
        let mut f = new_flower(&supply);
        let b = f.construct_block(&supply, 5).unwrap();
        let block = f.block(b).unwrap();
        let five = EndId::positive(block.five_end);
        let three = f.other_block_end(five).unwrap();
        assert_eq!(three.name, f.block(b).unwrap().three_end);
    }

    #[test]
    fn construct_segment_wires_caps_to_block_ends() {
        let supply = AtomicNameSupply::new();
        let mut f = new_flower(&supply);
        let event = f.event_tree.root;
        let b = f.construct_block(&supply, 5).unwrap();
        let seg = f.construct_segment(&supply, b, event, None).unwrap();
        let block = f.block(b).unwrap();
        let seg_rec = block.segments.get(&seg).unwrap();
        assert_eq!(f.end(block.five_end).unwrap().caps.get(&seg_rec.five_cap).unwrap().segment, Some(seg));
    }

    #[test]
    fn split_block_preserves_total_length_and_links_adjacency() {
        let supply = AtomicNameSupply::new();
        let mut f = new_flower(&supply);
        let event = f.event_tree.root;
        let b = f.construct_block(&supply, 10).unwrap();
        f.construct_segment(&supply, b, event, None).unwrap();
        let (left, right) = f.split_block(&supply, b, 4).unwrap();
        assert_eq!(f.block(left).unwrap().length, 4);
        assert_eq!(f.block(right).unwrap().length, 6);
        assert!(f.block(b).is_err());

        let left_seg = f.block(left).unwrap().segments.values().next().unwrap().clone();
        let right_seg = f.block(right).unwrap().segments.values().next().unwrap().clone();
        let left_three_cap = f.cap(left_seg.three_cap).unwrap().clone();
        assert_eq!(left_three_cap.adjacency, Some(right_seg.five_cap));
    }

    #[test]
    fn split_block_rejects_boundary_out_of_range() {
        let supply = AtomicNameSupply::new();
        let mut f = new_flower(&supply);
        let b = f.construct_block(&supply, 10).unwrap();
        assert!(f.split_block(&supply, b, 10).is_err());
        assert!(f.split_block(&supply, b, 0).is_err());
    }

    #[test]
    fn split_block_preserves_segment_tree_shape_on_each_side() {
        // A block with a parent segment and a child segment (e.g. an
        // ancestor and its descendant on the same genome lineage);
        // splitting must reproduce the parent/child edge among both the
        // left halves and the right halves independently.
        let supply = AtomicNameSupply::new();
        let mut f = new_flower(&supply);
        let event = f.event_tree.root;
        let b = f.construct_block(&supply, 10).unwrap();
        let parent_seg = f.construct_segment(&supply, b, event, None).unwrap();
        let child_seg = f.construct_segment(&supply, b, event, None).unwrap();
        f.block_mut(b).unwrap().segments.get_mut(&parent_seg).unwrap().children.push(child_seg);
        f.block_mut(b).unwrap().segments.get_mut(&child_seg).unwrap().parent = Some(parent_seg);

        let (left, right) = f.split_block(&supply, b, 4).unwrap();

        for side in [left, right] {
            let block = f.block(side).unwrap();
            let roots: Vec<_> = block.segments.values().filter(|s| s.parent.is_none()).collect();
            assert_eq!(roots.len(), 1, "each split half should have exactly one root segment");
            assert_eq!(roots[0].children.len(), 1);
            let child_name = roots[0].children[0];
            assert_eq!(block.segments.get(&child_name).unwrap().parent, Some(roots[0].name));
        }
    }

    #[test]
    fn block_segment_newick_collapses_unary_segments_by_default() {
        use crate::model::SegmentNewickConfig;
        // root -> mid -> leaf, mid single-child: collapses to "leaf".
        let supply = AtomicNameSupply::new();
        let mut f = new_flower(&supply);
        let event = supply.next();
        f.event_tree.add_event(event, Some("leaf".to_string()), 0, f.event_tree.root).unwrap();
        let b = f.construct_block(&supply, 10).unwrap();
        let root = f.construct_segment(&supply, b, f.event_tree.root, None).unwrap();
        let mid = f.construct_segment(&supply, b, f.event_tree.root, None).unwrap();
        let leaf = f.construct_segment(&supply, b, event, None).unwrap();
        {
            let block = f.block_mut(b).unwrap();
            block.segments.get_mut(&root).unwrap().children.push(mid);
            block.segments.get_mut(&mid).unwrap().parent = Some(root);
            block.segments.get_mut(&mid).unwrap().children.push(leaf);
            block.segments.get_mut(&leaf).unwrap().parent = Some(mid);
        }

        let collapsed = f.block_segment_newick(b, &SegmentNewickConfig { include_unary_events: false, include_internal_names: true }).unwrap();
        assert_eq!(collapsed, "leaf;");

        let full = f.block_segment_newick(b, &SegmentNewickConfig { include_unary_events: true, include_internal_names: true }).unwrap();
        assert!(full.contains("((leaf)"));
    }
}
