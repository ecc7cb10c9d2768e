//! Tracks which formerly-distinct adjacency components have been unified by
//! a sequence of `pinch_merge` calls (spec.md §4.1, step 2: "the
//! `component_map` is updated in place").
//!
//! A union-find over raw vertex-arena indices. It is intentionally
//! decoupled from `PinchGraph`'s own vertex lifetimes: once two vertices
//! are unioned here they stay unioned even if the underlying arena slot is
//! later freed by `merge_vertices`, because callers use this map to answer
//! "were these two original endpoints ever merged", not "is this vertex
//! still live".
use std::collections::HashMap;

/// Union-find keyed by `VertexId::raw()`.
#[derive(Debug, Clone, Default)]
pub struct ComponentMap {
    parent: HashMap<u32, u32>,
}

impl ComponentMap {
    /// A fresh map with every vertex its own singleton component.
    pub fn new() -> Self {
        Self::default()
    }

    /// The representative of `v`'s component, path-compressing along the
    /// way. Vertices never explicitly added are their own representative.
    pub fn find(&mut self, v: u32) -> u32 {
        let parent = *self.parent.get(&v).unwrap_or(&v);
        if parent == v {
            return v;
        }
        let root = self.find(parent);
        self.parent.insert(v, root);
        root
    }

    /// Unify the components containing `a` and `b`. Returns the
    /// representative of the merged component.
    pub fn union(&mut self, a: u32, b: u32) -> u32 {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return ra;
        }
        // Lower index wins as representative, for deterministic output.
        let (keep, drop) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.parent.insert(drop, keep);
        keep
    }

    /// Whether `a` and `b` are in the same component.
    pub fn same_component(&mut self, a: u32, b: u32) -> bool {
        self.find(a) == self.find(b)
    }
}
