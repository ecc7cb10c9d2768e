//! The event tree: the phylogeny a `Flower`'s segments and caps are
//! annotated against (spec.md §3, "Event / EventTree").

use crate::error::{CactusError, Result};
use crate::name::Name;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A node in the event tree: a species/ancestor with an optional header
/// name and a branch length to its parent (root's is meaningless and
/// stored as `i64::MAX`, mirroring `buildReference.c`'s `INT32_MAX`
/// sentinel for a branch length that was never assigned).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: Name,
    pub header: Option<String>,
    pub branch_length: i64,
    pub parent: Option<Name>,
    pub children: Vec<Name>,
}

pub const UNKNOWN_BRANCH_LENGTH: i64 = i64::MAX;

/// The tree of `Event`s belonging to one `Flower`. Always has at least a
/// root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTree {
    pub root: Name,
    events: IndexMap<Name, Event>,
}

impl EventTree {
    /// A tree containing only its root event.
    pub fn new(root_name: Name) -> Self {
        let mut events = IndexMap::new();
        events.insert(
            root_name,
            Event { name: root_name, header: None, branch_length: UNKNOWN_BRANCH_LENGTH, parent: None, children: Vec::new() },
        );
        EventTree { root: root_name, events }
    }

    pub fn get(&self, name: Name) -> Result<&Event> {
        self.events.get(&name).ok_or_else(|| CactusError::MissingEntity(format!("event {name}")))
    }

    pub fn contains(&self, name: Name) -> bool {
        self.events.contains_key(&name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    /// Adds a new leaf-or-internal event as a child of `parent`.
    pub fn add_event(&mut self, name: Name, header: Option<String>, branch_length: i64, parent: Name) -> Result<()> {
        if !self.events.contains_key(&parent) {
            return Err(CactusError::MissingEntity(format!("event {parent}")));
        }
        self.events.insert(name, Event { name, header, branch_length, parent: Some(parent), children: Vec::new() });
        self.events.get_mut(&parent).unwrap().children.push(name);
        Ok(())
    }

    /// Renders the tree as a Newick string, collapsing unary internal
    /// nodes (an event with exactly one child contributes no branching
    /// information, so its branch length is folded into its child's).
    pub fn to_newick(&self) -> String {
        format!("{};", self.newick_node(self.root))
    }

    fn label(&self, name: Name) -> String {
        self.events.get(&name).and_then(|e| e.header.clone()).unwrap_or_else(|| name.to_string())
    }

    fn branch_length_of(&self, name: Name) -> i64 {
        match self.events.get(&name).map(|e| e.branch_length) {
            Some(bl) if bl != UNKNOWN_BRANCH_LENGTH => bl,
            _ => 0,
        }
    }

    /// Follows single-child chains below `name` until a leaf or a
    /// genuine branch point, summing branch lengths along the way.
    fn collapse_unary(&self, name: Name, acc: i64) -> (Name, i64) {
        let total = acc + self.branch_length_of(name);
        match self.events.get(&name) {
            Some(e) if e.children.len() == 1 => self.collapse_unary(e.children[0], total),
            _ => (name, total),
        }
    }

    fn newick_node(&self, name: Name) -> String {
        let children: Vec<(Name, i64)> = self.events.get(&name).map(|e| e.children.iter().map(|&c| self.collapse_unary(c, 0)).collect()).unwrap_or_default();
        if children.is_empty() {
            self.label(name)
        } else {
            let inner: Vec<String> = children.iter().map(|&(c, bl)| format!("{}:{}", self.newick_node(c), bl)).collect();
            format!("({}){}", inner.join(","), self.label(name))
        }
    }
}
