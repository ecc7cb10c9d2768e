//! Chains: an ordered run of Links threading block ends together
//! (spec.md §3, §4.3.4).

use crate::name::Name;
use serde::{Deserialize, Serialize};

/// One link in a chain: the 3' end of one block joined, across an
/// intervening link-group, to the 5' end of the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub three_end_a: Name,
    pub five_end_b: Name,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainRecord {
    pub name: Name,
    pub links: Vec<Link>,
}

impl ChainRecord {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }
}
