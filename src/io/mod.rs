//! External collaborator interfaces (spec.md §6): the perfect-matching
//! oracle and string store the reference builder consumes but does not
//! implement, plus a small binary-primitive codec.

mod codec;
mod matcher;
mod string_store;

pub use codec::{read_integer, read_name, read_string, write_integer, write_name, write_string, Tag};
pub use matcher::{GreedyPerfectMatcher, PerfectMatcher};
pub use string_store::{InMemoryStringStore, StringStore};
