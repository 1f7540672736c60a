//! Configuration blocks, block-aware diffing and candidate staging.

pub mod block;
pub mod candidate;
pub mod diff;

pub use block::{ConfigBlock, ConfigBlockSet, DEFAULT_DELIMITER, parse_blocks};
pub use candidate::{Candidate, CandidateKind, CandidateSource, CandidateStore};
pub use diff::{
    ADDED, Edit, EditGroup, REMOVED, additions, compare, compose_merge, compose_vice, diff,
};
