//! Generation planning and file writing

pub mod plan;
pub mod write;

pub use plan::{ConflictResolver, ConflictState, FixedDecision, OverwriteAction};
pub use write::{FileError, GenerationReport, Generator, WriteAction, WrittenFile};
