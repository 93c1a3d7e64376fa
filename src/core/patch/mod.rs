//! Literal text patching: replace one exact string with another across a tree.
//!
//! Walks the files under a root whose name matches a glob pattern, replaces
//! every non-overlapping occurrence of the search literal, and rewrites each
//! file in place.

mod engine;

pub use engine::{
    collect_files, compile_pattern, patch_file, run, FileOutcome, PatchReport, PatchRule,
    PatchSpec, Replacement,
};
