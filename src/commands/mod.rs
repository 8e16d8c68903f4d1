//! Command implementations
//!
//! Commands are split the way git splits them:
//!
//! - `plumbing`: direct access to objects, the index and refs (hash-object, write-tree,
//!   commit-tree, update-ref)
//! - `porcelain`: the everyday workflow built on top of them (init, commit, branch,
//!   checkout)
//!
//! Each command is an `impl Repository` block in its own file.

pub mod plumbing;
pub mod porcelain;
