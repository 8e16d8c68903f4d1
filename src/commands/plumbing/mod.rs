//! Plumbing commands (low-level operations)
//!
//! Plumbing commands expose the object store, index and refs directly. They're
//! primarily used for scripting and as building blocks for porcelain commands.
//!
//! ## Commands
//!
//! - `hash-object`: Compute a blob id and optionally store it
//! - `cat-file`: Print an object's type or content
//! - `update-index`: Stage workspace files
//! - `ls-files`: List staged entries
//! - `write-tree`: Build trees from the index
//! - `ls-tree`: List the contents of a tree
//! - `commit-tree`: Create a commit object from a tree
//! - `update-ref`: Move the current branch (or detached HEAD)
//! - `symbolic-ref`: Read or set the branch HEAD is attached to

pub mod cat_file;
pub mod commit_tree;
pub mod hash_object;
pub mod ls_files;
pub mod ls_tree;
pub mod symbolic_ref;
pub mod update_index;
pub mod update_ref;
pub mod write_tree;
