//! Repository areas
//!
//! The stateful parts of a repository, each owning a piece of `.git` or the worktree:
//!
//! - `database`: Content-addressed object storage (and the `ObjectStore` trait)
//! - `memory_database`: The same store held in memory
//! - `index`: Staging area consumed by the tree builder
//! - `refs`: HEAD and branch references
//! - `repository`: Ties the areas together for commands
//! - `workspace`: Working directory file access

pub mod database;
pub mod index;
pub mod memory_database;
pub mod refs;
pub mod repository;
pub mod workspace;
