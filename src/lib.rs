//! A minimal content-addressed version-control store
//!
//! Snapshots are stored as git-compatible blob, tree and commit objects under
//! `.git/objects`, with HEAD and branch refs naming the current position.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
