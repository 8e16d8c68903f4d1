//! Porcelain commands (user-facing operations)
//!
//! Porcelain commands compose the plumbing into the usual workflow: create a
//! repository, record commits and move between branches.
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `commit`: Record the index as a new commit
//! - `branch`: List or create branches
//! - `checkout`: Attach HEAD to a branch or detach it at a commit

pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
