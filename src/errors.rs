//! Error taxonomy of the object store, index and refs
//!
//! Every failure the library can produce is a variant of [`StoreError`].
//! The command layer wraps these in `anyhow` with extra context.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use thiserror::Error;

/// Errors produced by the storage core
#[derive(Debug, Error)]
pub enum StoreError {
    /// No object with this id exists in the store
    #[error("object {0} not found")]
    NotFound(ObjectId),

    /// Stored bytes do not re-hash to their id, or their header is broken
    #[error("object {oid} is corrupt: {reason}")]
    Corrupt { oid: ObjectId, reason: String },

    /// A path is used both as a file and as a directory prefix
    #[error("path '{path}' is used both as a file and as a directory")]
    ConflictingPath { path: String },

    /// A path in the index cannot be represented in a tree
    #[error("invalid index path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// A commit references a missing object or one that is not a tree
    #[error("{0} is not a valid tree object")]
    InvalidTree(ObjectId),

    /// A commit references a parent that is missing or not a commit
    #[error("{0} is not a valid parent commit")]
    InvalidParent(ObjectId),

    /// No author could be derived from the environment
    #[error("author identity is unknown: {0}")]
    MissingIdentity(String),

    /// A name or email that cannot be written into a signature line
    #[error("invalid author identity: {0}")]
    InvalidIdentity(String),

    /// HEAD points to a branch that has no commit yet
    #[error("branch '{branch}' does not have any commits yet")]
    DanglingRef { branch: String },

    /// A ref file holds something other than a symref or an object id
    #[error("ref '{name}' is malformed: {content:?}")]
    InvalidRef { name: String, content: String },

    #[error("invalid branch name '{0}'")]
    InvalidBranchName(String),

    #[error("branch '{0}' already exists")]
    BranchExists(String),

    #[error("branch '{0}' not found")]
    BranchNotFound(String),

    #[error("invalid object id '{0}'")]
    InvalidObjectId(String),

    /// A revision names no ref and no stored object
    #[error("unknown revision '{0}'")]
    UnknownRevision(String),

    /// An abbreviated id matches several objects
    #[error("short object id {prefix} is ambiguous: {}", .candidates.join(", "))]
    AmbiguousRevision {
        prefix: String,
        candidates: Vec<String>,
    },

    /// A revision resolved to an object of the wrong kind
    #[error("object {oid} is a {actual}, not a {expected}")]
    WrongObjectType {
        oid: ObjectId,
        expected: ObjectType,
        actual: ObjectType,
    },

    /// An object hashed correctly but its payload cannot be parsed
    #[error("malformed {kind} object {oid}: {reason}")]
    MalformedObject {
        kind: &'static str,
        oid: ObjectId,
        reason: String,
    },

    /// The index file is truncated, has a bad signature or a bad checksum
    #[error("invalid index file: {0}")]
    InvalidIndex(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// HEAD is attached to a branch without commits (the first commit case)
    pub fn is_dangling_ref(&self) -> bool {
        matches!(self, StoreError::DanglingRef { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
