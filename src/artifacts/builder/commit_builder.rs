//! Commit construction
//!
//! A commit is only written once everything it references checks out. The tree must be
//! a stored tree object and the parent (if any) a stored commit. The author must be
//! known and must fit in a signature line. Nothing is stored when a check fails.

use crate::areas::database::ObjectStore;
use crate::artifacts::identity::IdentitySource;
use crate::artifacts::identity::clock::Clock;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Result, StoreError};
use tracing::debug;

pub struct CommitBuilder<'s, S: ObjectStore> {
    store: &'s S,
    identity: &'s dyn IdentitySource,
    clock: &'s dyn Clock,
}

impl<'s, S: ObjectStore> CommitBuilder<'s, S> {
    pub fn new(store: &'s S, identity: &'s dyn IdentitySource, clock: &'s dyn Clock) -> Self {
        CommitBuilder {
            store,
            identity,
            clock,
        }
    }

    /// Store a commit of `tree` and return its id
    ///
    /// Without an explicit `author`, the identity source provides one stamped with the
    /// clock's current instant. The committer is always the author.
    pub fn build(
        &self,
        tree: &ObjectId,
        message: &str,
        parent: Option<&ObjectId>,
        author: Option<Author>,
    ) -> Result<ObjectId> {
        if !self.is_stored_as(tree, ObjectType::Tree)? {
            return Err(StoreError::InvalidTree(tree.clone()));
        }
        if let Some(parent) = parent
            && !self.is_stored_as(parent, ObjectType::Commit)?
        {
            return Err(StoreError::InvalidParent(parent.clone()));
        }

        let author = match author {
            Some(author) => author,
            None => self.identity.author()?.at(self.clock.now()),
        };
        author.validate()?;

        let committer = author.clone();
        let commit = Commit::new(parent.cloned(), tree.clone(), author, committer, message);
        let oid = self.store.store_object(&commit)?;
        debug!(%oid, %tree, parent = ?parent, "wrote commit");

        Ok(oid)
    }

    fn is_stored_as(&self, oid: &ObjectId, kind: ObjectType) -> Result<bool> {
        match self.store.load(oid) {
            Ok(raw) => Ok(raw.kind == kind),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(error) => Err(error),
        }
    }
}
