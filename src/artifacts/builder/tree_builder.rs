//! Tree construction from staged entries
//!
//! Building happens in two phases:
//! 1. [`TreePlan::from_entries`] nests the flat entry list into directories in memory,
//!    validating every path. It never touches a store, so a bad index leaves nothing
//!    behind.
//! 2. [`TreeBuilder::build`] walks the plan depth-first and stores each directory
//!    level as a tree object. Children are written before their parent, since the
//!    parent's payload embeds their ids.

use crate::areas::database::ObjectStore;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Tree, TreeEntry};
use crate::errors::{Result, StoreError};
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
enum PlanNode {
    File { mode: EntryMode, oid: ObjectId },
    Directory(TreePlan),
}

/// One directory level of the tree to build, with its subdirectories nested inside
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreePlan {
    children: BTreeMap<String, PlanNode>,
}

impl TreePlan {
    /// Nest `entries` by path component
    ///
    /// Input order does not matter. When a path appears more than once the later entry
    /// wins. A path that is both a file and the prefix of another path is a
    /// [`StoreError::ConflictingPath`].
    pub fn from_entries(entries: &[IndexEntry]) -> Result<Self> {
        let mut by_path = BTreeMap::new();
        for entry in entries {
            entry.check_path()?;

            if by_path.insert(entry.path.as_str(), entry).is_some() {
                warn!(path = %entry.path, "duplicate index path, keeping the later entry");
            }
        }

        let mut root = TreePlan::default();
        for entry in by_path.into_values() {
            root.insert(entry)?;
        }

        Ok(root)
    }

    fn insert(&mut self, entry: &IndexEntry) -> Result<()> {
        let conflict = |end: usize| StoreError::ConflictingPath {
            path: entry.path[..end].to_string(),
        };

        let (parents, name) = match entry.path.rsplit_once('/') {
            Some((dirname, basename)) => (Some(dirname), basename),
            None => (None, entry.path.as_str()),
        };

        let mut level = self;
        let mut consumed = 0;
        for component in parents.into_iter().flat_map(|dirname| dirname.split('/')) {
            consumed += component.len();

            let node = level
                .children
                .entry(component.to_string())
                .or_insert_with(|| PlanNode::Directory(TreePlan::default()));
            level = match node {
                PlanNode::Directory(subtree) => subtree,
                PlanNode::File { .. } => return Err(conflict(consumed)),
            };

            consumed += 1;
        }

        if let Some(PlanNode::Directory(_)) = level.children.get(name) {
            return Err(conflict(entry.path.len()));
        }

        level.children.insert(
            name.to_string(),
            PlanNode::File {
                mode: entry.mode,
                oid: entry.oid.clone(),
            },
        );

        Ok(())
    }

    /// Entries of this level, with subtree ids computed without storing anything
    pub fn tree_entries(&self) -> Result<Vec<TreeEntry>> {
        self.entries_with(&mut |_, subtree| subtree.to_tree()?.object_id())
    }

    /// The tree object for this level
    pub fn to_tree(&self) -> Result<Tree> {
        Ok(Tree::new(self.tree_entries()?))
    }

    fn entries_with<F>(&self, subtree_oid: &mut F) -> Result<Vec<TreeEntry>>
    where
        F: FnMut(&str, &TreePlan) -> Result<ObjectId>,
    {
        self.children
            .iter()
            .map(|(name, node)| match node {
                PlanNode::File { mode, oid } => {
                    Ok(TreeEntry::new(*mode, name.clone(), oid.clone()))
                }
                PlanNode::Directory(subtree) => Ok(TreeEntry::new(
                    EntryMode::Directory,
                    name.clone(),
                    subtree_oid(name, subtree)?,
                )),
            })
            .collect()
    }

    /// Store this level and everything below it, children first
    fn write<S: ObjectStore>(&self, store: &S, path: &str) -> Result<ObjectId> {
        let entries =
            self.entries_with(&mut |name, subtree| subtree.write(store, &join(path, name)))?;

        let tree = Tree::new(entries);
        let oid = store.store_object(&tree)?;
        let level = if path.is_empty() { "." } else { path };
        debug!(
            path = level,
            %oid,
            entries = tree.entries().len(),
            "wrote tree"
        );

        Ok(oid)
    }
}

fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

/// Writes the trees for a set of staged entries through an object store
#[derive(Debug)]
pub struct TreeBuilder<'s, S: ObjectStore> {
    store: &'s S,
}

impl<'s, S: ObjectStore> TreeBuilder<'s, S> {
    pub fn new(store: &'s S) -> Self {
        TreeBuilder { store }
    }

    /// Store the nested trees for `entries` and return the root tree id
    ///
    /// An empty entry list produces the empty tree.
    pub fn build(&self, entries: &[IndexEntry]) -> Result<ObjectId> {
        let plan = TreePlan::from_entries(entries)?;
        self.write(&plan)
    }

    /// Store an already validated plan
    pub fn write(&self, plan: &TreePlan) -> Result<ObjectId> {
        plan.write(self.store, "")
    }
}
