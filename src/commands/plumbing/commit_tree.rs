use crate::areas::repository::Repository;
use crate::artifacts::builder::commit_builder::CommitBuilder;
use std::io::Write;

impl Repository {
    /// Create a commit object for `tree` without moving any ref
    pub fn commit_tree(
        &self,
        tree: &str,
        message: &str,
        parent: Option<&str>,
    ) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let tree_oid = self.resolve_object(tree)?;
        let parent_oid = parent
            .map(|parent| self.resolve_commit(parent))
            .transpose()?;

        let commit_oid = CommitBuilder::new(self.database(), self.identity(), self.clock())
            .build(&tree_oid, message, parent_oid.as_ref(), None)?;

        writeln!(self.writer(), "{commit_oid}")?;

        Ok(())
    }
}
