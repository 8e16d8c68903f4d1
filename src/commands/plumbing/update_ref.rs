use crate::areas::repository::Repository;

impl Repository {
    /// Point the current branch, or detached HEAD, at a commit
    pub fn update_ref(&self, revision: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let oid = self.resolve_commit(revision)?;
        self.refs().update_ref(&oid)?;

        Ok(())
    }
}
