use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::head::HeadState;
use std::io::Write;

impl Repository {
    /// Create `branch_name` at `source_revision` (HEAD by default)
    pub fn branch(&self, branch_name: &str, source_revision: Option<&str>) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch_name = BranchName::try_parse(branch_name)?;
        let source_oid = self.resolve_commit(source_revision.unwrap_or("HEAD"))?;

        self.refs().create_branch(&branch_name, &source_oid)?;

        Ok(())
    }

    /// Print all branches, marking the one HEAD is attached to
    pub fn list_branches(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let head = self.refs().read_head()?;
        if let HeadState::Detached(oid) = &head {
            writeln!(self.writer(), "* (HEAD detached at {})", oid.to_short_oid())?;
        }

        for branch in self.refs().list_branches()? {
            let marker = if head.branch() == Some(&branch) { "*" } else { " " };
            writeln!(self.writer(), "{marker} {branch}")?;
        }

        Ok(())
    }
}
