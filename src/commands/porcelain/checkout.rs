use crate::areas::database::ObjectStore;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::head::HeadState;
use std::io::Write;

impl Repository {
    /// Attach HEAD to a branch, or detach it at any other revision
    ///
    /// Only HEAD moves; the index and the working directory are left as they are.
    pub fn checkout(&self, target: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let head = self.refs().read_head()?;

        if let Ok(branch) = BranchName::try_parse(target) {
            let is_current = head.branch() == Some(&branch);

            if is_current {
                writeln!(self.writer(), "Already on '{branch}'")?;
                return Ok(());
            }

            if self.refs().read_branch(&branch)?.is_some() {
                self.refs().checkout_branch(&branch)?;
                writeln!(self.writer(), "Switched to branch '{branch}'")?;
                return Ok(());
            }
        }

        let oid = self.resolve_commit(target)?;
        self.refs().checkout_detached(&oid)?;

        let short_message = self
            .database()
            .parse_object_as_commit(&oid)?
            .map(|commit| commit.short_message().to_string())
            .unwrap_or_default();

        if let HeadState::Attached(branch) = &head {
            writeln!(self.writer(), "Note: leaving branch '{branch}'")?;
        }
        writeln!(
            self.writer(),
            "HEAD is now at {} {short_message}",
            oid.to_short_oid()
        )?;

        Ok(())
    }
}
