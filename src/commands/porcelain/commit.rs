use crate::areas::repository::Repository;
use crate::artifacts::branch::head::HeadState;
use crate::artifacts::builder::commit_builder::CommitBuilder;
use std::io::Write;

impl Repository {
    /// Record the index as a commit on top of HEAD, then advance HEAD's target
    ///
    /// The ref only moves once the trees and the commit are stored.
    pub fn commit(&self, message: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let message = message.trim();
        if message.is_empty() {
            anyhow::bail!("Aborting commit due to empty commit message");
        }

        let tree_id = self.write_index_tree()?;
        let parent = self.refs().head_oid()?;

        let commit_id = CommitBuilder::new(self.database(), self.identity(), self.clock())
            .build(&tree_id, message, parent.as_ref(), None)?;
        let head = self.refs().update_ref(&commit_id)?;

        let location = match head {
            HeadState::Attached(branch) => branch.to_string(),
            HeadState::Detached(_) => String::from("detached HEAD"),
        };
        let is_root = if parent.is_none() { " (root-commit)" } else { "" };
        let short_message = message.lines().next().unwrap_or_default();

        writeln!(
            self.writer(),
            "[{location}{is_root} {}] {short_message}",
            commit_id.to_short_oid()
        )?;

        Ok(())
    }
}
