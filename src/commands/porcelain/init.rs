use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use anyhow::Context;
use std::fs;
use std::io::Write;

const DEFAULT_BRANCH: &str = "main";

impl Repository {
    /// Create `.git` with an object directory and HEAD attached to an unborn branch
    ///
    /// Running it again keeps the existing HEAD and objects.
    pub fn init(&self) -> anyhow::Result<()> {
        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .git/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .git/refs/heads directory")?;

        if self.refs().head_path().exists() {
            writeln!(
                self.writer(),
                "Reinitialized existing Twig repository in {}",
                self.git_path().display()
            )?;

            return Ok(());
        }

        self.refs()
            .set_head_symbolic(&BranchName::try_parse(DEFAULT_BRANCH)?)
            .context("Failed to create initial HEAD reference")?;

        writeln!(
            self.writer(),
            "Initialized empty Twig repository in {}",
            self.git_path().display()
        )?;

        Ok(())
    }
}
