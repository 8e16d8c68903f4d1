use crate::areas::repository::Repository;
use crate::artifacts::branch::REF_PREFIX;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::head::HeadState;
use std::io::Write;

impl Repository {
    /// Print the branch ref HEAD points at, or attach HEAD to `target`
    ///
    /// Setting does not require the branch to exist, so it can select an unborn branch.
    pub fn symbolic_ref(&self, target: Option<&str>) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        match target {
            Some(target) => {
                let name = target.strip_prefix(REF_PREFIX).unwrap_or(target);
                let branch = BranchName::try_parse(name)?;
                self.refs().set_head_symbolic(&branch)?;
            }
            None => match self.refs().read_head()? {
                HeadState::Attached(branch) => {
                    writeln!(self.writer(), "{}", branch.ref_path())?;
                }
                HeadState::Detached(_) => anyhow::bail!("ref HEAD is not a symbolic ref"),
            },
        }

        Ok(())
    }
}
