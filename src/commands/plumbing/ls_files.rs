use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    pub fn ls_files(&self, stage: bool) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let mut index = self.index();
        index.rehydrate()?;

        for entry in index.entries() {
            if stage {
                writeln!(self.writer(), "{} {} 0\t{}", entry.mode, entry.oid, entry.path)?;
            } else {
                writeln!(self.writer(), "{}", entry.path)?;
            }
        }

        Ok(())
    }
}
