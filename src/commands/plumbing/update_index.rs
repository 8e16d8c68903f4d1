use crate::areas::database::ObjectStore;
use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use std::path::PathBuf;

impl Repository {
    /// Store the content of `paths` as blobs and stage them
    ///
    /// Directories are expanded to the files below them. Without `add`, only paths
    /// already in the index may be updated.
    pub fn update_index(&self, paths: &[PathBuf], add: bool) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let mut index = self.index();
        index.rehydrate().context("Failed to load the index")?;

        for path in paths {
            for file_path in self.workspace().list_files(path)? {
                let index_path = Workspace::index_path(&file_path)?;

                if !add && index.entry_by_path(&index_path).is_none() {
                    anyhow::bail!(
                        "{index_path}: cannot add to the index - missing --add option?"
                    );
                }

                let content = self.workspace().read_file(&file_path)?;
                let (mode, stat) = self.workspace().stat_file(&file_path)?;
                let oid = self.database().store(ObjectType::Blob, content)?;

                index.add(IndexEntry::new(index_path, oid, mode).with_stat(stat))?;
            }
        }

        index
            .write_updates()
            .context("Failed to write the index")?;

        Ok(())
    }
}
