use crate::areas::repository::Repository;
use crate::artifacts::builder::tree_builder::TreeBuilder;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    pub fn write_tree(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let tree_id = self.write_index_tree()?;
        writeln!(self.writer(), "{tree_id}")?;

        Ok(())
    }

    /// Store the trees for the current index and return the root tree id
    pub(crate) fn write_index_tree(&self) -> anyhow::Result<ObjectId> {
        let mut index = self.index();
        index.rehydrate()?;

        let entries = index.entries().cloned().collect::<Vec<_>>();
        let tree_id = TreeBuilder::new(self.database()).build(&entries)?;

        Ok(tree_id)
    }
}
