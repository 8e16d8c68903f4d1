use crate::areas::database::ObjectStore;
use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    /// List a tree, or the tree of a commit
    pub fn ls_tree(&self, object: &str, recursive: bool) -> anyhow::Result<()> {
        self.ensure_initialized()?;
        let oid = self.resolve_object(object)?;

        let tree_oid = match self.database().parse_object_as_commit(&oid)? {
            Some(commit) => commit.tree_oid().clone(),
            None => oid,
        };

        self.print_tree(&tree_oid, "", recursive)
    }

    fn print_tree(&self, oid: &ObjectId, prefix: &str, recursive: bool) -> anyhow::Result<()> {
        let tree = self
            .database()
            .parse_object_as_tree(oid)?
            .ok_or_else(|| anyhow::anyhow!("not a tree object: {oid}"))?;

        for entry in tree.entries() {
            let path = if prefix.is_empty() {
                entry.name.clone()
            } else {
                format!("{prefix}/{}", entry.name)
            };

            if recursive && entry.mode.is_tree() {
                self.print_tree(&entry.oid, &path, recursive)?;
            } else {
                writeln!(
                    self.writer(),
                    "{} {} {}\t{}",
                    entry.mode,
                    entry.mode.object_kind(),
                    entry.oid,
                    path
                )?;
            }
        }

        Ok(())
    }
}
