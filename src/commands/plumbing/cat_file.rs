use crate::areas::database::ObjectStore;
use crate::areas::repository::Repository;
use crate::artifacts::objects::object::{Object, ObjectBox};
use std::io::Write;

/// What `cat-file` prints about an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatFileMode {
    /// Content, pretty-printed for trees
    Pretty,
    /// Object kind
    Type,
    /// Payload size in bytes
    Size,
}

impl Repository {
    pub fn cat_file(&self, object: &str, mode: CatFileMode) -> anyhow::Result<()> {
        self.ensure_initialized()?;
        let oid = self.resolve_object(object)?;

        match mode {
            CatFileMode::Type => {
                let raw = self.database().load(&oid)?;
                writeln!(self.writer(), "{}", raw.kind)?;
            }
            CatFileMode::Size => {
                let raw = self.database().load(&oid)?;
                writeln!(self.writer(), "{}", raw.payload.len())?;
            }
            CatFileMode::Pretty => match self.database().parse_object(&oid)? {
                // blobs may be binary: copy them out untouched
                ObjectBox::Blob(blob) => self.writer().write_all(blob.content())?,
                ObjectBox::Tree(tree) if tree.is_empty() => {}
                ObjectBox::Tree(tree) => writeln!(self.writer(), "{}", tree.display())?,
                ObjectBox::Commit(commit) => {
                    write!(self.writer(), "{}", commit.display())?;
                }
            },
        }

        Ok(())
    }
}
