//! Content-addressed object database
//!
//! Objects live in `.git/objects/<2 hex>/<38 hex>` as zlib-compressed
//! `<type> <size>\0<payload>`. An object is written once: storing content whose
//! id already exists leaves the existing file alone, and readers re-hash what they
//! load so a damaged file is reported instead of returned.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, RawObject, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::errors::{Result, StoreError};
use bytes::Bytes;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Read/write access to typed, content-addressed objects
///
/// Objects are immutable: there is no update or delete.
pub trait ObjectStore {
    /// Persist `payload` as an object of `kind` unless it already exists
    fn store(&self, kind: ObjectType, payload: Bytes) -> Result<ObjectId>;

    /// Fetch an object, verifying that its content hashes to `oid`
    fn load(&self, oid: &ObjectId) -> Result<RawObject>;

    fn contains(&self, oid: &ObjectId) -> Result<bool>;

    fn store_object(&self, object: &impl Object) -> Result<ObjectId>
    where
        Self: Sized,
    {
        self.store(object.object_type(), object.serialize()?)
    }

    fn parse_object(&self, oid: &ObjectId) -> Result<ObjectBox>
    where
        Self: Sized,
    {
        let raw = self.load(oid)?;
        let payload = &raw.payload[..];

        Ok(match raw.kind {
            ObjectType::Blob => ObjectBox::Blob(Box::new(Blob::deserialize(oid, payload)?)),
            ObjectType::Tree => ObjectBox::Tree(Box::new(Tree::deserialize(oid, payload)?)),
            ObjectType::Commit => {
                ObjectBox::Commit(Box::new(Commit::deserialize(oid, payload)?))
            }
        })
    }

    /// `Ok(None)` when the object exists but is not a tree
    fn parse_object_as_tree(&self, oid: &ObjectId) -> Result<Option<Tree>>
    where
        Self: Sized,
    {
        let raw = self.load(oid)?;

        match raw.kind {
            ObjectType::Tree => Ok(Some(Tree::deserialize(oid, &raw.payload[..])?)),
            _ => Ok(None),
        }
    }

    /// `Ok(None)` when the object exists but is not a commit
    fn parse_object_as_commit(&self, oid: &ObjectId) -> Result<Option<Commit>>
    where
        Self: Sized,
    {
        let raw = self.load(oid)?;

        match raw.kind {
            ObjectType::Commit => Ok(Some(Commit::deserialize(oid, &raw.payload[..])?)),
            _ => Ok(None),
        }
    }
}

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    fn object_path(&self, oid: &ObjectId) -> PathBuf {
        self.path.join(oid.to_path())
    }

    fn write_object(&self, object_path: &Path, content: Bytes) -> Result<()> {
        let object_dir = object_path
            .parent()
            .ok_or_else(|| std::io::Error::other("object path has no parent directory"))?;
        std::fs::create_dir_all(object_dir)?;

        // write next to the destination, then rename into place
        let mut temp_file = tempfile::Builder::new()
            .prefix("tmp-obj-")
            .tempfile_in(object_dir)?;
        temp_file.write_all(&Self::compress(&content)?)?;
        temp_file
            .persist(object_path)
            .map_err(|error| StoreError::Io(error.error))?;

        Ok(())
    }

    fn compress(data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data)?;

        Ok(encoder.finish()?)
    }

    fn decompress(oid: &ObjectId, data: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .map_err(|error| StoreError::Corrupt {
                oid: oid.clone(),
                reason: format!("cannot inflate object: {error}"),
            })?;

        Ok(decompressed_content)
    }

    /// Find all objects whose id starts with the given hex prefix
    ///
    /// Several matches mean the prefix is ambiguous; none means it is unknown.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();

        Ok(self
            .list_objects()?
            .into_iter()
            .filter(|oid| oid.as_ref().starts_with(&prefix))
            .collect())
    }

    /// Every object id present in the database, in no particular order
    pub fn list_objects(&self) -> Result<Vec<ObjectId>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut oids = Vec::new();
        for entry in WalkDir::new(&self.path).min_depth(2).max_depth(2) {
            let entry = entry.map_err(|error| std::io::Error::other(error.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let dir_name = entry
                .path()
                .parent()
                .and_then(|parent| parent.file_name())
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let full_oid = format!("{}{}", dir_name, entry.file_name().to_string_lossy());

            // temp files and stray files do not parse as ids
            if full_oid.len() == OBJECT_ID_LENGTH
                && let Ok(oid) = ObjectId::try_parse(&full_oid)
            {
                oids.push(oid);
            }
        }

        Ok(oids)
    }
}

impl ObjectStore for Database {
    fn store(&self, kind: ObjectType, payload: Bytes) -> Result<ObjectId> {
        let object = RawObject::new(kind, payload);
        let oid = object.object_id();
        let object_path = self.object_path(&oid);

        if object_path.exists() {
            debug!(%oid, %kind, "object already stored");
            return Ok(oid);
        }

        self.write_object(&object_path, object.encode())?;
        debug!(%oid, %kind, size = object.payload.len(), "stored object");

        Ok(oid)
    }

    fn load(&self, oid: &ObjectId) -> Result<RawObject> {
        let object_path = self.object_path(oid);

        let compressed = match std::fs::read(&object_path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(oid.clone()));
            }
            Err(error) => return Err(error.into()),
        };

        let content = Self::decompress(oid, &compressed)?;
        RawObject::decode(oid, &content)
    }

    fn contains(&self, oid: &ObjectId) -> Result<bool> {
        Ok(self.object_path(oid).try_exists()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object::hash_object;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn objects_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    fn database(dir: &TempDir) -> Database {
        Database::new(dir.path().join("objects").into_boxed_path())
    }

    #[rstest]
    fn test_store_then_load_returns_kind_and_payload(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let payload = Bytes::from_static(b"hello\n");

        let oid = database.store(ObjectType::Blob, payload.clone()).unwrap();
        let raw = database.load(&oid).unwrap();

        assert_eq!(oid.as_ref(), "ce013625030ba8dba906f756967f9e9ca394464a");
        assert_eq!(raw, RawObject::new(ObjectType::Blob, payload));
    }

    #[rstest]
    fn test_storing_twice_keeps_a_single_object(objects_dir: TempDir) {
        let database = database(&objects_dir);

        let first = database.store(ObjectType::Blob, Bytes::from_static(b"x")).unwrap();
        let second = database.store(ObjectType::Blob, Bytes::from_static(b"x")).unwrap();

        assert_eq!(first, second);
        assert_eq!(database.list_objects().unwrap(), vec![first]);
    }

    #[rstest]
    fn test_missing_object_is_not_found(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = hash_object(ObjectType::Blob, b"never stored");

        assert!(matches!(database.load(&oid), Err(StoreError::NotFound(_))));
        assert!(!database.contains(&oid).unwrap());
    }

    #[rstest]
    fn test_tampered_object_is_corrupt(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = database.store(ObjectType::Blob, Bytes::from_static(b"original")).unwrap();
        let forged = RawObject::new(ObjectType::Blob, Bytes::from_static(b"forged"));

        let object_path = database.object_path(&oid);
        std::fs::write(&object_path, Database::compress(&forged.encode()).unwrap()).unwrap();

        assert!(matches!(database.load(&oid), Err(StoreError::Corrupt { .. })));
    }

    #[rstest]
    fn test_garbage_bytes_are_corrupt(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = hash_object(ObjectType::Blob, b"whatever");
        let object_path = database.object_path(&oid);
        std::fs::create_dir_all(object_path.parent().unwrap()).unwrap();
        std::fs::write(&object_path, b"not zlib at all").unwrap();

        assert!(matches!(database.load(&oid), Err(StoreError::Corrupt { .. })));
    }

    #[rstest]
    fn test_find_objects_by_prefix(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = database.store(ObjectType::Blob, Bytes::from_static(b"hello\n")).unwrap();
        database.store(ObjectType::Tree, Bytes::new()).unwrap();

        assert_eq!(database.find_objects_by_prefix("ce0136").unwrap(), vec![oid]);
        assert!(database.find_objects_by_prefix("ffffff").unwrap().is_empty());
    }

    #[rstest]
    fn test_parse_object_as_tree_rejects_blobs(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let blob = database.store(ObjectType::Blob, Bytes::from_static(b"x")).unwrap();
        let tree = database.store(ObjectType::Tree, Bytes::new()).unwrap();

        assert_eq!(database.parse_object_as_tree(&blob).unwrap(), None);
        assert_eq!(database.parse_object_as_tree(&tree).unwrap(), Some(Tree::default()));
    }
}
