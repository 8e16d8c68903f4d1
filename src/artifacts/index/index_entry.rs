//! Index entry representation
//!
//! Each entry in the index is a staged file:
//! - Slash-separated path relative to the repository root
//! - Blob object ID of its content
//! - Mode (regular, executable or symlink)
//! - Stat metadata used by the on-disk format
//!
//! ## Entry Format
//!
//! Entries are stored in a binary format padded with NUL bytes to 8-byte alignment.

use crate::artifacts::index::entry_mode::{EntryMode, FileMode};
use crate::artifacts::index::{ENTRY_BLOCK, ENTRY_MIN_SIZE, MAX_PATH_SIZE};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Result, StoreError};
use byteorder::{ByteOrder, NetworkEndian, WriteBytesExt};
use bytes::Bytes;
use is_executable::IsExecutable;
use std::cmp::min;
use std::fs::Metadata;
use std::io::Write;
use std::os::unix::prelude::MetadataExt;
use std::path::Path;

/// A staged file: path, content id and mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Slash-separated path relative to the repository root
    pub path: String,
    /// Blob ID of the file content
    pub oid: ObjectId,
    pub mode: EntryMode,
    pub stat: EntryStat,
}

impl IndexEntry {
    pub fn new(path: impl Into<String>, oid: ObjectId, mode: EntryMode) -> Self {
        IndexEntry {
            path: path.into(),
            oid,
            mode,
            stat: EntryStat::default(),
        }
    }

    pub fn with_stat(mut self, stat: EntryStat) -> Self {
        self.stat = stat;
        self
    }

    /// Check that the path can be stored in a tree
    ///
    /// Paths must be relative, non-empty, and made of components other than
    /// `""`, `"."` and `".."`.
    pub fn check_path(&self) -> Result<()> {
        let invalid = |reason| StoreError::InvalidPath {
            path: self.path.clone(),
            reason,
        };

        if self.path.is_empty() {
            return Err(invalid("path is empty"));
        }
        if self.path.starts_with('/') {
            return Err(invalid("path is absolute"));
        }
        if self.path.ends_with('/') {
            return Err(invalid("path ends with a slash"));
        }
        if self.path.contains('\0') {
            return Err(invalid("path contains a NUL byte"));
        }

        for component in self.path.split('/') {
            match component {
                "" => return Err(invalid("path has an empty component")),
                "." | ".." => return Err(invalid("path has a relative component")),
                _ => {}
            }
        }

        Ok(())
    }

    /// Encode the entry in the index file layout
    pub fn serialize(&self) -> Result<Bytes> {
        let mut entry_bytes = Vec::with_capacity(ENTRY_MIN_SIZE + self.path.len());
        let stat = &self.stat;

        entry_bytes.write_u32::<NetworkEndian>(stat.ctime as u32)?;
        entry_bytes.write_u32::<NetworkEndian>(stat.ctime_nsec as u32)?;
        entry_bytes.write_u32::<NetworkEndian>(stat.mtime as u32)?;
        entry_bytes.write_u32::<NetworkEndian>(stat.mtime_nsec as u32)?;
        entry_bytes.write_u32::<NetworkEndian>(stat.dev as u32)?;
        entry_bytes.write_u32::<NetworkEndian>(stat.ino as u32)?;
        entry_bytes.write_u32::<NetworkEndian>(self.mode.as_u32())?;
        entry_bytes.write_u32::<NetworkEndian>(stat.uid)?;
        entry_bytes.write_u32::<NetworkEndian>(stat.gid)?;
        entry_bytes.write_u32::<NetworkEndian>(stat.size as u32)?;
        self.oid.write_h40_to(&mut entry_bytes)?;
        entry_bytes.write_u16::<NetworkEndian>(min(self.path.len(), MAX_PATH_SIZE) as u16)?;
        entry_bytes.write_all(self.path.as_bytes())?;

        // at least one NUL terminates the path, then pad to the block size
        entry_bytes.push(0);
        while entry_bytes.len() % ENTRY_BLOCK != 0 {
            entry_bytes.push(0);
        }

        Ok(Bytes::from(entry_bytes))
    }

    /// Decode one padded entry
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < ENTRY_MIN_SIZE {
            return Err(StoreError::InvalidIndex(format!(
                "entry is {} bytes long, expected at least {ENTRY_MIN_SIZE}",
                bytes.len()
            )));
        }

        let raw_mode = NetworkEndian::read_u32(&bytes[24..28]);
        let mode = EntryMode::try_from(raw_mode)
            .map_err(|mode| StoreError::InvalidIndex(format!("unknown entry mode {mode:o}")))?;
        let oid = ObjectId::read_h40_from(&mut &bytes[40..60])?;

        let name_end = bytes[62..]
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| StoreError::InvalidIndex("entry path is not terminated".into()))?;
        let path = std::str::from_utf8(&bytes[62..62 + name_end])
            .map_err(|_| StoreError::InvalidIndex("entry path is not utf-8".into()))?
            .to_string();

        let stat = EntryStat {
            ctime: NetworkEndian::read_u32(&bytes[0..4]) as i64,
            ctime_nsec: NetworkEndian::read_u32(&bytes[4..8]) as i64,
            mtime: NetworkEndian::read_u32(&bytes[8..12]) as i64,
            mtime_nsec: NetworkEndian::read_u32(&bytes[12..16]) as i64,
            dev: NetworkEndian::read_u32(&bytes[16..20]) as u64,
            ino: NetworkEndian::read_u32(&bytes[20..24]) as u64,
            uid: NetworkEndian::read_u32(&bytes[28..32]),
            gid: NetworkEndian::read_u32(&bytes[32..36]),
            size: NetworkEndian::read_u32(&bytes[36..40]) as u64,
        };

        Ok(IndexEntry {
            path,
            oid,
            mode,
            stat,
        })
    }
}

impl PartialOrd for IndexEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.path.as_bytes().cmp(other.path.as_bytes())
    }
}

/// Stat metadata kept alongside each entry in the index file
///
/// All fields are zero for entries built in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryStat {
    pub ctime: i64,
    pub ctime_nsec: i64,
    pub mtime: i64,
    pub mtime_nsec: i64,
    pub dev: u64,
    pub ino: u64,
    pub uid: u32,
    pub gid: u32,
    pub size: u64,
}

impl From<&Metadata> for EntryStat {
    fn from(metadata: &Metadata) -> Self {
        EntryStat {
            ctime: metadata.ctime(),
            ctime_nsec: metadata.ctime_nsec(),
            mtime: metadata.mtime(),
            mtime_nsec: metadata.mtime_nsec(),
            dev: metadata.dev(),
            ino: metadata.ino(),
            uid: metadata.uid(),
            gid: metadata.gid(),
            size: metadata.size(),
        }
    }
}

/// Mode a workspace file gets when it is staged
pub fn mode_for(file_path: &Path, metadata: &Metadata) -> EntryMode {
    if metadata.file_type().is_symlink() {
        EntryMode::Symlink
    } else if file_path.is_executable() {
        EntryMode::File(FileMode::Executable)
    } else {
        EntryMode::File(FileMode::Regular)
    }
}
