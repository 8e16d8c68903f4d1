//! Tree object
//!
//! Trees represent one directory level. They hold entries for files (blobs) and
//! subdirectories (other trees), along with their names and modes.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! ## Ordering
//!
//! Entries are kept sorted by name, byte-wise, with directory names compared as if
//! they ended in `/`. The order never depends on how the entries were supplied, so
//! equal directory contents always produce equal tree ids.

use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Result, StoreError};
use bytes::Bytes;
use derive_new::new;
use std::cmp::Ordering;
use std::io::{BufRead, Write};

/// One `(mode, name, oid)` record of a tree
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeEntry {
    pub mode: EntryMode,
    /// Single path component
    pub name: String,
    pub oid: ObjectId,
}

impl TreeEntry {
    fn sort_key(&self) -> impl Iterator<Item = &u8> {
        let suffix: &[u8] = if self.mode.is_tree() { b"/" } else { b"" };
        self.name.as_bytes().iter().chain(suffix)
    }

    fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(other.sort_key())
    }
}

/// A directory snapshot with canonically ordered entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// Build a tree from entries in any order
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(TreeEntry::canonical_cmp);
        Tree { entries }
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> Result<Bytes> {
        let mut payload = Vec::new();

        for entry in &self.entries {
            write!(payload, "{} {}", entry.mode.as_str(), entry.name)?;
            payload.push(0);
            entry.oid.write_h40_to(&mut payload)?;
        }

        Ok(Bytes::from(payload))
    }
}

impl Unpackable for Tree {
    fn deserialize(oid: &ObjectId, mut reader: impl BufRead) -> Result<Self> {
        let malformed = |reason: &str| StoreError::MalformedObject {
            kind: "tree",
            oid: oid.clone(),
            reason: reason.to_string(),
        };

        let mut entries = Vec::new();

        // Reuse scratch buffers to reduce allocs
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(malformed("unexpected EOF in mode"));
            }

            let mode = std::str::from_utf8(&mode_bytes)
                .ok()
                .and_then(EntryMode::from_octal_str)
                .ok_or_else(|| malformed("unknown entry mode"))?;

            name_bytes.clear();
            reader.read_until(b'\0', &mut name_bytes)?;
            if name_bytes.pop() != Some(b'\0') {
                return Err(malformed("unexpected EOF in name"));
            }
            let name = String::from_utf8(name_bytes.clone())
                .map_err(|_| malformed("entry name is not utf-8"))?;

            let entry_oid = ObjectId::read_h40_from(&mut reader)
                .map_err(|_| malformed("unexpected EOF in object id"))?;

            entries.push(TreeEntry::new(mode, name, entry_oid));
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "{} {} {}\t{}",
                    entry.mode,
                    entry.mode.object_kind(),
                    entry.oid,
                    entry.name
                )
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}
