//! Working directory access
//!
//! Only what staging needs: listing files under a path, reading their content and
//! taking their stat metadata. Paths handed out are relative to the repository root.

use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::{EntryStat, mode_for};
use anyhow::Context;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 1] = [".git"];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Files at or below `file_path`, relative to the workspace root and sorted
    pub fn list_files(&self, file_path: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let root_file_path = self.path.join(file_path);

        if !root_file_path.exists() {
            anyhow::bail!("pathspec '{}' did not match any files", file_path.display());
        }

        let mut files = WalkDir::new(&root_file_path)
            .into_iter()
            .filter_entry(|entry| {
                let relative_path = entry.path().strip_prefix(self.path.as_ref());
                !relative_path.is_ok_and(Self::is_ignored)
            })
            .filter_map(|entry| entry.ok())
            .filter(|entry| !entry.file_type().is_dir())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(self.path.as_ref())
                    .ok()
                    .map(Path::to_path_buf)
            })
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    fn is_ignored(path: &Path) -> bool {
        path.components().any(|component| match component {
            Component::Normal(name) => IGNORED_PATHS.contains(&name.to_string_lossy().as_ref()),
            _ => false,
        })
    }

    /// Raw content of a file (the target path for symlinks)
    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let full_path = self.path.join(file_path);
        let metadata = std::fs::symlink_metadata(&full_path)
            .with_context(|| format!("Failed to stat {}", file_path.display()))?;

        let content = if metadata.file_type().is_symlink() {
            let target = std::fs::read_link(&full_path)
                .with_context(|| format!("Failed to read link {}", file_path.display()))?;
            target.to_string_lossy().into_owned().into_bytes()
        } else {
            std::fs::read(&full_path)
                .with_context(|| format!("Failed to read {}", file_path.display()))?
        };

        Ok(Bytes::from(content))
    }

    pub fn stat_file(&self, file_path: &Path) -> anyhow::Result<(EntryMode, EntryStat)> {
        let full_path = self.path.join(file_path);
        let metadata = std::fs::symlink_metadata(&full_path)
            .with_context(|| format!("Failed to stat {}", file_path.display()))?;

        Ok((mode_for(&full_path, &metadata), EntryStat::from(&metadata)))
    }

    /// Slash-separated form of a workspace-relative path, as stored in the index
    pub fn index_path(file_path: &Path) -> anyhow::Result<String> {
        let components = file_path
            .components()
            .map(|component| match component {
                Component::Normal(name) => name
                    .to_str()
                    .with_context(|| format!("{} is not valid utf-8", file_path.display())),
                _ => anyhow::bail!("{} is outside the repository", file_path.display()),
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(components.join("/"))
    }
}
