//! References (branches and HEAD)
//!
//! References are human-readable names pointing to commits:
//! - Branches: `refs/heads/*`, always holding a commit id
//! - HEAD: either symbolic (`ref: refs/heads/<branch>`) or detached (a commit id)
//!
//! HEAD is the only symbolic ref, and it may only point at a branch, so resolving
//! it takes at most one indirection.
//!
//! ## File Format
//!
//! Each ref is a single line: a 40-character object id, or `ref: <path>` for HEAD.
//! Every write replaces the whole file through a temp file and a rename, so readers
//! never observe a half-written pointer.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::head::{HeadState, ResolvedHead};
use crate::artifacts::branch::SYMREF_PREFIX;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Result, StoreError};
use derive_new::new;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Parsed content of a ref file
#[derive(Debug, Clone, PartialEq, Eq)]
enum RefContent {
    Symbolic(BranchName),
    Direct(ObjectId),
}

impl RefContent {
    fn parse(name: &str, content: &str) -> Result<Self> {
        let content = content.trim();
        let invalid = || StoreError::InvalidRef {
            name: name.to_string(),
            content: content.to_string(),
        };

        match content.strip_prefix(SYMREF_PREFIX) {
            Some(target) => BranchName::try_parse_ref_path(target.trim())
                .map(RefContent::Symbolic)
                .map_err(|_| invalid()),
            None => ObjectId::try_parse(content)
                .map(RefContent::Direct)
                .map_err(|_| invalid()),
        }
    }
}

/// Reads and writes HEAD and branch refs under a git directory
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the git directory (typically `.git`)
    path: Box<Path>,
}

impl Refs {
    /// Where HEAD points, without following it
    pub fn read_head(&self) -> Result<HeadState> {
        match self.read_ref_file(&self.head_path(), HEAD_REF_NAME)? {
            Some(RefContent::Symbolic(branch)) => Ok(HeadState::Attached(branch)),
            Some(RefContent::Direct(oid)) => Ok(HeadState::Detached(oid)),
            None => Err(StoreError::InvalidRef {
                name: HEAD_REF_NAME.to_string(),
                content: String::new(),
            }),
        }
    }

    /// HEAD and the commit it designates
    ///
    /// Fails with [`StoreError::DanglingRef`] when HEAD is attached to a branch
    /// that has no commit yet.
    pub fn resolve_head(&self) -> Result<ResolvedHead> {
        let state = self.read_head()?;

        let oid = match &state {
            HeadState::Attached(branch) => {
                self.read_branch(branch)?
                    .ok_or_else(|| StoreError::DanglingRef {
                        branch: branch.to_string(),
                    })?
            }
            HeadState::Detached(oid) => oid.clone(),
        };

        Ok(ResolvedHead { state, oid })
    }

    /// The current commit, or `None` on an unborn branch
    pub fn head_oid(&self) -> Result<Option<ObjectId>> {
        match self.resolve_head() {
            Ok(resolved) => Ok(Some(resolved.oid)),
            Err(error) if error.is_dangling_ref() => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Point the current position at `oid`
    ///
    /// Writes the branch HEAD is attached to, or HEAD itself when detached.
    /// Returns the HEAD state the write was made for.
    pub fn update_ref(&self, oid: &ObjectId) -> Result<HeadState> {
        let state = self.read_head()?;

        match &state {
            HeadState::Attached(branch) => {
                self.write_ref_file(&self.branch_path(branch), &format!("{oid}\n"))?;
                info!(%branch, %oid, "advanced branch");
            }
            HeadState::Detached(_) => {
                self.write_ref_file(&self.head_path(), &format!("{oid}\n"))?;
                info!(%oid, "advanced detached HEAD");
            }
        }

        Ok(state)
    }

    /// Attach HEAD to an existing branch
    ///
    /// The branch HEAD is already attached to may be unborn.
    pub fn checkout_branch(&self, branch: &BranchName) -> Result<()> {
        let already_attached = matches!(
            self.read_head(),
            Ok(HeadState::Attached(ref current)) if current == branch
        );

        if !already_attached && self.read_branch(branch)?.is_none() {
            return Err(StoreError::BranchNotFound(branch.to_string()));
        }

        self.set_head_symbolic(branch)?;
        info!(%branch, "attached HEAD");

        Ok(())
    }

    /// Detach HEAD at `oid`
    pub fn checkout_detached(&self, oid: &ObjectId) -> Result<()> {
        self.write_ref_file(&self.head_path(), &format!("{oid}\n"))?;
        info!(%oid, "detached HEAD");

        Ok(())
    }

    /// Make HEAD symbolic without checking that the branch has commits
    pub fn set_head_symbolic(&self, branch: &BranchName) -> Result<()> {
        self.write_ref_file(
            &self.head_path(),
            &format!("{SYMREF_PREFIX}{}\n", branch.ref_path()),
        )
    }

    /// Commit a branch points at; `None` when the branch does not exist yet
    pub fn read_branch(&self, branch: &BranchName) -> Result<Option<ObjectId>> {
        match self.read_ref_file(&self.branch_path(branch), &branch.ref_path())? {
            Some(RefContent::Direct(oid)) => Ok(Some(oid)),
            Some(RefContent::Symbolic(target)) => Err(StoreError::InvalidRef {
                name: branch.ref_path(),
                content: format!("{SYMREF_PREFIX}{}", target.ref_path()),
            }),
            None => Ok(None),
        }
    }

    pub fn create_branch(&self, branch: &BranchName, oid: &ObjectId) -> Result<()> {
        if self.read_branch(branch)?.is_some() {
            return Err(StoreError::BranchExists(branch.to_string()));
        }

        self.write_ref_file(&self.branch_path(branch), &format!("{oid}\n"))?;
        info!(%branch, %oid, "created branch");

        Ok(())
    }

    /// All branches, sorted by name
    pub fn list_branches(&self) -> Result<Vec<BranchName>> {
        let heads_path = self.heads_path();
        if !heads_path.exists() {
            return Ok(Vec::new());
        }

        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&heads_path).ok()?;
                let name = relative_path.to_str()?.replace(std::path::MAIN_SEPARATOR, "/");
                // skips temp files and anything else that is not a valid name
                BranchName::try_parse(name).ok()
            })
            .collect::<Vec<_>>();
        branches.sort();

        Ok(branches)
    }

    fn read_ref_file(&self, path: &Path, name: &str) -> Result<Option<RefContent>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        RefContent::parse(name, &content).map(Some)
    }

    /// Replace the whole ref file at once
    fn write_ref_file(&self, path: &Path, content: &str) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| std::io::Error::other("ref path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;

        let mut temp_file = tempfile::Builder::new()
            .prefix(".tmp-ref-")
            .tempfile_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.as_file().sync_all()?;
        temp_file
            .persist(path)
            .map_err(|error| StoreError::Io(error.error))?;
        debug!(path = %path.display(), "wrote ref");

        Ok(())
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }

    fn branch_path(&self, branch: &BranchName) -> Box<Path> {
        self.path.join(branch.ref_path()).into_boxed_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object::hash_object;
    use crate::artifacts::objects::object_type::ObjectType;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    struct Fixture {
        _dir: TempDir,
        refs: Refs,
        main: BranchName,
        c1: ObjectId,
        c2: ObjectId,
    }

    #[fixture]
    fn repo() -> Fixture {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let refs = Refs::new(dir.path().join(".git").into_boxed_path());
        let main = BranchName::try_parse("main").unwrap();
        refs.set_head_symbolic(&main).unwrap();

        Fixture {
            _dir: dir,
            refs,
            main,
            c1: hash_object(ObjectType::Commit, b"c1"),
            c2: hash_object(ObjectType::Commit, b"c2"),
        }
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[rstest]
    fn test_unborn_branch_is_dangling(repo: Fixture) {
        let error = repo.refs.resolve_head().unwrap_err();

        assert!(error.is_dangling_ref());
        assert_eq!(repo.refs.head_oid().unwrap(), None);
    }

    #[rstest]
    fn test_first_update_creates_the_branch(repo: Fixture) {
        let state = repo.refs.update_ref(&repo.c1).unwrap();

        assert_eq!(state, HeadState::Attached(repo.main.clone()));
        assert_eq!(repo.refs.read_branch(&repo.main).unwrap(), Some(repo.c1.clone()));
        assert_eq!(
            repo.refs.resolve_head().unwrap(),
            ResolvedHead {
                state: HeadState::Attached(repo.main),
                oid: repo.c1
            }
        );
    }

    #[rstest]
    fn test_attached_update_moves_branch_not_head(repo: Fixture) {
        repo.refs.update_ref(&repo.c1).unwrap();
        repo.refs.update_ref(&repo.c2).unwrap();

        assert_eq!(read(&repo.refs.head_path()), "ref: refs/heads/main\n");
        assert_eq!(read(&repo.refs.branch_path(&repo.main)), format!("{}\n", repo.c2));
    }

    #[rstest]
    fn test_detached_update_moves_head_only(repo: Fixture) {
        repo.refs.update_ref(&repo.c1).unwrap();
        repo.refs.checkout_detached(&repo.c1).unwrap();

        let state = repo.refs.update_ref(&repo.c2).unwrap();

        assert_eq!(state, HeadState::Detached(repo.c1.clone()));
        assert_eq!(read(&repo.refs.head_path()), format!("{}\n", repo.c2));
        assert_eq!(repo.refs.read_branch(&repo.main).unwrap(), Some(repo.c1));
        assert_eq!(repo.refs.read_head().unwrap(), HeadState::Detached(repo.c2));
    }

    #[rstest]
    fn test_checkout_branch_reattaches_detached_head(repo: Fixture) {
        repo.refs.update_ref(&repo.c1).unwrap();
        repo.refs.checkout_detached(&repo.c2).unwrap();

        repo.refs.checkout_branch(&repo.main).unwrap();

        assert_eq!(repo.refs.read_head().unwrap(), HeadState::Attached(repo.main));
        assert_eq!(repo.refs.head_oid().unwrap(), Some(repo.c1));
    }

    #[rstest]
    fn test_checkout_missing_branch_fails(repo: Fixture) {
        let topic = BranchName::try_parse("topic").unwrap();

        assert!(matches!(
            repo.refs.checkout_branch(&topic),
            Err(StoreError::BranchNotFound(_))
        ));
        assert_eq!(repo.refs.read_head().unwrap(), HeadState::Attached(repo.main));
    }

    #[rstest]
    fn test_create_and_list_branches(repo: Fixture) {
        let topic = BranchName::try_parse("feature/topic").unwrap();
        repo.refs.update_ref(&repo.c1).unwrap();
        repo.refs.create_branch(&topic, &repo.c2).unwrap();

        assert_eq!(repo.refs.list_branches().unwrap(), vec![topic.clone(), repo.main]);
        assert!(matches!(
            repo.refs.create_branch(&topic, &repo.c1),
            Err(StoreError::BranchExists(_))
        ));
    }

    #[rstest]
    fn test_malformed_head_is_reported(repo: Fixture) {
        std::fs::write(repo.refs.head_path(), "ref: refs/tags/v1\n").unwrap();

        assert!(matches!(
            repo.refs.read_head(),
            Err(StoreError::InvalidRef { .. })
        ));
    }

    #[rstest]
    fn test_symbolic_branch_ref_is_rejected(repo: Fixture) {
        let path = repo.refs.branch_path(&repo.main);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "ref: refs/heads/other\n").unwrap();

        assert!(matches!(
            repo.refs.resolve_head(),
            Err(StoreError::InvalidRef { .. })
        ));
    }
}
