use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::revision::{Revision, resolve_object_id};
use crate::artifacts::identity::EnvIdentity;
use crate::artifacts::identity::clock::SystemClock;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

/// Name of the repository metadata directory
pub const GIT_DIR: &str = ".git";

/// A repository rooted at a working directory, with its output sink
///
/// Commands are implemented as methods on this type, one module per command.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: RefCell<Index>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    identity: EnvIdentity,
    clock: SystemClock,
}

impl Repository {
    pub fn new(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
        }
        let path = path
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", path.display()))?;
        let git_path = path.join(GIT_DIR);

        Ok(Repository {
            index: RefCell::new(Index::new(git_path.join("index").into_boxed_path())),
            database: Database::new(git_path.join("objects").into_boxed_path()),
            workspace: Workspace::new(path.clone().into_boxed_path()),
            refs: Refs::new(git_path.into_boxed_path()),
            writer: RefCell::new(writer),
            identity: EnvIdentity::from_env(),
            clock: SystemClock::from_env(),
            path: path.into_boxed_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git_path(&self) -> PathBuf {
        self.path.join(GIT_DIR)
    }

    /// Fail unless `init` has been run here
    pub fn ensure_initialized(&self) -> anyhow::Result<()> {
        if !self.refs.head_path().exists() {
            anyhow::bail!("not a twig repository: {}", self.path.display());
        }

        Ok(())
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&'_ self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn identity(&self) -> &EnvIdentity {
        &self.identity
    }

    pub fn clock(&self) -> &SystemClock {
        &self.clock
    }

    /// Commit named by a revision expression (`HEAD`, `main~2`, `a1b2c3d`, ...)
    pub fn resolve_commit(&self, revision: &str) -> anyhow::Result<ObjectId> {
        let parsed = Revision::try_parse(revision)
            .with_context(|| format!("not a valid revision: '{revision}'"))?;

        parsed
            .resolve(&self.refs, &self.database)
            .with_context(|| format!("not a valid object name: '{revision}'"))
    }

    /// Any object: by full or abbreviated id first, then as a revision
    pub fn resolve_object(&self, name: &str) -> anyhow::Result<ObjectId> {
        match resolve_object_id(name, &self.database) {
            Ok(oid) => Ok(oid),
            Err(_) => self.resolve_commit(name),
        }
    }
}
