use crate::areas::database::{Database, ObjectStore};
use crate::areas::refs::Refs;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::{ANCESTOR_REGEX, MIN_ABBREVIATED_LENGTH, PARENT_REGEX};
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Result, StoreError};
use std::sync::LazyLock;

static PARENT: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(PARENT_REGEX).expect("parent regex is valid"));
static ANCESTOR: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(ANCESTOR_REGEX).expect("ancestor regex is valid"));

/// A revision expression naming a commit
///
/// Supports:
/// - `HEAD` and its alias `@`
/// - Branch names: `main`, `feature/login`
/// - Full or abbreviated (4+ hex characters) object ids, tried when no branch of that
///   name exists
/// - Parent notation: `<revision>^`
/// - Ancestor notation: `<revision>~<n>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    Head,
    /// A branch, or an object id if no such branch exists
    Ref(BranchName),
    Parent(Box<Revision>),
    Ancestor(Box<Revision>, usize),
}

impl Revision {
    pub fn try_parse(revision: &str) -> Result<Revision> {
        if let Some(caps) = PARENT.captures(revision) {
            let base_revision = Self::try_parse(&caps[1])?;

            Ok(Revision::Parent(Box::new(base_revision)))
        } else if let Some(caps) = ANCESTOR.captures(revision) {
            let generations = caps[2]
                .parse::<usize>()
                .map_err(|_| StoreError::UnknownRevision(revision.to_string()))?;
            let base_revision = Self::try_parse(&caps[1])?;

            Ok(Revision::Ancestor(Box::new(base_revision), generations))
        } else if revision == "HEAD" || revision == "@" {
            Ok(Revision::Head)
        } else {
            Ok(Revision::Ref(BranchName::try_parse(revision)?))
        }
    }

    /// The commit this revision designates
    ///
    /// `HEAD` on an unborn branch fails with [`StoreError::DanglingRef`].
    pub fn resolve(&self, refs: &Refs, database: &Database) -> Result<ObjectId> {
        match self {
            Revision::Head => Ok(refs.resolve_head()?.oid),
            Revision::Ref(name) => match refs.read_branch(name)? {
                Some(oid) => Ok(oid),
                None if looks_like_oid(name.as_ref()) => {
                    resolve_commit_id(name.as_ref(), database)
                }
                None => Err(StoreError::UnknownRevision(name.to_string())),
            },
            Revision::Parent(base_revision) => {
                let base = base_revision.resolve(refs, database)?;
                self.parent_of(&base, database)
            }
            Revision::Ancestor(base_revision, generations) => {
                let mut oid = base_revision.resolve(refs, database)?;
                for _ in 0..*generations {
                    oid = self.parent_of(&oid, database)?;
                }

                Ok(oid)
            }
        }
    }

    fn parent_of(&self, oid: &ObjectId, database: &Database) -> Result<ObjectId> {
        let commit = expect_commit(oid, database)?;

        commit
            .parent()
            .cloned()
            .ok_or_else(|| StoreError::UnknownRevision(self.to_string()))
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Revision::Head => write!(f, "HEAD"),
            Revision::Ref(name) => write!(f, "{name}"),
            Revision::Parent(base) => write!(f, "{base}^"),
            Revision::Ancestor(base, generations) => write!(f, "{base}~{generations}"),
        }
    }
}

fn looks_like_oid(text: &str) -> bool {
    (MIN_ABBREVIATED_LENGTH..=OBJECT_ID_LENGTH).contains(&text.len())
        && text.chars().all(|c| c.is_ascii_hexdigit())
}

/// Resolve a full or abbreviated id to a stored object of any kind
pub fn resolve_object_id(text: &str, database: &Database) -> Result<ObjectId> {
    if text.len() == OBJECT_ID_LENGTH {
        let oid = ObjectId::try_parse(text)?;
        return match database.contains(&oid)? {
            true => Ok(oid),
            false => Err(StoreError::NotFound(oid)),
        };
    }

    if !looks_like_oid(text) {
        return Err(StoreError::UnknownRevision(text.to_string()));
    }

    let mut matches = database.find_objects_by_prefix(text)?;
    match matches.len() {
        0 => Err(StoreError::UnknownRevision(text.to_string())),
        1 => Ok(matches.remove(0)),
        _ => Err(ambiguous(text, &matches)),
    }
}

/// Like [`resolve_object_id`], but only commits count as candidates
fn resolve_commit_id(text: &str, database: &Database) -> Result<ObjectId> {
    let oid = match resolve_object_id(text, database) {
        Err(StoreError::AmbiguousRevision { .. }) => {
            let mut commits = database
                .find_objects_by_prefix(text)?
                .into_iter()
                .filter(|oid| {
                    database
                        .load(oid)
                        .is_ok_and(|raw| raw.kind == ObjectType::Commit)
                })
                .collect::<Vec<_>>();

            match commits.len() {
                0 => return Err(StoreError::UnknownRevision(text.to_string())),
                1 => commits.remove(0),
                _ => return Err(ambiguous(text, &commits)),
            }
        }
        other => other?,
    };

    expect_commit(&oid, database)?;
    Ok(oid)
}

fn expect_commit(oid: &ObjectId, database: &Database) -> Result<Commit> {
    let raw = database.load(oid)?;
    if raw.kind != ObjectType::Commit {
        return Err(StoreError::WrongObjectType {
            oid: oid.clone(),
            expected: ObjectType::Commit,
            actual: raw.kind,
        });
    }

    database
        .parse_object_as_commit(oid)?
        .ok_or_else(|| StoreError::UnknownRevision(oid.to_string()))
}

fn ambiguous(prefix: &str, candidates: &[ObjectId]) -> StoreError {
    StoreError::AmbiguousRevision {
        prefix: prefix.to_string(),
        candidates: candidates.iter().map(ObjectId::to_short_oid).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::builder::commit_builder::CommitBuilder;
    use crate::artifacts::identity::clock::FixedClock;
    use crate::artifacts::identity::{FixedIdentity, Identity};
    use assert_fs::TempDir;
    use bytes::Bytes;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[test]
    fn test_parse_head_alias() {
        assert_eq!(Revision::try_parse("@").unwrap(), Revision::Head);
        assert_eq!(Revision::try_parse("HEAD").unwrap(), Revision::Head);
    }

    #[test]
    fn test_parse_nested_parent_and_ancestor() {
        let revision = Revision::try_parse("main~3^").unwrap();

        assert_eq!(
            revision,
            Revision::Parent(Box::new(Revision::Ancestor(
                Box::new(Revision::Ref(BranchName::try_parse("main").unwrap())),
                3
            )))
        );
        assert_eq!(revision.to_string(), "main~3^");
    }

    #[rstest]
    #[case("")]
    #[case("invalid name")]
    #[case("feature..name")]
    #[case(".invalid^")]
    #[case("branch.lock~2")]
    fn test_parse_rejects_invalid_names(#[case] revision: &str) {
        assert!(Revision::try_parse(revision).is_err());
    }

    struct Repo {
        _dir: TempDir,
        refs: Refs,
        database: Database,
        commits: Vec<ObjectId>,
    }

    /// Three commits on `main`, HEAD attached to it
    #[fixture]
    fn repo() -> Repo {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let git_path = dir.path().join(".git");
        let refs = Refs::new(git_path.clone().into_boxed_path());
        let database = Database::new(git_path.join("objects").into_boxed_path());
        refs.set_head_symbolic(&BranchName::try_parse("main").unwrap())
            .unwrap();

        let identity = FixedIdentity::new(Identity::new(
            "Jane Doe".to_string(),
            "jane@example.com".to_string(),
        ));
        let clock =
            FixedClock(DateTime::parse_from_rfc3339("2023-01-01T12:00:00+00:00").unwrap());
        let builder = CommitBuilder::new(&database, &identity, &clock);
        let tree = database.store(ObjectType::Tree, Bytes::new()).unwrap();

        let mut commits: Vec<ObjectId> = Vec::new();
        for message in ["one", "two", "three"] {
            let oid = builder
                .build(&tree, message, commits.last(), None)
                .unwrap();
            refs.update_ref(&oid).unwrap();
            commits.push(oid);
        }

        Repo {
            _dir: dir,
            refs,
            database,
            commits,
        }
    }

    fn resolve(repo: &Repo, revision: &str) -> Result<ObjectId> {
        Revision::try_parse(revision)?.resolve(&repo.refs, &repo.database)
    }

    #[rstest]
    fn test_resolve_head_branch_and_ancestry(repo: Repo) {
        assert_eq!(resolve(&repo, "HEAD").unwrap(), repo.commits[2]);
        assert_eq!(resolve(&repo, "main").unwrap(), repo.commits[2]);
        assert_eq!(resolve(&repo, "@^").unwrap(), repo.commits[1]);
        assert_eq!(resolve(&repo, "main~2").unwrap(), repo.commits[0]);
        assert_eq!(resolve(&repo, "HEAD~0").unwrap(), repo.commits[2]);
    }

    #[rstest]
    fn test_resolve_abbreviated_commit_id(repo: Repo) {
        let full = repo.commits[0].as_ref();

        assert_eq!(resolve(&repo, &full[..8]).unwrap(), repo.commits[0]);
        assert_eq!(resolve(&repo, full).unwrap(), repo.commits[0]);
    }

    #[rstest]
    fn test_parent_of_root_is_unknown(repo: Repo) {
        assert!(matches!(
            resolve(&repo, "main~3"),
            Err(StoreError::UnknownRevision(_))
        ));
    }

    #[rstest]
    fn test_unknown_branch(repo: Repo) {
        assert!(matches!(
            resolve(&repo, "topic"),
            Err(StoreError::UnknownRevision(name)) if name == "topic"
        ));
    }

    #[rstest]
    fn test_tree_id_is_not_a_commit(repo: Repo) {
        let tree = repo.database.store(ObjectType::Tree, Bytes::new()).unwrap();

        assert!(matches!(
            resolve(&repo, tree.as_ref()),
            Err(StoreError::WrongObjectType { .. })
        ));
        assert_eq!(resolve_object_id(tree.as_ref(), &repo.database).unwrap(), tree);
    }
}
