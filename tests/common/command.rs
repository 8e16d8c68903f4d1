use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use derive_new::new;
use rstest::fixture;
use std::path::Path;

pub const AUTHOR_NAME: &str = "Jane Doe";
pub const AUTHOR_EMAIL: &str = "jane@example.com";
pub const AUTHOR_DATE: &str = "2023-01-01 12:00:00 +0000"; // %Y-%m-%d %H:%M:%S %z

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// An initialized repository with `hello.txt` staged but nothing committed
#[fixture]
pub fn staged_repository_dir(repository_dir: TempDir) -> TempDir {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("hello.txt"),
        "hello\n".to_string(),
    ));

    run_twig_command(repository_dir.path(), &["update-index", "--add", "hello.txt"])
        .assert()
        .success();

    repository_dir
}

/// An initialized repository with one commit on `main`
#[fixture]
pub fn init_repository_dir(staged_repository_dir: TempDir) -> TempDir {
    twig_commit(staged_repository_dir.path(), "Initial commit")
        .assert()
        .success();

    staged_repository_dir
}

/// `twig` in `dir`, with a clean identity environment
pub fn run_twig_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("twig").expect("Failed to find twig binary");
    cmd.current_dir(dir);
    for key in [
        "GIT_AUTHOR_NAME",
        "GIT_AUTHOR_EMAIL",
        "GIT_AUTHOR_DATE",
        "GIT_COMMITTER_NAME",
        "GIT_COMMITTER_EMAIL",
        "TWIG_LOG",
    ] {
        cmd.env_remove(key);
    }
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

/// `twig` with a fixed author and date, so commit ids are reproducible
pub fn run_twig_as_author(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = run_twig_command(dir, args);
    cmd.envs(vec![
        ("GIT_AUTHOR_NAME", AUTHOR_NAME),
        ("GIT_AUTHOR_EMAIL", AUTHOR_EMAIL),
        ("GIT_AUTHOR_DATE", AUTHOR_DATE),
    ]);
    cmd
}

pub fn twig_commit(dir: &Path, message: &str) -> Command {
    run_twig_as_author(dir, &["commit", "-m", message])
}

/// Stage `path` with `content` and commit it, returning the new HEAD commit id
pub fn commit_file(dir: &Path, path: &str, content: &str, message: &str) -> String {
    write_file(FileSpec::new(dir.join(path), content.to_string()));

    run_twig_command(dir, &["update-index", "--add", path])
        .assert()
        .success();
    twig_commit(dir, message).assert().success();

    head_commit_id(dir)
}

/// Commit HEAD currently resolves to, read from the ref files
pub fn head_commit_id(dir: &Path) -> String {
    let head = crate::common::head_content(dir);
    match head.strip_prefix("ref: ") {
        Some(ref_path) => crate::common::read_git_file(dir, ref_path),
        None => head,
    }
}

pub fn branch_commit_id(dir: &Path, branch: &str) -> String {
    crate::common::read_git_file(dir, &format!("refs/heads/{branch}"))
}

pub fn stdout_of(mut cmd: Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).expect("stdout should be utf-8")
}

#[derive(Debug, Clone, new)]
pub struct RandomAuthor {
    pub name: String,
    pub email: String,
}

pub fn generate_random_author() -> RandomAuthor {
    use fake::Fake;
    use fake::faker::internet::en::FreeEmail;
    use fake::faker::name::en::Name;

    let name = Name().fake::<String>().replace(" ", "_");
    let email = FreeEmail().fake::<String>();
    RandomAuthor::new(name, email)
}
