use assert_fs::TempDir;
use common::command::{repository_dir, run_twig_command};
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn new_repository_initiated_with_git_directory(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir_absolute_path = repository_dir.path().canonicalize()?.display().to_string();

    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(
            r"^Initialized empty Twig repository in .+\.git\n$",
        )?)
        .stdout(predicate::str::contains(dir_absolute_path));

    let git_dir = repository_dir.path().join(".git");
    assert!(git_dir.join("objects").is_dir());
    assert!(git_dir.join("refs").join("heads").is_dir());
    assert_eq!(common::head_content(repository_dir.path()), "ref: refs/heads/main");

    // the default branch is unborn: no ref file until the first commit
    assert!(!git_dir.join("refs").join("heads").join("main").exists());

    Ok(())
}

#[rstest]
fn init_creates_missing_target_directory(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let target = repository_dir.path().join("nested").join("project");

    run_twig_command(repository_dir.path(), &["init", target.to_str().unwrap()])
        .assert()
        .success();

    assert!(target.join(".git").join("HEAD").is_file());

    Ok(())
}

#[rstest]
fn reinit_keeps_existing_head(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    std::fs::write(
        repository_dir.path().join(".git").join("HEAD"),
        "ref: refs/heads/develop\n",
    )?;

    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Reinitialized existing Twig repository in",
        ));

    assert_eq!(
        common::head_content(repository_dir.path()),
        "ref: refs/heads/develop"
    );

    Ok(())
}

#[rstest]
#[case::write_tree(&["write-tree"])]
#[case::ls_files(&["ls-files"])]
#[case::branch(&["branch"])]
#[case::commit(&["commit", "-m", "message"])]
fn commands_outside_a_repository_fail(repository_dir: TempDir, #[case] args: &[&str]) {
    run_twig_command(repository_dir.path(), args)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a twig repository"));
}
