use assert_fs::TempDir;
use common::command::{
    branch_commit_id, commit_file, init_repository_dir, run_twig_command, staged_repository_dir,
};
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
#[case::simple("feature")]
#[case::hierarchical("feature/login")]
#[case::with_dashes("fix-123_b")]
#[case::with_dots("release.v1")]
fn create_branch_with_valid_name(init_repository_dir: TempDir, #[case] branch_name: &str) {
    let dir = init_repository_dir.path();

    run_twig_command(dir, &["branch", branch_name])
        .assert()
        .success()
        .stdout("");

    assert_eq!(
        branch_commit_id(dir, branch_name),
        branch_commit_id(dir, "main")
    );
    // HEAD stays on main
    assert_eq!(common::head_content(dir), "ref: refs/heads/main");
}

#[rstest]
#[case::starts_with_dot(".branch")]
#[case::ends_with_lock("branch.lock")]
#[case::consecutive_dots("feature..branch")]
#[case::slash_dot("feature/.branch")]
#[case::ends_with_slash("branch/")]
#[case::at_brace("feature@{0}")]
#[case::asterisk("feature*branch")]
#[case::colon("feature:branch")]
#[case::question_mark("feature?branch")]
#[case::open_bracket("feature[branch")]
#[case::backslash("feature\\branch")]
#[case::space("feature branch")]
#[case::tab("feature\tbranch")]
#[case::head("HEAD")]
fn create_branch_with_invalid_name(init_repository_dir: TempDir, #[case] branch_name: &str) {
    let dir = init_repository_dir.path();

    run_twig_command(dir, &["branch", branch_name])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid branch name"));

    run_twig_command(dir, &["branch"])
        .assert()
        .success()
        .stdout("* main\n");
}

#[rstest]
fn create_duplicate_branch(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_twig_command(dir, &["branch", "topic"])
        .assert()
        .success();
    commit_file(dir, "second.txt", "two", "Second commit");

    run_twig_command(dir, &["branch", "topic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    // the existing branch was not moved
    assert_ne!(branch_commit_id(dir, "topic"), branch_commit_id(dir, "main"));
}

#[rstest]
fn create_branch_without_commits(staged_repository_dir: TempDir) {
    let dir = staged_repository_dir.path();

    run_twig_command(dir, &["branch", "topic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not have any commits yet"));

    assert!(!dir.join(".git/refs/heads/topic").exists());
}

#[rstest]
fn create_branch_from_revision(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let root = branch_commit_id(dir, "main");
    let second = commit_file(dir, "second.txt", "two", "Second commit");
    commit_file(dir, "third.txt", "three", "Third commit");

    run_twig_command(dir, &["branch", "from-ancestor", "main~2"])
        .assert()
        .success();
    run_twig_command(dir, &["branch", "from-parent", "HEAD^"])
        .assert()
        .success();
    run_twig_command(dir, &["branch", "from-oid", &root[..7]])
        .assert()
        .success();
    run_twig_command(dir, &["branch", "from-ref", "from-parent"])
        .assert()
        .success();

    assert_eq!(branch_commit_id(dir, "from-ancestor"), root);
    assert_eq!(branch_commit_id(dir, "from-parent"), second);
    assert_eq!(branch_commit_id(dir, "from-oid"), root);
    assert_eq!(branch_commit_id(dir, "from-ref"), second);
}

#[rstest]
#[case::unknown_branch("missing")]
#[case::too_many_generations("main~5")]
#[case::tree_id(common::HELLO_TREE_OID)]
fn create_branch_from_invalid_revision(init_repository_dir: TempDir, #[case] start: &str) {
    let dir = init_repository_dir.path();

    run_twig_command(dir, &["branch", "topic", start])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid object name"));

    assert!(!dir.join(".git/refs/heads/topic").exists());
}

#[rstest]
fn list_branches(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    for name in ["zeta", "alpha", "feature/login"] {
        run_twig_command(dir, &["branch", name]).assert().success();
    }

    run_twig_command(dir, &["branch"])
        .assert()
        .success()
        .stdout("  alpha\n  feature/login\n* main\n  zeta\n");
}

#[rstest]
fn list_branches_when_detached(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let root = branch_commit_id(dir, "main");
    run_twig_command(dir, &["checkout", &root])
        .assert()
        .success();

    run_twig_command(dir, &["branch"])
        .assert()
        .success()
        .stdout(format!("* (HEAD detached at {})\n  main\n", &root[..7]));
}
