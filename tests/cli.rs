use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn dotsync(dir: &assert_fs::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dotsync").unwrap();
    cmd.current_dir(dir.path()).env_remove("DOTSYNC_LOG");
    cmd
}

#[test]
fn test_no_arguments_prints_help_and_exits_1() {
    let dir = assert_fs::TempDir::new().unwrap();

    dotsync(&dir)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_bad_arguments_exit_2_with_usage() {
    let dir = assert_fs::TempDir::new().unwrap();

    dotsync(&dir)
        .args(["config", "--lineEnding", "cr"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("!! ERROR"))
        .stderr(predicate::str::contains("Usage"));

    dotsync(&dir)
        .args(["config", "--list", "--lineEnding", "lf"])
        .assert()
        .code(2);
}

#[test]
fn test_bad_arguments_show_the_subcommand_usage() {
    let dir = assert_fs::TempDir::new().unwrap();

    dotsync(&dir)
        .args(["config", "--lineEnding", "cr"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("dotsync config [--list]"));

    dotsync(&dir)
        .args(["local", "--push"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("dotsync local [--fileName FILENAME] [--pull]"))
        .stderr(predicate::str::contains("dotsync config").not());
}

#[test]
fn test_config_list_on_fresh_directory() {
    let dir = assert_fs::TempDir::new().unwrap();

    dotsync(&dir)
        .args(["config", "--list"])
        .assert()
        .success()
        .stdout("<EMPTY CONFIG>\n");
}

#[test]
fn test_config_is_persisted_in_working_directory() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("home").create_dir_all().unwrap();

    dotsync(&dir)
        .args(["config", "--location", "home"])
        .assert()
        .success();
    dotsync(&dir)
        .args(["config", "--lineEnding", "crlf"])
        .assert()
        .success();

    dir.child("dotsync.ron")
        .assert(predicate::str::contains("\"lineEnding\": \"crlf\""));
    dotsync(&dir)
        .args(["config", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lineEnding = crlf"))
        .stdout(predicate::str::contains("location   = "));
}

#[test]
fn test_config_location_must_exist() {
    let dir = assert_fs::TempDir::new().unwrap();

    dotsync(&dir)
        .args(["config", "--location", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("!! ConfigurationError: "))
        .stderr(predicate::str::contains("does not exist"));
    dir.child("dotsync.ron").assert(predicate::path::missing());
}

#[test]
fn test_custom_config_path() {
    let dir = assert_fs::TempDir::new().unwrap();

    dotsync(&dir)
        .args(["--cpath", "custom.ron", "config", "--lineEnding", "lf"])
        .assert()
        .success();

    dir.child("custom.ron").assert(predicate::path::exists());
    dir.child("dotsync.ron").assert(predicate::path::missing());
}

#[test]
fn test_sync_outside_a_repository_is_reported() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("DotFiles/.bashrc").write_str("x").unwrap();

    dotsync(&dir)
        .arg("repo")
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("!! ConfigurationError: "));
}

#[test]
fn test_multi_line_config_is_rejected() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("dotsync.ron")
        .write_str("{\"lineEnding\": \"lf\\ncrlf\"}")
        .unwrap();

    dotsync(&dir)
        .args(["config", "--list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("multi-line"));
}
