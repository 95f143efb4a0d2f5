use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_the_planner_surfaces() {
  let mut cmd = Command::cargo_bin("studybudd").unwrap();
  cmd
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("plan"))
    .stdout(predicate::str::contains("sync"))
    .stdout(predicate::str::contains("locate"))
    .stdout(predicate::str::contains("flashcards"));
}

#[test]
fn show_on_a_missing_workbook_reports_an_empty_plan() {
  let dir = tempfile::tempdir().unwrap();
  let mut cmd = Command::cargo_bin("studybudd").unwrap();
  cmd
    .current_dir(dir.path())
    .args(["show"])
    .assert()
    .success()
    .stdout(predicate::str::contains("No study plan data available"));
}

#[test]
fn plan_without_credentials_fails_with_a_clear_message() {
  let dir = tempfile::tempdir().unwrap();
  let mut cmd = Command::cargo_bin("studybudd").unwrap();
  cmd
    .current_dir(dir.path())
    .args(["plan", "math test tomorrow"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("gemini_api_key"));
}
