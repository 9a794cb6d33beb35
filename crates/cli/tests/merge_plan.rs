use assert_cmd::Command;
use predicates::prelude::*;

fn csplit() -> Command {
    Command::cargo_bin("csplit").expect("binary")
}

#[test]
fn plan_for_four_databases_runs_halves_in_parallel() {
    csplit()
        .arg("merge-plan")
        .arg("--count")
        .arg("4")
        .assert()
        .success()
        .stdout(predicate::str::contains("create_empty 1.db"))
        .stdout(predicate::str::contains("merge 1.db file0001.db"))
        .stdout(predicate::str::contains("pid_left=$!"))
        .stdout(predicate::str::contains("wait $pid_right"))
        .stdout(predicate::str::contains("merge 1.db 2.db"))
        .stdout(predicate::str::ends_with("echo Result is in 1.db\n"));
}

#[test]
fn plan_respects_custom_naming() {
    csplit()
        .arg("merge-plan")
        .arg("-n")
        .arg("2")
        .arg("--prefix")
        .arg("shard-")
        .arg("--suffix")
        .arg(".out")
        .arg("--start")
        .arg("0")
        .assert()
        .success()
        .stdout(predicate::str::contains("merge 1.db shard-0000.out"))
        .stdout(predicate::str::contains("merge 1.db shard-0001.out"));
}

#[test]
fn zero_count_is_rejected() {
    csplit()
        .arg("merge-plan")
        .arg("-n")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--count"));
}
