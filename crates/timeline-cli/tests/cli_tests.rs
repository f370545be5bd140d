//! Integration tests for the `timeline` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the events and
//! neighbors subcommands against a snapshot fixture, including config handling,
//! JSON output and error exits.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the snapshot.json fixture.
fn snapshot_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/snapshot.json")
}

/// Helper: path to the config.json fixture (Berlin time, one last event).
fn config_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/config.json")
}

fn timeline() -> Command {
    Command::cargo_bin("timeline").unwrap()
}

const DAY: [&str; 4] = [
    "--from",
    "2018-01-01T00:00:00Z",
    "--to",
    "2018-01-02T00:00:00Z",
];

// ─────────────────────────────────────────────────────────────────────────────
// events subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn events_lists_everything_overlapping_the_day() {
    timeline()
        .args(["events", "-i", snapshot_path()])
        .args(DAY)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "FINISHED  job-foo-1514772000000  2018-01-01T02:00:00 - 2018-01-01T02:30:00: Folder » Foo #2 (30 min)",
        ))
        .stdout(predicate::str::contains("RUNNING   job-foo-1514804400000"))
        .stdout(predicate::str::contains("SCHEDULED job-foo-1514836800000"))
        .stdout(predicate::str::contains("job-bar-1514782800000"))
        // Build #1 ends exactly at the range start.
        .stdout(predicate::str::contains("job-foo-1514757600000").not())
        // The second scheduled run is the next day.
        .stdout(predicate::str::contains("job-foo-1514923200000").not());
}

#[test]
fn events_reads_snapshot_from_stdin() {
    let snapshot = std::fs::read_to_string(snapshot_path()).expect("snapshot fixture must exist");

    timeline()
        .arg("events")
        .args(DAY)
        .write_stdin(snapshot)
        .assert()
        .success()
        .stdout(predicate::str::contains("job-foo-1514772000000"));
}

#[test]
fn events_are_ordered_by_start() {
    let output = timeline()
        .args(["events", "-i", snapshot_path()])
        .args(DAY)
        .output()
        .expect("events should run");
    let stdout = String::from_utf8(output.stdout).unwrap();
    let ids: Vec<&str> = stdout
        .lines()
        .map(|line| line.split_whitespace().nth(1).unwrap())
        .collect();

    assert_eq!(
        ids,
        [
            "job-foo-1514772000000",
            "job-bar-1514782800000",
            "job-foo-1514804400000",
            "job-foo-1514836800000",
        ]
    );
}

#[test]
fn events_type_builds_excludes_scheduled_runs() {
    timeline()
        .args(["events", "-i", snapshot_path(), "--type", "builds"])
        .args(DAY)
        .assert()
        .success()
        .stdout(predicate::str::contains("RUNNING"))
        .stdout(predicate::str::contains("SCHEDULED").not());
}

#[test]
fn events_type_jobs_lists_only_scheduled_runs() {
    timeline()
        .args(["events", "-i", snapshot_path(), "--type", "jobs"])
        .args(DAY)
        .assert()
        .success()
        .stdout(predicate::str::contains("SCHEDULED"))
        .stdout(predicate::str::contains("FINISHED").not())
        .stdout(predicate::str::contains("RUNNING").not());
}

#[test]
fn events_json_output_is_parseable() {
    let output = timeline()
        .args(["events", "-i", snapshot_path(), "--json"])
        .args(DAY)
        .output()
        .expect("events should run");
    assert!(output.status.success());

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("output must be valid JSON");
    let events = parsed.as_array().expect("output must be an array");
    assert_eq!(events.len(), 4);

    let running = events
        .iter()
        .find(|e| e["state"] == "RUNNING")
        .expect("running build must be listed");
    assert_eq!(running["id"], "job-foo-1514804400000");
    // Elapsed one hour, estimate two hours: the estimate wins.
    assert_eq!(running["duration"], 2 * 60 * 60 * 1000);
    assert_eq!(running["icon"], "icon-blue-anime");
    assert_eq!(running["end"], "2018-01-01T13:00:00Z");

    let bar = events
        .iter()
        .find(|e| e["id"] == "job-bar-1514782800000")
        .expect("bar build must be listed");
    // Zero duration still occupies one second.
    assert_eq!(bar["end"], "2018-01-01T05:00:01Z");
}

#[test]
fn events_render_in_requested_timezone() {
    timeline()
        .args(["events", "-i", snapshot_path(), "--tz", "Europe/Berlin"])
        .args(DAY)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "2018-01-01T03:00:00 - 2018-01-01T03:30:00: Folder » Foo #2",
        ));
}

#[test]
fn events_render_in_config_timezone() {
    timeline()
        .args(["events", "-i", snapshot_path(), "--config", config_path()])
        .args(DAY)
        .assert()
        .success()
        .stdout(predicate::str::contains("2018-01-01T03:00:00 - 2018-01-01T03:30:00"));
}

#[test]
fn events_reversed_range_fails() {
    timeline()
        .args([
            "events",
            "-i",
            snapshot_path(),
            "--from",
            "2018-01-02T00:00:00Z",
            "--to",
            "2018-01-01T00:00:00Z",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --from/--to range"));
}

#[test]
fn events_empty_range_fails() {
    timeline()
        .args([
            "events",
            "-i",
            snapshot_path(),
            "--from",
            "2018-01-01T00:00:00Z",
            "--to",
            "2018-01-01T00:00:00Z",
        ])
        .assert()
        .failure();
}

#[test]
fn events_bad_timestamp_fails() {
    timeline()
        .args(["events", "-i", snapshot_path(), "--from", "yesterday", "--to", "2018-01-01T00:00:00Z"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid RFC 3339 timestamp"));
}

#[test]
fn events_unknown_timezone_fails() {
    timeline()
        .args(["events", "-i", snapshot_path(), "--tz", "Mars/Olympus"])
        .args(DAY)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timeline configuration"));
}

#[test]
fn events_malformed_snapshot_fails() {
    timeline()
        .arg("events")
        .args(DAY)
        .write_stdin("{ not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse snapshot JSON"));
}

#[test]
fn events_missing_file_fails() {
    timeline()
        .args(["events", "-i", "/nonexistent/snapshot.json"])
        .args(DAY)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// neighbors subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn neighbors_of_middle_build() {
    timeline()
        .args(["neighbors", "-i", snapshot_path(), "--id", "job-foo-1514772000000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("event:     FINISHED  job-foo-1514772000000"))
        .stdout(predicate::str::contains("previous:  FINISHED  job-foo-1514757600000"))
        .stdout(predicate::str::contains("next:      RUNNING   job-foo-1514804400000"))
        .stdout(predicate::str::contains("scheduled: SCHEDULED job-foo-1514836800000"))
        .stdout(predicate::str::contains("  FINISHED  job-foo-1514757600000"));
}

#[test]
fn neighbors_of_first_build_has_no_previous() {
    timeline()
        .args(["neighbors", "-i", snapshot_path(), "--id", "job-foo-1514757600000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("previous:  -"))
        .stdout(predicate::str::contains("next:      FINISHED  job-foo-1514772000000"));
}

#[test]
fn neighbors_builds_view_has_no_scheduled_run() {
    timeline()
        .args([
            "neighbors",
            "-i",
            snapshot_path(),
            "--id",
            "job-foo-1514772000000",
            "--type",
            "builds",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("scheduled: -"));
}

#[test]
fn neighbors_last_events_respects_config_limit() {
    let output = timeline()
        .args([
            "neighbors",
            "-i",
            snapshot_path(),
            "--id",
            "job-foo-1514804400000",
            "--config",
            config_path(),
        ])
        .output()
        .expect("neighbors should run");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let history: Vec<&str> = stdout
        .lines()
        .skip_while(|line| *line != "last events:")
        .skip(1)
        .collect();

    assert_eq!(history.len(), 1, "config limits history to one build");
    assert!(history[0].contains("job-foo-1514772000000"), "got: {history:?}");
}

#[test]
fn neighbors_unknown_id_fails() {
    timeline()
        .args(["neighbors", "-i", snapshot_path(), "--id", "job-nope-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No started event with id 'job-nope-1'"));
}
