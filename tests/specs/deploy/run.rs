//! Deploy run specs
//!
//! Full deployments against a local management API.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn deploy_waits_for_started() {
    let platform = FakePlatform::with_statuses(&["UNDEPLOYED", "DEPLOYING", "STARTED"]);
    let temp = Project::empty();
    temp.artifact("target/orders.zip");
    temp.file(
        "cloudhub.toml",
        &platform.config(
            r#"
[project]
artifact = "target/orders.zip"
"#,
        ),
    );

    temp.chd()
        .args(&["deploy", "--poll-interval", "100ms"])
        .passes()
        .stdout_has("Deploying")
        .stdout_has("Started orders");

    assert_eq!(
        platform.requests(),
        vec![
            "upload:orders",
            "configure:orders:3.3.1:1",
            "start:orders",
            "status:orders:artifact-1",
            "status:orders:artifact-1",
            "status:orders:artifact-1",
        ]
    );
}

#[test]
fn deploy_pushes_version_and_workers() {
    let platform = FakePlatform::with_statuses(&["STARTED"]);
    let temp = Project::empty();
    temp.artifact("orders.zip");
    temp.file("cloudhub.toml", &platform.config(""));

    temp.chd()
        .args(&[
            "deploy",
            "--artifact",
            "orders.zip",
            "--mule-version",
            "3.5.0",
            "--workers",
            "2",
            "-p",
            "env=prod",
        ])
        .passes();

    assert_eq!(platform.requests()[1], "configure:orders:3.5.0:2");
}

#[test]
fn credentials_come_from_user_config() {
    let platform = FakePlatform::with_statuses(&["STARTED"]);
    let temp = Project::empty();
    temp.artifact("orders.zip");
    temp.credentials(
        r#"
[cloudhub]
username = "deployer"
password = "s3cret"
"#,
    );
    temp.file(
        "cloudhub.toml",
        &format!("[cloudhub]\nurl = \"{}\"\ndomain = \"orders\"\n", platform.url()),
    );

    temp.chd()
        .args(&["deploy", "--artifact", "orders.zip"])
        .passes();
}

#[test]
fn remote_failure_exits_nonzero() {
    let platform = FakePlatform::with_statuses(&["DEPLOYING", "DEPLOY_FAILED"]);
    let temp = Project::empty();
    temp.artifact("orders.zip");
    temp.file("cloudhub.toml", &platform.config(""));

    temp.chd()
        .args(&["deploy", "--artifact", "orders.zip", "--poll-interval", "100ms"])
        .fails_with(7)
        .stderr_has("deployment failed on the platform");
}

#[test]
fn timeout_says_deployment_may_still_finish() {
    let platform = FakePlatform::with_statuses(&["DEPLOYING"]);
    let temp = Project::empty();
    temp.artifact("orders.zip");
    temp.file("cloudhub.toml", &platform.config(""));

    temp.chd()
        .args(&[
            "deploy",
            "--artifact",
            "orders.zip",
            "--max-wait-ms",
            "300",
            "--poll-interval",
            "100ms",
        ])
        .fails_with(8)
        .stderr_has("did not start within")
        .stderr_has("last status: deploying")
        .stderr_has("may still finish");
}

#[test]
fn rejected_credentials_exit_with_auth_code() {
    let platform = FakePlatform::rejecting_credentials();
    let temp = Project::empty();
    temp.artifact("orders.zip");
    temp.file("cloudhub.toml", &platform.config(""));

    temp.chd()
        .args(&["deploy", "--artifact", "orders.zip"])
        .fails_with(5)
        .stderr_has("authentication rejected during upload");

    assert_eq!(platform.requests(), vec!["upload:orders"]);
}

#[test]
fn log_file_receives_deployment_logs() {
    let platform = FakePlatform::with_statuses(&["STARTED"]);
    let temp = Project::empty();
    temp.artifact("orders.zip");
    temp.file("cloudhub.toml", &platform.config(""));

    temp.chd()
        .args(&[
            "deploy",
            "--artifact",
            "orders.zip",
            "-v",
            "--log-file",
            "logs/chd.log",
        ])
        .passes();

    let log = std::fs::read_to_string(temp.path().join("logs/chd.log")).unwrap();
    assert!(log.contains("deployment started"), "log:\n{}", log);
}
