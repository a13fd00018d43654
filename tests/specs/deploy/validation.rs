//! Deploy validation specs
//!
//! Bad input is rejected before anything is sent to the platform.

use crate::prelude::*;

#[test]
fn unsupported_packaging_is_rejected_without_remote_calls() {
    let platform = FakePlatform::with_statuses(&["STARTED"]);
    let temp = Project::empty();
    temp.artifact("target/orders.zip");
    temp.file("cloudhub.toml", &platform.config(""));

    temp.chd()
        .args(&[
            "deploy",
            "--artifact",
            "target/orders.zip",
            "--packaging",
            "jar",
        ])
        .fails_with(3)
        .stderr_has("unsupported packaging type <jar>");

    assert!(platform.requests().is_empty());
}

#[test]
fn artifact_is_checked_before_credentials() {
    let temp = Project::empty();
    temp.artifact("target/orders.zip");

    let run = temp
        .chd()
        .args(&[
            "deploy",
            "--artifact",
            "target/orders.zip",
            "--packaging",
            "jar",
        ])
        .fails_with(3);
    run.stderr_has("unsupported packaging type <jar>");
    assert!(!run.stdout().contains("Deploying"), "{}", run.stdout());
}

#[test]
fn configured_packaging_types_are_accepted() {
    let platform = FakePlatform::with_statuses(&["STARTED"]);
    let temp = Project::empty();
    temp.artifact("target/orders.zip");
    temp.file(
        "cloudhub.toml",
        &platform.config(
            r#"
[deploy]
supported_packaging = ["mule", "app"]
"#,
        ),
    );

    temp.chd()
        .args(&["deploy", "--artifact", "target/orders.zip", "--packaging", "app"])
        .passes();
}

#[test]
fn missing_artifact_file_is_rejected_without_remote_calls() {
    let platform = FakePlatform::with_statuses(&["STARTED"]);
    let temp = Project::empty();
    temp.file("cloudhub.toml", &platform.config(""));

    let run = temp
        .chd()
        .args(&["deploy", "--artifact", "target/orders.zip"])
        .fails_with(3);
    run.stderr_has("invalid artifact")
        .stderr_has("Package the application");

    assert!(platform.requests().is_empty());
    assert!(!run.stdout().contains("Deploying"), "{}", run.stdout());
}

#[test]
fn no_artifact_configured_is_rejected() {
    let platform = FakePlatform::with_statuses(&["STARTED"]);
    let temp = Project::empty();
    temp.file("cloudhub.toml", &platform.config(""));

    temp.chd()
        .args(&["deploy"])
        .fails_with(3)
        .stderr_has("--artifact");
}

#[test]
fn missing_domain_is_config_error() {
    let temp = Project::empty();
    temp.artifact("target/orders.zip");
    temp.file(
        "cloudhub.toml",
        r#"
[cloudhub]
username = "deployer"
password = "s3cret"
"#,
    );

    temp.chd()
        .args(&["deploy", "--artifact", "target/orders.zip"])
        .fails_with(2)
        .stderr_has("cloudhub.domain")
        .stderr_has("CLOUDHUB_DOMAIN");
}

#[test]
fn unknown_config_key_is_rejected() {
    let temp = Project::empty();
    temp.file("cloudhub.toml", "[cloudhub]\nuser = \"deployer\"\n");

    temp.chd()
        .args(&["deploy", "--artifact", "orders.zip"])
        .fails_with(2)
        .stderr_has("invalid config");
}

#[test]
fn credentials_file_rejects_deploy_settings() {
    let temp = Project::empty();
    temp.artifact("orders.zip");
    temp.credentials("[deploy]\nworkers = 4\n");

    temp.chd()
        .args(&["deploy", "--artifact", "orders.zip"])
        .fails_with(2)
        .stderr_has("credentials.toml");
}
