//! Runtime version resolution specs
//!
//! Precedence: flag or `[deploy] mule_version`, then the runtime core
//! dependency, then the `mule.version` build property, then 3.3.1.

use crate::prelude::*;

#[test]
fn defaults_without_any_config() {
    let temp = Project::empty();

    temp.chd()
        .args(&["resolve-version"])
        .passes()
        .stdout_eq("3.3.1\n");
}

#[test]
fn uses_build_property() {
    let temp = Project::empty();
    temp.file(
        "cloudhub.toml",
        r#"
[project.properties]
"mule.version" = "3.4.0"
"#,
    );

    temp.chd()
        .args(&["resolve-version"])
        .passes()
        .stdout_eq("3.4.0\n");
}

#[test]
fn runtime_dependency_wins_over_build_property() {
    let temp = Project::empty();
    temp.file(
        "cloudhub.toml",
        r#"
[project.properties]
"mule.version" = "3.4.0"

[[project.dependencies]]
group_id = "org.mule"
artifact_id = "mule-core"
version = "3.5.1"
"#,
    );

    temp.chd()
        .args(&["resolve-version"])
        .passes()
        .stdout_eq("3.5.1\n");
}

#[test]
fn flag_wins_over_project() {
    let temp = Project::empty();
    temp.file(
        "cloudhub.toml",
        r#"
[deploy]
mule_version = "3.5.0"

[project.properties]
"mule.version" = "3.4.0"
"#,
    );

    temp.chd()
        .args(&["resolve-version", "--mule-version", "3.7.0"])
        .passes()
        .stdout_eq("3.7.0\n");
    temp.chd()
        .args(&["resolve-version"])
        .passes()
        .stdout_eq("3.5.0\n");
}

#[test]
fn explicit_config_must_exist() {
    let temp = Project::empty();

    temp.chd()
        .args(&["resolve-version", "--config", "missing.toml"])
        .fails_with(2)
        .stderr_has("config file not found");
}

#[test]
fn malformed_config_is_reported() {
    let temp = Project::empty();
    temp.file("cloudhub.toml", "[deploy]\nworkers = \"many\"\n");

    temp.chd()
        .args(&["resolve-version"])
        .fails_with(2)
        .stderr_has("invalid config");
}
