//! Integration tests for `leap-config show` and `leap-config base`.
//!
//! Invariants:
//! - Datasource passwords never appear in stdout or stderr.

mod common;

use common::{leap_cmd, write_config};
use predicates::prelude::*;
use tempfile::TempDir;

const SECRET: &str = "s3cr3t-datasource-password";

fn app_config(dir: &TempDir) -> std::path::PathBuf {
    write_config(
        dir.path(),
        "config.xml",
        &format!(
            r#"
            <base-package>com.example.app</base-package>
            <default-locale>en_US</default-locale>
            <properties>
                <property name="db.host" value="${{host}}"/>
                <property name="mode" value="dev" if-profile="dev"/>
                <property name="mode" value="prod" if-profile="prod"/>
            </properties>
            <datasource name="main" default="true">
                <property name="url" value="jdbc:postgresql://${{host}}/app"/>
                <property name="password" value="{SECRET}"/>
            </datasource>
            "#
        ),
    )
}

#[test]
fn test_show_json_resolves_placeholders_and_redacts() {
    let dir = TempDir::new().unwrap();
    let root = app_config(&dir);

    let output = leap_cmd()
        .args(["-o", "json", "-D", "host=db.internal", "--profile", "PROD", "show"])
        .arg(&root)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains(SECRET));

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["base_package"], "com.example.app");
    assert_eq!(json["default_locale"], "en_US");
    assert_eq!(json["properties"]["db.host"], "db.internal");
    assert_eq!(json["properties"]["mode"], "prod");

    let main = &json["data_sources"]["main"];
    assert_eq!(main["default"], true);
    assert_eq!(main["password"], "<redacted>");
    assert_eq!(main["properties"]["url"], "jdbc:postgresql://db.internal/app");
}

#[test]
fn test_show_text_output() {
    let dir = TempDir::new().unwrap();
    let root = app_config(&dir);

    leap_cmd()
        .args(["-D", "host=localhost", "show"])
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("base-package: com.example.app"))
        .stdout(predicate::str::contains("db.host = localhost"))
        .stdout(predicate::str::contains("main (default)"))
        .stdout(predicate::str::contains("password = <redacted>"))
        .stdout(predicate::str::contains(SECRET).not())
        .stdout(predicate::str::contains("mode =").not());
}

#[test]
fn test_profile_from_environment() {
    let dir = TempDir::new().unwrap();
    let root = app_config(&dir);

    leap_cmd()
        .env("LEAP_PROFILE", "dev")
        .arg("show")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("profile: dev"))
        .stdout(predicate::str::contains("mode = dev"));
}

#[test]
fn test_unresolved_placeholder_is_kept() {
    let dir = TempDir::new().unwrap();
    let root = app_config(&dir);

    leap_cmd()
        .arg("show")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("db.host = ${host}"));
}

#[test]
fn test_classpath_import() {
    let dir = TempDir::new().unwrap();
    let classpath = dir.path().join("classes");
    write_config(
        &classpath,
        "conf/framework.xml",
        r#"<properties><property name="framework.version" value="1.0"/></properties>"#,
    );
    let root = write_config(
        dir.path(),
        "config.xml",
        r#"<import resource="classpath:conf/framework.xml"/>"#,
    );

    leap_cmd()
        .arg("--classpath")
        .arg(&classpath)
        .arg("show")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("framework.version = 1.0"));
}

#[test]
fn test_base_reads_only_base_settings() {
    let dir = TempDir::new().unwrap();
    let root = write_config(
        dir.path(),
        "config.xml",
        r#"
        <base-package>com.example</base-package>
        <debug>true</debug>
        <default-charset>utf8</default-charset>
        <import resource="missing.xml"/>
        "#,
    );

    let output = leap_cmd()
        .args(["-o", "json", "base"])
        .arg(&root)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["base_package"], "com.example");
    assert_eq!(json["debug"], true);
    assert_eq!(json["default_charset"], "UTF-8");
    assert!(json["default_locale"].is_null());
}
