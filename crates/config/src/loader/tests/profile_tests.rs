//! Profile gating tests.
//!
//! Responsibilities:
//! - Test that `if-profile` skips whole subtrees, including their side effects.
//! - Test case-insensitive matching and behavior with no active profile.

use tempfile::TempDir;

use super::write_config;
use crate::loader::builder::AppConfigLoader;

const GATED: &str = r#"
    <properties if-profile="prod"><property name="stage" value="prod"/></properties>
    <properties if-profile="dev"><property name="stage" value="dev"/></properties>
    <datasource name="prod-db" if-profile="prod"><url>jdbc:prod</url></datasource>
    <config if-profile="prod">
        <base-package>com.prod</base-package>
        <import resource="missing.xml"/>
    </config>
    <properties>
        <property name="feature" value="on" if-profile="prod"/>
        <property name="always" value="yes"/>
    </properties>
"#;

#[test]
fn test_non_matching_profile_skips_subtree() {
    let dir = TempDir::new().unwrap();
    let root = write_config(dir.path(), "app.xml", GATED);

    let config = AppConfigLoader::default()
        .with_profile("dev")
        .load(&[root])
        .unwrap();
    assert_eq!(config.property("stage"), Some("dev"));
    assert_eq!(config.property("feature"), None);
    assert_eq!(config.property("always"), Some("yes"));
    assert!(config.data_source_config("prod-db").is_none());
    assert_eq!(config.base_package(), None);
    assert_eq!(config.profile(), Some("dev"));
}

#[test]
fn test_matching_profile_is_case_insensitive() {
    let dir = TempDir::new().unwrap();
    let root = write_config(
        dir.path(),
        "app.xml",
        r#"
        <properties if-profile="prod"><property name="stage" value="prod"/></properties>
        <datasource name="prod-db" if-profile="Prod"><url>jdbc:prod</url></datasource>
        "#,
    );

    let config = AppConfigLoader::default()
        .with_profile("PROD")
        .load(&[root])
        .unwrap();
    assert_eq!(config.property("stage"), Some("prod"));
    assert!(config.data_source_config("prod-db").is_some());
}

#[test]
fn test_gated_elements_skipped_without_profile() {
    let dir = TempDir::new().unwrap();
    let root = write_config(dir.path(), "app.xml", GATED);

    let config = AppConfigLoader::default().load(&[root]).unwrap();
    assert_eq!(config.property("stage"), None);
    assert_eq!(config.property("always"), Some("yes"));
    assert_eq!(config.profile(), None);
}

#[test]
fn test_root_if_profile_is_evaluated() {
    let dir = TempDir::new().unwrap();
    let root = super::write_raw(
        dir.path(),
        "app.xml",
        r#"<config if-profile="test"><base-package>com.test</base-package></config>"#,
    );

    let loader = AppConfigLoader::default().with_profile("dev");
    let config = loader.load(&[root.clone()]).unwrap();
    assert_eq!(config.base_package(), None);

    let loader = AppConfigLoader::default().with_profile("test");
    let config = loader.load(&[root]).unwrap();
    assert_eq!(config.base_package(), Some("com.test"));
}

#[test]
fn test_gated_import_is_not_followed() {
    let dir = TempDir::new().unwrap();
    let root = write_config(
        dir.path(),
        "app.xml",
        r#"<import resource="missing.xml" if-profile="prod"/>"#,
    );

    assert!(AppConfigLoader::default().with_profile("dev").load(&[root]).is_ok());
}

#[test]
fn test_blank_profile_means_none() {
    let loader = AppConfigLoader::default().with_profile("   ");
    assert_eq!(loader.profile(), None);
}
