//! Integration tests for loading an application config tree.
//!
//! These tests drive the public API the way a host bootstrap does: resolve
//! root documents, build an `AppConfigLoader` with its seams, run the base
//! pre-pass and the full load, then consume the snapshot.

use std::path::Path;
use std::sync::Arc;

use leap_config::constants::DEFAULT_NAMESPACE_URI;
use leap_config::types::AppConfigBuilder;
use leap_config::{
    AppConfigLoader, ConfigError, ErrorCategory, FileSystemResolver, PermissionRegistry,
    Resource, ResourceResolver, env_var_or_none,
};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, body: &str) -> Resource {
    let path = dir.join(name);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(
        &path,
        format!("<config xmlns=\"{DEFAULT_NAMESPACE_URI}\">{body}</config>"),
    )
    .unwrap();
    Resource::from_path(&path).unwrap()
}

/// Lay out an application with a framework default document on the classpath root.
fn application(dir: &Path) -> Resource {
    write(
        dir,
        "classpath/META-INF/leap/framework.xml",
        r#"
        <properties prefix="leap">
            <property name="version" value="1.0"/>
        </properties>
        "#,
    );
    write(
        dir,
        "app/conf/datasource.xml",
        r#"
        <datasource default="true">
            <url>jdbc:h2:mem:${app.name}</url>
            <username>sa</username>
            <password>${db.password}</password>
        </datasource>
        "#,
    );
    write(
        dir,
        "app/conf/prod.xml",
        r#"
        <properties><property name="app.mode" value="production"/></properties>
        <permissions>
            <deny class="app.Perm" name="console" actions="*"/>
        </permissions>
        "#,
    );
    write(
        dir,
        "app/config.xml",
        r#"
        <base-package>com.example.shop</base-package>
        <default-charset>UTF-8</default-charset>
        <import resource="classpath:META-INF/leap/framework.xml"/>
        <properties>
            <property name="app.name" value="shop"/>
            <property name="app.mode" value="development"/>
        </properties>
        <import resource="conf/datasource.xml"/>
        <permissions>
            <grant class="app.Perm" name="console" actions="*"/>
            <grant class="app.Perm" name="orders" actions="read"/>
        </permissions>
        <import resource="conf/prod.xml" if-profile="prod" default-override="true"/>
        "#,
    )
}

fn loader(dir: &Path) -> AppConfigLoader {
    let resolver = FileSystemResolver::new().with_root(dir.join("classpath"));
    AppConfigLoader::new(Arc::new(resolver))
        .with_external_properties([("db.password", "pw")])
        .with_permission_registry(PermissionRegistry::new().register_named("app.Perm"))
}

#[test]
fn test_full_application_load_for_prod() {
    let dir = TempDir::new().unwrap();
    let root = application(dir.path());

    let config = loader(dir.path()).with_profile("prod").load(&[root]).unwrap();

    assert_eq!(config.base_package(), Some("com.example.shop"));
    assert_eq!(config.property("leap.version"), Some("1.0"));
    assert_eq!(config.property("app.mode"), Some("production"));

    let (name, ds) = config.default_data_source().unwrap();
    assert_eq!(name, "default");
    assert_eq!(ds.url(), Some("jdbc:h2:mem:shop"));

    let permissions: Vec<String> = config.permissions().iter().map(|p| p.to_string()).collect();
    assert_eq!(
        permissions,
        vec![
            "grant app.Perm(orders, read)".to_string(),
            "deny app.Perm(console, *)".to_string(),
        ]
    );
}

#[test]
fn test_full_application_load_for_dev() {
    let dir = TempDir::new().unwrap();
    let root = application(dir.path());

    let config = loader(dir.path()).with_profile("dev").load(&[root]).unwrap();
    assert_eq!(config.property("app.mode"), Some("development"));
    assert_eq!(config.permissions().len(), 2);
    assert!(config.permissions().iter().all(|p| p.is_granted()));
}

#[test]
fn test_snapshot_serializes_without_secrets() {
    let dir = TempDir::new().unwrap();
    let root = application(dir.path());

    let config = loader(dir.path()).load(&[root]).unwrap();
    let json = serde_json::to_value(&config).unwrap();

    assert_eq!(json["base_package"], "com.example.shop");
    assert_eq!(json["default_charset"], "UTF-8");
    assert_eq!(json["data_sources"]["default"]["password"], "<redacted>");
    assert!(!json.to_string().contains("\"pw\""));
}

#[test]
fn test_bootstrap_pre_pass_then_load() {
    let dir = TempDir::new().unwrap();
    let root = application(dir.path());
    let loader = loader(dir.path());

    let mut builder = AppConfigBuilder::new();
    loader.load_base_properties(&mut builder, &root).unwrap();
    assert_eq!(builder.base_package(), Some("com.example.shop"));
    assert!(builder.properties().is_empty());

    loader.load_into(&mut builder, &[root]).unwrap();
    let config = builder.build();
    assert_eq!(config.default_charset().unwrap().name(), "UTF-8");
    assert_eq!(config.property("app.name"), Some("shop"));
}

#[test]
fn test_errors_carry_location_and_category() {
    let dir = TempDir::new().unwrap();
    let root = write(dir.path(), "bad.xml", r#"<import resource="nowhere.xml"/>"#);

    let err = AppConfigLoader::default().load(&[root.clone()]).unwrap_err();
    assert!(matches!(err, ConfigError::ImportNotFound { .. }));
    assert_eq!(err.category(), ErrorCategory::Reference);
    assert!(err.location().unwrap().starts_with(root.location()));
    assert!(err.to_string().contains("nowhere.xml"));
}

#[test]
fn test_resolver_is_usable_directly() {
    let dir = TempDir::new().unwrap();
    let root = application(dir.path());
    let resolver = FileSystemResolver::new().with_root(dir.path().join("classpath"));

    let framework = resolver
        .resolve(&root, "classpath:META-INF/leap/framework.xml")
        .unwrap();
    assert!(resolver.exists(&framework));
    assert!(framework.location().ends_with("/META-INF/leap/framework.xml"));
}

/// Test that env_var_or_none is exported and filters blank values
#[test]
fn test_env_var_or_none_exported() {
    temp_env::with_var("LEAP_INTEGRATION_BLANK", Some(""), || {
        assert_eq!(env_var_or_none("LEAP_INTEGRATION_BLANK"), None);
    });
}
