//! Datasource configuration collected from `<datasource>` blocks.
//!
//! Responsibilities:
//! - Accumulate arbitrary key/value properties through `DataSourceConfigBuilder`.
//! - Freeze them into an immutable `DataSourceConfig`.
//!
//! Does NOT handle:
//! - Opening connections or interpreting driver-specific keys.
//!
//! Invariants:
//! - The `password` key is stored as a `SecretString` and never appears in
//!   `Debug` output or serialized form.

use std::collections::BTreeMap;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::ser::SerializeStruct;

use crate::constants::DATASOURCE_PASSWORD_KEY;

/// Immutable datasource settings.
#[derive(Clone)]
pub struct DataSourceConfig {
    data_source_type: Option<String>,
    default: bool,
    password: Option<SecretString>,
    properties: BTreeMap<String, String>,
}

impl DataSourceConfig {
    pub fn builder() -> DataSourceConfigBuilder {
        DataSourceConfigBuilder::default()
    }

    /// Implementation type from the `type` attribute.
    pub fn data_source_type(&self) -> Option<&str> {
        self.data_source_type.as_deref()
    }

    pub fn is_default(&self) -> bool {
        self.default
    }

    /// Non-secret properties, sorted by key.
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn password(&self) -> Option<&SecretString> {
        self.password.as_ref()
    }

    pub fn driver_class_name(&self) -> Option<&str> {
        self.property("driver-class-name")
            .or_else(|| self.property("driverClassName"))
    }

    pub fn url(&self) -> Option<&str> {
        self.property("url").or_else(|| self.property("jdbc-url"))
    }

    pub fn username(&self) -> Option<&str> {
        self.property("username")
    }
}

impl fmt::Debug for DataSourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSourceConfig")
            .field("data_source_type", &self.data_source_type)
            .field("default", &self.default)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("properties", &self.properties)
            .finish()
    }
}

impl Serialize for DataSourceConfig {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DataSourceConfig", 4)?;
        state.serialize_field("type", &self.data_source_type)?;
        state.serialize_field("default", &self.default)?;
        state.serialize_field("password", &self.password.as_ref().map(|_| "<redacted>"))?;
        state.serialize_field("properties", &self.properties)?;
        state.end()
    }
}

impl PartialEq for DataSourceConfig {
    fn eq(&self, other: &Self) -> bool {
        self.data_source_type == other.data_source_type
            && self.default == other.default
            && self.properties == other.properties
            && self.password.as_ref().map(|p| p.expose_secret().to_string())
                == other.password.as_ref().map(|p| p.expose_secret().to_string())
    }
}

/// Accumulates datasource settings by property name.
#[derive(Default)]
pub struct DataSourceConfigBuilder {
    data_source_type: Option<String>,
    default: bool,
    password: Option<SecretString>,
    properties: BTreeMap<String, String>,
}

impl DataSourceConfigBuilder {
    pub fn set_data_source_type(&mut self, data_source_type: Option<String>) -> &mut Self {
        self.data_source_type = data_source_type.filter(|t| !t.is_empty());
        self
    }

    pub fn set_default(&mut self, default: bool) -> &mut Self {
        self.default = default;
        self
    }

    /// Set a property; the last value written for a key wins.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        if key == DATASOURCE_PASSWORD_KEY {
            self.password = Some(SecretString::new(value.into()));
        } else {
            self.properties.insert(key, value);
        }
        self
    }

    pub fn build(self) -> DataSourceConfig {
        DataSourceConfig {
            data_source_type: self.data_source_type,
            default: self.default,
            password: self.password,
            properties: self.properties,
        }
    }
}
