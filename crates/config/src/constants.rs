//! Centralized constants for the configuration loader.
//!
//! This module contains the XML vocabulary of config documents and the
//! defaults applied when a document leaves a value unspecified.

// =============================================================================
// Namespaces
// =============================================================================

/// Namespace URI of the framework's own config elements.
///
/// Elements bound to any other namespace are routed to extension processors.
pub const DEFAULT_NAMESPACE_URI: &str = "http://www.leapframework.org/schema/config";

// =============================================================================
// Elements
// =============================================================================

pub const CONFIG_ELEMENT: &str = "config";
pub const BASE_PACKAGE_ELEMENT: &str = "base-package";
pub const ADDITIONAL_PACKAGES_ELEMENT: &str = "additional-packages";
pub const DEBUG_ELEMENT: &str = "debug";
pub const DEFAULT_LOCALE_ELEMENT: &str = "default-locale";
pub const DEFAULT_CHARSET_ELEMENT: &str = "default-charset";
pub const DATASOURCE_ELEMENT: &str = "datasource";
pub const IMPORT_ELEMENT: &str = "import";
pub const PROPERTIES_ELEMENT: &str = "properties";
pub const PROPERTY_ELEMENT: &str = "property";
pub const PERMISSIONS_ELEMENT: &str = "permissions";
pub const GRANT_ELEMENT: &str = "grant";
pub const DENY_ELEMENT: &str = "deny";
pub const RESOURCES_ELEMENT: &str = "resources";

// =============================================================================
// Attributes
// =============================================================================

pub const RESOURCE_ATTRIBUTE: &str = "resource";
pub const IF_PROFILE_ATTRIBUTE: &str = "if-profile";
pub const OVERRIDE_ATTRIBUTE: &str = "override";
pub const DEFAULT_OVERRIDE_ATTRIBUTE: &str = "default-override";
pub const PREFIX_ATTRIBUTE: &str = "prefix";
pub const TYPE_ATTRIBUTE: &str = "type";
pub const DEFAULT_ATTRIBUTE: &str = "default";
pub const CLASS_ATTRIBUTE: &str = "class";
pub const ACTIONS_ATTRIBUTE: &str = "actions";
pub const CHECK_EXISTENCE_ATTRIBUTE: &str = "check-existence";
pub const NAME_ATTRIBUTE: &str = "name";
pub const VALUE_ATTRIBUTE: &str = "value";
pub const LOCATION_ATTRIBUTE: &str = "location";

// =============================================================================
// Defaults
// =============================================================================

/// Name given to a `<datasource>` that does not declare one.
pub const DEFAULT_DATASOURCE_NAME: &str = "default";

/// Datasource property key whose value is held as a secret.
pub const DATASOURCE_PASSWORD_KEY: &str = "password";

/// Environment variable consulted by [`crate::profile_from_env`].
pub const PROFILE_ENV_VAR: &str = "LEAP_PROFILE";

/// Prefix that marks a resource name as relative to the resolver's root directories.
pub const CLASSPATH_PREFIX: &str = "classpath:";

/// Multi-root variant of [`CLASSPATH_PREFIX`] used by scan patterns.
pub const CLASSPATH_ALL_PREFIX: &str = "classpath*:";

/// URL prefix of resources shipped by the framework itself (logged at trace level).
pub const FRAMEWORK_RESOURCE_MARKER: &str = "/META-INF/leap/";

pub const PLACEHOLDER_PREFIX: &str = "${";
pub const PLACEHOLDER_SUFFIX: &str = "}";
