//! System permissions declared in `<permissions>` blocks.
//!
//! Responsibilities:
//! - Define the `SysPermission` trait and the stock `NamedPermission`.
//! - Map permission class names to constructors through `PermissionRegistry`.
//! - Merge definitions keyed by (classifier type, permission name) in `PermissionSet`.
//!
//! Does NOT handle:
//! - Evaluating permissions at runtime; consumers iterate the ordered list first-fit.
//!
//! Invariants:
//! - `PermissionSet` holds at most one definition per (type, name).
//! - An overriding definition takes the position of its declaration, not of the
//!   definition it replaced.
//! - Only definitions read from a document element carry an `Origin`; a
//!   definition without one always goes through the duplicate/override rule.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::ser::SerializeStruct;

use super::app_config::Origin;
use crate::loader::{BoxError, ConfigError};

/// A permission instance constructed from `(name, actions)`.
pub trait SysPermission: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn actions(&self) -> &str;
}

/// A permission that only records its name and actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedPermission {
    name: String,
    actions: String,
}

impl NamedPermission {
    pub fn new(name: impl Into<String>, actions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: actions.into(),
        }
    }
}

impl SysPermission for NamedPermission {
    fn name(&self) -> &str {
        &self.name
    }

    fn actions(&self) -> &str {
        &self.actions
    }
}

/// Constructor registered for a permission class name.
pub type PermissionFactory =
    Arc<dyn Fn(&str, &str) -> Result<Arc<dyn SysPermission>, BoxError> + Send + Sync>;

#[derive(Clone)]
enum PermissionClass {
    Constructible(PermissionFactory),
    ClassifierOnly,
}

/// How a permission class name resolved.
#[derive(Debug)]
pub enum PermissionLookup {
    NotFound,
    NotConstructible,
    Created(Arc<dyn SysPermission>),
    Failed(BoxError),
}

/// Registry of permission classes, populated by the host before loading.
#[derive(Clone, Default)]
pub struct PermissionRegistry {
    classes: HashMap<String, PermissionClass>,
}

impl PermissionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructible permission class.
    pub fn register<F>(mut self, class: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&str, &str) -> Result<Arc<dyn SysPermission>, BoxError> + Send + Sync + 'static,
    {
        self.classes
            .insert(class.into(), PermissionClass::Constructible(Arc::new(factory)));
        self
    }

    /// Register `class` as a `NamedPermission` constructor.
    pub fn register_named(self, class: impl Into<String>) -> Self {
        self.register(class, |name, actions| {
            Ok(Arc::new(NamedPermission::new(name, actions)) as Arc<dyn SysPermission>)
        })
    }

    /// Register a class usable only as a `type` classifier.
    pub fn register_classifier(mut self, class: impl Into<String>) -> Self {
        self.classes
            .entry(class.into())
            .or_insert(PermissionClass::ClassifierOnly);
        self
    }

    /// Whether `class` is known, constructible or not.
    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    /// Construct an instance of `class`.
    pub fn create(&self, class: &str, name: &str, actions: &str) -> PermissionLookup {
        match self.classes.get(class) {
            None => PermissionLookup::NotFound,
            Some(PermissionClass::ClassifierOnly) => PermissionLookup::NotConstructible,
            Some(PermissionClass::Constructible(factory)) => match factory(name, actions) {
                Ok(permission) => PermissionLookup::Created(permission),
                Err(e) => PermissionLookup::Failed(e),
            },
        }
    }
}

impl fmt::Debug for PermissionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.classes.keys().collect();
        names.sort();
        f.debug_struct("PermissionRegistry")
            .field("classes", &names)
            .finish()
    }
}

/// A permission as declared: where, under which classifier, granted or denied.
#[derive(Debug, Clone)]
pub struct SysPermissionDefinition {
    source: String,
    origin: Option<Origin>,
    perm_type: String,
    permission: Arc<dyn SysPermission>,
    granted: bool,
}

impl SysPermissionDefinition {
    pub fn new(
        source: impl Into<String>,
        perm_type: impl Into<String>,
        permission: Arc<dyn SysPermission>,
        granted: bool,
    ) -> Self {
        Self {
            source: source.into(),
            origin: None,
            perm_type: perm_type.into(),
            permission,
            granted,
        }
    }

    /// Tie the definition to the document element that declared it.
    pub(crate) fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Diagnostic location of the declaration.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The element that declared this permission, if it came from a document.
    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    /// Classifier type; the concrete class unless `type` was given.
    pub fn perm_type(&self) -> &str {
        &self.perm_type
    }

    pub fn permission(&self) -> &Arc<dyn SysPermission> {
        &self.permission
    }

    pub fn is_granted(&self) -> bool {
        self.granted
    }

    fn same_key(&self, other: &SysPermissionDefinition) -> bool {
        self.perm_type == other.perm_type && self.permission.name() == other.permission.name()
    }
}

impl fmt::Display for SysPermissionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}({}, {})",
            if self.granted { "grant" } else { "deny" },
            self.perm_type,
            self.permission.name(),
            self.permission.actions()
        )
    }
}

impl Serialize for SysPermissionDefinition {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SysPermissionDefinition", 5)?;
        state.serialize_field("type", &self.perm_type)?;
        state.serialize_field("name", self.permission.name())?;
        state.serialize_field("actions", self.permission.actions())?;
        state.serialize_field("granted", &self.granted)?;
        state.serialize_field("source", &self.source)?;
        state.end()
    }
}

#[derive(Debug, Clone)]
struct Declared {
    source: String,
    origin: Option<Origin>,
}

impl Declared {
    /// Whether `permission` is this very element read again.
    fn is_reread_of(&self, permission: &SysPermissionDefinition) -> bool {
        self.origin.is_some() && self.origin == permission.origin
    }
}

/// Ordered permission definitions with a type-partitioned duplicate index.
#[derive(Debug, Clone, Default)]
pub struct PermissionSet {
    ordered: Vec<SysPermissionDefinition>,
    by_type: HashMap<String, HashMap<String, Declared>>,
}

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one definition.
    ///
    /// A definition with the same (type, name) as an existing one is an error
    /// unless `override_existing`, in which case the old entry is removed and the
    /// new one appended. Re-adding a definition whose `Origin` equals the existing
    /// one is a no-op; definitions without an origin never match that way.
    pub fn add(
        &mut self,
        permission: SysPermissionDefinition,
        override_existing: bool,
    ) -> Result<(), ConfigError> {
        let names = self.by_type.entry(permission.perm_type.clone()).or_default();

        if let Some(existing) = names.get(permission.permission.name()) {
            if existing.is_reread_of(&permission) {
                return Ok(());
            }
            if !override_existing {
                return Err(ConfigError::DuplicatePermission {
                    permission: permission.to_string(),
                    location: permission.source.clone(),
                    existing: existing.source.clone(),
                });
            }
            tracing::debug!(
                "Permission '{}' overrides definition from {}",
                permission,
                existing.source
            );
            self.ordered.retain(|p| !p.same_key(&permission));
        }

        names.insert(
            permission.permission.name().to_string(),
            Declared {
                source: permission.source.clone(),
                origin: permission.origin.clone(),
            },
        );
        self.ordered.push(permission);
        Ok(())
    }

    /// Merge a batch through the same rule as [`PermissionSet::add`].
    pub fn add_all<I>(&mut self, permissions: I, override_existing: bool) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = SysPermissionDefinition>,
    {
        for permission in permissions {
            self.add(permission, override_existing)?;
        }
        Ok(())
    }

    pub fn as_slice(&self) -> &[SysPermissionDefinition] {
        &self.ordered
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn into_vec(self) -> Vec<SysPermissionDefinition> {
        self.ordered
    }
}
