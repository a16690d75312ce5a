//! `permissions` block reader.
//!
//! Responsibilities:
//! - Read `grant`/`deny` children, construct each permission through the
//!   `PermissionRegistry`, and merge it into the shared permission set.
//!
//! Invariants:
//! - `class`, `name` and `actions` are required; `type` defaults to `class`.
//! - A `type` classifier must be registered, constructible or not.

use super::context::LoadContext;
use super::error::ConfigError;
use super::profile::element_matches;
use crate::constants::{
    ACTIONS_ATTRIBUTE, CLASS_ATTRIBUTE, DENY_ELEMENT, GRANT_ELEMENT, NAME_ATTRIBUTE,
    TYPE_ATTRIBUTE,
};
use crate::types::{Origin, PermissionLookup, SysPermissionDefinition};
use crate::xml::XmlReader;

pub(crate) fn read_permissions(
    ctx: &mut LoadContext<'_>,
    reader: &mut XmlReader,
) -> Result<(), ConfigError> {
    if !element_matches(ctx.profile(), reader) {
        return reader.skip_element();
    }

    let depth = reader.depth();
    while reader.next_child(depth)? {
        if reader.is_start_named(GRANT_ELEMENT) {
            read_permission(ctx, reader, true)?;
        } else if reader.is_start_named(DENY_ELEMENT) {
            read_permission(ctx, reader, false)?;
        } else {
            reader.skip_element()?;
        }
    }
    Ok(())
}

fn read_permission(
    ctx: &mut LoadContext<'_>,
    reader: &mut XmlReader,
    granted: bool,
) -> Result<(), ConfigError> {
    let origin = Origin::new(
        reader.resource(),
        reader.element().map_or(0, |e| e.position()),
    );
    let location = reader.location();
    let registry = ctx.loader().permission_registry();

    let perm_type = ctx
        .attribute(reader, TYPE_ATTRIBUTE)?
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    if let Some(type_name) = &perm_type
        && !registry.contains(type_name)
    {
        return Err(ConfigError::PermissionTypeNotFound {
            type_name: type_name.clone(),
            location,
        });
    }

    let class = ctx.required_attribute(reader, CLASS_ATTRIBUTE)?;
    let name = ctx.required_attribute(reader, NAME_ATTRIBUTE)?;
    let actions = ctx.required_attribute(reader, ACTIONS_ATTRIBUTE)?;
    reader.skip_element()?;

    let permission = match registry.create(&class, &name, &actions) {
        PermissionLookup::Created(permission) => permission,
        PermissionLookup::NotFound => {
            return Err(ConfigError::PermissionClassNotFound { class, location });
        }
        PermissionLookup::NotConstructible => {
            return Err(ConfigError::PermissionNotConstructible { class, location });
        }
        PermissionLookup::Failed(cause) => {
            return Err(ConfigError::PermissionConstruction {
                class,
                location,
                cause,
            });
        }
    };

    let perm_type = perm_type.unwrap_or_else(|| class.clone());
    let definition = SysPermissionDefinition::new(location, perm_type, permission, granted)
        .with_origin(origin);
    let override_existing = ctx.is_default_override();
    ctx.config_mut().add_permission(definition, override_existing)
}
