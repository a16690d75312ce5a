//! `properties` block reader.

use super::context::LoadContext;
use super::error::ConfigError;
use super::profile::element_matches;
use crate::constants::{
    NAME_ATTRIBUTE, OVERRIDE_ATTRIBUTE, PREFIX_ATTRIBUTE, PROPERTY_ELEMENT, VALUE_ATTRIBUTE,
};
use crate::types::Origin;
use crate::xml::XmlReader;

/// Read the `property` children of a `properties` block into the shared map.
pub(crate) fn read_properties(
    ctx: &mut LoadContext<'_>,
    reader: &mut XmlReader,
) -> Result<(), ConfigError> {
    if !element_matches(ctx.profile(), reader) {
        return reader.skip_element();
    }

    let prefix = normalize_prefix(ctx.attribute(reader, PREFIX_ATTRIBUTE)?.unwrap_or_default());
    let depth = reader.depth();
    while reader.next_child(depth)? {
        if reader.is_start_named(PROPERTY_ELEMENT) {
            read_property(ctx, reader, &prefix)?;
        } else {
            reader.skip_element()?;
        }
    }
    Ok(())
}

/// A prefix ending in a letter or digit gets a `.` separator.
fn normalize_prefix(prefix: String) -> String {
    let prefix = prefix.trim();
    match prefix.chars().last() {
        Some(c) if c.is_alphanumeric() => format!("{prefix}."),
        _ => prefix.to_string(),
    }
}

fn read_property(
    ctx: &mut LoadContext<'_>,
    reader: &mut XmlReader,
    prefix: &str,
) -> Result<(), ConfigError> {
    if !element_matches(ctx.profile(), reader) {
        return reader.skip_element();
    }

    let origin = Origin::new(
        reader.resource(),
        reader.element().map_or(0, |e| e.position()),
    );
    let location = reader.location();
    let name = ctx.required_attribute(reader, NAME_ATTRIBUTE)?;
    let inherited = ctx.is_default_override();
    let override_existing = ctx.bool_attribute(reader, OVERRIDE_ATTRIBUTE, inherited)?;

    let value = match ctx.attribute(reader, VALUE_ATTRIBUTE)?.filter(|v| !v.is_empty()) {
        Some(value) => {
            reader.skip_element()?;
            value
        }
        None => ctx.text(reader)?,
    };

    let key = format!("{prefix}{name}");
    if ctx.config().contains_property(&key) {
        if ctx.config().property_origin(&key) == Some(&origin) {
            return Ok(());
        }
        if !override_existing {
            return Err(ConfigError::DuplicateProperty { key, location });
        }
        tracing::debug!("Property '{}' overridden by {}", key, location);
    }

    let value = match ctx.loader().property_processor() {
        Some(processor) => processor.process(&key, &value).unwrap_or(value),
        None => value,
    };
    ctx.config_mut().insert_property_from(key, value, origin);
    Ok(())
}
