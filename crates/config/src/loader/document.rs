//! Config document processing.
//!
//! Responsibilities:
//! - Open one resource, require a single root `config` element, and walk its
//!   children in document order.
//! - Apply base settings, nested config blocks, resource scans and imports.
//! - Route `properties`, `datasource` and `permissions` blocks to their readers and
//!   foreign-namespace elements to the registered extension processors.
//!
//! Does NOT handle:
//! - Cross-document accumulation rules (see `types::AppConfigBuilder`).
//!
//! Invariants:
//! - The XML reader is owned by `read_resource`, so the document handle is released
//!   on every exit path.
//! - A resource is pushed on the context chain for exactly the duration of its load.
//! - Elements of the framework namespace that are not recognized are skipped.

use super::context::LoadContext;
use super::datasource::read_data_source;
use super::error::ConfigError;
use super::permissions::read_permissions;
use super::profile::element_matches;
use super::properties::read_properties;
use crate::constants::{
    ADDITIONAL_PACKAGES_ELEMENT, BASE_PACKAGE_ELEMENT, CHECK_EXISTENCE_ATTRIBUTE, CONFIG_ELEMENT,
    DATASOURCE_ELEMENT, DEBUG_ELEMENT, DEFAULT_CHARSET_ELEMENT, DEFAULT_LOCALE_ELEMENT,
    DEFAULT_NAMESPACE_URI, DEFAULT_OVERRIDE_ATTRIBUTE, FRAMEWORK_RESOURCE_MARKER, IMPORT_ELEMENT,
    LOCATION_ATTRIBUTE, PERMISSIONS_ELEMENT, PROPERTIES_ELEMENT, RESOURCE_ATTRIBUTE,
    RESOURCES_ELEMENT,
};
use crate::resource::Resource;
use crate::types::{Charset, Locale, Origin, parse_bool};
use crate::xml::XmlReader;

/// Reader for the children of a root `config` element.
type ConfigReader =
    fn(&mut LoadContext<'_>, &mut XmlReader, &Resource) -> Result<(), ConfigError>;

/// Load `resource` and everything it imports.
pub(crate) fn load_resource(
    ctx: &mut LoadContext<'_>,
    resource: &Resource,
) -> Result<(), ConfigError> {
    let location = resource.location();
    if location.contains(FRAMEWORK_RESOURCE_MARKER) {
        tracing::trace!("Load config: {}, profile: {:?}", location, ctx.profile());
    } else {
        tracing::debug!("Load config: {}, profile: {:?}", location, ctx.profile());
    }

    ctx.enter(location)?;
    let result = read_resource(ctx, resource, read_config);
    ctx.leave();
    result
}

/// Read only the base settings of `resource`.
pub(crate) fn load_base_resource(
    ctx: &mut LoadContext<'_>,
    resource: &Resource,
) -> Result<(), ConfigError> {
    tracing::trace!("Load base settings: {}", resource.location());
    read_resource(ctx, resource, read_base_config)
}

fn read_resource(
    ctx: &mut LoadContext<'_>,
    resource: &Resource,
    read: ConfigReader,
) -> Result<(), ConfigError> {
    let source = ctx.loader().resolver().open(resource)?;
    let mut reader = XmlReader::new(resource.location(), source);

    if !reader.next_start()? || !is_config_element(&reader) {
        return Err(ConfigError::NoRootElement {
            location: resource.location().to_string(),
        });
    }

    read(ctx, &mut reader, resource)
}

fn is_config_element(reader: &XmlReader) -> bool {
    reader.local_name() == Some(CONFIG_ELEMENT) && foreign_namespace(reader).is_none()
}

/// Namespace of the element under the cursor when it is not the framework's own.
fn foreign_namespace(reader: &XmlReader) -> Option<String> {
    reader
        .namespace()
        .filter(|ns| *ns != DEFAULT_NAMESPACE_URI)
        .map(str::to_string)
}

fn read_config(
    ctx: &mut LoadContext<'_>,
    reader: &mut XmlReader,
    resource: &Resource,
) -> Result<(), ConfigError> {
    if !element_matches(ctx.profile(), reader) {
        return reader.skip_element();
    }

    let depth = reader.depth();
    while reader.next_child(depth)? {
        if let Some(namespace) = foreign_namespace(reader) {
            process_extension(ctx, reader, namespace)?;
            continue;
        }

        let name = reader.local_name().unwrap_or_default().to_string();
        match name.as_str() {
            CONFIG_ELEMENT => read_config(ctx, reader, resource)?,
            BASE_PACKAGE_ELEMENT => read_base_package(ctx, reader)?,
            DEBUG_ELEMENT | DEFAULT_LOCALE_ELEMENT | DEFAULT_CHARSET_ELEMENT => {
                read_base_setting(ctx, reader, &name)?
            }
            ADDITIONAL_PACKAGES_ELEMENT => {
                let text = ctx.text(reader)?;
                ctx.config_mut().add_additional_packages(
                    text.split([',', '\n', '\r'])
                        .map(str::trim)
                        .filter(|p| !p.is_empty()),
                );
            }
            RESOURCES_ELEMENT => read_resources(ctx, reader, resource)?,
            IMPORT_ELEMENT => read_import(ctx, reader, resource)?,
            PROPERTIES_ELEMENT => read_properties(ctx, reader)?,
            DATASOURCE_ELEMENT => read_data_source(ctx, reader)?,
            PERMISSIONS_ELEMENT => read_permissions(ctx, reader)?,
            _ => reader.skip_element()?,
        }
    }
    Ok(())
}

/// Pre-pass: base settings and nested config blocks only.
fn read_base_config(
    ctx: &mut LoadContext<'_>,
    reader: &mut XmlReader,
    resource: &Resource,
) -> Result<(), ConfigError> {
    if !element_matches(ctx.profile(), reader) {
        return reader.skip_element();
    }

    let depth = reader.depth();
    while reader.next_child(depth)? {
        if foreign_namespace(reader).is_some() {
            reader.skip_element()?;
            continue;
        }

        let name = reader.local_name().unwrap_or_default().to_string();
        match name.as_str() {
            CONFIG_ELEMENT => read_base_config(ctx, reader, resource)?,
            BASE_PACKAGE_ELEMENT => read_base_package(ctx, reader)?,
            DEBUG_ELEMENT | DEFAULT_LOCALE_ELEMENT | DEFAULT_CHARSET_ELEMENT => {
                read_base_setting(ctx, reader, &name)?
            }
            _ => reader.skip_element()?,
        }
    }
    Ok(())
}

fn process_extension(
    ctx: &mut LoadContext<'_>,
    reader: &mut XmlReader,
    namespace: String,
) -> Result<(), ConfigError> {
    let Some(processor) = ctx.loader().processors().get(&namespace) else {
        return Err(ConfigError::UnsupportedNamespace {
            namespace,
            location: reader.location(),
        });
    };
    processor.process_element(ctx, reader)
}

fn read_base_package(ctx: &mut LoadContext<'_>, reader: &mut XmlReader) -> Result<(), ConfigError> {
    let value = ctx.text(reader)?;
    if !value.is_empty() {
        ctx.config_mut().set_base_package(value);
    }
    Ok(())
}

fn read_base_setting(
    ctx: &mut LoadContext<'_>,
    reader: &mut XmlReader,
    name: &str,
) -> Result<(), ConfigError> {
    let origin = Origin::new(
        reader.resource(),
        reader.element().map_or(0, |e| e.position()),
    );
    let location = reader.location();
    let value = ctx.text(reader)?;
    if value.is_empty() {
        return Ok(());
    }

    let invalid = |message: String| ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.clone(),
        message,
        location: location.clone(),
    };

    match name {
        DEBUG_ELEMENT => {
            let debug = parse_bool(&value).ok_or_else(|| invalid("must be a boolean".into()))?;
            ctx.config_mut().set_debug(debug, origin)
        }
        DEFAULT_LOCALE_ELEMENT => {
            let locale = value.parse::<Locale>().map_err(invalid)?;
            ctx.config_mut().set_default_locale(locale, origin)
        }
        DEFAULT_CHARSET_ELEMENT => {
            let charset = value.parse::<Charset>().map_err(invalid)?;
            ctx.config_mut().set_default_charset(charset, origin)
        }
        _ => Ok(()),
    }
}

fn read_resources(
    ctx: &mut LoadContext<'_>,
    reader: &mut XmlReader,
    resource: &Resource,
) -> Result<(), ConfigError> {
    if element_matches(ctx.profile(), reader) {
        let pattern = ctx.required_attribute(reader, LOCATION_ATTRIBUTE)?;
        let found = ctx.loader().resolver().scan(resource, &pattern)?;
        tracing::trace!("Found {} resource(s) for '{}'", found.len(), pattern);
        ctx.config_mut().add_resources(found);
    }
    reader.skip_element()
}

fn read_import(
    ctx: &mut LoadContext<'_>,
    reader: &mut XmlReader,
    resource: &Resource,
) -> Result<(), ConfigError> {
    if !element_matches(ctx.profile(), reader) {
        return reader.skip_element();
    }

    let check_existence = ctx.bool_attribute(reader, CHECK_EXISTENCE_ATTRIBUTE, true)?;
    let inherited = ctx.is_default_override();
    let default_override = ctx.bool_attribute(reader, DEFAULT_OVERRIDE_ATTRIBUTE, inherited)?;
    let name = ctx.required_attribute(reader, RESOURCE_ATTRIBUTE)?;
    let location = reader.location();
    reader.skip_element()?;

    let resolver = ctx.loader().resolver();
    match resolver.resolve(resource, &name).filter(|r| resolver.exists(r)) {
        Some(imported) => load_resource(&mut ctx.child(default_override), &imported),
        None if check_existence => Err(ConfigError::ImportNotFound {
            resource: name,
            location,
        }),
        None => {
            tracing::trace!("Ignore missing import '{}' at {}", name, location);
            Ok(())
        }
    }
}
