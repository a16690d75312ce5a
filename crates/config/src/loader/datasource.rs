//! `datasource` block reader.
//!
//! Child elements become builder properties: `<property name=".." value=".."/>`
//! explicitly, any other element by its local name and trimmed text.

use super::context::LoadContext;
use super::error::ConfigError;
use super::profile::element_matches;
use crate::constants::{
    DEFAULT_ATTRIBUTE, DEFAULT_DATASOURCE_NAME, NAME_ATTRIBUTE, PROPERTY_ELEMENT, TYPE_ATTRIBUTE,
    VALUE_ATTRIBUTE,
};
use crate::types::{DataSourceConfig, Origin};
use crate::xml::XmlReader;

pub(crate) fn read_data_source(
    ctx: &mut LoadContext<'_>,
    reader: &mut XmlReader,
) -> Result<(), ConfigError> {
    if !element_matches(ctx.profile(), reader) {
        return reader.skip_element();
    }

    let origin = Origin::new(
        reader.resource(),
        reader.element().map_or(0, |e| e.position()),
    );
    let name = ctx
        .attribute(reader, NAME_ATTRIBUTE)?
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_DATASOURCE_NAME.to_string());

    let mut builder = DataSourceConfig::builder();
    builder
        .set_data_source_type(ctx.attribute(reader, TYPE_ATTRIBUTE)?)
        .set_default(ctx.bool_attribute(reader, DEFAULT_ATTRIBUTE, false)?);

    let depth = reader.depth();
    while reader.next_child(depth)? {
        if reader.is_start_named(PROPERTY_ELEMENT) {
            let key = ctx.required_attribute(reader, NAME_ATTRIBUTE)?;
            let value = match ctx.attribute(reader, VALUE_ATTRIBUTE)?.filter(|v| !v.is_empty()) {
                Some(value) => {
                    reader.skip_element()?;
                    value
                }
                None => ctx.text(reader)?,
            };
            builder.set_property(key, value);
        } else {
            let key = reader.local_name().unwrap_or_default().to_string();
            let value = ctx.text(reader)?;
            builder.set_property(key, value);
        }
    }

    ctx.set_data_source_config_from(name, builder.build(), origin)
}
