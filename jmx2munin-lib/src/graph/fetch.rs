use super::{FieldProperties, GraphConfig};
use crate::Result;
use crate::output::{UNKNOWN, format_number};
use crate::registry::{AttributeSource, AttributeValue};
use ohno::{IntoAppError, app_err, bail};
use std::io::Write;

const LOG_TARGET: &str = "     graph";

/// Read and print the value of every field in `config` as `field.value v`.
///
/// A field that cannot be read is logged and left out. Returns the number of fields printed.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn fetch_fields<S, W>(config: &GraphConfig, source: &mut S, writer: &mut W) -> Result<usize>
where
    S: AttributeSource + ?Sized,
    W: Write,
{
    let mut printed = 0;

    for field in config.fields() {
        match field_value(field, source) {
            Ok(value) => {
                writeln!(writer, "{}.value {value}", field.name()).into_app_err("writing field values")?;
                printed += 1;
            }
            Err(e) => log::warn!(target: LOG_TARGET, "Skipping field '{}': {e:#}", field.name()),
        }
    }

    Ok(printed)
}

fn field_value<S: AttributeSource + ?Sized>(field: &FieldProperties, source: &mut S) -> Result<String> {
    let name = field.object_name().ok_or_else(|| app_err!("no jmxObjectName configured"))?;
    let attribute = field.attribute_name().ok_or_else(|| app_err!("no jmxAttributeName configured"))?;

    match source.attribute_value(name, attribute)? {
        AttributeValue::Mapping(entries) => {
            let Some(key) = field.attribute_key() else {
                bail!("'{attribute}' of '{name}' is a composite value but no jmxAttributeKey is configured");
            };

            let Some((_, value)) = entries.iter().find(|(k, _)| k == key) else {
                bail!("'{attribute}' of '{name}' has no entry '{key}'");
            };

            Ok(render(value))
        }
        value => Ok(render(&value)),
    }
}

fn render(value: &AttributeValue) -> String {
    match value {
        AttributeValue::Number(n) => format_number(*n),
        AttributeValue::Text(s) => s.clone(),
        AttributeValue::Sequence(items) => items.len().to_string(),
        AttributeValue::Set(elements) => elements.len().to_string(),
        AttributeValue::Mapping(entries) => entries.len().to_string(),
        AttributeValue::Unsupported => UNKNOWN.to_string(),
    }
}
