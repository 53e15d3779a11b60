//! YAML front matter serialization.

use mdfmt_writers::Writer;
use serde_yaml::Value;

use crate::error::RenderError;

const DELIMITER: &str = "---\n";

/// Write `metadata` as a fenced YAML block followed by a blank line.
///
/// Nothing is written when the metadata is absent, null or an empty mapping.
pub(crate) fn write_front_matter(
    w: &mut dyn Writer,
    metadata: Option<&Value>,
) -> Result<(), RenderError> {
    let Some(value) = metadata.filter(|v| !is_empty(v)) else {
        return Ok(());
    };

    let yaml = serde_yaml::to_string(value).map_err(|source| RenderError::Encoding {
        kind: value_kind(value),
        source,
    })?;

    w.write_str(DELIMITER)?;
    w.write_str(&yaml)?;
    if !yaml.ends_with('\n') {
        w.write_byte(b'\n')?;
    }
    w.write_str(DELIMITER)?;
    w.write_byte(b'\n')?;
    Ok(())
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Mapping(mapping) => mapping.is_empty(),
        _ => false,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
