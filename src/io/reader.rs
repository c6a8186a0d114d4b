use std::io::Read;

use serde_json::Value;

use crate::io::IoError;

/// Read a single YAML document into a generic value tree.
///
/// Returns `None` when the input holds no content at all (empty file,
/// whitespace or comments only). Merge keys (`<<: *anchor`) are resolved.
pub fn read_yaml_document<R: Read>(mut reader: R) -> Result<Option<Value>, IoError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    if !has_content(&text) {
        return Ok(None);
    }

    let mut yaml_value: serde_yaml::Value = serde_yaml::from_str(&text)?;
    if yaml_value.is_null() {
        return Ok(None);
    }
    yaml_value.apply_merge()?;
    Ok(Some(serde_json::to_value(yaml_value)?))
}

fn has_content(text: &str) -> bool {
    text.lines().map(str::trim).any(|line| {
        !line.is_empty() && !line.starts_with('#') && line != "---" && line != "..."
    })
}
