use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::record::{error::LoadError, item::Item};

/// Load items from a JSON array or JSON Lines file
pub fn load_items(path: &Path, id_field: &str) -> Result<Vec<Item>, LoadError> {
    let text = fs::read_to_string(path)?;
    parse_items(&text, id_field)
}

/// Parse items from text.
///
/// A document whose first non-blank character is `[` is read as one JSON
/// array; anything else is read as JSON Lines, skipping blank lines.
/// `id_field` names the identifier column and every other field becomes an
/// attribute. Records are numbered from 1 in error messages.
pub fn parse_items(text: &str, id_field: &str) -> Result<Vec<Item>, LoadError> {
    let values: Vec<Value> = if text.trim_start().starts_with('[') {
        serde_json::from_str(text).map_err(|source| LoadError::Json { record: 1, source })?
    } else {
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(idx, line)| {
                serde_json::from_str::<Value>(line).map_err(|source| LoadError::Json {
                    record: idx + 1,
                    source,
                })
            })
            .collect::<Result<_, _>>()?
    };

    values
        .into_iter()
        .enumerate()
        .map(|(idx, value)| match value {
            Value::Object(fields) => item_from_fields(fields, id_field, idx + 1),
            _ => Err(LoadError::NotAnObject { record: idx + 1 }),
        })
        .collect()
}

fn item_from_fields(
    fields: Map<String, Value>,
    id_field: &str,
    record: usize,
) -> Result<Item, LoadError> {
    let mut id = None;
    let mut item = Item::new(String::new());

    for (name, value) in fields {
        let Some(text) = scalar_text(value) else {
            continue;
        };
        if name == id_field {
            id = Some(text);
        } else {
            item.attributes.insert(name, text);
        }
    }

    item.id = id
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| LoadError::MissingId {
            record,
            field: id_field.to_string(),
        })?;

    Ok(item)
}

/// Attribute text for a JSON value; `null` counts as missing
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
