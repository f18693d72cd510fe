//! JSON helpers: stable pretty printing and lenient deserializers.
//!
//! The lenient deserializers exist because Packagist payloads and
//! real-world `composer.json` files disagree with the schema in
//! well-known ways. Each helper degrades to an empty value instead of
//! failing the surrounding document.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Serialize a value as UTF-8 JSON with 4-space indentation.
///
/// Maps throughout the model are `BTreeMap`-backed, so the output is
/// byte-stable for equal inputs.
///
/// # Errors
///
/// Returns the underlying serializer error.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(buf).expect("serde_json emits UTF-8"))
}

/// Deserialize a `name -> string` map, tolerating any other shape
/// (notably the empty array the registry emits for empty maps) as an
/// empty map.
pub(crate) fn lenient_string_map<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Object(map) = value else {
        return Ok(BTreeMap::new());
    };
    Ok(map
        .into_iter()
        .filter_map(|(k, v)| match v {
            Value::String(s) => Some((k, s)),
            _ => None,
        })
        .collect())
}

/// Deserialize a string-or-list-of-strings field into a list.
///
/// `"license": "MIT"` and `"license": ["MIT"]` both occur in the wild.
pub(crate) fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(string_list_from_value(value))
}

fn string_list_from_value(value: Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s],
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Deserialize a PSR-4/PSR-0 map whose values may be a single path string
/// or a list of path strings. Non-object input becomes an empty map.
pub(crate) fn lenient_psr_map<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Object(map) = value else {
        return Ok(BTreeMap::new());
    };
    Ok(map
        .into_iter()
        .map(|(ns, paths)| (ns, string_list_from_value(paths)))
        .collect())
}

/// Deserialize `funding`, which is a list of objects when well-formed and
/// assorted other shapes otherwise. Anything unexpected becomes an empty
/// list.
pub(crate) fn lenient_funding<'de, D>(
    deserializer: D,
) -> Result<Vec<BTreeMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(
                map.into_iter()
                    .filter_map(|(k, v)| match v {
                        Value::String(s) => Some((k, s)),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => None,
        })
        .collect())
}

/// Deserialize `stability-flags`, a `name -> int` map that some lockfiles
/// carry as an empty array.
pub(crate) fn lenient_flag_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Object(map) = value else {
        return Ok(BTreeMap::new());
    };
    Ok(map
        .into_iter()
        .filter_map(|(k, v)| v.as_u64().map(|n| (k, u8::try_from(n).unwrap_or(0))))
        .collect())
}
