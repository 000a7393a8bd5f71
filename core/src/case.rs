//! Key-case translation between the client's camelCase and the backend's
//! snake_case.
//!
//! Only top-level keys are rewritten; values are copied as they are. The
//! conversion is lossy (acronyms and irregular casing do not always invert)
//! but idempotent in both directions.
//!
//! Two distinct keys may convert to the same output key. The plain
//! functions resolve that last-write-wins, walking the input in ascending
//! key order so equal inputs always give equal outputs; the `try_*`
//! variants report it instead.

use std::collections::HashMap;

use convert_case::{Case, Casing};
use serde_json::{Map, Value};

use crate::error::KeyCollision;

/// Upper bound on re-conversion passes. Real keys settle after one or two.
const MAX_PASSES: usize = 8;

/// Convert one key to camelCase.
pub fn camel_case(key: &str) -> String {
    settle(key, Case::Camel)
}

/// Convert one key to snake_case.
pub fn snake_case(key: &str) -> String {
    settle(key, Case::Snake)
}

/// Copy of `input` with every key in camelCase.
pub fn to_camel_case(input: &HashMap<String, String>) -> HashMap<String, String> {
    rename_keys(input, camel_case)
}

/// Copy of `input` with every key in snake_case.
pub fn to_snake_case(input: &HashMap<String, String>) -> HashMap<String, String> {
    rename_keys(input, snake_case)
}

/// Like `to_camel_case`, but fails if two keys convert to the same name.
pub fn try_to_camel_case(
    input: &HashMap<String, String>,
) -> Result<HashMap<String, String>, KeyCollision> {
    try_rename_keys(input, camel_case)
}

/// Like `to_snake_case`, but fails if two keys convert to the same name.
pub fn try_to_snake_case(
    input: &HashMap<String, String>,
) -> Result<HashMap<String, String>, KeyCollision> {
    try_rename_keys(input, snake_case)
}

/// Rewrite the top-level keys of a JSON payload to camelCase.
pub fn camel_case_keys(input: &Map<String, Value>) -> Map<String, Value> {
    input
        .iter()
        .map(|(key, value)| (camel_case(key), value.clone()))
        .collect()
}

/// Rewrite the top-level keys of a JSON payload to snake_case.
pub fn snake_case_keys(input: &Map<String, Value>) -> Map<String, Value> {
    input
        .iter()
        .map(|(key, value)| (snake_case(key), value.clone()))
        .collect()
}

/// Re-apply the conversion until the output is a fixed point.
///
/// One pass is not enough: adjacent single-letter words come out as an
/// uppercase run (`point_x_y` -> `pointXY`) that the acronym rule splits
/// differently next time.
fn settle(key: &str, case: Case) -> String {
    let mut current = key.to_case(case);
    for _ in 0..MAX_PASSES {
        let next = current.to_case(case);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn sorted<V>(input: &HashMap<String, V>) -> Vec<(&String, &V)> {
    let mut entries: Vec<_> = input.iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
    entries
}

fn rename_keys<V: Clone>(
    input: &HashMap<String, V>,
    convert: fn(&str) -> String,
) -> HashMap<String, V> {
    sorted(input)
        .into_iter()
        .map(|(key, value)| (convert(key), value.clone()))
        .collect()
}

fn try_rename_keys<V: Clone>(
    input: &HashMap<String, V>,
    convert: fn(&str) -> String,
) -> Result<HashMap<String, V>, KeyCollision> {
    let mut sources: HashMap<String, &str> = HashMap::with_capacity(input.len());
    let mut output = HashMap::with_capacity(input.len());
    for (key, value) in sorted(input) {
        let converted = convert(key);
        if let Some(first) = sources.insert(converted.clone(), key) {
            return Err(KeyCollision {
                converted,
                first: first.to_string(),
                second: key.clone(),
            });
        }
        output.insert(converted, value.clone());
    }
    Ok(output)
}
