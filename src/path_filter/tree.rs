// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Depth-first JSON tree walker driving the path filter
//
// Context paths follow the serializer convention: the root is `$`, object
// fields append `.name` and array elements append `[index]`.

use serde_json::{Map, Value};

use super::error::Result;
use super::filter::PathFilter;

/// Root marker of every context path
pub const ROOT: &str = "$";

/// Every field path present in `value`, root-relative, e.g. `items[0].name`
pub fn collect_full_paths(value: &Value) -> Vec<String> {
    let mut paths = Vec::new();
    collect_into(value, "", &mut paths);
    paths
}

fn collect_into(value: &Value, prefix: &str, paths: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                collect_into(child, &path, paths);
                paths.push(path);
            }
        }
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                collect_into(item, &format!("{}[{}]", prefix, idx), paths);
            }
        }
        _ => {}
    }
}

/// Copy of `value` keeping only the fields `filter` admits
///
/// Uses the filter's current full-path index as-is.
pub fn filter_value(filter: &PathFilter, value: &Value) -> Result<Value> {
    walk(filter, value, ROOT)
}

fn walk(filter: &PathFilter, value: &Value, context: &str) -> Result<Value> {
    match value {
        Value::Object(map) => {
            let mut kept = Map::new();
            for (key, child) in map {
                if !filter.apply(context, key)? {
                    continue;
                }
                let child_context = format!("{}.{}", context, key);
                kept.insert(key.clone(), walk(filter, child, &child_context)?);
            }
            Ok(Value::Object(kept))
        }
        Value::Array(items) => {
            let mut kept = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                kept.push(walk(filter, item, &format!("{}[{}]", context, idx))?);
            }
            Ok(Value::Array(kept))
        }
        other => Ok(other.clone()),
    }
}

impl PathFilter {
    /// Filter a whole document in one pass
    ///
    /// Replaces the full-path index with the paths of `value` before walking.
    pub fn filter_json(&mut self, value: &Value) -> Result<Value> {
        self.set_full_paths(collect_full_paths(value));
        filter_value(self, value)
    }
}
