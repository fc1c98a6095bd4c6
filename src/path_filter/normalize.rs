// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Path normalization: separator canonicalization and array-index erasure

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Separator class between specifiers in one raw string: `[,;:]+`
pub static PROPERTY_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;:]+").unwrap());

/// One bracketed index block, e.g. `[0]`
static SQUARE_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").unwrap());

/// Canonical form of a path: `/` segment separators become `.`
pub fn canonicalize(path: &str) -> Cow<'_, str> {
    if path.contains('/') {
        Cow::Owned(path.replace('/', "."))
    } else {
        Cow::Borrowed(path)
    }
}

/// Remove every `[...]` block, so `items[0].name` becomes `items.name`
pub fn strip_array_indices(path: &str) -> Cow<'_, str> {
    if path.contains('[') {
        SQUARE_BLOCK.replace_all(path, "")
    } else {
        Cow::Borrowed(path)
    }
}

/// Split a raw specifier string into canonical, non-blank specifiers
pub fn split_specifiers(raw: &str) -> impl Iterator<Item = String> + '_ {
    PROPERTY_SEPARATOR
        .split(raw)
        .filter(|piece| !piece.trim().is_empty())
        .map(|piece| canonicalize(piece).into_owned())
}

/// Build the root-relative query path for `field_name` under `context_path`
///
/// The serializer reports context paths rooted at a marker segment (`$`,
/// `$[0]`, ...). That first segment is dropped: `$.bar.zee` + `foo` gives
/// `bar.zee.foo`. Index blocks are erased from the result.
pub fn query_path(context_path: &str, field_name: &str) -> String {
    let path = match context_path.find('.') {
        Some(idx) => {
            let parent = &context_path[idx + 1..];
            let mut path = String::with_capacity(parent.len() + field_name.len() + 1);
            path.push_str(parent);
            path.push('.');
            path.push_str(field_name);
            path
        }
        None => field_name.to_string(),
    };

    if path.contains('[') {
        strip_array_indices(&path).into_owned()
    } else {
        path
    }
}
