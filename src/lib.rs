// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Property-path filtering for JSON serialization
// Optional PyO3 bindings for Python integration

// Non-local impls generated by the PyO3 macros
#![cfg_attr(feature = "python", allow(non_local_definitions))]

#[cfg(feature = "python")]
use pyo3::prelude::*;

pub mod path_filter;

pub use path_filter::{FilterConfig, FilterError, PathFilter, PatternCache, RuleSet};

/// Python module: json_path_filter
///
/// Decides per field whether a serialized property is emitted, from
/// include/exclude path rules.
///
/// # Examples
///
/// ```python
/// from json_path_filter import PathFilterRust
///
/// f = PathFilterRust({"includes": ["bar.*.name"]})
/// f.set_full_paths(["bar.zee.name"])
/// f.apply("$.bar", "zee")    # True: a matching leaf lives beneath
/// f.apply("$.bar", "other")  # False
/// ```
#[cfg(feature = "python")]
#[pymodule]
fn json_path_filter(m: &Bound<'_, pyo3::types::PyModule>) -> PyResult<()> {
    m.add_class::<path_filter::PathFilterRust>()?;

    // Module metadata
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add(
        "__doc__",
        "Hierarchical property-path filtering for JSON serialization",
    )?;

    Ok(())
}
