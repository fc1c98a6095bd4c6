// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// PyO3 bindings for the path filter

use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::config::FilterConfig;
use super::error::FilterError;
use super::filter::PathFilter;

fn to_py_err(err: FilterError) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string())
}

/// Path filter exposed to Python
///
/// # Example (Python)
/// ```python
/// from json_path_filter import PathFilterRust
///
/// f = PathFilterRust({"includes": ["bar.zee"], "excludes": ["secret.*"]})
/// f.apply("$.bar", "zee")    # True
/// f.apply("$.bar", "other")  # False
///
/// f.filter_json('{"bar": {"zee": 1, "other": 2}}')  # '{"bar":{"zee":1}}'
/// ```
#[pyclass]
pub struct PathFilterRust {
    filter: PathFilter,
}

#[pymethods]
impl PathFilterRust {
    /// Create a new path filter
    ///
    /// # Configuration Keys
    /// * `includes` (list[str]): Properties to export
    /// * `excludes` (list[str]): Properties to ban
    /// * `cache_enabled` (bool): Cache compiled patterns (default: True)
    /// * `cache_max_entries` (int): Cache size limit (default: 1024)
    ///
    /// Without a config dict the filter is empty and uses the shared cache.
    #[new]
    #[pyo3(signature = (config_dict=None))]
    pub fn new(config_dict: Option<&Bound<'_, PyDict>>) -> PyResult<Self> {
        let filter = match config_dict {
            Some(dict) => {
                let config = FilterConfig::from_py_dict(dict).map_err(|e| {
                    PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                        "Invalid config: {}",
                        e
                    ))
                })?;
                PathFilter::from_config(&config)
            }
            None => PathFilter::new(),
        };

        Ok(Self { filter })
    }

    pub fn add_includes(&mut self, properties: Vec<String>) {
        self.filter.add_includes(properties);
    }

    pub fn add_excludes(&mut self, properties: Vec<String>) {
        self.filter.add_excludes(properties);
    }

    pub fn set_full_paths(&mut self, paths: Vec<String>) {
        self.filter.set_full_paths(paths);
    }

    /// Compile all rules now; raises ValueError on a malformed pattern
    pub fn validate(&self) -> PyResult<()> {
        self.filter.validate().map_err(to_py_err)
    }

    /// Should field `name` under `context_path` be serialized?
    #[pyo3(signature = (context_path, name, source_present=true))]
    pub fn apply(&self, context_path: &str, name: &str, source_present: bool) -> PyResult<bool> {
        self.filter
            .decide(context_path, name, source_present)
            .map_err(to_py_err)
    }

    /// Filter a JSON document and return the pruned document
    pub fn filter_json(&mut self, json: &str) -> PyResult<String> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| to_py_err(e.into()))?;
        let filtered = self.filter.filter_json(&value).map_err(to_py_err)?;
        Ok(filtered.to_string())
    }
}
