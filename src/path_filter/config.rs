// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Configuration types for the path filter

#[cfg(feature = "python")]
use pyo3::prelude::*;
#[cfg(feature = "python")]
use pyo3::types::PyDict;
use serde::{Deserialize, Serialize};

use super::error::Result;

/// Which of the two rule sets a specifier belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Include,
    Exclude,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Include => "include",
            RuleKind::Exclude => "exclude",
        }
    }
}

/// Settings for the compiled-pattern cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Entry limit; `0` disables storage like `enabled: false`
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 1024,
        }
    }
}

/// Configuration for a path filter
///
/// Each entry in `includes` / `excludes` may itself hold several specifiers
/// joined by `,`, `;` or `:`, and may use `/` as a segment separator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub cache: CacheConfig,
}

impl FilterConfig {
    /// Parse configuration from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Extract configuration from Python dict
    #[cfg(feature = "python")]
    pub fn from_py_dict(dict: &Bound<'_, PyDict>) -> PyResult<Self> {
        let mut config = Self::default();

        if let Some(value) = dict.get_item("includes")? {
            config.includes = value.extract()?;
        }
        if let Some(value) = dict.get_item("excludes")? {
            config.excludes = value.extract()?;
        }
        if let Some(value) = dict.get_item("cache_enabled")? {
            config.cache.enabled = value.extract()?;
        }
        if let Some(value) = dict.get_item("cache_max_entries")? {
            config.cache.max_entries = value.extract()?;
        }

        Ok(config)
    }
}
