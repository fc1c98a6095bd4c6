// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Error types for the path filter

use thiserror::Error;

/// Errors raised while configuring or evaluating a path filter
#[derive(Debug, Error)]
pub enum FilterError {
    /// A wildcard specifier could not be compiled into a matcher
    #[error("failed to compile path pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// A configuration document could not be parsed
    #[error("invalid filter configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

impl FilterError {
    /// Returns the offending pattern for compilation failures
    pub fn pattern(&self) -> Option<&str> {
        match self {
            FilterError::InvalidPattern { pattern, .. } => Some(pattern),
            FilterError::InvalidConfig(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;
