// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Compilation of rule specifiers into literal or glob matchers

use globset::{GlobBuilder, GlobMatcher};

use super::error::{FilterError, Result};
use super::rules::WILDCARD;

/// A rule specifier in matchable form
#[derive(Debug, Clone)]
pub enum CompiledRule {
    /// Matches only the identical path
    Literal(String),
    /// Glob match where `*` runs across `.` segments
    Pattern { source: String, matcher: GlobMatcher },
}

impl CompiledRule {
    /// Compile one canonical specifier
    pub fn compile(spec: &str) -> Result<Self> {
        if !spec.contains(WILDCARD) {
            return Ok(CompiledRule::Literal(spec.to_string()));
        }

        let glob = GlobBuilder::new(spec)
            .literal_separator(false)
            .backslash_escape(true)
            .build()
            .map_err(|source| FilterError::InvalidPattern {
                pattern: spec.to_string(),
                source,
            })?;

        Ok(CompiledRule::Pattern {
            source: spec.to_string(),
            matcher: glob.compile_matcher(),
        })
    }

    pub fn source(&self) -> &str {
        match self {
            CompiledRule::Literal(path) => path,
            CompiledRule::Pattern { source, .. } => source,
        }
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self, CompiledRule::Pattern { .. })
    }

    /// Direct match against a canonical path
    pub fn matches(&self, path: &str) -> bool {
        match self {
            CompiledRule::Literal(literal) => literal == path,
            CompiledRule::Pattern { matcher, .. } => matcher.is_match(path),
        }
    }

    /// True if `path` is a proper ancestor of `full_path` and this pattern
    /// matches `full_path`
    ///
    /// Literal rules never answer for descendants here.
    pub fn matches_beneath(&self, path: &str, full_path: &str) -> bool {
        let CompiledRule::Pattern { matcher, .. } = self else {
            return false;
        };
        full_path.len() > path.len()
            && full_path.starts_with(path)
            && full_path.as_bytes()[path.len()] == b'.'
            && matcher.is_match(full_path)
    }
}

/// Compile every specifier of a rule set, failing on the first malformed one
pub fn compile_rules<I, S>(specifiers: I) -> Result<Vec<CompiledRule>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    specifiers
        .into_iter()
        .map(|spec| CompiledRule::compile(spec.as_ref()))
        .collect()
}
