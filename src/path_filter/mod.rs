// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Path Filter - Rust Implementation
//
// Hierarchical include/exclude filtering of serialized properties:
// - Literal, dotted/slashed and wildcard path specifiers
// - Array-index erasure on query paths
// - Compiled patterns shared through a concurrent cache

pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod patterns;
#[cfg(feature = "python")]
pub mod python;
pub mod rules;
pub mod tree;

pub use cache::PatternCache;
pub use config::{CacheConfig, FilterConfig, RuleKind};
pub use error::{FilterError, Result};
pub use filter::PathFilter;
pub use patterns::CompiledRule;
#[cfg(feature = "python")]
pub use python::PathFilterRust;
pub use rules::{has_pattern, RuleSet};
