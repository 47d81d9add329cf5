//! Glob-scoped path filtering for entries and change records

use crate::error::TreeError;
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Include/exclude glob patterns
///
/// An empty include list matches everything. Exclusions win over inclusions.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl FilterOptions {
    pub fn include<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: patterns.into_iter().map(Into::into).collect(),
            exclude: Vec::new(),
        }
    }

    pub fn with_exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Compile the patterns into a reusable matcher
    pub fn compile(&self) -> Result<PathMatcher, TreeError> {
        Ok(PathMatcher {
            include: build_set(&self.include)?,
            exclude: build_set(&self.exclude)?,
        })
    }
}

fn build_set(patterns: &[String]) -> Result<Option<GlobSet>, TreeError> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| TreeError::InvalidPattern(format!("{}: {}", pattern, e)))?;
        builder.add(glob);
    }
    builder
        .build()
        .map(Some)
        .map_err(|e| TreeError::InvalidPattern(e.to_string()))
}

/// Compiled form of [`FilterOptions`]
#[derive(Debug, Clone)]
pub struct PathMatcher {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl PathMatcher {
    /// Whether a relative path passes the filter
    ///
    /// Directory paths are matched without their trailing `/`.
    pub fn is_match(&self, relative_path: &str) -> bool {
        let candidate = crate::path::strip_trailing_slash(relative_path);
        let included = self
            .include
            .as_ref()
            .map_or(true, |set| set.is_match(candidate));
        let excluded = self
            .exclude
            .as_ref()
            .map_or(false, |set| set.is_match(candidate));
        included && !excluded
    }
}
