//! Slash-delimited category paths.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use crate::domain::error::{CategoryError, CategoryResult};

pub const SEPARATOR: char = '/';

/// Sequence of category names leading from one node down to another.
///
/// The empty path has no segments and resolves to the node it is applied to.
/// Wildcards are not supported and `/` cannot be escaped inside a name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CategoryPath {
    segments: Vec<String>,
}

impl CategoryPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `a/b/c`. Leading, trailing or doubled separators are rejected.
    pub fn parse(input: &str) -> CategoryResult<Self> {
        if input.is_empty() {
            return Ok(Self::new());
        }
        let segments: Vec<String> = input.split(SEPARATOR).map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(CategoryError::InvalidPath(input.to_string()));
        }
        Ok(Self { segments })
    }

    /// Build a path from already separated names, validating each one.
    pub fn from_segments<I, S>(segments: I) -> CategoryResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        for segment in &segments {
            validate_name(segment).map_err(|_| CategoryError::InvalidPath(segments.join("/")))?;
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Append one name, returning the longer path.
    pub fn join(&self, name: &str) -> CategoryResult<Self> {
        validate_name(name)?;
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Ok(Self { segments })
    }

    pub(crate) fn push(&mut self, name: &str) {
        self.segments.push(name.to_string());
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.iter().join("/"))
    }
}

impl FromStr for CategoryPath {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Category names must be non-empty and must not contain the path separator.
pub fn validate_name(name: &str) -> CategoryResult<()> {
    if name.is_empty() || name.contains(SEPARATOR) {
        return Err(CategoryError::InvalidName(name.to_string()));
    }
    Ok(())
}
