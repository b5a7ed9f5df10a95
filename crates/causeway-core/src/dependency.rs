//! Dependency: a `(key, version, kind)` causal fact.
//!
//! Producers publish the versions a change read and the version it wrote.
//! Equality and hashing only look at `key` and `version`; the kind rides
//! along so the resolver can derive the right precondition.
//!
//! # Examples
//!
//! ```
//! use causeway_core::{Dependency, DependencyKind};
//!
//! let dep = Dependency::parse("users:42:7", DependencyKind::Write).unwrap();
//! assert_eq!(dep.key(), "users:42");
//! assert_eq!(dep.version(), 7);
//! assert_eq!(dep.to_string(), "users:42:7");
//!
//! // Kind is not part of equality.
//! assert_eq!(Dependency::read("users:42", 7), dep);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::constants::DEPENDENCY_SEPARATOR;
use crate::errors::PayloadError;

/// Whether a dependency was declared as read or written by the producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    Read,
    Write,
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}

/// An immutable causal fact about one entity version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    key: String,
    version: u64,
    kind: DependencyKind,
}

impl Dependency {
    pub fn new(key: impl Into<String>, version: u64, kind: DependencyKind) -> Self {
        Self {
            key: key.into(),
            version,
            kind,
        }
    }

    /// Shorthand for a read dependency.
    pub fn read(key: impl Into<String>, version: u64) -> Self {
        Self::new(key, version, DependencyKind::Read)
    }

    /// Shorthand for a write dependency.
    pub fn write(key: impl Into<String>, version: u64) -> Self {
        Self::new(key, version, DependencyKind::Write)
    }

    /// Parse a `"key:version"` wire token.
    ///
    /// The version is the text after the last separator, so keys may
    /// contain colons themselves. A write at version 0 has no prior state
    /// and is rejected.
    pub fn parse(token: &str, kind: DependencyKind) -> Result<Self, PayloadError> {
        let invalid = |reason: &str| PayloadError::InvalidDependency {
            token: token.to_string(),
            reason: reason.to_string(),
        };

        let (key, version) = token
            .rsplit_once(DEPENDENCY_SEPARATOR)
            .ok_or_else(|| invalid("expected key:version"))?;
        if key.is_empty() {
            return Err(invalid("empty key"));
        }
        let version: u64 = version
            .parse()
            .map_err(|_| invalid("version is not an unsigned integer"))?;
        if kind == DependencyKind::Write && version == 0 {
            return Err(invalid("write version must be at least 1"));
        }

        Ok(Self::new(key, version, kind))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn kind(&self) -> DependencyKind {
        self.kind
    }

    /// The state that must be visible locally before a change declaring
    /// this dependency can be applied.
    ///
    /// Reads are their own precondition. A write at version V requires the
    /// entity to be at V-1, since applying the change is what advances it.
    pub fn precondition(&self) -> Self {
        match self.kind {
            DependencyKind::Read => self.clone(),
            DependencyKind::Write => Self {
                key: self.key.clone(),
                version: self.version.saturating_sub(1),
                kind: DependencyKind::Write,
            },
        }
    }

    /// True when a locally visible version satisfies this dependency.
    pub fn is_satisfied_by(&self, local_version: u64) -> bool {
        local_version >= self.version
    }
}

impl PartialEq for Dependency {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.version == other.version
    }
}

impl Eq for Dependency {}

impl Hash for Dependency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.version.hash(state);
    }
}

impl PartialOrd for Dependency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Dependency {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| self.version.cmp(&other.version))
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.key, DEPENDENCY_SEPARATOR, self.version)
    }
}
