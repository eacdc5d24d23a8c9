//! Namespaced identifier module.
//!
//! Provides the `ResourceId` type, a `namespace:path` identifier used as
//! registry key and as the reference to host items, attributes, effects
//! and skills. Uses `Arc<str>` so clones are cheap.

use crate::error::CodecError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Namespace assumed when an identifier is written without one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Namespace of every built-in registry entry.
pub const MOD_NAMESPACE: &str = "skilltree";

/// Namespaced identifier (`namespace:path`).
///
/// # Examples
///
/// ```rust
/// use skilltree::ResourceId;
///
/// let id = ResourceId::parse("skilltree:damage").unwrap();
/// assert_eq!(id.namespace(), "skilltree");
/// assert_eq!(id.path(), "damage");
///
/// // A bare path lands in the default namespace
/// let stick = ResourceId::parse("stick").unwrap();
/// assert_eq!(stick.as_str(), "minecraft:stick");
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResourceId {
    full: Arc<str>,
    split: usize,
}

impl Serialize for ResourceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.full.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ResourceId::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl ResourceId {
    /// Build an identifier from its two halves.
    pub fn new(namespace: &str, path: &str) -> Result<Self, CodecError> {
        let namespace = if namespace.is_empty() {
            DEFAULT_NAMESPACE
        } else {
            namespace
        };
        if !namespace.chars().all(valid_namespace_char) {
            return Err(CodecError::InvalidIdentifier(format!("{namespace}:{path}")));
        }
        if !path.chars().all(valid_path_char) {
            return Err(CodecError::InvalidIdentifier(format!("{namespace}:{path}")));
        }
        Ok(Self {
            full: Arc::from(format!("{namespace}:{path}")),
            split: namespace.len(),
        })
    }

    /// Parse `namespace:path`, or a bare `path` in the default namespace.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skilltree::ResourceId;
    ///
    /// assert!(ResourceId::parse("mod:Upper").is_err());
    /// assert!(ResourceId::parse("mod:nested/path").is_ok());
    /// ```
    pub fn parse(s: &str) -> Result<Self, CodecError> {
        match s.split_once(':') {
            Some((namespace, path)) => Self::new(namespace, path),
            None => Self::new(DEFAULT_NAMESPACE, s),
        }
    }

    /// Identifier in this crate's own namespace.
    pub fn builtin(path: &str) -> Result<Self, CodecError> {
        Self::new(MOD_NAMESPACE, path)
    }

    pub fn namespace(&self) -> &str {
        &self.full[..self.split]
    }

    pub fn path(&self) -> &str {
        &self.full[self.split + 1..]
    }

    /// Full `namespace:path` form.
    pub fn as_str(&self) -> &str {
        &self.full
    }
}

fn valid_namespace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-')
}

fn valid_path_char(c: char) -> bool {
    valid_namespace_char(c) || c == '/'
}

impl FromStr for ResourceId {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for ResourceId {
    type Error = CodecError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full)
    }
}
