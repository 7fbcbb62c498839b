//! Path-like node identifiers
//!
//! This module provides the [`NodeId`] type. A node declared as `S3` inside
//! the container `Frontend` has the qualified id `Frontend.S3` and the local
//! name `S3`. Declared names may themselves contain `.`, so the local name is
//! tracked explicitly rather than recovered by splitting the path.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Serialize, Serializer};

/// Separator placed between the segments of a qualified identifier.
pub const PATH_SEPARATOR: char = '.';

/// Fully qualified identifier of a node or container.
///
/// Equality, ordering and hashing look at the qualified path only, so a
/// top-level node declared as `Frontend.S3` collides with `S3` nested in
/// `Frontend`.
///
/// # Examples
///
/// ```
/// use trellis_core::identifier::NodeId;
///
/// let frontend = NodeId::new("Frontend");
/// let s3 = frontend.create_nested("S3");
/// assert_eq!(s3, "Frontend.S3");
/// assert_eq!(s3.local_name(), "S3");
/// ```
#[derive(Debug, Clone)]
pub struct NodeId {
    qualified: String,
    local_start: usize,
}

impl NodeId {
    /// Creates a top-level `NodeId` from a declared name.
    ///
    /// Surrounding whitespace is trimmed and interior whitespace runs are
    /// collapsed to a single space, so `"S3   Web Hosting"` and
    /// `"S3 Web Hosting"` name the same node.
    ///
    /// # Examples
    ///
    /// ```
    /// use trellis_core::identifier::NodeId;
    ///
    /// let id = NodeId::new("  S3   Web Hosting ");
    /// assert_eq!(id, "S3 Web Hosting");
    /// ```
    pub fn new(name: &str) -> Self {
        Self {
            qualified: normalize_name(name),
            local_start: 0,
        }
    }

    /// Creates a nested ID by joining this ID and a child name with `.`.
    ///
    /// # Examples
    ///
    /// ```
    /// use trellis_core::identifier::NodeId;
    ///
    /// let parent = NodeId::new("Backend");
    /// let nested = parent.create_nested("api.v2");
    /// assert_eq!(nested, "Backend.api.v2");
    /// assert_eq!(nested.local_name(), "api.v2");
    /// ```
    pub fn create_nested(&self, child_name: &str) -> Self {
        let mut qualified = String::with_capacity(self.qualified.len() + child_name.len() + 1);
        qualified.push_str(&self.qualified);
        qualified.push(PATH_SEPARATOR);
        let local_start = qualified.len();
        qualified.push_str(&normalize_name(child_name));
        Self {
            qualified,
            local_start,
        }
    }

    /// Returns the full qualified path.
    pub fn as_str(&self) -> &str {
        &self.qualified
    }

    /// Returns the name the node was declared with, without its parents.
    pub fn local_name(&self) -> &str {
        &self.qualified[self.local_start..]
    }

    /// Returns `true` if this identifier was created with [`NodeId::create_nested`].
    pub fn is_nested(&self) -> bool {
        self.local_start > 0
    }
}

/// Trims a declared name and collapses interior whitespace runs.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl PartialEq for NodeId {
    fn eq(&self, other: &Self) -> bool {
        self.qualified == other.qualified
    }
}

impl Eq for NodeId {}

impl Hash for NodeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.qualified.hash(state);
    }
}

impl PartialOrd for NodeId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.qualified.cmp(&other.qualified)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified)
    }
}

impl From<&str> for NodeId {
    /// Creates a top-level `NodeId` from a string slice.
    ///
    /// This is a convenience implementation that calls `NodeId::new`.
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.qualified
    }
}

impl PartialEq<str> for NodeId {
    /// Allows direct comparison with string slices: `id == "Frontend.S3"`
    fn eq(&self, other: &str) -> bool {
        self.qualified == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.qualified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let id1 = NodeId::new("Backend");
        let id2 = NodeId::new("Backend");
        let id3 = NodeId::new("Frontend");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "Backend");
        assert!(!id1.is_nested());
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        let id = NodeId::new("\tS3 \t  Web   Hosting  ");
        assert_eq!(id, "S3 Web Hosting");
        assert_eq!(id.local_name(), "S3 Web Hosting");
    }

    #[test]
    fn test_create_nested() {
        let parent = NodeId::new("system");
        let nested1 = parent.create_nested("backend");
        let nested2 = parent.create_nested("frontend");

        assert_ne!(nested1, nested2);
        assert_eq!(nested1, "system.backend");
        assert_eq!(nested2, "system.frontend");
        assert!(nested1.is_nested());
    }

    #[test]
    fn test_deep_nesting_keeps_local_name() {
        let level3 = NodeId::new("system")
            .create_nested("frontend")
            .create_nested("app")
            .create_nested("component");

        assert_eq!(level3, "system.frontend.app.component");
        assert_eq!(level3.local_name(), "component");
    }

    #[test]
    fn test_dotted_local_name() {
        let id = NodeId::new("Cloud").create_nested("us-east.vpc");
        assert_eq!(id.local_name(), "us-east.vpc");
        assert_eq!(NodeId::new("us-east.vpc").local_name(), "us-east.vpc");
        assert_eq!(id, NodeId::new("Cloud.us-east.vpc"));
        assert_ne!(id.local_name(), NodeId::new("Cloud.us-east.vpc").local_name());
    }

    #[test]
    fn test_display_trait() {
        let id = NodeId::new("a").create_nested("b");
        assert_eq!(format!("{}", id), "a.b");
    }

    #[test]
    fn test_hash_and_eq() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(NodeId::new("key1"), "value1");
        map.insert(NodeId::new("key2"), "value2");

        assert_eq!(map.get(&NodeId::from("key1")), Some(&"value1"));
        assert_eq!(map.len(), 2);
    }
}
