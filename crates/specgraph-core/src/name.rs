//! Fully-qualified callable names.
//!
//! Every callable in a compiled program is identified by a [`QualifiedName`]
//! (namespace + simple name). Name resolution has already happened by the
//! time a program reaches this crate, so every global reference carries one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Globally unique identifier of a callable.
///
/// Ordering is namespace first, then name, which gives query results a
/// stable, human-readable sort order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedName {
    pub namespace: String,
    pub name: String,
}

impl QualifiedName {
    /// Creates a qualified name from its two parts.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        QualifiedName {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Parses `A.B.Name` into namespace `A.B` and name `Name`.
    ///
    /// A dotless string is treated as a name in the empty namespace.
    pub fn parse(full: &str) -> Self {
        match full.rsplit_once('.') {
            Some((namespace, name)) => QualifiedName::new(namespace, name),
            None => QualifiedName::new("", full),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}
