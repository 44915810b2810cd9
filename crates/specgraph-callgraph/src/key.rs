//! Specialization identity.
//!
//! A call-graph node is a [`SpecializationKey`]: callable name, functor
//! kind, and the interned type-argument signature. Callers talk to the graph
//! in terms of [`SpecializationIdentity`] (anything that can name a
//! specialization) and get [`Dependency`] values back, with type arguments
//! reconstructed from the interner.

use std::fmt;

use serde::{Deserialize, Serialize};

use specgraph_core::name::QualifiedName;
use specgraph_core::specialization::{Specialization, SpecializationKind};
use specgraph_core::types::ResolvedType;

use crate::interner::{hash_types, TypeHash};

/// Anything that identifies a specialization: the full specialization
/// descriptor of the body being walked, or a dependency returned by a
/// previous query.
pub trait SpecializationIdentity {
    fn callable(&self) -> &QualifiedName;
    fn kind(&self) -> SpecializationKind;
    /// `None` means "no type arguments", which is distinct from
    /// `Some(&[])`.
    fn type_arguments(&self) -> Option<&[ResolvedType]>;
}

impl SpecializationIdentity for Specialization {
    fn callable(&self) -> &QualifiedName {
        &self.parent
    }

    fn kind(&self) -> SpecializationKind {
        self.kind
    }

    fn type_arguments(&self) -> Option<&[ResolvedType]> {
        self.type_arguments.as_deref()
    }
}

/// Structural identity of a call-graph node.
///
/// Ordered by callable, then kind, then type-argument hashes; `None` sorts
/// before any `Some`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpecializationKey {
    pub callable: QualifiedName,
    pub kind: SpecializationKind,
    /// Interned type arguments in generic-parameter order.
    pub type_arguments: Option<Vec<TypeHash>>,
}

impl SpecializationKey {
    pub fn new(
        callable: QualifiedName,
        kind: SpecializationKind,
        type_arguments: Option<Vec<TypeHash>>,
    ) -> Self {
        SpecializationKey {
            callable,
            kind,
            type_arguments,
        }
    }

    /// Builds the key a specialization would have, hashing its type
    /// arguments without interning them.
    pub fn of(spec: &(impl SpecializationIdentity + ?Sized)) -> Self {
        SpecializationKey::new(
            spec.callable().clone(),
            spec.kind(),
            spec.type_arguments().map(hash_types),
        )
    }
}

impl fmt::Display for SpecializationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.callable)?;
        if let Some(hashes) = &self.type_arguments {
            let short: Vec<String> = hashes.iter().map(TypeHash::short).collect();
            write!(f, "<{}>", short.join(", "))?;
        }
        write!(f, " [{}]", self.kind)
    }
}

/// A specialization as returned by graph queries: `(name, kind, typeArgs)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    pub callable: QualifiedName,
    pub kind: SpecializationKind,
    pub type_arguments: Option<Vec<ResolvedType>>,
}

impl Dependency {
    pub fn new(
        callable: QualifiedName,
        kind: SpecializationKind,
        type_arguments: Option<Vec<ResolvedType>>,
    ) -> Self {
        Dependency {
            callable,
            kind,
            type_arguments,
        }
    }
}

impl SpecializationIdentity for Dependency {
    fn callable(&self) -> &QualifiedName {
        &self.callable
    }

    fn kind(&self) -> SpecializationKind {
        self.kind
    }

    fn type_arguments(&self) -> Option<&[ResolvedType]> {
        self.type_arguments.as_deref()
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.callable)?;
        if let Some(types) = &self.type_arguments {
            let rendered: Vec<String> = types.iter().map(ToString::to_string).collect();
            write!(f, "<{}>", rendered.join(", "))?;
        }
        write!(f, " [{}]", self.kind)
    }
}
