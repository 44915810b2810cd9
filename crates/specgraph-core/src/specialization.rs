//! Callables and their specializations.
//!
//! A callable has up to four specializations, one per
//! [`SpecializationKind`]. Each [`Specialization`] carries the identity the
//! call graph keys on (parent callable, kind, optional type arguments) plus
//! its implementation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::name::QualifiedName;
use crate::stmt::{Scope, SymbolTuple};
use crate::types::ResolvedType;

/// The four functor variants of a callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpecializationKind {
    Body,
    Adjoint,
    Controlled,
    ControlledAdjoint,
}

impl SpecializationKind {
    /// Every kind, in declaration order.
    pub const ALL: [SpecializationKind; 4] = [
        SpecializationKind::Body,
        SpecializationKind::Adjoint,
        SpecializationKind::Controlled,
        SpecializationKind::ControlledAdjoint,
    ];

    /// Maps accumulated functor state to the specialization it selects.
    ///
    /// `adjoint` is the parity of Adjoint applications; `controlled` is
    /// whether any Controlled application was seen.
    pub fn from_functors(adjoint: bool, controlled: bool) -> Self {
        match (adjoint, controlled) {
            (false, false) => SpecializationKind::Body,
            (false, true) => SpecializationKind::Controlled,
            (true, false) => SpecializationKind::Adjoint,
            (true, true) => SpecializationKind::ControlledAdjoint,
        }
    }

    pub fn is_adjoint(self) -> bool {
        matches!(
            self,
            SpecializationKind::Adjoint | SpecializationKind::ControlledAdjoint
        )
    }

    pub fn is_controlled(self) -> bool {
        matches!(
            self,
            SpecializationKind::Controlled | SpecializationKind::ControlledAdjoint
        )
    }
}

impl fmt::Display for SpecializationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SpecializationKind::Body => "body",
            SpecializationKind::Adjoint => "adjoint",
            SpecializationKind::Controlled => "controlled",
            SpecializationKind::ControlledAdjoint => "controlled adjoint",
        };
        f.write_str(s)
    }
}

/// Directive for a specialization the compiler derives from another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneratorDirective {
    /// `adjoint self`
    SelfInverse,
    /// `adjoint invert`
    Invert,
    /// `controlled distribute`
    Distribute,
}

/// How a specialization is implemented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpecializationImplementation {
    /// User-written body.
    Provided { argument: SymbolTuple, body: Scope },
    /// Implemented by the target machine.
    Intrinsic,
    /// Declared here, defined in another compilation unit.
    External,
    /// To be generated by a later pass.
    Generated(GeneratorDirective),
}

impl SpecializationImplementation {
    /// The body to traverse, if there is one.
    pub fn body(&self) -> Option<&Scope> {
        match self {
            SpecializationImplementation::Provided { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// One specialization of a callable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specialization {
    /// The callable this specialization belongs to.
    pub parent: QualifiedName,
    pub kind: SpecializationKind,
    /// Concrete type arguments for a monomorphized specialization. `None`
    /// for a specialization that has not been instantiated.
    pub type_arguments: Option<Vec<ResolvedType>>,
    pub implementation: SpecializationImplementation,
}

impl Specialization {
    /// A specialization with a user-written body and no type arguments.
    pub fn provided(parent: QualifiedName, kind: SpecializationKind, body: Scope) -> Self {
        Specialization {
            parent,
            kind,
            type_arguments: None,
            implementation: SpecializationImplementation::Provided {
                argument: SymbolTuple::Discarded,
                body,
            },
        }
    }

    /// A specialization with no body of its own.
    pub fn bodiless(
        parent: QualifiedName,
        kind: SpecializationKind,
        implementation: SpecializationImplementation,
    ) -> Self {
        Specialization {
            parent,
            kind,
            type_arguments: None,
            implementation,
        }
    }

    /// Sets the concrete type arguments.
    pub fn with_type_arguments(mut self, type_arguments: Vec<ResolvedType>) -> Self {
        self.type_arguments = Some(type_arguments);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallableKind {
    Function,
    Operation,
    TypeConstructor,
}

/// A callable declaration with its specializations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Callable {
    pub name: QualifiedName,
    pub kind: CallableKind,
    pub signature: ResolvedType,
    pub specializations: Vec<Specialization>,
}

impl Callable {
    pub fn new(name: QualifiedName, kind: CallableKind, signature: ResolvedType) -> Self {
        Callable {
            name,
            kind,
            signature,
            specializations: Vec::new(),
        }
    }

    /// Returns the first specialization of the given kind.
    pub fn specialization(&self, kind: SpecializationKind) -> Option<&Specialization> {
        self.specializations.iter().find(|s| s.kind == kind)
    }
}
