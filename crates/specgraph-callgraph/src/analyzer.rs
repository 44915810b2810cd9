//! Specialization-kind inference for global callable references.
//!
//! While descending into an expression, the walker carries a
//! [`CallContext`] by value. Functor applications derive a new context for
//! their operand; a call starts a fresh callee context for its callee and a
//! plain value context for its argument. When a global callable identifier
//! is reached, the context decides which specializations it denotes:
//!
//! | in call | adjoint | controlled | edges |
//! |---|---|---|---|
//! | yes | no | no | Body |
//! | yes | no | yes | Controlled |
//! | yes | yes | no | Adjoint |
//! | yes | yes | yes | ControlledAdjoint |
//! | no | - | - | all four |
//!
//! A callable used as a value (bound, passed, returned) may have any functor
//! applied to it later at an unknown site, so all four specializations are
//! recorded.

use specgraph_core::name::QualifiedName;
use specgraph_core::specialization::{Specialization, SpecializationKind};
use specgraph_core::types::ResolvedType;
use tracing::trace;

use crate::graph::CallGraph;

/// Functor state of the expression currently being resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallContext {
    /// Resolving the callee of a call.
    pub in_call: bool,
    /// Parity of the enclosing Adjoint applications.
    pub adjoint: bool,
    /// Whether any enclosing Controlled application was seen.
    pub controlled: bool,
}

impl CallContext {
    /// Context for a position whose value is not called directly.
    pub fn value() -> Self {
        CallContext::default()
    }

    /// Context for the callee of a call, with no functors applied yet.
    pub fn callee() -> Self {
        CallContext {
            in_call: true,
            adjoint: false,
            controlled: false,
        }
    }

    /// Context for the operand of `Adjoint`. Adjoint of adjoint cancels.
    pub fn adjoint(self) -> Self {
        CallContext {
            adjoint: !self.adjoint,
            ..self
        }
    }

    /// Context for the operand of `Controlled`. Controlled of controlled is
    /// still controlled.
    pub fn controlled(self) -> Self {
        CallContext {
            controlled: true,
            ..self
        }
    }

    /// The specializations a global callable reference denotes in this
    /// context.
    pub fn referenced_kinds(self) -> &'static [SpecializationKind] {
        if !self.in_call {
            return &SpecializationKind::ALL;
        }
        match SpecializationKind::from_functors(self.adjoint, self.controlled) {
            SpecializationKind::Body => &[SpecializationKind::Body],
            SpecializationKind::Adjoint => &[SpecializationKind::Adjoint],
            SpecializationKind::Controlled => &[SpecializationKind::Controlled],
            SpecializationKind::ControlledAdjoint => &[SpecializationKind::ControlledAdjoint],
        }
    }
}

/// Records the edges for a reference to global callable `callee` from the
/// body of `caller`.
///
/// `type_arguments` are the explicit type arguments at the reference site
/// and are recorded as given, including for partial applications where they
/// may not fully determine the specialization that ends up running.
pub fn record_callable_reference(
    graph: &mut CallGraph,
    caller: &Specialization,
    callee: &QualifiedName,
    type_arguments: Option<&[ResolvedType]>,
    ctx: CallContext,
) {
    if let Some(args) = type_arguments {
        if args.iter().any(ResolvedType::contains_type_parameter) {
            trace!(
                caller = %caller.parent,
                callee = %callee,
                "type arguments still mention type parameters"
            );
        }
    }
    for &kind in ctx.referenced_kinds() {
        graph.add_dependency(caller, kind, callee, type_arguments);
    }
}
