//! Core error types for specgraph-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! ways a program can be assembled inconsistently.

use thiserror::Error;

use crate::name::QualifiedName;
use crate::specialization::SpecializationKind;

/// Errors produced while building a [`Program`](crate::program::Program).
#[derive(Debug, Error)]
pub enum CoreError {
    /// A callable with this name was already declared.
    #[error("duplicate callable: '{name}'")]
    DuplicateCallable { name: QualifiedName },

    /// The callable already has a specialization of this kind with the same
    /// type arguments.
    #[error("duplicate {kind} specialization for '{name}'")]
    DuplicateSpecialization {
        name: QualifiedName,
        kind: SpecializationKind,
    },

    /// A specialization names a parent callable that was never declared.
    #[error("unknown callable: '{name}'")]
    UnknownCallable { name: QualifiedName },
}
