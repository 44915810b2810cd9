//! Call-graph error types.

use crate::interner::TypeHash;

/// Errors that can occur while querying a call graph or loading its
/// build options.
#[derive(Debug, thiserror::Error)]
pub enum CallGraphError {
    /// A key refers to a type-argument hash the interner never produced.
    ///
    /// This is an internal-consistency failure, not a user-facing
    /// condition: hashes only enter keys through the interner.
    #[error("type-argument hash {hash} was never interned")]
    UnknownTypeHash { hash: TypeHash },

    /// Filesystem I/O error while reading or writing options.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Options file is not valid JSON for [`BuildOptions`](crate::BuildOptions).
    #[error("invalid build options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}
