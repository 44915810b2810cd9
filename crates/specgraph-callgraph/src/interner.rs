//! Type-argument interning.
//!
//! Specialization keys do not store [`ResolvedType`] values directly. Each
//! type argument is reduced to a [`TypeHash`] (blake3 over the canonical
//! serde_json encoding of the type) and the first type seen for a hash is
//! kept in the [`TypeInterner`] so it can be handed back on query.
//!
//! # Determinism
//!
//! `ResolvedType` contains no `HashMap`, so its JSON encoding, and with it
//! the hash, depends only on the type's structure.
//!
//! # Identity
//!
//! Two types are treated as the same type argument iff their hashes are
//! equal. blake3 is collision-resistant, not collision-free; see DESIGN.md.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use specgraph_core::types::ResolvedType;

use crate::error::CallGraphError;

/// blake3 digest of a resolved type. Stored as `[u8; 32]` for `Ord` and
/// serde support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeHash(pub [u8; 32]);

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", blake3::Hash::from(self.0).to_hex())
    }
}

impl TypeHash {
    /// First eight hex digits, for logs and graph dumps.
    pub fn short(&self) -> String {
        let mut hex = self.to_string();
        hex.truncate(8);
        hex
    }
}

/// Computes the hash of a resolved type.
///
/// Pure: the same type always produces the same hash, and structurally
/// different types produce different hashes (up to blake3 collisions).
pub fn hash_type(ty: &ResolvedType) -> TypeHash {
    let mut hasher = blake3::Hasher::new();
    serde_json::to_writer(&mut hasher, ty)
        .expect("ResolvedType serialization should never fail");
    TypeHash(*hasher.finalize().as_bytes())
}

/// Hashes a list of type arguments without recording anything.
///
/// Used to build lookup keys for read-only queries.
pub fn hash_types(types: &[ResolvedType]) -> Vec<TypeHash> {
    types.iter().map(hash_type).collect()
}

/// Append-only table from [`TypeHash`] to the type that produced it.
#[derive(Debug, Clone, Default)]
pub struct TypeInterner {
    types: HashMap<TypeHash, ResolvedType>,
}

impl TypeInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns one type and returns its hash. A type already in the table
    /// keeps its stored entry.
    pub fn intern_type(&mut self, ty: &ResolvedType) -> TypeHash {
        let hash = hash_type(ty);
        self.types.entry(hash).or_insert_with(|| ty.clone());
        hash
    }

    /// Interns a list of type arguments, preserving order.
    pub fn intern(&mut self, types: &[ResolvedType]) -> Vec<TypeHash> {
        types.iter().map(|ty| self.intern_type(ty)).collect()
    }

    /// Interns an optional list. `None` ("no type arguments") stays `None`;
    /// `Some(&[])` becomes `Some(vec![])`.
    pub fn intern_optional(&mut self, types: Option<&[ResolvedType]>) -> Option<Vec<TypeHash>> {
        types.map(|types| self.intern(types))
    }

    /// Returns the type stored for a hash.
    pub fn get(&self, hash: &TypeHash) -> Option<&ResolvedType> {
        self.types.get(hash)
    }

    /// Reconstructs a list of type arguments, in order.
    ///
    /// Returns [`CallGraphError::UnknownTypeHash`] for a hash that was never
    /// interned.
    pub fn resolve(&self, hashes: &[TypeHash]) -> Result<Vec<ResolvedType>, CallGraphError> {
        hashes
            .iter()
            .map(|hash| {
                self.types
                    .get(hash)
                    .cloned()
                    .ok_or(CallGraphError::UnknownTypeHash { hash: *hash })
            })
            .collect()
    }

    /// Optional counterpart of [`resolve`](Self::resolve).
    pub fn resolve_optional(
        &self,
        hashes: Option<&[TypeHash]>,
    ) -> Result<Option<Vec<ResolvedType>>, CallGraphError> {
        hashes.map(|hashes| self.resolve(hashes)).transpose()
    }

    /// Number of distinct types recorded.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
