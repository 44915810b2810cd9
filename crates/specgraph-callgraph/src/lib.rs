//! Specialization call graph for functor-aware programs.
//!
//! Builds a directed graph over callable specializations (body, adjoint,
//! controlled, controlled adjoint) from a fully resolved
//! [`Program`](specgraph_core::Program), for consumption by later compiler
//! passes.
//!
//! # Modules
//!
//! - [`key`] -- Specialization keys and query results
//! - [`interner`] -- Type-argument hashing and the type table
//! - [`graph`] -- The call graph and its direct/transitive queries
//! - [`analyzer`] -- Call-context state and specialization-kind inference
//! - [`traversal`] -- Walking one specialization body
//! - [`driver`] -- Walking a whole program
//! - [`error`] -- Error types

pub mod analyzer;
pub mod driver;
pub mod error;
pub mod graph;
pub mod interner;
pub mod key;
pub mod traversal;

pub use driver::{build_call_graph, build_call_graph_with, CallGraphBuilder};
pub use error::CallGraphError;
pub use graph::CallGraph;
pub use key::{Dependency, SpecializationIdentity, SpecializationKey};

use std::path::Path;

use serde::{Deserialize, Serialize};

use specgraph_core::name::QualifiedName;

/// Options controlling how a call graph is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Callables the program is entered through. When non-empty, the built
    /// graph is trimmed to what these reach. Empty keeps every
    /// specialization.
    #[serde(default)]
    pub entry_points: Vec<QualifiedName>,
}

impl BuildOptions {
    /// Options that trim the graph to the given entry points.
    pub fn with_entry_points(entry_points: Vec<QualifiedName>) -> Self {
        BuildOptions { entry_points }
    }

    /// Save options to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), CallGraphError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load options from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CallGraphError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}
