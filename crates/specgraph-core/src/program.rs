//! The compiled program container.
//!
//! [`Program`] groups callables by namespace, in insertion order. It is the
//! single input of the call-graph pass, which walks every specialization via
//! [`Program::specializations`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::name::QualifiedName;
use crate::specialization::{Callable, Specialization};

/// A namespace and the callables declared in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
    /// Callables keyed by simple name, in declaration order.
    pub callables: IndexMap<String, Callable>,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Namespace {
            name: name.into(),
            callables: IndexMap::new(),
        }
    }
}

/// A fully resolved compiled program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Namespaces keyed by name, in declaration order.
    pub namespaces: IndexMap<String, Namespace>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Builder methods
    // -----------------------------------------------------------------------

    /// Declares a callable, creating its namespace on first use.
    ///
    /// Returns [`CoreError::DuplicateCallable`] if the name is taken.
    pub fn add_callable(&mut self, callable: Callable) -> Result<(), CoreError> {
        let namespace = self
            .namespaces
            .entry(callable.name.namespace.clone())
            .or_insert_with(|| Namespace::new(callable.name.namespace.clone()));

        if namespace.callables.contains_key(&callable.name.name) {
            return Err(CoreError::DuplicateCallable {
                name: callable.name.clone(),
            });
        }
        namespace
            .callables
            .insert(callable.name.name.clone(), callable);
        Ok(())
    }

    /// Adds a specialization to its (already declared) parent callable.
    ///
    /// Returns [`CoreError::UnknownCallable`] if the parent was never
    /// declared, and [`CoreError::DuplicateSpecialization`] if a
    /// specialization with the same kind and type arguments exists.
    pub fn add_specialization(&mut self, specialization: Specialization) -> Result<(), CoreError> {
        let callable = self
            .callable_mut(&specialization.parent)
            .ok_or_else(|| CoreError::UnknownCallable {
                name: specialization.parent.clone(),
            })?;

        let duplicate = callable.specializations.iter().any(|existing| {
            existing.kind == specialization.kind
                && existing.type_arguments == specialization.type_arguments
        });
        if duplicate {
            return Err(CoreError::DuplicateSpecialization {
                name: specialization.parent.clone(),
                kind: specialization.kind,
            });
        }

        callable.specializations.push(specialization);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    /// Looks up a callable by qualified name.
    pub fn callable(&self, name: &QualifiedName) -> Option<&Callable> {
        self.namespaces
            .get(&name.namespace)
            .and_then(|ns| ns.callables.get(&name.name))
    }

    fn callable_mut(&mut self, name: &QualifiedName) -> Option<&mut Callable> {
        self.namespaces
            .get_mut(&name.namespace)
            .and_then(|ns| ns.callables.get_mut(&name.name))
    }

    /// Every callable, in program order.
    pub fn callables(&self) -> impl Iterator<Item = &Callable> {
        self.namespaces.values().flat_map(|ns| ns.callables.values())
    }

    /// Every specialization, in program order (namespace, callable,
    /// specialization).
    pub fn specializations(&self) -> impl Iterator<Item = &Specialization> {
        self.callables().flat_map(|c| c.specializations.iter())
    }

    pub fn callable_count(&self) -> usize {
        self.namespaces.values().map(|ns| ns.callables.len()).sum()
    }
}
