//! Resolved types as handed over by the type checker.
//!
//! A [`ResolvedType`] is fully elaborated: every user-defined type is named
//! by its [`QualifiedName`] and every generic parameter names the callable
//! that declares it. The call graph never inspects these values beyond
//! hashing them, so the representation favours structural equality and a
//! deterministic serde encoding (no `HashMap` anywhere in the tree).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::name::QualifiedName;

/// A fully resolved type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolvedType {
    Unit,
    Int,
    BigInt,
    Double,
    Bool,
    String,
    Qubit,
    Result,
    Pauli,
    Range,

    /// Array of a single element type: `T[]`.
    Array(Box<ResolvedType>),

    /// Tuple of two or more items, in declaration order.
    Tuple(Vec<ResolvedType>),

    /// A user-defined type, referenced by name (nominal typing).
    UserDefined(QualifiedName),

    /// A generic parameter that has not been substituted, e.g. the `'T` of
    /// a partially applied generic callable.
    TypeParameter {
        /// The callable that declares the parameter.
        origin: QualifiedName,
        name: String,
    },

    /// Classical function: `input -> output`.
    Function {
        input: Box<ResolvedType>,
        output: Box<ResolvedType>,
    },

    /// Operation: `input => output is characteristics`.
    Operation {
        input: Box<ResolvedType>,
        output: Box<ResolvedType>,
        characteristics: Characteristics,
    },
}

/// Functors supported by an operation type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Characteristics {
    pub adjointable: bool,
    pub controllable: bool,
}

impl Characteristics {
    /// `is Adj + Ctl`
    pub const ADJ_CTL: Characteristics = Characteristics {
        adjointable: true,
        controllable: true,
    };
}

impl ResolvedType {
    /// Shorthand for `T[]`.
    pub fn array(element: ResolvedType) -> Self {
        ResolvedType::Array(Box::new(element))
    }

    /// Shorthand for a function type.
    pub fn function(input: ResolvedType, output: ResolvedType) -> Self {
        ResolvedType::Function {
            input: Box::new(input),
            output: Box::new(output),
        }
    }

    /// Shorthand for an operation type.
    pub fn operation(
        input: ResolvedType,
        output: ResolvedType,
        characteristics: Characteristics,
    ) -> Self {
        ResolvedType::Operation {
            input: Box::new(input),
            output: Box::new(output),
            characteristics,
        }
    }

    /// Shorthand for a generic parameter declared by `origin`.
    pub fn type_parameter(origin: QualifiedName, name: impl Into<String>) -> Self {
        ResolvedType::TypeParameter {
            origin,
            name: name.into(),
        }
    }

    /// Returns `true` if the type still mentions an unsubstituted generic
    /// parameter anywhere in its structure.
    pub fn contains_type_parameter(&self) -> bool {
        match self {
            ResolvedType::TypeParameter { .. } => true,
            ResolvedType::Array(element) => element.contains_type_parameter(),
            ResolvedType::Tuple(items) => items.iter().any(|t| t.contains_type_parameter()),
            ResolvedType::Function { input, output }
            | ResolvedType::Operation { input, output, .. } => {
                input.contains_type_parameter() || output.contains_type_parameter()
            }
            _ => false,
        }
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedType::Unit => f.write_str("Unit"),
            ResolvedType::Int => f.write_str("Int"),
            ResolvedType::BigInt => f.write_str("BigInt"),
            ResolvedType::Double => f.write_str("Double"),
            ResolvedType::Bool => f.write_str("Bool"),
            ResolvedType::String => f.write_str("String"),
            ResolvedType::Qubit => f.write_str("Qubit"),
            ResolvedType::Result => f.write_str("Result"),
            ResolvedType::Pauli => f.write_str("Pauli"),
            ResolvedType::Range => f.write_str("Range"),
            ResolvedType::Array(element) => write!(f, "{}[]", element),
            ResolvedType::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
            ResolvedType::UserDefined(name) => write!(f, "{}", name),
            ResolvedType::TypeParameter { name, .. } => write!(f, "'{}", name),
            ResolvedType::Function { input, output } => write!(f, "({} -> {})", input, output),
            ResolvedType::Operation {
                input,
                output,
                characteristics,
            } => {
                write!(f, "({} => {}", input, output)?;
                match (characteristics.adjointable, characteristics.controllable) {
                    (true, true) => f.write_str(" is Adj + Ctl)"),
                    (true, false) => f.write_str(" is Adj)"),
                    (false, true) => f.write_str(" is Ctl)"),
                    (false, false) => f.write_str(")"),
                }
            }
        }
    }
}
