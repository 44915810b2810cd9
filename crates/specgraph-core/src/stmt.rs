//! Statements and scopes of a specialization body.

use serde::{Deserialize, Serialize};

use crate::expr::TypedExpression;
use crate::types::ResolvedType;

/// An ordered sequence of statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    pub statements: Vec<Statement>,
}

impl Scope {
    pub fn new(statements: Vec<Statement>) -> Self {
        Scope { statements }
    }
}

/// Left-hand side of a binding or loop item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolTuple {
    Declaration(String),
    Tuple(Vec<SymbolTuple>),
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingKind {
    /// `let`
    Immutable,
    /// `mutable`
    Mutable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QubitAllocationKind {
    /// `use`
    Allocate,
    /// `borrow`
    Borrow,
}

/// Right-hand side of a qubit allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QubitInitializer {
    /// `Qubit()`
    Single,
    /// `Qubit[size]`
    Register(TypedExpression),
    Tuple(Vec<QubitInitializer>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// An expression evaluated for its effect.
    Expression(TypedExpression),

    Return(TypedExpression),

    Fail(TypedExpression),

    /// `let lhs = rhs;` / `mutable lhs = rhs;`
    Binding {
        kind: BindingKind,
        lhs: SymbolTuple,
        rhs: TypedExpression,
    },

    /// `set lhs = rhs;`
    ValueUpdate {
        lhs: TypedExpression,
        rhs: TypedExpression,
    },

    /// `if c1 { .. } elif c2 { .. } else { .. }`
    Conditional {
        branches: Vec<(TypedExpression, Scope)>,
        default: Option<Scope>,
    },

    ForLoop {
        item: SymbolTuple,
        item_type: ResolvedType,
        iterable: TypedExpression,
        body: Scope,
    },

    WhileLoop {
        condition: TypedExpression,
        body: Scope,
    },

    /// `repeat { body } until condition fixup { fixup }`
    Repeat {
        body: Scope,
        condition: TypedExpression,
        fixup: Scope,
    },

    /// `within { outer } apply { inner }`
    Conjugation { outer: Scope, inner: Scope },

    /// `use q = Qubit[n] { body }` or, without a body, `use q = Qubit[n];`
    /// where the allocation lives until the end of the enclosing scope.
    QubitScope {
        kind: QubitAllocationKind,
        binding: SymbolTuple,
        initializer: QubitInitializer,
        body: Option<Scope>,
    },

    /// A nested `{ .. }` block.
    Block(Scope),
}

impl Statement {
    /// `let name = rhs;`
    pub fn let_binding(name: impl Into<String>, rhs: TypedExpression) -> Self {
        Statement::Binding {
            kind: BindingKind::Immutable,
            lhs: SymbolTuple::Declaration(name.into()),
            rhs,
        }
    }
}
