//! Typed expression tree.
//!
//! Expressions arrive fully resolved: every identifier is already bound to a
//! local symbol or a global callable, and every node carries its
//! [`ResolvedType`]. Only the shapes the call graph cares about (calls,
//! functor applications, identifiers) have meaning beyond structure; the
//! rest of the grammar exists so traversal can reach nested calls.

use serde::{Deserialize, Serialize};

use crate::name::QualifiedName;
use crate::types::ResolvedType;

/// Half-open source range, in bytes. Ignored by every analysis in this
/// workspace; carried so consumers can report locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

/// An expression together with its resolved type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedExpression {
    pub kind: ExpressionKind,
    pub ty: ResolvedType,
    pub span: Option<Span>,
}

/// What an identifier was bound to by name resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Identifier {
    /// A local variable or parameter.
    Local(String),
    /// A function, operation or type constructor declared at namespace level.
    GlobalCallable(QualifiedName),
    /// Resolution failed; earlier phases have already reported it.
    Invalid,
}

/// Literal values.
///
/// `PartialEq` only: `Double` holds an `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Int(i64),
    /// Arbitrary-precision integer in decimal notation.
    BigInt(String),
    Double(f64),
    Bool(bool),
    String(String),
    Result(bool),
    Pauli(Pauli),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pauli {
    I,
    X,
    Y,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Negate,
    LogicalNot,
    BitwiseNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

/// Expression node kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionKind {
    UnitValue,

    Literal(Literal),

    /// Reference to a symbol, with the explicit type arguments written (or
    /// inferred) at the reference site. `None` means the reference carries
    /// no type arguments at all.
    Identifier {
        symbol: Identifier,
        type_arguments: Option<Vec<ResolvedType>>,
    },

    /// `callee(argument)`. Partial application is a call whose argument
    /// contains [`ExpressionKind::MissingArgument`] items.
    Call {
        callee: Box<TypedExpression>,
        argument: Box<TypedExpression>,
    },

    /// `Adjoint inner`
    AdjointApplication(Box<TypedExpression>),

    /// `Controlled inner`
    ControlledApplication(Box<TypedExpression>),

    /// `(a, b, ...)`. A single-item tuple is a parenthesised expression.
    Tuple(Vec<TypedExpression>),

    /// `[a, b, ...]`
    ValueArray(Vec<TypedExpression>),

    /// `[value, size = n]`
    SizedArray {
        value: Box<TypedExpression>,
        size: Box<TypedExpression>,
    },

    /// `new T[length]`
    NewArray {
        item_type: ResolvedType,
        length: Box<TypedExpression>,
    },

    /// `array[index]`
    ArrayItem {
        array: Box<TypedExpression>,
        index: Box<TypedExpression>,
    },

    /// `record::item`
    NamedItem {
        record: Box<TypedExpression>,
        item: String,
    },

    /// `start..step..end`
    Range {
        start: Box<TypedExpression>,
        step: Option<Box<TypedExpression>>,
        end: Box<TypedExpression>,
    },

    UnaryOp {
        op: UnaryOp,
        operand: Box<TypedExpression>,
    },

    BinaryOp {
        op: BinaryOp,
        lhs: Box<TypedExpression>,
        rhs: Box<TypedExpression>,
    },

    /// `condition ? if_true | if_false`
    Conditional {
        condition: Box<TypedExpression>,
        if_true: Box<TypedExpression>,
        if_false: Box<TypedExpression>,
    },

    /// `original w/ accessor <- value`
    CopyAndUpdate {
        original: Box<TypedExpression>,
        accessor: Box<TypedExpression>,
        value: Box<TypedExpression>,
    },

    /// `_` in a partial application.
    MissingArgument,
}

// ---------------------------------------------------------------------------
// Builder helpers
// ---------------------------------------------------------------------------

impl TypedExpression {
    /// Wraps a kind with its type and no source span.
    pub fn new(kind: ExpressionKind, ty: ResolvedType) -> Self {
        TypedExpression {
            kind,
            ty,
            span: None,
        }
    }

    /// Attaches a source span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn unit() -> Self {
        TypedExpression::new(ExpressionKind::UnitValue, ResolvedType::Unit)
    }

    pub fn int(value: i64) -> Self {
        TypedExpression::new(ExpressionKind::Literal(Literal::Int(value)), ResolvedType::Int)
    }

    pub fn bool(value: bool) -> Self {
        TypedExpression::new(ExpressionKind::Literal(Literal::Bool(value)), ResolvedType::Bool)
    }

    /// A reference to a local variable.
    pub fn local(name: impl Into<String>, ty: ResolvedType) -> Self {
        TypedExpression::new(
            ExpressionKind::Identifier {
                symbol: Identifier::Local(name.into()),
                type_arguments: None,
            },
            ty,
        )
    }

    /// A reference to a global callable without type arguments.
    pub fn global(name: QualifiedName, ty: ResolvedType) -> Self {
        TypedExpression::new(
            ExpressionKind::Identifier {
                symbol: Identifier::GlobalCallable(name),
                type_arguments: None,
            },
            ty,
        )
    }

    /// A reference to a global callable with explicit type arguments.
    pub fn generic(
        name: QualifiedName,
        type_arguments: Vec<ResolvedType>,
        ty: ResolvedType,
    ) -> Self {
        TypedExpression::new(
            ExpressionKind::Identifier {
                symbol: Identifier::GlobalCallable(name),
                type_arguments: Some(type_arguments),
            },
            ty,
        )
    }

    /// `callee(argument)`, typed as `ty`.
    pub fn call(callee: TypedExpression, argument: TypedExpression, ty: ResolvedType) -> Self {
        TypedExpression::new(
            ExpressionKind::Call {
                callee: Box::new(callee),
                argument: Box::new(argument),
            },
            ty,
        )
    }

    /// `Adjoint inner`; keeps the inner type.
    pub fn adjoint(inner: TypedExpression) -> Self {
        let ty = inner.ty.clone();
        TypedExpression::new(ExpressionKind::AdjointApplication(Box::new(inner)), ty)
    }

    /// `Controlled inner`. The type is left as the inner type; the control
    /// register is not modelled at this level.
    pub fn controlled(inner: TypedExpression) -> Self {
        let ty = inner.ty.clone();
        TypedExpression::new(ExpressionKind::ControlledApplication(Box::new(inner)), ty)
    }

    pub fn tuple(items: Vec<TypedExpression>) -> Self {
        let ty = match items.as_slice() {
            [] => ResolvedType::Unit,
            [single] => single.ty.clone(),
            _ => ResolvedType::Tuple(items.iter().map(|e| e.ty.clone()).collect()),
        };
        TypedExpression::new(ExpressionKind::Tuple(items), ty)
    }

    pub fn missing(ty: ResolvedType) -> Self {
        TypedExpression::new(ExpressionKind::MissingArgument, ty)
    }

    /// Returns `true` for a partial application: a call whose argument has a
    /// `_` placeholder at any tuple position.
    pub fn is_partial_application(&self) -> bool {
        fn has_missing(expr: &TypedExpression) -> bool {
            match &expr.kind {
                ExpressionKind::MissingArgument => true,
                ExpressionKind::Tuple(items) => items.iter().any(has_missing),
                _ => false,
            }
        }
        match &self.kind {
            ExpressionKind::Call { argument, .. } => has_missing(argument),
            _ => false,
        }
    }
}
