pub mod name;
pub mod types;
pub mod expr;
pub mod stmt;
pub mod specialization;
pub mod program;
pub mod error;

// Re-export commonly used types
pub use name::QualifiedName;
pub use types::{Characteristics, ResolvedType};
pub use expr::{ExpressionKind, Identifier, Literal, TypedExpression};
pub use stmt::{Scope, Statement, SymbolTuple};
pub use specialization::{
    Callable, CallableKind, Specialization, SpecializationImplementation, SpecializationKind,
};
pub use program::{Namespace, Program};
pub use error::CoreError;
