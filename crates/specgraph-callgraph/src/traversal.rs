//! Structural traversal of one specialization body.
//!
//! [`SpecializationWalker`] is a single dispatcher over [`Node`]: scopes,
//! statements and expressions each have one case-handling function, and
//! nested regions are handed back to the matching function. Functor state
//! travels as a [`CallContext`] argument; every statement starts its
//! expressions from [`CallContext::value`], so nothing carries over between
//! sibling statements.
//!
//! Types, symbol declarations and spans are not looked at.

use specgraph_core::expr::{ExpressionKind, Identifier, TypedExpression};
use specgraph_core::specialization::Specialization;
use specgraph_core::stmt::{QubitInitializer, Scope, Statement};

use crate::analyzer::{record_callable_reference, CallContext};
use crate::graph::CallGraph;

/// A node of a specialization body.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Scope(&'a Scope),
    Statement(&'a Statement),
    Expression(&'a TypedExpression, CallContext),
}

/// Walks the body of one specialization, attributing every edge to it.
pub struct SpecializationWalker<'g, 's> {
    graph: &'g mut CallGraph,
    caller: &'s Specialization,
}

impl<'g, 's> SpecializationWalker<'g, 's> {
    pub fn new(graph: &'g mut CallGraph, caller: &'s Specialization) -> Self {
        SpecializationWalker { graph, caller }
    }

    /// The specialization edges are attributed to.
    pub fn caller(&self) -> &Specialization {
        self.caller
    }

    pub fn walk(&mut self, node: Node<'_>) {
        match node {
            Node::Scope(scope) => self.walk_scope(scope),
            Node::Statement(stmt) => self.walk_statement(stmt),
            Node::Expression(expr, ctx) => self.walk_expression(expr, ctx),
        }
    }

    fn walk_scope(&mut self, scope: &Scope) {
        for stmt in &scope.statements {
            self.walk_statement(stmt);
        }
    }

    fn walk_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Expression(expr) | Statement::Return(expr) | Statement::Fail(expr) => {
                self.walk_value(expr)
            }
            Statement::Binding { rhs, .. } => self.walk_value(rhs),
            Statement::ValueUpdate { lhs, rhs } => {
                self.walk_value(lhs);
                self.walk_value(rhs);
            }
            Statement::Conditional { branches, default } => {
                for (condition, block) in branches {
                    self.walk_value(condition);
                    self.walk_scope(block);
                }
                if let Some(block) = default {
                    self.walk_scope(block);
                }
            }
            Statement::ForLoop { iterable, body, .. } => {
                self.walk_value(iterable);
                self.walk_scope(body);
            }
            Statement::WhileLoop { condition, body } => {
                self.walk_value(condition);
                self.walk_scope(body);
            }
            Statement::Repeat {
                body,
                condition,
                fixup,
            } => {
                self.walk_scope(body);
                self.walk_value(condition);
                self.walk_scope(fixup);
            }
            Statement::Conjugation { outer, inner } => {
                self.walk_scope(outer);
                self.walk_scope(inner);
            }
            Statement::QubitScope {
                initializer, body, ..
            } => {
                self.walk_initializer(initializer);
                if let Some(block) = body {
                    self.walk_scope(block);
                }
            }
            Statement::Block(block) => self.walk_scope(block),
        }
    }

    fn walk_initializer(&mut self, initializer: &QubitInitializer) {
        match initializer {
            QubitInitializer::Single => {}
            QubitInitializer::Register(size) => self.walk_value(size),
            QubitInitializer::Tuple(items) => {
                for item in items {
                    self.walk_initializer(item);
                }
            }
        }
    }

    fn walk_value(&mut self, expr: &TypedExpression) {
        self.walk_expression(expr, CallContext::value());
    }

    fn walk_expression(&mut self, expr: &TypedExpression, ctx: CallContext) {
        match &expr.kind {
            ExpressionKind::Identifier {
                symbol: Identifier::GlobalCallable(name),
                type_arguments,
            } => record_callable_reference(
                self.graph,
                self.caller,
                name,
                type_arguments.as_deref(),
                ctx,
            ),
            ExpressionKind::Identifier { .. } => {}

            ExpressionKind::Call { callee, argument } => {
                self.walk_expression(callee, CallContext::callee());
                self.walk_value(argument);
            }
            ExpressionKind::AdjointApplication(inner) => {
                self.walk_expression(inner, ctx.adjoint())
            }
            ExpressionKind::ControlledApplication(inner) => {
                self.walk_expression(inner, ctx.controlled())
            }

            // Positions whose value may itself end up as the callee keep the
            // context.
            ExpressionKind::Tuple(items) if items.len() == 1 => {
                self.walk_expression(&items[0], ctx)
            }
            ExpressionKind::ValueArray(items) => {
                for item in items {
                    self.walk_expression(item, ctx);
                }
            }
            ExpressionKind::ArrayItem { array, index } => {
                self.walk_expression(array, ctx);
                self.walk_value(index);
            }
            ExpressionKind::Conditional {
                condition,
                if_true,
                if_false,
            } => {
                self.walk_value(condition);
                self.walk_expression(if_true, ctx);
                self.walk_expression(if_false, ctx);
            }

            ExpressionKind::Tuple(items) => {
                for item in items {
                    self.walk_value(item);
                }
            }
            ExpressionKind::SizedArray { value, size } => {
                self.walk_value(value);
                self.walk_value(size);
            }
            ExpressionKind::NewArray { length, .. } => self.walk_value(length),
            ExpressionKind::NamedItem { record, .. } => self.walk_value(record),
            ExpressionKind::Range { start, step, end } => {
                self.walk_value(start);
                if let Some(step) = step {
                    self.walk_value(step);
                }
                self.walk_value(end);
            }
            ExpressionKind::UnaryOp { operand, .. } => self.walk_value(operand),
            ExpressionKind::BinaryOp { lhs, rhs, .. } => {
                self.walk_value(lhs);
                self.walk_value(rhs);
            }
            ExpressionKind::CopyAndUpdate {
                original,
                accessor,
                value,
            } => {
                self.walk_value(original);
                self.walk_value(accessor);
                self.walk_value(value);
            }

            ExpressionKind::UnitValue
            | ExpressionKind::Literal(_)
            | ExpressionKind::MissingArgument => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Dependency;
    use specgraph_core::expr::{BinaryOp, Literal, UnaryOp};
    use specgraph_core::name::QualifiedName;
    use specgraph_core::specialization::SpecializationKind;
    use specgraph_core::stmt::{BindingKind, QubitAllocationKind, SymbolTuple};
    use specgraph_core::types::ResolvedType;

    fn name(n: &str) -> QualifiedName {
        QualifiedName::new("Test", n)
    }

    fn op(n: &str) -> TypedExpression {
        TypedExpression::global(name(n), ResolvedType::Unit)
    }

    fn call(callee: TypedExpression) -> TypedExpression {
        TypedExpression::call(
            callee,
            TypedExpression::local("q", ResolvedType::Qubit),
            ResolvedType::Unit,
        )
    }

    /// `n()`, typed as `Int`.
    fn invoke(n: &str) -> TypedExpression {
        TypedExpression::call(op(n), TypedExpression::unit(), ResolvedType::Int)
    }

    fn int_expr(kind: ExpressionKind) -> TypedExpression {
        TypedExpression::new(kind, ResolvedType::Int)
    }

    fn bodies(names: &[&str]) -> Vec<Dependency> {
        names
            .iter()
            .map(|n| dep(n, SpecializationKind::Body))
            .collect()
    }

    fn dep(n: &str, kind: SpecializationKind) -> Dependency {
        Dependency::new(name(n), kind, None)
    }

    fn caller() -> Specialization {
        Specialization::provided(name("Main"), SpecializationKind::Body, Scope::default())
    }

    /// Walks `stmts` as the body of `Test.Main` and returns its direct
    /// dependencies.
    fn walk(stmts: Vec<Statement>) -> Vec<Dependency> {
        let caller = caller();
        let scope = Scope::new(stmts);
        let mut graph = CallGraph::new();
        SpecializationWalker::new(&mut graph, &caller).walk(Node::Scope(&scope));
        graph.direct_dependencies(&caller).unwrap()
    }

    fn walk_expr(expr: TypedExpression) -> Vec<Dependency> {
        walk(vec![Statement::Expression(expr)])
    }

    #[test]
    fn plain_call_records_body() {
        assert_eq!(
            walk_expr(call(op("Op"))),
            vec![dep("Op", SpecializationKind::Body)]
        );
    }

    #[test]
    fn functor_applications_select_kind() {
        let cases = vec![
            (TypedExpression::adjoint(op("Op")), SpecializationKind::Adjoint),
            (TypedExpression::controlled(op("Op")), SpecializationKind::Controlled),
            (
                TypedExpression::controlled(TypedExpression::adjoint(op("Op"))),
                SpecializationKind::ControlledAdjoint,
            ),
            (
                TypedExpression::adjoint(TypedExpression::controlled(op("Op"))),
                SpecializationKind::ControlledAdjoint,
            ),
            (
                TypedExpression::adjoint(TypedExpression::adjoint(op("Op"))),
                SpecializationKind::Body,
            ),
            (
                TypedExpression::controlled(TypedExpression::controlled(op("Op"))),
                SpecializationKind::Controlled,
            ),
        ];
        for (callee, kind) in cases {
            assert_eq!(walk_expr(call(callee)), vec![dep("Op", kind)]);
        }
    }

    #[test]
    fn callable_bound_as_value_records_all_kinds() {
        let deps = walk(vec![Statement::let_binding("f", op("Op"))]);
        assert_eq!(
            deps,
            SpecializationKind::ALL
                .iter()
                .map(|&kind| dep("Op", kind))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn callable_passed_as_argument_records_all_kinds() {
        let expr = TypedExpression::call(
            op("ApplyToEach"),
            TypedExpression::tuple(vec![
                op("H"),
                TypedExpression::local("qs", ResolvedType::Unit),
            ]),
            ResolvedType::Unit,
        );
        let deps = walk_expr(expr);
        assert_eq!(deps.len(), 5);
        assert_eq!(deps[0], dep("ApplyToEach", SpecializationKind::Body));
        assert!(deps[1..].iter().all(|d| d.callable == name("H")));
    }

    #[test]
    fn inner_functor_does_not_leak_into_outer_call() {
        // Op1(Adjoint Op2(x))
        let inner = call(TypedExpression::adjoint(op("Op2")));
        let outer = TypedExpression::call(op("Op1"), inner, ResolvedType::Unit);
        assert_eq!(
            walk_expr(outer),
            vec![
                dep("Op1", SpecializationKind::Body),
                dep("Op2", SpecializationKind::Adjoint),
            ]
        );
    }

    #[test]
    fn outer_functor_does_not_leak_into_argument_calls() {
        // Adjoint Op1(Op2(x))
        let inner = call(op("Op2"));
        let outer = TypedExpression::call(
            TypedExpression::adjoint(op("Op1")),
            inner,
            ResolvedType::Unit,
        );
        assert_eq!(
            walk_expr(outer),
            vec![
                dep("Op1", SpecializationKind::Adjoint),
                dep("Op2", SpecializationKind::Body),
            ]
        );
    }

    #[test]
    fn locals_and_literals_record_nothing() {
        let expr = TypedExpression::new(
            ExpressionKind::BinaryOp {
                op: BinaryOp::Add,
                lhs: Box::new(TypedExpression::local("x", ResolvedType::Int)),
                rhs: Box::new(TypedExpression::new(
                    ExpressionKind::Literal(Literal::Int(1)),
                    ResolvedType::Int,
                )),
            },
            ResolvedType::Int,
        );
        assert!(walk_expr(expr).is_empty());

        let invalid = TypedExpression::new(
            ExpressionKind::Identifier {
                symbol: Identifier::Invalid,
                type_arguments: None,
            },
            ResolvedType::Unit,
        );
        assert!(walk_expr(call(invalid)).is_empty());
    }

    #[test]
    fn call_through_local_records_nothing() {
        assert!(walk_expr(call(TypedExpression::local("f", ResolvedType::Unit))).is_empty());
    }

    #[test]
    fn conditional_callee_keeps_call_context() {
        // (c ? Adjoint Op1 | Op2)(q), with c = Check()
        let condition =
            TypedExpression::call(op("Check"), TypedExpression::unit(), ResolvedType::Bool);
        let callee = TypedExpression::new(
            ExpressionKind::Conditional {
                condition: Box::new(condition),
                if_true: Box::new(TypedExpression::adjoint(op("Op1"))),
                if_false: Box::new(op("Op2")),
            },
            ResolvedType::Unit,
        );
        assert_eq!(
            walk_expr(call(TypedExpression::controlled(callee))),
            vec![
                dep("Check", SpecializationKind::Body),
                dep("Op1", SpecializationKind::ControlledAdjoint),
                dep("Op2", SpecializationKind::Controlled),
            ]
        );
    }

    #[test]
    fn indexed_array_callee_keeps_call_context() {
        // [Op1, Op2][i](q)
        let callee = TypedExpression::new(
            ExpressionKind::ArrayItem {
                array: Box::new(TypedExpression::new(
                    ExpressionKind::ValueArray(vec![op("Op1"), op("Op2")]),
                    ResolvedType::Unit,
                )),
                index: Box::new(TypedExpression::local("i", ResolvedType::Int)),
            },
            ResolvedType::Unit,
        );
        assert_eq!(
            walk_expr(call(TypedExpression::adjoint(callee))),
            vec![
                dep("Op1", SpecializationKind::Adjoint),
                dep("Op2", SpecializationKind::Adjoint),
            ]
        );
    }

    #[test]
    fn parenthesised_callee_keeps_call_context() {
        let callee = TypedExpression::tuple(vec![TypedExpression::adjoint(op("Op"))]);
        assert_eq!(
            walk_expr(call(callee)),
            vec![dep("Op", SpecializationKind::Adjoint)]
        );
    }

    #[test]
    fn call_returning_callable_is_called_as_body() {
        // GetOp()(q): GetOp is called; the returned value is opaque.
        let get_op =
            TypedExpression::call(op("GetOp"), TypedExpression::unit(), ResolvedType::Unit);
        assert_eq!(
            walk_expr(call(TypedExpression::adjoint(get_op))),
            vec![dep("GetOp", SpecializationKind::Body)]
        );
    }

    #[test]
    fn explicit_type_arguments_are_recorded_verbatim() {
        let generic = TypedExpression::generic(
            name("Identity"),
            vec![ResolvedType::type_parameter(name("Identity"), "T")],
            ResolvedType::Unit,
        );
        let partial = TypedExpression::call(
            generic,
            TypedExpression::tuple(vec![
                TypedExpression::missing(ResolvedType::Unit),
                TypedExpression::int(1),
            ]),
            ResolvedType::Unit,
        );
        assert!(partial.is_partial_application());

        let deps = walk(vec![Statement::let_binding("f", partial)]);
        assert_eq!(
            deps,
            vec![Dependency::new(
                name("Identity"),
                SpecializationKind::Body,
                Some(vec![ResolvedType::type_parameter(name("Identity"), "T")]),
            )]
        );
        let recorded = deps[0].type_arguments.as_deref().unwrap_or_default();
        assert!(recorded.iter().any(ResolvedType::contains_type_parameter));
    }

    #[test]
    fn sized_array_operands_are_walked() {
        // [Op1(), size = Size()]
        let expr = int_expr(ExpressionKind::SizedArray {
            value: Box::new(invoke("Op1")),
            size: Box::new(invoke("Size")),
        });
        assert_eq!(walk_expr(expr), bodies(&["Op1", "Size"]));
    }

    #[test]
    fn new_array_length_is_walked() {
        // new Int[Len()]
        let expr = int_expr(ExpressionKind::NewArray {
            item_type: ResolvedType::Int,
            length: Box::new(invoke("Len")),
        });
        assert_eq!(walk_expr(expr), bodies(&["Len"]));
    }

    #[test]
    fn named_item_record_is_walked() {
        // Get()::item
        let expr = int_expr(ExpressionKind::NamedItem {
            record: Box::new(invoke("Get")),
            item: "item".into(),
        });
        assert_eq!(walk_expr(expr), bodies(&["Get"]));
    }

    #[test]
    fn range_bounds_and_step_are_walked() {
        // Lo()..Step()..Hi()
        let expr = int_expr(ExpressionKind::Range {
            start: Box::new(invoke("Lo")),
            step: Some(Box::new(invoke("Step"))),
            end: Box::new(invoke("Hi")),
        });
        assert_eq!(walk_expr(expr), bodies(&["Hi", "Lo", "Step"]));

        // Lo()..Hi()
        let expr = int_expr(ExpressionKind::Range {
            start: Box::new(invoke("Lo")),
            step: None,
            end: Box::new(invoke("Hi")),
        });
        assert_eq!(walk_expr(expr), bodies(&["Hi", "Lo"]));
    }

    #[test]
    fn operator_operands_are_walked() {
        // -Neg()
        let unary = int_expr(ExpressionKind::UnaryOp {
            op: UnaryOp::Negate,
            operand: Box::new(invoke("Neg")),
        });
        assert_eq!(walk_expr(unary), bodies(&["Neg"]));

        // Lhs() + Rhs()
        let binary = int_expr(ExpressionKind::BinaryOp {
            op: BinaryOp::Add,
            lhs: Box::new(invoke("Lhs")),
            rhs: Box::new(invoke("Rhs")),
        });
        assert_eq!(walk_expr(binary), bodies(&["Lhs", "Rhs"]));
    }

    #[test]
    fn copy_and_update_operands_are_walked() {
        // Orig() w/ Acc() <- Val()
        let expr = int_expr(ExpressionKind::CopyAndUpdate {
            original: Box::new(invoke("Orig")),
            accessor: Box::new(invoke("Acc")),
            value: Box::new(invoke("Val")),
        });
        assert_eq!(walk_expr(expr), bodies(&["Acc", "Orig", "Val"]));
    }

    #[test]
    fn callable_in_operand_position_is_a_value() {
        // r w/ 0 <- Op
        let update = int_expr(ExpressionKind::CopyAndUpdate {
            original: Box::new(TypedExpression::local("r", ResolvedType::Int)),
            accessor: Box::new(TypedExpression::int(0)),
            value: Box::new(op("Op")),
        });
        let all_kinds: Vec<Dependency> = SpecializationKind::ALL
            .iter()
            .map(|&kind| dep("Op", kind))
            .collect();
        assert_eq!(walk(vec![Statement::let_binding("s", update)]), all_kinds);
    }

    #[test]
    fn operand_positions_do_not_inherit_call_context() {
        // Each expression is the callee of `Adjoint (...)(q)`, with a bare
        // `Op` in an operand position. The operand is a value, so all four
        // specializations are recorded rather than only the adjoint.
        let boxed = || Box::new(op("Op"));
        let zero = || Box::new(TypedExpression::int(0));
        let cases = vec![
            ExpressionKind::SizedArray {
                value: boxed(),
                size: zero(),
            },
            ExpressionKind::NewArray {
                item_type: ResolvedType::Unit,
                length: boxed(),
            },
            ExpressionKind::NamedItem {
                record: boxed(),
                item: "item".into(),
            },
            ExpressionKind::Range {
                start: zero(),
                step: Some(boxed()),
                end: zero(),
            },
            ExpressionKind::UnaryOp {
                op: UnaryOp::BitwiseNot,
                operand: boxed(),
            },
            ExpressionKind::BinaryOp {
                op: BinaryOp::Add,
                lhs: zero(),
                rhs: boxed(),
            },
            ExpressionKind::CopyAndUpdate {
                original: zero(),
                accessor: zero(),
                value: boxed(),
            },
        ];

        let all_kinds: Vec<Dependency> = SpecializationKind::ALL
            .iter()
            .map(|&kind| dep("Op", kind))
            .collect();
        for kind in cases {
            let callee = TypedExpression::new(kind, ResolvedType::Unit);
            assert_eq!(walk_expr(call(TypedExpression::adjoint(callee))), all_kinds);
        }
    }

    #[test]
    fn state_does_not_leak_between_statements() {
        let deps = walk(vec![
            Statement::Expression(call(TypedExpression::adjoint(op("Op1")))),
            Statement::Expression(call(op("Op2"))),
        ]);
        assert_eq!(
            deps,
            vec![
                dep("Op1", SpecializationKind::Adjoint),
                dep("Op2", SpecializationKind::Body),
            ]
        );
    }

    #[test]
    fn nested_statement_regions_are_walked() {
        let stmts = vec![
            Statement::Conditional {
                branches: vec![(
                    TypedExpression::call(
                        op("Cond"),
                        TypedExpression::unit(),
                        ResolvedType::Bool,
                    ),
                    Scope::new(vec![Statement::Expression(call(op("Then")))]),
                )],
                default: Some(Scope::new(vec![Statement::Expression(call(op("Else")))])),
            },
            Statement::ForLoop {
                item: SymbolTuple::Declaration("i".into()),
                item_type: ResolvedType::Int,
                iterable: TypedExpression::call(
                    op("Items"),
                    TypedExpression::unit(),
                    ResolvedType::Unit,
                ),
                body: Scope::new(vec![Statement::Expression(call(op("Loop")))]),
            },
            Statement::WhileLoop {
                condition: TypedExpression::bool(true),
                body: Scope::new(vec![Statement::Return(call(op("While")))]),
            },
            Statement::Repeat {
                body: Scope::new(vec![Statement::Expression(call(op("Repeat")))]),
                condition: TypedExpression::call(
                    op("Until"),
                    TypedExpression::unit(),
                    ResolvedType::Bool,
                ),
                fixup: Scope::new(vec![Statement::Fail(call(op("Fixup")))]),
            },
            Statement::Conjugation {
                outer: Scope::new(vec![Statement::Expression(call(op("Within")))]),
                inner: Scope::new(vec![Statement::Expression(call(op("Apply")))]),
            },
            Statement::QubitScope {
                kind: QubitAllocationKind::Allocate,
                binding: SymbolTuple::Declaration("qs".into()),
                initializer: QubitInitializer::Tuple(vec![
                    QubitInitializer::Single,
                    QubitInitializer::Register(TypedExpression::call(
                        op("Size"),
                        TypedExpression::unit(),
                        ResolvedType::Int,
                    )),
                ]),
                body: Some(Scope::new(vec![Statement::Block(Scope::new(vec![
                    Statement::Expression(call(op("Inner"))),
                ]))])),
            },
            Statement::Binding {
                kind: BindingKind::Mutable,
                lhs: SymbolTuple::Declaration("r".into()),
                rhs: TypedExpression::int(0),
            },
            Statement::ValueUpdate {
                lhs: TypedExpression::local("r", ResolvedType::Int),
                rhs: TypedExpression::call(
                    op("Update"),
                    TypedExpression::unit(),
                    ResolvedType::Int,
                ),
            },
        ];

        let called: Vec<String> = walk(stmts).into_iter().map(|d| d.callable.name).collect();
        assert_eq!(
            called,
            vec![
                "Apply", "Cond", "Else", "Fixup", "Inner", "Items", "Loop", "Repeat", "Size",
                "Then", "Until", "Update", "While", "Within",
            ]
        );
    }

    #[test]
    fn expression_node_uses_supplied_context() {
        let caller = caller();
        let expr = op("Op");
        let mut graph = CallGraph::new();
        let mut walker = SpecializationWalker::new(&mut graph, &caller);
        assert_eq!(walker.caller().parent, name("Main"));
        walker.walk(Node::Expression(&expr, CallContext::callee().controlled()));
        assert_eq!(
            graph.direct_dependencies(&caller).unwrap(),
            vec![dep("Op", SpecializationKind::Controlled)]
        );
    }
}
