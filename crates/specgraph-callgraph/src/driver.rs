//! Program-level driver.
//!
//! [`CallGraphBuilder`] visits every specialization of a [`Program`] once,
//! in program order. For each one with a body it binds the specialization
//! as the current caller and walks the body with a fresh
//! [`SpecializationWalker`]. The finished graph is handed out by
//! [`CallGraphBuilder::finish`].

use tracing::{debug, debug_span};

use specgraph_core::program::Program;
use specgraph_core::specialization::Specialization;
use specgraph_core::stmt::Scope;

use crate::graph::CallGraph;
use crate::traversal::{Node, SpecializationWalker};
use crate::BuildOptions;

/// Accumulates a [`CallGraph`] across specializations.
#[derive(Debug, Default)]
pub struct CallGraphBuilder<'p> {
    graph: CallGraph,
    /// The specialization whose body is being walked.
    current: Option<&'p Specialization>,
    walked: usize,
}

impl<'p> CallGraphBuilder<'p> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visits every specialization in the program.
    pub fn visit_program(&mut self, program: &'p Program) {
        for spec in program.specializations() {
            self.visit_specialization(spec);
        }
    }

    /// Binds `spec` as the current caller and walks its body, if it has
    /// one. Intrinsic, external and generated specializations have nothing
    /// to walk.
    pub fn visit_specialization(&mut self, spec: &'p Specialization) {
        let Some(body) = spec.implementation.body() else {
            return;
        };

        let span = debug_span!("specialization", callable = %spec.parent, kind = %spec.kind);
        let _guard = span.enter();

        self.current = Some(spec);
        self.visit_scope(body);
        self.current = None;
        self.walked += 1;
    }

    /// Walks `scope` on behalf of the bound specialization. Without one
    /// there is no caller to attribute edges to and the scope is skipped.
    pub fn visit_scope(&mut self, scope: &Scope) {
        if let Some(caller) = self.current {
            SpecializationWalker::new(&mut self.graph, caller).walk(Node::Scope(scope));
        }
    }

    /// Number of specialization bodies walked so far.
    pub fn walked(&self) -> usize {
        self.walked
    }

    /// Returns the finished graph.
    pub fn finish(self) -> CallGraph {
        debug!(
            specializations = self.walked,
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "call graph built"
        );
        self.graph
    }
}

/// Builds the call graph of a whole program.
pub fn build_call_graph(program: &Program) -> CallGraph {
    let mut builder = CallGraphBuilder::new();
    builder.visit_program(program);
    builder.finish()
}

/// Builds the call graph of a whole program, then applies `options`.
///
/// With a non-empty `options.entry_points`, the result only contains
/// specializations reachable from those entry points.
pub fn build_call_graph_with(program: &Program, options: &BuildOptions) -> CallGraph {
    let graph = build_call_graph(program);
    if options.entry_points.is_empty() {
        return graph;
    }
    let trimmed = graph.trimmed_to(&options.entry_points);
    debug!(
        entry_points = options.entry_points.len(),
        kept = trimmed.node_count(),
        dropped = graph.node_count() - trimmed.node_count(),
        "trimmed call graph to entry points"
    );
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Dependency;
    use specgraph_core::expr::TypedExpression;
    use specgraph_core::name::QualifiedName;
    use specgraph_core::specialization::SpecializationKind;
    use specgraph_core::stmt::Statement;
    use specgraph_core::types::ResolvedType;

    fn name(n: &str) -> QualifiedName {
        QualifiedName::new("Test", n)
    }

    fn calls(n: &str) -> Scope {
        Scope::new(vec![Statement::Expression(TypedExpression::call(
            TypedExpression::global(name(n), ResolvedType::Unit),
            TypedExpression::unit(),
            ResolvedType::Unit,
        ))])
    }

    #[test]
    fn unbound_scope_records_nothing() {
        let mut builder = CallGraphBuilder::new();
        builder.visit_scope(&calls("Op"));
        assert_eq!(builder.walked(), 0);
        assert!(builder.finish().is_empty());
    }

    #[test]
    fn each_specialization_is_its_own_caller() {
        let body = Specialization::provided(name("Op"), SpecializationKind::Body, calls("A"));
        let adjoint = Specialization::provided(name("Op"), SpecializationKind::Adjoint, calls("B"));

        let mut builder = CallGraphBuilder::new();
        builder.visit_specialization(&body);
        builder.visit_specialization(&adjoint);
        assert_eq!(builder.walked(), 2);
        let graph = builder.finish();

        assert_eq!(
            graph.direct_dependencies(&body).unwrap(),
            vec![Dependency::new(name("A"), SpecializationKind::Body, None)]
        );
        assert_eq!(
            graph.direct_dependencies(&adjoint).unwrap(),
            vec![Dependency::new(name("B"), SpecializationKind::Body, None)]
        );
    }

    #[test]
    fn bodiless_specialization_is_skipped() {
        let spec = Specialization::bodiless(
            name("Op"),
            SpecializationKind::Body,
            specgraph_core::specialization::SpecializationImplementation::Intrinsic,
        );
        let mut builder = CallGraphBuilder::new();
        builder.visit_specialization(&spec);
        assert_eq!(builder.walked(), 0);
        assert!(builder.finish().is_empty());
    }
}
