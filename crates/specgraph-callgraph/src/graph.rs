//! The specialization call graph.
//!
//! [`CallGraph`] is a directed graph over [`SpecializationKey`]s. An edge
//! `a -> b` means the body of specialization `a` calls, partially applies or
//! otherwise references specialization `b`. Edges have set semantics: adding
//! the same edge twice leaves one edge.
//!
//! The graph may contain cycles (self and mutual recursion). Every traversal
//! here is iterative and marks visited nodes, so queries terminate on any
//! graph.
//!
//! Mutation takes `&mut self` and queries take `&self`: construction must be
//! complete before queries are issued.

use std::collections::{HashMap, HashSet};

use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableGraph;
use petgraph::visit::Dfs;
use petgraph::{Directed, Direction};
use tracing::trace;

use specgraph_core::name::QualifiedName;
use specgraph_core::specialization::SpecializationKind;
use specgraph_core::types::ResolvedType;

use crate::error::CallGraphError;
use crate::interner::TypeInterner;
use crate::key::{Dependency, SpecializationIdentity, SpecializationKey};

/// Directed graph of caller -> callee specializations.
#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    graph: StableGraph<SpecializationKey, (), Directed, u32>,
    /// Node lookup by key.
    nodes: HashMap<SpecializationKey, NodeIndex<u32>>,
    /// Type arguments of every key in the graph.
    types: TypeInterner,
}

impl CallGraph {
    /// Creates an empty call graph.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Records that `caller` depends on the given callee specialization.
    ///
    /// The caller key is derived from the full specialization descriptor.
    /// Returns `true` if the edge is new, `false` if it was already present.
    pub fn add_dependency(
        &mut self,
        caller: &(impl SpecializationIdentity + ?Sized),
        callee_kind: SpecializationKind,
        callee_name: &QualifiedName,
        callee_type_arguments: Option<&[ResolvedType]>,
    ) -> bool {
        self.add_dependency_between(
            caller.kind(),
            caller.callable(),
            caller.type_arguments(),
            callee_kind,
            callee_name,
            callee_type_arguments,
        )
    }

    /// Records a dependency with both ends given explicitly, for callers that
    /// are not the specialization currently being walked.
    ///
    /// Returns `true` if the edge is new.
    pub fn add_dependency_between(
        &mut self,
        caller_kind: SpecializationKind,
        caller_name: &QualifiedName,
        caller_type_arguments: Option<&[ResolvedType]>,
        callee_kind: SpecializationKind,
        callee_name: &QualifiedName,
        callee_type_arguments: Option<&[ResolvedType]>,
    ) -> bool {
        let caller = self.intern_key(caller_name, caller_kind, caller_type_arguments);
        let callee = self.intern_key(callee_name, callee_kind, callee_type_arguments);
        self.insert_edge(caller, callee)
    }

    fn intern_key(
        &mut self,
        callable: &QualifiedName,
        kind: SpecializationKind,
        type_arguments: Option<&[ResolvedType]>,
    ) -> SpecializationKey {
        let hashes = self.types.intern_optional(type_arguments);
        SpecializationKey::new(callable.clone(), kind, hashes)
    }

    /// Returns the node for `key`, adding it if absent.
    fn node(&mut self, key: SpecializationKey) -> NodeIndex<u32> {
        if let Some(&idx) = self.nodes.get(&key) {
            return idx;
        }
        let idx = self.graph.add_node(key.clone());
        self.nodes.insert(key, idx);
        idx
    }

    fn insert_edge(&mut self, caller: SpecializationKey, callee: SpecializationKey) -> bool {
        let from = self.node(caller);
        let to = self.node(callee);
        if self.graph.find_edge(from, to).is_some() {
            return false;
        }
        self.graph.add_edge(from, to, ());
        trace!(caller = %self.graph[from], callee = %self.graph[to], "recorded dependency");
        true
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    fn lookup(&self, spec: &(impl SpecializationIdentity + ?Sized)) -> Option<NodeIndex<u32>> {
        self.nodes.get(&SpecializationKey::of(spec)).copied()
    }

    /// Returns `true` if the specialization is a node of the graph.
    ///
    /// A graph built by walking a program only has nodes with at least one
    /// edge. A graph returned by [`CallGraph::trimmed_to`] also keeps entry
    /// specializations whose edges were all dropped.
    pub fn contains(&self, spec: &(impl SpecializationIdentity + ?Sized)) -> bool {
        self.lookup(spec).is_some()
    }

    /// One-hop callees of `caller`, sorted by key.
    ///
    /// An unknown caller, or one without recorded edges, yields an empty
    /// vector.
    pub fn direct_dependencies(
        &self,
        caller: &(impl SpecializationIdentity + ?Sized),
    ) -> Result<Vec<Dependency>, CallGraphError> {
        match self.lookup(caller) {
            Some(idx) => {
                self.to_dependencies(self.graph.neighbors_directed(idx, Direction::Outgoing))
            }
            None => Ok(Vec::new()),
        }
    }

    /// Every specialization reachable from `caller`, sorted by key.
    ///
    /// The root itself is included only when it is reachable from one of
    /// its callees, i.e. when it is part of a cycle.
    pub fn all_dependencies(
        &self,
        caller: &(impl SpecializationIdentity + ?Sized),
    ) -> Result<Vec<Dependency>, CallGraphError> {
        let Some(root) = self.lookup(caller) else {
            return Ok(Vec::new());
        };

        // Seed with the successors rather than the root so the root is only
        // discovered through a back edge.
        let mut dfs = Dfs::empty(&self.graph);
        dfs.stack.extend(self.graph.neighbors_directed(root, Direction::Outgoing));

        let mut reachable = Vec::new();
        while let Some(idx) = dfs.next(&self.graph) {
            reachable.push(idx);
        }
        self.to_dependencies(reachable)
    }

    /// One-hop callers of `callee`, sorted by key.
    pub fn callers_of(
        &self,
        callee: &(impl SpecializationIdentity + ?Sized),
    ) -> Result<Vec<Dependency>, CallGraphError> {
        match self.lookup(callee) {
            Some(idx) => {
                self.to_dependencies(self.graph.neighbors_directed(idx, Direction::Incoming))
            }
            None => Ok(Vec::new()),
        }
    }

    /// Every node of the graph, sorted by key.
    pub fn specializations(&self) -> Result<Vec<Dependency>, CallGraphError> {
        self.to_dependencies(self.graph.node_indices())
    }

    /// Recursive groups: strongly connected components with more than one
    /// node, plus single nodes that call themselves.
    ///
    /// Each group is sorted by key, and groups are sorted by their first
    /// member.
    pub fn call_cycles(&self) -> Result<Vec<Vec<Dependency>>, CallGraphError> {
        let mut groups: Vec<Vec<&SpecializationKey>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| match scc.as_slice() {
                [single] => self.graph.find_edge(*single, *single).is_some(),
                _ => true,
            })
            .map(|scc| {
                let mut keys: Vec<&SpecializationKey> =
                    scc.into_iter().map(|idx| &self.graph[idx]).collect();
                keys.sort();
                keys
            })
            .collect();
        groups.sort_by(|a, b| a.first().cmp(&b.first()));

        groups
            .into_iter()
            .map(|keys| {
                keys.into_iter()
                    .map(|key| self.dependency(key))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect()
    }

    /// A copy of the graph restricted to the specializations reachable from
    /// any specialization of the given entry-point callables.
    ///
    /// Entry specializations are always kept, including one whose only
    /// edges came from callers that were dropped. Such a node is left
    /// without edges.
    pub fn trimmed_to(&self, entry_points: &[QualifiedName]) -> CallGraph {
        let entries: HashSet<&QualifiedName> = entry_points.iter().collect();

        let mut dfs = Dfs::empty(&self.graph);
        dfs.stack.extend(
            self.graph
                .node_indices()
                .filter(|&idx| entries.contains(&self.graph[idx].callable)),
        );
        let mut reachable = Vec::new();
        while let Some(idx) = dfs.next(&self.graph) {
            reachable.push(idx);
        }
        reachable.sort_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));

        let mut trimmed = CallGraph {
            graph: StableGraph::default(),
            nodes: HashMap::new(),
            types: self.types.clone(),
        };
        for &idx in &reachable {
            trimmed.node(self.graph[idx].clone());
        }
        // Every successor of a reachable node is itself reachable.
        for &idx in &reachable {
            for succ in self.graph.neighbors_directed(idx, Direction::Outgoing) {
                trimmed.insert_edge(self.graph[idx].clone(), self.graph[succ].clone());
            }
        }
        trimmed
    }

    /// Number of specializations in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct dependency edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// The type-argument table backing the keys.
    pub fn type_table(&self) -> &TypeInterner {
        &self.types
    }

    /// Renders every edge as `caller -> callee`, one per line, sorted.
    pub fn render(&self) -> Result<String, CallGraphError> {
        let mut lines = Vec::with_capacity(self.graph.edge_count());
        for caller in self.specializations()? {
            for callee in self.direct_dependencies(&caller)? {
                lines.push(format!("{} -> {}", caller, callee));
            }
        }
        let mut out = String::new();
        for line in lines {
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out)
    }

    // -----------------------------------------------------------------------
    // Reconstruction
    // -----------------------------------------------------------------------

    fn dependency(&self, key: &SpecializationKey) -> Result<Dependency, CallGraphError> {
        Ok(Dependency::new(
            key.callable.clone(),
            key.kind,
            self.types.resolve_optional(key.type_arguments.as_deref())?,
        ))
    }

    fn to_dependencies(
        &self,
        indices: impl IntoIterator<Item = NodeIndex<u32>>,
    ) -> Result<Vec<Dependency>, CallGraphError> {
        let mut keys: Vec<&SpecializationKey> =
            indices.into_iter().map(|idx| &self.graph[idx]).collect();
        keys.sort();
        keys.dedup();
        keys.into_iter().map(|key| self.dependency(key)).collect()
    }
}
