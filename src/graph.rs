use crate::edge::{Edge, EdgeKey};
use crate::error::EdgeRejection;
use crate::node::{Node, NodeId};
use indexmap::IndexMap;

/// Read-only view of the graph handed to validators.
#[derive(Clone, Copy)]
pub struct GraphView<'a> {
    pub nodes: &'a IndexMap<NodeId, Node>,
    pub edges: &'a [Edge],
}

impl<'a> GraphView<'a> {
    pub fn new(nodes: &'a IndexMap<NodeId, Node>, edges: &'a [Edge]) -> Self {
        Self { nodes, edges }
    }

    pub fn node(&self, id: NodeId) -> Option<&'a Node> {
        self.nodes.get(&id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }
}

/// Helper functions for graph operations
pub struct GraphLogic;

impl GraphLogic {
    /// Find all edges that start or end at a node, in edge order
    pub fn find_edges_connected_to_node(node_id: NodeId, edges: &[Edge]) -> Vec<EdgeKey> {
        edges
            .iter()
            .map(Edge::key)
            .filter(|key| key.touches(node_id))
            .collect()
    }

    /// Check if an edge with the given direction already exists
    ///
    /// Direction matters: `b -> a` is not a duplicate of `a -> b`.
    pub fn duplicate_edge_exists(source: NodeId, target: NodeId, edges: &[Edge]) -> bool {
        edges
            .iter()
            .any(|edge| edge.source() == source && edge.target() == target)
    }

    /// Position of an edge in the edge list
    pub fn find_edge_index(key: EdgeKey, edges: &[Edge]) -> Option<usize> {
        edges.iter().position(|edge| edge.key() == key)
    }
}

// ============================================================================
// Edge Validation Framework
// ============================================================================

/// Result of edge validation with optional rejection reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Edge is valid
    Valid,
    /// Edge is invalid with a reason
    Invalid(EdgeRejection),
}

impl ValidationResult {
    /// Check if the result is valid
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn into_result(self) -> Result<(), EdgeRejection> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(reason) => Err(reason),
        }
    }
}

/// Trait for edge validation logic.
///
/// Implement this to add custom rules for connecting nodes and install it with
/// [`Scene::with_validator`](crate::Scene::with_validator).
///
/// # Example
///
/// ```ignore
/// struct NoEdgesIntoInputs;
///
/// impl EdgeValidator for NoEdgesIntoInputs {
///     fn validate(&self, _source: NodeId, target: NodeId, graph: GraphView<'_>) -> ValidationResult {
///         match graph.node(target) {
///             Some(node) if node.kind() == NodeKind::Input => ValidationResult::Invalid(
///                 EdgeRejection::Custom("inputs cannot be regulated".into()),
///             ),
///             _ => ValidationResult::Valid,
///         }
///     }
/// }
/// ```
pub trait EdgeValidator {
    /// Check if an edge from `source` to `target` may be added to `graph`
    fn validate(&self, source: NodeId, target: NodeId, graph: GraphView<'_>) -> ValidationResult;
}

/// Both endpoints must be present in the scene
#[derive(Clone, Copy, Debug, Default)]
pub struct EndpointsExistValidator;

impl EdgeValidator for EndpointsExistValidator {
    fn validate(&self, source: NodeId, target: NodeId, graph: GraphView<'_>) -> ValidationResult {
        for id in [source, target] {
            if !graph.contains_node(id) {
                return ValidationResult::Invalid(EdgeRejection::UnknownEndpoint(id));
            }
        }
        ValidationResult::Valid
    }
}

/// Rejects edges from a node to itself
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSelfLoopsValidator;

impl EdgeValidator for NoSelfLoopsValidator {
    fn validate(&self, source: NodeId, target: NodeId, _graph: GraphView<'_>) -> ValidationResult {
        if source == target {
            ValidationResult::Invalid(EdgeRejection::SelfLoop)
        } else {
            ValidationResult::Valid
        }
    }
}

/// Validator that prevents duplicate edges
///
/// This wraps the existing `GraphLogic::duplicate_edge_exists` helper.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDuplicatesValidator;

impl EdgeValidator for NoDuplicatesValidator {
    fn validate(&self, source: NodeId, target: NodeId, graph: GraphView<'_>) -> ValidationResult {
        if GraphLogic::duplicate_edge_exists(source, target, graph.edges) {
            ValidationResult::Invalid(EdgeRejection::Duplicate)
        } else {
            ValidationResult::Valid
        }
    }
}

/// Composite validator that combines multiple validators
///
/// All validators must return Valid for the edge to be valid (AND logic).
/// Returns the first error encountered (short-circuits on failure).
///
/// # Example
///
/// ```ignore
/// let validator = CompositeValidator::new()
///     .add(EndpointsExistValidator)
///     .add(NoSelfLoopsValidator)
///     .add(NoDuplicatesValidator);
/// ```
#[derive(Default)]
pub struct CompositeValidator {
    validators: Vec<Box<dyn EdgeValidator>>,
}

impl CompositeValidator {
    /// Create a new empty composite validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validator to the composite
    ///
    /// Validators are checked in the order they were added.
    pub fn add<V: EdgeValidator + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl EdgeValidator for CompositeValidator {
    fn validate(&self, source: NodeId, target: NodeId, graph: GraphView<'_>) -> ValidationResult {
        for v in &self.validators {
            let result = v.validate(source, target, graph);
            if !result.is_valid() {
                return result;
            }
        }
        ValidationResult::Valid
    }
}

/// The structural rules every scene enforces: known endpoints, no duplicates
/// and, unless `allow_self_loops` is set, no self-loops.
pub fn structural_validator(allow_self_loops: bool) -> CompositeValidator {
    let validator = CompositeValidator::new().add(EndpointsExistValidator);
    let validator = if allow_self_loops {
        validator
    } else {
        validator.add(NoSelfLoopsValidator)
    };
    validator.add(NoDuplicatesValidator)
}

// ============================================================================
// Tests
// ============================================================================
