use std::collections::{HashMap, HashSet};

use flowsint_core::{NodeId, Record, Value};
use serde_json::json;

use crate::distance::leaf_distances;
use crate::graph::{Branch, FlowEdge, FlowNode, Step, StepKind, StepStatus, error_branch};

/// What the Branch Compiler needs to know about a registered enricher to
/// compile a flow that references it, without depending on the enricher
/// registry crate directly.
pub trait EnricherSchema {
    /// Declared output field names for `enricher_name`, or `None` if the
    /// name is not a registered enricher — a malformed-flow condition.
    fn output_fields(&self, enricher_name: &str) -> Option<Vec<String>>;
}

/// Compile `nodes`/`edges` plus one `seed_value` into an ordered list of
/// linear branches.
///
/// Never panics on a malformed flow: an unknown enricher, a dangling edge,
/// or a handle that names a field its node doesn't produce all surface as a
/// single synthetic error branch instead.
pub fn compile(
    seed_value: &Value,
    nodes: &[FlowNode],
    edges: &[FlowEdge],
    schema: &dyn EnricherSchema,
) -> Vec<Branch> {
    let type_node_ids: Vec<NodeId> = nodes
        .iter()
        .filter(|n| matches!(n, FlowNode::Type { .. }))
        .map(|n| n.id())
        .collect();

    if type_node_ids.is_empty() {
        return vec![error_branch("flow has no type nodes to seed a branch from")];
    }

    if let Err(message) = validate(nodes, edges, schema) {
        return vec![error_branch(message)];
    }

    let mut state = CompilerState::new(seed_value.clone(), nodes, edges, schema);

    for (seed_index, type_node_id) in type_node_ids.into_iter().enumerate() {
        let branch_id = format!("branch-{seed_index}");
        let mut fork_counter = 0usize;
        visit(
            &mut state,
            HashSet::new(),
            Vec::new(),
            branch_id,
            seed_index,
            &mut fork_counter,
            type_node_id,
            0,
        );
    }

    let mut branches = state.branches;
    branches.sort_by_key(|b| b.len());
    for (i, branch) in branches.iter_mut().enumerate() {
        branch.name = if i == 0 {
            "Main Flow".to_string()
        } else {
            format!("Flow {}", i + 1)
        };
    }
    branches
}

fn validate(nodes: &[FlowNode], edges: &[FlowEdge], schema: &dyn EnricherSchema) -> Result<(), String> {
    let node_by_id: HashMap<NodeId, &FlowNode> = nodes.iter().map(|n| (n.id(), n)).collect();

    for node in nodes {
        if let FlowNode::Type { output_fields, .. } = node {
            if output_fields.is_empty() {
                return Err(format!("type node '{}' declares no output fields", node.id()));
            }
        }
        if let FlowNode::Enricher { enricher_name, .. } = node {
            if schema.output_fields(enricher_name).is_none() {
                return Err(format!("unknown enricher '{enricher_name}' on node '{}'", node.id()));
            }
        }
    }

    for edge in edges {
        let Some(source) = node_by_id.get(&edge.source_node).copied() else {
            return Err(format!("edge references unknown source node '{}'", edge.source_node));
        };
        if !node_by_id.contains_key(&edge.target_node) {
            return Err(format!("edge references unknown target node '{}'", edge.target_node));
        }

        let produced = match source {
            FlowNode::Type { output_fields, .. } => output_fields.first().into_iter().cloned().collect::<Vec<_>>(),
            FlowNode::Enricher { enricher_name, .. } => schema.output_fields(enricher_name).unwrap_or_default(),
        };
        if !produced.iter().any(|f| f == &edge.source_handle) {
            return Err(format!(
                "edge references output field '{}' not produced by node '{}'",
                edge.source_handle, edge.source_node
            ));
        }
    }

    Ok(())
}

struct CompilerState<'a> {
    seed_value: Value,
    node_by_id: HashMap<NodeId, &'a FlowNode>,
    out_edges: HashMap<NodeId, Vec<FlowEdge>>,
    incoming_edges: HashMap<NodeId, Vec<FlowEdge>>,
    node_output_handles: HashMap<NodeId, Vec<String>>,
    output_cache: HashMap<NodeId, Record>,
    branches: Vec<Branch>,
}

impl<'a> CompilerState<'a> {
    fn new(seed_value: Value, nodes: &'a [FlowNode], edges: &[FlowEdge], schema: &dyn EnricherSchema) -> Self {
        let node_by_id: HashMap<NodeId, &FlowNode> = nodes.iter().map(|n| (n.id(), n)).collect();
        let node_ids: Vec<NodeId> = nodes.iter().map(|n| n.id()).collect();
        let distances = leaf_distances(&node_ids, edges);

        let mut out_edges: HashMap<NodeId, Vec<FlowEdge>> = HashMap::new();
        let mut incoming_edges: HashMap<NodeId, Vec<FlowEdge>> = HashMap::new();
        for edge in edges {
            out_edges.entry(edge.source_node).or_default().push(edge.clone());
            incoming_edges.entry(edge.target_node).or_default().push(edge.clone());
        }
        for edges_from_node in out_edges.values_mut() {
            edges_from_node.sort_by_key(|e| distances.get(&e.target_node).copied().unwrap_or(usize::MAX));
        }

        let mut node_output_handles = HashMap::new();
        for node in nodes {
            let handles = match node {
                FlowNode::Type { output_fields, .. } => output_fields.first().cloned().into_iter().collect(),
                FlowNode::Enricher { enricher_name, .. } => schema.output_fields(enricher_name).unwrap_or_default(),
            };
            node_output_handles.insert(node.id(), handles);
        }

        Self {
            seed_value,
            node_by_id,
            out_edges,
            incoming_edges,
            node_output_handles,
            output_cache: HashMap::new(),
            branches: Vec::new(),
        }
    }

    fn build_step(&mut self, node_id: NodeId, branch_id: &str, depth: usize) -> Step {
        let node: &FlowNode = self.node_by_id.get(&node_id).copied().expect("node exists in compiled flow");
        match node {
            FlowNode::Type { output_fields, .. } => {
                let first_field = output_fields[0].clone();
                let outputs: Record = [(first_field, self.seed_value.clone())].into();
                self.output_cache.entry(node_id).or_insert_with(|| outputs.clone());
                Step {
                    node_id,
                    kind: StepKind::Type,
                    params: Record::new(),
                    inputs: Record::new(),
                    outputs,
                    status: StepStatus::Pending,
                    depth,
                    branch_id: branch_id.to_string(),
                }
            }
            FlowNode::Enricher { enricher_name, params, .. } => {
                let mut inputs = Record::new();
                if let Some(incoming) = self.incoming_edges.get(&node_id).cloned() {
                    for edge in incoming {
                        if let Some(value) = self
                            .output_cache
                            .get(&edge.source_node)
                            .and_then(|out| out.get(&edge.source_handle))
                        {
                            inputs.insert(edge.target_handle.clone(), value.clone());
                        }
                    }
                }

                let handles = self.node_output_handles.get(&node_id).cloned().unwrap_or_default();
                let outputs = self
                    .output_cache
                    .entry(node_id)
                    .or_insert_with(|| {
                        handles
                            .into_iter()
                            .map(|field| (field.clone(), placeholder_value(node_id, &field)))
                            .collect()
                    })
                    .clone();

                Step {
                    node_id,
                    kind: StepKind::Enricher { name: enricher_name.clone() },
                    params: params.clone(),
                    inputs,
                    outputs,
                    status: StepStatus::Pending,
                    depth,
                    branch_id: branch_id.to_string(),
                }
            }
        }
    }
}

fn placeholder_value(node_id: NodeId, field: &str) -> Value {
    json!({ "__placeholder_node": node_id.to_string(), "__field": field })
}

#[allow(clippy::too_many_arguments)]
fn visit(
    state: &mut CompilerState,
    mut path: HashSet<NodeId>,
    mut steps: Vec<Step>,
    branch_id: String,
    seed_index: usize,
    fork_counter: &mut usize,
    node_id: NodeId,
    depth: usize,
) {
    let step = state.build_step(node_id, &branch_id, depth);
    path.insert(node_id);
    steps.push(step);

    let out_edges = state.out_edges.get(&node_id).cloned().unwrap_or_default();
    let valid_edges: Vec<FlowEdge> = out_edges.into_iter().filter(|e| !path.contains(&e.target_node)).collect();

    if valid_edges.is_empty() {
        state.branches.push(Branch {
            id: branch_id,
            name: String::new(),
            steps,
        });
        return;
    }

    for (i, edge) in valid_edges.into_iter().enumerate() {
        let next_branch_id = if i == 0 {
            branch_id.clone()
        } else {
            *fork_counter += 1;
            format!("branch-{seed_index}-{fork_counter}")
        };
        visit(
            state,
            path.clone(),
            steps.clone(),
            next_branch_id,
            seed_index,
            fork_counter,
            edge.target_node,
            depth + 1,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap as StdHashMap;

    struct TestSchema(StdHashMap<String, Vec<String>>);

    impl TestSchema {
        fn new(entries: &[(&str, &[&str])]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(name, fields)| ((*name).to_string(), fields.iter().map(|f| f.to_string()).collect()))
                    .collect(),
            )
        }
    }

    impl EnricherSchema for TestSchema {
        fn output_fields(&self, enricher_name: &str) -> Option<Vec<String>> {
            self.0.get(enricher_name).cloned()
        }
    }

    fn type_node(id: NodeId, output_fields: &[&str]) -> FlowNode {
        FlowNode::Type {
            id,
            entity_type: "Domain".to_string(),
            output_fields: output_fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    fn enricher_node(id: NodeId, enricher_name: &str) -> FlowNode {
        FlowNode::Enricher {
            id,
            enricher_name: enricher_name.to_string(),
            params: Record::new(),
        }
    }

    fn edge(source: NodeId, source_handle: &str, target: NodeId, target_handle: &str) -> FlowEdge {
        FlowEdge {
            source_node: source,
            source_handle: source_handle.to_string(),
            target_node: target,
            target_handle: target_handle.to_string(),
        }
    }

    /// Scenario 1: linear chain D -> E1 -> E2.
    #[test]
    fn linear_chain_compiles_to_one_three_step_branch() {
        let d = NodeId::v4();
        let e1 = NodeId::v4();
        let e2 = NodeId::v4();
        let nodes = vec![
            type_node(d, &["value"]),
            enricher_node(e1, "domain_to_ip"),
            enricher_node(e2, "ip_to_asn"),
        ];
        let edges = vec![edge(d, "value", e1, "domain"), edge(e1, "ip", e2, "ip")];
        let schema = TestSchema::new(&[("domain_to_ip", &["ip"]), ("ip_to_asn", &["asn"])]);

        let branches = compile(&json!("example.com"), &nodes, &edges, &schema);

        assert_eq!(branches.len(), 1);
        assert_eq!(branches[0].steps.len(), 3);
        assert_eq!(branches[0].name, "Main Flow");
    }

    /// Scenario 2: fork D -> E1, D -> E2.
    #[test]
    fn fork_produces_two_branches_named_by_listing_order() {
        let d = NodeId::v4();
        let e1 = NodeId::v4();
        let e2 = NodeId::v4();
        let nodes = vec![type_node(d, &["value"]), enricher_node(e1, "e1"), enricher_node(e2, "e2")];
        let edges = vec![edge(d, "value", e1, "in"), edge(d, "value", e2, "in")];
        let schema = TestSchema::new(&[("e1", &["out"]), ("e2", &["out"])]);

        let branches = compile(&json!("example.com"), &nodes, &edges, &schema);

        assert_eq!(branches.len(), 2);
        assert_eq!(branches[0].id, "branch-0");
        assert_eq!(branches[1].id, "branch-0-1");
        assert_eq!(branches[0].steps.len(), 2);
        assert_eq!(branches[1].steps.len(), 2);
        assert_eq!(branches[0].name, "Main Flow");
    }

    /// Scenario 3: cycle E1 -> E2 -> E1.
    #[test]
    fn cycle_terminates_and_never_revisits_a_node_within_a_branch() {
        let d = NodeId::v4();
        let e1 = NodeId::v4();
        let e2 = NodeId::v4();
        let nodes = vec![type_node(d, &["value"]), enricher_node(e1, "e1"), enricher_node(e2, "e2")];
        let edges = vec![
            edge(d, "value", e1, "in"),
            edge(e1, "out", e2, "in"),
            edge(e2, "out", e1, "in"),
        ];
        let schema = TestSchema::new(&[("e1", &["out"]), ("e2", &["out"])]);

        let branches = compile(&json!("example.com"), &nodes, &edges, &schema);

        for branch in &branches {
            let mut seen = HashSet::new();
            for step in &branch.steps {
                assert!(seen.insert(step.node_id), "node revisited within a single branch");
            }
        }
        assert!(branches.iter().any(|b| b.steps.len() >= 2));
    }

    /// Property 1: compilation always terminates with a non-empty branch
    /// list whose steps only reference nodes from the input graph.
    #[test]
    fn compiler_is_total_over_a_disconnected_type_node() {
        let d = NodeId::v4();
        let nodes = vec![type_node(d, &["value"])];
        let schema = TestSchema::new(&[]);

        let branches = compile(&json!("lone"), &nodes, &[], &schema);

        assert!(!branches.is_empty());
        assert!(branches.iter().all(|b| b.steps.iter().all(|s| s.node_id == d)));
    }

    /// Property 2: compiling the same graph twice is byte-identical.
    #[test]
    fn compilation_is_deterministic() {
        let d = NodeId::v4();
        let e1 = NodeId::v4();
        let nodes = vec![type_node(d, &["value"]), enricher_node(e1, "e1")];
        let edges = vec![edge(d, "value", e1, "in")];
        let schema = TestSchema::new(&[("e1", &["out"])]);

        let first = compile(&json!("example.com"), &nodes, &edges, &schema);
        let second = compile(&json!("example.com"), &nodes, &edges, &schema);

        assert_eq!(first, second);
    }

    /// Property 4: the first branch follows the edge whose target has the
    /// shortest distance to a leaf.
    #[test]
    fn shortest_path_becomes_the_main_branch() {
        let d = NodeId::v4();
        let short_leaf = NodeId::v4();
        let long_mid = NodeId::v4();
        let long_leaf = NodeId::v4();
        let nodes = vec![
            type_node(d, &["value"]),
            enricher_node(short_leaf, "short"),
            enricher_node(long_mid, "mid"),
            enricher_node(long_leaf, "long_leaf"),
        ];
        let edges = vec![
            edge(d, "value", short_leaf, "in"),
            edge(d, "value", long_mid, "in"),
            edge(long_mid, "out", long_leaf, "in"),
        ];
        let schema = TestSchema::new(&[("short", &["out"]), ("mid", &["out"]), ("long_leaf", &["out"])]);

        let branches = compile(&json!("example.com"), &nodes, &edges, &schema);

        assert_eq!(branches[0].name, "Main Flow");
        assert_eq!(branches[0].steps.len(), 2);
        assert_eq!(branches[0].steps[1].node_id, short_leaf);
    }

    proptest! {
        /// Property 3: any graph containing a cycle never emits a branch
        /// that visits the same node twice.
        #[test]
        fn cycle_safety_holds_for_arbitrary_back_edges(extra_back_edge in 0..2usize) {
            let d = NodeId::v4();
            let e1 = NodeId::v4();
            let e2 = NodeId::v4();
            let e3 = NodeId::v4();
            let nodes = vec![
                type_node(d, &["value"]),
                enricher_node(e1, "e1"),
                enricher_node(e2, "e2"),
                enricher_node(e3, "e3"),
            ];
            let mut edges = vec![
                edge(d, "value", e1, "in"),
                edge(e1, "out", e2, "in"),
                edge(e2, "out", e3, "in"),
            ];
            if extra_back_edge == 1 {
                edges.push(edge(e3, "out", e1, "in"));
            } else {
                edges.push(edge(e2, "out", e1, "in"));
            }
            let schema = TestSchema::new(&[("e1", &["out"]), ("e2", &["out"]), ("e3", &["out"])]);

            let branches = compile(&json!("example.com"), &nodes, &edges, &schema);

            for branch in &branches {
                let mut seen = HashSet::new();
                for step in &branch.steps {
                    prop_assert!(seen.insert(step.node_id));
                }
            }
        }
    }
}
