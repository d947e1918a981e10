//! Reference graph over classified object components.
//!
//! Edges follow `ObjectRef` shapes (directly, or through array items and
//! dictionary values). Enum and request references never construct a value
//! class, so they cannot take part in a constructor recursion and are left
//! out.

use std::collections::{HashMap, HashSet};

use crate::classifier::ClassificationContext;
use crate::ir::Component;

/// Object-reference dependencies between components.
#[derive(Debug, Clone, Default)]
pub struct ReferenceGraph {
    /// Component names in classification order.
    nodes: Vec<String>,

    /// Component name -> referenced component names, in declaration order.
    dependencies: HashMap<String, Vec<String>>,
}

impl ReferenceGraph {
    /// Build the graph from a finished classification.
    pub fn from_context(context: &ClassificationContext) -> Self {
        let mut graph = Self::default();
        for component in context.components() {
            let Some(object) = component.as_object() else {
                continue;
            };
            let mut refs = Vec::new();
            for property in &object.properties {
                property.shape.collect_object_refs(&mut refs);
            }
            let mut deps: Vec<String> = Vec::new();
            for name in refs {
                if !deps.iter().any(|d| d == name) {
                    deps.push(name.to_string());
                }
            }
            graph.add(component, deps);
        }
        graph
    }

    fn add(&mut self, component: &Component, deps: Vec<String>) {
        let name = component.name().to_string();
        self.nodes.push(name.clone());
        self.dependencies.insert(name, deps);
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct dependencies of a component.
    pub fn dependencies(&self, name: &str) -> Option<&[String]> {
        self.dependencies.get(name).map(Vec::as_slice)
    }

    /// Detect reference cycles.
    ///
    /// Each cycle is returned as the list of names along it, with the first
    /// name repeated at the end (`A -> B -> A`). References to names that are
    /// not object components are ignored.
    pub fn detect_cycles(&self) -> Vec<Vec<String>> {
        let mut cycles = Vec::new();
        let mut visited = HashSet::new();
        let mut rec_stack = HashSet::new();
        let mut path = Vec::new();

        for name in &self.nodes {
            if !visited.contains(name) {
                self.dfs_cycles(name, &mut visited, &mut rec_stack, &mut path, &mut cycles);
            }
        }

        cycles
    }

    fn dfs_cycles(
        &self,
        node: &String,
        visited: &mut HashSet<String>,
        rec_stack: &mut HashSet<String>,
        path: &mut Vec<String>,
        cycles: &mut Vec<Vec<String>>,
    ) {
        visited.insert(node.clone());
        rec_stack.insert(node.clone());
        path.push(node.clone());

        if let Some(deps) = self.dependencies.get(node) {
            for dep in deps {
                if !self.dependencies.contains_key(dep) {
                    continue;
                }

                if !visited.contains(dep) {
                    self.dfs_cycles(dep, visited, rec_stack, path, cycles);
                } else if rec_stack.contains(dep) {
                    if let Some(start_idx) = path.iter().position(|n| n == dep) {
                        let mut cycle: Vec<String> = path[start_idx..].to_vec();
                        cycle.push(dep.clone());
                        cycles.push(cycle);
                    }
                }
            }
        }

        path.pop();
        rec_stack.remove(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ApiDocument;
    use crate::classifier::SchemaClassifier;
    use proptest::prelude::*;
    use serde_json::{json, Map, Value};

    fn schema_with_ref(target: &str) -> Value {
        json!({
            "type": "object",
            "properties": { "next": { "$ref": format!("#/components/schemas/{}", target) } }
        })
    }

    fn graph_of(schemas: Vec<(String, Value)>) -> ReferenceGraph {
        let schemas: Map<String, Value> = schemas.into_iter().collect();
        let document =
            ApiDocument::from_value(json!({ "components": { "schemas": schemas } })).unwrap();
        ReferenceGraph::from_context(&SchemaClassifier::new(&document).classify())
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let graph = graph_of(vec![("Node".into(), schema_with_ref("Node"))]);
        assert_eq!(graph.detect_cycles(), vec![vec!["Node".to_string(), "Node".to_string()]]);
    }

    #[test]
    fn test_cycle_through_array_items() {
        let graph = graph_of(vec![
            (
                "Folder".into(),
                json!({ "type": "object", "properties": {
                    "children": { "type": "array", "items": { "$ref": "#/components/schemas/Entry" } }
                } }),
            ),
            ("Entry".into(), schema_with_ref("Folder")),
        ]);
        let cycles = graph.detect_cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0], vec!["Folder", "Entry", "Folder"]);
    }

    #[test]
    fn test_enum_references_are_not_edges() {
        let graph = graph_of(vec![
            (
                "Widget".into(),
                json!({ "type": "object", "properties": {
                    "color": { "$ref": "#/components/schemas/Color" }
                } }),
            ),
            ("Color".into(), json!({ "enum": ["red"] })),
        ]);
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.dependencies("Widget"), Some(&[][..]));
        assert!(graph.detect_cycles().is_empty());
    }

    #[test]
    fn test_unknown_targets_ignored() {
        let graph = graph_of(vec![("Widget".into(), schema_with_ref("Missing"))]);
        assert_eq!(graph.dependencies("Widget"), Some(&["Missing".to_string()][..]));
        assert!(graph.detect_cycles().is_empty());
    }

    fn arb_schema_name() -> impl Strategy<Value = String> {
        "[A-Z][a-z]{2,8}"
    }

    #[test]
    fn prop_cycle_detection() {
        proptest!(|(
            name_a in arb_schema_name(),
            name_b in arb_schema_name(),
            name_c in arb_schema_name(),
        )| {
            let name_b = if name_b == name_a { format!("{}X", name_b) } else { name_b };
            let name_c = if name_c == name_a || name_c == name_b { format!("{}Y", name_c) } else { name_c };

            let three_way = graph_of(vec![
                (name_a.clone(), schema_with_ref(&name_b)),
                (name_b.clone(), schema_with_ref(&name_c)),
                (name_c.clone(), schema_with_ref(&name_a)),
            ]);
            prop_assert!(!three_way.detect_cycles().is_empty());

            let chain = graph_of(vec![
                (name_a.clone(), json!({ "type": "object" })),
                (name_b.clone(), schema_with_ref(&name_a)),
                (name_c.clone(), schema_with_ref(&name_b)),
            ]);
            prop_assert!(chain.detect_cycles().is_empty());
        });
    }
}
