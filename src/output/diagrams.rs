// Diagram generation for Dossier
//
// Emits the billing system architecture as a Mermaid flowchart.

use super::write_output;
use crate::error::Result;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::path::Path;

/// A named box in the architecture diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Mermaid node id
    pub id: &'static str,
    pub label: &'static str,
    /// Subgraph the component is drawn in
    pub group: &'static str,
}

/// Directed graph of architecture components, grouped into subgraphs
#[derive(Debug, Clone)]
pub struct ArchitectureDiagram {
    graph: DiGraph<Component, ()>,
    /// Subgraph names in drawing order
    groups: Vec<&'static str>,
}

const COMPONENTS: &[(&str, &str, &str)] = &[
    ("A", "Admin Portal", "Frontend"),
    ("B", "User Portal", "Frontend"),
    ("C", "API Gateway", "Backend"),
    ("D", "Billing Service", "Backend"),
    ("E", "Payment Gateway Service", "Backend"),
    ("F", "Tax Service", "Backend"),
    ("G", "Notification Service", "Backend"),
    ("H", "User Service", "Backend"),
    ("I", "Primary Database", "Data Stores"),
    ("J", "Cache", "Data Stores"),
    ("K", "Data Warehouse", "Data Stores"),
    ("L", "Stripe", "Third-Party Services"),
    ("M", "Square", "Third-Party Services"),
    ("N", "PayPal", "Third-Party Services"),
    ("O", "BTC Pay", "Third-Party Services"),
    ("P", "Web3", "Third-Party Services"),
];

const CONNECTIONS: &[(&str, &str)] = &[
    ("A", "C"),
    ("B", "C"),
    ("C", "D"),
    ("C", "E"),
    ("C", "F"),
    ("C", "G"),
    ("C", "H"),
    ("D", "I"),
    ("D", "J"),
    ("E", "L"),
    ("E", "M"),
    ("E", "N"),
    ("E", "O"),
    ("E", "P"),
    ("F", "I"),
    ("G", "I"),
    ("H", "I"),
    ("D", "K"),
];

impl ArchitectureDiagram {
    /// The billing system reference architecture
    pub fn billing_system() -> Self {
        let mut graph = DiGraph::new();
        let mut groups: Vec<&'static str> = Vec::new();
        let mut index: HashMap<&str, NodeIndex> = HashMap::new();

        for &(id, label, group) in COMPONENTS {
            if !groups.contains(&group) {
                groups.push(group);
            }
            index.insert(id, graph.add_node(Component { id, label, group }));
        }
        for &(from, to) in CONNECTIONS {
            if let (Some(&a), Some(&b)) = (index.get(from), index.get(to)) {
                graph.add_edge(a, b, ());
            }
        }

        Self { graph, groups }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn graph(&self) -> &DiGraph<Component, ()> {
        &self.graph
    }
}

/// Flowchart directions Mermaid accepts
pub const DIRECTIONS: &[&str] = &["TD", "TB", "LR", "BT", "RL"];

/// Diagram generator for creating Mermaid diagrams
pub struct DiagramGenerator {
    /// Layout direction, one of `DIRECTIONS`
    direction: String,
}

impl DiagramGenerator {
    /// Create a new diagram generator
    pub fn new() -> Self {
        Self {
            direction: "TD".to_string(),
        }
    }

    /// Set layout direction
    pub fn with_direction(mut self, dir: &str) -> Self {
        self.direction = dir.to_string();
        self
    }

    /// Render the diagram as Mermaid flowchart source
    pub fn generate(&self, diagram: &ArchitectureDiagram) -> String {
        let graph = diagram.graph();
        let mut lines = Vec::new();
        lines.push(format!("graph {}", self.direction));

        for group in &diagram.groups {
            lines.push(format!("    subgraph {} [{}]", sanitize_id(group), group));
            let members = graph.raw_nodes().iter().map(|node| &node.weight);
            for component in members.filter(|c| c.group == *group) {
                lines.push(format!("        {}[{}]", component.id, component.label));
            }
            lines.push("    end".to_string());
            lines.push(String::new());
        }

        for edge in graph.raw_edges() {
            let from = &graph[edge.source()];
            let to = &graph[edge.target()];
            lines.push(format!("    {} --> {}", from.id, to.id));
        }

        lines.join("\n")
    }

    /// Render the diagram wrapped in a fenced markdown code block
    pub fn generate_markdown(&self, diagram: &ArchitectureDiagram) -> String {
        format!("```mermaid\n{}\n```\n", self.generate(diagram))
    }

    /// Write the billing system diagram to `path`
    pub fn emit(&self, path: &Path) -> Result<()> {
        let diagram = ArchitectureDiagram::billing_system();
        write_output(path, &self.generate_markdown(&diagram))
    }
}

impl Default for DiagramGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Sanitize a string for use as a Mermaid node ID
fn sanitize_id(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
