//! Regulatory network assembly.
//!
//! Turns the drawn graph into the description a simulator consumes. Input
//! nodes become input species, output nodes become species with a degradation
//! rate, and every gene lists its regulators (sources of incoming edges) and
//! its products (targets of outgoing edges).

use crate::edge::{Edge, Regulation};
use crate::node::{LogicType, Node, NodeId, NodeParams};
use crate::scene::Scene;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Species {
    pub name: String,
    pub degradation_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Regulator {
    pub name: String,
    #[serde(rename = "type")]
    pub regulation: Regulation,
    #[serde(rename = "Kd")]
    pub kd: f64,
    #[serde(rename = "n")]
    pub hill: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gene {
    /// Label of the gene node
    pub name: String,
    pub alpha: f64,
    pub logic: LogicType,
    pub regulators: Vec<Regulator>,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RegulatoryNetwork {
    pub input_species: Vec<String>,
    pub species: Vec<Species>,
    pub genes: Vec<Gene>,
}

impl RegulatoryNetwork {
    /// Assemble the network from the current scene, in node and edge order.
    pub fn from_scene(scene: &Scene) -> Self {
        let mut network = Self::default();

        for node in scene.nodes() {
            match node.params() {
                NodeParams::Input => network.input_species.push(node.label().to_string()),
                NodeParams::Output { degradation_rate } => network.species.push(Species {
                    name: node.label().to_string(),
                    degradation_rate,
                }),
                NodeParams::Normal { alpha, logic } => {
                    let gene = assemble_gene(scene, node, alpha, logic);
                    network.genes.push(gene);
                }
            }
        }

        debug!(
            inputs = network.input_species.len(),
            species = network.species.len(),
            genes = network.genes.len(),
            "regulatory network assembled"
        );
        network
    }

    pub fn gene(&self, name: &str) -> Option<&Gene> {
        self.genes.iter().find(|gene| gene.name == name)
    }
}

fn assemble_gene(scene: &Scene, node: &Node, alpha: f64, logic: LogicType) -> Gene {
    let mut regulators = Vec::new();
    let mut products = Vec::new();

    for edge in scene.edges() {
        // A self-loop counts as a product, not as a regulator.
        if edge.source() == node.id() {
            if let Some(name) = label_of(scene, edge.target()) {
                products.push(Product { name });
            }
        } else if edge.target() == node.id() {
            if let Some(regulator) = regulator_for(scene, edge) {
                regulators.push(regulator);
            }
        }
    }

    Gene {
        name: node.label().to_string(),
        alpha,
        logic,
        regulators,
        products,
    }
}

fn regulator_for(scene: &Scene, edge: &Edge) -> Option<Regulator> {
    Some(Regulator {
        name: label_of(scene, edge.source())?,
        regulation: edge.metadata.regulation,
        kd: edge.metadata.kd,
        hill: edge.metadata.hill,
    })
}

fn label_of(scene: &Scene, id: NodeId) -> Option<String> {
    scene.node(id).map(|node| node.label().to_string())
}
