use rand::Rng;

use crate::LabelIndex;
use crate::NodeIndex;
use crate::WordGraph;

/// Generates a random word graph with the given number of nodes and out
/// degree, where every edge is defined with the given probability.
pub fn random_word_graph(rng: &mut impl Rng, num_of_nodes: usize, out_degree: usize, density: f64) -> WordGraph {
    assert!(num_of_nodes > 0, "A word graph needs at least one node to have a source");

    let mut graph = WordGraph::new(num_of_nodes, out_degree);
    for from in graph.iter_nodes() {
        for label in 0..out_degree {
            if rng.random_bool(density) {
                let to = NodeIndex::new(rng.random_range(0..num_of_nodes));
                graph
                    .set_target(from, LabelIndex::new(label), to)
                    .expect("Randomly chosen nodes and labels are in range");
            }
        }
    }

    graph
}

/// Generates a random acyclic word graph, edges only lead to nodes with a larger index.
pub fn random_acyclic_word_graph(
    rng: &mut impl Rng,
    num_of_nodes: usize,
    out_degree: usize,
    density: f64,
) -> WordGraph {
    assert!(num_of_nodes > 0, "A word graph needs at least one node to have a source");

    let mut graph = WordGraph::new(num_of_nodes, out_degree);
    for from in 0..num_of_nodes - 1 {
        for label in 0..out_degree {
            if rng.random_bool(density) {
                let to = NodeIndex::new(rng.random_range(from + 1..num_of_nodes));
                graph
                    .set_target(NodeIndex::new(from), LabelIndex::new(label), to)
                    .expect("Randomly chosen nodes and labels are in range");
            }
        }
    }

    graph
}
