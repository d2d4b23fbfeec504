use std::collections::VecDeque;

use bitvec::bitvec;
use bitvec::order::Lsb0;
use bitvec::vec::BitVec;

use crate::NodeIndex;
use crate::WordGraph;
use crate::WordGraphError;

/// Returns the set of nodes reachable from the given source, including the source itself.
pub fn reachable_nodes(graph: &WordGraph, source: NodeIndex) -> BitVec<usize, Lsb0> {
    let mut visited = bitvec![usize, Lsb0; 0; graph.num_of_nodes()];
    let mut queue = VecDeque::new();

    visited.set(*source, true);
    queue.push_back(source);

    while let Some(node) = queue.pop_front() {
        for (_, to) in graph.outgoing_edges(node) {
            if !visited[*to] {
                visited.set(*to, true);
                queue.push_back(to);
            }
        }
    }

    visited
}

/// Returns the subgraph induced by the nodes in `keep`, preserving their
/// relative order, together with the mapping from old to new node indices.
/// Edges into removed nodes are dropped.
pub fn induced_subgraph(
    graph: &WordGraph,
    keep: &BitVec<usize, Lsb0>,
) -> Result<(WordGraph, Vec<Option<NodeIndex>>), WordGraphError> {
    let mut mapping = vec![None; graph.num_of_nodes()];
    let mut num_of_nodes = 0;
    for node in keep.iter_ones() {
        mapping[node] = Some(NodeIndex::new(num_of_nodes));
        num_of_nodes += 1;
    }

    let mut result = WordGraph::new(num_of_nodes, graph.out_degree());
    for node in graph.iter_nodes() {
        if let Some(new_node) = mapping[*node] {
            for (label, to) in graph.outgoing_edges(node) {
                if let Some(new_to) = mapping[*to] {
                    result.set_target(new_node, label, new_to)?;
                }
            }
        }
    }

    Ok((result, mapping))
}

#[cfg(test)]
mod tests {
    use super::*;

    use kbc_utilities::random_test;

    use crate::LabelIndex;
    use crate::random_word_graph;

    #[test]
    fn test_induced_subgraph_drops_unreachable() {
        let mut graph = WordGraph::new(3, 1);
        graph.set_target(NodeIndex::new(0), LabelIndex::new(0), NodeIndex::new(2)).unwrap();
        graph.set_target(NodeIndex::new(1), LabelIndex::new(0), NodeIndex::new(0)).unwrap();

        let keep = reachable_nodes(&graph, NodeIndex::new(0));
        let (subgraph, mapping) = induced_subgraph(&graph, &keep).unwrap();

        assert_eq!(subgraph.num_of_nodes(), 2);
        assert_eq!(mapping, vec![Some(NodeIndex::new(0)), None, Some(NodeIndex::new(1))]);
        assert_eq!(subgraph.target(NodeIndex::new(0), LabelIndex::new(0)), Some(NodeIndex::new(1)));
    }

    #[test]
    fn test_random_reachable_is_closed() {
        random_test(100, |rng| {
            let graph = random_word_graph(rng, 10, 3, 0.3);
            let reachable = reachable_nodes(&graph, NodeIndex::new(0));

            for node in reachable.iter_ones() {
                for (_, to) in graph.outgoing_edges(NodeIndex::new(node)) {
                    assert!(reachable[*to], "Successor {to} of reachable node {node} is not reachable");
                }
            }
        });
    }
}
