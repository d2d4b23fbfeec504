use std::fmt;

use kbc_utilities::ByteCompressedVec;
use kbc_utilities::TagIndex;
use kbc_utilities::bytevec;
use thiserror::Error;

/// A unique type for the nodes.
pub struct NodeTag;

/// A unique type for the edge labels.
pub struct LabelTag;

/// The index for a node.
pub type NodeIndex = TagIndex<usize, NodeTag>;

/// The index type for an edge label.
pub type LabelIndex = TagIndex<usize, LabelTag>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WordGraphError {
    #[error("label {label} is out of range for out degree {out_degree}")]
    LabelOutOfRange { label: usize, out_degree: usize },

    #[error("node {node} is out of range for a graph with {num_of_nodes} nodes")]
    NodeOutOfRange { node: usize, num_of_nodes: usize },
}

/// A graph in which every node has at most one outgoing edge for every label
/// in `0..out_degree`.
///
/// The targets are stored in a dense table indexed by `node * out_degree +
/// label`, where undefined targets take a single zero byte per entry when
/// the graph is small.
#[derive(Clone, PartialEq, Eq)]
pub struct WordGraph {
    out_degree: usize,
    num_of_nodes: usize,
    targets: ByteCompressedVec<Option<NodeIndex>>,
}

impl WordGraph {
    /// Creates a graph with the given number of nodes and no edges.
    pub fn new(num_of_nodes: usize, out_degree: usize) -> WordGraph {
        WordGraph {
            out_degree,
            num_of_nodes,
            targets: bytevec![None; num_of_nodes * out_degree],
        }
    }

    /// Sets the target of the edge labelled `label` leaving `from`.
    pub fn set_target(&mut self, from: NodeIndex, label: LabelIndex, to: NodeIndex) -> Result<(), WordGraphError> {
        self.check_label(label)?;
        self.check_node(from)?;
        self.check_node(to)?;

        self.targets.set(*from * self.out_degree + *label, Some(to));
        Ok(())
    }

    /// Returns the target of the edge labelled `label` leaving `from`.
    pub fn target(&self, from: NodeIndex, label: LabelIndex) -> Option<NodeIndex> {
        debug_assert!(*label < self.out_degree, "Label {label} out of range");
        self.targets.index(*from * self.out_degree + *label)
    }

    /// Follows the given labels from `from`, returns None if some edge is undefined.
    pub fn follow_path(&self, from: NodeIndex, labels: &[usize]) -> Option<NodeIndex> {
        labels.iter().try_fold(from, |node, &label| {
            if label < self.out_degree {
                self.target(node, LabelIndex::new(label))
            } else {
                None
            }
        })
    }

    /// Returns the defined outgoing edges of the given node ordered by label.
    pub fn outgoing_edges(&self, from: NodeIndex) -> impl Iterator<Item = (LabelIndex, NodeIndex)> + '_ {
        (0..self.out_degree)
            .filter_map(move |label| self.target(from, LabelIndex::new(label)).map(|to| (LabelIndex::new(label), to)))
    }

    /// Iterate over all nodes in the graph.
    pub fn iter_nodes(&self) -> impl Iterator<Item = NodeIndex> + use<> {
        (0..self.num_of_nodes).map(NodeIndex::new)
    }

    /// Returns the number of nodes.
    pub fn num_of_nodes(&self) -> usize {
        self.num_of_nodes
    }

    /// Returns the number of labels, which is the maximum number of outgoing edges per node.
    pub fn out_degree(&self) -> usize {
        self.out_degree
    }

    /// Returns the number of defined edges.
    pub fn num_of_edges(&self) -> usize {
        self.targets.iter().filter(Option::is_some).count()
    }

    fn check_label(&self, label: LabelIndex) -> Result<(), WordGraphError> {
        if *label >= self.out_degree {
            return Err(WordGraphError::LabelOutOfRange {
                label: *label,
                out_degree: self.out_degree,
            });
        }
        Ok(())
    }

    fn check_node(&self, node: NodeIndex) -> Result<(), WordGraphError> {
        if *node >= self.num_of_nodes {
            return Err(WordGraphError::NodeOutOfRange {
                node: *node,
                num_of_nodes: self.num_of_nodes,
            });
        }
        Ok(())
    }
}

impl fmt::Display for WordGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of nodes: {}", self.num_of_nodes())?;
        writeln!(f, "Out degree: {}", self.out_degree())?;
        write!(f, "Number of edges: {}", self.num_of_edges())
    }
}

impl fmt::Debug for WordGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{self}")?;

        for node in self.iter_nodes() {
            for (label, to) in self.outgoing_edges(node) {
                writeln!(f, "{node} --[{label}]-> {to}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_follow() {
        let mut graph = WordGraph::new(2, 2);
        graph.set_target(NodeIndex::new(0), LabelIndex::new(1), NodeIndex::new(1)).unwrap();
        graph.set_target(NodeIndex::new(1), LabelIndex::new(0), NodeIndex::new(0)).unwrap();

        assert_eq!(graph.num_of_edges(), 2);
        assert_eq!(graph.follow_path(NodeIndex::new(0), &[1, 0, 1]), Some(NodeIndex::new(1)));
        assert_eq!(graph.follow_path(NodeIndex::new(0), &[0]), None);
        assert_eq!(graph.follow_path(NodeIndex::new(0), &[5]), None);
        assert_eq!(graph.follow_path(NodeIndex::new(1), &[]), Some(NodeIndex::new(1)));
    }

    #[test]
    fn test_out_of_range() {
        let mut graph = WordGraph::new(1, 1);

        assert_eq!(
            graph.set_target(NodeIndex::new(0), LabelIndex::new(1), NodeIndex::new(0)),
            Err(WordGraphError::LabelOutOfRange { label: 1, out_degree: 1 })
        );
        assert_eq!(
            graph.set_target(NodeIndex::new(0), LabelIndex::new(0), NodeIndex::new(3)),
            Err(WordGraphError::NodeOutOfRange { node: 3, num_of_nodes: 1 })
        );
        assert!(graph.set_target(NodeIndex::new(0), LabelIndex::new(0), NodeIndex::new(0)).is_ok());
    }
}
