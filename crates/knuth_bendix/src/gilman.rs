use ahash::AHashMap;
use ahash::AHashSet;
use log::debug;

use kbc_wordgraph::LabelIndex;
use kbc_wordgraph::NodeIndex;
use kbc_wordgraph::WordGraph;
use kbc_wordgraph::induced_subgraph;
use kbc_wordgraph::longest_paths;
use kbc_wordgraph::reachable_nodes;

use crate::KnuthBendixError;
use crate::Letter;
use crate::Word;
use crate::shortlex_compare;

/// The Gilman graph of a rewriting system, a word graph in which the paths
/// starting at the root are labelled by exactly the words that contain no
/// left hand side. For a confluent system these are the normal forms.
///
/// The nodes are the proper prefixes of the left hand sides that can be
/// reached from the root, numbered in shortlex order of these prefixes.
/// Reading a letter from a node leads to the longest suffix of the extended
/// word that is again a node, unless some suffix of it is a left hand side.
#[derive(Clone, Debug)]
pub struct GilmanGraph {
    graph: WordGraph,
    labels: Vec<Word>,
    longest: Vec<Option<usize>>,
}

impl GilmanGraph {
    /// Builds the graph for the given left hand sides over an alphabet of the given size.
    ///
    /// No left hand side may be a subword of another one, which holds for
    /// the active rules of a completion.
    pub fn new<'a>(
        alphabet_size: usize,
        left_hand_sides: impl IntoIterator<Item = &'a [Letter]>,
    ) -> Result<GilmanGraph, KnuthBendixError> {
        let left_hand_sides: AHashSet<&[Letter]> = left_hand_sides.into_iter().collect();

        let mut prefixes: AHashSet<&[Letter]> = AHashSet::new();
        prefixes.insert(&[]);
        for lhs in &left_hand_sides {
            for length in 0..lhs.len() {
                prefixes.insert(&lhs[..length]);
            }
        }

        let mut labels: Vec<&[Letter]> = prefixes.into_iter().collect();
        labels.sort_by(|u, v| shortlex_compare(u, v));

        let nodes: AHashMap<&[Letter], usize> = labels.iter().enumerate().map(|(node, label)| (*label, node)).collect();

        let mut graph = WordGraph::new(labels.len(), alphabet_size);
        let mut word = Word::new();
        for (node, label) in labels.iter().enumerate() {
            for letter in 0..alphabet_size {
                word.clear();
                word.extend_from_slice(label);
                word.push(letter);

                if (0..word.len()).any(|start| left_hand_sides.contains(&word[start..])) {
                    continue;
                }

                // The empty suffix is the root, so a target always exists.
                if let Some(target) = (0..=word.len()).find_map(|start| nodes.get(&word[start..])) {
                    graph.set_target(NodeIndex::new(node), LabelIndex::new(letter), NodeIndex::new(*target))?;
                }
            }
        }

        let reachable = reachable_nodes(&graph, NodeIndex::new(0));
        let (graph, mapping) = induced_subgraph(&graph, &reachable)?;
        let labels: Vec<Word> = labels
            .iter()
            .zip(mapping)
            .filter_map(|(label, node)| node.map(|_| label.to_vec()))
            .collect();

        debug!(
            "Gilman graph has {} nodes and {} edges",
            graph.num_of_nodes(),
            graph.num_of_edges()
        );

        let longest = longest_paths(&graph);
        Ok(GilmanGraph { graph, labels, longest })
    }

    /// The node labelled by the empty word.
    pub fn root(&self) -> NodeIndex {
        NodeIndex::new(0)
    }

    pub fn graph(&self) -> &WordGraph {
        &self.graph
    }

    /// The prefix of a left hand side that every node stands for.
    pub fn labels(&self) -> &[Word] {
        &self.labels
    }

    /// The length of the longest path from every node, None when unbounded.
    pub fn longest(&self) -> &[Option<usize>] {
        &self.longest
    }

    pub fn num_of_nodes(&self) -> usize {
        self.graph.num_of_nodes()
    }

    /// Returns true iff there are finitely many paths from the root.
    pub fn is_finite(&self) -> bool {
        self.longest[*self.root()].is_some()
    }
}
