use std::rc::Rc;

use kbc_utilities::Cardinality;
use kbc_utilities::Limit;

use crate::LabelIndex;
use crate::NodeIndex;
use crate::WordGraph;
use crate::longest_paths;
use crate::number_of_paths_with;

/// A cursor over the labels of the paths starting in a source node, produced
/// in shortlex order (by length, then lexicographically by label) and
/// restricted to lengths in `[min, max]`.
///
/// Cloning the cursor is cheap and the clone continues from the current
/// position independently.
#[derive(Clone)]
pub struct Paths<'a> {
    graph: &'a WordGraph,

    /// For every node the length of the longest path starting in it, None if unbounded.
    longest: Rc<[Option<usize>]>,
    source: NodeIndex,
    min: usize,
    max: Limit,

    /// The length of the paths that are currently enumerated.
    length: usize,
    labels: Vec<usize>,
    nodes: Vec<NodeIndex>,
    done: bool,
}

impl<'a> Paths<'a> {
    /// Creates a cursor over all paths starting in the given source.
    pub fn new(graph: &'a WordGraph, source: NodeIndex) -> Self {
        Self::with_longest(graph, longest_paths(graph).into(), source)
    }

    /// Creates a cursor reusing longest path lengths that were computed for the graph.
    pub fn with_longest(graph: &'a WordGraph, longest: Rc<[Option<usize>]>, source: NodeIndex) -> Self {
        debug_assert_eq!(longest.len(), graph.num_of_nodes());
        debug_assert!(*source < graph.num_of_nodes(), "Source {source} out of range");

        let mut paths = Self {
            graph,
            longest,
            source,
            min: 0,
            max: Limit::Unbounded,
            length: 0,
            labels: Vec::new(),
            nodes: Vec::new(),
            done: false,
        };
        paths.restart();
        paths
    }

    /// Only produce paths of at least the given length, restarts the cursor.
    pub fn min(mut self, min: usize) -> Self {
        self.min = min;
        self.restart();
        self
    }

    /// Only produce paths of at most the given length, restarts the cursor.
    pub fn max(mut self, max: Limit) -> Self {
        self.max = max;
        self.restart();
        self
    }

    pub fn lower_bound(&self) -> usize {
        self.min
    }

    pub fn upper_bound(&self) -> Limit {
        self.max
    }

    /// Returns the labels of the current path, or None when all paths have been produced.
    pub fn get(&self) -> Option<&[usize]> {
        if self.done { None } else { Some(&self.labels) }
    }

    /// Returns true iff all paths have been produced.
    pub fn at_end(&self) -> bool {
        self.done
    }

    /// Moves to the next path in shortlex order.
    pub fn advance(&mut self) {
        if self.done {
            return;
        }

        while let Some(label) = self.labels.pop() {
            self.nodes.pop();

            if let Some(node) = self.nodes.last().copied() {
                let remaining = self.length - self.labels.len() - 1;
                if let Some((next, to)) = self.first_feasible(node, label + 1, remaining) {
                    self.labels.push(next);
                    self.nodes.push(to);

                    if self.extend() {
                        return;
                    }
                }
            }
        }

        self.length += 1;
        self.start_length();
    }

    /// Returns the number of paths in the range, from the start of the range
    /// and regardless of the position of the cursor.
    pub fn count(&self) -> Cardinality {
        number_of_paths_with(self.graph, &self.longest, self.source, self.min, self.max)
    }

    /// The largest length for which paths will be produced.
    fn upper(&self) -> Limit {
        match self.longest[*self.source] {
            Some(longest) => self.max.min(Limit::Bounded(longest)),
            None => self.max,
        }
    }

    fn restart(&mut self) {
        self.length = self.min;
        self.start_length();
    }

    /// Positions the cursor on the first path of the current length.
    fn start_length(&mut self) {
        self.labels.clear();
        self.nodes.clear();
        self.nodes.push(self.source);

        if self.upper().is_exceeded_by(self.length) {
            self.done = true;
            return;
        }

        self.done = !self.extend();
        debug_assert!(!self.done, "A path of length {} should exist", self.length);
    }

    /// Extends the current prefix with the smallest labels until it has the
    /// current length, returns false if that is impossible.
    fn extend(&mut self) -> bool {
        while self.labels.len() < self.length {
            let Some(node) = self.nodes.last().copied() else {
                return false;
            };

            let remaining = self.length - self.labels.len() - 1;
            match self.first_feasible(node, 0, remaining) {
                Some((label, to)) => {
                    self.labels.push(label);
                    self.nodes.push(to);
                }
                None => return false,
            }
        }

        true
    }

    /// Returns the smallest label, at least `from`, leading to a node from
    /// which a path of length `remaining` starts.
    fn first_feasible(&self, node: NodeIndex, from: usize, remaining: usize) -> Option<(usize, NodeIndex)> {
        (from..self.graph.out_degree()).find_map(|label| {
            self.graph
                .target(node, LabelIndex::new(label))
                .filter(|to| self.longest[**to].is_none_or(|longest| longest >= remaining))
                .map(|to| (label, to))
        })
    }
}

/// Produces the paths of a [Paths] cursor as owned label sequences.
pub struct PathsIter<'a> {
    paths: Paths<'a>,
}

impl Iterator for PathsIter<'_> {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let labels = self.paths.get()?.to_vec();
        self.paths.advance();
        Some(labels)
    }
}

impl<'a> IntoIterator for Paths<'a> {
    type Item = Vec<usize>;
    type IntoIter = PathsIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        PathsIter { paths: self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cmp::Ordering;

    use kbc_utilities::random_test;
    use test_log::test;

    use crate::random_word_graph;

    fn shortlex(u: &[usize], v: &[usize]) -> Ordering {
        u.len().cmp(&v.len()).then_with(|| u.cmp(v))
    }

    #[test]
    fn test_paths_single_loop() {
        let mut graph = WordGraph::new(1, 2);
        graph.set_target(NodeIndex::new(0), LabelIndex::new(0), NodeIndex::new(0)).unwrap();
        graph.set_target(NodeIndex::new(0), LabelIndex::new(1), NodeIndex::new(0)).unwrap();

        let paths = Paths::new(&graph, NodeIndex::new(0)).min(1).max(Limit::Bounded(2));
        assert_eq!(paths.count(), Cardinality::Finite(6));
        assert_eq!(
            paths.into_iter().collect::<Vec<_>>(),
            vec![vec![0], vec![1], vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]
        );
    }

    #[test]
    fn test_paths_prunes_dead_ends() {
        // Label 0 leads to a sink, label 1 loops.
        let mut graph = WordGraph::new(2, 2);
        graph.set_target(NodeIndex::new(0), LabelIndex::new(0), NodeIndex::new(1)).unwrap();
        graph.set_target(NodeIndex::new(0), LabelIndex::new(1), NodeIndex::new(0)).unwrap();

        let mut paths = Paths::new(&graph, NodeIndex::new(0)).min(2);
        assert_eq!(paths.count(), Cardinality::Infinite);

        assert_eq!(paths.get(), Some(&[1, 0][..]));
        paths.advance();
        assert_eq!(paths.get(), Some(&[1, 1][..]));

        let copy = paths.clone();
        paths.advance();
        assert_eq!(paths.get(), Some(&[1, 1, 0][..]));
        assert_eq!(copy.get(), Some(&[1, 1][..]));
    }

    #[test]
    fn test_paths_finite_language_ends() {
        let mut graph = WordGraph::new(3, 1);
        graph.set_target(NodeIndex::new(0), LabelIndex::new(0), NodeIndex::new(1)).unwrap();
        graph.set_target(NodeIndex::new(1), LabelIndex::new(0), NodeIndex::new(2)).unwrap();

        let mut paths = Paths::new(&graph, NodeIndex::new(0));
        assert_eq!(paths.count(), Cardinality::Finite(3));

        for _ in 0..3 {
            assert!(!paths.at_end());
            paths.advance();
        }
        assert!(paths.at_end());
        assert_eq!(paths.get(), None);

        assert!(Paths::new(&graph, NodeIndex::new(0)).min(3).at_end());
    }

    #[test]
    fn test_random_paths_are_shortlex_ordered() {
        random_test(100, |rng| {
            let graph = random_word_graph(rng, 5, 3, 0.5);
            let paths = Paths::new(&graph, NodeIndex::new(0)).max(Limit::Bounded(4));
            let count = paths.count();

            let words: Vec<Vec<usize>> = paths.into_iter().collect();
            for pair in words.windows(2) {
                assert_eq!(shortlex(&pair[0], &pair[1]), Ordering::Less);
            }

            for word in &words {
                assert!(graph.follow_path(NodeIndex::new(0), word).is_some());
            }

            assert_eq!(count, Cardinality::Finite(words.len() as u64));
        });
    }
}
