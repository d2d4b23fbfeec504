use log::trace;

use kbc_utilities::Cardinality;
use kbc_utilities::Limit;

use crate::NodeIndex;
use crate::WordGraph;

// The mark of a node in the depth first search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Temporary,
    Permanent,
}

/// Returns for every node the length of the longest path starting in it, or
/// None when arbitrarily long paths start in it (it can reach a cycle).
pub fn longest_paths(graph: &WordGraph) -> Vec<Option<usize>> {
    let mut marks: Vec<Option<Mark>> = vec![None; graph.num_of_nodes()];
    let mut longest: Vec<Option<usize>> = vec![Some(0); graph.num_of_nodes()];
    let mut stack = Vec::new();

    for start in graph.iter_nodes() {
        if marks[*start].is_some() {
            continue;
        }

        stack.push(start);
        while let Some(node) = stack.pop() {
            match marks[*node] {
                None => {
                    marks[*node] = Some(Mark::Temporary);
                    stack.push(node); // Re-add to stack to finish the node later
                    for (_, to) in graph.outgoing_edges(node) {
                        if marks[*to].is_none() {
                            stack.push(to);
                        }
                    }
                }
                Some(Mark::Temporary) => {
                    // Every successor is finished, unless it is still on the
                    // path to this node in which case there is a cycle.
                    let mut result = Some(0);
                    for (_, to) in graph.outgoing_edges(node) {
                        let length = match marks[*to] {
                            Some(Mark::Permanent) => longest[*to].map(|length| length + 1),
                            _ => None,
                        };

                        result = match (result, length) {
                            (Some(a), Some(b)) => Some(a.max(b)),
                            _ => None,
                        };
                    }

                    marks[*node] = Some(Mark::Permanent);
                    longest[*node] = result;
                }
                Some(Mark::Permanent) => {}
            }
        }
    }

    trace!("Longest paths: {longest:?}");
    longest
}

/// Counts the paths starting in `source` whose length lies in `[min, max]`.
///
/// Counts that do not fit a `u64` saturate.
pub fn number_of_paths(graph: &WordGraph, source: NodeIndex, min: usize, max: Limit) -> Cardinality {
    number_of_paths_with(graph, &longest_paths(graph), source, min, max)
}

/// Same as [number_of_paths], reusing longest path lengths that were already computed.
pub fn number_of_paths_with(
    graph: &WordGraph,
    longest: &[Option<usize>],
    source: NodeIndex,
    min: usize,
    max: Limit,
) -> Cardinality {
    let upper = match (max, longest[*source]) {
        (Limit::Unbounded, None) => return Cardinality::Infinite,
        (Limit::Unbounded, Some(length)) => length,
        (Limit::Bounded(bound), Some(length)) => bound.min(length),
        (Limit::Bounded(bound), None) => bound,
    };

    if min > upper {
        return Cardinality::Finite(0);
    }

    // The number of paths of the current length ending in every node.
    let mut current = vec![0u64; graph.num_of_nodes()];
    current[*source] = 1;

    let mut total: u64 = 0;
    let mut length = 0;
    loop {
        if length >= min {
            total = current.iter().fold(total, |sum, count| sum.saturating_add(*count));
            if total == u64::MAX {
                return Cardinality::Finite(u64::MAX);
            }
        }

        if length == upper {
            break;
        }

        let mut next = vec![0u64; graph.num_of_nodes()];
        for node in graph.iter_nodes() {
            if current[*node] > 0 {
                for (_, to) in graph.outgoing_edges(node) {
                    next[*to] = next[*to].saturating_add(current[*node]);
                }
            }
        }

        if next == current {
            // Every longer length has the same number of paths.
            let first = (length + 1).max(min);
            if first <= upper {
                let lengths = u64::try_from(upper - first).unwrap_or(u64::MAX).saturating_add(1);
                let per_length = current.iter().fold(0u64, |sum, count| sum.saturating_add(*count));
                total = total.saturating_add(per_length.saturating_mul(lengths));
            }

            return Cardinality::Finite(total);
        }

        current = next;
        length += 1;
    }

    Cardinality::Finite(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    use kbc_utilities::random_test;
    use test_log::test;

    use crate::LabelIndex;
    use crate::Paths;
    use crate::random_acyclic_word_graph;
    use crate::random_word_graph;

    #[test]
    fn test_longest_paths_with_cycle() {
        // 0 -> 1 -> 2 -> 1 and 0 -> 3.
        let mut graph = WordGraph::new(4, 2);
        graph.set_target(NodeIndex::new(0), LabelIndex::new(0), NodeIndex::new(1)).unwrap();
        graph.set_target(NodeIndex::new(1), LabelIndex::new(0), NodeIndex::new(2)).unwrap();
        graph.set_target(NodeIndex::new(2), LabelIndex::new(0), NodeIndex::new(1)).unwrap();
        graph.set_target(NodeIndex::new(0), LabelIndex::new(1), NodeIndex::new(3)).unwrap();

        assert_eq!(longest_paths(&graph), vec![None, None, None, Some(0)]);
        assert_eq!(
            number_of_paths(&graph, NodeIndex::new(0), 0, Limit::Unbounded),
            Cardinality::Infinite
        );
        // The empty path, 0, 1, 00, 000
        assert_eq!(
            number_of_paths(&graph, NodeIndex::new(0), 0, Limit::Bounded(3)),
            Cardinality::Finite(5)
        );
    }

    #[test]
    fn test_count_single_loop() {
        let mut graph = WordGraph::new(1, 2);
        graph.set_target(NodeIndex::new(0), LabelIndex::new(0), NodeIndex::new(0)).unwrap();
        graph.set_target(NodeIndex::new(0), LabelIndex::new(1), NodeIndex::new(0)).unwrap();

        // 1 + 2 + 4 + 8 words of length at most three.
        assert_eq!(
            number_of_paths(&graph, NodeIndex::new(0), 0, Limit::Bounded(3)),
            Cardinality::Finite(15)
        );
        assert_eq!(
            number_of_paths(&graph, NodeIndex::new(0), 2, Limit::Bounded(3)),
            Cardinality::Finite(12)
        );
        assert_eq!(
            number_of_paths(&graph, NodeIndex::new(0), 4, Limit::Bounded(3)),
            Cardinality::Finite(0)
        );
    }

    #[test]
    fn test_count_with_huge_bound() {
        let mut graph = WordGraph::new(1, 2);
        graph.set_target(NodeIndex::new(0), LabelIndex::new(0), NodeIndex::new(0)).unwrap();

        // A single path of every length.
        assert_eq!(
            number_of_paths(&graph, NodeIndex::new(0), 0, Limit::Bounded(usize::MAX)),
            Cardinality::Finite(u64::MAX)
        );
        assert_eq!(
            number_of_paths(&graph, NodeIndex::new(0), 10, Limit::Bounded(1_000_000_000_000)),
            Cardinality::Finite(1_000_000_000_000 - 9)
        );

        // Doubling with every length saturates quickly.
        graph.set_target(NodeIndex::new(0), LabelIndex::new(1), NodeIndex::new(0)).unwrap();
        assert_eq!(
            number_of_paths(&graph, NodeIndex::new(0), 0, Limit::Bounded(usize::MAX)),
            Cardinality::Finite(u64::MAX)
        );
    }

    #[test]
    fn test_count_dead_end_before_loop() {
        // 0 -a-> 1 -a-> 1 and 0 -b-> 2.
        let mut graph = WordGraph::new(3, 2);
        graph.set_target(NodeIndex::new(0), LabelIndex::new(0), NodeIndex::new(1)).unwrap();
        graph.set_target(NodeIndex::new(1), LabelIndex::new(0), NodeIndex::new(1)).unwrap();
        graph.set_target(NodeIndex::new(0), LabelIndex::new(1), NodeIndex::new(2)).unwrap();

        // The empty path, two paths of length one and one of every other length.
        assert_eq!(
            number_of_paths(&graph, NodeIndex::new(0), 0, Limit::Bounded(100)),
            Cardinality::Finite(102)
        );
        assert_eq!(
            number_of_paths(&graph, NodeIndex::new(0), 1, Limit::Bounded(3)),
            Cardinality::Finite(4)
        );
    }

    #[test]
    fn test_random_count_matches_enumeration() {
        random_test(100, |rng| {
            let graph = random_word_graph(rng, 6, 2, 0.4);
            let source = NodeIndex::new(0);

            let count = number_of_paths(&graph, source, 1, Limit::Bounded(5));
            let paths = Paths::new(&graph, source).min(1).max(Limit::Bounded(5));
            assert_eq!(count, Cardinality::Finite(paths.into_iter().count() as u64));
        });
    }

    #[test]
    fn test_random_acyclic_count_is_finite() {
        random_test(100, |rng| {
            let graph = random_acyclic_word_graph(rng, 6, 2, 0.5);
            let source = NodeIndex::new(0);

            let count = number_of_paths(&graph, source, 0, Limit::Unbounded);
            let paths = Paths::new(&graph, source);
            assert_eq!(count, Cardinality::Finite(paths.into_iter().count() as u64));
        });
    }
}
