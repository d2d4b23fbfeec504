use smallvec::SmallVec;

use crate::Letter;
use crate::RuleIndex;

#[derive(Default, Debug)]
struct TrieNode {
    children: SmallVec<[(Letter, usize); 4]>,
    rule: Option<RuleIndex>,
}

impl TrieNode {
    fn child(&self, letter: Letter) -> Option<usize> {
        self.children
            .iter()
            .find(|(other, _)| *other == letter)
            .map(|(_, child)| *child)
    }
}

/// A trie over the reversed left hand sides of the active rules, so that the
/// left hand sides that are a suffix of a word can be found by reading the
/// word backwards from its end.
#[derive(Debug)]
pub struct RuleTrie {
    nodes: Vec<TrieNode>,
    free: Vec<usize>,
}

impl Default for RuleTrie {
    fn default() -> Self {
        RuleTrie {
            nodes: vec![TrieNode::default()],
            free: Vec::new(),
        }
    }
}

impl RuleTrie {
    pub fn new() -> RuleTrie {
        RuleTrie::default()
    }

    /// Stores the rule under its left hand side.
    pub fn insert(&mut self, lhs: &[Letter], rule: RuleIndex) {
        let mut node = 0;
        for letter in lhs.iter().rev() {
            node = match self.nodes[node].child(*letter) {
                Some(child) => child,
                None => {
                    let child = self.allocate();
                    self.nodes[node].children.push((*letter, child));
                    child
                }
            };
        }

        debug_assert!(
            self.nodes[node].rule.is_none(),
            "Two active rules have the same left hand side"
        );
        self.nodes[node].rule = Some(rule);
    }

    /// Removes the rule stored under the given left hand side, and prunes the
    /// branches that no longer lead to a rule.
    pub fn remove(&mut self, lhs: &[Letter]) {
        let mut path = Vec::with_capacity(lhs.len() + 1);
        let mut node = 0;
        path.push(node);

        for letter in lhs.iter().rev() {
            match self.nodes[node].child(*letter) {
                Some(child) => node = child,
                None => return,
            }
            path.push(node);
        }

        self.nodes[node].rule = None;

        // Remove the nodes without children and rule, except for the root.
        for (depth, letter) in lhs.iter().rev().enumerate().rev() {
            let child = path[depth + 1];
            if self.nodes[child].rule.is_some() || !self.nodes[child].children.is_empty() {
                break;
            }

            self.nodes[path[depth]].children.retain(|(other, _)| *other != *letter);
            self.free.push(child);
        }
    }

    /// Returns the rule with the shortest left hand side that is a suffix of the word.
    pub fn shortest_suffix_match(&self, word: &[Letter]) -> Option<RuleIndex> {
        let mut node = 0;
        for letter in word.iter().rev() {
            node = self.nodes[node].child(*letter)?;
            if let Some(rule) = self.nodes[node].rule {
                return Some(rule);
            }
        }

        None
    }

    /// Returns the number of nodes in use, including the root.
    pub fn num_of_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    fn allocate(&mut self) -> usize {
        if let Some(node) = self.free.pop() {
            self.nodes[node] = TrieNode::default();
            node
        } else {
            self.nodes.push(TrieNode::default());
            self.nodes.len() - 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortest_suffix() {
        let mut trie = RuleTrie::new();
        trie.insert(&[0, 1, 1], RuleIndex::new(0));
        trie.insert(&[2, 1], RuleIndex::new(1));

        assert_eq!(trie.shortest_suffix_match(&[2, 0, 1, 1]), Some(RuleIndex::new(0)));
        assert_eq!(trie.shortest_suffix_match(&[0, 2, 1]), Some(RuleIndex::new(1)));
        assert_eq!(trie.shortest_suffix_match(&[1, 1]), None);
        assert_eq!(trie.shortest_suffix_match(&[]), None);
    }

    #[test]
    fn test_remove_prunes() {
        let mut trie = RuleTrie::new();
        trie.insert(&[0, 1, 1], RuleIndex::new(0));
        trie.insert(&[2, 1], RuleIndex::new(1));
        assert_eq!(trie.num_of_nodes(), 5);

        trie.remove(&[0, 1, 1]);
        assert_eq!(trie.num_of_nodes(), 3);
        assert_eq!(trie.shortest_suffix_match(&[0, 1, 1]), None);
        assert_eq!(trie.shortest_suffix_match(&[2, 1]), Some(RuleIndex::new(1)));

        trie.remove(&[2, 1]);
        assert_eq!(trie.num_of_nodes(), 1);

        trie.insert(&[1, 0], RuleIndex::new(2));
        assert_eq!(trie.num_of_nodes(), 3);
        assert_eq!(trie.shortest_suffix_match(&[1, 1, 0]), Some(RuleIndex::new(2)));
    }
}
