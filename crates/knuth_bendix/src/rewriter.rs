use log::trace;

use crate::Letter;
use crate::RuleIndex;
use crate::RuleTrie;
use crate::Rules;
use crate::Word;
use crate::format_word;

/// Selects one of the rewriters on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum RewriterKind {
    /// Looks up left hand sides in a trie.
    #[default]
    Trie,

    /// Compares every active left hand side.
    FromLeft,
}

/// A strategy to reduce words with respect to the active rules.
///
/// Words are rewritten from the left. Letters are moved one at a time from
/// the input to the output, and whenever a left hand side is a suffix of the
/// output it is removed and the right hand side is placed back in front of
/// the remaining input.
pub trait Rewriter: Default {
    /// Called after the rule in the given slot has been activated.
    fn add_rule(&mut self, _lhs: &[Letter], _rule: RuleIndex) {}

    /// Called before the rule in the given slot is deactivated.
    fn remove_rule(&mut self, _lhs: &[Letter], _rule: RuleIndex) {}

    /// Returns an active rule whose left hand side is a suffix of the word.
    fn find_suffix(&self, rules: &Rules, word: &[Letter]) -> Option<RuleIndex>;

    /// Reduces the word to a word that contains no active left hand side.
    fn rewrite(&self, rules: &Rules, word: &mut Word) {
        if rules.number_of_active() == 0 {
            return;
        }

        // The remaining input, reversed such that the next letter is at the end.
        let mut input: Word = word.iter().rev().copied().collect();
        word.clear();

        while let Some(letter) = input.pop() {
            word.push(letter);

            if let Some(index) = self.find_suffix(rules, word) {
                let rule = &rules[index];
                trace!("Applying {rule} to {}", format_word(word));

                word.truncate(word.len() - rule.lhs().len());
                input.extend(rule.rhs().iter().rev());
            }
        }
    }
}

/// Finds left hand sides by comparing all active rules in order of their
/// identifier, which is adequate for small rewriting systems.
#[derive(Default)]
pub struct RewriteFromLeft;

impl Rewriter for RewriteFromLeft {
    fn find_suffix(&self, rules: &Rules, word: &[Letter]) -> Option<RuleIndex> {
        rules
            .iter_active()
            .find(|(_, rule)| word.ends_with(rule.lhs()))
            .map(|(index, _)| index)
    }
}

/// Finds left hand sides with a [RuleTrie] that is kept up to date with the active rules.
#[derive(Default)]
pub struct RewriteTrie {
    trie: RuleTrie,
}

impl Rewriter for RewriteTrie {
    fn add_rule(&mut self, lhs: &[Letter], rule: RuleIndex) {
        self.trie.insert(lhs, rule);
    }

    fn remove_rule(&mut self, lhs: &[Letter], _rule: RuleIndex) {
        self.trie.remove(lhs);
    }

    fn find_suffix(&self, _rules: &Rules, word: &[Letter]) -> Option<RuleIndex> {
        self.trie.shortest_suffix_match(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use kbc_utilities::random_test;
    use rand::Rng;
    use test_log::test;

    fn rewriters(rules: &[(Word, Word)]) -> (Rules, RewriteFromLeft, RewriteTrie) {
        let mut store = Rules::new();
        let from_left = RewriteFromLeft;
        let mut trie = RewriteTrie::default();

        for (lhs, rhs) in rules {
            let index = store.activate(lhs.clone(), rhs.clone());
            trie.add_rule(lhs, index);
        }

        (store, from_left, trie)
    }

    #[test]
    fn test_rewrite_commutation() {
        // ba -> ab, bb -> b
        let (rules, from_left, trie) = rewriters(&[(vec![1, 0], vec![0, 1]), (vec![1, 1], vec![1])]);

        let mut word = vec![1, 0, 1, 0, 1];
        from_left.rewrite(&rules, &mut word);
        assert_eq!(word, vec![0, 0, 1]);

        let mut word = vec![1, 0, 1, 0, 1];
        trie.rewrite(&rules, &mut word);
        assert_eq!(word, vec![0, 0, 1]);
    }

    #[test]
    fn test_random_rewriters_agree() {
        // A confluent system: ba -> ab, ca -> ac, cb -> bc, aa -> ε.
        let (rules, from_left, trie) = rewriters(&[
            (vec![1, 0], vec![0, 1]),
            (vec![2, 0], vec![0, 2]),
            (vec![2, 1], vec![1, 2]),
            (vec![0, 0], vec![]),
        ]);

        random_test(100, |rng| {
            let length = rng.random_range(0..12);
            let word: Word = (0..length).map(|_| rng.random_range(0..3)).collect();

            let mut first = word.clone();
            from_left.rewrite(&rules, &mut first);
            let mut second = word.clone();
            trie.rewrite(&rules, &mut second);

            assert_eq!(first, second, "Rewriters disagree on {word:?}");
            assert!(first.windows(2).all(|pair| pair[0] <= pair[1]), "{first:?} is not sorted");
            assert!(first.iter().filter(|letter| **letter == 0).count() <= 1);
        });
    }
}
