use std::rc::Rc;

use kbc_utilities::Cardinality;
use kbc_utilities::Limit;
use kbc_wordgraph::Paths;
use kbc_wordgraph::PathsIter;

use crate::GilmanGraph;
use crate::KnuthBendix;
use crate::KnuthBendixError;
use crate::Letter;
use crate::Rewriter;
use crate::Word;

/// The normal forms of a rewriting system in shortlex order, restricted to
/// lengths in `[min, max]`, obtained as the paths of its Gilman graph.
///
/// The range borrows the Gilman graph, and thereby its completion, so it
/// cannot be used after the rules have changed. Cloning a range is cheap and
/// the clone continues independently from the current position.
#[derive(Clone)]
pub struct NormalFormRange<'a> {
    paths: Paths<'a>,
}

impl<'a> NormalFormRange<'a> {
    /// Creates the range of all normal forms, starting at the empty word if
    /// it is a normal form and at length one otherwise.
    pub fn new(gilman: &'a GilmanGraph, contains_empty_word: bool) -> Self {
        let longest: Rc<[Option<usize>]> = Rc::from(gilman.longest());
        let paths = Paths::with_longest(gilman.graph(), longest, gilman.root());

        NormalFormRange {
            paths: if contains_empty_word { paths } else { paths.min(1) },
        }
    }

    /// Sets the minimum length of the normal forms and restarts the range.
    pub fn min(self, min: usize) -> Self {
        NormalFormRange {
            paths: self.paths.min(min),
        }
    }

    /// Sets the maximum length of the normal forms and restarts the range.
    pub fn max(self, max: impl Into<Limit>) -> Self {
        NormalFormRange {
            paths: self.paths.max(max.into()),
        }
    }

    pub fn lower_bound(&self) -> usize {
        self.paths.lower_bound()
    }

    pub fn upper_bound(&self) -> Limit {
        self.paths.upper_bound()
    }

    /// Returns the current normal form, or None when the range is exhausted.
    pub fn get(&self) -> Option<&[Letter]> {
        self.paths.get()
    }

    pub fn advance(&mut self) {
        self.paths.advance();
    }

    pub fn at_end(&self) -> bool {
        self.paths.at_end()
    }

    /// Returns the number of normal forms in the range, regardless of the current position.
    pub fn count(&self) -> Cardinality {
        self.paths.count()
    }
}

/// Produces the normal forms of a [NormalFormRange] as owned words.
pub struct NormalForms<'a> {
    paths: PathsIter<'a>,
}

impl Iterator for NormalForms<'_> {
    type Item = Word;

    fn next(&mut self) -> Option<Word> {
        self.paths.next()
    }
}

impl<'a> IntoIterator for NormalFormRange<'a> {
    type Item = Word;
    type IntoIter = NormalForms<'a>;

    fn into_iter(self) -> Self::IntoIter {
        NormalForms {
            paths: self.paths.into_iter(),
        }
    }
}

/// Runs the completion and returns the range of its normal forms.
pub fn normal_forms<R: Rewriter>(kb: &mut KnuthBendix<R>) -> Result<NormalFormRange<'_>, KnuthBendixError> {
    kb.run();

    let kb: &KnuthBendix<R> = kb;
    let contains_empty_word = kb.presentation().contains_empty_word();
    Ok(NormalFormRange::new(kb.gilman_graph()?, contains_empty_word))
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::Presentation;

    #[test]
    fn test_normal_forms_semigroup() {
        // The semigroup {a, b} with ab = ba = aa = a and bb = b.
        let mut presentation =
            Presentation::from_strings("ab", &[("aa", "a"), ("ab", "a"), ("ba", "a"), ("bb", "b")]).unwrap();
        presentation.set_contains_empty_word(false).unwrap();

        let mut kb: KnuthBendix = KnuthBendix::new(presentation).unwrap();
        let range = normal_forms(&mut kb).unwrap();

        assert_eq!(range.lower_bound(), 1);
        assert_eq!(range.count(), Cardinality::Finite(2));
        assert_eq!(range.into_iter().collect::<Vec<_>>(), vec![vec![0], vec![1]]);
    }

    #[test]
    fn test_normal_forms_cursor() {
        let presentation = Presentation::from_strings("ab", &[("ba", "ab")]).unwrap();
        let mut kb: KnuthBendix = KnuthBendix::new(presentation).unwrap();

        let mut range = normal_forms(&mut kb).unwrap().min(2).max(2);
        assert_eq!(range.count(), Cardinality::Finite(3));

        let copy = range.clone();
        assert_eq!(range.get(), Some(&[0, 0][..]));
        range.advance();
        assert_eq!(range.get(), Some(&[0, 1][..]));
        range.advance();
        assert_eq!(range.get(), Some(&[1, 1][..]));
        range.advance();
        assert!(range.at_end());

        assert_eq!(copy.get(), Some(&[0, 0][..]));
        assert_eq!(copy.upper_bound(), Limit::Bounded(2));
    }
}
