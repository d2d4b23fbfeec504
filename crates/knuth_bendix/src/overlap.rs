use std::fmt;

use crate::Letter;
use crate::Rule;
use crate::Word;

/// Determines how the length of an overlap is measured, which is compared to
/// the maximum overlap length of the completion.
///
/// An overlap of the left hand sides `AB` and `BC`, where `B` is non-empty,
/// is the word `ABC`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OverlapPolicy {
    /// The length |ABC| of the overlap word.
    #[default]
    Abc,

    /// The sum |AB| + |BC| of the lengths of both left hand sides.
    AbBc,

    /// The maximum of |AB| and |BC|.
    MaxAbBc,
}

impl fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapPolicy::Abc => write!(f, "ABC"),
            OverlapPolicy::AbBc => write!(f, "AB_BC"),
            OverlapPolicy::MaxAbBc => write!(f, "MAX_AB_BC"),
        }
    }
}

/// The way in which the second left hand side meets the first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overlap {
    /// The suffix of the first left hand side starting at the position is a
    /// proper prefix of the second left hand side.
    Suffix(usize),

    /// The second left hand side occurs in the first starting at the position.
    Contains(usize),
}

impl OverlapPolicy {
    /// Returns the length of the overlap of the left hand sides `u` and `v`.
    pub fn measure(&self, u: &[Letter], v: &[Letter], overlap: Overlap) -> usize {
        match (self, overlap) {
            (OverlapPolicy::Abc, Overlap::Suffix(position)) => position + v.len(),
            (OverlapPolicy::Abc, Overlap::Contains(_)) => u.len(),
            (OverlapPolicy::AbBc, _) => u.len() + v.len(),
            (OverlapPolicy::MaxAbBc, _) => u.len().max(v.len()),
        }
    }
}

/// Returns every overlap of `v` with `u`.
///
/// These are the positions `k > 0` at which a suffix of `u` is a proper
/// prefix of `v`, and the positions at which `v` occurs in `u`. The
/// occurrence of `u` in itself at position zero is excluded.
pub fn overlaps<'a>(u: &'a [Letter], v: &'a [Letter]) -> impl Iterator<Item = Overlap> + 'a {
    let suffixes = (u.len().saturating_sub(v.len()) + 1..u.len())
        .filter(move |position| v.starts_with(&u[*position..]))
        .map(Overlap::Suffix);

    let contains = (0..(u.len() + 1).saturating_sub(v.len()))
        .filter(move |position| !(*position == 0 && u.len() == v.len()))
        .filter(move |position| u[*position..].starts_with(v))
        .map(Overlap::Contains);

    suffixes.chain(contains)
}

/// Returns the two words obtained by applying either rule once to the overlap
/// word of both left hand sides.
pub fn critical_pair(first: &Rule, second: &Rule, overlap: Overlap) -> (Word, Word) {
    let (u, v) = (first.lhs(), second.lhs());

    match overlap {
        Overlap::Suffix(position) => {
            let rest = &v[u.len() - position..];

            let mut left = first.rhs().to_vec();
            left.extend_from_slice(rest);

            let mut right = u[..position].to_vec();
            right.extend_from_slice(second.rhs());
            (left, right)
        }
        Overlap::Contains(position) => {
            let mut right = u[..position].to_vec();
            right.extend_from_slice(second.rhs());
            right.extend_from_slice(&u[position + v.len()..]);

            (first.rhs().to_vec(), right)
        }
    }
}
