use kbc_wordgraph::WordGraphError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum KnuthBendixError {
    #[error("letter {letter} is out of range for an alphabet of size {alphabet_size}")]
    LetterOutOfRange { letter: usize, alphabet_size: usize },

    #[error("the character '{0}' does not belong to the alphabet")]
    UnknownCharacter(char),

    #[error("the character '{0}' occurs more than once in the alphabet")]
    DuplicateCharacter(char),

    #[error("the empty word is not allowed in a presentation that excludes it")]
    EmptyWord,

    #[error("relation '{0}' is malformed, expected the form lhs=rhs")]
    MalformedRelation(String),

    #[error("invalid value for option {option}: {reason}")]
    InvalidOption { option: &'static str, reason: &'static str },

    #[error("the alphabets have different sizes {0} and {1}")]
    AlphabetMismatch(usize, usize),

    #[error("there are infinitely many normal forms that are reducible in the quotient")]
    InfiniteClasses,

    #[error("the Gilman graph of the first system has {0} nodes, fewer than the {1} nodes of the second")]
    GilmanGraphTooSmall(usize, usize),

    #[error(transparent)]
    WordGraph(#[from] WordGraphError),
}
