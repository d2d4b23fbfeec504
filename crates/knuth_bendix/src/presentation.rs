use std::fmt;

use itertools::Itertools;

use crate::KnuthBendixError;
use crate::Letter;
use crate::Word;
use crate::format_word;

/// A finite presentation: an alphabet of `alphabet_size` letters and a list
/// of defining relations between words over that alphabet.
///
/// When `contains_empty_word` is true the presentation defines a monoid and
/// the empty word is a normal form, otherwise it defines a semigroup and the
/// empty word may not occur in a relation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    alphabet_size: usize,
    rules: Vec<(Word, Word)>,
    contains_empty_word: bool,
}

impl Presentation {
    /// Creates a monoid presentation without relations.
    pub fn new(alphabet_size: usize) -> Presentation {
        Presentation {
            alphabet_size,
            rules: Vec::new(),
            contains_empty_word: true,
        }
    }

    /// Creates a presentation over the characters of `alphabet`, the i-th
    /// character becomes letter i, with relations written as strings.
    pub fn from_strings(alphabet: &str, relations: &[(&str, &str)]) -> Result<Presentation, KnuthBendixError> {
        let characters: Vec<char> = alphabet.chars().collect();
        if let Some(duplicate) = characters.iter().duplicates().next() {
            return Err(KnuthBendixError::DuplicateCharacter(*duplicate));
        }

        let mut presentation = Presentation::new(characters.len());
        for (lhs, rhs) in relations {
            presentation.add_rule(parse_word(alphabet, lhs)?, parse_word(alphabet, rhs)?)?;
        }

        Ok(presentation)
    }

    /// Sets whether the empty word belongs to the presented structure.
    pub fn set_contains_empty_word(&mut self, value: bool) -> Result<&mut Self, KnuthBendixError> {
        if !value && self.rules.iter().any(|(lhs, rhs)| lhs.is_empty() || rhs.is_empty()) {
            return Err(KnuthBendixError::EmptyWord);
        }

        self.contains_empty_word = value;
        Ok(self)
    }

    /// Adds the relation `lhs = rhs`.
    pub fn add_rule(&mut self, lhs: Word, rhs: Word) -> Result<&mut Self, KnuthBendixError> {
        self.validate_word(&lhs)?;
        self.validate_word(&rhs)?;

        self.rules.push((lhs, rhs));
        Ok(self)
    }

    /// Removes and returns the relation at the given position.
    pub fn remove_rule(&mut self, index: usize) -> (Word, Word) {
        self.rules.remove(index)
    }

    /// Checks that every letter of the word is in the alphabet.
    pub fn validate_word(&self, word: &[Letter]) -> Result<(), KnuthBendixError> {
        if !self.contains_empty_word && word.is_empty() {
            return Err(KnuthBendixError::EmptyWord);
        }

        if let Some(letter) = word.iter().find(|letter| **letter >= self.alphabet_size) {
            return Err(KnuthBendixError::LetterOutOfRange {
                letter: *letter,
                alphabet_size: self.alphabet_size,
            });
        }

        Ok(())
    }

    /// Checks every relation.
    pub fn validate(&self) -> Result<(), KnuthBendixError> {
        for (lhs, rhs) in &self.rules {
            self.validate_word(lhs)?;
            self.validate_word(rhs)?;
        }
        Ok(())
    }

    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    pub fn rules(&self) -> &[(Word, Word)] {
        &self.rules
    }

    pub fn contains_empty_word(&self) -> bool {
        self.contains_empty_word
    }
}

impl fmt::Display for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Alphabet size: {}", self.alphabet_size)?;
        for (lhs, rhs) in &self.rules {
            writeln!(f, "{} = {}", format_word(lhs), format_word(rhs))?;
        }
        Ok(())
    }
}

/// Converts a string over the characters of `alphabet` to a word.
pub fn parse_word(alphabet: &str, text: &str) -> Result<Word, KnuthBendixError> {
    text.chars()
        .map(|character| {
            alphabet
                .chars()
                .position(|other| other == character)
                .ok_or(KnuthBendixError::UnknownCharacter(character))
        })
        .collect()
}

/// Converts a word back to a string over the characters of `alphabet`,
/// letters without a character are printed as `?`.
pub fn word_to_string(alphabet: &str, word: &[Letter]) -> String {
    word.iter()
        .map(|letter| alphabet.chars().nth(*letter).unwrap_or('?'))
        .collect()
}

/// Parses a relation of the form `lhs=rhs`.
pub fn parse_relation(alphabet: &str, text: &str) -> Result<(Word, Word), KnuthBendixError> {
    let Some((lhs, rhs)) = text.split_once('=') else {
        return Err(KnuthBendixError::MalformedRelation(text.to_string()));
    };

    if rhs.contains('=') {
        return Err(KnuthBendixError::MalformedRelation(text.to_string()));
    }

    Ok((parse_word(alphabet, lhs.trim())?, parse_word(alphabet, rhs.trim())?))
}
