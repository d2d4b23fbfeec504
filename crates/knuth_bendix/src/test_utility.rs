use crate::Letter;
use crate::Word;
use crate::is_subword;

/// Returns all words over the alphabet of at most the given length, in shortlex order.
pub fn all_words(alphabet_size: usize, max_length: usize) -> Vec<Word> {
    let mut result = vec![Word::new()];
    let mut previous = vec![Word::new()];

    for _ in 0..max_length {
        let mut next = Vec::new();
        for word in &previous {
            for letter in 0..alphabet_size {
                let mut extended = word.clone();
                extended.push(letter);
                next.push(extended);
            }
        }

        result.extend(next.iter().cloned());
        previous = next;
    }

    result
}

/// Returns true iff one of the given left hand sides is a subword of the word.
pub fn contains_lhs(left_hand_sides: &[Word], word: &[Letter]) -> bool {
    left_hand_sides.iter().any(|lhs| is_subword(lhs, word))
}
