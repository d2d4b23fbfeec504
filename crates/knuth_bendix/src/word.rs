use std::cmp::Ordering;

use itertools::Itertools;

/// A letter is the index of a generator in the alphabet.
pub type Letter = usize;

/// A word is a finite sequence of letters, the empty word is the identity.
pub type Word = Vec<Letter>;

/// Compares two words in the shortlex order: shorter words are smaller and
/// words of equal length are compared lexicographically.
pub fn shortlex_compare(u: &[Letter], v: &[Letter]) -> Ordering {
    u.len().cmp(&v.len()).then_with(|| u.cmp(v))
}

/// Returns true iff `prefix` is a prefix of `word`.
pub fn is_prefix(prefix: &[Letter], word: &[Letter]) -> bool {
    word.starts_with(prefix)
}

/// Returns true iff `suffix` is a suffix of `word`.
pub fn is_suffix(suffix: &[Letter], word: &[Letter]) -> bool {
    word.ends_with(suffix)
}

/// Returns the first position at which `needle` occurs in `haystack`.
pub fn find_subword(needle: &[Letter], haystack: &[Letter]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }

    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Returns true iff `needle` occurs as a contiguous subword of `haystack`.
pub fn is_subword(needle: &[Letter], haystack: &[Letter]) -> bool {
    find_subword(needle, haystack).is_some()
}

/// Formats a word as its letters separated by spaces, the empty word is printed as ε.
pub fn format_word(word: &[Letter]) -> String {
    if word.is_empty() {
        "ε".to_string()
    } else {
        word.iter().format(" ").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortlex_compare() {
        assert_eq!(shortlex_compare(&[1], &[0, 0]), Ordering::Less);
        assert_eq!(shortlex_compare(&[0, 1], &[1, 0]), Ordering::Less);
        assert_eq!(shortlex_compare(&[], &[]), Ordering::Equal);
        assert_eq!(shortlex_compare(&[2, 0], &[1, 9]), Ordering::Greater);
    }

    #[test]
    fn test_subwords() {
        assert!(is_subword(&[1, 2], &[0, 1, 2, 3]));
        assert!(is_subword(&[], &[0]));
        assert!(!is_subword(&[2, 1], &[0, 1, 2, 3]));
        assert!(!is_subword(&[0, 1, 2], &[0, 1]));
        assert_eq!(find_subword(&[1, 1], &[0, 1, 1, 1]), Some(1));

        assert!(is_prefix(&[0, 1], &[0, 1, 2]));
        assert!(is_suffix(&[1, 2], &[0, 1, 2]));
        assert!(!is_suffix(&[0, 1], &[0, 1, 2]));
    }

    #[test]
    fn test_format_word() {
        assert_eq!(format_word(&[0, 12, 3]), "0 12 3");
        assert_eq!(format_word(&[]), "ε");
    }
}
