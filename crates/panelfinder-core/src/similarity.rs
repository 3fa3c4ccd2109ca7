//! Coarse street-name similarity.
//!
//! A bag-of-characters heuristic, not an edit distance: "kerkweg" and
//! "kerkwge" are similar, and so are anagram-like pairs. Lookups depend on
//! this exact behaviour, so it must not be swapped for Levenshtein.

use std::collections::HashSet;

/// Threshold used when the caller has no better value.
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Decide whether two street tokens are similar.
///
/// - Both empty: similar.
/// - One contains the other: similar, regardless of `threshold`, provided the
///   contained string is non-empty. The containment ratio
///   (`len(shorter) / len(longer)`) is never compared with the threshold, so
///   "ab" counts as similar to "abcdefghij".
/// - Otherwise: similar iff [`char_overlap`] ≥ `threshold`.
pub fn similar(a: &str, b: &str, threshold: f64) -> bool {
    let (longer, shorter) = order_by_length(a, b);
    if longer.is_empty() {
        return true;
    }

    if longer.contains(shorter) {
        return containment_ratio(a, b) > 0.0;
    }

    char_overlap(a, b) >= threshold
}

/// `len(shorter) / len(longer)` in characters; 1.0 when both are empty.
pub fn containment_ratio(a: &str, b: &str) -> f64 {
    let (longer, shorter) = order_by_length(a, b);
    let longer_len = longer.chars().count();
    if longer_len == 0 {
        return 1.0;
    }
    shorter.chars().count() as f64 / longer_len as f64
}

/// Fraction of the longer string's characters that occur anywhere in the
/// shorter one. Repeated characters each count.
pub fn char_overlap(a: &str, b: &str) -> f64 {
    let (longer, shorter) = order_by_length(a, b);
    let longer_len = longer.chars().count();
    if longer_len == 0 {
        return 1.0;
    }

    let alphabet: HashSet<char> = shorter.chars().collect();
    let matches = longer.chars().filter(|c| alphabet.contains(c)).count();
    matches as f64 / longer_len.max(shorter.chars().count()) as f64
}

/// `(longer, shorter)`; `a` is only the longer one when strictly longer.
fn order_by_length<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a.chars().count() > b.chars().count() {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_are_similar() {
        assert!(similar("kerkweg", "kerkweg", DEFAULT_THRESHOLD));
    }

    #[test]
    fn both_empty_is_similar() {
        assert!(similar("", "", DEFAULT_THRESHOLD));
    }

    #[test]
    fn empty_against_non_empty_is_not_similar() {
        assert!(!similar("", "kerkweg", 0.0));
        assert!(!similar("kerkweg", "", 0.0));
    }

    #[test]
    fn containment_ignores_threshold() {
        assert!(similar("ab", "abcdefghij", 0.99));
        assert!(similar("hoofdstraatnoord", "straat", 0.99));
        assert!((containment_ratio("ab", "abcdefghij") - 0.2).abs() < 1e-9);
    }

    #[test]
    fn transposition_is_similar() {
        // every character of "kerkwge" occurs in "kerkweg"
        assert!(similar("kerkweg", "kerkwge", 0.7));
    }

    #[test]
    fn anagram_like_pairs_over_match() {
        assert!(similar("dorpsstraat", "stratdorps", 0.7));
    }

    #[test]
    fn unrelated_streets_are_not_similar() {
        assert!(!similar("kerkweg", "dorpsstraat", 0.7));
        assert!(!similar("molenlaan", "beukweg", 0.7));
    }

    #[test]
    fn overlap_counts_repeated_characters() {
        // longer "aaab", shorter "ac": three a's of four characters match
        assert!((char_overlap("aaab", "ac") - 0.75).abs() < 1e-9);
        assert!(similar("aaab", "ac", 0.75));
        assert!(!similar("aaab", "ac", 0.76));
    }

    #[test]
    fn overlap_is_symmetric() {
        assert_eq!(char_overlap("molenweg", "molenlaan"), char_overlap("molenlaan", "molenweg"));
    }

    #[test]
    fn equal_length_tie_uses_second_as_longer() {
        // "abcd" vs "abce": same length; longer = "abce", shorter set {a,b,c,d}
        assert!((char_overlap("abcd", "abce") - 0.75).abs() < 1e-9);
    }
}
