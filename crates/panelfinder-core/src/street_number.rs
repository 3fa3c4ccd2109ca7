//! Street name / house number decomposition.
//!
//! Splits a normalised address such as "laan van meerdervoort 100b" into the
//! street "laanvanmeerdervoort" and the house number "100b". Whitespace is
//! removed from both parts so that "kerk weg" and "kerkweg" compare equal.
//!
//! # Algorithm
//!
//! 1. Anchored: letters/spaces (shortest run), whitespace, then digits with an
//!    optional lowercase letter suffix.
//! 2. Otherwise the first digits+suffix token anywhere in the string is the
//!    number, and the street is what remains once that token is removed.
//! 3. Otherwise there is no number and the whole input is the street.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::address::normalize;

static STREET_THEN_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z\s]+?)\s+([0-9]+[a-z]*)").expect("valid regex"));

static NUMBER_ANYWHERE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+[a-z]*)").expect("valid regex"));

/// A decomposed `(street, number)` pair. Recomputed per lookup, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreetNumber {
    pub street: String,
    /// Empty when the input holds no digits.
    pub number: String,
}

impl StreetNumber {
    /// Decompose a raw address. Never fails; the worst case is an empty number.
    pub fn extract(raw: &str) -> Self {
        let normalized = normalize(raw);

        if let Some(caps) = STREET_THEN_NUMBER.captures(&normalized) {
            return Self {
                street: strip_whitespace(caps[1].trim()),
                number: strip_whitespace(&caps[2].to_lowercase()),
            };
        }

        if let Some(m) = NUMBER_ANYWHERE.find(&normalized) {
            let number = m.as_str().to_lowercase();
            let street = strip_whitespace(normalized.replacen(&number, "", 1).trim());
            return Self { street, number };
        }

        Self {
            street: strip_whitespace(&normalized),
            number: String::new(),
        }
    }

    pub fn has_street(&self) -> bool {
        !self.street.is_empty()
    }

    pub fn has_number(&self) -> bool {
        !self.number.is_empty()
    }
}

fn strip_whitespace(s: &str) -> String {
    s.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sn(street: &str, number: &str) -> StreetNumber {
        StreetNumber {
            street: street.into(),
            number: number.into(),
        }
    }

    #[test]
    fn street_then_number() {
        assert_eq!(StreetNumber::extract("Hoofdstraat 12"), sn("hoofdstraat", "12"));
        assert_eq!(StreetNumber::extract("kerkweg 6b"), sn("kerkweg", "6b"));
    }

    #[test]
    fn multi_word_street_is_joined() {
        assert_eq!(
            StreetNumber::extract("Laan van Meerdervoort 100"),
            sn("laanvanmeerdervoort", "100")
        );
    }

    #[test]
    fn suffix_letter_is_lowercased() {
        assert_eq!(StreetNumber::extract("Kerkweg 6B"), sn("kerkweg", "6b"));
    }

    #[test]
    fn only_the_first_number_is_taken() {
        // Street portion is the shortest letter run before the first number.
        assert_eq!(StreetNumber::extract("dorpsstraat 4 utrecht"), sn("dorpsstraat", "4"));
        assert_eq!(StreetNumber::extract("kerkweg 6, 1234 ab"), sn("kerkweg", "6"));
    }

    #[test]
    fn falls_back_to_number_anywhere() {
        assert_eq!(StreetNumber::extract("12 Hoofdstraat"), sn("hoofdstraat", "12"));
        assert_eq!(StreetNumber::extract("'s-gravenweg 3"), sn("s-gravenweg", "3"));
        assert_eq!(StreetNumber::extract("straße 7"), sn("straße", "7"));
    }

    #[test]
    fn number_without_street() {
        assert_eq!(StreetNumber::extract("42"), sn("", "42"));
        assert_eq!(StreetNumber::extract("12a"), sn("", "12a"));
    }

    #[test]
    fn no_digits_means_empty_number() {
        assert_eq!(StreetNumber::extract("Kerk weg"), sn("kerkweg", ""));
        assert!(!StreetNumber::extract("Kerkweg").has_number());
    }

    #[test]
    fn empty_input() {
        let parsed = StreetNumber::extract("");
        assert_eq!(parsed, StreetNumber::default());
        assert!(!parsed.has_street());
        assert!(!parsed.has_number());
    }

    proptest! {
        #[test]
        fn extract_is_total_and_whitespace_free(s in any::<String>()) {
            let parsed = StreetNumber::extract(&s);
            prop_assert!(!parsed.street.chars().any(char::is_whitespace));
            prop_assert!(!parsed.number.chars().any(char::is_whitespace));
        }

        #[test]
        fn number_starts_with_digit_when_present(s in "[a-z ]{0,12}[0-9]{0,3}[a-z]{0,2}") {
            let parsed = StreetNumber::extract(&s);
            if let Some(first) = parsed.number.chars().next() {
                prop_assert!(first.is_ascii_digit());
            }
        }
    }
}
