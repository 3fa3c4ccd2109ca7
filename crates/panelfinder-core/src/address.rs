//! Address normalisation.
//!
//! Turns a user-typed address ("'Hoofdstraat,  12'") into the canonical
//! form used as a dataset key ("hoofdstraat 12").
//!
//! # Steps
//!
//! 1. Strip one leading and one trailing quote (`"` or `'`)
//! 2. Lowercase
//! 3. Replace each of `. , ; :` with a space
//! 4. Collapse whitespace runs to a single space
//! 5. Trim
//!
//! The pass is repeated until the output is stable, so nested quoting such as
//! `"'Kerkweg 6'"` ends up unquoted and `normalize` is idempotent.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

const QUOTES: [char; 2] = ['"', '\''];
const SEPARATORS: [char; 4] = ['.', ',', ';', ':'];

/// Canonicalise a raw address string. Total over all input.
pub fn normalize(raw: &str) -> String {
    let mut current = normalize_once(raw);
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_once(raw: &str) -> String {
    let unquoted = raw.strip_prefix(QUOTES).unwrap_or(raw);
    let unquoted = unquoted.strip_suffix(QUOTES).unwrap_or(unquoted);

    let lowered = unquoted.to_lowercase().replace(SEPARATORS, " ");

    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A normalised address, the lookup key of a [`Dataset`](crate::Dataset).
///
/// Construction always goes through [`normalize`], including deserialisation,
/// so two keys are equal iff their canonical strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AddressKey(String);

impl AddressKey {
    pub fn new(raw: &str) -> Self {
        Self(normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for AddressKey {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&str> for AddressKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<AddressKey> for String {
    fn from(key: AddressKey) -> Self {
        key.0
    }
}

impl Borrow<str> for AddressKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AddressKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AddressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
