//! Candidate ranking: pick the dataset key that best matches a query.
//!
//! Every key is scored against the query by the first rule that applies in
//! a fixed priority table. Which table is used depends on what the query
//! holds:
//!
//! | # | query has       | rule                                         | score |
//! |---|-----------------|----------------------------------------------|-------|
//! | 1 | street + number | street equal, number equal                   | 1.0   |
//! | 2 | street + number | street equal, whitespace-free number equal   | 0.95  |
//! | 3 | street + number | street equal, one number contains the other  | 0.9   |
//! | 4 | street + number | street equal, both numbers present           | 0.7   |
//! | 5 | street + number | streets similar, number equal                | 0.85  |
//! | 6 | street + number | streets similar                              | 0.6   |
//! | 7 | street only     | street equal                                 | 0.8   |
//! | 8 | street only     | streets similar                              | 0.6   |
//! | 9 | street only     | one street contains the other                | 0.5   |
//!
//! A key no rule applies to may still score through the substring fallback
//! on the full normalised strings. The highest score wins (first key on
//! ties) if it reaches the acceptance threshold.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::address::{AddressKey, normalize};
use crate::config::MatchConfig;
use crate::similarity::similar;
use crate::street_number::StreetNumber;

/// Which rule produced a [`Match`] score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Normalised query equals the key verbatim.
    Exact,
    StreetAndNumber,
    StreetAndNormalizedNumber,
    StreetAndPartialNumber,
    StreetNumberMismatch,
    SimilarStreetAndNumber,
    SimilarStreet,
    Street,
    SimilarStreetOnly,
    PartialStreet,
    /// One normalised string contains the other.
    Substring,
}

impl MatchRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::StreetAndNumber => "street_and_number",
            Self::StreetAndNormalizedNumber => "street_and_normalized_number",
            Self::StreetAndPartialNumber => "street_and_partial_number",
            Self::StreetNumberMismatch => "street_number_mismatch",
            Self::SimilarStreetAndNumber => "similar_street_and_number",
            Self::SimilarStreet => "similar_street",
            Self::Street => "street",
            Self::SimilarStreetOnly => "similar_street_only",
            Self::PartialStreet => "partial_street",
            Self::Substring => "substring",
        }
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The selected key and its score in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub key: AddressKey,
    pub score: f64,
    pub rule: MatchRule,
}

/// Decomposed query and key being compared.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub query: &'a StreetNumber,
    pub key: &'a StreetNumber,
}

impl Candidate<'_> {
    fn street_equal(&self) -> bool {
        self.key.street == self.query.street
    }

    fn number_equal(&self) -> bool {
        self.key.number == self.query.number
    }

    fn both_numbers(&self) -> bool {
        self.key.has_number() && self.query.has_number()
    }

    fn streets_similar(&self, config: &MatchConfig) -> bool {
        similar(&self.key.street, &self.query.street, config.street_similarity)
    }
}

/// One row of a priority table.
pub struct Rule {
    pub rule: MatchRule,
    pub score: f64,
    pub applies: fn(&Candidate<'_>, &MatchConfig) -> bool,
}

/// Rules for a query with both a street and a number, in priority order.
pub const STREET_AND_NUMBER_RULES: &[Rule] = &[
    Rule {
        rule: MatchRule::StreetAndNumber,
        score: 1.0,
        applies: street_and_number,
    },
    Rule {
        rule: MatchRule::StreetAndNormalizedNumber,
        score: 0.95,
        applies: street_and_normalized_number,
    },
    Rule {
        rule: MatchRule::StreetAndPartialNumber,
        score: 0.9,
        applies: street_and_partial_number,
    },
    Rule {
        rule: MatchRule::StreetNumberMismatch,
        score: 0.7,
        applies: street_with_other_number,
    },
    Rule {
        rule: MatchRule::SimilarStreetAndNumber,
        score: 0.85,
        applies: similar_street_and_number,
    },
    Rule {
        rule: MatchRule::SimilarStreet,
        score: 0.6,
        applies: similar_street,
    },
];

/// Rules for a query with a street but no number, in priority order.
pub const STREET_ONLY_RULES: &[Rule] = &[
    Rule {
        rule: MatchRule::Street,
        score: 0.8,
        applies: street,
    },
    Rule {
        rule: MatchRule::SimilarStreetOnly,
        score: 0.6,
        applies: similar_street,
    },
    Rule {
        rule: MatchRule::PartialStreet,
        score: 0.5,
        applies: partial_street,
    },
];

fn street_and_number(c: &Candidate<'_>, _: &MatchConfig) -> bool {
    c.street_equal() && c.number_equal()
}

// Numbers are already whitespace-free after extraction; kept for keys built
// by other means.
fn street_and_normalized_number(c: &Candidate<'_>, _: &MatchConfig) -> bool {
    c.street_equal() && strip_whitespace(&c.key.number) == strip_whitespace(&c.query.number)
}

fn street_and_partial_number(c: &Candidate<'_>, _: &MatchConfig) -> bool {
    c.street_equal()
        && c.both_numbers()
        && (c.key.number.contains(c.query.number.as_str())
            || c.query.number.contains(c.key.number.as_str()))
}

fn street_with_other_number(c: &Candidate<'_>, _: &MatchConfig) -> bool {
    c.street_equal() && c.both_numbers()
}

fn similar_street_and_number(c: &Candidate<'_>, config: &MatchConfig) -> bool {
    c.streets_similar(config) && c.number_equal()
}

fn similar_street(c: &Candidate<'_>, config: &MatchConfig) -> bool {
    c.streets_similar(config)
}

fn street(c: &Candidate<'_>, _: &MatchConfig) -> bool {
    c.street_equal()
}

fn partial_street(c: &Candidate<'_>, _: &MatchConfig) -> bool {
    c.key.street.contains(c.query.street.as_str()) || c.query.street.contains(c.key.street.as_str())
}

fn rules_for(query: &StreetNumber) -> &'static [Rule] {
    match (query.has_street(), query.has_number()) {
        (true, true) => STREET_AND_NUMBER_RULES,
        (true, false) => STREET_ONLY_RULES,
        (false, _) => &[],
    }
}

/// Score one key against the query. `None` means a score of zero.
///
/// `normalized_query` and `normalized_key` are the canonical full strings,
/// used by the substring fallback.
pub fn score_candidate(
    candidate: &Candidate<'_>,
    normalized_query: &str,
    normalized_key: &str,
    config: &MatchConfig,
) -> Option<(f64, MatchRule)> {
    let ruled = rules_for(candidate.query)
        .iter()
        .find(|r| (r.applies)(candidate, config))
        .map(|r| (r.score, r.rule));
    if ruled.is_some() {
        return ruled;
    }

    let ratio = substring_ratio(normalized_query, normalized_key, config.fallback_min_len);
    (ratio > 0.0).then_some((ratio, MatchRule::Substring))
}

/// `len(shorter) / len(longer)` when one string contains the other and the
/// shorter is longer than `min_len` characters, else 0.
fn substring_ratio(query: &str, key: &str, min_len: usize) -> f64 {
    if !(key.contains(query) || query.contains(key)) {
        return 0.0;
    }
    let query_len = query.chars().count();
    let key_len = key.chars().count();
    let (shorter, longer) = if query_len < key_len {
        (query_len, key_len)
    } else {
        (key_len, query_len)
    };
    if shorter > min_len {
        shorter as f64 / longer as f64
    } else {
        0.0
    }
}

/// Find the key best matching a user-typed address.
///
/// An exact match on the normalised query wins outright with score 1.0.
/// Otherwise every key is scored and the best one is returned if it reaches
/// `config.acceptance_threshold`.
pub fn rank<'a, I>(query: &str, keys: I, config: &MatchConfig) -> Option<Match>
where
    I: IntoIterator<Item = &'a AddressKey>,
    I::IntoIter: Clone,
{
    let keys = keys.into_iter();
    let normalized_query = normalize(query);

    if let Some(key) = keys.clone().find(|k| k.as_str() == normalized_query) {
        debug!(query = %normalized_query, "exact match");
        return Some(Match {
            key: key.clone(),
            score: 1.0,
            rule: MatchRule::Exact,
        });
    }

    let parsed_query = StreetNumber::extract(query);
    let mut best: Option<Match> = None;

    for key in keys {
        let parsed_key = StreetNumber::extract(key.as_str());
        let candidate = Candidate {
            query: &parsed_query,
            key: &parsed_key,
        };
        let Some((score, rule)) =
            score_candidate(&candidate, &normalized_query, key.as_str(), config)
        else {
            continue;
        };

        if score > best.as_ref().map_or(0.0, |b| b.score) {
            best = Some(Match {
                key: key.clone(),
                score,
                rule,
            });
        }
    }

    match best {
        Some(m) if m.score >= config.acceptance_threshold => {
            debug!(
                query = %normalized_query,
                key = %m.key,
                score = format_args!("{:.2}", m.score),
                rule = %m.rule,
                "matched"
            );
            Some(m)
        }
        rejected => {
            debug!(query = %normalized_query, best = ?rejected.map(|b| b.score), "no match");
            None
        }
    }
}

fn strip_whitespace(s: &str) -> String {
    s.split_whitespace().collect()
}
