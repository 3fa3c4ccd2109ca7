//! The address → record table a lookup runs against.

use indexmap::IndexMap;
use indexmap::map::Iter;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::address::{AddressKey, normalize};
use crate::config::MatchConfig;
use crate::ranker::{Match, MatchRule, rank};
use crate::record::SolarRecord;

/// Insertion-ordered mapping from [`AddressKey`] to [`SolarRecord`].
///
/// Order matters: when two keys score the same, the one inserted first wins.
/// Re-inserting an existing key replaces its record but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    records: IndexMap<AddressKey, SolarRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the one it replaced.
    pub fn insert(&mut self, key: AddressKey, record: SolarRecord) -> Option<SolarRecord> {
        self.records.insert(key, record)
    }

    /// Exact lookup by canonical key.
    pub fn get(&self, key: &str) -> Option<&SolarRecord> {
        self.records.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &AddressKey> + Clone {
        self.records.keys()
    }

    pub fn iter(&self) -> Iter<'_, AddressKey, SolarRecord> {
        self.records.iter()
    }

    /// Find the record best matching a user-typed address.
    ///
    /// An exact key hit is a map lookup; only a miss scores every key.
    pub fn resolve(&self, query: &str, config: &MatchConfig) -> Option<(Match, &SolarRecord)> {
        let normalized = normalize(query);
        if let Some((key, record)) = self.records.get_key_value(normalized.as_str()) {
            debug!(query = %normalized, "exact match");
            let found = Match {
                key: key.clone(),
                score: 1.0,
                rule: MatchRule::Exact,
            };
            return Some((found, record));
        }

        let found = rank(query, self.keys(), config)?;
        let record = self.records.get(&found.key)?;
        Some((found, record))
    }
}

impl FromIterator<(AddressKey, SolarRecord)> for Dataset {
    fn from_iter<I: IntoIterator<Item = (AddressKey, SolarRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = (&'a AddressKey, &'a SolarRecord);
    type IntoIter = Iter<'a, AddressKey, SolarRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;

    #[test]
    fn reinsert_keeps_first_position() {
        let mut dataset = Dataset::new();
        dataset.insert("kerkweg 6".into(), SolarRecord::default());
        dataset.insert("dorpsstraat 1".into(), SolarRecord::default());
        let replaced = dataset.insert("Kerkweg, 6".into(), SolarRecord::default().with(Field::Panels, 12.0));

        assert!(replaced.is_some());
        assert_eq!(dataset.len(), 2);
        let keys: Vec<&str> = dataset.keys().map(AddressKey::as_str).collect();
        assert_eq!(keys, ["kerkweg 6", "dorpsstraat 1"]);
        assert!(dataset.get("kerkweg 6").unwrap().panels.is_some());
    }

    #[test]
    fn resolve_returns_the_matching_record() {
        let dataset: Dataset = [
            ("hoofdstraat 12".into(), SolarRecord::default().with(Field::Panels, 14.0)),
            ("kerkweg 6b".into(), SolarRecord::default().with(Field::Panels, 22.0)),
        ]
        .into_iter()
        .collect();

        let (found, record) = dataset.resolve("Kerkweg 6", &MatchConfig::default()).unwrap();
        assert_eq!(found.key.as_str(), "kerkweg 6b");
        assert_eq!(record.panels, Some(22.0.into()));
    }

    #[test]
    fn exact_key_resolves_without_scoring_earlier_keys() {
        let dataset: Dataset = [
            ("hoofdstraat 12a".into(), SolarRecord::default().with(Field::Panels, 8.0)),
            ("hoofdstraat 12".into(), SolarRecord::default().with(Field::Panels, 14.0)),
        ]
        .into_iter()
        .collect();

        let (found, record) = dataset.resolve("'Hoofdstraat,  12'", &MatchConfig::default()).unwrap();
        assert_eq!(found.key.as_str(), "hoofdstraat 12");
        assert_eq!(found.score, 1.0);
        assert_eq!(found.rule, MatchRule::Exact);
        assert_eq!(record.panels, Some(14.0.into()));
    }

    #[test]
    fn empty_dataset_resolves_nothing() {
        assert!(Dataset::new().resolve("hoofdstraat 12", &MatchConfig::default()).is_none());
    }

    #[test]
    fn deserialising_keeps_sheet_order() {
        let json = r#"{"Kerkweg 6B": {"panels": 22}, "hoofdstraat 12": {"panels": "14"}}"#;
        let dataset: Dataset = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = dataset.keys().map(AddressKey::as_str).collect();
        assert_eq!(keys, ["kerkweg 6b", "hoofdstraat 12"]);
    }
}
