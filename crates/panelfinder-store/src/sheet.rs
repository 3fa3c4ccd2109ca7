//! Header-row table shared by the CSV and workbook readers, and its mapping
//! onto [`SolarRecord`] fields.

use std::collections::HashMap;

use panelfinder_core::{AddressKey, Dataset, Field, FieldValue, SolarRecord};
use tracing::debug;

use crate::StoreError;

const ADDRESS_COLUMNS: &[&str] = &["Address", "address"];

/// Column headers accepted for each field, in order of preference.
///
/// `kWp` feeds both `kwp` and the legacy `capacity` field.
fn aliases(field: Field) -> &'static [&'static str] {
    match field {
        Field::Panels => &[
            "Number of solar panels",
            "Number of Solar Panels",
            "Panels",
            "panels",
            "Number of Panels",
            "Number of panels",
        ],
        Field::ConfidenceLevel => &[
            "Confidence level (1-10)",
            "Confidence Level (1-10)",
            "Confidence level",
            "confidenceLevel",
        ],
        Field::AnnualOutput => &[
            "Annual output (kWh)",
            "Annual Output (kWh)",
            "Annual output",
            "annualOutput",
        ],
        Field::Kwp => &["kWp", "KWp", "kwp"],
        Field::KwhPerKwpPerYear => &["kWh/kWp/year_NL", "kwhPerKwpPerYear"],
        Field::AvailabilityFactor => &[
            "Availability factor (%)",
            "Availability Factor (%)",
            "Availability factor",
            "availabilityFactor",
        ],
        Field::AvgSolarPanelOutput => &[
            "Avg solar panel output (Wp)",
            "Avg Solar Panel Output (Wp)",
            "Avg solar panel output",
            "avgSolarPanelOutput",
        ],
        Field::Capacity => &[
            "kWp",
            "KWp",
            "kwp",
            "Capacity",
            "capacity",
            "Total Capacity (kW)",
        ],
        Field::InstallationDate => &["Installation Date", "Installation date", "installationDate"],
    }
}

/// A sheet read as a header row plus data rows. `None` is an empty cell.
#[derive(Debug, Default)]
pub(crate) struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<FieldValue>>>,
}

/// Header name → column index; the leftmost column wins on duplicates.
struct Columns(HashMap<String, usize>);

impl Columns {
    fn new(headers: &[String]) -> Self {
        let mut map = HashMap::with_capacity(headers.len());
        for (i, h) in headers.iter().enumerate() {
            map.entry(h.trim().to_string()).or_insert(i);
        }
        Self(map)
    }

    fn has_any(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.0.contains_key(*n))
    }

    /// First non-empty cell among `names`, in alias order.
    fn pick<'r>(&self, row: &'r [Option<FieldValue>], names: &[&str]) -> Option<&'r FieldValue> {
        names
            .iter()
            .filter_map(|n| self.0.get(*n))
            .find_map(|&i| row.get(i).and_then(Option::as_ref))
    }
}

/// Build the address dataset from a table.
///
/// Rows whose address is empty after normalisation are skipped. A later row
/// with the same address replaces the earlier record.
pub(crate) fn dataset_from_table(table: &Table) -> Result<Dataset, StoreError> {
    let columns = Columns::new(&table.headers);
    if !columns.has_any(ADDRESS_COLUMNS) {
        return Err(StoreError::MissingAddressColumn);
    }

    let mut dataset = Dataset::new();
    let mut skipped = 0usize;

    for row in &table.rows {
        let key = columns
            .pick(row, ADDRESS_COLUMNS)
            .map(|v| AddressKey::new(&v.to_string()))
            .filter(|k| !k.is_empty());
        let Some(key) = key else {
            skipped += 1;
            continue;
        };

        let record = Field::ALL
            .into_iter()
            .fold(SolarRecord::default(), |record, field| {
                match columns.pick(row, aliases(field)) {
                    Some(value) => record.with(field, value.clone()),
                    None => record,
                }
            });
        dataset.insert(key, record);
    }

    if skipped > 0 {
        debug!(skipped, "rows without an address");
    }
    Ok(dataset)
}
