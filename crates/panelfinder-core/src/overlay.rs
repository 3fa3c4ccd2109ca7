//! Working-copy overlay and derived-field recalculation.
//!
//! A loaded [`SolarRecord`] is never mutated. User edits land in an
//! [`Overlay`] of optional string values layered on top, and editing one of
//! the model inputs recomputes the fields derived from it:
//!
//! - kWp = panels × avg panel output (Wp) / 1000
//! - annual output (kWh) = kWp × kWh/kWp/year × availability factor / 100
//!
//! A formula whose inputs are missing, unparsable or not positive is skipped
//! and leaves the previous overlay value in place.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::record::{Field, FieldValue, SolarRecord, parse_leading_float};

/// Sparse set of user-edited values, one slot per record field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panels: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kwp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kwh_per_kwp_per_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_factor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_solar_panel_output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_date: Option<String>,
}

impl Overlay {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.slot(*f).is_none())
    }

    /// Edited fields in [`Field::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL
            .into_iter()
            .filter_map(|f| self.get(f).map(|v| (f, v)))
    }

    /// Overlay value when set and non-empty; an empty edit falls back to the
    /// record.
    fn present(&self, field: Field) -> Option<&str> {
        self.get(field).filter(|v| !v.is_empty())
    }

    fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::Panels => &self.panels,
            Field::ConfidenceLevel => &self.confidence_level,
            Field::AnnualOutput => &self.annual_output,
            Field::Kwp => &self.kwp,
            Field::KwhPerKwpPerYear => &self.kwh_per_kwp_per_year,
            Field::AvailabilityFactor => &self.availability_factor,
            Field::AvgSolarPanelOutput => &self.avg_solar_panel_output,
            Field::Capacity => &self.capacity,
            Field::InstallationDate => &self.installation_date,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Panels => &mut self.panels,
            Field::ConfidenceLevel => &mut self.confidence_level,
            Field::AnnualOutput => &mut self.annual_output,
            Field::Kwp => &mut self.kwp,
            Field::KwhPerKwpPerYear => &mut self.kwh_per_kwp_per_year,
            Field::AvailabilityFactor => &mut self.availability_factor,
            Field::AvgSolarPanelOutput => &mut self.avg_solar_panel_output,
            Field::Capacity => &mut self.capacity,
            Field::InstallationDate => &mut self.installation_date,
        }
    }
}

/// Fields whose edit triggers the annual output formula.
const ANNUAL_OUTPUT_INPUTS: [Field; 3] = [
    Field::AvgSolarPanelOutput,
    Field::KwhPerKwpPerYear,
    Field::AvailabilityFactor,
];

/// Apply one edit to `overlay` and recompute the fields that depend on it.
///
/// Returns the updated overlay; `record` and `overlay` are left untouched.
pub fn recompute(record: &SolarRecord, overlay: &Overlay, field: Field, value: &str) -> Overlay {
    let mut next = overlay.clone();
    next.set(field, value);

    // Unrounded; the overlay only keeps the 2-decimal display form.
    let mut fresh_kwp = None;
    if field == Field::AvgSolarPanelOutput {
        let panels = record.panels.as_ref().and_then(FieldValue::as_f64);
        let avg_output = resolve(record, &next, Field::AvgSolarPanelOutput);
        if let (Some(panels), Some(avg_output)) = (positive(panels), positive(avg_output)) {
            let kwp = panels * avg_output / 1000.0;
            debug!(panels, avg_output, kwp, "recomputed kWp");
            next.set(Field::Kwp, format!("{kwp:.2}"));
            fresh_kwp = Some(kwp);
        }
    }

    if ANNUAL_OUTPUT_INPUTS.contains(&field) {
        let kwp = fresh_kwp.or_else(|| resolve(record, &next, Field::Kwp));
        let yield_per_kwp = resolve(record, &next, Field::KwhPerKwpPerYear);
        let availability = resolve_availability(record, &next);
        if let (Some(kwp), Some(yield_per_kwp), Some(availability)) =
            (positive(kwp), positive(yield_per_kwp), positive(availability))
        {
            let annual = (kwp * yield_per_kwp * (availability / 100.0)).round();
            if annual.is_finite() {
                debug!(kwp, yield_per_kwp, availability, annual, "recomputed annual output");
                next.set(Field::AnnualOutput, format!("{annual:.0}"));
            }
        }
    }

    next
}

/// Overlay value if present and non-empty, else the record's value.
fn resolve(record: &SolarRecord, overlay: &Overlay, field: Field) -> Option<f64> {
    match overlay.present(field) {
        Some(edited) => parse_leading_float(edited),
        None => record.get(field).and_then(FieldValue::as_f64),
    }
}

/// Availability factor as a 0–100 percentage. Edited values are taken as
/// already being a percentage; stored values may be a fraction or "95%".
fn resolve_availability(record: &SolarRecord, overlay: &Overlay) -> Option<f64> {
    match overlay.present(Field::AvailabilityFactor) {
        Some(edited) => parse_leading_float(edited),
        None => record
            .availability_factor
            .as_ref()
            .and_then(FieldValue::as_percentage),
    }
}

fn positive(v: Option<f64>) -> Option<f64> {
    v.filter(|v| *v > 0.0)
}
