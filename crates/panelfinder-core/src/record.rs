//! Solar panel records as loaded from the address spreadsheet.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::CoreError;

static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?").expect("valid regex")
});

/// Parse the leading numeric prefix of `s`, ignoring leading whitespace.
///
/// "95%" → 95, "  8.5 kWp" → 8.5, "kWp" → None. Non-finite results are `None`.
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let m = LEADING_FLOAT.find(s.trim_start())?;
    m.as_str().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// A single spreadsheet cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric reading of the value; text is read leniently.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Number(_) => None,
            Self::Text(s) => parse_leading_float(s),
        }
    }

    /// Read as a 0–100 percentage.
    ///
    /// "95%" → 95, 0.95 → 95, 95 → 95. Text without a `%` is treated like
    /// the number it spells, so "0.9" → 90. This differs both from reading
    /// such text as 0, which would skip the annual output formula, and from
    /// using it unscaled as 0.9.
    pub fn as_percentage(&self) -> Option<f64> {
        match self {
            Self::Text(s) if s.contains('%') => parse_leading_float(&s.replace('%', "")),
            _ => self.as_f64().map(|v| if v < 1.0 { v * 100.0 } else { v }),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // 7220.0 prints as "7220", 8.25 as "8.25"
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// The fields of a [`SolarRecord`], named as edit requests name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Panels,
    ConfidenceLevel,
    AnnualOutput,
    Kwp,
    KwhPerKwpPerYear,
    AvailabilityFactor,
    AvgSolarPanelOutput,
    Capacity,
    InstallationDate,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Panels,
        Field::ConfidenceLevel,
        Field::AnnualOutput,
        Field::Kwp,
        Field::KwhPerKwpPerYear,
        Field::AvailabilityFactor,
        Field::AvgSolarPanelOutput,
        Field::Capacity,
        Field::InstallationDate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Panels => "panels",
            Self::ConfidenceLevel => "confidenceLevel",
            Self::AnnualOutput => "annualOutput",
            Self::Kwp => "kwp",
            Self::KwhPerKwpPerYear => "kwhPerKwpPerYear",
            Self::AvailabilityFactor => "availabilityFactor",
            Self::AvgSolarPanelOutput => "avgSolarPanelOutput",
            Self::Capacity => "capacity",
            Self::InstallationDate => "installationDate",
        }
    }
}

impl FromStr for Field {
    type Err = CoreError;

    /// Accepts camelCase and snake_case, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('_', "").to_ascii_lowercase();
        Field::ALL
            .into_iter()
            .find(|f| f.as_str().to_ascii_lowercase() == wanted)
            .ok_or_else(|| CoreError::UnknownField(s.to_string()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Solar panel estimate for one address. Immutable once loaded; edits go
/// into an [`Overlay`](crate::Overlay).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panels: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_output: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kwp: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kwh_per_kwp_per_year: Option<FieldValue>,
    /// Percentage; stored as "95%", 0.95 or 95 depending on the sheet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_factor: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_solar_panel_output: Option<FieldValue>,
    /// Legacy total capacity in kW, superseded by `kwp`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_date: Option<FieldValue>,
}

impl SolarRecord {
    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        match field {
            Field::Panels => self.panels.as_ref(),
            Field::ConfidenceLevel => self.confidence_level.as_ref(),
            Field::AnnualOutput => self.annual_output.as_ref(),
            Field::Kwp => self.kwp.as_ref(),
            Field::KwhPerKwpPerYear => self.kwh_per_kwp_per_year.as_ref(),
            Field::AvailabilityFactor => self.availability_factor.as_ref(),
            Field::AvgSolarPanelOutput => self.avg_solar_panel_output.as_ref(),
            Field::Capacity => self.capacity.as_ref(),
            Field::InstallationDate => self.installation_date.as_ref(),
        }
    }

    /// Builder-style setter used by loaders and tests.
    pub fn with(mut self, field: Field, value: impl Into<FieldValue>) -> Self {
        let slot = match field {
            Field::Panels => &mut self.panels,
            Field::ConfidenceLevel => &mut self.confidence_level,
            Field::AnnualOutput => &mut self.annual_output,
            Field::Kwp => &mut self.kwp,
            Field::KwhPerKwpPerYear => &mut self.kwh_per_kwp_per_year,
            Field::AvailabilityFactor => &mut self.availability_factor,
            Field::AvgSolarPanelOutput => &mut self.avg_solar_panel_output,
            Field::Capacity => &mut self.capacity,
            Field::InstallationDate => &mut self.installation_date,
        };
        *slot = Some(value.into());
        self
    }
}
