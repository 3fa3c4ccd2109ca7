//! Card and JSON rendering of a selected address.
//!
//! A line is shown only when the loaded record has that field; its value is
//! the edited one when an edit exists.

use panelfinder_core::{Field, FieldValue, Match, Overlay, Selection, SolarRecord};
use serde::Serialize;

const LABEL_WIDTH: usize = 32;

/// JSON shape of `lookup --json` and `edit --json`.
#[derive(Serialize)]
pub struct LookupOutput<'a> {
    pub query: &'a str,
    #[serde(rename = "match")]
    pub matched: &'a Match,
    pub record: &'a SolarRecord,
    #[serde(skip_serializing_if = "no_edits")]
    pub edits: &'a Overlay,
}

fn no_edits(overlay: &&Overlay) -> bool {
    overlay.is_empty()
}

impl<'a> LookupOutput<'a> {
    pub fn new(selection: &'a Selection<'_>) -> Self {
        Self {
            query: &selection.query,
            matched: &selection.matched,
            record: selection.record,
            edits: &selection.overlay,
        }
    }
}

pub fn print_card(selection: &Selection<'_>) {
    println!("=== {} ===", selection.matched.key);
    println!(
        "matched {:?} ({}, score {:.2})",
        selection.query, selection.matched.rule, selection.matched.score
    );
    println!();
    println!("Solar Panel Information");
    for (label, value) in card_lines(selection) {
        println!("  {label:<LABEL_WIDTH$} {value}");
    }
}

/// Label/value pairs in display order.
pub fn card_lines(selection: &Selection<'_>) -> Vec<(&'static str, String)> {
    let record = selection.record;
    let value = |field: Field| {
        selection
            .effective(field)
            .map(|v| v.into_owned())
            .unwrap_or_default()
    };

    // as typed; the matched key heads the card
    let mut lines = vec![("Address", selection.query.clone())];

    let panels = record
        .panels
        .as_ref()
        .filter(|v| !matches!(v, FieldValue::Text(s) if s.is_empty()))
        .map_or_else(|| "N/A".to_string(), |_| value(Field::Panels));
    lines.push(("Approx. number of solar panels", panels));

    if record.confidence_level.is_some() {
        lines.push(("Confidence Level (1-10)", value(Field::ConfidenceLevel)));
    }
    if record.annual_output.is_some() {
        lines.push(("Approx. annual output", format!("{} kWh", value(Field::AnnualOutput))));
    }
    if record.kwp.as_ref().is_some_and(|v| !is_zero(v)) {
        lines.push(("kWp", value(Field::Kwp)));
    }
    if record.kwh_per_kwp_per_year.is_some() {
        lines.push(("kWh/kWp/year_NL", value(Field::KwhPerKwpPerYear)));
    }
    if let Some(stored) = &record.availability_factor {
        let shown = match selection.overlay.get(Field::AvailabilityFactor) {
            Some(edited) => edited.to_string(),
            None => percentage_text(stored),
        };
        lines.push(("Availability Factor", format!("{shown}%")));
    }
    if record.avg_solar_panel_output.is_some() {
        lines.push((
            "Avg Solar Panel Output",
            format!("{} Wp", value(Field::AvgSolarPanelOutput)),
        ));
    }
    // legacy column, superseded by a non-zero kWp
    if record.kwp.as_ref().is_none_or(is_zero) && record.capacity.as_ref().is_some_and(|v| !is_zero(v)) {
        lines.push(("Total Capacity", format!("{} kW", value(Field::Capacity))));
    }

    lines
}

fn is_zero(value: &FieldValue) -> bool {
    matches!(value, FieldValue::Number(n) if *n == 0.0)
}

/// Stored availability without its `%`; fractions are shown as percentages.
fn percentage_text(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(s) if s.contains('%') => s.replace('%', "").trim().to_string(),
        FieldValue::Number(n) if *n < 1.0 => {
            let pct = (n * 100.0 * 100.0).round() / 100.0;
            FieldValue::Number(pct).to_string()
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelfinder_core::{Dataset, MatchConfig, Session};

    fn dataset(record: SolarRecord) -> Dataset {
        [("Hoofdstraat 12".into(), record)].into_iter().collect()
    }

    fn lines_for(record: SolarRecord, edits: &[(Field, &str)]) -> Vec<(&'static str, String)> {
        let data = dataset(record);
        let mut session = Session::new(&data, MatchConfig::default());
        session.search("hoofdstraat 12").unwrap().unwrap();
        for (field, value) in edits {
            session.edit(*field, value).unwrap();
        }
        card_lines(session.selection().unwrap())
    }

    fn line<'a>(lines: &'a [(&'static str, String)], label: &str) -> Option<&'a str> {
        lines.iter().find(|(l, _)| *l == label).map(|(_, v)| v.as_str())
    }

    #[test]
    fn panels_default_to_na() {
        let lines = lines_for(SolarRecord::default(), &[]);
        assert_eq!(line(&lines, "Address"), Some("hoofdstraat 12"));
        assert_eq!(line(&lines, "Approx. number of solar panels"), Some("N/A"));
        assert_eq!(lines.len(), 2);

        let lines = lines_for(SolarRecord::default().with(Field::Panels, 0.0), &[]);
        assert_eq!(line(&lines, "Approx. number of solar panels"), Some("0"));
    }

    #[test]
    fn address_line_shows_the_typed_query() {
        let data = dataset(SolarRecord::default());
        let mut session = Session::new(&data, MatchConfig::default());
        let selection = session.search("Hoofdstraat, 12").unwrap().unwrap();
        let lines = card_lines(selection);
        assert_eq!(line(&lines, "Address"), Some("Hoofdstraat, 12"));
    }

    #[test]
    fn units_and_percentages() {
        let record = SolarRecord::default()
            .with(Field::AnnualOutput, 6840.0)
            .with(Field::AvailabilityFactor, 0.9)
            .with(Field::AvgSolarPanelOutput, 400.0);
        let lines = lines_for(record, &[]);
        assert_eq!(line(&lines, "Approx. annual output"), Some("6840 kWh"));
        assert_eq!(line(&lines, "Availability Factor"), Some("90%"));
        assert_eq!(line(&lines, "Avg Solar Panel Output"), Some("400 Wp"));
    }

    #[test]
    fn zero_kwp_is_hidden_and_capacity_shown_in_its_place() {
        let lines = lines_for(
            SolarRecord::default()
                .with(Field::Kwp, 0.0)
                .with(Field::Capacity, 5.0),
            &[],
        );
        assert_eq!(line(&lines, "kWp"), None);
        assert_eq!(line(&lines, "Total Capacity"), Some("5 kW"));

        let lines = lines_for(
            SolarRecord::default()
                .with(Field::Kwp, 4.0)
                .with(Field::Capacity, 5.0),
            &[],
        );
        assert_eq!(line(&lines, "kWp"), Some("4"));
        assert_eq!(line(&lines, "Total Capacity"), None);
    }

    #[test]
    fn edits_replace_stored_values() {
        let record = SolarRecord::default()
            .with(Field::Panels, 20.0)
            .with(Field::Kwp, 8.0)
            .with(Field::KwhPerKwpPerYear, 950.0)
            .with(Field::AvailabilityFactor, "90%")
            .with(Field::AnnualOutput, 6840.0);
        let lines = lines_for(record, &[(Field::AvailabilityFactor, "95")]);
        assert_eq!(line(&lines, "Availability Factor"), Some("95%"));
        assert_eq!(line(&lines, "Approx. annual output"), Some("7220 kWh"));
        assert_eq!(line(&lines, "kWp"), Some("8"));
    }

    #[test]
    fn json_output_omits_empty_edits() {
        let data = dataset(SolarRecord::default().with(Field::Panels, 20.0));
        let mut session = Session::new(&data, MatchConfig::default());
        let selection = session.search("Hoofdstraat, 12").unwrap().unwrap();

        let json = serde_json::to_value(LookupOutput::new(selection)).unwrap();
        assert_eq!(json["match"]["key"], "hoofdstraat 12");
        assert_eq!(json["match"]["rule"], "exact");
        assert_eq!(json["record"]["panels"], 20.0);
        assert!(json.get("edits").is_none());
    }
}
