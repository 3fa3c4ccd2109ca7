mod display;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use panelfinder_core::{CoreError, Dataset, Field, MatchConfig, Session};
use tracing_subscriber::EnvFilter;

const NO_MATCH: &str = "No solar panel data found for this address";

#[derive(Parser)]
#[command(name = "panelfinder", version, about = "Look up solar panel estimates by address")]
struct Cli {
    /// Spreadsheet (.csv, .xlsx, .ods), or a directory holding
    /// solar_panels.csv or solar_panels.xlsx
    #[arg(long, global = true, env = "PANELFINDER_DATA", default_value = ".")]
    data: PathBuf,

    /// Minimum score (0-1) a best candidate needs to count as a match
    #[arg(long, global = true, env = "PANELFINDER_THRESHOLD", value_parser = parse_threshold)]
    threshold: Option<f64>,

    /// Log matching decisions (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the record best matching an address
    Lookup {
        query: String,

        /// Print JSON instead of a card
        #[arg(long)]
        json: bool,
    },

    /// Select an address, apply edits in order and show the recalculated record
    #[command(after_help = "\
Examples:
  panelfinder edit 'Hoofdstraat 12' --set availabilityFactor=95
  panelfinder edit 'Kerkweg 6' --set avgSolarPanelOutput=430 --set kwhPerKwpPerYear=900")]
    Edit {
        query: String,

        /// Field edit, repeatable
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_edit, required = true)]
        edits: Vec<(Field, String)>,

        /// Print JSON instead of a card
        #[arg(long)]
        json: bool,
    },

    /// List dataset addresses in sheet order
    Keys {
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("panelfinder v{}", env!("CARGO_PKG_VERSION"));

    let dataset = load(&cli.data)?;
    let config = match cli.threshold {
        Some(t) => MatchConfig::default().with_acceptance_threshold(t),
        None => MatchConfig::default(),
    };

    match cli.command {
        Command::Lookup { query, json } => show(&dataset, config, &query, &[], json),
        Command::Edit { query, edits, json } => show(&dataset, config, &query, &edits, json),
        Command::Keys { limit } => {
            for key in dataset.keys().take(limit.unwrap_or(usize::MAX)) {
                println!("{key}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load(path: &Path) -> Result<Dataset> {
    if path.is_dir() {
        let (file, dataset) = panelfinder_store::load_default(path)
            .with_context(|| format!("loading solar panel data from {}", path.display()))?;
        tracing::debug!(file = %file.display(), "using default spreadsheet");
        Ok(dataset)
    } else {
        panelfinder_store::load_dataset(path)
            .with_context(|| format!("loading solar panel data from {}", path.display()))
    }
}

fn show(
    dataset: &Dataset,
    config: MatchConfig,
    query: &str,
    edits: &[(Field, String)],
    json: bool,
) -> Result<ExitCode> {
    let mut session = Session::new(dataset, config);
    if session.search(query)?.is_none() {
        eprintln!("{NO_MATCH}");
        return Ok(ExitCode::FAILURE);
    }

    for (field, value) in edits {
        session
            .edit(*field, value)
            .with_context(|| format!("applying {field}={value}"))?;
    }

    let selection = session.selection().ok_or(CoreError::NoActiveRecord)?;
    if json {
        let out = serde_json::to_string_pretty(&display::LookupOutput::new(selection))?;
        println!("{out}");
    } else {
        display::print_card(selection);
    }
    Ok(ExitCode::SUCCESS)
}

fn parse_edit(raw: &str) -> Result<(Field, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got {raw:?}"))?;
    let field = field.parse::<Field>().map_err(|e| e.to_string())?;
    Ok((field, value.trim().to_string()))
}

fn parse_threshold(raw: &str) -> Result<f64, String> {
    let t: f64 = raw.trim().parse().map_err(|_| format!("not a number: {raw:?}"))?;
    if (0.0..=1.0).contains(&t) {
        Ok(t)
    } else {
        Err(format!("threshold must be between 0 and 1, got {t}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn edit_arguments() {
        assert_eq!(
            parse_edit("availabilityFactor= 95").unwrap(),
            (Field::AvailabilityFactor, "95".to_string())
        );
        assert_eq!(
            parse_edit("kwh_per_kwp_per_year=1000").unwrap(),
            (Field::KwhPerKwpPerYear, "1000".to_string())
        );
        assert!(parse_edit("kwp").is_err());
        assert!(parse_edit("wattage=3").unwrap_err().contains("unknown field"));
    }

    #[test]
    fn threshold_range() {
        assert_eq!(parse_threshold("0.75"), Ok(0.75));
        assert!(parse_threshold("1.5").is_err());
        assert!(parse_threshold("high").is_err());
    }

    #[test]
    fn edit_requires_a_set() {
        assert!(Cli::try_parse_from(["panelfinder", "edit", "kerkweg 6"]).is_err());
        let cli = Cli::try_parse_from([
            "panelfinder",
            "edit",
            "kerkweg 6",
            "--set",
            "kwp=4",
            "--data",
            "sheet.csv",
        ])
        .unwrap();
        assert_eq!(cli.data, PathBuf::from("sheet.csv"));
        assert!(matches!(cli.command, Command::Edit { ref edits, .. } if edits.len() == 1));
    }

    #[test]
    fn loads_a_directory_and_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("solar_panels.csv");
        std::fs::write(&file, "Address,Panels\nKerkweg 6b,10\n").unwrap();

        assert_eq!(load(dir.path()).unwrap().len(), 1);
        assert_eq!(load(&file).unwrap().len(), 1);
        assert!(load(&dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn show_reports_no_match() {
        let dataset: Dataset = [("kerkweg 6b".into(), Default::default())].into_iter().collect();
        let code = show(&dataset, MatchConfig::default(), "molenlaan 3", &[], false).unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }
}
