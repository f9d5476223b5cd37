use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use caprini_core::reference::{benchmarks, ANSWER_LABELS, OUTCOME_QUESTIONS, OUTCOME_QUESTION_STEM};
use caprini_core::scoring::{parse_numeric, BenchmarkComparison};
use caprini_core::{
    assess, caprini_catalog, compute_bmi, Assessment, AssessmentInput, ExportRecord, SettingsStore,
};
use caprini_sink::{clipboard_text, write_csv, Delivery, RemoteSink, SinkConfig};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_SETTINGS_DB: &str = "caprini-settings.db";

#[derive(Parser)]
#[command(name = "caprini")]
#[command(about = "Caprini VTE risk assessment and export")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Tsv,
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the checklist with the keys accepted in input files
    Catalog,
    /// Print the outcome questionnaire and recovery benchmarks
    Questionnaire,
    /// Compute BMI from height (cm) and weight (kg) as typed on the form
    Bmi {
        height: String,
        weight: String,
    },
    /// Score an assessment input (JSON file)
    Assess {
        input: PathBuf,
    },
    /// Print or write the export record
    Export {
        input: PathBuf,
        #[arg(long, value_enum, default_value = "tsv")]
        format: Format,
        /// Write Caprini_<name>.csv into this directory instead of printing
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Submit the export record to the spreadsheet endpoint
    Send {
        input: PathBuf,
        /// Administrator-provided endpoint; overrides the remembered one
        #[arg(long)]
        endpoint: Option<String>,
        #[arg(long, default_value = DEFAULT_SETTINGS_DB)]
        settings_db: PathBuf,
    },
    /// Remember the spreadsheet endpoint for later sends
    SetEndpoint {
        url: String,
        #[arg(long, default_value = DEFAULT_SETTINGS_DB)]
        settings_db: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Catalog => {
            for group in caprini_catalog().groups() {
                println!("{} ({} pt)", group.title, group.group.points());
                for item in &group.items {
                    println!("  {}_{}  {}", group.group.key(), item.id, item.label);
                }
            }
        }
        Commands::Questionnaire => print_questionnaire(),
        Commands::Bmi { height, weight } => {
            println!("BMI: {:.1}", bmi_from_text(&height, &weight)?);
        }
        Commands::Assess { input } => {
            let (_, assessment) = load_and_assess(&input)?;
            print_assessment(&assessment);
        }
        Commands::Export {
            input,
            format,
            out_dir,
        } => {
            let record = export_record(&input)?;
            match out_dir {
                Some(dir) => {
                    let path = write_csv(&record, &dir)?;
                    println!("Wrote {}", path.display());
                }
                None => match format {
                    Format::Tsv => print!("{}", clipboard_text(&record)),
                    Format::Csv => print!("{}", record.to_csv()),
                    Format::Json => println!("{}", record.to_json()?),
                },
            }
        }
        Commands::Send {
            input,
            endpoint,
            settings_db,
        } => {
            let record = export_record(&input)?;
            let remembered = remembered_endpoint(endpoint.as_deref(), &settings_db)?;
            let config = SinkConfig::from_env().resolve(endpoint.as_deref(), remembered.as_deref());

            match RemoteSink::http(&config).submit(&record, &config)? {
                Delivery::Confirmed { status } => println!("Sent (HTTP {})", status),
            }
        }
        Commands::SetEndpoint { url, settings_db } => {
            let store = SettingsStore::open(&settings_db)
                .with_context(|| format!("opening settings at {}", settings_db.display()))?;
            store.remember_endpoint(&url)?;
            println!("Endpoint saved to {}", settings_db.display());
        }
    }

    Ok(())
}

fn load_and_assess(path: &Path) -> Result<(AssessmentInput, Assessment)> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let input: AssessmentInput =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    let assessment = assess(&input, caprini_catalog())?;
    Ok((input, assessment))
}

fn export_record(path: &Path) -> Result<ExportRecord> {
    let (input, assessment) = load_and_assess(path)?;
    Ok(assessment.export_record(&input, Utc::now())?)
}

fn bmi_from_text(height: &str, weight: &str) -> Result<f64> {
    let height = parse_numeric("height", height)?;
    let weight = parse_numeric("weight", weight)?;
    Ok(compute_bmi(height, weight))
}

/// The settings database is only opened (and so created) when no endpoint
/// was given on the command line.
fn remembered_endpoint(endpoint: Option<&str>, settings_db: &Path) -> Result<Option<String>> {
    if endpoint.is_some_and(|e| !e.trim().is_empty()) {
        return Ok(None);
    }
    let remembered = SettingsStore::open(settings_db)
        .and_then(|store| store.remembered_endpoint())
        .with_context(|| format!("reading settings from {}", settings_db.display()))?;
    Ok(remembered)
}

fn print_questionnaire() {
    println!("{} ...", OUTCOME_QUESTION_STEM);
    for (i, question) in OUTCOME_QUESTIONS.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, question);
    }
    println!();
    let labels: Vec<String> = ANSWER_LABELS
        .iter()
        .enumerate()
        .map(|(value, label)| format!("{} = {}", value, label))
        .collect();
    println!("Answers: {}", labels.join(", "));
    println!();
    for b in benchmarks() {
        println!(
            "  {:<13} {:<9} {:>5.1} ± {:<5.1} {}",
            b.period.key(),
            b.period.label(),
            b.mean,
            b.std_dev,
            b.description
        );
    }
}

fn benchmark_line(cmp: &BenchmarkComparison) -> String {
    format!(
        "  {} benchmark {:.1} ± {:.1}, z = {:.1}",
        cmp.benchmark.period.label(),
        cmp.benchmark.mean,
        cmp.benchmark.std_dev,
        cmp.z_score
    )
}

fn print_assessment(assessment: &Assessment) {
    let b = &assessment.breakdown;
    println!("BMI: {:.1}", assessment.bmi);
    println!(
        "Caprini score: {} (age {}, BMI {}, procedure {}, checklist {})",
        assessment.risk_score, b.age_points, b.obesity_points, b.procedure_points, b.checklist_points
    );
    if !b.unknown_selections.is_empty() {
        let ignored: Vec<String> = b.unknown_selections.iter().map(|s| s.to_string()).collect();
        println!("  ignored: {}", ignored.join(", "));
    }
    println!("Risk group: {}", assessment.risk_group.display());
    println!();
    println!("{}", assessment.protocol.title);
    println!("  {}", assessment.protocol.summary);
    for line in assessment.protocol.guidance {
        println!("  - {}", line);
    }

    if let Some(outcome) = assessment.outcome {
        println!();
        println!("FJS-12: {}", outcome);
        if let Some(cmp) = &assessment.benchmark {
            println!("{}", benchmark_line(cmp));
        }
    }
    if let Some(pain) = &assessment.pain {
        println!();
        println!("Pain {}/10: {}", pain.score, pain.band);
        println!("  {}", pain.guidance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caprini_core::scoring::compare_to_benchmark;
    use caprini_core::{OutcomeScore, RecoveryPeriod};

    #[test]
    fn test_bmi_from_text() {
        assert_eq!(bmi_from_text(" 165 ", "68").unwrap(), 25.0);
        let err = bmi_from_text("165", "sixty-eight").unwrap_err();
        assert!(err.to_string().contains("weight"));
    }

    #[test]
    fn test_given_endpoint_leaves_settings_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("settings.db");

        let remembered = remembered_endpoint(Some("https://admin.example/exec"), &db).unwrap();
        assert_eq!(remembered, None);
        assert!(!db.exists());
    }

    #[test]
    fn test_blank_endpoint_reads_settings() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("settings.db");
        SettingsStore::open(&db)
            .unwrap()
            .remember_endpoint("https://mine.example/exec")
            .unwrap();

        let remembered = remembered_endpoint(Some("  "), &db).unwrap();
        assert_eq!(remembered.as_deref(), Some("https://mine.example/exec"));
    }

    #[test]
    fn test_benchmark_line_one_decimal() {
        let cmp = compare_to_benchmark(OutcomeScore::Complete(75.0), RecoveryPeriod::OneYear).unwrap();
        let line = benchmark_line(&cmp);
        assert!(line.ends_with(&format!("z = {:.1}", cmp.z_score)));
        assert!(line.contains("1 year benchmark 58.0 ± 27.0"));
    }
}
