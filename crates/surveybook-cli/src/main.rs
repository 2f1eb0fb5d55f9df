//! surveybook CLI - survey response store and Excel analysis export
//!
//! Collects attitude & personality survey responses into an append-only log
//! and exports them as a formula-driven analysis workbook.

mod diagnostics;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use surveybook_core::{
    analyze_responses, AgeCategory, Attitude, DemographicsPatch, DiagnosticEmitter, Gender,
    MaritalStatus, Personality, Report, ResponseId, ResponseRecord, SubmittedResponse,
};
use surveybook_report::{ReportConfig, SurveyReport};
use surveybook_store::{read_survey_workbook, ResponseStore};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use diagnostics::{DiagnosticConfig, ExitCode, JsonEmitter, TerminalEmitter};

#[derive(Parser)]
#[command(name = "surveybook")]
#[command(author, version, about = "Survey response store and Excel analysis export", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Response log file
    #[arg(
        long,
        env = "SURVEYBOOK_STORE",
        default_value = "data/responses.jsonl",
        global = true
    )]
    store: PathBuf,

    /// Report settings (TOML)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit one response given as a JSON object
    Submit {
        /// JSON file, or `-` for stdin
        #[arg(value_name = "FILE", default_value = "-")]
        file: PathBuf,
    },

    /// List stored responses in submission order
    List {
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Correct the demographics of one response
    Patch {
        /// Response id
        id: ResponseId,

        #[arg(long)]
        gender: Option<Gender>,

        #[arg(long)]
        marital_status: Option<MaritalStatus>,

        #[arg(long)]
        age_category: Option<AgeCategory>,
    },

    /// Show response totals and per-category counts
    Stats {
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Import responses from the Survey Data sheet of a workbook
    Import {
        /// Workbook path (.xlsx)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Remove every stored response
    Clear {
        /// Required; clearing cannot be undone from the CLI
        #[arg(long)]
        yes: bool,
    },

    /// Export the analysis workbook
    Export {
        /// Output file path
        #[arg(short, long, default_value = "survey_export.xlsx")]
        output: PathBuf,

        /// Extra rows reserved in every formula range
        #[arg(long)]
        padding: Option<u32>,

        /// Innovator score at which a respondent counts as "High"
        #[arg(long)]
        innovator_threshold: Option<u8>,

        /// Significance level for every test conclusion
        #[arg(long)]
        alpha: Option<f64>,
    },

    /// Report category coverage problems in the stored responses
    Check {
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Only print errors
        #[arg(short, long)]
        quiet: bool,
    },
}

fn main() -> process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code.into(),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::Failure.into()
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let store = ResponseStore::open(&cli.store)
        .with_context(|| format!("failed to open response store {}", cli.store.display()))?;
    debug!(store = %store.path().display(), "store opened");

    match cli.command {
        Commands::Submit { file } => cmd_submit(&store, &file),
        Commands::List { format } => cmd_list(&store, format),
        Commands::Patch {
            id,
            gender,
            marital_status,
            age_category,
        } => cmd_patch(
            &store,
            id,
            DemographicsPatch {
                gender,
                marital_status,
                age_category,
            },
        ),
        Commands::Stats { format } => cmd_stats(&store, format),
        Commands::Import { file } => cmd_import(&store, &file),
        Commands::Clear { yes } => cmd_clear(&store, yes),
        Commands::Export {
            output,
            padding,
            innovator_threshold,
            alpha,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(padding) = padding {
                config.padding = padding;
            }
            if let Some(threshold) = innovator_threshold {
                config.innovator_threshold = threshold;
            }
            if let Some(alpha) = alpha {
                config.significance_level = alpha;
            }
            config.validate().context("invalid report settings")?;
            cmd_export(&store, config, &output)
        }
        Commands::Check {
            format,
            strict,
            quiet,
        } => cmd_check(&store, format, DiagnosticConfig { strict, quiet }),
    }
}

fn load_config(path: Option<&Path>) -> Result<ReportConfig> {
    match path {
        Some(path) => ReportConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(ReportConfig::default()),
    }
}

fn cmd_submit(store: &ResponseStore, file: &Path) -> Result<ExitCode> {
    let text = if file == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read response from stdin")?;
        text
    } else {
        fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?
    };

    let submitted: SubmittedResponse =
        serde_json::from_str(&text).context("response is not a valid JSON object")?;
    let record = store.submit(&submitted)?;
    println!("Response {} recorded", record.id());
    Ok(ExitCode::Success)
}

fn cmd_list(store: &ResponseStore, format: OutputFormat) -> Result<ExitCode> {
    let records = store.list()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Text => {
            if records.is_empty() {
                println!("No responses stored");
            }
            for record in &records {
                println!("{}", list_line(record));
            }
        }
    }
    Ok(ExitCode::Success)
}

/// `id  timestamp  gender  marital  age  | Q1..Q6 | P1..P6`
fn list_line(record: &ResponseRecord) -> String {
    let attitudes: Vec<String> = Attitude::ALL
        .iter()
        .map(|&q| record.attitude(q).to_string())
        .collect();
    let personality: Vec<String> = Personality::ALL
        .iter()
        .map(|&p| record.personality(p).to_string())
        .collect();
    let d = record.demographics();
    format!(
        "{:>4}  {}  {:<6}  {:<9}  {:<12}  | {} | {}",
        record.id(),
        record.submitted_at().format("%Y-%m-%d %H:%M:%S"),
        d.gender,
        d.marital_status,
        d.age_category,
        attitudes.join(" "),
        personality.join(" ")
    )
}

fn cmd_patch(store: &ResponseStore, id: ResponseId, patch: DemographicsPatch) -> Result<ExitCode> {
    if patch.is_empty() {
        bail!("nothing to patch: pass --gender, --marital-status or --age-category");
    }
    let record = store.patch_demographics(id, patch)?;
    println!("Response {} updated", record.id());
    println!("{}", list_line(&record));
    Ok(ExitCode::Success)
}

fn cmd_stats(store: &ResponseStore, format: OutputFormat) -> Result<ExitCode> {
    let stats = store.stats()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Text => {
            println!("Total responses: {}", stats.total);
            for (title, counts) in [
                ("Gender", &stats.gender),
                ("Marital status", &stats.marital_status),
                ("Age category", &stats.age_category),
            ] {
                println!("{title}:");
                for c in counts {
                    println!("  {:<14} {}", c.value, c.count);
                }
            }
        }
    }
    Ok(ExitCode::Success)
}

fn cmd_import(store: &ResponseStore, file: &Path) -> Result<ExitCode> {
    let imported = read_survey_workbook(file)
        .with_context(|| format!("failed to import {}", file.display()))?;
    let now = Utc::now();
    let batch = imported
        .answers
        .into_iter()
        .map(|answers| (answers, now))
        .collect();
    let records = store.append_batch(batch)?;

    info!(imported = records.len(), skipped = imported.skipped, "import finished");
    println!(
        "Imported {} responses ({} rows skipped)",
        records.len(),
        imported.skipped
    );
    Ok(ExitCode::Success)
}

fn cmd_clear(store: &ResponseStore, yes: bool) -> Result<ExitCode> {
    if !yes {
        bail!("refusing to clear without --yes");
    }
    let removed = store.clear()?;
    println!("Removed {removed} responses");
    Ok(ExitCode::Success)
}

fn cmd_export(store: &ResponseStore, config: ReportConfig, output: &Path) -> Result<ExitCode> {
    let records = store.list()?;
    let report = SurveyReport::with_config(config);

    let bytes = match report.render(&records) {
        Ok(bytes) => bytes,
        Err(err) if err.is_empty_input() => {
            eprintln!("nothing to export: {err}");
            return Ok(ExitCode::NothingToExport);
        }
        Err(err) => return Err(err).context("failed to generate workbook"),
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output, &bytes).with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "Exported {} responses to {}",
        records.len(),
        output.display()
    );
    Ok(ExitCode::Success)
}

fn cmd_check(
    store: &ResponseStore,
    format: OutputFormat,
    config: DiagnosticConfig,
) -> Result<ExitCode> {
    let records = store.list()?;

    match format {
        OutputFormat::Text => {
            let mut emitter = TerminalEmitter::new(io::stderr(), config);
            analyze(&records, &mut emitter);
            Ok(emitter.exit_code())
        }
        OutputFormat::Json => {
            let mut emitter = JsonEmitter::new(config);
            analyze(&records, &mut emitter);
            let document = serde_json::json!({
                "responses": records.len(),
                "diagnostics": emitter.to_json_value(),
            });
            println!("{}", serde_json::to_string_pretty(&document)?);
            Ok(emitter.exit_code())
        }
    }
}

fn analyze(records: &[ResponseRecord], emitter: &mut dyn DiagnosticEmitter) {
    let warnings = analyze_responses(records, emitter);
    debug!(warnings, "coverage analysis finished");
}
