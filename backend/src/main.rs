//! Paygap CLI - Validate compensation CSV files and report gender pay gaps
//!
//! # Commands
//!
//! ```bash
//! paygap parse staff.csv            # Validated records + row errors as JSON
//! paygap analyze staff.csv          # Full analytics report as JSON
//! paygap export staff.csv -o a.csv  # Analytics CSV (compliance, role, department)
//! paygap serve                      # Start HTTP server (port 3000)
//! ```

use clap::{Args, Parser, Subcommand};
use paygap::{
    analyze_file, parse_file_auto, AnalysisOptions, AnalyticsReport, PipelineResult, ServerResult,
    EXPORT_FILE_NAME,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "paygap")]
#[command(about = "Validate compensation CSV files and report gender pay gaps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate a CSV file, output records and errors as JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        thresholds: Thresholds,
    },

    /// Compute pay gaps, compliance score and risk areas as JSON
    Analyze {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        thresholds: Thresholds,
    },

    /// Write the analytics CSV (compliance, by role, by department)
    Export {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: pay-gap-analytics.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        thresholds: Thresholds,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        #[command(flatten)]
        thresholds: Thresholds,
    },
}

/// Overrides for the default analysis limits
#[derive(Args, Clone)]
struct Thresholds {
    /// Absolute gap percent at which a role becomes a risk
    #[arg(long, default_value = "5.0")]
    gap_threshold: f64,

    /// Maximum number of risk areas reported
    #[arg(long, default_value = "5")]
    max_risk_areas: usize,

    /// Minimum male + female headcount per group
    #[arg(long, default_value = "2")]
    min_group_size: usize,

    /// Field errors kept per row
    #[arg(long, default_value = "3")]
    max_errors_per_row: usize,
}

impl From<Thresholds> for AnalysisOptions {
    fn from(t: Thresholds) -> Self {
        AnalysisOptions {
            gap_threshold: t.gap_threshold,
            max_risk_areas: t.max_risk_areas,
            min_group_size: t.min_group_size,
            max_errors_per_row: t.max_errors_per_row,
            ..AnalysisOptions::default()
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = match cli.command {
        Commands::Parse {
            input,
            output,
            thresholds,
        } => cmd_parse(&input, output.as_deref(), thresholds.into()).map_err(Into::into),

        Commands::Analyze {
            input,
            output,
            thresholds,
        } => cmd_analyze(&input, output.as_deref(), thresholds.into()).map_err(Into::into),

        Commands::Export {
            input,
            output,
            thresholds,
        } => cmd_export(&input, output.as_deref(), thresholds.into()).map_err(Into::into),

        Commands::Serve { port, thresholds } => cmd_serve(port, thresholds.into()).await.map_err(Into::into),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_parse(
    input: &Path,
    output: Option<&Path>,
    options: AnalysisOptions,
) -> PipelineResult<()> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let result = parse_file_auto(input, &options.parse_options())?;
    eprintln!("   Encoding: {}", result.encoding);
    eprintln!("   Columns: {}", result.headers.join(", "));
    eprintln!("✅ {} valid records", result.outcome.records.len());
    print_errors(&result.outcome.errors);

    let json = serde_json::to_string_pretty(&result.outcome)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_analyze(
    input: &Path,
    output: Option<&Path>,
    options: AnalysisOptions,
) -> PipelineResult<()> {
    let report = analyze_file(input, &options)?;
    print_summary(&report);

    let json = serde_json::to_string_pretty(&report)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_export(
    input: &Path,
    output: Option<&Path>,
    options: AnalysisOptions,
) -> PipelineResult<()> {
    let report = analyze_file(input, &options)?;
    print_summary(&report);

    let csv = report.to_csv()?;
    let path = output.unwrap_or_else(|| Path::new(EXPORT_FILE_NAME));
    fs::write(path, csv)?;
    eprintln!("💾 Analytics written to: {}", path.display());

    Ok(())
}

async fn cmd_serve(port: u16, options: AnalysisOptions) -> ServerResult<()> {
    paygap::server::start_server(port, options).await
}

fn print_errors(errors: &[paygap::ParseError]) {
    if errors.is_empty() {
        return;
    }
    eprintln!("⚠️  {} errors:", errors.len());
    for err in errors.iter().take(10) {
        eprintln!("   - {}", err);
    }
    if errors.len() > 10 {
        eprintln!("   ... +{}", errors.len() - 10);
    }
}

fn print_summary(report: &AnalyticsReport) {
    print_errors(&report.errors);
    eprintln!("\n📊 Compliance score: {:.2}%", report.compliance.score);
    for risk in &report.risk_areas {
        eprintln!("   ❌ {}: {:.2}% gap", risk.group, risk.gap_percent);
    }
}

fn write_output(content: &str, path: Option<&Path>) -> PipelineResult<()> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
