use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing::{error, info};

use record_harvester::config::JobConfig;
use record_harvester::engine::HtmlEngine;
use record_harvester::logging;
use record_harvester::pipeline::{OutputFormat, Pipeline, RunReport};

#[derive(Parser)]
#[command(name = "harvester")]
#[command(about = "Extract typed records from web pages into CSV or JSON")]
#[command(version = "0.1.0")]
struct Cli {
    /// Directory for the rotating JSON log file
    #[arg(long, default_value = "logs", global = true)]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one extraction job
    Run {
        /// Job description (TOML)
        job: PathBuf,
        /// Use a saved HTML snapshot instead of the job URL
        #[arg(long)]
        html: Option<PathBuf>,
        /// Override the job's output path
        #[arg(long)]
        output: Option<PathBuf>,
        /// Override the output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        /// Also write the run report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Validate a job file and print its schema
    Check {
        job: PathBuf,
    },
}

fn print_summary(report: &RunReport) {
    println!("\n📊 Results for {}:", report.job);
    println!("   Elements found: {}", report.elements);
    println!("   Records extracted: {}", report.extracted);
    println!("   Accepted: {}", report.accepted);
    println!("   Rejected: {}", report.rejected.len());
    println!("   Field failures: {}", report.field_failures.len());
    println!("   Type mismatches: {}", report.validation.mismatches.len());
    if let Some(path) = &report.output_path {
        println!("   Output file: {}", path.display());
    }

    if !report.rejected.is_empty() {
        println!("\n⚠️  Rejected records:");
        for rejection in &report.rejected {
            println!("   - #{}: {}", rejection.index, rejection.reason);
        }
    }
}

fn run(
    job_path: PathBuf,
    html: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
    report_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut job = JobConfig::load(&job_path)
        .with_context(|| format!("loading job {}", job_path.display()))?;
    if let Some(snapshot) = html {
        job.url = Some(snapshot.display().to_string());
    }

    let span = tracing::info_span!("job", name = %job.name);
    let _enter = span.enter();

    let mut pipeline = Pipeline::new(&job)?;
    if output.is_some() || format.is_some() {
        let path = output.unwrap_or_else(|| job.output.path.clone());
        pipeline = pipeline.with_output(path, format.or(job.output.format));
    }

    let mut engine = HtmlEngine::new();
    let report = pipeline.run(&mut engine).context("job failed")?;
    info!("Job finished");
    print_summary(&report);

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(&path, json).with_context(|| format!("writing report {}", path.display()))?;
        println!("   Report: {}", path.display());
    }
    Ok(())
}

fn check(job_path: PathBuf) -> anyhow::Result<()> {
    let job = JobConfig::load(&job_path)?;
    println!("✅ {} is valid", job_path.display());
    println!("   Item selectors: {}", job.item_selectors.join(" | "));
    for field in &job.fields {
        println!(
            "   {:<20} {:<7} via {:<14} [{}]",
            field.name,
            field.field_type,
            field.parser,
            field.selectors.join(" | ")
        );
    }
    println!("   Output: {} ({:?})", job.output.path.display(), job.output.resolved_format());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init_logging(&cli.log_dir);

    let result = match cli.command {
        Commands::Run {
            job,
            html,
            output,
            format,
            report,
        } => run(job, html, output, format, report),
        Commands::Check { job } => check(job),
    };

    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}
