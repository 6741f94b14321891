//! dq-agent CLI.
//!
//! One subcommand per way of invoking a run: `check` prints results to the
//! terminal, `report` writes the report files, `daily` resolves the dated
//! drop file the way the nightly job does. Exit status separates "could
//! not run" (failure) from "ran, found issues" (success with findings).

use std::{path::PathBuf, process::ExitCode};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::{
    config::{daily_file_path, CheckConfig},
    dataset::OrderDataset,
    detect::{run_checks, Summary},
    error::{Error, Result},
    report,
};

/// dq-agent - daily quality checks for order-record CSV drops
#[derive(Parser)]
#[command(name = "dq-agent")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the quality checks and print the results
    Check {
        /// Path to the CSV file
        path: PathBuf,
        /// Reference date the rows are checked against (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Column used to group rows for duplicate detection
        #[arg(long, default_value = crate::config::DEFAULT_KEY_COLUMN)]
        key_column: String,
        /// Comma-separated columns to outlier-check
        #[arg(long, value_delimiter = ',', default_value = "quantity,unit_price,amount")]
        numeric_columns: Vec<String>,
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Run the quality checks and write the report files
    Report {
        /// Path to the CSV file
        path: PathBuf,
        /// Reference date the rows are checked against (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Directory the reports are written into
        #[arg(long, default_value = "reports")]
        out_dir: PathBuf,
        /// Append the plain-language narrative section
        #[arg(long)]
        narrative: bool,
    },
    /// Resolve the dated drop file (sales_YYYY_MM_DD.csv) and write reports
    Daily {
        /// Directory holding the daily drop files
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// Date of the drop to check (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Directory the reports are written into
        #[arg(long, default_value = "reports")]
        out_dir: PathBuf,
        /// Append the plain-language narrative section
        #[arg(long)]
        narrative: bool,
    },
}

/// Parses arguments and runs the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            path,
            date,
            key_column,
            numeric_columns,
            format,
        } => cmd_check(&path, date, key_column, numeric_columns, &format),
        Commands::Report {
            path,
            date,
            out_dir,
            narrative,
        } => cmd_report(&path, date, &out_dir, narrative),
        Commands::Daily {
            data_dir,
            date,
            out_dir,
            narrative,
        } => cmd_daily(&data_dir, date, &out_dir, narrative),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_check(
    path: &PathBuf,
    date: NaiveDate,
    key_column: String,
    numeric_columns: Vec<String>,
    format: &str,
) -> Result<()> {
    let dataset = OrderDataset::from_csv(path)?;
    let config = CheckConfig::new(date)
        .key_column(key_column)
        .numeric_columns(numeric_columns);
    let summary = run_checks(&dataset, &config)?;

    if format == "json" {
        println!("{}", report::render_json(&summary)?);
    } else {
        print_text_summary(path, &summary);
    }

    Ok(())
}

fn print_text_summary(path: &PathBuf, summary: &Summary) {
    println!("Data Quality Report");
    println!("===================");
    println!("File: {}", path.display());
    println!("Reference date: {}", summary.reference_date);
    println!("Rows: {}", summary.row_count);
    println!("Columns: {}", summary.column_count);
    println!();

    println!("{:<16} {:<8} {:<8}", "CATEGORY", "COUNT", "RATIO");
    println!("{}", "-".repeat(34));
    for category in &summary.categories {
        println!(
            "{:<16} {:<8} {:<8.2}",
            category.category.label(),
            category.count,
            category.ratio * 100.0
        );
    }
    println!();

    if summary.has_findings() {
        println!("Findings:");
        println!("---------");
        for finding in &summary.findings {
            println!("  - [{}] row {}: {}", finding.category, finding.row, finding.reason);
        }
    } else {
        println!("\u{2713} No quality issues found");
    }
}

fn cmd_report(path: &PathBuf, date: NaiveDate, out_dir: &PathBuf, narrative: bool) -> Result<()> {
    let dataset = OrderDataset::from_csv(path)?;
    let config = CheckConfig::new(date).with_narrative(narrative);
    let summary = run_checks(&dataset, &config)?;

    let (json_path, md_path) = report::save_reports(&summary, out_dir, config.narrative_enabled())?;
    println!("Reports written:");
    println!("  {}", json_path.display());
    println!("  {}", md_path.display());
    println!(
        "{} findings in {} rows",
        summary.total_findings(),
        summary.problem_rows.len()
    );

    Ok(())
}

fn cmd_daily(
    data_dir: &PathBuf,
    date: Option<NaiveDate>,
    out_dir: &PathBuf,
    narrative: bool,
) -> Result<()> {
    let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let path = daily_file_path(data_dir, date);

    if !path.exists() {
        // A missing drop is a "could not run", not a clean run.
        return Err(Error::io(
            std::io::Error::new(std::io::ErrorKind::NotFound, "daily drop file not found"),
            path,
        ));
    }

    println!("Checking {}", path.display());
    cmd_report(&path, date, out_dir, narrative)
}
