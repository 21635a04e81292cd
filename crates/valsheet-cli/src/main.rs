//! Valsheet CLI - financial model extraction tool

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use valsheet::prelude::*;
use valsheet::{
    derive, extract_best, extract_named, rank_sheets, select_sheet, LabelConflict, SheetOutcome,
};

#[derive(Parser)]
#[command(name = "valsheet")]
#[command(
    author,
    version,
    about = "Extract DCF models, IRR and sensitivity tables from spreadsheet exports"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Minimum score a sheet needs to count as a model (default: 4)
    #[arg(long, global = true)]
    min_score: Option<usize>,

    /// Field delimiter for .csv files (default: comma)
    #[arg(short, long, global = true, default_value = ",")]
    delimiter: char,

    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the model and print it
    Extract {
        /// Input files (csv, tsv), one sheet each
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Read this sheet instead of picking the best one
        #[arg(short, long)]
        sheet: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Skip derived metrics
        #[arg(long)]
        raw: bool,
    },

    /// Score every sheet as a model candidate
    Sheets {
        /// Input files (csv, tsv), one sheet each
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Estimate the IRR of buying at the enterprise value
    Irr {
        /// Input files (csv, tsv), one sheet each
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print the WACC x terminal growth sensitivity table
    Sensitivity {
        /// Input files (csv, tsv), one sheet each
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Value cells from the latest free cash flow instead of rescaling EV
        #[arg(long)]
        direct: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Everything `extract --format json` prints
#[derive(Serialize)]
struct ExtractReport<'a> {
    sheet: &'a str,
    score: usize,
    conflicts: &'a [LabelConflict],
    model: &'a ExtractedModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let csv_options = csv_options(cli.delimiter)?;
    let options = ExtractOptions {
        min_score: cli.min_score.unwrap_or(ExtractOptions::default().min_score),
        ..Default::default()
    };

    match cli.command {
        Commands::Extract {
            files,
            sheet,
            format,
            raw,
        } => {
            let workbook = load(&files, &csv_options)?;
            extract(&workbook, sheet.as_deref(), format, raw, &options)
        }
        Commands::Sheets { files } => list_sheets(&load(&files, &csv_options)?, &options),
        Commands::Irr { files } => {
            let model = find_model(&load(&files, &csv_options)?, &options)?;
            show_irr(&model)
        }
        Commands::Sensitivity {
            files,
            direct,
            format,
        } => {
            let model = find_model(&load(&files, &csv_options)?, &options)?;
            show_sensitivity(&model, direct, format)
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the verbosity flag
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn csv_options(delimiter: char) -> Result<CsvReadOptions> {
    if !delimiter.is_ascii() {
        bail!("Delimiter must be a single ASCII character, got '{delimiter}'");
    }
    Ok(CsvReadOptions {
        delimiter: delimiter as u8,
        ..Default::default()
    })
}

fn load(files: &[PathBuf], options: &CsvReadOptions) -> Result<Workbook> {
    tracing::debug!(files = files.len(), delimiter = %(options.delimiter as char), "loading");
    Workbook::open_many(files, options).with_context(|| {
        let names: Vec<String> = files.iter().map(|f| f.display().to_string()).collect();
        format!("Failed to open '{}'", names.join("', '"))
    })
}

/// Best sheet, derived
fn find_model(workbook: &Workbook, options: &ExtractOptions) -> Result<ExtractedModel> {
    let best = extract_best(workbook, options).ok_or(valsheet::Error::NoModelDetected)?;
    Ok(derive(&best.model))
}

fn extract(
    workbook: &Workbook,
    sheet: Option<&str>,
    format: Format,
    raw: bool,
    options: &ExtractOptions,
) -> Result<()> {
    let extraction = match sheet {
        Some(name) => extract_named(workbook, name, options)?
            .ok_or_else(|| anyhow!("Sheet '{name}' has no recognisable rows"))?,
        None => extract_best(workbook, options).ok_or(valsheet::Error::NoModelDetected)?,
    };

    let model = if raw {
        extraction.model.clone()
    } else {
        derive(&extraction.model)
    };
    let summary = (!raw).then(|| Summary::from_model(&model));

    match format {
        Format::Json => {
            let report = ExtractReport {
                sheet: &extraction.sheet,
                score: extraction.score(),
                conflicts: &extraction.conflicts,
                model: &model,
                summary,
            };
            let json = serde_json::to_string_pretty(&report).context("Failed to encode JSON")?;
            println!("{json}");
        }
        Format::Text => {
            println!(
                "Sheet: \"{}\" (score {})",
                extraction.sheet,
                extraction.score()
            );
            for conflict in &extraction.conflicts {
                println!(
                    "  note: {} on row {} replaced by row {}",
                    conflict.key,
                    conflict.first_row + 1,
                    conflict.replaced_by_row + 1
                );
            }
            println!();
            print_model(&model);
            if let Some(summary) = summary {
                println!();
                print_summary(&summary);
            }
        }
    }

    Ok(())
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

fn caption_width() -> usize {
    MetricKey::ALL
        .iter()
        .map(|k| k.caption().len())
        .max()
        .unwrap_or(0)
}

fn print_model(model: &ExtractedModel) {
    let width = caption_width();

    if !model.series.is_empty() {
        let header: String = model.years.iter().map(|y| format!("{y:>12}")).collect();
        println!("{:<width$}{header}", "");

        for (key, values) in &model.series {
            let row: String = values
                .iter()
                .map(|v| format!("{:>12}", format_value(*v)))
                .collect();
            println!("{:<width$}{row}", key.caption());
        }
    }

    if !model.scalars.is_empty() {
        if !model.series.is_empty() {
            println!();
        }
        for (key, value) in &model.scalars {
            println!("{:<width$}{:>12}", key.caption(), format_value(Some(*value)));
        }
    }
}

fn print_summary(summary: &Summary) {
    let years = match (summary.first_year, summary.last_year) {
        (Some(first), Some(last)) => format!("{first}-{last}"),
        _ => "-".to_string(),
    };
    let percent = |v: Option<f64>| match v {
        Some(v) => format!("{v:.1}%"),
        None => "-".to_string(),
    };

    println!("Summary");
    println!("  Years:               {years}");
    println!("  Latest revenue:      {}", format_value(summary.latest_revenue));
    println!("  Revenue CAGR:        {}", percent(summary.revenue_cagr));
    println!("  EBITDA margin:       {}", percent(summary.latest_ebitda_margin));
    println!("  Enterprise value:    {}", format_value(summary.enterprise_value));
    println!("  Equity value:        {}", format_value(summary.equity_value));
    println!("  WACC:                {}", percent(summary.wacc));
    println!("  Terminal growth:     {}", percent(summary.terminal_growth));
    println!("  IRR:                 {}", percent(summary.irr));
    println!("  Terminal value share {}", percent(summary.terminal_share));
}

fn list_sheets(workbook: &Workbook, options: &ExtractOptions) -> Result<()> {
    let preferred = select_sheet(workbook, options);

    for rank in rank_sheets(workbook, options) {
        let marker = if Some(rank.sheet.as_str()) == preferred {
            "*"
        } else {
            " "
        };
        let outcome = match rank.outcome {
            SheetOutcome::Scored(score) if score >= options.min_score => format!("score {score}"),
            SheetOutcome::Scored(score) => format!("score {score} (below minimum)"),
            SheetOutcome::TooFewRows(rows) => format!("skipped, {rows} row(s)"),
            SheetOutcome::Declined => "no model".to_string(),
        };
        println!("{marker} {}\t{outcome}", rank.sheet);
    }

    Ok(())
}

fn show_irr(model: &ExtractedModel) -> Result<()> {
    match model.irr() {
        Some(irr) => println!("IRR: {irr:.2}%"),
        None => {
            let missing = [MetricKey::Fcf, MetricKey::EnterpriseValue]
                .into_iter()
                .filter(|&key| model.series(key).is_none() && model.scalar(key).is_none())
                .map(|key| key.caption())
                .collect::<Vec<_>>();
            if missing.is_empty() {
                println!("IRR: n/a (no solution found)");
            } else {
                println!("IRR: n/a (missing {})", missing.join(", "));
            }
        }
    }
    Ok(())
}

fn show_sensitivity(model: &ExtractedModel, direct: bool, format: Format) -> Result<()> {
    let options = SensitivityOptions {
        direct_fcf: direct,
        ..Default::default()
    };
    let grid = model.sensitivity(&options)?;

    if format == Format::Json {
        let json = serde_json::to_string_pretty(&grid).context("Failed to encode JSON")?;
        println!("{json}");
        return Ok(());
    }

    let header: String = grid
        .growth_values
        .iter()
        .map(|g| format!("{:>12}", format!("g {g:.1}%")))
        .collect();
    println!("{:<12}{header}", "WACC");

    for (row, wacc) in grid.wacc_values.iter().enumerate() {
        let marker = if grid.base.map(|(r, _)| r) == Some(row) {
            "*"
        } else {
            " "
        };
        let cells: String = (0..grid.growth_values.len())
            .map(|column| format!("{:>12}", format_value(grid.get(row, column))))
            .collect();
        println!("{marker}{:<11}{cells}", format!("{wacc:.1}%"));
    }

    Ok(())
}
