//! Batch processing command for multiple receipt images.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use gearlog_core::ProcessingResult;

use super::process::{OutputFormat, format_records_csv, format_result_text, process_receipt};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Force the fixture OCR provider
    #[arg(long)]
    mock: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    result: Option<ProcessingResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(
                ext.to_lowercase().as_str(),
                "png" | "jpg" | "jpeg" | "webp" | "tiff" | "tif" | "bmp"
            )
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching image files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} receipts to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} receipts")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let outcome = process_receipt(&path.to_string_lossy(), args.mock, &config).await;
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        let file_result = match outcome {
            Ok(result) if result.success => FileResult {
                path: path.clone(),
                result: Some(result),
                error: None,
                processing_time_ms,
            },
            Ok(result) => {
                let message = result
                    .error
                    .clone()
                    .unwrap_or_else(|| "processing failed".to_string());
                if !args.continue_on_error {
                    error!("Failed to process {}: {}", path.display(), message);
                    anyhow::bail!("Processing failed: {}", message);
                }
                warn!("Failed to process {}: {}", path.display(), message);
                FileResult {
                    path: path.clone(),
                    result: None,
                    error: Some(message),
                    processing_time_ms,
                }
            }
            Err(e) => {
                let message = e.to_string();
                if !args.continue_on_error {
                    error!("Failed to process {}: {}", path.display(), message);
                    return Err(e);
                }
                warn!("Failed to process {}: {}", path.display(), message);
                FileResult {
                    path: path.clone(),
                    result: None,
                    error: Some(message),
                    processing_time_ms,
                }
            }
        };

        results.push(file_result);
        progress.inc(1);
    }

    progress.finish_with_message("Complete");

    // Write per-file outputs
    let successful: Vec<_> = results.iter().filter(|r| r.result.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    for file_result in &successful {
        if let (Some(result), Some(output_dir)) = (&file_result.result, &args.output_dir) {
            let output_name = file_result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("receipt");

            let extension = match args.format {
                OutputFormat::Json => "json",
                OutputFormat::Csv => "csv",
                OutputFormat::Text => "txt",
            };

            let output_path = output_dir.join(format!("{}.{}", output_name, extension));

            let content = match args.format {
                OutputFormat::Json => serde_json::to_string(result)?,
                OutputFormat::Csv => format_records_csv(result)?,
                OutputFormat::Text => format_result_text(result, false),
            };

            fs::write(&output_path, content)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    // Generate summary if requested
    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    // Print summary
    println!();
    println!(
        "{} Processed {} receipts in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for file_result in &failed {
            println!(
                "  - {}: {}",
                file_result.path.display(),
                file_result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn write_summary(path: &PathBuf, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "store",
        "products",
        "total",
        "receipt_date",
        "used_fallback",
        "processing_time_ms",
        "error",
    ])?;

    for file_result in results {
        let filename = file_result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(result) = &file_result.result {
            wtr.write_record([
                filename,
                "success",
                result.store.as_deref().unwrap_or(""),
                &result.products.len().to_string(),
                &result.total.map(|t| t.to_string()).unwrap_or_default(),
                &result
                    .receipt_date
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                &result.used_fallback.to_string(),
                &file_result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                &file_result.processing_time_ms.to_string(),
                file_result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
