//! Process command - extract products from a single receipt image.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use gearlog_core::{FixtureOcr, GearlogConfig, ProcessingResult, ReceiptProcessor, VisionOcr};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Receipt image file or http(s) URL
    #[arg(required = true)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Force the fixture OCR provider even when an API key is configured
    #[arg(long)]
    mock: bool,

    /// Show per-product confidence scores and provenance
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Full result envelope as JSON
    Json,
    /// Product records as CSV rows
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message("Processing receipt...");

    let result = process_receipt(&args.input, args.mock, &config).await?;
    spinner.finish_and_clear();

    if !result.success {
        anyhow::bail!(
            "processing failed: {}",
            result.error.as_deref().unwrap_or("unknown error")
        );
    }

    if result.used_fallback {
        eprintln!(
            "{} OCR provider failed - result comes from the fixture provider",
            style("!").yellow()
        );
    }

    let content = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
        OutputFormat::Csv => format_records_csv(&result)?,
        OutputFormat::Text => format_result_text(&result, args.show_confidence),
    };

    match &args.output {
        Some(path) => {
            fs::write(path, content)?;
            println!("{} Wrote {}", style("✓").green(), path.display());
        }
        None => println!("{content}"),
    }

    debug!(elapsed_ms = start.elapsed().as_millis() as u64, "process command complete");
    Ok(())
}

/// Select a provider and run one receipt through the pipeline. The vision
/// provider is used only when a key is configured and the fixture was not
/// forced.
pub(crate) async fn process_receipt(
    input: &str,
    force_mock: bool,
    config: &GearlogConfig,
) -> anyhow::Result<ProcessingResult> {
    if !force_mock && config.ocr.is_vision_configured() {
        let provider = VisionOcr::from_config(&config.ocr)?;
        Ok(ReceiptProcessor::new(provider, config.clone())
            .process_input(input)
            .await)
    } else {
        let provider =
            FixtureOcr::new().with_delay(Duration::from_millis(config.ocr.fixture_delay_ms));
        Ok(ReceiptProcessor::new(provider, config.clone())
            .process_input(input)
            .await)
    }
}

pub(crate) fn format_records_csv(result: &ProcessingResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "name",
        "purchase_price",
        "warranty_months",
        "purchase_date",
        "notes",
    ])?;

    for product in &result.products {
        let record = product.to_record();
        wtr.write_record([
            record.name.as_str(),
            &record.purchase_price.to_string(),
            &record.warranty_months.to_string(),
            &record
                .purchase_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            &record.notes,
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

pub(crate) fn format_result_text(result: &ProcessingResult, show_confidence: bool) -> String {
    let mut output = String::new();

    if let Some(store) = &result.store {
        output.push_str(&format!("Store: {store}\n"));
    }
    match (&result.date, result.receipt_date) {
        (Some(raw), Some(date)) => output.push_str(&format!("Date:  {raw} ({date})\n")),
        (Some(raw), None) => output.push_str(&format!("Date:  {raw} (unparsed)\n")),
        _ => {}
    }
    if let Some(total) = result.total {
        output.push_str(&format!("Total: ${total}\n"));
    }
    output.push('\n');

    if result.products.is_empty() {
        output.push_str("No products found - add items manually.\n");
        return output;
    }

    output.push_str(&format!("Products ({}):\n", result.products.len()));
    for (i, product) in result.products.iter().enumerate() {
        output.push_str(&format!(
            "  {}. {} - ${} [{}]",
            i + 1,
            product.name,
            product.price,
            product.product_type
        ));
        if show_confidence {
            output.push_str(&format!(
                " (confidence {:.2}, {:?}, line {})",
                product.confidence, product.provenance.strategy, product.provenance.line_index
            ));
        }
        output.push('\n');
    }

    output
}
