//! The receipt processing orchestrator.

use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::GearlogError;
use crate::models::config::GearlogConfig;
use crate::models::product::{ProcessingResult, ReceiptText};
use crate::ocr::{self, FixtureOcr, OcrProvider};

use super::patterns::TOTAL_LABEL;
use super::{dates, parse_amount, parse_products};

/// Sequences OCR, product parsing, and metadata extraction, and wraps the
/// outcome in one result envelope.
///
/// Each invocation is independent: no state is shared between in-flight
/// receipts and a started run is never cancelled. The provider is injected
/// here - the pipeline itself never reads the environment to pick one.
pub struct ReceiptProcessor<P: OcrProvider> {
    provider: P,
    fallback: FixtureOcr,
    config: GearlogConfig,
}

impl<P: OcrProvider> ReceiptProcessor<P> {
    pub fn new(provider: P, config: GearlogConfig) -> Self {
        let fallback =
            FixtureOcr::new().with_delay(Duration::from_millis(config.ocr.fixture_delay_ms));
        Self {
            provider,
            fallback,
            config,
        }
    }

    /// Process an encoded receipt image. Never returns an error or panics:
    /// unexpected failures come back as a `success: false` envelope with a
    /// single human-readable message.
    pub async fn process_bytes(&self, image: &[u8]) -> ProcessingResult {
        match self.run(image).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "receipt processing failed");
                ProcessingResult::failure(e.to_string())
            }
        }
    }

    /// Process a receipt image on disk.
    pub async fn process_file(&self, path: &Path) -> ProcessingResult {
        match tokio::fs::read(path).await {
            Ok(image) => self.process_bytes(&image).await,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read receipt image");
                ProcessingResult::failure(format!("failed to read {}: {e}", path.display()))
            }
        }
    }

    /// Process a receipt image from a remote URL.
    pub async fn process_url(&self, url: &str) -> ProcessingResult {
        match ocr::fetch_image(url).await {
            Ok(image) => self.process_bytes(&image).await,
            Err(e) => {
                warn!(url, error = %e, "could not fetch receipt image");
                ProcessingResult::failure(e.to_string())
            }
        }
    }

    /// Accept either a local file path or an http(s) URL.
    pub async fn process_input(&self, input: &str) -> ProcessingResult {
        if input.starts_with("http://") || input.starts_with("https://") {
            self.process_url(input).await
        } else {
            self.process_file(Path::new(input)).await
        }
    }

    async fn run(&self, image: &[u8]) -> Result<ProcessingResult, GearlogError> {
        let (text, used_fallback) = self.recognize(image).await?;
        info!(
            confidence = text.confidence,
            lines = text.lines.len(),
            "OCR complete"
        );

        // Stand-in for a real model-inference call.
        let delay = Duration::from_millis(self.config.extraction.processing_delay_ms);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let products = parse_products(&text, &self.config.extraction);
        info!(count = products.len(), "product parsing complete");

        let store = text.lines.first().map(|l| l.trim().to_string());
        let total = TOTAL_LABEL
            .captures(&text.raw_text)
            .and_then(|caps| parse_amount(&caps[1]));
        let extracted = dates::extract_date(&text.raw_text);

        Ok(ProcessingResult {
            text,
            products,
            store,
            total,
            date: extracted.raw,
            receipt_date: extracted.date,
            used_fallback,
            success: true,
            error: None,
        })
    }

    /// Run the configured provider; on failure, degrade to the fixture so
    /// parsing always receives well-formed text. The downgrade is reported
    /// through `used_fallback` rather than an error.
    async fn recognize(&self, image: &[u8]) -> Result<(ReceiptText, bool), GearlogError> {
        match self.provider.extract_from_bytes(image).await {
            Ok(text) => Ok((text, false)),
            Err(e) => {
                warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "OCR failed, falling back to fixture"
                );
                let text = self.fallback.extract_from_bytes(image).await?;
                Ok((text, true))
            }
        }
    }
}
