//! Deterministic fixture OCR provider.
//!
//! Stands in for the cloud provider when no credential is configured, and
//! serves as the fallback when the real provider fails. Always returns the
//! same electronics-store sample receipt (three products), so demo runs and
//! tests see stable output.

use std::time::Duration;

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::error::OcrError;
use crate::models::product::ReceiptText;

use super::OcrProvider;

/// OCR confidence reported for the fixture text.
const FIXTURE_CONFIDENCE: f32 = 0.95;

pub struct FixtureOcr {
    receipt_date: NaiveDate,
    delay: Duration,
}

impl FixtureOcr {
    /// Fixture dated today, with the default simulated latency.
    pub fn new() -> Self {
        Self {
            receipt_date: Local::now().date_naive(),
            delay: Duration::from_secs(2),
        }
    }

    /// Override the simulated provider latency. Use `Duration::ZERO` in
    /// tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Pin the date printed on the sample receipt.
    pub fn with_receipt_date(mut self, date: NaiveDate) -> Self {
        self.receipt_date = date;
        self
    }

    fn sample_receipt(&self) -> String {
        format!(
            "Best Buy\n\
             Store #1234 - Electronics Store\n\
             123 Main Street, City, State 12345\n\
             Tel: (555) 123-4567\n\
             \n\
             Receipt #: REC-2024-001234\n\
             Date: {}\n\
             Cashier: John D.\n\
             \n\
             ITEMS PURCHASED:\n\
             Apple MacBook Pro 16-inch M3 Pro     $2,499.99\n\
             - Model: MacBook Pro 16\" M3 Pro\n\
             - SKU: MBP16-M3P-1TB-SG\n\
             - Warranty: 1 Year Limited Warranty\n\
             \n\
             Apple Magic Mouse                      $79.99\n\
             - Model: Magic Mouse (3rd Gen)\n\
             - SKU: MM-3G-WHITE\n\
             \n\
             USB-C Charging Cable                   $29.99\n\
             - Model: USB-C to USB-C Cable 2m\n\
             - Brand: Apple\n\
             \n\
             Subtotal:                           $2,609.97\n\
             Tax (8.5%):                          $221.85\n\
             Total:                              $2,831.82\n\
             \n\
             Payment Method: Credit Card ****1234\n\
             Thank you for shopping with us!\n\
             \n\
             Return Policy: 30 days with receipt\n\
             Warranty Information: Products include manufacturer warranty\n\
             For warranty claims, visit support.apple.com",
            self.receipt_date.format("%m/%d/%Y")
        )
    }
}

impl Default for FixtureOcr {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrProvider for FixtureOcr {
    fn name(&self) -> &'static str {
        "fixture"
    }

    async fn extract_from_bytes(&self, _image: &[u8]) -> Result<ReceiptText, OcrError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        debug!("serving fixture receipt");
        Ok(ReceiptText::new(self.sample_receipt(), FIXTURE_CONFIDENCE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fixture() -> FixtureOcr {
        FixtureOcr::new()
            .with_delay(Duration::ZERO)
            .with_receipt_date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
    }

    #[tokio::test]
    async fn ignores_image_content() {
        let provider = fixture();
        let a = provider.extract_from_bytes(b"anything").await.unwrap();
        let b = provider.extract_from_bytes(b"").await.unwrap();
        assert_eq!(a.raw_text, b.raw_text);
    }

    #[tokio::test]
    async fn fixture_text_is_well_formed() {
        let text = fixture().extract_from_bytes(b"img").await.unwrap();
        assert_eq!(text.confidence, 0.95);
        assert_eq!(text.lines[0], "Best Buy");
        assert!(text.raw_text.contains("Date: 01/15/2024"));
        assert!(text.raw_text.contains("Total:                              $2,831.82"));
        // Blank separator lines are dropped from the line array.
        assert!(text.lines.iter().all(|l| !l.trim().is_empty()));
    }
}
