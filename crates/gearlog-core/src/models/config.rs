//! Configuration structures for the receipt pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::GearlogError;

/// Main configuration for the gearlog pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GearlogConfig {
    /// OCR provider configuration.
    pub ocr: OcrConfig,

    /// Product extraction configuration.
    pub extraction: ExtractionConfig,
}

/// OCR provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// API key for the cloud vision provider. When absent, the fixture
    /// provider is used instead.
    pub api_key: Option<String>,

    /// Text-detection endpoint of the vision service.
    pub endpoint: String,

    /// Request timeout for vision calls, in seconds.
    pub request_timeout_secs: u64,

    /// Simulated latency of the fixture provider, in milliseconds.
    pub fixture_delay_ms: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://vision.googleapis.com/v1/images:annotate".to_string(),
            request_timeout_secs: 30,
            fixture_delay_ms: 2000,
        }
    }
}

impl OcrConfig {
    /// Whether a real vision provider can be constructed.
    pub fn is_vision_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// Product extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Lowest price accepted for a candidate.
    pub min_price: Decimal,

    /// Highest price accepted for a candidate.
    pub max_price: Decimal,

    /// Warranty months assigned to every candidate. There is no warranty
    /// detection heuristic.
    pub default_warranty_months: u32,

    /// Artificial parsing delay, in milliseconds - a stand-in for a real
    /// model-inference call. Zero disables it.
    pub processing_delay_ms: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_price: Decimal::new(1, 2),
            max_price: Decimal::from(50_000),
            default_warranty_months: 12,
            processing_delay_ms: 1500,
        }
    }
}

impl ExtractionConfig {
    /// Inclusive price band check applied by every strategy.
    pub fn price_in_range(&self, price: Decimal) -> bool {
        price >= self.min_price && price <= self.max_price
    }
}

impl GearlogConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, GearlogError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| GearlogError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), GearlogError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| GearlogError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
