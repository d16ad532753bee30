//! Core library for receipt-to-inventory extraction.
//!
//! This crate provides:
//! - OCR providers: a cloud text-detection client and a deterministic fixture
//! - Multi-strategy receipt line parsing (same-line, table, fixed-pattern)
//! - Keyword product-type classification
//! - Candidate aggregation, deduplication, and purchase-date stamping
//! - The receipt processing orchestrator and its result envelope

pub mod error;
pub mod extract;
pub mod models;
pub mod ocr;

pub use error::{GearlogError, OcrError, Result};
pub use extract::{
    ExtractedDate, LineStrategy, ReceiptProcessor, extract_date, parse_products, product_type,
    strategy_registry,
};
pub use models::config::{ExtractionConfig, GearlogConfig, OcrConfig};
pub use models::product::{
    ExtractedProduct, ProcessingResult, ProductRecord, Provenance, ReceiptText, Strategy,
};
pub use ocr::{FixtureOcr, OcrProvider, VisionOcr};
