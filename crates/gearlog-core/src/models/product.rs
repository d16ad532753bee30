//! Product and receipt data models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Text recognized from a receipt image by an OCR provider.
///
/// Produced once per image and never mutated; every parsing strategy reads
/// the same `lines`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptText {
    /// Full recognized text, newline-separated.
    pub raw_text: String,

    /// The OCR engine's own confidence estimate (0.0 - 1.0). Passed through
    /// as-is; the parsing pipeline does not re-validate it.
    pub confidence: f32,

    /// `raw_text` split on newlines with empty/whitespace-only lines removed,
    /// top-to-bottom order preserved.
    pub lines: Vec<String>,
}

impl ReceiptText {
    /// Build from raw OCR output, dropping blank lines.
    pub fn new(raw_text: impl Into<String>, confidence: f32) -> Self {
        let raw_text = raw_text.into();
        let lines = raw_text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.to_string())
            .collect();

        Self {
            raw_text,
            confidence,
            lines,
        }
    }

    /// Empty text, used in failure envelopes.
    pub fn empty() -> Self {
        Self {
            raw_text: String::new(),
            confidence: 0.0,
            lines: Vec::new(),
        }
    }
}

/// Which parsing pass produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Name and price co-located on one line.
    SameLine,

    /// Header-delimited table, columns split on whitespace runs.
    Table,

    /// Table region, product name paired with a price on a following line.
    TableNearby,

    /// Structured 4-line-per-item groups (name, quantity, unit price, total).
    FixedPattern,
}

/// Where a candidate came from. Audit/debugging data only - never consulted
/// by business logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provenance {
    /// The strategy (or sub-pass) that matched.
    pub strategy: Strategy,

    /// Index of the line the product name was read from.
    pub line_index: usize,

    /// The source line as seen by the strategy.
    pub source_line: String,

    /// The currency substring the price was parsed from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_price: Option<String>,

    /// Index of the line the price was read from, when it differs from
    /// `line_index`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_line_index: Option<usize>,
}

/// One extracted product - a strategy candidate, or a final entry after
/// deduplication.
///
/// A candidate is only emitted once both a name and a price were matched,
/// so both fields are required here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedProduct {
    /// Cleaned product name.
    pub name: String,

    /// Price in the receipt's currency. No currency code is tracked.
    pub price: Decimal,

    /// Coarse category from the keyword classifier.
    pub product_type: String,

    /// Warranty hint in months. No detection heuristic exists; this is the
    /// configured default (12 unless overridden).
    pub warranty_months: u32,

    /// Purchase date shared by every product of one receipt, attached during
    /// aggregation. Absent when no date in the receipt parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,

    /// Strategy-assigned structural trust score (0.0 - 1.0). Unrelated to
    /// the OCR engine's confidence.
    pub confidence: f32,

    /// Which strategy matched, and from which lines.
    pub provenance: Provenance,
}

impl ExtractedProduct {
    /// Map to the shape the persistence collaborator stores.
    pub fn to_record(&self) -> ProductRecord {
        ProductRecord {
            name: self.name.clone(),
            purchase_price: self.price,
            warranty_months: self.warranty_months,
            purchase_date: self.purchase_date,
            notes: self.product_type.clone(),
        }
    }
}

/// A product record as handed to the persistence backend - one record per
/// candidate the user accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub purchase_price: Decimal,
    pub warranty_months: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,
    /// Carries the inferred product category.
    pub notes: String,
}

/// The pipeline's public output envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// The OCR text the products were parsed from.
    pub text: ReceiptText,

    /// De-duplicated extracted products. Empty on failure, and also on a
    /// successful run that simply found nothing.
    pub products: Vec<ExtractedProduct>,

    /// Store name - first non-empty line of the receipt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,

    /// Labeled receipt total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,

    /// Raw matched date text, even when it did not parse.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Normalized receipt date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_date: Option<NaiveDate>,

    /// True when the configured provider failed and the fixture provider
    /// supplied `text` instead.
    #[serde(default)]
    pub used_fallback: bool,

    /// False only for unexpected processing errors; "no products found" is
    /// still a success.
    pub success: bool,

    /// Human-readable failure message. Present iff `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessingResult {
    /// Failure envelope: empty text, no products, one message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            text: ReceiptText::empty(),
            products: Vec::new(),
            store: None,
            total: None,
            date: None,
            receipt_date: None,
            used_fallback: false,
            success: false,
            error: Some(message.into()),
        }
    }
}
