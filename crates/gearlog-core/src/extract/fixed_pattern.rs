//! Fixed-pattern strategy: receipts printing each item as a 4-line group
//! (name, quantity, unit price, total), announced by a matching 4-line
//! header.

use tracing::debug;

use crate::models::config::ExtractionConfig;
use crate::models::product::{ExtractedProduct, Provenance, Strategy};

use super::patterns::CURRENCY;
use super::{LineStrategy, parse_amount, product_type};

/// Name-line phrases that signal the end of itemization.
const END_MARKERS: &[&str] = &["discount", "total", "subtotal", "tax", "payment", "thank you"];

/// Structured 4-line-per-item receipts.
pub struct FixedPatternStrategy {
    config: ExtractionConfig,
}

impl FixedPatternStrategy {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Find the first line of item data: four consecutive header lines
    /// matching (description|item), (quantity|qty), (price|unit),
    /// (total|amount), then data starts right after them.
    fn data_start(lines: &[String]) -> Option<usize> {
        for i in 0..lines.len().saturating_sub(3) {
            let l1 = lines[i].to_lowercase();
            let l2 = lines[i + 1].to_lowercase();
            let l3 = lines[i + 2].to_lowercase();
            let l4 = lines[i + 3].to_lowercase();

            if (l1.contains("description") || l1.contains("item"))
                && (l2.contains("quantity") || l2.contains("qty"))
                && (l3.contains("price") || l3.contains("unit"))
                && (l4.contains("total") || l4.contains("amount"))
            {
                debug!(data_start = i + 4, "4-line header detected");
                return Some(i + 4);
            }
        }
        None
    }
}

impl LineStrategy for FixedPatternStrategy {
    fn name(&self) -> &'static str {
        "fixed_pattern"
    }

    fn extract(&self, lines: &[String]) -> Vec<ExtractedProduct> {
        let mut products = Vec::new();

        let Some(start) = Self::data_start(lines) else {
            debug!("no 4-line header detected");
            return products;
        };

        // Groups of 4; a trailing partial group is ignored.
        let mut i = start;
        while i + 3 < lines.len() {
            let name = lines[i].trim();
            let unit_price = lines[i + 2].trim();

            let lower = name.to_lowercase();
            if END_MARKERS.iter().any(|marker| lower.contains(marker)) {
                debug!(line = i, "end-of-itemization marker, stopping");
                break;
            }

            let price_match = CURRENCY.find(unit_price);
            match price_match.and_then(|m| parse_amount(m.as_str())) {
                Some(price) if name.len() > 2 && self.config.price_in_range(price) => {
                    let category = product_type(name);
                    debug!(line = i, name, %price, category, "pattern product");

                    products.push(ExtractedProduct {
                        name: name.to_string(),
                        price,
                        product_type: category.to_string(),
                        warranty_months: self.config.default_warranty_months,
                        purchase_date: None,
                        // Structured data is the most reliable signal.
                        confidence: 0.95,
                        provenance: Provenance {
                            strategy: Strategy::FixedPattern,
                            line_index: i,
                            source_line: name.to_string(),
                            matched_price: price_match.map(|m| m.as_str().to_string()),
                            price_line_index: Some(i + 2),
                        },
                    });
                }
                _ => {
                    debug!(line = i, "skipping group: invalid name or unit price");
                }
            }

            i += 4;
        }

        products
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn run(lines: &[&str]) -> Vec<ExtractedProduct> {
        let strategy = FixedPatternStrategy::new(ExtractionConfig::default());
        strategy.extract(&lines.iter().map(|l| l.to_string()).collect::<Vec<_>>())
    }

    const HEADER: [&str; 4] = ["Description", "Quantity", "Unit Price", "Total Amount"];

    fn with_header<'a>(data: &'a [&'a str]) -> Vec<&'a str> {
        HEADER.iter().chain(data).copied().collect()
    }

    #[test]
    fn parses_a_four_line_group() {
        let products = run(&with_header(&["USB-C Cable", "1", "$29.99", "$29.99"]));
        assert_eq!(products.len(), 1);
        let p = &products[0];
        assert_eq!(p.name, "USB-C Cable");
        assert_eq!(p.price, Decimal::from_str("29.99").unwrap());
        assert_eq!(p.confidence, 0.95);
        assert_eq!(p.provenance.strategy, Strategy::FixedPattern);
        assert_eq!(p.provenance.price_line_index, Some(6));
    }

    #[test]
    fn parses_multiple_groups() {
        let products = run(&with_header(&[
            "Wireless Keyboard", "1", "$89.99", "$89.99",
            "Gaming Mouse", "2", "$45.00", "$90.00",
        ]));
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Wireless Keyboard");
        assert_eq!(products[1].name, "Gaming Mouse");
        assert_eq!(products[1].price, Decimal::from_str("45.00").unwrap());
    }

    #[test]
    fn no_header_yields_nothing() {
        assert!(run(&["USB-C Cable", "1", "$29.99", "$29.99"]).is_empty());
    }

    #[test]
    fn stops_at_end_marker() {
        let products = run(&with_header(&[
            "Wireless Keyboard", "1", "$89.99", "$89.99",
            "Subtotal", "", "$89.99", "$89.99",
            "Gaming Mouse", "2", "$45.00", "$90.00",
        ]));
        // Everything after the marker is unreachable by design.
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Wireless Keyboard");
    }

    #[test]
    fn invalid_group_is_skipped_not_fatal() {
        let products = run(&with_header(&[
            "ab", "1", "$10.00", "$10.00",
            "Webcam", "1", "no price here", "$50.00",
            "Gaming Mouse", "2", "$45.00", "$90.00",
        ]));
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Gaming Mouse");
    }

    #[test]
    fn trailing_partial_group_is_ignored() {
        let products = run(&with_header(&["Wireless Keyboard", "1", "$89.99"]));
        assert!(products.is_empty());
    }

    #[test]
    fn out_of_range_unit_price_is_skipped() {
        let products = run(&with_header(&["Mainframe", "1", "$75,000.00", "$75,000.00"]));
        assert!(products.is_empty());
    }
}
