//! Same-line strategy: product name and price co-located on one line.

use tracing::debug;

use crate::models::config::ExtractionConfig;
use crate::models::product::{ExtractedProduct, Provenance, Strategy};

use super::patterns::{CURRENCY, METADATA_LABEL, PURE_NUMBER, QUANTITY_PREFIX};
use super::{LineStrategy, parse_amount, product_type};

/// Phrases that mark a line as something other than an itemized product.
/// Case-insensitive substring match.
const DENYLIST: &[&str] = &[
    "subtotal",
    "total",
    "tax",
    "discount",
    "change",
    "payment",
    "cash",
    "card",
    "receipt",
    "store",
    "cashier",
    "thank you",
    "return policy",
    "warranty info",
    "date:",
    "time:",
    "address",
    "phone",
    "email",
    "website",
    "description",
    "quantity",
    "unit price",
    "total amount",
];

fn is_denied(line: &str) -> bool {
    let lower = line.to_lowercase();
    DENYLIST.iter().any(|phrase| lower.contains(phrase))
}

/// Traditional itemized receipts: "Apple Magic Mouse    $79.99".
pub struct SameLineStrategy {
    config: ExtractionConfig,
}

impl SameLineStrategy {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }
}

impl LineStrategy for SameLineStrategy {
    fn name(&self) -> &'static str {
        "same_line"
    }

    fn extract(&self, lines: &[String]) -> Vec<ExtractedProduct> {
        let mut products = Vec::new();

        for (i, raw_line) in lines.iter().enumerate() {
            let line = raw_line.trim();
            if line.len() < 3 || is_denied(line) {
                continue;
            }

            // Itemized lines place the price last, so the rightmost currency
            // match is the product price.
            let Some(price_match) = CURRENCY.find_iter(line).last() else {
                continue;
            };
            let Some(price) = parse_amount(price_match.as_str()) else {
                continue;
            };

            let name = line[..price_match.start()].trim();
            let name = QUANTITY_PREFIX.replace(name, "");
            let name = name.split_whitespace().collect::<Vec<_>>().join(" ");

            if name.len() < 3 || PURE_NUMBER.is_match(&name) || METADATA_LABEL.is_match(&name) {
                debug!(line = i, name = %name, "rejected: invalid product name");
                continue;
            }

            if !self.config.price_in_range(price) {
                debug!(line = i, %price, "rejected: price out of range");
                continue;
            }

            let category = product_type(&name);
            debug!(line = i, name = %name, %price, category, "same-line product");

            products.push(ExtractedProduct {
                product_type: category.to_string(),
                name,
                price,
                warranty_months: self.config.default_warranty_months,
                purchase_date: None,
                confidence: 0.9,
                provenance: Provenance {
                    strategy: Strategy::SameLine,
                    line_index: i,
                    source_line: line.to_string(),
                    matched_price: Some(price_match.as_str().to_string()),
                    price_line_index: None,
                },
            });
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
        let strategy = SameLineStrategy::new(ExtractionConfig::default());
        strategy.extract(&lines.iter().map(|l| l.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn extracts_name_and_price_from_one_line() {
        let products = run(&["Apple Magic Mouse    $79.99"]);
        assert_eq!(products.len(), 1);
        let p = &products[0];
        assert_eq!(p.name, "Apple Magic Mouse");
        assert_eq!(p.price, Decimal::from_str("79.99").unwrap());
        assert_eq!(p.product_type, "Computer Mouse");
        assert_eq!(p.confidence, 0.9);
        assert_eq!(p.warranty_months, 12);
        assert_eq!(p.provenance.strategy, Strategy::SameLine);
        assert_eq!(p.provenance.matched_price.as_deref(), Some("$79.99"));
    }

    #[test]
    fn denylisted_lines_yield_nothing() {
        assert!(run(&["Subtotal:    $2,609.97"]).is_empty());
        assert!(run(&["Tax (8.5%):   $221.85"]).is_empty());
        assert!(run(&["Payment Method: Credit Card ****1234"]).is_empty());
        assert!(run(&["Date: 01/15/2024"]).is_empty());
    }

    #[test]
    fn rightmost_price_wins() {
        let products = run(&["Bundle was $99.99 now $79.99"]);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].price, Decimal::from_str("79.99").unwrap());
        assert_eq!(products[0].name, "Bundle was $99.99 now");
    }

    #[test]
    fn quantity_prefix_is_stripped() {
        let products = run(&["2x USB-C Dongle   $19.99"]);
        assert_eq!(products[0].name, "USB-C Dongle");

        let products = run(&["1 * HDMI Adapter   $9.99"]);
        assert_eq!(products[0].name, "HDMI Adapter");
    }

    #[test]
    fn whitespace_in_name_is_collapsed() {
        let products = run(&["Mechanical   Keyboard    $129.00"]);
        assert_eq!(products[0].name, "Mechanical Keyboard");
    }

    #[test]
    fn metadata_labels_are_rejected() {
        assert!(run(&["SKU: 12345   $49.99"]).is_empty());
        assert!(run(&["Qty 2   $49.99"]).is_empty());
    }

    #[test]
    fn numeric_and_short_names_are_rejected() {
        assert!(run(&["42   $49.99"]).is_empty());
        assert!(run(&["AB   $49.99"]).is_empty());
    }

    #[test]
    fn price_band_is_enforced() {
        assert!(run(&["Promo sticker   $0.00"]).is_empty());
        assert!(run(&["Server rack   $65,000.00"]).is_empty());
        // Boundary values survive.
        assert_eq!(run(&["Spare screw   $0.01"]).len(), 1);
        assert_eq!(run(&["Workstation rig   $50,000.00"]).len(), 1);
    }

    #[test]
    fn lines_without_prices_are_skipped() {
        assert!(run(&["- Model: Magic Mouse (3rd Gen)", "- SKU: MM-3G-WHITE"]).is_empty());
    }

    #[test]
    fn short_lines_are_skipped() {
        assert!(run(&["ab", " x "]).is_empty());
    }
}
