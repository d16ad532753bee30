//! Candidate aggregation: run every strategy, de-duplicate, stamp the
//! purchase date.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::config::ExtractionConfig;
use crate::models::product::{ExtractedProduct, ReceiptText};

use super::dates;
use super::strategy_registry;

/// Parse products out of recognized receipt text.
///
/// Strategies run in a fixed order (same-line, table, fixed-pattern) over the
/// same lines; their candidates are concatenated and de-duplicated by exact
/// `(name, price)` - the first occurrence wins. One purchase date, extracted
/// from the raw text, is attached to every survivor.
///
/// Two genuine same-priced units collapse into one entry here; nothing
/// downstream corrects for that.
pub fn parse_products(text: &ReceiptText, config: &ExtractionConfig) -> Vec<ExtractedProduct> {
    let mut candidates = Vec::new();
    for strategy in strategy_registry(config) {
        let found = strategy.extract(&text.lines);
        debug!(strategy = strategy.name(), count = found.len(), "strategy pass complete");
        candidates.extend(found);
    }

    let mut seen: HashSet<(String, Decimal)> = HashSet::new();
    let mut products: Vec<ExtractedProduct> = candidates
        .into_iter()
        .filter(|p| seen.insert((p.name.clone(), p.price)))
        .collect();

    let purchase_date = dates::extract_date(&text.raw_text).date;
    for product in &mut products {
        product.purchase_date = purchase_date;
    }

    debug!(count = products.len(), ?purchase_date, "aggregation complete");
    products
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::Strategy;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn parse(raw_text: &str) -> Vec<ExtractedProduct> {
        parse_products(
            &ReceiptText::new(raw_text, 0.95),
            &ExtractionConfig::default(),
        )
    }

    #[test]
    fn duplicate_candidates_collapse_to_one() {
        // The same product matches both the same-line pass and the table
        // pass; only the first-strategy candidate survives.
        let products = parse(
            "Description          Price\n\
             Apple Magic Mouse    $79.99\n\
             Subtotal             $79.99\n",
        );
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Apple Magic Mouse");
        assert_eq!(products[0].provenance.strategy, Strategy::SameLine);
    }

    #[test]
    fn same_name_different_price_is_kept() {
        let products = parse(
            "Laptop Sleeve    $34.00\n\
             Laptop Sleeve    $29.00\n",
        );
        assert_eq!(products.len(), 2);
    }

    #[test]
    fn dedup_invariant_holds() {
        let products = parse(
            "Description          Price\n\
             Gaming Keyboard      $89.99\n\
             Gaming Keyboard      $89.99\n\
             USB Hub              $24.50\n",
        );
        for (a, p) in products.iter().enumerate() {
            for q in products.iter().skip(a + 1) {
                assert!((&p.name, p.price) != (&q.name, q.price));
            }
        }
        assert_eq!(products.len(), 2);
    }

    #[test]
    fn purchase_date_is_attached_to_every_product() {
        let products = parse(
            "Best Buy\n\
             Date: 01/15/2024\n\
             Apple Magic Mouse    $79.99\n\
             USB-C Cable          $29.99\n",
        );
        assert_eq!(products.len(), 2);
        for product in &products {
            assert_eq!(product.purchase_date, NaiveDate::from_ymd_opt(2024, 1, 15));
        }
    }

    #[test]
    fn missing_date_stays_absent() {
        let products = parse("Apple Magic Mouse    $79.99\n");
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].purchase_date, None);
    }

    #[test]
    fn empty_text_finds_nothing() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn price_bound_invariant_over_all_strategies() {
        let products = parse(
            "Description          Price\n\
             Cheap sticker        $0.001\n\
             Gaming Keyboard      $89.99\n\
             Mainframe            $99,000.00\n",
        );
        let min = rust_decimal::Decimal::from_str("0.01").unwrap();
        let max = rust_decimal::Decimal::from(50_000);
        assert!(products.iter().all(|p| p.price >= min && p.price <= max));
        assert_eq!(products.len(), 1);
    }
}
