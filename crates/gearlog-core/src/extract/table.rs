//! Table strategy: header-delimited tabular receipts.
//!
//! Two sub-passes run over the detected table region: whitespace-delimited
//! column parsing, and a fallback that pairs a bare product-name line with a
//! price found on one of the next few lines.

use tracing::debug;

use crate::models::config::ExtractionConfig;
use crate::models::product::{ExtractedProduct, Provenance, Strategy};

use super::patterns::{COLUMN_SPLIT, CURRENCY, HARDWARE_KEYWORDS};
use super::{LineStrategy, parse_amount, product_type};

/// How many lines below a bare name line are searched for its price.
const NEARBY_PRICE_WINDOW: usize = 3;

/// Structured receipts with a column header row.
pub struct TableStrategy {
    config: ExtractionConfig,
}

impl TableStrategy {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Find `[start, end)` of the table body. Start is the line after the
    /// first header row; end is the first summary marker after it, or the
    /// end of input when no marker exists.
    fn detect_region(lines: &[String]) -> Option<(usize, usize)> {
        let mut start = None;

        for (i, raw_line) in lines.iter().enumerate() {
            let line = raw_line.to_lowercase();

            if start.is_none()
                && ((line.contains("description") && line.contains("price"))
                    || (line.contains("item") && line.contains("amount"))
                    || (line.contains("product") && line.contains("cost")))
            {
                debug!(line = i, "table header detected");
                start = Some(i + 1);
                continue;
            }

            if let Some(s) = start {
                if line.contains("subtotal")
                    || line.contains("total due")
                    || line.contains("payment method")
                    || line.contains("transaction id")
                {
                    debug!(line = i, "table end marker");
                    return Some((s, i));
                }
            }
        }

        start.map(|s| (s, lines.len()))
    }

    /// Pick the price field of a column-split row. A field whose amount has
    /// no thousands separator or parses under 1000 is preferred, so a line
    /// total does not get mistaken for the unit price.
    fn pick_price_field<'a>(price_fields: &[&'a str]) -> &'a str {
        price_fields
            .iter()
            .find(|field| {
                !field.contains(',')
                    || CURRENCY
                        .find(field)
                        .and_then(|m| parse_amount(m.as_str()))
                        .is_some_and(|v| v < rust_decimal::Decimal::from(1000))
            })
            .copied()
            .unwrap_or(price_fields[0])
    }

    fn parse_columns(&self, line: &str, index: usize) -> Option<ExtractedProduct> {
        let fields: Vec<&str> = COLUMN_SPLIT
            .split(line)
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect();
        if fields.len() < 2 {
            return None;
        }

        let name = fields[0];
        let price_fields: Vec<&str> = fields
            .iter()
            .filter(|f| CURRENCY.is_match(f))
            .copied()
            .collect();
        if price_fields.is_empty() || name.len() <= 2 {
            return None;
        }

        let chosen = Self::pick_price_field(&price_fields);
        let price_match = CURRENCY.find(chosen)?;
        let price = parse_amount(price_match.as_str())?;
        if !self.config.price_in_range(price) {
            debug!(line = index, %price, "rejected: price out of range");
            return None;
        }

        let category = product_type(name);
        debug!(line = index, name, %price, category, "table product");

        Some(ExtractedProduct {
            name: name.to_string(),
            price,
            product_type: category.to_string(),
            warranty_months: self.config.default_warranty_months,
            purchase_date: None,
            confidence: 0.8,
            provenance: Provenance {
                strategy: Strategy::Table,
                line_index: index,
                source_line: line.to_string(),
                matched_price: Some(price_match.as_str().to_string()),
                price_line_index: None,
            },
        })
    }

    /// A product-ish name line with no price of its own: pair it with the
    /// first in-range price on one of the next few lines.
    fn parse_nearby_price(
        &self,
        lines: &[String],
        line: &str,
        index: usize,
    ) -> Option<ExtractedProduct> {
        if !HARDWARE_KEYWORDS.is_match(line) || line.contains('$') {
            return None;
        }

        let window_end = (index + NEARBY_PRICE_WINDOW).min(lines.len().saturating_sub(1));
        for j in (index + 1)..=window_end {
            let next = lines[j].trim();
            let Some(price_match) = CURRENCY.find(next) else {
                continue;
            };
            let Some(price) = parse_amount(price_match.as_str()) else {
                continue;
            };
            if !self.config.price_in_range(price) {
                continue;
            }

            let category = product_type(line);
            debug!(line = index, price_line = j, name = line, %price, "table product (split lines)");

            return Some(ExtractedProduct {
                name: line.to_string(),
                price,
                product_type: category.to_string(),
                warranty_months: self.config.default_warranty_months,
                purchase_date: None,
                confidence: 0.7,
                provenance: Provenance {
                    strategy: Strategy::TableNearby,
                    line_index: index,
                    source_line: line.to_string(),
                    matched_price: Some(price_match.as_str().to_string()),
                    price_line_index: Some(j),
                },
            });
        }

        None
    }
}

impl LineStrategy for TableStrategy {
    fn name(&self) -> &'static str {
        "table"
    }

    fn extract(&self, lines: &[String]) -> Vec<ExtractedProduct> {
        let mut products = Vec::new();

        let Some((start, end)) = Self::detect_region(lines) else {
            debug!("no table structure detected");
            return products;
        };
        debug!(start, end, "parsing table region");

        for i in start..end {
            let line = lines[i].trim();
            if line.len() < 3 {
                continue;
            }
            let lower = line.to_lowercase();
            if lower.contains("discount") || lower.contains("promo") {
                continue;
            }

            if let Some(product) = self.parse_columns(line, i) {
                products.push(product);
                continue;
            }
            if let Some(product) = self.parse_nearby_price(lines, line, i) {
                products.push(product);
            }
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
        let strategy = TableStrategy::new(ExtractionConfig::default());
        strategy.extract(&lines.iter().map(|l| l.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn no_header_means_no_products() {
        assert!(run(&["Gaming Keyboard    $89.99"]).is_empty());
    }

    #[test]
    fn parses_column_rows_between_header_and_subtotal() {
        let products = run(&[
            "Description          Price",
            "Gaming Keyboard      $89.99",
            "USB Hub              $24.50",
            "Subtotal             $114.49",
            "Gaming Headset       $59.99",
        ]);
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Gaming Keyboard");
        assert_eq!(products[0].price, Decimal::from_str("89.99").unwrap());
        assert_eq!(products[0].confidence, 0.8);
        assert_eq!(products[0].provenance.strategy, Strategy::Table);
        assert_eq!(products[1].name, "USB Hub");
    }

    #[test]
    fn region_runs_to_end_without_marker() {
        let products = run(&[
            "Item                 Amount",
            "Webcam Stand         $19.99",
            "Laptop Sleeve        $34.00",
        ]);
        assert_eq!(products.len(), 2);
    }

    #[test]
    fn discount_and_promo_rows_are_skipped() {
        let products = run(&[
            "Product              Cost",
            "Discount             -$10.00",
            "Promo bundle         $5.00",
            "Wireless Mouse       $25.00",
        ]);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Wireless Mouse");
    }

    #[test]
    fn unit_price_preferred_over_line_total() {
        // Both a unit price and a comma-grouped line total appear; the
        // under-1000 field wins.
        let products = run(&[
            "Description      Qty      Price       Amount",
            "Gaming Laptop    2        $899.99     $1,799.98",
        ]);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].price, Decimal::from_str("899.99").unwrap());
    }

    #[test]
    fn falls_back_to_first_price_field_when_all_large() {
        let products = run(&[
            "Description      Price        Amount",
            "Server Chassis   $1,200.00    $2,400.00",
        ]);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].price, Decimal::from_str("1200.00").unwrap());
    }

    #[test]
    fn name_paired_with_price_on_following_line() {
        let products = run(&[
            "Item       Amount",
            "Gaming Monitor 27 inch",
            "SKU 4411",
            "$329.99",
        ]);
        assert_eq!(products.len(), 1);
        let p = &products[0];
        assert_eq!(p.name, "Gaming Monitor 27 inch");
        assert_eq!(p.price, Decimal::from_str("329.99").unwrap());
        assert_eq!(p.confidence, 0.7);
        assert_eq!(p.provenance.strategy, Strategy::TableNearby);
        assert_eq!(p.provenance.price_line_index, Some(3));
    }

    #[test]
    fn nearby_price_search_is_bounded() {
        let products = run(&[
            "Item       Amount",
            "Gaming Monitor 27 inch",
            "aaaa",
            "bbbb",
            "cccc",
            "$329.99",
        ]);
        assert!(products.is_empty());
    }

    #[test]
    fn non_hardware_name_lines_are_ignored() {
        let products = run(&[
            "Item       Amount",
            "Gift wrap service",
            "$5.00",
        ]);
        assert!(products.is_empty());
    }

    #[test]
    fn out_of_range_prices_are_rejected() {
        let products = run(&[
            "Description      Price",
            "Mainframe        $75,000.00",
        ]);
        assert!(products.is_empty());
    }
}
