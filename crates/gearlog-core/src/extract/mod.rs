//! Receipt text parsing: strategies, aggregation, and the orchestrator.

mod aggregate;
mod classify;
mod dates;
mod fixed_pattern;
pub mod patterns;
mod processor;
mod same_line;
mod table;

pub use aggregate::parse_products;
pub use classify::product_type;
pub use dates::{ExtractedDate, extract_date};
pub use fixed_pattern::FixedPatternStrategy;
pub use processor::ReceiptProcessor;
pub use same_line::SameLineStrategy;
pub use table::TableStrategy;

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::models::config::ExtractionConfig;
use crate::models::product::ExtractedProduct;

/// One independent line-parsing heuristic. Strategies are pure: same lines
/// in, same candidates out, no state carried between receipts.
pub trait LineStrategy {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Scan the full line array and propose product candidates. Every
    /// candidate carries both a name and a price; anything weaker is
    /// filtered out before returning.
    fn extract(&self, lines: &[String]) -> Vec<ExtractedProduct>;
}

/// The fixed strategy list, in invocation order. Candidate order (and with
/// it dedup priority) follows this order.
pub fn strategy_registry(config: &ExtractionConfig) -> Vec<Box<dyn LineStrategy>> {
    vec![
        Box::new(SameLineStrategy::new(config.clone())),
        Box::new(TableStrategy::new(config.clone())),
        Box::new(FixedPatternStrategy::new(config.clone())),
    ]
}

/// Parse a currency amount out of a matched substring: strips "$" and
/// thousands separators, tolerates a dangling decimal point.
pub(crate) fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let cleaned = cleaned.trim_end_matches('.');
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(cleaned).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn registry_order_is_fixed() {
        let names: Vec<&str> = strategy_registry(&ExtractionConfig::default())
            .iter()
            .map(|s| s.name())
            .collect();
        assert_eq!(names, vec!["same_line", "table", "fixed_pattern"]);
    }

    #[test]
    fn parse_amount_handles_currency_forms() {
        assert_eq!(parse_amount("$79.99"), Decimal::from_str("79.99").ok());
        assert_eq!(parse_amount("$2,499.99"), Decimal::from_str("2499.99").ok());
        assert_eq!(parse_amount("$30"), Decimal::from_str("30").ok());
        assert_eq!(parse_amount("$79."), Decimal::from_str("79").ok());
        assert_eq!(parse_amount("2,831.82"), Decimal::from_str("2831.82").ok());
        assert_eq!(parse_amount("$,"), None);
    }
}
