//! Common regex patterns for receipt line parsing.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Currency-formatted substring: "$2,499.99", "$79.99", "$30".
    pub static ref CURRENCY: Regex = Regex::new(
        r"\$[\d,]+\.?\d*"
    ).unwrap();

    /// Leading quantity marker on an itemized line: "2x ", "1 * ".
    pub static ref QUANTITY_PREFIX: Regex = Regex::new(
        r"(?i)^\d+\s*[x*]\s*"
    ).unwrap();

    /// Metadata labels that look like names after the price is stripped.
    pub static ref METADATA_LABEL: Regex = Regex::new(
        r"(?i)^(qty|quantity|item|sku|upc|code|id)\s*:?\s*\d*$"
    ).unwrap();

    /// A purely numeric "name".
    pub static ref PURE_NUMBER: Regex = Regex::new(
        r"^\d+$"
    ).unwrap();

    /// Product-ish hardware keywords, used to pair a bare name line with a
    /// price on a following line.
    pub static ref HARDWARE_KEYWORDS: Regex = Regex::new(
        r"(?i)gaming|laptop|computer|mouse|keyboard|software|hardware|monitor|camera|phone|tablet|watch"
    ).unwrap();

    /// Column separator in tabular receipts: runs of 2+ spaces or a tab.
    pub static ref COLUMN_SPLIT: Regex = Regex::new(
        r"\s{2,}|\t"
    ).unwrap();

    // Date patterns, tried in this order by the cascade.
    pub static ref LABELED_DATE: Regex = Regex::new(
        r"(?i)date[:\s]+([^\n]+)"
    ).unwrap();

    pub static ref DATE_MDY_SLASH: Regex = Regex::new(
        r"(\d{1,2})/(\d{1,2})/(\d{2,4})"
    ).unwrap();

    pub static ref DATE_MDY_DASH: Regex = Regex::new(
        r"(\d{1,2})-(\d{1,2})-(\d{2,4})"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"(\d{4})-(\d{1,2})-(\d{1,2})"
    ).unwrap();

    /// Labeled receipt total.
    pub static ref TOTAL_LABEL: Regex = Regex::new(
        r"(?i)total:\s*\$?([\d,]+\.?\d*)"
    ).unwrap();
}
