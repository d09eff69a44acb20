use crate::diff::DiffStats;
use serde::{Deserialize, Serialize};

/// Column holding the formatted percentage in the output store
pub const PERCENTAGE_COLUMN: &str = "Percentage of Content Changed";

/// Header row of the output store, in column order
pub const HEADERS: [&str; 5] = [
    "URL",
    PERCENTAGE_COLUMN,
    "Additions",
    "Deletions",
    "Inline Changes",
];

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PercentageError {
    #[error("empty percentage value")]
    Empty,

    #[error("invalid percentage '{0}'")]
    Invalid(String),
}

/// One row of the output store.
///
/// Field names serialize to the store's column headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Percentage of Content Changed")]
    pub percentage: String,
    #[serde(rename = "Additions")]
    pub additions: usize,
    #[serde(rename = "Deletions")]
    pub deletions: usize,
    #[serde(rename = "Inline Changes")]
    pub inline_changes: usize,
}

impl ComparisonRecord {
    pub fn new(url: impl Into<String>, stats: &DiffStats) -> Self {
        Self {
            url: url.into(),
            percentage: format_percentage(stats.percentage),
            additions: stats.additions,
            deletions: stats.deletions,
            inline_changes: stats.inline_changes,
        }
    }
}

/// Format a percentage with one decimal place and a trailing `%`
pub fn format_percentage(pct: f64) -> String {
    format!("{pct:.1}%")
}

/// Parse a stored percentage such as `"33.3%"` or `" 12 "`
pub fn parse_percentage(value: &str) -> Result<f64, PercentageError> {
    let trimmed = value.trim();
    let number = trimmed.trim_end_matches('%').trim_end();
    if number.is_empty() {
        return Err(PercentageError::Empty);
    }
    number
        .parse::<f64>()
        .map_err(|_| PercentageError::Invalid(value.to_string()))
}

/// Derive the archive URL of a live page: the prefix followed by the URL verbatim
pub fn archive_url(prefix: &str, live_url: &str) -> String {
    format!("{prefix}{live_url}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percentage_one_decimal() {
        assert_eq!(format_percentage(100.0 / 3.0), "33.3%");
        assert_eq!(format_percentage(0.0), "0.0%");
        assert_eq!(format_percentage(200.0), "200.0%");
    }

    #[test]
    fn test_parse_percentage() {
        assert_eq!(parse_percentage("33.3%"), Ok(33.3));
        assert_eq!(parse_percentage("  5.0% "), Ok(5.0));
        assert_eq!(parse_percentage("12"), Ok(12.0));
    }

    #[test]
    fn test_parse_percentage_repeated_percent_signs() {
        assert_eq!(parse_percentage("5%%"), Ok(5.0));
        assert_eq!(parse_percentage("7.5 %%"), Ok(7.5));
        assert_eq!(parse_percentage("%%"), Err(PercentageError::Empty));
    }

    #[test]
    fn test_parse_percentage_malformed() {
        assert_eq!(parse_percentage(""), Err(PercentageError::Empty));
        assert_eq!(parse_percentage("%"), Err(PercentageError::Empty));
        assert!(matches!(
            parse_percentage("n/a"),
            Err(PercentageError::Invalid(_))
        ));
    }

    #[test]
    fn test_comparison_record_from_stats() {
        let stats = DiffStats {
            additions: 1,
            deletions: 0,
            inline_changes: 0,
            union_size: 3,
            percentage: 100.0 / 3.0,
        };
        let record = ComparisonRecord::new("https://example.com", &stats);
        assert_eq!(record.url, "https://example.com");
        assert_eq!(record.percentage, "33.3%");
        assert_eq!(record.additions, 1);
    }

    #[test]
    fn test_archive_url_is_verbatim_concatenation() {
        assert_eq!(
            archive_url(
                "https://wayback.archive-it.org/9618/20250701131117/",
                "https://example.com/a?b=c d"
            ),
            "https://wayback.archive-it.org/9618/20250701131117/https://example.com/a?b=c d"
        );
    }
}
