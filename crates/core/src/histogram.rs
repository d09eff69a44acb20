//! Change-percentage histogram over stored comparison results
//!
//! Ten bins of ten points each. Anything at or above 100% lands in the last
//! bin. Values that don't parse, or that parse to a negative or non-finite
//! number, are skipped.

use crate::record::parse_percentage;
use serde::Serialize;

pub const BIN_COUNT: usize = 10;
pub const BIN_WIDTH: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Histogram {
    pub bins: [usize; BIN_COUNT],
}

/// One labelled bin, for display and JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramBin {
    pub low: usize,
    pub high: usize,
    pub count: usize,
}

/// Bin index for a percentage, `None` if it can't be placed
pub fn bin_index(pct: f64) -> Option<usize> {
    if !pct.is_finite() || pct < 0.0 {
        return None;
    }
    let index = (pct / BIN_WIDTH as f64).floor() as usize;
    Some(index.min(BIN_COUNT - 1))
}

impl Histogram {
    /// Count one percentage. Values [`bin_index`] rejects are ignored.
    pub fn add(&mut self, pct: f64) {
        if let Some(index) = bin_index(pct) {
            self.bins[index] += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().sum()
    }

    pub fn labelled(&self) -> Vec<HistogramBin> {
        self.bins
            .iter()
            .enumerate()
            .map(|(i, &count)| HistogramBin {
                low: i * BIN_WIDTH,
                high: (i + 1) * BIN_WIDTH,
                count,
            })
            .collect()
    }

    /// Summary lines, ascending, e.g. `"   0– 10% : 3 URLs"`
    pub fn lines(&self) -> Vec<String> {
        self.labelled()
            .iter()
            .map(|bin| format!("  {:2}–{:3}% : {} URLs", bin.low, bin.high, bin.count))
            .collect()
    }
}

/// Build a histogram from stored percentage strings such as `"33.3%"`
pub fn build_histogram<I, S>(values: I) -> Histogram
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut histogram = Histogram::default();
    for value in values {
        if let Ok(pct) = parse_percentage(value.as_ref()) {
            histogram.add(pct);
        }
    }
    histogram
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_histogram_clamps_last_bin() {
        let histogram = build_histogram(["5.0%", "15.0%", "95.0%", "105.0%"]);
        assert_eq!(histogram.bins[0], 1);
        assert_eq!(histogram.bins[1], 1);
        assert_eq!(histogram.bins[9], 2);
        assert_eq!(histogram.total(), 4);
    }

    #[test]
    fn test_build_histogram_bin_edges() {
        let histogram = build_histogram(["0.0%", "9.9%", "10.0%", "99.9%", "100.0%"]);
        assert_eq!(histogram.bins[0], 2);
        assert_eq!(histogram.bins[1], 1);
        assert_eq!(histogram.bins[9], 2);
    }

    #[test]
    fn test_build_histogram_skips_malformed() {
        let histogram = build_histogram(["", "abc%", "NaN%", "-5.0%", "inf", "42.0%"]);
        assert_eq!(histogram.total(), 1);
        assert_eq!(histogram.bins[4], 1);
    }

    #[test]
    fn test_histogram_add_ignores_unplaceable_values() {
        let mut histogram = Histogram::default();
        histogram.add(f64::NAN);
        histogram.add(-1.0);
        histogram.add(42.0);
        assert_eq!(histogram.total(), 1);
        assert_eq!(histogram.bins[4], 1);
    }

    #[test]
    fn test_build_histogram_empty() {
        let histogram = build_histogram(Vec::<String>::new());
        assert_eq!(histogram, Histogram::default());
    }

    #[test]
    fn test_histogram_lines() {
        let histogram = build_histogram(["5.0%", "95.0%"]);
        let lines = histogram.lines();
        assert_eq!(lines.len(), BIN_COUNT);
        assert_eq!(lines[0], "   0– 10% : 1 URLs");
        assert_eq!(lines[1], "  10– 20% : 0 URLs");
        assert_eq!(lines[9], "  90–100% : 1 URLs");
    }

    #[test]
    fn test_labelled_bins_serialize() {
        let histogram = build_histogram(["55.5%"]);
        let json = serde_json::to_value(histogram.labelled()).unwrap();
        assert_eq!(json[5]["low"], 50);
        assert_eq!(json[5]["high"], 60);
        assert_eq!(json[5]["count"], 1);
    }

    #[test]
    fn test_labelled_bins() {
        let bins = Histogram::default().labelled();
        assert_eq!(bins.first().map(|b| (b.low, b.high)), Some((0, 10)));
        assert_eq!(bins.last().map(|b| (b.low, b.high)), Some((90, 100)));
    }
}
