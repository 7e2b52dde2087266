//! Data-quality report produced alongside the column map.

use serde::{Deserialize, Serialize};

/// Outcome of schema validation.
///
/// `issues` make the dataset unusable; `warnings` only lower `confidence`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    /// Weighted data-quality score in `[0, 1]`.
    #[serde(rename = "data_quality_score")]
    pub quality_score: f64,
    /// Quality score lowered for each warning, in `[0, 1]`.
    #[serde(rename = "ai_confidence")]
    pub confidence: f64,
}

impl ValidationReport {
    /// A failed report carrying the given issues.
    pub fn rejected(issues: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: false,
            issues,
            warnings,
            quality_score: 0.0,
            confidence: 0.0,
        }
    }
}

/// Row-level counts gathered while validating the resolved columns.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct QualityCounts {
    pub total_rows: usize,
    pub parsed_rows: usize,
    pub rows_with_missing: usize,
    pub distinct_dates: usize,
}

impl QualityCounts {
    pub fn parse_ratio(&self) -> f64 {
        ratio(self.parsed_rows, self.total_rows)
    }

    pub fn completeness(&self) -> f64 {
        1.0 - ratio(self.rows_with_missing, self.total_rows)
    }

    pub fn duplicate_ratio(&self) -> f64 {
        ratio(
            self.parsed_rows.saturating_sub(self.distinct_dates),
            self.parsed_rows,
        )
    }

    /// `0.5 * parse ratio + 0.3 * completeness + 0.2 * (1 - duplicate ratio)`.
    pub fn quality_score(&self) -> f64 {
        let score = 0.5 * self.parse_ratio()
            + 0.3 * self.completeness()
            + 0.2 * (1.0 - self.duplicate_ratio());
        score.clamp(0.0, 1.0)
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn clean_counts_score_one() {
        let counts = QualityCounts {
            total_rows: 50,
            parsed_rows: 50,
            rows_with_missing: 0,
            distinct_dates: 50,
        };
        assert_relative_eq!(counts.quality_score(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn duplicates_and_gaps_lower_quality() {
        let counts = QualityCounts {
            total_rows: 100,
            parsed_rows: 80,
            rows_with_missing: 20,
            distinct_dates: 40,
        };
        // 0.5 * 0.8 + 0.3 * 0.8 + 0.2 * 0.5
        assert_relative_eq!(counts.quality_score(), 0.74, epsilon = 1e-12);
    }

    #[test]
    fn report_uses_renderer_field_names() {
        let report = ValidationReport {
            is_valid: true,
            quality_score: 0.9,
            confidence: 0.8,
            ..ValidationReport::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["data_quality_score"], 0.9);
        assert_eq!(json["ai_confidence"], 0.8);
    }
}
