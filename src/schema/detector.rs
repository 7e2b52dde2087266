//! Column role detection and data validation.
//!
//! Each column is scored per logical role by combining the similarity of its
//! normalised header to the role's aliases with how well its cells parse as
//! the role's type. The highest score wins; ties go to the leftmost column.

use super::parse::{normalize_header, parse_date, parse_label, parse_number};
use super::report::{QualityCounts, ValidationReport};
use crate::core::{Cell, RawTable};
use crate::error::{AnalysisError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Weight of the header similarity in a column score.
const NAME_WEIGHT: f64 = 0.7;
/// Weight of the type compatibility in a column score.
const TYPE_WEIGHT: f64 = 0.3;

/// Logical role a column can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Date,
    Sales,
    Quantity,
    Margin,
    Cost,
    Product,
    Region,
    Customer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Date,
    Numeric,
    Text,
}

impl ColumnRole {
    /// Resolution order; earlier roles claim columns first.
    pub const ALL: [ColumnRole; 8] = [
        ColumnRole::Date,
        ColumnRole::Sales,
        ColumnRole::Quantity,
        ColumnRole::Margin,
        ColumnRole::Cost,
        ColumnRole::Product,
        ColumnRole::Region,
        ColumnRole::Customer,
    ];

    /// Canonical header names for the role.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            ColumnRole::Date => &[
                "date",
                "day",
                "timestamp",
                "datetime",
                "time",
                "period",
                "order_date",
            ],
            ColumnRole::Sales => &[
                "sales",
                "revenue",
                "amount",
                "total",
                "value",
                "income",
                "mrr",
                "daily_revenue",
                "total_sales",
            ],
            ColumnRole::Quantity => &["quantity", "qty", "units", "units_sold", "volume"],
            ColumnRole::Margin => &["margin", "margin_pct", "profit_margin"],
            ColumnRole::Cost => &["cost", "cogs", "unit_cost"],
            ColumnRole::Product => &[
                "product",
                "item",
                "sku",
                "product_id",
                "product_name",
                "category",
                "service",
            ],
            ColumnRole::Region => &[
                "region",
                "area",
                "location",
                "city",
                "state",
                "country",
                "territory",
            ],
            ColumnRole::Customer => &["customer", "client", "user", "account", "buyer"],
        }
    }

    fn kind(self) -> ValueKind {
        match self {
            ColumnRole::Date => ValueKind::Date,
            ColumnRole::Sales | ColumnRole::Quantity | ColumnRole::Margin | ColumnRole::Cost => {
                ValueKind::Numeric
            }
            ColumnRole::Product | ColumnRole::Region | ColumnRole::Customer => ValueKind::Text,
        }
    }

    /// Whether a column with no header match may still take the role by type.
    fn allows_type_fallback(self) -> bool {
        matches!(self, ColumnRole::Date | ColumnRole::Sales)
    }
}

/// Similarity of a normalised header to a set of aliases.
///
/// Exact match scores 1.0, an alias equal to one `_`-separated token 0.8,
/// an alias contained anywhere 0.6.
pub fn name_score(normalized: &str, aliases: &[&str]) -> f64 {
    let mut best: f64 = 0.0;
    for alias in aliases {
        let score = if normalized == *alias {
            1.0
        } else if normalized.split('_').any(|token| token == *alias) {
            0.8
        } else if normalized.contains(alias) {
            0.6
        } else {
            0.0
        };
        best = best.max(score);
    }
    best
}

/// Resolved mapping of logical roles to source column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    #[serde(rename = "sales_column")]
    pub sales: String,
    #[serde(rename = "date_column")]
    pub date: String,
    #[serde(rename = "product_column")]
    pub product: Option<String>,
    #[serde(rename = "region_column")]
    pub region: Option<String>,
    #[serde(rename = "customer_column")]
    pub customer: Option<String>,
    #[serde(rename = "quantity_column", skip_serializing_if = "Option::is_none", default)]
    pub quantity: Option<String>,
    #[serde(rename = "margin_column", skip_serializing_if = "Option::is_none", default)]
    pub margin: Option<String>,
    #[serde(rename = "cost_column", skip_serializing_if = "Option::is_none", default)]
    pub cost: Option<String>,
    #[serde(rename = "additional_columns")]
    pub other: Vec<String>,
}

/// Thresholds for schema detection and validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Share of non-empty cells that must parse for a date/numeric role.
    pub type_ratio_threshold: f64,
    /// Minimum share of rows with a parseable date and sales value.
    pub min_parse_ratio: f64,
    /// Fewer distinct days than this raises a limited-history warning.
    pub min_history_days: usize,
    /// Confidence multiplier applied once per warning.
    pub warning_penalty: f64,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            type_ratio_threshold: 0.9,
            min_parse_ratio: 0.5,
            min_history_days: 30,
            warning_penalty: 0.95,
        }
    }
}

impl SchemaConfig {
    pub fn with_type_ratio_threshold(mut self, threshold: f64) -> Self {
        self.type_ratio_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_min_parse_ratio(mut self, ratio: f64) -> Self {
        self.min_parse_ratio = ratio.clamp(0.0, 1.0);
        self
    }
}

/// One parsed input record.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub sales: f64,
    pub product: Option<String>,
    pub region: Option<String>,
    pub customer: Option<String>,
    pub quantity: Option<f64>,
    pub margin: Option<f64>,
    pub cost: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ColumnLayout {
    date: usize,
    sales: usize,
    product: Option<usize>,
    region: Option<usize>,
    customer: Option<usize>,
    quantity: Option<usize>,
    margin: Option<usize>,
    cost: Option<usize>,
}

/// A resolved, validated schema for one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: ColumnMap,
    report: ValidationReport,
    layout: ColumnLayout,
}

impl Schema {
    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    /// Rows whose date and sales value both parse.
    pub fn records(&self, table: &RawTable) -> Vec<SalesRecord> {
        let layout = self.layout;
        let number_at = |row: &[Cell], idx: Option<usize>| idx.and_then(|i| parse_number(&row[i]));
        let label_at = |row: &[Cell], idx: Option<usize>| idx.and_then(|i| parse_label(&row[i]));

        table
            .rows()
            .iter()
            .filter_map(|row| {
                let row = row.as_slice();
                let date = parse_date(&row[layout.date])?;
                let sales = parse_number(&row[layout.sales])?;
                Some(SalesRecord {
                    date,
                    sales,
                    product: label_at(row, layout.product),
                    region: label_at(row, layout.region),
                    customer: label_at(row, layout.customer),
                    quantity: number_at(row, layout.quantity),
                    margin: number_at(row, layout.margin),
                    cost: number_at(row, layout.cost),
                })
            })
            .collect()
    }
}

/// Per-column statistics gathered once per table.
#[derive(Debug, Clone)]
struct ColumnProfile {
    name: String,
    normalized: String,
    non_empty: usize,
    numeric: usize,
    dates: usize,
}

impl ColumnProfile {
    fn build(table: &RawTable, index: usize) -> Self {
        let name = table.headers()[index].clone();
        let normalized = normalize_header(&name);
        let mut profile = Self {
            name,
            normalized,
            non_empty: 0,
            numeric: 0,
            dates: 0,
        };
        for cell in table.column(index) {
            if cell.is_empty() {
                continue;
            }
            profile.non_empty += 1;
            if parse_number(cell).is_some() {
                profile.numeric += 1;
            }
            if parse_date(cell).is_some() {
                profile.dates += 1;
            }
        }
        profile
    }

    fn type_ratio(&self, kind: ValueKind, total_rows: usize) -> f64 {
        let ok = match kind {
            ValueKind::Date => self.dates,
            ValueKind::Numeric => self.numeric,
            ValueKind::Text => {
                return if total_rows == 0 {
                    0.0
                } else {
                    self.non_empty as f64 / total_rows as f64
                }
            }
        };
        if self.non_empty == 0 {
            0.0
        } else {
            ok as f64 / self.non_empty as f64
        }
    }

    /// Best header similarity to any role other than `role`.
    fn other_role_name_score(&self, role: ColumnRole) -> f64 {
        ColumnRole::ALL
            .iter()
            .filter(|r| **r != role)
            .map(|r| name_score(&self.normalized, r.aliases()))
            .fold(0.0, f64::max)
    }
}

/// Detects column roles and validates data quality.
#[derive(Debug, Clone, Default)]
pub struct SchemaDetector {
    config: SchemaConfig,
}

impl SchemaDetector {
    pub fn new(config: SchemaConfig) -> Self {
        Self { config }
    }

    /// Resolve the column map and validate the table.
    ///
    /// Fails with [`AnalysisError::SchemaUnresolved`] when no sales or date
    /// column qualifies or too few rows parse; the error carries the report.
    pub fn detect(&self, table: &RawTable) -> Result<Schema> {
        let total_rows = table.len();
        let profiles: Vec<ColumnProfile> = (0..table.headers().len())
            .map(|i| ColumnProfile::build(table, i))
            .collect();

        let mut claimed = vec![false; profiles.len()];
        let mut resolved = [None; ColumnRole::ALL.len()];
        for (slot, role) in ColumnRole::ALL.iter().enumerate() {
            if let Some(index) = self.best_column(&profiles, &claimed, *role, total_rows) {
                claimed[index] = true;
                resolved[slot] = Some(index);
                debug!(role = ?role, column = %profiles[index].name, "resolved column role");
            }
        }
        let role_index = |role: ColumnRole| {
            ColumnRole::ALL
                .iter()
                .position(|r| *r == role)
                .and_then(|slot| resolved[slot])
        };

        let mut issues = Vec::new();
        if total_rows == 0 {
            issues.push("dataset contains no rows".to_string());
        }
        let sales = role_index(ColumnRole::Sales);
        let date = role_index(ColumnRole::Date);
        if sales.is_none() {
            issues.push(format!(
                "no column qualifies as sales (looking for {} or a numeric column)",
                ColumnRole::Sales.aliases().join(", ")
            ));
        }
        if date.is_none() {
            issues.push("no column contains parseable dates".to_string());
        }

        let (date, sales) = match (date, sales) {
            (Some(date), Some(sales)) if issues.is_empty() => (date, sales),
            _ => {
                return Err(AnalysisError::SchemaUnresolved {
                    report: ValidationReport::rejected(issues, Vec::new()),
                })
            }
        };

        let layout = ColumnLayout {
            date,
            sales,
            product: role_index(ColumnRole::Product),
            region: role_index(ColumnRole::Region),
            customer: role_index(ColumnRole::Customer),
            quantity: role_index(ColumnRole::Quantity),
            margin: role_index(ColumnRole::Margin),
            cost: role_index(ColumnRole::Cost),
        };
        let name = |idx: Option<usize>| idx.map(|i| profiles[i].name.clone());
        let columns = ColumnMap {
            sales: profiles[sales].name.clone(),
            date: profiles[date].name.clone(),
            product: name(layout.product),
            region: name(layout.region),
            customer: name(layout.customer),
            quantity: name(layout.quantity),
            margin: name(layout.margin),
            cost: name(layout.cost),
            other: profiles
                .iter()
                .zip(&claimed)
                .filter(|(_, taken)| !**taken)
                .map(|(p, _)| p.name.clone())
                .collect(),
        };

        info!(
            sales = %columns.sales,
            date = %columns.date,
            product = ?columns.product,
            "detected columns"
        );

        let report = self.validate(table, &columns, layout);
        if !report.is_valid {
            return Err(AnalysisError::SchemaUnresolved { report });
        }

        Ok(Schema {
            columns,
            report,
            layout,
        })
    }

    fn best_column(
        &self,
        profiles: &[ColumnProfile],
        claimed: &[bool],
        role: ColumnRole,
        total_rows: usize,
    ) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, profile) in profiles.iter().enumerate() {
            if claimed[index] {
                continue;
            }
            let name = name_score(&profile.normalized, role.aliases());
            let type_ratio = profile.type_ratio(role.kind(), total_rows);

            let qualifies = match role.kind() {
                ValueKind::Text => name > 0.0 && type_ratio > 0.0,
                ValueKind::Date | ValueKind::Numeric => {
                    let type_ok = profile.non_empty > 0
                        && type_ratio >= self.config.type_ratio_threshold;
                    let named = name > 0.0
                        || (role.allows_type_fallback()
                            && profile.other_role_name_score(role) == 0.0);
                    type_ok && named
                }
            };
            if !qualifies {
                continue;
            }

            let score = NAME_WEIGHT * name + TYPE_WEIGHT * type_ratio;
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((index, score)),
            }
        }
        best.map(|(index, _)| index)
    }

    fn validate(&self, table: &RawTable, columns: &ColumnMap, layout: ColumnLayout) -> ValidationReport {
        let mut counts = QualityCounts {
            total_rows: table.len(),
            ..QualityCounts::default()
        };
        let mut missing_sales = 0;
        let mut missing_dates = 0;
        let mut unparseable = 0;
        let mut negative = 0;
        let mut dates = BTreeSet::new();

        for row in table.rows() {
            let date_cell = &row[layout.date];
            let sales_cell = &row[layout.sales];
            let date_missing = date_cell.is_empty();
            let sales_missing = sales_cell.is_empty();
            if date_missing {
                missing_dates += 1;
            }
            if sales_missing {
                missing_sales += 1;
            }
            if date_missing || sales_missing {
                counts.rows_with_missing += 1;
                continue;
            }

            match (parse_date(date_cell), parse_number(sales_cell)) {
                (Some(date), Some(value)) => {
                    counts.parsed_rows += 1;
                    dates.insert(date);
                    if value < 0.0 {
                        negative += 1;
                    }
                }
                _ => unparseable += 1,
            }
        }
        counts.distinct_dates = dates.len();

        let mut issues = Vec::new();
        let parse_ratio = counts.parse_ratio();
        if parse_ratio < self.config.min_parse_ratio {
            issues.push(format!(
                "only {:.0}% of rows have a parseable date and sales value (minimum {:.0}%)",
                parse_ratio * 100.0,
                self.config.min_parse_ratio * 100.0
            ));
        }

        let mut warnings = Vec::new();
        if missing_sales > 0 {
            warnings.push(format!(
                "Sales column '{}' contains {missing_sales} missing values",
                columns.sales
            ));
        }
        if missing_dates > 0 {
            warnings.push(format!(
                "Date column '{}' contains {missing_dates} missing values",
                columns.date
            ));
        }
        if unparseable > 0 {
            warnings.push(format!(
                "Dropped {unparseable} rows without a parseable date and sales value"
            ));
        }
        if negative > 0 {
            warnings.push(format!("Sales column contains {negative} negative values"));
        }
        let duplicates = counts.parsed_rows.saturating_sub(counts.distinct_dates);
        if duplicates > 0 {
            warnings.push(format!(
                "{duplicates} rows share a date with another row and were summed"
            ));
        }
        if counts.distinct_dates < self.config.min_history_days {
            warnings.push(format!(
                "Limited historical data (less than {} days)",
                self.config.min_history_days
            ));
        }
        if let (Some(first), Some(last)) = (dates.first(), dates.last()) {
            let span = (*last - *first).num_days() as usize;
            if span < self.config.min_history_days {
                warnings.push(format!(
                    "Short historical period (less than {} days)",
                    self.config.min_history_days
                ));
            }
            let gaps = (span + 1).saturating_sub(counts.distinct_dates);
            if gaps > 0 {
                warnings.push(format!(
                    "{gaps} calendar days without records will be gap-filled"
                ));
            }
        }

        let quality_score = counts.quality_score();
        let is_valid = issues.is_empty();
        let confidence = if is_valid {
            (quality_score * self.config.warning_penalty.powi(warnings.len() as i32))
                .clamp(0.0, 1.0)
        } else {
            0.0
        };

        ValidationReport {
            is_valid,
            issues,
            warnings,
            quality_score,
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn days(n: usize) -> Vec<String> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n)
            .map(|i| (start + chrono::Duration::days(i as i64)).to_string())
            .collect()
    }

    fn table(headers: &[&str], columns: Vec<Vec<String>>) -> RawTable {
        let n = columns[0].len();
        let rows: Vec<Vec<String>> = (0..n)
            .map(|i| columns.iter().map(|c| c[i].clone()).collect())
            .collect();
        let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        RawTable::from_strings(&headers, &rows).unwrap()
    }

    fn numbers(n: usize, f: impl Fn(usize) -> f64) -> Vec<String> {
        (0..n).map(|i| f(i).to_string()).collect()
    }

    #[test]
    fn name_similarity_levels() {
        let aliases = ColumnRole::Sales.aliases();
        assert_eq!(name_score("sales", aliases), 1.0);
        assert_eq!(name_score("net_sales", aliases), 0.8);
        assert_eq!(name_score("grossrevenue", aliases), 0.6);
        assert_eq!(name_score("customer", aliases), 0.0);
    }

    #[test]
    fn detects_named_columns() {
        let n = 40;
        let t = table(
            &["Order Date", "Product", "Region", "Revenue", "Notes"],
            vec![
                days(n),
                (0..n).map(|i| format!("P{}", i % 3)).collect(),
                (0..n).map(|_| "north".to_string()).collect(),
                numbers(n, |i| 100.0 + i as f64),
                (0..n).map(|_| "ok".to_string()).collect(),
            ],
        );

        let schema = SchemaDetector::default().detect(&t).unwrap();
        let columns = schema.columns();
        assert_eq!(columns.date, "Order Date");
        assert_eq!(columns.sales, "Revenue");
        assert_eq!(columns.product.as_deref(), Some("Product"));
        assert_eq!(columns.region.as_deref(), Some("Region"));
        assert_eq!(columns.customer, None);
        assert_eq!(columns.other, vec!["Notes".to_string()]);
        assert!(schema.report().is_valid);
        assert_relative_eq!(schema.report().quality_score, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn ties_go_to_leftmost_column() {
        let n = 35;
        let t = table(
            &["date", "sales", "sales"],
            vec![days(n), numbers(n, |_| 1.0), numbers(n, |_| 2.0)],
        );
        let detector = SchemaDetector::default();
        let schema = detector.detect(&t).unwrap();
        let records = schema.records(&t);
        assert_eq!(records[0].sales, 1.0);
    }

    #[test]
    fn unit_price_does_not_shadow_line_total() {
        let n = 40;
        let t = table(
            &["date", "product", "price", "quantity", "total"],
            vec![
                days(n),
                (0..n).map(|i| format!("P{}", i % 2)).collect(),
                numbers(n, |_| 5.0),
                numbers(n, |_| 20.0),
                numbers(n, |_| 100.0),
            ],
        );
        let schema = SchemaDetector::default().detect(&t).unwrap();
        let columns = schema.columns();
        assert_eq!(columns.sales, "total");
        assert_eq!(columns.quantity.as_deref(), Some("quantity"));
        assert!(columns.other.contains(&"price".to_string()));

        let total: f64 = schema.records(&t).iter().map(|r| r.sales).sum();
        assert_relative_eq!(total, 4000.0, epsilon = 1e-9);
    }

    #[test]
    fn falls_back_to_first_numeric_column() {
        let n = 35;
        let t = table(
            &["when", "figure"],
            vec![days(n), numbers(n, |i| i as f64)],
        );
        let schema = SchemaDetector::default().detect(&t).unwrap();
        assert_eq!(schema.columns().date, "when");
        assert_eq!(schema.columns().sales, "figure");
    }

    #[test]
    fn role_named_columns_are_not_sales_fallbacks() {
        let n = 35;
        let t = table(
            &["date", "product_id"],
            vec![days(n), numbers(n, |i| i as f64)],
        );
        let err = SchemaDetector::default().detect(&t).unwrap_err();
        assert!(matches!(err, AnalysisError::SchemaUnresolved { .. }));
    }

    #[test]
    fn missing_date_column_is_unresolved() {
        let n = 20;
        let t = table(
            &["label", "sales"],
            vec![
                (0..n).map(|i| format!("row {i}")).collect(),
                numbers(n, |_| 5.0),
            ],
        );

        match SchemaDetector::default().detect(&t) {
            Err(AnalysisError::SchemaUnresolved { report }) => {
                assert!(!report.is_valid);
                assert!(!report.issues.is_empty());
                assert_eq!(report.confidence, 0.0);
            }
            other => panic!("expected SchemaUnresolved, got {other:?}"),
        }
    }

    #[test]
    fn date_column_needs_ninety_percent_parseable() {
        let n = 20;
        let mut raw_dates = days(n);
        for d in raw_dates.iter_mut().take(3) {
            *d = "unknown".to_string();
        }
        let t = table(&["date", "sales"], vec![raw_dates, numbers(n, |_| 5.0)]);
        assert!(SchemaDetector::default().detect(&t).is_err());

        let relaxed = SchemaDetector::new(SchemaConfig::default().with_type_ratio_threshold(0.8));
        assert!(relaxed.detect(&t).is_ok());
    }

    #[test]
    fn low_parse_ratio_is_an_issue() {
        let n = 20;
        let mut sales = numbers(n, |_| 5.0);
        for s in sales.iter_mut().take(12) {
            *s = String::new();
        }
        let t = table(&["date", "sales"], vec![days(n), sales]);

        match SchemaDetector::default().detect(&t) {
            Err(AnalysisError::SchemaUnresolved { report }) => {
                assert!(report.issues[0].contains("40%"));
                assert!(report.quality_score > 0.0);
            }
            other => panic!("expected SchemaUnresolved, got {other:?}"),
        }
    }

    #[test]
    fn warnings_lower_confidence() {
        let n = 10;
        let mut sales = numbers(n, |_| 5.0);
        sales[2] = "-3".to_string();
        let t = table(&["date", "sales"], vec![days(n), sales]);

        let schema = SchemaDetector::default().detect(&t).unwrap();
        let report = schema.report();
        assert!(report.is_valid);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("negative values")));
        assert!(report.warnings.iter().any(|w| w.contains("Limited historical data")));
        assert!(report.confidence < report.quality_score);
    }

    #[test]
    fn duplicate_dates_reduce_quality() {
        let mut dates = days(40);
        dates.extend(days(10));
        let t = table(&["date", "sales"], vec![dates, numbers(50, |_| 1.0)]);

        let schema = SchemaDetector::default().detect(&t).unwrap();
        assert!(schema.report().quality_score < 1.0);
        assert!(schema
            .report()
            .warnings
            .iter()
            .any(|w| w.starts_with("10 rows share a date")));
    }

    #[test]
    fn records_carry_optional_fields() {
        let t = RawTable::from_strings(
            &["date", "sales", "sku", "qty", "cost"],
            &[
                vec!["2024-01-01", "10", "A", "2", "4"],
                vec!["2024-01-02", "oops", "B", "1", "1"],
                vec!["2024-01-03", "12", "", "3", ""],
            ],
        )
        .unwrap();
        let detector = SchemaDetector::new(SchemaConfig::default().with_type_ratio_threshold(0.6));
        let schema = detector.detect(&t).unwrap();
        let records = schema.records(&t);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].product.as_deref(), Some("A"));
        assert_eq!(records[0].quantity, Some(2.0));
        assert_eq!(records[0].cost, Some(4.0));
        assert_eq!(records[1].product, None);
        assert_eq!(records[1].cost, None);
    }

    #[test]
    fn detection_is_deterministic() {
        let n = 45;
        let t = table(
            &["date", "amount", "customer"],
            vec![
                days(n),
                numbers(n, |i| (i * 7 % 13) as f64),
                (0..n).map(|i| format!("c{}", i % 4)).collect(),
            ],
        );
        let detector = SchemaDetector::default();
        assert_eq!(detector.detect(&t), detector.detect(&t));
    }
}
