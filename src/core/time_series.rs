//! Daily sales series with one value per calendar day.

use crate::error::{AnalysisError, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Policy for days inside the observed range that have no observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapFill {
    /// A day without records is a day without sales.
    #[default]
    ZeroFill,
    /// Repeat the previous day's value.
    ForwardFill,
}

/// A contiguous daily series, sorted ascending, one entry per date.
///
/// Duplicate dates are summed during construction and gaps are filled
/// according to [`GapFill`], so `dates[i + 1] == dates[i] + 1 day` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
    filled_days: usize,
}

impl DailySeries {
    /// Build a series from unordered `(date, value)` observations.
    pub fn from_observations<I>(observations: I, gap_fill: GapFill) -> Result<Self>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let totals = aggregate(observations)?;
        let (first, last) = match (totals.keys().next(), totals.keys().next_back()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return Err(AnalysisError::EmptyData),
        };
        Ok(Self::fill(&totals, first, last, gap_fill))
    }

    /// Build a series over an explicit date range.
    ///
    /// Observations outside `[start, end]` are ignored; days inside the range
    /// without an observation are filled, including leading and trailing days.
    pub fn from_observations_in_range<I>(
        observations: I,
        start: NaiveDate,
        end: NaiveDate,
        gap_fill: GapFill,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        if end < start {
            return Err(AnalysisError::InvalidParameter(format!(
                "range end {end} precedes start {start}"
            )));
        }
        let totals: BTreeMap<NaiveDate, f64> = aggregate(observations)?
            .into_iter()
            .filter(|(d, _)| *d >= start && *d <= end)
            .collect();
        Ok(Self::fill(&totals, start, end, gap_fill))
    }

    /// Create a series from contiguous values starting at `start`.
    pub fn from_values(start: NaiveDate, values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(AnalysisError::EmptyData);
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(AnalysisError::InvalidParameter(
                "series values must be finite".to_string(),
            ));
        }
        let dates = (0..values.len())
            .map(|i| start + Duration::days(i as i64))
            .collect();
        Ok(Self {
            dates,
            values,
            filled_days: 0,
        })
    }

    fn fill(
        totals: &BTreeMap<NaiveDate, f64>,
        start: NaiveDate,
        end: NaiveDate,
        gap_fill: GapFill,
    ) -> Self {
        let days = (end - start).num_days() as usize + 1;
        let mut dates = Vec::with_capacity(days);
        let mut values = Vec::with_capacity(days);
        let mut filled_days = 0;
        let mut previous = 0.0;

        for offset in 0..days {
            let date = start + Duration::days(offset as i64);
            let value = match totals.get(&date) {
                Some(&v) => v,
                None => {
                    filled_days += 1;
                    match gap_fill {
                        GapFill::ZeroFill => 0.0,
                        GapFill::ForwardFill => previous,
                    }
                }
            };
            previous = value;
            dates.push(date);
            values.push(value);
        }

        Self {
            dates,
            values,
            filled_days,
        }
    }

    /// Number of days.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of days that were filled by the gap policy.
    pub fn filled_days(&self) -> usize {
        self.filled_days
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Calendar days between first and last date.
    pub fn span_days(&self) -> i64 {
        match (self.first_date(), self.last_date()) {
            (Some(first), Some(last)) => (last - first).num_days(),
            _ => 0,
        }
    }

    /// Split into the first `len - holdout` days and the final `holdout` days.
    pub fn split_holdout(&self, holdout: usize) -> Result<(DailySeries, DailySeries)> {
        if holdout == 0 || holdout >= self.len() {
            return Err(AnalysisError::InvalidParameter(format!(
                "holdout of {holdout} days does not fit a series of {} days",
                self.len()
            )));
        }
        let cut = self.len() - holdout;
        let head = DailySeries {
            dates: self.dates[..cut].to_vec(),
            values: self.values[..cut].to_vec(),
            filled_days: 0,
        };
        let tail = DailySeries {
            dates: self.dates[cut..].to_vec(),
            values: self.values[cut..].to_vec(),
            filled_days: 0,
        };
        Ok((head, tail))
    }

    /// Dates of the `horizon` days following the last observation.
    pub fn future_dates(&self, horizon: usize) -> Vec<NaiveDate> {
        match self.last_date() {
            Some(last) => (1..=horizon)
                .map(|h| last + Duration::days(h as i64))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Iterate over `(date, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

/// Whether the date falls on Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn aggregate<I>(observations: I) -> Result<BTreeMap<NaiveDate, f64>>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (date, value) in observations {
        if !value.is_finite() {
            return Err(AnalysisError::InvalidParameter(format!(
                "non-finite value on {date}"
            )));
        }
        *totals.entry(date).or_insert(0.0) += value;
    }
    Ok(totals)
}
