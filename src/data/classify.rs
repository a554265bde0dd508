use std::fmt;

use super::model::{Column, Table};
use super::select::MetricSelection;

/// Column averages at or above this are rated good.
pub const GOOD_PERFORMANCE_THRESHOLD: f64 = 75.0;

// ---------------------------------------------------------------------------
// Verdicts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Good,
    NeedsImprovement,
}

impl Verdict {
    pub fn from_average(average: f64) -> Self {
        if average >= GOOD_PERFORMANCE_THRESHOLD {
            Verdict::Good
        } else {
            Verdict::NeedsImprovement
        }
    }

    pub fn is_good(self) -> bool {
        self == Verdict::Good
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Good => f.write_str("Good Performance"),
            Verdict::NeedsImprovement => f.write_str("Needs Improvement"),
        }
    }
}

/// What the summary can say about one metric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricOutcome {
    Rated { average: f64, verdict: Verdict },
    /// The column has no valid numeric value to average.
    NoData,
    /// Text or boolean column; averaging is meaningless.
    NotNumeric,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricSummary {
    pub metric: String,
    pub outcome: MetricOutcome,
}

impl MetricSummary {
    pub fn verdict(&self) -> Option<Verdict> {
        match self.outcome {
            MetricOutcome::Rated { verdict, .. } => Some(verdict),
            _ => None,
        }
    }

    pub fn average(&self) -> Option<f64> {
        match self.outcome {
            MetricOutcome::Rated { average, .. } => Some(average),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Mean of the non-missing values, or `None` when there are none.
pub fn column_mean(column: &Column) -> Option<f64> {
    mean(&column.valid_numbers())
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    (!avg.is_nan()).then_some(avg)
}

/// `None` when the table has no such column.
pub fn classify_metric(table: &Table, name: &str) -> Option<MetricSummary> {
    let column = table.column(name)?;
    let outcome = if column.is_empty() {
        MetricOutcome::NoData
    } else if !column.is_numeric() {
        MetricOutcome::NotNumeric
    } else {
        match column_mean(column) {
            Some(average) => MetricOutcome::Rated {
                average,
                verdict: Verdict::from_average(average),
            },
            None => MetricOutcome::NoData,
        }
    };
    Some(MetricSummary {
        metric: name.to_string(),
        outcome,
    })
}

/// One summary per selected metric that exists in `table`, in selection order.
pub fn classify_selection(table: &Table, selection: &MetricSelection) -> Vec<MetricSummary> {
    selection
        .names()
        .iter()
        .filter_map(|name| classify_metric(table, name))
        .collect()
}
