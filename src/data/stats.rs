use std::collections::{BTreeMap, HashMap};

use super::classify::mean;
use super::model::{CellValue, Column, Table};

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// `describe()` row set for one numeric column. All statistics are `None`
/// when the column has no valid value.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (ddof = 1).
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnStats {
    pub fn from_column(column: &Column) -> Self {
        let mut values = column.valid_numbers();
        values.sort_by(f64::total_cmp);

        ColumnStats {
            name: column.name.clone(),
            count: values.len(),
            mean: mean(&values),
            std: sample_std(&values),
            min: values.first().copied(),
            q25: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q75: quantile(&values, 0.75),
            max: values.last().copied(),
        }
    }

    /// Row labels and values in the usual `describe` order.
    pub fn rows(&self) -> [(&'static str, Option<f64>); 8] {
        [
            ("count", Some(self.count as f64)),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.median),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }
}

/// Summary statistics of every numeric column, in table order.
pub fn describe(table: &Table) -> Vec<ColumnStats> {
    table.numeric_columns().map(ColumnStats::from_column).collect()
}

fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - avg).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Linear-interpolated quantile of an ascending slice.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pearson correlation between every pair of numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `columns.len()` squared entries.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == row)?;
        let j = self.columns.iter().position(|c| c == col)?;
        self.values[i][j]
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Correlation over pairwise-complete rows, like `DataFrame.corr()`.
pub fn correlation(table: &Table) -> CorrelationMatrix {
    let numeric: Vec<&Column> = table.numeric_columns().collect();
    let series: Vec<Vec<Option<f64>>> = numeric.iter().map(|c| c.numeric_values()).collect();

    let values = series
        .iter()
        .map(|a| series.iter().map(|b| pearson(a, b)).collect())
        .collect();

    CorrelationMatrix {
        columns: numeric.iter().map(|c| c.name.clone()).collect(),
        values,
    }
}

fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    let r = sxy / (sxx * syy).sqrt();
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

// ---------------------------------------------------------------------------
// Distributions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` ascending bin edges; the last bin is closed.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.get(1)) {
            (Some(a), Some(b)) => b - a,
            _ => 0.0,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Bin the finite values using numpy's `"auto"` rule: the narrower of the
/// Sturges and Freedman–Diaconis widths, capped at `max_bins` bins.
pub fn histogram(values: &[f64], max_bins: usize) -> Option<Histogram> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let min = sorted[0];
    let max = sorted[n - 1];
    let range = max - min;
    if !range.is_finite() {
        return None;
    }

    if range == 0.0 {
        return Some(Histogram {
            edges: vec![min - 0.5, min + 0.5],
            counts: vec![n],
        });
    }

    let sturges = range / ((n as f64).log2() + 1.0);
    let iqr = quantile(&sorted, 0.75).unwrap_or(max) - quantile(&sorted, 0.25).unwrap_or(min);
    let fd = 2.0 * iqr / (n as f64).cbrt();
    let width = if fd > 0.0 { fd.min(sturges) } else { sturges };

    let bins = ((range / width).ceil() as usize).clamp(1, max_bins.max(1));
    let step = range / bins as f64;

    let edges = (0..=bins).map(|i| min + step * i as f64).collect();
    let mut counts = vec![0usize; bins];
    for v in &sorted {
        let idx = (((v - min) / range) * bins as f64) as usize;
        counts[idx.min(bins - 1)] += 1;
    }

    Some(Histogram { edges, counts })
}

/// Gaussian kernel density estimate with Scott's bandwidth, sampled at
/// `points` positions across the data range and multiplied by `scale`
/// (use `n * bin_width` to overlay a count histogram).
pub fn kde_curve(values: &[f64], points: usize, scale: f64) -> Option<Vec<[f64; 2]>> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let std = sample_std(&finite)?;
    if std == 0.0 || points < 2 {
        return None;
    }

    let n = finite.len() as f64;
    let bandwidth = std * n.powf(-0.2);
    let norm = n * bandwidth * (2.0 * std::f64::consts::PI).sqrt();

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (max - min) / (points - 1) as f64;

    let curve = (0..points)
        .map(|i| {
            let x = min + step * i as f64;
            let density: f64 = finite
                .iter()
                .map(|xi| (-0.5 * ((x - xi) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                / norm;
            [x, density * scale]
        })
        .collect();
    Some(curve)
}

/// Occurrences of each non-missing value, in order of first appearance.
pub fn value_counts(column: &Column) -> Vec<(CellValue, usize)> {
    let mut counts: Vec<(CellValue, usize)> = Vec::new();
    let mut slot: HashMap<&CellValue, usize> = HashMap::new();

    for value in column.values.iter().filter(|v| !v.is_null()) {
        match slot.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                slot.insert(value, counts.len());
                counts.push((value.clone(), 1));
            }
        }
    }
    counts
}

/// How the ratings column is drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum Distribution {
    Numeric {
        histogram: Histogram,
        kde: Option<Vec<[f64; 2]>>,
    },
    Categorical(Vec<(CellValue, usize)>),
    Empty,
}

pub fn distribution(column: &Column, max_bins: usize, kde_points: usize) -> Distribution {
    if column.is_numeric() {
        let values = column.valid_numbers();
        match histogram(&values, max_bins) {
            Some(histogram) => {
                let scale = histogram.total() as f64 * histogram.bin_width();
                let kde = kde_curve(&values, kde_points, scale);
                Distribution::Numeric { histogram, kde }
            }
            None => Distribution::Empty,
        }
    } else {
        let counts = value_counts(column);
        if counts.is_empty() {
            Distribution::Empty
        } else {
            Distribution::Categorical(counts)
        }
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct GroupRow {
    pub key: CellValue,
    pub count: usize,
    /// One entry per `SegmentMeans::value_columns`.
    pub means: Vec<Option<f64>>,
}

/// `df.groupby(segment).mean()` over the numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentMeans {
    pub segment: String,
    pub value_columns: Vec<String>,
    pub groups: Vec<GroupRow>,
}

/// Groups are sorted by key; rows whose key is missing are dropped.
/// `None` when `segment` is not a column.
pub fn group_means(table: &Table, segment: &str) -> Option<SegmentMeans> {
    let key_column = table.column(segment)?;

    let mut rows_by_key: BTreeMap<&CellValue, Vec<usize>> = BTreeMap::new();
    for (row, key) in key_column.values.iter().enumerate() {
        if !key.is_null() {
            rows_by_key.entry(key).or_default().push(row);
        }
    }

    let value_columns: Vec<&Column> = table
        .numeric_columns()
        .filter(|c| c.name != segment)
        .collect();
    let series: Vec<Vec<Option<f64>>> = value_columns.iter().map(|c| c.numeric_values()).collect();

    let groups = rows_by_key
        .into_iter()
        .map(|(key, rows)| {
            let means = series
                .iter()
                .map(|values| {
                    let picked: Vec<f64> = rows.iter().filter_map(|&r| values[r]).collect();
                    mean(&picked)
                })
                .collect();
            GroupRow {
                key: key.clone(),
                count: rows.len(),
                means,
            }
        })
        .collect();

    Some(SegmentMeans {
        segment: segment.to_string(),
        value_columns: value_columns.iter().map(|c| c.name.clone()).collect(),
        groups,
    })
}

/// One bar of a per-employee metric chart.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelValue {
    pub label: String,
    pub value: Option<f64>,
}

/// Mean of `metric` per label, labels in first-appearance order. Rows are
/// labelled by position when `label_column` is absent; rows with a missing
/// label are skipped. `None` when `metric` is not a numeric column.
pub fn label_means(table: &Table, label_column: &str, metric: &str) -> Option<Vec<LabelValue>> {
    let metric_col = table.column(metric).filter(|c| c.is_numeric())?;
    let values = metric_col.numeric_values();
    let labels: Vec<CellValue> = match table.column(label_column) {
        Some(col) => col.values.clone(),
        None => (0..table.len() as i64).map(CellValue::Integer).collect(),
    };

    let mut order: Vec<(CellValue, Vec<f64>)> = Vec::new();
    let mut slot: HashMap<CellValue, usize> = HashMap::new();
    for (label, value) in labels.into_iter().zip(values) {
        if label.is_null() {
            continue;
        }
        let i = *slot.entry(label.clone()).or_insert_with(|| {
            order.push((label, Vec::new()));
            order.len() - 1
        });
        if let Some(v) = value {
            order[i].1.push(v);
        }
    }

    Some(
        order
            .into_iter()
            .map(|(label, vals)| LabelValue {
                label: label.label(),
                value: mean(&vals),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_bytes;

    const DATA: &str = "Employee,Department,Task Completion,Quality Score\n\
                        AMAL,Sales,80,75\n\
                        EMAD,IT,90,82\n\
                        OSAMA,Sales,85,78\n\
                        FARAH,IT,88,80\n";

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn describe_reports_count_mean_std_and_quartiles() {
        let table = load_csv_bytes(DATA.as_bytes()).unwrap();
        let stats = describe(&table);
        assert_eq!(stats.len(), 2);

        let task = &stats[0];
        assert_eq!(task.name, "Task Completion");
        assert_eq!(task.count, 4);
        assert_eq!(task.mean, Some(85.75));
        assert_eq!(task.min, Some(80.0));
        assert_eq!(task.q25, Some(83.75));
        assert_eq!(task.median, Some(86.5));
        assert_eq!(task.q75, Some(88.5));
        assert_eq!(task.max, Some(90.0));
        assert!(close(task.std.unwrap(), 4.349_329_450_233_296));
    }

    #[test]
    fn single_value_has_no_std() {
        let table = load_csv_bytes(b"Score\n5\n").unwrap();
        let stats = describe(&table);
        assert_eq!(stats[0].std, None);
        assert_eq!(stats[0].median, Some(5.0));
    }

    #[test]
    fn correlation_is_symmetric_with_unit_diagonal() {
        let table = load_csv_bytes(DATA.as_bytes()).unwrap();
        let corr = correlation(&table);
        assert_eq!(corr.columns, vec!["Task Completion", "Quality Score"]);

        let r = corr.get("Task Completion", "Quality Score").unwrap();
        assert!(close(r, corr.get("Quality Score", "Task Completion").unwrap()));
        assert!(r > 0.9 && r <= 1.0);
        assert!(close(corr.get("Quality Score", "Quality Score").unwrap(), 1.0));
    }

    #[test]
    fn constant_column_has_undefined_correlation() {
        let table = load_csv_bytes(b"a,b\n1,5\n2,5\n3,5\n").unwrap();
        let corr = correlation(&table);
        assert_eq!(corr.get("a", "b"), None);
    }

    #[test]
    fn histogram_counts_every_value() {
        let values = [80.0, 90.0, 85.0, 88.0, 70.0, 95.0, 60.0];
        let hist = histogram(&values, 50).unwrap();
        assert_eq!(hist.total(), values.len());
        assert_eq!(hist.edges.len(), hist.counts.len() + 1);
        assert_eq!(hist.edges[0], 60.0);
        assert!(close(*hist.edges.last().unwrap(), 95.0));
    }

    #[test]
    fn constant_series_gets_one_unit_bin() {
        let hist = histogram(&[7.0, 7.0], 50).unwrap();
        assert_eq!(hist.edges, vec![6.5, 7.5]);
        assert_eq!(hist.counts, vec![2]);
        assert!(histogram(&[], 50).is_none());
    }

    #[test]
    fn histogram_respects_bin_cap() {
        let values: Vec<f64> = (0..1000).map(|i| i as f64).collect();
        let hist = histogram(&values, 5).unwrap();
        assert_eq!(hist.counts.len(), 5);
        assert_eq!(hist.total(), 1000);
    }

    #[test]
    fn histogram_rejects_unrepresentable_span() {
        assert!(histogram(&[-1e308, 1e308], 50).is_none());
        assert!(histogram(&[-1e307, 1e307], 50).is_some());
    }

    #[test]
    fn kde_needs_spread() {
        assert!(kde_curve(&[1.0, 1.0, 1.0], 10, 1.0).is_none());
        let curve = kde_curve(&[1.0, 2.0, 3.0], 10, 1.0).unwrap();
        assert_eq!(curve.len(), 10);
        assert_eq!(curve[0][0], 1.0);
        assert!(curve.iter().all(|p| p[1] > 0.0));
    }

    #[test]
    fn categorical_distribution_counts_in_appearance_order() {
        let table = load_csv_bytes(DATA.as_bytes()).unwrap();
        let dist = distribution(table.column("Department").unwrap(), 50, 100);
        assert_eq!(
            dist,
            Distribution::Categorical(vec![
                (CellValue::Text("Sales".into()), 2),
                (CellValue::Text("IT".into()), 2),
            ])
        );
    }

    #[test]
    fn group_means_sorted_by_segment() {
        let table = load_csv_bytes(DATA.as_bytes()).unwrap();
        let seg = group_means(&table, "Department").unwrap();
        assert_eq!(seg.value_columns, vec!["Task Completion", "Quality Score"]);
        assert_eq!(seg.groups.len(), 2);
        assert_eq!(seg.groups[0].key, CellValue::Text("IT".into()));
        assert_eq!(seg.groups[0].means, vec![Some(89.0), Some(81.0)]);
        assert_eq!(seg.groups[1].means, vec![Some(82.5), Some(76.5)]);
        assert!(group_means(&table, "Gender").is_none());
    }

    #[test]
    fn label_means_average_duplicates() {
        let table = load_csv_bytes(b"Employee,Attendance\nAMAL,90\nEMAD,80\nAMAL,100\n").unwrap();
        let bars = label_means(&table, "Employee", "Attendance").unwrap();
        assert_eq!(
            bars,
            vec![
                LabelValue { label: "AMAL".into(), value: Some(95.0) },
                LabelValue { label: "EMAD".into(), value: Some(80.0) },
            ]
        );
    }

    #[test]
    fn close_float_labels_stay_apart() {
        let table = load_csv_bytes(b"Employee,Attendance\n1.001,90\n1.002,80\n").unwrap();
        let bars = label_means(&table, "Employee", "Attendance").unwrap();
        assert_eq!(
            bars,
            vec![
                LabelValue { label: "1.001".into(), value: Some(90.0) },
                LabelValue { label: "1.002".into(), value: Some(80.0) },
            ]
        );
    }

    #[test]
    fn label_means_fall_back_to_row_positions() {
        let table = load_csv_bytes(b"Attendance\n90\n80\n").unwrap();
        let bars = label_means(&table, "Employee", "Attendance").unwrap();
        assert_eq!(bars[1].label, "1");
        assert!(label_means(&table, "Employee", "Bonus").is_none());
    }
}
