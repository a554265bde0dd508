use super::classify::{MetricSummary, classify_selection};
use super::model::Table;
use super::select::{MetricSelection, SegmentSelection};
use super::stats::{
    ColumnStats, CorrelationMatrix, Distribution, LabelValue, SegmentMeans, correlation,
    describe, distribution, group_means, label_means,
};
use crate::config::DashboardConfig;

/// Bars for one metric chart.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricBars {
    pub metric: String,
    pub bars: Vec<LabelValue>,
}

/// Every derived view of the loaded table. Rebuilt in one pass whenever the
/// table or a selection changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub summary: Vec<ColumnStats>,
    pub correlation: CorrelationMatrix,
    pub segments: Vec<SegmentMeans>,
    pub ratings: Option<(String, Distribution)>,
    pub metric_bars: Vec<MetricBars>,
    pub results: Vec<MetricSummary>,
}

impl Report {
    pub fn build(
        table: &Table,
        metrics: &MetricSelection,
        segments: &SegmentSelection,
        ratings_column: Option<&str>,
        config: &DashboardConfig,
    ) -> Self {
        let ratings = ratings_column
            .and_then(|name| table.column(name))
            .map(|col| {
                (
                    col.name.clone(),
                    distribution(col, config.max_histogram_bins, config.kde_points),
                )
            });

        let metric_bars = metrics
            .names()
            .iter()
            .filter_map(|metric| {
                let bars = label_means(table, &config.label_column, metric)?;
                Some(MetricBars {
                    metric: metric.clone(),
                    bars,
                })
            })
            .collect();

        Report {
            summary: describe(table),
            correlation: correlation(table),
            segments: segments
                .names()
                .iter()
                .filter_map(|s| group_means(table, s))
                .collect(),
            ratings,
            metric_bars,
            results: classify_selection(table, metrics),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::classify::Verdict;
    use crate::data::loader::load_csv_bytes;

    #[test]
    fn report_covers_every_selection() {
        let table = load_csv_bytes(
            b"Employee,Department,Task Completion,Quality Score\n\
              AMAL,Sales,80,60\nEMAD,IT,90,65\nOSAMA,Sales,85,70\nFARAH,IT,88,68\n",
        )
        .unwrap();
        let config = DashboardConfig::default();
        let metrics = MetricSelection::resolve(&table, &config.metric_candidates);
        let segments = SegmentSelection::resolve(&table, &config.segment_candidates);

        let report = Report::build(&table, &metrics, &segments, Some("Task Completion"), &config);

        assert_eq!(report.summary.len(), 2);
        assert_eq!(report.segments.len(), 1);
        assert_eq!(report.metric_bars.len(), 2);
        assert_eq!(report.metric_bars[0].bars.len(), 4);
        assert!(matches!(report.ratings, Some((_, Distribution::Numeric { .. }))));

        let verdicts: Vec<_> = report.results.iter().map(|r| r.verdict()).collect();
        assert_eq!(verdicts, vec![Some(Verdict::Good), Some(Verdict::NeedsImprovement)]);
    }

    #[test]
    fn missing_ratings_column_yields_no_distribution() {
        let table = load_csv_bytes(b"Employee\nAMAL\n").unwrap();
        let report = Report::build(
            &table,
            &MetricSelection::default(),
            &SegmentSelection::default(),
            Some("Rating"),
            &DashboardConfig::default(),
        );
        assert!(report.ratings.is_none());
        assert!(report.results.is_empty());
        assert!(report.correlation.is_empty());
    }
}
