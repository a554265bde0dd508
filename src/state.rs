use std::path::Path;

use anyhow::{Context, Result};

use crate::config::DashboardConfig;
use crate::data::error::TableError;
use crate::data::export::{self, ExportFormat};
use crate::data::feedback::{FeedbackEntry, employee_labels};
use crate::data::loader::load_file;
use crate::data::model::{CellValue, Column, Table};
use crate::data::report::Report;
use crate::data::select::{MetricSelection, SegmentSelection};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Everything one dashboard session knows, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded table (None until the user loads a file).
    pub table: Option<Table>,

    /// File name or "example data", shown in the top bar.
    pub source_name: Option<String>,

    pub metrics: MetricSelection,
    pub segments: SegmentSelection,

    /// Column drawn in the distribution histogram.
    pub ratings_column: Option<String>,

    pub show_summary: bool,
    pub show_correlation: bool,
    pub show_help: bool,

    /// Distinct employee labels for the feedback picker (cached).
    pub employees: Vec<String>,
    pub feedback_employee: Option<String>,
    pub feedback_draft: String,
    pub submitted_feedback: Option<FeedbackEntry>,

    /// Derived views of the current table and selections (cached).
    pub report: Option<Report>,
    /// Bumped on every report rebuild.
    pub report_generation: u64,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            table: None,
            source_name: None,
            metrics: MetricSelection::default(),
            segments: SegmentSelection::default(),
            ratings_column: None,
            show_summary: false,
            show_correlation: false,
            show_help: false,
            employees: Vec::new(),
            feedback_employee: None,
            feedback_draft: String::new(),
            submitted_feedback: None,
            report: None,
            report_generation: 0,
            status_message: None,
        }
    }

    /// Ingest a newly loaded table: default selections, then one recompute.
    pub fn set_table(&mut self, table: Table, source: impl Into<String>) {
        self.install_table(table, source);
        self.refresh();
    }

    /// Swap in `table` with default selections, without recomputing.
    fn install_table(&mut self, table: Table, source: impl Into<String>) {
        self.metrics = MetricSelection::resolve(&table, &self.config.metric_candidates);
        self.segments = SegmentSelection::resolve(&table, &self.config.segment_candidates);
        self.ratings_column = table.column_names().into_iter().next();

        self.employees = employee_labels(&table, &self.config.label_column);
        self.feedback_employee = self.employees.first().cloned();
        self.feedback_draft.clear();
        self.submitted_feedback = None;

        self.table = Some(table);
        self.source_name = Some(source.into());
        self.status_message = None;
    }

    /// Load a file from disk. On failure the current table is kept.
    pub fn load_path(&mut self, path: &Path) -> Result<()> {
        let table =
            load_file(path).with_context(|| format!("loading {}", path.display()))?;
        log::info!(
            "Loaded {} rows with columns {:?}",
            table.len(),
            table.column_names()
        );
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.set_table(table, name);
        Ok(())
    }

    /// Load the built-in four-employee sample and show every view.
    pub fn load_example(&mut self) {
        let table = match example_table() {
            Ok(table) => table,
            Err(e) => {
                log::error!("Failed to build example data: {e}");
                self.status_message = Some(format!("Error: {e}"));
                return;
            }
        };
        log::info!("Using example data ({} rows)", table.len());

        let segments = SegmentSelection::from_user(&table, &[self.config.label_column.as_str()]);
        self.install_table(table, "example data");
        self.segments = segments;
        self.ratings_column = self.metrics.names().first().cloned();
        self.show_summary = true;
        self.show_correlation = true;
        self.refresh();
    }

    /// Rebuild every derived view.
    pub fn refresh(&mut self) {
        self.report_generation += 1;
        self.report = self.table.as_ref().map(|table| {
            log::debug!(
                "Recomputing report #{}: metrics {:?}, segments {:?}",
                self.report_generation,
                self.metrics.names(),
                self.segments.names()
            );
            Report::build(
                table,
                &self.metrics,
                &self.segments,
                self.ratings_column.as_deref(),
                &self.config,
            )
        });
    }

    pub fn toggle_metric(&mut self, name: &str) {
        if let Some(table) = &self.table {
            if self.metrics.toggle(table, name) {
                self.refresh();
            }
        }
    }

    pub fn toggle_segment(&mut self, name: &str) {
        if let Some(table) = &self.table {
            if self.segments.toggle(table, name) {
                self.refresh();
            }
        }
    }

    /// Ignored unless `name` is a column of the current table.
    pub fn set_ratings_column(&mut self, name: &str) {
        let known = self.table.as_ref().is_some_and(|t| t.has_column(name));
        if known && self.ratings_column.as_deref() != Some(name) {
            self.ratings_column = Some(name.to_string());
            self.refresh();
        }
    }

    pub fn set_feedback_employee(&mut self, name: &str) {
        if self.employees.iter().any(|e| e == name) {
            self.feedback_employee = Some(name.to_string());
        }
    }

    /// Echo the draft for the selected employee. Nothing is stored beyond
    /// the last submitted entry.
    pub fn submit_feedback(&mut self) -> Option<&FeedbackEntry> {
        let employee = self.feedback_employee.clone()?;
        let entry = FeedbackEntry::new(employee, self.feedback_draft.clone());
        log::info!("Feedback submitted for {}", entry.employee);
        self.submitted_feedback = Some(entry);
        self.submitted_feedback.as_ref()
    }

    /// Write the current table to `path` in `format`.
    pub fn export_to(&self, path: &Path, format: ExportFormat) -> Result<()> {
        let table = self.table.as_ref().context("no data loaded")?;
        export::save(table, format, path)
            .with_context(|| format!("exporting {} to {}", format.label(), path.display()))?;
        log::info!("Exported {} rows as {} to {}", table.len(), format.label(), path.display());
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Example data
// ---------------------------------------------------------------------------

/// The sample team offered before any upload.
pub fn example_table() -> Result<Table, TableError> {
    fn ints(values: [i64; 4]) -> Vec<CellValue> {
        values.into_iter().map(CellValue::Integer).collect()
    }

    let employees = ["AMAL", "EMAD", "OSAMA", "FARAH"]
        .into_iter()
        .map(|e| CellValue::Text(e.to_string()))
        .collect();

    let columns = vec![
        Column::from_cells("Employee", employees),
        Column::from_cells("Task Completion", ints([80, 90, 85, 88])),
        Column::from_cells("Quality Score", ints([75, 82, 78, 80])),
        Column::from_cells("Attendance", ints([95, 90, 93, 92])),
        Column::from_cells("Engagement Score", ints([70, 85, 80, 75])),
    ];
    Table::new(columns)
}
