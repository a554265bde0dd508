use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::color::verdict_color;
use crate::data::classify::{MetricOutcome, MetricSummary};
use crate::data::feedback::FeedbackEntry;
use crate::data::model::Table;
use crate::data::stats::{ColumnStats, SegmentMeans};

fn fmt_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "NaN".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Data preview
// ---------------------------------------------------------------------------

/// First `rows` rows with a positional index, like `df.head()`.
pub fn data_preview(ui: &mut Ui, table: &Table, rows: usize) {
    let shown = rows.min(table.len());

    egui::ScrollArea::horizontal()
        .id_salt("data_preview_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .id_salt("data_preview")
                .striped(true)
                .vscroll(false)
                .column(TableColumn::auto().at_least(32.0))
                .columns(TableColumn::auto().at_least(64.0), table.n_columns())
                .header(20.0, |mut header| {
                    header.col(|ui| {
                        ui.label("");
                    });
                    for col in table.columns() {
                        header.col(|ui| {
                            ui.strong(&col.name);
                        });
                    }
                })
                .body(|mut body| {
                    for r in 0..shown {
                        body.row(18.0, |mut row| {
                            row.col(|ui| {
                                ui.label(RichText::new(r.to_string()).weak());
                            });
                            for cell in table.row(r) {
                                row.col(|ui| {
                                    ui.label(cell.to_string());
                                });
                            }
                        });
                    }
                });
        });

    if table.is_empty() {
        ui.label("The file has a header but no rows.");
    }
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

pub fn summary_statistics(ui: &mut Ui, stats: &[ColumnStats]) {
    if stats.is_empty() {
        ui.label("No numeric columns to describe.");
        return;
    }

    egui::ScrollArea::horizontal()
        .id_salt("summary_scroll")
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("summary_statistics")
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    ui.label("");
                    for s in stats {
                        ui.strong(&s.name);
                    }
                    ui.end_row();

                    let rows: Vec<_> = stats.iter().map(ColumnStats::rows).collect();
                    for i in 0..8 {
                        ui.strong(rows[0][i].0);
                        for row in &rows {
                            ui.label(fmt_stat(row[i].1));
                        }
                        ui.end_row();
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Segmentation
// ---------------------------------------------------------------------------

pub fn segment_table(ui: &mut Ui, seg: &SegmentMeans) {
    ui.label(RichText::new(format!("{} Segmentation", seg.segment)).heading());

    if seg.value_columns.is_empty() {
        ui.label("No numeric columns to average.");
        return;
    }

    egui::ScrollArea::horizontal()
        .id_salt(("segment_scroll", &seg.segment))
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new(("segment_grid", &seg.segment))
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    ui.strong(&seg.segment);
                    for name in &seg.value_columns {
                        ui.strong(name);
                    }
                    ui.end_row();

                    for group in &seg.groups {
                        ui.label(group.key.to_string());
                        for mean in &group.means {
                            ui.label(fmt_stat(*mean));
                        }
                        ui.end_row();
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Summary of results
// ---------------------------------------------------------------------------

pub fn results_summary(ui: &mut Ui, results: &[MetricSummary]) {
    if results.is_empty() {
        ui.label("Select at least one metric to see a verdict.");
        return;
    }

    for summary in results {
        ui.label(RichText::new(&summary.metric).strong().size(16.0));
        match (summary.verdict(), summary.average()) {
            (Some(verdict), Some(average)) => {
                let face = if verdict.is_good() { "😊" } else { "😟" };
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(
                        RichText::new(format!("{verdict} {face}"))
                            .strong()
                            .color(verdict_color(verdict)),
                    );
                    ui.label(format!("(Average: {average:.2})"));
                });
            }
            _ if summary.outcome == MetricOutcome::NotNumeric => {
                ui.label(RichText::new("Not a numeric column").italics());
            }
            _ => {
                ui.label(RichText::new("No data").italics());
            }
        }
        ui.add_space(4.0);
    }
}

pub fn feedback_echo(ui: &mut Ui, entry: &FeedbackEntry) {
    ui.label(entry.message());
}
