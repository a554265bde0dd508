use eframe::egui::{self, RichText, Ui};

use crate::config::DashboardConfig;
use crate::data::export::ExportFormat;
use crate::state::AppState;
use crate::ui::{panels, plot, tables};

/// Things the central panel asks for while it only borrows the state.
enum Action {
    UseExample,
    Download(ExportFormat),
}

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selections and feedback ----
        egui::SidePanel::left("selection_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: dashboard ----
        let mut action = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    action = dashboard(ui, &self.state);
                });
        });

        match action {
            Some(Action::UseExample) => self.state.load_example(),
            Some(Action::Download(format)) => panels::save_file_dialog(&mut self.state, format),
            None => {}
        }

        panels::help_window(ctx, &mut self.state);
    }
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.heading(title);
    ui.separator();
}

/// Every dashboard section, top to bottom.
fn dashboard(ui: &mut Ui, state: &AppState) -> Option<Action> {
    ui.heading(RichText::new("Employee Performance Dashboard").size(26.0));

    let (Some(table), Some(report)) = (&state.table, &state.report) else {
        ui.add_space(8.0);
        ui.label("Awaiting CSV file to be uploaded.");
        if ui.button("Press to use Example Data").clicked() {
            return Some(Action::UseExample);
        }
        return None;
    };

    section(ui, "Employee Data");
    tables::data_preview(ui, table, state.config.preview_rows);

    if state.show_summary {
        section(ui, "Summary Statistics");
        tables::summary_statistics(ui, &report.summary);
    }

    section(ui, "Performance Segmentation");
    if report.segments.is_empty() {
        ui.label("Select at least one segment to compare groups.");
    }
    for seg in &report.segments {
        tables::segment_table(ui, seg);
        ui.add_space(6.0);
    }

    if state.show_correlation {
        section(ui, "Correlation Analysis");
        plot::correlation_heatmap(ui, &report.correlation);
    }

    section(ui, "Distribution of Performance Ratings");
    match &report.ratings {
        Some((column, dist)) => plot::ratings_distribution(ui, column, dist),
        None => {
            ui.label("Pick a ratings column in the sidebar.");
        }
    }

    section(ui, "Performance Metrics Visualization");
    if state.metrics.is_empty() {
        ui.label("Select at least one metric to chart.");
    }
    for chart in &report.metric_bars {
        plot::metric_bar_chart(ui, chart, &state.config.label_column);
        ui.add_space(6.0);
    }

    section(ui, "Summary of Results");
    tables::results_summary(ui, &report.results);

    if let Some(entry) = &state.submitted_feedback {
        section(ui, "Feedback");
        tables::feedback_echo(ui, entry);
    }

    section(ui, "Download Data");
    let mut action = None;
    ui.horizontal(|ui: &mut Ui| {
        for format in ExportFormat::ALL {
            if ui.button(format!("Download {}", format.label())).clicked() {
                action = Some(Action::Download(format));
            }
        }
    });
    action
}
