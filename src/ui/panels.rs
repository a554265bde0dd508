use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export::ExportFormat;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selections and feedback
// ---------------------------------------------------------------------------

/// Render the sidebar: upload, metric / segment pickers, toggles, feedback.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Upload Your CSV Data");
    if ui.button("Open CSV…").clicked() {
        open_file_dialog(state);
    }
    if ui.button("How to Use").clicked() {
        state.show_help = !state.show_help;
    }
    ui.separator();

    let Some(table) = &state.table else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let columns = table.column_names();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Metrics ----
            egui::CollapsingHeader::new(
                RichText::new(format!("Select Performance Metrics  ({})", state.metrics.len()))
                    .strong(),
            )
            .id_salt("metrics")
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                for col in &columns {
                    let mut checked = state.metrics.contains(col);
                    if ui.checkbox(&mut checked, col).changed() {
                        state.toggle_metric(col);
                    }
                }
            });

            // ---- Segments ----
            egui::CollapsingHeader::new(
                RichText::new(format!("Select Segments  ({})", state.segments.len())).strong(),
            )
            .id_salt("segments")
            .default_open(false)
            .show(ui, |ui: &mut Ui| {
                for col in &columns {
                    let mut checked = state.segments.contains(col);
                    if ui.checkbox(&mut checked, col).changed() {
                        state.toggle_segment(col);
                    }
                }
            });
            ui.separator();

            ui.checkbox(&mut state.show_summary, "Show Summary Statistics");
            ui.checkbox(&mut state.show_correlation, "Show Correlation Analysis");
            ui.separator();

            // ---- Ratings column ----
            ui.strong("Select Ratings Column");
            let current = state.ratings_column.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("ratings_column")
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for col in &columns {
                        if ui.selectable_label(current == *col, col).clicked() {
                            state.set_ratings_column(col);
                        }
                    }
                });
            ui.separator();

            feedback_form(ui, state);
        });
}

fn feedback_form(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Employee Feedback");

    if state.employees.is_empty() {
        ui.label(format!(
            "No '{}' column in this file.",
            state.config.label_column
        ));
        return;
    }

    let current = state.feedback_employee.clone().unwrap_or_default();
    let employees = state.employees.clone();
    egui::ComboBox::from_id_salt("feedback_employee")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for name in &employees {
                if ui.selectable_label(current == *name, name).clicked() {
                    state.set_feedback_employee(name);
                }
            }
        });

    ui.add(
        egui::TextEdit::multiline(&mut state.feedback_draft)
            .hint_text("Enter feedback here...")
            .desired_rows(4),
    );
    if ui.button("Submit Feedback").clicked() {
        state.submit_feedback();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Use example data").clicked() {
                state.load_example();
                ui.close_menu();
            }
            ui.separator();
            let has_data = state.table.is_some();
            for format in ExportFormat::ALL {
                let label = format!("Export {}…", format.label());
                if ui.add_enabled(has_data, egui::Button::new(label)).clicked() {
                    save_file_dialog(state, format);
                    ui.close_menu();
                }
            }
        });

        ui.separator();

        if let (Some(table), Some(source)) = (&state.table, &state.source_name) {
            ui.label(format!(
                "{source}: {} rows × {} columns",
                table.len(),
                table.n_columns()
            ));
        }

        ui.separator();

        if ui.selectable_label(state.show_help, "How to Use").clicked() {
            state.show_help = !state.show_help;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

/// Floating "How to Use" window.
pub fn help_window(ctx: &egui::Context, state: &mut AppState) {
    egui::Window::new("How to Use")
        .open(&mut state.show_help)
        .resizable(false)
        .show(ctx, |ui: &mut Ui| {
            ui.strong("Steps");
            ui.label("1. Upload CSV: open a CSV file with employee performance data.");
            ui.label("2. Select Metrics: choose which performance metrics to visualize.");
            ui.label("3. Feedback: write feedback for a specific employee.");
            ui.label("4. Download Data: export the data as a CSV or Excel file.");
            ui.separator();
            ui.strong("Expected columns");
            for (name, meaning) in [
                ("Employee", "name or identifier of each employee"),
                ("Department", "department the employee belongs to"),
                ("Region", "geographical work location"),
                ("Education", "educational background"),
                ("Gender", "gender of the employee"),
                ("Recruitment Channel", "source the employee was recruited through"),
                ("Number of Trainings", "training programs attended"),
                ("Age", "age of the employee"),
                ("Previous Year Rating", "last year's performance rating"),
                ("Length of Service", "years with the company"),
            ] {
                ui.label(format!("• {name}: {meaning}"));
            }
        });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open employee performance data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.load_path(&path) {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

pub fn save_file_dialog(state: &mut AppState, format: ExportFormat) {
    let file = rfd::FileDialog::new()
        .set_title(format!("Download {} file", format.label()))
        .set_file_name(format.file_name())
        .add_filter(format.label(), &[format.extension()])
        .save_file();

    if let Some(path) = file {
        match state.export_to(&path, format) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
