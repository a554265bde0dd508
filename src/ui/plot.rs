use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints};

use crate::color::{diverging, generate_palette, text_on};
use crate::data::report::MetricBars;
use crate::data::stats::{CorrelationMatrix, Distribution};

const CHART_HEIGHT: f32 = 280.0;

/// Axis formatter that prints `labels[i]` at integer positions only.
fn category_formatter(
    labels: Vec<String>,
) -> impl Fn(GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let rounded = mark.value.round();
        if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        labels.get(rounded as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Ratings distribution
// ---------------------------------------------------------------------------

/// Histogram with a density line for numeric columns, counts per value
/// otherwise.
pub fn ratings_distribution(ui: &mut Ui, column: &str, dist: &Distribution) {
    match dist {
        Distribution::Numeric { histogram, kde } => {
            let width = histogram.bin_width();
            let bars: Vec<Bar> = histogram
                .counts
                .iter()
                .zip(&histogram.edges)
                .map(|(&count, &left)| Bar::new(left + width / 2.0, count as f64).width(width))
                .collect();

            Plot::new("ratings_distribution")
                .height(CHART_HEIGHT)
                .legend(Legend::default())
                .x_axis_label(column)
                .y_axis_label("Count")
                .allow_scroll(false)
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(
                        BarChart::new(bars)
                            .name("count")
                            .color(Color32::from_rgb(76, 114, 176)),
                    );
                    if let Some(curve) = kde {
                        plot_ui.line(
                            Line::new(PlotPoints::from(curve.clone()))
                                .name("density")
                                .color(Color32::from_rgb(221, 132, 82))
                                .width(2.0),
                        );
                    }
                });
        }
        Distribution::Categorical(counts) => {
            let labels: Vec<String> = counts.iter().map(|(v, _)| v.to_string()).collect();
            let bars: Vec<Bar> = counts
                .iter()
                .enumerate()
                .map(|(i, (value, n))| {
                    Bar::new(i as f64, *n as f64)
                        .name(value.to_string())
                        .width(0.8)
                })
                .collect();

            Plot::new("ratings_distribution")
                .height(CHART_HEIGHT)
                .x_axis_label(column)
                .y_axis_label("Count")
                .x_axis_formatter(category_formatter(labels))
                .allow_scroll(false)
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(BarChart::new(bars).color(Color32::from_rgb(76, 114, 176)));
                });
        }
        Distribution::Empty => {
            ui.label(format!("'{column}' has no values to plot."));
        }
    }
}

// ---------------------------------------------------------------------------
// Metric bars
// ---------------------------------------------------------------------------

/// One bar per employee for a single metric.
pub fn metric_bar_chart(ui: &mut Ui, chart: &MetricBars, label_column: &str) {
    ui.label(RichText::new(format!("{} by {label_column}", chart.metric)).strong());

    if chart.bars.is_empty() {
        ui.label("No rows to plot.");
        return;
    }

    let colors = generate_palette(chart.bars.len());
    let labels: Vec<String> = chart.bars.iter().map(|b| b.label.clone()).collect();
    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .zip(colors)
        .enumerate()
        .filter_map(|(i, (bar, color))| {
            let value = bar.value?;
            Some(
                Bar::new(i as f64, value)
                    .name(&bar.label)
                    .fill(color)
                    .width(0.8),
            )
        })
        .collect();

    Plot::new(("metric_bars", &chart.metric))
        .height(CHART_HEIGHT)
        .x_axis_label(label_column)
        .y_axis_label(&chart.metric)
        .x_axis_formatter(category_formatter(labels))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(&chart.metric));
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

/// Annotated grid of correlation coefficients on a diverging scale.
pub fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    if matrix.is_empty() {
        ui.label("No numeric columns to correlate.");
        return;
    }

    let n = matrix.columns.len();
    let label_width = 150.0;
    let header_height = 44.0;
    let cell = ((ui.available_width() - label_width) / n as f32).clamp(36.0, 90.0);
    let size = Vec2::new(label_width + cell * n as f32, header_height + cell * n as f32);

    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min;
    let font = FontId::proportional(12.0);
    let text_color = ui.visuals().text_color();

    for (j, name) in matrix.columns.iter().enumerate() {
        let galley = painter.layout(name.clone(), font.clone(), text_color, cell - 4.0);
        let pos = Pos2::new(
            origin.x + label_width + cell * j as f32 + 2.0,
            origin.y + header_height - galley.size().y - 2.0,
        );
        painter.galley(pos, galley, text_color);
    }

    for (i, row_name) in matrix.columns.iter().enumerate() {
        let y = origin.y + header_height + cell * i as f32;
        painter.text(
            Pos2::new(origin.x + label_width - 6.0, y + cell / 2.0),
            Align2::RIGHT_CENTER,
            row_name,
            font.clone(),
            text_color,
        );

        for (j, col_name) in matrix.columns.iter().enumerate() {
            let rect = Rect::from_min_size(
                Pos2::new(origin.x + label_width + cell * j as f32, y),
                Vec2::splat(cell),
            );
            let (fill, label) = match matrix.get(row_name, col_name) {
                Some(r) => (diverging(r), format!("{r:.2}")),
                None => (Color32::from_gray(160), "NaN".to_string()),
            };
            painter.rect_filled(rect, 0.0, fill);
            painter.rect_stroke(
                rect,
                0.0,
                Stroke::new(1.0, Color32::WHITE),
                egui::StrokeKind::Inside,
            );
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                label,
                font.clone(),
                text_on(fill),
            );
        }
    }
}
