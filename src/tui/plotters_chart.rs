//! Plotters-powered multi-series time chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use chrono::NaiveDate;
use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Line palette, index-aligned with `LEGEND_COLORS` in the parent module so
/// the on-chart lines and the legend text match.
const PALETTE: [RGBColor; 4] = [
    RGBColor(0, 255, 255), // cyan
    RGBColor(0, 255, 0),   // green
    RGBColor(255, 0, 255), // magenta
    RGBColor(255, 255, 0), // yellow
];

/// One line on the chart, already projected to chart coordinates.
///
/// X values are `NaiveDate::num_days_from_ce` cast to `f64`; gaps from
/// missing observations are simply absent points, so lines bridge them.
pub struct ChartSeries {
    pub label: String,
    pub synthetic: bool,
    pub points: Vec<(f64, f64)>,
}

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call, which keeps
/// `render()` focused on drawing and the data prep testable on its own.
pub struct MacroChart<'a> {
    pub series: &'a [ChartSeries],
    /// X bounds in days-from-CE.
    pub x_bounds: [f64; 2],
    /// Y bounds in the indicator's unit.
    pub y_bounds: [f64; 2],
    pub y_label: String,
}

impl Widget for MacroChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 6 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y1 <= y0
        {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels. Mesh lines are disabled to reduce visual
            // clutter in low-resolution terminal rendering.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .y_desc(self.y_label.as_str())
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| fmt_date(*v))
                .y_label_formatter(&|v| format!("{v:.1}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for (idx, series) in self.series.iter().enumerate() {
                let color = PALETTE[idx % PALETTE.len()];
                chart.draw_series(LineSeries::new(series.points.iter().copied(), &color))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Tick label for a days-from-CE x value.
fn fmt_date(v: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(v as i32)
        .map(|d| d.format("%Y-%m").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn date_ticks_round_trip_through_days_from_ce() {
        let d = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
        assert_eq!(fmt_date(d.num_days_from_ce() as f64), "2021-06");
    }
}
