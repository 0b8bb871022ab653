//! Plotters-powered density chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using
//! `plotters-ratatui-backend`, the same drawing code path as the PNG writer.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A render-only chart description.
///
/// All series and bounds are computed outside the render call
/// (see `crate::plot::chart_data`).
pub struct DensityChart<'a> {
    /// Line series for the fitted curve.
    pub curve: &'a [(f64, f64)],
    /// Scatter series for the raw samples.
    pub points: &'a [(f64, f64)],
    /// X bounds (time, ps).
    pub x_bounds: [f64; 2],
    /// Y bounds (density, g/cm3).
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
}

impl<'a> Widget for DensityChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) {
            return;
        }
        if x1 <= x0 || y1 <= y0 {
            buf.set_string(
                area.x,
                area.y,
                format!("Density window [{y0}, {y1}] is empty; nothing to draw."),
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| format!("{v:.0}"))
                .y_label_formatter(&|v| format!("{v:.3}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let curve_color = RGBColor(0, 255, 255); // cyan
            let points_color = RGBColor(255, 255, 0); // yellow

            chart.draw_series(LineSeries::new(self.curve.iter().copied(), &curve_color))?;

            // Pixels rather than `Circle`: the backend maps circle radii in
            // normalized canvas units, which blows them up.
            chart.draw_series(
                self.points
                    .iter()
                    .map(|&(x, y)| Pixel::new((x, y), points_color)),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
