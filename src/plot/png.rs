//! PNG rendering of the density equilibration plot.
//!
//! Text is drawn through plotters' `ttf` feature, which resolves the
//! `sans-serif` family via fontconfig at runtime. A host with no such font
//! installed fails here with exit code 5, after the parameters were printed.

use std::path::Path;

use log::info;
use plotters::prelude::*;

use super::{ChartData, DATA_LABEL, FIT_LABEL, TITLE, X_LABEL, Y_LABEL};
use crate::error::AppError;

/// Image size in pixels.
pub const PNG_SIZE: (u32, u32) = (800, 600);

/// Render raw samples plus the fitted curve to a PNG file.
///
/// An existing file at `path` is overwritten.
///
/// # Errors
///
/// Exit code 5 when the file cannot be created or no `sans-serif` font can be
/// loaded for the title and labels.
pub fn write_density_png(chart: &ChartData, path: &Path) -> Result<(), AppError> {
    draw_png(chart, path).map_err(|e| {
        AppError::new(5, format!("Failed to render plot '{}': {e}", path.display()))
    })?;
    info!("wrote {}", path.display());
    Ok(())
}

fn draw_png(chart: &ChartData, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let [x0, x1] = chart.x_bounds;
    let [y0, y1] = chart.y_bounds;

    let root = BitMapBackend::new(path, PNG_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut ctx = ChartBuilder::on(&root)
        .margin(20)
        .caption(TITLE, ("sans-serif", 24))
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    ctx.configure_mesh()
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .y_label_formatter(&|v| format!("{v:.3}"))
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    let point_color = RGBColor(31, 119, 180);
    ctx.draw_series(
        chart
            .points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 3, point_color.filled())),
    )?
    .label(DATA_LABEL)
    .legend(move |(x, y)| Circle::new((x + 10, y), 3, point_color.filled()));

    ctx.draw_series(LineSeries::new(chart.curve.iter().copied(), &BLACK))?
        .label(FIT_LABEL)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> ChartData {
        ChartData {
            points: vec![(0.0, 0.99), (10.0, 1.01), (20.0, 1.02)],
            curve: (0..100)
                .map(|i| {
                    let t = i as f64 * 0.2;
                    (t, 0.99 + 0.03 * (1.0 - (-0.2 * t).exp()))
                })
                .collect(),
            x_bounds: [0.0, 20.0],
            y_bounds: [0.98, 1.04],
        }
    }

    #[test]
    fn writes_a_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("density.png");

        write_density_png(&chart(), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.len() > 8);
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn render_failure_maps_to_exit_code_5() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("density.png");

        let err = write_density_png(&chart(), &path).unwrap_err();
        assert_eq!(err.exit_code(), 5);
        assert!(err.message().contains("density.png"));
        assert!(!path.exists());
    }
}
