//! Chart Renderer Module
//! Renders aggregate tables as static PNG charts using Plotters.

use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

// Chart colors matching the report palette.
pub const DEFAULT_BLUE: RGBColor = RGBColor(31, 119, 180);
pub const ORANGE: RGBColor = RGBColor(255, 165, 0);
pub const GREEN: RGBColor = RGBColor(0, 128, 0);
pub const PURPLE: RGBColor = RGBColor(128, 0, 128);
pub const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);

const CHART_SIZE: (u32, u32) = (800, 600);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to render '{file}': {message}")]
    Draw { file: String, message: String },
}

/// Draws bar and line charts to PNG files.
pub struct ChartRenderer;

impl ChartRenderer {
    /// Bar chart of one value per category label.
    pub fn bar_chart(
        path: &Path,
        title: &str,
        labels: &[String],
        values: &[f64],
        color: RGBColor,
    ) -> Result<(), RenderError> {
        Self::draw_bars(path, title, labels, values, color).map_err(|e| RenderError::Draw {
            file: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Line chart over (day, value) points, x ascending.
    pub fn line_chart(
        path: &Path,
        title: &str,
        points: &[(i64, f64)],
        color: RGBColor,
    ) -> Result<(), RenderError> {
        Self::draw_line(path, title, points, color).map_err(|e| RenderError::Draw {
            file: path.display().to_string(),
            message: e.to_string(),
        })
    }

    fn draw_bars(
        path: &Path,
        title: &str,
        labels: &[String],
        values: &[f64],
        color: RGBColor,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let y_max = Self::y_ceiling(values.iter().copied());
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 30))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0i32..labels.len() as i32, 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&|x| {
                labels
                    .get(*x as usize)
                    .cloned()
                    .unwrap_or_default()
            })
            .draw()?;

        for (i, &value) in values.iter().enumerate() {
            chart.draw_series(std::iter::once(Rectangle::new(
                [(i as i32, 0.0), (i as i32 + 1, value)],
                color.filled(),
            )))?;
        }

        root.present()?;
        Ok(())
    }

    fn draw_line(
        path: &Path,
        title: &str,
        points: &[(i64, f64)],
        color: RGBColor,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let y_max = Self::y_ceiling(points.iter().map(|&(_, v)| v));
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 30))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(1i32..32i32, 0f64..y_max)?;

        chart.configure_mesh().x_desc("Day of month").draw()?;

        chart.draw_series(LineSeries::new(
            points.iter().map(|&(day, value)| (day as i32, value)),
            &color,
        ))?;
        chart.draw_series(
            points
                .iter()
                .map(|&(day, value)| Circle::new((day as i32, value), 3, color.filled())),
        )?;

        root.present()?;
        Ok(())
    }

    fn y_ceiling(values: impl Iterator<Item = f64>) -> f64 {
        let max = values.fold(0.0f64, f64::max);
        if max <= 0.0 {
            1.0
        } else {
            max * 1.1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn y_ceiling_pads_the_maximum() {
        let ceiling = ChartRenderer::y_ceiling([100.0, 50.0].into_iter());
        assert!((ceiling - 110.0).abs() < 1e-9);
    }

    #[test]
    fn y_ceiling_handles_empty_and_zero() {
        assert_eq!(ChartRenderer::y_ceiling(std::iter::empty()), 1.0);
        assert_eq!(ChartRenderer::y_ceiling([0.0].into_iter()), 1.0);
    }
}
