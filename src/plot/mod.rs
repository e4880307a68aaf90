//! Scatter plots of projections and cluster assignments.
//!
//! Figures are rendered with `plotters` into PNG files. Text is drawn with the
//! system `sans-serif` font, so a missing font surfaces as [`Error::Plot`].

pub mod cluster;
pub mod colormap;
pub mod styles;

use std::ops::Range;

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;

pub use self::cluster::ClusterPlot;
pub use self::colormap::{ColorMap, Palette};
pub use self::styles::{
    ClusterLabelOptions, ClusterSizeOptions, DensityMapOptions, OutlierOptions, ScatterOptions,
    plot_cluster_w_label, plot_cluster_w_size, plot_density_map, plot_outlier_scatter,
    plot_scatter_w_label,
};
use crate::error::Error;

const FONT: &str = "sans-serif";
const COLORBAR_WIDTH: u32 = 140;
const COLORBAR_STEPS: usize = 128;

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for Error {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        Error::Plot(err.to_string())
    }
}

/// Value range of `values` padded by 5% on both sides.
pub fn padded_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return -1.0..1.0;
    }
    let pad = if hi - lo > f64::EPSILON {
        0.05 * (hi - lo)
    } else {
        0.5_f64.max(lo.abs() * 0.05)
    };
    (lo - pad)..(hi + pad)
}

/// Min and max of the finite values, or `(0, 1)` for none.
pub(crate) fn value_bounds(values: &[f64]) -> (f64, f64) {
    let (lo, hi) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi { (0.0, 1.0) } else { (lo, hi) }
}

/// Split off a strip on the right of `root` for a colorbar.
pub(crate) fn split_colorbar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
) -> (DrawingArea<DB, Shift>, DrawingArea<DB, Shift>) {
    let (width, _) = root.dim_in_pixel();
    root.split_horizontally(width.saturating_sub(COLORBAR_WIDTH))
}

/// Draw a vertical colorbar for `cmap` over `[vmin, vmax]`.
pub(crate) fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    cmap: ColorMap,
    vmin: f64,
    vmax: f64,
    label: Option<&str>,
    fontsize: u32,
) -> Result<(), Error> {
    let (vmin, vmax) = if vmax - vmin > f64::EPSILON {
        (vmin, vmax)
    } else {
        (vmin - 0.5, vmin + 0.5)
    };
    let mut bar = ChartBuilder::on(area)
        .margin_top(40)
        .margin_bottom(60)
        .margin_right(10)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..1.0, vmin..vmax)?;

    let blank = |_: &f64| String::new();
    {
        let mut mesh = bar.configure_mesh();
        mesh.disable_mesh()
            .x_label_formatter(&blank)
            .y_label_style((FONT, fontsize).into_font());
        if let Some(label) = label {
            mesh.y_desc(label);
        }
        mesh.draw()?;
    }

    let step = (vmax - vmin) / COLORBAR_STEPS as f64;
    bar.draw_series((0..COLORBAR_STEPS).map(|k| {
        let lo = vmin + k as f64 * step;
        Rectangle::new(
            [(0.0, lo), (1.0, lo + step)],
            cmap.scaled(lo + 0.5 * step, vmin, vmax).filled(),
        )
    }))?;
    Ok(())
}

/// Five-pointed star centered at the origin, in pixels.
pub(crate) fn star(radius: i32) -> Vec<(i32, i32)> {
    (0..10)
        .map(|k| {
            let r = if k % 2 == 0 { radius as f64 } else { radius as f64 * 0.4 };
            let angle = std::f64::consts::PI * (k as f64 / 5.0 - 0.5);
            ((r * angle.cos()).round() as i32, (r * angle.sin()).round() as i32)
        })
        .collect()
}
