//! General-purpose scatter styles for projections and cluster assignments.
//!
//! Every function renders one PNG. Options left unset are simply not drawn.

use std::path::Path;

use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

use super::{
    ColorMap, FONT, Palette, draw_colorbar, padded_range, split_colorbar, star, value_bounds,
};
use crate::cluster::{ClusterSummary, cluster_sizes};
use crate::dbscan::NOISE;
use crate::distance::{argmin, squared_euclidean};
use crate::error::{Error, Result};

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

const CENTER_COLOR: RGBColor = RGBColor(128, 128, 128);
const LIGHT_GREEN: RGBColor = RGBColor(144, 238, 144);
const PURPLE: RGBColor = RGBColor(128, 0, 128);
const LIME: RGBColor = RGBColor(0, 255, 0);

/// Axis decorations shared by all styles.
struct Axes<'a> {
    title: Option<&'a str>,
    xlabel: Option<&'a str>,
    ylabel: Option<&'a str>,
    fontsize: u32,
    remove_tick: bool,
}

fn build_chart<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    xs: &[f64],
    ys: &[f64],
    axes: &Axes,
) -> Result<Chart<'a, DB>> {
    let mut builder = ChartBuilder::on(area);
    builder
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60);
    if let Some(title) = axes.title {
        builder.caption(title, (FONT, axes.fontsize + 4).into_font());
    }
    let mut chart = builder.build_cartesian_2d(
        padded_range(xs.iter().copied()),
        padded_range(ys.iter().copied()),
    )?;

    let blank = |_: &f64| String::new();
    {
        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh()
            .axis_desc_style((FONT, axes.fontsize).into_font());
        if let Some(xlabel) = axes.xlabel {
            mesh.x_desc(xlabel);
        }
        if let Some(ylabel) = axes.ylabel {
            mesh.y_desc(ylabel);
        }
        if axes.remove_tick {
            mesh.x_label_formatter(&blank).y_label_formatter(&blank);
        }
        mesh.draw()?;
    }
    Ok(chart)
}

fn check_len(expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(Error::LengthMismatch { expected, found });
    }
    Ok(())
}

fn split_xy(points: &[(f64, f64)]) -> (Vec<f64>, Vec<f64>) {
    points.iter().copied().unzip()
}

/// Split sample indices by `z` into (bottom, typical, top) with `window`
/// samples in each tail.
pub fn percentile_split(z: &[f64], window: usize) -> (Vec<usize>, Vec<usize>, Vec<usize>) {
    let mut order = (0..z.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| z[a].total_cmp(&z[b]));
    let window = window.min(z.len() / 2);
    let top = order.split_off(z.len() - window);
    let typical = order.split_off(window);
    (order, typical, top)
}

/// Options of [`plot_density_map`].
#[derive(Debug, Clone)]
pub struct DensityMapOptions {
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    /// colorbar label
    pub clabel: Option<String>,
    /// legend entry of the scatter
    pub label: Option<String>,
    /// drawn as stars
    pub centers: Option<Vec<(f64, f64)>>,
    pub psize: u32,
    pub cmap: ColorMap,
    pub remove_tick: bool,
    /// draw the lowest 5% black and the highest 5% red
    pub use_perc: bool,
    pub fontsize: u32,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    pub size: (u32, u32),
}

impl Default for DensityMapOptions {
    fn default() -> Self {
        Self {
            title: None,
            xlabel: None,
            ylabel: None,
            clabel: None,
            label: None,
            centers: None,
            psize: 3,
            cmap: ColorMap::Coolwarm,
            remove_tick: false,
            use_perc: false,
            fontsize: 15,
            vmin: None,
            vmax: None,
            size: (800, 600),
        }
    }
}

/// Scatter of 2D points colored by a per-point intensity `z`.
pub fn plot_density_map(
    path: &Path,
    points: &[(f64, f64)],
    z: &[f64],
    opts: &DensityMapOptions,
) -> Result<()> {
    check_len(points.len(), z.len())?;
    let (xs, ys) = split_xy(points);

    let root = BitMapBackend::new(path, opts.size).into_drawing_area();
    root.fill(&WHITE)?;
    let (main, bar) = split_colorbar(&root);
    let mut chart = build_chart(
        &main,
        &xs,
        &ys,
        &Axes {
            title: opts.title.as_deref(),
            xlabel: opts.xlabel.as_deref(),
            ylabel: opts.ylabel.as_deref(),
            fontsize: opts.fontsize,
            remove_tick: opts.remove_tick,
        },
    )?;

    let psize = opts.psize;
    let (vmin, vmax) = if opts.use_perc {
        let window = (0.05 * z.len() as f64) as usize;
        let (bottom, typical, top) = percentile_split(z, window);
        let typical_z = typical.iter().map(|&i| z[i]).collect::<Vec<_>>();
        let (lo, hi) = value_bounds(&typical_z);
        let (vmin, vmax) = (opts.vmin.unwrap_or(lo), opts.vmax.unwrap_or(hi));
        let cmap = opts.cmap;
        chart.draw_series(typical.iter().map(|&i| {
            Circle::new(points[i], psize, cmap.scaled(z[i], vmin, vmax).filled())
        }))?;
        chart.draw_series(
            bottom
                .iter()
                .map(|&i| Circle::new(points[i], psize, BLACK.filled())),
        )?;
        chart.draw_series(
            top.iter()
                .map(|&i| Circle::new(points[i], psize, RED.filled())),
        )?;
        (vmin, vmax)
    } else {
        let (lo, hi) = value_bounds(z);
        let (vmin, vmax) = (opts.vmin.unwrap_or(lo), opts.vmax.unwrap_or(hi));
        let cmap = opts.cmap;
        let anno = chart.draw_series(points.iter().zip(z).map(|(&p, &v)| {
            Circle::new(p, psize, cmap.scaled(v, vmin, vmax).filled())
        }))?;
        if let Some(label) = &opts.label {
            let color = cmap.color(0.5);
            anno.label(label.as_str())
                .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
        }
        (vmin, vmax)
    };

    if let Some(centers) = &opts.centers {
        chart.draw_series(centers.iter().map(|&c| {
            let mut outline = star(12);
            outline.push(outline[0]);
            EmptyElement::at(c)
                + Polygon::new(star(12), LIGHT_GREEN.filled())
                + PathElement::new(outline, BLACK.stroke_width(1))
        }))?;
    }

    if opts.label.is_some() && !opts.use_perc {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    draw_colorbar(
        &bar,
        opts.cmap,
        vmin,
        vmax,
        opts.clabel.as_deref(),
        opts.fontsize,
    )?;
    root.present()?;
    Ok(())
}

/// Options of [`plot_cluster_w_size`].
#[derive(Debug, Clone)]
pub struct ClusterSizeOptions {
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub clabel: Option<String>,
    /// circle the center of each cluster with radius `10 ln(size)`
    pub w_size: bool,
    /// write the label at the center of each cluster
    pub w_label: bool,
    pub cmap: ColorMap,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    pub psize: u32,
    pub fontsize: u32,
    pub remove_tick: bool,
    /// draw noise as crosses and skip it when marking clusters
    pub outlier: bool,
    pub size: (u32, u32),
}

impl Default for ClusterSizeOptions {
    fn default() -> Self {
        Self {
            title: None,
            xlabel: None,
            ylabel: None,
            clabel: None,
            w_size: true,
            w_label: false,
            cmap: ColorMap::Coolwarm,
            vmin: None,
            vmax: None,
            psize: 2,
            fontsize: 15,
            remove_tick: true,
            outlier: true,
            size: (1000, 800),
        }
    }
}

/// Clusters smaller than this are not circled.
const MIN_CIRCLED_SIZE: usize = 3;

/// Scatter colored by `colors` with the clusters of `labels` circled by size.
pub fn plot_cluster_w_size(
    path: &Path,
    points: &[(f64, f64)],
    labels: &[i32],
    colors: &[f64],
    opts: &ClusterSizeOptions,
) -> Result<()> {
    check_len(points.len(), labels.len())?;
    check_len(points.len(), colors.len())?;
    let (xs, ys) = split_xy(points);
    let summary = ClusterSummary::new(labels, &xs, &ys)?;

    let root = BitMapBackend::new(path, opts.size).into_drawing_area();
    root.fill(&WHITE)?;
    let (main, bar) = split_colorbar(&root);
    let mut chart = build_chart(
        &main,
        &xs,
        &ys,
        &Axes {
            title: opts.title.as_deref(),
            xlabel: opts.xlabel.as_deref(),
            ylabel: opts.ylabel.as_deref(),
            fontsize: opts.fontsize,
            remove_tick: opts.remove_tick,
        },
    )?;

    let (lo, hi) = value_bounds(colors);
    let (vmin, vmax) = (opts.vmin.unwrap_or(lo), opts.vmax.unwrap_or(hi));
    let cmap = opts.cmap;
    let psize = opts.psize;
    chart.draw_series(points.iter().zip(colors).map(|(&p, &c)| {
        Circle::new(p, psize, cmap.scaled(c, vmin, vmax).filled())
    }))?;

    if opts.outlier {
        let cross = (psize * 2).max(3);
        chart.draw_series(
            points
                .iter()
                .zip(labels)
                .filter(|(_, l)| **l == NOISE)
                .map(|(&p, _)| Cross::new(p, cross, BLACK.mix(0.7).stroke_width(1))),
        )?;
    }

    let marked = summary
        .stats()
        .iter()
        .filter(|s| !opts.outlier || s.label > NOISE)
        .collect::<Vec<_>>();
    if opts.w_size {
        chart.draw_series(
            marked
                .iter()
                .filter(|s| s.size >= MIN_CIRCLED_SIZE)
                .map(|s| {
                    let radius = (10.0 * (s.size as f64).ln()).round() as u32;
                    Circle::new(s.center, radius, CENTER_COLOR.stroke_width(2))
                }),
        )?;
    }
    if opts.w_label {
        let font = (FONT, opts.fontsize).into_font();
        chart.draw_series(
            marked
                .iter()
                .map(|s| Text::new(s.label.to_string(), s.center, font.clone())),
        )?;
    }

    draw_colorbar(
        &bar,
        opts.cmap,
        vmin,
        vmax,
        opts.clabel.as_deref(),
        opts.fontsize,
    )?;
    root.present()?;
    Ok(())
}

/// Options of [`plot_cluster_w_label`].
#[derive(Debug, Clone)]
pub struct ClusterLabelOptions {
    pub title: Option<String>,
    /// precomputed cluster centers, one per drawn cluster in label order
    pub centers: Option<Vec<(f64, f64)>>,
    pub psize: u32,
    pub fontsize: u32,
    pub w_label: bool,
    pub w_legend: bool,
    pub palette: Palette,
    /// draw labels -1, -2, -3 with fixed colors instead of the palette
    pub outlier: bool,
    pub alpha: f64,
    pub size: (u32, u32),
}

impl Default for ClusterLabelOptions {
    fn default() -> Self {
        Self {
            title: None,
            centers: None,
            psize: 3,
            fontsize: 15,
            w_label: true,
            w_legend: false,
            palette: Palette::Bright,
            outlier: true,
            alpha: 0.7,
            size: (1000, 800),
        }
    }
}

const OUTLIER_COLORS: [(i32, RGBColor); 3] = [
    (-3, RGBColor(0xff, 0x00, 0x50)),
    (-2, RGBColor(0x9e, 0xff, 0x49)),
    (-1, RGBColor(128, 128, 128)),
];

/// Scatter with one palette color per cluster and the label written at the
/// member closest to each cluster center.
///
/// Returns the index of that representative member for every drawn cluster.
pub fn plot_cluster_w_label(
    path: &Path,
    points: &[(f64, f64)],
    labels: &[i32],
    opts: &ClusterLabelOptions,
) -> Result<Vec<usize>> {
    check_len(points.len(), labels.len())?;
    let unique = cluster_sizes(labels)
        .into_iter()
        .map(|(label, _)| label)
        .filter(|&label| !opts.outlier || label > NOISE)
        .collect::<Vec<_>>();
    if let Some(centers) = &opts.centers {
        check_len(unique.len(), centers.len())?;
    }
    let (xs, ys) = split_xy(points);

    let root = BitMapBackend::new(path, opts.size).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = build_chart(
        &root,
        &xs,
        &ys,
        &Axes {
            title: opts.title.as_deref(),
            xlabel: None,
            ylabel: None,
            fontsize: opts.fontsize,
            remove_tick: true,
        },
    )?;

    let psize = opts.psize;
    let mut representatives = Vec::with_capacity(unique.len());
    for (i, &label) in unique.iter().enumerate() {
        let members = (0..points.len())
            .filter(|&k| labels[k] == label)
            .collect::<Vec<_>>();
        let center = match &opts.centers {
            Some(centers) => centers[i],
            None => {
                let inv = (members.len() as f64).recip();
                let (sx, sy) = members
                    .iter()
                    .fold((0.0, 0.0), |(sx, sy), &k| (sx + xs[k], sy + ys[k]));
                (sx * inv, sy * inv)
            }
        };
        let dists = members
            .iter()
            .map(|&k| squared_euclidean(&[xs[k], ys[k]], &[center.0, center.1]))
            .collect::<Vec<_>>();
        representatives.push(members[argmin(&dists)]);

        let color = opts.palette.color(i).mix(opts.alpha);
        chart
            .draw_series(
                members
                    .iter()
                    .map(|&k| Circle::new(points[k], psize, color.filled())),
            )?
            .label(label.to_string())
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
    }

    if opts.outlier {
        for (label, color) in OUTLIER_COLORS {
            let color = color.mix(opts.alpha);
            let noise = (0..points.len())
                .filter(|&k| labels[k] == label)
                .collect::<Vec<_>>();
            if noise.is_empty() {
                continue;
            }
            chart
                .draw_series(
                    noise
                        .iter()
                        .map(|&k| TriangleMarker::new(points[k], psize + 1, color.stroke_width(1))),
                )?
                .label(label.to_string())
                .legend(move |(x, y)| TriangleMarker::new((x, y), 4, color.stroke_width(1)));
        }
    }

    if opts.w_label {
        let font = (FONT, opts.fontsize).into_font();
        chart.draw_series(unique.iter().zip(&representatives).map(|(label, &k)| {
            Text::new(label.to_string(), points[k], font.clone())
        }))?;
    }

    if opts.w_legend {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(representatives)
}

/// Options of [`plot_scatter_w_label`].
#[derive(Debug, Clone)]
pub struct ScatterOptions {
    pub psize: u32,
    /// legend entries, one per unique value in sorted order
    pub names: Option<Vec<String>>,
    pub palette: Palette,
    pub size: (u32, u32),
}

impl Default for ScatterOptions {
    fn default() -> Self {
        Self {
            psize: 3,
            names: None,
            palette: Palette::Tab,
            size: (800, 600),
        }
    }
}

/// Scatter with one palette color per distinct value of `z`.
///
/// Only readable for a handful of distinct values.
pub fn plot_scatter_w_label(
    path: &Path,
    xs: &[f64],
    ys: &[f64],
    z: &[i32],
    opts: &ScatterOptions,
) -> Result<()> {
    check_len(xs.len(), ys.len())?;
    check_len(xs.len(), z.len())?;
    let unique = cluster_sizes(z)
        .into_iter()
        .map(|(value, _)| value)
        .collect::<Vec<_>>();
    if let Some(names) = &opts.names {
        if names.len() < unique.len() {
            return Err(Error::LengthMismatch {
                expected: unique.len(),
                found: names.len(),
            });
        }
    }

    let root = BitMapBackend::new(path, opts.size).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = build_chart(
        &root,
        xs,
        ys,
        &Axes {
            title: None,
            xlabel: None,
            ylabel: None,
            fontsize: 12,
            remove_tick: false,
        },
    )?;

    let psize = opts.psize;
    for (i, &value) in unique.iter().enumerate() {
        let color = opts.palette.color(i);
        let anno = chart.draw_series(
            (0..xs.len())
                .filter(|&k| z[k] == value)
                .map(|k| Circle::new((xs[k], ys[k]), psize, color.filled())),
        )?;
        if let Some(names) = &opts.names {
            anno.label(names[i].as_str())
                .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
        }
    }

    if opts.names.is_some() {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }
    root.present()?;
    Ok(())
}

/// Options of [`plot_outlier_scatter`].
#[derive(Debug, Clone)]
pub struct OutlierOptions {
    pub title: Option<String>,
    pub psize: u32,
    pub cmap: ColorMap,
    pub size: (u32, u32),
}

impl Default for OutlierOptions {
    fn default() -> Self {
        Self {
            title: None,
            psize: 3,
            cmap: ColorMap::Coolwarm,
            size: (800, 600),
        }
    }
}

/// Scatter colored by `z` with the lowest 5% purple and the highest 5% green.
pub fn plot_outlier_scatter(
    path: &Path,
    xs: &[f64],
    ys: &[f64],
    z: &[f64],
    opts: &OutlierOptions,
) -> Result<()> {
    check_len(xs.len(), ys.len())?;
    check_len(xs.len(), z.len())?;
    let window = (z.len() as f64 * 0.05).round() as usize;
    let (bottom, middle, top) = percentile_split(z, window);

    let root = BitMapBackend::new(path, opts.size).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = build_chart(
        &root,
        xs,
        ys,
        &Axes {
            title: opts.title.as_deref(),
            xlabel: None,
            ylabel: None,
            fontsize: 15,
            remove_tick: false,
        },
    )?;

    let middle_z = middle.iter().map(|&i| z[i]).collect::<Vec<_>>();
    let (vmin, vmax) = value_bounds(&middle_z);
    let cmap = opts.cmap;
    let psize = opts.psize;
    chart.draw_series(middle.iter().map(|&i| {
        Circle::new((xs[i], ys[i]), psize, cmap.scaled(z[i], vmin, vmax).filled())
    }))?;
    let small = psize.saturating_sub(1).max(1);
    chart.draw_series(
        bottom
            .iter()
            .map(|&i| Circle::new((xs[i], ys[i]), small, PURPLE.filled())),
    )?;
    chart.draw_series(
        top.iter()
            .map(|&i| Circle::new((xs[i], ys[i]), small, LIME.filled())),
    )?;
    root.present()?;
    Ok(())
}
