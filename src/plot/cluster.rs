//! Projection scatter colored by cluster label with annotated reference points.

use std::path::Path;

use log::debug;
use plotters::prelude::*;

use super::{ColorMap, FONT, draw_colorbar, padded_range, split_colorbar};
use crate::cluster::{ClusterSummary, n_clusters};
use crate::error::{Error, Result};

const CENTER_COLOR: RGBColor = RGBColor(128, 128, 128);

/// Scatter of a 2D projection colored by cluster label.
///
/// Every cluster center gets an open gray circle of radius `10 ln(size)`, and
/// the first `tags.len()` samples are marked with a black triangle and their
/// tag.
#[derive(Debug, Clone)]
pub struct ClusterPlot {
    title: String,
    xlabel: String,
    ylabel: String,
    size: (u32, u32),
    cmap: ColorMap,
    psize: u32,
    fontsize: u32,
}

impl ClusterPlot {
    pub fn new(prefix: &str) -> Self {
        Self {
            title: format!("KPCA and clustering for: {prefix}"),
            xlabel: "pc1".to_string(),
            ylabel: "pc2".to_string(),
            size: (1850, 1050),
            cmap: ColorMap::Gnuplot,
            psize: 4,
            fontsize: 18,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn with_axis_labels(mut self, xlabel: &str, ylabel: &str) -> Self {
        self.xlabel = xlabel.to_string();
        self.ylabel = ylabel.to_string();
        self
    }

    pub fn with_colormap(mut self, cmap: ColorMap) -> Self {
        self.cmap = cmap;
        self
    }

    pub fn with_point_size(mut self, psize: u32) -> Self {
        self.psize = psize;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Render the figure into a PNG file at `path`.
    pub fn draw(
        &self,
        path: &Path,
        xs: &[f64],
        ys: &[f64],
        labels: &[i32],
        tags: &[String],
    ) -> Result<()> {
        if xs.len() != labels.len() || ys.len() != labels.len() {
            return Err(Error::LengthMismatch {
                expected: labels.len(),
                found: if xs.len() != labels.len() { xs.len() } else { ys.len() },
            });
        }
        if tags.len() > labels.len() {
            return Err(Error::TooManyTags {
                tags: tags.len(),
                samples: labels.len(),
            });
        }

        let n_cluster = n_clusters(labels);
        let summary = ClusterSummary::new(labels, xs, ys)?;

        let root = BitMapBackend::new(path, self.size).into_drawing_area();
        root.fill(&WHITE)?;
        let (main, bar) = split_colorbar(&root);

        let mut chart = ChartBuilder::on(&main)
            .caption(&self.title, (FONT, self.fontsize + 8).into_font())
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d(
                padded_range(xs.iter().copied()),
                padded_range(ys.iter().copied()),
            )?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(self.xlabel.as_str())
            .y_desc(self.ylabel.as_str())
            .axis_desc_style((FONT, self.fontsize).into_font())
            .label_style((FONT, self.fontsize - 4).into_font())
            .draw()?;

        let vmax = n_cluster as f64;
        let cmap = self.cmap;
        let psize = self.psize;
        chart.draw_series(xs.iter().zip(ys).zip(labels).map(|((&x, &y), &label)| {
            Circle::new((x, y), psize, cmap.scaled(label as f64, 0.0, vmax).filled())
        }))?;

        chart.draw_series(summary.clusters().filter_map(|stat| {
            let radius = 10.0 * (stat.size as f64).ln();
            (radius >= 1.0).then(|| {
                Circle::new(stat.center, radius.round() as u32, CENTER_COLOR.stroke_width(2))
            })
        }))?;

        let font = (FONT, self.fontsize - 2).into_font();
        chart.draw_series(tags.iter().enumerate().map(|(i, tag)| {
            EmptyElement::at((xs[i], ys[i]))
                + TriangleMarker::new((0, 0), 8, BLACK.filled())
                + Text::new(tag.clone(), (8, -16), font.clone())
        }))?;

        let colorbar_label = format!("a total of {n_cluster} clusters");
        draw_colorbar(
            &bar,
            self.cmap,
            0.0,
            vmax,
            Some(colorbar_label.as_str()),
            self.fontsize - 4,
        )?;

        root.present()?;
        debug!("saved cluster plot to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use tempfile::tempdir;

    use super::ClusterPlot;
    use crate::error::Error;
    use crate::plot::ColorMap;

    #[test]
    fn test_draw_cluster_plot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cluster.png");

        let xs = [0.0, 0.1, 0.2, 5.0, 5.1, 9.0];
        let ys = [1.0, 1.1, 0.9, -2.0, -2.1, 3.0];
        let labels = [0, 0, 0, 1, 1, -1];
        let tags = vec!["a".to_string(), "b".to_string()];
        let plot = ClusterPlot::new("test").with_size(400, 300);
        assert_eq!(plot.title(), "KPCA and clustering for: test");
        plot.draw(&path, &xs, &ys, &labels, &tags).unwrap();
        assert!(fs::metadata(&path).unwrap().len() > 0);

        let path = dir.path().join("restyled.png");
        ClusterPlot::new("test")
            .with_size(400, 300)
            .with_axis_labels("pc3", "pc4")
            .with_colormap(ColorMap::Coolwarm)
            .with_point_size(2)
            .draw(&path, &xs, &ys, &labels, &[])
            .unwrap();
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_too_many_tags() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cluster.png");
        let tags = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let result = ClusterPlot::new("x").draw(&path, &[0.0, 1.0], &[0.0, 1.0], &[0, 0], &tags);
        assert!(matches!(
            result,
            Err(Error::TooManyTags {
                tags: 3,
                samples: 2
            })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_length_mismatch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cluster.png");
        let result = ClusterPlot::new("x").draw(&path, &[0.0], &[0.0, 1.0], &[0, 0], &[]);
        assert!(matches!(result, Err(Error::LengthMismatch { .. })));
        assert!(!path.exists());
    }
}
