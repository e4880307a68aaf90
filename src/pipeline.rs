//! Load a kernel, project it, cluster it and plot the result.

use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, error, info};

use crate::cluster::n_clusters;
use crate::dbscan::Dbscan;
use crate::distance::{kernel_to_distance, std_dev};
use crate::error::{Error, Result};
use crate::kpca::KernelPca;
use crate::plot::ClusterPlot;
use crate::utils::{Matrix, read_matrix, read_tags, write_labels};

/// Settings of one clustering run.
#[derive(Debug, Clone)]
pub struct Config {
    /// kernel matrix file
    pub kmat: PathBuf,
    /// tags of the first samples, one per line
    pub tags: Option<PathBuf>,
    /// prefix of the output file names
    pub prefix: String,
    /// number of kernel PCA components to keep
    pub kpca_d: usize,
    /// projected axis drawn horizontally
    pub pc1: usize,
    /// projected axis drawn vertically
    pub pc2: usize,
    pub min_samples: usize,
    /// neighborhood radius; the standard deviation of the kernel entries if unset
    pub epsilon: Option<f64>,
    pub out_dir: PathBuf,
    /// figure size in pixels
    pub plot_size: (u32, u32),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kmat: PathBuf::new(),
            tags: None,
            prefix: "ASAP".to_string(),
            kpca_d: 10,
            pc1: 0,
            pc2: 1,
            min_samples: 5,
            epsilon: None,
            out_dir: PathBuf::from("."),
            plot_size: (1850, 1050),
        }
    }
}

impl Config {
    pub fn new(kmat: impl Into<PathBuf>) -> Self {
        Self {
            kmat: kmat.into(),
            ..Default::default()
        }
    }

    pub fn with_tags(mut self, tags: impl Into<PathBuf>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn with_components(mut self, kpca_d: usize, pc1: usize, pc2: usize) -> Self {
        self.kpca_d = kpca_d;
        self.pc1 = pc1;
        self.pc2 = pc2;
        self
    }

    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    pub fn with_plot_size(mut self, width: u32, height: u32) -> Self {
        self.plot_size = (width, height);
        self
    }

    /// `<out_dir>/<prefix>-cluster-label.dat`
    pub fn label_path(&self) -> PathBuf {
        self.out_dir.join(format!("{}-cluster-label.dat", self.prefix))
    }

    /// `<out_dir>/Clustering_4_<prefix>.png`
    pub fn figure_path(&self) -> PathBuf {
        self.out_dir.join(format!("Clustering_4_{}.png", self.prefix))
    }
}

/// Result of a clustering run.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// one label per sample, -1 for noise
    pub labels: Vec<i32>,
    pub n_clusters: usize,
    /// neighborhood radius actually used
    pub epsilon: f64,
    /// kernel PCA projection, one row per sample
    pub projection: Matrix,
    pub label_path: PathBuf,
    pub figure_path: PathBuf,
}

fn load_kernel(path: &Path) -> Result<Matrix> {
    read_matrix(path).map_err(|e| {
        error!("{}", e);
        Error::KernelLoad
    })
}

/// Run the whole pipeline: load, project, cluster, save labels and plot.
pub fn run(config: &Config) -> Result<Outcome> {
    let kernel = load_kernel(&config.kmat)?;
    let n = kernel.square_dim()?;
    info!("loaded {} ({} samples)", config.kmat.display(), n);

    let tags = match &config.tags {
        Some(path) => read_tags(path)?,
        None => Vec::new(),
    };
    if tags.len() > n {
        return Err(Error::TooManyTags {
            tags: tags.len(),
            samples: n,
        });
    }
    let n_components = config.kpca_d.min(n);
    for (name, pc) in [("pc1", config.pc1), ("pc2", config.pc2)] {
        if pc >= n_components {
            return Err(Error::invalid(
                name,
                format!("axis {pc} out of {n_components} projected components"),
            ));
        }
    }

    let epsilon = config.epsilon.unwrap_or_else(|| std_dev(kernel.as_slice()));
    debug!("neighborhood radius: {}", epsilon);

    let start = Instant::now();
    let projection = KernelPca::new(config.kpca_d).fit_transform(&kernel)?;
    debug!("kernel PCA takes {} s", start.elapsed().as_secs_f32());

    let start = Instant::now();
    let distances = kernel_to_distance(&kernel)?;
    let labels = Dbscan::new(epsilon, config.min_samples).fit(&distances)?;
    let n_cluster = n_clusters(&labels);
    info!(
        "found {} clusters, {} noise points, in {} s",
        n_cluster,
        labels.iter().filter(|&&l| l < 0).count(),
        start.elapsed().as_secs_f32()
    );

    let label_path = config.label_path();
    write_labels(&label_path, &labels)?;
    info!("saved labels to {}", label_path.display());

    let figure_path = config.figure_path();
    ClusterPlot::new(&config.prefix)
        .with_size(config.plot_size.0, config.plot_size.1)
        .draw(
            &figure_path,
            &projection.column(config.pc1),
            &projection.column(config.pc2),
            &labels,
            &tags,
        )?;
    info!("saved figure to {}", figure_path.display());

    Ok(Outcome {
        labels,
        n_clusters: n_cluster,
        epsilon,
        projection,
        label_path,
        figure_path,
    })
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::Config;

    #[test]
    fn test_output_paths() {
        let config = Config::new("k.dat").with_prefix("run1").with_out_dir("/tmp/out");
        assert_eq!(config.label_path(), PathBuf::from("/tmp/out/run1-cluster-label.dat"));
        assert_eq!(config.figure_path(), PathBuf::from("/tmp/out/Clustering_4_run1.png"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::new("k.dat");
        assert_eq!(config.prefix, "ASAP");
        assert_eq!((config.kpca_d, config.pc1, config.pc2), (10, 0, 1));
        assert_eq!(config.min_samples, 5);
        assert!(config.tags.is_none() && config.epsilon.is_none());
        assert_eq!(config.label_path(), PathBuf::from("./ASAP-cluster-label.dat"));
    }
}
