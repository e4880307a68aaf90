use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use kmat_cluster::utils::{Matrix, read_labels, write_matrix};
use kmat_cluster::{Config, Error, run};

/// Scratch directory removed when the returned guard drops.
fn workdir() -> (TempDir, PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().to_path_buf();
    (tmp, dir)
}

/// Gaussian kernel of two well-separated groups of points on a line and one outlier.
fn two_group_kernel() -> Matrix {
    let mut xs = Vec::new();
    for k in 0..8 {
        xs.push(k as f64 * 0.05);
        xs.push(3.0 + k as f64 * 0.05);
    }
    xs.push(10.0);
    let n = xs.len();
    Matrix::from_fn(n, n, |i, j| (-(xs[i] - xs[j]).powi(2)).exp())
}

#[test]
fn test_identity_like_kernel() {
    let (_tmp, dir) = workdir();
    let kmat = dir.join("kmat.dat");
    fs::write(
        &kmat,
        "1 0 0 0\n0 2 0 0\n0 0 3 0\n0 0 0 4\n",
    )
    .unwrap();

    let config = Config::new(&kmat).with_prefix("identity").with_out_dir(&dir);
    let outcome = run(&config).unwrap();
    assert_eq!(outcome.labels.len(), 4);
    assert_eq!(outcome.projection.nrows(), 4);
    assert!(fs::metadata(&outcome.figure_path).unwrap().len() > 0);
    assert_eq!(outcome.figure_path, dir.join("Clustering_4_identity.png"));
    assert_eq!(read_labels(&outcome.label_path).unwrap(), outcome.labels);
}

#[test]
fn test_two_groups() {
    let (_tmp, dir) = workdir();
    let kmat = dir.join("kmat.dat");
    write_matrix(&kmat, &two_group_kernel()).unwrap();
    let tags = dir.join("tags.txt");
    fs::write(&tags, "left\nright\n").unwrap();

    let config = Config::new(&kmat)
        .with_tags(&tags)
        .with_prefix("groups")
        .with_components(3, 0, 1)
        .with_epsilon(0.5)
        .with_min_samples(3)
        .with_out_dir(&dir)
        .with_plot_size(600, 400);
    let outcome = run(&config).unwrap();

    assert_eq!(outcome.n_clusters, 2);
    assert_eq!(outcome.epsilon, 0.5);
    let labels = &outcome.labels;
    assert_eq!(labels.len(), 17);
    for k in 0..8 {
        assert_eq!(labels[2 * k], labels[0]);
        assert_eq!(labels[2 * k + 1], labels[1]);
    }
    assert_ne!(labels[0], labels[1]);
    assert_eq!(labels[16], -1);
    assert_eq!(read_labels(&outcome.label_path).unwrap(), *labels);
}

#[test]
fn test_fewer_tags_than_samples() {
    let (_tmp, dir) = workdir();
    let kmat = dir.join("kmat.dat");
    write_matrix(&kmat, &two_group_kernel()).unwrap();
    let tags = dir.join("tags.txt");
    fs::write(&tags, "a\nb\nc\n").unwrap();

    let config = Config::new(&kmat)
        .with_tags(&tags)
        .with_out_dir(&dir)
        .with_plot_size(600, 400);
    let outcome = run(&config).unwrap();
    assert_eq!(outcome.labels.len(), 17);
}

#[test]
fn test_more_tags_than_samples() {
    let (_tmp, dir) = workdir();
    let kmat = dir.join("kmat.dat");
    fs::write(&kmat, "1 0.5\n0.5 1\n").unwrap();
    let tags = dir.join("tags.txt");
    fs::write(&tags, "a\nb\nc\n").unwrap();

    let config = Config::new(&kmat).with_tags(&tags).with_out_dir(&dir);
    assert!(matches!(
        run(&config),
        Err(Error::TooManyTags {
            tags: 3,
            samples: 2
        })
    ));
    assert!(!config.label_path().exists());
}

#[test]
fn test_unreadable_kernel() {
    let (_tmp, dir) = workdir();
    let missing = Config::new(dir.join("missing.dat")).with_out_dir(&dir);
    let err = run(&missing).unwrap_err();
    assert!(matches!(err, Error::KernelLoad));
    assert_eq!(err.to_string(), "Cannot load the kernel matrix");

    let garbage = dir.join("garbage.dat");
    fs::write(&garbage, "1 x\n").unwrap();
    assert!(matches!(
        run(&Config::new(&garbage).with_out_dir(&dir)),
        Err(Error::KernelLoad)
    ));
}

#[test]
fn test_axis_out_of_range() {
    let (_tmp, dir) = workdir();
    let kmat = dir.join("kmat.dat");
    fs::write(&kmat, "1 0 0\n0 1 0\n0 0 1\n").unwrap();
    let config = Config::new(&kmat)
        .with_components(2, 0, 2)
        .with_out_dir(&dir);
    assert!(matches!(
        run(&config),
        Err(Error::InvalidParameter { name: "pc2", .. })
    ));
}
