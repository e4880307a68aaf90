use std::path::PathBuf;
use std::process::ExitCode;

use argh::FromArgs;
use log::error;

use kmat_cluster::{Config, run};

/// Cluster a precomputed kernel matrix and plot its kernel PCA projection.
#[derive(FromArgs, Debug)]
struct Args {
    /// location of the kernel matrix file
    #[argh(option)]
    kmat: PathBuf,

    /// location of the tags of the first M samples, "none" to skip
    #[argh(option, default = "String::from(\"none\")")]
    tags: String,

    /// filename prefix
    #[argh(option, default = "String::from(\"ASAP\")")]
    prefix: String,

    /// number of principal components to keep
    #[argh(option, default = "10")]
    d: usize,

    /// principal axis of the horizontal direction
    #[argh(option, default = "0")]
    pc1: usize,

    /// principal axis of the vertical direction
    #[argh(option, default = "1")]
    pc2: usize,

    /// min number of samples in the neighborhood of a core sample
    #[argh(option, default = "5")]
    min_samples: usize,

    /// neighborhood radius, defaults to the std of the kernel entries
    #[argh(option)]
    eps: Option<f64>,

    /// directory of the output files
    #[argh(option, default = "PathBuf::from(\".\")")]
    out_dir: PathBuf,
}

impl Args {
    fn into_config(self) -> Config {
        let mut config = Config::new(self.kmat)
            .with_prefix(&self.prefix)
            .with_components(self.d, self.pc1, self.pc2)
            .with_min_samples(self.min_samples)
            .with_out_dir(self.out_dir);
        if self.tags != "none" {
            config = config.with_tags(self.tags);
        }
        if let Some(eps) = self.eps {
            config = config.with_epsilon(eps);
        }
        config
    }
}

/// Accept the single-dash spelling of the long options.
///
/// Only tokens in flag position are rewritten. Every option takes a value, so
/// the token after an option is passed through as is.
fn normalize_args(raw: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut takes_value = false;
    raw.into_iter()
        .map(|arg| {
            if takes_value {
                takes_value = false;
                return arg;
            }
            let arg = match arg.as_str() {
                "-kmat" | "-tags" => format!("-{arg}"),
                _ => arg,
            };
            takes_value = arg.starts_with("--") && arg != "--" && arg != "--help";
            arg
        })
        .collect()
}

fn parse_args(raw: &[String]) -> Result<Args, ExitCode> {
    let cmd = raw.first().map_or("kmat-cluster", String::as_str);
    let rest = raw.iter().skip(1).map(String::as_str).collect::<Vec<_>>();
    Args::from_args(&[cmd], &rest).map_err(|exit| match exit.status {
        Ok(()) => {
            println!("{}", exit.output);
            ExitCode::SUCCESS
        }
        Err(()) => {
            eprintln!("{}\nRun {} --help for more information.", exit.output, cmd);
            ExitCode::FAILURE
        }
    })
}

fn main() -> ExitCode {
    logforth::stderr().apply();

    let raw = normalize_args(std::env::args());
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(code) => return code,
    };

    match run(&args.into_config()) {
        Ok(outcome) => {
            println!(
                "{} samples, {} clusters, labels in {}, figure in {}",
                outcome.labels.len(),
                outcome.n_clusters,
                outcome.label_path.display(),
                outcome.figure_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::{normalize_args, parse_args};

    fn args(list: &[&str]) -> Vec<String> {
        normalize_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_defaults() {
        let parsed = parse_args(&args(&["bin", "-kmat", "k.dat"])).unwrap();
        assert_eq!(parsed.kmat, PathBuf::from("k.dat"));
        assert_eq!(parsed.tags, "none");
        assert_eq!(parsed.prefix, "ASAP");
        assert_eq!((parsed.d, parsed.pc1, parsed.pc2), (10, 0, 1));
        let config = parsed.into_config();
        assert!(config.tags.is_none());
        assert!(config.epsilon.is_none());
    }

    #[test]
    fn test_all_options() {
        let parsed = parse_args(&args(&[
            "bin", "--kmat", "k.dat", "-tags", "t.txt", "--prefix", "run", "--d", "4", "--pc1",
            "2", "--pc2", "3", "--min-samples", "3", "--eps", "0.5", "--out-dir", "out",
        ]))
        .unwrap();
        let config = parsed.into_config();
        assert_eq!(config.tags, Some(PathBuf::from("t.txt")));
        assert_eq!((config.kpca_d, config.pc1, config.pc2), (4, 2, 3));
        assert_eq!(config.min_samples, 3);
        assert_eq!(config.epsilon, Some(0.5));
        assert_eq!(config.figure_path(), PathBuf::from("out/Clustering_4_run.png"));
    }

    #[test]
    fn test_alias_only_in_flag_position() {
        let parsed = parse_args(&args(&["bin", "--kmat", "k.dat", "--prefix", "-kmat"])).unwrap();
        assert_eq!(parsed.prefix, "-kmat");
        let parsed = parse_args(&args(&["bin", "-tags", "-tags", "-kmat", "-kmat"])).unwrap();
        assert_eq!(parsed.tags, "-tags");
        assert_eq!(parsed.kmat, PathBuf::from("-kmat"));
    }

    #[test]
    fn test_missing_kmat() {
        assert!(parse_args(&args(&["bin", "--prefix", "x"])).is_err());
    }
}
