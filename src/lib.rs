#![doc = include_str!("../README.md")]

pub mod cluster;
pub mod dbscan;
pub mod distance;
pub mod error;
pub mod kpca;
pub mod pipeline;
pub mod plot;
pub mod utils;

pub use error::{Error, Result};
pub use pipeline::{Config, Outcome, run};
