//! Dense matrix container and text file helpers.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};

/// Dense row-major matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    nrows: usize,
    ncols: usize,
}

impl Matrix {
    /// Create a matrix from row-major data.
    pub fn new(data: Vec<f64>, nrows: usize, ncols: usize) -> Result<Self> {
        if data.len() != nrows * ncols {
            return Err(Error::LengthMismatch {
                expected: nrows * ncols,
                found: data.len(),
            });
        }
        Ok(Self { data, nrows, ncols })
    }

    /// Create a zero-filled matrix.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            data: vec![0.0; nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// Create a matrix with `f(i, j)` at each entry.
    pub fn from_fn(nrows: usize, ncols: usize, f: impl Fn(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(nrows * ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                data.push(f(i, j));
            }
        }
        Self { data, nrows, ncols }
    }

    /// Create a matrix from a list of equally sized rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(nrows * ncols);
        for row in rows {
            if row.len() != ncols {
                return Err(Error::LengthMismatch {
                    expected: ncols,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { data, nrows, ncols })
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Return the matrix dimension, or an error if it is not square.
    pub fn square_dim(&self) -> Result<usize> {
        if !self.is_square() {
            return Err(Error::NotSquare {
                nrows: self.nrows,
                ncols: self.ncols,
            });
        }
        Ok(self.nrows)
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.ncols + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.ncols + j] = value;
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.ncols..(i + 1) * self.ncols]
    }

    /// Copy out column `j`.
    pub fn column(&self, j: usize) -> Vec<f64> {
        (0..self.nrows).map(|i| self.get(i, j)).collect()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Read a whitespace-delimited numeric grid.
///
/// Everything from a `#` to the end of the line is a comment. Blank lines are
/// skipped.
pub fn read_matrix(path: &Path) -> Result<Matrix> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let reader = BufReader::new(file);
    let mut data = Vec::new();
    let mut ncols = None;
    let mut nrows = 0;

    for (lineno, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| io_error(path, e))?;
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let before = data.len();
        for token in line.split_whitespace() {
            let value = token.parse::<f64>().map_err(|e| Error::Parse {
                path: path.to_path_buf(),
                line: lineno + 1,
                message: format!("{token:?}: {e}"),
            })?;
            data.push(value);
        }
        let width = data.len() - before;
        match ncols {
            None => ncols = Some(width),
            Some(n) if n != width => {
                return Err(Error::Parse {
                    path: path.to_path_buf(),
                    line: lineno + 1,
                    message: format!("expected {n} columns, found {width}"),
                });
            }
            Some(_) => {}
        }
        nrows += 1;
    }

    let ncols = ncols.ok_or(Error::EmptyInput)?;
    debug!("read {} x {} matrix from {}", nrows, ncols, path.display());
    Matrix::new(data, nrows, ncols)
}

/// Write a matrix as a whitespace-delimited grid.
pub fn write_matrix(path: &Path, matrix: &Matrix) -> Result<()> {
    let file = File::create(path).map_err(|e| io_error(path, e))?;
    let mut writer = BufWriter::new(file);
    for i in 0..matrix.nrows() {
        let line = matrix
            .row(i)
            .iter()
            .map(|v| format!("{v:e}"))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{line}").map_err(|e| io_error(path, e))?;
    }
    writer.flush().map_err(|e| io_error(path, e))
}

/// Read one tag per non-empty line.
pub fn read_tags(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let mut tags = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| io_error(path, e))?;
        let tag = line.trim();
        if !tag.is_empty() {
            tags.push(tag.to_string());
        }
    }
    Ok(tags)
}

/// Write one integer label per line.
pub fn write_labels(path: &Path, labels: &[i32]) -> Result<()> {
    let file = File::create(path).map_err(|e| io_error(path, e))?;
    let mut writer = BufWriter::new(file);
    for label in labels {
        writeln!(writer, "{label}").map_err(|e| io_error(path, e))?;
    }
    writer.flush().map_err(|e| io_error(path, e))
}

/// Read labels written by [`write_labels`].
pub fn read_labels(path: &Path) -> Result<Vec<i32>> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let mut labels = Vec::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| io_error(path, e))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        labels.push(line.parse::<i32>().map_err(|e| Error::Parse {
            path: path.to_path_buf(),
            line: lineno + 1,
            message: e.to_string(),
        })?);
    }
    Ok(labels)
}
