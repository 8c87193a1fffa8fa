//! Mesh and table readers/writers for the CLI.
//!
//! - JSON meshes: `{"vertices": [[x, y, ...], ...], "faces": [[i, j, k], ...]}`.
//! - CSV tables: headerless, one row per vertex / face / triangle.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use nalgebra::DMatrix;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct MeshJson {
    pub vertices: Vec<Vec<f64>>,
    pub faces: Vec<Vec<usize>>,
}

impl MeshJson {
    pub fn from_matrices(v: &DMatrix<f64>, f: &DMatrix<usize>) -> Self {
        Self {
            vertices: v.row_iter().map(|r| r.iter().copied().collect()).collect(),
            faces: f.row_iter().map(|r| r.iter().copied().collect()).collect(),
        }
    }

    pub fn to_matrices(&self) -> Result<(DMatrix<f64>, DMatrix<usize>)> {
        let v = rows_to_matrix(&self.vertices, "vertices")?;
        let f = if self.faces.is_empty() {
            DMatrix::zeros(0, 3)
        } else {
            rows_to_matrix(&self.faces, "faces")?
        };
        Ok((v, f))
    }
}

fn rows_to_matrix<T: nalgebra::Scalar + Copy>(
    rows: &[Vec<T>],
    what: &str,
) -> Result<DMatrix<T>> {
    let ncols = rows.first().map_or(0, |r| r.len());
    if let Some((i, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
        bail!(
            "{} row {} has {} entries, expected {} like row 0",
            what,
            i,
            r.len(),
            ncols
        );
    }
    Ok(DMatrix::from_fn(rows.len(), ncols, |i, j| rows[i][j]))
}

pub fn read_mesh_json(path: &Path) -> Result<(DMatrix<f64>, DMatrix<usize>)> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let mesh: MeshJson =
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))?;
    mesh.to_matrices()
}

pub fn write_mesh_json(path: &Path, v: &DMatrix<f64>, f: &DMatrix<usize>) -> Result<()> {
    ensure_parent(path)?;
    let mesh = MeshJson::from_matrices(v, f);
    fs::write(path, serde_json::to_vec_pretty(&mesh)?)
        .with_context(|| format!("writing {}", path.display()))
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    let df = LazyCsvReader::new(path)
        .with_has_header(false)
        .with_infer_schema_length(Some(100))
        .finish()
        .with_context(|| format!("opening {}", path.display()))?
        .collect()
        .with_context(|| format!("reading {}", path.display()))?;
    tracing::debug!(path = %path.display(), rows = df.height(), cols = df.width(), "csv");
    Ok(df)
}

/// Headerless numeric CSV as a dense matrix.
pub fn read_f64_csv(path: &Path) -> Result<DMatrix<f64>> {
    let df = read_csv(path)?;
    let (rows, cols) = df.shape();
    let mut m = DMatrix::<f64>::zeros(rows, cols);
    for (j, s) in df.get_columns().iter().enumerate() {
        let s = s.cast(&DataType::Float64)?;
        for (i, x) in s.f64()?.into_iter().enumerate() {
            m[(i, j)] = x.with_context(|| {
                format!("{}: missing value at row {} column {}", path.display(), i, j)
            })?;
        }
    }
    Ok(m)
}

/// Headerless integer CSV of vertex indices.
pub fn read_index_csv(path: &Path) -> Result<DMatrix<usize>> {
    let df = read_csv(path)?;
    let (rows, cols) = df.shape();
    let mut m = DMatrix::<usize>::zeros(rows, cols);
    for (j, s) in df.get_columns().iter().enumerate() {
        let s = s.cast(&DataType::Int64)?;
        for (i, x) in s.i64()?.into_iter().enumerate() {
            let x = x.with_context(|| {
                format!("{}: missing index at row {} column {}", path.display(), i, j)
            })?;
            m[(i, j)] = usize::try_from(x).with_context(|| {
                format!("{}: negative index {} at row {}", path.display(), x, i)
            })?;
        }
    }
    Ok(m)
}

pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    Ok(())
}

/// `<dir>/<stem>.provenance.json` next to an output file.
pub fn sidecar_path(out: &Path) -> PathBuf {
    let mut name = out
        .file_stem()
        .map_or_else(|| "output".into(), |s| s.to_os_string());
    name.push(".provenance.json");
    out.with_file_name(name)
}
