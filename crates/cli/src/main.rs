use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use dblarea::area::{
    double_area_from_edge_lengths_per_triangle, double_area_from_edge_lengths_with_cfg,
    double_area_per_triangle, double_area_with_cfg, DimKind,
};
use dblarea::rand::{draw_triangle_soup, ReplayToken, TriangleSoupCfg};
use dblarea::{AreaCfg, AreaError};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod mesh_io;
mod provenance;

use provenance::Provenance;

#[derive(Parser)]
#[command(name = "dblarea-cli")]
#[command(about = "Triangle double areas for meshes and edge-length tables")]
struct Cmd {
    /// Optional run tag; propagated to logs and provenance sidecars
    #[arg(long, global = true)]
    tag: Option<String>,

    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Double area per triangle from vertices and faces
    Area {
        #[command(flatten)]
        input: MeshInput,
        #[command(flatten)]
        opts: KernelOpts,
        #[arg(long)]
        out: PathBuf,
    },
    /// Double area per row of a headerless `#F × 3` edge-length CSV
    Lengths {
        #[arg(long)]
        lengths: PathBuf,
        #[command(flatten)]
        opts: KernelOpts,
        #[arg(long)]
        out: PathBuf,
    },
    /// Write a random triangle soup as a JSON mesh
    Sample {
        #[arg(long, default_value_t = 3)]
        dim: usize,
        #[arg(long, default_value_t = 100)]
        triangles: usize,
        /// Shared vertex pool size; below 3 gives every triangle fresh vertices
        #[arg(long, default_value_t = 0)]
        vertices: usize,
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 0)]
        index: u64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Args)]
struct MeshInput {
    /// JSON mesh `{"vertices": [[..]], "faces": [[i, j, k]]}`
    #[arg(long, conflicts_with_all = ["vertices", "faces"], required_unless_present = "vertices")]
    mesh: Option<PathBuf>,
    /// Headerless CSV, one vertex per row
    #[arg(long, requires = "faces")]
    vertices: Option<PathBuf>,
    /// Headerless CSV, one index triple per row
    #[arg(long, requires = "vertices")]
    faces: Option<PathBuf>,
}

#[derive(Args, Clone, Copy)]
struct KernelOpts {
    /// Keep going past bad triangles and report them individually
    #[arg(long)]
    per_triangle: bool,
    /// Override the flat-triangle rounding slack (relative to the longest edge)
    #[arg(long)]
    rel_slack: Option<f64>,
}

impl KernelOpts {
    fn cfg(&self) -> AreaCfg {
        let mut cfg = AreaCfg::default();
        if let Some(s) = self.rel_slack {
            cfg.rel_slack = s;
        }
        cfg
    }
}

#[derive(Debug, Serialize)]
struct AreaReport {
    signed: bool,
    triangles: usize,
    double_areas: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<TriangleFailure>,
}

#[derive(Debug, Serialize)]
struct TriangleFailure {
    triangle: Option<usize>,
    error: String,
}

impl AreaReport {
    fn complete(signed: bool, values: impl IntoIterator<Item = f64>) -> Self {
        let double_areas: Vec<Option<f64>> = values.into_iter().map(Some).collect();
        Self {
            signed,
            triangles: double_areas.len(),
            double_areas,
            errors: Vec::new(),
        }
    }

    fn partial(signed: bool, outcomes: Vec<Result<f64, AreaError>>) -> Self {
        let mut double_areas = Vec::with_capacity(outcomes.len());
        let mut errors = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(x) => double_areas.push(Some(x)),
                Err(e) => {
                    double_areas.push(None);
                    errors.push(TriangleFailure {
                        triangle: e.triangle(),
                        error: e.to_string(),
                    });
                }
            }
        }
        Self {
            signed,
            triangles: double_areas.len(),
            double_areas,
            errors,
        }
    }
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    match cmd.action {
        Action::Area { input, opts, out } => area(&input, opts, &out, cmd.tag),
        Action::Lengths { lengths, opts, out } => lengths_cmd(&lengths, opts, &out, cmd.tag),
        Action::Sample {
            dim,
            triangles,
            vertices,
            scale,
            seed,
            index,
            out,
        } => sample(
            TriangleSoupCfg {
                dim,
                triangles,
                vertices,
                scale,
            },
            ReplayToken { seed, index },
            &out,
            cmd.tag,
        ),
        Action::Report => report(cmd.tag),
    }
}

fn load_mesh(input: &MeshInput) -> Result<(nalgebra::DMatrix<f64>, nalgebra::DMatrix<usize>)> {
    match (&input.mesh, &input.vertices, &input.faces) {
        (Some(mesh), None, None) => mesh_io::read_mesh_json(mesh),
        (None, Some(v), Some(f)) => Ok((mesh_io::read_f64_csv(v)?, mesh_io::read_index_csv(f)?)),
        _ => bail!("pass either --mesh or both --vertices and --faces"),
    }
}

fn area(input: &MeshInput, opts: KernelOpts, out: &Path, tag: Option<String>) -> Result<()> {
    let (v, f) = load_mesh(input)?;
    tracing::info!(vertices = v.nrows(), dim = v.ncols(), triangles = f.nrows(), tag = ?tag, "area");
    let cfg = opts.cfg();
    let signed = DimKind::from_dim(v.ncols())
        .map(|k| k.is_signed())
        .unwrap_or(false);
    let report = if opts.per_triangle {
        AreaReport::partial(signed, double_area_per_triangle(&v, &f, &cfg)?)
    } else {
        AreaReport::complete(signed, double_area_with_cfg(&v, &f, &cfg)?.iter().copied())
    };
    write_report(out, &report)?;
    let params = json!({
        "mesh": input.mesh,
        "vertices": input.vertices,
        "faces": input.faces,
        "per_triangle": opts.per_triangle,
        "rel_slack": cfg.rel_slack,
        "failed": report.errors.len(),
    });
    Provenance::new("area", params).tagged(tag).write(out)?;
    Ok(())
}

fn lengths_cmd(lengths: &Path, opts: KernelOpts, out: &Path, tag: Option<String>) -> Result<()> {
    let l = mesh_io::read_f64_csv(lengths)?;
    tracing::info!(triangles = l.nrows(), tag = ?tag, "lengths");
    let cfg = opts.cfg();
    let report = if opts.per_triangle {
        AreaReport::partial(false, double_area_from_edge_lengths_per_triangle(&l, &cfg)?)
    } else {
        AreaReport::complete(
            false,
            double_area_from_edge_lengths_with_cfg(&l, &cfg)?.iter().copied(),
        )
    };
    write_report(out, &report)?;
    let params = json!({
        "lengths": lengths,
        "per_triangle": opts.per_triangle,
        "rel_slack": cfg.rel_slack,
        "failed": report.errors.len(),
    });
    Provenance::new("lengths", params).tagged(tag).write(out)?;
    Ok(())
}

fn sample(cfg: TriangleSoupCfg, tok: ReplayToken, out: &Path, tag: Option<String>) -> Result<()> {
    if cfg.dim == 0 {
        bail!("--dim must be positive");
    }
    tracing::info!(dim = cfg.dim, triangles = cfg.triangles, seed = tok.seed, index = tok.index, "sample");
    let (v, f) = draw_triangle_soup(&cfg, &mut tok.to_std_rng());
    mesh_io::write_mesh_json(out, &v, &f)?;
    let params = json!({
        "dim": cfg.dim,
        "triangles": cfg.triangles,
        "vertices": cfg.vertices,
        "scale": cfg.scale,
        "seed": tok.seed,
        "index": tok.index,
    });
    Provenance::new("sample", params).tagged(tag).write(out)?;
    Ok(())
}

fn report(tag: Option<String>) -> Result<()> {
    let record = Provenance::new("report", json!({})).tagged(tag);
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn write_report(out: &Path, report: &AreaReport) -> Result<()> {
    mesh_io::ensure_parent(out)?;
    fs::write(out, serde_json::to_vec_pretty(report)?)
        .with_context(|| format!("writing {}", out.display()))?;
    if !report.errors.is_empty() {
        tracing::warn!(failed = report.errors.len(), out = %out.display(), "some triangles failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::tempdir;

    fn read_json(path: &Path) -> Value {
        serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
    }

    #[test]
    fn area_from_csv_writes_output_and_sidecar() {
        let dir = tempdir().unwrap();
        let vp = dir.path().join("v.csv");
        let fp = dir.path().join("f.csv");
        fs::write(&vp, "0.0,0.0\n3.0,0.0\n0.0,4.0\n").unwrap();
        fs::write(&fp, "0,1,2\n0,2,1\n").unwrap();
        let out = dir.path().join("out/areas.json");
        let input = MeshInput {
            mesh: None,
            vertices: Some(vp),
            faces: Some(fp),
        };
        let opts = KernelOpts {
            per_triangle: false,
            rel_slack: None,
        };
        area(&input, opts, &out, Some("t".into())).unwrap();
        let doc = read_json(&out);
        assert_eq!(doc["signed"], true);
        assert_eq!(doc["double_areas"][0], 12.0);
        assert_eq!(doc["double_areas"][1], -12.0);
        assert!(doc.get("errors").is_none());
        assert!(dir.path().join("out/areas.provenance.json").exists());
    }

    #[test]
    fn sampled_mesh_feeds_area() {
        let dir = tempdir().unwrap();
        let mesh = dir.path().join("mesh.json");
        let cfg = TriangleSoupCfg {
            dim: 4,
            triangles: 25,
            vertices: 10,
            scale: 1.0,
        };
        sample(cfg, ReplayToken { seed: 9, index: 0 }, &mesh, None).unwrap();
        let out = dir.path().join("areas.json");
        let input = MeshInput {
            mesh: Some(mesh),
            vertices: None,
            faces: None,
        };
        let opts = KernelOpts {
            per_triangle: false,
            rel_slack: None,
        };
        area(&input, opts, &out, None).unwrap();
        let doc = read_json(&out);
        assert_eq!(doc["triangles"], 25);
        assert_eq!(doc["signed"], false);
        let vals = doc["double_areas"].as_array().unwrap();
        assert!(vals.iter().all(|x| x.as_f64().unwrap() >= 0.0));
    }

    #[test]
    fn lengths_per_triangle_reports_bad_rows() {
        let dir = tempdir().unwrap();
        let lp = dir.path().join("l.csv");
        fs::write(&lp, "3.0,4.0,5.0\n1.0,1.0,5.0\n").unwrap();
        let out = dir.path().join("areas.json");
        let opts = KernelOpts {
            per_triangle: true,
            rel_slack: None,
        };
        lengths_cmd(&lp, opts, &out, None).unwrap();
        let doc = read_json(&out);
        assert_eq!(doc["double_areas"][0], 12.0);
        assert!(doc["double_areas"][1].is_null());
        assert_eq!(doc["errors"][0]["triangle"], 1);

        // atomic mode fails the whole call and writes nothing
        let out2 = dir.path().join("atomic.json");
        let opts = KernelOpts {
            per_triangle: false,
            rel_slack: None,
        };
        assert!(lengths_cmd(&lp, opts, &out2, None).is_err());
        assert!(!out2.exists());
    }

    #[test]
    fn cli_parses_mesh_and_csv_inputs() {
        let cmd = Cmd::try_parse_from(["dblarea-cli", "area", "--mesh", "m.json", "--out", "o.json"]);
        assert!(cmd.is_ok());
        let cmd = Cmd::try_parse_from([
            "dblarea-cli", "area", "--vertices", "v.csv", "--faces", "f.csv", "--out", "o.json",
        ]);
        assert!(cmd.is_ok());
        let cmd = Cmd::try_parse_from(["dblarea-cli", "area", "--vertices", "v.csv", "--out", "o.json"]);
        assert!(cmd.is_err());
    }
}
