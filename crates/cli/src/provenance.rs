//! `<stem>.provenance.json` records written next to every CLI output.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::mesh_io::{ensure_parent, sidecar_path};

#[derive(Debug, Serialize)]
pub struct Callsite {
    pub file: &'static str,
    pub line: u32,
}

/// Where an output came from: code revision, command, and its parameters.
#[derive(Debug, Serialize)]
pub struct Provenance {
    pub code_rev: String,
    pub lib_version: &'static str,
    pub command: &'static str,
    pub tag: Option<String>,
    pub callsite: Callsite,
    pub params: Value,
    pub outputs: Vec<String>,
}

impl Provenance {
    /// Records the caller's location as the callsite.
    #[track_caller]
    pub fn new(command: &'static str, params: Value) -> Self {
        let loc = Location::caller();
        Self {
            code_rev: code_rev(),
            lib_version: dblarea::VERSION,
            command,
            tag: None,
            callsite: Callsite {
                file: loc.file(),
                line: loc.line(),
            },
            params,
            outputs: Vec::new(),
        }
    }

    pub fn tagged(mut self, tag: Option<String>) -> Self {
        self.tag = tag;
        self
    }

    /// Write the record next to `out` and return the sidecar path.
    pub fn write(mut self, out: &Path) -> Result<PathBuf> {
        let path = sidecar_path(out);
        ensure_parent(&path)?;
        self.outputs.push(out.to_string_lossy().into_owned());
        fs::write(&path, serde_json::to_vec_pretty(&self)?)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::debug!(path = %path.display(), command = self.command, "provenance");
        Ok(path)
    }
}

/// `GIT_COMMIT` (build time, then run time), else `git rev-parse HEAD`.
fn code_rev() -> String {
    let nonempty = |rev: String| (!rev.is_empty()).then_some(rev);
    option_env!("GIT_COMMIT")
        .map(str::to_owned)
        .and_then(nonempty)
        .or_else(|| std::env::var("GIT_COMMIT").ok().and_then(nonempty))
        .or_else(git_head)
        .unwrap_or_else(|| "unknown".to_owned())
}

fn git_head() -> Option<String> {
    let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let rev = String::from_utf8(out.stdout).ok()?;
    Some(rev.trim().to_owned())
}
