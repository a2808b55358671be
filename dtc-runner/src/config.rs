use std::path::Path;

use anyhow::{Context, Result};
use dtc::{DEFAULT_MAX_BATCH_SIZE, DtcParams, ExecutionContext, ExecutionMode, ZneConfig};
use serde::Deserialize;

/// Chain couplings; the evolution time follows from `steps`.
#[derive(Debug, Clone, Deserialize)]
pub struct Lattice {
    pub n: usize,
    pub j: f64,
    pub dt: f64,
    pub lamb: f64,
    pub omega: f64,
    pub h: f64,
}

fn default_site() -> usize {
    1
}

fn default_batch_size() -> usize {
    DEFAULT_MAX_BATCH_SIZE
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub lattice: Lattice,
    /// Last Trotter step of the series; steps `0..=steps` are evaluated.
    pub steps: usize,
    #[serde(default = "default_site")]
    pub site: usize,
    pub shots: u64,
    #[serde(default)]
    pub mode: ExecutionMode,
    #[serde(default)]
    pub zne: Option<ZneConfig>,
    #[serde(default = "default_batch_size")]
    pub max_batch_size: usize,
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_yaml::from_str(&text).with_context(|| format!("Invalid config in {}", path.display()))
    }

    pub fn params_at(&self, step: usize) -> DtcParams {
        let l = &self.lattice;
        DtcParams {
            n: l.n,
            j: l.j,
            t: step as f64 * l.dt,
            dt: l.dt,
            lamb: l.lamb,
            omega: l.omega,
            h: l.h,
        }
    }

    pub fn context(&self) -> Result<ExecutionContext> {
        Ok(ExecutionContext::new(self.shots, self.mode.clone())?)
    }
}
