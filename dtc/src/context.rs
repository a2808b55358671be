use qsim::{CouplingMap, NoiseModel};
use serde::{Deserialize, Serialize};

use crate::error::{Result, invalid};

/// Sampling seed of the ideal simulator unless configured otherwise.
pub const DEFAULT_SEED: u64 = 4;

fn default_seed() -> Option<u64> {
    Some(DEFAULT_SEED)
}

/// Where circuits run. Each variant carries only what it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Noise-free local statevector simulation.
    Ideal {
        #[serde(default = "default_seed")]
        seed: Option<u64>,
    },
    /// A remote device, reached through an injected backend.
    Hardware { device: String },
    /// Local trajectory simulation under a device-like noise model.
    NoisyLocal {
        noise: NoiseModel,
        #[serde(default)]
        coupling_map: CouplingMap,
        #[serde(default)]
        seed: Option<u64>,
    },
}

impl Default for ExecutionMode {
    fn default() -> Self {
        ExecutionMode::Ideal {
            seed: default_seed(),
        }
    }
}

/// Shot budget and execution mode for a run. Built once, shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionContext {
    shots: u64,
    mode: ExecutionMode,
}

impl ExecutionContext {
    pub fn new(shots: u64, mode: ExecutionMode) -> Result<Self> {
        if shots == 0 {
            return Err(invalid("shot budget must be positive"));
        }
        Ok(Self { shots, mode })
    }

    pub fn ideal(shots: u64) -> Result<Self> {
        Self::new(shots, ExecutionMode::default())
    }

    pub fn shots(&self) -> u64 {
        self.shots
    }

    pub fn mode(&self) -> &ExecutionMode {
        &self.mode
    }
}
