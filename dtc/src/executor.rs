use std::sync::Arc;

use qsim::{Backend, Circuit, Counts, NoisySimulator, SimError, StatevectorSimulator};
use tracing::debug;

use crate::context::{ExecutionContext, ExecutionMode};
use crate::error::Result;
use crate::expectation::{ExperimentResults, expectation_value};

/// Runs circuits under one [`ExecutionContext`].
#[derive(Clone)]
pub struct Executor {
    context: ExecutionContext,
    backend: Arc<dyn Backend>,
}

impl Executor {
    /// Builds the local backend for the context's mode.
    ///
    /// `Hardware` has no local backend; use [`Executor::with_remote`] for it.
    pub fn new(context: ExecutionContext) -> Result<Self> {
        let backend: Arc<dyn Backend> = match context.mode() {
            ExecutionMode::Ideal { seed } => {
                let sim = StatevectorSimulator::default();
                Arc::new(match seed {
                    Some(s) => sim.with_seed(*s),
                    None => sim,
                })
            }
            ExecutionMode::NoisyLocal {
                noise,
                coupling_map,
                seed,
            } => {
                let sim = NoisySimulator::new(*noise, coupling_map.clone())?;
                Arc::new(match seed {
                    Some(s) => sim.with_seed(*s),
                    None => sim,
                })
            }
            ExecutionMode::Hardware { device } => {
                return Err(SimError::Unavailable(format!(
                    "no remote provider registered for device '{}'",
                    device
                ))
                .into());
            }
        };
        Ok(Self { context, backend })
    }

    /// Uses a caller-supplied backend, typically a client for remote hardware.
    pub fn with_remote(context: ExecutionContext, backend: Arc<dyn Backend>) -> Self {
        Self { context, backend }
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn counts(&self, circuit: &Circuit) -> Result<Counts> {
        debug!(circuit = %circuit.name, backend = self.backend.name(), "executing");
        Ok(self.backend.execute(circuit, self.context.shots())?)
    }

    /// Executes every circuit, keyed by circuit name.
    pub fn run(&self, circuits: &[Circuit]) -> Result<ExperimentResults> {
        let mut results = ExperimentResults::new();
        for circuit in circuits {
            results.insert(circuit.name.clone(), self.counts(circuit)?);
        }
        Ok(results)
    }

    /// Executes `circuit` and returns the spin polarisation at `site`.
    pub fn expectation(&self, circuit: &Circuit, site: usize) -> Result<f64> {
        let results = self.run(std::slice::from_ref(circuit))?;
        expectation_value(
            circuit.num_qubits,
            site,
            &results,
            self.context.shots(),
            &circuit.name,
        )
    }
}
