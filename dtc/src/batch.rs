use qsim::Circuit;
use rayon::prelude::*;
use tracing::info;

use crate::error::{Result, invalid};
use crate::executor::Executor;
use crate::zne::{ZneConfig, execute_with_zne};

/// Circuits handed to the backend per batch.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 75;

/// Evaluates the spin polarisation at one site for many circuits.
pub struct BatchRunner<'a> {
    executor: &'a Executor,
    site: usize,
    max_batch_size: usize,
    zne: Option<ZneConfig>,
}

impl<'a> BatchRunner<'a> {
    pub fn new(executor: &'a Executor, site: usize) -> Self {
        Self {
            executor,
            site,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            zne: None,
        }
    }

    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    pub fn with_zne(mut self, config: ZneConfig) -> Self {
        self.zne = Some(config);
        self
    }

    fn evaluate_one(&self, circuit: &Circuit) -> Result<f64> {
        match &self.zne {
            Some(config) => execute_with_zne(circuit, config, |c| self.executor.expectation(c, self.site)),
            None => self.executor.expectation(circuit, self.site),
        }
    }

    /// One value per circuit, in input order. Circuits of a batch run in
    /// parallel; the first failure aborts the run.
    pub fn evaluate(&self, circuits: &[Circuit]) -> Result<Vec<f64>> {
        if self.max_batch_size == 0 {
            return Err(invalid("max_batch_size must be positive"));
        }
        if let Some(config) = &self.zne {
            config.validate()?;
        }

        let total_batches = circuits.len().div_ceil(self.max_batch_size);
        let mut values = Vec::with_capacity(circuits.len());
        for (i, batch) in circuits.chunks(self.max_batch_size).enumerate() {
            let batch_values = batch
                .par_iter()
                .map(|c| self.evaluate_one(c))
                .collect::<Result<Vec<_>>>()?;
            values.extend(batch_values);
            info!(
                batch = i + 1,
                total_batches,
                circuits = values.len(),
                zne = self.zne.is_some(),
                "batch evaluated"
            );
        }
        Ok(values)
    }
}
