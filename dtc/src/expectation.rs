use std::collections::HashMap;

use qsim::Counts;

use crate::error::{DtcError, Result, invalid};
use crate::spins::spin_combinations;

/// Counts of one execution request, keyed by circuit name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperimentResults {
    counts: HashMap<String, Counts>,
}

impl ExperimentResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, circuit_id: impl Into<String>, counts: Counts) {
        self.counts.insert(circuit_id.into(), counts);
    }

    pub fn get_counts(&self, circuit_id: &str) -> Result<&Counts> {
        self.counts
            .get(circuit_id)
            .ok_or_else(|| invalid(format!("no counts recorded for circuit '{}'", circuit_id)))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Sums the counts of `keys` that were observed, each divided by `shot_num`.
/// Missing and zero entries are dropped before normalising.
fn normalized_total(counts: &Counts, keys: &[String], shot_num: u64) -> f64 {
    keys.iter()
        .filter_map(|k| counts.get(k).copied())
        .filter(|&c| c != 0)
        .map(|c| c as f64 / shot_num as f64)
        .sum()
}

/// Spin polarisation at `site` from a bare counts table.
///
/// The denominator is the declared `shot_num`, not the observed total, so a
/// table that undercounts yields a proportionally smaller magnitude.
pub fn spin_expectation(n: usize, site: usize, counts: &Counts, shot_num: u64) -> Result<f64> {
    if shot_num == 0 {
        return Err(DtcError::DivisionByZero);
    }
    let sets = spin_combinations(site, n)?;
    let up = normalized_total(counts, &sets.up, shot_num);
    let down = normalized_total(counts, &sets.down, shot_num);
    Ok(up - down)
}

/// Spin polarisation at `site` for the execution of `circuit_id`.
pub fn expectation_value(
    n: usize,
    site: usize,
    results: &ExperimentResults,
    shot_num: u64,
    circuit_id: &str,
) -> Result<f64> {
    if shot_num == 0 {
        return Err(DtcError::DivisionByZero);
    }
    spin_expectation(n, site, results.get_counts(circuit_id)?, shot_num)
}
