//! Zero-noise extrapolation.
//!
//! The circuit is run at several noise scales by unitary folding
//! (`G -> G (G† G)^k`) and the measured values are extrapolated to zero noise
//! with Richardson's method.

use qsim::Circuit;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, invalid};

fn default_scale_factors() -> Vec<f64> {
    vec![1.0, 2.0, 3.0]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZneConfig {
    /// Noise scale factors, each >= 1 and pairwise distinct.
    #[serde(default = "default_scale_factors")]
    pub scale_factors: Vec<f64>,
}

impl Default for ZneConfig {
    fn default() -> Self {
        Self {
            scale_factors: default_scale_factors(),
        }
    }
}

impl ZneConfig {
    pub fn validate(&self) -> Result<()> {
        if self.scale_factors.is_empty() {
            return Err(invalid("zne needs at least one scale factor"));
        }
        for (i, &f) in self.scale_factors.iter().enumerate() {
            if !(f.is_finite() && f >= 1.0) {
                return Err(invalid(format!("scale factor {} must be >= 1", f)));
            }
            if self.scale_factors[..i].contains(&f) {
                return Err(invalid(format!("scale factor {} appears twice", f)));
            }
        }
        Ok(())
    }
}

/// Folds the unitary gates of `circuit` so its unitary gate count comes as close
/// to `round(len · factor)` as whole `G† G` pairs allow.
///
/// Whole folding rounds go to every gate; the remainder folds a prefix of the
/// gates once more. Barriers and measurements are never folded.
pub fn fold_gates(circuit: &Circuit, factor: f64) -> Result<Circuit> {
    if !(factor.is_finite() && factor >= 1.0) {
        return Err(invalid(format!("scale factor {} must be >= 1", factor)));
    }

    let n_unitary = circuit.unitary_len();
    let target = (n_unitary as f64 * factor).round() as usize;
    let num_folds = target.saturating_sub(n_unitary) / 2;
    let full_rounds = num_folds / n_unitary.max(1);
    let extra_folds = num_folds % n_unitary.max(1);

    let mut folded = Circuit::with_name(circuit.num_qubits, format!("{}@x{}", circuit.name, factor));
    let mut unitary_counter = 0;
    for gate in &circuit.gates {
        folded.add_gate(*gate)?;
        if !gate.is_unitary() {
            continue;
        }

        let rounds = full_rounds + usize::from(unitary_counter < extra_folds);
        unitary_counter += 1;
        for _ in 0..rounds {
            folded.add_gate(gate.inverse())?;
            folded.add_gate(*gate)?;
        }
    }
    Ok(folded)
}

/// Value at zero of the polynomial through `(factors[i], values[i])`.
pub fn richardson_extrapolate(factors: &[f64], values: &[f64]) -> Result<f64> {
    if factors.len() != values.len() || factors.is_empty() {
        return Err(invalid(format!(
            "{} scale factors for {} values",
            factors.len(),
            values.len()
        )));
    }

    // Lagrange interpolation at x = 0
    let mut result = 0.0;
    for (i, &xi) in factors.iter().enumerate() {
        let mut weight = 1.0;
        for (j, &xj) in factors.iter().enumerate() {
            if j != i {
                if xi == xj {
                    return Err(invalid(format!("scale factor {} appears twice", xi)));
                }
                weight *= -xj / (xi - xj);
            }
        }
        result += values[i] * weight;
    }
    Ok(result)
}

/// Evaluates `circuit` at every scale factor with `execute` and extrapolates.
pub fn execute_with_zne<F>(circuit: &Circuit, config: &ZneConfig, execute: F) -> Result<f64>
where
    F: Fn(&Circuit) -> Result<f64>,
{
    config.validate()?;
    let values = config
        .scale_factors
        .iter()
        .map(|&factor| execute(&fold_gates(circuit, factor)?))
        .collect::<Result<Vec<_>>>()?;
    let mitigated = richardson_extrapolate(&config.scale_factors, &values)?;
    debug!(circuit = %circuit.name, ?values, mitigated, "zero-noise extrapolation");
    Ok(mitigated)
}
