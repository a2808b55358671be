use num_complex::Complex;
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use serde::Serialize;

use crate::api::SimError;

/// Widest register the dense statevector supports: 2^30 amplitudes, 16 GiB.
pub const MAX_QUBITS: usize = 30;

/// 2x2 complex matrix acting on one qubit.
pub type GateMatrix = [[Complex<f64>; 2]; 2];

#[derive(Serialize, Clone, Debug)]
pub struct StateVector {
    pub num_qubits: usize,
    #[serde(rename = "amplitudes")]
    pub amplitudes: Vec<Complex<f64>>,
}

impl StateVector {
    /// Callers check the width against [`MAX_QUBITS`] first (see `check_width`).
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits; // 2^num_qubits
        let mut amplitudes = vec![Complex::new(0.0, 0.0); size];
        amplitudes[0] = Complex::new(1.0, 0.0);
        Self {
            num_qubits,
            amplitudes,
        }
    }

    /// Amplitude index `i` has qubit `q` set when bit `q` of `i` is one.
    pub fn apply_single_qubit_gate(&mut self, gate_matrix: &GateMatrix, target_qubit: usize) {
        let k = 1 << target_qubit;

        for i in 0..self.amplitudes.len() {
            if (i & k) == 0 {
                let j = i | k;
                let amp_i = self.amplitudes[i];
                let amp_j = self.amplitudes[j];

                self.amplitudes[i] = gate_matrix[0][0] * amp_i + gate_matrix[0][1] * amp_j;
                self.amplitudes[j] = gate_matrix[1][0] * amp_i + gate_matrix[1][1] * amp_j;
            }
        }
    }

    pub fn apply_cx(&mut self, control_qubit: usize, target_qubit: usize) {
        let control_mask = 1 << control_qubit;
        let target_mask = 1 << target_qubit;

        for i in 0..self.amplitudes.len() {
            if (i & control_mask) != 0 && (i & target_mask) == 0 {
                let j = i | target_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Builds the weighted distribution over basis indices. Reusable across shots.
    pub fn distribution(&self) -> Result<WeightedIndex<f64>, SimError> {
        WeightedIndex::new(self.probabilities()).map_err(|e| SimError::Internal(e.to_string()))
    }

    /// Draws a single basis index without collapsing the state.
    pub fn sample_index(&self, rng: &mut impl Rng) -> Result<usize, SimError> {
        Ok(self.distribution()?.sample(rng))
    }

    pub fn reset(&mut self) {
        for amp in &mut self.amplitudes {
            *amp = Complex::new(0.0, 0.0);
        }
        self.amplitudes[0] = Complex::new(1.0, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::{HADAMARD, PAULI_X};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: Complex<f64>, b: Complex<f64>) -> bool {
        (a.re - b.re).abs() < EPSILON && (a.im - b.im).abs() < EPSILON
    }

    #[test]
    fn test_state_vector_initialization() {
        let num_qubits = 3;
        let state = StateVector::new(num_qubits);
        assert_eq!(state.num_qubits, num_qubits);
        assert_eq!(state.amplitudes.len(), 1 << num_qubits);
        assert!(approx_eq(state.amplitudes[0], Complex::new(1.0, 0.0)));
        for i in 1..state.amplitudes.len() {
            assert!(approx_eq(state.amplitudes[i], Complex::new(0.0, 0.0)));
        }
    }

    #[test]
    fn test_sampling_a_basis_state() {
        let mut state = StateVector::new(2); // |00>
        state.apply_single_qubit_gate(&PAULI_X, 1);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            assert_eq!(state.sample_index(&mut rng).unwrap(), 2);
        }
        // sampling must not collapse anything
        assert!(approx_eq(state.amplitudes[2], Complex::new(1.0, 0.0)));
    }

    #[test]
    fn test_bell_state() {
        let mut state = StateVector::new(2);
        state.apply_single_qubit_gate(&HADAMARD, 0);
        state.apply_cx(0, 1);
        let expected_amp = Complex::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
        assert!(approx_eq(state.amplitudes[0], expected_amp));
        assert!(approx_eq(state.amplitudes[1], Complex::new(0.0, 0.0)));
        assert!(approx_eq(state.amplitudes[2], Complex::new(0.0, 0.0)));
        assert!(approx_eq(state.amplitudes[3], expected_amp));
        assert!((state.norm_sqr() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_reset_restores_ground_state() {
        let mut state = StateVector::new(1);
        state.apply_single_qubit_gate(&HADAMARD, 0);
        state.reset();
        assert!(approx_eq(state.amplitudes[0], Complex::new(1.0, 0.0)));
        assert!(approx_eq(state.amplitudes[1], Complex::new(0.0, 0.0)));
    }
}
