use rand::SeedableRng;
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use tracing::debug;

use crate::api::{
    Backend, Counts, Pauli, SimError, SimulatorApi, check_shots, check_width, outcome_key,
};
use crate::circuit::Circuit;
use crate::gates::{PAULI_X, PAULI_Y, PAULI_Z};
use crate::{Gate, StateVector};

/// Applies one gate to the state. Barrier and Measure leave it untouched: sampling
/// happens once the unitary part is done.
pub fn apply_gate(state: &mut StateVector, gate: &Gate) {
    match *gate {
        Gate::CX { control, target } => state.apply_cx(control, target),
        Gate::Barrier | Gate::Measure { .. } => {}
        _ => {
            if let (Some(m), Some(&qubit)) = (gate.matrix(), gate.qubits().first()) {
                state.apply_single_qubit_gate(&m, qubit);
            }
        }
    }
}

pub(crate) fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Measurements must be the last operation on their qubit: mid-circuit
/// collapse is not modelled.
pub(crate) fn check_terminal_measurements(circuit: &Circuit) -> Result<(), SimError> {
    let mut measured = vec![false; circuit.num_qubits];
    for gate in &circuit.gates {
        match *gate {
            Gate::Measure { qubit, .. } => measured[qubit] = true,
            Gate::Barrier => {}
            _ => {
                if let Some(q) = gate.qubits().into_iter().find(|&q| measured[q]) {
                    return Err(SimError::Internal(format!(
                        "{} acts on q[{}] after it was measured",
                        gate, q
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Ideal statevector simulator.
pub struct StatevectorSimulator {
    num_qubits: usize,
    state: StateVector,
    seed: Option<u64>,
}

/// Zero-qubit register. Enough for [`Backend`] use, which sizes a fresh state
/// from every circuit it executes.
impl Default for StatevectorSimulator {
    fn default() -> Self {
        Self::new(0)
    }
}

impl StatevectorSimulator {
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            state: StateVector::new(num_qubits),
            seed: None,
        }
    }

    /// Fixes the sampling seed so repeated executions give identical counts.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn apply_circuit(&mut self, c: &Circuit) {
        for g in &c.gates {
            apply_gate(&mut self.state, g);
        }
    }
}

impl SimulatorApi for StatevectorSimulator {
    fn reset(&mut self, n: usize) {
        self.num_qubits = n;
        self.state = StateVector::new(n);
    }

    fn run(&mut self, circuit: &Circuit) -> Result<(), SimError> {
        check_width(circuit.num_qubits)?;
        if self.num_qubits != circuit.num_qubits {
            self.reset(circuit.num_qubits);
        } else {
            self.state.reset();
        }
        self.apply_circuit(circuit);
        Ok(())
    }

    fn statevector(&self) -> &StateVector {
        &self.state
    }

    fn expectation(&self, ops: &[(Pauli, usize)]) -> Result<f64, SimError> {
        // Apply P|ψ⟩ on a clone and compute <ψ|φ>
        let mut phi = self.state.clone();
        for &(p, q) in ops {
            if q >= self.num_qubits {
                return Err(SimError::Qubit(q));
            }
            match p {
                Pauli::I => {}
                Pauli::X => phi.apply_single_qubit_gate(&PAULI_X, q),
                Pauli::Y => phi.apply_single_qubit_gate(&PAULI_Y, q),
                Pauli::Z => phi.apply_single_qubit_gate(&PAULI_Z, q),
            }
        }

        let acc: num_complex::Complex<f64> = self
            .state
            .amplitudes
            .iter()
            .zip(phi.amplitudes.iter())
            .map(|(a, b)| a.conj() * b)
            .sum();
        Ok(acc.re)
    }

    fn sample(&self, shots: u64) -> Result<Counts, SimError> {
        check_shots(shots)?;
        let dist = self.state.distribution()?;
        let mut rng = rng_from(self.seed);
        let mut counts = Counts::new();
        let width = self.num_qubits;
        for _ in 0..shots {
            let idx = dist.sample(&mut rng);
            let bitstr = format!("{:0width$b}", idx, width = width);
            *counts.entry(bitstr).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

impl Backend for StatevectorSimulator {
    fn name(&self) -> &str {
        "statevector_simulator"
    }

    fn execute(&self, circuit: &Circuit, shots: u64) -> Result<Counts, SimError> {
        check_shots(shots)?;
        check_width(circuit.num_qubits)?;
        check_terminal_measurements(circuit)?;

        let mut state = StateVector::new(circuit.num_qubits);
        for g in &circuit.gates {
            apply_gate(&mut state, g);
        }

        let dist = state.distribution()?;
        let mut rng = rng_from(self.seed);
        let mut counts = Counts::new();
        for _ in 0..shots {
            let idx = dist.sample(&mut rng);
            *counts.entry(outcome_key(circuit, idx)).or_insert(0) += 1;
        }
        debug!(
            circuit = %circuit.name,
            shots,
            outcomes = counts.len(),
            "statevector execution finished"
        );
        Ok(counts)
    }
}
