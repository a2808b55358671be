//! Stochastic Pauli noise simulated by Monte-Carlo trajectories.
//!
//! Every shot replays the circuit on a fresh state. After each gate a Pauli error
//! is drawn with the configured probability, and each measured bit is flipped
//! with the read-out error probability.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::{Backend, Counts, SimError, check_shots, check_width, outcome_key};
use crate::circuit::Circuit;
use crate::gates::{PAULI_X, PAULI_Y, PAULI_Z};
use crate::statevector_backend::{
    StatevectorSimulator, apply_gate, check_terminal_measurements, rng_from,
};
use crate::{Gate, StateVector};

/// Depolarizing gate errors plus symmetric read-out error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NoiseModel {
    #[serde(default)]
    pub single_qubit_error: f64,
    #[serde(default)]
    pub two_qubit_error: f64,
    #[serde(default)]
    pub readout_error: f64,
}

impl NoiseModel {
    pub fn validate(&self) -> Result<(), SimError> {
        for (label, p) in [
            ("single_qubit_error", self.single_qubit_error),
            ("two_qubit_error", self.two_qubit_error),
            ("readout_error", self.readout_error),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::Noise(format!("{} = {} is not a probability", label, p)));
            }
        }
        Ok(())
    }

    pub fn is_ideal(&self) -> bool {
        self.single_qubit_error == 0.0 && self.two_qubit_error == 0.0 && self.readout_error == 0.0
    }
}

/// Undirected list of qubit pairs that may share a CX. Empty means all-to-all.
pub type CouplingMap = Vec<(usize, usize)>;

pub struct NoisySimulator {
    noise: NoiseModel,
    coupling_map: CouplingMap,
    seed: Option<u64>,
}

impl NoisySimulator {
    pub fn new(noise: NoiseModel, coupling_map: CouplingMap) -> Result<Self, SimError> {
        noise.validate()?;
        Ok(Self {
            noise,
            coupling_map,
            seed: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn check_coupling(&self, circuit: &Circuit) -> Result<(), SimError> {
        if self.coupling_map.is_empty() {
            return Ok(());
        }
        for gate in &circuit.gates {
            if let Gate::CX { control, target } = *gate {
                let coupled = self
                    .coupling_map
                    .iter()
                    .any(|&(a, b)| (a, b) == (control, target) || (b, a) == (control, target));
                if !coupled {
                    return Err(SimError::Coupling { control, target });
                }
            }
        }
        Ok(())
    }

    fn apply_random_pauli(state: &mut StateVector, qubit: usize, rng: &mut StdRng) {
        let m = match rng.gen_range(0..3) {
            0 => &PAULI_X,
            1 => &PAULI_Y,
            _ => &PAULI_Z,
        };
        state.apply_single_qubit_gate(m, qubit);
    }

    fn run_trajectory(
        &self,
        circuit: &Circuit,
        measured: &[(usize, usize)],
        rng: &mut StdRng,
    ) -> Result<usize, SimError> {
        let mut state = StateVector::new(circuit.num_qubits);
        for gate in &circuit.gates {
            apply_gate(&mut state, gate);
            match *gate {
                Gate::CX { control, target } => {
                    if rng.gen_bool(self.noise.two_qubit_error) {
                        // one of the 15 non-identity two-qubit Paulis, uniformly
                        let pick = rng.gen_range(1..16);
                        for (qubit, code) in [(control, pick & 3), (target, pick >> 2)] {
                            match code {
                                1 => state.apply_single_qubit_gate(&PAULI_X, qubit),
                                2 => state.apply_single_qubit_gate(&PAULI_Y, qubit),
                                3 => state.apply_single_qubit_gate(&PAULI_Z, qubit),
                                _ => {}
                            }
                        }
                    }
                }
                Gate::Barrier | Gate::Measure { .. } => {}
                _ => {
                    if rng.gen_bool(self.noise.single_qubit_error) {
                        for q in gate.qubits() {
                            Self::apply_random_pauli(&mut state, q, rng);
                        }
                    }
                }
            }
        }

        let mut index = state.sample_index(rng)?;
        for &(qubit, _) in measured {
            if rng.gen_bool(self.noise.readout_error) {
                index ^= 1 << qubit;
            }
        }
        Ok(index)
    }
}

impl Backend for NoisySimulator {
    fn name(&self) -> &str {
        "noisy_trajectory_simulator"
    }

    fn execute(&self, circuit: &Circuit, shots: u64) -> Result<Counts, SimError> {
        check_shots(shots)?;
        check_width(circuit.num_qubits)?;
        check_terminal_measurements(circuit)?;
        self.check_coupling(circuit)?;

        if self.noise.is_ideal() {
            let sim = StatevectorSimulator::new(circuit.num_qubits);
            return match self.seed {
                Some(s) => sim.with_seed(s).execute(circuit, shots),
                None => sim.execute(circuit, shots),
            };
        }

        let measured = circuit.measurements();
        let mut rng = rng_from(self.seed);
        let mut counts = Counts::new();
        for _ in 0..shots {
            let idx = self.run_trajectory(circuit, &measured, &mut rng)?;
            *counts.entry(outcome_key(circuit, idx)).or_insert(0) += 1;
        }
        debug!(
            circuit = %circuit.name,
            shots,
            outcomes = counts.len(),
            "noisy execution finished"
        );
        Ok(counts)
    }
}
