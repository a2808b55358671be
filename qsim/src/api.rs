use std::collections::HashMap;

use crate::StateVector;
use crate::state::MAX_QUBITS;
use crate::circuit::Circuit;

/// Outcome histogram: classical bit-string (clbit 0 rightmost) to occurrence count.
pub type Counts = HashMap<String, u64>;

/// Failures while building, parsing or executing a circuit.
#[derive(thiserror::Error, Debug)]
pub enum SimError {
    #[error("QASM parse error: {0}")]
    Qasm(String),
    #[error("Invalid qubit index: {0}")]
    Qubit(usize),
    #[error("{0} qubits exceed the simulator limit of {max}", max = MAX_QUBITS)]
    Width(usize),
    #[error("cx q[{control}],q[{target}] is not in the coupling map")]
    Coupling { control: usize, target: usize },
    #[error("Invalid noise model: {0}")]
    Noise(String),
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pauli {
    I,
    X,
    Y,
    Z,
}

/// Exact-state access, used where sampling noise is unwanted.
pub trait SimulatorApi {
    fn reset(&mut self, num_qubits: usize);
    /// Runs the unitary part of the circuit. Measurements are skipped.
    fn run(&mut self, circuit: &Circuit) -> Result<(), SimError>;
    fn statevector(&self) -> &StateVector;

    /// Non-destructive expectation ⟨ψ|P|ψ⟩ for a Pauli string.
    /// Example: [(Z,0),(X,2)] means Z on q0 ⊗ X on q2, identity elsewhere.
    fn expectation(&self, ops: &[(Pauli, usize)]) -> Result<f64, SimError>;

    /// Sample computational-basis shots without destroying the state.
    fn sample(&self, shots: u64) -> Result<Counts, SimError>;
}

/// Anything that can execute a measured circuit and report outcome counts.
pub trait Backend: Send + Sync {
    fn name(&self) -> &str;
    fn execute(&self, circuit: &Circuit, shots: u64) -> Result<Counts, SimError>;
}

/// Formats a register of measured bits as a counts key, clbit 0 last.
pub fn bits_to_key(clbits: &[bool]) -> String {
    clbits.iter().rev().map(|&b| if b { '1' } else { '0' }).collect()
}

/// Maps a sampled basis index onto the classical register using the circuit's
/// measurements. Unmeasured classical bits read as zero.
pub fn outcome_key(circuit: &Circuit, basis_index: usize) -> String {
    let mut clbits = vec![false; circuit.num_qubits];
    for (qubit, clbit) in circuit.measurements() {
        clbits[clbit] = (basis_index >> qubit) & 1 == 1;
    }
    bits_to_key(&clbits)
}

/// Register widths above [`MAX_QUBITS`] are rejected before any state is allocated.
pub fn check_width(num_qubits: usize) -> Result<(), SimError> {
    if num_qubits > MAX_QUBITS {
        return Err(SimError::Width(num_qubits));
    }
    Ok(())
}

pub(crate) fn check_shots(shots: u64) -> Result<(), SimError> {
    if shots == 0 {
        return Err(SimError::Internal("shot count must be positive".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clbit_zero_is_rightmost() {
        assert_eq!(bits_to_key(&[true, false, false]), "001");
        assert_eq!(bits_to_key(&[false, false, true]), "100");
    }

    #[test]
    fn outcome_key_follows_measure_targets() {
        let mut c = Circuit::new(3);
        // qubit 0 lands in clbit 2, the rest untouched
        c.measure(0, 2).unwrap();
        assert_eq!(outcome_key(&c, 0b001), "100");
        assert_eq!(outcome_key(&c, 0b110), "000");
    }

    #[test]
    fn widths_past_the_limit_are_rejected() {
        assert!(check_width(MAX_QUBITS).is_ok());
        assert!(matches!(check_width(64), Err(SimError::Width(64))));
        assert!(matches!(check_width(70), Err(SimError::Width(70))));
    }
}
