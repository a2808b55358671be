pub mod api;
pub mod circuit;
pub mod gates;
pub mod noise;
pub mod parser;
pub mod state;
pub mod statevector_backend;

// Re-export key components for easier access from the binary or other libraries.
pub use api::{Backend, Counts, Pauli, SimError, SimulatorApi, check_width};
pub use circuit::Circuit;
pub use gates::Gate;
pub use noise::{CouplingMap, NoiseModel, NoisySimulator};
pub use parser::parse_qasm;
pub use state::{MAX_QUBITS, StateVector};
pub use statevector_backend::StatevectorSimulator;
