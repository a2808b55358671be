use num_complex::Complex;
use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;

use crate::state::GateMatrix;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gate {
    H { qubit: usize },
    X { qubit: usize },
    Y { qubit: usize },
    Z { qubit: usize },
    S { qubit: usize },
    Sdg { qubit: usize },
    RX { qubit: usize, theta: f64 },
    RY { qubit: usize, theta: f64 },
    RZ { qubit: usize, theta: f64 },
    CX { control: usize, target: usize },
    Barrier,
    Measure { qubit: usize, clbit: usize },
}

impl Gate {
    /// Qubits the gate acts on, in operand order.
    pub fn qubits(&self) -> Vec<usize> {
        match *self {
            Gate::H { qubit }
            | Gate::X { qubit }
            | Gate::Y { qubit }
            | Gate::Z { qubit }
            | Gate::S { qubit }
            | Gate::Sdg { qubit }
            | Gate::RX { qubit, .. }
            | Gate::RY { qubit, .. }
            | Gate::RZ { qubit, .. }
            | Gate::Measure { qubit, .. } => vec![qubit],
            Gate::CX { control, target } => vec![control, target],
            Gate::Barrier => Vec::new(),
        }
    }

    pub fn is_unitary(&self) -> bool {
        !matches!(self, Gate::Barrier | Gate::Measure { .. })
    }

    /// The adjoint of a unitary gate. Barrier and Measure map to themselves.
    pub fn inverse(&self) -> Gate {
        match *self {
            Gate::S { qubit } => Gate::Sdg { qubit },
            Gate::Sdg { qubit } => Gate::S { qubit },
            Gate::RX { qubit, theta } => Gate::RX { qubit, theta: -theta },
            Gate::RY { qubit, theta } => Gate::RY { qubit, theta: -theta },
            Gate::RZ { qubit, theta } => Gate::RZ { qubit, theta: -theta },
            other => other,
        }
    }

    /// Matrix of a single-qubit unitary, `None` for CX, Barrier and Measure.
    pub fn matrix(&self) -> Option<GateMatrix> {
        match *self {
            Gate::H { .. } => Some(HADAMARD),
            Gate::X { .. } => Some(PAULI_X),
            Gate::Y { .. } => Some(PAULI_Y),
            Gate::Z { .. } => Some(PAULI_Z),
            Gate::S { .. } => Some(PHASE_S),
            Gate::Sdg { .. } => Some(PHASE_SDG),
            Gate::RX { theta, .. } => Some(rx_matrix(theta)),
            Gate::RY { theta, .. } => Some(ry_matrix(theta)),
            Gate::RZ { theta, .. } => Some(rz_matrix(theta)),
            Gate::CX { .. } | Gate::Barrier | Gate::Measure { .. } => None,
        }
    }
}

impl fmt::Display for Gate {
    /// OpenQASM 2.0 statement for the gate, without a trailing newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Gate::H { qubit } => write!(f, "h q[{}];", qubit),
            Gate::X { qubit } => write!(f, "x q[{}];", qubit),
            Gate::Y { qubit } => write!(f, "y q[{}];", qubit),
            Gate::Z { qubit } => write!(f, "z q[{}];", qubit),
            Gate::S { qubit } => write!(f, "s q[{}];", qubit),
            Gate::Sdg { qubit } => write!(f, "sdg q[{}];", qubit),
            Gate::RX { qubit, theta } => write!(f, "rx({:?}) q[{}];", theta, qubit),
            Gate::RY { qubit, theta } => write!(f, "ry({:?}) q[{}];", theta, qubit),
            Gate::RZ { qubit, theta } => write!(f, "rz({:?}) q[{}];", theta, qubit),
            Gate::CX { control, target } => write!(f, "cx q[{}],q[{}];", control, target),
            Gate::Barrier => write!(f, "barrier q;"),
            Gate::Measure { qubit, clbit } => write!(f, "measure q[{}] -> c[{}];", qubit, clbit),
        }
    }
}

pub const HADAMARD: GateMatrix = [
    [
        Complex::new(FRAC_1_SQRT_2, 0.0),
        Complex::new(FRAC_1_SQRT_2, 0.0),
    ],
    [
        Complex::new(FRAC_1_SQRT_2, 0.0),
        Complex::new(-FRAC_1_SQRT_2, 0.0),
    ],
];

pub const PAULI_X: GateMatrix = [
    [Complex::new(0.0, 0.0), Complex::new(1.0, 0.0)],
    [Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)],
];

pub const PAULI_Y: GateMatrix = [
    [Complex::new(0.0, 0.0), Complex::new(0.0, -1.0)],
    [Complex::new(0.0, 1.0), Complex::new(0.0, 0.0)],
];

pub const PAULI_Z: GateMatrix = [
    [Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)],
    [Complex::new(0.0, 0.0), Complex::new(-1.0, 0.0)],
];

pub const PHASE_S: GateMatrix = [
    [Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)],
    [Complex::new(0.0, 0.0), Complex::new(0.0, 1.0)],
];

pub const PHASE_SDG: GateMatrix = [
    [Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)],
    [Complex::new(0.0, 0.0), Complex::new(0.0, -1.0)],
];

// Rx(θ) = cos(θ/2) I - i sin(θ/2) X
pub fn rx_matrix(theta: f64) -> GateMatrix {
    let (ct, st) = ((theta / 2.0).cos(), (theta / 2.0).sin());
    [
        [Complex::new(ct, 0.0), Complex::new(0.0, -st)],
        [Complex::new(0.0, -st), Complex::new(ct, 0.0)],
    ]
}

// Ry(θ) is real
pub fn ry_matrix(theta: f64) -> GateMatrix {
    let (ct, st) = ((theta / 2.0).cos(), (theta / 2.0).sin());
    [
        [Complex::new(ct, 0.0), Complex::new(-st, 0.0)],
        [Complex::new(st, 0.0), Complex::new(ct, 0.0)],
    ]
}

// Rz(θ) = diag(e^{-iθ/2}, e^{+iθ/2})
pub fn rz_matrix(theta: f64) -> GateMatrix {
    let (ct, st) = ((theta / 2.0).cos(), (theta / 2.0).sin());
    [
        [Complex::new(ct, -st), Complex::new(0.0, 0.0)],
        [Complex::new(0.0, 0.0), Complex::new(ct, st)],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn product(a: &GateMatrix, b: &GateMatrix) -> GateMatrix {
        let mut out = [[Complex::new(0.0, 0.0); 2]; 2];
        for r in 0..2 {
            for c in 0..2 {
                out[r][c] = a[r][0] * b[0][c] + a[r][1] * b[1][c];
            }
        }
        out
    }

    fn is_identity(m: &GateMatrix) -> bool {
        (m[0][0] - Complex::new(1.0, 0.0)).norm() < EPSILON
            && (m[1][1] - Complex::new(1.0, 0.0)).norm() < EPSILON
            && m[0][1].norm() < EPSILON
            && m[1][0].norm() < EPSILON
    }

    #[test]
    fn inverse_gates_cancel() {
        let gates = [
            Gate::S { qubit: 0 },
            Gate::Sdg { qubit: 0 },
            Gate::H { qubit: 0 },
            Gate::RX { qubit: 0, theta: 0.3 },
            Gate::RY { qubit: 0, theta: -1.1 },
            Gate::RZ { qubit: 0, theta: 2.5 },
        ];
        for g in gates {
            let m = g.matrix().unwrap();
            let m_inv = g.inverse().matrix().unwrap();
            assert!(is_identity(&product(&m_inv, &m)), "{:?} does not cancel", g);
        }
    }

    #[test]
    fn s_squared_is_z() {
        let ss = product(&PHASE_S, &PHASE_S);
        for r in 0..2 {
            for c in 0..2 {
                assert!((ss[r][c] - PAULI_Z[r][c]).norm() < EPSILON);
            }
        }
    }

    #[test]
    fn qasm_statements() {
        assert_eq!(Gate::CX { control: 0, target: 1 }.to_string(), "cx q[0],q[1];");
        assert_eq!(Gate::RZ { qubit: 2, theta: -0.5 }.to_string(), "rz(-0.5) q[2];");
        assert_eq!(
            Gate::Measure { qubit: 1, clbit: 1 }.to_string(),
            "measure q[1] -> c[1];"
        );
    }
}
