use crate::Gate;
use crate::api::SimError;

#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    pub name: String,
    pub num_qubits: usize,
    pub gates: Vec<Gate>,
}

impl Circuit {
    pub fn new(num_qubits: usize) -> Self {
        Self::with_name(num_qubits, format!("circuit-{}q", num_qubits))
    }

    pub fn with_name(num_qubits: usize, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            gates: Vec::new(),
        }
    }

    /// Appends a gate after checking every operand against the register size.
    pub fn add_gate(&mut self, gate: Gate) -> Result<(), SimError> {
        for q in gate.qubits() {
            if q >= self.num_qubits {
                return Err(SimError::Qubit(q));
            }
        }
        if let Gate::Measure { clbit, .. } = gate {
            if clbit >= self.num_qubits {
                return Err(SimError::Qubit(clbit));
            }
        }
        if let Gate::CX { control, target } = gate {
            if control == target {
                return Err(SimError::Internal(format!(
                    "cx control and target are both q[{}]",
                    control
                )));
            }
        }
        self.gates.push(gate);
        Ok(())
    }

    pub fn h(&mut self, qubit: usize) -> Result<&mut Self, SimError> {
        self.add_gate(Gate::H { qubit })?;
        Ok(self)
    }

    pub fn x(&mut self, qubit: usize) -> Result<&mut Self, SimError> {
        self.add_gate(Gate::X { qubit })?;
        Ok(self)
    }

    pub fn s(&mut self, qubit: usize) -> Result<&mut Self, SimError> {
        self.add_gate(Gate::S { qubit })?;
        Ok(self)
    }

    pub fn sdg(&mut self, qubit: usize) -> Result<&mut Self, SimError> {
        self.add_gate(Gate::Sdg { qubit })?;
        Ok(self)
    }

    pub fn rx(&mut self, theta: f64, qubit: usize) -> Result<&mut Self, SimError> {
        self.add_gate(Gate::RX { qubit, theta })?;
        Ok(self)
    }

    pub fn ry(&mut self, theta: f64, qubit: usize) -> Result<&mut Self, SimError> {
        self.add_gate(Gate::RY { qubit, theta })?;
        Ok(self)
    }

    pub fn rz(&mut self, theta: f64, qubit: usize) -> Result<&mut Self, SimError> {
        self.add_gate(Gate::RZ { qubit, theta })?;
        Ok(self)
    }

    pub fn cx(&mut self, control: usize, target: usize) -> Result<&mut Self, SimError> {
        self.add_gate(Gate::CX { control, target })?;
        Ok(self)
    }

    pub fn barrier(&mut self) -> &mut Self {
        self.gates.push(Gate::Barrier);
        self
    }

    pub fn measure(&mut self, qubit: usize, clbit: usize) -> Result<&mut Self, SimError> {
        self.add_gate(Gate::Measure { qubit, clbit })?;
        Ok(self)
    }

    /// Number of gates that change the state.
    pub fn unitary_len(&self) -> usize {
        self.gates.iter().filter(|g| g.is_unitary()).count()
    }

    /// `(qubit, clbit)` pairs in program order.
    pub fn measurements(&self) -> Vec<(usize, usize)> {
        self.gates
            .iter()
            .filter_map(|g| match *g {
                Gate::Measure { qubit, clbit } => Some((qubit, clbit)),
                _ => None,
            })
            .collect()
    }

    pub fn to_qasm(&self) -> String {
        let mut out = String::from("OPENQASM 2.0;\ninclude \"qelib1.inc\";\n");
        out.push_str(&format!("qreg q[{}];\n", self.num_qubits));
        out.push_str(&format!("creg c[{}];\n", self.num_qubits));
        for gate in &self.gates {
            out.push_str(&gate.to_string());
            out.push('\n');
        }
        out
    }

    pub fn from_qasm(qasm: &str) -> Result<Self, SimError> {
        let (num_qubits, gates) = crate::parser::parse_qasm(qasm)?;
        let mut circuit = Circuit::new(num_qubits);
        for gate in gates {
            circuit.add_gate(gate)?;
        }
        Ok(circuit)
    }
}
