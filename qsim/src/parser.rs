use crate::Gate;
use crate::api::{SimError, check_width};

/// Extracts the number between the first `[` and the following `]`.
fn index_in(operand: &str) -> Option<usize> {
    let start = operand.find('[')?;
    let end = operand[start..].find(']')? + start;
    operand[start + 1..end].trim().parse::<usize>().ok()
}

/// Extracts `θ` from `name(θ)`.
fn angle_in(head: &str) -> Option<f64> {
    let start = head.find('(')?;
    let end = head.rfind(')')?;
    head[start + 1..end].trim().parse::<f64>().ok()
}

/// A very simple OpenQASM 2.0 parser covering the gate set the simulator runs.
///
/// Returns the register width and the gate list. `measure q -> c;` expands to one
/// measurement per qubit.
pub fn parse_qasm(qasm_str: &str) -> Result<(usize, Vec<Gate>), SimError> {
    let mut num_qubits = None;
    let mut gates = Vec::new();

    for (line_no, line) in qasm_str.lines().enumerate() {
        let trimmed_line = line.trim();
        if trimmed_line.is_empty()
            || trimmed_line.starts_with("//")
            || trimmed_line.starts_with("OPENQASM")
            || trimmed_line.starts_with("include")
        {
            continue;
        }
        let err = || SimError::Qasm(format!("line {}: cannot parse `{}`", line_no + 1, trimmed_line));

        let statement = trimmed_line.trim_end_matches(';').trim();
        let (head, operands) = match statement.find(|c: char| c.is_whitespace()) {
            // `rx(0.5) q[0]` splits after the closing parenthesis
            Some(pos) if !statement[..pos].contains('(') || statement[..pos].contains(')') => {
                (&statement[..pos], statement[pos..].trim())
            }
            _ => match statement.find(')') {
                Some(pos) => (&statement[..=pos], statement[pos + 1..].trim()),
                None => (statement, ""),
            },
        };
        let name = head.split('(').next().unwrap_or(head).trim();

        match name {
            "qreg" => {
                let width = index_in(operands).ok_or_else(err)?;
                check_width(width)?;
                num_qubits = Some(width);
            }
            // Classical registers are implied by the quantum one.
            "creg" => continue,
            "barrier" => gates.push(Gate::Barrier),
            "h" | "x" | "y" | "z" | "s" | "sdg" => {
                let qubit = index_in(operands).ok_or_else(err)?;
                gates.push(match name {
                    "h" => Gate::H { qubit },
                    "x" => Gate::X { qubit },
                    "y" => Gate::Y { qubit },
                    "z" => Gate::Z { qubit },
                    "s" => Gate::S { qubit },
                    _ => Gate::Sdg { qubit },
                });
            }
            "rx" | "ry" | "rz" => {
                let theta = angle_in(head).ok_or_else(err)?;
                let qubit = index_in(operands).ok_or_else(err)?;
                gates.push(match name {
                    "rx" => Gate::RX { qubit, theta },
                    "ry" => Gate::RY { qubit, theta },
                    _ => Gate::RZ { qubit, theta },
                });
            }
            "cx" | "CX" => {
                let mut parts = operands.split(',');
                let control = parts.next().and_then(index_in).ok_or_else(err)?;
                let target = parts.next().and_then(index_in).ok_or_else(err)?;
                gates.push(Gate::CX { control, target });
            }
            "measure" => {
                let (src, dst) = operands.split_once("->").ok_or_else(err)?;
                match (index_in(src), index_in(dst)) {
                    (Some(qubit), Some(clbit)) => gates.push(Gate::Measure { qubit, clbit }),
                    (None, None) => {
                        let n = num_qubits.ok_or_else(err)?;
                        gates.extend((0..n).map(|q| Gate::Measure { qubit: q, clbit: q }));
                    }
                    _ => return Err(err()),
                }
            }
            _ => return Err(err()),
        }
    }

    let num_qubits = num_qubits.ok_or_else(|| SimError::Qasm("missing qreg declaration".into()))?;
    Ok((num_qubits, gates))
}
