//! Trotterised Floquet evolution of the driven spin chain.
//!
//! Each step applies
//! * H0: `ry(2·lamb·dt)` and `rz(2·lamb·dt)` on every qubit,
//! * H1: the ZZ coupling `cx · rz(-2·J·dt) · cx` on even pairs, then odd pairs,
//! * H2: the drive `rx(2·coeff(h, t, omega)·dt)` on every qubit, `t` being the
//!   start time of the step.
//!
//! The chain is rotated into the Y basis before the first step and back before
//! measurement.

use qsim::{Circuit, MAX_QUBITS};
use serde::{Deserialize, Serialize};

use crate::error::{Result, invalid};

/// Drive amplitude at time `t`.
pub fn coeff(h: f64, t: f64, omega: f64) -> f64 {
    -h * (omega * t / 2.0).cos().powi(2)
}

/// Floor division taken through the remainder, so `0.3 / 0.1` floors to 2.
fn floor_div(a: f64, b: f64) -> f64 {
    let rem = a % b;
    let mut div = (a - rem) / b;
    if rem != 0.0 && (b < 0.0) != (rem < 0.0) {
        div -= 1.0;
    }
    if div == 0.0 {
        return 0.0;
    }
    let floor = div.floor();
    if div - floor > 0.5 { floor + 1.0 } else { floor }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DtcParams {
    /// Number of sites / qubits.
    pub n: usize,
    /// Nearest-neighbour coupling.
    pub j: f64,
    /// Total evolution time.
    pub t: f64,
    /// Trotter step.
    pub dt: f64,
    /// Static field strength.
    pub lamb: f64,
    /// Drive frequency.
    pub omega: f64,
    /// Drive amplitude.
    pub h: f64,
}

impl DtcParams {
    pub fn validate(&self) -> Result<()> {
        if self.n == 0 {
            return Err(invalid("lattice needs at least one site"));
        }
        if self.n > MAX_QUBITS {
            return Err(invalid(format!(
                "{} sites exceed the {}-qubit simulator limit",
                self.n, MAX_QUBITS
            )));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(invalid(format!("dt must be positive and finite, got {}", self.dt)));
        }
        if !(self.t.is_finite() && self.t >= 0.0) {
            return Err(invalid(format!("t must be non-negative and finite, got {}", self.t)));
        }
        for (label, v) in [("J", self.j), ("lamb", self.lamb), ("omega", self.omega), ("h", self.h)] {
            if !v.is_finite() {
                return Err(invalid(format!("{} must be finite, got {}", label, v)));
            }
        }
        Ok(())
    }

    /// `floor(t / dt)`.
    pub fn step_count(&self) -> usize {
        floor_div(self.t, self.dt).max(0.0) as usize
    }

    pub fn circuit_name(&self) -> String {
        self.name_for_steps(self.step_count())
    }

    fn name_for_steps(&self, steps: usize) -> String {
        format!(
            "N={},J={:?},h={:?},lamb={:?},omega={:?},dt={:?},step={}",
            self.n,
            round2(self.j),
            round2(self.h),
            round2(self.lamb),
            round2(self.omega),
            self.dt,
            steps
        )
    }

    /// Builds the measured circuit for `floor(t / dt)` steps.
    pub fn build_circuit(&self) -> Result<Circuit> {
        self.validate()?;
        self.build_with_steps(self.step_count())
    }

    /// Circuits for `0..=steps` Trotter steps, evolving to `t = k·dt`.
    pub fn time_series(&self, steps: usize) -> Result<Vec<Circuit>> {
        self.validate()?;
        (0..=steps).map(|k| self.build_with_steps(k)).collect()
    }

    fn build_with_steps(&self, steps: usize) -> Result<Circuit> {
        let mut circuit = Circuit::with_name(self.n, self.name_for_steps(steps));
        self.prepare(&mut circuit)?;
        for step in 0..steps {
            self.trotter_step(&mut circuit, step as f64 * self.dt)?;
        }
        self.measure(&mut circuit)?;
        Ok(circuit)
    }

    fn prepare(&self, circuit: &mut Circuit) -> Result<()> {
        for i in 0..self.n {
            circuit.h(i)?.s(i)?;
        }
        Ok(())
    }

    fn trotter_step(&self, circuit: &mut Circuit, t: f64) -> Result<()> {
        let static_angle = 2.0 * self.lamb * self.dt;
        for i in 0..self.n {
            circuit.ry(static_angle, i)?.rz(static_angle, i)?;
        }

        circuit.barrier();
        let zz_angle = -2.0 * self.j * self.dt;
        for start in [0, 1] {
            for i in (start..self.n.saturating_sub(1)).step_by(2) {
                circuit.cx(i, i + 1)?.rz(zz_angle, i + 1)?.cx(i, i + 1)?;
            }
        }

        circuit.barrier();
        let drive_angle = 2.0 * coeff(self.h, t, self.omega) * self.dt;
        for i in 0..self.n {
            circuit.rx(drive_angle, i)?;
        }
        Ok(())
    }

    fn measure(&self, circuit: &mut Circuit) -> Result<()> {
        for i in 0..self.n {
            circuit.sdg(i)?.h(i)?.measure(i, i)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsim::Gate;

    fn params() -> DtcParams {
        DtcParams {
            n: 4,
            j: 1.0,
            t: 0.3,
            dt: 0.1,
            lamb: 0.5,
            omega: 2.0,
            h: 1.0 / 3.0,
        }
    }

    #[test]
    fn drive_coefficient() {
        assert_eq!(coeff(2.0, 0.0, 1.0), -2.0);
        assert!(coeff(2.0, std::f64::consts::PI, 1.0).abs() < 1e-15);
    }

    #[test]
    fn step_count_uses_floor_division() {
        assert_eq!(params().step_count(), 2); // 0.3 // 0.1 == 2.0
        assert_eq!(DtcParams { t: 1.0, dt: 0.25, ..params() }.step_count(), 4);
        assert_eq!(DtcParams { t: 0.0, ..params() }.step_count(), 0);
        assert_eq!(DtcParams { t: 0.99, dt: 0.5, ..params() }.step_count(), 1);
    }

    #[test]
    fn circuit_name_rounds_couplings() {
        assert_eq!(
            params().circuit_name(),
            "N=4,J=1.0,h=0.33,lamb=0.5,omega=2.0,dt=0.1,step=2"
        );
    }

    #[test]
    fn stage_ordering() {
        let p = DtcParams { t: 0.1, ..params() };
        let c = p.build_circuit().unwrap();
        let n = p.n;

        // prepare
        assert_eq!(c.gates[0], Gate::H { qubit: 0 });
        assert_eq!(c.gates[1], Gate::S { qubit: 0 });
        // H0 of the single step follows the 2n prepare gates
        assert_eq!(c.gates[2 * n], Gate::RY { qubit: 0, theta: 2.0 * 0.5 * 0.1 });
        assert_eq!(c.gates[2 * n + 1], Gate::RZ { qubit: 0, theta: 2.0 * 0.5 * 0.1 });
        assert_eq!(c.gates[4 * n], Gate::Barrier);

        // H1: pairs (0,1), (2,3) then (1,2)
        let zz: Vec<(usize, usize)> = c
            .gates
            .iter()
            .filter_map(|g| match *g {
                Gate::RZ { qubit, theta } if theta < 0.0 => Some((qubit - 1, qubit)),
                _ => None,
            })
            .collect();
        assert_eq!(zz, vec![(0, 1), (2, 3), (1, 2)]);

        // H2 at t = 0
        let drive = 2.0 * coeff(p.h, 0.0, p.omega) * p.dt;
        assert!(c.gates.contains(&Gate::RX { qubit: 3, theta: drive }));

        // measure stage closes the circuit
        let tail = &c.gates[c.gates.len() - 3..];
        assert_eq!(
            tail,
            &[
                Gate::Sdg { qubit: 3 },
                Gate::H { qubit: 3 },
                Gate::Measure { qubit: 3, clbit: 3 }
            ]
        );
    }

    #[test]
    fn drive_uses_step_start_time() {
        let p = DtcParams { t: 0.2, ..params() };
        let c = p.build_circuit().unwrap();
        let angles: Vec<f64> = c
            .gates
            .iter()
            .filter_map(|g| match *g {
                Gate::RX { qubit: 0, theta } => Some(theta),
                _ => None,
            })
            .collect();
        let expected: Vec<f64> = (0..2)
            .map(|k| 2.0 * coeff(p.h, k as f64 * p.dt, p.omega) * p.dt)
            .collect();
        assert_eq!(angles, expected);
    }

    #[test]
    fn gate_count_per_step() {
        let p = params();
        let n = p.n;
        let per_step = 2 * n + 2 + 3 * (n - 1) + n;
        let c = p.build_circuit().unwrap();
        assert_eq!(c.gates.len(), 2 * n + 2 * per_step + 3 * n);
    }

    #[test]
    fn single_site_has_no_couplings() {
        let p = DtcParams { n: 1, ..params() };
        let c = p.build_circuit().unwrap();
        assert!(!c.gates.iter().any(|g| matches!(g, Gate::CX { .. })));
    }

    #[test]
    fn time_series_grows_one_step_at_a_time() {
        let series = params().time_series(3).unwrap();
        assert_eq!(series.len(), 4);
        assert!(series[0].name.ends_with("step=0"));
        assert!(series[3].name.ends_with("step=3"));
        let barriers = |c: &Circuit| c.gates.iter().filter(|g| **g == Gate::Barrier).count();
        assert_eq!(barriers(&series[3]), 6);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(DtcParams { dt: 0.0, ..params() }.build_circuit().is_err());
        assert!(DtcParams { n: 0, ..params() }.build_circuit().is_err());
        assert!(DtcParams { t: -1.0, ..params() }.time_series(2).is_err());
        assert!(DtcParams { h: f64::NAN, ..params() }.build_circuit().is_err());
    }

    #[test]
    fn lattices_wider_than_the_simulator_are_rejected() {
        for n in [64, 70] {
            let err = DtcParams { n, ..params() }.time_series(1).unwrap_err();
            assert!(matches!(err, crate::error::DtcError::InvalidArgument(_)));
        }
    }
}
