use std::f64::consts::PI;

use dtc::{BatchRunner, DtcParams, ExecutionContext, ExecutionMode, Executor, ZneConfig};
use qsim::{NoiseModel, Pauli, SimulatorApi, StatevectorSimulator};

fn quiet_chain(n: usize) -> DtcParams {
    DtcParams {
        n,
        j: 0.0,
        t: 0.0,
        dt: 0.5,
        lamb: 0.0,
        omega: 0.0,
        h: 0.0,
    }
}

/// Constant drive that rotates every spin by π per step.
fn flipping_chain(n: usize) -> DtcParams {
    let dt = 0.5;
    DtcParams {
        h: -PI / (2.0 * dt),
        t: dt,
        ..quiet_chain(n)
    }
}

fn ideal(shots: u64) -> Executor {
    Executor::new(ExecutionContext::ideal(shots).unwrap()).unwrap()
}

fn noisy(shots: u64, noise: NoiseModel) -> Executor {
    let mode = ExecutionMode::NoisyLocal {
        noise,
        coupling_map: vec![(0, 1), (1, 2)],
        seed: Some(17),
    };
    Executor::new(ExecutionContext::new(shots, mode).unwrap()).unwrap()
}

#[test]
fn prepare_and_measure_cancel() {
    let exec = ideal(1000);
    let circuit = quiet_chain(3).time_series(2).unwrap().pop().unwrap();
    for site in 0..2 {
        assert_eq!(exec.expectation(&circuit, site).unwrap(), 1.0);
    }
}

#[test]
fn pi_drive_flips_every_spin() {
    let exec = ideal(1000);
    let circuit = flipping_chain(3).build_circuit().unwrap();
    let counts = exec.counts(&circuit).unwrap();
    assert_eq!(counts.get("111"), Some(&1000));
    assert_eq!(exec.expectation(&circuit, 1).unwrap(), -1.0);
}

#[test]
fn polarisation_alternates_with_period_two() {
    let exec = ideal(512);
    let series = flipping_chain(5).time_series(4).unwrap();
    let values = BatchRunner::new(&exec, 1)
        .with_max_batch_size(2)
        .evaluate(&series)
        .unwrap();
    assert_eq!(values, vec![1.0, -1.0, 1.0, -1.0, 1.0]);
}

#[test]
fn sampled_value_tracks_exact_z_expectation() {
    let params = DtcParams {
        n: 3,
        j: 0.8,
        t: 1.0,
        dt: 0.25,
        lamb: 0.3,
        omega: PI,
        h: 1.2,
    };
    let circuit = params.build_circuit().unwrap();

    let mut exact = StatevectorSimulator::new(3);
    exact.run(&circuit).unwrap();
    let exec = ideal(20_000);

    // on an odd chain site s is read from qubit s
    for site in 0..2 {
        let z = exact.expectation(&[(Pauli::Z, site)]).unwrap();
        let sampled = exec.expectation(&circuit, site).unwrap();
        assert!((z - sampled).abs() < 0.05, "site {}: exact {} sampled {}", site, z, sampled);
    }
}

#[test]
fn readout_error_shrinks_polarisation() {
    let noise = NoiseModel {
        readout_error: 0.1,
        ..Default::default()
    };
    let exec = noisy(4000, noise);
    let value = exec.expectation(&flipping_chain(3).build_circuit().unwrap(), 0).unwrap();
    assert!((value + 0.8).abs() < 0.05, "got {}", value);
}

#[test]
fn zne_is_neutral_without_noise() {
    let exec = ideal(256);
    let series = flipping_chain(3).time_series(1).unwrap();
    let values = BatchRunner::new(&exec, 0)
        .with_zne(ZneConfig::default())
        .evaluate(&series)
        .unwrap();
    assert!((values[0] - 1.0).abs() < 1e-9);
    assert!((values[1] + 1.0).abs() < 1e-9);
}

#[test]
fn zne_moves_noisy_value_towards_ideal() {
    let noise = NoiseModel {
        single_qubit_error: 0.01,
        two_qubit_error: 0.02,
        readout_error: 0.0,
    };
    let exec = noisy(8000, noise);
    let circuit = flipping_chain(3).build_circuit().unwrap();

    let raw = BatchRunner::new(&exec, 0).evaluate(std::slice::from_ref(&circuit)).unwrap()[0];
    let mitigated = BatchRunner::new(&exec, 0)
        .with_zne(ZneConfig::default())
        .evaluate(std::slice::from_ref(&circuit))
        .unwrap()[0];

    assert!(raw > -0.97, "noise should be visible, got {}", raw);
    assert!((mitigated + 1.0).abs() < (raw + 1.0).abs(), "raw {} mitigated {}", raw, mitigated);
}
