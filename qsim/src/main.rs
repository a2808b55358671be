use anyhow::{Context, Result};
use clap::Parser;
use qsim::{Backend, Circuit, NoiseModel, NoisySimulator, StatevectorSimulator};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Runs an OpenQASM 2.0 circuit and prints the measured counts as JSON
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The input OpenQASM file to simulate. If not provided, reads from stdin.
    #[arg(short, long)]
    input_file: Option<PathBuf>,

    /// The output file to write JSON counts to. If not provided, writes to stdout.
    #[arg(short, long)]
    output_file: Option<PathBuf>,

    /// Number of shots to sample.
    #[arg(short, long, default_value_t = 1024)]
    shots: u64,

    /// Sampling seed for reproducible counts.
    #[arg(long)]
    seed: Option<u64>,

    /// Per-bit read-out flip probability; enables the trajectory simulator.
    #[arg(long)]
    readout_error: Option<f64>,

    /// Depolarizing probability after each single-qubit gate.
    #[arg(long)]
    gate_error: Option<f64>,
}

/// Any error flag switches to the trajectory simulator.
fn backend_for(cli: &Cli) -> Result<Box<dyn Backend>> {
    if cli.readout_error.is_none() && cli.gate_error.is_none() {
        let sim = StatevectorSimulator::default();
        return Ok(Box::new(match cli.seed {
            Some(seed) => sim.with_seed(seed),
            None => sim,
        }));
    }

    let noise = NoiseModel {
        single_qubit_error: cli.gate_error.unwrap_or(0.0),
        two_qubit_error: cli.gate_error.unwrap_or(0.0),
        readout_error: cli.readout_error.unwrap_or(0.0),
    };
    let sim = NoisySimulator::new(noise, Vec::new()).context("Invalid noise flags")?;
    Ok(Box::new(match cli.seed {
        Some(seed) => sim.with_seed(seed),
        None => sim,
    }))
}

/// Writes the whole document or reports why it could not.
fn write_output(path: &Path, json: &str) -> Result<()> {
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    // Read the QASM input from a file or stdin
    let mut qasm_input = String::new();
    if let Some(input_path) = &cli.input_file {
        qasm_input = fs::read_to_string(input_path)
            .with_context(|| format!("Failed to read circuit file: {}", input_path.display()))?;
    } else {
        info!("reading QASM from stdin, end with Ctrl+D");
        io::stdin().read_to_string(&mut qasm_input)?;
    }

    let circuit = Circuit::from_qasm(&qasm_input).context("Failed to parse QASM input")?;
    info!(qubits = circuit.num_qubits, gates = circuit.gates.len(), shots = cli.shots, "running circuit");

    let backend = backend_for(&cli)?;
    let counts: BTreeMap<_, _> = backend.execute(&circuit, cli.shots)?.into_iter().collect();
    let json_output = serde_json::to_string_pretty(&counts)?;

    // Determine the output writer (file or stdout) and write the result
    if let Some(output_path) = cli.output_file {
        write_output(&output_path, &json_output)?;
    } else {
        println!("{}", json_output);
    }

    Ok(())
}
