mod config;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dtc::{BatchRunner, Executor};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::RunConfig;

/// Simulates a driven spin chain and reports the site polarisation over time
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate the polarisation for every step of the series.
    Run {
        /// YAML run configuration.
        #[arg(short, long)]
        config: PathBuf,
        /// Where to write the JSON series. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the OpenQASM of one step of the series.
    Qasm {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        step: usize,
    },
}

#[derive(Serialize, Debug)]
struct SeriesPoint {
    step: usize,
    t: f64,
    expectation: f64,
}

fn run(cfg: &RunConfig) -> Result<Vec<SeriesPoint>> {
    let circuits = cfg.params_at(0).time_series(cfg.steps)?;
    let executor = Executor::new(cfg.context()?).context("Failed to set up the execution backend")?;
    info!(
        backend = executor.backend_name(),
        circuits = circuits.len(),
        site = cfg.site,
        shots = cfg.shots,
        "starting DTC run"
    );

    let mut runner = BatchRunner::new(&executor, cfg.site).with_max_batch_size(cfg.max_batch_size);
    if let Some(zne) = &cfg.zne {
        runner = runner.with_zne(zne.clone());
    }
    let values = runner.evaluate(&circuits)?;

    Ok(values
        .into_iter()
        .enumerate()
        .map(|(step, expectation)| SeriesPoint {
            step,
            t: cfg.params_at(step).t,
            expectation,
        })
        .collect())
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

    match Cli::parse().command {
        Command::Run { config, output } => {
            let cfg = RunConfig::load(&config)?;
            let series = run(&cfg)?;
            let json_output = serde_json::to_string_pretty(&series)?;

            if let Some(output_path) = output {
                write_output(&output_path, &json_output)?;
                info!(path = %output_path.display(), points = series.len(), "series written");
            } else {
                println!("{}", json_output);
            }
        }
        Command::Qasm { config, step } => {
            let cfg = RunConfig::load(&config)?;
            if step > cfg.steps {
                bail!("step {} is past the configured {} steps", step, cfg.steps);
            }
            let circuit = cfg.params_at(step).build_circuit()?;
            print!("{}", circuit.to_qasm());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_chain_stays_polarised() {
        let cfg: RunConfig = serde_yaml::from_str(
            "lattice: { n: 3, j: 0.0, dt: 0.5, lamb: 0.0, omega: 0.0, h: 0.0 }\nsteps: 2\nsite: 0\nshots: 64\n",
        )
        .unwrap();
        let series = run(&cfg).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series[2].t, 1.0);
        assert!(series.iter().all(|p| p.expectation == 1.0));
    }

    #[test]
    fn hardware_mode_needs_a_provider() {
        let cfg: RunConfig = serde_yaml::from_str(
            "lattice: { n: 3, j: 0.0, dt: 0.5, lamb: 0.0, omega: 0.0, h: 0.0 }\nsteps: 1\nshots: 64\nmode: { kind: hardware, device: ibmq_lima }\n",
        )
        .unwrap();
        assert!(run(&cfg).is_err());
    }

    #[test]
    fn unwritable_output_is_an_error() {
        let path = std::env::temp_dir().join("dtc-runner-missing-dir").join("out.json");
        assert!(write_output(&path, "{}").is_err());

        let path = std::env::temp_dir().join("dtc-runner-output.json");
        write_output(&path, "[1]").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[1]");
        fs::remove_file(&path).unwrap();
    }
}
