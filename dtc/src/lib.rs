//! Discrete time crystal simulation on a qubit chain.
//!
//! Floquet circuits are built by [`floquet`], executed through an
//! [`executor::Executor`], and reduced to the spin polarisation of one lattice
//! site by [`expectation`]. [`batch`] evaluates whole time series, optionally
//! with zero-noise extrapolation from [`zne`].

pub mod batch;
pub mod context;
pub mod error;
pub mod executor;
pub mod expectation;
pub mod floquet;
pub mod site;
pub mod spins;
pub mod zne;

pub use batch::{BatchRunner, DEFAULT_MAX_BATCH_SIZE};
pub use context::{ExecutionContext, ExecutionMode};
pub use error::{DtcError, Result};
pub use executor::Executor;
pub use expectation::{ExperimentResults, expectation_value, spin_expectation};
pub use floquet::{DtcParams, coeff};
pub use site::convert_site;
pub use spins::{SpinSets, spin_combinations};
pub use zne::{ZneConfig, execute_with_zne, fold_gates, richardson_extrapolate};
