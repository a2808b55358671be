//! Physical lattice site to device qubit position.
//!
//! Sites count from the left end of the chain; the device orders bits the other
//! way round. The even and odd branches below are an empirical correction and do
//! not agree with each other: keep them as they are, downstream expectation
//! values are defined relative to this exact convention.

use qsim::MAX_QUBITS;

use crate::error::{Result, invalid};

/// Converts a site index into the position used when slicing outcome strings.
///
/// Valid input is `2 <= n <= MAX_QUBITS` and `site` in `[0, n - 1)`. The result is signed: for
/// even `n` it can fall outside `[0, n)` (`n = 2, site = 0` gives 2, `n = 8,
/// site = 6` gives -1).
pub fn convert_site(site: usize, n: usize) -> Result<isize> {
    if n < 2 {
        return Err(invalid(format!("lattice size must be at least 2, got {}", n)));
    }
    if n > MAX_QUBITS {
        return Err(invalid(format!(
            "lattice size {} exceeds the {}-qubit limit",
            n, MAX_QUBITS
        )));
    }
    if site >= n - 1 {
        return Err(invalid(format!(
            "site {} is outside [0, {}) for a {}-site lattice",
            site,
            n - 1,
            n
        )));
    }

    let (n, site) = (n as isize, site as isize);
    if n % 2 == 0 {
        Ok(n / 2 - site + 1)
    } else {
        let m = (n - 1) / 2;
        Ok(m + (m - site))
    }
}
