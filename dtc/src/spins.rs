use crate::error::{Result, invalid};
use crate::site::convert_site;

/// Outcome strings that read the probed site as spin up (`'0'`) or spin down (`'1'`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinSets {
    pub up: Vec<String>,
    pub down: Vec<String>,
}

/// Resolves a signed slice position against a string of `len` characters, the way
/// `s[:pos] + c + s[pos:]` does: negative positions count from the end and clamp at
/// the start, positions past the end append.
pub(crate) fn insertion_point(pos: isize, len: usize) -> usize {
    if pos < 0 {
        (len as isize + pos).max(0) as usize
    } else {
        (pos as usize).min(len)
    }
}

/// Enumerates the `2^(n-1)` outcome strings for each spin orientation at `site`.
///
/// Every `(n-1)`-bit string is visited in lexicographic order and the spin
/// character is spliced in at the converted position, so `up[i]` and `down[i]`
/// differ only at that position.
pub fn spin_combinations(site: usize, n: usize) -> Result<SpinSets> {
    let pos = insertion_point(convert_site(site, n)?, n - 1);
    let width = n - 1;
    let total = u32::try_from(width)
        .ok()
        .and_then(|w| 1usize.checked_shl(w))
        .ok_or_else(|| invalid(format!("{} free bits do not fit an outcome index", width)))?;

    let mut up = Vec::with_capacity(total);
    let mut down = Vec::with_capacity(total);
    for i in 0..total {
        let rest = format!("{:0width$b}", i, width = width);
        let (head, tail) = rest.split_at(pos);
        up.push(format!("{}0{}", head, tail));
        down.push(format!("{}1{}", head, tail));
    }
    Ok(SpinSets { up, down })
}
