use ndarray::{ArrayView2, ArrayViewMut2};

use crate::{check_len, OpsError, Result};

/// `result = a · b` for `n`×`n` row-major matrices.
///
/// Straight `i, j, k` triple loop with an `f64` accumulator starting at 0,
/// so integer-valued inputs multiply exactly. `result` must not alias `a` or
/// `b`; the borrow checker enforces that for safe callers.
pub fn multiply_matrices(a: &[f64], b: &[f64], result: &mut [f64], n: usize) -> Result<()> {
    if n == 0 {
        return Err(OpsError::InvalidDimensions { width: 0, height: 0 });
    }
    let len = n
        .checked_mul(n)
        .ok_or(OpsError::InvalidDimensions { width: n, height: n })?;
    check_len(a.len(), len)?;
    check_len(b.len(), len)?;
    check_len(result.len(), len)?;

    let shape_err = |_| OpsError::InvalidDimensions { width: n, height: n };
    let a = ArrayView2::from_shape((n, n), &a[..len]).map_err(shape_err)?;
    let b = ArrayView2::from_shape((n, n), &b[..len]).map_err(shape_err)?;
    let mut c = ArrayViewMut2::from_shape((n, n), &mut result[..len]).map_err(shape_err)?;

    for i in 0..n {
        for j in 0..n {
            let mut acc = 0.0f64;
            for k in 0..n {
                acc += a[[i, k]] * b[[k, j]];
            }
            c[[i, j]] = acc;
        }
    }

    log::trace!("multiplied {n}x{n} matrices");
    Ok(())
}
