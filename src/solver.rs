//! Gauss-Jordan inversion of the restrained stiffness matrix.
//!
//! Elimination runs down the diagonal without row exchanges. A pivot whose
//! magnitude falls below [`PIVOT_THRESHOLD`] marks the structure unstable.
//! Restrained equations carry a unit diagonal and real members are many
//! orders stiffer, so the threshold separates mechanisms from structures.

use nalgebra::{DMatrix, DVector};
use ndarray::Array2;

use crate::errors::Instability;

/// Smallest pivot magnitude accepted during elimination.
pub const PIVOT_THRESHOLD: f64 = 0.99;

/// Replace a square matrix with its inverse.
///
/// # Errors
///
/// Returns [`Instability`] at the first pivot smaller than
/// [`PIVOT_THRESHOLD`]. The matrix is left partially reduced.
///
/// # Examples
/// ```
/// use nalgebra::DMatrix;
/// use trussbridge::solver::invert_in_place;
///
/// let mut matrix = DMatrix::from_row_slice(2, 2, &[4.0, 2.0, 2.0, 3.0]);
/// invert_in_place(&mut matrix).expect("pivots are large enough");
/// assert!((matrix[(0, 0)] - 0.375).abs() < 1.0e-12);
/// assert!((matrix[(0, 1)] + 0.25).abs() < 1.0e-12);
/// ```
pub fn invert_in_place(matrix: &mut DMatrix<f64>) -> Result<(), Instability> {
    let n = matrix.nrows();
    for ie in 0..n {
        let pivot = matrix[(ie, ie)];
        if pivot.abs() < PIVOT_THRESHOLD {
            return Err(Instability {
                equation: ie,
                pivot,
            });
        }
        let pivr = 1.0 / pivot;
        for k in 0..n {
            matrix[(ie, k)] /= pivot;
        }
        for k in 0..n {
            if k == ie {
                continue;
            }
            let factor = matrix[(k, ie)];
            for j in 0..n {
                let reduced = matrix[(ie, j)] * factor;
                matrix[(k, j)] -= reduced;
            }
            matrix[(k, ie)] = -factor * pivr;
        }
        matrix[(ie, ie)] = pivr;
    }
    Ok(())
}

/// Displacements for every load case, one row per case.
///
/// `stiffness` is consumed as the working buffer of the inversion.
///
/// # Errors
///
/// Returns [`Instability`] when the matrix cannot be inverted.
pub fn solve(mut stiffness: DMatrix<f64>, loads: &Array2<f64>) -> Result<Array2<f64>, Instability> {
    let n_equations = stiffness.nrows();
    tracing::debug!(
        equations = n_equations,
        load_cases = loads.nrows(),
        "inverting stiffness matrix"
    );
    invert_in_place(&mut stiffness)?;

    let mut displacements = Array2::zeros((loads.nrows(), n_equations));
    for (load, mut out) in loads.rows().into_iter().zip(displacements.rows_mut()) {
        let rhs = DVector::from_iterator(n_equations, load.iter().copied());
        let solution = &stiffness * rhs;
        for (target, value) in out.iter_mut().zip(solution.iter()) {
            *target = *value;
        }
    }
    Ok(displacements)
}
