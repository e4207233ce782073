//! Pluggable arithmetic backend.
//!
//! Rate constants in a microkinetic model span many orders of magnitude, and
//! the linear systems the Newton iteration solves inherit that conditioning.
//! Everything numeric above this crate is written against [`NumericBackend`]
//! so a higher-precision implementation can be injected at construction
//! without the solver branching on a precision flag during computation.

use nalgebra::{DMatrix, DVector};

use crate::numeric::Real;

/// Arithmetic capabilities the solver stack needs from a precision strategy.
///
/// Implementations must be deterministic: the stationary-point convergence
/// test compares successive iterates for exact equality.
pub trait NumericBackend {
    /// Backend name (for diagnostics).
    fn name(&self) -> &str;

    /// e^x
    fn exp(&self, x: Real) -> Real;

    /// Natural logarithm.
    fn ln(&self, x: Real) -> Real;

    /// Solve A·x = b. Returns `None` when the factorization hits a zero
    /// pivot; the caller decides how to report that.
    fn solve(&self, a: &DMatrix<Real>, b: &DVector<Real>) -> Option<DVector<Real>>;

    /// Euclidean (2-)norm of a vector.
    fn norm(&self, v: &DVector<Real>) -> Real;
}

/// Native double-precision backend built on nalgebra's LU factorization.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeFloat;

impl NumericBackend for NativeFloat {
    fn name(&self) -> &str {
        "native-f64"
    }

    fn exp(&self, x: Real) -> Real {
        x.exp()
    }

    fn ln(&self, x: Real) -> Real {
        x.ln()
    }

    fn solve(&self, a: &DMatrix<Real>, b: &DVector<Real>) -> Option<DVector<Real>> {
        a.clone().lu().solve(b)
    }

    fn norm(&self, v: &DVector<Real>) -> Real {
        v.norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{dmatrix, dvector};

    #[test]
    fn solve_well_conditioned_system() {
        let backend = NativeFloat;
        let a = dmatrix![2.0, 0.0; 0.0, 4.0];
        let b = dvector![2.0, 8.0];
        let x = backend.solve(&a, &b).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn solve_singular_system_returns_none() {
        let backend = NativeFloat;
        let a = dmatrix![1.0, 2.0; 2.0, 4.0];
        let b = dvector![1.0, 1.0];
        assert!(backend.solve(&a, &b).is_none());
    }

    #[test]
    fn norm_is_euclidean() {
        let backend = NativeFloat;
        let v = dvector![3.0, 4.0];
        assert!((backend.norm(&v) - 5.0).abs() < 1e-12);
    }
}
