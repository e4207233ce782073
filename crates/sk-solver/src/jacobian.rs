//! Finite-difference Jacobians.
//!
//! Perturbation deltas are proportional to the coordinate magnitude with a
//! floor at the base step, and the difference direction is chosen per
//! coordinate class: adsorbate coordinates lead (forward by default),
//! transition-state coordinates take the opposite direction. The same
//! convention serves both the steady-state Newton iteration and the
//! rate-control derivatives, keeping the two consistent.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use sk_core::Real;

use crate::error::SolverResult;

/// One-sided difference direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Jacobian by one-sided differences with a per-class direction split:
/// coordinates `j < split` use `leading`, the rest use its opposite.
pub fn classified_jacobian<F>(
    f: &F,
    x: &DVector<Real>,
    h: Real,
    split: usize,
    leading: Direction,
) -> SolverResult<DMatrix<Real>>
where
    F: Fn(&DVector<Real>) -> SolverResult<DVector<Real>>,
{
    let fx = f(x)?;
    let m = fx.len();
    let n = x.len();
    let mut jac = DMatrix::zeros(m, n);

    for j in 0..n {
        // delta proportional to the coordinate is more stable; floor keeps
        // it nonzero for coordinates at exactly 0
        let delta = (h * x[j]).abs().max(h);
        let dir = if j < split { leading } else { leading.opposite() };
        let step = match dir {
            Direction::Forward => delta,
            Direction::Backward => -delta,
        };

        let mut xj = x.clone();
        xj[j] += step;
        let fj = f(&xj)?;
        let col = (fj - &fx) / step;
        jac.set_column(j, &col);
    }

    Ok(jac)
}

/// Plain forward-difference Jacobian (every coordinate leads).
pub fn forward_jacobian<F>(f: &F, x: &DVector<Real>, h: Real) -> SolverResult<DMatrix<Real>>
where
    F: Fn(&DVector<Real>) -> SolverResult<DVector<Real>>,
{
    classified_jacobian(f, x, h, x.len(), Direction::Forward)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dvector;

    #[test]
    fn jacobian_linear() {
        // f(x) = 2*x, J = 2
        let f = |x: &DVector<Real>| -> SolverResult<DVector<Real>> {
            Ok(DVector::from_element(1, 2.0 * x[0]))
        };
        let x = dvector![3.0];
        let jac = forward_jacobian(&f, &x, 1e-7).unwrap();
        assert!((jac[(0, 0)] - 2.0).abs() < 1e-5);
    }

    #[test]
    fn jacobian_quadratic() {
        // f(x) = x^2, J = 2*x
        let f = |x: &DVector<Real>| -> SolverResult<DVector<Real>> {
            Ok(DVector::from_element(1, x[0] * x[0]))
        };
        let x = dvector![3.0];
        let jac = forward_jacobian(&f, &x, 1e-7).unwrap();
        assert!((jac[(0, 0)] - 6.0).abs() < 1e-5);
    }

    #[test]
    fn split_flips_difference_direction() {
        // record the sign of the perturbation seen per coordinate
        use std::cell::RefCell;
        let seen: RefCell<Vec<Real>> = RefCell::new(vec![0.0; 2]);
        let base = dvector![1.0, 1.0];
        let f = |x: &DVector<Real>| -> SolverResult<DVector<Real>> {
            for j in 0..2 {
                let d = x[j] - 1.0;
                if d != 0.0 {
                    seen.borrow_mut()[j] = d.signum();
                }
            }
            Ok(DVector::from_element(1, x[0] + x[1]))
        };
        classified_jacobian(&f, &base, 1e-6, 1, Direction::Forward).unwrap();
        let seen = seen.borrow();
        assert_eq!(seen[0], 1.0);
        assert_eq!(seen[1], -1.0);
    }

    #[test]
    fn delta_floor_applies_at_zero() {
        // coordinate at 0 still gets perturbed by h
        let f = |x: &DVector<Real>| -> SolverResult<DVector<Real>> {
            Ok(DVector::from_element(1, 5.0 * x[0]))
        };
        let x = dvector![0.0];
        let jac = forward_jacobian(&f, &x, 1e-7).unwrap();
        assert!((jac[(0, 0)] - 5.0).abs() < 1e-5);
    }
}
