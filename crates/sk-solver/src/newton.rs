//! Constrained Newton root finder.
//!
//! The iteration is exposed as a lazy iterator of
//! `(point, residual_norm, residual)` steps so callers can inspect or log
//! intermediate iterates. It terminates itself only on the stationary-point
//! condition (the constrained step returns the previous point exactly);
//! iteration caps and residual tolerances are the driving caller's policy.

use nalgebra::{DMatrix, DVector};
use sk_core::{NumericBackend, Real};
use tracing::{debug, trace};

use crate::constraint::CoverageConstraint;
use crate::error::{SolverError, SolverResult};

/// One Newton iterate.
#[derive(Clone, Debug)]
pub struct NewtonStep {
    pub point: DVector<Real>,
    pub residual_norm: Real,
    pub residual: DVector<Real>,
}

/// Derivative-free golden-section minimization of `f` over `[a, b]`.
pub fn golden_section<F>(mut f: F, mut a: Real, mut b: Real, tol: Real, max_iter: usize) -> Real
where
    F: FnMut(Real) -> Real,
{
    const INVPHI: Real = 0.618_033_988_749_894_9;

    let mut c = b - INVPHI * (b - a);
    let mut d = a + INVPHI * (b - a);
    let mut fc = f(c);
    let mut fd = f(d);

    for _ in 0..max_iter {
        if (b - a).abs() <= tol {
            break;
        }
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - INVPHI * (b - a);
            fc = f(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + INVPHI * (b - a);
            fd = f(d);
        }
    }
    0.5 * (a + b)
}

/// Newton iteration with a line search and a feasibility constraint.
///
/// The first `warmup` iterations run unconstrained (the "quasi-constraint"
/// phase) so the early steps can establish a descent direction before
/// feasibility is enforced. Restart only by constructing a fresh instance;
/// a single instance holds the whole iteration state.
pub struct NewtonRoot<'a, F, J> {
    f: F,
    jacobian: J,
    x: DVector<Real>,
    constraint: &'a dyn CoverageConstraint,
    backend: &'a dyn NumericBackend,
    warmup: usize,
    line_search_tolerance: Real,
    line_search_max: Real,
    iteration: usize,
    done: bool,
}

impl<'a, F, J> NewtonRoot<'a, F, J>
where
    F: Fn(&DVector<Real>) -> SolverResult<DVector<Real>>,
    J: Fn(&DVector<Real>) -> SolverResult<DMatrix<Real>>,
{
    pub fn new(
        f: F,
        jacobian: J,
        x0: DVector<Real>,
        constraint: &'a dyn CoverageConstraint,
        backend: &'a dyn NumericBackend,
    ) -> Self {
        Self {
            f,
            jacobian,
            x: x0,
            constraint,
            backend,
            warmup: 5,
            line_search_tolerance: 1e-8,
            line_search_max: 2.0,
            iteration: 0,
            done: false,
        }
    }

    pub fn with_warmup(mut self, warmup: usize) -> Self {
        self.warmup = warmup;
        self
    }

    pub fn with_line_search_tolerance(mut self, tol: Real) -> Self {
        self.line_search_tolerance = tol;
        self
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }
}

impl<'a, F, J> Iterator for NewtonRoot<'a, F, J>
where
    F: Fn(&DVector<Real>) -> SolverResult<DVector<Real>>,
    J: Fn(&DVector<Real>) -> SolverResult<DMatrix<Real>>,
{
    type Item = SolverResult<NewtonStep>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.iteration += 1;

        let fx = match (self.f)(&self.x) {
            Ok(v) => v,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        let jx = match (self.jacobian)(&self.x) {
            Ok(m) => m,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };

        // direction of descent: J·s = −F(x)
        let s = match self.backend.solve(&jx, &(-&fx)) {
            Some(s) => s,
            None => {
                self.done = true;
                return Some(Err(SolverError::SingularJacobian {
                    iteration: self.iteration,
                }));
            }
        };

        // step length minimizing ‖F(x + λ·s)‖₂; a failing evaluation is
        // treated as +∞ so the search itself backs away from it
        let fl = |lambda: Real| -> Real {
            let candidate = &self.x + &s * lambda;
            match (self.f)(&candidate) {
                Ok(r) => self.backend.norm(&r),
                Err(_) => Real::INFINITY,
            }
        };
        let lambda = golden_section(
            fl,
            0.0,
            self.line_search_max,
            self.line_search_tolerance,
            64,
        );
        trace!(iteration = self.iteration, lambda, "line search");

        let candidate = &self.x + &s * lambda;
        let constrained = if self.iteration <= self.warmup {
            candidate
        } else {
            self.constraint.project(&candidate)
        };

        if constrained == self.x {
            debug!(iteration = self.iteration, "stationary point found");
            self.done = true;
        }

        let residual = match (self.f)(&constrained) {
            Ok(v) => v,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        let residual_norm = self.backend.norm(&residual);
        debug!(
            iteration = self.iteration,
            residual_norm, "newton iteration"
        );

        self.x = constrained.clone();
        Some(Ok(NewtonStep {
            point: constrained,
            residual_norm,
            residual,
        }))
    }
}
