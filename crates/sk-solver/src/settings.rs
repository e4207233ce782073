//! Solver configuration.

use serde::{Deserialize, Serialize};
use sk_core::Real;

use crate::jacobian::Direction;

/// Solver configuration.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Relative finite-difference step for rate-control perturbations
    pub perturbation_size: Real,
    /// Difference direction for adsorbate energy coordinates; transition
    /// states always use the opposite direction
    pub perturbation_direction: Direction,
    /// Newton iterations run without the feasibility constraint
    pub warmup_iterations: usize,
    /// Maximum Newton iterations before giving up
    pub max_iterations: usize,
    /// Residual norm below which the iteration is accepted as converged
    pub residual_tolerance: Real,
    /// Interval tolerance for the golden-section line search
    pub line_search_tolerance: Real,
    /// Base finite-difference step for the coverage Jacobian
    pub jacobian_step: Real,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            perturbation_size: 0.01,
            perturbation_direction: Direction::Forward,
            warmup_iterations: 5,
            max_iterations: 100,
            residual_tolerance: 1e-10,
            line_search_tolerance: 1e-8,
            jacobian_step: 1e-10,
        }
    }
}
