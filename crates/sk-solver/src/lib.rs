//! Steady-state microkinetics solver.
//!
//! This crate turns an elementary-reaction network plus per-species free
//! energies into rate constants and rate expressions, finds the steady-state
//! coverage vector with a constrained Newton iteration, and derives turnover
//! frequencies and degree-of-rate-control sensitivities from the converged
//! state. All arithmetic above f64 intrinsics goes through the injected
//! `sk_core::NumericBackend`.

pub mod constraint;
pub mod engine;
pub mod error;
pub mod explain;
pub mod initialization;
pub mod jacobian;
pub mod newton;
pub mod rates;
pub mod settings;
pub mod steady;
pub mod tof;

pub use constraint::{CoverageConstraint, SiteConservation, Unconstrained};
pub use engine::SteadyStateSolver;
pub use error::{SolverError, SolverResult};
pub use initialization::boltzmann_coverages;
pub use jacobian::{Direction, classified_jacobian, forward_jacobian};
pub use newton::{NewtonRoot, NewtonStep, golden_section};
pub use rates::{
    ImplicitTransition, RateBuilder, RateConstants, RateExpr, RateExpressions, RateFactor,
    ReactionEnergetics, free_site_coverages,
};
pub use settings::SolverSettings;
pub use steady::{SteadyStateSystem, net_rates, reversibilities};
pub use tof::{project_tof, rate_control_from_jacobian};
