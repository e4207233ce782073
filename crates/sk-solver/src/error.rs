//! Error types for the kinetics solver.

use sk_core::SkError;
use sk_model::ModelError;
use thiserror::Error;

pub type SolverResult<T> = Result<T, SolverError>;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("No free energy entry for species '{species}'")]
    MissingEnergy { species: String },

    #[error("Singular Jacobian in Newton iteration {iteration}")]
    SingularJacobian { iteration: usize },

    #[error("Forward/reverse rate count mismatch: {forward} != {reverse}")]
    InconsistentRateCount { forward: usize, reverse: usize },

    #[error("No convergence after {iterations} iterations (residual norm {residual_norm:e})")]
    NonConvergence {
        iterations: usize,
        residual_norm: f64,
    },

    #[error("Non-finite rate constant for reaction {reaction}: {value}")]
    NonFiniteRate { reaction: usize, value: f64 },

    #[error("Transition state '{species}' appears in an end state of reaction {reaction}")]
    MisplacedTransitionState { species: String, reaction: usize },

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Core error: {0}")]
    Core(#[from] SkError),
}
