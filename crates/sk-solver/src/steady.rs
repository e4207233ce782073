//! Steady-state balance equations.
//!
//! One balance per adsorbate degree of freedom: the net production of that
//! adsorbate summed over all reactions. The root of `F(θ)` is the
//! steady-state coverage vector.

use nalgebra::{DMatrix, DVector};
use sk_core::{NumericBackend, Real};
use sk_model::{FreeEnergies, ModelContext};

use crate::error::{SolverError, SolverResult};
use crate::rates::{RateBuilder, RateConstants, RateExpressions, free_site_coverages};

/// The assembled equation system for one free-energy map.
///
/// Assembly happens from scratch whenever the energies change — rate
/// constants are never cached across energy updates.
pub struct SteadyStateSystem<'a> {
    ctx: &'a ModelContext,
    ks: RateConstants,
    exprs: RateExpressions,
    pressures: Vec<Real>,
    /// adsorbates × reactions, net production coefficients
    production: DMatrix<Real>,
}

impl<'a> SteadyStateSystem<'a> {
    pub fn assemble(
        ctx: &'a ModelContext,
        backend: &'a dyn NumericBackend,
        energies: &FreeEnergies,
    ) -> SolverResult<Self> {
        let builder = RateBuilder::new(ctx, backend);
        let ks = builder.rate_constants(energies)?;
        let exprs = builder.rate_expressions()?;
        let pressures = ctx.network.pressures()?;

        let ads = ctx.network.adsorbate_names();
        let reactions = ctx.network.reactions();
        let production = DMatrix::from_fn(ads.len(), reactions.len(), |a, r| {
            reactions[r].net_coefficient(&ads[a]) as Real
        });

        Ok(Self {
            ctx,
            ks,
            exprs,
            pressures,
            production,
        })
    }

    pub fn rate_constants(&self) -> &RateConstants {
        &self.ks
    }

    pub fn dim(&self) -> usize {
        self.production.nrows()
    }

    /// Forward and reverse rates at a coverage vector.
    pub fn rates(&self, theta: &[Real]) -> (Vec<Real>, Vec<Real>) {
        let free = free_site_coverages(self.ctx, theta);
        self.exprs.evaluate(&self.ks, theta, &self.pressures, &free)
    }

    /// The balance function `F(θ)`: per-adsorbate net production.
    pub fn residual(&self, theta: &DVector<Real>) -> SolverResult<DVector<Real>> {
        if theta.len() != self.dim() {
            return Err(sk_core::SkError::DimensionMismatch {
                what: "coverage vector",
                expected: self.dim(),
                got: theta.len(),
            }
            .into());
        }
        let (rf, rr) = self.rates(theta.as_slice());
        let net = net_rates(&rf, &rr)?;
        Ok(&self.production * DVector::from_vec(net))
    }
}

/// `r_i = rf_i − rr_i` with the defensive length check.
pub fn net_rates(rf: &[Real], rr: &[Real]) -> SolverResult<Vec<Real>> {
    if rf.len() != rr.len() {
        return Err(SolverError::InconsistentRateCount {
            forward: rf.len(),
            reverse: rr.len(),
        });
    }
    Ok(rf.iter().zip(rr).map(|(f, r)| f - r).collect())
}

/// `rr_i / rf_i` per reaction.
pub fn reversibilities(rf: &[Real], rr: &[Real]) -> SolverResult<Vec<Real>> {
    if rf.len() != rr.len() {
        return Err(SolverError::InconsistentRateCount {
            forward: rf.len(),
            reverse: rr.len(),
        });
    }
    Ok(rf.iter().zip(rr).map(|(f, r)| r / f).collect())
}
