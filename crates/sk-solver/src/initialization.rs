//! Initial-guess strategies for the coverage vector.

use nalgebra::DVector;
use sk_core::{NumericBackend, Real};
use sk_model::{FreeEnergies, ModelContext};

use crate::error::{SolverError, SolverResult};

/// Boltzmann-weighted coverage estimate from adsorbate formation energies:
/// `θ_a = exp(−G_a/kB·T) / Σ_b exp(−G_b/kB·T)`.
pub fn boltzmann_coverages(
    ctx: &ModelContext,
    backend: &dyn NumericBackend,
    energies: &FreeEnergies,
) -> SolverResult<DVector<Real>> {
    let kbt = ctx.constants.kbt();
    let names = ctx.network.adsorbate_names();

    let mut weights = Vec::with_capacity(names.len());
    for name in names {
        let g = energies.get(name).ok_or_else(|| SolverError::MissingEnergy {
            species: name.clone(),
        })?;
        weights.push(backend.exp(-g / kbt));
    }
    let total: Real = weights.iter().sum();
    Ok(DVector::from_iterator(
        weights.len(),
        weights.iter().map(|w| w / total),
    ))
}
