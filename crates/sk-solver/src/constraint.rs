//! Feasibility projection for coverage vectors.

use nalgebra::DVector;
use sk_core::Real;
use sk_model::ReactionNetwork;

/// Projection applied to each Newton iterate once the warm-up phase ends.
pub trait CoverageConstraint {
    fn project(&self, theta: &DVector<Real>) -> DVector<Real>;
}

/// Identity projection used during the warm-up ("quasi-constraint") phase.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unconstrained;

impl CoverageConstraint for Unconstrained {
    fn project(&self, theta: &DVector<Real>) -> DVector<Real> {
        theta.clone()
    }
}

/// Physical feasibility: every coverage non-negative, and per site the sum
/// of adsorbate coverages capped at the site total (overfull sites are
/// rescaled proportionally).
#[derive(Clone, Debug)]
pub struct SiteConservation {
    /// (capacity, adsorbate indices) per site
    sites: Vec<(Real, Vec<usize>)>,
}

impl SiteConservation {
    pub fn new(network: &ReactionNetwork) -> Self {
        let sites = network
            .site_names()
            .iter()
            .map(|site| {
                let indices = network
                    .adsorbates_on(site)
                    .iter()
                    .filter_map(|ads| network.adsorbate_index(ads))
                    .collect();
                (network.site_capacity(site), indices)
            })
            .collect();
        Self { sites }
    }
}

impl CoverageConstraint for SiteConservation {
    fn project(&self, theta: &DVector<Real>) -> DVector<Real> {
        let mut out = theta.clone();
        for v in out.iter_mut() {
            if *v < 0.0 {
                *v = 0.0;
            }
        }
        for (capacity, indices) in &self.sites {
            let sum: Real = indices.iter().map(|&i| out[i]).sum();
            if sum > *capacity && sum > 0.0 {
                let scale = capacity / sum;
                for &i in indices {
                    out[i] *= scale;
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dvector;
    use proptest::prelude::*;
    use sk_model::{NetworkBuilder, SpeciesDef};

    fn two_adsorbate_network() -> ReactionNetwork {
        let mut b = NetworkBuilder::new();
        b.add_species(SpeciesDef::site("s", 1.0))
            .add_species(SpeciesDef::adsorbate("CO_s", "s", -1.5))
            .add_species(SpeciesDef::adsorbate("O_s", "s", -0.8));
        b.build().unwrap()
    }

    #[test]
    fn negatives_are_clamped() {
        let c = SiteConservation::new(&two_adsorbate_network());
        let out = c.project(&dvector![-0.3, 0.4]);
        assert_eq!(out[0], 0.0);
        assert_eq!(out[1], 0.4);
    }

    #[test]
    fn overfull_site_is_rescaled() {
        let c = SiteConservation::new(&two_adsorbate_network());
        let out = c.project(&dvector![0.9, 0.6]);
        let sum = out[0] + out[1];
        assert!((sum - 1.0).abs() < 1e-12);
        // proportions preserved
        assert!((out[0] / out[1] - 0.9 / 0.6).abs() < 1e-12);
    }

    #[test]
    fn feasible_point_is_untouched() {
        let c = SiteConservation::new(&two_adsorbate_network());
        let theta = dvector![0.3, 0.2];
        assert_eq!(c.project(&theta), theta);
    }

    proptest! {
        #[test]
        fn projection_is_feasible_and_idempotent(
            a in -2.0f64..2.0,
            b in -2.0f64..2.0,
        ) {
            let c = SiteConservation::new(&two_adsorbate_network());
            let once = c.project(&dvector![a, b]);
            prop_assert!(once[0] >= 0.0 && once[1] >= 0.0);
            prop_assert!(once[0] + once[1] <= 1.0 + 1e-12);
            let twice = c.project(&once);
            prop_assert!((twice[0] - once[0]).abs() < 1e-12);
            prop_assert!((twice[1] - once[1]).abs() < 1e-12);
        }
    }
}
