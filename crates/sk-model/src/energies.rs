//! The free-energy state: one energy per species, keyed by name with sites
//! keyed as `*_<site>`.
//!
//! Perturbation sweeps (finite-difference rate control) never mutate a
//! shared map; they operate on private copies produced by
//! [`FreeEnergies::with_energy`] / [`FreeEnergies::with_overlaid`].

use std::collections::HashMap;

use sk_core::{Real, SkError};

use crate::error::ModelResult;
use crate::network::ReactionNetwork;

#[derive(Clone, Debug, Default)]
pub struct FreeEnergies {
    values: HashMap<String, Real>,
}

impl FreeEnergies {
    /// Collect every species' formation energy from the network.
    ///
    /// Fails fast with `MissingData` if any species lacks one — no partial
    /// computation happens downstream.
    pub fn from_network(network: &ReactionNetwork) -> ModelResult<Self> {
        let mut values = HashMap::new();
        for def in network.species_defs() {
            values.insert(ReactionNetwork::energy_key(def), def.formation_energy()?);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<Real> {
        self.values.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Private copy with one energy replaced.
    pub fn with_energy(&self, key: &str, value: Real) -> Self {
        let mut copy = self.clone();
        copy.values.insert(key.to_string(), value);
        copy
    }

    /// Private copy with the energies of `order` replaced by `values`
    /// pairwise. The two slices must have equal length.
    pub fn with_overlaid(&self, order: &[String], values: &[Real]) -> ModelResult<Self> {
        if order.len() != values.len() {
            return Err(SkError::DimensionMismatch {
                what: "energy overlay",
                expected: order.len(),
                got: values.len(),
            }
            .into());
        }
        let mut copy = self.clone();
        for (key, &g) in order.iter().zip(values) {
            copy.values.insert(key.clone(), g);
        }
        Ok(copy)
    }

    /// Add a correction mapping (gas name → energy delta) in place. Owned
    /// state only; callers perturbing shared state copy first.
    pub fn apply_corrections(&mut self, corrections: &HashMap<String, Real>) {
        for (name, delta) in corrections {
            if let Some(v) = self.values.get_mut(name) {
                *v += delta;
            }
        }
    }

    /// Ordered lookup of several keys at once.
    pub fn collect(&self, keys: &[String]) -> Option<Vec<Real>> {
        keys.iter().map(|k| self.get(k)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkBuilder;
    use crate::species::SpeciesDef;

    fn energies() -> FreeEnergies {
        let mut b = NetworkBuilder::new();
        b.add_species(SpeciesDef::site("s", 1.0))
            .add_species(SpeciesDef::gas("CO_g", 0.0, 1.0))
            .add_species(SpeciesDef::adsorbate("CO_s", "s", -1.5));
        FreeEnergies::from_network(&b.build().unwrap()).unwrap()
    }

    #[test]
    fn sites_are_keyed_with_marker() {
        let e = energies();
        assert_eq!(e.get("*_s"), Some(0.0));
        assert_eq!(e.get("s"), None);
        assert_eq!(e.get("CO_s"), Some(-1.5));
    }

    #[test]
    fn missing_formation_energy_is_fatal() {
        let mut b = NetworkBuilder::new();
        let mut def = SpeciesDef::gas("CO_g", 0.0, 1.0);
        def.formation_energy = None;
        b.add_species(def);
        let net = b.build().unwrap();
        assert!(FreeEnergies::from_network(&net).is_err());
    }

    #[test]
    fn with_energy_leaves_original_untouched() {
        let e = energies();
        let perturbed = e.with_energy("CO_s", -1.4);
        assert_eq!(e.get("CO_s"), Some(-1.5));
        assert_eq!(perturbed.get("CO_s"), Some(-1.4));
    }

    #[test]
    fn overlay_requires_matching_lengths() {
        let e = energies();
        let order = vec!["CO_s".to_string()];
        assert!(e.with_overlaid(&order, &[-1.0, -2.0]).is_err());
        let overlaid = e.with_overlaid(&order, &[-1.0]).unwrap();
        assert_eq!(overlaid.get("CO_s"), Some(-1.0));
    }

    #[test]
    fn corrections_touch_only_listed_species() {
        let mut e = energies();
        let mut corr = HashMap::new();
        corr.insert("CO_g".to_string(), 0.2);
        corr.insert("N2_g".to_string(), 9.9);
        e.apply_corrections(&corr);
        assert_eq!(e.get("CO_g"), Some(0.2));
        assert_eq!(e.get("CO_s"), Some(-1.5));
    }
}
