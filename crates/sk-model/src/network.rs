//! The reaction network: ordered reactions plus the fixed name orders that
//! serve as the address scheme for every rate, coverage, and sensitivity
//! vector in the system.

use std::collections::HashMap;

use nalgebra::DMatrix;
use sk_core::Real;

use crate::error::{ModelError, ModelResult};
use crate::reaction::ElementaryReaction;
use crate::species::{SpeciesDef, SpeciesKind};

/// Prefix marking a free-site occupancy term inside a reaction state, e.g.
/// `*_s` for site `s`. The same string keys the site's energy entry.
pub const SITE_MARKER: &str = "*_";

/// How a reaction term enters a rate expression, with its index into the
/// corresponding fixed name order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TermClass {
    Gas(usize),
    Adsorbate(usize),
    FreeSite(usize),
    TransitionState(usize),
}

/// Builder with validation, mirroring the parse-then-build handoff from the
/// external model collaborator.
#[derive(Default)]
pub struct NetworkBuilder {
    species: Vec<SpeciesDef>,
    reactions: Vec<ElementaryReaction>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_species(&mut self, def: SpeciesDef) -> &mut Self {
        self.species.push(def);
        self
    }

    pub fn add_reaction(&mut self, rxn: ElementaryReaction) -> &mut Self {
        self.reactions.push(rxn);
        self
    }

    pub fn build(self) -> ModelResult<ReactionNetwork> {
        let mut index = HashMap::new();
        let mut gas_names = Vec::new();
        let mut adsorbate_names = Vec::new();
        let mut site_names = Vec::new();
        let mut transition_state_names = Vec::new();

        for (i, def) in self.species.iter().enumerate() {
            if index.insert(def.name.clone(), i).is_some() {
                return Err(ModelError::DuplicateSpecies {
                    species: def.name.clone(),
                });
            }
            match def.kind {
                SpeciesKind::Gas => gas_names.push(def.name.clone()),
                SpeciesKind::Adsorbate => adsorbate_names.push(def.name.clone()),
                SpeciesKind::Site => site_names.push(def.name.clone()),
                SpeciesKind::TransitionState => transition_state_names.push(def.name.clone()),
            }
        }

        // Adsorbates and transition states must name a declared site.
        for def in &self.species {
            if matches!(def.kind, SpeciesKind::Adsorbate | SpeciesKind::TransitionState) {
                let site = def.site.as_deref().ok_or_else(|| ModelError::MissingData {
                    species: def.name.clone(),
                    what: "site",
                })?;
                if !site_names.iter().any(|s| s == site) {
                    return Err(ModelError::UndeclaredSite {
                        species: def.name.clone(),
                        site: site.to_string(),
                    });
                }
            }
        }

        let mut site_adsorbates: HashMap<String, Vec<String>> = HashMap::new();
        for site in &site_names {
            site_adsorbates.insert(site.clone(), Vec::new());
        }
        for def in &self.species {
            if def.kind == SpeciesKind::Adsorbate {
                let site = def.site.as_deref().unwrap_or_default();
                if let Some(list) = site_adsorbates.get_mut(site) {
                    list.push(def.name.clone());
                }
            }
        }

        let network = ReactionNetwork {
            species: self.species,
            index,
            reactions: self.reactions,
            gas_names,
            adsorbate_names,
            site_names,
            transition_state_names,
            site_adsorbates,
        };

        // Every species a reaction mentions must resolve.
        for (i, rxn) in network.reactions.iter().enumerate() {
            for name in rxn.species() {
                network.classify_term(name).map_err(|_| ModelError::UnknownSpecies {
                    species: name.to_string(),
                    reaction: i,
                })?;
            }
        }

        Ok(network)
    }
}

/// Immutable, validated reaction network.
#[derive(Clone, Debug)]
pub struct ReactionNetwork {
    species: Vec<SpeciesDef>,
    index: HashMap<String, usize>,
    reactions: Vec<ElementaryReaction>,
    gas_names: Vec<String>,
    adsorbate_names: Vec<String>,
    site_names: Vec<String>,
    transition_state_names: Vec<String>,
    site_adsorbates: HashMap<String, Vec<String>>,
}

impl ReactionNetwork {
    pub fn reactions(&self) -> &[ElementaryReaction] {
        &self.reactions
    }

    pub fn species_defs(&self) -> &[SpeciesDef] {
        &self.species
    }

    pub fn get(&self, name: &str) -> Option<&SpeciesDef> {
        self.index.get(name).map(|&i| &self.species[i])
    }

    pub fn gas_names(&self) -> &[String] {
        &self.gas_names
    }

    pub fn adsorbate_names(&self) -> &[String] {
        &self.adsorbate_names
    }

    pub fn site_names(&self) -> &[String] {
        &self.site_names
    }

    pub fn transition_state_names(&self) -> &[String] {
        &self.transition_state_names
    }

    /// Adsorbates occupying `site`, in adsorbate-name order.
    pub fn adsorbates_on(&self, site: &str) -> &[String] {
        self.site_adsorbates
            .get(site)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn adsorbate_index(&self, name: &str) -> Option<usize> {
        self.adsorbate_names.iter().position(|n| n == name)
    }

    pub fn gas_index(&self, name: &str) -> Option<usize> {
        self.gas_names.iter().position(|n| n == name)
    }

    pub fn site_index(&self, name: &str) -> Option<usize> {
        self.site_names.iter().position(|n| n == name)
    }

    pub fn site_capacity(&self, site: &str) -> Real {
        self.get(site).map(|d| d.site_total()).unwrap_or(1.0)
    }

    /// Energy-map key for a species definition: sites carry the `*_` marker,
    /// everything else is keyed by name.
    pub fn energy_key(def: &SpeciesDef) -> String {
        match def.kind {
            SpeciesKind::Site => format!("{SITE_MARKER}{}", def.name),
            _ => def.name.clone(),
        }
    }

    /// Classify a term name as it appears inside a reaction state.
    ///
    /// `*_<site>` resolves to the free-site occupancy of `<site>`; all other
    /// names resolve through the species table.
    pub fn classify_term(&self, name: &str) -> ModelResult<TermClass> {
        if let Some(site) = name.strip_prefix(SITE_MARKER) {
            return self
                .site_index(site)
                .map(TermClass::FreeSite)
                .ok_or_else(|| ModelError::UndeclaredSite {
                    species: name.to_string(),
                    site: site.to_string(),
                });
        }
        let def = self.get(name).ok_or_else(|| ModelError::MissingData {
            species: name.to_string(),
            what: "definition",
        })?;
        let class = match def.kind {
            SpeciesKind::Gas => TermClass::Gas(self.gas_index(name).unwrap_or_default()),
            SpeciesKind::Adsorbate => {
                TermClass::Adsorbate(self.adsorbate_index(name).unwrap_or_default())
            }
            SpeciesKind::Site => TermClass::FreeSite(self.site_index(name).unwrap_or_default()),
            SpeciesKind::TransitionState => TermClass::TransitionState(
                self.transition_state_names
                    .iter()
                    .position(|n| n == name)
                    .unwrap_or_default(),
            ),
        };
        Ok(class)
    }

    /// Gas stoichiometry matrix (reactions × gases): net coefficient of each
    /// gas in each reaction. TOF projection takes the element-wise absolute
    /// value of this matrix.
    pub fn gas_matrix(&self) -> DMatrix<Real> {
        let r = self.reactions.len();
        let g = self.gas_names.len();
        DMatrix::from_fn(r, g, |i, j| {
            self.reactions[i].net_coefficient(&self.gas_names[j]) as Real
        })
    }

    /// Ordered partial pressures, one per gas.
    pub fn pressures(&self) -> ModelResult<Vec<Real>> {
        self.gas_names
            .iter()
            .map(|name| {
                self.get(name)
                    .ok_or_else(|| ModelError::MissingData {
                        species: name.clone(),
                        what: "definition",
                    })?
                    .pressure()
            })
            .collect()
    }
}
