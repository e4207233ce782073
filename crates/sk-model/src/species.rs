//! Species definitions.

use serde::{Deserialize, Serialize};
use sk_core::Real;

use crate::error::{ModelError, ModelResult};

/// What a species is, which decides how its occupancy/pressure enters a rate
/// expression and how its energy coordinate is perturbed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeciesKind {
    Gas,
    Adsorbate,
    Site,
    TransitionState,
}

/// Per-species input data, as supplied by the external parser collaborator.
///
/// Optional fields are optional at the data level only: accessing a field a
/// computation needs when it is absent is a fatal
/// [`ModelError::MissingData`], surfaced before any partial computation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpeciesDef {
    pub name: String,
    pub kind: SpeciesKind,

    /// Site occupied by an adsorbate or transition state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,

    /// Formation free energy [eV].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formation_energy: Option<Real>,

    /// Partial pressure [bar], gases only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<Real>,

    /// Site capacity, sites only. Defaults to 1.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Real>,

    /// Vibrational frequencies [1/cm]. Carried for collaborators, not
    /// consumed by the steady-state core.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frequencies: Vec<Real>,
}

impl SpeciesDef {
    pub fn gas(name: impl Into<String>, formation_energy: Real, pressure: Real) -> Self {
        Self {
            name: name.into(),
            kind: SpeciesKind::Gas,
            site: None,
            formation_energy: Some(formation_energy),
            pressure: Some(pressure),
            total: None,
            frequencies: Vec::new(),
        }
    }

    pub fn adsorbate(
        name: impl Into<String>,
        site: impl Into<String>,
        formation_energy: Real,
    ) -> Self {
        Self {
            name: name.into(),
            kind: SpeciesKind::Adsorbate,
            site: Some(site.into()),
            formation_energy: Some(formation_energy),
            pressure: None,
            total: None,
            frequencies: Vec::new(),
        }
    }

    pub fn site(name: impl Into<String>, total: Real) -> Self {
        Self {
            name: name.into(),
            kind: SpeciesKind::Site,
            site: None,
            formation_energy: Some(0.0),
            pressure: None,
            total: Some(total),
            frequencies: Vec::new(),
        }
    }

    pub fn transition_state(
        name: impl Into<String>,
        site: impl Into<String>,
        formation_energy: Real,
    ) -> Self {
        Self {
            name: name.into(),
            kind: SpeciesKind::TransitionState,
            site: Some(site.into()),
            formation_energy: Some(formation_energy),
            pressure: None,
            total: None,
            frequencies: Vec::new(),
        }
    }

    pub fn with_frequencies(mut self, frequencies: Vec<Real>) -> Self {
        self.frequencies = frequencies;
        self
    }

    /// Formation free energy, or `MissingData`.
    pub fn formation_energy(&self) -> ModelResult<Real> {
        self.formation_energy.ok_or_else(|| ModelError::MissingData {
            species: self.name.clone(),
            what: "formation_energy",
        })
    }

    /// Partial pressure, or `MissingData`. Meaningful for gases only.
    pub fn pressure(&self) -> ModelResult<Real> {
        self.pressure.ok_or_else(|| ModelError::MissingData {
            species: self.name.clone(),
            what: "pressure",
        })
    }

    /// Site capacity; sites without an explicit total hold one monolayer.
    pub fn site_total(&self) -> Real {
        self.total.unwrap_or(1.0)
    }
}
