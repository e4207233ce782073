//! Gas-energy correction hook.
//!
//! Thermochemical corrections (Shomate fits and friends) are an external
//! collaborator; the solver consumes them only as an additive mapping
//! gas name → energy delta [eV].

use std::collections::HashMap;

use sk_core::Real;

pub trait GasCorrector {
    fn correction_mapping(&self) -> HashMap<String, Real>;
}

/// No correction at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCorrection;

impl GasCorrector for NoCorrection {
    fn correction_mapping(&self) -> HashMap<String, Real> {
        HashMap::new()
    }
}

/// Fixed, externally computed corrections.
#[derive(Clone, Debug, Default)]
pub struct TabulatedCorrection {
    map: HashMap<String, Real>,
}

impl TabulatedCorrection {
    pub fn new(map: HashMap<String, Real>) -> Self {
        Self { map }
    }

    pub fn insert(&mut self, gas: impl Into<String>, delta: Real) -> &mut Self {
        self.map.insert(gas.into(), delta);
        self
    }
}

impl GasCorrector for TabulatedCorrection {
    fn correction_mapping(&self) -> HashMap<String, Real> {
        self.map.clone()
    }
}
