//! Elementary reactions: ordered sequences of 2 or 3 stoichiometric states.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// One signed stoichiometric term, e.g. `3 × H2_g`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub coeff: u32,
    pub species: String,
}

impl Term {
    pub fn new(coeff: u32, species: impl Into<String>) -> Self {
        Self {
            coeff,
            species: species.into(),
        }
    }

    /// Shorthand for a coefficient-1 term.
    pub fn one(species: impl Into<String>) -> Self {
        Self::new(1, species)
    }
}

/// An elementary surface reaction.
///
/// Invariant: the first state is the reactants, the last the products. A
/// 3-state reaction carries an explicit transition state in the middle; for
/// a 2-state reaction the transition state is implicitly the higher-energy
/// endpoint (ties resolved toward the products).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ElementaryReaction {
    reactants: Vec<Term>,
    transition: Option<Vec<Term>>,
    products: Vec<Term>,
}

impl ElementaryReaction {
    /// Barrierless (2-state) reaction.
    pub fn two_state(reactants: Vec<Term>, products: Vec<Term>) -> ModelResult<Self> {
        Self::validate_state(&reactants)?;
        Self::validate_state(&products)?;
        Ok(Self {
            reactants,
            transition: None,
            products,
        })
    }

    /// Activated (3-state) reaction with an explicit transition state.
    pub fn with_transition(
        reactants: Vec<Term>,
        transition: Vec<Term>,
        products: Vec<Term>,
    ) -> ModelResult<Self> {
        Self::validate_state(&reactants)?;
        Self::validate_state(&transition)?;
        Self::validate_state(&products)?;
        Ok(Self {
            reactants,
            transition: Some(transition),
            products,
        })
    }

    fn validate_state(state: &[Term]) -> ModelResult<()> {
        if state.is_empty() {
            return Err(ModelError::EmptyState);
        }
        Ok(())
    }

    pub fn reactants(&self) -> &[Term] {
        &self.reactants
    }

    pub fn products(&self) -> &[Term] {
        &self.products
    }

    pub fn transition(&self) -> Option<&[Term]> {
        self.transition.as_deref()
    }

    pub fn has_transition(&self) -> bool {
        self.transition.is_some()
    }

    /// All species names referenced by any state, with repeats.
    pub fn species(&self) -> impl Iterator<Item = &str> {
        self.reactants
            .iter()
            .chain(self.transition.iter().flatten())
            .chain(self.products.iter())
            .map(|t| t.species.as_str())
    }

    /// Net stoichiometric coefficient of `species` (products minus
    /// reactants); the transition state never contributes.
    pub fn net_coefficient(&self, species: &str) -> i64 {
        let count = |terms: &[Term]| -> i64 {
            terms
                .iter()
                .filter(|t| t.species == species)
                .map(|t| t.coeff as i64)
                .sum()
        };
        count(&self.products) - count(&self.reactants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adsorption() -> ElementaryReaction {
        // CO_g + *_s -> CO_s
        ElementaryReaction::two_state(
            vec![Term::one("CO_g"), Term::one("*_s")],
            vec![Term::one("CO_s")],
        )
        .unwrap()
    }

    #[test]
    fn net_coefficient_signs() {
        let rxn = adsorption();
        assert_eq!(rxn.net_coefficient("CO_s"), 1);
        assert_eq!(rxn.net_coefficient("CO_g"), -1);
        assert_eq!(rxn.net_coefficient("*_s"), -1);
        assert_eq!(rxn.net_coefficient("O_s"), 0);
    }

    #[test]
    fn net_coefficient_with_stoichiometry() {
        // 3H2_g + 6*_s -> 6H_s
        let rxn = ElementaryReaction::two_state(
            vec![Term::new(3, "H2_g"), Term::new(6, "*_s")],
            vec![Term::new(6, "H_s")],
        )
        .unwrap();
        assert_eq!(rxn.net_coefficient("H_s"), 6);
        assert_eq!(rxn.net_coefficient("*_s"), -6);
    }

    #[test]
    fn empty_state_rejected() {
        assert!(ElementaryReaction::two_state(vec![], vec![Term::one("CO_s")]).is_err());
    }

    #[test]
    fn species_iterates_all_states() {
        let rxn = ElementaryReaction::with_transition(
            vec![Term::one("CO_s"), Term::one("O_s")],
            vec![Term::one("CO-O_s"), Term::one("*_s")],
            vec![Term::one("CO2_g"), Term::new(2, "*_s")],
        )
        .unwrap();
        let names: Vec<&str> = rxn.species().collect();
        assert_eq!(names, ["CO_s", "O_s", "CO-O_s", "*_s", "CO2_g", "*_s"]);
    }
}
