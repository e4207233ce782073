//! Human-readable formula rendering.
//!
//! An optional capability for inspecting what the solver computes. Nothing
//! in the solving path calls into this module; it re-derives its strings
//! from the network alone.

use sk_model::{ReactionNetwork, Term, TermClass};

use crate::error::{SolverError, SolverResult};

fn term_str(network: &ReactionNetwork, reaction: usize, term: &Term) -> SolverResult<String> {
    let base = match network.classify_term(&term.species)? {
        TermClass::Gas(_) => format!("p_{}", term.species),
        TermClass::Adsorbate(_) => format!("theta_{}", term.species),
        TermClass::FreeSite(s) => {
            let site = &network.site_names()[s];
            let mut expr = format!("{}", network.site_capacity(site));
            for ads in network.adsorbates_on(site) {
                expr.push_str(&format!(" - theta_{ads}"));
            }
            format!("({expr})")
        }
        TermClass::TransitionState(_) => {
            return Err(SolverError::MisplacedTransitionState {
                species: term.species.clone(),
                reaction,
            });
        }
    };
    Ok(if term.coeff == 1 {
        base
    } else {
        format!("{base}^{}", term.coeff)
    })
}

fn direction_str(
    network: &ReactionNetwork,
    reaction: usize,
    label: &str,
    terms: &[Term],
) -> SolverResult<String> {
    let mut out = format!("{label}[{reaction}]");
    for term in terms {
        out.push('*');
        out.push_str(&term_str(network, reaction, term)?);
    }
    Ok(out)
}

/// `(forward, reverse)` rate formula strings per reaction, e.g.
/// `kf[0]*p_CO_g*(1 - theta_CO_s)`.
pub fn rate_formulas(network: &ReactionNetwork) -> SolverResult<Vec<(String, String)>> {
    network
        .reactions()
        .iter()
        .enumerate()
        .map(|(i, rxn)| {
            Ok((
                direction_str(network, i, "kf", rxn.reactants())?,
                direction_str(network, i, "kr", rxn.products())?,
            ))
        })
        .collect()
}

/// Equilibrium-constant formula strings per reaction.
pub fn equilibrium_formulas(network: &ReactionNetwork) -> Vec<String> {
    (0..network.reactions().len())
        .map(|i| format!("K[{i}] = kf[{i}]/kr[{i}]"))
        .collect()
}
