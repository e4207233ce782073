//! Reaction energetics, Eyring rate constants, and rate expressions.
//!
//! A rate expression is a tagged product tree — rate constant times a
//! product of pressure/coverage/free-site factors raised to stoichiometric
//! exponents — evaluated directly against the coverage and pressure arrays.

use sk_core::{NumericBackend, Real};
use sk_model::{ElementaryReaction, FreeEnergies, ModelContext, Term, TermClass};
use tracing::warn;

use crate::error::{SolverError, SolverResult};

/// Which endpoint of a 2-state reaction supplies the implicit transition
/// energy. Ties resolve to the final state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImplicitTransition {
    Initial,
    Final,
}

/// Free energies of one reaction's states and the barriers derived from
/// them.
#[derive(Clone, Copy, Debug)]
pub struct ReactionEnergetics {
    pub g_is: Real,
    pub g_ts: Real,
    pub g_fs: Real,
    /// Populated for 2-state reactions only.
    pub implicit_transition: Option<ImplicitTransition>,
}

impl ReactionEnergetics {
    pub fn forward_barrier(&self) -> Real {
        self.g_ts - self.g_is
    }

    pub fn reverse_barrier(&self) -> Real {
        self.g_ts - self.g_fs
    }

    /// Reaction free energy ΔG = G_FS − G_IS.
    pub fn reaction_energy(&self) -> Real {
        self.g_fs - self.g_is
    }
}

/// One forward/reverse rate-constant pair per reaction, in network order.
#[derive(Clone, Debug)]
pub struct RateConstants {
    pub forward: Vec<Real>,
    pub reverse: Vec<Real>,
}

impl RateConstants {
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Equilibrium constant kf/kr per reaction.
    pub fn equilibrium_constants(&self) -> Vec<Real> {
        self.forward
            .iter()
            .zip(&self.reverse)
            .map(|(kf, kr)| kf / kr)
            .collect()
    }
}

/// One multiplicative factor of a rate expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateFactor {
    pub var: TermClass,
    pub exponent: u32,
}

/// `k × Π(var^exponent)` for one direction of one reaction.
#[derive(Clone, Debug)]
pub struct RateExpr {
    pub reaction: usize,
    pub factors: Vec<RateFactor>,
}

impl RateExpr {
    /// Evaluate against the coverage, pressure, and free-site arrays.
    pub fn eval(&self, k: Real, theta: &[Real], pressures: &[Real], free_sites: &[Real]) -> Real {
        let mut rate = k;
        for f in &self.factors {
            let base = match f.var {
                TermClass::Gas(g) => pressures[g],
                TermClass::Adsorbate(a) => theta[a],
                TermClass::FreeSite(s) => free_sites[s],
                // construction rejects transition states in end states
                TermClass::TransitionState(_) => 1.0,
            };
            rate *= base.powi(f.exponent as i32);
        }
        rate
    }
}

/// Forward/reverse expression pair per reaction.
#[derive(Clone, Debug)]
pub struct RateExpressions {
    pub forward: Vec<RateExpr>,
    pub reverse: Vec<RateExpr>,
}

impl RateExpressions {
    /// Evaluate every reaction's forward and reverse rate.
    pub fn evaluate(
        &self,
        ks: &RateConstants,
        theta: &[Real],
        pressures: &[Real],
        free_sites: &[Real],
    ) -> (Vec<Real>, Vec<Real>) {
        let rf = self
            .forward
            .iter()
            .map(|e| e.eval(ks.forward[e.reaction], theta, pressures, free_sites))
            .collect();
        let rr = self
            .reverse
            .iter()
            .map(|e| e.eval(ks.reverse[e.reaction], theta, pressures, free_sites))
            .collect();
        (rf, rr)
    }
}

/// Free-site occupancy per site: `total − Σ(adsorbate coverages on that
/// site)`, in site-name order.
pub fn free_site_coverages(ctx: &ModelContext, theta: &[Real]) -> Vec<Real> {
    let net = &ctx.network;
    net.site_names()
        .iter()
        .map(|site| {
            let occupied: Real = net
                .adsorbates_on(site)
                .iter()
                .filter_map(|ads| net.adsorbate_index(ads))
                .map(|i| theta[i])
                .sum();
            net.site_capacity(site) - occupied
        })
        .collect()
}

/// Builds rate constants and rate expressions from the network and a
/// free-energy map.
pub struct RateBuilder<'a> {
    ctx: &'a ModelContext,
    backend: &'a dyn NumericBackend,
}

impl<'a> RateBuilder<'a> {
    pub fn new(ctx: &'a ModelContext, backend: &'a dyn NumericBackend) -> Self {
        Self { ctx, backend }
    }

    fn state_energy(&self, terms: &[Term], energies: &FreeEnergies) -> SolverResult<Real> {
        let mut g = 0.0;
        for t in terms {
            let e = energies
                .get(&t.species)
                .ok_or_else(|| SolverError::MissingEnergy {
                    species: t.species.clone(),
                })?;
            g += t.coeff as Real * e;
        }
        Ok(g)
    }

    /// Free energies and barriers for reaction `index`.
    pub fn reaction_energies(
        &self,
        index: usize,
        rxn: &ElementaryReaction,
        energies: &FreeEnergies,
    ) -> SolverResult<ReactionEnergetics> {
        let g_is = self.state_energy(rxn.reactants(), energies)?;
        let g_fs = self.state_energy(rxn.products(), energies)?;

        let (g_ts, implicit) = match rxn.transition() {
            Some(ts) => (self.state_energy(ts, energies)?, None),
            // implicit transition: the higher-energy endpoint, final state
            // winning ties
            None if g_is > g_fs => (g_is, Some(ImplicitTransition::Initial)),
            None => (g_fs, Some(ImplicitTransition::Final)),
        };

        let energetics = ReactionEnergetics {
            g_is,
            g_ts,
            g_fs,
            implicit_transition: implicit,
        };

        // An inconsistent energy landscape, not an error: report, never clip.
        if energetics.forward_barrier() < 0.0 || energetics.reverse_barrier() < 0.0 {
            warn!(
                reaction = index,
                forward_barrier = energetics.forward_barrier(),
                reverse_barrier = energetics.reverse_barrier(),
                "negative barrier from supplied energy landscape"
            );
        }

        Ok(energetics)
    }

    /// Eyring rate constants for every reaction:
    /// `k = (kB·T/h)·exp(−ΔG‡/(kB·T))`.
    pub fn rate_constants(&self, energies: &FreeEnergies) -> SolverResult<RateConstants> {
        let c = self.ctx.constants;
        let prefactor = c.prefactor();
        let kbt = c.kbt();

        let n = self.ctx.network.reactions().len();
        let mut forward = Vec::with_capacity(n);
        let mut reverse = Vec::with_capacity(n);
        for (i, rxn) in self.ctx.network.reactions().iter().enumerate() {
            let e = self.reaction_energies(i, rxn, energies)?;
            let kf = prefactor * self.backend.exp(-e.forward_barrier() / kbt);
            let kr = prefactor * self.backend.exp(-e.reverse_barrier() / kbt);
            for k in [kf, kr] {
                if !k.is_finite() {
                    return Err(SolverError::NonFiniteRate {
                        reaction: i,
                        value: k,
                    });
                }
            }
            forward.push(kf);
            reverse.push(kr);
        }
        Ok(RateConstants { forward, reverse })
    }

    fn state_factors(
        &self,
        index: usize,
        terms: &[Term],
    ) -> SolverResult<Vec<RateFactor>> {
        let mut factors = Vec::with_capacity(terms.len());
        for t in terms {
            let class = self.ctx.network.classify_term(&t.species)?;
            if matches!(class, TermClass::TransitionState(_)) {
                return Err(SolverError::MisplacedTransitionState {
                    species: t.species.clone(),
                    reaction: index,
                });
            }
            factors.push(RateFactor {
                var: class,
                exponent: t.coeff,
            });
        }
        Ok(factors)
    }

    /// Expression trees for every reaction: forward from the reactant state,
    /// reverse from the product state.
    pub fn rate_expressions(&self) -> SolverResult<RateExpressions> {
        let mut forward = Vec::new();
        let mut reverse = Vec::new();
        for (i, rxn) in self.ctx.network.reactions().iter().enumerate() {
            forward.push(RateExpr {
                reaction: i,
                factors: self.state_factors(i, rxn.reactants())?,
            });
            reverse.push(RateExpr {
                reaction: i,
                factors: self.state_factors(i, rxn.products())?,
            });
        }
        Ok(RateExpressions { forward, reverse })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sk_core::{NativeFloat, PhysicalConstants};
    use sk_model::{ElementaryReaction, NetworkBuilder, SpeciesDef};

    fn ctx_with(reactions: Vec<ElementaryReaction>, species: Vec<SpeciesDef>) -> ModelContext {
        let mut b = NetworkBuilder::new();
        for s in species {
            b.add_species(s);
        }
        for r in reactions {
            b.add_reaction(r);
        }
        ModelContext::new(b.build().unwrap(), PhysicalConstants::at_temperature(500.0))
    }

    fn co_adsorption_ctx() -> ModelContext {
        ctx_with(
            vec![
                ElementaryReaction::two_state(
                    vec![Term::one("CO_g"), Term::one("*_s")],
                    vec![Term::one("CO_s")],
                )
                .unwrap(),
            ],
            vec![
                SpeciesDef::site("s", 1.0),
                SpeciesDef::gas("CO_g", 0.0, 1.0),
                SpeciesDef::adsorbate("CO_s", "s", -1.5),
            ],
        )
    }

    #[test]
    fn barrier_difference_equals_reaction_energy() {
        // explicit transition state: ΔG‡_f − ΔG‡_r == G_FS − G_IS
        let ctx = ctx_with(
            vec![
                ElementaryReaction::with_transition(
                    vec![Term::one("CO_s"), Term::one("O_s")],
                    vec![Term::one("CO-O_s"), Term::one("*_s")],
                    vec![Term::one("CO2_g"), Term::new(2, "*_s")],
                )
                .unwrap(),
            ],
            vec![
                SpeciesDef::site("s", 1.0),
                SpeciesDef::gas("CO2_g", -0.4, 0.1),
                SpeciesDef::adsorbate("CO_s", "s", -1.5),
                SpeciesDef::adsorbate("O_s", "s", -0.8),
                SpeciesDef::transition_state("CO-O_s", "s", 0.2),
            ],
        );
        let backend = NativeFloat;
        let builder = RateBuilder::new(&ctx, &backend);
        let energies = FreeEnergies::from_network(&ctx.network).unwrap();
        let e = builder
            .reaction_energies(0, &ctx.network.reactions()[0], &energies)
            .unwrap();
        let lhs = e.forward_barrier() - e.reverse_barrier();
        assert!((lhs - e.reaction_energy()).abs() < 1e-12);
    }

    #[test]
    fn implicit_transition_is_higher_endpoint() {
        let ctx = co_adsorption_ctx();
        let backend = NativeFloat;
        let builder = RateBuilder::new(&ctx, &backend);
        let energies = FreeEnergies::from_network(&ctx.network).unwrap();
        let e = builder
            .reaction_energies(0, &ctx.network.reactions()[0], &energies)
            .unwrap();
        // G_IS = 0, G_FS = -1.5: initial endpoint is higher
        assert_eq!(e.g_ts, 0.0);
        assert_eq!(e.implicit_transition, Some(ImplicitTransition::Initial));
    }

    #[test]
    fn implicit_transition_tie_breaks_to_final() {
        let ctx = ctx_with(
            vec![
                ElementaryReaction::two_state(
                    vec![Term::one("CO_g"), Term::one("*_s")],
                    vec![Term::one("CO_s")],
                )
                .unwrap(),
            ],
            vec![
                SpeciesDef::site("s", 1.0),
                SpeciesDef::gas("CO_g", 0.0, 1.0),
                SpeciesDef::adsorbate("CO_s", "s", 0.0),
            ],
        );
        let backend = NativeFloat;
        let builder = RateBuilder::new(&ctx, &backend);
        let energies = FreeEnergies::from_network(&ctx.network).unwrap();
        let e = builder
            .reaction_energies(0, &ctx.network.reactions()[0], &energies)
            .unwrap();
        assert_eq!(e.implicit_transition, Some(ImplicitTransition::Final));
    }

    #[test]
    fn detailed_balance_identity() {
        // kf/kr == exp(−(G_FS − G_IS)/(kB·T))
        let ctx = co_adsorption_ctx();
        let backend = NativeFloat;
        let builder = RateBuilder::new(&ctx, &backend);
        let energies = FreeEnergies::from_network(&ctx.network).unwrap();
        let ks = builder.rate_constants(&energies).unwrap();
        let kbt = ctx.constants.kbt();
        let expected = (1.5 / kbt).exp();
        let ratio = ks.forward[0] / ks.reverse[0];
        assert!((ratio / expected - 1.0).abs() < 1e-10);
    }

    #[test]
    fn forward_favored_for_exothermic_adsorption() {
        let ctx = co_adsorption_ctx();
        let backend = NativeFloat;
        let builder = RateBuilder::new(&ctx, &backend);
        let energies = FreeEnergies::from_network(&ctx.network).unwrap();
        let ks = builder.rate_constants(&energies).unwrap();
        assert!(ks.forward[0] > ks.reverse[0]);
    }

    #[test]
    fn missing_energy_is_reported_by_species() {
        let ctx = co_adsorption_ctx();
        let backend = NativeFloat;
        let builder = RateBuilder::new(&ctx, &backend);
        let energies = FreeEnergies::default();
        let err = builder.rate_constants(&energies).unwrap_err();
        assert!(matches!(err, SolverError::MissingEnergy { .. }));
    }

    #[test]
    fn expression_uses_pressure_and_free_site() {
        let ctx = co_adsorption_ctx();
        let backend = NativeFloat;
        let builder = RateBuilder::new(&ctx, &backend);
        let exprs = builder.rate_expressions().unwrap();

        let ks = RateConstants {
            forward: vec![2.0],
            reverse: vec![1.0],
        };
        // θ_CO = 0.25 → free site = 0.75; p_CO = 1.0
        let theta = [0.25];
        let free = free_site_coverages(&ctx, &theta);
        let (rf, rr) = exprs.evaluate(&ks, &theta, &[1.0], &free);
        assert!((rf[0] - 2.0 * 1.0 * 0.75).abs() < 1e-12);
        assert!((rr[0] - 1.0 * 0.25).abs() < 1e-12);
    }

    #[test]
    fn stoichiometric_exponents_are_applied() {
        // O2_g + 2*_s -> 2O_s: reverse rate carries θ_O²
        let ctx = ctx_with(
            vec![
                ElementaryReaction::two_state(
                    vec![Term::one("O2_g"), Term::new(2, "*_s")],
                    vec![Term::new(2, "O_s")],
                )
                .unwrap(),
            ],
            vec![
                SpeciesDef::site("s", 1.0),
                SpeciesDef::gas("O2_g", 0.0, 0.5),
                SpeciesDef::adsorbate("O_s", "s", -0.8),
            ],
        );
        let backend = NativeFloat;
        let builder = RateBuilder::new(&ctx, &backend);
        let exprs = builder.rate_expressions().unwrap();
        let ks = RateConstants {
            forward: vec![1.0],
            reverse: vec![1.0],
        };
        let theta = [0.5];
        let free = free_site_coverages(&ctx, &theta);
        let (rf, rr) = exprs.evaluate(&ks, &theta, &[0.5], &free);
        assert!((rf[0] - 0.5 * 0.5 * 0.5).abs() < 1e-12);
        assert!((rr[0] - 0.25).abs() < 1e-12);
    }

}
