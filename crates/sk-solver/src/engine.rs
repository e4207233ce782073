//! High-level solver facade.
//!
//! [`SteadyStateSolver`] owns the mutable free-energy state and the solver
//! settings, borrows the immutable model context, numeric backend, and
//! archive sink, and orchestrates the rate builder, steady-state system,
//! and Newton iteration. Every produced result is handed to the archive
//! sink; the sink never influences a result.

use nalgebra::{DMatrix, DVector};
use sk_core::{NumericBackend, Real};
use sk_model::{ArchiveSink, FreeEnergies, GasCorrector, ModelContext};
use tracing::debug;

use crate::constraint::SiteConservation;
use crate::error::{SolverError, SolverResult};
use crate::initialization::boltzmann_coverages;
use crate::jacobian::{classified_jacobian, forward_jacobian};
use crate::newton::NewtonRoot;
use crate::rates::{RateBuilder, RateConstants, RateExpressions, ReactionEnergetics};
use crate::settings::SolverSettings;
use crate::steady::{SteadyStateSystem, net_rates, reversibilities};
use crate::tof::{project_tof, rate_control_from_jacobian};

pub struct SteadyStateSolver<'a> {
    ctx: &'a ModelContext,
    backend: &'a dyn NumericBackend,
    archive: &'a dyn ArchiveSink,
    settings: SolverSettings,
    constraint: SiteConservation,
    energies: FreeEnergies,
}

impl<'a> SteadyStateSolver<'a> {
    /// Build a solver over the context's formation energies.
    pub fn new(
        ctx: &'a ModelContext,
        backend: &'a dyn NumericBackend,
        archive: &'a dyn ArchiveSink,
        settings: SolverSettings,
    ) -> SolverResult<Self> {
        let energies = FreeEnergies::from_network(&ctx.network)?;
        Ok(Self {
            ctx,
            backend,
            archive,
            settings,
            constraint: SiteConservation::new(&ctx.network),
            energies,
        })
    }

    /// Replace the energy state wholesale (e.g. externally corrected data).
    pub fn with_energies(mut self, energies: FreeEnergies) -> Self {
        self.energies = energies;
        self
    }

    pub fn energies(&self) -> &FreeEnergies {
        &self.energies
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    /// Apply the external correction mapping additively to gas energies.
    pub fn apply_gas_corrections(&mut self, corrector: &dyn GasCorrector) {
        let map = corrector.correction_mapping();
        self.energies.apply_corrections(&map);
    }

    /// Barriers and state energies per reaction, in network order.
    pub fn reaction_energies(&self) -> SolverResult<Vec<ReactionEnergetics>> {
        let builder = RateBuilder::new(self.ctx, self.backend);
        self.ctx
            .network
            .reactions()
            .iter()
            .enumerate()
            .map(|(i, rxn)| builder.reaction_energies(i, rxn, &self.energies))
            .collect()
    }

    /// Eyring rate constants from the current energy state.
    pub fn rate_constants(&self) -> SolverResult<RateConstants> {
        RateBuilder::new(self.ctx, self.backend).rate_constants(&self.energies)
    }

    /// Rate expression trees, one forward/reverse pair per reaction.
    pub fn rate_expressions(&self) -> SolverResult<RateExpressions> {
        RateBuilder::new(self.ctx, self.backend).rate_expressions()
    }

    /// Equilibrium constant kf/kr per reaction.
    pub fn equilibrium_constants(&self) -> SolverResult<Vec<Real>> {
        Ok(self.rate_constants()?.equilibrium_constants())
    }

    /// Forward and reverse rates at a coverage vector.
    pub fn rates(&self, theta: &[Real]) -> SolverResult<(Vec<Real>, Vec<Real>)> {
        let system = SteadyStateSystem::assemble(self.ctx, self.backend, &self.energies)?;
        let (rf, rr) = system.rates(theta);
        self.archive
            .archive("rates", serde_json::json!([&rf, &rr]));
        Ok((rf, rr))
    }

    /// Net rate rf − rr per reaction.
    pub fn net_rates(&self, rf: &[Real], rr: &[Real]) -> SolverResult<Vec<Real>> {
        let net = net_rates(rf, rr)?;
        self.archive.archive("net_rates", serde_json::json!(&net));
        Ok(net)
    }

    /// Reversibility rr/rf per reaction.
    pub fn reversibilities(&self, rf: &[Real], rr: &[Real]) -> SolverResult<Vec<Real>> {
        let rev = reversibilities(rf, rr)?;
        self.archive
            .archive("reversibilities", serde_json::json!(&rev));
        Ok(rev)
    }

    /// Boltzmann-weighted initial coverage guess.
    pub fn boltzmann_coverages(&self) -> SolverResult<Vec<Real>> {
        let guess = boltzmann_coverages(self.ctx, self.backend, &self.energies)?;
        Ok(guess.iter().copied().collect())
    }

    /// Solve for the steady-state coverages from an initial guess.
    pub fn steady_state_coverages(&self, initial_guess: &[Real]) -> SolverResult<Vec<Real>> {
        let system = SteadyStateSystem::assemble(self.ctx, self.backend, &self.energies)?;
        let theta = self.drive(&system, DVector::from_column_slice(initial_guess))?;
        let coverages: Vec<Real> = theta.iter().copied().collect();
        self.archive
            .archive("steady_state_coverage", serde_json::json!(&coverages));
        Ok(coverages)
    }

    /// Current free energies of the intermediates, in the
    /// adsorbates-then-transition-states coordinate order used by
    /// [`Self::tof`] and [`Self::rate_control`].
    pub fn intermediate_energies(&self) -> SolverResult<Vec<Real>> {
        self.intermediate_order()
            .iter()
            .map(|name| {
                self.energies
                    .get(name)
                    .ok_or_else(|| SolverError::MissingEnergy {
                        species: name.clone(),
                    })
            })
            .collect()
    }

    /// The coordinate order for intermediate energies.
    pub fn intermediate_order(&self) -> Vec<String> {
        let net = &self.ctx.network;
        net.adsorbate_names()
            .iter()
            .chain(net.transition_state_names())
            .cloned()
            .collect()
    }

    /// Turnover frequencies for a supplied intermediate energy vector.
    ///
    /// The shared energy state is never touched: the overlay happens on a
    /// private copy, which then drives rate constants, a fresh steady-state
    /// solve, and the TOF projection.
    pub fn tof(&self, intermediate_gs: &[Real]) -> SolverResult<Vec<Real>> {
        let order = self.intermediate_order();
        let energies = self.energies.with_overlaid(&order, intermediate_gs)?;
        self.tof_with(&energies)
    }

    fn tof_with(&self, energies: &FreeEnergies) -> SolverResult<Vec<Real>> {
        let system = SteadyStateSystem::assemble(self.ctx, self.backend, energies)?;
        let guess = boltzmann_coverages(self.ctx, self.backend, energies)?;
        let theta = self.drive(&system, guess)?;
        let (rf, rr) = system.rates(theta.as_slice());
        let net = net_rates(&rf, &rr)?;
        let tofs = project_tof(&self.ctx.network.gas_matrix(), &net);
        self.archive.archive("tofs", serde_json::json!(&tofs));
        Ok(tofs)
    }

    /// Turnover frequencies at a fixed coverage vector, without re-solving.
    pub fn coverage_tof(&self, theta: &[Real]) -> SolverResult<Vec<Real>> {
        let system = SteadyStateSystem::assemble(self.ctx, self.backend, &self.energies)?;
        let (rf, rr) = system.rates(theta);
        let net = net_rates(&rf, &rr)?;
        let tofs = project_tof(&self.ctx.network.gas_matrix(), &net);
        self.archive.archive("tofs", serde_json::json!(&tofs));
        Ok(tofs)
    }

    /// Degree of rate control: `−kB·T/TOF_i · ∂TOF_i/∂G_j` (gases ×
    /// intermediate coordinates).
    pub fn rate_control(&self) -> SolverResult<DMatrix<Real>> {
        let gs = self.intermediate_energies()?;
        let x = DVector::from_vec(gs.clone());
        let split = self.ctx.network.adsorbate_names().len();

        let f = |g: &DVector<Real>| -> SolverResult<DVector<Real>> {
            Ok(DVector::from_vec(self.tof(g.as_slice())?))
        };
        let dtof_dg = classified_jacobian(
            &f,
            &x,
            self.settings.perturbation_size,
            split,
            self.settings.perturbation_direction,
        )?;

        let tofs = self.tof(&gs)?;
        let dtrc = rate_control_from_jacobian(&dtof_dg, &tofs, self.ctx.constants.kbt());

        let rows: Vec<Vec<Real>> = dtrc
            .row_iter()
            .map(|r| r.iter().copied().collect())
            .collect();
        self.archive.archive("rate_control", serde_json::json!(&rows));
        Ok(dtrc)
    }

    /// Drive the Newton iterator under the configured
    /// (max_iterations, residual_tolerance) policy.
    fn drive(
        &self,
        system: &SteadyStateSystem<'_>,
        x0: DVector<Real>,
    ) -> SolverResult<DVector<Real>> {
        let f = |x: &DVector<Real>| system.residual(x);
        let j = |x: &DVector<Real>| forward_jacobian(&f, x, self.settings.jacobian_step);

        let mut newton = NewtonRoot::new(&f, &j, x0.clone(), &self.constraint, self.backend)
            .with_warmup(self.settings.warmup_iterations)
            .with_line_search_tolerance(self.settings.line_search_tolerance);

        let mut last_point = x0;
        let mut last_norm = Real::INFINITY;
        for _ in 0..self.settings.max_iterations {
            match newton.next() {
                // stationary point: the iterator's own convergence signal
                None => {
                    debug!(residual_norm = last_norm, "converged at stationary point");
                    return Ok(last_point);
                }
                Some(Ok(step)) => {
                    last_point = step.point;
                    last_norm = step.residual_norm;
                    if last_norm <= self.settings.residual_tolerance {
                        debug!(residual_norm = last_norm, "converged below tolerance");
                        return Ok(last_point);
                    }
                }
                Some(Err(e)) => return Err(e),
            }
        }

        Err(SolverError::NonConvergence {
            iterations: self.settings.max_iterations,
            residual_norm: last_norm,
        })
    }
}
