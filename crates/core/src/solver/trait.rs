//! Photosynthesis closure trait definition
//!
//! Both closures share one call contract: forcing plus a read-only view of a
//! cohort and the light reaching it in, a flux out. The driver converts the
//! flux into the cohort's persisted units.

use crate::core_types::cohort::Cohort;
use crate::core_types::forcing::Forcing;
use crate::core_types::species::SpeciesParams;
use crate::physics::acclimation::EnvironmentMemory;
use crate::physics::leuning::LeafGasExchange;
use crate::physics::pmodel::CrownFlux;
use crate::solver::scheme::PhotosynthesisScheme;

/// Per-cohort inputs for one timestep
#[derive(Debug, Clone, Copy)]
pub struct CohortContext<'a> {
    /// This timestep's forcing
    pub forcing: &'a Forcing,
    /// The cohort (structure only; outputs are written by the driver)
    pub cohort: &'a Cohort,
    /// The cohort's species parameters
    pub species: &'a SpeciesParams,
    /// Fraction of top-of-canopy light reaching the cohort's layer
    pub light_fraction: f64,
    /// Fraction of that light absorbed by the cohort's crown
    pub crown_fapar: f64,
    /// Specific humidity of the canopy air (kg/kg)
    pub canopy_humidity: f64,
    /// Timestep length (s)
    pub step_seconds: f64,
}

/// Flux produced by a closure, in the closure's native basis
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClosureFlux {
    /// No gas exchange this step
    Inactive,
    /// Per unit leaf area, with stomatal water limitation
    PerLeafArea(LeafGasExchange),
    /// Per unit crown area, without stomatal water limitation
    PerCrownArea(CrownFlux),
}

/// Interface shared by the photosynthesis closures
///
/// `begin_timestep` runs once per timestep before any cohort is processed and
/// is the only place a closure may update its own state. `cohort_flux` must
/// not depend on other cohorts, so cohorts can be processed in parallel.
pub trait PhotosynthesisClosure: Send + Sync {
    /// Scheme implemented by this closure
    fn scheme(&self) -> PhotosynthesisScheme;

    /// Advance any run-scoped state to the current forcing
    ///
    /// # Arguments
    ///
    /// * `forcing` - This timestep's forcing
    /// * `first_step` - Whether this is the first timestep of the run
    fn begin_timestep(&mut self, forcing: &Forcing, first_step: bool);

    /// Compute the flux of one leaf-bearing cohort
    fn cohort_flux(&self, ctx: &CohortContext<'_>) -> ClosureFlux;

    /// Smoothed environment, for closures that keep one
    fn memory(&self) -> Option<&EnvironmentMemory> {
        None
    }
}
