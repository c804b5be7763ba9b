//! Acclimated-optimality closure backend

use crate::core_types::forcing::Forcing;
use crate::core_types::params::ModelParams;
use crate::physics::acclimation::{AcclimationState, EnvironmentMemory};
use crate::physics::pmodel::{calculate_acclimated_flux, AcclimatedEnvironment};
use crate::solver::optimality::{CiMethod, JmaxLimitation, OptimalitySolver};
use crate::solver::r#trait::{ClosureFlux, CohortContext, PhotosynthesisClosure};
use crate::solver::scheme::PhotosynthesisScheme;

/// P-model closure with its own environmental memory
///
/// The memory is advanced once per timestep in `begin_timestep`, before any
/// cohort is processed, and is read-only during the cohort loop.
pub struct PModelClosure {
    solver: Box<dyn OptimalitySolver>,
    params: ModelParams,
    tau_steps: f64,
    ci_method: CiMethod,
    jmax_limitation: JmaxLimitation,
    acclimation: AcclimationState,
}

impl PModelClosure {
    /// Create the closure
    ///
    /// # Arguments
    ///
    /// * `solver` - Least-cost optimality solver supplied by the host
    /// * `params` - Validated model-wide parameters
    /// * `step_seconds` - Timestep length, used to express τ in timesteps
    pub fn new(solver: Box<dyn OptimalitySolver>, params: ModelParams, step_seconds: f64) -> Self {
        let tau_steps = params.tau_acclim_steps(step_seconds);
        PModelClosure {
            solver,
            params,
            tau_steps,
            ci_method: CiMethod::default(),
            jmax_limitation: JmaxLimitation::default(),
            acclimation: AcclimationState::new(),
        }
    }

    /// Select the solver methods
    pub fn with_methods(mut self, ci_method: CiMethod, jmax_limitation: JmaxLimitation) -> Self {
        self.ci_method = ci_method;
        self.jmax_limitation = jmax_limitation;
        self
    }

    /// Acclimation time constant in timesteps
    pub fn tau_steps(&self) -> f64 {
        self.tau_steps
    }

    /// Current acclimation state
    pub fn acclimation(&self) -> &AcclimationState {
        &self.acclimation
    }
}

impl std::fmt::Debug for PModelClosure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PModelClosure")
            .field("tau_steps", &self.tau_steps)
            .field("ci_method", &self.ci_method)
            .field("jmax_limitation", &self.jmax_limitation)
            .field("acclimation", &self.acclimation)
            .finish_non_exhaustive()
    }
}

impl PhotosynthesisClosure for PModelClosure {
    fn scheme(&self) -> PhotosynthesisScheme {
        PhotosynthesisScheme::AcclimatedOptimality
    }

    fn begin_timestep(&mut self, forcing: &Forcing, first_step: bool) {
        self.acclimation.advance(forcing, self.tau_steps, first_step);
    }

    fn cohort_flux(&self, ctx: &CohortContext<'_>) -> ClosureFlux {
        let Some(memory) = self.acclimation.memory() else {
            return ClosureFlux::Inactive;
        };

        let flux = calculate_acclimated_flux(
            self.solver.as_ref(),
            &self.params,
            self.ci_method,
            self.jmax_limitation,
            &AcclimatedEnvironment {
                memory,
                air_temperature: ctx.forcing.air_temperature_celsius(),
                par: ctx.forcing.par,
                light_fraction: ctx.light_fraction,
                crown_fapar: ctx.crown_fapar,
                soil_moisture: ctx.forcing.soil_moisture,
                species: ctx.species,
                pathway: ctx.cohort.pathway,
            },
        );

        flux.map_or(ClosureFlux::Inactive, ClosureFlux::PerCrownArea)
    }

    fn memory(&self) -> Option<&EnvironmentMemory> {
        self.acclimation.memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::cohort::{Cohort, PhotosynthesisPathway};
    use crate::core_types::species::SpeciesParams;
    use crate::solver::optimality::{OptimalityInput, OptimalityOutput};

    fn fixed_solver() -> Box<dyn OptimalitySolver> {
        Box::new(|_: &OptimalityInput| OptimalityOutput {
            lue: 0.05,
            vcmax25: 4.0e-5,
        })
    }

    #[test]
    fn test_tau_steps_from_days() {
        let closure = PModelClosure::new(fixed_solver(), ModelParams::default(), 86_400.0);
        assert_eq!(closure.tau_steps(), 30.0);
    }

    #[test]
    fn test_inactive_before_first_timestep() {
        let closure = PModelClosure::new(fixed_solver(), ModelParams::default(), 3_600.0);
        let forcing = Forcing::default();
        let cohort = Cohort::new(0, PhotosynthesisPathway::C3, 1, 20.0, 5.0, 0.1);
        let species = SpeciesParams::temperate_deciduous();
        let flux = closure.cohort_flux(&CohortContext {
            forcing: &forcing,
            cohort: &cohort,
            species: &species,
            light_fraction: 1.0,
            crown_fapar: 0.8,
            canopy_humidity: 0.01,
            step_seconds: 3_600.0,
        });
        assert_eq!(flux, ClosureFlux::Inactive);
    }

    #[test]
    fn test_active_after_begin_timestep() {
        let mut closure = PModelClosure::new(fixed_solver(), ModelParams::default(), 3_600.0);
        let forcing = Forcing::default();
        closure.begin_timestep(&forcing, true);
        assert!(closure.acclimation().memory().is_some());

        let cohort = Cohort::new(0, PhotosynthesisPathway::C3, 1, 20.0, 5.0, 0.1);
        let species = SpeciesParams::temperate_deciduous();
        let flux = closure.cohort_flux(&CohortContext {
            forcing: &forcing,
            cohort: &cohort,
            species: &species,
            light_fraction: 1.0,
            crown_fapar: 0.8,
            canopy_humidity: 0.01,
            step_seconds: 3_600.0,
        });
        assert!(matches!(flux, ClosureFlux::PerCrownArea(c) if c.gross_assimilation > 0.0));
    }
}
