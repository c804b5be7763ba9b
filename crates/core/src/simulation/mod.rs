//! Per-timestep canopy flux driver
//!
//! `CanopyFluxDriver` runs one timestep in three ordered stages:
//! - Light partitioning across layers and crowns
//! - The closure's own state update (environmental memory for `pmodel`)
//! - Per-cohort closure calls, in parallel, converted to whole-tree units
//!
//! The first two stages complete before any cohort is processed, so the
//! cohort stage reads shared state only.

mod config;

pub use config::SimulationConfig;

use crate::core_types::cohort::{Cohort, CohortFluxes};
use crate::core_types::constants::{MOL_C, MOL_H2O, W_SCALE_NOT_APPLICABLE};
use crate::core_types::forcing::Forcing;
use crate::core_types::params::ModelParams;
use crate::core_types::species::SpeciesTable;
use crate::error::ConfigError;
use crate::physics::acclimation::EnvironmentMemory;
use crate::physics::leuning::LeafGasExchange;
use crate::physics::light_partitioning::{partition_light, LightPartition};
use crate::physics::pmodel::CrownFlux;
use crate::solver::{
    create_closure, ClosureFlux, CohortContext, OptimalitySolver, PhotosynthesisClosure,
    PhotosynthesisScheme,
};
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Light-use efficiency of the fixed-LUE diagnostic override
/// (kg C per µmol m⁻² s⁻¹ of layer PAR per m² absorbing crown)
const DEBUG_FIXED_LUE: f64 = 1.0e-10;

/// Top-level entry point of the canopy flux core
pub struct CanopyFluxDriver {
    config: SimulationConfig,
    params: ModelParams,
    species: SpeciesTable,
    closure: Box<dyn PhotosynthesisClosure>,
    light: LightPartition,
    steps_run: u64,
}

impl CanopyFluxDriver {
    /// Build a driver for one run
    ///
    /// # Arguments
    ///
    /// * `config` - Run configuration (scheme, timestep, layers)
    /// * `params` - Model-wide parameters
    /// * `species` - Species parameter table
    /// * `solver` - Optimality solver, required when `config.scheme` is `pmodel`
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the configuration or parameters are out of
    /// range, or when the optimality closure is selected without a solver
    pub fn new(
        config: SimulationConfig,
        params: ModelParams,
        species: SpeciesTable,
        solver: Option<Box<dyn OptimalitySolver>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let params = params.load()?;
        if species.is_empty() {
            return Err(ConfigError::EmptySpeciesTable);
        }

        let closure = create_closure(&config, &params, solver)?;
        let light = partition_light(&[], config.max_layers, params.kappa_light, params.gap_fraction);

        info!(
            "Canopy flux driver: scheme {}, dt = {} s, {} layers, {} species{}",
            config.scheme,
            config.step_seconds,
            config.max_layers,
            species.len(),
            if config.debug_fixed_lue {
                ", fixed-LUE debug override ON"
            } else {
                ""
            }
        );

        Ok(CanopyFluxDriver {
            config,
            params,
            species,
            closure,
            light,
            steps_run: 0,
        })
    }

    /// Advance the canopy by one timestep
    ///
    /// Writes `fluxes` on every cohort and nothing else. Cohorts without
    /// leaves, or with an unknown species, are reset to
    /// [`CohortFluxes::INACTIVE`].
    ///
    /// # Arguments
    ///
    /// * `forcing` - This timestep's forcing
    /// * `cohorts` - Every cohort of the tile, with current structure
    /// * `first_step` - Whether this is the first timestep of the run
    pub fn step(&mut self, forcing: &Forcing, cohorts: &mut [Cohort], first_step: bool) {
        self.light = partition_light(
            cohorts,
            self.config.max_layers,
            self.params.kappa_light,
            self.params.gap_fraction,
        );
        self.closure.begin_timestep(forcing, first_step);

        debug!(
            "Step {}: {} cohorts, light fractions {:?}",
            self.steps_run,
            cohorts.len(),
            self.light.light_fractions()
        );

        let closure = self.closure.as_ref();
        let light = &self.light;
        let species = &self.species;
        let canopy_humidity = forcing.specific_humidity();
        let step_seconds = self.config.step_seconds;
        let debug_fixed_lue = self.config.debug_fixed_lue;

        cohorts
            .par_iter_mut()
            .enumerate()
            .for_each(|(index, cohort)| {
                let crown_fapar = light.cohort_fapar(index);
                let light_fraction = light.light_at_layer(cohort.layer);

                if !cohort.has_leaves() {
                    cohort.fluxes = CohortFluxes::INACTIVE;
                    return;
                }
                let Some(params) = species.get(cohort.species) else {
                    warn!(
                        "Cohort {} references unknown species {}, treating as leafless",
                        index, cohort.species
                    );
                    cohort.fluxes = CohortFluxes::INACTIVE;
                    return;
                };

                let flux = closure.cohort_flux(&CohortContext {
                    forcing,
                    cohort,
                    species: params,
                    light_fraction,
                    crown_fapar,
                    canopy_humidity,
                    step_seconds,
                });

                let active = !matches!(flux, ClosureFlux::Inactive);
                let mut fluxes = match flux {
                    ClosureFlux::Inactive => CohortFluxes::INACTIVE,
                    ClosureFlux::PerLeafArea(exchange) => {
                        leaf_area_fluxes(&exchange, cohort, step_seconds)
                    }
                    ClosureFlux::PerCrownArea(crown) => {
                        crown_area_fluxes(&crown, cohort, step_seconds)
                    }
                };

                if debug_fixed_lue && active {
                    fluxes.gpp = DEBUG_FIXED_LUE
                        * forcing.par
                        * light_fraction
                        * cohort.crown_area
                        * crown_fapar;
                    fluxes.resl = 0.0;
                }

                cohort.fluxes = fluxes;
            });

        self.steps_run += 1;
    }

    /// Light partitioning of the most recent timestep
    pub fn light(&self) -> &LightPartition {
        &self.light
    }

    /// Environmental memory of the optimality closure, once initialised
    pub fn memory(&self) -> Option<&EnvironmentMemory> {
        self.closure.memory()
    }

    /// Scheme used for this run
    pub fn scheme(&self) -> PhotosynthesisScheme {
        self.closure.scheme()
    }

    /// Run configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Model-wide parameters
    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    /// Number of timesteps run so far
    pub fn steps_run(&self) -> u64 {
        self.steps_run
    }
}

impl std::fmt::Debug for CanopyFluxDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanopyFluxDriver")
            .field("config", &self.config)
            .field("params", &self.params)
            .field("scheme", &self.closure.scheme())
            .field("steps_run", &self.steps_run)
            .finish_non_exhaustive()
    }
}

/// Whole-tree outputs from per-leaf-area rates
fn leaf_area_fluxes(exchange: &LeafGasExchange, cohort: &Cohort, step_seconds: f64) -> CohortFluxes {
    let leaf_seconds = cohort.leaf_area * step_seconds;
    CohortFluxes {
        an_op: exchange.net_assimilation,
        an_cl: exchange.respiration,
        gpp: (exchange.net_assimilation + exchange.respiration) * MOL_C * leaf_seconds,
        resl: exchange.respiration * MOL_C * leaf_seconds,
        transp: exchange.transpiration * MOL_H2O * leaf_seconds,
        w_scale: exchange.w_scale,
    }
}

/// Whole-tree outputs from per-crown-area rates
fn crown_area_fluxes(crown: &CrownFlux, cohort: &Cohort, step_seconds: f64) -> CohortFluxes {
    let crown_seconds = cohort.crown_area * step_seconds;
    let lai = cohort.lai();
    let (an_op, an_cl) = if lai > 0.0 {
        (
            (crown.gross_assimilation - crown.respiration) / lai,
            crown.respiration / lai,
        )
    } else {
        (0.0, 0.0)
    };
    CohortFluxes {
        an_op,
        an_cl,
        gpp: crown.gross_assimilation * MOL_C * crown_seconds,
        resl: crown.respiration * MOL_C * crown_seconds,
        transp: 0.0,
        w_scale: W_SCALE_NOT_APPLICABLE,
    }
}
