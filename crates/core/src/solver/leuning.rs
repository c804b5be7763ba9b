//! Conductance-limited closure backend

use crate::core_types::constants::MOL_H2O;
use crate::core_types::forcing::Forcing;
use crate::core_types::units::Kelvin;
use crate::physics::leuning::{calculate_leaf_gas_exchange, LeafEnvironment};
use crate::solver::r#trait::{ClosureFlux, CohortContext, PhotosynthesisClosure};
use crate::solver::scheme::PhotosynthesisScheme;

/// Share of incoming shortwave absorbed as net radiation by the canopy
const NET_RADIATION_FRACTION: f64 = 0.9;

/// Leuning leaf gas exchange applied cohort by cohort
///
/// Stateless: every timestep depends only on the current forcing and the
/// soil water supply the host computed for each cohort.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeuningClosure;

impl LeuningClosure {
    /// Create the closure
    pub fn new() -> Self {
        LeuningClosure
    }
}

/// Convert a cohort's water supply from kg H2O tree⁻¹ step⁻¹ to
/// mol H2O m⁻² leaf s⁻¹
pub(crate) fn water_supply_per_leaf_area(supply: f64, leaf_area: f64, step_seconds: f64) -> f64 {
    supply / (leaf_area * step_seconds * MOL_H2O)
}

impl PhotosynthesisClosure for LeuningClosure {
    fn scheme(&self) -> PhotosynthesisScheme {
        PhotosynthesisScheme::ConductanceLimited
    }

    fn begin_timestep(&mut self, _forcing: &Forcing, _first_step: bool) {}

    fn cohort_flux(&self, ctx: &CohortContext<'_>) -> ClosureFlux {
        let cohort = ctx.cohort;
        let rad_top = ctx.light_fraction * ctx.forcing.radiation;
        let leaf_temperature: Kelvin = ctx.forcing.air_temperature;

        let exchange = calculate_leaf_gas_exchange(&LeafEnvironment {
            rad_top,
            rad_net: NET_RADIATION_FRACTION * rad_top,
            leaf_temperature,
            canopy_humidity: ctx.canopy_humidity,
            lai: cohort.lai(),
            pressure: ctx.forcing.pressure,
            water_supply: water_supply_per_leaf_area(
                cohort.water_supply,
                cohort.leaf_area,
                ctx.step_seconds,
            ),
            species: ctx.species,
            pathway: cohort.pathway,
            co2: ctx.forcing.co2,
            kappa: ctx.species.extinct,
            leaf_wet: cohort.wet_fraction,
        });

        ClosureFlux::PerLeafArea(exchange)
    }
}
