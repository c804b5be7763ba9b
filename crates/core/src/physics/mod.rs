//! Physics modules for canopy carbon and water fluxes

pub mod acclimation;
pub(crate) mod atmosphere;
pub mod leuning;
pub mod light_partitioning;
pub mod pmodel;

pub use acclimation::{dampen_variability, AcclimationState, EnvironmentMemory};
pub use leuning::{calculate_leaf_gas_exchange, LeafEnvironment, LeafGasExchange};
pub use light_partitioning::{
    calculate_crown_fapar, partition_light, LightPartition, DEFAULT_MAX_LAYERS,
};
pub use pmodel::{
    calculate_acclimated_flux, calculate_ftemp_inst_rd, calculate_soilmstress,
    AcclimatedEnvironment, CrownFlux,
};

// ============================================================================
// PUBLIC RE-EXPORTS FOR VALIDATION TESTING
// ============================================================================

/// Public re-exports of the moisture relations for validation tests
pub mod atmosphere_validation {
    pub use super::atmosphere::{
        saturated_specific_humidity, saturation_vapor_pressure, specific_humidity_from_relative,
    };
}
