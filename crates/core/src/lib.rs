//! Canopy Flux Core Library
//!
//! Per-timestep canopy carbon and water fluxes for a cohort-based vegetation
//! model. Given one timestep of atmospheric forcing and the current structure
//! of every cohort, computes gross photosynthesis, leaf respiration,
//! transpiration and a stomatal water-stress diagnostic for each cohort.
//!
//! ## Stages
//!
//! - Light partitioning across canopy layers and individual crowns
//! - One of two run-wide photosynthesis closures:
//!   - conductance-limited leaf gas exchange with soil-water limitation
//!     (`gs_leuning`)
//!   - acclimated optimality with a smoothed environmental memory (`pmodel`)
//! - Conversion to whole-tree, per-timestep carbon and water units

// Core types and utilities
pub mod core_types;
pub mod error;

// Flux physics and closure selection
pub mod physics;
pub mod solver;

// Per-timestep driver
pub mod simulation;

// Re-export core types
pub use core_types::{
    Celsius, Cohort, CohortFluxes, CohortStatus, Forcing, Fraction, Humidity, Kelvin,
    ModelParams, Pascals, PhotosynthesisPathway, SpeciesParams, SpeciesTable,
};
pub use error::ConfigError;

// Re-export driver and closure types
pub use physics::{EnvironmentMemory, LightPartition};
pub use simulation::{CanopyFluxDriver, SimulationConfig};
pub use solver::{
    CiMethod, JmaxLimitation, OptimalityInput, OptimalityOutput, OptimalitySolver,
    PhotosynthesisScheme,
};
