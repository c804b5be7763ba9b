//! Core types and utilities

pub mod cohort;
pub mod constants;
pub mod forcing;
pub mod params;
pub mod species;
pub mod units;

pub use cohort::{Cohort, CohortFluxes, CohortStatus, PhotosynthesisPathway};
pub use constants::*;
pub use forcing::{Forcing, Humidity};
pub use params::ModelParams;
pub use species::{SpeciesParams, SpeciesTable};
pub use units::*;
