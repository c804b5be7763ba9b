//! Photosynthesis closure selection
//!
//! This module provides the run-wide switch between the two leaf-level
//! closures. The core abstraction is the `PhotosynthesisClosure` trait, with
//! one implementation per scheme.
//!
//! # Backend Selection
//!
//! The scheme is fixed for the whole run:
//! 1. `gs_leuning`: conductance-limited closure, no external dependencies
//! 2. `pmodel`: acclimated-optimality closure, requires a host-supplied
//!    [`OptimalitySolver`]
//!
//! # Example
//!
//! ```rust,ignore
//! use canopy_flux_core::solver::{create_closure, PhotosynthesisScheme};
//! use canopy_flux_core::{ModelParams, SimulationConfig};
//!
//! let params = ModelParams::default().load()?;
//! let config = SimulationConfig::hourly(PhotosynthesisScheme::ConductanceLimited);
//! let closure = create_closure(&config, &params, None)?;
//! ```

mod leuning;
pub mod optimality;
mod pmodel;
mod scheme;
#[allow(clippy::module_name_repetitions)]
mod r#trait;

// Re-exports
pub use leuning::LeuningClosure;
pub use optimality::{CiMethod, JmaxLimitation, OptimalityInput, OptimalityOutput, OptimalitySolver};
pub use pmodel::PModelClosure;
pub use r#trait::{ClosureFlux, CohortContext, PhotosynthesisClosure};
pub use scheme::PhotosynthesisScheme;

use crate::core_types::params::ModelParams;
use crate::error::ConfigError;
use crate::simulation::SimulationConfig;
use tracing::{info, warn};

/// Create the closure for a run
///
/// # Arguments
///
/// * `config` - Run configuration: scheme, timestep and solver methods
/// * `params` - Validated model-wide parameters
/// * `solver` - Optimality solver; required for `pmodel`, ignored otherwise
///
/// # Returns
///
/// A boxed `PhotosynthesisClosure` for the selected scheme
///
/// # Errors
///
/// Returns `ConfigError::MissingOptimalitySolver` when `pmodel` is selected
/// without a solver
pub fn create_closure(
    config: &SimulationConfig,
    params: &ModelParams,
    solver: Option<Box<dyn OptimalitySolver>>,
) -> Result<Box<dyn PhotosynthesisClosure>, ConfigError> {
    let scheme = config.scheme;
    match scheme {
        PhotosynthesisScheme::ConductanceLimited => {
            if solver.is_some() {
                warn!("Optimality solver supplied but scheme is {}, ignoring it", scheme);
            }
            info!("Using conductance-limited closure ({})", scheme);
            Ok(Box::new(LeuningClosure::new()))
        }
        PhotosynthesisScheme::AcclimatedOptimality => {
            let solver = solver.ok_or(ConfigError::MissingOptimalitySolver)?;
            let closure = PModelClosure::new(solver, params.clone(), config.step_seconds)
                .with_methods(config.ci_method, config.jmax_limitation);
            info!(
                "Using acclimated-optimality closure ({}), tau = {:.1} steps, ci {}, jmax {}",
                scheme,
                closure.tau_steps(),
                config.ci_method.as_str(),
                config.jmax_limitation.as_str()
            );
            Ok(Box::new(closure))
        }
    }
}
