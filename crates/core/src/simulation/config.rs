//! Run configuration for the canopy flux driver

use crate::error::{require_positive, ConfigError};
use crate::physics::light_partitioning::DEFAULT_MAX_LAYERS;
use crate::solver::{CiMethod, JmaxLimitation, PhotosynthesisScheme};
use serde::{Deserialize, Serialize};

/// Settings fixed for the whole run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Photosynthesis closure used for every cohort
    pub scheme: PhotosynthesisScheme,
    /// Timestep length (s)
    pub step_seconds: f64,
    /// Number of canopy layers
    pub max_layers: usize,
    /// Optimal-ci method handed to the optimality solver (`pmodel` only)
    pub ci_method: CiMethod,
    /// Jmax-limitation method handed to the optimality solver (`pmodel` only)
    pub jmax_limitation: JmaxLimitation,
    /// Replace closure GPP with a fixed light-use efficiency and zero
    /// respiration on active cohorts. Cohorts the closure left inactive
    /// (leafless, or a cold acclimated temperature under `pmodel`) keep zero
    /// outputs. Diagnostic only.
    pub debug_fixed_lue: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            scheme: PhotosynthesisScheme::default(),
            step_seconds: 3600.0,
            max_layers: DEFAULT_MAX_LAYERS,
            ci_method: CiMethod::default(),
            jmax_limitation: JmaxLimitation::default(),
            debug_fixed_lue: false,
        }
    }
}

impl SimulationConfig {
    /// Hourly configuration with the given scheme
    pub fn hourly(scheme: PhotosynthesisScheme) -> Self {
        SimulationConfig {
            scheme,
            ..Self::default()
        }
    }

    /// Daily configuration with the given scheme
    pub fn daily(scheme: PhotosynthesisScheme) -> Self {
        SimulationConfig {
            scheme,
            step_seconds: crate::core_types::constants::SECONDS_PER_DAY,
            ..Self::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidParameter`] for a non-positive timestep or
    /// zero layers
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("step_seconds", self.step_seconds)?;
        if self.max_layers == 0 {
            return Err(ConfigError::invalid(
                "max_layers",
                0.0,
                "at least one canopy layer is required",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.scheme, PhotosynthesisScheme::ConductanceLimited);
        assert_eq!(config.step_seconds, 3600.0);
        assert_eq!(config.max_layers, 9);
        assert!(!config.debug_fixed_lue);
        assert_eq!(config.ci_method, CiMethod::Prentice14);
        assert_eq!(config.jmax_limitation, JmaxLimitation::Wang17);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_solver_methods_serde_names() {
        let config = SimulationConfig {
            jmax_limitation: JmaxLimitation::Smith19,
            ..SimulationConfig::default()
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["ci_method"], "prentice14");
        assert_eq!(value["jmax_limitation"], "smith19");
    }

    #[test]
    fn test_daily_preset() {
        let config = SimulationConfig::daily(PhotosynthesisScheme::AcclimatedOptimality);
        assert_eq!(config.step_seconds, 86_400.0);
        assert_eq!(config.scheme, PhotosynthesisScheme::AcclimatedOptimality);
    }

    #[test]
    fn test_rejects_bad_values() {
        let zero_step = SimulationConfig {
            step_seconds: 0.0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            zero_step.validate(),
            Err(ConfigError::InvalidParameter { name: "step_seconds", .. })
        ));

        let no_layers = SimulationConfig {
            max_layers: 0,
            ..SimulationConfig::default()
        };
        assert!(no_layers.validate().is_err());
    }
}
