//! Model-wide parameters
//!
//! Loaded once before the first timestep and held read-only by the driver for
//! the rest of the run.

use crate::error::{require_non_negative, require_positive, ConfigError};
use serde::{Deserialize, Serialize};

/// Global coefficients shared by every cohort and species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    /// Unit cost ratio of carboxylation to transpiration (β, dimensionless)
    pub beta: f64,
    /// Ratio of dark respiration to Vcmax25
    pub rd_to_vcmax: f64,
    /// Acclimation time constant of the environmental memory (days)
    pub tau_acclim_days: f64,
    /// Soil-moisture stress intercept
    pub soilm_par_a: f64,
    /// Soil-moisture stress slope
    pub soilm_par_b: f64,
    /// Extinction coefficient used to partition light between layers
    pub kappa_light: f64,
    /// Fraction of ground not covered by crowns within a layer
    pub gap_fraction: f64,
}

impl Default for ModelParams {
    fn default() -> Self {
        ModelParams {
            beta: 146.0,
            rd_to_vcmax: 0.014,
            tau_acclim_days: 30.0,
            soilm_par_a: 0.0,
            soilm_par_b: 0.685,
            kappa_light: 0.5,
            gap_fraction: 0.1,
        }
    }
}

impl ModelParams {
    /// Validate and freeze the parameter set for a run
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidParameter`] for the first field out of range
    pub fn load(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }

    /// Validate physical ranges
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidParameter`] for the first field out of range
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("beta", self.beta)?;
        require_non_negative("rd_to_vcmax", self.rd_to_vcmax)?;
        require_positive("tau_acclim_days", self.tau_acclim_days)?;
        if !self.soilm_par_a.is_finite() {
            return Err(ConfigError::invalid(
                "soilm_par_a",
                self.soilm_par_a,
                "must be finite",
            ));
        }
        if !self.soilm_par_b.is_finite() {
            return Err(ConfigError::invalid(
                "soilm_par_b",
                self.soilm_par_b,
                "must be finite",
            ));
        }
        require_positive("kappa_light", self.kappa_light)?;
        if !(0.0..1.0).contains(&self.gap_fraction) {
            return Err(ConfigError::invalid(
                "gap_fraction",
                self.gap_fraction,
                "must lie in [0, 1)",
            ));
        }
        Ok(())
    }

    /// Acclimation time constant expressed in timesteps
    pub fn tau_acclim_steps(&self, step_seconds: f64) -> f64 {
        self.tau_acclim_days * crate::core_types::constants::SECONDS_PER_DAY / step_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_load() {
        assert!(ModelParams::default().load().is_ok());
    }

    #[test]
    fn test_gap_fraction_must_leave_cover() {
        let params = ModelParams {
            gap_fraction: 1.0,
            ..ModelParams::default()
        };
        assert!(matches!(
            params.load(),
            Err(ConfigError::InvalidParameter {
                name: "gap_fraction",
                ..
            })
        ));
    }

    #[test]
    fn test_tau_in_steps() {
        let params = ModelParams::default();
        assert_relative_eq!(params.tau_acclim_steps(86_400.0), 30.0);
        assert_relative_eq!(params.tau_acclim_steps(3_600.0), 720.0);
    }
}
