//! Configuration errors
//!
//! The numerical core is infallible once configured. Everything that can be
//! wrong with a run (an unknown closure name, a non-physical coefficient, a
//! missing collaborator) is rejected here, before the first timestep.

/// Errors raised while loading parameters or building the flux driver
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The photosynthesis switch named neither supported closure
    UnknownScheme(String),
    /// A parameter is non-finite or outside its physical range
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
        /// Constraint that was violated
        reason: &'static str,
    },
    /// The optimality closure was selected without an optimality solver
    MissingOptimalitySolver,
    /// No species were supplied
    EmptySpeciesTable,
}

impl ConfigError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        ConfigError::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::UnknownScheme(name) => write!(
                f,
                "Unknown photosynthesis scheme '{name}' (expected 'gs_leuning' or 'pmodel')"
            ),
            ConfigError::InvalidParameter {
                name,
                value,
                reason,
            } => write!(f, "Invalid parameter {name} = {value}: {reason}"),
            ConfigError::MissingOptimalitySolver => {
                write!(f, "The pmodel scheme requires an optimality solver")
            }
            ConfigError::EmptySpeciesTable => write!(f, "Species table is empty"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Check that a parameter is finite and strictly positive
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(name, value, "must be finite and > 0"))
    }
}

/// Check that a parameter is finite and non-negative
pub(crate) fn require_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(name, value, "must be finite and >= 0"))
    }
}

/// Check that a parameter is a fraction in [0, 1]
pub(crate) fn require_fraction(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(name, value, "must lie in [0, 1]"))
    }
}
