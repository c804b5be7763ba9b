//! Interface to the least-cost optimality solver
//!
//! The optimal-ci / Jmax-limitation solution is provided by the host model.
//! This crate only defines the call contract and consumes the result.

use crate::core_types::units::{Celsius, Pascals};
use serde::{Deserialize, Serialize};

/// Method for the optimal ci:ca ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CiMethod {
    /// Prentice et al. (2014) least-cost solution
    #[default]
    #[serde(rename = "prentice14")]
    Prentice14,
}

impl CiMethod {
    /// Name used by solver implementations
    pub const fn as_str(&self) -> &'static str {
        match self {
            CiMethod::Prentice14 => "prentice14",
        }
    }
}

/// Method for Jmax limitation of the light-limited rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JmaxLimitation {
    /// Wang et al. (2017)
    #[default]
    #[serde(rename = "wang17")]
    Wang17,
    /// Smith et al. (2019)
    #[serde(rename = "smith19")]
    Smith19,
    /// No Jmax limitation
    #[serde(rename = "none")]
    None,
}

impl JmaxLimitation {
    /// Name used by solver implementations
    pub const fn as_str(&self) -> &'static str {
        match self {
            JmaxLimitation::Wang17 => "wang17",
            JmaxLimitation::Smith19 => "smith19",
            JmaxLimitation::None => "none",
        }
    }
}

/// Drivers handed to the optimality solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimalityInput {
    /// Intrinsic quantum-yield efficiency
    pub kphio: f64,
    /// Unit cost ratio of carboxylation to transpiration
    pub beta: f64,
    /// Absorbed photosynthetic photon flux density (mol m⁻² s⁻¹)
    pub ppfd: f64,
    /// Smoothed ambient CO2 (ppm)
    pub co2_ppm: f64,
    /// Smoothed air temperature
    pub temperature: Celsius,
    /// Smoothed vapour-pressure deficit
    pub vpd: Pascals,
    /// Smoothed surface pressure
    pub pressure: Pascals,
    /// C4 photosynthesis
    pub c4: bool,
    /// Optimal-ci method
    pub ci_method: CiMethod,
    /// Jmax-limitation method
    pub jmax_limitation: JmaxLimitation,
}

/// Acclimated quantities returned by the solver
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OptimalityOutput {
    /// Light-use efficiency (mol C per mol absorbed photons)
    pub lue: f64,
    /// Maximum carboxylation capacity at 25°C for the given `ppfd` (mol m⁻² s⁻¹)
    pub vcmax25: f64,
}

/// Least-cost optimality solver
///
/// Implementations must be pure: the same input always yields the same output.
/// Non-convergence handling is the implementation's own concern.
pub trait OptimalitySolver: Send + Sync {
    /// Solve for light-use efficiency and acclimated Vcmax25
    fn solve(&self, input: &OptimalityInput) -> OptimalityOutput;
}

impl<F> OptimalitySolver for F
where
    F: Fn(&OptimalityInput) -> OptimalityOutput + Send + Sync,
{
    fn solve(&self, input: &OptimalityInput) -> OptimalityOutput {
        self(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names() {
        assert_eq!(CiMethod::Prentice14.as_str(), "prentice14");
        assert_eq!(JmaxLimitation::Wang17.as_str(), "wang17");
        assert_eq!(JmaxLimitation::default(), JmaxLimitation::Wang17);
    }

    #[test]
    fn test_closure_as_solver() {
        let solver = |input: &OptimalityInput| OptimalityOutput {
            lue: 0.05,
            vcmax25: input.ppfd * 0.02,
        };
        let input = OptimalityInput {
            kphio: 0.05,
            beta: 146.0,
            ppfd: 1.0e-3,
            co2_ppm: 400.0,
            temperature: Celsius::new(20.0),
            vpd: Pascals::new(1000.0),
            pressure: Pascals::SEA_LEVEL,
            c4: false,
            ci_method: CiMethod::Prentice14,
            jmax_limitation: JmaxLimitation::Wang17,
        };
        let out = solver.solve(&input);
        assert_eq!(out.lue, 0.05);
        assert_eq!(out.vcmax25, 2.0e-5);
    }
}
