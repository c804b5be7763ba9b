//! Near-surface moisture relations
//!
//! # Scientific References
//! - Murray, F.W. (1967). "On the computation of saturation vapor pressure."
//!   Journal of Applied Meteorology, 6(1), 203-204
//! - Alduchov, O.A. and Eskridge, R.E. (1996). "Improved Magnus Form Approximation
//!   of Saturation Vapor Pressure." Journal of Applied Meteorology, 35(4), 601-609

use crate::core_types::constants::{MOL_AIR, MOL_H2O};
use crate::core_types::units::{Celsius, Fraction, Kelvin, Pascals};

// Magnus-Tetens constants over water
const MAGNUS_E0: f64 = 610.78; // Pa
const MAGNUS_A: f64 = 17.27;
const MAGNUS_B: f64 = 237.3; // °C

/// Saturation vapour pressure over water
///
/// e_s = 610.78 × exp(17.27 T / (T + 237.3)), T in °C
pub fn saturation_vapor_pressure(temperature: Celsius) -> Pascals {
    let t = *temperature;
    Pascals::new(MAGNUS_E0 * (MAGNUS_A * t / (t + MAGNUS_B)).exp())
}

/// Saturated specific humidity (kg/kg) at a given temperature and pressure
///
/// q_s = 0.622 e / (p − 0.378 e), with e capped at the surface pressure so
/// the denominator stays positive at extreme temperatures.
pub fn saturated_specific_humidity(temperature: Kelvin, pressure: Pascals) -> f64 {
    let esat = saturation_vapor_pressure(temperature.to_celsius()).min(pressure);
    0.622 * *esat / (*pressure - 0.378 * *esat)
}

/// Specific humidity (kg/kg) from relative humidity
pub fn specific_humidity_from_relative(
    temperature: Celsius,
    relative_humidity: Fraction,
    pressure: Pascals,
) -> f64 {
    let esat = saturation_vapor_pressure(temperature);
    *esat * *relative_humidity * MOL_H2O / (*pressure * MOL_AIR)
}
