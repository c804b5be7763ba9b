//! Semantic unit types for type-safe physical quantity handling
//!
//! Newtype wrappers for the handful of quantities where mixing scales is an
//! easy mistake in leaf gas-exchange code: Celsius vs Kelvin (the kinetics are
//! referenced to 298.2 K while the acclimation memory is kept in °C), surface
//! pressure in Pa, and dimensionless fractions.
//!
//! # Design Philosophy
//! - All types use f64; the closures chain several exponentials and ratios
//! - Total ordering via Ord trait (NaN handled as greater than all values)
//! - Explicit conversion methods between related types
//! - Serde support for serialization
//!
//! # Usage
//! ```
//! use canopy_flux_core::core_types::units::{Celsius, Kelvin};
//!
//! let temp = Celsius::new(25.0);
//! let kelvin: Kelvin = temp.into();
//! assert!((*kelvin - 298.15).abs() < 0.01);
//!
//! let t1 = Celsius::new(10.0);
//! let t2 = Celsius::new(20.0);
//! assert_eq!(t1.min(t2), Celsius::new(10.0));
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Deref, Mul, Sub};

/// Compare f64 values with total ordering using Rust's built-in `total_cmp`
#[inline]
fn f64_total_cmp(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

// ============================================================================
// TEMPERATURE TYPES
// ============================================================================

/// Temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Celsius(f64);

impl Eq for Celsius {}

impl PartialOrd for Celsius {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Celsius {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Celsius {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Celsius {
    /// Celsius to Kelvin conversion offset (0°C = 273.15 K)
    const CELSIUS_KELVIN_OFFSET: f64 = 273.15;

    /// Water freezing point
    pub const FREEZING: Celsius = Celsius(0.0);

    /// Create a new Celsius temperature. Asserts value >= absolute zero (-273.15°C).
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(
            value >= -Self::CELSIUS_KELVIN_OFFSET,
            "Celsius::new: value is below absolute zero (-273.15°C)"
        );
        Celsius(value)
    }

    /// Convert to Kelvin
    #[inline]
    #[must_use]
    pub fn to_kelvin(self) -> Kelvin {
        Kelvin(self.0 + Self::CELSIUS_KELVIN_OFFSET)
    }
}

impl From<Celsius> for Kelvin {
    fn from(c: Celsius) -> Kelvin {
        c.to_kelvin()
    }
}

impl From<f64> for Celsius {
    fn from(v: f64) -> Self {
        Celsius::new(v)
    }
}

impl From<Celsius> for f64 {
    fn from(c: Celsius) -> f64 {
        c.0
    }
}

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}°C", self.0)
    }
}

/// Temperature in Kelvin (absolute scale)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kelvin(f64);

impl Eq for Kelvin {}

impl PartialOrd for Kelvin {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Kelvin {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Kelvin {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Kelvin {
    /// Create a new Kelvin temperature. Asserts value >= absolute zero (0 K).
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(
            value >= 0.0,
            "Kelvin::new: value is below absolute zero (0 K)"
        );
        Kelvin(value)
    }

    /// Convert to Celsius
    #[inline]
    #[must_use]
    pub fn to_celsius(self) -> Celsius {
        Celsius::new(self.0 - Celsius::CELSIUS_KELVIN_OFFSET)
    }
}

impl From<Kelvin> for Celsius {
    fn from(k: Kelvin) -> Celsius {
        k.to_celsius()
    }
}

impl From<f64> for Kelvin {
    fn from(v: f64) -> Self {
        Kelvin::new(v)
    }
}

impl From<Kelvin> for f64 {
    fn from(k: Kelvin) -> f64 {
        k.0
    }
}

impl fmt::Display for Kelvin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} K", self.0)
    }
}

// ============================================================================
// PRESSURE
// ============================================================================

/// Pressure in Pascals (surface pressure, vapour pressure, VPD)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Pascals(f64);

impl Eq for Pascals {}

impl PartialOrd for Pascals {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pascals {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Pascals {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Pascals {
    /// Standard sea-level pressure
    pub const SEA_LEVEL: Pascals = Pascals(1.0e5);

    /// Create a new pressure value
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Pascals(value)
    }

    /// Convert to kilopascals
    #[inline]
    #[must_use]
    pub fn to_kpa(self) -> f64 {
        self.0 / 1000.0
    }
}

impl From<f64> for Pascals {
    fn from(v: f64) -> Self {
        Pascals(v)
    }
}

impl From<Pascals> for f64 {
    fn from(p: Pascals) -> f64 {
        p.0
    }
}

impl Add for Pascals {
    type Output = Pascals;
    fn add(self, rhs: Pascals) -> Pascals {
        Pascals(self.0 + rhs.0)
    }
}

impl Sub for Pascals {
    type Output = Pascals;
    fn sub(self, rhs: Pascals) -> Pascals {
        Pascals(self.0 - rhs.0)
    }
}

impl Mul<f64> for Pascals {
    type Output = Pascals;
    fn mul(self, rhs: f64) -> Pascals {
        Pascals(self.0 * rhs)
    }
}

impl fmt::Display for Pascals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} Pa", self.0)
    }
}

// ============================================================================
// DIMENSIONLESS
// ============================================================================

/// Dimensionless fraction, nominally in [0, 1]
///
/// Not clamped on construction; use [`Fraction::clamped`] where the caller
/// needs the physical range enforced.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Fraction(f64);

impl Eq for Fraction {}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Fraction {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Fraction {
    /// Zero
    pub const ZERO: Fraction = Fraction(0.0);
    /// One
    pub const ONE: Fraction = Fraction(1.0);

    /// Create a new fraction
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Fraction(value)
    }

    /// Create a fraction clamped into [0, 1]
    #[inline]
    #[must_use]
    pub fn clamped(value: f64) -> Self {
        Fraction(value.clamp(0.0, 1.0))
    }

    /// Complement (1 - f)
    #[inline]
    #[must_use]
    pub fn complement(self) -> Self {
        Fraction(1.0 - self.0)
    }
}

impl From<f64> for Fraction {
    fn from(v: f64) -> Self {
        Fraction(v)
    }
}

impl From<Fraction> for f64 {
    fn from(f: Fraction) -> f64 {
        f.0
    }
}

impl Mul for Fraction {
    type Output = Fraction;
    fn mul(self, rhs: Fraction) -> Fraction {
        Fraction(self.0 * rhs.0)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_celsius_kelvin_round_trip() {
        let c = Celsius::new(20.0);
        let k = c.to_kelvin();
        assert_relative_eq!(*k, 293.15, epsilon = 1e-12);
        assert_relative_eq!(*k.to_celsius(), 20.0, epsilon = 1e-12);
    }

    #[test]
    #[should_panic(expected = "below absolute zero")]
    fn test_celsius_below_absolute_zero_panics() {
        let _ = Celsius::new(-300.0);
    }

    #[test]
    fn test_fraction_clamped_and_complement() {
        assert_eq!(Fraction::clamped(1.4), Fraction::ONE);
        assert_eq!(Fraction::clamped(-0.2), Fraction::ZERO);
        assert_relative_eq!(*Fraction::new(0.3).complement(), 0.7, epsilon = 1e-12);
    }

    #[test]
    fn test_pressure_ordering() {
        let low = Pascals::new(80_000.0);
        assert!(low < Pascals::SEA_LEVEL);
        assert_relative_eq!(Pascals::SEA_LEVEL.to_kpa(), 100.0);
    }
}
