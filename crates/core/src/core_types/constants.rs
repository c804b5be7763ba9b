//! Physical constants shared by the light partitioning and both closures

/// Freezing point of water (K)
pub const TFREEZE: f64 = 273.16;

/// Universal gas constant (J mol⁻¹ K⁻¹)
pub const RGAS: f64 = 8.314;

/// Molar mass of water (kg mol⁻¹)
pub const MOL_H2O: f64 = 18.0e-3;

/// Molar mass of dry air (kg mol⁻¹)
pub const MOL_AIR: f64 = 28.96440e-3;

/// Molar mass of carbon (kg mol⁻¹)
pub const MOL_C: f64 = 12.0e-3;

/// Seconds per day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Seconds per year (365.25 days)
pub const SECONDS_PER_YEAR: f64 = 365.25 * SECONDS_PER_DAY;

/// Sentinel written to the water-stress diagnostic when no stomatal water
/// limitation applies (leafless cohorts, optimality closure)
pub const W_SCALE_NOT_APPLICABLE: f64 = -9999.0;
