//! One timestep of atmospheric forcing

use crate::core_types::units::{Celsius, Fraction, Kelvin, Pascals};
use crate::physics::atmosphere::specific_humidity_from_relative;
use serde::{Deserialize, Serialize};

/// Humidity as supplied by the forcing dataset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Humidity {
    /// Relative humidity (fraction 0-1)
    Relative(Fraction),
    /// Specific humidity (kg/kg)
    Specific(f64),
}

/// Atmospheric forcing for a single timestep
///
/// Immutable input to [`crate::simulation::CanopyFluxDriver::step`]. Supplied
/// once per timestep and shared by every cohort.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Forcing {
    /// Downward shortwave radiation at the top of the canopy (W/m²)
    pub radiation: f64,
    /// Photosynthetically active radiation at the top of the canopy (µmol m⁻² s⁻¹)
    pub par: f64,
    /// Air temperature, also used as leaf temperature
    pub air_temperature: Kelvin,
    /// Canopy-air humidity
    pub humidity: Humidity,
    /// Surface pressure
    pub pressure: Pascals,
    /// Ambient CO2 mole fraction (mol CO2 / mol dry air)
    pub co2: f64,
    /// Vapour-pressure deficit
    pub vpd: Pascals,
    /// Relative soil moisture (fraction of field capacity), when the host
    /// model provides it. Only the optimality closure reads this.
    #[serde(default)]
    pub soil_moisture: Option<Fraction>,
}

impl Forcing {
    /// Air temperature in °C
    #[inline]
    pub fn air_temperature_celsius(&self) -> Celsius {
        self.air_temperature.to_celsius()
    }

    /// Ambient CO2 in ppm
    #[inline]
    pub fn co2_ppm(&self) -> f64 {
        self.co2 * 1.0e6
    }

    /// Specific humidity of the canopy air (kg/kg)
    ///
    /// Converted from relative humidity when the dataset carries RH.
    pub fn specific_humidity(&self) -> f64 {
        match self.humidity {
            Humidity::Specific(q) => q,
            Humidity::Relative(rh) => specific_humidity_from_relative(
                self.air_temperature_celsius(),
                rh,
                self.pressure,
            ),
        }
    }
}

impl Default for Forcing {
    /// Mild, moist midday conditions at sea level
    fn default() -> Self {
        Forcing {
            radiation: 500.0,
            par: 1000.0,
            air_temperature: Kelvin::new(293.15),
            humidity: Humidity::Relative(Fraction::new(0.7)),
            pressure: Pascals::SEA_LEVEL,
            co2: 400.0e-6,
            vpd: Pascals::new(700.0),
            soil_moisture: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_specific_humidity_passthrough() {
        let forcing = Forcing {
            humidity: Humidity::Specific(0.008),
            ..Forcing::default()
        };
        assert_relative_eq!(forcing.specific_humidity(), 0.008);
    }

    #[test]
    fn test_relative_humidity_converted() {
        let forcing = Forcing::default();
        let q = forcing.specific_humidity();
        // 70% RH at 20°C and 1000 hPa is roughly 10 g/kg
        assert!(q > 0.008 && q < 0.012, "q = {q}");
    }

    #[test]
    fn test_co2_ppm() {
        assert_relative_eq!(Forcing::default().co2_ppm(), 400.0, epsilon = 1e-9);
    }
}
