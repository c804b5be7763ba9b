//! Environmental memory for acclimated photosynthetic capacity
//!
//! Photosynthetic capacity acclimates to its environment over weeks, not
//! hours. The optimality closure is therefore driven by exponentially smoothed
//! CO2, temperature, VPD and pressure rather than the instantaneous forcing.
//!
//! First-order relaxation per timestep:
//!
//! ```text
//! M(t+1) = M(t) + (X(t) − M(t)) × (1 − exp(−1/τ))
//! ```
//!
//! with τ in timesteps. For a constant driver the memory approaches `X`
//! monotonically and never overshoots; once equal to `X` it stays there.
//!
//! # References
//! - Stocker, B.D., et al. (2020). "P-model v1.0: an optimality-based light use
//!   efficiency model for simulating ecosystem gross primary production."
//!   Geoscientific Model Development, 13, 1545-1581

use crate::core_types::forcing::Forcing;
use crate::core_types::units::{Celsius, Pascals};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Relax a memory value toward the current driver
///
/// # Arguments
/// * `current` - Current (instantaneous) value of the driver
/// * `tau` - Relaxation time constant in timesteps
/// * `memory` - Previous memory value
///
/// # Returns
/// Updated memory value
pub fn dampen_variability(current: f64, tau: f64, memory: f64) -> f64 {
    if tau <= 0.0 {
        return current;
    }
    memory + (current - memory) * (1.0 - (-1.0 / tau).exp())
}

/// Smoothed drivers seen by the optimality closure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentMemory {
    /// Ambient CO2 (ppm)
    pub co2_ppm: f64,
    /// Air temperature
    pub temperature: Celsius,
    /// Vapour-pressure deficit
    pub vpd: Pascals,
    /// Surface pressure
    pub pressure: Pascals,
}

impl EnvironmentMemory {
    /// Memory equal to the raw forcing (no smoothing applied)
    pub fn from_forcing(forcing: &Forcing) -> Self {
        EnvironmentMemory {
            co2_ppm: forcing.co2_ppm(),
            temperature: forcing.air_temperature_celsius(),
            vpd: forcing.vpd,
            pressure: forcing.pressure,
        }
    }

    /// Relax every driver toward the current forcing
    pub fn relax_toward(&mut self, forcing: &Forcing, tau: f64) {
        self.co2_ppm = dampen_variability(forcing.co2_ppm(), tau, self.co2_ppm);
        self.temperature = Celsius::new(dampen_variability(
            *forcing.air_temperature_celsius(),
            tau,
            *self.temperature,
        ));
        self.vpd = Pascals::new(dampen_variability(*forcing.vpd, tau, *self.vpd));
        self.pressure = Pascals::new(dampen_variability(*forcing.pressure, tau, *self.pressure));
    }
}

/// Run-scoped acclimation state
///
/// Owned by the optimality closure rather than held in a process-wide static,
/// so independent runs (or sites) in one process keep separate memories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcclimationState {
    memory: Option<EnvironmentMemory>,
}

impl AcclimationState {
    /// Fresh, uninitialised state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current memory, if any timestep has been seen
    pub fn memory(&self) -> Option<&EnvironmentMemory> {
        self.memory.as_ref()
    }

    /// Advance the memory by one timestep
    ///
    /// On the first timestep of a run the memory is set to the raw forcing.
    /// A state that has never been initialised is treated the same way.
    ///
    /// # Arguments
    /// * `forcing` - This timestep's forcing
    /// * `tau` - Acclimation time constant in timesteps
    /// * `first_step` - Whether this is the first timestep of the run
    pub fn advance(&mut self, forcing: &Forcing, tau: f64, first_step: bool) -> EnvironmentMemory {
        let memory = match self.memory {
            Some(mut memory) if !first_step => {
                memory.relax_toward(forcing, tau);
                memory
            }
            _ => {
                let memory = EnvironmentMemory::from_forcing(forcing);
                info!(
                    "Initialising acclimation memory: CO2 {:.1} ppm, T {}, VPD {}, p {}",
                    memory.co2_ppm, memory.temperature, memory.vpd, memory.pressure
                );
                memory
            }
        };
        self.memory = Some(memory);
        debug!(
            "Acclimation memory: CO2 {:.2} ppm, T {}, VPD {}",
            memory.co2_ppm, memory.temperature, memory.vpd
        );
        memory
    }
}
