//! Acclimated-Optimality Photosynthesis (P-model adapter)
//!
//! Photosynthetic capacity is assumed to be acclimated to the smoothed
//! environment held in [`crate::physics::acclimation`]. The least-cost
//! solver returns a light-use efficiency and Vcmax25 for the light reaching a
//! cohort's layer; this module scales them to the cohort's crown.
//!
//! Per unit crown area:
//!
//! ```text
//! A_g = LUE × PPFD_layer × fAPAR_crown × β(θ)
//! R_d = (Rd/Vcmax25) × Vcmax25 × f_rd(T) × fAPAR_crown
//! ```
//!
//! The respiration temperature response `f_rd` uses the instantaneous air
//! temperature, not the smoothed one.
//!
//! # Scientific References
//! - Wang, H., et al. (2017). "Towards a universal model for carbon dioxide
//!   uptake by plants." Nature Plants, 3, 734-741
//! - Stocker, B.D., et al. (2020). Geoscientific Model Development, 13, 1545-1581
//! - Heskel, M.A., et al. (2016). "Convergence in the temperature response of
//!   leaf respiration across biomes and plant functional types."
//!   PNAS, 113(14), 3832-3837

use crate::core_types::cohort::PhotosynthesisPathway;
use crate::core_types::params::ModelParams;
use crate::core_types::species::SpeciesParams;
use crate::core_types::units::{Celsius, Fraction};
use crate::physics::acclimation::EnvironmentMemory;
use crate::solver::optimality::{CiMethod, JmaxLimitation, OptimalityInput, OptimalitySolver};

/// Smoothed temperature at or below which no assimilation occurs (°C)
pub const MIN_ACCLIMATED_TEMPERATURE: Celsius = Celsius::new(-5.0);

/// Relative soil moisture above which there is no water stress
const SOILM_THETA_STAR: f64 = 0.6;

/// µmol to mol
const MICRO: f64 = 1.0e-6;

/// Crown-level fluxes, per unit crown area
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CrownFlux {
    /// Gross assimilation (mol C m⁻² crown s⁻¹)
    pub gross_assimilation: f64,
    /// Leaf dark respiration (mol C m⁻² crown s⁻¹)
    pub respiration: f64,
}

/// Instantaneous temperature response of dark respiration, Heskel et al. (2016)
///
/// f = exp(0.1012 (T − 25) − 0.0005 (T² − 25²)), equal to 1 at 25°C
pub fn calculate_ftemp_inst_rd(temperature: Celsius) -> f64 {
    const APAR: f64 = 0.1012;
    const BPAR: f64 = 0.0005;
    let tc = *temperature;
    (APAR * (tc - 25.0) - BPAR * (tc * tc - 25.0 * 25.0)).exp()
}

/// Empirical soil-moisture stress on light-use efficiency, Stocker et al. (2020)
///
/// Quadratic decline below θ* = 0.6, reaching `a + b` at zero soil moisture.
///
/// # Arguments
/// * `soil_moisture` - Relative soil moisture (fraction of field capacity)
/// * `par_a` - Intercept coefficient
/// * `par_b` - Slope coefficient (times mean aridity, taken as 1)
///
/// # Returns
/// Stress factor in [0, 1]
pub fn calculate_soilmstress(soil_moisture: Fraction, par_a: f64, par_b: f64) -> f64 {
    let theta = *soil_moisture;
    if theta > SOILM_THETA_STAR {
        return 1.0;
    }
    let y0 = par_a + par_b;
    let curvature = (1.0 - y0) / (SOILM_THETA_STAR * SOILM_THETA_STAR);
    (1.0 - curvature * (theta - SOILM_THETA_STAR).powi(2)).clamp(0.0, 1.0)
}

/// Everything the adapter needs about one cohort this timestep
#[derive(Debug, Clone, Copy)]
pub struct AcclimatedEnvironment<'a> {
    /// Smoothed drivers
    pub memory: &'a EnvironmentMemory,
    /// Instantaneous air temperature (for respiration)
    pub air_temperature: Celsius,
    /// PAR at the top of the canopy (µmol m⁻² s⁻¹)
    pub par: f64,
    /// Fraction of top-of-canopy light reaching the cohort's layer
    pub light_fraction: f64,
    /// Fraction of that light absorbed by the cohort's crown
    pub crown_fapar: f64,
    /// Relative soil moisture, if supplied
    pub soil_moisture: Option<Fraction>,
    /// Species parameters
    pub species: &'a SpeciesParams,
    /// Photosynthetic pathway
    pub pathway: PhotosynthesisPathway,
}

/// Crown fluxes from the optimality solver
///
/// Returns `None` when the cohort cannot assimilate this step: no light at the
/// top of the canopy, or a smoothed temperature at or below −5°C.
pub fn calculate_acclimated_flux(
    solver: &dyn OptimalitySolver,
    params: &ModelParams,
    ci_method: CiMethod,
    jmax_limitation: JmaxLimitation,
    env: &AcclimatedEnvironment<'_>,
) -> Option<CrownFlux> {
    if env.par <= 0.0 || env.memory.temperature <= MIN_ACCLIMATED_TEMPERATURE {
        return None;
    }

    let ppfd = env.light_fraction * env.par * MICRO;
    let acclimated = solver.solve(&OptimalityInput {
        kphio: env.species.kphio,
        beta: params.beta,
        ppfd,
        co2_ppm: env.memory.co2_ppm,
        temperature: env.memory.temperature,
        vpd: env.memory.vpd,
        pressure: env.memory.pressure,
        c4: env.pathway == PhotosynthesisPathway::C4,
        ci_method,
        jmax_limitation,
    });

    let stress = env.soil_moisture.map_or(1.0, |theta| {
        calculate_soilmstress(theta, params.soilm_par_a, params.soilm_par_b)
    });

    Some(CrownFlux {
        gross_assimilation: acclimated.lue * ppfd * env.crown_fapar * stress,
        respiration: params.rd_to_vcmax
            * acclimated.vcmax25
            * calculate_ftemp_inst_rd(env.air_temperature)
            * env.crown_fapar,
    })
}
