//! Conductance-Limited Leaf Photosynthesis (Leuning closure)
//!
//! Big-leaf-per-cohort gas exchange: Farquhar-type Rubisco and light limited
//! assimilation coupled to a Leuning/Ball-Berry conductance closure, with the
//! resulting transpiration capped by the soil water supply.
//!
//! Light attenuates exponentially with cumulative LAI inside a crown. Near the
//! top assimilation is Rubisco limited, deeper down it is light limited. The
//! depth where the two rates cross (`lai_eq`) is solved analytically, so the
//! crown integral is closed-form:
//!
//! ```text
//! A_g = A_rubisco × lai_eq
//!     + α × PAR_net × (e^(−κ·lai_eq) − e^(−κ·LAI)) / (1 − e^(−κ·LAI))
//! ```
//!
//! All outputs are per unit leaf area.
//!
//! # Scientific References
//! - Farquhar, G.D., von Caemmerer, S. and Berry, J.A. (1980). "A biochemical
//!   model of photosynthetic CO2 assimilation in leaves of C3 species."
//!   Planta, 149, 78-90
//! - Collatz, G.J., Ribas-Carbo, M. and Berry, J.A. (1992). "Coupled
//!   photosynthesis-stomatal conductance model for leaves of C4 plants."
//!   Australian Journal of Plant Physiology, 19, 519-538
//! - Leuning, R. (1995). Plant, Cell & Environment, 18, 339-355
//! - `McCree`, K.J. (1972). "Test of current definitions of photosynthetically
//!   active radiation against leaf photosynthesis data." Agricultural
//!   Meteorology, 10, 443-453

use crate::core_types::cohort::PhotosynthesisPathway;
use crate::core_types::constants::{MOL_AIR, MOL_H2O, RGAS, SECONDS_PER_YEAR, TFREEZE};
use crate::core_types::species::SpeciesParams;
use crate::core_types::units::{Fraction, Kelvin, Pascals};
use crate::physics::atmosphere::saturated_specific_humidity;

/// Shortwave energy to photosynthetic photon flux (mol quanta J⁻¹), `McCree` (1972)
pub const RAD_PHOT: f64 = 0.0000046;

/// Minimum stomatal conductance (mol m⁻² s⁻¹)
pub const GS_MIN: f64 = 0.01;

/// Physiological ceiling on stomatal conductance (mol m⁻² s⁻¹)
pub const GS_MAX: f64 = 0.25;

/// Light threshold below which no assimilation occurs (mol m⁻² s⁻¹)
const LIGHT_CRIT: f64 = 0.0;

/// Reference temperature of the kinetic constants (K)
const T_REF: f64 = 298.2;

/// Activation energies (J mol⁻¹)
const EA_KO: f64 = 35948.0;
const EA_KC: f64 = 59356.0;
const EA_VM: f64 = 24920.0;

/// Michaelis-Menten constants at 25°C and sea-level pressure (mol mol⁻¹)
const KO_25: f64 = 0.248;
const KC_25: f64 = 0.000404;

/// Atmospheric O2 mole fraction
const O2_FRACTION: f64 = 0.209;

/// CO2 sensitivity of the C4 capacity limit (PEP carboxylase)
const C4_CO2_SLOPE: f64 = 18000.0;

/// Inputs to one cohort's leaf gas-exchange calculation
#[derive(Debug, Clone, Copy)]
pub struct LeafEnvironment<'a> {
    /// Downward shortwave at the top of the cohort's layer (W/m²)
    pub rad_top: f64,
    /// Net shortwave absorbed at the top of the cohort's layer (W/m²)
    pub rad_net: f64,
    /// Leaf temperature
    pub leaf_temperature: Kelvin,
    /// Specific humidity of the canopy air (kg/kg)
    pub canopy_humidity: f64,
    /// Within-crown leaf area index
    pub lai: f64,
    /// Surface pressure
    pub pressure: Pascals,
    /// Water supply (mol H2O m⁻² leaf s⁻¹)
    pub water_supply: f64,
    /// Species parameters
    pub species: &'a SpeciesParams,
    /// Photosynthetic pathway
    pub pathway: PhotosynthesisPathway,
    /// Canopy-air CO2 (mol CO2 / mol dry air)
    pub co2: f64,
    /// Within-crown extinction coefficient
    pub kappa: f64,
    /// Wet or snow-covered fraction of the foliage
    pub leaf_wet: Fraction,
}

/// Leaf gas-exchange result, per unit leaf area
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LeafGasExchange {
    /// Net assimilation (mol C m⁻² s⁻¹)
    pub net_assimilation: f64,
    /// Dark respiration (mol C m⁻² s⁻¹, positive)
    pub respiration: f64,
    /// Water-stress diagnostic in [0, 1]
    pub w_scale: f64,
    /// Transpiration (mol H2O m⁻² s⁻¹)
    pub transpiration: f64,
    /// Stomatal conductance (m/s)
    pub conductance: f64,
}

/// Arrhenius scaling relative to 298.2 K
#[inline]
fn arrhenius(activation_energy: f64, leaf_temperature: f64) -> f64 {
    (activation_energy / RGAS * (1.0 / T_REF - 1.0 / leaf_temperature)).exp()
}

/// Logistic cold/heat shutoff shared by gross assimilation and respiration
///
/// Halves activity near 5°C and near 45°C.
#[inline]
pub fn temperature_envelope(leaf_temperature: Kelvin) -> f64 {
    let tl = *leaf_temperature;
    1.0 / ((1.0 + (0.4 * (5.0 - tl + TFREEZE)).exp()) * (1.0 + (0.4 * (tl - 45.0 - TFREEZE)).exp()))
}

/// Clamp conductance to `GS_MAX`, scaling positive assimilation down with it
#[inline]
fn cap_conductance(net_assimilation: f64, conductance: f64) -> (f64, f64) {
    if conductance <= GS_MAX {
        return (net_assimilation, conductance);
    }
    let scale = GS_MAX / conductance;
    if net_assimilation > 0.0 {
        (net_assimilation * scale, GS_MAX)
    } else {
        (net_assimilation, GS_MAX)
    }
}

/// Compute net photosynthesis, respiration, water stress and transpiration
///
/// Never fails: unsupported light or CO2 states fall back to zero gross
/// assimilation with net assimilation equal to minus respiration.
pub fn calculate_leaf_gas_exchange(env: &LeafEnvironment<'_>) -> LeafGasExchange {
    let sp = env.species;
    let lai = env.lai;
    if lai <= 0.0 {
        return LeafGasExchange {
            w_scale: 1.0,
            ..LeafGasExchange::default()
        };
    }

    let tl = *env.leaf_temperature;
    let p_surf = *env.pressure;
    let ca = env.co2;
    let kappa = env.kappa;
    let do1 = sp.humidity_deficit_scale;

    let light_top = env.rad_top * RAD_PHOT;
    let par_net = env.rad_net * RAD_PHOT;

    // Humidity deficit (kg/kg)
    let hl = saturated_specific_humidity(env.leaf_temperature, env.pressure);
    let ds = (hl - env.canopy_humidity).max(0.0);

    let pressure_scale = *Pascals::SEA_LEVEL / p_surf;
    let ko = KO_25 * arrhenius(EA_KO, tl) * pressure_scale;
    let kc = KC_25 * arrhenius(EA_KC, tl) * pressure_scale;
    let vm = sp.vmax * arrhenius(EA_VM, tl);
    // Farquhar & von Caemmerer (1982)
    let capgam = 0.5 * kc / ko * 0.21 * O2_FRACTION;

    let envelope = temperature_envelope(env.leaf_temperature);

    // Respiration of the whole crown column, from leaf nitrogen
    let resp = sp.gamma_ln / SECONDS_PER_YEAR * sp.lna * arrhenius(EA_VM, tl) * lai * envelope;

    let mut anbar = -resp / lai;
    let mut gsbar = GS_MIN;

    if light_top > LIGHT_CRIT {
        let coef0 = (1.0 + ds / do1) / sp.m_cond;
        let ci = (ca + 1.6 * coef0 * capgam) / (1.0 + 1.6 * coef0);

        if ci > capgam {
            let canopy_depth = 1.0 - (-lai * kappa).exp();
            let (dum2, lai_eq, light_efficiency) = match env.pathway {
                PhotosynthesisPathway::C4 => {
                    let f2 = vm;
                    let f3 = C4_CO2_SLOPE * vm * ci;
                    let dum2 = f2.min(f3);
                    let lai_eq = -(dum2 / (kappa * sp.alpha_phot * light_top)).ln() / kappa;
                    (dum2, lai_eq, sp.alpha_phot)
                }
                PhotosynthesisPathway::C3 => {
                    let coef1 = kc * (1.0 + O2_FRACTION / ko);
                    let f2 = vm * (ci - capgam) / (ci + coef1);
                    let f3 = vm / 2.0;
                    let dum2 = f2.min(f3);
                    let co2_efficiency = (ci - capgam) / (ci + 2.0 * capgam);
                    let lai_eq = -(dum2 / co2_efficiency / (sp.alpha_phot * light_top * kappa))
                        .ln()
                        / kappa;
                    (dum2, lai_eq, sp.alpha_phot * co2_efficiency)
                }
            };
            let lai_eq = lai_eq.clamp(0.0, lai);

            // Light-limited part below lai_eq, Rubisco-limited part above it
            let ag_l = light_efficiency * par_net * ((-lai_eq * kappa).exp() - (-lai * kappa).exp())
                / canopy_depth;
            let ag_rb = dum2 * lai_eq;

            let ag = (ag_l + ag_rb) * envelope;
            let an = ag - resp;
            anbar = an / lai;

            if anbar > 0.0 {
                gsbar = anbar / (ci - capgam) / coef0;
            }
        }
    }

    // Wet or snow-covered leaves
    let wet_factor = 1.0 - sp.wet_leaf_dreg * *env.leaf_wet;
    let an_w = if anbar > 0.0 { anbar * wet_factor } else { anbar };
    let (mut an_w, mut gs_w) = cap_conductance(an_w, gsbar * wet_factor);

    // Diagnostic demand; mol_air/mol_h2o converts the kg/kg deficit to mol/mol
    let demand = gs_w * ds * MOL_AIR / MOL_H2O;
    let ws = env.water_supply;
    if demand > ws {
        let w_scale = ws / demand;
        gs_w *= w_scale;
        if an_w > 0.0 {
            an_w *= w_scale;
        }
        if an_w < 0.0 && gs_w > GS_MIN {
            gs_w = GS_MIN;
        }
    }

    let w_scale = if demand > 0.0 {
        (ws / demand).min(1.0)
    } else {
        1.0
    };

    LeafGasExchange {
        net_assimilation: an_w,
        respiration: resp / lai,
        w_scale,
        transpiration: ws.min(demand),
        // Volume of a mole of gas at leaf temperature and surface pressure
        conductance: gs_w * RGAS * tl / p_surf,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::Celsius;
    use crate::physics::atmosphere::specific_humidity_from_relative;
    use approx::assert_relative_eq;

    fn env<'a>(species: &'a SpeciesParams, rad_top: f64, water_supply: f64) -> LeafEnvironment<'a> {
        LeafEnvironment {
            rad_top,
            rad_net: 0.9 * rad_top,
            leaf_temperature: Kelvin::new(293.15),
            canopy_humidity: specific_humidity_from_relative(
                Celsius::new(20.0),
                Fraction::new(0.7),
                Pascals::SEA_LEVEL,
            ),
            lai: 4.0,
            pressure: Pascals::SEA_LEVEL,
            water_supply,
            species,
            pathway: PhotosynthesisPathway::C3,
            co2: 400.0e-6,
            kappa: species.extinct,
            leaf_wet: Fraction::ZERO,
        }
    }

    #[test]
    fn test_envelope_shape() {
        let mild = temperature_envelope(Kelvin::new(293.16));
        assert!(mild > 0.99);
        // Half activity at the logistic midpoints
        let cold = temperature_envelope(Kelvin::new(TFREEZE + 5.0));
        assert_relative_eq!(cold, 0.5, epsilon = 1e-3);
        let hot = temperature_envelope(Kelvin::new(TFREEZE + 45.0));
        assert_relative_eq!(hot, 0.5, epsilon = 1e-3);
        assert!(temperature_envelope(Kelvin::new(250.0)) < 0.01);
    }

    #[test]
    fn test_dark_net_equals_minus_respiration() {
        let sp = SpeciesParams::temperate_deciduous();
        let out = calculate_leaf_gas_exchange(&env(&sp, 0.0, 1.0));
        assert!(out.respiration > 0.0);
        assert_eq!(out.net_assimilation, -out.respiration);
    }

    #[test]
    fn test_ample_water_unstressed() {
        let sp = SpeciesParams::temperate_deciduous();
        let out = calculate_leaf_gas_exchange(&env(&sp, 500.0, 1.0));
        assert!(out.net_assimilation > 0.0);
        assert!(out.conductance > 0.0);
        assert!(out.transpiration < 1.0);
        assert_eq!(out.w_scale, 1.0);
    }

    #[test]
    fn test_water_limited_transpiration_equals_supply() {
        let sp = SpeciesParams::temperate_deciduous();
        let unstressed = calculate_leaf_gas_exchange(&env(&sp, 500.0, 1.0));
        let demand = unstressed.transpiration;
        let supply = 0.4 * demand;

        let stressed = calculate_leaf_gas_exchange(&env(&sp, 500.0, supply));
        assert_eq!(stressed.transpiration, supply);
        assert_relative_eq!(stressed.w_scale, 0.4, epsilon = 1e-9);
        assert_relative_eq!(
            stressed.conductance,
            0.4 * unstressed.conductance,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            stressed.net_assimilation,
            0.4 * unstressed.net_assimilation,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_ci_below_compensation_point() {
        let sp = SpeciesParams::temperate_deciduous();
        let mut e = env(&sp, 500.0, 1.0);
        e.co2 = 1.0e-6;
        let out = calculate_leaf_gas_exchange(&e);
        assert_eq!(out.net_assimilation, -out.respiration);
    }

    #[test]
    fn test_c4_assimilates() {
        let sp = SpeciesParams::c4_grass();
        let mut e = env(&sp, 500.0, 1.0);
        e.pathway = PhotosynthesisPathway::C4;
        let out = calculate_leaf_gas_exchange(&e);
        assert!(out.net_assimilation > 0.0);
        assert!(out.transpiration <= e.water_supply);
    }

    #[test]
    fn test_wet_leaves_downregulated() {
        let sp = SpeciesParams::temperate_deciduous();
        let dry = calculate_leaf_gas_exchange(&env(&sp, 500.0, 1.0));
        let mut e = env(&sp, 500.0, 1.0);
        e.leaf_wet = Fraction::ONE;
        let wet = calculate_leaf_gas_exchange(&e);
        let wet_factor = 1.0 - sp.wet_leaf_dreg;
        assert!(wet_factor < 1.0);
        assert_relative_eq!(
            wet.net_assimilation,
            dry.net_assimilation * wet_factor,
            epsilon = 1e-15
        );
        assert_relative_eq!(
            wet.conductance,
            dry.conductance * wet_factor,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_conductance_cap_scales_positive_assimilation() {
        let (an, gs) = cap_conductance(6.0e-6, 2.0 * GS_MAX);
        assert_eq!(gs, GS_MAX);
        assert_relative_eq!(an, 3.0e-6, max_relative = 1e-12);

        // Below the cap nothing changes
        assert_eq!(cap_conductance(6.0e-6, 0.5 * GS_MAX), (6.0e-6, 0.5 * GS_MAX));
        // Negative assimilation is never scaled
        assert_eq!(cap_conductance(-1.0e-6, 2.0 * GS_MAX), (-1.0e-6, GS_MAX));
    }

    #[test]
    fn test_conductance_capped() {
        let mut sp = SpeciesParams::temperate_deciduous();
        sp.m_cond = 100.0;
        let capped = calculate_leaf_gas_exchange(&env(&sp, 800.0, 1.0));
        let cap_velocity = GS_MAX * RGAS * 293.15 / *Pascals::SEA_LEVEL;
        assert_relative_eq!(capped.conductance, cap_velocity, max_relative = 1e-12);

        // A steeper slope raises ci and the uncapped assimilation, but roughly
        // doubles the uncapped conductance, so the capped assimilation falls
        sp.m_cond = 200.0;
        let steeper = calculate_leaf_gas_exchange(&env(&sp, 800.0, 1.0));
        assert_relative_eq!(steeper.conductance, cap_velocity, max_relative = 1e-12);
        assert!(steeper.net_assimilation > 0.0);
        assert!(steeper.net_assimilation < 0.6 * capped.net_assimilation);
    }

    #[test]
    fn test_saturated_air_has_no_demand() {
        let sp = SpeciesParams::temperate_deciduous();
        let mut e = env(&sp, 500.0, 0.0);
        e.canopy_humidity = 0.05;
        let out = calculate_leaf_gas_exchange(&e);
        assert_eq!(out.transpiration, 0.0);
        assert_eq!(out.w_scale, 1.0);
    }

    #[test]
    fn test_zero_lai_is_inert() {
        let sp = SpeciesParams::temperate_deciduous();
        let mut e = env(&sp, 500.0, 1.0);
        e.lai = 0.0;
        let out = calculate_leaf_gas_exchange(&e);
        assert_eq!(out.net_assimilation, 0.0);
        assert_eq!(out.transpiration, 0.0);
    }
}
