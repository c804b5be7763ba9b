//! Species / PFT physiological parameters
//!
//! Read-only to the flux core. The host model owns the table and hands the
//! driver a validated copy at construction.
//!
//! # References
//! - Weng, E.S., et al. (2015). "Scaling from individual trees to forests in an
//!   Earth system modeling framework using a mathematically tractable model of
//!   height-structured competition." Biogeosciences, 12, 2655-2694
//! - Leuning, R. (1995). "A critical appraisal of a combined stomatal-photosynthesis
//!   model for C3 plants." Plant, Cell & Environment, 18, 339-355

use crate::error::{require_fraction, require_non_negative, require_positive, ConfigError};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Physiological constants for one species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesParams {
    /// Human-readable name
    pub name: String,
    /// Maximum carboxylation rate at 25°C (mol CO2 m⁻² leaf s⁻¹)
    pub vmax: f64,
    /// Stomatal conductance slope (Leuning m)
    pub m_cond: f64,
    /// Quantum efficiency of the light-limited rate (mol C / mol photons)
    pub alpha_phot: f64,
    /// Intrinsic quantum-yield efficiency handed to the optimality solver
    pub kphio: f64,
    /// Within-crown light extinction coefficient
    pub extinct: f64,
    /// Downregulation of gas exchange per unit wet/snow leaf fraction
    pub wet_leaf_dreg: f64,
    /// Respiration per unit leaf nitrogen (mol C (kg N)⁻¹ yr⁻¹)
    pub gamma_ln: f64,
    /// Leaf nitrogen per unit leaf area (kg N m⁻²)
    pub lna: f64,
    /// Humidity-deficit scale of the conductance closure (kg/kg)
    pub humidity_deficit_scale: f64,
}

impl SpeciesParams {
    /// Broadleaf temperate deciduous tree
    pub fn temperate_deciduous() -> Self {
        SpeciesParams {
            name: "temperate deciduous".to_string(),
            vmax: 35.0e-6,
            m_cond: 7.0,
            alpha_phot: 0.06,
            kphio: 0.05,
            extinct: 0.75,
            wet_leaf_dreg: 0.3,
            gamma_ln: 13_000.0,
            lna: 1.2e-3,
            humidity_deficit_scale: 0.09,
        }
    }

    /// Evergreen needleleaf tree
    ///
    /// Lower capacity and a steeper conductance slope than broadleaf.
    pub fn evergreen_needleleaf() -> Self {
        SpeciesParams {
            name: "evergreen needleleaf".to_string(),
            vmax: 25.0e-6,
            m_cond: 9.0,
            alpha_phot: 0.06,
            kphio: 0.05,
            extinct: 0.75,
            wet_leaf_dreg: 0.3,
            gamma_ln: 11_000.0,
            lna: 1.5e-3,
            humidity_deficit_scale: 0.09,
        }
    }

    /// Warm-season C4 grass
    pub fn c4_grass() -> Self {
        SpeciesParams {
            name: "c4 grass".to_string(),
            vmax: 20.0e-6,
            m_cond: 4.0,
            alpha_phot: 0.05,
            kphio: 0.06,
            extinct: 0.5,
            wet_leaf_dreg: 0.3,
            gamma_ln: 13_000.0,
            lna: 1.0e-3,
            humidity_deficit_scale: 0.15,
        }
    }

    /// Validate physical ranges
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidParameter`] for the first field out of range
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("vmax", self.vmax)?;
        require_positive("m_cond", self.m_cond)?;
        require_positive("alpha_phot", self.alpha_phot)?;
        require_positive("kphio", self.kphio)?;
        require_positive("extinct", self.extinct)?;
        require_fraction("wet_leaf_dreg", self.wet_leaf_dreg)?;
        require_non_negative("gamma_ln", self.gamma_ln)?;
        require_non_negative("lna", self.lna)?;
        require_positive("humidity_deficit_scale", self.humidity_deficit_scale)?;
        Ok(())
    }
}

/// Species lookup by identifier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeciesTable {
    species: FxHashMap<u32, SpeciesParams>,
}

impl SpeciesTable {
    /// Build a table from `(id, params)` pairs, validating every entry
    ///
    /// # Errors
    /// Returns [`ConfigError::EmptySpeciesTable`] when no entries are given, or
    /// the first validation failure
    pub fn new(entries: impl IntoIterator<Item = (u32, SpeciesParams)>) -> Result<Self, ConfigError> {
        let species: FxHashMap<u32, SpeciesParams> = entries.into_iter().collect();
        if species.is_empty() {
            return Err(ConfigError::EmptySpeciesTable);
        }
        for params in species.values() {
            params.validate()?;
        }
        Ok(SpeciesTable { species })
    }

    /// Default three-species table: 0 deciduous, 1 needleleaf, 2 C4 grass
    pub fn with_defaults() -> Self {
        let mut species = FxHashMap::default();
        species.insert(0, SpeciesParams::temperate_deciduous());
        species.insert(1, SpeciesParams::evergreen_needleleaf());
        species.insert(2, SpeciesParams::c4_grass());
        SpeciesTable { species }
    }

    /// Look up a species
    pub fn get(&self, id: u32) -> Option<&SpeciesParams> {
        self.species.get(&id)
    }

    /// Number of species in the table
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// Whether the table holds no species
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(SpeciesParams::temperate_deciduous().validate().is_ok());
        assert!(SpeciesParams::evergreen_needleleaf().validate().is_ok());
        assert!(SpeciesParams::c4_grass().validate().is_ok());
    }

    #[test]
    fn test_grass_has_wider_humidity_scale() {
        let grass = SpeciesParams::c4_grass();
        let tree = SpeciesParams::temperate_deciduous();
        assert!(grass.humidity_deficit_scale > tree.humidity_deficit_scale);
    }

    #[test]
    fn test_table_rejects_invalid_entry() {
        let mut bad = SpeciesParams::temperate_deciduous();
        bad.vmax = 0.0;
        let err = SpeciesTable::new([(0, bad)]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "vmax", .. }));
    }

    #[test]
    fn test_table_rejects_empty() {
        let err = SpeciesTable::new(std::iter::empty()).unwrap_err();
        assert_eq!(err, ConfigError::EmptySpeciesTable);
    }

    #[test]
    fn test_default_lookup() {
        let table = SpeciesTable::with_defaults();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(2).map(|s| s.name.as_str()), Some("c4 grass"));
        assert!(table.get(7).is_none());
    }
}
