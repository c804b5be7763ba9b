//! Tree cohorts as seen by the canopy flux core
//!
//! A cohort groups structurally identical trees. The core reads the
//! structural fields and writes only [`CohortFluxes`]; it never creates,
//! removes or restructures cohorts.

use crate::core_types::constants::W_SCALE_NOT_APPLICABLE;
use crate::core_types::units::Fraction;
use serde::{Deserialize, Serialize};

/// Phenological status of a cohort's foliage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CohortStatus {
    /// Leaves present
    #[default]
    LeafOn,
    /// Leaves absent (dormant or deciduous off-season)
    LeafOff,
}

/// Photosynthetic pathway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PhotosynthesisPathway {
    /// Rubisco-limited C3 kinetics with CO2/O2 Michaelis-Menten terms
    #[default]
    C3,
    /// CO2-concentrating C4 kinetics
    C4,
}

/// Per-cohort flux outputs, in whole-individual per-timestep units unless noted
///
/// `gpp`, `resl` and `transp` describe one tree. Multiply by
/// `Cohort::n_individuals` for the cohort total per m² of ground.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CohortFluxes {
    /// Net assimilation (mol C m⁻² leaf s⁻¹)
    pub an_op: f64,
    /// Leaf dark respiration (mol C m⁻² leaf s⁻¹, positive)
    pub an_cl: f64,
    /// Gross primary production per individual (kg C tree⁻¹ step⁻¹);
    /// multiply by `n_individuals` for the stand
    pub gpp: f64,
    /// Leaf respiration per individual (kg C tree⁻¹ step⁻¹);
    /// multiply by `n_individuals` for the stand
    pub resl: f64,
    /// Transpiration per individual (kg H2O tree⁻¹ step⁻¹);
    /// multiply by `n_individuals` for the stand
    pub transp: f64,
    /// Water-stress diagnostic: supply/demand capped at 1, or
    /// [`W_SCALE_NOT_APPLICABLE`] when no stomatal limitation is modelled
    pub w_scale: f64,
}

impl CohortFluxes {
    /// Outputs for a cohort that does not photosynthesise this step
    pub const INACTIVE: CohortFluxes = CohortFluxes {
        an_op: 0.0,
        an_cl: 0.0,
        gpp: 0.0,
        resl: 0.0,
        transp: 0.0,
        w_scale: W_SCALE_NOT_APPLICABLE,
    };
}

impl Default for CohortFluxes {
    fn default() -> Self {
        Self::INACTIVE
    }
}

/// A group of structurally identical trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cohort {
    /// Species / PFT identifier into the [`crate::core_types::SpeciesTable`]
    pub species: u32,
    /// Photosynthetic pathway
    pub pathway: PhotosynthesisPathway,
    /// Canopy layer, 1 = top
    pub layer: usize,
    /// Leaf area per individual (m²)
    pub leaf_area: f64,
    /// Crown area per individual (m²)
    pub crown_area: f64,
    /// Individuals per m² of ground
    pub n_individuals: f64,
    /// Water supply from the soil (kg H2O tree⁻¹ step⁻¹)
    pub water_supply: f64,
    /// Phenological status
    pub status: CohortStatus,
    /// Fraction of foliage that is wet or snow covered
    #[serde(default)]
    pub wet_fraction: Fraction,
    /// Fluxes written by the last timestep
    #[serde(default)]
    pub fluxes: CohortFluxes,
}

impl Cohort {
    /// Create a leaf-on cohort with zeroed outputs
    pub fn new(
        species: u32,
        pathway: PhotosynthesisPathway,
        layer: usize,
        leaf_area: f64,
        crown_area: f64,
        n_individuals: f64,
    ) -> Self {
        Cohort {
            species,
            pathway,
            layer,
            leaf_area,
            crown_area,
            n_individuals,
            water_supply: 0.0,
            status: CohortStatus::LeafOn,
            wet_fraction: Fraction::ZERO,
            fluxes: CohortFluxes::INACTIVE,
        }
    }

    /// Set the soil water supply (kg H2O tree⁻¹ step⁻¹)
    pub fn with_water_supply(mut self, water_supply: f64) -> Self {
        self.water_supply = water_supply;
        self
    }

    /// Set the phenological status
    pub fn with_status(mut self, status: CohortStatus) -> Self {
        self.status = status;
        self
    }

    /// Within-crown leaf area index (m² leaf / m² crown)
    pub fn lai(&self) -> f64 {
        if self.crown_area > 0.0 {
            self.leaf_area / self.crown_area
        } else {
            0.0
        }
    }

    /// Whether the cohort carries foliage that can exchange gas this step
    pub fn has_leaves(&self) -> bool {
        self.status == CohortStatus::LeafOn && self.leaf_area > 0.0 && self.crown_area > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lai_from_areas() {
        let cohort = Cohort::new(0, PhotosynthesisPathway::C3, 1, 12.0, 4.0, 0.1);
        assert_eq!(cohort.lai(), 3.0);
    }

    #[test]
    fn test_zero_crown_has_no_lai() {
        let cohort = Cohort::new(0, PhotosynthesisPathway::C3, 1, 12.0, 0.0, 0.1);
        assert_eq!(cohort.lai(), 0.0);
        assert!(!cohort.has_leaves());
    }

    #[test]
    fn test_leaf_off_has_no_leaves() {
        let cohort = Cohort::new(0, PhotosynthesisPathway::C3, 1, 12.0, 4.0, 0.1)
            .with_status(CohortStatus::LeafOff);
        assert!(!cohort.has_leaves());
    }

    #[test]
    fn test_new_cohort_outputs_inactive() {
        let cohort = Cohort::new(0, PhotosynthesisPathway::C4, 2, 1.0, 1.0, 1.0);
        assert_eq!(cohort.fluxes, CohortFluxes::INACTIVE);
        assert_eq!(cohort.fluxes.w_scale, W_SCALE_NOT_APPLICABLE);
    }
}
