//! Multi-layer Canopy Light Partitioning
//!
//! Splits top-of-canopy light between discrete canopy layers (perfect
//! plasticity approximation: crowns in a layer tile the ground, layers stack
//! vertically) and computes each cohort's own fractional absorption.
//!
//! Each cohort absorbs `1 − exp(−κ·LAI_crown)` of the light reaching its
//! layer, where `LAI_crown` is leaf area over crown area. A layer's absorbed
//! fraction is the crown-area-weighted sum over its cohorts, and the next
//! layer down receives what is left:
//!
//! ```text
//! f_light(1) = 1
//! f_light(i) = f_light(i−1) × (1 − fAPAR_layer(i−1))
//! ```
//!
//! This conserves energy; absorbed plus transmitted light always equals the
//! light arriving at the top of the layer.
//!
//! # Scientific References
//! - Strigul, N., et al. (2008). "Scaling from trees to forests: tractable
//!   macroscopic equations for forest dynamics." Ecological Monographs, 78(4), 523-545
//! - Weng, E.S., et al. (2015). Biogeosciences, 12, 2655-2694
//! - Monsi, M. and Saeki, T. (1953). Beer-Lambert attenuation in plant canopies

use crate::core_types::cohort::Cohort;
use tracing::warn;

/// Default number of canopy layers
pub const DEFAULT_MAX_LAYERS: usize = 9;

/// Light available to each canopy layer and absorbed by each cohort
#[derive(Debug, Clone, PartialEq)]
pub struct LightPartition {
    /// Fraction of top-of-canopy light at the top of each layer. Index `i`
    /// is the top of layer `i + 1`; the final entry is the light left below
    /// the lowest layer. Length is `max_layers + 1`.
    f_light: Vec<f64>,
    /// Gap-corrected leaf area index per layer
    layer_lai: Vec<f64>,
    /// Fraction of incoming light absorbed by each layer
    layer_fapar: Vec<f64>,
    /// Fraction of light reaching its layer absorbed by each cohort's crown,
    /// in the order the cohorts were supplied
    cohort_fapar: Vec<f64>,
}

impl LightPartition {
    /// Number of layers modelled
    pub fn max_layers(&self) -> usize {
        self.layer_fapar.len()
    }

    /// Clamp a cohort layer index into `[1, max_layers]`
    pub fn clamp_layer(&self, layer: usize) -> usize {
        layer.clamp(1, self.max_layers())
    }

    /// Light fraction at the top of `layer` (1 = top), clamped into range
    pub fn light_at_layer(&self, layer: usize) -> f64 {
        self.f_light[self.clamp_layer(layer) - 1]
    }

    /// Light fraction remaining below the lowest layer
    pub fn below_canopy(&self) -> f64 {
        self.f_light[self.max_layers()]
    }

    /// The full light-fraction profile (length `max_layers + 1`)
    pub fn light_fractions(&self) -> &[f64] {
        &self.f_light
    }

    /// Gap-corrected LAI of `layer` (1 = top)
    pub fn layer_lai(&self, layer: usize) -> f64 {
        self.layer_lai[self.clamp_layer(layer) - 1]
    }

    /// Fraction of arriving light absorbed by `layer` (1 = top)
    pub fn layer_fapar(&self, layer: usize) -> f64 {
        self.layer_fapar[self.clamp_layer(layer) - 1]
    }

    /// Crown-level fractional absorption of the `index`-th cohort
    pub fn cohort_fapar(&self, index: usize) -> f64 {
        self.cohort_fapar[index]
    }
}

/// Fraction of light absorbed within a single crown
///
/// Beer-Lambert: `1 − exp(−κ·LAI)`. Zero for a crown without leaves.
///
/// # Arguments
/// * `lai` - Within-crown leaf area index (m² leaf / m² crown)
/// * `kappa` - Extinction coefficient
pub fn calculate_crown_fapar(lai: f64, kappa: f64) -> f64 {
    if lai <= 0.0 {
        return 0.0;
    }
    1.0 - (-kappa * lai).exp()
}

/// Partition top-of-canopy light across layers and cohorts
///
/// # Arguments
/// * `cohorts` - Cohorts with their current layer assignments
/// * `max_layers` - Number of layers; deeper assignments are clamped
/// * `kappa` - Light extinction coefficient
/// * `gap_fraction` - Fraction of ground not covered by crowns (for layer LAI)
///
/// # Returns
/// The per-layer light profile and per-cohort absorption fractions
pub fn partition_light(
    cohorts: &[Cohort],
    max_layers: usize,
    kappa: f64,
    gap_fraction: f64,
) -> LightPartition {
    let max_layers = max_layers.max(1);
    let mut layer_lai = vec![0.0; max_layers];
    let mut layer_fapar = vec![0.0; max_layers];
    let mut cohort_fapar = Vec::with_capacity(cohorts.len());

    for cohort in cohorts {
        if cohort.layer < 1 || cohort.layer > max_layers {
            warn!(
                "Cohort layer {} outside [1, {}], clamping",
                cohort.layer, max_layers
            );
        }
        let layer = cohort.layer.clamp(1, max_layers);

        let fapar = if cohort.has_leaves() {
            calculate_crown_fapar(cohort.lai(), kappa)
        } else {
            0.0
        };
        cohort_fapar.push(fapar);

        if fapar > 0.0 {
            layer_lai[layer - 1] += cohort.leaf_area * cohort.n_individuals / (1.0 - gap_fraction);
            layer_fapar[layer - 1] += cohort.crown_area * cohort.n_individuals * fapar;
        }
    }

    // Crown cover above 1 is the host's concern; absorption cannot exceed arrival
    for fapar in &mut layer_fapar {
        *fapar = fapar.clamp(0.0, 1.0);
    }

    let mut f_light = vec![1.0; max_layers + 1];
    for i in 1..=max_layers {
        f_light[i] = f_light[i - 1] * (1.0 - layer_fapar[i - 1]);
    }

    LightPartition {
        f_light,
        layer_lai,
        layer_fapar,
        cohort_fapar,
    }
}
