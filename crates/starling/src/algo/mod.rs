pub mod community;
pub mod isolated;
pub mod radial;
pub mod sector;

mod anchor;
mod cohesion;
mod collision;
mod pipeline;
mod relax;
mod topology;

pub(crate) use pipeline::{detect_only, run};
pub(crate) use topology::Topology;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Which partitioner runs first. Whatever is chosen, a failure falls through to label
/// propagation and finally to a single community.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Detector {
    /// Greedy modularity aggregation (Louvain) honouring [`LayoutOptions::resolution`].
    #[default]
    Louvain,
    LabelPropagation,
    /// Every connected node in one community.
    SingleCommunity,
}

impl Detector {
    pub fn as_str(self) -> &'static str {
        match self {
            Detector::Louvain => "louvain",
            Detector::LabelPropagation => "labelPropagation",
            Detector::SingleCommunity => "singleCommunity",
        }
    }
}

impl std::str::FromStr for Detector {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "louvain" => Ok(Self::Louvain),
            "labelpropagation" | "lpa" => Ok(Self::LabelPropagation),
            "singlecommunity" | "single" => Ok(Self::SingleCommunity),
            _ => Err(()),
        }
    }
}

/// Heuristic gates deciding when a bridge node may leave its home sector during collision
/// resolution. All three must hold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BridgeThresholds {
    /// Minimum cross-community ratio (exclusive).
    pub cross_ratio: f64,
    /// Minimum share of all neighbors held by the top foreign community (exclusive).
    pub foreign_share: f64,
    /// Minimum `foreign / (home + foreign)` balance (exclusive).
    pub balance: f64,
}

impl Default for BridgeThresholds {
    fn default() -> Self {
        Self {
            cross_ratio: 0.5,
            foreign_share: 0.4,
            balance: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    /// Louvain resolution, scaling the expected-edge term of the gain: higher values favour
    /// many smaller communities.
    pub resolution: f64,
    pub detector: Detector,
    /// Radius of a degree-0 node; the best connected node sits at the origin.
    pub max_radius: f64,
    /// Fraction of connected nodes placed first as anchors (at least one).
    pub anchor_fraction: f64,
    pub relax_iterations: usize,
    pub collision_iterations: usize,
    /// Scale applied to the summed repulsion of one collision pass.
    pub collision_damping: f64,
    /// Undamped separation passes run after the damped ones; stops early once nothing overlaps.
    pub settle_iterations: usize,
    /// Fraction of the full turn left empty between community sectors.
    pub gap_fraction: f64,
    pub grid_spacing: f64,
    /// Distance between `max_radius` and the isolated-node grid origin on both axes.
    pub isolated_margin: f64,
    pub bridge: BridgeThresholds,
    /// Fixes every random draw. `None` picks a fresh seed per run (reported in the result).
    pub random_seed: Option<u64>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            resolution: 1.5,
            detector: Detector::Louvain,
            max_radius: 500.0,
            anchor_fraction: 0.1,
            relax_iterations: 60,
            collision_iterations: 80,
            collision_damping: 0.08,
            settle_iterations: 100,
            gap_fraction: 0.15,
            grid_spacing: 25.0,
            isolated_margin: 50.0,
            bridge: BridgeThresholds::default(),
            random_seed: None,
        }
    }
}

impl LayoutOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        fn invalid(option: &'static str, reason: impl Into<String>) -> Error {
            Error::InvalidOption {
                option,
                reason: reason.into(),
            }
        }

        let positive = [
            ("resolution", self.resolution),
            ("maxRadius", self.max_radius),
            ("gridSpacing", self.grid_spacing),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(name, format!("expected a positive number, got {value}")));
            }
        }
        if !(self.isolated_margin.is_finite() && self.isolated_margin > 0.0) {
            return Err(invalid(
                "isolatedMargin",
                format!("expected a positive number, got {}", self.isolated_margin),
            ));
        }
        if !(self.anchor_fraction > 0.0 && self.anchor_fraction <= 1.0) {
            return Err(invalid(
                "anchorFraction",
                format!("expected a value in (0, 1], got {}", self.anchor_fraction),
            ));
        }
        if !(self.collision_damping > 0.0 && self.collision_damping <= 1.0) {
            return Err(invalid(
                "collisionDamping",
                format!("expected a value in (0, 1], got {}", self.collision_damping),
            ));
        }
        if !(self.gap_fraction >= 0.0 && self.gap_fraction < 1.0) {
            return Err(invalid(
                "gapFraction",
                format!("expected a value in [0, 1), got {}", self.gap_fraction),
            ));
        }
        let thresholds = [
            ("bridge.crossRatio", self.bridge.cross_ratio),
            ("bridge.foreignShare", self.bridge.foreign_share),
            ("bridge.balance", self.bridge.balance),
        ];
        for (name, value) in thresholds {
            if !(0.0..1.0).contains(&value) {
                return Err(invalid(name, format!("expected a value in [0, 1), got {value}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Detector, LayoutOptions};

    #[test]
    fn defaults_validate() {
        LayoutOptions::default().validate().expect("defaults are valid");
    }

    #[test]
    fn rejects_non_finite_and_out_of_range_values() {
        let opts = LayoutOptions {
            max_radius: f64::NAN,
            ..Default::default()
        };
        assert!(opts.validate().is_err());

        let opts = LayoutOptions {
            gap_fraction: 1.0,
            ..Default::default()
        };
        assert!(opts.validate().is_err());

        let mut opts = LayoutOptions::default();
        opts.bridge.balance = 1.5;
        assert!(opts.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let opts: LayoutOptions =
            serde_json::from_str(r#"{"resolution": 1.0, "randomSeed": 7, "bridge": {"balance": 0.6}}"#)
                .expect("options");
        assert_eq!(opts.resolution, 1.0);
        assert_eq!(opts.random_seed, Some(7));
        assert_eq!(opts.bridge.balance, 0.6);
        assert_eq!(opts.bridge.cross_ratio, 0.5);
        assert_eq!(opts.relax_iterations, 60);
    }

    #[test]
    fn detector_names_parse_leniently() {
        assert_eq!("label-propagation".parse::<Detector>(), Ok(Detector::LabelPropagation));
        assert_eq!("Louvain".parse::<Detector>(), Ok(Detector::Louvain));
        assert!("kmeans".parse::<Detector>().is_err());
    }
}
