//! Tunable policies for network building and routing

use serde::{Deserialize, Serialize};

use crate::model::{Coordinate, TrafficLevel};

/// What to do with a segment whose coordinates cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Substitute a deterministic synthetic polyline so the build never fails
    #[default]
    Synthetic,
    /// Fail the build with [`crate::error::Error::InvalidSegment`]
    Strict,
}

/// Shape of the synthetic polylines substituted for unparseable segments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticPathConfig {
    /// Anchor of the generated paths (Fès city centre by default)
    pub reference: Coordinate,
    /// Scale of the random offsets, in degrees
    pub max_offset: f64,
    pub points: usize,
}

impl Default for SyntheticPathConfig {
    fn default() -> Self {
        Self {
            reference: Coordinate::new(34.0331, -4.9998),
            max_offset: 0.02,
            points: 5,
        }
    }
}

/// Coarse duration model: a flat urban speed scaled by the traffic level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedModel {
    pub base_speed_kmh: f64,
    pub light_factor: f64,
    pub normal_factor: f64,
    pub heavy_factor: f64,
}

impl Default for SpeedModel {
    fn default() -> Self {
        Self {
            base_speed_kmh: 50.0,
            light_factor: 1.2,
            normal_factor: 1.0,
            heavy_factor: 0.7,
        }
    }
}

impl SpeedModel {
    pub fn speed_factor(&self, level: TrafficLevel) -> f64 {
        match level {
            TrafficLevel::Light => self.light_factor,
            TrafficLevel::Normal => self.normal_factor,
            TrafficLevel::Heavy => self.heavy_factor,
        }
    }

    /// Estimated travel time in whole minutes
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn duration_minutes(&self, distance_km: f64, level: TrafficLevel) -> u32 {
        let minutes = distance_km / self.base_speed_kmh * 60.0 / self.speed_factor(level);
        if minutes.is_finite() && minutes > 0.0 {
            minutes.round() as u32
        } else {
            0
        }
    }
}

/// Configuration shared by network building and route queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Farthest a clicked point may be from the road network, in kilometers
    pub max_snap_km: f64,
    pub fallback: FallbackPolicy,
    pub synthetic: SyntheticPathConfig,
    pub speed: SpeedModel,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            max_snap_km: 1.0,
            fallback: FallbackPolicy::default(),
            synthetic: SyntheticPathConfig::default(),
            speed: SpeedModel::default(),
        }
    }
}
