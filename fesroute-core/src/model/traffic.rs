//! Traffic levels and the cost factors derived from them

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Edge cost multiplier for free-flowing traffic
pub const FLUID_FACTOR: f64 = 0.8;
/// Edge cost multiplier for congested traffic
pub const DENSE_FACTOR: f64 = 1.5;
/// Edge cost multiplier when nothing is known
pub const NEUTRAL_FACTOR: f64 = 1.0;

/// Coarse traffic setting chosen by the user for a whole query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLevel {
    Light,
    #[default]
    Normal,
    Heavy,
}

impl TrafficLevel {
    pub fn factor(self) -> f64 {
        match self {
            TrafficLevel::Light => FLUID_FACTOR,
            TrafficLevel::Normal => NEUTRAL_FACTOR,
            TrafficLevel::Heavy => DENSE_FACTOR,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrafficLevel::Light => "light",
            TrafficLevel::Normal => "normal",
            TrafficLevel::Heavy => "heavy",
        }
    }
}

impl fmt::Display for TrafficLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrafficLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(TrafficLevel::Light),
            "normal" => Ok(TrafficLevel::Normal),
            "heavy" => Ok(TrafficLevel::Heavy),
            other => Err(Error::InvalidData(format!("unknown traffic level '{other}'"))),
        }
    }
}

/// Traffic information attached to a road segment and inherited by its edges
///
/// Axis data labels traffic in French (`fluide`, `dense`) as well as in
/// English. `normal` carries no information and behaves like a missing tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TrafficTag {
    #[default]
    Unspecified,
    Fluid,
    Dense,
    Other(String),
}

impl TrafficTag {
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(label) = label.map(str::trim).filter(|l| !l.is_empty()) else {
            return TrafficTag::Unspecified;
        };
        match label.to_lowercase().as_str() {
            "normal" => TrafficTag::Unspecified,
            "fluide" | "light" => TrafficTag::Fluid,
            "dense" | "heavy" => TrafficTag::Dense,
            _ => TrafficTag::Other(label.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TrafficTag::Unspecified => "normal",
            TrafficTag::Fluid => "fluide",
            TrafficTag::Dense => "dense",
            TrafficTag::Other(label) => label,
        }
    }
}

impl From<String> for TrafficTag {
    fn from(value: String) -> Self {
        TrafficTag::from_label(Some(&value))
    }
}

impl From<TrafficTag> for String {
    fn from(value: TrafficTag) -> Self {
        value.as_str().to_string()
    }
}

/// Cost multiplier for an edge
///
/// Per-edge data wins over the query-wide setting: the global level is only
/// consulted when the edge carries no specific tag.
pub fn traffic_factor(edge: &TrafficTag, global: TrafficLevel) -> f64 {
    match edge {
        TrafficTag::Fluid => FLUID_FACTOR,
        TrafficTag::Dense => DENSE_FACTOR,
        TrafficTag::Other(_) => NEUTRAL_FACTOR,
        TrafficTag::Unspecified => global.factor(),
    }
}

/// Simulated congestion class used to colour axes on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Congestion {
    Fluid,
    Moderate,
    Severe,
}

impl Congestion {
    pub fn color(self) -> &'static str {
        match self {
            Congestion::Fluid => "#4CAF50",
            Congestion::Moderate => "#FF9800",
            Congestion::Severe => "#F44336",
        }
    }
}

/// Spreads congestion over axes by id, denser as the global level rises
pub fn congestion_class(segment_id: i64, level: TrafficLevel) -> Congestion {
    match level {
        TrafficLevel::Light => Congestion::Fluid,
        TrafficLevel::Normal if segment_id % 3 == 0 => Congestion::Moderate,
        TrafficLevel::Normal => Congestion::Fluid,
        TrafficLevel::Heavy if segment_id % 5 == 0 => Congestion::Severe,
        TrafficLevel::Heavy if segment_id % 2 == 0 => Congestion::Moderate,
        TrafficLevel::Heavy => Congestion::Fluid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_tag_overrides_global_level() {
        assert_eq!(traffic_factor(&TrafficTag::Dense, TrafficLevel::Light), 1.5);
        assert_eq!(traffic_factor(&TrafficTag::Fluid, TrafficLevel::Heavy), 0.8);
        let other = TrafficTag::from_label(Some("bouchon"));
        assert_eq!(traffic_factor(&other, TrafficLevel::Heavy), 1.0);
    }

    #[test]
    fn untagged_edge_follows_global_level() {
        let tag = TrafficTag::Unspecified;
        assert_eq!(traffic_factor(&tag, TrafficLevel::Light), 0.8);
        assert_eq!(traffic_factor(&tag, TrafficLevel::Normal), 1.0);
        assert_eq!(traffic_factor(&tag, TrafficLevel::Heavy), 1.5);
    }

    #[test]
    fn parses_french_and_english_labels() {
        assert_eq!(TrafficTag::from_label(Some("Fluide")), TrafficTag::Fluid);
        assert_eq!(TrafficTag::from_label(Some(" heavy ")), TrafficTag::Dense);
        assert_eq!(TrafficTag::from_label(Some("normal")), TrafficTag::Unspecified);
        assert_eq!(TrafficTag::from_label(Some("")), TrafficTag::Unspecified);
        assert_eq!(TrafficTag::from_label(None), TrafficTag::Unspecified);
    }

    #[test]
    fn traffic_level_round_trips_through_str() {
        assert_eq!("Heavy".parse::<TrafficLevel>().unwrap(), TrafficLevel::Heavy);
        assert!("jammed".parse::<TrafficLevel>().is_err());
    }

    #[test]
    fn congestion_spread() {
        assert_eq!(congestion_class(3, TrafficLevel::Light), Congestion::Fluid);
        assert_eq!(congestion_class(3, TrafficLevel::Normal), Congestion::Moderate);
        assert_eq!(congestion_class(4, TrafficLevel::Normal), Congestion::Fluid);
        assert_eq!(congestion_class(10, TrafficLevel::Heavy), Congestion::Severe);
        assert_eq!(congestion_class(4, TrafficLevel::Heavy), Congestion::Moderate);
        assert_eq!(congestion_class(7, TrafficLevel::Heavy).color(), "#4CAF50");
    }
}
