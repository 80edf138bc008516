//! Raw road axis records as exported by the axes API

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::coords::{CoordinateError, parse_coordinates};
use super::synthetic::synthetic_path;
use crate::config::{FallbackPolicy, RoutingConfig};
use crate::model::{RoadSegment, TrafficTag};
use crate::error::Error;

/// One road axis as served by the backend, field names kept as-is
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisRecord {
    pub id: i64,
    pub nom: String,
    pub point_depart: String,
    pub point_arrivee: String,
    pub distance_km: Option<f64>,
    pub coords: Option<String>,
    pub trafic: Option<String>,
}

impl AxisRecord {
    pub fn display_name(&self) -> String {
        if self.nom.trim().is_empty() {
            format!("Axe {}", self.id)
        } else {
            self.nom.clone()
        }
    }

    /// Validates the record into a segment with a usable polyline
    ///
    /// # Errors
    ///
    /// Only with [`FallbackPolicy::Strict`], when the coordinates are missing
    /// or unparseable.
    pub fn to_segment(&self, config: &RoutingConfig) -> Result<RoadSegment, Error> {
        let parsed = match self.coords.as_deref() {
            Some(raw) => parse_coordinates(raw),
            None => Err(CoordinateError::Empty),
        };

        let coordinates = match (parsed, config.fallback) {
            (Ok(coordinates), _) => coordinates,
            (Err(source), FallbackPolicy::Strict) => {
                return Err(Error::InvalidSegment {
                    id: self.id,
                    source,
                });
            }
            (Err(reason), FallbackPolicy::Synthetic) => {
                warn!(
                    "Axis {} has unusable coordinates ({reason}), substituting a synthetic path",
                    self.id
                );
                #[allow(clippy::cast_sign_loss)]
                let seed = self.id as u64;
                synthetic_path(&config.synthetic, seed)
            }
        };

        Ok(RoadSegment {
            id: self.id,
            name: self.display_name(),
            from_place: self.point_depart.clone(),
            to_place: self.point_arrivee.clone(),
            coordinates,
            traffic: TrafficTag::from_label(self.trafic.as_deref()),
        })
    }
}

/// Converts every record, preserving order
///
/// # Errors
///
/// Fails on the first invalid record under [`FallbackPolicy::Strict`].
pub fn segments_from_records(
    records: &[AxisRecord],
    config: &RoutingConfig,
) -> Result<Vec<RoadSegment>, Error> {
    records
        .iter()
        .map(|record| record.to_segment(config))
        .collect()
}

/// Loads axes from a JSON array
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array of axes
pub fn load_axes_json(path: &Path) -> Result<Vec<AxisRecord>, Error> {
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Loads axes from a CSV export with a header row
///
/// Rows that fail to deserialize are logged and skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or has no readable header
pub fn load_axes_csv(path: &Path) -> Result<Vec<AxisRecord>, Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for (row, result) in reader.deserialize::<AxisRecord>().enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping axis row {}: {e}", row + 1),
        }
    }
    debug!("Loaded {} axes from {}", records.len(), path.display());
    Ok(records)
}

/// Loads axes from a `.csv` or `.json` file, chosen by extension
///
/// # Errors
///
/// Returns an error for unknown extensions and for any load failure
pub fn load_axes(path: &Path) -> Result<Vec<AxisRecord>, Error> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => load_axes_csv(path),
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_axes_json(path),
        _ => Err(Error::InvalidData(format!(
            "Unsupported axes file: {}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinate;

    fn record(id: i64, coords: Option<&str>) -> AxisRecord {
        AxisRecord {
            id,
            nom: "Route de Sefrou".to_string(),
            coords: coords.map(str::to_string),
            trafic: Some("fluide".to_string()),
            ..AxisRecord::default()
        }
    }

    #[test]
    fn parses_record_into_segment() {
        let segment = record(1, Some("[[34.03,-5.00],[34.04,-5.01]]"))
            .to_segment(&RoutingConfig::default())
            .unwrap();
        assert_eq!(segment.coordinates[1], Coordinate::new(34.04, -5.01));
        assert_eq!(segment.traffic, TrafficTag::Fluid);
        assert_eq!(segment.name, "Route de Sefrou");
    }

    #[test]
    fn missing_coordinates_get_synthetic_path() {
        let config = RoutingConfig::default();
        let segment = record(9, None).to_segment(&config).unwrap();
        assert_eq!(segment.coordinates.len(), config.synthetic.points);
        let again = record(9, Some("")).to_segment(&config).unwrap();
        assert_eq!(segment.coordinates, again.coordinates);
    }

    #[test]
    fn strict_policy_rejects_bad_coordinates() {
        let config = RoutingConfig {
            fallback: FallbackPolicy::Strict,
            ..RoutingConfig::default()
        };
        let err = record(4, Some("n/a")).to_segment(&config).unwrap_err();
        assert!(matches!(err, Error::InvalidSegment { id: 4, .. }));
    }

    #[test]
    fn unnamed_axis_gets_default_name() {
        let axis = AxisRecord {
            id: 12,
            ..AxisRecord::default()
        };
        assert_eq!(axis.display_name(), "Axe 12");
    }

    #[test]
    fn deserializes_backend_json() {
        let json = r#"[{"id": 3, "nom": "Bd Allal El Fassi", "point_depart": "Bab Boujloud",
            "point_arrivee": "Atlas", "distance_km": 4.2,
            "coords": "[(-4.99, 34.03), (-5.00, 34.04)]", "trafic": null}]"#;
        let records: Vec<AxisRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].distance_km, Some(4.2));
        let segment = records[0].to_segment(&RoutingConfig::default()).unwrap();
        assert_eq!(segment.coordinates[0], Coordinate::new(34.03, -4.99));
        assert_eq!(segment.traffic, TrafficTag::Unspecified);
    }
}
