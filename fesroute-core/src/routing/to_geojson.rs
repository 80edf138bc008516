use geo::{Coord, LineString};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use super::assemble::{PathResult, RouteLeg};
use crate::error::Error;

impl PathResult {
    /// Converts the route to a `GeoJSON` `FeatureCollection`
    ///
    /// The first feature is the full route line with the summary; one feature
    /// per traversed road edge follows.
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let mut features = Vec::with_capacity(self.legs.len() + 1);
        features.push(self.route_feature()?);

        for (idx, leg) in self.legs.iter().enumerate() {
            features.push(create_leg_feature(leg, idx)?);
        }

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()?).map_err(|e| Error::GeoJsonError(e.to_string()))
    }

    fn route_feature(&self) -> Result<Feature, Error> {
        let coords: Vec<Coord<f64>> = self.coordinates.iter().map(|&c| c.into()).collect();
        let geometry = Geometry::new(GeoJsonValue::from(&LineString::new(coords)));

        let value = json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": {
                "kind": "route",
                "distance_km": self.distance_km,
                "duration_min": self.duration_min,
                "traffic_level": self.traffic_level,
                "axes": self.axis_names(),
            }
        });

        serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

fn create_leg_feature(leg: &RouteLeg, leg_idx: usize) -> Result<Feature, Error> {
    let line = LineString::new(vec![leg.from.into(), leg.to.into()]);
    let geometry = Geometry::new(GeoJsonValue::from(&line));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "kind": "leg",
            "leg_index": leg_idx,
            "segment_id": leg.segment_id,
            "segment_name": leg.segment_name,
            "traffic": leg.traffic,
            "distance_km": leg.distance_km,
        }
    });

    serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}
