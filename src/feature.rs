use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::DatasetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Crop {
    Wheat,
    Rice,
    Maize,
    Corn,
    Soybeans,
    Cotton,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown crop '{0}'")]
pub struct CropParseError(pub String);

impl Crop {
    pub const ALL: [Crop; 6] = [
        Crop::Wheat,
        Crop::Rice,
        Crop::Maize,
        Crop::Corn,
        Crop::Soybeans,
        Crop::Cotton,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Crop::Wheat => "wheat",
            Crop::Rice => "rice",
            Crop::Maize => "maize",
            Crop::Corn => "corn",
            Crop::Soybeans => "soybeans",
            Crop::Cotton => "cotton",
        }
    }

    /// Capitalized name used in popups.
    pub fn display_name(self) -> String {
        let id = self.id();
        let mut chars = id.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Crop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Crop {
    type Err = CropParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim();
        Crop::ALL
            .into_iter()
            .find(|crop| crop.id() == needle)
            .ok_or_else(|| CropParseError(value.to_string()))
    }
}

/// Validated attribute record attached to a field polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub name: String,
    pub crop: Crop,
    /// Percent change against the previous five-year average.
    pub yield_change: f64,
    /// Degrees Celsius against the 1951-1980 baseline.
    pub temperature_anomaly: f64,
    /// Percent change against the historical average.
    pub precipitation_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// Rings of `[longitude, latitude]` positions, outer ring first.
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
enum FeatureTag {
    #[default]
    Feature,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
enum CollectionTag {
    #[default]
    FeatureCollection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default)]
    kind: FeatureTag,
    #[serde(default)]
    pub properties: Option<FeatureProperties>,
    pub geometry: Geometry,
}

impl Feature {
    pub fn new(properties: Option<FeatureProperties>, geometry: Geometry) -> Self {
        Self {
            kind: FeatureTag::Feature,
            properties,
            geometry,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.as_ref().map(|props| props.name.as_str())
    }

    /// Popup lines shown when a field is clicked. Empty when the feature has
    /// no properties.
    pub fn popup_summary(&self) -> Vec<String> {
        let Some(props) = &self.properties else {
            return Vec::new();
        };
        vec![
            props.name.clone(),
            format!("Crop: {}", props.crop.display_name()),
            format!("Yield Change: {}%", signed(props.yield_change)),
            format!("Temp Anomaly: {}°C", signed(props.temperature_anomaly)),
            format!("Precipitation: {}%", signed(props.precipitation_change)),
        ]
    }

    fn validate(&self, index: usize) -> Result<(), DatasetError> {
        let Geometry::Polygon { coordinates } = &self.geometry;
        if coordinates.is_empty() {
            return Err(DatasetError::Validation(format!(
                "feature {index} has a polygon without rings"
            )));
        }
        for ring in coordinates {
            if ring.len() < 4 || ring.first() != ring.last() {
                return Err(DatasetError::Validation(format!(
                    "feature {index} has an unclosed polygon ring"
                )));
            }
            if ring.iter().flatten().any(|value| !value.is_finite()) {
                return Err(DatasetError::Validation(format!(
                    "feature {index} has non-finite coordinates"
                )));
            }
        }

        if let Some(props) = &self.properties {
            if props.name.trim().is_empty() {
                return Err(DatasetError::Validation(format!(
                    "feature {index} has an empty name"
                )));
            }
            let attributes = [
                ("yield_change", props.yield_change),
                ("temperature_anomaly", props.temperature_anomaly),
                ("precipitation_change", props.precipitation_change),
            ];
            for (field, value) in attributes {
                if !value.is_finite() {
                    return Err(DatasetError::Validation(format!(
                        "feature '{}' has a non-finite {field}",
                        props.name
                    )));
                }
            }
        }
        Ok(())
    }
}

fn signed(value: f64) -> String {
    if value > 0.0 {
        format!("+{value}")
    } else {
        format!("{value}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default)]
    kind: CollectionTag,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: CollectionTag::FeatureCollection,
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.features.is_empty() {
            return Err(DatasetError::Validation(
                "dataset must define at least one feature".to_string(),
            ));
        }
        for (index, feature) in self.features.iter().enumerate() {
            feature.validate(index)?;
        }
        Ok(())
    }

    /// Three Nebraska fields bundled with the dashboard.
    pub fn sample() -> Self {
        Self::new(vec![
            sample_field("Wheat Field 1", Crop::Wheat, -5.0, 1.2, -12.0, (-96.8, 40.8)),
            sample_field("Corn Field 2", Crop::Corn, 3.0, 0.8, 15.0, (-97.0, 41.0)),
            sample_field("Soybean Field 3", Crop::Soybeans, -8.0, 1.7, -20.0, (-97.2, 40.6)),
        ])
    }
}

fn sample_field(
    name: &str,
    crop: Crop,
    yield_change: f64,
    temperature_anomaly: f64,
    precipitation_change: f64,
    north_west: (f64, f64),
) -> Feature {
    let (west, north) = north_west;
    let east = west + 0.1;
    let south = north - 0.1;
    Feature::new(
        Some(FeatureProperties {
            name: name.to_string(),
            crop,
            yield_change,
            temperature_anomaly,
            precipitation_change,
        }),
        Geometry::Polygon {
            coordinates: vec![vec![
                [west, north],
                [east, north],
                [east, south],
                [west, south],
                [west, north],
            ]],
        },
    )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherStation {
    /// `[latitude, longitude]`
    pub position: [f64; 2],
    pub name: String,
    pub temperature: String,
    pub precipitation: String,
    pub trend: String,
}

impl WeatherStation {
    pub fn samples() -> Vec<WeatherStation> {
        [
            ([40.85, -96.75], "Weather Station 1", "32.4°C", "720mm/year", "+1.5°C since 1990"),
            ([40.95, -96.95], "Weather Station 2", "31.1°C", "680mm/year", "+1.7°C since 1990"),
            ([40.55, -97.15], "Weather Station 3", "33.2°C", "640mm/year", "+1.9°C since 1990"),
        ]
        .into_iter()
        .map(|(position, name, temperature, precipitation, trend)| WeatherStation {
            position,
            name: name.to_string(),
            temperature: temperature.to_string(),
            precipitation: precipitation.to_string(),
            trend: trend.to_string(),
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_collection_is_valid() {
        let sample = FeatureCollection::sample();
        assert_eq!(sample.len(), 3);
        sample.validate().expect("sample validates");
    }

    #[test]
    fn popup_prefixes_positive_values() {
        let sample = FeatureCollection::sample();
        let lines = sample.features[0].popup_summary();
        assert_eq!(
            lines,
            vec![
                "Wheat Field 1".to_string(),
                "Crop: Wheat".to_string(),
                "Yield Change: -5%".to_string(),
                "Temp Anomaly: +1.2°C".to_string(),
                "Precipitation: -12%".to_string(),
            ]
        );
    }

    #[test]
    fn popup_is_empty_without_properties() {
        let mut feature = FeatureCollection::sample().features.remove(0);
        feature.properties = None;
        assert!(feature.popup_summary().is_empty());
    }

    #[test]
    fn rejects_unclosed_ring() {
        let mut sample = FeatureCollection::sample();
        let Geometry::Polygon { coordinates } = &mut sample.features[1].geometry;
        coordinates[0].pop();
        let err = sample.validate().unwrap_err();
        assert!(err.to_string().contains("unclosed"));
    }

    #[test]
    fn rejects_non_finite_attribute() {
        let mut sample = FeatureCollection::sample();
        if let Some(props) = sample.features[2].properties.as_mut() {
            props.yield_change = f64::INFINITY;
        }
        let err = sample.validate().unwrap_err();
        assert!(err.to_string().contains("yield_change"));
    }

    #[test]
    fn rejects_empty_collection() {
        assert!(FeatureCollection::new(Vec::new()).validate().is_err());
    }

    #[test]
    fn parses_geojson_with_null_properties() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": null,
                "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}
            }]
        }"#;
        let collection: FeatureCollection = serde_json::from_str(json).unwrap();
        assert!(collection.features[0].properties.is_none());
        collection.validate().unwrap();
    }

    #[test]
    fn geojson_rejects_unknown_crop() {
        let json = r#"{
            "type": "Feature",
            "properties": {"name": "x", "crop": "barley", "yield_change": 0,
                           "temperature_anomaly": 0, "precipitation_change": 0},
            "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}
        }"#;
        assert!(serde_json::from_str::<Feature>(json).is_err());
    }

    #[test]
    fn crop_display_name_capitalizes() {
        assert_eq!(Crop::Soybeans.display_name(), "Soybeans");
        assert_eq!("cotton".parse::<Crop>(), Ok(Crop::Cotton));
        assert!("barley".parse::<Crop>().is_err());
    }
}
