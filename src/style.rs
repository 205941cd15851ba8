//! Choropleth styling for field polygons.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::feature::{Crop, CropParseError, Feature, FeatureProperties};
use crate::layer::Layer;
use crate::palette::{ColorScale, NEUTRAL_FILL};

const STROKE_COLOR: &str = "#fff";
const STROKE_WEIGHT: u32 = 2;
const DASH_ARRAY: &str = "3";
const DIMMED_FILL_OPACITY: f64 = 0.1;

/// Which crops are drawn at full strength.
///
/// Only known crop names parse; an unknown name is a `CropParseError` rather
/// than a filter that dims every field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CropFilter {
    #[default]
    All,
    Only(Crop),
}

impl CropFilter {
    pub fn matches(self, crop: Crop) -> bool {
        match self {
            CropFilter::All => true,
            CropFilter::Only(selected) => selected == crop,
        }
    }
}

impl fmt::Display for CropFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CropFilter::All => f.write_str("all"),
            CropFilter::Only(crop) => write!(f, "{crop}"),
        }
    }
}

impl FromStr for CropFilter {
    type Err = CropParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "all" => Ok(CropFilter::All),
            other => other.parse().map(CropFilter::Only),
        }
    }
}

impl Serialize for CropFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CropFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Layer opacity slider position, 0 to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Opacity(u8);

impl Opacity {
    pub const MAX: u8 = 100;

    pub fn new(percent: u8) -> Self {
        Self(percent.min(Self::MAX))
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    pub fn fraction(self) -> f64 {
        f64::from(self.0) / f64::from(Self::MAX)
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self(75)
    }
}

impl From<u8> for Opacity {
    fn from(value: u8) -> Self {
        Opacity::new(value)
    }
}

impl From<Opacity> for u8 {
    fn from(value: Opacity) -> Self {
        value.0
    }
}

/// Paint instructions handed to the map widget for one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStyle {
    pub fill_color: String,
    #[serde(rename = "color")]
    pub stroke_color: String,
    pub weight: u32,
    pub dash_array: String,
    pub opacity: f64,
    pub fill_opacity: f64,
}

impl FeatureStyle {
    fn base(fill_color: &str, opacity: Opacity) -> Self {
        Self {
            fill_color: fill_color.to_string(),
            stroke_color: STROKE_COLOR.to_string(),
            weight: STROKE_WEIGHT,
            dash_array: DASH_ARRAY.to_string(),
            opacity: opacity.fraction(),
            fill_opacity: opacity.fraction(),
        }
    }
}

/// The attribute a layer reads from a feature.
pub fn layer_value(props: &FeatureProperties, layer: Layer) -> f64 {
    match layer {
        Layer::Temperature => props.temperature_anomaly,
        Layer::Precipitation => props.precipitation_change,
        Layer::CropYield => props.yield_change,
    }
}

/// Picks the fill and opacity for `feature` under the given selection.
///
/// Features without properties get the neutral fill. Features whose crop does
/// not pass `crop_filter` get the neutral fill at a fixed 0.1 fill opacity,
/// whatever the layer.
pub fn style(
    feature: &Feature,
    layer: Layer,
    crop_filter: CropFilter,
    opacity: Opacity,
) -> FeatureStyle {
    let Some(props) = &feature.properties else {
        return FeatureStyle::base(NEUTRAL_FILL, opacity);
    };

    if !crop_filter.matches(props.crop) {
        return FeatureStyle {
            fill_opacity: DIMMED_FILL_OPACITY,
            ..FeatureStyle::base(NEUTRAL_FILL, opacity)
        };
    }

    let fill = ColorScale::for_layer(layer).classify(layer_value(props, layer));
    FeatureStyle::base(fill, opacity)
}
