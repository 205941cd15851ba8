use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Thematic overlay drawn over the field polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layer {
    Temperature,
    Precipitation,
    CropYield,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown data layer '{0}' (expected temperature, precipitation or crop-yield)")]
pub struct LayerParseError(pub String);

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Temperature, Layer::Precipitation, Layer::CropYield];

    pub fn id(self) -> &'static str {
        match self {
            Layer::Temperature => "temperature",
            Layer::Precipitation => "precipitation",
            Layer::CropYield => "crop-yield",
        }
    }

    /// Sidebar heading for the layer tab.
    pub fn title(self) -> &'static str {
        match self {
            Layer::Temperature => "Temperature Anomalies",
            Layer::Precipitation => "Rainfall Patterns",
            Layer::CropYield => "Crop Yield Changes",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Layer::Temperature => {
                "Temperature anomalies shown as deviation from the 1951-1980 baseline."
            }
            Layer::Precipitation => {
                "Precipitation patterns showing deviation from historical averages."
            }
            Layer::CropYield => "Crop yield projections compared to previous 5-year average.",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Layer {
    type Err = LayerParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Layer::ALL
            .into_iter()
            .find(|layer| layer.id() == value.trim())
            .ok_or_else(|| LayerParseError(value.to_string()))
    }
}
