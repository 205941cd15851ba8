//! Static color scales for the three data layers.
//!
//! Each scale holds five colors ordered from the lowest bucket to the highest
//! and four cut points ordered from the highest to the lowest. A value lands in
//! the first bucket whose cut point it strictly exceeds; anything left over
//! (including NaN) falls into the lowest bucket.

use crate::layer::Layer;

/// Fill used for features without properties and for dimmed features.
pub const NEUTRAL_FILL: &str = "#cccccc";

pub const BUCKETS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    /// Descending cut points; `thresholds[i]` guards `colors[BUCKETS - 1 - i]`.
    pub thresholds: [f64; BUCKETS - 1],
    /// Ascending colors, lowest bucket first.
    pub colors: [&'static str; BUCKETS],
    /// Legend labels aligned with `colors`.
    pub labels: [&'static str; BUCKETS],
}

const TEMPERATURE: ColorScale = ColorScale {
    thresholds: [2.0, 1.0, 0.0, -1.0],
    colors: ["#053061", "#4393c3", "#e6f598", "#f46d43", "#9e0142"],
    labels: ["-3.0°C", "-1.5°C", "0°C", "+1.5°C", "+3.0°C"],
};

const PRECIPITATION: ColorScale = ColorScale {
    thresholds: [30.0, 10.0, -10.0, -30.0],
    colors: ["#a6611a", "#dfc27d", "#f5f5f5", "#80cdc1", "#018571"],
    labels: ["-50%", "-25%", "Normal", "+25%", "+50%"],
};

const CROP_YIELD: ColorScale = ColorScale {
    thresholds: [20.0, 10.0, -10.0, -20.0],
    colors: ["#a50026", "#f46d43", "#ffffbf", "#74add1", "#313695"],
    labels: ["-30%", "-15%", "No change", "+15%", "+30%"],
};

/// Sequential blue ramp used when no layer scale applies.
pub const FALLBACK_GRADIENT: [&str; 9] = [
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#08519c",
    "#08306b",
];

pub const FALLBACK_LABELS: [&str; 9] = ["Low", "", "", "", "Medium", "", "", "", "High"];

impl ColorScale {
    pub fn for_layer(layer: Layer) -> &'static ColorScale {
        match layer {
            Layer::Temperature => &TEMPERATURE,
            Layer::Precipitation => &PRECIPITATION,
            Layer::CropYield => &CROP_YIELD,
        }
    }

    /// Index of the bucket `value` falls into, 0 being the lowest.
    pub fn bucket(&self, value: f64) -> usize {
        self.thresholds
            .iter()
            .position(|threshold| value > *threshold)
            .map(|rank| BUCKETS - 1 - rank)
            .unwrap_or(0)
    }

    pub fn classify(&self, value: f64) -> &'static str {
        self.colors[self.bucket(value)]
    }
}
