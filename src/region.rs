use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapCenter {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
}

impl MapCenter {
    pub const fn new(latitude: f64, longitude: f64, zoom: u8) -> Self {
        Self {
            latitude,
            longitude,
            zoom,
        }
    }
}

/// Eastern Nebraska, where the sample fields are.
pub const DEFAULT_CENTER: MapCenter = MapCenter::new(40.75, -96.85, 9);

const REGION_CENTERS: [(&str, MapCenter); 5] = [
    ("global", DEFAULT_CENTER),
    ("north-america", DEFAULT_CENTER),
    ("europe", MapCenter::new(48.85, 2.35, 6)),
    ("africa", MapCenter::new(0.33, 32.58, 6)),
    ("asia", MapCenter::new(35.86, 104.19, 4)),
];

pub fn center_for(region: &str) -> MapCenter {
    REGION_CENTERS
        .iter()
        .find(|(name, _)| *name == region)
        .map(|(_, center)| *center)
        .unwrap_or(DEFAULT_CENTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_regions_recenter() {
        assert_eq!(center_for("europe"), MapCenter::new(48.85, 2.35, 6));
        assert_eq!(center_for("africa"), MapCenter::new(0.33, 32.58, 6));
        assert_eq!(center_for("asia").zoom, 4);
        assert_eq!(center_for("north-america"), DEFAULT_CENTER);
    }

    #[test]
    fn unknown_regions_use_default() {
        assert_eq!(center_for("oceania"), DEFAULT_CENTER);
        assert_eq!(center_for(""), DEFAULT_CENTER);
    }
}
