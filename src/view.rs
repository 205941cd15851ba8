use serde::{Deserialize, Serialize};

use crate::feature::{FeatureCollection, Geometry};
use crate::layer::Layer;
use crate::legend::LegendScale;
use crate::region::{center_for, MapCenter};
use crate::style::{style, CropFilter, FeatureStyle, Opacity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledFeature {
    pub name: Option<String>,
    pub popup: Vec<String>,
    pub geometry: Geometry,
    pub style: FeatureStyle,
}

/// Everything the page needs to paint one view of the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapFrame {
    pub layer: Layer,
    pub title: String,
    pub description: String,
    pub crop: CropFilter,
    pub region: String,
    pub opacity: Opacity,
    pub center: MapCenter,
    pub legend: LegendScale,
    pub features: Vec<StyledFeature>,
}

/// Selection state owned by the map page. Styling reads it by value on every
/// render.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    layer: Layer,
    crop: CropFilter,
    region: String,
    opacity: Opacity,
    center: MapCenter,
}

impl Default for MapView {
    fn default() -> Self {
        Self::new(Layer::Temperature, CropFilter::All, "global", Opacity::default())
    }
}

impl MapView {
    pub fn new(layer: Layer, crop: CropFilter, region: &str, opacity: Opacity) -> Self {
        Self {
            layer,
            crop,
            region: region.to_string(),
            opacity,
            center: center_for(region),
        }
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn crop(&self) -> CropFilter {
        self.crop
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn opacity(&self) -> Opacity {
        self.opacity
    }

    pub fn center(&self) -> MapCenter {
        self.center
    }

    pub fn set_layer(&mut self, layer: Layer) {
        self.layer = layer;
    }

    pub fn set_crop(&mut self, crop: CropFilter) {
        self.crop = crop;
    }

    pub fn set_opacity(&mut self, percent: u8) {
        self.opacity = Opacity::new(percent);
    }

    /// Switches region and recenters. Reselecting the current region keeps
    /// whatever center the view already has.
    pub fn select_region(&mut self, region: &str) -> MapCenter {
        if self.region != region {
            self.region = region.to_string();
            self.center = center_for(region);
        }
        self.center
    }

    pub fn render(&self, collection: &FeatureCollection) -> MapFrame {
        let features = collection
            .features
            .iter()
            .map(|feature| StyledFeature {
                name: feature.name().map(str::to_string),
                popup: feature.popup_summary(),
                geometry: feature.geometry.clone(),
                style: style(feature, self.layer, self.crop, self.opacity),
            })
            .collect();

        MapFrame {
            layer: self.layer,
            title: self.layer.title().to_string(),
            description: self.layer.description().to_string(),
            crop: self.crop,
            region: self.region.clone(),
            opacity: self.opacity,
            center: self.center,
            legend: LegendScale::for_layer(self.layer),
            features,
        }
    }
}
