pub mod config;
pub mod dataset;
pub mod feature;
pub mod layer;
pub mod legend;
pub mod palette;
pub mod region;
pub mod snapshot;
pub mod style;
pub mod view;
pub mod web;

pub use config::ViewerConfig;
pub use feature::{Crop, Feature, FeatureCollection, FeatureProperties};
pub use layer::Layer;
pub use legend::LegendScale;
pub use region::MapCenter;
pub use style::{style, CropFilter, FeatureStyle, Opacity};
pub use view::{MapFrame, MapView};
