use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::feature::FeatureCollection;
use crate::layer::Layer;
use crate::view::{MapFrame, MapView};

/// On-disk form of an exported frame.
#[derive(Debug, Serialize, Deserialize)]
pub struct FrameRecord {
    pub generated_at: DateTime<Utc>,
    pub label: String,
    pub frame: MapFrame,
}

pub struct SnapshotWriter {
    output_dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Writes `<output_dir>/<label>/frame_<layer>.json`, replacing any earlier
    /// export of the same layer.
    pub fn write(&self, frame: &MapFrame, label: &str) -> Result<PathBuf> {
        let dir = self.output_dir.join(label);
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create frame directory {}", dir.display()))?;
        let path = dir.join(format!("frame_{}.json", frame.layer));
        let record = FrameRecord {
            generated_at: Utc::now(),
            label: label.to_string(),
            frame: frame.clone(),
        };
        let json = serde_json::to_string_pretty(&record)?;
        fs::write(&path, json)
            .with_context(|| format!("failed to write frame {}", path.display()))?;
        info!(path = %path.display(), layer = %frame.layer, "frame exported");
        Ok(path)
    }

    /// Renders `view` once per entry in `layers` and writes each frame. The
    /// view's other selections (crop, region, opacity) apply to every frame.
    pub fn write_layers(
        &self,
        view: &MapView,
        dataset: &FeatureCollection,
        layers: &[Layer],
        label: &str,
    ) -> Result<Vec<PathBuf>> {
        let mut view = view.clone();
        layers
            .iter()
            .map(|layer| {
                view.set_layer(*layer);
                self.write(&view.render(dataset), label)
            })
            .collect()
    }

    pub fn read(path: impl AsRef<Path>) -> Result<FrameRecord> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read frame {}", path.display()))?;
        let record = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse frame {}", path.display()))?;
        Ok(record)
    }
}
