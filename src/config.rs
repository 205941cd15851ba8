//! Viewer configuration loaded from YAML

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::layer::Layer;
use crate::style::{CropFilter, Opacity};
use crate::view::MapView;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Feature collection to serve instead of the bundled sample fields.
    #[serde(default)]
    pub dataset: Option<PathBuf>,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default = "default_layer")]
    pub layer: Layer,
    #[serde(default)]
    pub crop: CropFilter,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub opacity: Opacity,
}

fn default_layer() -> Layer {
    Layer::Temperature
}

fn default_region() -> String {
    "global".to_string()
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            layer: default_layer(),
            crop: CropFilter::All,
            region: default_region(),
            opacity: Opacity::default(),
        }
    }
}

impl ViewConfig {
    pub fn build_view(&self) -> MapView {
        MapView::new(self.layer, self.crop, &self.region, self.opacity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("frames")
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ViewerConfig {
    /// Load configuration from a YAML file. A relative `dataset` path is taken
    /// relative to the directory holding the config file.
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: ViewerConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        if let (Some(dataset), Some(base)) = (config.dataset.as_mut(), path.parent()) {
            if dataset.is_relative() {
                *dataset = base.join(&*dataset);
            }
        }
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn to_yaml(&self, path: impl AsRef<Path>) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write {}", path.as_ref().display()))?;
        Ok(())
    }
}
