use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;

use crate::feature::FeatureCollection;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("dataset validation error: {0}")]
    Validation(String),
}

/// Reads GeoJSON-shaped feature collections from disk. `.json` and
/// `.geojson` files go through serde_json, everything else through serde_yaml.
pub struct DatasetLoader {
    base_dir: PathBuf,
}

impl DatasetLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<FeatureCollection, DatasetError> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path).map_err(|source| DatasetError::Io {
            path: path.clone(),
            source,
        })?;
        let collection = if is_json(&path) {
            serde_json::from_str::<FeatureCollection>(&data).map_err(|source| {
                DatasetError::Json {
                    path: path.clone(),
                    source,
                }
            })?
        } else {
            serde_yaml::from_str::<FeatureCollection>(&data).map_err(|source| {
                DatasetError::Yaml {
                    path: path.clone(),
                    source,
                }
            })?
        };
        collection.validate()?;
        debug!(path = %path.display(), features = collection.len(), "dataset loaded");
        Ok(collection)
    }
}

fn is_json(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("json") | Some("geojson")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_extension_detection() {
        assert!(is_json(Path::new("fields.geojson")));
        assert!(is_json(Path::new("fields.json")));
        assert!(!is_json(Path::new("fields.yaml")));
        assert!(!is_json(Path::new("fields")));
    }

    #[test]
    fn missing_file_reports_path() {
        let loader = DatasetLoader::new(std::env::temp_dir());
        let err = loader.load("definitely_missing_dataset.yaml").unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
        assert!(err.to_string().contains("definitely_missing_dataset.yaml"));
    }
}
