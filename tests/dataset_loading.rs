use std::fs;

use geoagrisense::{
    dataset::{DatasetError, DatasetLoader},
    layer::Layer,
    palette::NEUTRAL_FILL,
    view::MapView,
};
use tempfile::tempdir;

fn loader() -> DatasetLoader {
    DatasetLoader::new(env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn loads_yaml_fixture() {
    let collection = loader()
        .load("datasets/nebraska_fields.yaml")
        .expect("fixture parses");
    assert_eq!(collection.len(), 4);
    assert!(collection.features[3].properties.is_none());
}

#[test]
fn fixture_without_properties_renders_neutral() {
    let collection = loader().load("datasets/nebraska_fields.yaml").unwrap();
    let mut view = MapView::default();
    view.set_layer(Layer::Precipitation);
    let frame = view.render(&collection);
    assert_eq!(frame.features[1].style.fill_color, "#80cdc1");
    assert_eq!(frame.features[3].style.fill_color, NEUTRAL_FILL);
    assert_eq!(frame.features[3].style.fill_opacity, 0.75);
    assert!(frame.features[3].popup.is_empty());
}

#[test]
fn loads_geojson_by_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fields.geojson");
    fs::write(
        &path,
        r#"{"type":"FeatureCollection","features":[{"type":"Feature",
            "properties":{"name":"Rice Paddy","crop":"rice","yield_change":22,
                          "temperature_anomaly":-1.5,"precipitation_change":40},
            "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}}]}"#,
    )
    .unwrap();
    let collection = DatasetLoader::new(dir.path()).load("fields.geojson").unwrap();
    assert_eq!(collection.features[0].name(), Some("Rice Paddy"));
}

#[test]
fn missing_attribute_is_rejected_at_load() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("broken.yaml"),
        "features:\n  - properties:\n      name: Half\n      crop: wheat\n    geometry:\n      type: Polygon\n      coordinates: [[[0, 0], [1, 0], [1, 1], [0, 0]]]\n",
    )
    .unwrap();
    let err = DatasetLoader::new(dir.path()).load("broken.yaml").unwrap_err();
    assert!(matches!(err, DatasetError::Yaml { .. }), "got {err}");
}

#[test]
fn non_polygon_geometry_is_rejected() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("points.json"),
        r#"{"features":[{"properties":null,"geometry":{"type":"Point","coordinates":[0,0]}}]}"#,
    )
    .unwrap();
    let err = DatasetLoader::new(dir.path()).load("points.json").unwrap_err();
    assert!(matches!(err, DatasetError::Json { .. }));
}

#[test]
fn empty_collection_fails_validation() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("empty.yaml"), "features: []\n").unwrap();
    let err = DatasetLoader::new(dir.path()).load("empty.yaml").unwrap_err();
    assert!(matches!(err, DatasetError::Validation(_)));
}
