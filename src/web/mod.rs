mod assets;

use std::{
    convert::Infallible,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::broadcast};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::{
    feature::{FeatureCollection, WeatherStation},
    layer::Layer,
    legend::{self, LegendScale},
    region::{self, MapCenter},
    style::{CropFilter, Opacity},
    view::{MapFrame, MapView},
};

pub struct WebServerConfig {
    pub dataset: FeatureCollection,
    pub view: MapView,
    pub host: String,
    pub port: u16,
}

pub struct AppState {
    dataset: FeatureCollection,
    view: Mutex<MapView>,
    broadcaster: broadcast::Sender<String>,
}

impl AppState {
    pub fn new(dataset: FeatureCollection, view: MapView) -> Self {
        let (broadcaster, _) = broadcast::channel::<String>(64);
        Self {
            dataset,
            view: Mutex::new(view),
            broadcaster,
        }
    }

    fn view(&self) -> MutexGuard<'_, MapView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current_frame(&self) -> MapFrame {
        self.view().render(&self.dataset)
    }

    fn publish(&self, frame: &MapFrame) {
        match serde_json::to_string(frame) {
            Ok(payload) => {
                // No subscribers is not an error.
                let _ = self.broadcaster.send(payload);
            }
            Err(err) => warn!("failed to encode frame for subscribers: {err}"),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/styles.css", get(styles))
        .route("/app.js", get(script))
        .route("/api/frame", get(current_frame))
        .route("/api/style", get(style_dataset))
        .route("/api/legend/:layer", get(legend_for))
        .route("/api/center/:region", get(center_for))
        .route("/api/stations", get(stations))
        .route("/api/view", post(update_view))
        .route("/api/events", get(stream_events))
        .with_state(state)
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig {
        dataset,
        view,
        host,
        port,
    } = config;

    let features = dataset.len();
    let state = Arc::new(AppState::new(dataset, view));
    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("failed to bind {host}:{port}"))?;

    info!(features, "map dashboard live at http://{host}:{port} (Ctrl+C to stop)");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down map dashboard");
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(err: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: err.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

async fn index() -> impl IntoResponse {
    serve_static(&assets::INDEX)
}

async fn styles() -> impl IntoResponse {
    serve_static(&assets::STYLES)
}

async fn script() -> impl IntoResponse {
    serve_static(&assets::SCRIPT)
}

fn serve_static(file: &assets::StaticFile) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, file.content_type)],
        Bytes::from_static(file.body.as_bytes()),
    )
}

async fn current_frame(State(state): State<Arc<AppState>>) -> Json<MapFrame> {
    Json(state.current_frame())
}

#[derive(Debug, Deserialize)]
pub struct StyleQuery {
    layer: String,
    crop: Option<String>,
    region: Option<String>,
    opacity: Option<u8>,
}

/// Styles the dataset for an ad-hoc selection without touching the shared
/// view.
async fn style_dataset(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StyleQuery>,
) -> Result<Json<MapFrame>, ApiError> {
    let layer: Layer = query.layer.parse().map_err(ApiError::bad_request)?;
    let crop = match query.crop.as_deref() {
        Some(raw) => raw.parse::<CropFilter>().map_err(ApiError::bad_request)?,
        None => CropFilter::All,
    };
    let opacity = query.opacity.map(Opacity::new).unwrap_or_default();
    let region = query.region.as_deref().unwrap_or("global");
    let view = MapView::new(layer, crop, region, opacity);
    Ok(Json(view.render(&state.dataset)))
}

async fn legend_for(Path(layer): Path<String>) -> Json<LegendScale> {
    Json(legend::render(&layer))
}

async fn center_for(Path(region): Path<String>) -> Json<MapCenter> {
    Json(region::center_for(&region))
}

async fn stations() -> Json<Vec<WeatherStation>> {
    Json(WeatherStation::samples())
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewUpdate {
    layer: Option<String>,
    crop: Option<String>,
    region: Option<String>,
    opacity: Option<u8>,
}

async fn update_view(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ViewUpdate>,
) -> Result<Json<MapFrame>, ApiError> {
    // Parse everything before touching the view so a bad field changes nothing.
    let layer = update
        .layer
        .as_deref()
        .map(str::parse::<Layer>)
        .transpose()
        .map_err(ApiError::bad_request)?;
    let crop = update
        .crop
        .as_deref()
        .map(str::parse::<CropFilter>)
        .transpose()
        .map_err(ApiError::bad_request)?;

    let frame = {
        let mut view = state.view();
        if let Some(layer) = layer {
            view.set_layer(layer);
        }
        if let Some(crop) = crop {
            view.set_crop(crop);
        }
        if let Some(region) = update.region.as_deref() {
            view.select_region(region);
        }
        if let Some(opacity) = update.opacity {
            view.set_opacity(opacity);
        }
        view.render(&state.dataset)
    };

    debug!(
        layer = %frame.layer,
        crop = %frame.crop,
        region = %frame.region,
        opacity = frame.opacity.percent(),
        "view updated"
    );
    state.publish(&frame);
    Ok(Json(frame))
}

async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.broadcaster.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(payload) => Some(Ok(Event::default().data(payload))),
        Err(_) => None,
    });
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(2))
            .text("keep-alive"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::NEUTRAL_FILL;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(
            FeatureCollection::sample(),
            MapView::default(),
        ))
    }

    #[tokio::test]
    async fn frame_reflects_default_view() {
        let Json(frame) = current_frame(State(state())).await;
        assert_eq!(frame.layer, Layer::Temperature);
        assert_eq!(frame.features.len(), 3);
    }

    #[tokio::test]
    async fn update_view_changes_shared_state_and_broadcasts() {
        let state = state();
        let mut rx = state.broadcaster.subscribe();
        let update = ViewUpdate {
            layer: Some("precipitation".into()),
            crop: Some("soybeans".into()),
            region: Some("asia".into()),
            opacity: Some(30),
        };
        let Json(frame) = update_view(State(state.clone()), Json(update))
            .await
            .expect("valid update");
        assert_eq!(frame.layer, Layer::Precipitation);
        assert_eq!(frame.center.zoom, 4);
        assert_eq!(frame.features[0].style.fill_color, NEUTRAL_FILL);
        assert_eq!(frame.features[2].style.fill_color, "#dfc27d");
        assert_eq!(frame.features[2].style.fill_opacity, 0.3);

        let payload = rx.recv().await.expect("frame broadcast");
        let echoed: MapFrame = serde_json::from_str(&payload).unwrap();
        assert_eq!(echoed, frame);
        assert_eq!(state.current_frame(), frame);
    }

    #[tokio::test]
    async fn bad_layer_is_rejected_without_side_effects() {
        let state = state();
        let update = ViewUpdate {
            layer: Some("soil".into()),
            opacity: Some(10),
            ..ViewUpdate::default()
        };
        let Err(err) = update_view(State(state.clone()), Json(update)).await else {
            panic!("unknown layer should be rejected");
        };
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(state.current_frame().opacity.percent(), 75);
    }

    #[tokio::test]
    async fn style_query_is_stateless() {
        let state = state();
        let query = StyleQuery {
            layer: "crop-yield".into(),
            crop: None,
            region: None,
            opacity: Some(100),
        };
        let Json(frame) = style_dataset(State(state.clone()), Query(query))
            .await
            .expect("valid query");
        assert_eq!(frame.layer, Layer::CropYield);
        assert_eq!(frame.features[0].style.fill_opacity, 1.0);
        assert_eq!(state.current_frame().layer, Layer::Temperature);
    }

    #[tokio::test]
    async fn opacity_updates_keep_region_center() {
        let state = state();
        let select_asia = ViewUpdate {
            region: Some("asia".into()),
            ..ViewUpdate::default()
        };
        let Ok(Json(asia)) = update_view(State(state.clone()), Json(select_asia)).await else {
            panic!("region update accepted");
        };

        for opacity in [20, 45, 90] {
            let drag = ViewUpdate {
                opacity: Some(opacity),
                ..ViewUpdate::default()
            };
            let Ok(Json(frame)) = update_view(State(state.clone()), Json(drag)).await else {
                panic!("opacity update accepted");
            };
            assert_eq!(frame.center, asia.center);
            assert_eq!(frame.region, "asia");
        }
    }

    #[test]
    fn page_script_recenters_only_on_center_change() {
        assert!(assets::SCRIPT.body.contains("centerKey !== appliedCenter"));
        assert!(assets::INDEX.content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn legend_endpoint_falls_back_for_unknown_layer() {
        let Json(legend) = legend_for(Path("rainfall".into())).await;
        assert_eq!(legend.colors.len(), 9);
    }
}
