//! JSON endpoints through which a front end hands queries and photos to the pipeline.

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Query, State},
    http::{header, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::handlers::{IdentificationOutcome, PlantPipeline, SearchOutcome};
use crate::models::{ImageInput, ImageSource};

pub const IMAGE_SOURCE_HEADER: &str = "x-image-source";

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

pub fn create_router(pipeline: Arc<PlantPipeline>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/api/plants", get(search_handler))
        // Photo size is left for the inference provider to judge
        .route(
            "/api/identify",
            post(identify_handler).layer(DefaultBodyLimit::disable()),
        )
        .with_state(pipeline)
}

async fn search_handler(
    State(pipeline): State<Arc<PlantPipeline>>,
    Query(params): Query<SearchParams>,
) -> Json<SearchOutcome> {
    Json(pipeline.search_by_name(&params.q).await)
}

async fn identify_handler(
    State(pipeline): State<Arc<PlantPipeline>>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<IdentificationOutcome> {
    let image = image_from_request(&headers, body);
    Json(pipeline.identify_and_resolve(&image).await)
}

fn image_from_request(headers: &HeaderMap, body: Bytes) -> ImageInput {
    let source = match headers
        .get(IMAGE_SOURCE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_lowercase())
        .as_deref()
    {
        Some("capture") => ImageSource::Capture,
        _ => ImageSource::Upload,
    };

    // Content-Type is the format hint; captures default to JPEG
    let mime_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|v| v.starts_with("image/"))
        .unwrap_or("image/jpeg")
        .to_string();

    ImageInput::new(body.to_vec(), mime_type, source)
}

async fn root_handler() -> &'static str {
    "PlantVision - GET /api/plants?q=<name> or POST an image to /api/identify"
}

async fn health_check() -> &'static str {
    "OK"
}
