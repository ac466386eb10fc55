//! Request handlers.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use memo_media::FaceBox;
use memo_models::{CreateScriptRequest, ExtractFacesRequest, ExtractFacesResponse, Script};
use serde::Serialize;
use tracing::info;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Root endpoint.
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Hello World" }))
}

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// `POST /create`: run the full script pipeline for the submitted assets.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateScriptRequest>,
) -> ApiResult<Json<Script>> {
    request.validate()?;

    let script_type = request.script_type.to_string();
    let start = Instant::now();

    match state.pipeline.generate(request).await {
        Ok(script) => {
            let duration = start.elapsed().as_secs_f64();
            info!(
                title = %script.title,
                scenes = script.scenes.len(),
                duration_secs = duration,
                "Script generated"
            );
            metrics::record_script_generated(&script_type, script.scenes.len(), duration);
            Ok(Json(script))
        }
        Err(e) => {
            metrics::record_script_failed(&script_type);
            Err(e.into())
        }
    }
}

/// `POST /extractFaces`: detect faces in each submitted image and return the
/// crops. An empty `images` array is a valid request with an empty result; a
/// missing `images` field is a client error.
pub async fn extract_faces(
    State(state): State<AppState>,
    Json(request): Json<ExtractFacesRequest>,
) -> ApiResult<Json<ExtractFacesResponse>> {
    let images = request
        .images
        .ok_or_else(|| ApiError::bad_request("images array is required"))?;

    let mut faces = Vec::new();
    for image in images {
        let detected = state.vision.detect_faces(&image).await?;
        if detected.is_empty() {
            continue;
        }

        let boxes: Vec<FaceBox> = detected
            .iter()
            .map(|f| FaceBox {
                x: f.x,
                y: f.y,
                width: f.width,
                height: f.height,
            })
            .collect();

        let crops = tokio::task::spawn_blocking(move || memo_media::crop_faces(&image, &boxes))
            .await
            .map_err(|e| ApiError::internal(e.to_string()))??;
        faces.extend(crops);
    }

    info!(faces = faces.len(), "Extracted face crops");
    metrics::record_faces_extracted(faces.len());

    Ok(Json(ExtractFacesResponse {
        success: true,
        faces,
    }))
}
