//! HTTP API server.
//!
//! Serves the library, saved playlists, playlist generation from text or a
//! recorded voice request, and streaming of library files.

use super::start_orchestrator;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::VirtuosaError;
use crate::library::Track;
use crate::orchestrator::Orchestrator;
use crate::playlist::Playlist;
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{info, warn};
use uuid::Uuid;

/// Shared application state.
struct AppState {
    orchestrator: Orchestrator,
}

/// Run the HTTP API server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let orchestrator = start_orchestrator(settings).await?;
    let app = router(Arc::new(AppState { orchestrator }));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Virtuosa API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Library", "GET  /api/library");
    Output::kv("Playlists", "GET  /api/playlists");
    Output::kv("Playlist", "GET  /api/playlists/{id}");
    Output::kv("Create (text)", "POST /api/create-playlist");
    Output::kv("Create (voice)", "POST /api/create-playlist/voice");
    Output::kv("Stream", "GET  /stream/{path}");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let settings = state.orchestrator.settings();
    let music_dir = settings.music_dir();
    let body_limit = settings.server.max_upload_mb * 1024 * 1024;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/library", get(library))
        .route("/api/playlists", get(list_playlists))
        .route("/api/playlists/{id}", get(get_playlist))
        .route("/api/create-playlist", post(create_playlist))
        .route("/api/create-playlist/voice", post(create_playlist_from_voice))
        .nest_service("/stream", ServeDir::new(music_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct CreatePlaylistRequest {
    description: String,
    /// Persist the playlist (default true).
    #[serde(default = "default_save")]
    save: bool,
}

fn default_save() -> bool {
    true
}

#[derive(Serialize)]
struct LibraryResponse<'a> {
    tracks: &'a [Track],
    total: usize,
    skipped: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Error wrapper mapping pipeline failures onto HTTP statuses.
struct ApiError(VirtuosaError);

impl From<VirtuosaError> for ApiError {
    fn from(err: VirtuosaError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            warn!("Request failed: {}", self.0);
        }
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

fn status_for(err: &VirtuosaError) -> StatusCode {
    match err {
        VirtuosaError::NotInitialized => StatusCode::SERVICE_UNAVAILABLE,
        VirtuosaError::BackendTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        VirtuosaError::BackendUnavailable(_) | VirtuosaError::OpenAI(_) => StatusCode::BAD_GATEWAY,
        e if e.is_generation_failure() => StatusCode::BAD_GATEWAY,
        VirtuosaError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        VirtuosaError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn bad_request(msg: impl Into<String>) -> ApiError {
    ApiError(VirtuosaError::InvalidInput(msg.into()))
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn library(State(state): State<Arc<AppState>>) -> Response {
    let catalog = state.orchestrator.catalog();
    Json(LibraryResponse {
        tracks: catalog.tracks(),
        total: catalog.len(),
        skipped: catalog.skipped().len(),
    })
    .into_response()
}

async fn list_playlists(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Playlist>>, ApiError> {
    Ok(Json(state.orchestrator.store().list().await?))
}

async fn get_playlist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Playlist>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| bad_request(format!("invalid playlist id: {}", id)))?;
    Ok(Json(state.orchestrator.store().get(id).await?))
}

async fn create_playlist(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreatePlaylistRequest>, JsonRejection>,
) -> Result<Json<Playlist>, ApiError> {
    let Json(req) = payload.map_err(|e| bad_request(e.body_text()))?;
    let generation = state.orchestrator.generate(&req.description).await?;
    if req.save {
        state.orchestrator.save(&generation.playlist).await?;
    }
    Ok(Json(generation.playlist))
}

async fn create_playlist_from_voice(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Playlist>, ApiError> {
    let mut audio = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("invalid upload: {}", e)))?
    {
        if field.name() == Some("audio") {
            let extension = field
                .file_name()
                .and_then(|name| std::path::Path::new(name).extension())
                .and_then(|ext| ext.to_str())
                .unwrap_or("wav")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| bad_request(format!("invalid upload: {}", e)))?;
            audio = Some((extension, bytes));
            break;
        }
    }

    let (extension, bytes) = audio.ok_or_else(|| bad_request("No audio file provided."))?;
    if bytes.is_empty() {
        return Err(bad_request("Uploaded audio file is empty."));
    }

    // Kept alive until transcription finishes
    let temp_audio = tempfile::Builder::new()
        .prefix("virtuosa-request-")
        .suffix(&format!(".{}", extension))
        .tempfile()
        .map_err(VirtuosaError::from)?;
    tokio::fs::write(temp_audio.path(), &bytes)
        .await
        .map_err(VirtuosaError::from)?;
    info!("Received voice request ({} bytes)", bytes.len());

    let generation = state.orchestrator.generate_from_voice(temp_audio.path()).await?;
    state.orchestrator.save(&generation.playlist).await?;

    Ok(Json(generation.playlist))
}
