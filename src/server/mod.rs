//! HTTP service - upstream boundary and tool peer surface
//!
//! Endpoints:
//!
//! - `POST /api/assist` — multipart request with a `prompt` text field and
//!   an optional `audio` file; runs one assistant session
//! - `POST /tools/list` — tool catalog
//! - `POST /tools/call` — execute one tool
//! - `GET  /health`     — liveness probe

pub mod transcribe;

pub use transcribe::TranscriptionClient;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::agent::Orchestrator;
use crate::core::error::KalenteriError;
use crate::core::{Result, ToolOutput, ToolSpec};
use crate::tools::ToolRegistry;

/// Shared state for the HTTP service
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub registry: Arc<ToolRegistry>,
    pub transcriber: Option<TranscriptionClient>,
}

/// Response for one assistant session
#[derive(Debug, Serialize)]
pub struct AssistResponse {
    pub answer: String,
    pub tool_calls: u32,
}

#[derive(Debug, Serialize)]
struct ToolListing {
    tools: Vec<ToolSpec>,
}

#[derive(Debug, Deserialize)]
struct CallToolRequest {
    name: String,
    #[serde(default)]
    arguments: serde_json::Value,
}

/// Build the service router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/assist", post(assist_handler))
        .route("/tools/list", post(list_tools_handler))
        .route("/tools/call", post(call_tool_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until shutdown
pub async fn serve(state: Arc<AppState>, host: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, router(state))
        .await
        .map_err(KalenteriError::from)?;

    Ok(())
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn assist_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> std::result::Result<Json<AssistResponse>, (StatusCode, String)> {
    let mut prompt = String::new();
    let mut audio: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("bad multipart body: {}", e)))?
    {
        match field.name() {
            Some("prompt") => {
                prompt = field
                    .text()
                    .await
                    .map_err(|e| (StatusCode::BAD_REQUEST, format!("bad prompt field: {}", e)))?;
            }
            Some("audio") => {
                let filename = field.file_name().unwrap_or("audio.wav").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| (StatusCode::BAD_REQUEST, format!("bad audio field: {}", e)))?;
                audio = Some((bytes.to_vec(), filename));
            }
            _ => {}
        }
    }

    // A transcript, when present, extends the typed prompt
    if let Some((bytes, filename)) = audio {
        let Some(ref transcriber) = state.transcriber else {
            return Err((
                StatusCode::BAD_REQUEST,
                "audio uploads require a configured transcription endpoint".to_string(),
            ));
        };

        let transcript = transcriber.transcribe(bytes, &filename).await.map_err(|e| {
            error!(%e, "transcription failed");
            (StatusCode::BAD_GATEWAY, e.to_string())
        })?;

        if prompt.is_empty() {
            prompt = transcript;
        } else {
            prompt = format!("{} {}", prompt, transcript);
        }
    }

    if prompt.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "request carried neither a prompt nor audio".to_string(),
        ));
    }

    let outcome = state.orchestrator.run(&prompt).await.map_err(|e| {
        error!(%e, "session failed");
        (StatusCode::BAD_GATEWAY, e.to_string())
    })?;

    Ok(Json(AssistResponse {
        answer: outcome.answer,
        tool_calls: outcome.tool_call_count,
    }))
}

async fn list_tools_handler(State(state): State<Arc<AppState>>) -> Json<ToolListing> {
    Json(ToolListing {
        tools: state.registry.specs().to_vec(),
    })
}

async fn call_tool_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CallToolRequest>,
) -> std::result::Result<Json<ToolOutput>, (StatusCode, String)> {
    match state.registry.execute(&request.name, &request.arguments).await {
        Ok(output) => Ok(Json(output)),
        Err(e @ KalenteriError::ToolExecution(_)) => Err((StatusCode::BAD_REQUEST, e.to_string())),
        Err(e) => {
            error!(%e, tool = %request.name, "tool execution failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
