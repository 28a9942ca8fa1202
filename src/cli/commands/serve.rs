//! HTTP API server.
//!
//! `POST /analyze` acquires a transcript, generates notes and opens a chat
//! session; `POST /sessions/{id}/chat` answers questions within it. Sessions
//! are held in memory; once `--max-sessions` are open, the oldest one is
//! dropped for each new session.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::NoteVidyaError;
use crate::orchestrator::Orchestrator;
use crate::session::{ChatSession, ChatTurn};
use crate::transcript::TranscriptSource;
use crate::vector_store::ScoredChunk;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use uuid::Uuid;

/// Open sessions, oldest first.
#[derive(Default)]
struct SessionMap {
    by_id: HashMap<Uuid, Arc<Mutex<ChatSession>>>,
    order: VecDeque<Uuid>,
}

/// Shared application state.
pub(crate) struct AppState {
    orchestrator: Orchestrator,
    sessions: RwLock<SessionMap>,
    max_sessions: usize,
}

impl AppState {
    pub(crate) fn new(orchestrator: Orchestrator, max_sessions: usize) -> Self {
        Self {
            orchestrator,
            sessions: RwLock::new(SessionMap::default()),
            max_sessions: max_sessions.max(1),
        }
    }

    async fn session(&self, id: Uuid) -> Result<Arc<Mutex<ChatSession>>, ApiError> {
        self.sessions
            .read()
            .await
            .by_id
            .get(&id)
            .cloned()
            .ok_or(ApiError::SessionNotFound(id))
    }

    /// Store a new session, evicting the oldest ones beyond the cap.
    async fn open_session(&self, session: ChatSession) -> Uuid {
        let id = session.id();
        let mut sessions = self.sessions.write().await;
        sessions.by_id.insert(id, Arc::new(Mutex::new(session)));
        sessions.order.push_back(id);

        while sessions.by_id.len() > self.max_sessions {
            let Some(oldest) = sessions.order.pop_front() else {
                break;
            };
            sessions.by_id.remove(&oldest);
            info!("Evicted session {}", oldest);
        }
        id
    }
}

/// Run the HTTP API server.
pub async fn run_serve(
    host: &str,
    port: u16,
    max_sessions: usize,
    settings: Settings,
    config: Option<&str>,
) -> anyhow::Result<()> {
    let orchestrator = preflight::orchestrator(settings, config)?;
    let app = router(Arc::new(AppState::new(orchestrator, max_sessions)));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("NoteVidya API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Analyze", "POST /analyze");
    Output::kv("Chat", "POST /sessions/{id}/chat");
    Output::kv("History", "GET  /sessions/{id}/history");
    println!();
    Output::kv("Session cap", &max_sessions.to_string());
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

pub(crate) fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .route("/sessions/{id}/chat", post(chat))
        .route("/sessions/{id}/history", get(history))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct AnalyzeRequest {
    url: String,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    session_id: Uuid,
    video_id: String,
    canonical_url: String,
    transcript: String,
    transcript_source: TranscriptSource,
    warnings: Vec<String>,
    notes: Option<String>,
    notes_error: Option<String>,
}

#[derive(Deserialize)]
struct ChatRequest {
    question: String,
}

#[derive(Serialize)]
struct ChatResponse {
    answer: String,
    sources: Vec<ScoredChunk>,
}

#[derive(Serialize)]
struct HistoryResponse {
    session_id: Uuid,
    video_id: String,
    turns: Vec<ChatTurn>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
}

enum ApiError {
    SessionNotFound(Uuid),
    Pipeline {
        error: NoteVidyaError,
        warnings: Vec<String>,
    },
}

impl From<NoteVidyaError> for ApiError {
    fn from(error: NoteVidyaError) -> Self {
        ApiError::Pipeline {
            error,
            warnings: Vec::new(),
        }
    }
}

fn status_for(error: &NoteVidyaError) -> StatusCode {
    if error.is_input_error() {
        return StatusCode::BAD_REQUEST;
    }
    match error {
        NoteVidyaError::Config(_)
        | NoteVidyaError::MissingCredential(_)
        | NoteVidyaError::Io(_)
        | NoteVidyaError::Json(_)
        | NoteVidyaError::TomlParse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: format!("Session not found: {}", id),
                    warnings: Vec::new(),
                },
            ),
            ApiError::Pipeline { error, warnings } => (
                status_for(&error),
                ErrorResponse {
                    error: error.to_string(),
                    warnings,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let orchestrator = &state.orchestrator;
    let video = orchestrator.resolve_video(&req.url)?;

    let acquisition = orchestrator.acquire(&video).await;
    let warnings = acquisition.warnings.clone();
    let transcript = acquisition.into_result().map_err(|error| ApiError::Pipeline {
        error,
        warnings: warnings.clone(),
    })?;

    let (notes, notes_error) = match orchestrator.generate_notes(&transcript.text).await {
        Ok(n) => (Some(n), None),
        Err(e) => {
            warn!("Notes generation failed: {}", e);
            (None, Some(e.to_string()))
        }
    };

    let video_id = video.id().to_string();
    let canonical_url = video.canonical_url().to_string();
    let text = transcript.text.clone();
    let transcript_source = transcript.source;

    let session_id = state
        .open_session(orchestrator.new_session(video, transcript))
        .await;
    info!("Opened session {}", session_id);

    let response = AnalyzeResponse {
        session_id,
        video_id,
        canonical_url,
        transcript: text,
        transcript_source,
        warnings,
        notes,
        notes_error,
    };

    Ok(Json(response))
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let session = state.session(id).await?;
    let mut session = session.lock().await;

    let response = state.orchestrator.ask(&mut session, &req.question).await?;
    Ok(Json(ChatResponse {
        answer: response.answer,
        sources: response.sources,
    }))
}

async fn history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let session = state.session(id).await?;
    let session = session.lock().await;

    Ok(Json(HistoryResponse {
        session_id: id,
        video_id: session.video().id().to_string(),
        turns: session.history().to_vec(),
    }))
}
