//! HTTP API server.
//!
//! Exposes analysis, quiz, flashcard, YouTube and voice-note endpoints as JSON.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::StudyError;
use crate::extract::is_pdf_filename;
use crate::service::{ProcessedDocument, StudyService, VoiceOutcome};
use crate::study::{FlashcardDeck, Quiz, QuizType, SourceKind};
use axum::{
    extract::{multipart::Multipart, rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared application state.
struct AppState {
    service: StudyService,
    started_at: DateTime<Utc>,
    port: u16,
}

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    settings: Settings,
) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let cors = settings.server.cors;

    let service = StudyService::new(settings)?;
    let ai_powered = service.ai_powered();

    let state = Arc::new(AppState {
        service,
        started_at: Utc::now(),
        port,
    });
    let app = router(state, cors);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Study Companion API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    Output::kv(
        "Engine",
        if ai_powered {
            "hosted model with local fallback"
        } else {
            "local"
        },
    );
    println!();
    println!("Endpoints:");
    for endpoint in ENDPOINTS {
        Output::kv(endpoint.path, &format!("{:<4} {}", endpoint.method, endpoint.description));
    }
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>, cors: bool) -> Router {
    let app = Router::new()
        .route("/", get(index))
        .route("/api/status", get(status))
        .route("/api/test", get(test).post(test))
        .route("/api/process-text", post(process_text))
        .route("/api/upload-pdf", post(upload_pdf))
        .route("/api/generate-quiz", post(generate_quiz))
        .route("/api/generate-flashcards", post(generate_flashcards))
        .route("/api/process-youtube", post(process_youtube))
        .route("/api/process-voice", post(process_voice))
        .with_state(state);

    if cors {
        app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        app
    }
}

// === Errors ===

/// An error response: `{"error": "<message>"}` with a status code.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<StudyError> for ApiError {
    fn from(err: StudyError) -> Self {
        let status = match &err {
            StudyError::InvalidInput(_)
            | StudyError::TranscriptsDisabled
            | StudyError::TranscriptNotFound
            | StudyError::SpeechRecognition(_) => StatusCode::BAD_REQUEST,
            StudyError::InsufficientContent(_) | StudyError::Extraction(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("{}", self.message);
        } else {
            info!("Rejected request: {}", self.message);
        }
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Unwrap a JSON body, treating an unreadable body like a missing field.
fn body<T: Default>(payload: Result<Json<T>, JsonRejection>) -> T {
    payload.map(|Json(req)| req).unwrap_or_default()
}

fn present(value: Option<String>, missing: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request(missing))
}

fn parse_source(source: Option<String>) -> Result<SourceKind, ApiError> {
    match source {
        Some(s) => s.parse().map_err(ApiError::bad_request),
        None => Ok(SourceKind::Text),
    }
}

// === Request/Response Types ===

#[derive(Deserialize, Default)]
struct TextRequest {
    text: Option<String>,
}

#[derive(Deserialize, Default)]
struct QuizRequest {
    text: Option<String>,
    quiz_type: Option<String>,
    num_questions: Option<usize>,
    source: Option<String>,
}

#[derive(Deserialize, Default)]
struct FlashcardRequest {
    text: Option<String>,
    num_cards: Option<usize>,
    source: Option<String>,
}

#[derive(Deserialize, Default)]
struct YoutubeRequest {
    video_url: Option<String>,
}

#[derive(Deserialize, Default)]
struct VoiceRequest {
    audio_data: Option<String>,
    #[serde(default)]
    preview_only: bool,
}

#[derive(Serialize, Clone, Copy)]
struct Endpoint {
    path: &'static str,
    method: &'static str,
    description: &'static str,
}

const ENDPOINTS: &[Endpoint] = &[
    Endpoint {
        path: "/api/process-text",
        method: "POST",
        description: "Process text to generate summary and analysis",
    },
    Endpoint {
        path: "/api/upload-pdf",
        method: "POST",
        description: "Upload and process PDF file",
    },
    Endpoint {
        path: "/api/generate-quiz",
        method: "POST",
        description: "Generate quiz questions from text",
    },
    Endpoint {
        path: "/api/generate-flashcards",
        method: "POST",
        description: "Generate flashcards from text",
    },
    Endpoint {
        path: "/api/process-youtube",
        method: "POST",
        description: "Process YouTube video transcript",
    },
    Endpoint {
        path: "/api/process-voice",
        method: "POST",
        description: "Transcribe and analyze a voice recording",
    },
];

#[derive(Serialize)]
struct IndexResponse {
    message: &'static str,
    ai_powered: bool,
    version: &'static str,
    endpoints: &'static [Endpoint],
}

#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    version: &'static str,
    ai_powered: bool,
    platform: String,
    port: u16,
    cors_enabled: bool,
    started_at: DateTime<Utc>,
    uptime_seconds: i64,
}

#[derive(Serialize)]
struct TestResponse {
    status: &'static str,
    message: &'static str,
}

// === Handlers ===

async fn index(State(state): State<Arc<AppState>>) -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Welcome to the Study Companion API",
        ai_powered: state.service.ai_powered(),
        version: VERSION,
        endpoints: ENDPOINTS,
    })
}

async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "online",
        version: VERSION,
        ai_powered: state.service.ai_powered(),
        platform: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
        port: state.port,
        cors_enabled: state.service.settings().server.cors,
        started_at: state.started_at,
        uptime_seconds: (Utc::now() - state.started_at).num_seconds(),
    })
}

async fn test() -> Json<TestResponse> {
    Json(TestResponse {
        status: "success",
        message: "Test endpoint working",
    })
}

async fn process_text(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> ApiResult<ProcessedDocument> {
    let text = present(body(payload).text, "No text provided")?;
    info!("Received text of length {}", text.chars().count());
    Ok(Json(state.service.process_text(&text).await))
}

async fn upload_pdf(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<ProcessedDocument> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(ApiError::bad_request("No file selected"));
        }
        if !is_pdf_filename(&filename) {
            return Err(ApiError::bad_request(
                "Invalid file format. Please upload a PDF file.",
            ));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        info!("Received PDF {} ({} bytes)", filename, bytes.len());

        let result = state.service.process_pdf(bytes.to_vec()).await?;
        return Ok(Json(result));
    }

    Err(ApiError::bad_request("No file part"))
}

async fn generate_quiz(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QuizRequest>, JsonRejection>,
) -> ApiResult<Quiz> {
    let req = body(payload);
    let text = present(req.text, "No text provided")?;
    let quiz_type: QuizType = match req.quiz_type {
        Some(t) => t.parse().map_err(ApiError::bad_request)?,
        None => QuizType::All,
    };
    let count = req
        .num_questions
        .unwrap_or(state.service.settings().generation.default_questions);
    let source = parse_source(req.source)?;

    let quiz = state.service.quiz(&text, quiz_type, count, source).await?;
    Ok(Json(quiz))
}

async fn generate_flashcards(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FlashcardRequest>, JsonRejection>,
) -> ApiResult<FlashcardDeck> {
    let req = body(payload);
    let text = present(req.text, "No text provided")?;
    let count = req
        .num_cards
        .unwrap_or(state.service.settings().generation.default_cards);
    let source = parse_source(req.source)?;

    let deck = state.service.flashcards(&text, count, source).await?;
    Ok(Json(deck))
}

async fn process_youtube(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<YoutubeRequest>, JsonRejection>,
) -> ApiResult<ProcessedDocument> {
    let video_url = present(body(payload).video_url, "No YouTube URL provided")?;
    let result = state.service.process_youtube(&video_url).await?;
    Ok(Json(result))
}

async fn process_voice(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VoiceRequest>, JsonRejection>,
) -> ApiResult<VoiceOutcome> {
    let req = body(payload);
    let audio_data = present(req.audio_data, "No audio data provided")?;
    let outcome = state
        .service
        .process_voice(&audio_data, req.preview_only)
        .await?;
    Ok(Json(outcome))
}
