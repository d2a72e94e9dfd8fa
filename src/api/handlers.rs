//! API request handlers
//!
//! Each editor endpoint turns its request into an [`EditorEvent`] and hands it
//! to the session's [`Editor`](crate::editor::Editor).

use std::fmt::Display;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::server::AppState;
use crate::editor::{EditorEvent, EditorOutcome, GridEdit};
use crate::error::EditorError;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error reply: a status code plus an `ApiResponse` with the message
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Display) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.to_string(),
        }
    }

    fn session_not_found(id: &Uuid) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("session {} not found", id),
        }
    }
}

impl From<EditorError> for ApiError {
    fn from(err: EditorError) -> Self {
        let status = match &err {
            EditorError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            EditorError::Ingestion(_) => StatusCode::UNPROCESSABLE_ENTITY,
            EditorError::Edit(_) => StatusCode::BAD_REQUEST,
            EditorError::Session(_) => StatusCode::CONFLICT,
            EditorError::Export(_) | EditorError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::err(self.message))).into_response()
    }
}

/// Upload response
#[derive(Serialize, Default)]
pub struct UploadResponse {
    pub file_name: String,
    pub size: usize,
    pub message: String,
}

/// Load response
#[derive(Serialize, Default)]
pub struct LoadResponse {
    pub format: String,
    pub sheet_names: Vec<String>,
    pub message: String,
}

impl IntoResponse for EditorOutcome {
    fn into_response(self) -> Response {
        match self {
            EditorOutcome::Uploaded { file_name, size } => Json(ApiResponse::ok(UploadResponse {
                file_name,
                size,
                message: "File uploaded. Press Load Workbook to open it.".to_string(),
            }))
            .into_response(),
            EditorOutcome::Loaded {
                format,
                sheet_names,
            } => Json(ApiResponse::ok(LoadResponse {
                format: format.to_string(),
                sheet_names,
                message: "Workbook loaded successfully".to_string(),
            }))
            .into_response(),
            EditorOutcome::Grid(view) => Json(ApiResponse::ok(view)).into_response(),
            EditorOutcome::Download(download) => (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, download.mime.to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", download.file_name),
                    ),
                ],
                download.bytes,
            )
                .into_response(),
        }
    }
}

/// Run one event against a session, holding its lock for the whole event
async fn dispatch(state: &AppState, id: Uuid, event: EditorEvent) -> Result<Response, ApiError> {
    let editor = state
        .sessions
        .get(&id)
        .await
        .ok_or_else(|| ApiError::session_not_found(&id))?;
    let mut editor = editor.lock().await;
    Ok(editor.handle(event)?.into_response())
}

/// GET / - Grid page
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}

/// API info response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(method: &str, path: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET /api/v1 - Endpoint listing
pub async fn api_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(RootResponse {
        name: "Workbook Editor".to_string(),
        version: state.version.clone(),
        description: "Upload, edit and download Excel or CSV workbooks".to_string(),
        endpoints: vec![
            EndpointInfo::new("GET", "/health", "Health check endpoint"),
            EndpointInfo::new("GET", "/version", "Get server version"),
            EndpointInfo::new("POST", "/api/v1/sessions", "Start an editing session"),
            EndpointInfo::new("DELETE", "/api/v1/sessions/:id", "Discard a session"),
            EndpointInfo::new(
                "POST",
                "/api/v1/sessions/:id/upload",
                "Stage a file (multipart field 'file')",
            ),
            EndpointInfo::new("POST", "/api/v1/sessions/:id/load", "Load the staged file"),
            EndpointInfo::new("GET", "/api/v1/sessions/:id/grid", "Show a sheet"),
            EndpointInfo::new("POST", "/api/v1/sessions/:id/edit", "Edit a sheet"),
            EndpointInfo::new(
                "GET",
                "/api/v1/sessions/:id/download",
                "Download the edited workbook",
            ),
        ],
    }))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub formats: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        formats: vec!["xlsx".to_string(), "xls".to_string(), "csv".to_string()],
    }))
}

/// Session response
#[derive(Serialize, Default)]
pub struct SessionResponse {
    pub session_id: String,
}

/// POST /api/v1/sessions - Start a session
pub async fn create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let id = state.sessions.create().await;
    info!(session = %id, "session created");
    (
        StatusCode::CREATED,
        Json(ApiResponse::ok(SessionResponse {
            session_id: id.to_string(),
        })),
    )
}

/// DELETE /api/v1/sessions/:id - Discard a session
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&id).await {
        info!(session = %id, "session discarded");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::session_not_found(&id))
    }
}

/// POST /api/v1/sessions/:id/upload - Stage a file
pub async fn upload(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut file = None;
    while let Some(field) = multipart.next_field().await.map_err(ApiError::bad_request)? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(ApiError::bad_request)?;
        file = Some((file_name, bytes.to_vec()));
    }

    let (file_name, bytes) =
        file.ok_or_else(|| ApiError::bad_request("missing multipart field 'file'"))?;
    dispatch(&state, id, EditorEvent::Upload { file_name, bytes }).await
}

/// POST /api/v1/sessions/:id/load - "Load Workbook"
pub async fn load(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    dispatch(&state, id, EditorEvent::Load).await
}

/// Grid query
#[derive(Deserialize, Default)]
pub struct GridQuery {
    pub sheet: Option<String>,
}

/// GET /api/v1/sessions/:id/grid - Show a sheet
pub async fn grid(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<GridQuery>,
) -> Result<Response, ApiError> {
    dispatch(&state, id, EditorEvent::View { sheet: query.sheet }).await
}

/// Edit request
#[derive(Deserialize)]
pub struct EditRequest {
    #[serde(default)]
    pub sheet: Option<String>,
    pub edit: GridEdit,
}

/// POST /api/v1/sessions/:id/edit - Apply an edit
pub async fn edit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<EditRequest>,
) -> Result<Response, ApiError> {
    let event = EditorEvent::Edit {
        sheet: req.sheet,
        edit: req.edit,
    };
    dispatch(&state, id, event).await
}

/// GET /api/v1/sessions/:id/download - Download the workbook
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    dispatch(&state, id, EditorEvent::Download).await
}
