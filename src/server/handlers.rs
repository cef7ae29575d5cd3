use super::{
    page,
    types::{
        CredentialRequest, ErrorResponse, GenerateRequest, GenerateResponse, StateResponse,
        UploadParams, UploadResponse,
    },
};
use crate::{
    Error,
    inference::InferenceError,
    session::{CredentialError, Session, SubmitError, UploadError},
};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, Json},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

pub type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }
}

pub async fn index() -> Html<&'static str> {
    Html(page::INDEX_HTML)
}

pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    let session = state.session.lock().await;
    Json(snapshot(&session))
}

pub async fn submit_credential(
    State(state): State<AppState>,
    Json(request): Json<CredentialRequest>,
) -> Result<Json<StateResponse>, ApiError> {
    let mut session = state.session.lock().await;
    match session.submit_credential(&request.token) {
        Ok(()) => {
            info!("User-entered API token accepted");
            Ok(Json(snapshot(&session)))
        }
        Err(e) => {
            let (status, Json(mut body)) = session_error(e);
            body.state = Some(session.state());
            Err((status, Json(body)))
        }
    }
}

pub async fn reset_credential(
    State(state): State<AppState>,
) -> Result<Json<StateResponse>, ApiError> {
    let mut session = state.session.lock().await;
    session.reset_credential().map_err(session_error)?;
    Ok(Json(snapshot(&session)))
}

pub async fn upload_dataset(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<Json<UploadResponse>, ApiError> {
    let name = params
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "upload.csv".to_string());
    info!("Received dataset upload '{}' ({} bytes)", name, body.len());

    let mut session = state.session.lock().await;
    match session.upload_dataset(&name, &body) {
        Ok(dataset) => Ok(Json(UploadResponse {
            message: "CSV file uploaded successfully!".to_string(),
            dataset,
        })),
        Err(e) => Err(upload_error(e)),
    }
}

pub async fn clear_dataset(
    State(state): State<AppState>,
) -> Result<Json<StateResponse>, ApiError> {
    let mut session = state.session.lock().await;
    if session.clear_dataset().map_err(upload_error)? {
        info!("Dataset cleared");
    }
    Ok(Json(snapshot(&session)))
}

/// The session lock is held for the whole call, so concurrent submissions
/// queue behind the one in flight.
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let session = state.session.lock().await;
    match session.generate(&request.prompt).await {
        Ok(generation) => Ok(Json(GenerateResponse {
            output: generation.output,
            used_dataset: generation.used_dataset,
        })),
        Err(e) => Err(submit_error(e)),
    }
}

fn snapshot(session: &Session) -> StateResponse {
    StateResponse {
        state: session.state(),
        credential_source: session.credential_source(),
        dataset: session.dataset().map(|d| d.summary()),
        error: session.last_error().map(str::to_string),
    }
}

fn session_error(e: Error) -> ApiError {
    let (status, kind) = match &e {
        Error::Credential(CredentialError::NotUserEntered) => {
            (StatusCode::CONFLICT, "credential_source")
        }
        Error::Credential(_) | Error::Session(_) => (StatusCode::BAD_REQUEST, "credential"),
        Error::InvalidTransition { .. } => (StatusCode::CONFLICT, "invalid_state"),
        _ => {
            error!("Unexpected session failure: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "internal")
        }
    };
    (status, Json(ErrorResponse::new(kind, e.to_string())))
}

fn upload_error(e: UploadError) -> ApiError {
    let message = e.to_string();
    match e {
        UploadError::NotReady { state, .. } => {
            warn!("Rejected dataset operation while credential is {:?}", state);
            let mut body = ErrorResponse::new("credential", message);
            body.state = Some(state);
            (StatusCode::FORBIDDEN, Json(body))
        }
        UploadError::Dataset(e) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "dataset_parse",
                format!("Error reading CSV: {e}"),
            )),
        ),
    }
}

fn submit_error(e: SubmitError) -> ApiError {
    let message = e.to_string();
    match e {
        SubmitError::Prompt(_) => {
            warn!("Rejected generation request with an empty prompt");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::new("empty_prompt", message)),
            )
        }
        SubmitError::NotReady { state, .. } => {
            let mut body = ErrorResponse::new("credential", message);
            body.state = Some(state);
            (StatusCode::FORBIDDEN, Json(body))
        }
        SubmitError::Inference(InferenceError::Transport { .. }) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse::new("transport", message)),
        ),
        SubmitError::Inference(InferenceError::Status { status, body }) => {
            let mut response = ErrorResponse::new("upstream_status", message);
            response.status = Some(status);
            response.body = body;
            (StatusCode::BAD_GATEWAY, Json(response))
        }
        SubmitError::Inference(InferenceError::MalformedResponse { .. }) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse::new("malformed_response", message)),
        ),
    }
}
