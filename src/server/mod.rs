use crate::config::{AppSettings, PdfSettings};
use crate::core::gemini::GeminiGenerator;
use crate::core::markdown::render_script;
use crate::core::pdf::export_pdf;
use crate::core::service::ScriptService;
use crate::domain::model::{
    ErrorResponse, RenderResponse, ScriptPayload, ScriptRequest, ScriptResponse,
};
use crate::utils::error::{Result, ScriptError};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

const INDEX_HTML: &str = include_str!("index.html");

pub const GENERATION_FAILED_MESSAGE: &str = "Failed to communicate with the Gemini API.";
pub const SCRIPT_REQUIRED_MESSAGE: &str = "Script is required";

#[derive(Clone)]
pub struct AppState {
    service: ScriptService,
    pdf: Arc<PdfSettings>,
}

impl AppState {
    pub fn new(service: ScriptService, pdf: PdfSettings) -> Self {
        Self {
            service,
            pdf: Arc::new(pdf),
        }
    }
}

/// 以 `{"error": ...}` 回應的 HTTP 錯誤
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ScriptError> for ApiError {
    fn from(err: ScriptError) -> Self {
        match err {
            ScriptError::ValidationError { message } => {
                ApiError::new(StatusCode::BAD_REQUEST, message)
            }
            missing @ ScriptError::MissingApiKey => {
                tracing::error!("Rejecting request: {}", missing);
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, missing.to_string())
            }
            other => {
                tracing::error!(
                    "Gemini API call failed: {} (category: {:?})",
                    other,
                    other.category()
                );
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED_MESSAGE)
            }
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/api/generate", post(generate).fallback(method_not_allowed))
        .route("/api/render", post(render).fallback(method_not_allowed))
        .route("/api/pdf", post(download_pdf).fallback(method_not_allowed))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

async fn generate(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ScriptRequest>, JsonRejection>,
) -> std::result::Result<Json<ScriptResponse>, ApiError> {
    // 無法解析的 body 與缺欄位同樣回 400
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!("Unreadable generate request: {}", rejection.body_text());
            ScriptRequest::default()
        }
    };

    let response = state.service.generate(&request).await?;
    Ok(Json(response))
}

fn script_from(
    payload: std::result::Result<Json<ScriptPayload>, JsonRejection>,
) -> std::result::Result<String, ApiError> {
    match payload {
        Ok(Json(payload)) => Ok(payload.script),
        Err(rejection) => {
            tracing::warn!("Unreadable script payload: {}", rejection.body_text());
            Err(ApiError::new(StatusCode::BAD_REQUEST, SCRIPT_REQUIRED_MESSAGE))
        }
    }
}

async fn render(
    payload: std::result::Result<Json<ScriptPayload>, JsonRejection>,
) -> std::result::Result<Json<RenderResponse>, ApiError> {
    let script = script_from(payload)?;
    Ok(Json(RenderResponse {
        html: render_script(&script),
    }))
}

async fn download_pdf(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ScriptPayload>, JsonRejection>,
) -> std::result::Result<Response, ApiError> {
    let script = script_from(payload)?;
    if script.trim().is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, SCRIPT_REQUIRED_MESSAGE));
    }

    let settings = state.pdf.clone();
    let bytes = tokio::task::spawn_blocking(move || export_pdf(&script, &settings))
        .await
        .map_err(|e| {
            tracing::error!("PDF export task failed: {}", e);
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate PDF")
        })?
        .map_err(|e| {
            tracing::error!("Failed to generate PDF: {}", e);
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate PDF")
        })?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", state.pdf.filename),
        ),
    ];
    Ok((headers, bytes).into_response())
}

/// 建立 Gemini 生成器並啟動 HTTP 服務，直到收到 Ctrl-C
pub async fn serve(settings: &AppSettings) -> Result<()> {
    let generator = GeminiGenerator::new(settings.generator.clone())?;
    if settings.generator.api_key().is_none() {
        tracing::warn!("API_KEY is not set, /api/generate will answer 500 until it is configured");
    }

    let state = AppState::new(
        ScriptService::new(Arc::new(generator)),
        settings.pdf.clone(),
    );

    let listener = tokio::net::TcpListener::bind(settings.bind.as_str()).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
