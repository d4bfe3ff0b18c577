//! HTTP surface: upload and chat endpoints plus the static front-end.

use std::path::Path;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use ragchat_core::{
    Answer, ChatModel, Embedder, RagChatConfig, RagChatError, Result, VectorIndex,
};

use crate::service::{connect, RagChatService};

/// Request body for the chat endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's question.
    pub message: String,
}

/// Response body for the upload endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Human-readable summary.
    pub message: String,
}

/// Build the application router around a service.
pub fn router<E, V, C>(service: Arc<RagChatService<E, V, C>>, static_dir: &Path) -> Router
where
    E: Embedder + 'static,
    V: VectorIndex + 'static,
    C: ChatModel + 'static,
{
    Router::new()
        .route("/upload", post(upload::<E, V, C>))
        .route("/chat", post(chat::<E, V, C>))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Run the HTTP server until shutdown.
pub async fn serve(config: RagChatConfig) -> Result<()> {
    let service = Arc::new(connect(&config).await?);
    let app = router(service, &config.server.static_dir);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn upload<E, V, C>(
    State(service): State<Arc<RagChatService<E, V, C>>>,
    mut multipart: Multipart,
) -> std::result::Result<Json<UploadResponse>, ApiError>
where
    E: Embedder,
    V: VectorIndex,
    C: ChatModel,
{
    let mut uploaded = 0;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RagChatError::http(format!("Invalid multipart request: {}", e)))?
    {
        let filename = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("upload-{}", uploaded));

        let bytes = field
            .bytes()
            .await
            .map_err(|e| RagChatError::http(format!("Failed to read upload: {}", e)))?;

        service.upload_document(&filename, &bytes).await?;
        uploaded += 1;
    }

    Ok(Json(UploadResponse {
        message: format!("Successfully processed {} files.", uploaded),
    }))
}

async fn chat<E, V, C>(
    State(service): State<Arc<RagChatService<E, V, C>>>,
    Json(request): Json<ChatRequest>,
) -> std::result::Result<Json<Answer>, ApiError>
where
    E: Embedder,
    V: VectorIndex,
    C: ChatModel,
{
    let answer = service.chat(&request.message).await?;
    Ok(Json(answer))
}

/// Error wrapper mapping service errors to HTTP responses.
struct ApiError(RagChatError);

impl From<RagChatError> for ApiError {
    fn from(err: RagChatError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RagChatError::UnsupportedDocument { .. }
            | RagChatError::InvalidConfiguration { .. } => StatusCode::BAD_REQUEST,
            RagChatError::IndexNotFound { .. } => StatusCode::NOT_FOUND,
            RagChatError::Embedding { .. }
            | RagChatError::VectorIndex { .. }
            | RagChatError::Chat { .. }
            | RagChatError::Http { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(serde_json::json!({
            "error": self.0.to_string(),
            "code": self.0.error_code(),
        }));

        (status, body).into_response()
    }
}
