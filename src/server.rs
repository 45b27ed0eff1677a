use crate::error::EnquiryError;
use crate::handler::EnquiryHandler;
use crate::models::{RequestEvent, Response};
use crate::validation::ValidationError;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// `POST /` and `POST /enquiry` take a submission, `GET /health` is a liveness check
pub fn router(handler: Arc<EnquiryHandler>) -> Router {
    Router::new()
        .route("/", post(submit))
        .route("/enquiry", post(submit))
        .route("/health", get(health))
        .with_state(handler)
}

/// Serve until the listener fails
pub async fn serve(listener: TcpListener, handler: Arc<EnquiryHandler>) -> Result<()> {
    let addr = listener.local_addr().context("Failed to read listener address")?;
    info!("Listening on {}", addr);

    axum::serve(listener, router(handler))
        .await
        .context("HTTP server failed")
}

/// Run one event on its own task so a panic becomes a 500 instead of a dropped request
pub async fn dispatch(handler: Arc<EnquiryHandler>, event: RequestEvent) -> Response {
    let task = tokio::spawn(async move { handler.handle(&event).await });

    match task.await {
        Ok(response) => response,
        Err(join_error) => {
            let err = EnquiryError::Unexpected(join_error.to_string());
            error!("{}", err);
            err.to_response()
        }
    }
}

// Body rejections (too large, not UTF-8) must still answer with a JSON message
fn decode_body(body: Result<Bytes, BytesRejection>) -> Result<String, EnquiryError> {
    let bytes = body.map_err(|rejection| {
        error!("Unreadable request body: {}", rejection);
        ValidationError::InvalidJson
    })?;

    String::from_utf8(bytes.to_vec()).map_err(|e| {
        error!("Request body is not UTF-8: {}", e);
        EnquiryError::from(ValidationError::InvalidJson)
    })
}

async fn submit(
    State(handler): State<Arc<EnquiryHandler>>,
    Query(params): Query<HashMap<String, String>>,
    body: Result<Bytes, BytesRejection>,
) -> impl IntoResponse {
    let response = match decode_body(body) {
        Ok(text) => {
            let event = RequestEvent {
                body: Some(text),
                query_string_parameters: Some(params),
                is_base64_encoded: None,
            };
            dispatch(handler, event).await
        }
        Err(err) => err.to_response(),
    };

    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, [(header::CONTENT_TYPE, "application/json")], response.body)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;

    #[tokio::test]
    async fn oversized_body_is_a_client_error() {
        let request = Request::new(Body::from(vec![b' '; 3 * 1024 * 1024]));
        let body = Bytes::from_request(request, &()).await;
        assert!(body.is_err());

        let response = decode_body(body).unwrap_err().to_response();

        assert_eq!(response.status_code, 400);
        assert_eq!(response.message().as_deref(), Some("Invalid JSON format"));
    }

    #[tokio::test]
    async fn non_utf8_body_is_a_client_error() {
        let err = decode_body(Ok(Bytes::from_static(b"{\xff}"))).unwrap_err();

        assert!(matches!(err, EnquiryError::ClientInput(ValidationError::InvalidJson)));
    }
}
