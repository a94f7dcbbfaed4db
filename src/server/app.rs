use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{extract::FromRef, routing::get, Router};
use prometheus::{Encoder, TextEncoder};
use routes::{category_router, questions_router, quiz_router};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use super::routes;
use crate::config::ServerSettings;
use crate::quiz::QuizRng;

#[derive(FromRef, Clone)]
pub struct AppState {
    pool: SqlitePool,
    rng: QuizRng,
}

impl AppState {
    pub fn new(pool: SqlitePool, rng: QuizRng) -> Self {
        Self { pool, rng }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .merge(category_router(state.clone()))
        .merge(questions_router(state.clone()))
        .merge(quiz_router(state))
        .fallback(|| async {
            tracing::info!("Fallback");
            ApiError::NotFound("route".to_owned())
        })
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::PUT,
                    Method::POST,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(pool: SqlitePool, settings: &ServerSettings) -> anyhow::Result<()> {
    let addr = settings.address();
    let app = build_router(AppState::new(pool, QuizRng::from_entropy()));
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Serving on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metrics = prometheus::gather();
    let mut buf = vec![];
    if let Err(err) = encoder.encode(&metrics, &mut buf) {
        tracing::error!(error = %err, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    (
        [(header::CONTENT_TYPE, encoder.format_type().to_owned())],
        buf,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderValue, Method};
    use serde_json::{json, Value};
    use sqlx::SqlitePool;

    use crate::test_utils::*;

    #[sqlx::test]
    #[test_log::test]
    async fn test_unknown_route_returns_envelope(pool: SqlitePool) {
        let app = create_test_app(pool);

        let response = app.get("/nothing/here").await;

        response.assert_status_not_found();
        let body: Value = response.json();
        assert_eq!(
            body,
            json!({"success": false, "error": 404, "message": "Resource not found"})
        );
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_cors_allows_any_origin(pool: SqlitePool) {
        let app = create_test_app(pool);

        let response = app
            .method(Method::OPTIONS, "/questions")
            .add_header(header::ORIGIN, HeaderValue::from_static("http://localhost:3000"))
            .add_header(
                header::ACCESS_CONTROL_REQUEST_METHOD,
                HeaderValue::from_static("DELETE"),
            )
            .await;

        assert_eq!(
            response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            HeaderValue::from_static("*")
        );
        let methods = response.header(header::ACCESS_CONTROL_ALLOW_METHODS);
        assert!(methods.to_str().unwrap().contains("DELETE"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_metrics_count_created_questions(pool: SqlitePool) {
        let app = create_test_app(pool);
        app.post("/questions")
            .json(&json!({"question": "q", "answer": "a", "difficulty": 1, "category": 1}))
            .await
            .assert_status_ok();

        let response = app.get("/metrics").await;

        response.assert_status_ok();
        assert!(response
            .text()
            .contains(r#"trivia_question_changes_total{change="created"}"#));
    }
}
