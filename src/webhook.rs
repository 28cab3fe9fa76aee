//! Webhook mode: Telegram pushes each update to `POST /`, and the reply
//! travels back in the response body as a `sendMessage` call.
//!
//! | Method | Path      | Description            |
//! |--------|-----------|------------------------|
//! | POST   | `/`       | Bot API update         |
//! | GET    | `/health` | Liveness probe         |
//!
//! With a secret configured, updates must carry it in the
//! `X-Telegram-Bot-Api-Secret-Token` header, which Telegram sets from the
//! `secret_token` given to `setWebhook`.

use crate::bot::Bot;
use crate::telegram::{Update, WebhookReply};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use std::sync::Arc;

pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

#[derive(Clone)]
pub struct SecretState {
    pub secret: Option<Arc<str>>,
}

pub fn create_router(bot: Arc<Bot>, secret: Option<String>) -> Router {
    let secret_state = SecretState {
        secret: secret.map(Arc::from),
    };

    let updates = Router::new()
        .route("/", post(update_handler))
        .with_state(bot)
        .layer(axum::middleware::from_fn_with_state(
            secret_state,
            secret_middleware,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .merge(updates)
}

async fn secret_middleware(
    State(state): State<SecretState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    if let Some(secret) = &state.secret {
        let given = extract_secret(req.headers())?;
        if given != secret.as_ref() {
            tracing::warn!("update with a wrong secret token rejected");
            return Err(StatusCode::UNAUTHORIZED);
        }
    }
    Ok(next.run(req).await)
}

fn extract_secret(headers: &HeaderMap) -> Result<&str, StatusCode> {
    headers
        .get(SECRET_HEADER)
        .ok_or(StatusCode::UNAUTHORIZED)?
        .to_str()
        .map_err(|_| StatusCode::UNAUTHORIZED)
}

async fn update_handler(State(bot): State<Arc<Bot>>, Json(update): Json<Update>) -> Response {
    match bot.handle_update(&update).await {
        Some(message) => Json(WebhookReply::from(message)).into_response(),
        None => StatusCode::OK.into_response(),
    }
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Serve the webhook on `0.0.0.0:<port>` until Ctrl-C.
pub async fn serve(bot: Arc<Bot>, port: u16, secret: Option<String>) -> Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind webhook listener on {}", addr))?;
    tracing::info!("webhook listening on {}", addr);

    axum::serve(listener, create_router(bot, secret))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await
        .context("webhook server failed")
}
