//! nebula-server - backend for the nebula chat client.
//!
//! Proxies chat messages to the Google generative language API (or an
//! offline fallback engine when no key is configured) and tracks the
//! conversation history, the credit ledger, and the Scrumban board in
//! memory.
//!
//! # Environment
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `NEBULA_PORT` | Listen port | `8000` |
//! | `GEMINI_API_KEY` | Upstream API key | unset (offline engine) |
//! | `RUST_LOG` | Log filter | `nebula_server=info,tower_http=info` |

mod billing;
mod engine;
mod routes;

use std::sync::{Arc, Mutex};

use axum::{
    Router,
    routing::{get, post},
};
use nebula_protocol::{ChatTurn, ScrumbanBoard};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use billing::BillingLedger;
use engine::ReplyEngine;

/// Application state shared across all handlers.
///
/// A single in-memory instance for a single-process deployment. All
/// mutation goes through the mutexes; handlers never hold a lock across
/// an await point.
#[derive(Clone)]
pub struct AppState {
    pub history: Arc<Mutex<Vec<ChatTurn>>>,
    pub board: Arc<Mutex<ScrumbanBoard>>,
    pub billing: Arc<Mutex<BillingLedger>>,
    pub engine: Arc<ReplyEngine>,
}

impl AppState {
    /// Creates fresh state around the given reply engine.
    #[must_use]
    pub fn new(engine: ReplyEngine) -> Self {
        Self {
            history: Arc::new(Mutex::new(Vec::new())),
            board: Arc::new(Mutex::new(ScrumbanBoard::new())),
            billing: Arc::new(Mutex::new(BillingLedger::default())),
            engine: Arc::new(engine),
        }
    }
}

/// Builds the full route tree around the given state.
fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/chat", post(routes::chat))
        .route("/history", get(routes::history))
        .route("/clear-history", post(routes::clear_history))
        .route("/billing/status", get(routes::billing_status))
        .route("/billing/upgrade", post(routes::billing_upgrade))
        .route("/scrumban/board", get(routes::board))
        .route("/scrumban/stats", get(routes::board_stats))
        .route("/scrumban/task", post(routes::create_card))
        .route("/scrumban/task/status", post(routes::update_card_status))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nebula_server=info,tower_http=info".into()),
        )
        .init();

    let engine = ReplyEngine::from_env();
    let state = AppState::new(engine);

    let port: u16 = std::env::var("NEBULA_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("listening on port {port}");
    axum::serve(listener, app(state)).await?;

    Ok(())
}
