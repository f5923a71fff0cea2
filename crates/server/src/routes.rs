//! HTTP route handlers.
//!
//! Handlers return concrete `(StatusCode, Json<…>)` shapes so the route
//! logic is testable without standing up a listener.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use nebula_protocol::{CardId, ChatTurn, LaneKind, ScrumCard, ScrumbanBoard, truncate_title};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::AppState;
use crate::billing::{CHAT_ACTION_COST, PlanKind};

/// Body of `POST /chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// Body of chat responses, success or failure.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits_remaining: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<CardId>,
}

impl ChatResponse {
    fn reply_only(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            credits_remaining: None,
            task_id: None,
        }
    }
}

/// Generic `{ success, message }` body for simple outcomes.
#[derive(Debug, Serialize)]
pub struct OutcomeBody {
    pub success: bool,
    pub message: String,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub engine_live: bool,
    pub conversation_messages: usize,
    pub board_cards: usize,
    pub plan: &'static str,
    pub credits: u64,
}

/// Body of `GET /billing/status`.
#[derive(Debug, Serialize)]
pub struct BillingStatusResponse {
    pub credits: u64,
    pub plan: &'static str,
}

/// Body of `POST /billing/upgrade`.
#[derive(Debug, Deserialize)]
pub struct UpgradeRequest {
    #[serde(default)]
    pub plan: String,
}

/// Body of `GET /scrumban/stats`.
#[derive(Debug, Serialize)]
pub struct BoardStatsResponse {
    pub total_cards: usize,
    pub todo: usize,
    pub blocked: usize,
    pub inprogress: usize,
    pub done: usize,
    pub completion_percentage: f64,
}

/// Body of `POST /scrumban/task`.
#[derive(Debug, Deserialize)]
pub struct CreateCardRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub lane: Option<LaneKind>,
}

/// Success body of `POST /scrumban/task`.
#[derive(Debug, Serialize)]
pub struct CreateCardResponse {
    pub success: bool,
    pub card: ScrumCard,
}

/// Body of `POST /scrumban/task/status`.
#[derive(Debug, Deserialize)]
pub struct CardStatusRequest {
    pub id: CardId,
    #[serde(rename = "status")]
    pub lane: LaneKind,
}

/// GET /health — liveness plus a summary of the in-memory state.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let billing = state.billing.lock().expect("billing lock poisoned");
    Json(HealthResponse {
        status: "online",
        version: env!("CARGO_PKG_VERSION"),
        engine_live: state.engine.is_live(),
        conversation_messages: state.history.lock().expect("history lock poisoned").len(),
        board_cards: state.board.lock().expect("board lock poisoned").total_cards(),
        plan: billing.plan().name(),
        credits: billing.credits(),
    })
}

/// POST /chat — answer one message via the reply engine.
///
/// Empty messages and exhausted credits are answered politely with 200;
/// only an upstream failure produces a non-success status.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<ChatResponse>) {
    let message = req.message.trim().to_string();
    if message.is_empty() {
        return (
            StatusCode::OK,
            Json(ChatResponse::reply_only("Please send a valid message.")),
        );
    }

    // The live engine costs credits; the offline fallback is free.
    if state.engine.is_live() {
        let mut billing = state.billing.lock().expect("billing lock poisoned");
        if !billing.debit(CHAT_ACTION_COST) {
            let credits = billing.credits();
            return (
                StatusCode::OK,
                Json(ChatResponse {
                    reply: format!(
                        "⚠️ **Not enough credits** (a model reply costs {CHAT_ACTION_COST}).\n\n\
                         Credits available: {credits}\n\n\
                         Upgrade your plan via `POST /billing/upgrade`."
                    ),
                    credits_remaining: Some(credits),
                    task_id: None,
                }),
            );
        }
    }

    state
        .history
        .lock()
        .expect("history lock poisoned")
        .push(ChatTurn::user(message.clone()));

    match state.engine.reply(&message).await {
        Ok(text) => {
            state
                .history
                .lock()
                .expect("history lock poisoned")
                .push(ChatTurn::assistant(text.clone()));

            // Completed chat turns land on the board as done cards.
            let card = ScrumCard::with_lane(truncate_title(&message), LaneKind::Done);
            let task_id = card.id;
            state
                .board
                .lock()
                .expect("board lock poisoned")
                .add_card(card);

            let credits = state.billing.lock().expect("billing lock poisoned").credits();
            (
                StatusCode::OK,
                Json(ChatResponse {
                    reply: text,
                    credits_remaining: Some(credits),
                    task_id: Some(task_id),
                }),
            )
        }
        Err(err) => {
            error!(error = %err, "reply generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatResponse::reply_only(format!(
                    "⚠️ An internal error occurred while processing your message.\n\n\
                     **Details:** {err}"
                ))),
            )
        }
    }
}

/// GET /history — the server-side conversation history.
pub async fn history(State(state): State<AppState>) -> Json<Vec<ChatTurn>> {
    Json(state.history.lock().expect("history lock poisoned").clone())
}

/// POST /clear-history — drop the server-side conversation history.
pub async fn clear_history(State(state): State<AppState>) -> Json<OutcomeBody> {
    state.history.lock().expect("history lock poisoned").clear();
    info!("conversation history cleared");
    Json(OutcomeBody {
        success: true,
        message: "History cleared.".to_string(),
    })
}

/// GET /billing/status — current plan and credit balance.
pub async fn billing_status(State(state): State<AppState>) -> Json<BillingStatusResponse> {
    let billing = state.billing.lock().expect("billing lock poisoned");
    Json(BillingStatusResponse {
        credits: billing.credits(),
        plan: billing.plan().name(),
    })
}

/// POST /billing/upgrade — switch plans, resetting the allowance.
pub async fn billing_upgrade(
    State(state): State<AppState>,
    Json(req): Json<UpgradeRequest>,
) -> (StatusCode, Json<OutcomeBody>) {
    let Some(plan) = PlanKind::parse(&req.plan) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(OutcomeBody {
                success: false,
                message: format!("unknown plan: {}", req.plan),
            }),
        );
    };

    let mut billing = state.billing.lock().expect("billing lock poisoned");
    billing.upgrade(plan);
    info!(plan = plan.name(), "plan upgraded");
    (
        StatusCode::OK,
        Json(OutcomeBody {
            success: true,
            message: format!(
                "Switched to {} with {} credits.",
                plan.name(),
                billing.credits()
            ),
        }),
    )
}

/// GET /scrumban/board — all lanes with their cards.
pub async fn board(State(state): State<AppState>) -> Json<ScrumbanBoard> {
    Json(state.board.lock().expect("board lock poisoned").clone())
}

/// GET /scrumban/stats — per-lane counts and completion percentage.
pub async fn board_stats(State(state): State<AppState>) -> Json<BoardStatsResponse> {
    let board = state.board.lock().expect("board lock poisoned");
    let total = board.total_cards();
    let done = board.lane(LaneKind::Done).len();
    let completion = if total > 0 {
        done as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    Json(BoardStatsResponse {
        total_cards: total,
        todo: board.lane(LaneKind::Todo).len(),
        blocked: board.lane(LaneKind::Blocked).len(),
        inprogress: board.lane(LaneKind::InProgress).len(),
        done,
        completion_percentage: completion,
    })
}

/// POST /scrumban/task — create a card (default lane: todo).
pub async fn create_card(
    State(state): State<AppState>,
    Json(req): Json<CreateCardRequest>,
) -> Result<Json<CreateCardResponse>, (StatusCode, Json<OutcomeBody>)> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(OutcomeBody {
                success: false,
                message: "card title must not be empty".to_string(),
            }),
        ));
    }

    let card = ScrumCard::with_lane(truncate_title(title), req.lane.unwrap_or_default());
    state
        .board
        .lock()
        .expect("board lock poisoned")
        .add_card(card.clone());

    Ok(Json(CreateCardResponse {
        success: true,
        card,
    }))
}

/// POST /scrumban/task/status — relocate a card to a lane.
pub async fn update_card_status(
    State(state): State<AppState>,
    Json(req): Json<CardStatusRequest>,
) -> Json<OutcomeBody> {
    let moved = state
        .board
        .lock()
        .expect("board lock poisoned")
        .relocate_card(req.id, req.lane);

    Json(OutcomeBody {
        success: moved,
        message: if moved {
            "Status updated.".to_string()
        } else {
            "Card not found.".to_string()
        },
    })
}
