//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{info, warn};

use crate::{error::TimerError, state::AppState};
use super::responses::{
    ApiResponse, ChatRequest, ChatResponse, ErrorResponse, HealthResponse, SetMinutesRequest,
    StatusResponse, TimerView,
};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Handle GET /timer - Current timer snapshot
pub async fn timer_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let timer = state.get_timer_state().await;
    Json(ApiResponse::new(timer.formatted(), &timer))
}

/// Handle POST /timer/start - Start the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let timer = state.start_timer().await;
    info!("Start endpoint called - {} left", timer.formatted());
    Json(ApiResponse::new("Timer started", &timer))
}

/// Handle POST /timer/pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let timer = state.pause_timer().await;
    info!("Pause endpoint called - {} left", timer.formatted());
    Json(ApiResponse::new("Timer paused", &timer))
}

/// Handle POST /timer/toggle - Start or pause
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let timer = state.toggle_timer().await;
    let message = if timer.running { "Timer started" } else { "Timer paused" };
    info!("Toggle endpoint called - {}", message);
    Json(ApiResponse::new(message, &timer))
}

/// Handle POST /timer/reset - Rewind to the full target
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let timer = state.reset_timer().await;
    info!("Reset endpoint called");
    Json(ApiResponse::new("Timer reset", &timer))
}

/// Handle PUT /timer/minutes - Change the countdown length
pub async fn set_minutes_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetMinutesRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    match state.set_minutes(request.minutes).await {
        Ok(timer) => Ok(Json(ApiResponse::new(
            format!("Timer set to {} minutes", timer.target_minutes),
            &timer,
        ))),
        Err(e) => {
            warn!("Rejected minutes change: {}", e);
            let status = match e {
                TimerError::InvalidMinutes { .. } => StatusCode::BAD_REQUEST,
                TimerError::Running => StatusCode::CONFLICT,
            };
            Err((status, Json(ErrorResponse::new(e.to_string()))))
        }
    }
}

/// Handle GET /chat - Conversation so far
pub async fn chat_history_handler(State(state): State<Arc<AppState>>) -> Json<ChatResponse> {
    Json(ChatResponse::new(None, state.chat.snapshot()))
}

/// Handle POST /chat - Send a message and wait for the reply
pub async fn chat_send_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let reply = state.chat.send(&request.message).await;
    if reply.is_some() {
        state.record_action("chat");
    }
    Json(ChatResponse::new(reply, state.chat.snapshot()))
}

/// Handle DELETE /chat - Clear the conversation
pub async fn chat_clear_handler(State(state): State<Arc<AppState>>) -> Json<ChatResponse> {
    state.chat.clear();
    state.record_action("chat-clear");
    info!("Chat history cleared");
    Json(ChatResponse::new(None, state.chat.snapshot()))
}

/// Handle GET /status - Return current service status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let timer = state.get_timer_state().await;
    let chat = state.chat.snapshot();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: TimerView::from(&timer),
        chat_messages: chat.messages.len(),
        chat_typing: chat.typing,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
