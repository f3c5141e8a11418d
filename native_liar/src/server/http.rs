// HTTP handler for the Liar Game server API.
//
// A single POST endpoint mirrors the websocket actions so the server logic
// stays transport-agnostic: both delegate to `handle_client_msg`.

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use liar_shared::{ClientMsg, ServerMsg};

use super::state::AppState;

/// Accept any ClientMsg and answer with the resulting ServerMsg.
///
/// Example payload:
///   { "type": "Action", "data": { "player_id": 0, "action": { "Describe": "..." } } }
pub async fn message_handler(
    State(state): State<AppState>,
    Json(cm): Json<ClientMsg>,
) -> impl IntoResponse {
    let resp = super::game_ops::handle_client_msg(&state, cm).await;
    match resp {
        ServerMsg::Error(e) => (StatusCode::BAD_REQUEST, Json(ServerMsg::Error(e))).into_response(),
        other => (StatusCode::OK, Json(other)).into_response(),
    }
}
