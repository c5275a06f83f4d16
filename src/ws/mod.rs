//! WebSocket Module - Canale real-time per eventi effimeri
//!
//! - upgrade HTTP -> WebSocket (autenticato dal middleware JWT)
//! - connessione divisa in task di lettura e task di scrittura
//! - canali broadcast per conversazione (eventi di digitazione)
//! - push diretto per utente (nuovi messaggi, errori)

pub mod channels;
pub mod connection;
pub mod event_handlers;
pub mod usermap;

pub use channels::ChannelMap;
pub use connection::handle_socket;
pub use usermap::{InternalSignal, UserMap};

use crate::{AppState, core::AuthUser};
use axum::{
    Extension,
    extract::{State, ws::WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;

/// Capacità di ogni canale broadcast di conversazione
pub const BROADCAST_CHANNEL_CAPACITY: usize = 64;
/// Intervallo minimo tra due frame letti dalla stessa connessione
pub const RATE_LIMITER_MILLIS: u64 = 50;
/// Connessione chiusa dopo questo tempo senza frame dal client
pub const TIMEOUT_DURATION_SECONDS: u64 = 300;
/// Lunghezza massima di un conversation_id
pub const MAX_CONVERSATION_ID_LEN: usize = 128;

/// Entry point per gestire richieste di upgrade WebSocket
/// Operazioni:
/// 1. Estrarre user_id dall'autenticazione JWT
/// 2. Eseguire upgrade HTTP -> WebSocket
/// 3. Passare la connessione ad handle_socket
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<AuthUser>, // ottenuto dall'autenticazione JWT
) -> Response {
    let user_id = current_user.id;

    // Possibile limitazione dei buffer, default 128 KB
    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id))
}
