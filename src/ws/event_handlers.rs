//! WebSocket Event Handlers - Handler per eventi WebSocket

use crate::AppState;
use crate::dtos::{ClientEventDTO, TypingEventDTO};
use crate::ws::{MAX_CONVERSATION_ID_LEN, usermap::InternalSignal};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Dispatch di un evento ricevuto dal client
/// Operazioni:
/// 1. Validare il conversation_id
/// 2. Subscribe/Unsubscribe: inoltrare al task di scrittura della connessione
/// 3. Typing: pubblicare sul canale della conversazione con l'id dell'utente autenticato
#[instrument(skip(state, internal_tx, event), fields(user_id = %user_id))]
pub fn process_client_event(
    state: &Arc<AppState>,
    user_id: Uuid,
    internal_tx: &UnboundedSender<InternalSignal>,
    event: ClientEventDTO,
) {
    let conversation_id = match &event {
        ClientEventDTO::Subscribe { conversation_id }
        | ClientEventDTO::Unsubscribe { conversation_id }
        | ClientEventDTO::Typing { conversation_id, .. } => conversation_id,
    };

    if !is_valid_conversation_id(conversation_id) {
        warn!("Invalid conversation id");
        let _ = internal_tx.send(InternalSignal::Error("Invalid conversation id"));
        return;
    }

    match event {
        ClientEventDTO::Subscribe { conversation_id } => {
            let _ = internal_tx.send(InternalSignal::Subscribe(conversation_id));
        }
        ClientEventDTO::Unsubscribe { conversation_id } => {
            let _ = internal_tx.send(InternalSignal::Unsubscribe(conversation_id));
        }
        ClientEventDTO::Typing {
            conversation_id,
            is_typing,
        } => {
            // user_id dal token, mai dal payload del client
            let event = Arc::new(TypingEventDTO {
                user_id,
                is_typing,
                conversation_id,
            });
            if state.channels.send(event).is_err() {
                debug!("No subscribers for typing event");
            }
        }
    }
}

fn is_valid_conversation_id(conversation_id: &str) -> bool {
    let trimmed = conversation_id.trim();
    !trimmed.is_empty() && conversation_id.len() <= MAX_CONVERSATION_ID_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_id_must_be_non_blank_and_bounded() {
        assert!(is_valid_conversation_id("a1b2"));
        assert!(!is_valid_conversation_id("   "));
        assert!(!is_valid_conversation_id(&"x".repeat(MAX_CONVERSATION_ID_LEN + 1)));
    }
}
