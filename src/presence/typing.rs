//! Indicatore "sta scrivendo..." per una conversazione con un singolo interlocutore

use super::TYPING_DECAY;
use crate::dtos::{ClientEventDTO, TypingEventDTO};
use std::sync::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

/// Lato invio: trasforma lo stato di digitazione locale in eventi `Typing`
/// verso il task che scrive sul WebSocket.
#[derive(Clone)]
pub struct TypingNotifier {
    conversation_id: String,
    outbound: mpsc::Sender<ClientEventDTO>,
}

impl TypingNotifier {
    pub fn new(conversation_id: impl Into<String>, outbound: mpsc::Sender<ClientEventDTO>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            outbound,
        }
    }

    /// Accoda l'evento senza bloccare. Ritorna `false` se il canale è pieno o chiuso:
    /// un evento di digitazione perso non va ritentato.
    pub fn send_typing(&self, is_typing: bool) -> bool {
        let event = ClientEventDTO::Typing {
            conversation_id: self.conversation_id.clone(),
            is_typing,
        };
        match self.outbound.try_send(event) {
            Ok(()) => true,
            Err(e) => {
                warn!(conversation_id = %self.conversation_id, "Typing event dropped: {}", e);
                false
            }
        }
    }
}

pub struct TypingIndicator {
    peer_id: Uuid,
    state: watch::Sender<bool>,
    decay: Mutex<Option<JoinHandle<()>>>,
}

impl TypingIndicator {
    pub fn new(peer_id: Uuid) -> Self {
        let (state, _) = watch::channel(false);
        Self {
            peer_id,
            state,
            decay: Mutex::new(None),
        }
    }

    pub fn is_typing(&self) -> bool {
        *self.state.borrow()
    }

    /// Ricevitore per reagire ai cambi di stato
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }

    /// Applica un evento ricevuto dal canale della conversazione.
    /// Gli eventi di utenti diversi dall'interlocutore vengono ignorati.
    pub fn handle(&self, event: &TypingEventDTO) {
        if event.user_id != self.peer_id {
            return;
        }

        let Ok(mut decay) = self.decay.lock() else {
            return;
        };
        if let Some(previous) = decay.take() {
            previous.abort();
        }

        if event.is_typing {
            self.state.send_replace(true);
            let state = self.state.clone();
            *decay = Some(tokio::spawn(async move {
                tokio::time::sleep(TYPING_DECAY).await;
                debug!("Typing indicator decayed");
                state.send_replace(false);
            }));
        } else {
            self.state.send_replace(false);
        }
    }
}

impl Drop for TypingIndicator {
    fn drop(&mut self) {
        if let Ok(mut decay) = self.decay.lock() {
            if let Some(task) = decay.take() {
                task.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::sleep;

    fn event(user_id: Uuid, is_typing: bool) -> TypingEventDTO {
        TypingEventDTO {
            user_id,
            is_typing,
            conversation_id: "conv".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn typing_decays_after_three_seconds() {
        let peer = Uuid::new_v4();
        let indicator = TypingIndicator::new(peer);

        indicator.handle(&event(peer, true));
        assert!(indicator.is_typing());

        sleep(Duration::from_millis(2900)).await;
        assert!(indicator.is_typing());

        sleep(Duration::from_millis(200)).await;
        assert!(!indicator.is_typing());
    }

    #[tokio::test(start_paused = true)]
    async fn new_event_restarts_the_decay() {
        let peer = Uuid::new_v4();
        let indicator = TypingIndicator::new(peer);

        indicator.handle(&event(peer, true));
        sleep(Duration::from_secs(2)).await;
        indicator.handle(&event(peer, true));
        sleep(Duration::from_secs(2)).await;
        assert!(indicator.is_typing());

        sleep(Duration::from_millis(1100)).await;
        assert!(!indicator.is_typing());
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_stop_clears_immediately() {
        let peer = Uuid::new_v4();
        let indicator = TypingIndicator::new(peer);

        indicator.handle(&event(peer, true));
        indicator.handle(&event(peer, false));
        assert!(!indicator.is_typing());

        // il vecchio timer non deve riaccendere nulla
        sleep(Duration::from_secs(5)).await;
        assert!(!indicator.is_typing());
    }

    #[tokio::test(start_paused = true)]
    async fn events_from_other_users_are_ignored() {
        let indicator = TypingIndicator::new(Uuid::new_v4());
        indicator.handle(&event(Uuid::new_v4(), true));
        assert!(!indicator.is_typing());
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_state_changes() {
        let peer = Uuid::new_v4();
        let indicator = TypingIndicator::new(peer);
        let mut rx = indicator.subscribe();

        indicator.handle(&event(peer, true));
        rx.changed().await.unwrap();
        assert!(*rx.borrow_and_update());

        rx.changed().await.unwrap();
        assert!(!*rx.borrow_and_update());
    }

    #[tokio::test]
    async fn notifier_emits_typing_client_events() {
        let (tx, mut rx) = mpsc::channel(4);
        let notifier = TypingNotifier::new("conv", tx);

        assert!(notifier.send_typing(true));
        assert!(notifier.send_typing(false));
        assert_eq!(
            rx.recv().await,
            Some(ClientEventDTO::Typing {
                conversation_id: "conv".to_string(),
                is_typing: true
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(ClientEventDTO::Typing {
                conversation_id: "conv".to_string(),
                is_typing: false
            })
        );
    }

    #[tokio::test]
    async fn notifier_does_not_block_on_full_or_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        let notifier = TypingNotifier::new("conv", tx);

        assert!(notifier.send_typing(true));
        assert!(!notifier.send_typing(true));

        drop(rx);
        assert!(!notifier.send_typing(false));
    }
}
