use crate::dtos::TypingEventDTO;
use crate::ws::BROADCAST_CHANNEL_CAPACITY;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::broadcast::{self, Receiver, Sender, error::SendError};
use tracing::{debug, info, instrument, warn};

/// Canali broadcast per conversazione, creati alla prima sottoscrizione
pub struct ChannelMap {
    /// tx di ogni canale, indicizzato per conversation_id
    channels: DashMap<String, Sender<Arc<TypingEventDTO>>>,
}

impl ChannelMap {
    pub fn new() -> Self {
        ChannelMap {
            channels: DashMap::new(),
        }
    }

    #[instrument(skip(self))]
    pub fn subscribe(&self, conversation_id: &str) -> Receiver<Arc<TypingEventDTO>> {
        // entry() tiene il lock sulla shard: niente doppia creazione in concorrenza
        self.channels
            .entry(conversation_id.to_string())
            .or_insert_with(|| {
                info!("Creating new broadcast channel for conversation");
                // Arc per condividere l'evento tra i rx senza copiarlo
                broadcast::channel::<Arc<TypingEventDTO>>(BROADCAST_CHANNEL_CAPACITY).0
            })
            .subscribe()
    }

    #[instrument(skip(self, event), fields(conversation_id = %event.conversation_id))]
    pub fn send(
        &self,
        event: Arc<TypingEventDTO>,
    ) -> Result<usize, SendError<Arc<TypingEventDTO>>> {
        let Some(channel) = self.channels.get(&event.conversation_id) else {
            debug!("Nobody subscribed to conversation");
            return Err(SendError(event));
        };

        match channel.send(event.clone()) {
            Ok(n) => {
                debug!(receivers = n, "Event broadcast to receivers");
                Ok(n)
            }
            Err(e) => {
                warn!("No active receivers, removing channel");
                // Nessuno sta ascoltando, rimuovi il channel
                drop(channel); // Rilascia il lock
                self.remove_if_unused(&event.conversation_id);
                Err(e)
            }
        }
    }

    /// Rimuove il canale se non ha più ricevitori
    pub fn remove_if_unused(&self, conversation_id: &str) {
        self.channels
            .remove_if(conversation_id, |_, tx| tx.receiver_count() == 0);
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl Default for ChannelMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn typing(conversation_id: &str) -> Arc<TypingEventDTO> {
        Arc::new(TypingEventDTO {
            user_id: Uuid::new_v4(),
            is_typing: true,
            conversation_id: conversation_id.to_string(),
        })
    }

    #[test]
    fn subscribers_receive_events_of_their_conversation() {
        let map = ChannelMap::new();
        let mut rx = map.subscribe("a");
        let mut other = map.subscribe("b");

        assert_eq!(map.send(typing("a")).unwrap(), 1);
        assert_eq!(rx.try_recv().unwrap().conversation_id, "a");
        assert!(other.try_recv().is_err());
    }

    #[test]
    fn send_without_channel_fails() {
        let map = ChannelMap::new();
        assert!(map.send(typing("missing")).is_err());
    }

    #[test]
    fn channel_without_receivers_is_dropped_on_send() {
        let map = ChannelMap::new();
        drop(map.subscribe("a"));
        assert_eq!(map.len(), 1);

        assert!(map.send(typing("a")).is_err());
        assert!(map.is_empty());
    }

    #[test]
    fn remove_if_unused_keeps_live_channels() {
        let map = ChannelMap::new();
        let _rx = map.subscribe("a");
        map.remove_if_unused("a");
        assert_eq!(map.len(), 1);
    }
}
