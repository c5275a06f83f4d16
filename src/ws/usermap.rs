use crate::dtos::MessageDTO;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Segnali interni inviati al task di scrittura di una connessione
#[derive(Debug, Clone)]
pub enum InternalSignal {
    Shutdown,
    Subscribe(String),
    Unsubscribe(String),
    Error(&'static str),
    NewMessage(Arc<MessageDTO>),
}

/// Utenti connessi: un utente può avere più connessioni aperte (più tab)
pub struct UserMap {
    users_online: DashMap<Uuid, Vec<(Uuid, UnboundedSender<InternalSignal>)>>,
}

impl UserMap {
    pub fn new() -> Self {
        UserMap {
            users_online: DashMap::new(),
        }
    }

    #[instrument(skip(self, tx), fields(user_id = %user_id, connection_id = %connection_id))]
    pub fn register_online(
        &self,
        user_id: Uuid,
        connection_id: Uuid,
        tx: UnboundedSender<InternalSignal>,
    ) {
        self.users_online
            .entry(user_id)
            .or_default()
            .push((connection_id, tx));
        info!("Total online users: {}", self.users_online.len());
    }

    #[instrument(skip(self), fields(user_id = %user_id, connection_id = %connection_id))]
    pub fn remove_from_online(&self, user_id: &Uuid, connection_id: &Uuid) {
        info!("Removing connection from online");
        self.users_online
            .remove_if_mut(user_id, |_, connections| {
                connections.retain(|(id, _)| id != connection_id);
                connections.is_empty()
            });
    }

    /// Invia il segnale a tutte le connessioni dell'utente; ritorna quante lo hanno ricevuto
    #[instrument(skip(self, message), fields(user_id = %user_id))]
    pub fn send_server_message_if_online(&self, user_id: &Uuid, message: InternalSignal) -> usize {
        let Some(connections) = self.users_online.get(user_id) else {
            debug!("User not online, signal not sent");
            return 0;
        };

        let mut delivered = 0;
        for (connection_id, tx) in connections.iter() {
            if let Err(e) = tx.send(message.clone()) {
                warn!("Failed to send signal to connection {}: {:?}", connection_id, e);
            } else {
                delivered += 1;
            }
        }
        delivered
    }

    pub fn online_count(&self) -> usize {
        self.users_online.len()
    }

    pub fn is_user_online(&self, user_id: &Uuid) -> bool {
        self.users_online.contains_key(user_id)
    }
}

impl Default for UserMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn signal_reaches_every_connection_of_the_user() {
        let map = UserMap::new();
        let user = Uuid::new_v4();
        let (tx1, mut rx1) = unbounded_channel();
        let (tx2, mut rx2) = unbounded_channel();
        map.register_online(user, Uuid::new_v4(), tx1);
        map.register_online(user, Uuid::new_v4(), tx2);

        assert_eq!(map.send_server_message_if_online(&user, InternalSignal::Shutdown), 2);
        assert!(matches!(rx1.try_recv(), Ok(InternalSignal::Shutdown)));
        assert!(matches!(rx2.try_recv(), Ok(InternalSignal::Shutdown)));
    }

    #[test]
    fn user_goes_offline_with_last_connection() {
        let map = UserMap::new();
        let user = Uuid::new_v4();
        let (first, second) = (Uuid::new_v4(), Uuid::new_v4());
        let (tx1, _rx1) = unbounded_channel();
        let (tx2, _rx2) = unbounded_channel();
        map.register_online(user, first, tx1);
        map.register_online(user, second, tx2);

        map.remove_from_online(&user, &first);
        assert!(map.is_user_online(&user));

        map.remove_from_online(&user, &second);
        assert!(!map.is_user_online(&user));
        assert_eq!(map.online_count(), 0);
    }

    #[test]
    fn offline_user_receives_nothing() {
        let map = UserMap::new();
        assert_eq!(
            map.send_server_message_if_online(&Uuid::new_v4(), InternalSignal::Shutdown),
            0
        );
    }
}
