//! Presence module - Heartbeat di presenza e indicatore di digitazione lato client
//!
//! Componenti usati da un client Rust (o dai test) per tenere aggiornato lo stato
//! `online/away/offline` sul server e per mostrare "sta scrivendo..." in una conversazione.
//! Tutti gli errori vengono loggati e ignorati: la presenza è best-effort.

pub mod heartbeat;
pub mod reporter;
pub mod typing;

pub use heartbeat::{PageEvent, PresenceHeartbeat};
pub use reporter::{HttpPresenceReporter, PresenceError, PresenceReporter};
pub use typing::{TypingIndicator, TypingNotifier};

use std::time::Duration;

/// Cadenza del heartbeat `online`. Il timeout di presenza del server deve essere maggiore.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(240);

/// Dopo quanto tempo senza eventi l'indicatore di digitazione si spegne
pub const TYPING_DECAY: Duration = Duration::from_secs(3);
