//! Core Module - Componenti infrastrutturali dell'applicazione
//!
//! Questo modulo contiene tutti i componenti "core" dell'applicazione:
//! - Autenticazione JWT e middleware (utente, admin, ban, cron)
//! - Configurazione
//! - Gestione errori
//! - Stato applicazione e deduplica visualizzazioni

pub mod auth;
pub mod config;
pub mod error;
pub mod state;
pub mod views;

// Re-exports per facilitare l'import
pub use auth::{
    AuthUser, Claims, admin_middleware, authentication_middleware, ban_guard_middleware,
    cron_secret_middleware, decode_jwt, encode_jwt, user_from_headers,
};
pub use config::Config;
pub use error::AppError;
pub use state::AppState;
pub use views::ViewTracker;
