//! Services module - Coordinatore per tutti i service handler HTTP
//!
//! Questo modulo organizza i service handlers in sotto-moduli separati per una migliore manutenibilità.
//! Ogni modulo gestisce gli endpoint HTTP per una specifica funzionalità.

pub mod account;
pub mod admin;
pub mod booking;
pub mod city;
pub mod cron;
pub mod distance;
pub mod favorite;
pub mod message;
pub mod post;
pub mod presence;
pub mod report;
pub mod review;
pub mod search;
pub mod seo;

// Re-exports per facilitare l'import
pub use account::delete_account;
pub use booking::{create_booking, list_booking_slots, update_booking_status};
pub use city::search_cities;
pub use cron::expire_posts;
pub use distance::calculate_distance;
pub use favorite::{add_favorite, list_favorites, remove_favorite};
pub use message::{get_conversation, send_message};
pub use post::{
    create_post, extend_post, list_my_posts, list_posts, moderate_own_post, register_phone_click,
    register_view,
};
pub use presence::{get_presence, update_presence};
pub use report::{report_message, report_post};
pub use review::{create_review, list_reviews, request_review_deletion, respond_to_review};
pub use search::{search_suggestions, track_search};
pub use seo::{robots_txt, sitemap_xml};

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
