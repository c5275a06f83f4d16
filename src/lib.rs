//! FindSomeone server library - espone i moduli principali per i test

pub mod core;
pub mod dtos;
pub mod entities;
pub mod geo;
pub mod llm;
pub mod moderation;
pub mod presence;
pub mod repositories;
pub mod services;
pub mod ws;

// Re-export dei tipi principali per facilitare l'import
pub use core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{
    Router, middleware,
    routing::{any, get, patch, post},
};
use std::sync::Arc;

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    use core::authentication_middleware;
    use ws::ws_handler;

    Router::new()
        .route("/", get(root))
        .route("/robots.txt", get(services::robots_txt))
        .route("/sitemap.xml", get(services::sitemap_xml))
        // stesso path con metodi diversi (es. GET/POST /reviews): merge unisce i method router
        .nest(
            "/api",
            configure_public_routes().merge(configure_user_routes(state.clone())),
        )
        .nest("/api/admin", configure_admin_routes(state.clone()))
        .nest("/api/cron", configure_cron_routes(state.clone()))
        .route(
            "/ws",
            any(ws_handler).layer(middleware::from_fn_with_state(
                state.clone(),
                authentication_middleware,
            )),
        )
        .with_state(state)
}

/// Rotte pubbliche, senza autenticazione
fn configure_public_routes() -> Router<Arc<AppState>> {
    use services::*;

    Router::new()
        .route("/distance", post(calculate_distance))
        .route("/cities", get(search_cities))
        .route("/posts", get(list_posts))
        .route("/search", get(search_suggestions))
        .route("/search/track", post(track_search))
        .route("/bookings", get(list_booking_slots))
        .route("/posts/{post_id}/phone-click", post(register_phone_click))
        .route("/posts/{post_id}/view", post(register_view))
        .route("/reviews", get(list_reviews))
        .route("/presence/{user_id}", get(get_presence))
}

/// Rotte del pannello utente: autenticazione + blocco degli utenti bannati
fn configure_user_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use core::{authentication_middleware, ban_guard_middleware};
    use services::*;

    Router::new()
        .route(
            "/favorites",
            get(list_favorites).post(add_favorite).delete(remove_favorite),
        )
        .route("/posts", post(create_post))
        .route("/moderate", post(moderate_own_post))
        .route("/my-posts", get(list_my_posts))
        .route("/delete-account", post(delete_account))
        .route(
            "/bookings",
            post(create_booking).patch(update_booking_status),
        )
        .route("/posts/{post_id}/extend", post(extend_post))
        .route("/reviews", post(create_review))
        .route("/reviews/respond", post(respond_to_review))
        .route("/reviews/request-deletion", post(request_review_deletion))
        .route("/reports/posts", post(report_post))
        .route("/reports/messages", post(report_message))
        .route("/messages", post(send_message))
        .route("/messages/{other_user_id}", get(get_conversation))
        .route("/presence", post(update_presence))
        // i layer vengono eseguiti dall'ultimo aggiunto: prima autenticazione, poi ban
        .layer(middleware::from_fn_with_state(
            state.clone(),
            ban_guard_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Rotte amministrative: autenticazione + ruolo admin
fn configure_admin_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use core::{admin_middleware, authentication_middleware};
    use services::admin::*;

    Router::new()
        .route("/moderation", get(list_moderation_queue))
        .route(
            "/moderation/{post_id}",
            patch(moderate_post).delete(delete_post),
        )
        .route(
            "/synonyms",
            get(list_synonyms).post(create_synonym).delete(delete_synonym),
        )
        .route(
            "/synonyms/generate",
            post(generate_synonyms).put(apply_synonym_suggestions),
        )
        .route(
            "/category-synonyms",
            get(list_category_synonyms)
                .post(create_category_synonym)
                .delete(delete_category_synonym),
        )
        .route(
            "/category-synonyms/generate",
            post(generate_category_synonyms).put(apply_category_synonym_suggestions),
        )
        .route(
            "/content-bot/delete-all",
            get(count_ai_posts).delete(delete_all_ai_posts),
        )
        .route(
            "/content-bot/delete-by-category",
            axum::routing::delete(delete_ai_posts_by_category),
        )
        .route("/content-bot/categories", get(list_categories_with_counts))
        .route(
            "/categories/generate-description",
            post(generate_description),
        )
        .route(
            "/categories/generate-descriptions",
            post(generate_descriptions),
        )
        .route(
            "/categories/reorder",
            post(reorder_category).patch(batch_reorder_categories),
        )
        .route(
            "/categories/sort-alphabetically",
            post(sort_categories_alphabetically),
        )
        .route("/post-reports", get(list_reported_posts))
        .route("/reports/{report_id}", patch(update_message_report))
        .route("/users/{user_id}", patch(update_user).delete(delete_user))
        .route(
            "/messages/{message_id}",
            axum::routing::delete(delete_reported_message),
        )
        .layer(middleware::from_fn_with_state(state.clone(), admin_middleware))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Job di scadenza, autenticato con CRON_SECRET
fn configure_cron_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use core::cron_secret_middleware;

    Router::new()
        .route("/expire-posts", post(services::expire_posts))
        .layer(middleware::from_fn_with_state(state, cron_secret_middleware))
}
