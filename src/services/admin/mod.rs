//! Admin services - Handler del pannello amministrativo
//!
//! Tutte le rotte passano da `authentication_middleware` e `admin_middleware`:
//! il profilo dell'admin è disponibile come `Extension<Profile>`.

pub mod category;
pub mod content_bot;
pub mod moderation;
pub mod report;
pub mod synonym;
pub mod user;

pub use category::{
    batch_reorder_categories, generate_description, generate_descriptions, reorder_category,
    sort_categories_alphabetically,
};
pub use content_bot::{
    count_ai_posts, delete_ai_posts_by_category, delete_all_ai_posts,
    list_categories_with_counts,
};
pub use moderation::{delete_post, list_moderation_queue, moderate_post};
pub use report::{delete_reported_message, list_reported_posts, update_message_report};
pub use synonym::{
    apply_category_synonym_suggestions, apply_synonym_suggestions, create_category_synonym,
    create_synonym, delete_category_synonym, delete_synonym, generate_category_synonyms,
    generate_synonyms, list_category_synonyms, list_synonyms,
};
pub use user::{delete_user, update_user};
