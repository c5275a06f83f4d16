//! Post services - Lista pubblica, creazione con moderazione automatica,
//! contatori e azioni del proprietario sugli annunci

use crate::core::{AppError, AppState, AuthUser, user_from_headers};
use crate::dtos::{
    CreateModerationLogDTO, CreatePostBodyDTO, CreatePostDTO, ExtendPostResponseDTO,
    ListingDTO, ListingFilterDTO, ModerateBodyDTO, ModerationRunDTO, MyPostsDTO, MyPostsQuery,
    PostCreatedDTO, PostsQuery, SuccessDTO, UpdateModerationDTO, ViewCountedDTO,
    validation::normalize_text,
};
use crate::entities::{Post, PostStatus};
use crate::moderation::{self, ModerationOutcome, PostContent};
use crate::repositories::{Create, Read, Update};
use crate::services::search::term_groups;
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use axum_macros::debug_handler;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

const FORWARDED_FOR: &str = "x-forwarded-for";

const DEFAULT_PAGE_SIZE: i64 = 12;
const MAX_PAGE_SIZE: i64 = 50;

/// (limit, offset) validi per le liste paginate con offset
pub fn listing_window(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    (
        limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        offset.unwrap_or(0).max(0),
    )
}

/// Lista pubblica degli annunci attivi con ricerca, filtri e ordinamento
#[instrument(skip(state))]
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PostsQuery>,
) -> Result<Json<ListingDTO>, AppError> {
    let (limit, offset) = listing_window(params.limit, params.offset);

    // 1. Termini di ricerca espansi con i sinonimi
    let groups = match params.search.as_deref() {
        Some(search) => term_groups(&state, search).await?,
        None => Vec::new(),
    };

    // 2. Categoria per nome/slug, poi per sinonimo; se sconosciuta il filtro è ignorato
    let category_id = match params.category.as_deref().and_then(normalize_text) {
        Some(name) => resolve_category(&state, &name).await?,
        None => None,
    };

    let filter = ListingFilterDTO {
        term_groups: groups,
        city: params.city.as_deref().and_then(normalize_text),
        category_id,
        post_type: params.post_type,
        sort: params.sort.unwrap_or_default(),
    };

    let (posts, total) = state.posts.find_listing(&filter, limit, offset).await?;
    let has_more = offset.saturating_add(posts.len() as i64) < total;

    debug!(returned = posts.len(), total, "Listing page loaded");
    Ok(Json(ListingDTO {
        posts,
        has_more,
        total,
    }))
}

async fn resolve_category(state: &AppState, name: &str) -> Result<Option<Uuid>, AppError> {
    if let Some(id) = state.categories.find_id_by_name_or_slug(name).await? {
        return Ok(Some(id));
    }
    let by_synonym = state
        .category_synonyms
        .find_category_by_synonym(&name.to_lowercase())
        .await?;
    if by_synonym.is_none() {
        debug!(category = name, "Unknown category filter ignored");
    }
    Ok(by_synonym)
}

#[debug_handler]
#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id))]
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<AuthUser>,
    Json(body): Json<CreatePostBodyDTO>,
) -> Result<(StatusCode, Json<PostCreatedDTO>), AppError> {
    debug!("Creating post");
    // 1. Validazione
    body.validate()?;
    let (Some(title), Some(city)) = (normalize_text(&body.title), normalize_text(&body.city))
    else {
        warn!("Missing title or city");
        return Err(AppError::bad_request("Title and city are required"));
    };

    // 2. Inserimento in stato checking
    let post = state
        .posts
        .create(&CreatePostDTO {
            user_id: current_user.id,
            category_id: body.category_id,
            title,
            description: body.description.trim().to_string(),
            post_type: body.post_type,
            city,
            district: body.district.as_deref().and_then(normalize_text),
            price_min: body.price_min,
            price_max: body.price_max,
            price_type: body.price_type,
        })
        .await?;

    // 3. Moderazione automatica
    let (post, outcome) = apply_moderation(&state, post).await?;

    info!(post_id = %post.id, score = outcome.score, status = ?outcome.status, "Post created");
    Ok((
        StatusCode::CREATED,
        Json(PostCreatedDTO {
            success: true,
            post,
            moderation: outcome.to_dto(),
        }),
    ))
}

/// Ripete la moderazione automatica su un annuncio del proprietario
#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id))]
pub async fn moderate_own_post(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<AuthUser>,
    Json(body): Json<ModerateBodyDTO>,
) -> Result<Json<ModerationRunDTO>, AppError> {
    let post_id = body
        .post_id
        .ok_or_else(|| AppError::bad_request("Post ID required"))?;

    let post = state.posts.read(&post_id).await?.ok_or_else(|| {
        warn!(post_id = %post_id, "Post not found");
        AppError::not_found("Post not found")
    })?;

    if post.user_id != current_user.id {
        warn!("User is not the owner of the post");
        return Err(AppError::forbidden("Forbidden"));
    }

    let (_, outcome) = apply_moderation(&state, post).await?;
    Ok(Json(outcome.to_dto()))
}

/// Controlli automatici, aggiornamento dello stato e riga di log
async fn apply_moderation(state: &AppState, post: Post) -> Result<(Post, ModerationOutcome), AppError> {
    let content = PostContent {
        title: &post.title,
        description: post.description.as_deref().unwrap_or_default(),
        price_min: post.price_min,
        price_max: post.price_max,
    };
    let outcome = moderation::moderate(content, state.llm.as_deref()).await;

    let updated = state
        .posts
        .update(
            &post.id,
            &UpdateModerationDTO {
                status: Some(outcome.post_status()),
                moderation_status: Some(outcome.status),
                moderation_score: Some(outcome.score),
                moderation_reason: Some(outcome.reason()),
                moderated_at: Some(Utc::now()),
                ..Default::default()
            },
        )
        .await?;

    let log = CreateModerationLogDTO {
        post_id: post.id,
        admin_id: None,
        action: outcome.log_action(),
        previous_status: Some(post.moderation_status.as_str().to_string()),
        new_status: Some(outcome.status.as_str().to_string()),
        reason: outcome.reason(),
    };
    if let Err(e) = state.moderation_logs.create(&log).await {
        warn!("Failed to write moderation log: {:?}", e);
    }

    Ok((updated, outcome))
}

/// Annunci dell'utente autenticato per la dashboard, in qualsiasi stato
#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn list_my_posts(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<AuthUser>,
    Query(params): Query<MyPostsQuery>,
) -> Result<Json<MyPostsDTO>, AppError> {
    let (limit, offset) = listing_window(params.limit, params.offset);
    let posts = state
        .posts
        .find_by_owner(&current_user.id, limit, offset)
        .await?;

    debug!("Found {} own posts", posts.len());
    Ok(Json(MyPostsDTO { posts }))
}

#[instrument(skip(state), fields(post_id = %post_id))]
pub async fn register_phone_click(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<SuccessDTO>, AppError> {
    state
        .posts
        .increment_phone_clicks(&post_id)
        .await
        .map_err(|e| {
            error!("Failed to increment phone clicks: {:?}", e);
            AppError::internal_server_error("Failed to track click")
        })?;

    debug!("Phone click tracked");
    Ok(Json(SuccessDTO::ok()))
}

#[instrument(skip(state, current_user), fields(post_id = %post_id, user_id = %current_user.id))]
pub async fn extend_post(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
    Extension(current_user): Extension<AuthUser>,
) -> Result<Json<ExtendPostResponseDTO>, AppError> {
    debug!("Extending post expiration");
    // 1. Recuperare il post
    let post = state.posts.read(&post_id).await?.ok_or_else(|| {
        warn!("Post not found");
        AppError::not_found("Post not found")
    })?;

    // 2. Solo il proprietario può estendere
    if post.user_id != current_user.id {
        warn!("User is not the owner of the post");
        return Err(AppError::forbidden("Forbidden"));
    }

    // 3. Solo gli annunci attivi
    if post.status != PostStatus::Active {
        warn!(status = ?post.status, "Post is not active");
        return Err(AppError::bad_request("Only active posts can be extended"));
    }

    // 4. Stored procedure: +30 giorni
    let data = state.posts.extend_expiration(&post_id).await?;

    info!(extended_count = data.extended_count, "Post expiration extended");
    Ok(Json(ExtendPostResponseDTO {
        success: true,
        message: "Post expiration extended by 30 days",
        data,
    }))
}

/// Conta una visualizzazione, al massimo una ogni 24 ore per visitatore.
/// Il visitatore è l'utente autenticato se presente, altrimenti il primo hop di X-Forwarded-For.
#[instrument(skip(state, headers), fields(post_id = %post_id))]
pub async fn register_view(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<ViewCountedDTO>, AppError> {
    let viewer = user_from_headers(&headers, &state.jwt_secret);

    // 1. L'autore non conta come visitatore
    let author = state
        .posts
        .find_author(&post_id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    if viewer.as_ref().is_some_and(|u| u.id == author) {
        debug!("View by the author ignored");
        return Ok(Json(ViewCountedDTO { counted: false }));
    }

    // 2. Deduplica sulla finestra di 24 ore
    let viewer_key = viewer
        .map(|u| u.id.to_string())
        .or_else(|| forwarded_for(&headers));

    if let Some(key) = viewer_key {
        if !state.views.register(&key, post_id) {
            debug!("View already counted in the current window");
            return Ok(Json(ViewCountedDTO { counted: false }));
        }
    }

    // 3. Incremento, errore non bloccante per il client
    if let Err(e) = state.posts.increment_views(&post_id).await {
        warn!("Failed to increment views: {:?}", e);
        return Ok(Json(ViewCountedDTO { counted: false }));
    }

    Ok(Json(ViewCountedDTO { counted: true }))
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
