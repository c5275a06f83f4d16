//! Category services - Ordinamento delle categorie e descrizioni generate con LLM

use crate::core::{AppError, AppState};
use crate::dtos::{
    BatchReorderBodyDTO, CategoriesUpdatedDTO, DescriptionsGeneratedDTO,
    GenerateDescriptionBodyDTO, GenerateDescriptionsBodyDTO, GeneratedDescriptionDTO,
    ReorderBodyDTO, SortAlphabeticallyBodyDTO, SuccessDTO,
};
use crate::entities::Category;
use crate::llm::{ChatMessage, CompletionClient, CompletionRequest};
use axum::extract::{Json, State};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

const DESCRIPTION_MODEL: &str = "gpt-4o-mini";
const DESCRIPTION_TEMPERATURE: f32 = 0.7;
const DESCRIPTION_MAX_TOKENS: u32 = 150;

const DESCRIPTION_SYSTEM_PROMPT: &str = "Jesteś ekspertem od tworzenia opisów kategorii ogłoszeń. Tworzysz zwięzłe, pomocne opisy w języku polskim.";
const DESCRIPTION_PROMPT_TAIL: &str = "Opis powinien być pomocny dla użytkowników dodających ogłoszenia. Napisz tylko sam opis, bez dodatkowych komentarzy.";

const SORTED_MESSAGE: &str = "Wszystkie kategorie posortowane alfabetycznie";

/// Limiti di lunghezza delle descrizioni generate in blocco
const MIN_GENERATED_CHARS: usize = 20;
const MAX_GENERATED_CHARS: usize = 600;

/// Pausa tra due richieste consecutive al modello
const BULK_REQUEST_DELAY: Duration = Duration::from_millis(200);

/// Ordine alfabetico polacco, le lettere con diacritico seguono la lettera base
const POLISH_ALPHABET: &str = "aąbcćdeęfghijklłmnńoópqrsśtuvwxyzźż";

#[instrument(skip(state, body), fields(category = ?body.category_name))]
pub async fn generate_description(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GenerateDescriptionBodyDTO>,
) -> Result<Json<GeneratedDescriptionDTO>, AppError> {
    // 1. Validazione
    let name = body
        .category_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::bad_request("Category name is required"))?;

    // 2. Il client LLM è opzionale
    let llm = state.llm.as_ref().ok_or_else(|| {
        warn!("Description requested but no LLM client configured");
        AppError::service_unavailable("AI description generation is not configured")
    })?;

    // 3. Completion, nessun retry
    let prompt = description_prompt(
        name,
        body.is_subcategory,
        body.parent_category_name.as_deref(),
    );
    let request = CompletionRequest {
        model: DESCRIPTION_MODEL,
        messages: vec![
            ChatMessage::system(DESCRIPTION_SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ],
        temperature: DESCRIPTION_TEMPERATURE,
        max_tokens: DESCRIPTION_MAX_TOKENS,
    };

    let description = llm
        .complete(request)
        .await
        .map_err(|e| {
            error!("LLM request failed: {}", e);
            AppError::internal_server_error("Internal server error").with_details(e.to_string())
        })?
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| AppError::internal_server_error("Failed to generate description"))?;

    info!("Category description generated");
    Ok(Json(GeneratedDescriptionDTO { description }))
}

/// Descrizioni per tutte le categorie (`all`) o per quelle indicate (`selected`).
/// Gli errori sulla singola categoria vengono raccolti senza interrompere il lotto.
#[instrument(skip(state, body), fields(mode = ?body.mode))]
pub async fn generate_descriptions(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GenerateDescriptionsBodyDTO>,
) -> Result<Json<DescriptionsGeneratedDTO>, AppError> {
    let llm = state.llm.as_deref().ok_or_else(|| {
        warn!("Descriptions requested but no LLM client configured");
        AppError::service_unavailable("AI description generation is not configured")
    })?;

    // 1. Categorie da elaborare
    let all = state.categories.find_all().await?;
    let names: HashMap<uuid::Uuid, String> =
        all.iter().map(|c| (c.id, c.name.clone())).collect();
    let selected: Vec<Category> = match (body.mode.as_deref(), body.category_ids.as_deref()) {
        (Some("all"), _) => all,
        (Some("selected"), Some(ids)) if !ids.is_empty() => {
            all.into_iter().filter(|c| ids.contains(&c.id)).collect()
        }
        _ => return Err(AppError::bad_request("Invalid mode or missing categoryIds")),
    };

    if selected.is_empty() {
        return Ok(Json(DescriptionsGeneratedDTO {
            success: true,
            message: "No categories to process".to_string(),
            generated: 0,
            failed: 0,
            errors: Vec::new(),
        }));
    }

    // 2. Una richiesta per categoria, in sequenza
    let total = selected.len();
    let mut generated = 0;
    let mut errors = Vec::new();
    for (i, category) in selected.iter().enumerate() {
        let parent = category.parent_id.and_then(|id| names.get(&id)).map(String::as_str);
        match describe(llm, category, parent).await {
            Ok(description) => match state.categories.set_description(&category.id, &description).await {
                Ok(_) => generated += 1,
                Err(e) => {
                    warn!(category = %category.name, "Failed to save description: {:?}", e);
                    errors.push(format!("{}: {}", category.name, e));
                }
            },
            Err(reason) => {
                warn!(category = %category.name, "Description not generated: {}", reason);
                errors.push(format!("{}: {}", category.name, reason));
            }
        }
        if i + 1 < total {
            tokio::time::sleep(BULK_REQUEST_DELAY).await;
        }
    }

    info!(generated, failed = errors.len(), "Category descriptions generated");
    Ok(Json(DescriptionsGeneratedDTO {
        success: true,
        message: format!("Generated {} of {} descriptions", generated, total),
        generated,
        failed: errors.len(),
        errors,
    }))
}

async fn describe(
    llm: &dyn CompletionClient,
    category: &Category,
    parent: Option<&str>,
) -> Result<String, String> {
    let request = CompletionRequest {
        model: DESCRIPTION_MODEL,
        messages: vec![
            ChatMessage::system(DESCRIPTION_SYSTEM_PROMPT),
            ChatMessage::user(description_prompt(&category.name, parent.is_some(), parent)),
        ],
        temperature: DESCRIPTION_TEMPERATURE,
        max_tokens: DESCRIPTION_MAX_TOKENS,
    };
    let description = llm
        .complete(request)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "No description generated".to_string())?;
    check_description_length(description.trim())
}

fn check_description_length(description: &str) -> Result<String, String> {
    let chars = description.chars().count();
    if chars < MIN_GENERATED_CHARS {
        return Err(format!("Description too short: {} chars", chars));
    }
    if chars > MAX_GENERATED_CHARS {
        return Err(format!("Description too long: {} chars", chars));
    }
    Ok(description.to_string())
}

pub fn description_prompt(name: &str, is_subcategory: bool, parent: Option<&str>) -> String {
    if is_subcategory {
        format!(
            "Napisz krótki, zwięzły opis (maksymalnie 2-3 zdania) dla podkategorii ogłoszeń \"{}\" w kategorii \"{}\". {}",
            name,
            parent.unwrap_or_default(),
            DESCRIPTION_PROMPT_TAIL
        )
    } else {
        format!(
            "Napisz krótki, zwięzły opis (maksymalnie 2-3 zdania) dla kategorii ogłoszeń \"{}\". {}",
            name, DESCRIPTION_PROMPT_TAIL
        )
    }
}

#[instrument(skip(state, body))]
pub async fn reorder_category(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ReorderBodyDTO>,
) -> Result<Json<SuccessDTO>, AppError> {
    let (Some(category_id), Some(new_order)) = (body.category_id, body.new_order) else {
        warn!("Missing categoryId or newOrder");
        return Err(AppError::bad_request("Missing categoryId or newOrder"));
    };

    if !state
        .categories
        .set_display_order(&category_id, new_order)
        .await?
    {
        return Err(AppError::not_found("Category not found"));
    }

    info!(category_id = %category_id, new_order, "Category reordered");
    Ok(Json(SuccessDTO::ok()))
}

#[instrument(skip(state, body), fields(updates = body.updates.len()))]
pub async fn batch_reorder_categories(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BatchReorderBodyDTO>,
) -> Result<Json<CategoriesUpdatedDTO>, AppError> {
    if body.updates.is_empty() {
        return Err(AppError::bad_request("Invalid updates array"));
    }

    let updates: Vec<_> = body
        .updates
        .iter()
        .map(|u| (u.id, u.display_order))
        .collect();
    let updated = state.categories.set_display_orders(&updates).await?;

    info!(updated, "Categories reordered");
    Ok(Json(CategoriesUpdatedDTO {
        success: true,
        updated,
        message: None,
    }))
}

#[instrument(skip(state, body), fields(parent_id = ?body.parent_id))]
pub async fn sort_categories_alphabetically(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SortAlphabeticallyBodyDTO>,
) -> Result<Json<CategoriesUpdatedDTO>, AppError> {
    // 1. Categorie dello stesso livello
    let categories = state.categories.find_by_parent(body.parent_id.as_ref()).await?;
    debug!("Sorting {} categories", categories.len());

    // 2. Ordine alfabetico, display_order = 10, 20, 30...
    let updates = alphabetical_order(categories);

    // 3. Aggiornamento in transazione
    let updated = state.categories.set_display_orders(&updates).await?;

    info!(updated, "Categories sorted alphabetically");
    Ok(Json(CategoriesUpdatedDTO {
        success: true,
        updated,
        message: Some(SORTED_MESSAGE),
    }))
}

/// Coppie (id, display_order) dopo l'ordinamento alfabetico per nome
pub fn alphabetical_order(mut categories: Vec<Category>) -> Vec<(uuid::Uuid, i32)> {
    categories.sort_by(|a, b| polish_cmp(&a.name, &b.name));
    categories
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id, (i as i32 + 1) * 10))
        .collect()
}

fn polish_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

fn collation_key(s: &str) -> Vec<u32> {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match POLISH_ALPHABET.chars().position(|p| p == c) {
            Some(rank) => rank as u32,
            // caratteri fuori alfabeto dopo le lettere, in ordine di code point
            None => POLISH_ALPHABET.chars().count() as u32 + c as u32,
        })
        .collect()
}
