//! Synonym services - Sinonimi di ricerca e sinonimi di categoria,
//! inseriti a mano o proposti dal modello e poi confermati dall'admin

use crate::core::{AppError, AppState};
use crate::dtos::{
    ApplySuggestionsBodyDTO, CategorySynonymSuggestionDTO, CategorySynonymsQuery,
    CreateCategorySynonymBodyDTO, CreateCategorySynonymDTO, CreateSynonymBodyDTO,
    CreateSynonymDTO, GenerateCategorySynonymsBodyDTO, GenerateSynonymsBodyDTO, IdQuery,
    SuccessDTO, SuggestionsAppliedDTO, SynonymCreatedDTO, SynonymSuggestionDTO,
    SynonymSuggestionsDTO, SynonymsListDTO, validation::normalize_text,
};
use crate::entities::{Category, CategorySynonym, SearchSynonym};
use crate::llm::{ChatMessage, CompletionClient, CompletionRequest, parse_json_list};
use crate::repositories::{Create, Delete, Read};
use axum::extract::{Json, Query, State};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

const SYNONYM_MODEL: &str = "gpt-4o-mini";
const SYNONYM_TEMPERATURE: f32 = 0.3;
const SYNONYM_MAX_TOKENS: u32 = 2000;

/// Frasi prese dallo storico per le modalità trending/popular
const SOURCE_TERMS_LIMIT: i64 = 10;
const POPULAR_WINDOW_DAYS: i32 = 30;

const SYNONYM_SYSTEM_PROMPT: &str = "Jesteś ekspertem od języka polskiego. Zwracasz TYLKO czysty JSON bez żadnych dodatkowych komentarzy czy formatowania markdown.";
const CATEGORY_SYNONYM_SYSTEM_PROMPT: &str = "Jesteś ekspertem od języka polskiego i kategoryzacji usług. Zwracasz TYLKO czysty JSON bez żadnych dodatkowych komentarzy czy formatowania markdown.";

const NO_SEARCHES_MESSAGE: &str = "Brak wyszukiwań w bazie danych. Użyj trybu \"Własny termin\" lub poczekaj aż użytkownicy zaczną wyszukiwać.";
const ALL_TERMS_COVERED_MESSAGE: &str = "Wszystkie terminy już mają synonimy";
const NO_CATEGORIES_MESSAGE: &str = "Brak kategorii do przetworzenia";
const ALL_CATEGORIES_COVERED_MESSAGE: &str = "Wszystkie kategorie już mają synonimy";

#[instrument(skip(state))]
pub async fn list_synonyms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SynonymsListDTO<SearchSynonym>>, AppError> {
    let synonyms = state.synonyms.find_all().await?;
    debug!("Found {} synonyms", synonyms.len());
    Ok(Json(SynonymsListDTO { synonyms }))
}

#[instrument(skip(state, body))]
pub async fn create_synonym(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateSynonymBodyDTO>,
) -> Result<Json<SynonymCreatedDTO<SearchSynonym>>, AppError> {
    body.validate()?;
    let (Some(term), Some(synonym)) = (
        body.term.as_deref().and_then(normalize_text),
        body.synonym.as_deref().and_then(normalize_text),
    ) else {
        warn!("Missing term or synonym");
        return Err(AppError::bad_request("Term and synonym required"));
    };

    let synonym = state
        .synonyms
        .create(&CreateSynonymDTO { term, synonym })
        .await?;

    info!(synonym_id = %synonym.id, "Synonym created");
    Ok(Json(SynonymCreatedDTO { synonym }))
}

#[instrument(skip(state))]
pub async fn delete_synonym(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IdQuery>,
) -> Result<Json<SuccessDTO>, AppError> {
    let id = params.id.ok_or_else(|| AppError::bad_request("ID required"))?;

    if !state.synonyms.delete(&id).await? {
        return Err(AppError::not_found("Synonym not found"));
    }

    info!(synonym_id = %id, "Synonym deleted");
    Ok(Json(SuccessDTO::ok()))
}

#[instrument(skip(state))]
pub async fn list_category_synonyms(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CategorySynonymsQuery>,
) -> Result<Json<SynonymsListDTO<CategorySynonym>>, AppError> {
    let synonyms = state
        .category_synonyms
        .find_by_category(params.category_id.as_ref())
        .await?;
    debug!("Found {} category synonyms", synonyms.len());
    Ok(Json(SynonymsListDTO { synonyms }))
}

#[instrument(skip(state, body))]
pub async fn create_category_synonym(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateCategorySynonymBodyDTO>,
) -> Result<Json<SynonymCreatedDTO<CategorySynonym>>, AppError> {
    body.validate()?;
    let (Some(category_id), Some(synonym)) = (
        body.category_id,
        body.synonym.as_deref().and_then(normalize_text),
    ) else {
        warn!("Missing category or synonym");
        return Err(AppError::bad_request("Category ID and synonym required"));
    };

    let synonym = state
        .category_synonyms
        .create(&CreateCategorySynonymDTO {
            category_id,
            synonym,
        })
        .await?;

    info!(synonym_id = %synonym.id, "Category synonym created");
    Ok(Json(SynonymCreatedDTO { synonym }))
}

#[instrument(skip(state))]
pub async fn delete_category_synonym(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IdQuery>,
) -> Result<Json<SuccessDTO>, AppError> {
    let id = params.id.ok_or_else(|| AppError::bad_request("ID required"))?;

    if !state.category_synonyms.delete(&id).await? {
        return Err(AppError::not_found("Synonym not found"));
    }

    info!(synonym_id = %id, "Category synonym deleted");
    Ok(Json(SuccessDTO::ok()))
}

/// Proposte di sinonimi per le frasi cercate (trending, popular o un termine scelto)
#[instrument(skip(state, body), fields(mode = ?body.mode))]
pub async fn generate_synonyms(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GenerateSynonymsBodyDTO>,
) -> Result<Json<SynonymSuggestionsDTO<SynonymSuggestionDTO>>, AppError> {
    let llm = require_llm(&state)?;

    // 1. Frasi da analizzare
    let terms: Vec<String> = match body.mode.as_deref().unwrap_or("trending") {
        "trending" => state
            .search_queries
            .find_trending(SOURCE_TERMS_LIMIT)
            .await?
            .into_iter()
            .map(|row| row.query)
            .collect(),
        "popular" => state
            .search_queries
            .find_popular(POPULAR_WINDOW_DAYS, SOURCE_TERMS_LIMIT)
            .await?
            .into_iter()
            .map(|row| row.query)
            .collect(),
        "custom" => match body.custom_term.as_deref().and_then(normalize_text) {
            Some(term) => vec![term],
            None => return Err(AppError::bad_request("Invalid mode or missing term")),
        },
        _ => return Err(AppError::bad_request("Invalid mode or missing term")),
    };

    if terms.is_empty() {
        return Ok(Json(no_suggestions(NO_SEARCHES_MESSAGE)));
    }

    // 2. Salta le frasi che hanno già sinonimi
    let terms = if body.force_generate {
        terms
    } else {
        let existing: HashSet<String> = state
            .synonyms
            .find_all()
            .await?
            .into_iter()
            .map(|s| s.term.to_lowercase())
            .collect();
        let fresh: Vec<String> = terms
            .into_iter()
            .filter(|t| !existing.contains(&t.to_lowercase()))
            .collect();
        if fresh.is_empty() {
            return Ok(Json(no_suggestions(ALL_TERMS_COVERED_MESSAGE)));
        }
        fresh
    };

    // 3. Completion e parsing
    let raw = complete(llm, SYNONYM_SYSTEM_PROMPT, synonym_prompt(&terms)).await?;
    let suggestions = parse_json_list::<SynonymSuggestionDTO>(&raw).map_err(|e| {
        warn!("Unparsable synonym suggestions: {}", e);
        AppError::internal_server_error("Failed to parse AI response").with_details(raw.clone())
    })?;
    let suggestions = clean_term_suggestions(suggestions);

    info!(terms = terms.len(), suggestions = suggestions.len(), "Synonym suggestions generated");
    Ok(Json(SynonymSuggestionsDTO {
        suggestions,
        message: None,
        model: Some(SYNONYM_MODEL),
    }))
}

/// Salva le proposte confermate, le coppie già presenti sono ignorate
#[instrument(skip(state, body), fields(suggestions = body.suggestions.len()))]
pub async fn apply_synonym_suggestions(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ApplySuggestionsBodyDTO<SynonymSuggestionDTO>>,
) -> Result<Json<SuggestionsAppliedDTO<SearchSynonym>>, AppError> {
    if body.suggestions.is_empty() {
        return Err(AppError::bad_request("No suggestions provided"));
    }

    let pairs: Vec<CreateSynonymDTO> = body
        .suggestions
        .iter()
        .filter_map(|s| normalize_text(&s.term).map(|term| (term, &s.synonyms)))
        .flat_map(|(term, synonyms)| {
            synonyms
                .iter()
                .filter_map(|syn| normalize_text(syn))
                .map(move |synonym| CreateSynonymDTO {
                    term: term.clone(),
                    synonym,
                })
        })
        .collect();

    let synonyms = state.synonyms.create_many(&pairs).await?;
    info!(inserted = synonyms.len(), "Synonym suggestions applied");
    Ok(Json(SuggestionsAppliedDTO {
        success: true,
        inserted: synonyms.len(),
        synonyms,
    }))
}

/// Proposte di sinonimi per tutte le categorie o per una sola
#[instrument(skip(state, body), fields(mode = ?body.mode))]
pub async fn generate_category_synonyms(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GenerateCategorySynonymsBodyDTO>,
) -> Result<Json<SynonymSuggestionsDTO<CategorySynonymSuggestionDTO>>, AppError> {
    let llm = require_llm(&state)?;

    // 1. Categorie da analizzare
    let mode = body.mode.as_deref().unwrap_or("all");
    let categories: Vec<Category> = match (mode, body.category_id) {
        ("all", _) => state.categories.find_all().await?,
        ("single", Some(category_id)) => vec![
            state
                .categories
                .read(&category_id)
                .await?
                .ok_or_else(|| AppError::not_found("Category not found"))?,
        ],
        _ => return Err(AppError::bad_request("Invalid mode or missing category ID")),
    };

    if categories.is_empty() {
        return Ok(Json(no_suggestions(NO_CATEGORIES_MESSAGE)));
    }

    // 2. In modalità all salta le categorie che hanno già sinonimi
    let categories = if mode == "all" && !body.force_generate {
        let covered: HashSet<Uuid> = state
            .category_synonyms
            .find_by_category(None)
            .await?
            .into_iter()
            .map(|s| s.category_id)
            .collect();
        let fresh: Vec<Category> = categories
            .into_iter()
            .filter(|c| !covered.contains(&c.id))
            .collect();
        if fresh.is_empty() {
            return Ok(Json(no_suggestions(ALL_CATEGORIES_COVERED_MESSAGE)));
        }
        fresh
    } else {
        categories
    };

    // 3. Completion e parsing
    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    let raw = complete(
        llm,
        CATEGORY_SYNONYM_SYSTEM_PROMPT,
        category_synonym_prompt(&names),
    )
    .await?;
    let raw_suggestions = parse_json_list::<RawCategorySuggestion>(&raw).map_err(|e| {
        warn!("Unparsable category synonym suggestions: {}", e);
        AppError::internal_server_error("Failed to parse AI response").with_details(raw.clone())
    })?;
    let suggestions = resolve_category_suggestions(raw_suggestions, &categories);

    info!(
        categories = categories.len(),
        suggestions = suggestions.len(),
        "Category synonym suggestions generated"
    );
    Ok(Json(SynonymSuggestionsDTO {
        suggestions,
        message: None,
        model: Some(SYNONYM_MODEL),
    }))
}

#[instrument(skip(state, body), fields(suggestions = body.suggestions.len()))]
pub async fn apply_category_synonym_suggestions(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ApplySuggestionsBodyDTO<CategorySynonymSuggestionDTO>>,
) -> Result<Json<SuggestionsAppliedDTO<CategorySynonym>>, AppError> {
    if body.suggestions.is_empty() {
        return Err(AppError::bad_request("No suggestions provided"));
    }

    let pairs: Vec<CreateCategorySynonymDTO> = body
        .suggestions
        .iter()
        .flat_map(|s| {
            s.synonyms
                .iter()
                .filter_map(|syn| normalize_text(syn))
                .map(move |synonym| CreateCategorySynonymDTO {
                    category_id: s.category_id,
                    synonym,
                })
        })
        .collect();

    // categoria inesistente -> FK violation -> 400
    let synonyms = state.category_synonyms.create_many(&pairs).await?;
    info!(inserted = synonyms.len(), "Category synonym suggestions applied");
    Ok(Json(SuggestionsAppliedDTO {
        success: true,
        inserted: synonyms.len(),
        synonyms,
    }))
}

/// Risposta del modello per una categoria: l'id può mancare o non essere valido
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawCategorySuggestion {
    category_name: String,
    #[serde(default)]
    category_id: Option<String>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    context: String,
}

fn require_llm(state: &AppState) -> Result<&dyn CompletionClient, AppError> {
    state.llm.as_deref().ok_or_else(|| {
        warn!("Synonym generation requested but no LLM client configured");
        AppError::service_unavailable("AI synonym generation is not configured")
    })
}

fn no_suggestions<T: serde::Serialize>(message: &'static str) -> SynonymSuggestionsDTO<T> {
    SynonymSuggestionsDTO {
        suggestions: Vec::new(),
        message: Some(message),
        model: None,
    }
}

async fn complete(
    llm: &dyn CompletionClient,
    system: &'static str,
    prompt: String,
) -> Result<String, AppError> {
    let request = CompletionRequest {
        model: SYNONYM_MODEL,
        messages: vec![ChatMessage::system(system), ChatMessage::user(prompt)],
        temperature: SYNONYM_TEMPERATURE,
        max_tokens: SYNONYM_MAX_TOKENS,
    };
    llm.complete(request)
        .await
        .map_err(|e| {
            error!("LLM request failed: {}", e);
            AppError::internal_server_error("Failed to generate synonyms").with_details(e.to_string())
        })?
        .ok_or_else(|| AppError::internal_server_error("Failed to generate synonyms"))
}

fn numbered(items: &[impl AsRef<str>]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn synonym_prompt(terms: &[String]) -> String {
    format!(
        r#"Wygeneruj polskie synonimy dla fraz wyszukiwanych w serwisie ogłoszeń z lokalnymi usługami.
Synonimy to alternatywne nazwy, których użytkownicy mogą użyć szukając tej samej usługi (formalne i potoczne), w formie podstawowej.

Frazy do analizy:
{}

Zwróć obiekt JSON z kluczem "suggestions":
{{"suggestions": [{{"term": "fraza", "synonyms": ["synonim1", "synonim2"], "context": "krótkie wyjaśnienie po polsku"}}]}}
Od 3 do 7 synonimów na frazę."#,
        numbered(terms)
    )
}

fn category_synonym_prompt(names: &[&str]) -> String {
    format!(
        r#"Wygeneruj polskie synonimy dla kategorii usług w serwisie ogłoszeń lokalnych.
Synonimy to alternatywne nazwy, których użytkownicy mogą użyć szukając usługi z tej kategorii (formalne i potoczne), w mianowniku liczby pojedynczej.

Kategorie do analizy:
{}

Zwróć obiekt JSON z kluczem "suggestions":
{{"suggestions": [{{"categoryName": "nazwa kategorii", "synonyms": ["synonim1", "synonim2"], "context": "krótkie wyjaśnienie po polsku"}}]}}
Od 3 do 7 synonimów na kategorię."#,
        numbered(names)
    )
}

/// Sinonimi minuscoli, senza duplicati né ripetizioni del termine; proposte vuote scartate
fn clean_term_suggestions(suggestions: Vec<SynonymSuggestionDTO>) -> Vec<SynonymSuggestionDTO> {
    suggestions
        .into_iter()
        .filter_map(|s| {
            let term = normalize_text(&s.term)?;
            let synonyms = clean_synonyms(&term, &s.synonyms);
            (!synonyms.is_empty()).then(|| SynonymSuggestionDTO {
                term,
                synonyms,
                context: s.context,
            })
        })
        .collect()
}

fn clean_synonyms(term: &str, synonyms: &[String]) -> Vec<String> {
    let term = term.to_lowercase();
    let mut seen = HashSet::new();
    synonyms
        .iter()
        .filter_map(|s| normalize_text(s))
        .map(|s| s.to_lowercase())
        .filter(|s| *s != term && seen.insert(s.clone()))
        .collect()
}

/// Id per nome (senza distinzione di maiuscole), poi quello restituito dal modello;
/// restano solo le categorie richieste
fn resolve_category_suggestions(
    raw: Vec<RawCategorySuggestion>,
    categories: &[Category],
) -> Vec<CategorySynonymSuggestionDTO> {
    let by_name: HashMap<String, &Category> = categories
        .iter()
        .map(|c| (c.name.to_lowercase(), c))
        .collect();
    let requested: HashSet<Uuid> = categories.iter().map(|c| c.id).collect();

    raw.into_iter()
        .filter_map(|s| {
            let category = by_name.get(&s.category_name.trim().to_lowercase()).copied();
            let category_id = category.map(|c| c.id).or_else(|| {
                s.category_id
                    .as_deref()
                    .and_then(|id| Uuid::parse_str(id).ok())
                    .filter(|id| requested.contains(id))
            })?;
            let category_name = category.map_or(s.category_name.clone(), |c| c.name.clone());
            let synonyms = clean_synonyms(&category_name, &s.synonyms);
            (!synonyms.is_empty()).then(|| CategorySynonymSuggestionDTO {
                category_name,
                category_id,
                synonyms,
                context: s.context,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn category(name: &str) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            parent_id: None,
            display_order: 0,
            description: None,
            created_at: Utc::now(),
        }
    }

    fn raw(name: &str, id: Option<String>, synonyms: &[&str]) -> RawCategorySuggestion {
        RawCategorySuggestion {
            category_name: name.to_string(),
            category_id: id,
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
            context: String::new(),
        }
    }

    #[test]
    fn term_suggestions_are_normalised() {
        let suggestions = clean_term_suggestions(vec![
            SynonymSuggestionDTO {
                term: " kran ".to_string(),
                synonyms: vec!["Bateria".to_string(), "bateria".to_string(), "KRAN".to_string()],
                context: "armatura".to_string(),
            },
            SynonymSuggestionDTO {
                term: "piec".to_string(),
                synonyms: vec!["  ".to_string()],
                context: String::new(),
            },
        ]);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].term, "kran");
        assert_eq!(suggestions[0].synonyms, vec!["bateria".to_string()]);
    }

    #[test]
    fn category_ids_come_from_names_then_from_the_reply() {
        let hydraulik = category("Hydraulik");
        let korepetycje = category("Korepetycje");
        let categories = vec![hydraulik.clone(), korepetycje.clone()];

        let resolved = resolve_category_suggestions(
            vec![
                raw("hydraulik", None, &["instalator"]),
                raw("Nauka", Some(korepetycje.id.to_string()), &["nauczyciel"]),
                raw("Ogrodnik", Some(Uuid::new_v4().to_string()), &["sadownik"]),
                raw("Nieznana", Some("abc".to_string()), &["cokolwiek"]),
            ],
            &categories,
        );

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].category_id, hydraulik.id);
        assert_eq!(resolved[0].category_name, "Hydraulik");
        assert_eq!(resolved[1].category_id, korepetycje.id);
    }

    #[test]
    fn prompts_number_the_items() {
        let prompt = synonym_prompt(&["hydraulik".to_string(), "elektryk".to_string()]);
        assert!(prompt.contains("1. hydraulik\n2. elektryk"));
        assert!(category_synonym_prompt(&["Hydraulik"]).contains("1. Hydraulik"));
    }
}
