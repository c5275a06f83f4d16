//! Search services - Suggerimenti di ricerca, espansione con sinonimi e storico delle frasi

use crate::core::{AppError, AppState, user_from_headers};
use crate::dtos::{
    CreateSearchQueryDTO, SearchQuery, SearchSuggestionsDTO, SuccessDTO, SuggestionDTO,
    SuggestionKind, TrackSearchBodyDTO, validation::normalize_text,
};
use crate::entities::{CategoryMatch, SearchQueryCount, SearchSynonym};
use crate::repositories::Create;
use axum::{
    extract::{Json, Query, State},
    http::HeaderMap,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Sotto questa lunghezza una frase non viene cercata né salvata
pub const MIN_QUERY_CHARS: usize = 2;

const TRENDING_LIMIT: i64 = 5;
const POPULAR_LIMIT: i64 = 8;
const POPULAR_WINDOW_DAYS: i32 = 7;
const CATEGORY_LIMIT: i64 = 3;
const TITLE_SCAN_LIMIT: i64 = 20;
const PAST_QUERY_LIMIT: i64 = 3;

const MAX_POST_PHRASES: usize = 5;
const PHRASE_WORDS: usize = 3;
const MAX_PHRASE_CHARS: usize = 50;
const MIN_SUGGESTION_CHARS: usize = 3;
const MAX_SUGGESTION_CHARS: usize = 100;
const MAX_SUGGESTIONS: usize = 12;
const MIN_COMBO_QUERY_CHARS: usize = 3;

/// Usate finché lo storico delle ricerche è vuoto
const FALLBACK_POPULAR: [&str; 8] = [
    "hydraulik",
    "elektryk",
    "sprzątanie",
    "korepetycje",
    "remont",
    "opieka nad dziećmi",
    "przeprowadzki",
    "złota rączka",
];

const COMBO_CITIES: [&str; 2] = ["Warszawa", "Kraków"];
const INTENT_PREFIXES: [&str; 2] = ["szukam", "potrzebuję"];

#[instrument(skip(state))]
pub async fn search_suggestions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchSuggestionsDTO>, AppError> {
    let Some(q) = params.q.as_deref().and_then(normalize_text) else {
        // 1. Nessuna frase: tendenze e ricerche popolari
        return Ok(Json(discovery_suggestions(&state).await?));
    };

    if q.chars().count() < MIN_QUERY_CHARS {
        return Ok(Json(SearchSuggestionsDTO::default()));
    }

    // 2. Varianti: la frase e i suoi sinonimi
    let query = q.to_lowercase();
    let related = state.synonyms.find_related(&[query.clone()]).await?;
    let synonyms = synonyms_of(&query, &related);
    let variants: Vec<String> = std::iter::once(query.clone())
        .chain(synonyms.iter().cloned())
        .collect();

    // 3. Sorgenti
    let categories = state.categories.search_matches(&variants, CATEGORY_LIMIT).await?;
    let titles = state.posts.find_matching_titles(&variants, TITLE_SCAN_LIMIT).await?;
    let past = state
        .search_queries
        .find_matching(&variants, PAST_QUERY_LIMIT)
        .await?;

    let suggestions = build_suggestions(&query, &titles, &categories, &synonyms, &past);
    debug!(
        categories = categories.len(),
        suggestions = suggestions.len(),
        "Search suggestions built"
    );

    Ok(Json(SearchSuggestionsDTO {
        trending: Vec::new(),
        popular: Vec::new(),
        categories,
        suggestions,
    }))
}

async fn discovery_suggestions(state: &AppState) -> Result<SearchSuggestionsDTO, AppError> {
    let trending = state.search_queries.find_trending(TRENDING_LIMIT).await?;
    let popular = state
        .search_queries
        .find_popular(POPULAR_WINDOW_DAYS, POPULAR_LIMIT)
        .await?;

    let popular = if popular.is_empty() {
        FALLBACK_POPULAR
            .iter()
            .map(|text| SuggestionDTO::new(*text, SuggestionKind::Popular))
            .collect()
    } else {
        to_suggestions(popular, SuggestionKind::Popular)
    };

    Ok(SearchSuggestionsDTO {
        trending: to_suggestions(trending, SuggestionKind::Trending),
        popular,
        ..Default::default()
    })
}

fn to_suggestions(rows: Vec<SearchQueryCount>, kind: SuggestionKind) -> Vec<SuggestionDTO> {
    rows.into_iter()
        .map(|row| SuggestionDTO::new(row.query, kind))
        .collect()
}

#[instrument(skip(state, headers, body))]
pub async fn track_search(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<TrackSearchBodyDTO>,
) -> Result<Json<SuccessDTO>, AppError> {
    let query = body
        .query
        .as_deref()
        .and_then(normalize_text)
        .filter(|q| q.chars().count() >= MIN_QUERY_CHARS)
        .ok_or_else(|| AppError::bad_request("Query too short"))?;

    // Autenticazione opzionale: le ricerche anonime restano senza utente
    let user_id = user_from_headers(&headers, &state.jwt_secret).map(|u| u.id);

    let row = CreateSearchQueryDTO {
        query,
        user_id,
        clicked_result: body.clicked_result.as_deref().and_then(normalize_text),
    };
    if let Err(e) = state.search_queries.create(&row).await {
        warn!("Failed to track search query: {:?}", e);
        return Ok(Json(SuccessDTO { success: false }));
    }

    info!(anonymous = user_id.is_none(), "Search query tracked");
    Ok(Json(SuccessDTO::ok()))
}

/// Termini di una ricerca: minuscoli, senza duplicati, almeno 2 caratteri
pub fn search_terms(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.split_whitespace()
        .map(str::to_lowercase)
        .filter(|t| t.chars().count() >= MIN_QUERY_CHARS)
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Sinonimi di un termine in entrambe le direzioni (term -> synonym e synonym -> term)
pub fn synonyms_of(term: &str, pairs: &[SearchSynonym]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for pair in pairs {
        let other = if pair.term.to_lowercase() == term {
            &pair.synonym
        } else if pair.synonym.to_lowercase() == term {
            &pair.term
        } else {
            continue;
        };
        let other = other.to_lowercase();
        if other != term && !out.contains(&other) {
            out.push(other);
        }
    }
    out
}

/// Un gruppo per termine: il termine seguito dai suoi sinonimi
pub fn expand_terms(terms: &[String], pairs: &[SearchSynonym]) -> Vec<Vec<String>> {
    terms
        .iter()
        .map(|term| {
            let mut group = vec![term.clone()];
            group.extend(synonyms_of(term, pairs));
            group
        })
        .collect()
}

/// Gruppi di termini per il filtro della lista pubblica, vuoto per ricerche troppo corte
pub async fn term_groups(state: &AppState, search: &str) -> Result<Vec<Vec<String>>, AppError> {
    let search = search.trim();
    if search.chars().count() < MIN_QUERY_CHARS {
        return Ok(Vec::new());
    }
    let terms = search_terms(search);
    if terms.is_empty() {
        return Ok(Vec::new());
    }
    let related = state.synonyms.find_related(&terms).await?;
    Ok(expand_terms(&terms, &related))
}

/// Ordine: frasi dai titoli, categorie, combinazioni con le città, intenzioni,
/// sinonimi, ricerche passate. Duplicati scartati senza distinzione di maiuscole.
pub fn build_suggestions(
    query: &str,
    titles: &[String],
    categories: &[CategoryMatch],
    synonyms: &[String],
    past: &[SearchQueryCount],
) -> Vec<SuggestionDTO> {
    let mut candidates: Vec<SuggestionDTO> = titles
        .iter()
        .filter_map(|title| title_phrase(title, query))
        .take(MAX_POST_PHRASES)
        .map(|phrase| SuggestionDTO::new(phrase, SuggestionKind::Post))
        .collect();

    candidates.extend(
        categories
            .iter()
            .map(|c| SuggestionDTO::new(c.name.clone(), SuggestionKind::Category)),
    );

    if let Some(first) = categories.first() {
        if query.chars().count() >= MIN_COMBO_QUERY_CHARS {
            candidates.extend(
                COMBO_CITIES
                    .iter()
                    .map(|city| SuggestionDTO::new(format!("{} {}", first.name, city), SuggestionKind::Combo)),
            );
            let lower = first.name.to_lowercase();
            candidates.extend(
                INTENT_PREFIXES
                    .iter()
                    .map(|prefix| SuggestionDTO::new(format!("{} {}", prefix, lower), SuggestionKind::Pattern)),
            );
        }
    }

    candidates.extend(
        synonyms
            .iter()
            .map(|s| SuggestionDTO::new(s.clone(), SuggestionKind::Synonym)),
    );
    candidates.extend(
        past.iter()
            .map(|p| SuggestionDTO::new(p.query.clone(), SuggestionKind::Popular)),
    );

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|s| (MIN_SUGGESTION_CHARS..=MAX_SUGGESTION_CHARS).contains(&s.text.chars().count()))
        .filter(|s| seen.insert(s.text.to_lowercase()))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Primo spezzone di al massimo tre parole del titolo che contiene la frase cercata
fn title_phrase(title: &str, query: &str) -> Option<String> {
    let first = query.split_whitespace().next()?;
    let words: Vec<&str> = title.split_whitespace().collect();
    let start = words.iter().position(|w| w.to_lowercase().contains(first))?;
    let phrase = words[start..(start + PHRASE_WORDS).min(words.len())]
        .join(" ")
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string();
    (phrase.to_lowercase().contains(query) && phrase.chars().count() <= MAX_PHRASE_CHARS)
        .then_some(phrase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn pair(term: &str, synonym: &str) -> SearchSynonym {
        SearchSynonym {
            id: Uuid::new_v4(),
            term: term.to_string(),
            synonym: synonym.to_string(),
            created_at: Utc::now(),
        }
    }

    fn category(name: &str) -> CategoryMatch {
        CategoryMatch {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: name.to_lowercase(),
        }
    }

    fn texts(suggestions: &[SuggestionDTO]) -> Vec<&str> {
        suggestions.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn terms_are_lowercased_and_deduplicated() {
        assert_eq!(
            search_terms("  Kran  kran a Bateria "),
            vec!["kran".to_string(), "bateria".to_string()]
        );
    }

    #[test]
    fn synonyms_expand_in_both_directions() {
        let pairs = vec![pair("kran", "bateria"), pair("Piec", "kocioł")];
        assert_eq!(synonyms_of("bateria", &pairs), vec!["kran".to_string()]);
        assert_eq!(synonyms_of("piec", &pairs), vec!["kocioł".to_string()]);

        let groups = expand_terms(&["kran".to_string(), "tanio".to_string()], &pairs);
        assert_eq!(
            groups,
            vec![
                vec!["kran".to_string(), "bateria".to_string()],
                vec!["tanio".to_string()],
            ]
        );
    }

    #[test]
    fn title_phrase_starts_at_the_matching_word() {
        assert_eq!(
            title_phrase("Szybka naprawa kranów, Kraków i okolice", "kran").as_deref(),
            Some("kranów, Kraków i")
        );
        assert_eq!(title_phrase("Korepetycje z matematyki", "kran"), None);
    }

    #[test]
    fn suggestions_follow_source_order() {
        let titles = vec!["Naprawa kranów Kraków".to_string()];
        let categories = vec![category("Hydraulik")];
        let synonyms = vec!["bateria".to_string()];
        let past = vec![SearchQueryCount {
            query: "kran cieknie".to_string(),
            count: 4,
        }];

        let suggestions = build_suggestions("kran", &titles, &categories, &synonyms, &past);
        assert_eq!(
            texts(&suggestions),
            vec![
                "kranów Kraków",
                "Hydraulik",
                "Hydraulik Warszawa",
                "Hydraulik Kraków",
                "szukam hydraulik",
                "potrzebuję hydraulik",
                "bateria",
                "kran cieknie",
            ]
        );
        assert_eq!(suggestions[0].kind, SuggestionKind::Post);
        assert_eq!(suggestions[2].kind, SuggestionKind::Combo);
        assert_eq!(suggestions[4].kind, SuggestionKind::Pattern);
        assert_eq!(suggestions[7].kind, SuggestionKind::Popular);
    }

    #[test]
    fn short_query_gets_no_combos() {
        let suggestions = build_suggestions("hy", &[], &[category("Hydraulik")], &[], &[]);
        assert_eq!(texts(&suggestions), vec!["Hydraulik"]);
    }

    #[test]
    fn duplicates_and_limits_are_applied() {
        let titles: Vec<String> = (0..10).map(|i| format!("Kran numer {}", i)).collect();
        let synonyms = vec!["KRAN numer 0".to_string(), "ab".to_string()];
        let suggestions = build_suggestions("kran", &titles, &[], &synonyms, &[]);

        // massimo 5 frasi dai titoli, il sinonimo duplicato e quello troppo corto spariscono
        assert_eq!(suggestions.len(), 5);
        assert!(suggestions.iter().all(|s| s.kind == SuggestionKind::Post));
    }
}
