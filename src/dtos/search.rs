//! Search DTOs - suggerimenti di ricerca e tracciamento delle frasi cercate

use crate::entities::CategoryMatch;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize, Debug, Default)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Provenienza di un suggerimento, serializzata in minuscolo
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Post,
    Category,
    Combo,
    Pattern,
    Synonym,
    Popular,
    Trending,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SuggestionDTO {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
}

impl SuggestionDTO {
    pub fn new(text: impl Into<String>, kind: SuggestionKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

#[derive(Serialize, Debug, Default)]
pub struct SearchSuggestionsDTO {
    pub trending: Vec<SuggestionDTO>,
    pub popular: Vec<SuggestionDTO>,
    pub categories: Vec<CategoryMatch>,
    pub suggestions: Vec<SuggestionDTO>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TrackSearchBodyDTO {
    pub query: Option<String>,
    pub clicked_result: Option<String>,
}

/// Riga da inserire in `search_queries`
#[derive(Debug, Clone)]
pub struct CreateSearchQueryDTO {
    pub query: String,
    pub user_id: Option<Uuid>,
    pub clicked_result: Option<String>,
}
