//! Synonym DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, Debug, Validate)]
pub struct CreateSynonymBodyDTO {
    #[validate(length(max = 100, message = "Term is too long"))]
    pub term: Option<String>,
    #[validate(length(max = 100, message = "Synonym is too long"))]
    pub synonym: Option<String>,
}

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategorySynonymBodyDTO {
    pub category_id: Option<Uuid>,
    #[validate(length(max = 100, message = "Synonym is too long"))]
    pub synonym: Option<String>,
}

/// `?id=` usato dalle DELETE
#[derive(Deserialize, Debug, Default)]
pub struct IdQuery {
    pub id: Option<Uuid>,
}

#[derive(Deserialize, Debug, Default)]
pub struct CategorySynonymsQuery {
    pub category_id: Option<Uuid>,
}

/// Risposta di creazione, sia per sinonimi di ricerca che di categoria
#[derive(Serialize, Debug)]
pub struct SynonymCreatedDTO<T: Serialize> {
    pub synonym: T,
}

#[derive(Serialize, Debug)]
pub struct SynonymsListDTO<T: Serialize> {
    pub synonyms: Vec<T>,
}

#[derive(Debug, Clone)]
pub struct CreateSynonymDTO {
    pub term: String,
    pub synonym: String,
}

#[derive(Debug, Clone)]
pub struct CreateCategorySynonymDTO {
    pub category_id: Uuid,
    pub synonym: String,
}

/// Body della generazione di sinonimi con LLM: `trending`, `popular` o `custom`
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSynonymsBodyDTO {
    pub mode: Option<String>,
    pub custom_term: Option<String>,
    #[serde(default)]
    pub force_generate: bool,
}

/// Body della generazione di sinonimi di categoria: `all` o `single`
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCategorySynonymsBodyDTO {
    pub mode: Option<String>,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub force_generate: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SynonymSuggestionDTO {
    pub term: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub context: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategorySynonymSuggestionDTO {
    pub category_name: String,
    pub category_id: Uuid,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub context: String,
}

/// Proposte da rivedere prima di salvarle con PUT
#[derive(Serialize, Debug)]
pub struct SynonymSuggestionsDTO<T: Serialize> {
    pub suggestions: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'static str>,
}

#[derive(Deserialize, Debug)]
pub struct ApplySuggestionsBodyDTO<T> {
    #[serde(default = "Vec::new")]
    pub suggestions: Vec<T>,
}

#[derive(Serialize, Debug)]
pub struct SuggestionsAppliedDTO<T: Serialize> {
    pub success: bool,
    pub inserted: usize,
    pub synonyms: Vec<T>,
}
