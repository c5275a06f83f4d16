//! Category DTOs - albero del content bot, riordino e descrizioni generate

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Nodo dell'albero categorie con i conteggi cumulati dei sottolivelli
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTreeNodeDTO {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub total_posts: i64,
    pub ai_posts: i64,
    pub human_posts: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategories: Option<Vec<CategoryTreeNodeDTO>>,
}

#[derive(Serialize, Debug)]
pub struct CategoryTreeDTO {
    pub success: bool,
    pub categories: Vec<CategoryTreeNodeDTO>,
    pub total: usize,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AiPostCountDTO {
    pub success: bool,
    pub count: i64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AiPostsDeletedDTO {
    pub success: bool,
    pub message: String,
    pub deleted: u64,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeleteByCategoryBodyDTO {
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDescriptionBodyDTO {
    pub category_name: Option<String>,
    #[serde(default)]
    pub is_subcategory: bool,
    pub parent_category_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct GeneratedDescriptionDTO {
    pub description: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ReorderBodyDTO {
    pub category_id: Option<Uuid>,
    pub new_order: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CategoryOrderDTO {
    pub id: Uuid,
    pub display_order: i32,
}

#[derive(Deserialize, Debug)]
pub struct BatchReorderBodyDTO {
    #[serde(default)]
    pub updates: Vec<CategoryOrderDTO>,
}

#[derive(Deserialize, Debug, Default)]
pub struct SortAlphabeticallyBodyDTO {
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

#[derive(Serialize, Debug)]
pub struct CategoriesUpdatedDTO {
    pub success: bool,
    pub updated: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Generazione in blocco: `all` o `selected` con `categoryIds`
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDescriptionsBodyDTO {
    pub mode: Option<String>,
    pub category_ids: Option<Vec<Uuid>>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DescriptionsGeneratedDTO {
    pub success: bool,
    pub message: String,
    pub generated: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}
