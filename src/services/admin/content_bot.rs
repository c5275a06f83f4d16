//! Content bot services - Gestione dei post generati da AI

use crate::core::{AppError, AppState};
use crate::dtos::{
    AiPostCountDTO, AiPostsDeletedDTO, CategoryTreeDTO, CategoryTreeNodeDTO,
    DeleteByCategoryBodyDTO,
};
use crate::entities::CategoryPostCounts;
use axum::extract::{Json, State};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// oltre questa profondità l'albero viene troncato (protezione da cicli nei dati)
const MAX_TREE_DEPTH: usize = 16;

#[instrument(skip(state))]
pub async fn count_ai_posts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AiPostCountDTO>, AppError> {
    let count = state.posts.count_ai_generated().await?;
    debug!(count, "AI posts counted");
    Ok(Json(AiPostCountDTO {
        success: true,
        count,
    }))
}

#[instrument(skip(state))]
pub async fn delete_all_ai_posts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AiPostsDeletedDTO>, AppError> {
    let deleted = state.posts.delete_ai_generated().await?;
    info!(deleted, "AI posts deleted");
    Ok(Json(AiPostsDeletedDTO {
        success: true,
        message: format!("Deleted {} AI-generated posts", deleted),
        deleted,
    }))
}

#[instrument(skip(state, body), fields(categories = body.category_ids.len()))]
pub async fn delete_ai_posts_by_category(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DeleteByCategoryBodyDTO>,
) -> Result<Json<AiPostsDeletedDTO>, AppError> {
    if body.category_ids.is_empty() {
        warn!("No categories selected");
        return Err(AppError::bad_request("No categories selected"));
    }

    let deleted = state
        .posts
        .delete_ai_generated_in_categories(&body.category_ids)
        .await?;

    info!(deleted, "AI posts deleted from categories");
    Ok(Json(AiPostsDeletedDTO {
        success: true,
        message: format!(
            "Deleted {} AI-generated posts from {} categories",
            deleted,
            body.category_ids.len()
        ),
        deleted,
    }))
}

#[instrument(skip(state))]
pub async fn list_categories_with_counts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CategoryTreeDTO>, AppError> {
    let rows = state.categories.find_all_with_post_counts().await?;
    let total = rows.len();
    let categories = build_category_tree(&rows);

    debug!(total, roots = categories.len(), "Category tree built");
    Ok(Json(CategoryTreeDTO {
        success: true,
        categories,
        total,
    }))
}

/// Costruisce l'albero delle categorie; ogni nodo somma i conteggi dei discendenti.
/// L'ordine dei fratelli segue l'ordine delle righe in input.
pub fn build_category_tree(rows: &[CategoryPostCounts]) -> Vec<CategoryTreeNodeDTO> {
    let mut children: HashMap<Option<Uuid>, Vec<&CategoryPostCounts>> = HashMap::new();
    for row in rows {
        children.entry(row.parent_id).or_default().push(row);
    }
    build_level(None, &children, 0)
}

fn build_level(
    parent_id: Option<Uuid>,
    children: &HashMap<Option<Uuid>, Vec<&CategoryPostCounts>>,
    depth: usize,
) -> Vec<CategoryTreeNodeDTO> {
    if depth >= MAX_TREE_DEPTH {
        return Vec::new();
    }

    children
        .get(&parent_id)
        .map(|rows| {
            rows.iter()
                .map(|row| {
                    let subcategories = build_level(Some(row.id), children, depth + 1);
                    let (total, ai) = subcategories.iter().fold(
                        (row.total_posts, row.ai_posts),
                        |(total, ai), sub| (total + sub.total_posts, ai + sub.ai_posts),
                    );

                    CategoryTreeNodeDTO {
                        id: row.id,
                        name: row.name.clone(),
                        parent_id: row.parent_id,
                        total_posts: total,
                        ai_posts: ai,
                        human_posts: total - ai,
                        subcategories: (!subcategories.is_empty()).then_some(subcategories),
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: Uuid, parent_id: Option<Uuid>, total: i64, ai: i64) -> CategoryPostCounts {
        CategoryPostCounts {
            id,
            name: id.to_string(),
            parent_id,
            total_posts: total,
            ai_posts: ai,
        }
    }

    #[test]
    fn counts_are_summed_over_three_levels() {
        let (root, child, grandchild) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let rows = vec![
            row(root, None, 1, 0),
            row(child, Some(root), 2, 1),
            row(grandchild, Some(child), 4, 3),
        ];

        let tree = build_category_tree(&rows);
        assert_eq!(tree.len(), 1);
        let root_node = &tree[0];
        assert_eq!(root_node.total_posts, 7);
        assert_eq!(root_node.ai_posts, 4);
        assert_eq!(root_node.human_posts, 3);

        let child_node = &root_node.subcategories.as_ref().unwrap()[0];
        assert_eq!(child_node.total_posts, 6);
        assert_eq!(child_node.human_posts, 2);

        let leaf = &child_node.subcategories.as_ref().unwrap()[0];
        assert!(leaf.subcategories.is_none());
        assert_eq!(leaf.ai_posts, 3);
    }

    #[test]
    fn sibling_order_follows_input() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let tree = build_category_tree(&[row(b, None, 0, 0), row(a, None, 0, 0)]);
        assert_eq!(tree[0].id, b);
        assert_eq!(tree[1].id, a);
    }

    #[test]
    fn leaf_serialization_omits_subcategories() {
        let tree = build_category_tree(&[row(Uuid::new_v4(), None, 3, 1)]);
        let json = serde_json::to_value(&tree[0]).unwrap();
        assert_eq!(json["humanPosts"], 2);
        assert!(json.get("subcategories").is_none());
    }

    #[test]
    fn cyclic_data_does_not_recurse_forever() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        // nessuna radice: a e b si puntano a vicenda
        let tree = build_category_tree(&[row(a, Some(b), 1, 0), row(b, Some(a), 1, 0)]);
        assert!(tree.is_empty());
    }
}
