//! Favorite DTOs

use crate::entities::Favorite;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteBodyDTO {
    pub post_id: Option<Uuid>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct FavoritesListDTO {
    pub favorites: Vec<Uuid>,
}

#[derive(Serialize, Debug)]
pub struct FavoriteCreatedDTO {
    pub success: bool,
    pub favorite: Favorite,
}

/// DTO per creare un nuovo preferito
#[derive(Debug, Clone)]
pub struct CreateFavoriteDTO {
    pub user_id: Uuid,
    pub post_id: Uuid,
}
