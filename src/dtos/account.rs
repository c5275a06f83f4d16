//! Account DTOs

use serde::Deserialize;
use uuid::Uuid;

/// L'id deve coincidere con l'utente autenticato
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountBodyDTO {
    pub user_id: Option<Uuid>,
}
