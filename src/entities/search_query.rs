//! Search query entity - Storico delle ricerche, aggregato per frase

use serde::{Deserialize, Serialize};

/// Frase cercata (minuscola) con il numero di ricerche nella finestra considerata
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct SearchQueryCount {
    pub query: String,
    pub count: i64,
}
