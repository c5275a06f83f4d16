//! Trait comuni dei repository
//!
//! Interfacce generiche per le operazioni CRUD, implementate da ogni repository
//! sulla propria tabella. Le query specifiche restano metodi inerenti della struct.

/// Inserimento di una nuova riga
///
/// # Type Parameters
/// * `Entity` - cosa ritorna l'insert (la riga completa, o solo l'id per le tabelle di log)
/// * `CreateDTO` - dati di creazione, senza chiave primaria
pub trait Create<Entity, CreateDTO> {
    /// # Returns
    /// * `Ok(Entity)` - riga creata, con id e default assegnati dal database
    /// * `Err(sqlx::Error)` - violazioni di vincoli incluse (unique, foreign key)
    async fn create(&self, data: &CreateDTO) -> Result<Entity, sqlx::Error>;
}

/// Lettura per chiave primaria
pub trait Read<Entity, Id> {
    /// # Returns
    /// * `Ok(Some(Entity))` - riga trovata
    /// * `Ok(None)` - nessuna riga con quella chiave
    async fn read(&self, id: &Id) -> Result<Option<Entity>, sqlx::Error>;
}

/// Aggiornamento parziale: solo i campi valorizzati nel DTO vengono scritti
pub trait Update<Entity, UpdateDTO, Id> {
    /// # Returns
    /// * `Ok(Entity)` - riga aggiornata
    /// * `Err(sqlx::Error::RowNotFound)` - chiave inesistente
    async fn update(&self, id: &Id, data: &UpdateDTO) -> Result<Entity, sqlx::Error>;
}

/// Cancellazione per chiave primaria
pub trait Delete<Id> {
    /// # Returns
    /// * `Ok(true)` - riga cancellata
    /// * `Ok(false)` - nessuna riga con quella chiave
    async fn delete(&self, id: &Id) -> Result<bool, sqlx::Error>;
}
