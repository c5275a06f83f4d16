//! Repositories module - Coordinatore per tutti i repository del progetto
//!
//! Ogni repository possiede un clone del pool PostgreSQL e gestisce le query di una tabella
//! (o di un gruppo di tabelle strettamente legate, come i log).

// ************************* NOTA SULLE QUERY ************************* //

/*
   Qui usiamo le query "runtime" di sqlx (sqlx::query, query_as::<_, T>, query_scalar)
   invece delle macro query!/query_as!: le macro richiedono un database raggiungibile
   durante la compilazione, mentre lo schema vive nel provider esterno.
   Per non perdere la sicurezza dei tipi:
   - le entity derivano sqlx::FromRow e i nomi delle colonne coincidono con i campi
   - gli stati sono enum Rust mappati sui tipi ENUM di PostgreSQL (vedi entities::enums)
   - le liste di colonne stanno in costanti per repository, così un campo nuovo
     si aggiunge in un solo punto
   Per le query con filtri opzionali si usa sqlx::QueryBuilder con push_bind,
   mai concatenazione di valori nella stringa SQL.

   Metodi di fetch:
   .execute()         -> INSERT/UPDATE/DELETE senza RETURNING (rows_affected)
   .fetch_optional()  -> zero o una riga
   .fetch_one()       -> esattamente una riga (RowNotFound altrimenti), anche per COUNT
   .fetch_all()       -> Vec di righe
*/

// ************************* MODULI REPOSITORY ************************* //

pub mod booking;
pub mod category;
pub mod city;
pub mod favorite;
pub mod logs;
pub mod message;
pub mod post;
pub mod presence;
pub mod profile;
pub mod report;
pub mod review;
pub mod search_query;
pub mod synonym;
pub mod traits;

// Re-esportazione dei trait per facilitare l'import
pub use traits::{Create, Delete, Read, Update};

// Re-esportazione delle struct dei repository per facilitare l'import
pub use booking::BookingRepository;
pub use category::CategoryRepository;
pub use city::CityRepository;
pub use favorite::FavoriteRepository;
pub use logs::{ActivityLogRepository, ModerationLogRepository, UserBanRepository};
pub use message::MessageRepository;
pub use post::{ModerationFilter, PostRepository};
pub use presence::PresenceRepository;
pub use profile::ProfileRepository;
pub use report::{MessageReportRepository, PostReportRepository};
pub use review::ReviewRepository;
pub use search_query::SearchQueryRepository;
pub use synonym::{CategorySynonymRepository, SynonymRepository};
