//! Entities module - Entità del dominio applicativo
//!
//! Questo modulo contiene tutte le entità (models) che rappresentano i dati persistiti nel database.
//! Ogni entity corrisponde a una tabella (o al risultato di una stored procedure).

pub mod booking;
pub mod category;
pub mod city;
pub mod enums;
pub mod favorite;
pub mod message;
pub mod post;
pub mod presence;
pub mod profile;
pub mod report;
pub mod review;
pub mod search_query;
pub mod synonym;

// Re-exports per facilitare l'import
pub use booking::{Booking, BookingSlot};
pub use category::{Category, CategoryPostCounts};
pub use city::City;
pub use enums::{
    AppealStatus, BookingStatus, ModerationStatus, PostStatus, PostType, PresenceStatus,
    PriceType, ReportStatus, UserRole,
};
pub use favorite::Favorite;
pub use message::Message;
pub use post::{Post, PostExpiration, PostSitemapEntry, PostWithAuthor};
pub use presence::Presence;
pub use profile::Profile;
pub use report::{MessageReport, PostReport, ReportedPost};
pub use review::{Review, ReviewWithReviewer};
pub use search_query::SearchQueryCount;
pub use synonym::{CategoryMatch, CategorySynonym, SearchSynonym};
