//! DTOs module - Data Transfer Objects
//!
//! Questo modulo contiene tutti i DTOs usati per la comunicazione client-server.
//! I DTOs separano la rappresentazione esterna (API) dalla rappresentazione interna (entities).

pub mod account;
pub mod admin;
pub mod booking;
pub mod category;
pub mod city;
pub mod distance;
pub mod favorite;
pub mod message;
pub mod post;
pub mod presence;
pub mod report;
pub mod review;
pub mod search;
pub mod synonym;
pub mod validation;
pub mod ws_event;

// Re-exports per facilitare l'import
pub use account::DeleteAccountBodyDTO;
pub use admin::{
    CreateActivityLogDTO, CreateUserBanDTO, DeleteMessageQuery, ExpiredPostsDTO,
    MessageResultDTO, UserActionBodyDTO,
};
pub use booking::{
    BookingCreatedDTO, BookingSlotsDTO, BookingSlotsQuery, CreateBookingBodyDTO,
    CreateBookingDTO, UpdateBookingBodyDTO, DEFAULT_BOOKING_MINUTES,
};
pub use category::{
    AiPostCountDTO, AiPostsDeletedDTO, BatchReorderBodyDTO, CategoriesUpdatedDTO,
    CategoryOrderDTO, CategoryTreeDTO, CategoryTreeNodeDTO, DeleteByCategoryBodyDTO,
    DescriptionsGeneratedDTO, GenerateDescriptionBodyDTO, GenerateDescriptionsBodyDTO,
    GeneratedDescriptionDTO, ReorderBodyDTO, SortAlphabeticallyBodyDTO,
};
pub use city::{CitiesQuery, CitiesResponseDTO};
pub use distance::{DistanceRequestDTO, DistanceResponseDTO};
pub use favorite::{CreateFavoriteDTO, FavoriteBodyDTO, FavoriteCreatedDTO, FavoritesListDTO};
pub use message::{CreateMessageDTO, MessageDTO, MessagesQuery, SendMessageBodyDTO};
pub use post::{
    CreateModerationLogDTO, CreatePostBodyDTO, CreatePostDTO, ExtendPostResponseDTO,
    ListingDTO, ListingFilterDTO, ListingSort, ModerateBodyDTO, ModerationActionBodyDTO,
    ModerationActionResultDTO, ModerationListDTO, ModerationQuery, ModerationRunDTO,
    MyPostsDTO, MyPostsQuery, PaginationDTO, PostCreatedDTO, PostsQuery, UpdateModerationDTO,
    ViewCountedDTO,
};
pub use presence::{PresenceDTO, UpdatePresenceDTO};
pub use report::{
    CreateMessageReportBodyDTO, CreatePostReportBodyDTO, CreateReportDTO, SuccessDTO,
    UpdateReportDTO, UpdateReportStatusBodyDTO, MESSAGE_REPORT_REASONS,
};
pub use review::{
    CreateReviewBodyDTO, CreateReviewDTO, RespondReviewBodyDTO, ReviewCreatedDTO, ReviewIdBodyDTO,
    ReviewsListDTO, ReviewsQuery,
};
pub use search::{
    CreateSearchQueryDTO, SearchQuery, SearchSuggestionsDTO, SuggestionDTO, SuggestionKind,
    TrackSearchBodyDTO,
};
pub use synonym::{
    ApplySuggestionsBodyDTO, CategorySynonymSuggestionDTO, CategorySynonymsQuery,
    CreateCategorySynonymBodyDTO, CreateCategorySynonymDTO, CreateSynonymBodyDTO,
    CreateSynonymDTO, GenerateCategorySynonymsBodyDTO, GenerateSynonymsBodyDTO, IdQuery,
    SuggestionsAppliedDTO, SynonymCreatedDTO, SynonymSuggestionDTO, SynonymSuggestionsDTO,
    SynonymsListDTO,
};
pub use ws_event::{ClientEventDTO, ServerEventDTO, TypingEventDTO};
