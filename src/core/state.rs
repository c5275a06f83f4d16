//! Application State - Stato globale dell'applicazione
//!
//! Contiene tutti i repository, i client verso servizi esterni, la configurazione
//! necessaria a runtime e lo stato condiviso del canale real-time.

use crate::core::Config;
use crate::core::views::ViewTracker;
use crate::geo::{Geocoder, NominatimGeocoder};
use crate::llm::{CompletionClient, OpenAiClient};
use crate::repositories::{
    ActivityLogRepository, BookingRepository, CategoryRepository, CategorySynonymRepository,
    CityRepository, FavoriteRepository, MessageReportRepository, MessageRepository,
    ModerationLogRepository, PostReportRepository, PostRepository, PresenceRepository,
    ProfileRepository, ReviewRepository, SearchQueryRepository, SynonymRepository,
    UserBanRepository,
};
use crate::ws::{ChannelMap, UserMap};
use sqlx::PgPool;
use std::sync::Arc;

/// Stato globale dell'applicazione condiviso tra tutte le route e middleware
pub struct AppState {
    pub profiles: ProfileRepository,
    pub posts: PostRepository,
    pub categories: CategoryRepository,
    pub synonyms: SynonymRepository,
    pub category_synonyms: CategorySynonymRepository,
    pub search_queries: SearchQueryRepository,
    pub bookings: BookingRepository,
    pub favorites: FavoriteRepository,
    pub reviews: ReviewRepository,
    pub messages: MessageRepository,
    pub post_reports: PostReportRepository,
    pub message_reports: MessageReportRepository,
    pub presence: PresenceRepository,
    pub cities: CityRepository,
    pub moderation_logs: ModerationLogRepository,
    pub activity_logs: ActivityLogRepository,
    pub user_bans: UserBanRepository,

    /// Secret per verificare i token del provider di autenticazione
    pub jwt_secret: String,

    /// Secret atteso dal job di scadenza annunci, `None` = job disabilitato
    pub cron_secret: Option<String>,

    /// URL pubblico del sito (robots.txt, sitemap.xml)
    pub site_url: String,

    /// Oltre questo intervallo dall'ultimo heartbeat un utente risulta offline
    pub presence_timeout: chrono::Duration,

    /// Connessioni WebSocket aperte per utente
    pub users_online: UserMap,

    /// Canali broadcast delle conversazioni con almeno un iscritto
    pub channels: ChannelMap,

    /// Deduplica delle visualizzazioni degli annunci
    pub views: ViewTracker,

    pub geocoder: Arc<dyn Geocoder>,

    /// Client LLM, `None` se OPENAI_API_KEY non è configurata
    pub llm: Option<Arc<dyn CompletionClient>>,
}

impl AppState {
    /// Crea una nuova istanza di AppState inizializzando tutti i repository
    /// con il pool di connessioni fornito e i client esterni dalla configurazione.
    ///
    /// # Arguments
    /// * `pool` - Pool di connessioni PostgreSQL condiviso
    /// * `config` - Configurazione caricata dall'ambiente
    pub fn new(pool: PgPool, config: &Config) -> Self {
        let llm = config
            .openai_api_key
            .as_ref()
            .map(|key| Arc::new(OpenAiClient::new(key.clone())) as Arc<dyn CompletionClient>);

        Self {
            profiles: ProfileRepository::new(pool.clone()),
            posts: PostRepository::new(pool.clone()),
            categories: CategoryRepository::new(pool.clone()),
            synonyms: SynonymRepository::new(pool.clone()),
            category_synonyms: CategorySynonymRepository::new(pool.clone()),
            search_queries: SearchQueryRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool.clone()),
            favorites: FavoriteRepository::new(pool.clone()),
            reviews: ReviewRepository::new(pool.clone()),
            messages: MessageRepository::new(pool.clone()),
            post_reports: PostReportRepository::new(pool.clone()),
            message_reports: MessageReportRepository::new(pool.clone()),
            presence: PresenceRepository::new(pool.clone()),
            cities: CityRepository::new(pool.clone()),
            moderation_logs: ModerationLogRepository::new(pool.clone()),
            activity_logs: ActivityLogRepository::new(pool.clone()),
            user_bans: UserBanRepository::new(pool),
            jwt_secret: config.jwt_secret.clone(),
            cron_secret: config.cron_secret.clone(),
            site_url: config.site_url.clone(),
            presence_timeout: chrono::Duration::seconds(config.presence_timeout_secs as i64),
            users_online: UserMap::new(),
            channels: ChannelMap::new(),
            views: ViewTracker::new(),
            geocoder: Arc::new(NominatimGeocoder::new(config.geocoder_url.clone())),
            llm,
        }
    }

    /// Sostituisce il geocoder (test o provider alternativo)
    pub fn with_geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = geocoder;
        self
    }

    /// Sostituisce il client LLM
    pub fn with_llm(mut self, llm: Option<Arc<dyn CompletionClient>>) -> Self {
        self.llm = llm;
        self
    }
}
