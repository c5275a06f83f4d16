use async_trait::async_trait;
use axum_test::TestServer;
use findsomeone::core::{AppState, Config, encode_jwt};
use findsomeone::geo::{Coordinates, GeocodeError, Geocoder};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "ilmiobellissimosegretochevaassolutamentecambiato";
pub const TEST_CRON_SECRET: &str = "test-cron-secret";

// id dei profili definiti in fixtures/profiles.sql
pub const ADMIN_ID: Uuid = Uuid::from_u128(1);
pub const ANNA_ID: Uuid = Uuid::from_u128(2);
pub const JAN_ID: Uuid = Uuid::from_u128(3);
pub const BANNED_ID: Uuid = Uuid::from_u128(4);

/// Geocoder in memoria: nessuna richiesta HTTP durante i test
pub struct StubGeocoder {
    places: HashMap<String, Coordinates>,
}

impl StubGeocoder {
    pub fn new() -> Self {
        let mut places = HashMap::new();
        places.insert(
            "Kraków, Poland".to_string(),
            Coordinates {
                lat: 50.0647,
                lon: 19.9450,
            },
        );
        places.insert(
            "Podgórze, Kraków, Poland".to_string(),
            Coordinates {
                lat: 50.0400,
                lon: 19.9600,
            },
        );
        Self { places }
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        Ok(self.places.get(query).copied())
    }
}

/// Configurazione di test, nessuna variabile d'ambiente letta
pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/findsomeone_test".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        max_connections: 5,
        connection_lifetime_secs: 60,
        app_env: "test".to_string(),
        openai_api_key: None,
        cron_secret: Some(TEST_CRON_SECRET.to_string()),
        site_url: "https://findsomeone.test".to_string(),
        geocoder_url: "http://127.0.0.1:9/search".to_string(),
        presence_timeout_secs: 300,
        cors_origin: None,
    }
}

/// Crea un AppState per i test
///
/// # Arguments
/// * `pool` - Connection pool PostgreSQL
///
/// # Returns
/// Arc<AppState> con il JWT secret di test e il geocoder in memoria
pub fn create_test_state(pool: PgPool) -> Arc<AppState> {
    let state = AppState::new(pool, &test_config()).with_geocoder(Arc::new(StubGeocoder::new()));
    Arc::new(state)
}

/// Pool che non apre connessioni finché non viene usato.
/// Per i test che non devono mai arrivare al database.
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy("postgres://localhost/unused")
        .expect("Failed to create lazy pool")
}

/// Crea un TestServer per i test
///
/// # Arguments
/// * `state` - AppState da utilizzare per il server
///
/// # Returns
/// TestServer configurato e pronto per eseguire richieste
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = findsomeone::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Genera un JWT token firmato con il secret di test
///
/// # Arguments
/// * `user_id` - ID dell'utente per cui generare il token
///
/// # Returns
/// Token JWT valido per un'ora
pub fn create_test_jwt(user_id: Uuid) -> String {
    encode_jwt(user_id, None, TEST_JWT_SECRET).expect("Failed to create JWT token")
}

/// Valore dell'header Authorization per l'utente
pub fn bearer(user_id: Uuid) -> String {
    format!("Bearer {}", create_test_jwt(user_id))
}
