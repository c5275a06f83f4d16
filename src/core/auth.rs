use crate::core::{AppError, AppState};
use crate::entities::{Profile, UserRole};
use crate::repositories::Read;
use axum::extract::State;
use axum::{body::Body, extract::Request, http, http::HeaderMap, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Audience dei token emessi dal provider di autenticazione per utenti loggati
pub const TOKEN_AUDIENCE: &str = "authenticated";

/// Nome del cookie da cui leggere il token quando manca l'header Authorization
pub const TOKEN_COOKIE: &str = "token";

/// Motivo di ban mostrato quando il profilo non ne specifica uno
pub const DEFAULT_BAN_REASON: &str = "Naruszenie regulaminu";

// struct che codifica il contenuto del token jwt del provider di autenticazione
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // id dell'utente
    pub exp: usize, // Expiry time of the token
    pub iat: usize, // Issued at time of the token
    pub aud: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Utente autenticato, inserito nelle extension della richiesta dal middleware
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
        }
    }
}

/// Firma un access token compatibile con quelli del provider (usato da tool e test)
#[instrument(skip(secret), fields(user_id = %user_id))]
pub fn encode_jwt(
    user_id: Uuid,
    email: Option<String>,
    secret: &str,
) -> Result<String, AppError> {
    debug!("Encoding JWT token for user");
    let now = Utc::now();
    let exp: usize = (now + Duration::hours(1)).timestamp() as usize;
    let iat: usize = now.timestamp() as usize;
    let claims = Claims {
        sub: user_id,
        exp,
        iat,
        aud: TOKEN_AUDIENCE.to_string(),
        email,
        role: Some(TOKEN_AUDIENCE.to_string()),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        error!("Failed to encode JWT token: {:?}", e);
        AppError::internal_server_error("Error in encoding jwt token")
    })
}

#[instrument(skip(jwt_token, secret))]
pub fn decode_jwt(jwt_token: &str, secret: &str) -> Result<TokenData<Claims>, AppError> {
    debug!("Decoding JWT token");
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[TOKEN_AUDIENCE]);

    decode::<Claims>(
        jwt_token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        warn!("Failed to decode JWT token: {:?}", e);
        AppError::unauthorized("Unable to decode token")
    })
}

/// Estrae il token dall'header `Authorization: Bearer ...` oppure dal cookie `token`
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(http::header::AUTHORIZATION) {
        let value = value.to_str().ok()?;
        let mut parts = value.split_whitespace();
        return match (parts.next(), parts.next()) {
            (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => {
                Some(token.to_string())
            }
            _ => None,
        };
    }

    headers
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, token)| token.to_string())
        .filter(|token| !token.is_empty())
}

/// Autenticazione opzionale: ritorna l'utente solo se il token è presente e valido
pub fn user_from_headers(headers: &HeaderMap, secret: &str) -> Option<AuthUser> {
    let token = extract_token(headers)?;
    decode_jwt(&token, secret)
        .ok()
        .map(|data| AuthUser::from(data.claims))
}

#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let token = extract_token(req.headers()).ok_or_else(|| {
        warn!("Missing or malformed authorization");
        AppError::unauthorized("Unauthorized")
    })?;

    let token_data = decode_jwt(&token, &state.jwt_secret)?;
    let current_user = AuthUser::from(token_data.claims);

    debug!("User authenticated: {}", current_user.id);
    req.extensions_mut().insert(current_user);
    Ok(next.run(req).await)
}

/// Middleware che richiede il ruolo admin sul profilo del chiamante.
/// Deve girare dopo `authentication_middleware`; inserisce il `Profile` nelle extension.
#[instrument(skip(state, req, next))]
pub async fn admin_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running admin middleware");
    let current_user = current_user(&req)?;

    let profile = state.profiles.read(&current_user.id).await?.ok_or_else(|| {
        warn!("Profile not found for user {}", current_user.id);
        AppError::forbidden("Forbidden")
    })?;

    require_role(&profile, &[UserRole::Admin])?;

    req.extensions_mut().insert(profile);
    Ok(next.run(req).await)
}

/// Middleware che blocca gli utenti bannati sulle rotte del pannello utente
#[instrument(skip(state, req, next))]
pub async fn ban_guard_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    let current_user = current_user(&req)?;

    if let Some(profile) = state.profiles.read(&current_user.id).await? {
        if profile.banned {
            warn!("Banned user {} rejected", current_user.id);
            let reason = profile
                .ban_reason
                .unwrap_or_else(|| DEFAULT_BAN_REASON.to_string());
            return Err(AppError::forbidden("Account banned").with_details(reason));
        }
    }

    Ok(next.run(req).await)
}

/// Middleware per il job di scadenza: accetta solo `Bearer {CRON_SECRET}`
#[instrument(skip(state, req, next))]
pub async fn cron_secret_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    let expected = state.cron_secret.as_deref().ok_or_else(|| {
        warn!("Cron request received but CRON_SECRET is not configured");
        AppError::unauthorized("Unauthorized")
    })?;

    let provided = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if provided != Some(expected) {
        warn!("Cron request with invalid secret");
        return Err(AppError::unauthorized("Unauthorized"));
    }

    info!("Cron request authorized");
    Ok(next.run(req).await)
}

fn current_user(req: &Request) -> Result<AuthUser, AppError> {
    req.extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| {
            warn!("User not found in request extensions");
            AppError::unauthorized("Unauthorized")
        })
}

/// Helper per verificare che un profilo abbia uno dei ruoli richiesti
///
/// # Returns
/// * `Ok(())` se il ruolo è permesso
/// * `Err(AppError)` (403) se il ruolo non è tra quelli permessi
#[instrument(skip(profile), fields(user_id = %profile.id))]
pub fn require_role(profile: &Profile, allowed_roles: &[UserRole]) -> Result<(), AppError> {
    if !allowed_roles.contains(&profile.role) {
        warn!(
            "User {} has insufficient role {:?}, required one of: {:?}",
            profile.id, profile.role, allowed_roles
        );
        return Err(AppError::forbidden("Forbidden").with_details(format!(
            "This action requires one of the following roles: {:?}",
            allowed_roles
        )));
    }

    debug!("Role check passed for user {}", profile.id);
    Ok(())
}
