//! Message services - Messaggi diretti tra utenti

use crate::core::{AppError, AppState, AuthUser};
use crate::dtos::{CreateMessageDTO, MessageDTO, MessagesQuery, SendMessageBodyDTO};
use crate::repositories::Create;
use crate::ws::InternalSignal;
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use axum_macros::debug_handler;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Numero massimo di messaggi per pagina
pub const MESSAGES_PAGE_SIZE: i64 = 50;

#[instrument(skip(state, current_user), fields(user_id = %current_user.id, other_user_id = %other_user_id))]
pub async fn get_conversation(
    State(state): State<Arc<AppState>>,
    Path(other_user_id): Path<Uuid>,
    Extension(current_user): Extension<AuthUser>,
    Query(params): Query<MessagesQuery>,
) -> Result<Json<Vec<MessageDTO>>, AppError> {
    debug!("Fetching conversation messages");
    let messages = state
        .messages
        .find_between(
            &current_user.id,
            &other_user_id,
            params.before.as_ref(),
            MESSAGES_PAGE_SIZE,
        )
        .await?;

    info!("Retrieved {} messages", messages.len());
    Ok(Json(messages.into_iter().map(MessageDTO::from).collect()))
}

#[debug_handler]
#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id))]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<AuthUser>,
    Json(body): Json<SendMessageBodyDTO>,
) -> Result<(StatusCode, Json<MessageDTO>), AppError> {
    debug!("Sending message");
    // 1. Validazione del contenuto, sulla lunghezza già ripulita dagli spazi
    let body = body.trimmed();
    if body.content.is_empty() {
        return Err(AppError::bad_request("Message content cannot be empty"));
    }
    body.validate()?;
    if body.receiver_id == current_user.id {
        warn!("User tried to message themselves");
        return Err(AppError::bad_request("You cannot send a message to yourself"));
    }

    // 2. Salvataggio
    let message = state
        .messages
        .create(&CreateMessageDTO {
            sender_id: current_user.id,
            receiver_id: body.receiver_id,
            post_id: body.post_id,
            content: body.content,
        })
        .await?;
    let message_dto = MessageDTO::from(message);

    // 3. Push best-effort alle connessioni WebSocket del destinatario
    let delivered = state.users_online.send_server_message_if_online(
        &message_dto.receiver_id,
        InternalSignal::NewMessage(Arc::new(message_dto.clone())),
    );

    info!(message_id = %message_dto.id, delivered, "Message sent");
    Ok((StatusCode::CREATED, Json(message_dto)))
}
