//! Moderation services - Coda di moderazione e azioni dell'amministratore sui post

use crate::core::{AppError, AppState};
use crate::dtos::{
    CreateModerationLogDTO, ModerationActionBodyDTO, ModerationActionResultDTO,
    ModerationListDTO, ModerationQuery, PaginationDTO, UpdateModerationDTO,
};
use crate::entities::{AppealStatus, ModerationStatus, PostStatus, Profile};
use crate::repositories::{Create, Delete, ModerationFilter, Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use axum_macros::debug_handler;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;
const APPEALS_FILTER: &str = "appeals";

const DEFAULT_APPEAL_APPROVED: &str = "Odwołanie zaakceptowane";
const DEFAULT_APPEAL_REJECTED: &str = "Odwołanie odrzucone";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Approve,
    Reject,
    ApproveAppeal,
    RejectAppeal,
}

impl FromStr for ModerationAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            "approve_appeal" => Ok(Self::ApproveAppeal),
            "reject_appeal" => Ok(Self::RejectAppeal),
            _ => Err(()),
        }
    }
}

impl ModerationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::ApproveAppeal => "approve_appeal",
            Self::RejectAppeal => "reject_appeal",
        }
    }

    /// Nome dell'azione registrato in moderation_logs
    pub fn log_action(&self) -> &'static str {
        match self {
            Self::Approve => "manual_approved",
            Self::Reject => "manual_rejected",
            Self::ApproveAppeal => "appeal_approved",
            Self::RejectAppeal => "appeal_rejected",
        }
    }

    /// Stato di moderazione del post dopo l'azione
    pub fn new_moderation_status(&self) -> ModerationStatus {
        match self {
            Self::Approve | Self::ApproveAppeal => ModerationStatus::Approved,
            Self::Reject | Self::RejectAppeal => ModerationStatus::Rejected,
        }
    }

    /// Modifiche da applicare al post
    pub fn changes(
        &self,
        admin_id: Uuid,
        now: DateTime<Utc>,
        reason: Option<String>,
        appeal_response: Option<String>,
    ) -> UpdateModerationDTO {
        match self {
            Self::Approve | Self::Reject => UpdateModerationDTO {
                status: Some(if *self == Self::Approve {
                    PostStatus::Active
                } else {
                    PostStatus::Pending
                }),
                moderation_status: Some(self.new_moderation_status()),
                moderation_reason: Some(reason),
                moderated_by: Some(admin_id),
                moderated_at: Some(now),
                ..Default::default()
            },
            Self::ApproveAppeal => UpdateModerationDTO {
                status: Some(PostStatus::Active),
                moderation_status: Some(ModerationStatus::Approved),
                moderated_by: Some(admin_id),
                moderated_at: Some(now),
                appeal_status: Some(AppealStatus::Approved),
                appeal_response: Some(
                    appeal_response.unwrap_or_else(|| DEFAULT_APPEAL_APPROVED.to_string()),
                ),
                appeal_reviewed_by: Some(admin_id),
                appeal_reviewed_at: Some(now),
                ..Default::default()
            },
            Self::RejectAppeal => UpdateModerationDTO {
                appeal_status: Some(AppealStatus::Rejected),
                appeal_response: Some(
                    appeal_response.unwrap_or_else(|| DEFAULT_APPEAL_REJECTED.to_string()),
                ),
                appeal_reviewed_by: Some(admin_id),
                appeal_reviewed_at: Some(now),
                ..Default::default()
            },
        }
    }
}

#[derive(Serialize, Debug)]
pub struct PostDeletedDTO {
    pub success: bool,
    pub action: &'static str,
}

/// Pagina, dimensione e offset normalizzati. La pagina è limitata
/// in modo che `(page - 1) * limit` non vada mai in overflow.
pub fn page_window(page: Option<i64>, limit: Option<i64>) -> (i64, i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let page = page.unwrap_or(1).clamp(1, i64::MAX / MAX_PAGE_SIZE);
    (page, limit, (page - 1) * limit)
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn list_moderation_queue(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<Profile>,
    Query(params): Query<ModerationQuery>,
) -> Result<Json<ModerationListDTO>, AppError> {
    debug!("Listing moderation queue");
    // 1. Filtro: stato di moderazione oppure "appeals"
    let status = params.status.as_deref().unwrap_or("flagged");
    let filter = if status == APPEALS_FILTER {
        ModerationFilter::Appeals
    } else {
        ModerationStatus::from_str(status)
            .map(ModerationFilter::Status)
            .map_err(|_| {
                warn!(status, "Invalid moderation status filter");
                AppError::bad_request("Invalid status")
            })?
    };

    // 2. Paginazione
    let (page, limit, offset) = page_window(params.page, params.limit);

    // 3. Query e totale
    let (posts, total) = state.posts.find_for_moderation(filter, limit, offset).await?;

    info!(total, returned = posts.len(), "Moderation queue loaded");
    Ok(Json(ModerationListDTO {
        posts,
        pagination: PaginationDTO::new(page, limit, total),
    }))
}

#[debug_handler]
#[instrument(skip(state, admin, body), fields(admin_id = %admin.id, post_id = %post_id, action = %body.action))]
pub async fn moderate_post(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
    Extension(admin): Extension<Profile>,
    Json(body): Json<ModerationActionBodyDTO>,
) -> Result<Json<ModerationActionResultDTO>, AppError> {
    // 1. Validazione dell'azione
    let action = ModerationAction::from_str(&body.action).map_err(|_| {
        warn!("Invalid moderation action");
        AppError::bad_request("Invalid action")
    })?;

    // 2. Stato corrente del post
    let post = state
        .posts
        .read(&post_id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    // 3. Aggiornamento del post
    let reason = body.reason.filter(|r| !r.trim().is_empty());
    let appeal_response = body.appeal_response.filter(|r| !r.trim().is_empty());
    let changes = action.changes(admin.id, Utc::now(), reason.clone(), appeal_response.clone());
    let updated = state.posts.update(&post_id, &changes).await?;

    // 4. Log dell'azione, non blocca la risposta
    let log = CreateModerationLogDTO {
        post_id,
        admin_id: Some(admin.id),
        action: action.log_action(),
        previous_status: Some(post.moderation_status.as_str().to_string()),
        new_status: Some(updated.moderation_status.as_str().to_string()),
        reason: match action {
            ModerationAction::Approve | ModerationAction::Reject => reason,
            _ => appeal_response,
        },
    };
    if let Err(e) = state.moderation_logs.create(&log).await {
        warn!("Failed to write moderation log: {:?}", e);
    }

    info!(new_status = ?updated.moderation_status, "Post moderated");
    Ok(Json(ModerationActionResultDTO {
        success: true,
        action: action.as_str(),
        new_status: action.new_moderation_status().as_str(),
    }))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id, post_id = %post_id))]
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
    Extension(admin): Extension<Profile>,
) -> Result<Json<PostDeletedDTO>, AppError> {
    // 1. Log prima della cancellazione (moderation_logs non ha FK sul post)
    if let Some(post) = state.posts.read(&post_id).await? {
        state
            .moderation_logs
            .create(&CreateModerationLogDTO {
                post_id,
                admin_id: Some(admin.id),
                action: "deleted",
                previous_status: Some(post.moderation_status.as_str().to_string()),
                new_status: Some("deleted".to_string()),
                reason: None,
            })
            .await?;
    }

    // 2. Cancellazione
    if !state.posts.delete(&post_id).await? {
        warn!("Post not found");
        return Err(AppError::not_found("Post not found"));
    }

    info!("Post deleted by admin");
    Ok(Json(PostDeletedDTO {
        success: true,
        action: "deleted",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_action_is_rejected() {
        assert!(ModerationAction::from_str("delete").is_err());
        assert_eq!(
            ModerationAction::from_str("approve_appeal"),
            Ok(ModerationAction::ApproveAppeal)
        );
    }

    #[test]
    fn approve_activates_post_and_clears_reason() {
        let admin = Uuid::new_v4();
        let changes = ModerationAction::Approve.changes(admin, Utc::now(), None, None);
        assert_eq!(changes.status, Some(PostStatus::Active));
        assert_eq!(changes.moderation_status, Some(ModerationStatus::Approved));
        assert_eq!(changes.moderation_reason, Some(None));
        assert_eq!(changes.moderated_by, Some(admin));
        assert!(changes.appeal_status.is_none());
    }

    #[test]
    fn reject_moves_post_back_to_pending() {
        let changes = ModerationAction::Reject.changes(
            Uuid::new_v4(),
            Utc::now(),
            Some("Spam".to_string()),
            None,
        );
        assert_eq!(changes.status, Some(PostStatus::Pending));
        assert_eq!(changes.moderation_status, Some(ModerationStatus::Rejected));
        assert_eq!(changes.moderation_reason, Some(Some("Spam".to_string())));
    }

    #[test]
    fn appeal_actions_record_reviewer_and_default_response() {
        let admin = Uuid::new_v4();
        let approved = ModerationAction::ApproveAppeal.changes(admin, Utc::now(), None, None);
        assert_eq!(approved.appeal_status, Some(AppealStatus::Approved));
        assert_eq!(approved.appeal_reviewed_by, Some(admin));
        assert_eq!(approved.appeal_response.as_deref(), Some(DEFAULT_APPEAL_APPROVED));
        assert_eq!(approved.status, Some(PostStatus::Active));

        let rejected = ModerationAction::RejectAppeal.changes(
            admin,
            Utc::now(),
            None,
            Some("Nadal narusza regulamin".to_string()),
        );
        assert_eq!(rejected.appeal_status, Some(AppealStatus::Rejected));
        assert!(rejected.moderation_status.is_none());
        assert_eq!(
            rejected.appeal_response.as_deref(),
            Some("Nadal narusza regulamin")
        );
    }

    #[test]
    fn page_window_defaults_and_clamps() {
        assert_eq!(page_window(None, None), (1, DEFAULT_PAGE_SIZE, 0));
        assert_eq!(page_window(Some(3), Some(10)), (3, 10, 20));
        assert_eq!(page_window(Some(-5), Some(1000)), (1, MAX_PAGE_SIZE, 0));
        assert_eq!(page_window(Some(0), Some(0)), (1, 1, 0));
    }

    #[test]
    fn page_window_never_overflows() {
        let (page, limit, offset) = page_window(Some(i64::MAX), Some(i64::MAX));
        assert_eq!(limit, MAX_PAGE_SIZE);
        assert_eq!(page, i64::MAX / MAX_PAGE_SIZE);
        assert!(offset > 0);
    }

    #[test]
    fn log_names_match_actions() {
        assert_eq!(ModerationAction::Approve.log_action(), "manual_approved");
        assert_eq!(ModerationAction::RejectAppeal.log_action(), "appeal_rejected");
        assert_eq!(
            ModerationAction::RejectAppeal.new_moderation_status(),
            ModerationStatus::Rejected
        );
    }
}
