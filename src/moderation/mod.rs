//! Moderation module - Moderazione automatica dei nuovi annunci
//!
//! Il punteggio parte da 100: ogni controllo statico fallito toglie 20 punti (al massimo 60),
//! il classificatore LLM e i controlli sui prezzi tolgono il resto.
//! Sotto 30 l'annuncio è respinto, sotto 70 finisce in coda all'admin.

pub mod classifier;
pub mod rules;

pub use classifier::{ContentScores, classify};
pub use rules::check_text;

use crate::dtos::ModerationRunDTO;
use crate::entities::{ModerationStatus, PostStatus};
use crate::llm::CompletionClient;
use tracing::{debug, instrument, warn};

const MAX_SCORE: i32 = 100;
const RULE_PENALTY: i32 = 20;
const MAX_RULE_PENALTY: i32 = 60;
const REJECT_BELOW: i32 = 30;
const FLAG_BELOW: i32 = 70;

/// Testo e prezzi di un annuncio da moderare
#[derive(Debug, Clone, Copy)]
pub struct PostContent<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModerationOutcome {
    pub score: i32,
    pub status: ModerationStatus,
    pub reasons: Vec<String>,
}

impl ModerationOutcome {
    fn from_score(score: i32, reasons: Vec<String>) -> Self {
        let score = score.clamp(0, MAX_SCORE);
        let status = if score < REJECT_BELOW {
            ModerationStatus::Rejected
        } else if score < FLAG_BELOW {
            ModerationStatus::Flagged
        } else {
            ModerationStatus::Approved
        };
        Self {
            score,
            status,
            reasons,
        }
    }

    /// Solo gli annunci approvati diventano visibili
    pub fn post_status(&self) -> PostStatus {
        if self.status == ModerationStatus::Approved {
            PostStatus::Active
        } else {
            PostStatus::Pending
        }
    }

    /// Azione registrata in moderation_logs
    pub fn log_action(&self) -> &'static str {
        match self.status {
            ModerationStatus::Approved => "auto_approved",
            ModerationStatus::Rejected => "auto_rejected",
            _ => "flagged",
        }
    }

    /// Motivi concatenati, `None` se l'annuncio è pulito
    pub fn reason(&self) -> Option<String> {
        (!self.reasons.is_empty()).then(|| self.reasons.join("; "))
    }

    pub fn to_dto(&self) -> ModerationRunDTO {
        ModerationRunDTO {
            success: true,
            status: self.status.as_str(),
            score: self.score,
            reasons: self.reasons.clone(),
        }
    }
}

/// Esegue tutti i controlli. Il classificatore è best-effort: senza client
/// o con una risposta non valida contano solo le regole statiche.
#[instrument(skip_all)]
pub async fn moderate(content: PostContent<'_>, llm: Option<&dyn CompletionClient>) -> ModerationOutcome {
    let mut reasons = check_text(content.title, content.description);
    let violations = reasons.len() as i32;
    let mut score = MAX_SCORE - (violations * RULE_PENALTY).min(MAX_RULE_PENALTY);

    if let Some(llm) = llm {
        let text = format!("{}\n\n{}", content.title, content.description);
        match classify(llm, &text).await {
            Ok(scores) => score -= ai_penalty(scores, &mut reasons),
            Err(e) => warn!("Content classifier unavailable: {}", e),
        }
    }

    score -= price_penalty(content.price_min, content.price_max, &mut reasons);

    let outcome = ModerationOutcome::from_score(score, reasons);
    debug!(score = outcome.score, status = ?outcome.status, "Post moderated");
    outcome
}

fn ai_penalty(scores: ContentScores, reasons: &mut Vec<String>) -> i32 {
    let mut penalty = 0;

    if scores.nsfw > 0.5 {
        penalty += (scores.nsfw * 80.0).floor() as i32;
        reasons.push(format!(
            "AI wykryło nieodpowiednią treść ({}% pewności)",
            (scores.nsfw * 100.0).round() as i32
        ));
    } else if scores.nsfw > 0.3 {
        penalty += 30;
        reasons.push(format!(
            "AI wykryło podejrzaną treść ({}% pewności)",
            (scores.nsfw * 100.0).round() as i32
        ));
    }

    if scores.toxic > 0.4 {
        penalty += (scores.toxic * 50.0).floor() as i32;
        reasons.push(format!(
            "AI wykryło toksyczną treść ({}% pewności)",
            (scores.toxic * 100.0).round() as i32
        ));
    } else if scores.toxic > 0.25 {
        penalty += 20;
        reasons.push(format!(
            "AI wykryło potencjalnie toksyczną treść ({}% pewności)",
            (scores.toxic * 100.0).round() as i32
        ));
    }

    penalty
}

fn price_penalty(min: Option<f64>, max: Option<f64>, reasons: &mut Vec<String>) -> i32 {
    let mut penalty = 0;
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            penalty += 10;
            reasons.push("Cena minimalna wyższa od maksymalnej".to_string());
        }
    }
    if [min, max].into_iter().flatten().any(|p| p < 0.0) {
        penalty += 20;
        reasons.push("Cena nie może być ujemna".to_string());
    }
    penalty
}
