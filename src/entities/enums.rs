//! Enumerazioni - Tipi enumerati utilizzati nelle entità
//!
//! Ogni enum corrisponde a un tipo ENUM di PostgreSQL definito nelle migrations.

use serde::{Deserialize, Serialize};

// ********************* ENUMERAZIONI UTILI **********************//

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "post_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Active,
    Pending,
    Closed,
}

/// Stato di moderazione di un annuncio, governa la visibilità
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "moderation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    Checking,
    Approved,
    Rejected,
    Flagged,
}

impl ModerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Checking => "checking",
            ModerationStatus::Approved => "approved",
            ModerationStatus::Rejected => "rejected",
            ModerationStatus::Flagged => "flagged",
        }
    }
}

impl std::str::FromStr for ModerationStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ModerationStatus::Pending),
            "checking" => Ok(ModerationStatus::Checking),
            "approved" => Ok(ModerationStatus::Approved),
            "rejected" => Ok(ModerationStatus::Rejected),
            "flagged" => Ok(ModerationStatus::Flagged),
            _ => Err(()),
        }
    }
}

/// Chi pubblica l'annuncio cerca un servizio o lo offre
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "post_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Seeking,
    Offering,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "price_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    Hourly,
    Fixed,
    Negotiable,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "appeal_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppealStatus {
    Pending,
    Reviewing,
    Approved,
    Rejected,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "presence_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    Away,
    Offline,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "report_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Resolved,
    Dismissed,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    /// Completata e già recensita dal cliente
    Reviewed,
}

impl BookingStatus {
    /// Etichetta polacca usata nelle notifiche
    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "oczekująca",
            BookingStatus::Confirmed => "potwierdzona",
            BookingStatus::Cancelled => "anulowana",
            BookingStatus::Completed => "zakończona",
            BookingStatus::Reviewed => "zakończona",
        }
    }

    /// Solo le prenotazioni concluse possono ricevere un'opinione
    pub fn allows_review(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Reviewed)
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = ();

    /// Solo gli stati impostabili a mano: `reviewed` lo assegna l'opinione del cliente
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            _ => Err(()),
        }
    }
}
