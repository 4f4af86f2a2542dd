//! Domain errors - failures that are not battle rejections

use thiserror::Error;

use crate::value_objects::{BossTableError, GuildId, MemberId, RecordId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Guild not found: {0}")]
    GuildNotFound(GuildId),

    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),

    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Boss table error: {0}")]
    BossTable(#[from] BossTableError),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Conflict: {0}")]
    Conflict(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Notification delivery failed: {0}")]
    DeliveryError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::GuildNotFound(_) => "UNKNOWN_GUILD",
            Self::MemberNotFound(_) => "UNKNOWN_MEMBER",
            Self::RecordNotFound(_) => "UNKNOWN_RECORD",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::BossTable(_) => "BOSS_TABLE_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::DeliveryError(_) => "DELIVERY_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::GuildNotFound(_) | Self::MemberNotFound(_) | Self::RecordNotFound(_)
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}
