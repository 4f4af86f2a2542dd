//! Request DTOs for the battle commands
//!
//! All request DTOs implement `Deserialize` and `Validate` for input
//! validation. Ids accept JSON strings or numbers.

use chrono::NaiveDate;
use clan_core::{GuildId, MemberId};
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// Web login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    pub member_id: MemberId,

    #[validate(length(min = 1, max = 128, message = "Password must be 1-128 characters"))]
    pub password: String,
}

/// Set or replace the web password
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetPasswordRequest {
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

// ============================================================================
// Guild Requests
// ============================================================================

/// Create guild request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGuildRequest {
    /// External id of the chat group
    pub guild_id: GuildId,

    #[validate(length(min = 1, max = 100, message = "Guild name must be 1-100 characters"))]
    pub name: String,

    /// `jp`, `tw` or `cn`
    pub region: String,

    /// Display name of the creator, who joins as the first admin
    #[validate(length(min = 1, max = 64, message = "Member name must be 1-64 characters"))]
    pub creator_name: String,
}

/// Rename a guild or a member
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RenameRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Switch the live dataset
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SwitchDatasetRequest {
    #[validate(range(min = 1, max = 10, message = "Dataset must be 1-10"))]
    pub dataset: i32,
}

/// Replace the admin set
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshAdminsRequest {
    #[validate(length(min = 1, message = "At least one admin is required"))]
    pub admins: Vec<MemberId>,
}

/// Admin override of a boss's cycle and HP
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForceSetBossRequest {
    pub boss: i32,
    #[validate(range(min = 1, max = 10000, message = "Cycle must be 1-10000"))]
    pub cycle: i32,
    /// Remaining HP, suffixes allowed (`1.2kw`)
    pub hp: String,
}

// ============================================================================
// Member Requests
// ============================================================================

/// Join a guild under a display name
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JoinGuildRequest {
    #[validate(length(min = 1, max = 64, message = "Member name must be 1-64 characters"))]
    pub name: String,
}

/// Ask members to attack
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RemindRequest {
    #[validate(length(min = 1, max = 30, message = "Remind 1-30 members at a time"))]
    pub member_ids: Vec<MemberId>,
}

// ============================================================================
// Battle Requests
// ============================================================================

/// Report a hit
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CommitRecordRequest {
    pub boss: i32,

    /// Damage, suffixes allowed; ignored when `kill` is set
    #[serde(default)]
    pub damage: Option<String>,

    /// The hit finished the boss: damage is its remaining HP
    #[serde(default)]
    pub kill: bool,

    #[validate(length(max = 200, message = "Comment must be at most 200 characters"))]
    pub comment: Option<String>,

    /// Report for another member; the caller is recorded as proxy
    #[serde(default)]
    pub on_behalf_of: Option<MemberId>,

    /// Spend a full attempt even if a bonus attempt is available
    #[serde(default)]
    pub force_full_attempt: bool,
}

/// Queue or tree on a boss
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReserveRequest {
    pub boss: i32,

    #[validate(length(max = 200, message = "Comment must be at most 200 characters"))]
    pub comment: Option<String>,
}

/// Subscribe to a future cycle of a boss
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubscribeRequest {
    pub boss: i32,

    /// Defaults to the next cycle the boss will be fought at
    #[validate(range(min = 1, max = 10000, message = "Cycle must be 1-10000"))]
    pub cycle: Option<i32>,

    #[validate(length(max = 200, message = "Comment must be at most 200 characters"))]
    pub comment: Option<String>,
}

/// Record a retry (SL)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SlRequest {
    pub boss: Option<i32>,

    #[validate(length(max = 200, message = "Comment must be at most 200 characters"))]
    pub comment: Option<String>,

    #[serde(default)]
    pub on_behalf_of: Option<MemberId>,
}

/// Replace the comment of an existing queue or tree entry
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(max = 200, message = "Comment must be at most 200 characters"))]
    pub comment: Option<String>,
}

/// Undo the newest record of a boss, or the caller's newest record
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UndoRequest {
    pub boss: Option<i32>,
}

// ============================================================================
// Queries
// ============================================================================

/// Filters of the record history
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RecordHistoryQuery {
    pub member_id: Option<MemberId>,
    pub boss: Option<i32>,
    pub cycle: Option<i32>,
    /// Battle day (05:00 to 05:00 region-local)
    pub day: Option<NaiveDate>,

    #[validate(range(min = 1, max = 1000, message = "Limit must be 1-1000"))]
    pub limit: Option<i64>,
}

/// Optional battle day of a status query
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
pub struct DayQuery {
    pub day: Option<NaiveDate>,
}

/// Optional boss filter of the reservation lists
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
pub struct BossQuery {
    pub boss: Option<i32>,
}

/// Optional cycle of a subscription cancel; all cycles when absent
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
pub struct CycleQuery {
    pub cycle: Option<i32>,
}
