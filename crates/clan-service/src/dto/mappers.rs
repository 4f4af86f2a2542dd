//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use clan_core::{BossBoard, BossIndex, BossStatus, DamageRecord, Guild, KillNotice, Reservation, SlUsage};

use super::responses::{
    BoardResponse, BossStatusResponse, GuildResponse, KillNoticeResponse, RecordResponse,
    ReservationResponse, SlUsageResponse,
};

// ============================================================================
// Guild Mappers
// ============================================================================

impl From<&Guild> for GuildResponse {
    fn from(guild: &Guild) -> Self {
        Self {
            id: guild.id,
            name: guild.name.clone(),
            region: guild.region,
            members: guild.members.clone(),
            admins: guild.admins.clone(),
            active_dataset: guild.active_dataset,
            created_at: guild.created_at,
        }
    }
}

impl From<Guild> for GuildResponse {
    fn from(guild: Guild) -> Self {
        Self::from(&guild)
    }
}

// ============================================================================
// Boss Mappers
// ============================================================================

impl BossStatusResponse {
    pub fn from_board(board: &BossBoard<'_>, status: &BossStatus) -> Self {
        Self {
            boss: status.boss,
            cycle: status.cycle,
            stage: status.stage,
            hp: status.hp,
            max_hp: status.max_hp,
            challengeable: board.is_challengeable(status.boss, status.cycle),
        }
    }
}

impl BoardResponse {
    pub fn new(dataset: i32, board: &BossBoard<'_>) -> Self {
        Self {
            dataset,
            max_challengeable_cycle: board.max_challengeable_cycle(),
            bosses: board
                .statuses()
                .iter()
                .map(|status| BossStatusResponse::from_board(board, status))
                .collect(),
        }
    }

    pub fn boss(&self, boss: BossIndex) -> Option<&BossStatusResponse> {
        self.bosses.iter().find(|status| status.boss == boss)
    }
}

// ============================================================================
// Ledger Mappers
// ============================================================================

impl From<&DamageRecord> for RecordResponse {
    fn from(record: &DamageRecord) -> Self {
        Self {
            id: record.id,
            member_id: record.member_id,
            proxy_id: record.proxy_id,
            boss: record.boss,
            cycle: record.cycle,
            hp_before: record.hp_before,
            damage: record.damage,
            comment: record.comment.clone(),
            is_kill: record.is_kill(),
            is_bonus_attempt: record.is_bonus_attempt,
            earns_bonus: record.earns_bonus,
            is_override: record.is_override,
            recorded_at: record.recorded_at,
        }
    }
}

impl From<DamageRecord> for RecordResponse {
    fn from(record: DamageRecord) -> Self {
        Self::from(&record)
    }
}

impl From<&Reservation> for ReservationResponse {
    fn from(entry: &Reservation) -> Self {
        Self {
            id: entry.id,
            kind: entry.kind,
            member_id: entry.member_id,
            boss: entry.boss,
            cycle: entry.cycle,
            comment: entry.comment.clone(),
            created_at: entry.created_at,
        }
    }
}

impl From<Reservation> for ReservationResponse {
    fn from(entry: Reservation) -> Self {
        Self::from(&entry)
    }
}

impl From<&SlUsage> for SlUsageResponse {
    fn from(usage: &SlUsage) -> Self {
        Self {
            id: usage.id,
            member_id: usage.member_id,
            proxy_id: usage.proxy_id,
            boss: usage.boss,
            cycle: usage.cycle,
            comment: usage.comment.clone(),
            used_at: usage.used_at,
        }
    }
}

impl From<SlUsage> for SlUsageResponse {
    fn from(usage: SlUsage) -> Self {
        Self::from(&usage)
    }
}

impl From<&KillNotice> for KillNoticeResponse {
    fn from(notice: &KillNotice) -> Self {
        Self {
            boss: notice.boss,
            cycle: notice.cycle,
            stop: notice.stop.clone(),
            tree_cleared: notice.tree_cleared.clone(),
            now_go: notice.now_go.clone(),
        }
    }
}
