//! Ledger models -> entities

use clan_core::{
    DamageRecord, DomainError, GuildId, MemberId, RecordId, Reservation, ReservationKind, SlUsage,
};

use super::boss_from_row;
use crate::models::{DamageRecordModel, ReservationModel, SlUsageModel};

impl TryFrom<DamageRecordModel> for DamageRecord {
    type Error = DomainError;

    fn try_from(model: DamageRecordModel) -> Result<Self, Self::Error> {
        Ok(DamageRecord {
            id: RecordId::new(model.id),
            guild_id: GuildId::new(model.guild_id),
            dataset: model.dataset,
            member_id: MemberId::new(model.member_id),
            proxy_id: model.proxy_id.map(MemberId::new),
            boss: boss_from_row(model.boss)?,
            cycle: model.cycle,
            hp_before: model.hp_before,
            damage: model.damage,
            comment: model.comment,
            is_bonus_attempt: model.is_bonus_attempt,
            earns_bonus: model.earns_bonus,
            is_override: model.is_override,
            recorded_at: model.recorded_at,
        })
    }
}

impl TryFrom<ReservationModel> for Reservation {
    type Error = DomainError;

    fn try_from(model: ReservationModel) -> Result<Self, Self::Error> {
        let kind = ReservationKind::parse(&model.kind).ok_or_else(|| {
            DomainError::DatabaseError(format!("corrupt reservation kind: {}", model.kind))
        })?;

        Ok(Reservation {
            id: RecordId::new(model.id),
            kind,
            guild_id: GuildId::new(model.guild_id),
            dataset: model.dataset,
            member_id: MemberId::new(model.member_id),
            boss: boss_from_row(model.boss)?,
            cycle: model.cycle,
            comment: model.comment,
            created_at: model.created_at,
        })
    }
}

impl TryFrom<SlUsageModel> for SlUsage {
    type Error = DomainError;

    fn try_from(model: SlUsageModel) -> Result<Self, Self::Error> {
        Ok(SlUsage {
            id: RecordId::new(model.id),
            guild_id: GuildId::new(model.guild_id),
            dataset: model.dataset,
            member_id: MemberId::new(model.member_id),
            proxy_id: model.proxy_id.map(MemberId::new),
            boss: model.boss.map(boss_from_row).transpose()?,
            cycle: model.cycle,
            comment: model.comment,
            used_at: model.used_at,
        })
    }
}
