//! # clan-core
//!
//! Domain layer of the clan battle tracker: entities, value objects, the pure
//! battle calculators (boss state, quota, kill resolution) and repository ports.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod battle;
pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use battle::{
    battle_day, resolve_kill, AuthRejection, BossBoard, BossStatus, CancelRejection, DailyStatus,
    DayWindow, GuildRejection, GuildTotals, KillNotice, KillResolution, LedgerMutation,
    MutationPlan, QueueRejection, RecordRejection, Rejection, RejectionKind, SlRejection,
    SubscribeRejection, TreeRejection, UndoRejection,
};
pub use entities::{
    DamageRecord, Guild, LedgerScope, Member, Reservation, ReservationKind, SlUsage,
};
pub use error::DomainError;
pub use events::{Notification, NotificationKind};
pub use traits::{
    Clock, GuildRepository, LedgerRepository, ManualClock, MemberRepository, Notifier,
    RecordQuery, RepoResult, ReservationQuery, SlQuery, SystemClock,
};
pub use value_objects::{
    parse_amount, BossIndex, BossLayout, BossTable, BossTables, GuildId, MemberId, RecordId,
    RecordIdGenerator, Region, BOSS_COUNT, MAX_CYCLE,
};
