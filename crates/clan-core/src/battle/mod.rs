//! Battle engine - pure calculations over the ledger
//!
//! Everything here is synchronous and storage-free; services feed it
//! records loaded under the guild lock.

mod boss_state;
mod day_window;
mod kill;
mod mutation;
mod quota;
mod rejection;

pub use boss_state::{BossBoard, BossStatus};
pub use day_window::{battle_day, DayWindow, DAY_START_HOUR};
pub use kill::{resolve_kill, KillNotice, KillResolution};
pub use mutation::{LedgerMutation, MutationPlan};
pub use quota::{DailyStatus, GuildTotals};
pub use rejection::{
    AuthRejection, CancelRejection, GuildRejection, QueueRejection, RecordRejection, Rejection,
    RejectionKind, SlRejection, SubscribeRejection, TreeRejection, UndoRejection,
};
