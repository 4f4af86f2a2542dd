//! Ports implemented by the infrastructure layers

mod clock;
mod notifier;
mod repositories;

pub use clock::{Clock, ManualClock, SystemClock};
pub use notifier::Notifier;
pub use repositories::{
    GuildRepository, LedgerRepository, MemberRepository, RecordQuery, RepoResult,
    ReservationQuery, SlQuery,
};
