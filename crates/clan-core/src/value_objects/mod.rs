//! Value objects - immutable types that represent domain concepts

mod boss;
mod boss_table;
mod damage;
mod ids;
mod region;

pub use boss::{BossIndex, BossIndexError, BOSS_COUNT};
pub use boss_table::{next_cycle, BossTable, BossTableError, BossTables, MAX_CYCLE};
pub use damage::{parse_amount, AmountParseError};
pub use ids::{GuildId, IdParseError, MemberId, RecordId, RecordIdGenerator};
pub use region::{BossLayout, Region, RegionParseError};
