//! Notifications the engine asks front-ends to relay
//!
//! The domain only picks recipients and the reason; wording belongs to the
//! chat front-end.

use serde::{Deserialize, Serialize};

use crate::battle::KillNotice;
use crate::value_objects::{BossIndex, GuildId, MemberId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// The boss they were fighting or waiting on was killed
    BossKilledStop { boss: BossIndex, cycle: i32 },
    /// Their tree on the boss was cleared by the kill
    TreeCleared { boss: BossIndex, cycle: i32 },
    /// A boss/cycle they subscribed to can be fought now
    NowGo { boss: BossIndex, cycle: i32 },
    /// An admin asked them to attack
    Reminder { from: MemberId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub guild_id: GuildId,
    pub recipients: Vec<MemberId>,
    #[serde(flatten)]
    pub kind: NotificationKind,
}

impl Notification {
    /// One notification per non-empty recipient list of the kill
    pub fn from_kill(guild_id: GuildId, notice: &KillNotice) -> Vec<Self> {
        let (boss, cycle) = (notice.boss, notice.cycle);
        [
            (
                &notice.stop,
                NotificationKind::BossKilledStop { boss, cycle },
            ),
            (
                &notice.tree_cleared,
                NotificationKind::TreeCleared { boss, cycle },
            ),
            (&notice.now_go, NotificationKind::NowGo { boss, cycle }),
        ]
        .into_iter()
        .filter(|(recipients, _)| !recipients.is_empty())
        .map(|(recipients, kind)| Self {
            guild_id,
            recipients: recipients.clone(),
            kind,
        })
        .collect()
    }
}
