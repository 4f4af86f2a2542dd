//! Reservations - queue, tree and subscribe entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::{BossIndex, GuildId, MemberId, RecordId};

/// Kind of reservation a member holds on a boss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationKind {
    /// Fighting the boss right now
    Queue,
    /// Holding an unresolved hit on the boss
    Tree,
    /// Waiting for a future cycle of the boss
    Subscribe,
}

impl ReservationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queue => "queue",
            Self::Tree => "tree",
            Self::Subscribe => "subscribe",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "queue" => Some(Self::Queue),
            "tree" => Some(Self::Tree),
            "subscribe" => Some(Self::Subscribe),
            _ => None,
        }
    }
}

impl fmt::Display for ReservationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reservation entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: RecordId,
    pub kind: ReservationKind,
    pub guild_id: GuildId,
    pub dataset: i32,
    pub member_id: MemberId,
    pub boss: BossIndex,
    pub cycle: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn is(&self, kind: ReservationKind, member: MemberId) -> bool {
        self.kind == kind && self.member_id == member
    }
}
