//! Member entity - a globally scoped player identity

use chrono::{DateTime, Utc};

use crate::value_objects::{GuildId, MemberId};

/// Member entity
///
/// Credentials are kept by the repository and never loaded with the entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub guild_ids: Vec<GuildId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    pub fn new(id: MemberId, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            guild_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_in_guild(&self, guild_id: GuildId) -> bool {
        self.guild_ids.contains(&guild_id)
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }
}
