//! Guild model -> entity

use clan_core::{DomainError, Guild, GuildId, MemberId, Region};

use crate::models::GuildModel;

impl TryFrom<GuildModel> for Guild {
    type Error = DomainError;

    fn try_from(model: GuildModel) -> Result<Self, Self::Error> {
        let region: Region = model
            .region
            .parse()
            .map_err(|e| DomainError::DatabaseError(format!("corrupt guild {}: {e}", model.id)))?;

        Ok(Guild {
            id: GuildId::new(model.id),
            name: model.name,
            region,
            members: model.members.into_iter().map(MemberId::new).collect(),
            admins: model.admins.into_iter().map(MemberId::new).collect(),
            active_dataset: model.active_dataset,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
