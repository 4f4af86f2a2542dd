//! Member model -> entity

use clan_core::{GuildId, Member, MemberId};

use crate::models::MemberModel;

impl From<MemberModel> for Member {
    fn from(model: MemberModel) -> Self {
        Member {
            id: MemberId::new(model.id),
            name: model.name,
            guild_ids: model.guild_ids.into_iter().map(GuildId::new).collect(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
