//! Closed outcomes of the battle commands
//!
//! Every command returns `Result<T, XRejection>`. Front-ends turn a rejection
//! into text themselves; the domain only names it.

use serde::Serialize;

/// Category of a rejected command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionKind {
    /// Unparseable or out-of-range input
    IllegalInput,
    /// Input is fine but the guild state does not allow it
    PreconditionFailed,
    /// Nothing to cancel or undo
    NotFound,
}

/// Common view of the rejection enums
pub trait Rejection: std::fmt::Debug + Send + Sync {
    fn kind(&self) -> RejectionKind;

    /// Stable machine-readable code
    fn code(&self) -> &'static str;
}

macro_rules! rejection {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => ($kind:ident, $code:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant,)+
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.code())
            }
        }

        impl std::error::Error for $name {}

        impl Rejection for $name {
            fn kind(&self) -> RejectionKind {
                match self {
                    $(Self::$variant => RejectionKind::$kind,)+
                }
            }

            fn code(&self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }
        }
    };
}

rejection!(
    /// `commit_record`
    RecordRejection {
        IllegalTargetBoss => (IllegalInput, "ILLEGAL_TARGET_BOSS"),
        IllegalDamageFormat => (IllegalInput, "ILLEGAL_DAMAGE_FORMAT"),
        IllegalCycle => (IllegalInput, "ILLEGAL_CYCLE"),
        DamageExceedsHp => (PreconditionFailed, "DAMAGE_EXCEEDS_HP"),
        BossNotChallengeable => (PreconditionFailed, "BOSS_NOT_CHALLENGEABLE"),
        OnAnotherTree => (PreconditionFailed, "ON_ANOTHER_TREE"),
        MemberNotInClan => (PreconditionFailed, "MEMBER_NOT_IN_CLAN"),
    }
);

rejection!(
    /// `commit_queue`
    QueueRejection {
        IllegalTargetBoss => (IllegalInput, "ILLEGAL_TARGET_BOSS"),
        MemberNotInClan => (PreconditionFailed, "MEMBER_NOT_IN_CLAN"),
        BossNotChallengeable => (PreconditionFailed, "BOSS_NOT_CHALLENGEABLE"),
        OnAnotherTree => (PreconditionFailed, "ON_ANOTHER_TREE"),
        AlreadyOnTree => (PreconditionFailed, "ALREADY_ON_TREE"),
        AlreadyQueued => (PreconditionFailed, "ALREADY_QUEUED"),
    }
);

rejection!(
    /// `commit_tree`
    TreeRejection {
        IllegalTargetBoss => (IllegalInput, "ILLEGAL_TARGET_BOSS"),
        MemberNotInClan => (PreconditionFailed, "MEMBER_NOT_IN_CLAN"),
        BossNotChallengeable => (PreconditionFailed, "BOSS_NOT_CHALLENGEABLE"),
        AlreadyOnTree => (PreconditionFailed, "ALREADY_ON_TREE"),
        OnAnotherTree => (PreconditionFailed, "ON_ANOTHER_TREE"),
    }
);

rejection!(
    /// `commit_subscribe`
    SubscribeRejection {
        IllegalTargetBoss => (IllegalInput, "ILLEGAL_TARGET_BOSS"),
        IllegalCycle => (IllegalInput, "ILLEGAL_CYCLE"),
        MemberNotInClan => (PreconditionFailed, "MEMBER_NOT_IN_CLAN"),
        AlreadyQueued => (PreconditionFailed, "ALREADY_QUEUED"),
        AlreadySubscribed => (PreconditionFailed, "ALREADY_SUBSCRIBED"),
        CycleAlreadyKilled => (PreconditionFailed, "CYCLE_ALREADY_KILLED"),
    }
);

rejection!(
    /// `commit_sl`
    SlRejection {
        IllegalTargetBoss => (IllegalInput, "ILLEGAL_TARGET_BOSS"),
        MemberNotInClan => (PreconditionFailed, "MEMBER_NOT_IN_CLAN"),
        BossNotChallengeable => (PreconditionFailed, "BOSS_NOT_CHALLENGEABLE"),
        AlreadyUsed => (PreconditionFailed, "SL_ALREADY_USED"),
    }
);

rejection!(
    /// `cancel_queue`, `cancel_tree`, `cancel_subscribe` and the comment updates
    CancelRejection {
        IllegalTargetBoss => (IllegalInput, "ILLEGAL_TARGET_BOSS"),
        MemberNotInClan => (PreconditionFailed, "MEMBER_NOT_IN_CLAN"),
        NoSuchEntry => (NotFound, "NO_SUCH_ENTRY"),
    }
);

rejection!(
    /// `undo_last_record`
    UndoRejection {
        IllegalTargetBoss => (IllegalInput, "ILLEGAL_TARGET_BOSS"),
        MemberNotInClan => (PreconditionFailed, "MEMBER_NOT_IN_CLAN"),
        NotPermitted => (PreconditionFailed, "NOT_PERMITTED"),
        SupersededByNewerRecord => (PreconditionFailed, "SUPERSEDED_BY_NEWER_RECORD"),
        NoRecord => (NotFound, "NO_RECORD"),
    }
);

rejection!(
    /// Guild and membership management
    GuildRejection {
        IllegalName => (IllegalInput, "ILLEGAL_NAME"),
        DatasetOutOfRange => (IllegalInput, "DATASET_OUT_OF_RANGE"),
        IllegalTargetBoss => (IllegalInput, "ILLEGAL_TARGET_BOSS"),
        IllegalCycle => (IllegalInput, "ILLEGAL_CYCLE"),
        IllegalHp => (IllegalInput, "ILLEGAL_HP"),
        GuildAlreadyExists => (PreconditionFailed, "GUILD_ALREADY_EXISTS"),
        NotAdmin => (PreconditionFailed, "NOT_ADMIN"),
        AlreadyMember => (PreconditionFailed, "ALREADY_MEMBER"),
        MemberNotInClan => (PreconditionFailed, "MEMBER_NOT_IN_CLAN"),
    }
);

rejection!(
    /// Web login
    AuthRejection {
        WeakPassword => (IllegalInput, "WEAK_PASSWORD"),
        UnknownMember => (NotFound, "UNKNOWN_MEMBER"),
        PasswordNotSet => (PreconditionFailed, "PASSWORD_NOT_SET"),
        WrongPassword => (PreconditionFailed, "WRONG_PASSWORD"),
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_and_codes() {
        assert_eq!(
            RecordRejection::IllegalDamageFormat.kind(),
            RejectionKind::IllegalInput
        );
        assert_eq!(
            RecordRejection::OnAnotherTree.kind(),
            RejectionKind::PreconditionFailed
        );
        assert_eq!(UndoRejection::NoRecord.kind(), RejectionKind::NotFound);
        assert_eq!(TreeRejection::AlreadyOnTree.code(), "ALREADY_ON_TREE");
        assert_eq!(SlRejection::AlreadyUsed.to_string(), "SL_ALREADY_USED");
    }
}
