//! Data transfer objects shared by the HTTP API and the chat front-end
//!
//! - Request DTOs with validation
//! - Response DTOs for serializing outputs
//! - Mappers from domain entities to response DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    BossQuery, CommitRecordRequest, CreateGuildRequest, CycleQuery, DayQuery,
    ForceSetBossRequest, JoinGuildRequest, LoginRequest, RecordHistoryQuery,
    RefreshAdminsRequest, RemindRequest, RenameRequest, ReserveRequest, SetPasswordRequest,
    SlRequest, SubscribeRequest, SwitchDatasetRequest, UndoRequest, UpdateCommentRequest,
};

pub use responses::{
    BoardResponse, BossStatusResponse, ClearedResponse, GuildResponse, HealthResponse,
    KillNoticeResponse, LoginResponse, MemberResponse, MemberStatusResponse, ReadinessResponse,
    RecordReceipt, RecordResponse, RemindedResponse, RemovedResponse, ReservationResponse,
    SlUsageResponse, TotalsResponse,
};
