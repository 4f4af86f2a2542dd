//! # clan-service
//!
//! Application layer: the commit engine, read models, membership and web
//! login, plus request/response DTOs shared by every front-end.

pub mod dto;
pub mod services;

pub use services::{
    AuthService, BattleService, ChannelNotifier, GuildLocks, GuildService, MemberService,
    QueryService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    StatusService, TracingNotifier,
};
