//! Service implementations
//!
//! Each service borrows the shared [`ServiceContext`]; construct one per call.

mod auth;
mod battle;
mod context;
mod error;
mod guild;
mod locks;
mod member;
mod notification;
mod query;
mod status;

pub use auth::AuthService;
pub use battle::{BattleOutcome, BattleService};
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use guild::{GuildOutcome, GuildService};
pub use locks::GuildLocks;
pub use member::MemberService;
pub use notification::{relay, ChannelNotifier, TracingNotifier};
pub use query::QueryService;
pub use status::StatusService;
