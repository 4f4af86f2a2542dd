//! Route table, mounted under `/api/v1`

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::handlers::{auth, battle, guilds, health, members, queries, status};
use crate::state::AppState;

/// API routes; health checks live in [`health_routes`] to skip rate limiting
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(member_routes())
        .merge(guild_routes())
        .merge(battle_routes())
        .merge(query_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/password", put(auth::change_password))
}

fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/members/@me", patch(members::rename_self))
        .route("/members/@me/guilds", get(members::joined_guilds))
        .route("/guilds/:guild_id/members", get(members::list_members))
        .route("/guilds/:guild_id/members/@me", delete(members::leave_guild))
        .route(
            "/guilds/:guild_id/members/:member_id",
            post(members::enlist_member).delete(members::remove_member),
        )
}

fn guild_routes() -> Router<AppState> {
    Router::new()
        .route("/guilds", post(guilds::create_guild))
        .route("/guilds/:guild_id", get(guilds::get_guild))
        .route("/guilds/:guild_id", patch(guilds::rename_guild))
        .route("/guilds/:guild_id", delete(guilds::delete_guild))
        .route("/guilds/:guild_id/admins", put(guilds::refresh_admins))
        .route("/guilds/:guild_id/admins/:member_id", put(guilds::add_admin))
        .route("/guilds/:guild_id/dataset", put(guilds::switch_dataset))
        .route("/guilds/:guild_id/dataset", delete(guilds::clear_dataset))
        .route("/guilds/:guild_id/bosses", put(guilds::force_set_boss_state))
}

fn battle_routes() -> Router<AppState> {
    Router::new()
        .route("/guilds/:guild_id/records", post(battle::commit_record))
        .route("/guilds/:guild_id/records/undo", post(battle::undo_last_record))
        // Queue
        .route("/guilds/:guild_id/queue", post(battle::commit_queue))
        .route("/guilds/:guild_id/queue", patch(battle::update_queue_comment))
        .route("/guilds/:guild_id/queue", delete(battle::cancel_queue))
        // Tree
        .route("/guilds/:guild_id/tree", post(battle::commit_tree))
        .route("/guilds/:guild_id/tree", patch(battle::update_tree_comment))
        .route("/guilds/:guild_id/tree", delete(battle::cancel_tree))
        // Subscriptions
        .route("/guilds/:guild_id/subscriptions", post(battle::commit_subscribe))
        .route(
            "/guilds/:guild_id/subscriptions/:boss",
            delete(battle::cancel_subscribe),
        )
        .route("/guilds/:guild_id/sl", post(battle::commit_sl))
        .route("/guilds/:guild_id/reminders", post(battle::remind_members))
}

fn query_routes() -> Router<AppState> {
    Router::new()
        .route("/guilds/:guild_id/bosses", get(queries::current_boss_states))
        .route("/guilds/:guild_id/records", get(queries::record_history))
        .route("/guilds/:guild_id/queue", get(queries::queue_list))
        .route("/guilds/:guild_id/tree", get(queries::tree_list))
        .route("/guilds/:guild_id/subscriptions", get(queries::subscribe_list))
        .route("/guilds/:guild_id/sl", get(queries::sl_list))
        .route("/guilds/:guild_id/status", get(status::status_all))
        .route("/guilds/:guild_id/status/@me", get(status::my_status))
        .route(
            "/guilds/:guild_id/status/:member_id",
            get(status::member_status),
        )
        .route("/guilds/:guild_id/totals", get(status::totals))
}
