//! API integration tests
//!
//! Each test spawns its own in-memory server. The PostgreSQL test at the end
//! additionally needs `DATABASE_URL`.
//!
//! Run with: cargo test -p clan-integration-tests --test api_tests

use clan_integration_tests::{
    assert_error, assert_json, assert_status, create_guild_body, damage_body, database_config,
    kill_body, unique_id, BoardBody, GuildBody, LoginBody, MemberBody, ReceiptBody, RecordBody,
    ReservationBody, StatusBody, TestMember, TestServer, TotalsBody, TEST_PASSWORD,
};
use reqwest::StatusCode;
use serde_json::json;

/// A jp guild created by `admin`, who enlists `others`
async fn setup_guild(
    server: &TestServer,
    admin: &TestMember,
    others: &[&TestMember],
) -> String {
    let guild_id = unique_id();
    let response = server
        .post_auth(
            "/api/v1/guilds",
            &admin.token,
            &create_guild_body(guild_id, "jp", &admin.name),
        )
        .await
        .unwrap();
    let guild: GuildBody = assert_json(response, StatusCode::CREATED).await.unwrap();

    for member in others {
        let response = server
            .post_auth(
                &format!("/api/v1/guilds/{}/members/{}", guild.id, member.id),
                &admin.token,
                &json!({ "name": member.name }),
            )
            .await
            .unwrap();
        assert_status(response, StatusCode::CREATED).await.unwrap();
    }

    guild.id
}

async fn board(server: &TestServer, guild: &str, token: &str) -> BoardBody {
    let response = server
        .get_auth(&format!("/api/v1/guilds/{guild}/bosses"), token)
        .await
        .unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get("/health/ready").await.unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["storage"], "memory");
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_login_and_logout() {
    let server = TestServer::start().await.unwrap();
    let alice = server.enlist("alice").await.unwrap();

    let response = server
        .get_auth("/api/v1/members/@me/guilds", &alice.token)
        .await
        .unwrap();
    let guilds: Vec<GuildBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(guilds.is_empty());

    let response = server
        .post_auth("/api/v1/auth/logout", &alice.token, &json!({}))
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get_auth("/api/v1/members/@me/guilds", &alice.token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_SESSION");
}

#[tokio::test]
async fn test_failed_logins_look_alike() {
    let server = TestServer::start().await.unwrap();
    let alice = server.enlist("alice").await.unwrap();

    let response = server
        .post(
            "/api/v1/auth/login",
            &json!({ "member_id": alice.id, "password": "not-the-password" }),
        )
        .await
        .unwrap();
    let wrong = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server
        .post(
            "/api/v1/auth/login",
            &json!({ "member_id": unique_id().to_string(), "password": TEST_PASSWORD }),
        )
        .await
        .unwrap();
    let unknown = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();

    assert_eq!(wrong, "INVALID_CREDENTIALS");
    assert_eq!(wrong, unknown);
}

#[tokio::test]
async fn test_change_password_ends_session() {
    let server = TestServer::start().await.unwrap();
    let alice = server.enlist("alice").await.unwrap();

    let response = server
        .put_auth("/api/v1/auth/password", &alice.token, &json!({ "password": "short" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .put_auth(
            "/api/v1/auth/password",
            &alice.token,
            &json!({ "password": "a-much-longer-secret" }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get_auth("/api/v1/members/@me/guilds", &alice.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server
        .post(
            "/api/v1/auth/login",
            &json!({ "member_id": alice.id, "password": "a-much-longer-secret" }),
        )
        .await
        .unwrap();
    let login: LoginBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!login.token.is_empty());
}

#[tokio::test]
async fn test_api_requires_auth() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/api/v1/members/@me/guilds").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "MISSING_AUTHORIZATION");
}

// ============================================================================
// Guilds and members
// ============================================================================

#[tokio::test]
async fn test_create_guild() {
    let server = TestServer::start().await.unwrap();
    let alice = server.enlist("alice").await.unwrap();
    let guild_id = unique_id();

    let response = server
        .post_auth(
            "/api/v1/guilds",
            &alice.token,
            &create_guild_body(guild_id, "tw", "alice"),
        )
        .await
        .unwrap();
    let guild: GuildBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(guild.id, guild_id.to_string());
    assert_eq!(guild.region, "tw");
    assert_eq!(guild.admins, vec![alice.id.to_string()]);
    assert_eq!(guild.members, vec![alice.id.to_string()]);
    assert_eq!(guild.active_dataset, 1);

    // Same chat group again
    let response = server
        .post_auth(
            "/api/v1/guilds",
            &alice.token,
            &create_guild_body(guild_id, "tw", "alice"),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "GUILD_ALREADY_EXISTS");

    let response = server
        .post_auth(
            "/api/v1/guilds",
            &alice.token,
            &create_guild_body(unique_id(), "kr", "alice"),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .get_auth(&format!("/api/v1/guilds/{guild_id}"), &alice.token)
        .await
        .unwrap();
    let fetched: GuildBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(fetched.name, guild.name);
}

#[tokio::test]
async fn test_invalid_guild_id_in_path() {
    let server = TestServer::start().await.unwrap();
    let alice = server.enlist("alice").await.unwrap();

    let response = server
        .get_auth("/api/v1/guilds/not-a-number", &alice.token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_PATH_PARAMETER");

    let response = server
        .get_auth(&format!("/api/v1/guilds/{}", unique_id()), &alice.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_members_join_and_leave() {
    let server = TestServer::start().await.unwrap();
    let alice = server.enlist("alice").await.unwrap();
    let bob = server.enlist("bob").await.unwrap();
    let guild = setup_guild(&server, &alice, &[&bob]).await;

    let response = server
        .get_auth(&format!("/api/v1/guilds/{guild}/members"), &bob.token)
        .await
        .unwrap();
    let members: Vec<MemberBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(members.len(), 2);
    assert!(members.iter().any(|m| m.name == "alice" && m.is_admin));
    assert!(members.iter().any(|m| m.name == "bob" && !m.is_admin));

    let response = server
        .post_auth(
            &format!("/api/v1/guilds/{guild}/members/{}", bob.id),
            &alice.token,
            &json!({ "name": "bob" }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "ALREADY_MEMBER");

    // Only admins enlist
    let carol = server.enlist("carol").await.unwrap();
    let response = server
        .post_auth(
            &format!("/api/v1/guilds/{guild}/members/{}", carol.id),
            &bob.token,
            &json!({ "name": "carol" }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "NOT_ADMIN");

    // Bob queues, then leaves: the queue goes with him
    let response = server
        .post_auth(
            &format!("/api/v1/guilds/{guild}/queue"),
            &bob.token,
            &json!({ "boss": 3 }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .delete_auth(&format!("/api/v1/guilds/{guild}/members/@me"), &bob.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get_auth(&format!("/api/v1/guilds/{guild}/queue"), &alice.token)
        .await
        .unwrap();
    let queue: Vec<ReservationBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(queue.is_empty());
}

#[tokio::test]
async fn test_outsiders_cannot_touch_a_guild() {
    let server = TestServer::start().await.unwrap();
    let alice = server.enlist("alice").await.unwrap();
    let mallory = server.enlist("mallory").await.unwrap();
    let guild = setup_guild(&server, &alice, &[]).await;

    let response = server
        .post_auth(
            &format!("/api/v1/guilds/{guild}/records"),
            &alice.token,
            &damage_body(1, "50"),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    for path in ["records", "status", "members", "bosses", "queue"] {
        let response = server
            .get_auth(&format!("/api/v1/guilds/{guild}/{path}"), &mallory.token)
            .await
            .unwrap();
        let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
        assert_eq!(code, "PERMISSION_DENIED", "GET {path}");
    }

    let response = server
        .get_auth(&format!("/api/v1/guilds/{guild}"), &mallory.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    // Nobody enlists themselves into a foreign guild
    let response = server
        .post_auth(
            &format!("/api/v1/guilds/{guild}/members/{}", mallory.id),
            &mallory.token,
            &json!({ "name": "mallory" }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .post_auth(
            &format!("/api/v1/guilds/{guild}/queue"),
            &mallory.token,
            &json!({ "boss": 2 }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .get_auth(&format!("/api/v1/guilds/{guild}/members"), &alice.token)
        .await
        .unwrap();
    let members: Vec<MemberBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(members.len(), 1);
}

#[tokio::test]
async fn test_admin_only_operations() {
    let server = TestServer::start().await.unwrap();
    let alice = server.enlist("alice").await.unwrap();
    let bob = server.enlist("bob").await.unwrap();
    let carol = server.enlist("carol").await.unwrap();
    let guild = setup_guild(&server, &alice, &[&bob, &carol]).await;

    let response = server
        .put_auth(
            &format!("/api/v1/guilds/{guild}/dataset"),
            &bob.token,
            &json!({ "dataset": 2 }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "NOT_ADMIN");

    let response = server
        .delete_auth(
            &format!("/api/v1/guilds/{guild}/members/{}", carol.id),
            &bob.token,
        )
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::CONFLICT).await.unwrap(),
        "NOT_ADMIN"
    );

    let response = server
        .put_auth(
            &format!("/api/v1/guilds/{guild}/admins"),
            &bob.token,
            &json!({ "admins": [bob.id] }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();

    // Promote bob, who may then remove carol
    let response = server
        .put_auth(
            &format!("/api/v1/guilds/{guild}/admins/{}", bob.id),
            &alice.token,
            &json!({}),
        )
        .await
        .unwrap();
    let updated: GuildBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(updated.admins.contains(&bob.id.to_string()));

    let response = server
        .delete_auth(
            &format!("/api/v1/guilds/{guild}/members/{}", carol.id),
            &bob.token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .put_auth(
            &format!("/api/v1/guilds/{guild}/dataset"),
            &bob.token,
            &json!({ "dataset": 2 }),
        )
        .await
        .unwrap();
    let switched: GuildBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(switched.active_dataset, 2);
    assert_eq!(board(&server, &guild, &bob.token).await.dataset, 2);
}

#[tokio::test]
async fn test_force_set_and_clear_dataset() {
    let server = TestServer::start().await.unwrap();
    let alice = server.enlist("alice").await.unwrap();
    let guild = setup_guild(&server, &alice, &[]).await;

    let response = server
        .put_auth(
            &format!("/api/v1/guilds/{guild}/bosses"),
            &alice.token,
            &json!({ "boss": 2, "cycle": 4, "hp": "500w" }),
        )
        .await
        .unwrap();
    let forced: BoardBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(forced.boss(2).cycle, 4);
    assert_eq!(forced.boss(2).stage, 2);
    assert_eq!(forced.boss(2).hp, 5_000_000);

    // More than the stage 2 boss has
    let response = server
        .put_auth(
            &format!("/api/v1/guilds/{guild}/bosses"),
            &alice.token,
            &json!({ "boss": 2, "cycle": 4, "hp": "9kw" }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "ILLEGAL_HP");

    let response = server
        .delete_auth(&format!("/api/v1/guilds/{guild}/dataset"), &alice.token)
        .await
        .unwrap();
    let cleared: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(cleared["removed"], 1);

    let fresh = board(&server, &guild, &alice.token).await;
    assert_eq!(fresh.boss(2).cycle, 1);
    assert_eq!(fresh.boss(2).hp, fresh.boss(2).max_hp);
}

// ============================================================================
// Records
// ============================================================================

#[tokio::test]
async fn test_record_damage() {
    let server = TestServer::start().await.unwrap();
    let alice = server.enlist("alice").await.unwrap();
    let guild = setup_guild(&server, &alice, &[]).await;
    let records = format!("/api/v1/guilds/{guild}/records");

    let response = server
        .post_auth(&records, &alice.token, &damage_body(1, "100w"))
        .await
        .unwrap();
    let receipt: ReceiptBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(receipt.record.damage, 1_000_000);
    assert_eq!(receipt.record.hp_before, 6_000_000);
    assert!(!receipt.record.is_kill);
    assert_eq!(receipt.boss.hp, 5_000_000);
    assert!(receipt.kill.is_none());

    let response = server
        .post_auth(&records, &alice.token, &damage_body(1, "a lot"))
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(),
        "ILLEGAL_DAMAGE_FORMAT"
    );

    let response = server
        .post_auth(&records, &alice.token, &damage_body(1, "600w"))
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::CONFLICT).await.unwrap(),
        "DAMAGE_EXCEEDS_HP"
    );

    let response = server
        .post_auth(&records, &alice.token, &damage_body(6, "1"))
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(),
        "ILLEGAL_TARGET_BOSS"
    );

    assert_eq!(board(&server, &guild, &alice.token).await.boss(1).hp, 5_000_000);
}

#[tokio::test]
async fn test_kill_notifies_and_earns_bonus() {
    let server = TestServer::start().await.unwrap();
    let alice = server.enlist("alice").await.unwrap();
    let bob = server.enlist("bob").await.unwrap();
    let carol = server.enlist("carol").await.unwrap();
    let guild = setup_guild(&server, &alice, &[&bob, &carol]).await;

    let response = server
        .post_auth(
            &format!("/api/v1/guilds/{guild}/tree"),
            &bob.token,
            &json!({ "boss": 1, "comment": "waiting" }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(
            &format!("/api/v1/guilds/{guild}/subscriptions"),
            &carol.token,
            &json!({ "boss": 1, "cycle": 2 }),
        )
        .await
        .unwrap();
    let subscription: ReservationBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(subscription.kind, "subscribe");

    let response = server
        .post_auth(
            &format!("/api/v1/guilds/{guild}/records"),
            &alice.token,
            &kill_body(1),
        )
        .await
        .unwrap();
    let receipt: ReceiptBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert!(receipt.record.is_kill);
    assert!(receipt.record.earns_bonus);
    assert_eq!(receipt.record.damage, 6_000_000);
    assert_eq!(receipt.boss.cycle, 2);
    assert_eq!(receipt.boss.hp, receipt.boss.max_hp);

    let kill = receipt.kill.expect("kill notice");
    assert_eq!(kill.cycle, 1);
    assert_eq!(kill.now_go, vec![carol.id.to_string()]);
    assert_eq!(kill.tree_cleared, vec![bob.id.to_string()]);
    assert!(kill.stop.is_empty());

    let response = server
        .get_auth(&format!("/api/v1/guilds/{guild}/tree"), &alice.token)
        .await
        .unwrap();
    let tree: Vec<ReservationBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(tree.is_empty());

    // The next hit spends the bonus attempt
    let response = server
        .post_auth(
            &format!("/api/v1/guilds/{guild}/records"),
            &alice.token,
            &damage_body(2, "100w"),
        )
        .await
        .unwrap();
    let bonus: ReceiptBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert!(bonus.record.is_bonus_attempt);
    assert!(!bonus.record.earns_bonus);

    let response = server
        .get_auth(&format!("/api/v1/guilds/{guild}/status/@me"), &alice.token)
        .await
        .unwrap();
    let status: StatusBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(status.member_id, alice.id.to_string());
    assert_eq!(status.challenged, 1);
    assert_eq!(status.bonus_used, 1);
    assert_eq!(status.bonus_remaining, 0);

    let response = server
        .get_auth(&format!("/api/v1/guilds/{guild}/totals"), &bob.token)
        .await
        .unwrap();
    let totals: TotalsBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(totals.full_attempts, 1);
    assert_eq!(totals.bonus_outstanding, 0);
}

#[tokio::test]
async fn test_proxy_report() {
    let server = TestServer::start().await.unwrap();
    let alice = server.enlist("alice").await.unwrap();
    let bob = server.enlist("bob").await.unwrap();
    let guild = setup_guild(&server, &alice, &[&bob]).await;

    let response = server
        .post_auth(
            &format!("/api/v1/guilds/{guild}/records"),
            &alice.token,
            &json!({ "boss": 3, "damage": "50w", "on_behalf_of": bob.id }),
        )
        .await
        .unwrap();
    let receipt: ReceiptBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(receipt.record.member_id, bob.id.to_string());
    assert_eq!(receipt.record.proxy_id, Some(alice.id.to_string()));

    let response = server
        .get_auth(
            &format!("/api/v1/guilds/{guild}/status/{}", bob.id),
            &alice.token,
        )
        .await
        .unwrap();
    let status: StatusBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(status.name, "bob");
    assert_eq!(status.challenged, 1);
}

#[tokio::test]
async fn test_undo_last_record() {
    let server = TestServer::start().await.unwrap();
    let alice = server.enlist("alice").await.unwrap();
    let bob = server.enlist("bob").await.unwrap();
    let guild = setup_guild(&server, &alice, &[&bob]).await;
    let records = format!("/api/v1/guilds/{guild}/records");
    let undo = format!("/api/v1/guilds/{guild}/records/undo");

    let response = server
        .post_auth(&records, &alice.token, &damage_body(4, "300w"))
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    // Bob may not undo alice's record on boss 4
    let response = server
        .post_auth(&undo, &bob.token, &json!({ "boss": 4 }))
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::CONFLICT).await.unwrap(),
        "NOT_PERMITTED"
    );

    let response = server.post_auth(&undo, &alice.token, &json!({})).await.unwrap();
    let undone: RecordBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(undone.damage, 3_000_000);
    assert_eq!(undone.boss, 4);

    let restored = board(&server, &guild, &alice.token).await;
    assert_eq!(restored.boss(4).hp, restored.boss(4).max_hp);

    let response = server.post_auth(&undo, &alice.token, &json!({})).await.unwrap();
    assert_eq!(
        assert_error(response, StatusCode::NOT_FOUND).await.unwrap(),
        "NO_RECORD"
    );
}

#[tokio::test]
async fn test_record_history_filters() {
    let server = TestServer::start().await.unwrap();
    let alice = server.enlist("alice").await.unwrap();
    let bob = server.enlist("bob").await.unwrap();
    let guild = setup_guild(&server, &alice, &[&bob]).await;
    let records = format!("/api/v1/guilds/{guild}/records");

    for (member, boss, damage) in [(&alice, 1, "10w"), (&bob, 2, "20w"), (&alice, 2, "30w")] {
        let response = server
            .post_auth(&records, &member.token, &damage_body(boss, damage))
            .await
            .unwrap();
        assert_status(response, StatusCode::CREATED).await.unwrap();
    }

    let response = server
        .get_auth(&format!("{records}?boss=2"), &alice.token)
        .await
        .unwrap();
    let history: Vec<RecordBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].damage, 300_000);
    assert_eq!(history[1].damage, 200_000);
    assert!(history[0].recorded_at >= history[1].recorded_at);

    let response = server
        .get_auth(&format!("{records}?member_id={}&limit=1", alice.id), &bob.token)
        .await
        .unwrap();
    let history: Vec<RecordBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].member_id, alice.id.to_string());

    let response = server
        .get_auth(&format!("{records}?limit=0"), &bob.token)
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(),
        "VALIDATION_ERROR"
    );

    let response = server
        .get_auth(&format!("{records}?boss=9"), &bob.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_hits_never_overdraw() {
    let server = TestServer::start().await.unwrap();
    let alice = server.enlist("alice").await.unwrap();
    let mut members = Vec::new();
    for name in ["bob", "carol", "dave"] {
        members.push(server.enlist(name).await.unwrap());
    }
    let others: Vec<&TestMember> = members.iter().collect();
    let guild = setup_guild(&server, &alice, &others).await;

    let response = server
        .put_auth(
            &format!("/api/v1/guilds/{guild}/bosses"),
            &alice.token,
            &json!({ "boss": 1, "cycle": 1, "hp": "100" }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    members.push(alice.clone());
    let url = format!("{}/api/v1/guilds/{guild}/records", server.base_url());
    let handles: Vec<_> = members
        .iter()
        .map(|member| {
            let request = server
                .client
                .post(&url)
                .bearer_auth(&member.token)
                .json(&damage_body(1, "30"));
            tokio::spawn(async move { request.send().await })
        })
        .collect();

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.unwrap().unwrap().status());
    }

    let accepted = statuses.iter().filter(|&&s| s == StatusCode::CREATED).count();
    let refused = statuses.iter().filter(|&&s| s == StatusCode::CONFLICT).count();
    assert_eq!(accepted, 3);
    assert_eq!(refused, 1);
    assert_eq!(board(&server, &guild, &alice.token).await.boss(1).hp, 10);
}

// ============================================================================
// Reservations
// ============================================================================

#[tokio::test]
async fn test_queue_converts_to_tree() {
    let server = TestServer::start().await.unwrap();
    let alice = server.enlist("alice").await.unwrap();
    let bob = server.enlist("bob").await.unwrap();
    let guild = setup_guild(&server, &alice, &[&bob]).await;
    let queue = format!("/api/v1/guilds/{guild}/queue");
    let tree = format!("/api/v1/guilds/{guild}/tree");

    let response = server
        .post_auth(&queue, &bob.token, &json!({ "boss": 2, "comment": "full auto" }))
        .await
        .unwrap();
    let queued: ReservationBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(queued.kind, "queue");

    let response = server
        .post_auth(&queue, &bob.token, &json!({ "boss": 2 }))
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::CONFLICT).await.unwrap(),
        "ALREADY_QUEUED"
    );

    let response = server
        .patch_auth(&queue, &bob.token, &json!({ "comment": "manual" }))
        .await
        .unwrap();
    let updated: ReservationBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated.id, queued.id);
    assert_eq!(updated.comment.as_deref(), Some("manual"));

    let response = server
        .post_auth(&tree, &bob.token, &json!({ "boss": 2 }))
        .await
        .unwrap();
    let treed: ReservationBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(treed.kind, "tree");
    assert_eq!(treed.boss, 2);
    assert_eq!(treed.comment.as_deref(), Some("manual"));

    let response = server.get_auth(&format!("{queue}?boss=2"), &alice.token).await.unwrap();
    let queued: Vec<ReservationBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(queued.is_empty());

    // A tree holder cannot hit another boss
    let response = server
        .post_auth(
            &format!("/api/v1/guilds/{guild}/records"),
            &bob.token,
            &damage_body(3, "1w"),
        )
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::CONFLICT).await.unwrap(),
        "ON_ANOTHER_TREE"
    );

    let response = server.delete_auth(&tree, &bob.token).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.delete_auth(&tree, &bob.token).await.unwrap();
    assert_eq!(
        assert_error(response, StatusCode::NOT_FOUND).await.unwrap(),
        "NO_SUCH_ENTRY"
    );
}

#[tokio::test]
async fn test_subscriptions() {
    let server = TestServer::start().await.unwrap();
    let alice = server.enlist("alice").await.unwrap();
    let guild = setup_guild(&server, &alice, &[]).await;
    let subscriptions = format!("/api/v1/guilds/{guild}/subscriptions");

    for cycle in [2, 3] {
        let response = server
            .post_auth(&subscriptions, &alice.token, &json!({ "boss": 5, "cycle": cycle }))
            .await
            .unwrap();
        assert_status(response, StatusCode::CREATED).await.unwrap();
    }

    let response = server
        .post_auth(&subscriptions, &alice.token, &json!({ "boss": 5, "cycle": 2 }))
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::CONFLICT).await.unwrap(),
        "ALREADY_SUBSCRIBED"
    );

    let response = server
        .get_auth(&format!("{subscriptions}?boss=5"), &alice.token)
        .await
        .unwrap();
    let listed: Vec<ReservationBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(listed.len(), 2);

    let response = server
        .delete_auth(&format!("{subscriptions}/5?cycle=3"), &alice.token)
        .await
        .unwrap();
    let removed: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(removed["removed"], 1);

    let response = server
        .delete_auth(&format!("{subscriptions}/5"), &alice.token)
        .await
        .unwrap();
    let removed: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(removed["removed"], 1);

    let response = server
        .delete_auth(&format!("{subscriptions}/5"), &alice.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_sl_once_per_day() {
    let server = TestServer::start().await.unwrap();
    let alice = server.enlist("alice").await.unwrap();
    let bob = server.enlist("bob").await.unwrap();
    let guild = setup_guild(&server, &alice, &[&bob]).await;
    let sl = format!("/api/v1/guilds/{guild}/sl");

    let response = server
        .post_auth(&format!("/api/v1/guilds/{guild}/tree"), &bob.token, &json!({ "boss": 1 }))
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(&sl, &bob.token, &json!({ "boss": 1, "comment": "retry" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    // SL on a boss takes the member off the tree
    let response = server
        .get_auth(&format!("/api/v1/guilds/{guild}/tree"), &bob.token)
        .await
        .unwrap();
    let tree: Vec<ReservationBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(tree.is_empty());

    let response = server.post_auth(&sl, &bob.token, &json!({})).await.unwrap();
    assert_eq!(
        assert_error(response, StatusCode::CONFLICT).await.unwrap(),
        "SL_ALREADY_USED"
    );

    let response = server.get_auth(&sl, &alice.token).await.unwrap();
    let used: Vec<serde_json::Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(used.len(), 1);
    assert_eq!(used[0]["member_id"], bob.id.to_string());

    let response = server
        .get_auth(&format!("/api/v1/guilds/{guild}/status"), &alice.token)
        .await
        .unwrap();
    let statuses: Vec<StatusBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0].member_id, alice.id.to_string());
    assert!(!statuses[0].used_sl);
    assert!(statuses[1].used_sl);
}

#[tokio::test]
async fn test_remind_members() {
    let server = TestServer::start().await.unwrap();
    let alice = server.enlist("alice").await.unwrap();
    let bob = server.enlist("bob").await.unwrap();
    let guild = setup_guild(&server, &alice, &[&bob]).await;
    let reminders = format!("/api/v1/guilds/{guild}/reminders");

    let response = server
        .post_auth(
            &reminders,
            &alice.token,
            &json!({ "member_ids": [bob.id, bob.id, unique_id().to_string()] }),
        )
        .await
        .unwrap();
    let reminded: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(reminded["reminded"], json!([bob.id.to_string()]));

    let response = server
        .post_auth(&reminders, &bob.token, &json!({ "member_ids": [alice.id] }))
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::CONFLICT).await.unwrap(),
        "NOT_ADMIN"
    );
}

#[tokio::test]
async fn test_rename_guild_and_member() {
    let server = TestServer::start().await.unwrap();
    let alice = server.enlist("alice").await.unwrap();
    let guild = setup_guild(&server, &alice, &[]).await;

    let response = server
        .patch_auth(
            &format!("/api/v1/guilds/{guild}"),
            &alice.token,
            &json!({ "name": "Night Owls" }),
        )
        .await
        .unwrap();
    let renamed: GuildBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(renamed.name, "Night Owls");

    let response = server
        .patch_auth("/api/v1/members/@me", &alice.token, &json!({ "name": "alicia" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get_auth(&format!("/api/v1/guilds/{guild}/members"), &alice.token)
        .await
        .unwrap();
    let members: Vec<MemberBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(members[0].name, "alicia");

    let response = server
        .delete_auth(&format!("/api/v1/guilds/{guild}"), &alice.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get_auth(&format!("/api/v1/guilds/{guild}"), &alice.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_cn_guild_fights_one_boss_at_a_time() {
    let server = TestServer::start().await.unwrap();
    let alice = server.enlist("alice").await.unwrap();
    let guild_id = unique_id();

    let response = server
        .post_auth(
            "/api/v1/guilds",
            &alice.token,
            &create_guild_body(guild_id, "cn", "alice"),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();
    let guild = guild_id.to_string();

    let open: Vec<i32> = board(&server, &guild, &alice.token)
        .await
        .bosses
        .iter()
        .filter(|b| b.challengeable)
        .map(|b| b.boss)
        .collect();
    assert_eq!(open, vec![1]);

    let response = server
        .post_auth(
            &format!("/api/v1/guilds/{guild}/records"),
            &alice.token,
            &damage_body(2, "1w"),
        )
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::CONFLICT).await.unwrap(),
        "BOSS_NOT_CHALLENGEABLE"
    );

    let response = server
        .post_auth(
            &format!("/api/v1/guilds/{guild}/records"),
            &alice.token,
            &kill_body(1),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let after = board(&server, &guild, &alice.token).await;
    assert!(after.boss(2).challengeable);
    assert!(!after.boss(1).challengeable);
}

// ============================================================================
// PostgreSQL
// ============================================================================

#[tokio::test]
async fn test_postgres_round_trip() {
    let Some(config) = database_config() else {
        return;
    };

    let server = TestServer::start_with_config(config)
        .await
        .expect("Failed to start server");
    let response = server.get("/health/ready").await.unwrap();
    let ready: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(ready["storage"], "postgres");

    let alice = server.enlist("alice").await.unwrap();
    let guild = setup_guild(&server, &alice, &[]).await;

    let response = server
        .post_auth(
            &format!("/api/v1/guilds/{guild}/records"),
            &alice.token,
            &damage_body(1, "100w"),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(board(&server, &guild, &alice.token).await.boss(1).hp, 5_000_000);
}
