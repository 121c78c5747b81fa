mod common;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Duration;
use common::{Harness, epoch, in_one_hour, mint_raw, mint_token};
use libro_session::{
    TokenStore,
    error::SessionError,
    models::Role,
    session::{Access, Session},
};
use serde_json::json;

// --- Startup Restore ---

#[test]
fn test_initialize_without_token_is_anonymous() {
    let harness = Harness::empty();
    let session = harness.session();

    assert!(!session.is_authenticated());
    assert!(!session.is_admin());
    assert_eq!(session.subject(), None);
    assert_eq!(session.role(), None);
    assert_eq!(harness.transport.bearer(), None);
}

#[test]
fn test_initialize_restores_unexpired_token() {
    let token = mint_token("dave", "USER", in_one_hour());
    let harness = Harness::with_token(&token);
    let session = harness.session();

    assert!(session.is_authenticated());
    assert!(!session.is_admin());
    assert_eq!(session.subject(), Some("dave"));
    assert_eq!(session.role(), Some(Role::User));
    // The restored token is attached to outgoing API calls.
    assert_eq!(harness.transport.bearer(), Some(token));
}

#[test]
fn test_initialize_with_expired_token_clears_storage() {
    let token = mint_token("erin", "ADMIN", epoch() - Duration::minutes(5));
    let harness = Harness::with_token(&token);
    let session = harness.session();

    assert!(!session.is_authenticated());
    assert_eq!(harness.tokens.load(), None);
    assert_eq!(harness.transport.bearer(), None);
}

#[test]
fn test_initialize_with_token_expiring_now_is_anonymous() {
    let token = mint_token("erin", "USER", epoch());
    let harness = Harness::with_token(&token);

    assert!(!harness.session().is_authenticated());
    assert_eq!(harness.tokens.load(), None);
}

#[test]
fn test_initialize_with_malformed_tokens_clears_storage() {
    let malformed = [
        "".to_string(),
        "not-a-token".to_string(),
        "a.b.c".to_string(),
        // Valid shape, no subject.
        mint_raw(&json!({ "role": "USER", "exp": in_one_hour().timestamp() })),
        // Valid shape, no expiry.
        mint_raw(&json!({ "sub": "frank", "role": "USER" })),
    ];

    for token in malformed {
        let harness = Harness::with_token(&token);
        let session = harness.session();

        assert!(!session.is_authenticated(), "token {:?} should not restore", token);
        assert_eq!(harness.tokens.load(), None, "token {:?} should be cleared", token);
    }
}

// --- Login / Logout ---

#[test]
fn test_login_admin_sets_session_and_persists_token() {
    let harness = Harness::empty();
    let mut session = harness.session();
    let token = mint_token("alice", "ADMIN", in_one_hour());

    session.login(&token, "alice", Role::Admin).unwrap();

    assert!(session.is_authenticated());
    assert!(session.is_admin());
    assert_eq!(session.subject(), Some("alice"));
    assert_eq!(harness.tokens.load(), Some(token.clone()));
    assert_eq!(harness.transport.bearer(), Some(token));
}

#[test]
fn test_login_overwrites_prior_session() {
    let harness = Harness::empty();
    let mut session = harness.session();

    let first = mint_token("bob", "USER", in_one_hour());
    session.login(&first, "bob", Role::User).unwrap();

    let second = mint_token("carol", "ADMIN", in_one_hour());
    session.login(&second, "carol", Role::Admin).unwrap();

    assert_eq!(session.subject(), Some("carol"));
    assert!(session.is_admin());
    assert_eq!(harness.tokens.load(), Some(second));
}

#[test]
fn test_login_with_malformed_token_leaves_anonymous() {
    let harness = Harness::empty();
    let mut session = harness.session();
    let valid = mint_token("bob", "USER", in_one_hour());
    session.login(&valid, "bob", Role::User).unwrap();

    let result = session.login("garbage", "mallory", Role::Admin);

    assert!(matches!(result, Err(SessionError::MalformedToken(_))));
    assert!(!session.is_authenticated());
    assert_eq!(harness.tokens.load(), None);
    assert_eq!(harness.transport.bearer(), None);
}

#[test]
fn test_login_with_expired_token_is_rejected() {
    let harness = Harness::empty();
    let mut session = harness.session();
    let token = mint_token("gina", "USER", epoch() - Duration::seconds(1));

    assert_eq!(session.login(&token, "gina", Role::User), Err(SessionError::ExpiredToken));
    assert!(!session.is_authenticated());
    assert_eq!(harness.tokens.load(), None);
}

#[test]
fn test_logout_clears_everything() {
    let harness = Harness::empty();
    let mut session = harness.session();
    let token = mint_token("alice", "ADMIN", in_one_hour());
    session.login(&token, "alice", Role::Admin).unwrap();

    session.logout();

    assert!(!session.is_authenticated());
    assert!(!session.is_admin());
    assert_eq!(harness.tokens.load(), None);
    assert_eq!(harness.transport.bearer(), None);
}

#[test]
fn test_logout_is_idempotent_when_anonymous() {
    let harness = Harness::empty();
    let mut session = harness.session();

    session.logout();
    session.logout();

    assert!(!session.is_authenticated());
    assert_eq!(harness.tokens.load(), None);
}

// --- Reload Round-Trip ---

#[test]
fn test_login_then_reload_reproduces_identity() {
    let harness = Harness::empty();
    let mut session = harness.session();
    let token = mint_token("carol", "ADMIN", in_one_hour());
    session.login(&token, "carol", Role::Admin).unwrap();

    // Simulated page reload half an hour later.
    harness.clock.advance(Duration::minutes(30));
    let reloaded = harness.session();

    assert_eq!(reloaded.subject(), session.subject());
    assert_eq!(reloaded.role(), session.role());
    assert!(reloaded.is_admin());
}

#[test]
fn test_initialize_from_storage_picks_up_external_logout() {
    let harness = Harness::empty();
    let mut session = harness.session();
    let token = mint_token("bob", "USER", in_one_hour());
    session.login(&token, "bob", Role::User).unwrap();

    // Another writer removed the token; re-running the restore notices.
    harness.tokens.clear();
    session.initialize_from_storage();

    assert!(!session.is_authenticated());
}

// --- Expiry While Open ---

#[test]
fn test_reads_revalidate_expiry() {
    let harness = Harness::empty();
    let mut session = harness.session();
    let token = mint_token("hank", "ADMIN", in_one_hour());
    session.login(&token, "hank", Role::Admin).unwrap();

    harness.clock.advance(Duration::hours(2));

    assert!(!session.is_authenticated());
    assert!(!session.is_admin());
    assert_eq!(session.access(), Access::anonymous());
    // Reads never mutate; the token is still stored until revalidate runs.
    assert!(harness.tokens.load().is_some());
}

#[test]
fn test_revalidate_collapses_expired_session() {
    let harness = Harness::empty();
    let mut session = harness.session();
    let token = mint_token("hank", "USER", in_one_hour());
    session.login(&token, "hank", Role::User).unwrap();

    assert!(session.revalidate());

    harness.clock.advance(Duration::hours(1));
    assert!(!session.revalidate());
    assert_eq!(harness.tokens.load(), None);
    assert_eq!(harness.transport.bearer(), None);
}

// --- Views ---

#[test]
fn test_role_claim_mapping() {
    let lowercase_admin = mint_token("ivy", "admin", in_one_hour());
    assert!(Harness::with_token(&lowercase_admin).session().is_admin());

    let no_role = mint_raw(&json!({ "sub": "jack", "exp": in_one_hour().timestamp() }));
    let session = Harness::with_token(&no_role).session();
    assert!(session.is_authenticated());
    assert_eq!(session.role(), Some(Role::User));

    let unknown_role = mint_token("kim", "LIBRARIAN", in_one_hour());
    assert_eq!(Harness::with_token(&unknown_role).session().role(), Some(Role::User));
}

#[test]
fn test_view_reflects_session() {
    let harness = Harness::empty();
    let mut session = harness.session();

    let anonymous = session.view();
    assert!(!anonymous.is_authenticated);
    assert!(!anonymous.is_admin);
    assert_eq!(anonymous.subject, None);
    assert_eq!(anonymous.role, None);
    assert_eq!(anonymous.expires_at, None);

    let token = mint_token("alice", "ADMIN", in_one_hour());
    session.login(&token, "alice", Role::Admin).unwrap();
    let view = session.view();
    assert!(view.is_authenticated);
    assert!(view.is_admin);
    assert_eq!(view.subject.as_deref(), Some("alice"));
    assert_eq!(view.role, Some(Role::Admin));
    assert_eq!(view.expires_at, Some(in_one_hour()));
}

#[test]
fn test_session_access_at() {
    let session = Session::Anonymous;
    assert_eq!(session.access_at(epoch()), Access::anonymous());
}

#[test]
fn test_initialize_restores_rs256_token() {
    let header = URL_SAFE_NO_PAD.encode(json!({ "alg": "RS256", "typ": "JWT" }).to_string());
    let payload = URL_SAFE_NO_PAD.encode(
        json!({ "sub": "carol", "role": "ADMIN", "exp": in_one_hour().timestamp() }).to_string(),
    );
    let token = format!("{}.{}.c2lnbmVkLWJ5LWFuLXJzYS1rZXk", header, payload);
    let harness = Harness::with_token(&token);

    let mut session = harness.session();
    assert!(session.is_admin());
    assert_eq!(harness.tokens.load(), Some(token.clone()));

    // The same token is accepted on login.
    session.logout();
    session.login(&token, "carol", Role::Admin).unwrap();
    assert_eq!(session.subject(), Some("carol"));
}
