use super::*;

use crate::state::storage::FileStorage;

fn admin() -> AdminUser {
    AdminUser { id: "u1".into(), email: "ops@garage.ng".into(), role: "ADMIN".into() }
}

fn customer() -> AdminUser {
    AdminUser { id: "u2".into(), email: "me@mail.ng".into(), role: "USER".into() }
}

/// Token present iff user present.
fn assert_paired(session: &Session) {
    assert_eq!(session.token().is_some(), session.user().is_some(), "token/user out of step: {session:?}");
}

// =============================================================================
// set_auth / logout
// =============================================================================

#[test]
fn new_store_is_anonymous() {
    let store = SessionStore::in_memory();
    let session = store.current();
    assert_eq!(session.status(), SessionStatus::Anonymous);
    assert_paired(&session);
}

#[test]
fn set_auth_sets_both_fields() {
    let store = SessionStore::in_memory();
    store.set_auth("tok", admin()).unwrap();

    let session = store.current();
    assert_eq!(session.token(), Some("tok"));
    assert_eq!(session.user(), Some(&admin()));
    assert_eq!(session.status(), SessionStatus::AuthenticatedAdmin);
}

#[test]
fn set_auth_replaces_previous_session() {
    let store = SessionStore::in_memory();
    store.set_auth("first", admin()).unwrap();
    store.set_auth("second", customer()).unwrap();

    let session = store.current();
    assert_eq!(session.token(), Some("second"));
    assert_eq!(session.user().map(|u| u.id.as_str()), Some("u2"));
    assert_eq!(session.status(), SessionStatus::AuthenticatedNonAdmin);
}

#[test]
fn set_auth_rejects_empty_token() {
    let store = SessionStore::in_memory();
    store.set_auth("tok", admin()).unwrap();

    let err = store.set_auth("", admin()).unwrap_err();
    assert!(matches!(err, SessionError::EmptyToken));
    assert_eq!(store.current().token(), Some("tok"));
}

#[test]
fn logout_clears_both_fields() {
    let store = SessionStore::in_memory();
    store.set_auth("tok", admin()).unwrap();
    store.logout();

    let session = store.current();
    assert_eq!(session, Session::anonymous());
    assert_paired(&session);
}

#[test]
fn logout_is_idempotent() {
    let store = SessionStore::in_memory();
    store.set_auth("tok", admin()).unwrap();

    store.logout();
    let once = store.current();
    store.logout();
    let twice = store.current();
    assert_eq!(once, twice);
}

#[test]
fn logout_when_signed_out_is_noop() {
    let store = SessionStore::in_memory();
    store.logout();
    assert_eq!(store.current(), Session::anonymous());
}

#[test]
fn every_transition_keeps_pair_invariant() {
    let store = SessionStore::in_memory();
    assert_paired(&store.current());
    store.set_auth("a", admin()).unwrap();
    assert_paired(&store.current());
    let _ = store.set_auth("", customer());
    assert_paired(&store.current());
    store.logout();
    assert_paired(&store.current());
    store.set_auth("b", customer()).unwrap();
    assert_paired(&store.current());
}

#[test]
fn clones_share_one_session() {
    let store = SessionStore::in_memory();
    let other = store.clone();
    store.set_auth("tok", admin()).unwrap();
    assert_eq!(other.current().token(), Some("tok"));
    other.logout();
    assert!(!store.current().is_authenticated());
}

// =============================================================================
// persistence
// =============================================================================

#[test]
fn session_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let store = SessionStore::open(FileStorage::new(&path));
    store.set_auth("tok", admin()).unwrap();
    drop(store);

    let reopened = SessionStore::open(FileStorage::new(&path));
    assert_eq!(reopened.current().token(), Some("tok"));
    assert_eq!(reopened.current().user(), Some(&admin()));
}

#[test]
fn logout_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let store = SessionStore::open(FileStorage::new(&path));
    store.set_auth("tok", admin()).unwrap();
    store.logout();

    let reopened = SessionStore::open(FileStorage::new(&path));
    assert!(!reopened.current().is_authenticated());
}

#[test]
fn persisted_document_shape() {
    let store = SessionStore::open(MemoryStorage::default());
    store.set_auth("tok", admin()).unwrap();

    let raw = store.inner.storage.load().unwrap().unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc["token"], "tok");
    assert_eq!(doc["user"]["role"], "ADMIN");
}

#[test]
fn encode_error_names_the_session() {
    let cause = serde_json::from_str::<u8>("x").unwrap_err();
    let err = SessionError::from(cause);
    assert!(matches!(err, SessionError::Encode(_)));
    assert!(err.to_string().starts_with("could not encode session: "));
}

#[test]
fn rehydrate_complete_pair() {
    let raw = r#"{"token":"t","user":{"id":"u1","email":"ops@garage.ng","role":"ADMIN"}}"#;
    let store = SessionStore::open(MemoryStorage::with_raw(raw));
    assert_eq!(store.current().status(), SessionStatus::AuthenticatedAdmin);
}

#[test]
fn rehydrate_token_without_user_is_anonymous() {
    let store = SessionStore::open(MemoryStorage::with_raw(r#"{"token":"t","user":null}"#));
    let session = store.current();
    assert_eq!(session.status(), SessionStatus::Anonymous);
    assert_paired(&session);
}

#[test]
fn rehydrate_user_without_token_is_anonymous() {
    let raw = r#"{"user":{"id":"u1","email":"ops@garage.ng","role":"ADMIN"}}"#;
    let store = SessionStore::open(MemoryStorage::with_raw(raw));
    assert_eq!(store.current(), Session::anonymous());
}

#[test]
fn rehydrate_empty_token_is_anonymous() {
    let raw = r#"{"token":"","user":{"id":"u1","email":"ops@garage.ng","role":"ADMIN"}}"#;
    let store = SessionStore::open(MemoryStorage::with_raw(raw));
    assert_eq!(store.current(), Session::anonymous());
}

#[test]
fn rehydrate_corrupt_json_is_anonymous() {
    let store = SessionStore::open(MemoryStorage::with_raw("{not json"));
    assert_eq!(store.current(), Session::anonymous());
}

#[test]
fn rehydrate_partial_user_record_is_anonymous() {
    let store = SessionStore::open(MemoryStorage::with_raw(r#"{"token":"t","user":{"id":"u1"}}"#));
    assert_eq!(store.current(), Session::anonymous());
}

#[test]
fn rehydrate_non_admin_session_is_kept() {
    let raw = r#"{"token":"t","user":{"id":"u2","email":"me@mail.ng","role":"USER"}}"#;
    let store = SessionStore::open(MemoryStorage::with_raw(raw));
    assert_eq!(store.current().status(), SessionStatus::AuthenticatedNonAdmin);
}

// =============================================================================
// change notification
// =============================================================================

#[test]
fn subscribers_see_login_and_logout() {
    let store = SessionStore::in_memory();
    let mut rx = store.subscribe();
    assert!(!rx.borrow_and_update().is_authenticated());

    store.set_auth("tok", admin()).unwrap();
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_authenticated());

    store.logout();
    assert!(rx.has_changed().unwrap());
    assert!(!rx.borrow_and_update().is_authenticated());
}

#[test]
fn repeated_logout_does_not_notify() {
    let store = SessionStore::in_memory();
    let mut rx = store.subscribe();
    rx.borrow_and_update();
    store.logout();
    assert!(!rx.has_changed().unwrap());
}

#[test]
fn debug_does_not_print_token() {
    let store = SessionStore::in_memory();
    store.set_auth("super-secret", admin()).unwrap();
    let debug = format!("{store:?}");
    assert!(!debug.contains("super-secret"));
    assert!(debug.contains("AuthenticatedAdmin"));
}
