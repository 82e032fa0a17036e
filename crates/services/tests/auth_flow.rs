mod common;

use std::sync::Arc;

use intellitest_core::model::{Role, UserId};
use intellitest_core::time::{fixed_clock, fixed_now};
use services::api::RemoteApi;
use services::auth::SessionProvider;
use services::error::AuthError;
use storage::repository::{CredentialRepository, Storage, StoredCredentials};

use common::{FakeApi, GOOD_TOKEN, PASSWORD, student};

fn provider(api: &Arc<FakeApi>, storage: &Storage) -> SessionProvider {
    SessionProvider::new(fixed_clock(), api.clone(), Arc::clone(&storage.credentials))
}

#[tokio::test]
async fn login_stores_token_and_identity() {
    let api = FakeApi::new().with_user(student("10A"));
    let storage = Storage::in_memory();
    let session = provider(&api, &storage);

    let user = session.login(" ana ", PASSWORD).await.unwrap();
    assert_eq!(user.username, "ana");
    assert!(session.is_authenticated());
    assert_eq!(session.role(), Some(Role::Student));
    assert!(api.has_token());

    let stored = storage.credentials.load_credentials().await.unwrap().unwrap();
    assert_eq!(stored.access_token, GOOD_TOKEN);
    assert_eq!(stored.user_id, Some(UserId::new(1)));
    assert_eq!(stored.saved_at, fixed_now());
}

#[tokio::test]
async fn hydrate_restores_a_stored_session() {
    let api = FakeApi::new().with_user(student("10A"));
    let storage = Storage::in_memory();
    provider(&api, &storage).login("ana", PASSWORD).await.unwrap();
    api.set_token(None);

    let restored = provider(&api, &storage);
    assert!(!restored.is_authenticated());
    let user = restored.hydrate().await.expect("restored");
    assert_eq!(user.class(), Some("10A"));
    assert!(restored.is_authenticated());
}

#[tokio::test]
async fn hydrate_with_rejected_token_clears_it() {
    let api = FakeApi::new().with_user(student("10A"));
    let storage = Storage::in_memory();
    storage
        .credentials
        .save_credentials(&StoredCredentials::new("expired", fixed_now()))
        .await
        .unwrap();

    let session = provider(&api, &storage);
    assert_eq!(session.hydrate().await, None);
    assert!(!session.is_authenticated());
    assert!(!api.has_token());
    assert_eq!(storage.credentials.load_credentials().await.unwrap(), None);
}

#[tokio::test]
async fn hydrate_without_token_stays_signed_out() {
    let api = FakeApi::new().with_user(student("10A"));
    let storage = Storage::in_memory();
    let session = provider(&api, &storage);
    assert_eq!(session.hydrate().await, None);
    assert!(!api.has_token());
}

#[tokio::test]
async fn wrong_password_stores_nothing() {
    let api = FakeApi::new().with_user(student("10A"));
    let storage = Storage::in_memory();
    let session = provider(&api, &storage);

    let err = session.login("ana", "nope").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert!(!session.is_authenticated());
    assert_eq!(storage.credentials.load_credentials().await.unwrap(), None);

    let err = session.login("  ", "x").await.unwrap_err();
    assert!(matches!(err, AuthError::MissingCredentials));
}

#[tokio::test]
async fn logout_forgets_everything() {
    let api = FakeApi::new().with_user(student("10A"));
    let storage = Storage::in_memory();
    let session = provider(&api, &storage);
    session.login("ana", PASSWORD).await.unwrap();

    session.logout().await.unwrap();
    assert!(!session.is_authenticated());
    assert_eq!(session.identity(), None);
    assert!(!api.has_token());
    assert_eq!(storage.credentials.load_credentials().await.unwrap(), None);
}
