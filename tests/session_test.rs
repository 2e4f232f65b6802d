mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::Method;
use futures::future::join_all;
use tempfile::tempdir;

use common::{pet_json, MockServer, ACCESS_TOKEN, EMAIL, PASSWORD};
use petcare::api::session::AUTH_STORAGE_FILE;
use petcare::api::{LogoutGuard, Navigator, SessionStorage};
use petcare::models::{Credentials, Pet, Vaccine};
use petcare::store::{AuthStore, SilentNotifier};
use petcare::{ApiClient, EntityStore, ListFilter, SessionStore};

#[derive(Default)]
struct CountingNavigator(AtomicUsize);

impl Navigator for CountingNavigator {
    fn redirect_to_root(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn credentials(password: &str) -> Credentials {
    Credentials {
        email: EMAIL.to_string(),
        password: password.to_string(),
    }
}

fn guarded_client(server: &MockServer) -> (ApiClient, Arc<SessionStore>, Arc<CountingNavigator>) {
    let session = Arc::new(SessionStore::in_memory());
    let navigator = Arc::new(CountingNavigator::default());
    let guard = LogoutGuard::with_timing(
        navigator.clone(),
        Duration::from_millis(10),
        Duration::from_millis(500),
    );
    let client = ApiClient::with_guard(&server.base_url, session.clone(), Arc::new(guard));
    (client, session, navigator)
}

#[tokio::test]
async fn test_concurrent_401s_redirect_once() {
    let server = MockServer::start().await;
    let (client, session, navigator) = guarded_client(&server);
    session.set_tokens(ACCESS_TOKEN.to_string(), None);
    server.reject_all(true);

    let pets: EntityStore<Pet> = EntityStore::remote(client.clone(), Arc::new(SilentNotifier));
    let vaccines: EntityStore<Vaccine> = EntityStore::remote(client, Arc::new(SilentNotifier));
    let all = ListFilter::all();
    let for_pet = ListFilter::for_pet("pet-1");

    let (listed, (fetched, deleted)) = tokio::join!(
        join_all((0..3).map(|_| pets.fetch_all(&all))),
        async { tokio::join!(vaccines.fetch_all(&for_pet), vaccines.delete("vac-1")) },
    );
    assert!(listed.iter().all(|ok| !ok));
    assert!(!fetched && !deleted);
    assert_eq!(server.request_count(), 5);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(navigator.0.load(Ordering::SeqCst), 1);
    assert!(!session.is_authenticated());
    assert!(session.access_token().is_none());
}

#[tokio::test]
async fn test_401_without_token_does_not_redirect() {
    let server = MockServer::start().await;
    let (client, _session, navigator) = guarded_client(&server);
    server.reject_all(true);

    let pets: EntityStore<Pet> = EntityStore::remote(client, Arc::new(SilentNotifier));
    assert!(!pets.fetch_all(&ListFilter::all()).await);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(navigator.0.load(Ordering::SeqCst), 0);
    assert_eq!(
        pets.error().as_deref(),
        Some("Could not validate credentials")
    );
}

#[tokio::test]
async fn test_login_sends_bearer_and_logout_clears() {
    let server = MockServer::start().await;
    server.seed("pets", pet_json("pet-1", "Toby"));
    let dir = tempdir().unwrap();
    let session = Arc::new(SessionStore::persistent(SessionStorage::in_dir(dir.path())).unwrap());
    let client = ApiClient::new(&server.base_url, session.clone());
    let auth = AuthStore::new(client.clone(), Arc::new(SilentNotifier));

    auth.login(&credentials(PASSWORD)).await.unwrap();
    assert!(auth.is_authenticated());
    assert_eq!(session.access_token().as_deref(), Some(ACCESS_TOKEN));
    assert!(dir.path().join(AUTH_STORAGE_FILE).exists());

    let user = auth.get_user_data().await.unwrap();
    assert_eq!(user.email, EMAIL);
    assert_eq!(auth.user().map(|u| u.email).as_deref(), Some(EMAIL));

    let pets: EntityStore<Pet> = EntityStore::remote(client, Arc::new(SilentNotifier));
    assert!(pets.fetch_all(&ListFilter::all()).await);
    let bearer = format!("Bearer {}", ACCESS_TOKEN);
    let list = server.requests_to(Method::GET, "/pets");
    assert_eq!(list[0].authorization.as_deref(), Some(bearer.as_str()));

    // A fresh store over the same directory picks the session up
    let reopened = SessionStore::persistent(SessionStorage::in_dir(dir.path())).unwrap();
    assert_eq!(reopened.access_token().as_deref(), Some(ACCESS_TOKEN));

    auth.logout().await;
    assert!(!auth.is_authenticated());
    assert!(session.access_token().is_none());
    assert!(!dir.path().join(AUTH_STORAGE_FILE).exists());
    let logout = server.requests_to(Method::POST, "/auth/logout");
    assert_eq!(logout.len(), 1);
    assert_eq!(logout[0].authorization.as_deref(), Some(bearer.as_str()));
}

#[tokio::test]
async fn test_failed_login_reports_backend_message() {
    let server = MockServer::start().await;
    let client = ApiClient::new(&server.base_url, Arc::new(SessionStore::in_memory()));
    let auth = AuthStore::new(client, Arc::new(SilentNotifier));

    let err = auth.login(&credentials("wrong-password")).await.unwrap_err();

    assert_eq!(err.message, "Incorrect email or password");
    assert_eq!(auth.state().error.as_deref(), Some("Incorrect email or password"));
    assert!(!auth.state().loading);
    assert!(!auth.is_authenticated());
}
