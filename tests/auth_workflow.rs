mod common;

use common::setup_test_app;
use logcentral::auth::user::NewUser;
use logcentral::auth::validation::RegisterUserRequest;
use logcentral::auth::{PasswordHasher, Role, TokenService};
use logcentral::errors::Error;
use logcentral::storage::{SqlxUserRepository, UserRepository};
use mockable::Clock;
use tracing_test::traced_test;

fn registration(email: &str) -> RegisterUserRequest {
    RegisterUserRequest {
        name: "Ana".to_string(),
        email: email.to_string(),
        password: "s3cret".to_string(),
    }
}

#[tokio::test]
async fn login_success_returns_token_and_ttl() {
    let app = setup_test_app().await;
    let user = app.seed_user("Ana", "a@x.com", "pw", Role::Developer).await;

    let response = app.state.login_service.authenticate("a@x.com", "pw").await;

    assert_eq!(response.code(), 200);
    let login = response.into_data().expect("login payload");
    assert_eq!(login.expires_in, 900);
    assert_eq!(login.user.id, user.id);
    assert_eq!(login.user.role, Role::Developer);

    let identity = app.state.tokens.validate(&login.token).expect("token validates");
    assert_eq!(identity.subject_id, user.id);
    assert_eq!(identity.email, "a@x.com");
}

#[tokio::test]
#[traced_test]
async fn login_wrong_password_is_forbidden() {
    let app = setup_test_app().await;
    app.seed_user("Ana", "a@x.com", "pw", Role::Developer).await;

    let response = app.state.login_service.authenticate("a@x.com", "wrong").await;

    assert_eq!(response.code(), 403);
    assert!(response.data().is_none());
    assert!(logs_contain("login attempt with incorrect password"));
}

#[tokio::test]
async fn login_unknown_email_is_not_found() {
    let app = setup_test_app().await;

    let response = app.state.login_service.authenticate("ghost@x.com", "pw").await;

    assert_eq!(response.code(), 404);
    assert!(response.data().is_none());
}

#[tokio::test]
async fn login_matches_email_case_insensitively() {
    let app = setup_test_app().await;
    app.seed_user("Ana", "Ana@Example.com", "pw", Role::Developer).await;

    let response = app.state.login_service.authenticate("  ANA@example.COM ", "pw").await;

    assert_eq!(response.code(), 200);
    assert_eq!(response.into_data().expect("login payload").user.email, "ana@example.com");
}

#[tokio::test]
async fn register_creates_developer() {
    let app = setup_test_app().await;

    let response = app.state.login_service.register(registration("new@x.com")).await;

    assert_eq!(response.code(), 200);
    let user = response.into_data().expect("created user");
    assert_eq!(user.role, Role::Developer);

    let login = app.state.login_service.authenticate("new@x.com", "s3cret").await;
    assert_eq!(login.code(), 200);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = setup_test_app().await;

    assert_eq!(app.state.login_service.register(registration("dup@x.com")).await.code(), 200);
    let second = app.state.login_service.register(registration("DUP@x.com")).await;

    assert_eq!(second.code(), 409);
    assert_eq!(second.message(), Some("email already in use"));
}

#[tokio::test]
async fn concurrent_registration_with_one_email_conflicts_once() {
    let app = setup_test_app().await;
    let login = &app.state.login_service;

    let (first, second) = tokio::join!(
        login.register(registration("race@x.com")),
        login.register(registration("race@x.com")),
    );

    let mut codes = [first.code(), second.code()];
    codes.sort_unstable();
    assert_eq!(codes, [200, 409]);
    let loser = if first.code() == 409 { &first } else { &second };
    assert_eq!(loser.message(), Some("email already in use"));
}

#[tokio::test]
async fn storage_rejects_duplicate_email_as_conflict() {
    let app = setup_test_app().await;
    let repository = SqlxUserRepository::new(app.pool.clone());
    let hasher = PasswordHasher::default();
    let account = |email: &str| NewUser {
        name: "Ana".to_string(),
        email: email.to_string(),
        credential: hasher.hash("s3cret").unwrap(),
        role: Role::Developer,
        created_at: app.clock.utc(),
    };

    repository.create_user(account("twice@x.com")).await.unwrap();
    let again = repository.create_user(account("TWICE@x.com")).await;

    assert!(matches!(again, Err(Error::Conflict(_))), "got {again:?}");
}

#[tokio::test]
async fn issued_token_expires_with_the_clock() {
    let app = setup_test_app().await;
    app.seed_user("Ana", "a@x.com", "pw", Role::Developer).await;

    let login = app.state.login_service.authenticate("a@x.com", "pw").await;
    let token = login.into_data().expect("login payload").token;

    app.clock.advance(900);
    assert!(app.state.tokens.validate(&token).is_ok());

    app.clock.advance(1);
    assert!(app.state.tokens.validate(&token).is_err());
}

#[tokio::test]
async fn token_from_another_secret_is_rejected() {
    let app = setup_test_app().await;
    let user = app.seed_user("Ana", "a@x.com", "pw", Role::Developer).await;

    let foreign = TokenService::new(b"some-other-secret-0123456789abcdefgh", 900, app.clock.clone())
        .expect("token service");
    let token = foreign.issue(&common::identity_of(&user)).expect("issue");

    assert!(app.state.tokens.validate(&token).is_err());
}
