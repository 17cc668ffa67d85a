mod common;

use std::time::Duration;

use blog_api::auth::{AccountService, TokenService};
use blog_api::db::{BlogDb, DbConfig};
use blog_api::error::AppError;
use testcontainers::clients::Cli;

// Macro to set up test environment
// Note: This keeps _docker and _container alive for the duration of the test
macro_rules! setup_test {
    ($docker:ident, $container:ident, $accounts:ident) => {
        let $docker = Cli::default();
        let $container = $docker.run(common::create_postgres_container());

        tokio::time::sleep(tokio::time::Duration::from_secs(3)).await;

        let host_port = $container.get_host_port_ipv4(common::POSTGRES_PORT);
        let connection_string = common::build_connection_string("127.0.0.1", host_port);
        let config = DbConfig::from_connection_string(&connection_string).unwrap();
        let db = BlogDb::new(config).await.unwrap();
        db.initialize_schema().await.unwrap();

        let tokens = TokenService::new(common::TEST_SECRET, Duration::from_secs(3600)).unwrap();
        let $accounts = AccountService::new(db, tokens);
        $accounts.seed_admin("admin", "admin123").await.unwrap();
    };
}

#[tokio::test]
async fn test_login_issues_token_for_user() {
    setup_test!(_docker, _container, accounts);

    let session = accounts.login("admin", "admin123").await.unwrap();

    assert_eq!(session.user.username, "admin");
    assert_eq!(session.user.role, "admin");
    let subject = accounts.tokens().resolve_token(&session.token).unwrap();
    assert_eq!(subject, "admin");
}

#[tokio::test]
async fn test_wrong_password_and_unknown_user_fail_identically() {
    setup_test!(_docker, _container, accounts);

    let wrong_password = accounts.login("admin", "nope").await.unwrap_err();
    let unknown_user = accounts.login("ghost", "admin123").await.unwrap_err();

    assert!(matches!(wrong_password, AppError::Unauthenticated));
    assert!(matches!(unknown_user, AppError::Unauthenticated));
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    setup_test!(_docker, _container, accounts);

    assert!(!accounts.seed_admin("admin", "different").await.unwrap());
    // The original password still works
    tokio_test::assert_ok!(accounts.login("admin", "admin123").await);
}

#[tokio::test]
async fn test_verify_returns_profile_or_not_found() {
    setup_test!(_docker, _container, accounts);

    let profile = accounts.verify("admin").await.unwrap();
    assert_eq!(profile.username, "admin");

    let err = accounts.verify("ghost").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_change_password() {
    setup_test!(_docker, _container, accounts);

    let err = accounts
        .change_password("admin", "wrong", "new-password")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthenticated));

    accounts
        .change_password("admin", "admin123", "new-password")
        .await
        .unwrap();

    assert!(accounts.login("admin", "admin123").await.is_err());
    tokio_test::assert_ok!(accounts.login("admin", "new-password").await);
}
