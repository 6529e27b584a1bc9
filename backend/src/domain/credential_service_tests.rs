//! Tests for the credential service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    MockPasswordHasher, MockTokenIssuer, MockUserRepository, TokenSigningError,
};
use crate::domain::{ErrorCode, User, UserId, Username};

type Service = CredentialService<MockUserRepository, MockPasswordHasher, MockTokenIssuer>;

fn service(
    users: MockUserRepository,
    hasher: MockPasswordHasher,
    issuer: MockTokenIssuer,
) -> Service {
    CredentialService::new(Arc::new(users), Arc::new(hasher), Arc::new(issuer))
}

fn stored_user(id: i64, username: &str) -> User {
    User::new(
        UserId::new(id).expect("valid id"),
        Username::new(username).expect("valid username"),
        PasswordHash::new("$2b$12$stored"),
    )
}

#[rstest]
#[case("", "secret")]
#[case("alice", "   ")]
#[case(&"a".repeat(33), "secret")]
#[case("alice", &"p".repeat(73))]
#[tokio::test]
async fn register_rejects_invalid_input_before_hashing(
    #[case] username: &str,
    #[case] password: &str,
) {
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().times(0);
    let mut users = MockUserRepository::new();
    users.expect_insert().times(0);

    let err = service(users, hasher, MockTokenIssuer::new())
        .register(username, password)
        .await
        .expect_err("invalid input");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn register_hashes_trimmed_password_then_persists() {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .withf(|password| password == "secret123")
        .times(1)
        .returning(|_| Ok(PasswordHash::new("$2b$12$digest")));
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .withf(|user| {
            user.username.as_ref() == "alice" && user.password_hash.as_ref() == "$2b$12$digest"
        })
        .times(1)
        .returning(|_| Ok(UserId::new(1).expect("valid id")));

    service(users, hasher, MockTokenIssuer::new())
        .register("  alice ", " secret123 ")
        .await
        .expect("registration succeeds");
}

#[tokio::test]
async fn register_maps_duplicate_to_conflict() {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|_| Ok(PasswordHash::new("$2b$12$digest")));
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .returning(|_| Err(UserRepositoryError::duplicate_username("alice")));

    let err = service(users, hasher, MockTokenIssuer::new())
        .register("alice", "secret")
        .await
        .expect_err("duplicate");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "user already exists");
}

#[rstest]
#[case(UserRepositoryError::connection("refused"))]
#[case(UserRepositoryError::query("syntax"))]
#[tokio::test]
async fn register_maps_store_failures_to_internal(#[case] failure: UserRepositoryError) {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|_| Ok(PasswordHash::new("$2b$12$digest")));
    let mut users = MockUserRepository::new();
    users.expect_insert().return_once(move |_| Err(failure));

    let err = service(users, hasher, MockTokenIssuer::new())
        .register("alice", "secret")
        .await
        .expect_err("store failure");

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert!(!err.message().contains("refused"));
}

#[tokio::test]
async fn register_maps_hash_failure_to_internal_without_persisting() {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|_| Err(PasswordHashError::hashing("rng unavailable")));
    let mut users = MockUserRepository::new();
    users.expect_insert().times(0);

    let err = service(users, hasher, MockTokenIssuer::new())
        .register("alice", "secret")
        .await
        .expect_err("hash failure");

    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn login_issues_token_for_matching_password() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_username()
        .returning(|_| Ok(Some(stored_user(42, "alice"))));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().returning(|_, _| true);
    let mut issuer = MockTokenIssuer::new();
    issuer
        .expect_issue()
        .with(eq(UserId::new(42).expect("valid id")))
        .times(1)
        .returning(|_| Ok(AccessToken::new("signed.token.value")));

    let token = service(users, hasher, issuer)
        .login("alice", "secret")
        .await
        .expect("login succeeds");

    assert_eq!(token.as_ref(), "signed.token.value");
}

#[tokio::test]
async fn unknown_user_and_wrong_password_are_indistinguishable() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_username()
        .returning(|name| match name.as_ref() {
            "alice" => Ok(Some(stored_user(1, "alice"))),
            _ => Ok(None),
        });
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .returning(|_| Ok(PasswordHash::new("$2b$12$dummy")));
    // One verification per login attempt, known or not.
    hasher.expect_verify().times(2).returning(|_, _| false);
    let mut issuer = MockTokenIssuer::new();
    issuer.expect_issue().times(0);

    let svc = service(users, hasher, issuer);
    let wrong_password = svc.login("alice", "nope").await.expect_err("rejected");
    let unknown_user = svc.login("mallory", "nope").await.expect_err("rejected");

    assert_eq!(wrong_password, unknown_user);
    assert_eq!(wrong_password.code(), ErrorCode::Unauthorized);
    assert_eq!(wrong_password.message(), INVALID_LOGIN_MESSAGE);
}

#[tokio::test]
async fn dummy_digest_is_computed_once() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_username().returning(|_| Ok(None));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .returning(|_| Ok(PasswordHash::new("$2b$12$dummy")));
    hasher.expect_verify().times(3).returning(|_, _| false);

    let svc = service(users, hasher, MockTokenIssuer::new());
    for _ in 0..3 {
        let _ = svc.login("ghost", "pw").await.expect_err("rejected");
    }
}

#[tokio::test]
async fn login_maps_signing_failure_to_internal() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_username()
        .returning(|_| Ok(Some(stored_user(7, "alice"))));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().returning(|_, _| true);
    let mut issuer = MockTokenIssuer::new();
    issuer
        .expect_issue()
        .returning(|_| Err(TokenSigningError::signing("bad key")));

    let err = service(users, hasher, issuer)
        .login("alice", "secret")
        .await
        .expect_err("signing failure");

    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn login_maps_store_failure_to_internal() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_username()
        .returning(|_| Err(UserRepositoryError::connection("down")));

    let err = service(users, MockPasswordHasher::new(), MockTokenIssuer::new())
        .login("alice", "secret")
        .await
        .expect_err("store failure");

    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn login_validates_input_before_lookup() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_username().times(0);

    let err = service(users, MockPasswordHasher::new(), MockTokenIssuer::new())
        .login(" ", "secret")
        .await
        .expect_err("blank username");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}
