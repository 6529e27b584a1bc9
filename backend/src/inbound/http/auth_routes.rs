//! Registration and login handlers.
//!
//! ```text
//! POST /auth/register {"username":"alice","password":"secret"}
//! POST /auth/login    {"username":"alice","password":"secret"}
//! ```
//!
//! Both forward to the credential authority; its failures keep their
//! category and message.

use std::fmt;

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use super::error::ErrorBody;
use super::state::HttpState;
use crate::domain::ApiResult;

/// Request body shared by register and login.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct AuthRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

impl fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login response.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = AuthRequest,
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 409, description = "Username already taken", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<AuthRequest>,
) -> ApiResult<HttpResponse> {
    let AuthRequest { username, password } = payload.into_inner();
    state.credentials.register(&username, &password).await?;
    info!(%username, "user registered");
    Ok(HttpResponse::Created().finish())
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Login success", body = TokenResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Invalid username or password", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<AuthRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let AuthRequest { username, password } = payload.into_inner();
    let token = state.credentials.login(&username, &password).await?;
    info!(%username, "user logged in");
    Ok(web::Json(TokenResponse {
        token: token.into_inner(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::domain::ports::{MockCallsCommand, MockCallsQuery, MockCredentialAuthority};
    use crate::domain::{AccessToken, Error, INVALID_LOGIN_MESSAGE};
    use crate::inbound::http::validation::json_config;

    async fn post(
        authority: MockCredentialAuthority,
        uri: &str,
        body: test::TestRequest,
    ) -> (StatusCode, Value) {
        let state = web::Data::new(HttpState::new(
            Arc::new(authority),
            Arc::new(MockCallsCommand::new()),
            Arc::new(MockCallsQuery::new()),
        ));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .app_data(json_config())
                .service(web::scope("/auth").service(register).service(login)),
        )
        .await;
        let res = test::call_service(&app, body.uri(uri).to_request()).await;
        let status = res.status();
        let bytes = test::read_body(res).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn alice() -> test::TestRequest {
        test::TestRequest::post().set_json(json!({"username": "alice", "password": "secret"}))
    }

    #[actix_web::test]
    async fn register_returns_created_with_empty_body() {
        let mut authority = MockCredentialAuthority::new();
        authority
            .expect_register()
            .withf(|u, p| u == "alice" && p == "secret")
            .times(1)
            .returning(|_, _| Ok(()));

        let (status, body) = post(authority, "/auth/register", alice()).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, Value::Null);
    }

    #[actix_web::test]
    async fn login_returns_token() {
        let mut authority = MockCredentialAuthority::new();
        authority
            .expect_login()
            .returning(|_, _| Ok(AccessToken::new("header.payload.sig")));

        let (status, body) = post(authority, "/auth/login", alice()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"token": "header.payload.sig"}));
    }

    #[rstest]
    #[case(Error::conflict("user already exists"), StatusCode::CONFLICT, "user already exists")]
    #[case(
        Error::invalid_request("username and password must be provided"),
        StatusCode::BAD_REQUEST,
        "username and password must be provided"
    )]
    #[case(Error::internal("user store unavailable"), StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")]
    #[actix_web::test]
    async fn register_failures_keep_their_category(
        #[case] failure: Error,
        #[case] status: StatusCode,
        #[case] message: &str,
    ) {
        let mut authority = MockCredentialAuthority::new();
        authority
            .expect_register()
            .return_once(move |_, _| Err(failure));

        let (actual, body) = post(authority, "/auth/register", alice()).await;

        assert_eq!(actual, status);
        assert_eq!(body, json!({"error": message}));
    }

    #[actix_web::test]
    async fn login_rejection_is_unauthorized() {
        let mut authority = MockCredentialAuthority::new();
        authority
            .expect_login()
            .returning(|_, _| Err(Error::unauthorized(INVALID_LOGIN_MESSAGE)));

        let (status, body) = post(authority, "/auth/login", alice()).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"error": INVALID_LOGIN_MESSAGE}));
    }

    #[rstest]
    #[case("/auth/register")]
    #[case("/auth/login")]
    #[actix_web::test]
    async fn malformed_json_is_invalid_request_format(#[case] uri: &str) {
        let mut authority = MockCredentialAuthority::new();
        authority.expect_register().times(0);
        authority.expect_login().times(0);

        let (status, body) = post(
            authority,
            uri,
            test::TestRequest::post()
                .insert_header(("content-type", "application/json"))
                .set_payload("{\"username\": 7"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid request format"}));
    }
}
