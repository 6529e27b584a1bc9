//! Handler tests for the call routes, run behind the real bearer middleware.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test};
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    MockCallsCommand, MockCallsQuery, MockCredentialAuthority, MockTokenVerifier,
};
use crate::domain::{CallId, Error, PhoneNumber, UserId};
use crate::inbound::http::auth::BearerAuth;
use crate::inbound::http::validation::json_config;

const TOKEN: &str = "Bearer owner-7";

fn owner() -> UserId {
    UserId::new(7).expect("valid owner")
}

fn sample_call(id: i64) -> Call {
    Call {
        id: CallId::new(id).expect("valid id"),
        owner: owner(),
        client_name: "Acme Ltd".to_owned(),
        phone_number: PhoneNumber::new("+71234567890").expect("valid phone"),
        description: "Printer jammed".to_owned(),
        status: CallStatus::Open,
        created_at: Utc
            .with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
            .single()
            .expect("valid timestamp"),
    }
}

#[fixture]
fn verifier() -> MockTokenVerifier {
    let mut verifier = MockTokenVerifier::new();
    verifier.expect_verify().returning(|_| Ok(owner()));
    verifier
}

struct Response {
    status: StatusCode,
    location: Option<String>,
    body: Value,
}

async fn send(
    verifier: MockTokenVerifier,
    command: MockCallsCommand,
    query: MockCallsQuery,
    req: test::TestRequest,
) -> Response {
    let state = web::Data::new(HttpState::new(
        Arc::new(MockCredentialAuthority::new()),
        Arc::new(command),
        Arc::new(query),
    ));
    let app = test::init_service(
        App::new().app_data(state).app_data(json_config()).service(
            web::scope("/calls")
                .wrap(BearerAuth::new(Arc::new(verifier)))
                .configure(configure),
        ),
    )
    .await;
    let res = test::call_service(&app, req.to_request()).await;
    let status = res.status();
    let location = res
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = test::read_body(res).await;
    Response {
        status,
        location,
        body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
    }
}

#[rstest]
#[actix_web::test]
async fn create_returns_location_of_new_call(verifier: MockTokenVerifier) {
    let mut command = MockCallsCommand::new();
    command
        .expect_create()
        .withf(|owner_id, request| {
            *owner_id == owner()
                && request.client_name == "Acme Ltd"
                && request.phone_number == "+71234567890"
        })
        .times(1)
        .returning(|_, _| Ok(CallId::new(12).expect("valid id")));

    let res = send(
        verifier,
        command,
        MockCallsQuery::new(),
        test::TestRequest::post()
            .uri("/calls")
            .insert_header(("Authorization", TOKEN))
            .set_json(json!({
                "client_name": "Acme Ltd",
                "phone_number": "+71234567890",
                "description": "Printer jammed"
            })),
    )
    .await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.location.as_deref(), Some("/calls/12"));
    assert_eq!(res.body, Value::Null);
}

#[rstest]
#[actix_web::test]
async fn create_surfaces_validation_errors(verifier: MockTokenVerifier) {
    let mut command = MockCallsCommand::new();
    command
        .expect_create()
        .returning(|_, _| Err(Error::invalid_request("invalid phone number format")));

    let res = send(
        verifier,
        command,
        MockCallsQuery::new(),
        test::TestRequest::post()
            .uri("/calls")
            .insert_header(("Authorization", TOKEN))
            .set_json(json!({
                "client_name": "Acme Ltd",
                "phone_number": "12345",
                "description": "Printer jammed"
            })),
    )
    .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, json!({"error": "invalid phone number format"}));
}

#[rstest]
#[actix_web::test]
async fn create_rejects_incomplete_body(verifier: MockTokenVerifier) {
    let mut command = MockCallsCommand::new();
    command.expect_create().times(0);

    let res = send(
        verifier,
        command,
        MockCallsQuery::new(),
        test::TestRequest::post()
            .uri("/calls")
            .insert_header(("Authorization", TOKEN))
            .set_json(json!({"client_name": "Acme Ltd"})),
    )
    .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, json!({"error": "Invalid request format"}));
}

#[rstest]
#[actix_web::test]
async fn list_serialises_snake_case_calls(verifier: MockTokenVerifier) {
    let mut query = MockCallsQuery::new();
    query
        .expect_list()
        .withf(|owner_id| *owner_id == owner())
        .returning(|_| Ok(vec![sample_call(2), sample_call(1)]));

    let res = send(
        verifier,
        MockCallsCommand::new(),
        query,
        test::TestRequest::get()
            .uri("/calls")
            .insert_header(("Authorization", TOKEN)),
    )
    .await;

    assert_eq!(res.status, StatusCode::OK);
    let calls = res.body.as_array().expect("array body");
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0],
        json!({
            "id": 2,
            "client_name": "Acme Ltd",
            "phone_number": "+71234567890",
            "description": "Printer jammed",
            "status": "открыта",
            "created_at": "2024-05-01T09:30:00Z"
        })
    );
}

#[rstest]
#[actix_web::test]
async fn list_of_nothing_is_an_empty_array(verifier: MockTokenVerifier) {
    let mut query = MockCallsQuery::new();
    query.expect_list().returning(|_| Ok(Vec::new()));

    let res = send(
        verifier,
        MockCallsCommand::new(),
        query,
        test::TestRequest::get()
            .uri("/calls")
            .insert_header(("Authorization", TOKEN)),
    )
    .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!([]));
}

#[rstest]
#[actix_web::test]
async fn get_missing_call_is_not_found(verifier: MockTokenVerifier) {
    let mut query = MockCallsQuery::new();
    query
        .expect_get()
        .withf(|id, owner_id| id.get() == 99 && *owner_id == owner())
        .returning(|_, _| Err(Error::not_found("call not found")));

    let res = send(
        verifier,
        MockCallsCommand::new(),
        query,
        test::TestRequest::get()
            .uri("/calls/99")
            .insert_header(("Authorization", TOKEN)),
    )
    .await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body, json!({"error": "call not found"}));
}

#[rstest]
#[case(test::TestRequest::get().uri("/calls/abc"))]
#[case(test::TestRequest::delete().uri("/calls/abc"))]
#[case(test::TestRequest::patch().uri("/calls/abc/status").set_json(json!({"status": "закрыта"})))]
#[actix_web::test]
async fn non_numeric_ids_are_bad_requests(
    verifier: MockTokenVerifier,
    #[case] req: test::TestRequest,
) {
    let mut command = MockCallsCommand::new();
    command.expect_update_status().times(0);
    command.expect_delete().times(0);
    let mut query = MockCallsQuery::new();
    query.expect_get().times(0);

    let res = send(
        verifier,
        command,
        query,
        req.insert_header(("Authorization", TOKEN)),
    )
    .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, json!({"error": "Invalid call ID"}));
}

#[rstest]
#[actix_web::test]
async fn update_status_returns_no_content(verifier: MockTokenVerifier) {
    let mut command = MockCallsCommand::new();
    command
        .expect_update_status()
        .withf(|id, owner_id, status| id.get() == 5 && *owner_id == owner() && status == "закрыта")
        .times(1)
        .returning(|_, _, _| Ok(()));

    let res = send(
        verifier,
        command,
        MockCallsQuery::new(),
        test::TestRequest::patch()
            .uri("/calls/5/status")
            .insert_header(("Authorization", TOKEN))
            .set_json(json!({"status": "закрыта"})),
    )
    .await;

    assert_eq!(res.status, StatusCode::NO_CONTENT);
}

#[rstest]
#[actix_web::test]
async fn delete_of_foreign_call_is_not_found(verifier: MockTokenVerifier) {
    let mut command = MockCallsCommand::new();
    command
        .expect_delete()
        .returning(|_, _| Err(Error::not_found("call not found")));

    let res = send(
        verifier,
        command,
        MockCallsQuery::new(),
        test::TestRequest::delete()
            .uri("/calls/3")
            .insert_header(("Authorization", TOKEN)),
    )
    .await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn handlers_are_not_reached_without_a_token() {
    let mut verifier = MockTokenVerifier::new();
    verifier.expect_verify().times(0);
    let mut query = MockCallsQuery::new();
    query.expect_list().times(0);

    let res = send(
        verifier,
        MockCallsCommand::new(),
        query,
        test::TestRequest::get().uri("/calls"),
    )
    .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body, json!({"error": "Authorization header is missing"}));
}
