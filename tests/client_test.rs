mod support;

use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use expense_desk::storage::DARK_MODE_KEY;
use expense_desk::views::{MY_EXPENSES_PAGE_SIZE, MY_EXPENSES_SORTS};
use expense_desk::{
    ApiClient, ClientError, Config, ExpenseFilters, ExpenseStatus, LocalStore, Pager, Session,
    UserRole,
};
use support::{expense_json, page_json, test_user, FakeBackend};

#[test]
fn test_bearer_token_attached_when_logged_in() {
    let backend = FakeBackend::start();
    backend.respond("GET", "/api/analytics/categories", 200, json!([]));

    let session = backend.logged_in_session(&test_user(UserRole::Employee));
    session.client().categories().unwrap();

    let request = backend.last_request();
    assert_eq!(request.authorization.as_deref(), Some("Bearer test-token"));
}

#[test]
fn test_no_authorization_header_without_token() {
    let backend = FakeBackend::start();
    backend.respond("GET", "/api/analytics/categories", 200, json!([]));

    let session = backend.session();
    session.client().categories().unwrap();

    assert!(backend.last_request().authorization.is_none());
}

#[test]
fn test_unauthorized_clears_session_but_keeps_theme() {
    let backend = FakeBackend::start();
    backend.respond("GET", "/api/budgets/status", 401, json!({ "message": "expired" }));

    let session = backend.logged_in_session(&test_user(UserRole::Manager));
    session.store().set(DARK_MODE_KEY, "true").unwrap();

    let err = session.client().budget_status().unwrap_err();
    assert!(err.is_unauthorized());
    assert!(matches!(
        &err,
        ClientError::Unauthorized { message: Some(m) } if m == "expired"
    ));
    assert_eq!(err.user_message(), "Session expired. Please log in again.");

    assert!(session.store().token().unwrap().is_none());
    assert!(session.store().user().unwrap().is_none());
    assert_eq!(session.store().get(DARK_MODE_KEY).unwrap().as_deref(), Some("true"));
}

#[test]
fn test_error_message_extraction() {
    let backend = FakeBackend::start();
    let session = backend.session();
    let id = Uuid::new_v4();

    backend.respond("POST", &format!("/api/expenses/{}/submit", id), 400, json!({
        "error": "Receipt required",
        "message": "ignored",
    }));
    let err = session.client().submit_expense(id).unwrap_err();
    assert_eq!(err.user_message(), "Receipt required");

    backend.respond("POST", &format!("/api/expenses/{}/submit", id), 400, json!({
        "errors": ["Title is required", "Amount must be positive"],
    }));
    let err = session.client().submit_expense(id).unwrap_err();
    assert_eq!(err.user_message(), "Title is required, Amount must be positive");

    backend.respond("POST", &format!("/api/expenses/{}/submit", id), 500, json!({}));
    let err = session.client().submit_expense(id).unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 500, .. }));
    assert_eq!(err.user_message(), "Request failed with status code 500");
}

#[test]
fn test_network_failure_reports_transport_message() {
    let config = Config::default().with_api_url("http://127.0.0.1:9");
    let store = Arc::new(LocalStore::open_in_memory().unwrap());
    let session = Session::new(ApiClient::new(&config, store).unwrap());

    let err = session.client().categories().unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
    assert!(!err.user_message().is_empty());
}

#[test]
fn test_my_expenses_sends_filters_as_query() {
    let backend = FakeBackend::start();
    let id = Uuid::new_v4();
    backend.respond(
        "GET",
        "/api/expenses",
        200,
        page_json(vec![expense_json(id, "Hotel", 240.0, "Submitted")], 25, 2, 12),
    );

    let filters = ExpenseFilters {
        search: "hotel stay".to_string(),
        status: Some(ExpenseStatus::Submitted),
        min_amount: "100".to_string(),
        ..Default::default()
    };
    let mut pager = Pager::new(MY_EXPENSES_PAGE_SIZE);
    pager.page = 2;

    let session = backend.session();
    let page = session
        .client()
        .my_expenses(&filters.to_query(MY_EXPENSES_SORTS[2], &pager))
        .unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, id);
    assert_eq!(page.items[0].status, ExpenseStatus::Submitted);
    assert_eq!(page.total_pages(), 3);

    let request = backend.last_request();
    assert_eq!(
        request.query.as_deref(),
        Some("search=hotel%20stay&status=1&minAmount=100&sortBy=amount&sortDir=desc&page=2&pageSize=12")
    );
}

#[test]
fn test_malformed_body_is_a_decode_error() {
    let backend = FakeBackend::start();
    backend.respond("GET", "/api/budgets/status", 200, json!({ "unexpected": true }));

    let err = backend.session().client().budget_status().unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}

#[test]
fn test_validation_happens_before_any_request() {
    let backend = FakeBackend::start();
    let session = backend.session();
    let id = Uuid::new_v4();

    assert!(session.client().reject_expense(id, "   ").is_err());
    assert!(session.client().add_comment(id, "").is_err());
    assert!(session.client().bulk_approve(&[]).is_err());
    assert!(backend.requests().is_empty());
}
