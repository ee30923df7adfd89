//! End-to-end flows against a real Postgres.
//!
//! Run with `DATABASE_URL=postgres://... cargo test -- --ignored`; each test
//! gets a fresh database with the crate migrations applied.
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use crate::{
    app::build_app,
    auth::{
        repo::{taken_field, TakenField},
        User,
    },
    integrations::fake::FakeMailer,
    state::AppState,
};

struct TestApp {
    router: Router,
    mailer: Arc<FakeMailer>,
}

impl TestApp {
    fn new(pool: PgPool) -> Self {
        Self::with_mailer(pool, FakeMailer::default())
    }

    fn with_mailer(pool: PgPool, mailer: FakeMailer) -> Self {
        let mailer = Arc::new(mailer);
        let router = build_app(AppState::with_db(pool, mailer.clone()));
        Self { router, mailer }
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => req.body(Body::empty()),
        }
        .unwrap();

        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn register(&self, username: &str, email: &str, password: &str) {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/register",
                None,
                Some(json!({ "username": username, "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
    }

    async fn verify(&self, email: &str) {
        let code = self.mailer.last_code_for(email).expect("otp sent");
        let (status, body) = self
            .send(
                Method::POST,
                "/api/verify-otp",
                None,
                Some(json!({ "email": email, "otp": code })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    /// Registers, verifies and logs in, returning a bearer token.
    async fn sign_up(&self, username: &str) -> String {
        let email = format!("{username}@x.com");
        self.register(username, &email, "pw123").await;
        self.verify(&email).await;
        let (status, body) = self.login(username, "pw123").await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["token"].as_str().unwrap().to_owned()
    }

    async fn create_expense(&self, token: &str, body: Value) -> Value {
        let (status, body) = self
            .send(Method::POST, "/api/expenses", Some(token), Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }
}

#[sqlx::test]
#[ignore]
async fn register_verify_login_and_me(pool: PgPool) {
    let app = TestApp::new(pool);
    let token = app.sign_up("alice").await;

    let (status, body) = app.send(Method::GET, "/api/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "username": "alice", "email": "alice@x.com" }));
}

#[sqlx::test]
#[ignore]
async fn login_before_verification_hints_email(pool: PgPool) {
    let app = TestApp::new(pool);
    app.register("alice", "alice@x.com", "pw123").await;

    let (status, body) = app.login("alice", "pw123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["unverified"], json!(true));
    assert_eq!(body["email"], json!("alice@x.com"));
}

#[sqlx::test]
#[ignore]
async fn duplicate_registration_is_rejected(pool: PgPool) {
    let app = TestApp::new(pool);
    app.register("alice", "alice@x.com", "pw123").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/register",
            None,
            Some(json!({ "username": "alice", "email": "other@x.com", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username or email already exists");
}

#[sqlx::test]
#[ignore]
async fn wrong_otp_is_rejected_and_resend_replaces_code(pool: PgPool) {
    let app = TestApp::new(pool);
    app.register("alice", "alice@x.com", "pw123").await;
    let first = app.mailer.last_code_for("alice@x.com").unwrap();
    let wrong = if first == "000000" { "111111" } else { "000000" };

    let (status, body) = app
        .send(
            Method::POST,
            "/api/verify-otp",
            None,
            Some(json!({ "email": "alice@x.com", "otp": wrong })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Incorrect OTP");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/resend-otp",
            None,
            Some(json!({ "email": "alice@x.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    app.verify("alice@x.com").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/resend-otp",
            None,
            Some(json!({ "email": "alice@x.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User already verified");
}

#[sqlx::test]
#[ignore]
async fn linked_payment_marks_expense_paid_and_borrows_labels(pool: PgPool) {
    let app = TestApp::new(pool);
    let token = app.sign_up("alice").await;

    let expense = app
        .create_expense(
            &token,
            json!({ "date": "2025-01-10", "category": "Food", "amount": 12.5, "description": "Lunch" }),
        )
        .await;
    assert_eq!(expense["paid"], json!(false));
    assert_eq!(expense["payment_status"], json!("Unpaid"));
    let expense_id = expense["id"].as_i64().unwrap();

    let (status, payment) = app
        .send(
            Method::POST,
            "/api/payments",
            Some(&token),
            Some(json!({ "payment_date": "2025-01-11", "amount": 12.5, "expense_id": expense_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{payment}");
    assert_eq!(payment["category"], json!("Food"));
    assert_eq!(payment["description"], json!("Lunch"));

    let (_, expenses) = app.send(Method::GET, "/api/expenses", Some(&token), None).await;
    assert_eq!(expenses[0]["paid"], json!(true));

    // Editing the expense relabels the payment on the next read.
    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/expenses/{expense_id}"),
            Some(&token),
            Some(json!({ "date": "2025-01-10", "category": "Dining", "amount": 12.5, "description": "Lunch out" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, payments) = app.send(Method::GET, "/api/payments", Some(&token), None).await;
    assert_eq!(payments[0]["category"], json!("Dining"));
    assert_eq!(payments[0]["description"], json!("Lunch out"));
    assert_eq!(payments[0]["payment_date"], json!("2025-01-11"));
}

#[sqlx::test]
#[ignore]
async fn payment_outlives_deleted_expense(pool: PgPool) {
    let app = TestApp::new(pool);
    let token = app.sign_up("alice").await;

    let expense = app
        .create_expense(&token, json!({ "category": "Rent", "amount": 900.0, "description": "Jan" }))
        .await;
    let expense_id = expense["id"].as_i64().unwrap();
    let (status, _) = app
        .send(
            Method::POST,
            "/api/payments",
            Some(&token),
            Some(json!({ "amount": 900.0, "expense_id": expense_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send(Method::DELETE, &format!("/api/expenses/{expense_id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Deleted" }));

    let (status, payments) = app.send(Method::GET, "/api/payments", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payments.as_array().unwrap().len(), 1);
    assert_eq!(payments[0]["expense_id"], json!(expense_id));
    assert_eq!(payments[0]["category"], Value::Null);
}

#[sqlx::test]
#[ignore]
async fn cross_user_delete_is_not_found(pool: PgPool) {
    let app = TestApp::new(pool);
    let alice = app.sign_up("alice").await;
    let bob = app.sign_up("bob").await;

    let expense = app
        .create_expense(&alice, json!({ "category": "Food", "amount": 5.0, "description": "Tea" }))
        .await;
    let expense_id = expense["id"].as_i64().unwrap();

    let (status, body) = app
        .send(Method::DELETE, &format!("/api/expenses/{expense_id}"), Some(&bob), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Expense not found");

    let (_, expenses) = app.send(Method::GET, "/api/expenses", Some(&alice), None).await;
    assert_eq!(expenses.as_array().unwrap().len(), 1);
}

#[sqlx::test]
#[ignore]
async fn cross_user_link_leaves_expense_untouched(pool: PgPool) {
    let app = TestApp::new(pool);
    let alice = app.sign_up("alice").await;
    let bob = app.sign_up("bob").await;

    let expense = app
        .create_expense(&alice, json!({ "category": "Food", "amount": 5.0, "description": "Tea" }))
        .await;
    let expense_id = expense["id"].as_i64().unwrap();

    let (status, payment) = app
        .send(
            Method::POST,
            "/api/payments",
            Some(&bob),
            Some(json!({ "amount": 5.0, "expense_id": expense_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(payment["category"], Value::Null);

    let (_, expenses) = app.send(Method::GET, "/api/expenses", Some(&alice), None).await;
    assert_eq!(expenses[0]["paid"], json!(false));

    let (_, payments) = app.send(Method::GET, "/api/payments", Some(&alice), None).await;
    assert_eq!(payments, json!([]));
}

#[sqlx::test]
#[ignore]
async fn budget_and_savings_answer(pool: PgPool) {
    let app = TestApp::new(pool);
    let token = app.sign_up("alice").await;

    let (status, body) = app
        .send(Method::POST, "/api/user/budget", Some(&token), Some(json!({ "budget": 1000.0 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["budget"], json!(1000.0));

    app.create_expense(&token, json!({ "category": "Food", "amount": 250.0, "description": "Groceries" }))
        .await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/chatbot",
            Some(&token),
            Some(json!({ "message": "What are my savings?" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["answer"].as_str().unwrap().contains("₹750.00"), "{body}");
}

#[sqlx::test]
#[ignore]
async fn failed_otp_email_keeps_user_and_code(pool: PgPool) {
    let broken = TestApp::with_mailer(pool.clone(), FakeMailer::failing());
    let (status, body) = broken
        .send(
            Method::POST,
            "/api/register",
            None,
            Some(json!({ "username": "alice", "email": "alice@x.com", "password": "pw123" })),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to send OTP email");

    let stored: Option<String> =
        sqlx::query_scalar("SELECT otp_code FROM users WHERE email = 'alice@x.com'")
            .fetch_one(&pool)
            .await
            .unwrap();
    let stored = stored.expect("code persisted despite failed delivery");
    assert_eq!(stored.len(), 6);

    let app = TestApp::new(pool);
    let (status, _) = app
        .send(
            Method::POST,
            "/api/resend-otp",
            None,
            Some(json!({ "email": "alice@x.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    app.verify("alice@x.com").await;

    let (status, body) = app.login("alice", "pw123").await;
    assert_eq!(status, StatusCode::OK, "{body}");
}

#[sqlx::test]
#[ignore]
async fn editing_linked_payment_keeps_expense_labels(pool: PgPool) {
    let app = TestApp::new(pool.clone());
    let token = app.sign_up("alice").await;

    let expense = app
        .create_expense(&token, json!({ "category": "Food", "amount": 50.0, "description": "Dinner" }))
        .await;
    let expense_id = expense["id"].as_i64().unwrap();
    let (_, payment) = app
        .send(
            Method::POST,
            "/api/payments",
            Some(&token),
            Some(json!({ "amount": 50.0, "expense_id": expense_id })),
        )
        .await;
    let payment_id = payment["id"].as_i64().unwrap();

    let (status, updated) = app
        .send(
            Method::PUT,
            &format!("/api/payments/{payment_id}"),
            Some(&token),
            Some(json!({ "amount": 45.0, "category": "Travel", "description": "Cab" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["amount"], json!(45.0));
    assert_eq!(updated["category"], json!("Food"));
    assert_eq!(updated["description"], json!("Dinner"));

    let (_, payments) = app.send(Method::GET, "/api/payments", Some(&token), None).await;
    assert_eq!(payments[0]["amount"], json!(45.0));
    assert_eq!(payments[0]["category"], json!("Food"));

    // The overwrite landed in the stored columns, shadowed while the link resolves.
    let stored: (Option<String>, Option<String>) =
        sqlx::query_as("SELECT category, description FROM payments WHERE id = $1")
            .bind(payment_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored, (Some("Travel".into()), Some("Cab".into())));

    let (status, _) = app
        .send(Method::PUT, "/api/payments/999999", Some(&token), Some(json!({ "amount": 1.0 })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test]
#[ignore]
async fn profile_update_rejects_taken_identity(pool: PgPool) {
    let app = TestApp::new(pool);
    app.sign_up("alice").await;
    let bob = app.sign_up("bob").await;

    let (status, body) = app
        .send(Method::PUT, "/api/me", Some(&bob), Some(json!({ "username": "alice" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username already taken");

    let (status, body) = app
        .send(Method::PUT, "/api/me", Some(&bob), Some(json!({ "email": "ALICE@x.com" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already taken");

    let (status, body) = app
        .send(Method::PUT, "/api/me", Some(&bob), Some(json!({ "username": "  " })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No fields to update");

    let (status, _) = app
        .send(Method::PUT, "/api/me", Some(&bob), Some(json!({ "username": "robert" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, me) = app.send(Method::GET, "/api/me", Some(&bob), None).await;
    assert_eq!(me, json!({ "username": "robert", "email": "bob@x.com" }));
}

#[sqlx::test]
#[ignore]
async fn unique_violations_name_the_taken_field(pool: PgPool) {
    let expires = time::OffsetDateTime::now_utc();
    User::create(&pool, "alice", "alice@x.com", "hash", "123456", expires)
        .await
        .unwrap();

    let err = User::create(&pool, "alice", "other@x.com", "hash", "123456", expires)
        .await
        .unwrap_err();
    assert_eq!(taken_field(&err), Some(TakenField::Username));

    let err = User::create(&pool, "carol", "alice@x.com", "hash", "123456", expires)
        .await
        .unwrap_err();
    assert_eq!(taken_field(&err), Some(TakenField::Email));

    let other = anyhow::anyhow!("connection reset");
    assert_eq!(taken_field(&other), None);
}
