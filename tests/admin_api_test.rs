//! End-to-end tests for the admin resource surface.

use std::sync::Arc;

use axum::Router;
use chrono::DateTime;
use serde_json::{json, Value};

use ledgerline::auth::{PasswordConfig, PasswordHasher, Role, Session, StaticSessionProvider};
use ledgerline::testing::{self, fake, TestDb};
use ledgerline::{app, AppState};

const ADMIN_TOKEN: &str = "test-admin-token";
const MEMBER_TOKEN: &str = "test-member-token";

async fn test_app() -> Router {
    let db = TestDb::new().await.expect("test database");
    let sessions = StaticSessionProvider::new()
        .with_token(ADMIN_TOKEN, Session::new("usr_admin", Role::Admin))
        .with_token(MEMBER_TOKEN, Session::new("usr_member", Role::User));
    let state = AppState::new(
        db.connection(),
        Arc::new(sessions),
        PasswordHasher::new(PasswordConfig::fast()),
    );
    app::router(state)
}

async fn create_user(app: &Router, email: &str) -> Value {
    testing::post(app.clone(), "/api/admin/users")
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({
            "email": email,
            "password": "a-long-enough-password",
            "name": "Test User",
            "role": "USER",
        }))
        .execute()
        .await
        .assert_ok()
        .json()
        .await
}

async fn create_organization(app: &Router, owner_id: &str, slug: &str) -> Value {
    testing::post(app.clone(), "/api/admin/organizations")
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({
            "name": "Acme",
            "slug": slug,
            "ownerId": owner_id,
        }))
        .execute()
        .await
        .assert_ok()
        .json()
        .await
}

// ============ Authorization gate ============

#[tokio::test]
async fn every_collection_rejects_missing_token() {
    let app = test_app().await;

    for resource in [
        "organizations",
        "users",
        "plans",
        "subscriptions",
        "customers",
        "revenue-events",
        "invoices",
        "integrations",
        "api-keys",
        "team-members",
        "usage-metrics",
        "stats",
    ] {
        let body: Value = testing::get(app.clone(), &format!("/api/admin/{}", resource))
            .execute()
            .await
            .assert_unauthorized()
            .json()
            .await;

        // Error body only, never data.
        assert!(body.get("error").is_some(), "{} leaked data", resource);
        assert!(!body.is_array());
    }
}

#[tokio::test]
async fn non_admin_session_is_forbidden() {
    let app = test_app().await;

    testing::get(app.clone(), "/api/admin/organizations")
        .bearer_token(MEMBER_TOKEN)
        .execute()
        .await
        .assert_forbidden();

    testing::post(app, "/api/admin/plans")
        .bearer_token(MEMBER_TOKEN)
        .json_body(&json!({"name": "Sneaky", "type": "TEAM", "price": 1.0}))
        .execute()
        .await
        .assert_forbidden();
}

#[tokio::test]
async fn unknown_token_is_unauthorized() {
    let app = test_app().await;

    testing::get(app, "/api/admin/invoices")
        .bearer_token("who-is-this")
        .execute()
        .await
        .assert_unauthorized();
}

// ============ Organizations ============

#[tokio::test]
async fn organization_create_attaches_owner_and_round_trips() {
    let app = test_app().await;
    let owner = create_user(&app, "owner@acme.test").await;
    let owner_id = owner["id"].as_str().unwrap();

    let created: Value = testing::post(app.clone(), "/api/admin/organizations")
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({"name": "Acme", "slug": "acme", "ownerId": owner_id}))
        .execute()
        .await
        .assert_ok()
        .json()
        .await;

    assert!(created["id"].as_str().is_some());
    assert_eq!(created["name"], "Acme");
    assert_eq!(created["slug"], "acme");
    assert_eq!(created["owner"]["email"], "owner@acme.test");

    let fetched: Value = testing::get(
        app.clone(),
        &format!("/api/admin/organizations/{}", created["id"].as_str().unwrap()),
    )
    .bearer_token(ADMIN_TOKEN)
    .execute()
    .await
    .assert_ok()
    .json()
    .await;

    assert_eq!(fetched["name"], created["name"]);
    assert_eq!(fetched["slug"], created["slug"]);
    assert_eq!(fetched["ownerId"], created["ownerId"]);
    assert_eq!(fetched["owner"]["email"], "owner@acme.test");
}

#[tokio::test]
async fn duplicate_slug_is_a_conflict_and_nothing_changes() {
    let app = test_app().await;
    let owner = create_user(&app, "owner@dup.test").await;
    let owner_id = owner["id"].as_str().unwrap();

    create_organization(&app, owner_id, "acme").await;

    testing::post(app.clone(), "/api/admin/organizations")
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({"name": "Acme", "slug": "acme", "ownerId": owner_id}))
        .execute()
        .await
        .assert_conflict();

    let all: Vec<Value> = testing::get(app, "/api/admin/organizations")
        .bearer_token(ADMIN_TOKEN)
        .execute()
        .await
        .assert_ok()
        .json()
        .await;

    let with_slug: Vec<_> = all.iter().filter(|o| o["slug"] == "acme").collect();
    assert_eq!(with_slug.len(), 1);
}

#[tokio::test]
async fn missing_required_fields_are_all_enumerated_and_nothing_persists() {
    let app = test_app().await;

    let body: Value = testing::post(app.clone(), "/api/admin/organizations")
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({}))
        .execute()
        .await
        .assert_bad_request()
        .json()
        .await;

    let field_errors = body["fieldErrors"].as_object().unwrap();
    assert!(field_errors.contains_key("name"));
    assert!(field_errors.contains_key("slug"));
    assert!(field_errors.contains_key("ownerId"));

    let all: Vec<Value> = testing::get(app, "/api/admin/organizations")
        .bearer_token(ADMIN_TOKEN)
        .execute()
        .await
        .assert_ok()
        .json()
        .await;
    assert!(all.is_empty());
}

#[tokio::test]
async fn delete_removes_the_record_and_is_handled_for_missing_ids() {
    let app = test_app().await;
    let owner = create_user(&app, "owner@del.test").await;
    let org = create_organization(&app, owner["id"].as_str().unwrap(), "deleted-co").await;
    let org_id = org["id"].as_str().unwrap();

    let ack: Value = testing::delete(app.clone(), &format!("/api/admin/organizations/{}", org_id))
        .bearer_token(ADMIN_TOKEN)
        .execute()
        .await
        .assert_ok()
        .json()
        .await;
    assert_eq!(ack["ok"], true);

    testing::get(app.clone(), &format!("/api/admin/organizations/{}", org_id))
        .bearer_token(ADMIN_TOKEN)
        .execute()
        .await
        .assert_not_found();

    // A second delete of the same id must not crash the handler.
    testing::delete(app, &format!("/api/admin/organizations/{}", org_id))
        .bearer_token(ADMIN_TOKEN)
        .execute()
        .await
        .assert_not_found();
}

// ============ Users ============

#[tokio::test]
async fn password_hash_is_never_echoed() {
    let app = test_app().await;
    let created = create_user(&app, "hidden@secret.test").await;

    assert!(created.get("passwordHash").is_none());
    assert!(created.get("password_hash").is_none());
    assert_eq!(created["email"], "hidden@secret.test");
    assert_eq!(created["role"], "USER");

    let listed: Vec<Value> = testing::get(app.clone(), "/api/admin/users")
        .bearer_token(ADMIN_TOKEN)
        .execute()
        .await
        .assert_ok()
        .json()
        .await;
    for user in &listed {
        assert!(user.get("passwordHash").is_none());
    }

    let fetched: Value = testing::get(
        app,
        &format!("/api/admin/users/{}", created["id"].as_str().unwrap()),
    )
    .bearer_token(ADMIN_TOKEN)
    .execute()
    .await
    .assert_ok()
    .json()
    .await;
    assert!(fetched.get("passwordHash").is_none());
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let app = test_app().await;
    create_user(&app, "twice@acme.test").await;

    testing::post(app.clone(), "/api/admin/users")
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({
            "email": "twice@acme.test",
            "password": "another-long-password",
            "role": "ADMIN",
        }))
        .execute()
        .await
        .assert_conflict();

    let listed: Vec<Value> = testing::get(app, "/api/admin/users")
        .bearer_token(ADMIN_TOKEN)
        .execute()
        .await
        .assert_ok()
        .json()
        .await;
    let matching: Vec<_> = listed
        .iter()
        .filter(|u| u["email"] == "twice@acme.test")
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0]["role"], "USER");
}

#[tokio::test]
async fn user_update_only_rehashes_when_password_supplied() {
    let app = test_app().await;
    let created = create_user(&app, "rename@acme.test").await;
    let id = created["id"].as_str().unwrap();

    let updated: Value = testing::put(app.clone(), &format!("/api/admin/users/{}", id))
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({"name": "Renamed"}))
        .execute()
        .await
        .assert_ok()
        .json()
        .await;

    assert_eq!(updated["name"], "Renamed");
    assert_eq!(updated["email"], "rename@acme.test");

    let short_password: Value = testing::put(app, &format!("/api/admin/users/{}", id))
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({"password": "short"}))
        .execute()
        .await
        .assert_bad_request()
        .json()
        .await;
    assert!(short_password["fieldErrors"]
        .as_object()
        .unwrap()
        .contains_key("password"));
}

// ============ Plans ============

#[tokio::test]
async fn plan_partial_update_touches_only_the_given_field() {
    let app = test_app().await;

    let created: Value = testing::post(app.clone(), "/api/admin/plans")
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({"name": "Starter", "type": "INDIVIDUAL", "price": 19.0}))
        .execute()
        .await
        .assert_ok()
        .json()
        .await;

    // Defaults applied on create.
    assert_eq!(created["currency"], "USD");
    assert_eq!(created["interval"], "month");

    let id = created["id"].as_str().unwrap();
    let updated: Value = testing::put(app, &format!("/api/admin/plans/{}", id))
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({"price": 49}))
        .execute()
        .await
        .assert_ok()
        .json()
        .await;

    assert_eq!(updated["price"].as_f64().unwrap(), 49.0);
    assert_eq!(updated["name"], "Starter");
    assert_eq!(updated["type"], "INDIVIDUAL");
    assert_eq!(updated["currency"], "USD");
    assert_eq!(updated["interval"], "month");
}

#[tokio::test]
async fn plans_list_is_newest_first() {
    let app = test_app().await;

    for name in ["First", "Second", "Third"] {
        testing::post(app.clone(), "/api/admin/plans")
            .bearer_token(ADMIN_TOKEN)
            .json_body(&json!({"name": name, "type": "TEAM", "price": 10.0}))
            .execute()
            .await
            .assert_ok();
    }

    let listed: Vec<Value> = testing::get(app, "/api/admin/plans")
        .bearer_token(ADMIN_TOKEN)
        .execute()
        .await
        .assert_ok()
        .json()
        .await;

    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0]["name"], "Third");
    assert_eq!(listed[2]["name"], "First");
}

// ============ Subscriptions ============

#[tokio::test]
async fn subscription_round_trips_dates_and_attaches_relations() {
    let app = test_app().await;
    let owner = create_user(&app, "subs@acme.test").await;
    let org = create_organization(&app, owner["id"].as_str().unwrap(), "subs-co").await;

    let plan: Value = testing::post(app.clone(), "/api/admin/plans")
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({"name": "Team", "type": "TEAM", "price": 99.0}))
        .execute()
        .await
        .assert_ok()
        .json()
        .await;

    let created: Value = testing::post(app.clone(), "/api/admin/subscriptions")
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({
            "organizationId": org["id"],
            "planId": plan["id"],
            "currentPeriodStart": "2026-07-01T00:00:00Z",
            "currentPeriodEnd": "2026-08-01T00:00:00Z",
        }))
        .execute()
        .await
        .assert_ok()
        .json()
        .await;

    // Default status applied, relations eagerly attached.
    assert_eq!(created["status"], "active");
    assert_eq!(created["organization"]["slug"], "subs-co");
    assert_eq!(created["plan"]["name"], "Team");

    let start = DateTime::parse_from_rfc3339(created["currentPeriodStart"].as_str().unwrap())
        .unwrap()
        .to_utc();
    assert_eq!(
        start,
        DateTime::parse_from_rfc3339("2026-07-01T00:00:00Z").unwrap()
    );

    let listed: Vec<Value> = testing::get(app.clone(), "/api/admin/subscriptions")
        .bearer_token(ADMIN_TOKEN)
        .execute()
        .await
        .assert_ok()
        .json()
        .await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["organization"]["name"], "Acme");

    let bad_date: Value = testing::post(app, "/api/admin/subscriptions")
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({
            "organizationId": org["id"],
            "planId": plan["id"],
            "currentPeriodStart": "not-a-date",
            "currentPeriodEnd": "2026-08-01T00:00:00Z",
        }))
        .execute()
        .await
        .assert_bad_request()
        .json()
        .await;
    assert!(bad_date["error"].as_str().unwrap().contains("Invalid JSON"));
}

// ============ Invoices ============

#[tokio::test]
async fn invoice_number_uniqueness_is_enforced() {
    let app = test_app().await;
    let owner = create_user(&app, "inv@acme.test").await;
    let org = create_organization(&app, owner["id"].as_str().unwrap(), "inv-co").await;

    let payload = json!({
        "organizationId": org["id"],
        "number": "INV-000042",
        "amount": 1250.0,
    });

    let created: Value = testing::post(app.clone(), "/api/admin/invoices")
        .bearer_token(ADMIN_TOKEN)
        .json_body(&payload)
        .execute()
        .await
        .assert_ok()
        .json()
        .await;

    assert_eq!(created["status"], "draft");
    assert_eq!(created["currency"], "USD");
    assert_eq!(created["organization"]["slug"], "inv-co");
    assert!(created["customer"].is_null());

    testing::post(app.clone(), "/api/admin/invoices")
        .bearer_token(ADMIN_TOKEN)
        .json_body(&payload)
        .execute()
        .await
        .assert_conflict();

    let listed: Vec<Value> = testing::get(app, "/api/admin/invoices")
        .bearer_token(ADMIN_TOKEN)
        .execute()
        .await
        .assert_ok()
        .json()
        .await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["amount"].as_f64().unwrap(), 1250.0);
}

#[tokio::test]
async fn invoice_update_distinguishes_null_from_absent() {
    let app = test_app().await;
    let owner = create_user(&app, "tristate@acme.test").await;
    let org = create_organization(&app, owner["id"].as_str().unwrap(), "tristate-co").await;

    let created: Value = testing::post(app.clone(), "/api/admin/invoices")
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({
            "organizationId": org["id"],
            "number": "INV-000100",
            "amount": 10.0,
            "dueDate": "2026-09-01T00:00:00Z",
        }))
        .execute()
        .await
        .assert_ok()
        .json()
        .await;
    let id = created["id"].as_str().unwrap();
    assert!(created["dueDate"].is_string());

    // Absent dueDate leaves it unchanged.
    let updated: Value = testing::put(app.clone(), &format!("/api/admin/invoices/{}", id))
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({"status": "sent"}))
        .execute()
        .await
        .assert_ok()
        .json()
        .await;
    assert_eq!(updated["status"], "sent");
    assert!(updated["dueDate"].is_string());

    // Explicit null clears it.
    let cleared: Value = testing::put(app, &format!("/api/admin/invoices/{}", id))
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({"dueDate": null}))
        .execute()
        .await
        .assert_ok()
        .json()
        .await;
    assert!(cleared["dueDate"].is_null());
    assert_eq!(cleared["status"], "sent");
}

// ============ API keys ============

#[tokio::test]
async fn api_key_secret_is_returned_exactly_once() {
    let app = test_app().await;
    let owner = create_user(&app, "keys@acme.test").await;
    let org = create_organization(&app, owner["id"].as_str().unwrap(), "keys-co").await;

    let created: Value = testing::post(app.clone(), "/api/admin/api-keys")
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({"organizationId": org["id"], "name": "ci"}))
        .execute()
        .await
        .assert_ok()
        .json()
        .await;

    let raw_key = created["rawKey"].as_str().unwrap();
    assert!(raw_key.starts_with("llk_"));
    assert!(created.get("keyHash").is_none());
    assert!(raw_key.starts_with(
        created["keyPrefix"]
            .as_str()
            .unwrap()
            .trim_end_matches('.')
    ));

    let id = created["id"].as_str().unwrap();

    let listed: Vec<Value> = testing::get(app.clone(), "/api/admin/api-keys")
        .bearer_token(ADMIN_TOKEN)
        .execute()
        .await
        .assert_ok()
        .json()
        .await;
    assert_eq!(listed.len(), 1);
    assert!(listed[0].get("rawKey").is_none());
    assert!(listed[0].get("keyHash").is_none());
    assert_eq!(listed[0]["keyPrefix"], created["keyPrefix"]);
    assert_eq!(listed[0]["organization"]["slug"], "keys-co");

    let fetched: Value = testing::get(app, &format!("/api/admin/api-keys/{}", id))
        .bearer_token(ADMIN_TOKEN)
        .execute()
        .await
        .assert_ok()
        .json()
        .await;
    assert!(fetched.get("rawKey").is_none());
    assert!(fetched.get("keyHash").is_none());
}

#[tokio::test]
async fn api_key_expiry_can_be_set_and_cleared() {
    let app = test_app().await;
    let owner = create_user(&app, "expiry@acme.test").await;
    let org = create_organization(&app, owner["id"].as_str().unwrap(), "expiry-co").await;

    let created: Value = testing::post(app.clone(), "/api/admin/api-keys")
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({
            "organizationId": org["id"],
            "name": "rotating",
            "expiresAt": "2026-12-31T00:00:00Z",
        }))
        .execute()
        .await
        .assert_ok()
        .json()
        .await;
    let id = created["id"].as_str().unwrap();
    assert!(created["expiresAt"].is_string());

    let renamed: Value = testing::put(app.clone(), &format!("/api/admin/api-keys/{}", id))
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({"name": "rotated"}))
        .execute()
        .await
        .assert_ok()
        .json()
        .await;
    assert_eq!(renamed["name"], "rotated");
    assert!(renamed["expiresAt"].is_string());
    assert!(renamed.get("rawKey").is_none());

    let cleared: Value = testing::put(app, &format!("/api/admin/api-keys/{}", id))
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({"expiresAt": null}))
        .execute()
        .await
        .assert_ok()
        .json()
        .await;
    assert!(cleared["expiresAt"].is_null());
}

// ============ Remaining entities ============

#[tokio::test]
async fn customer_round_trip_with_metadata() {
    let app = test_app().await;
    let owner = create_user(&app, "cust@acme.test").await;
    let org = create_organization(&app, owner["id"].as_str().unwrap(), "cust-co").await;

    let created: Value = testing::post(app.clone(), "/api/admin/customers")
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({
            "organizationId": org["id"],
            "email": "buyer@example.com",
            "name": "Buyer",
            "metadata": {"tier": "gold"},
        }))
        .execute()
        .await
        .assert_ok()
        .json()
        .await;

    let fetched: Value = testing::get(
        app,
        &format!("/api/admin/customers/{}", created["id"].as_str().unwrap()),
    )
    .bearer_token(ADMIN_TOKEN)
    .execute()
    .await
    .assert_ok()
    .json()
    .await;

    assert_eq!(fetched["email"], "buyer@example.com");
    assert_eq!(fetched["metadata"]["tier"], "gold");
    assert_eq!(fetched["organization"]["name"], "Acme");
}

#[tokio::test]
async fn revenue_event_supports_negative_amounts() {
    let app = test_app().await;
    let owner = create_user(&app, "rev@acme.test").await;
    let org = create_organization(&app, owner["id"].as_str().unwrap(), "rev-co").await;

    let created: Value = testing::post(app.clone(), "/api/admin/revenue-events")
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({
            "organizationId": org["id"],
            "amount": -25.5,
            "type": "refund",
            "effectiveDate": "2026-07-15T12:00:00Z",
        }))
        .execute()
        .await
        .assert_ok()
        .json()
        .await;

    assert_eq!(created["amount"].as_f64().unwrap(), -25.5);
    assert_eq!(created["type"], "refund");
    assert_eq!(created["currency"], "USD");
    assert!(created["customer"].is_null());

    // Detaching the (absent) customer via explicit null is a no-op, not an error.
    let id = created["id"].as_str().unwrap();
    let updated: Value = testing::put(app, &format!("/api/admin/revenue-events/{}", id))
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({"customerId": null, "description": "chargeback"}))
        .execute()
        .await
        .assert_ok()
        .json()
        .await;
    assert!(updated["customerId"].is_null());
    assert_eq!(updated["description"], "chargeback");
}

#[tokio::test]
async fn team_member_defaults_role_and_attaches_user() {
    let app = test_app().await;
    let owner = create_user(&app, "lead@acme.test").await;
    let org = create_organization(&app, owner["id"].as_str().unwrap(), "team-co").await;

    let created: Value = testing::post(app.clone(), "/api/admin/team-members")
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({"userId": owner["id"], "organizationId": org["id"]}))
        .execute()
        .await
        .assert_ok()
        .json()
        .await;

    assert_eq!(created["role"], "member");
    assert_eq!(created["user"]["email"], "lead@acme.test");
    assert_eq!(created["organization"]["slug"], "team-co");
    // The joined user record must not leak the hash either.
    assert!(created["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn integration_defaults_to_active() {
    let app = test_app().await;
    let owner = create_user(&app, "int@acme.test").await;
    let org = create_organization(&app, owner["id"].as_str().unwrap(), "int-co").await;

    let created: Value = testing::post(app.clone(), "/api/admin/integrations")
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({
            "organizationId": org["id"],
            "type": "STRIPE",
            "name": "prod stripe",
            "config": {"apiKey": "sk_test_123"},
        }))
        .execute()
        .await
        .assert_ok()
        .json()
        .await;

    assert_eq!(created["isActive"], true);
    assert_eq!(created["type"], "STRIPE");

    let id = created["id"].as_str().unwrap();
    let updated: Value = testing::put(app, &format!("/api/admin/integrations/{}", id))
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({"isActive": false}))
        .execute()
        .await
        .assert_ok()
        .json()
        .await;
    assert_eq!(updated["isActive"], false);
    assert_eq!(updated["name"], "prod stripe");
}

#[tokio::test]
async fn usage_metric_round_trip() {
    let app = test_app().await;
    let owner = create_user(&app, "usage@acme.test").await;
    let org = create_organization(&app, owner["id"].as_str().unwrap(), "usage-co").await;

    let created: Value = testing::post(app.clone(), "/api/admin/usage-metrics")
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({
            "organizationId": org["id"],
            "metricType": "api_calls",
            "value": 1234.0,
            "period": "2026-07",
        }))
        .execute()
        .await
        .assert_ok()
        .json()
        .await;

    assert_eq!(created["metricType"], "api_calls");
    assert_eq!(created["value"].as_f64().unwrap(), 1234.0);

    let listed: Vec<Value> = testing::get(app, "/api/admin/usage-metrics")
        .bearer_token(ADMIN_TOKEN)
        .execute()
        .await
        .assert_ok()
        .json()
        .await;
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn stats_reports_counts_per_entity() {
    let app = test_app().await;
    let owner = create_user(&app, "stats@acme.test").await;
    create_organization(&app, owner["id"].as_str().unwrap(), "stats-co").await;

    let stats: Value = testing::get(app, "/api/admin/stats")
        .bearer_token(ADMIN_TOKEN)
        .execute()
        .await
        .assert_ok()
        .json()
        .await;

    assert_eq!(stats["users"], 1);
    assert_eq!(stats["organizations"], 1);
    assert_eq!(stats["customers"], 0);
    assert_eq!(stats["invoices"], 0);
}

#[tokio::test]
async fn organization_children_follow_the_declared_cascade_policy() {
    let app = test_app().await;
    let owner = create_user(&app, "cascade@acme.test").await;
    let owner_id = owner["id"].as_str().unwrap();
    let org = create_organization(&app, owner_id, "cascade-co").await;
    let org_id = org["id"].as_str().unwrap();

    testing::post(app.clone(), "/api/admin/customers")
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({"organizationId": org_id, "email": "c@cascade.test"}))
        .execute()
        .await
        .assert_ok();

    // The owner reference is RESTRICT: the user cannot go while the
    // organization exists.
    testing::delete(app.clone(), &format!("/api/admin/users/{}", owner_id))
        .bearer_token(ADMIN_TOKEN)
        .execute()
        .await
        .assert_conflict();

    // Organization-owned records are CASCADE: they go with the organization.
    testing::delete(app.clone(), &format!("/api/admin/organizations/{}", org_id))
        .bearer_token(ADMIN_TOKEN)
        .execute()
        .await
        .assert_ok();

    let customers: Vec<Value> = testing::get(app.clone(), "/api/admin/customers")
        .bearer_token(ADMIN_TOKEN)
        .execute()
        .await
        .assert_ok()
        .json()
        .await;
    assert!(customers.is_empty());

    // With the organization gone the owner can be deleted.
    testing::delete(app, &format!("/api/admin/users/{}", owner_id))
        .bearer_token(ADMIN_TOKEN)
        .execute()
        .await
        .assert_ok();
}

#[tokio::test]
async fn not_found_is_distinct_from_validation_failure() {
    let app = test_app().await;

    let body: Value = testing::get(app.clone(), &format!("/api/admin/plans/{}", fake::uuid()))
        .bearer_token(ADMIN_TOKEN)
        .execute()
        .await
        .assert_not_found()
        .json()
        .await;
    assert!(body["error"].as_str().unwrap().contains("Not found"));

    testing::put(app, &format!("/api/admin/plans/{}", fake::uuid()))
        .bearer_token(ADMIN_TOKEN)
        .json_body(&json!({"price": 1.0}))
        .execute()
        .await
        .assert_not_found();
}
