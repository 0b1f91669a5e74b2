//! Super-admin endpoints: access control, manager payments, account review.

mod common;
use common::*;

use chrono::Utc;

// ============ Access control ============

#[tokio::test]
async fn test_admin_routes_require_token() {
    let app = TestApp::new();

    for uri in [
        "/api/admin/managers",
        "/api/admin/login_requests",
        "/api/admin/active_users",
    ] {
        let (status, json) = app.get(uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(json["success"], false);
    }

    let (status, _) = app
        .post("/api/admin/approve_user", None, json!({"id": 1, "check": true}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .get("/api/admin/managers", Some("not-a-real-token"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_reject_non_superadmin() {
    let app = TestApp::new();
    let (user, _) = app.manager("boss@example.com");
    let token = app.token_for(&user);

    let (status, json) = app.get("/api/admin/managers", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "forbidden");

    let (status, _) = app
        .post("/api/admin/deactivate_user", Some(&token), json!({"id": user.id}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_token_stops_working_once_account_is_deactivated() {
    let app = TestApp::new();
    let (admin, token) = app.superadmin();

    let (status, _) = app.get("/api/admin/managers", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    queries::set_user_status(&app.conn(), admin.id, UserStatus::Deactivated).unwrap();
    let (status, _) = app.get("/api/admin/managers", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============ Manager payments ============

#[tokio::test]
async fn test_add_payment_extends_unexpired_validity() {
    let app = TestApp::new();
    let (_, token) = app.superadmin();
    let (_, manager) = app.manager("boss@example.com");

    let current = Utc::now().timestamp() + 10 * DAY;
    app.set_validity(manager.manager_id, Some(current));

    let (status, json) = app
        .post(
            "/api/admin/add_payment",
            Some(&token),
            json!({"managerId": manager.manager_id, "ratePerDay": 12.5, "validity": 5}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["validity"], current + 5 * DAY);
    assert_eq!(json["ratePerDay"], 12.5);

    let stored = queries::get_manager_by_id(&app.conn(), manager.manager_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.validity, Some(current + 5 * DAY));
}

#[tokio::test]
async fn test_add_payment_restarts_lapsed_validity_from_now() {
    let app = TestApp::new();
    let (_, token) = app.superadmin();
    let (_, manager) = app.manager("boss@example.com");
    app.set_validity(manager.manager_id, Some(Utc::now().timestamp() - 3 * DAY));

    let before = Utc::now().timestamp();
    let (status, json) = app
        .post(
            "/api/admin/add_payment",
            Some(&token),
            json!({"managerId": manager.manager_id, "ratePerDay": 10.0, "validity": 5}),
        )
        .await;
    let after = Utc::now().timestamp();

    assert_eq!(status, StatusCode::OK);
    let validity = json["validity"].as_i64().unwrap();
    assert!(validity >= before + 5 * DAY && validity <= after + 5 * DAY);
}

#[tokio::test]
async fn test_add_payment_converts_amount_to_days() {
    let app = TestApp::new();
    let (_, token) = app.superadmin();
    let (_, manager) = app.manager("boss@example.com");
    let current = Utc::now().timestamp() + DAY;
    app.set_validity(manager.manager_id, Some(current));

    // 55 / 10 = 5.5, floored to 5 days
    let (status, json) = app
        .post(
            "/api/admin/add_payment",
            Some(&token),
            json!({"managerId": manager.manager_id, "ratePerDay": 10.0, "amount": 55.0}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["validity"], current + 5 * DAY);
}

#[tokio::test]
async fn test_add_payment_validation_and_unknown_manager() {
    let app = TestApp::new();
    let (_, token) = app.superadmin();
    let (_, manager) = app.manager("boss@example.com");

    let (status, json) = app
        .post(
            "/api/admin/add_payment",
            Some(&token),
            json!({"managerId": 9999, "ratePerDay": 10.0, "validity": 5}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Manager not found");

    let (status, _) = app
        .post(
            "/api/admin/add_payment",
            Some(&token),
            json!({"managerId": manager.manager_id, "ratePerDay": 10.0}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/admin/add_payment",
            Some(&token),
            json!({"managerId": manager.manager_id, "ratePerDay": -1.0, "validity": 5}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/admin/add_payment",
            Some(&token),
            json!({"managerId": manager.manager_id, "ratePerDay": 10.0, "validity": 0}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was written
    let stored = queries::get_manager_by_id(&app.conn(), manager.manager_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.validity, manager.validity);
    assert_eq!(stored.rate_per_day, 0.0);
}

#[tokio::test]
async fn test_list_managers() {
    let app = TestApp::new();
    let (_, token) = app.superadmin();
    app.manager("one@example.com");
    app.manager("two@example.com");

    let (status, json) = app.get("/api/admin/managers", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let managers = json.as_array().unwrap();
    assert_eq!(managers.len(), 2);
    assert_eq!(managers[0]["email"], "one@example.com");
    assert_eq!(managers[0]["companyName"], "Acme Ltd");
}

// ============ Account review ============

#[tokio::test]
async fn test_approve_and_reject_pending_accounts() {
    let app = TestApp::new();
    let (_, token) = app.superadmin();
    let pending = app.signup(&customer_signup("new@example.com"), UserStatus::Pending);
    let other = app.signup(&customer_signup("other@example.com"), UserStatus::Pending);

    let (status, json) = app.get("/api/admin/login_requests", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert!(json[0].get("passwordHash").is_none());

    let (status, json) = app
        .post(
            "/api/admin/approve_user",
            Some(&token),
            json!({"id": pending.id, "check": true}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "approved");

    // Missing check rejects
    let (status, json) = app
        .post("/api/admin/approve_user", Some(&token), json!({"id": other.id}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "rejected");

    let (_, requests) = app.get("/api/admin/login_requests", Some(&token)).await;
    assert!(requests.as_array().unwrap().is_empty());

    // The super-admin is never listed
    let (_, active) = app.get("/api/admin/active_users", Some(&token)).await;
    let active = active.as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["id"], pending.id);
}

#[tokio::test]
async fn test_deactivate_user_logs_them_out() {
    let app = TestApp::new();
    let (admin, token) = app.superadmin();
    let user = app.signup(&customer_signup("shopper@example.com"), UserStatus::Approved);
    queries::set_logged_in(&app.conn(), user.id, true).unwrap();

    let (status, json) = app
        .post("/api/admin/deactivate_user", Some(&token), json!({"id": user.id}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "deactivated");
    assert_eq!(json["loggedIn"], false);

    let (status, _) = app
        .post("/api/admin/deactivate_user", Some(&token), json!({"id": admin.id}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/api/admin/deactivate_user", Some(&token), json!({"id": 9999}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
