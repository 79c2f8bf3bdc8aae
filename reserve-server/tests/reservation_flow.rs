//! End-to-end booking flow over the HTTP surface.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use reserve_server::{AppState, Config, DbService, api};
use reserve_server::auth::JwtConfig;

const HOUR: i64 = 3_600_000;
/// 2026-01-01 00:00:00 UTC
const DAY: i64 = 1_767_225_600_000;

fn at(hour_x2: i64) -> i64 {
    // half-hour granularity: at(20) = 10:00, at(21) = 10:30
    DAY + hour_x2 * HOUR / 2
}

fn test_config() -> Config {
    Config {
        http_port: 0,
        database_path: ":memory:".into(),
        log_dir: None,
        jwt: JwtConfig {
            secret: "test-secret-test-secret-test-secret".into(),
            expiration_minutes: 60,
            issuer: "reserve-server".into(),
            audience: "reserve-clients".into(),
        },
        environment: "test".into(),
    }
}

async fn seeded_state() -> AppState {
    let db = DbService::open_in_memory().await.unwrap();
    for (id, name, role) in [(1i64, "Alice", "CUSTOMER"), (3, "Stan", "STAFF")] {
        sqlx::query("INSERT INTO user (id, name, role) VALUES (?1, ?2, ?3)")
            .bind(id)
            .bind(name)
            .bind(role)
            .execute(&db.pool)
            .await
            .unwrap();
    }
    for (id, name, capacity) in [(1i64, "T1", 4), (2, "T2", 2)] {
        sqlx::query(
            "INSERT INTO dining_table (id, name, capacity, location) VALUES (?1, ?2, ?3, 'main')",
        )
        .bind(id)
        .bind(name)
        .bind(capacity)
        .execute(&db.pool)
        .await
        .unwrap();
    }
    AppState::with_db(test_config(), db)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn booking_json(user_id: i64, table_id: i64, start: i64, end: i64) -> Value {
    json!({
        "user_id": user_id,
        "table_id": table_id,
        "start_time": start,
        "end_time": end,
        "party_size": 2,
    })
}

#[tokio::test]
async fn booking_scenario_over_http() {
    let state = seeded_state().await;
    let app = api::router(state.clone());
    let staff = state.jwt.generate_token(3, "Stan", "STAFF").unwrap();
    let staff = Some(staff.as_str());

    // Reservation A: [10:00, 11:00) on T1 — created, PENDING
    let res = send(
        &app,
        "POST",
        "/api/reservations",
        staff,
        Some(booking_json(1, 1, at(20), at(22))),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let a = json_body(res).await;
    assert_eq!(a["status"], "PENDING");
    assert_eq!(a["user_name"], "Alice");
    let a_id = a["id"].as_i64().unwrap();

    // Reservation B: [10:30, 11:30) on T1 — conflict
    let res = send(
        &app,
        "POST",
        "/api/reservations",
        staff,
        Some(booking_json(1, 1, at(21), at(23))),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Reservation C: [11:00, 12:00) on T1 — touching, not overlapping
    let res = send(
        &app,
        "POST",
        "/api/reservations",
        staff,
        Some(booking_json(1, 1, at(22), at(24))),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let c_id = json_body(res).await["id"].as_i64().unwrap();

    // Cancel A, then the slot books again
    let res = send(
        &app,
        "PATCH",
        &format!("/api/reservations/{a_id}/cancel"),
        staff,
        None,
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["status"], "CANCELLED");

    let res = send(
        &app,
        "PATCH",
        &format!("/api/reservations/{a_id}/cancel"),
        staff,
        None,
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Reservation D: [10:00, 11:00) on T1 — A's cancellation freed it
    let res = send(
        &app,
        "POST",
        "/api/reservations",
        staff,
        Some(booking_json(1, 1, at(20), at(22))),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let d_id = json_body(res).await["id"].as_i64().unwrap();

    // Availability for [10:00, 11:00): T1 now unavailable, T2 free
    let uri = format!(
        "/api/reservations/availability?start_time={}&end_time={}&party_size=2",
        at(20),
        at(22)
    );
    let res = send(&app, "GET", &uri, staff, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let tables = json_body(res).await;
    let t1 = tables
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"] == "T1")
        .unwrap();
    assert_eq!(t1["available"], false);

    // Cancel D → T1 available again
    send(
        &app,
        "PATCH",
        &format!("/api/reservations/{d_id}/cancel"),
        staff,
        None,
    )
    .await;
    let res = send(&app, "GET", &uri, staff, None).await;
    let tables = json_body(res).await;
    let t1 = tables
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"] == "T1")
        .unwrap();
    assert_eq!(t1["available"], true);

    // Status lifecycle on C: confirm with a note, then an illegal edge
    let res = send(
        &app,
        "PATCH",
        &format!("/api/reservations/{c_id}/status"),
        staff,
        Some(json!({"status": "CONFIRMED", "notes": "phone confirm"})),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["status"], "CONFIRMED");

    let res = send(
        &app,
        "PATCH",
        &format!("/api/reservations/{c_id}/status"),
        staff,
        Some(json!({"status": "PENDING"})),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // History of C: PENDING then CONFIRMED, actor attributed
    let res = send(
        &app,
        "GET",
        &format!("/api/reservations/{c_id}/history"),
        staff,
        None,
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let history = json_body(res).await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["status"], "PENDING");
    assert_eq!(history[1]["status"], "CONFIRMED");
    assert_eq!(history[1]["changed_by_name"], "Stan");
    assert_eq!(history[1]["notes"], "phone confirm");

    // Filtered list: Alice owns every remaining reservation
    let res = send(&app, "GET", "/api/reservations?customer=ali", staff, None).await;
    let rows = json_body(res).await;
    assert_eq!(rows.as_array().unwrap().len(), 3);

    let res = send(
        &app,
        "GET",
        "/api/reservations?customer=ali&status=CONFIRMED",
        staff,
        None,
    )
    .await;
    let rows = json_body(res).await;
    assert_eq!(rows.as_array().unwrap().len(), 1);

    // Delete C
    let res = send(
        &app,
        "DELETE",
        &format!("/api/reservations/{c_id}"),
        staff,
        None,
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let res = send(
        &app,
        "GET",
        &format!("/api/reservations/{c_id}"),
        staff,
        None,
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn validation_and_auth_errors_over_http() {
    let state = seeded_state().await;
    let app = api::router(state.clone());
    let staff = state.jwt.generate_token(3, "Stan", "STAFF").unwrap();
    let staff = Some(staff.as_str());

    // No credential → 401
    let res = send(&app, "GET", "/api/reservations", None, None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Garbage credential → 401
    let res = send(&app, "GET", "/api/reservations", Some("not-a-jwt"), None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // start >= end → 400 with the failed rule spelled out
    let res = send(
        &app,
        "POST",
        "/api/reservations",
        staff,
        Some(booking_json(1, 1, at(22), at(20))),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert_eq!(body["code"], "E0002");
    assert!(
        body["message"].as_str().unwrap().contains("start_time"),
        "message should name the failing rule: {body}"
    );

    // Unknown reservation → 404
    let res = send(&app, "GET", "/api/reservations/404", staff, None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Table registry is readable
    let res = send(&app, "GET", "/api/tables", staff, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await.as_array().unwrap().len(), 2);
}
