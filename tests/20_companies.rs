mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{admin_token, app, send, storage};

fn company_row(handle: &str) -> serde_json::Value {
    json!({
        "handle": handle,
        "name": format!("Company {}", handle),
        "description": "Desc",
        "numEmployees": 10,
        "logoUrl": null
    })
}

#[tokio::test]
async fn list_applies_query_filters() {
    let db = storage();
    db.respond([company_row("c2"), company_row("c3")]);

    let (status, json) = send(
        app(&db),
        Method::GET,
        "/companies?nameLike=comp&minEmployees=2&maxEmployees=300",
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["companies"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["companies"][0]["numEmployees"], 10);

    let statements = db.statements();
    assert_eq!(statements.len(), 1);
    assert!(statements[0]
        .sql()
        .contains("WHERE name ILIKE $1 AND num_employees >= $2 AND num_employees <= $3"));
    assert_eq!(statements[0].params(), &[json!("%comp%"), json!(2), json!(300)]);
}

#[tokio::test]
async fn list_rejects_bad_filters() {
    let db = storage();

    let (status, json) = send(
        app(&db),
        Method::GET,
        "/companies?minEmployees=10&maxEmployees=1",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["status"], 400);

    let (status, _) = send(app(&db), Method::GET, "/companies?color=red", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(db.statements().is_empty());
}

#[tokio::test]
async fn get_includes_jobs() {
    let db = storage();
    db.respond([company_row("c1")]);
    db.respond([json!({ "id": 1, "title": "j1", "salary": 100, "equity": "0.1" })]);

    let (status, json) = send(app(&db), Method::GET, "/companies/c1", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["company"]["handle"], "c1");
    assert_eq!(
        json["company"]["jobs"],
        json!([{ "id": 1, "title": "j1", "salary": 100, "equity": "0.1" }])
    );
}

#[tokio::test]
async fn get_missing_company_is_not_found() {
    let db = storage();

    let (status, json) = send(app(&db), Method::GET, "/companies/nope", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({ "error": { "message": "No company: nope", "status": 404 } }));
}

#[tokio::test]
async fn create_returns_201() {
    let db = storage();
    db.respond([]);
    db.respond([company_row("new")]);
    let token = admin_token();

    let (status, json) = send(
        app(&db),
        Method::POST,
        "/companies",
        Some(&token),
        Some(json!({ "handle": "new", "name": "Company new", "numEmployees": 10 })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["company"]["handle"], "new");
    assert_eq!(db.statements().len(), 2);
}

#[tokio::test]
async fn create_duplicate_is_bad_request() {
    let db = storage();
    db.respond([json!({ "handle": "c1" })]);
    let token = admin_token();

    let (status, json) = send(
        app(&db),
        Method::POST,
        "/companies",
        Some(&token),
        Some(json!({ "handle": "c1", "name": "C1" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["message"], "Duplicate company: c1");
    assert_eq!(db.statements().len(), 1);
}

#[tokio::test]
async fn update_maps_fields_to_columns() {
    let db = storage();
    db.respond([company_row("c1")]);
    let token = admin_token();

    let (status, json) = send(
        app(&db),
        Method::PATCH,
        "/companies/c1",
        Some(&token),
        Some(json!({ "name": "C1-new", "numEmployees": 10 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["company"]["handle"], "c1");

    let statements = db.statements();
    assert!(statements[0]
        .sql()
        .starts_with("UPDATE companies SET \"name\"=$1, \"num_employees\"=$2 WHERE handle = $3"));
    assert_eq!(statements[0].params(), &[json!("C1-new"), json!(10), json!("c1")]);
}

#[tokio::test]
async fn update_rejects_empty_and_unknown_fields() {
    let db = storage();
    let token = admin_token();

    let (status, json) = send(
        app(&db),
        Method::PATCH,
        "/companies/c1",
        Some(&token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "error": { "message": "No data", "status": 400 } }));

    let (status, _) = send(
        app(&db),
        Method::PATCH,
        "/companies/c1",
        Some(&token),
        Some(json!({ "handle": "c1-new" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(db.statements().is_empty());
}

#[tokio::test]
async fn delete_missing_company_is_not_found() {
    let db = storage();
    let token = admin_token();

    let (status, json) = send(app(&db), Method::DELETE, "/companies/nope", Some(&token), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["message"], "No company: nope");
}
