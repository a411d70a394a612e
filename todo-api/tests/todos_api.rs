//! Integration tests for the /todos resource
//!
//! Run with: cargo test -p todo-api --test todos_api

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::TestContext;
use serde_json::{json, Value};
use todo_shared::store::TodoStore;

fn ids(list: &Value) -> Vec<i64> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|todo| todo["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_create_update_delete_scenario() {
    let ctx = TestContext::new();
    let user = ctx.register("ada@example.com").await;

    let (status, created) = ctx
        .post("/todos", &user.token, json!({ "title": "Buy milk" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Buy milk");
    assert_eq!(created["completed"], false);
    assert_eq!(created["userId"], user.id.to_string());
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = ctx
        .put(&format!("/todos/{}", id), &user.token, json!({ "completed": true }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["title"], "Buy milk");
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let (status, body) = ctx.delete(&format!("/todos/{}", id), &user.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Todo deleted successfully");

    let (status, list) = ctx.get("/todos", &user.token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!ids(&list).contains(&id));
}

#[tokio::test]
async fn test_list_is_owner_scoped_and_newest_first() {
    let ctx = TestContext::new();
    let alice = ctx.register("alice@example.com").await;
    let bob = ctx.register("bob@example.com").await;

    let first = ctx.create_todo(&alice, "first").await;
    ctx.create_todo(&bob, "bob's").await;
    let second = ctx.create_todo(&alice, "second").await;

    let (status, list) = ctx.get("/todos", &alice.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ids(&list),
        vec![second["id"].as_i64().unwrap(), first["id"].as_i64().unwrap()]
    );

    let (_, list) = ctx.get("/todos", &bob.token).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert!(list.iter().all(|todo| todo["userId"] == bob.id.to_string()));
}

#[tokio::test]
async fn test_other_users_todo_is_forbidden_and_untouched() {
    let ctx = TestContext::new();
    let alice = ctx.register("alice@example.com").await;
    let bob = ctx.register("bob@example.com").await;

    let todo = ctx.create_todo(&alice, "private").await;
    let uri = format!("/todos/{}", todo["id"]);

    let (status, body) = ctx.put(&uri, &bob.token, json!({ "completed": true })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, _) = ctx.delete(&uri, &bob.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, list) = ctx.get("/todos", &alice.token).await;
    assert_eq!(list[0]["completed"], false);
    assert_eq!(list[0]["title"], "private");
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let ctx = TestContext::new();
    let user = ctx.register("ada@example.com").await;

    let (status, body) = ctx.put("/todos/4242", &user.token, json!({ "completed": true })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = ctx.delete("/todos/4242", &user.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleted_id_stays_gone() {
    let ctx = TestContext::new();
    let user = ctx.register("ada@example.com").await;
    let todo = ctx.create_todo(&user, "short lived").await;
    let uri = format!("/todos/{}", todo["id"]);

    assert_eq!(ctx.delete(&uri, &user.token).await.0, StatusCode::OK);
    assert_eq!(ctx.delete(&uri, &user.token).await.0, StatusCode::NOT_FOUND);
    assert_eq!(
        ctx.put(&uri, &user.token, json!({ "title": "back?" })).await.0,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_blank_title_rejected_and_nothing_persisted() {
    let ctx = TestContext::new();
    let user = ctx.register("ada@example.com").await;

    for body in [json!({ "title": "   " }), json!({ "title": "" }), json!({})] {
        let (status, response) = ctx.post("/todos", &user.token, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "validation_error");
        assert_eq!(response["details"][0]["field"], "title");
    }

    let (_, list) = ctx.get("/todos", &user.token).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_trims_fields() {
    let ctx = TestContext::new();
    let user = ctx.register("ada@example.com").await;

    let (status, todo) = ctx
        .post(
            "/todos",
            &user.token,
            json!({ "title": "  Buy milk ", "description": "  oat  " }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(todo["title"], "Buy milk");
    assert_eq!(todo["description"], "oat");
}

#[tokio::test]
async fn test_partial_update_semantics() {
    let ctx = TestContext::new();
    let user = ctx.register("ada@example.com").await;
    let (_, todo) = ctx
        .post("/todos", &user.token, json!({ "title": "Buy milk", "description": "oat" }))
        .await;
    let uri = format!("/todos/{}", todo["id"]);

    // completed only
    let (_, updated) = ctx.put(&uri, &user.token, json!({ "completed": true })).await;
    assert_eq!(updated["title"], "Buy milk");
    assert_eq!(updated["description"], "oat");

    // null clears the description
    let (status, updated) = ctx.put(&uri, &user.token, json!({ "description": null })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(updated["description"].is_null());
    assert_eq!(updated["completed"], true);

    // empty object changes nothing
    let (status, unchanged) = ctx.put(&uri, &user.token, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged, updated);
}

#[tokio::test]
async fn test_invalid_update_bodies() {
    let ctx = TestContext::new();
    let user = ctx.register("ada@example.com").await;
    let todo = ctx.create_todo(&user, "Buy milk").await;
    let uri = format!("/todos/{}", todo["id"]);

    let cases = [
        json!({ "title": "   " }),
        json!({ "title": null }),
        json!({ "completed": "yes" }),
        json!({ "completed": null }),
        json!([true]),
    ];
    for body in cases {
        let (status, response) = ctx.put(&uri, &user.token, body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {} got {}", body, response);
    }

    // validation runs before the existence check
    let (status, _) = ctx.put("/todos/4242", &user.token, json!({ "title": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = ctx.get("/todos", &user.token).await;
    assert_eq!(list[0]["title"], "Buy milk");
    assert_eq!(list[0]["completed"], false);
}

#[tokio::test]
async fn test_malformed_json_and_bad_ids_are_bad_requests() {
    let ctx = TestContext::new();
    let user = ctx.register("ada@example.com").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/todos")
        .header(header::AUTHORIZATION, format!("Bearer {}", user.token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();
    let (status, body) = ctx.send_request(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (status, _) = ctx.delete("/todos/not-a-number", &user.token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_todo_routes_require_authentication() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send(Method::GET, "/todos", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = ctx
        .send(Method::POST, "/todos", None, Some(json!({ "title": "x" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx.get("/todos", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/todos")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let (status, body) = ctx.send_request(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    // nothing reached the store
    assert!(ctx.store.find_todo(1).await.unwrap().is_none());
}
