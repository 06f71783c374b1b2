//! Integration tests for the Shelf Server API

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use shelf_core::{Catalog, InventoryOptions, StoreKind};
use shelf_server::handlers::{checkout_book, return_book, IdQuery};
use shelf_server::routes::create_router;
use shelf_server::state::{AppState, ServerEvent};

/// Create a test app state seeded with the default catalog
fn create_test_state(kind: StoreKind) -> AppState {
    seeded_state(kind, InventoryOptions::default())
}

fn seeded_state(kind: StoreKind, options: InventoryOptions) -> AppState {
    let state = AppState::build(kind, options);
    Catalog::default()
        .seed_into(state.inventory.as_ref())
        .expect("Failed to seed inventory");
    state
}

/// Create a test server
fn create_test_server() -> TestServer {
    let app = create_router(create_test_state(StoreKind::Locked), None);
    TestServer::new(app).expect("Failed to create test server")
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_list_books_seeded() {
    let server = create_test_server();

    let response = server.get("/books").await;

    response.assert_status_ok();

    let body: Value = response.json();
    let books = body.as_array().unwrap();
    assert_eq!(books.len(), 3);
    assert_eq!(books[0]["id"], "1");
    assert_eq!(books[0]["title"], "In Search of Lost Time");
    assert_eq!(books[2]["author"], "Leo Tolstoy");
}

#[tokio::test]
async fn test_get_book() {
    let server = create_test_server();

    let response = server.get("/books/2").await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["title"], "The Great Gatsby");
    assert_eq!(body["quantity"], 5);
}

#[tokio::test]
async fn test_get_book_not_found() {
    let server = create_test_server();

    let response = server.get("/books/404").await;

    response.assert_status_not_found();

    let body: Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("404"));
}

#[tokio::test]
async fn test_create_checkout_return_flow() {
    let server = create_test_server();

    let response = server
        .post("/books")
        .json(&json!({ "id": "9", "title": "X", "author": "Y", "quantity": 3 }))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["quantity"], 3);

    let response = server.get("/books/9").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["quantity"], 3);

    let response = server.patch("/checkout").add_query_param("id", "9").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["quantity"], 2);

    let response = server.patch("/return").add_query_param("id", "9").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["quantity"], 3);

    let response = server.get("/books").await;
    let body: Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 4);
    assert_eq!(body[3]["id"], "9");
}

#[tokio::test]
async fn test_create_without_id_assigns_one() {
    let server = create_test_server();

    let response = server
        .post("/books")
        .json(&json!({ "title": "Middlemarch", "author": "George Eliot", "quantity": 1 }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let id = response.json::<Value>()["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    server.get(&format!("/books/{}", id)).await.assert_status_ok();
}

#[tokio::test]
async fn test_create_duplicate_conflicts() {
    let server = create_test_server();

    let response = server
        .post("/books")
        .json(&json!({ "id": "1", "title": "Impostor", "author": "Nobody", "quantity": 9 }))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    // Existing record untouched
    let body: Value = server.get("/books/1").await.json();
    assert_eq!(body["title"], "In Search of Lost Time");
    assert_eq!(body["quantity"], 2);
}

#[tokio::test]
async fn test_create_invalid_input() {
    let server = create_test_server();

    for payload in [
        json!({ "id": "5", "title": "", "author": "Y", "quantity": 1 }),
        json!({ "id": "5", "title": "X", "author": "Y", "quantity": -1 }),
        json!({ "id": "5", "author": "Y", "quantity": 1 }),
    ] {
        let response = server.post("/books").json(&payload).await;
        response.assert_status_bad_request();
    }

    server.get("/books/5").await.assert_status_not_found();
}

#[tokio::test]
async fn test_create_non_json_body() {
    let server = create_test_server();

    let response = server.post("/books").text("title=X").await;

    response.assert_status_bad_request();
    assert!(response.json::<Value>()["message"].is_string());
}

#[tokio::test]
async fn test_checkout_missing_id() {
    let server = create_test_server();

    let response = server.patch("/checkout").await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<Value>()["message"],
        "Missing id query parameter."
    );
}

#[tokio::test]
async fn test_repeated_id_parameter_is_json_bad_request() {
    let server = create_test_server();

    for path in ["/checkout?id=a&id=b", "/return?id=a&id=b"] {
        let response = server.patch(path).await;
        response.assert_status_bad_request();
        assert!(response.json::<Value>()["message"].is_string(), "{path}");
    }

    let body: Value = server.get("/books/1").await.json();
    assert_eq!(body["quantity"], 2);
}

#[tokio::test]
async fn test_return_missing_id() {
    let server = create_test_server();

    server.patch("/return").await.assert_status_bad_request();
}

#[tokio::test]
async fn test_checkout_and_return_not_found() {
    let server = create_test_server();

    server
        .patch("/checkout")
        .add_query_param("id", "77")
        .await
        .assert_status_not_found();
    server
        .patch("/return")
        .add_query_param("id", "77")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_checkout_until_unavailable() {
    let server = create_test_server();

    for expected in [1, 0] {
        let response = server.patch("/checkout").add_query_param("id", "1").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["quantity"], expected);
    }

    let response = server.patch("/checkout").add_query_param("id", "1").await;
    response.assert_status_bad_request();

    let body: Value = server.get("/books/1").await.json();
    assert_eq!(body["quantity"], 0);
}

#[tokio::test]
async fn test_return_above_ceiling_conflicts() {
    let state = seeded_state(StoreKind::Sharded, InventoryOptions::with_max_quantity(2));
    let server = TestServer::new(create_router(state, None)).expect("Failed to create test server");

    let response = server.patch("/return").add_query_param("id", "1").await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_mutations_are_broadcast() {
    let state = create_test_state(StoreKind::Sharded);
    let mut rx = state.subscribe();
    let server = TestServer::new(create_router(state, None)).expect("Failed to create test server");

    server
        .patch("/checkout")
        .add_query_param("id", "2")
        .await
        .assert_status_ok();
    server
        .patch("/return")
        .add_query_param("id", "2")
        .await
        .assert_status_ok();

    match rx.recv().await.unwrap() {
        ServerEvent::BookCheckedOut { id, quantity, .. } => {
            assert_eq!(id, "2");
            assert_eq!(quantity, 4);
        }
        other => panic!("unexpected event: {:?}", other),
    }
    match rx.recv().await.unwrap() {
        ServerEvent::BookReturned { id, quantity, .. } => {
            assert_eq!(id, "2");
            assert_eq!(quantity, 5);
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn test_rejected_checkout_is_not_broadcast() {
    let state = create_test_state(StoreKind::Locked);
    let mut rx = state.subscribe();
    let server = TestServer::new(create_router(state, None)).expect("Failed to create test server");

    server
        .patch("/checkout")
        .add_query_param("id", "missing")
        .await
        .assert_status_not_found();

    assert!(rx.try_recv().is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_mutations_are_broadcast_in_commit_order() {
    for kind in [StoreKind::Locked, StoreKind::Sharded] {
        let state = create_test_state(kind);
        let mut rx = state.subscribe();

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let state = state.clone();
                tokio::spawn(async move {
                    for _ in 0..25 {
                        let query = || Ok(Query(IdQuery { id: Some("3".into()) }));
                        if checkout_book(State(state.clone()), query()).await.is_ok() {
                            return_book(State(state.clone()), query()).await.unwrap();
                        }
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        // Seeded with six copies of id 3
        let mut quantity = 6u32;
        let mut events = 0;
        while let Ok(event) = rx.try_recv() {
            quantity = match event {
                ServerEvent::BookCheckedOut { id, quantity: q, .. } if id == "3" => {
                    assert_eq!(q + 1, quantity, "{kind}: checkout out of order");
                    q
                }
                ServerEvent::BookReturned { id, quantity: q, .. } if id == "3" => {
                    assert_eq!(q, quantity + 1, "{kind}: return out of order");
                    q
                }
                other => panic!("unexpected event: {:?}", other),
            };
            events += 1;
        }

        assert!(events >= 2, "{kind}: {events} events");
        assert_eq!(quantity, 6, "{kind}");
        assert_eq!(state.inventory.get("3").unwrap().quantity, 6);
    }
}

#[tokio::test]
async fn test_cors_wildcard() {
    let app = create_router(create_test_state(StoreKind::Locked), Some("*"));
    let server = TestServer::new(app).expect("Failed to create test server");

    server.get("/books").await.assert_status_ok();
}
