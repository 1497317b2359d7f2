// Digital Library - storage core and REST backend
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


#![cfg(feature = "server")]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use digital_library::{api::app_router, config::HttpServerOptions, Storage};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn build_test_router() -> Router {
    let storage = Storage::new_in_memory()
        .await
        .expect("Failed to create in-memory storage");
    app_router(Arc::new(storage), &HttpServerOptions::default())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

#[tokio::test]
async fn test_user_crud_over_http() {
    let app = build_test_router().await;
    let ada = json!({ "id": 1, "first_name": "Ada", "second_name": "Lovelace", "role": 1 });

    let (status, body) = send(&app, Method::POST, "/api/user", Some(ada.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, ada);

    let (status, body) = send(&app, Method::GET, "/api/user/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, ada);

    let updated = json!({ "id": 1, "first_name": "X", "second_name": "Lovelace", "role": 3 });
    let (status, _) = send(&app, Method::PUT, "/api/user", Some(updated)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, Method::GET, "/api/user/1", None).await;
    assert_eq!(body["role"], 3);

    let (status, _) = send(&app, Method::DELETE, "/api/user/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, "/api/user/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "user with key 1 not found");
}

#[tokio::test]
async fn test_duplicate_create_is_conflict() {
    let app = build_test_router().await;
    let book = json!({ "id": 10, "isbn": "123", "title": "T", "year": 1990, "publisher": "P" });

    let (status, _) = send(&app, Method::POST, "/api/book", Some(book.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::POST, "/api/book", Some(book)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_update_of_missing_author_is_not_found() {
    let app = build_test_router().await;
    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/author",
        Some(json!({ "id": 404, "full_name": "Nobody" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorites_and_authorships_over_http() {
    let app = build_test_router().await;
    send(
        &app,
        Method::POST,
        "/api/user",
        Some(json!({ "id": 1, "first_name": "Ada", "second_name": "Lovelace", "role": 1 })),
    )
    .await;
    for id in [11, 10] {
        send(
            &app,
            Method::POST,
            "/api/book",
            Some(json!({ "id": id, "isbn": "i", "title": "T", "year": 2000, "publisher": "P" })),
        )
        .await;
    }
    send(
        &app,
        Method::POST,
        "/api/author",
        Some(json!({ "id": 20, "full_name": "Writer" })),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/api/user/1/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    for uri in ["/api/user/1/books/11", "/api/user/1/books/10", "/api/user/1/authors/20"] {
        let (status, _) = send(&app, Method::POST, uri, None).await;
        assert_eq!(status, StatusCode::CREATED, "POST {uri}");
    }
    let (status, _) = send(&app, Method::POST, "/api/author/20/books/10", None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, Method::GET, "/api/user/1/books", None).await;
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![10, 11]);

    let (_, body) = send(&app, Method::GET, "/api/user/1/authors", None).await;
    assert_eq!(body, json!([{ "id": 20, "full_name": "Writer" }]));

    let (_, body) = send(&app, Method::GET, "/api/author/20/books", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Favorite pointing at a missing book
    let (status, _) = send(&app, Method::POST, "/api/user/1/books/999", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_reviews_over_http() {
    let app = build_test_router().await;
    send(
        &app,
        Method::POST,
        "/api/user",
        Some(json!({ "id": 1, "first_name": "Ada", "second_name": "Lovelace", "role": 2 })),
    )
    .await;
    send(
        &app,
        Method::POST,
        "/api/book",
        Some(json!({ "id": 10, "isbn": "i", "title": "T", "year": 2000, "publisher": "P" })),
    )
    .await;

    let review = json!({ "user_id": 1, "book_id": 10, "rating": 4 });
    let (status, _) = send(&app, Method::POST, "/api/review", Some(review)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/review",
        Some(json!({ "user_id": 1, "book_id": 10, "rating": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, Method::GET, "/api/user/1/reviews/10", None).await;
    assert_eq!(body["rating"], 5);

    let (_, body) = send(&app, Method::GET, "/api/user/1/reviews", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, "/api/user/1/reviews/10", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_cascade_delete_over_http() {
    let app = build_test_router().await;
    send(
        &app,
        Method::POST,
        "/api/author",
        Some(json!({ "id": 20, "full_name": "Writer" })),
    )
    .await;
    send(
        &app,
        Method::POST,
        "/api/book",
        Some(json!({ "id": 10, "isbn": "i", "title": "T", "year": 2000, "publisher": "P" })),
    )
    .await;
    send(&app, Method::POST, "/api/author/20/books/10", None).await;

    let (status, _) = send(&app, Method::DELETE, "/api/book/10", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, Method::DELETE, "/api/book/10?cascade=true", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, Method::GET, "/api/author/20/books", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_malformed_requests_are_rejected() {
    let app = build_test_router().await;

    let (status, body) = send(&app, Method::GET, "/api/user/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, Method::DELETE, "/api/book/1?cascade=maybe", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // Role outside 1..=3
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/user",
        Some(json!({ "id": 1, "first_name": "A", "second_name": "B", "role": 9 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, body) = send(&app, Method::GET, "/api/user/1", None).await;
    assert_eq!(body["error"], "user with key 1 not found");
}

#[tokio::test]
async fn test_conflict_body_has_no_driver_text() {
    let app = build_test_router().await;
    let author = json!({ "id": 20, "full_name": "Writer" });
    send(&app, Method::POST, "/api/author", Some(author.clone())).await;

    let (status, body) = send(&app, Method::POST, "/api/author", Some(author)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "can't post author 20: key constraint violated");
}

#[tokio::test]
async fn test_slow_request_times_out_with_408() {
    let storage = Arc::new(
        Storage::new_in_memory()
            .await
            .expect("Failed to create in-memory storage"),
    );
    let options = HttpServerOptions {
        timeout_secs: 1,
        ..Default::default()
    };
    let app = app_router(storage.clone(), &options);

    // Hold the only pooled connection so the handler blocks
    let _busy = storage.pool().acquire().await.unwrap();

    let (status, _) = send(&app, Method::GET, "/api/user/1", None).await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
}
