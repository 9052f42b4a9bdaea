use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use bookflix_api::api::{create_router, AppState};
use bookflix_api::models::CanonicalBook;
use bookflix_api::services::sources::{parse_datasets, RawArtifacts};
use bookflix_api::services::{FileSource, QueryEngine};

fn book(title: Value, author: &str, year: Value, rating: Value) -> Value {
    json!({
        "Book-Title": title,
        "Book-Author": author,
        "Year-Of-Publication": year,
        "Publisher": "Chilton",
        "Image-URL-L": "http://images.example.com/cover.jpg",
        "Book-Rating": rating,
        "Total-Reviewers": 12
    })
}

fn test_engine() -> QueryEngine {
    let catalog = json!({
        "111": book(json!("Dune"), "Herman", json!(1965), json!(8.1)),
        "222": book(json!("Emma"), "Jane Austen", json!("1815"), json!("7.5")),
        "333": book(json!(1984), "George Orwell", json!(1949), json!(9)),
        "444": { "Book-Title": "Broken", "Book-Author": "Nobody" }
    });
    let raw = RawArtifacts {
        catalog: serde_json::to_vec(&catalog).unwrap(),
        popular: serde_json::to_vec(&json!(["333", "999", "111", "444", "222"])).unwrap(),
        correlation: serde_json::to_vec(&json!({ "111": ["222", "999"] })).unwrap(),
        content: serde_json::to_vec(&json!({ "111": ["333", "444", "222"] })).unwrap(),
    };

    QueryEngine::new(parse_datasets(&raw).unwrap())
}

fn create_test_server() -> TestServer {
    let app = create_router(AppState::new(test_engine()));
    TestServer::new(app).unwrap()
}

fn isbns(books: &[CanonicalBook]) -> Vec<&str> {
    books.iter().map(|b| b.isbn.as_str()).collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["books"], 4);
}

#[tokio::test]
async fn test_health_check_degraded() {
    let app = create_router(AppState::new(QueryEngine::degraded("books_data.json missing")));
    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["reason"], "books_data.json missing");

    // Queries still succeed, with nothing to show
    let response = server.get("/api/popular").await;
    response.assert_status_ok();
    let books: Vec<CanonicalBook> = response.json();
    assert!(books.is_empty());
}

#[tokio::test]
async fn test_root_lists_routes() {
    let server = create_test_server();
    let response = server.get("/").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["routes"].as_array().unwrap().len() >= 5);
}

#[tokio::test]
async fn test_popular_default_and_top() {
    let server = create_test_server();

    let response = server.get("/api/popular").await;
    response.assert_status_ok();
    let books: Vec<CanonicalBook> = response.json();
    // 999 is unknown and 444 is malformed; neither is replaced
    assert_eq!(isbns(&books), vec!["333", "111", "222"]);

    let response = server.get("/api/popular").add_query_param("top", 2).await;
    let books: Vec<CanonicalBook> = response.json();
    assert_eq!(isbns(&books), vec!["333"]);
}

#[tokio::test]
async fn test_popular_normalizes_fields() {
    let server = create_test_server();
    let books: Vec<CanonicalBook> = server.get("/api/popular").await.json();

    let orwell = &books[0];
    assert_eq!(orwell.title, "1984");
    assert_eq!(orwell.rating, 9.0);

    let emma = books.iter().find(|b| b.isbn == "222").unwrap();
    assert_eq!(emma.year, 1815);
    assert_eq!(emma.rating, 7.5);
}

#[tokio::test]
async fn test_invalid_top_is_bad_request() {
    let server = create_test_server();

    for top in [0, -1] {
        let response = server.get("/api/popular").add_query_param("top", top).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("limit"));
    }

    let response = server
        .get("/api/correlation/111")
        .add_query_param("top", 0)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_numeric_limit_is_json_bad_request() {
    let server = create_test_server();

    let response = server.get("/api/popular").add_query_param("top", "abc").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("top"));

    let response = server
        .get("/api/search")
        .add_query_param("query", "dune")
        .add_query_param("limit", "x")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("limit"));
}

#[tokio::test]
async fn test_correlation_filters_missing_books() {
    let server = create_test_server();
    let response = server.get("/api/correlation/111").await;
    response.assert_status_ok();

    let books: Vec<CanonicalBook> = response.json();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].isbn, "222");
}

#[tokio::test]
async fn test_unknown_isbn_recommendations_are_empty() {
    let server = create_test_server();

    for path in ["/api/correlation/999", "/api/content/999"] {
        let response = server.get(path).await;
        response.assert_status_ok();
        let books: Vec<CanonicalBook> = response.json();
        assert!(books.is_empty());
    }
}

#[tokio::test]
async fn test_content_recommendations() {
    let server = create_test_server();

    let books: Vec<CanonicalBook> = server.get("/api/content/111").await.json();
    assert_eq!(isbns(&books), vec!["333", "222"]);

    let books: Vec<CanonicalBook> = server
        .get("/api/content/111")
        .add_query_param("top", 2)
        .await
        .json();
    assert_eq!(isbns(&books), vec!["333"]);
}

#[tokio::test]
async fn test_search_case_insensitive() {
    let server = create_test_server();

    let lower: Vec<CanonicalBook> = server
        .get("/api/search")
        .add_query_param("query", "dune")
        .await
        .json();
    let upper: Vec<CanonicalBook> = server
        .get("/api/search")
        .add_query_param("query", "DUNE")
        .await
        .json();

    assert_eq!(isbns(&lower), vec!["111"]);
    assert_eq!(lower, upper);
}

#[tokio::test]
async fn test_search_blank_query_and_limit() {
    let server = create_test_server();

    let response = server.get("/api/search").add_query_param("query", "   ").await;
    response.assert_status_ok();
    let books: Vec<CanonicalBook> = response.json();
    assert!(books.is_empty());

    let books: Vec<CanonicalBook> = server
        .get("/api/search")
        .add_query_param("query", "e")
        .add_query_param("limit", 1)
        .await
        .json();
    assert_eq!(books.len(), 1);
}

#[tokio::test]
async fn test_search_requires_query() {
    let server = create_test_server();
    let response = server.get("/api/search").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_book() {
    let server = create_test_server();

    let response = server.get("/api/books/111").await;
    response.assert_status_ok();
    let book: CanonicalBook = response.json();
    assert_eq!(book.title, "Dune");
    assert_eq!(book.year, 1965);

    server
        .get("/api/books/999")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get("/api/books/444")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_header() {
    let server = create_test_server();

    let response = server.get("/health").await;
    let generated = response.header("x-request-id");
    assert!(!generated.is_empty());

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("frontend-7"),
        )
        .await;
    assert_eq!(response.header("x-request-id"), "frontend-7");
}

#[tokio::test]
async fn test_bundled_sample_data() {
    let source = FileSource::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"));
    let engine = QueryEngine::initialize(&source).await;
    assert!(engine.is_ready());

    let server = TestServer::new(create_router(AppState::new(engine))).unwrap();

    let books: Vec<CanonicalBook> = server.get("/api/popular").await.json();
    assert_eq!(isbns(&books), vec!["0451524934", "0441013597", "0141439580"]);

    let books: Vec<CanonicalBook> = server.get("/api/correlation/0441013597").await.json();
    assert_eq!(isbns(&books), vec!["0451524934", "0141439688"]);

    let books: Vec<CanonicalBook> = server
        .get("/api/search")
        .add_query_param("query", "austen")
        .await
        .json();
    assert_eq!(isbns(&books), vec!["0141439580", "0141439688"]);
}
