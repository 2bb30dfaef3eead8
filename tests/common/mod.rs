#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;
use trivia_api::db::{
    self,
    queries::{categories::create_category, questions::create_question},
    NewQuestion,
};
use trivia_api::server::{router, AppState};

pub const CATEGORIES: [&str; 6] = [
    "Science",
    "Art",
    "Geography",
    "History",
    "Entertainment",
    "Sports",
];

/// (question, answer, category, difficulty)
pub const QUESTIONS: [(&str, &str, i64, i64); 13] = [
    ("What is the heaviest organ in the human body?", "The Liver", 1, 4),
    ("Who discovered penicillin?", "Alexander Fleming", 1, 3),
    ("Hematology is a branch of medicine involving the study of what?", "Blood", 1, 4),
    ("What is the chemical symbol for gold?", "Au", 1, 2),
    ("How many bones are in the adult human body?", "206", 1, 3),
    ("Who painted the Mona Lisa?", "Leonardo da Vinci", 2, 1),
    ("La Giaconda is better known as what?", "Mona Lisa", 2, 3),
    ("How many paintings did Van Gogh sell in his lifetime?", "One", 2, 4),
    ("Which American artist was a pioneer of Abstract Expressionism?", "Jackson Pollock", 2, 2),
    ("What is the largest lake in Africa?", "Lake Victoria", 3, 2),
    ("In which royal palace would you find the Hall of Mirrors?", "The Palace of Versailles", 3, 3),
    ("The Taj Mahal is located in which Indian city?", "Agra", 3, 2),
    ("What boxer's original name is Cassius Clay?", "Muhammad Ali", 4, 1),
];

pub async fn seeded_pool() -> SqlitePool {
    let pool = db::in_memory().await.expect("in-memory database should open");
    db::run_migrations(&pool)
        .await
        .expect("migrations should apply");
    for kind in CATEGORIES {
        create_category(&pool, kind)
            .await
            .expect("category insert should succeed");
    }
    for (question, answer, category, difficulty) in QUESTIONS {
        create_question(
            &pool,
            &NewQuestion {
                question: question.to_owned(),
                answer: answer.to_owned(),
                category,
                difficulty,
            },
        )
        .await
        .expect("question insert should succeed");
    }
    pool
}

pub async fn app() -> (Router, SqlitePool) {
    let pool = seeded_pool().await;
    (router(AppState::new(pool.clone())), pool)
}

pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: Body,
) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("origin", "http://localhost:3000")
        .body(body)
        .expect("request build should succeed");
    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("router should respond");
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = resp
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    (status, headers, bytes.to_vec())
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let body = match body {
        Some(json) => Body::from(json.to_string()),
        None => Body::empty(),
    };
    let (status, _, bytes) = send_raw(app, method, uri, body).await;
    let json = serde_json::from_slice(&bytes).expect("response should be JSON");
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}
