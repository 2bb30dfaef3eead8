use std::collections::BTreeMap;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_all_categories, questions},
        NewQuestion, Question,
    },
    server::{
        app::AppState,
        error::ApiError,
        extract::{Id, Page, Payload},
        pagination::{paginate, PageQuery},
    },
};

use super::{format_categories, ApiResponse};

/// Body of `POST /questions`: either a search or a new question.
#[derive(Debug, Default, Deserialize)]
struct QuestionsBody {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
    question: Option<String>,
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
}

impl QuestionsBody {
    fn into_new_question(self) -> Result<NewQuestion, ApiError> {
        Ok(NewQuestion {
            question: self.question.ok_or(ApiError::MissingField("question"))?,
            answer: self.answer.ok_or(ApiError::MissingField("answer"))?,
            difficulty: self.difficulty.ok_or(ApiError::MissingField("difficulty"))?,
            category: self.category.ok_or(ApiError::MissingField("category"))?,
        })
    }
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
}

#[derive(Serialize)]
struct Created {
    success: bool,
    created: i64,
    question_created: String,
    questions: Vec<Question>,
    total_questions: i64,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: i64,
}

async fn get_questions(
    State(pool): State<SqlitePool>,
    Page(page): Page,
) -> ApiResponse<Json<QuestionsPage>> {
    let all = questions::get_all_questions(&pool).await?;
    let total_questions = all.len() as i64;
    let categories = format_categories(get_all_categories(&pool).await?);

    Ok(Json(QuestionsPage {
        success: true,
        questions: paginate(&page, all),
        total_questions,
        categories,
    }))
}

// an unknown id is reported as unprocessable, not as not found
async fn delete_question(
    State(pool): State<SqlitePool>,
    Id(id): Id,
) -> ApiResponse<Json<Deleted>> {
    if questions::get_question(&pool, id).await?.is_none() {
        return Err(ApiError::UnknownQuestion(id));
    }
    questions::delete_question(&pool, id).await?;
    tracing::info!("Deleted question {id}");

    Ok(Json(Deleted {
        success: true,
        deleted: id,
    }))
}

async fn create_or_search(
    State(pool): State<SqlitePool>,
    Page(page): Page,
    Payload(mut body): Payload<QuestionsBody>,
) -> ApiResponse<Response> {
    match body.search_term.take().filter(|term| !term.is_empty()) {
        Some(term) => Ok(search(&pool, &term, &page).await?.into_response()),
        None => Ok(create(&pool, body, &page).await?.into_response()),
    }
}

// total_questions is the count of every question, not the number of matches
async fn search(
    pool: &SqlitePool,
    term: &str,
    page: &PageQuery,
) -> ApiResponse<Json<SearchResults>> {
    let found = questions::search_questions(pool, term).await?;
    if found.is_empty() {
        return Err(ApiError::NotFound);
    }
    tracing::debug!("Search {term:?} matched {} questions", found.len());

    Ok(Json(SearchResults {
        success: true,
        questions: paginate(page, found),
        total_questions: questions::count_questions(pool).await?,
    }))
}

async fn create(
    pool: &SqlitePool,
    body: QuestionsBody,
    page: &PageQuery,
) -> ApiResponse<Json<Created>> {
    let new_question = body.into_new_question()?;
    let id = questions::create_question(pool, &new_question).await?;
    tracing::info!("Created question {id}");

    let all = questions::get_all_questions(pool).await?;
    let total_questions = all.len() as i64;
    Ok(Json(Created {
        success: true,
        created: id,
        question_created: new_question.question,
        questions: paginate(page, all),
        total_questions,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(get_questions).post(create_or_search))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
