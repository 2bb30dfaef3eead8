use std::collections::BTreeMap;

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{get_all_categories, get_category},
            questions::{count_questions, get_questions_for_category},
        },
        Question,
    },
    server::{
        app::AppState,
        error::ApiError,
        extract::{Id, Page},
        pagination::{paginate, PageQuery},
    },
};

use super::{format_categories, ApiResponse};

#[derive(Serialize)]
struct CategoriesList {
    success: bool,
    categories: BTreeMap<i64, String>,
    total_categories: usize,
}

#[derive(Serialize)]
struct CategoryQuestions {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    current_category: String,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesList>> {
    let categories = format_categories(get_all_categories(&pool).await?);
    Ok(Json(CategoriesList {
        success: true,
        total_categories: categories.len(),
        categories,
    }))
}

// total_questions is the count of every question, not only this category's
async fn questions_for_category(
    State(pool): State<SqlitePool>,
    Id(id): Id,
    Page(page): Page,
) -> ApiResponse<Json<CategoryQuestions>> {
    let category = get_category(&pool, id)
        .await?
        .ok_or(ApiError::UnknownCategory(id))?;
    let questions = get_questions_for_category(&pool, category.id).await?;

    Ok(Json(CategoryQuestions {
        success: true,
        questions: paginate(&page, questions),
        total_questions: count_questions(&pool).await?,
        current_category: category.kind,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_for_category))
        .with_state(state)
}
