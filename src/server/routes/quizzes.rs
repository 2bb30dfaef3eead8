use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions::random_question, Question},
    server::{app::AppState, error::ApiError, extract::Payload},
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::ApiResponse;

#[derive(Debug, Deserialize)]
struct QuizCategory {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

#[derive(Debug, Deserialize)]
struct QuizBody {
    quiz_category: Option<QuizCategory>,
    #[serde(default)]
    previous_questions: Option<Vec<i64>>,
}

#[derive(Serialize)]
struct QuizQuestion {
    success: bool,
    question: Option<Question>,
}

async fn play_quiz(
    State(pool): State<SqlitePool>,
    Payload(body): Payload<QuizBody>,
) -> ApiResponse<Json<QuizQuestion>> {
    let category = body
        .quiz_category
        .ok_or(ApiError::MissingField("quiz_category"))?;
    let previous = body.previous_questions.unwrap_or_default();

    let question = random_question(&pool, category.id, &previous).await?;
    match &question {
        Some(_) => QUIZ_QUESTIONS_SERVED.inc(),
        None => tracing::debug!(
            "No questions left in category {} after {} asked",
            category.id,
            previous.len()
        ),
    }

    Ok(Json(QuizQuestion {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(play_quiz))
        .with_state(state)
}
