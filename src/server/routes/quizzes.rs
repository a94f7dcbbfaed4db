use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions::get_questions_by_filter, Question},
    quiz::{select_question, CategoryFilter, QuizRng},
    server::{app::AppState, deserializers::deserialize_option_ids, error::ApiError},
    telemetry::QUIZ_ROUNDS_CNTR,
};

use super::ApiResponse;

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    id: Option<i64>,
}

#[derive(Deserialize)]
struct QuizRound {
    quiz_category: Option<QuizCategory>,
    #[serde(default, deserialize_with = "deserialize_option_ids")]
    previous_questions: Option<Vec<i64>>,
}

#[derive(Serialize)]
struct NextQuestion {
    success: bool,
    question: Option<Question>,
}

async fn play_quiz(
    State(pool): State<SqlitePool>,
    State(rng): State<QuizRng>,
    body: Result<Json<QuizRound>, JsonRejection>,
) -> ApiResponse<Json<NextQuestion>> {
    let Json(round) = body.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    let (Some(category), Some(previous_questions)) = (round.quiz_category, round.previous_questions)
    else {
        return Err(ApiError::Validation(
            "quiz_category and previous_questions are required".to_owned(),
        ));
    };
    let filter = CategoryFilter::for_round(&category.kind, category.id).ok_or_else(|| {
        ApiError::Validation(format!("quiz category `{}` has no id", category.kind))
    })?;

    let candidates = get_questions_by_filter(&pool, filter)
        .await
        .map_err(ApiError::operation("load quiz candidates"))?;
    let question = rng.with(|rng| select_question(candidates, &previous_questions, rng));

    let outcome = if question.is_some() { "question" } else { "exhausted" };
    QUIZ_ROUNDS_CNTR
        .with_label_values(&[filter.metric_label(), outcome])
        .inc();
    tracing::debug!(
        ?filter,
        seen = previous_questions.len(),
        picked = question.as_ref().map(|q| q.id),
        "Quiz round"
    );
    Ok(Json(NextQuestion {
        success: true,
        question,
    }))
}

pub fn quiz_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(play_quiz))
        .with_state(state)
}
