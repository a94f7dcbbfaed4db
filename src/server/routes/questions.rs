use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{delete, get, post},
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
    pagination::paginate,
    server::{
        app::AppState,
        deserializers::{deserialize_lenient_page, deserialize_option_string_from_int},
        error::ApiError,
    },
    telemetry::QUESTION_CHANGES_CNTR,
};

use super::{
    categories::{category_map, CategoryMap},
    ApiResponse, QuestionList,
};

#[derive(Deserialize)]
struct PageQuery {
    #[serde(default, deserialize_with = "deserialize_lenient_page")]
    page: Option<i64>,
}

#[derive(Deserialize)]
struct QuestionForm {
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_string_from_int")]
    category: Option<String>,
}

impl TryFrom<QuestionForm> for NewQuestion {
    type Error = ApiError;

    fn try_from(form: QuestionForm) -> Result<Self, Self::Error> {
        match (form.question, form.answer, form.difficulty, form.category) {
            (Some(question), Some(answer), Some(difficulty), Some(category)) => Ok(NewQuestion {
                question,
                answer,
                difficulty,
                category,
            }),
            _ => Err(ApiError::Validation(
                "question, answer, difficulty and category are required".to_owned(),
            )),
        }
    }
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(
        rename = "searchTerm",
        default,
        deserialize_with = "deserialize_option_string_from_int"
    )]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    categories: CategoryMap,
    current_category: Option<i64>,
}

#[derive(Serialize)]
struct Created {
    success: bool,
    created: i64,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: String,
}

async fn get_questions(
    State(pool): State<SqlitePool>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<Json<QuestionsPage>> {
    let page = query
        .ok()
        .and_then(|Query(query)| query.page)
        .unwrap_or(1);
    let selection = questions::get_all_questions(&pool).await?;
    let current_questions = paginate(&selection, page).to_vec();
    if current_questions.is_empty() {
        return Err(ApiError::NotFound(format!("questions page {page}")));
    }
    let categories = get_all_categories(&pool).await?;

    Ok(Json(QuestionsPage {
        success: true,
        questions: current_questions,
        total_questions: selection.len(),
        categories: category_map(categories),
        current_category: None,
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    body: Result<Json<QuestionForm>, JsonRejection>,
) -> ApiResponse<Json<Created>> {
    let Json(form) = body.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    let new_question = NewQuestion::try_from(form)?;
    let id = questions::create_question(&pool, &new_question)
        .await
        .map_err(ApiError::operation("create question"))?;

    QUESTION_CHANGES_CNTR.with_label_values(&["created"]).inc();
    tracing::info!(id, "Question created");
    Ok(Json(Created {
        success: true,
        created: id,
    }))
}

// the raw path segment is echoed back, so malformed ids are a 422 rather than a routing miss
async fn delete_question(
    State(pool): State<SqlitePool>,
    Path(question_id): Path<String>,
) -> ApiResponse<Json<Deleted>> {
    let id = question_id.parse::<i64>().map_err(|_| {
        ApiError::Validation(format!("question id `{question_id}` is not an integer"))
    })?;
    let exists = questions::question_exists(&pool, id)
        .await
        .map_err(ApiError::operation("look up question"))?;
    if !exists {
        return Err(ApiError::QuestionMissing(id));
    }
    let deleted = questions::delete_question(&pool, id)
        .await
        .map_err(ApiError::operation("delete question"))?;
    if !deleted {
        // removed by a concurrent request in between
        return Err(ApiError::QuestionMissing(id));
    }

    QUESTION_CHANGES_CNTR.with_label_values(&["deleted"]).inc();
    tracing::info!(id, "Question deleted");
    Ok(Json(Deleted {
        success: true,
        deleted: question_id,
    }))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    body: Result<Json<SearchBody>, JsonRejection>,
) -> ApiResponse<Json<QuestionList>> {
    let Json(body) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let term = body
        .search_term
        .filter(|term| !term.is_empty())
        .ok_or_else(|| ApiError::NotFound("search term".to_owned()))?;
    let results = questions::search_questions(&pool, &term).await?;
    Ok(Json(QuestionList::new(results, None)))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(get_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{question_id}", delete(delete_question))
        .with_state(state)
}
