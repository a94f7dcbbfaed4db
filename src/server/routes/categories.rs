use std::collections::BTreeMap;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_all_categories, questions::get_questions_for_category},
        Category,
    },
    server::{app::AppState, error::ApiError},
};

use super::{ApiResponse, QuestionList};

/// Category id to display name.
pub(super) type CategoryMap = BTreeMap<i64, String>;

pub(super) fn category_map(categories: Vec<Category>) -> CategoryMap {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

#[derive(Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: CategoryMap,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesResponse>> {
    let categories = get_all_categories(&pool).await?;
    if categories.is_empty() {
        return Err(ApiError::NotFound("categories".to_owned()));
    }
    Ok(Json(CategoriesResponse {
        success: true,
        categories: category_map(categories),
    }))
}

// an empty category is a valid answer here, unlike an empty page of /questions
async fn get_category_questions(
    State(pool): State<SqlitePool>,
    category_id: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Json<QuestionList>> {
    let Path(category_id) = category_id
        .map_err(|rejection| ApiError::NotFound(format!("category ({})", rejection.body_text())))?;
    let questions = get_questions_for_category(&pool, category_id).await?;
    Ok(Json(QuestionList::new(questions, Some(category_id))))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route(
            "/categories/{category_id}/questions",
            get(get_category_questions),
        )
        .with_state(state)
}
