use axum_test::TestServer;
use sqlx::SqlitePool;

use crate::db::queries::questions::{create_question, get_all_questions};
use crate::db::NewQuestion;
use crate::quiz::QuizRng;
use crate::server::app::{build_router, AppState};

pub fn create_test_app(pool: SqlitePool) -> TestServer {
    let state = AppState::new(pool, QuizRng::seeded(7));
    TestServer::new(build_router(state)).expect("Failed to create test server")
}

/// Inserts a difficulty-1 question with answer "answer", returning its id.
pub async fn create_test_question(pool: &SqlitePool, question: &str, category: &str) -> i64 {
    create_question(
        pool,
        &NewQuestion {
            question: question.to_owned(),
            answer: "answer".to_owned(),
            difficulty: 1,
            category: category.to_owned(),
        },
    )
    .await
    .expect("Failed to create test question")
}

pub async fn count_questions(pool: &SqlitePool) -> usize {
    get_all_questions(pool)
        .await
        .expect("Failed to count questions")
        .len()
}

pub async fn clear_categories(pool: &SqlitePool) {
    sqlx::query("DELETE FROM categories")
        .execute(pool)
        .await
        .expect("Failed to clear categories");
}
