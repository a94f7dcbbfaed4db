mod categories;
mod questions;
mod quizzes;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quiz_router;

use serde::Serialize;

use super::error::ApiError;
use crate::db::Question;

pub type ApiResponse<T> = Result<T, ApiError>;

/// Envelope shared by every endpoint that lists questions.
#[derive(Serialize)]
struct QuestionList {
    success: bool,
    total_questions: usize,
    questions: Vec<Question>,
    current_category: Option<i64>,
}

impl QuestionList {
    fn new(questions: Vec<Question>, current_category: Option<i64>) -> Self {
        Self {
            success: true,
            total_questions: questions.len(),
            questions,
            current_category,
        }
    }
}
