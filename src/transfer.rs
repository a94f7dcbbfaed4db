//! CSV export and import of the whole trivia database.
//!
//! A dump directory holds `categories.csv` and `questions.csv`; importing it
//! upserts rows by id, categories first.

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::queries::categories::{get_all_categories, import_categories};
use crate::db::queries::questions::{get_all_questions, import_questions};
use crate::db::{Category, Question};

const CATEGORIES_FILE: &str = "categories.csv";
const QUESTIONS_FILE: &str = "questions.csv";

fn write_to(path: &Path, data: Vec<impl Serialize>) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let mut rdr =
        csv::Reader::from_path(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: T = record.with_context(|| format!("Malformed row in {}", path.display()))?;
        out.push(record);
    }
    Ok(out)
}

pub async fn export_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories = get_all_categories(pool).await?;
    let questions = get_all_questions(pool).await?;
    if !dir.exists() {
        std::fs::create_dir_all(dir)?
    }
    tracing::info!(
        categories = categories.len(),
        questions = questions.len(),
        dir = %dir.display(),
        "Exporting"
    );
    write_to(&dir.join(CATEGORIES_FILE), categories)?;
    write_to(&dir.join(QUESTIONS_FILE), questions)?;
    Ok(())
}

pub async fn import_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories: Vec<Category> = read_from(&dir.join(CATEGORIES_FILE))?;
    let questions: Vec<Question> = read_from(&dir.join(QUESTIONS_FILE))?;
    tracing::info!(
        categories = categories.len(),
        questions = questions.len(),
        dir = %dir.display(),
        "Importing"
    );
    import_categories(pool, categories).await?;
    import_questions(pool, questions).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use sqlx::SqlitePool;

    use super::*;
    use crate::test_utils::{count_questions, create_test_question};

    #[sqlx::test]
    async fn export_writes_headers_and_rows(pool: SqlitePool) {
        create_test_question(&pool, "Who wrote Hamlet?", "4").await;
        let dir = tempfile::tempdir().unwrap();

        export_data(&pool, dir.path()).await.unwrap();

        let categories = std::fs::read_to_string(dir.path().join(CATEGORIES_FILE)).unwrap();
        assert!(categories.starts_with("id,type\n"));
        assert!(categories.contains("5,Entertainment"));
        let questions = std::fs::read_to_string(dir.path().join(QUESTIONS_FILE)).unwrap();
        assert!(questions.starts_with("id,question,answer,difficulty,category\n"));
        assert!(questions.contains("Who wrote Hamlet?,answer,1,4"));
    }

    #[sqlx::test]
    async fn export_creates_missing_directory(pool: SqlitePool) {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("dumps").join("today");

        export_data(&pool, &nested).await.unwrap();

        assert!(nested.join(CATEGORIES_FILE).is_file());
        assert!(nested.join(QUESTIONS_FILE).is_file());
    }

    #[sqlx::test]
    async fn import_restores_deleted_rows(pool: SqlitePool) {
        create_test_question(&pool, "Who wrote Hamlet?", "4").await;
        create_test_question(&pool, "What is H2O?", "1").await;
        let dir = tempfile::tempdir().unwrap();
        export_data(&pool, dir.path()).await.unwrap();
        let before = get_all_questions(&pool).await.unwrap();

        sqlx::query("DELETE FROM questions")
            .execute(&pool)
            .await
            .unwrap();
        import_data(&pool, dir.path()).await.unwrap();

        assert_eq!(get_all_questions(&pool).await.unwrap(), before);
        // importing twice does not duplicate
        import_data(&pool, dir.path()).await.unwrap();
        assert_eq!(count_questions(&pool).await, 2);
    }

    #[sqlx::test]
    async fn import_fails_without_files(pool: SqlitePool) {
        let dir = tempfile::tempdir().unwrap();
        assert!(import_data(&pool, dir.path()).await.is_err());
    }
}
