use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn count_questions(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM questions
        "#,
    )
    .fetch_one(pool)
    .await
}

pub async fn get_question(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions
        WHERE questions.category = ?1
        ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

/// Case-insensitive substring search over the question text.
///
/// Matching happens here rather than in SQL: SQLite's `lower()` only folds
/// ASCII letters.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    let term = term.to_lowercase();
    let mut found = get_all_questions(pool).await?;
    found.retain(|q| q.question.to_lowercase().contains(&term));
    Ok(found)
}

pub async fn create_question(pool: &SqlitePool, question: &NewQuestion) -> sqlx::Result<i64> {
    let id = sqlx::query(
        r#"
        INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&question.question)
    .bind(&question.answer)
    .bind(question.category)
    .bind(question.difficulty)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Returns the number of deleted rows.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<u64> {
    let deleted = sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(deleted)
}

/// Picks a random question of `category` that is not listed in `exclude`.
pub async fn random_question(
    pool: &SqlitePool,
    category: i64,
    exclude: &[i64],
) -> sqlx::Result<Option<Question>> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT id, question, answer, category, difficulty FROM questions WHERE category = ",
    );
    query.push_bind(category);
    if !exclude.is_empty() {
        query.push(" AND id NOT IN (");
        let mut ids = query.separated(", ");
        for id in exclude {
            ids.push_bind(*id);
        }
        ids.push_unseparated(")");
    }
    query.push(" ORDER BY RANDOM() LIMIT 1");

    query.build_query_as::<Question>().fetch_optional(pool).await
}

async fn insert_question(conn: &mut SqliteConnection, question: &Question) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(question.id)
    .bind(&question.question)
    .bind(&question.answer)
    .bind(question.category)
    .bind(question.difficulty)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn update_question(conn: &mut SqliteConnection, question: &Question) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        UPDATE questions SET question = ?1, answer = ?2, category = ?3, difficulty = ?4
        WHERE questions.id = ?5
        "#,
    )
    .bind(&question.question)
    .bind(&question.answer)
    .bind(question.category)
    .bind(question.difficulty)
    .bind(question.id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn remove_question(conn: &mut SqliteConnection, id: i64) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Makes the questions table match `questions` exactly, keeping the given ids.
///
/// Runs on a single connection so callers can wrap it in a transaction.
pub async fn import_questions(
    conn: &mut SqliteConnection,
    questions: Vec<Question>,
) -> sqlx::Result<()> {
    let existing_ids: HashSet<i64> = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT id FROM questions
        "#,
    )
    .fetch_all(&mut *conn)
    .await?
    .into_iter()
    .collect();
    let new_ids: HashSet<i64> = questions.iter().map(|q| q.id).collect();
    for id in existing_ids.difference(&new_ids) {
        remove_question(conn, *id).await?;
    }
    for question in questions {
        if existing_ids.contains(&question.id) {
            update_question(conn, &question).await?;
        } else {
            insert_question(conn, &question).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn seeded() -> SqlitePool {
        let pool = db::in_memory().await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        for (question, category) in [
            ("What is the heaviest organ in the human body?", 1),
            ("Who discovered penicillin?", 1),
            ("Who painted the Mona Lisa?", 2),
            ("Où est l'École des Beaux-Arts?", 3),
        ] {
            create_question(
                &pool,
                &NewQuestion {
                    question: question.to_owned(),
                    answer: "answer".to_owned(),
                    category,
                    difficulty: 3,
                },
            )
            .await
            .unwrap();
        }
        pool
    }

    #[tokio::test]
    async fn search_ignores_case() {
        let pool = seeded().await;
        let found = search_questions(&pool, "WHO").await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(search_questions(&pool, "quasar").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_folds_non_ascii_letters() {
        let pool = seeded().await;
        let found = search_questions(&pool, "école").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].question, "Où est l'École des Beaux-Arts?");
        assert_eq!(search_questions(&pool, "OÙ EST").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let pool = seeded().await;
        assert!(search_questions(&pool, "%").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn random_question_skips_excluded_ids() {
        let pool = seeded().await;
        let science = get_questions_for_category(&pool, 1).await.unwrap();
        let first = science[0].id;

        for _ in 0..10 {
            let picked = random_question(&pool, 1, &[first])
                .await
                .unwrap()
                .unwrap();
            assert_eq!(picked.category, 1);
            assert_ne!(picked.id, first);
        }

        let all: Vec<i64> = science.iter().map(|q| q.id).collect();
        assert!(random_question(&pool, 1, &all)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn random_question_never_leaves_its_category() {
        let pool = seeded().await;
        for _ in 0..10 {
            let picked = random_question(&pool, 2, &[]).await.unwrap().unwrap();
            assert_eq!(picked.category, 2);
        }
        assert!(random_question(&pool, 0, &[]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_reports_affected_rows() {
        let pool = seeded().await;
        assert_eq!(count_questions(&pool).await.unwrap(), 4);
        assert_eq!(delete_question(&pool, 1).await.unwrap(), 1);
        assert_eq!(delete_question(&pool, 1).await.unwrap(), 0);
        assert!(get_question(&pool, 1).await.unwrap().is_none());
    }
}
