use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

pub async fn get_all_categories(pool: &SqlitePool) -> sqlx::Result<Vec<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, type FROM categories ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_category(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, type FROM categories WHERE categories.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create_category(pool: &SqlitePool, kind: &str) -> sqlx::Result<i64> {
    let id = sqlx::query(
        r#"
        INSERT INTO categories (type) VALUES (?1)
        "#,
    )
    .bind(kind)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

async fn insert_category(conn: &mut SqliteConnection, category: &Category) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO categories (id, type) VALUES (?1, ?2)
        "#,
    )
    .bind(category.id)
    .bind(&category.kind)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn update_category(conn: &mut SqliteConnection, category: &Category) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        UPDATE categories SET type = ?1 WHERE categories.id = ?2
        "#,
    )
    .bind(&category.kind)
    .bind(category.id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn delete_category(conn: &mut SqliteConnection, id: i64) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        DELETE FROM categories WHERE categories.id = ?1
        "#,
    )
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Makes the categories table match `categories` exactly, keeping the given ids.
///
/// Runs on a single connection so callers can wrap it in a transaction.
pub async fn import_categories(
    conn: &mut SqliteConnection,
    categories: Vec<Category>,
) -> sqlx::Result<()> {
    let existing_ids: HashSet<i64> = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT id FROM categories
        "#,
    )
    .fetch_all(&mut *conn)
    .await?
    .into_iter()
    .collect();
    let new_ids: HashSet<i64> = categories.iter().map(|c| c.id).collect();
    for id in existing_ids.difference(&new_ids) {
        delete_category(conn, *id).await?;
    }
    for category in categories {
        if existing_ids.contains(&category.id) {
            update_category(conn, &category).await?;
        } else {
            insert_category(conn, &category).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[tokio::test]
    async fn import_replaces_existing_categories() {
        let pool = db::in_memory().await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        let science = create_category(&pool, "Science").await.unwrap();
        let art = create_category(&pool, "Art").await.unwrap();

        let mut tx = pool.begin().await.unwrap();
        import_categories(
            &mut tx,
            vec![
                Category {
                    id: science,
                    kind: "Physics".to_owned(),
                },
                Category {
                    id: 10,
                    kind: "Sports".to_owned(),
                },
            ],
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();

        let categories = get_all_categories(&pool).await.unwrap();
        let kinds: Vec<&str> = categories.iter().map(|c| c.kind.as_str()).collect();
        assert_eq!(kinds, vec!["Physics", "Sports"]);
        assert!(get_category(&pool, art).await.unwrap().is_none());
    }
}
