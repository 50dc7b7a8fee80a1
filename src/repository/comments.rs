//! Comments repository for database operations

use chrono::NaiveDateTime;
use sqlx::{FromRow, Pool, Postgres};

use crate::{
    error::AppResult,
    models::comment::{CommentDetails, CreateComment},
};

/// Comment row joined with its author, keyed by item for batch lookups
#[derive(FromRow)]
struct ItemCommentRow {
    item_id: i64,
    id: i64,
    text: String,
    author_name: String,
    created: NaiveDateTime,
}

#[derive(Clone)]
pub struct CommentsRepository {
    pool: Pool<Postgres>,
}

impl CommentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create a new comment
    pub async fn create(
        &self,
        author_id: i64,
        item_id: i64,
        comment: &CreateComment,
        created: NaiveDateTime,
    ) -> AppResult<CommentDetails> {
        let saved = sqlx::query_as::<_, CommentDetails>(
            r#"
            WITH inserted AS (
                INSERT INTO comments (text, item_id, author_id, created)
                VALUES ($1, $2, $3, $4)
                RETURNING id, text, author_id, created
            )
            SELECT c.id, c.text, u.name AS author_name, c.created
            FROM inserted c
            JOIN users u ON c.author_id = u.id
            "#,
        )
        .bind(&comment.text)
        .bind(item_id)
        .bind(author_id)
        .bind(created)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    /// List comments on an item, oldest first
    pub async fn find_by_item(&self, item_id: i64) -> AppResult<Vec<CommentDetails>> {
        let comments = sqlx::query_as::<_, CommentDetails>(
            r#"
            SELECT c.id, c.text, u.name AS author_name, c.created
            FROM comments c
            JOIN users u ON c.author_id = u.id
            WHERE c.item_id = $1
            ORDER BY c.created
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    /// Batch comment lookup for several items at once
    pub async fn find_by_items(
        &self,
        item_ids: &[i64],
    ) -> AppResult<Vec<(i64, CommentDetails)>> {
        let rows = sqlx::query_as::<_, ItemCommentRow>(
            r#"
            SELECT c.item_id, c.id, c.text, u.name AS author_name, c.created
            FROM comments c
            JOIN users u ON c.author_id = u.id
            WHERE c.item_id = ANY($1)
            ORDER BY c.created
            "#,
        )
        .bind(item_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                (
                    r.item_id,
                    CommentDetails {
                        id: r.id,
                        text: r.text,
                        author_name: r.author_name,
                        created: r.created,
                    },
                )
            })
            .collect())
    }
}
