//! Item requests repository for database operations

use chrono::NaiveDateTime;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::request::{CreateItemRequest, ItemRequest},
};

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get item request by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<ItemRequest> {
        sqlx::query_as::<_, ItemRequest>(
            "SELECT id, description, requestor_id, created FROM item_requests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item request with id {} not found", id)))
    }

    /// Create a new item request
    pub async fn create(
        &self,
        requestor_id: i64,
        request: &CreateItemRequest,
        created: NaiveDateTime,
    ) -> AppResult<ItemRequest> {
        let saved = sqlx::query_as::<_, ItemRequest>(
            r#"
            INSERT INTO item_requests (description, requestor_id, created)
            VALUES ($1, $2, $3)
            RETURNING id, description, requestor_id, created
            "#,
        )
        .bind(&request.description)
        .bind(requestor_id)
        .bind(created)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    /// List a user's own requests, newest first
    pub async fn find_by_requestor(&self, requestor_id: i64) -> AppResult<Vec<ItemRequest>> {
        let requests = sqlx::query_as::<_, ItemRequest>(
            r#"
            SELECT id, description, requestor_id, created FROM item_requests
            WHERE requestor_id = $1
            ORDER BY created DESC
            "#,
        )
        .bind(requestor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// List requests posted by other users, newest first, paginated
    pub async fn find_by_other_requestors(
        &self,
        requestor_id: i64,
        from: i64,
        size: i64,
    ) -> AppResult<Vec<ItemRequest>> {
        let requests = sqlx::query_as::<_, ItemRequest>(
            r#"
            SELECT id, description, requestor_id, created FROM item_requests
            WHERE requestor_id != $1
            ORDER BY created DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(requestor_id)
        .bind(size)
        .bind(from)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Delete an item request
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM item_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Item request with id {} not found",
                id
            )));
        }
        Ok(())
    }
}
