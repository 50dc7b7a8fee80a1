//! Comment log service
//!
//! A renter may comment on an item only after an approved booking of theirs
//! on that item has ended.

use chrono::Local;

use crate::{
    error::{AppError, AppResult},
    models::comment::{CommentDetails, CreateComment},
    repository::Repository,
};

#[derive(Clone)]
pub struct CommentsService {
    repository: Repository,
}

impl CommentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a comment on an item the author has previously rented
    pub async fn add_comment(
        &self,
        author_id: i64,
        item_id: i64,
        comment: CreateComment,
    ) -> AppResult<CommentDetails> {
        self.repository.users.get_by_id(author_id).await?;
        self.repository.items.get_by_id(item_id).await?;

        let now = Local::now().naive_local();
        let eligible = self
            .repository
            .bookings
            .has_completed_booking(author_id, item_id, now)
            .await?;

        if !eligible {
            return Err(AppError::Validation(
                "User has no completed approved booking on this item".to_string(),
            ));
        }

        self.repository
            .comments
            .create(author_id, item_id, &comment, now)
            .await
    }
}
