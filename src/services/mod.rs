//! Business logic services

pub mod bookings;
pub mod comments;
pub mod items;
pub mod requests;
pub mod users;

use crate::error::AppResult;
use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub items: items::ItemsService,
    pub bookings: bookings::BookingsService,
    pub requests: requests::RequestsService,
    pub comments: comments::CommentsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            users: users::UsersService::new(repository.clone()),
            items: items::ItemsService::new(repository.clone()),
            bookings: bookings::BookingsService::new(repository.clone()),
            requests: requests::RequestsService::new(repository.clone()),
            comments: comments::CommentsService::new(repository.clone()),
            repository,
        }
    }

    /// Confirm the backing database is reachable
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
