//! Item catalog service

use chrono::Local;
use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    models::item::{CreateItem, Item, ItemDetails, UpdateItem},
    repository::Repository,
};

#[derive(Clone)]
pub struct ItemsService {
    repository: Repository,
}

impl ItemsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a new item for an owner
    pub async fn add_item(&self, owner_id: i64, item: CreateItem) -> AppResult<Item> {
        self.repository.users.get_by_id(owner_id).await?;

        // A declared originating request must exist
        if let Some(request_id) = item.request_id {
            self.repository.requests.get_by_id(request_id).await?;
        }

        let created = self.repository.items.create(owner_id, &item).await?;
        tracing::info!(item_id = created.id, owner_id, "item created");
        Ok(created)
    }

    /// Partially update an item; owner only, blank strings ignored
    pub async fn update_item(
        &self,
        item_id: i64,
        caller_id: i64,
        update: UpdateItem,
    ) -> AppResult<Item> {
        let mut item = self.repository.items.get_by_id(item_id).await?;

        if item.owner_id != caller_id {
            return Err(AppError::AccessDenied(format!(
                "User {} cannot modify item {}",
                caller_id, item_id
            )));
        }

        if let Some(name) = update.name.filter(|n| !n.trim().is_empty()) {
            item.name = name;
        }
        if let Some(description) = update.description.filter(|d| !d.trim().is_empty()) {
            item.description = description;
        }
        if let Some(available) = update.available {
            item.available = available;
        }

        self.repository.items.update(&item).await
    }

    /// Item detail with comments; booking projections only for the owner
    pub async fn get_item(&self, item_id: i64, caller_id: i64) -> AppResult<ItemDetails> {
        let item = self.repository.items.get_by_id(item_id).await?;
        let comments = self.repository.comments.find_by_item(item_id).await?;

        let (last_booking, next_booking) = if item.owner_id == caller_id {
            let now = Local::now().naive_local();
            (
                self.repository.bookings.last_for_item(item_id, now).await?,
                self.repository.bookings.next_for_item(item_id, now).await?,
            )
        } else {
            (None, None)
        };

        Ok(ItemDetails {
            id: item.id,
            name: item.name,
            description: item.description,
            available: item.available,
            owner_id: item.owner_id,
            request_id: item.request_id,
            last_booking,
            next_booking,
            comments,
        })
    }

    /// All items of an owner, each with booking projections and comments
    pub async fn items_of_user(&self, owner_id: i64) -> AppResult<Vec<ItemDetails>> {
        if !self.repository.users.exists(owner_id).await? {
            return Err(AppError::NotFound(format!(
                "User with id {} not found",
                owner_id
            )));
        }

        let items = self.repository.items.find_by_owner(owner_id).await?;
        let item_ids: Vec<i64> = items.iter().map(|i| i.id).collect();

        let mut comments_by_item: HashMap<i64, Vec<_>> = HashMap::new();
        for (item_id, comment) in self.repository.comments.find_by_items(&item_ids).await? {
            comments_by_item.entry(item_id).or_default().push(comment);
        }

        let now = Local::now().naive_local();
        let mut result = Vec::with_capacity(items.len());
        for item in items {
            let last_booking = self.repository.bookings.last_for_item(item.id, now).await?;
            let next_booking = self.repository.bookings.next_for_item(item.id, now).await?;
            result.push(ItemDetails {
                comments: comments_by_item.remove(&item.id).unwrap_or_default(),
                id: item.id,
                name: item.name,
                description: item.description,
                available: item.available,
                owner_id: item.owner_id,
                request_id: item.request_id,
                last_booking,
                next_booking,
            });
        }

        Ok(result)
    }

    /// Search available items by substring; blank text yields nothing
    pub async fn search(&self, text: &str) -> AppResult<Vec<Item>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.repository.items.search_available(text).await
    }
}
