//! Item request log service

use chrono::Local;
use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    models::item::Item,
    models::request::{CreateItemRequest, ItemRequest, ItemRequestDetails},
    repository::Repository,
};

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
}

impl RequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Post a request for an item that is not yet in the catalog
    pub async fn add_request(
        &self,
        requestor_id: i64,
        request: CreateItemRequest,
    ) -> AppResult<ItemRequest> {
        self.repository.users.get_by_id(requestor_id).await?;
        self.repository
            .requests
            .create(requestor_id, &request, Local::now().naive_local())
            .await
    }

    /// Get a request together with the items created in fulfillment of it
    pub async fn get_request(&self, id: i64, caller_id: i64) -> AppResult<ItemRequestDetails> {
        self.repository.users.get_by_id(caller_id).await?;
        let request = self.repository.requests.get_by_id(id).await?;
        let items = self.repository.items.find_by_request(id).await?;

        Ok(ItemRequestDetails {
            id: request.id,
            description: request.description,
            requestor_id: request.requestor_id,
            created: request.created,
            items,
        })
    }

    /// List the caller's own requests, newest first, with fulfilling items
    pub async fn list_own(&self, caller_id: i64) -> AppResult<Vec<ItemRequestDetails>> {
        self.repository.users.get_by_id(caller_id).await?;
        let requests = self.repository.requests.find_by_requestor(caller_id).await?;
        self.attach_items(requests).await
    }

    /// List other users' requests, newest first, paginated, with fulfilling
    /// items
    pub async fn list_others(
        &self,
        caller_id: i64,
        from: i64,
        size: i64,
    ) -> AppResult<Vec<ItemRequestDetails>> {
        self.repository.users.get_by_id(caller_id).await?;
        let requests = self
            .repository
            .requests
            .find_by_other_requestors(caller_id, from, size)
            .await?;
        self.attach_items(requests).await
    }

    async fn attach_items(&self, requests: Vec<ItemRequest>) -> AppResult<Vec<ItemRequestDetails>> {
        let request_ids: Vec<i64> = requests.iter().map(|r| r.id).collect();

        let mut items_by_request: HashMap<i64, Vec<Item>> = HashMap::new();
        for item in self.repository.items.find_by_requests(&request_ids).await? {
            if let Some(request_id) = item.request_id {
                items_by_request.entry(request_id).or_default().push(item);
            }
        }

        Ok(requests
            .into_iter()
            .map(|request| ItemRequestDetails {
                items: items_by_request.remove(&request.id).unwrap_or_default(),
                id: request.id,
                description: request.description,
                requestor_id: request.requestor_id,
                created: request.created,
            })
            .collect())
    }

    /// Delete a request; only its requestor may, and a foreign request is
    /// reported as missing rather than forbidden
    pub async fn delete_request(&self, id: i64, caller_id: i64) -> AppResult<()> {
        self.repository.users.get_by_id(caller_id).await?;
        let request = self.repository.requests.get_by_id(id).await?;

        if request.requestor_id != caller_id {
            return Err(AppError::NotFound(format!(
                "Item request with id {} not found",
                id
            )));
        }

        self.repository.requests.delete(id).await
    }
}
