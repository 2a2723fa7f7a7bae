//! Generic data and items CRUD client methods

use reqwest::Method;
use serde_json::Value;

use super::SocietyClient;
use crate::error::ClientError;

impl SocietyClient {
    /// Fetch the generic data blob via `GET /api/data`
    ///
    /// # Errors
    ///
    /// Propagates request construction and execution errors.
    pub async fn fetch_data(&self) -> Result<Value, ClientError> {
        let path = self.config().endpoints.data.clone();
        self.get(&path).await
    }

    /// List all items via `GET /api/items`
    ///
    /// # Errors
    ///
    /// Propagates request construction and execution errors.
    pub async fn get_items(&self) -> Result<Value, ClientError> {
        let path = self.config().endpoints.items.clone();
        self.get(&path).await
    }

    /// Fetch one item via `GET /api/items/:id`
    ///
    /// # Errors
    ///
    /// Propagates request construction and execution errors.
    pub async fn get_item(&self, id: &str) -> Result<Value, ClientError> {
        let path = format!("{}/{id}", self.config().endpoints.items);
        self.get(&path).await
    }

    /// Create an item via `POST /api/items`
    ///
    /// # Errors
    ///
    /// Propagates request construction and execution errors.
    pub async fn create_item(&self, item: &Value) -> Result<Value, ClientError> {
        let path = self.config().endpoints.items.clone();
        self.post(&path, item).await
    }

    /// Update an item via `PUT /api/items/:id`
    ///
    /// # Errors
    ///
    /// Propagates request construction and execution errors.
    pub async fn update_item(&self, id: &str, updates: &Value) -> Result<Value, ClientError> {
        let path = format!("{}/{id}", self.config().endpoints.items);
        let request = self.request(Method::PUT, &path)?.json(updates);
        self.execute(request).await
    }

    /// Delete an item via `DELETE /api/items/:id`
    ///
    /// # Errors
    ///
    /// Propagates request construction and execution errors.
    pub async fn delete_item(&self, id: &str) -> Result<Value, ClientError> {
        let path = format!("{}/{id}", self.config().endpoints.items);
        let request = self.request(Method::DELETE, &path)?;
        self.execute(request).await
    }
}
