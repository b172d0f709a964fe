//! Channel repository.

use std::sync::Arc;

use clipstream_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder,
};

use crate::entities::{Channel, channel};

/// Repository for channel operations.
#[derive(Clone)]
pub struct ChannelRepository {
    db: Arc<DatabaseConnection>,
}

impl ChannelRepository {
    /// Create a new channel repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find channel by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<channel::Model>> {
        Channel::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get channel by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<channel::Model> {
        self.find_by_id(id).await?.ok_or(AppError::ChannelNotFound)
    }

    /// Find channels owned by a user, newest first.
    pub async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<channel::Model>> {
        Channel::find()
            .filter(channel::Column::OwnerId.eq(owner_id))
            .order_by(channel::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count channels owned by a user.
    pub async fn count_by_owner(&self, owner_id: &str) -> AppResult<u64> {
        Channel::find()
            .filter(channel::Column::OwnerId.eq(owner_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new channel.
    pub async fn create(&self, model: channel::ActiveModel) -> AppResult<channel::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a channel.
    pub async fn update(&self, model: channel::ActiveModel) -> AppResult<channel::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::mock_channel;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_by_id() {
        let channel = mock_channel("ch1", "u1", "My Channel");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[channel.clone()]])
                .into_connection(),
        );

        let repo = ChannelRepository::new(db);
        let result = repo.find_by_id("ch1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().name, "My Channel");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<channel::Model>::new()])
                .into_connection(),
        );

        let repo = ChannelRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::ChannelNotFound)));
    }

    #[tokio::test]
    async fn test_find_by_owner() {
        let ch1 = mock_channel("ch1", "u1", "Channel 1");
        let ch2 = mock_channel("ch2", "u1", "Channel 2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[ch1, ch2]])
                .into_connection(),
        );

        let repo = ChannelRepository::new(db);
        let result = repo.find_by_owner("u1").await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
