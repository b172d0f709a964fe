//! Subscription ledger repository.

use std::sync::Arc;

use chrono::Utc;
use clipstream_common::{AppError, AppResult};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::{Subscription, subscription};

/// Repository for subscription edge operations.
///
/// The `(subscriber_id, channel_id)` uniqueness invariant is enforced by the
/// database index; inserts go through `ON CONFLICT DO NOTHING` so concurrent
/// toggles cannot create duplicate edges.
#[derive(Clone)]
pub struct SubscriptionRepository {
    db: Arc<DatabaseConnection>,
}

impl SubscriptionRepository {
    /// Create a new subscription repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the edge for a (subscriber, channel) pair.
    pub async fn find_edge(
        &self,
        subscriber_id: &str,
        channel_id: &str,
    ) -> AppResult<Option<subscription::Model>> {
        Subscription::find()
            .filter(subscription::Column::SubscriberId.eq(subscriber_id))
            .filter(subscription::Column::ChannelId.eq(channel_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether a subscriber follows a channel.
    pub async fn is_subscribed(&self, subscriber_id: &str, channel_id: &str) -> AppResult<bool> {
        Ok(self.find_edge(subscriber_id, channel_id).await?.is_some())
    }

    /// Insert a subscription edge.
    ///
    /// Returns `true` if the edge was inserted, `false` if it already existed
    /// (a concurrent toggle won the race).
    pub async fn insert_edge(
        &self,
        id: String,
        subscriber_id: String,
        channel_id: String,
    ) -> AppResult<bool> {
        let model = subscription::ActiveModel {
            id: Set(id),
            subscriber_id: Set(subscriber_id),
            channel_id: Set(channel_id),
            created_at: Set(Utc::now().into()),
        };

        let inserted = Subscription::insert(model)
            .on_conflict(
                OnConflict::columns([
                    subscription::Column::SubscriberId,
                    subscription::Column::ChannelId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(inserted > 0)
    }

    /// Delete the edge for a (subscriber, channel) pair.
    ///
    /// Returns `true` if an edge was deleted.
    pub async fn delete_edge(&self, subscriber_id: &str, channel_id: &str) -> AppResult<bool> {
        let deleted = Subscription::delete_many()
            .filter(subscription::Column::SubscriberId.eq(subscriber_id))
            .filter(subscription::Column::ChannelId.eq(channel_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(deleted.rows_affected > 0)
    }

    /// Count subscribers of a channel.
    pub async fn count_for_channel(&self, channel_id: &str) -> AppResult<u64> {
        Subscription::find()
            .filter(subscription::Column::ChannelId.eq(channel_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of all channels a subscriber follows, newest subscription first.
    pub async fn channel_ids_for(&self, subscriber_id: &str) -> AppResult<Vec<String>> {
        Subscription::find()
            .select_only()
            .column(subscription::Column::ChannelId)
            .filter(subscription::Column::SubscriberId.eq(subscriber_id))
            .order_by(subscription::Column::CreatedAt, Order::Desc)
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn mock_edge(id: &str, subscriber_id: &str, channel_id: &str) -> subscription::Model {
        subscription::Model {
            id: id.to_string(),
            subscriber_id: subscriber_id.to_string(),
            channel_id: channel_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_is_subscribed() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[mock_edge("s1", "u1", "ch1")]])
                .append_query_results([Vec::<subscription::Model>::new()])
                .into_connection(),
        );

        let repo = SubscriptionRepository::new(db);

        assert!(repo.is_subscribed("u1", "ch1").await.unwrap());
        assert!(!repo.is_subscribed("u2", "ch1").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_edge_reports_absence() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = SubscriptionRepository::new(db);
        let deleted = repo.delete_edge("u1", "ch1").await.unwrap();

        assert!(!deleted);
    }
}
