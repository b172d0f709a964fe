//! Subscription ledger service.

use clipstream_common::{AppError, AppResult, id::IdGenerator};
use clipstream_db::entities::video;
use clipstream_db::repositories::{ChannelRepository, SubscriptionRepository, VideoRepository};
use serde::Serialize;

/// Result of a toggle or status query: the caller's relationship to the
/// channel plus its current subscriber count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatus {
    pub subscribed: bool,
    pub subscriber_count: u64,
}

/// Service for the subscription ledger.
#[derive(Clone)]
pub struct SubscriptionService {
    subscription_repo: SubscriptionRepository,
    channel_repo: ChannelRepository,
    video_repo: VideoRepository,
    id_gen: IdGenerator,
}

impl SubscriptionService {
    /// Create a new subscription service.
    #[must_use]
    pub const fn new(
        subscription_repo: SubscriptionRepository,
        channel_repo: ChannelRepository,
        video_repo: VideoRepository,
    ) -> Self {
        Self {
            subscription_repo,
            channel_repo,
            video_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Toggle the caller's subscription to a channel.
    ///
    /// An existing edge is removed, a missing edge is created. Duplicate edges
    /// from concurrent toggles are absorbed by the unique index, so the
    /// returned state always reflects what the database holds.
    pub async fn toggle(&self, subscriber_id: &str, channel_id: &str) -> AppResult<SubscriptionStatus> {
        let channel = self.channel_repo.get_by_id(channel_id).await?;

        if channel.owner_id == subscriber_id {
            return Err(AppError::BadRequest(
                "You cannot subscribe to your own channel".to_string(),
            ));
        }

        let subscribed = if self
            .subscription_repo
            .is_subscribed(subscriber_id, channel_id)
            .await?
        {
            self.subscription_repo
                .delete_edge(subscriber_id, channel_id)
                .await?;
            false
        } else {
            self.subscription_repo
                .insert_edge(
                    self.id_gen.generate(),
                    subscriber_id.to_string(),
                    channel_id.to_string(),
                )
                .await?;
            true
        };

        let subscriber_count = self.subscription_repo.count_for_channel(channel_id).await?;

        Ok(SubscriptionStatus {
            subscribed,
            subscriber_count,
        })
    }

    /// Report the caller's subscription state for a channel.
    pub async fn status(&self, subscriber_id: &str, channel_id: &str) -> AppResult<SubscriptionStatus> {
        self.channel_repo.get_by_id(channel_id).await?;

        let subscribed = self
            .subscription_repo
            .is_subscribed(subscriber_id, channel_id)
            .await?;
        let subscriber_count = self.subscription_repo.count_for_channel(channel_id).await?;

        Ok(SubscriptionStatus {
            subscribed,
            subscriber_count,
        })
    }

    /// Public videos from all channels the caller subscribes to, newest first.
    pub async fn feed(&self, subscriber_id: &str) -> AppResult<Vec<video::Model>> {
        let channel_ids = self.subscription_repo.channel_ids_for(subscriber_id).await?;
        self.video_repo.find_public_by_channels(&channel_ids).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clipstream_db::entities::{channel, subscription};
    use clipstream_db::test_utils::mock_channel;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn service(db: Arc<DatabaseConnection>) -> SubscriptionService {
        SubscriptionService::new(
            SubscriptionRepository::new(db.clone()),
            ChannelRepository::new(db.clone()),
            VideoRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_toggle_rejects_own_channel() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[mock_channel("ch1", "u1", "Mine")]])
                .into_connection(),
        );

        let result = service(db).toggle("u1", "ch1").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_toggle_unknown_channel() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<channel::Model>::new()])
                .into_connection(),
        );

        let result = service(db).toggle("u1", "missing").await;

        assert!(matches!(result, Err(AppError::ChannelNotFound)));
    }

    #[tokio::test]
    async fn test_toggle_subscribes_when_no_edge() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // channel lookup
                .append_query_results([[mock_channel("ch1", "owner", "Theirs")]])
                // edge lookup: absent
                .append_query_results([Vec::<subscription::Model>::new()])
                // insert_edge
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                // count_for_channel
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(5)),
                }]])
                .into_connection(),
        );

        let status = service(db).toggle("u1", "ch1").await.unwrap();

        assert!(status.subscribed);
        assert_eq!(status.subscriber_count, 5);
    }
}
