//! Channel directory service.

use chrono::Utc;
use clipstream_common::config::ChannelConfig;
use clipstream_common::{AppError, AppResult, id::IdGenerator};
use clipstream_db::entities::{channel, user, video};
use clipstream_db::repositories::{
    ChannelRepository, SubscriptionRepository, UserRepository, VideoRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a channel.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateChannelInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(max = 2048))]
    pub description: Option<String>,
    pub avatar_url: Option<String>,
}

/// Input for updating a channel.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChannelInput {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[validate(length(max = 2048))]
    pub description: Option<String>,
    pub avatar_url: Option<String>,
}

/// Public channel page: channel, owner profile, derived subscriber count, and
/// public videos.
#[derive(Debug, Clone)]
pub struct ChannelPage {
    pub channel: channel::Model,
    pub owner: Option<user::Model>,
    pub subscriber_count: u64,
    pub videos: Vec<video::Model>,
}

/// Service for managing channels.
#[derive(Clone)]
pub struct ChannelService {
    channel_repo: ChannelRepository,
    user_repo: UserRepository,
    subscription_repo: SubscriptionRepository,
    video_repo: VideoRepository,
    policy: ChannelConfig,
    id_gen: IdGenerator,
}

impl ChannelService {
    /// Create a new channel service.
    #[must_use]
    pub const fn new(
        channel_repo: ChannelRepository,
        user_repo: UserRepository,
        subscription_repo: SubscriptionRepository,
        video_repo: VideoRepository,
        policy: ChannelConfig,
    ) -> Self {
        Self {
            channel_repo,
            user_repo,
            subscription_repo,
            video_repo,
            policy,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get a channel by ID.
    pub async fn get_by_id(&self, id: &str) -> AppResult<channel::Model> {
        self.channel_repo.get_by_id(id).await
    }

    /// Get a channel by ID with ownership check.
    pub async fn get_by_id_for_owner(&self, id: &str, user_id: &str) -> AppResult<channel::Model> {
        let channel = self.channel_repo.get_by_id(id).await?;

        if channel.owner_id != user_id {
            return Err(AppError::Forbidden("Not the channel owner".to_string()));
        }

        Ok(channel)
    }

    /// Create a new channel.
    pub async fn create(
        &self,
        owner_id: &str,
        input: CreateChannelInput,
    ) -> AppResult<channel::Model> {
        input.validate()?;

        if input.name.trim().is_empty() {
            return Err(AppError::Validation("Channel name is required".to_string()));
        }

        if self.policy.single_per_owner {
            let count = self.channel_repo.count_by_owner(owner_id).await?;
            if count > 0 {
                return Err(AppError::Conflict(
                    "You already own a channel".to_string(),
                ));
            }
        }

        let model = channel::ActiveModel {
            id: Set(self.id_gen.generate()),
            owner_id: Set(owner_id.to_string()),
            name: Set(input.name),
            description: Set(input.description),
            avatar_url: Set(input.avatar_url),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let channel = self.channel_repo.create(model).await?;
        tracing::info!(channel_id = %channel.id, owner_id = %channel.owner_id, "channel created");

        Ok(channel)
    }

    /// Update a channel. The caller must own it.
    pub async fn update(
        &self,
        channel_id: &str,
        caller_id: &str,
        input: UpdateChannelInput,
    ) -> AppResult<channel::Model> {
        input.validate()?;

        let channel = self.get_by_id_for_owner(channel_id, caller_id).await?;

        let mut active: channel::ActiveModel = channel.into();

        if let Some(name) = input.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("Channel name is required".to_string()));
            }
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(avatar_url) = input.avatar_url {
            active.avatar_url = Set(Some(avatar_url));
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.channel_repo.update(active).await
    }

    /// Assemble the public channel page.
    pub async fn page(&self, channel_id: &str) -> AppResult<ChannelPage> {
        let channel = self.channel_repo.get_by_id(channel_id).await?;
        let owner = self.user_repo.find_by_id(&channel.owner_id).await?;
        let subscriber_count = self.subscription_repo.count_for_channel(channel_id).await?;
        let videos = self.video_repo.find_public_by_channel(channel_id).await?;

        Ok(ChannelPage {
            channel,
            owner,
            subscriber_count,
            videos,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clipstream_db::test_utils::mock_channel;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn service(db: Arc<DatabaseConnection>, policy: ChannelConfig) -> ChannelService {
        ChannelService::new(
            ChannelRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            SubscriptionRepository::new(db.clone()),
            VideoRepository::new(db),
            policy,
        )
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = service(db, ChannelConfig::default());

        let input = CreateChannelInput {
            name: "   ".to_string(),
            description: None,
            avatar_url: None,
        };

        let result = service.create("u1", input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_enforces_single_channel_policy() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1)),
                }]])
                .into_connection(),
        );
        let service = service(
            db,
            ChannelConfig {
                single_per_owner: true,
            },
        );

        let input = CreateChannelInput {
            name: "Second Channel".to_string(),
            description: None,
            avatar_url: None,
        };

        let result = service.create("u1", input).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_forbidden_for_non_owner() {
        let channel = mock_channel("ch1", "u1", "My Channel");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[channel]])
                .into_connection(),
        );
        let service = service(db, ChannelConfig::default());

        let result = service
            .update("ch1", "u2", UpdateChannelInput::default())
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<channel::Model>::new()])
                .into_connection(),
        );
        let service = service(db, ChannelConfig::default());

        let result = service
            .update("missing", "u1", UpdateChannelInput::default())
            .await;

        assert!(matches!(result, Err(AppError::ChannelNotFound)));
    }
}
