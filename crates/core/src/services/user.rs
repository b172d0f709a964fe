//! User directory service.

use chrono::Utc;
use clipstream_common::{AppResult, IdentityClaims, id::IdGenerator};
use clipstream_db::entities::user;
use clipstream_db::repositories::UserRepository;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Fallback display name when the provider shares none.
const DEFAULT_DISPLAY_NAME: &str = "New User";

/// Input for updating the caller's profile.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[validate(length(max = 2048))]
    pub bio: Option<String>,
    /// Set by the upload path after the avatar file is stored.
    #[serde(skip)]
    pub avatar_url: Option<String>,
}

/// Service for the user directory.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Find a user by external identity id.
    pub async fn find_by_uid(&self, uid: &str) -> AppResult<Option<user::Model>> {
        self.user_repo.find_by_uid(uid).await
    }

    /// Create-if-absent from verified identity claims.
    ///
    /// The uid is the sync key; an existing record is returned untouched
    /// (profile edits never round-trip through the provider).
    pub async fn sync(&self, claims: &IdentityClaims) -> AppResult<user::Model> {
        if let Some(user) = self.user_repo.find_by_uid(&claims.uid).await? {
            return Ok(user);
        }

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            uid: Set(claims.uid.clone()),
            name: Set(Some(
                claims
                    .name
                    .clone()
                    .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string()),
            )),
            email: Set(claims.email.clone()),
            avatar_url: Set(claims.picture.clone()),
            bio: Set(None),
            role: Set("user".to_string()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let user = self.user_repo.create(model).await?;
        tracing::info!(user_id = %user.id, "user provisioned from identity sync");

        Ok(user)
    }

    /// Update the caller's profile.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;
        let mut active: user::ActiveModel = user.into();

        if let Some(name) = input.name {
            active.name = Set(Some(name));
        }
        if let Some(bio) = input.bio {
            active.bio = Set(Some(bio));
        }
        if let Some(avatar_url) = input.avatar_url {
            active.avatar_url = Set(Some(avatar_url));
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(active).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clipstream_db::test_utils::mock_user;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn claims(uid: &str) -> IdentityClaims {
        IdentityClaims {
            uid: uid.to_string(),
            email: Some("ada@example.com".to_string()),
            name: Some("Ada".to_string()),
            picture: None,
            aud: None,
        }
    }

    #[tokio::test]
    async fn test_sync_returns_existing_user() {
        let existing = mock_user("u1", "ext-1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing.clone()]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let user = service.sync(&claims("ext-1")).await.unwrap();

        assert_eq!(user.id, "u1");
    }

    #[tokio::test]
    async fn test_sync_creates_when_absent() {
        let created = mock_user("u2", "ext-2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // find_by_uid: no match
                .append_query_results([Vec::<clipstream_db::entities::user::Model>::new()])
                // insert exec + returning select
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[created.clone()]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let user = service.sync(&claims("ext-2")).await.unwrap();

        assert_eq!(user.uid, "ext-2");
    }

    #[tokio::test]
    async fn test_update_profile_rejects_empty_name() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = UserService::new(UserRepository::new(db));

        let input = UpdateProfileInput {
            name: Some(String::new()),
            ..Default::default()
        };

        assert!(service.update_profile("u1", input).await.is_err());
    }
}
