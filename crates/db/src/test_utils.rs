//! Test utilities for database operations.
//!
//! Model factories shared by repository and service tests. The tests
//! themselves run against `sea_orm::MockDatabase`, so these helpers only
//! build in-memory models.

#![allow(clippy::missing_panics_doc)]

use chrono::Utc;

use crate::entities::{channel, comment, user, video};

/// Build a user model for tests.
#[must_use]
pub fn mock_user(id: &str, uid: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        uid: uid.to_string(),
        name: Some("Test User".to_string()),
        email: Some("test@example.com".to_string()),
        avatar_url: None,
        bio: None,
        role: "user".to_string(),
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

/// Build a channel model for tests.
#[must_use]
pub fn mock_channel(id: &str, owner_id: &str, name: &str) -> channel::Model {
    channel::Model {
        id: id.to_string(),
        owner_id: owner_id.to_string(),
        name: name.to_string(),
        description: None,
        avatar_url: None,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

/// Build a public video model for tests.
#[must_use]
pub fn mock_video(id: &str, channel_id: &str, title: &str, views: i64) -> video::Model {
    video::Model {
        id: id.to_string(),
        channel_id: channel_id.to_string(),
        title: title.to_string(),
        description: None,
        video_url: format!("/media/videos/{id}.mp4"),
        thumbnail_url: format!("/media/thumbnails/{id}.png"),
        tags: serde_json::json!([]),
        category: None,
        visibility: video::VISIBILITY_PUBLIC.to_string(),
        views,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

/// Build a comment model for tests.
#[must_use]
pub fn mock_comment(
    id: &str,
    video_id: &str,
    user_id: &str,
    parent_id: Option<&str>,
) -> comment::Model {
    comment::Model {
        id: id.to_string(),
        video_id: video_id.to_string(),
        user_id: user_id.to_string(),
        text: "Nice video".to_string(),
        parent_id: parent_id.map(ToString::to_string),
        created_at: Utc::now().into(),
    }
}
