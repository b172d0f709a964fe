//! Video entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Public visibility value.
pub const VISIBILITY_PUBLIC: &str = "public";
/// Restricted visibility value.
pub const VISIBILITY_PRIVATE: &str = "private";

/// A content item owned by exactly one channel.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "video")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning channel.
    #[sea_orm(indexed)]
    pub channel_id: String,

    /// Video title.
    pub title: String,

    /// Description (optional).
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Durable URL of the stored media.
    pub video_url: String,

    /// Durable URL of the stored thumbnail.
    pub thumbnail_url: String,

    /// Ordered tag list.
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,

    /// Category (optional).
    #[sea_orm(nullable, indexed)]
    pub category: Option<String>,

    /// `public` or `private`.
    pub visibility: String,

    /// Monotonic view counter, advanced at most once per identified viewer.
    pub views: i64,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Whether this video is publicly visible.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.visibility == VISIBILITY_PUBLIC
    }

    /// Tags as a string vector.
    #[must_use]
    pub fn tag_list(&self) -> Vec<String> {
        serde_json::from_value(self.tags.clone()).unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::channel::Entity",
        from = "Column::ChannelId",
        to = "super::channel::Column::Id",
        on_delete = "Cascade"
    )]
    Channel,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,

    #[sea_orm(has_many = "super::video_view::Entity")]
    Views,

    #[sea_orm(has_many = "super::video_like::Entity")]
    Likes,
}

impl Related<super::channel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Channel.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
