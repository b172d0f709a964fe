//! Watch history entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-(viewer, video) last-watched record with upsert semantics.
///
/// Unique per `(viewer_id, video_id)`; re-watching updates `last_watched_at`
/// instead of inserting a second row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The watching user.
    #[sea_orm(indexed)]
    pub viewer_id: String,

    /// The watched video.
    #[sea_orm(indexed)]
    pub video_id: String,

    /// When the viewer last watched the video.
    pub last_watched_at: DateTimeWithTimeZone,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ViewerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Viewer,

    #[sea_orm(
        belongs_to = "super::video::Entity",
        from = "Column::VideoId",
        to = "super::video::Column::Id",
        on_delete = "Cascade"
    )]
    Video,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Viewer.def()
    }
}

impl Related<super::video::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Video.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
