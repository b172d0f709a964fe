//! Video view entity (per-viewer view dedup record).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Dedup record for the view counter.
///
/// At most one row per `(video_id, viewer_id)`; the row's existence is the
/// sole gate for incrementing the video's view counter.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "video_view")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The viewed video.
    #[sea_orm(indexed)]
    pub video_id: String,

    /// The identified viewer. Anonymous views never create a row.
    #[sea_orm(indexed)]
    pub viewer_id: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::video::Entity",
        from = "Column::VideoId",
        to = "super::video::Column::Id",
        on_delete = "Cascade"
    )]
    Video,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ViewerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Viewer,
}

impl Related<super::video::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Video.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Viewer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
