//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250401_000001_create_user_table;
mod m20250401_000002_create_channel_table;
mod m20250401_000003_create_subscription_table;
mod m20250401_000004_create_video_table;
mod m20250401_000005_create_video_like_table;
mod m20250401_000006_create_video_view_table;
mod m20250401_000007_create_comment_table;
mod m20250401_000008_create_history_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250401_000001_create_user_table::Migration),
            Box::new(m20250401_000002_create_channel_table::Migration),
            Box::new(m20250401_000003_create_subscription_table::Migration),
            Box::new(m20250401_000004_create_video_table::Migration),
            Box::new(m20250401_000005_create_video_like_table::Migration),
            Box::new(m20250401_000006_create_video_view_table::Migration),
            Box::new(m20250401_000007_create_comment_table::Migration),
            Box::new(m20250401_000008_create_history_table::Migration),
        ]
    }
}
