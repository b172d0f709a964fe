//! Channel analytics service.

use chrono::{Duration, Utc};
use clipstream_common::{AppError, AppResult};
use clipstream_db::entities::video;
use clipstream_db::repositories::{ChannelRepository, SubscriptionRepository, VideoRepository};

/// Assumed average watch length per view, in minutes. Playback telemetry is
/// not collected, so watch time is an estimate derived from the view counter.
const ASSUMED_MINUTES_PER_VIEW: i64 = 3;

/// Window for the recent-views figure.
const RECENT_WINDOW_HOURS: i64 = 48;

/// How many top videos the overview carries.
const TOP_VIDEOS: u64 = 3;

/// Aggregated figures for a channel owner's dashboard.
#[derive(Debug, Clone)]
pub struct ChannelAnalytics {
    pub channel_id: String,
    pub total_views: i64,
    pub watch_time_hours: f64,
    pub total_subscribers: u64,
    pub views_last_48h: i64,
    pub top_videos: Vec<video::Model>,
}

/// Service computing per-channel analytics.
#[derive(Clone)]
pub struct AnalyticsService {
    channel_repo: ChannelRepository,
    video_repo: VideoRepository,
    subscription_repo: SubscriptionRepository,
}

impl AnalyticsService {
    /// Create a new analytics service.
    #[must_use]
    pub const fn new(
        channel_repo: ChannelRepository,
        video_repo: VideoRepository,
        subscription_repo: SubscriptionRepository,
    ) -> Self {
        Self {
            channel_repo,
            video_repo,
            subscription_repo,
        }
    }

    /// Dashboard overview for the caller's channel.
    ///
    /// The caller's first channel is the dashboard subject; owners without a
    /// channel get a not-found rather than an empty report.
    pub async fn overview(&self, owner_id: &str) -> AppResult<ChannelAnalytics> {
        let channels = self.channel_repo.find_by_owner(owner_id).await?;
        let Some(channel) = channels.into_iter().next() else {
            return Err(AppError::ChannelNotFound);
        };

        let videos = self.video_repo.find_by_channel(&channel.id).await?;
        let total_views: i64 = videos.iter().map(|v| v.views).sum();

        let total_subscribers = self.subscription_repo.count_for_channel(&channel.id).await?;

        let since = (Utc::now() - Duration::hours(RECENT_WINDOW_HOURS)).into();
        let recent = self.video_repo.find_updated_since(&channel.id, since).await?;
        let views_last_48h: i64 = recent.iter().map(|v| v.views).sum();

        let top_videos = self
            .video_repo
            .find_top_by_channel(&channel.id, TOP_VIDEOS)
            .await?;

        Ok(ChannelAnalytics {
            channel_id: channel.id,
            total_views,
            watch_time_hours: estimate_watch_time_hours(total_views),
            total_subscribers,
            views_last_48h,
            top_videos,
        })
    }
}

/// Estimated watch hours from a view count, rounded to one decimal.
fn estimate_watch_time_hours(views: i64) -> f64 {
    let hours = (views * ASSUMED_MINUTES_PER_VIEW) as f64 / 60.0;
    (hours * 10.0).round() / 10.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clipstream_db::entities::channel;
    use clipstream_db::test_utils::{mock_channel, mock_video};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn service(db: Arc<DatabaseConnection>) -> AnalyticsService {
        AnalyticsService::new(
            ChannelRepository::new(db.clone()),
            VideoRepository::new(db.clone()),
            SubscriptionRepository::new(db),
        )
    }

    #[test]
    fn test_estimate_watch_time_hours() {
        assert!((estimate_watch_time_hours(0) - 0.0).abs() < f64::EPSILON);
        // 100 views * 3 min = 300 min = 5 h
        assert!((estimate_watch_time_hours(100) - 5.0).abs() < f64::EPSILON);
        // 7 views * 3 min = 21 min = 0.35 h, rounds to 0.4
        assert!((estimate_watch_time_hours(7) - 0.4).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_overview_without_channel() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<channel::Model>::new()])
                .into_connection(),
        );

        let result = service(db).overview("u1").await;

        assert!(matches!(result, Err(AppError::ChannelNotFound)));
    }

    #[tokio::test]
    async fn test_overview_sums_views() {
        let v1 = mock_video("v1", "ch1", "First", 100);
        let v2 = mock_video("v2", "ch1", "Second", 40);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // owned channels
                .append_query_results([[mock_channel("ch1", "u1", "Mine")]])
                // all channel videos
                .append_query_results([[v1.clone(), v2.clone()]])
                // subscriber count
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(12)),
                }]])
                // recently updated
                .append_query_results([[v2]])
                // top videos
                .append_query_results([[v1]])
                .into_connection(),
        );

        let overview = service(db).overview("u1").await.unwrap();

        assert_eq!(overview.channel_id, "ch1");
        assert_eq!(overview.total_views, 140);
        assert_eq!(overview.total_subscribers, 12);
        assert_eq!(overview.views_last_48h, 40);
        // 140 views * 3 min = 420 min = 7 h
        assert!((overview.watch_time_hours - 7.0).abs() < f64::EPSILON);
        assert_eq!(overview.top_videos.len(), 1);
    }
}
