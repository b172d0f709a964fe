//! Business logic services.
//!
//! One service per resource domain. Services own validation and the
//! cross-repository sequencing; raw queries stay in the repositories.

pub mod analytics;
pub mod channel;
pub mod comment;
pub mod history;
pub mod subscription;
pub mod user;
pub mod video;

pub use analytics::{AnalyticsService, ChannelAnalytics};
pub use channel::{ChannelPage, ChannelService, CreateChannelInput, UpdateChannelInput};
pub use comment::{CommentService, CreateCommentInput};
pub use history::{HistoryEntry, HistoryService};
pub use subscription::{SubscriptionService, SubscriptionStatus};
pub use user::{UserService, UpdateProfileInput};
pub use video::{FilePart, LikeStatus, UploadVideoInput, VideoService};
