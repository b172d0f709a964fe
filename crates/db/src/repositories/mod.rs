//! Database repositories.
//!
//! Repositories wrap the sea-orm query layer and are the only place raw
//! queries live. Each returns `AppResult` with database failures mapped to
//! `AppError::Database`.

mod channel;
mod comment;
mod history;
mod subscription;
mod user;
mod video;

pub use channel::ChannelRepository;
pub use comment::CommentRepository;
pub use history::HistoryRepository;
pub use subscription::SubscriptionRepository;
pub use user::UserRepository;
pub use video::VideoRepository;
