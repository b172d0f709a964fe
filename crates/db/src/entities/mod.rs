//! Database entities.

pub mod channel;
pub mod comment;
pub mod history;
pub mod subscription;
pub mod user;
pub mod video;
pub mod video_like;
pub mod video_view;

pub use channel::Entity as Channel;
pub use comment::Entity as Comment;
pub use history::Entity as History;
pub use subscription::Entity as Subscription;
pub use user::Entity as User;
pub use video::Entity as Video;
pub use video_like::Entity as VideoLike;
pub use video_view::Entity as VideoView;
