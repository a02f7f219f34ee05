pub mod like;
pub mod playlist;
pub mod subscription;
pub mod user;
pub mod video;

pub use like::{Like, LikeTarget};
pub use playlist::{Playlist, PlaylistDetail, PlaylistDetailRow, PlaylistSummary, PlaylistVideo};
pub use subscription::{SubscribedChannel, SubscribedChannelRow, SubscriberEntry, Subscription};
pub use user::{ChannelProfile, ChannelSnippet, OwnerSnippet, PublicUser, User};
pub use video::{Video, VideoDetail, VideoSummary};
