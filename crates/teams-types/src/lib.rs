pub mod activity;
pub mod context;

pub use activity::{Activity, ActivityType, ChannelAccount, ConversationAccount};
pub use context::TurnContext;
