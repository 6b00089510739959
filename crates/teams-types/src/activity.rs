use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Incoming activity as delivered by the host bot framework.
///
/// Only the fields the state layer and the samples read are modelled; unknown
/// fields in the wire JSON are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type", default = "default_activity_type")]
    pub activity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation: Option<ConversationAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

fn default_activity_type() -> String {
    ActivityType::MESSAGE.to_string()
}

/// Well-known values of [`Activity::activity_type`].
pub struct ActivityType;

impl ActivityType {
    pub const MESSAGE: &'static str = "message";
    pub const CONVERSATION_UPDATE: &'static str = "conversationUpdate";
    pub const INVOKE: &'static str = "invoke";
}

impl Activity {
    /// Create a message activity with a fresh id and timestamp.
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            activity_type: ActivityType::MESSAGE.to_string(),
            id: Some(uuid::Uuid::new_v4().to_string()),
            timestamp: Some(Utc::now()),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    pub fn with_from(mut self, id: impl Into<String>) -> Self {
        self.from = Some(ChannelAccount::new(id));
        self
    }

    pub fn with_recipient(mut self, id: impl Into<String>) -> Self {
        self.recipient = Some(ChannelAccount::new(id));
        self
    }

    pub fn with_conversation(mut self, id: impl Into<String>) -> Self {
        self.conversation = Some(ConversationAccount::new(id));
        self
    }

    pub fn is_message(&self) -> bool {
        self.activity_type == ActivityType::MESSAGE
    }

    pub fn channel_id(&self) -> Option<&str> {
        non_empty(self.channel_id.as_deref())
    }

    /// Id of the bot the activity was addressed to.
    pub fn recipient_id(&self) -> Option<&str> {
        non_empty(self.recipient.as_ref().and_then(|r| r.id.as_deref()))
    }

    pub fn conversation_id(&self) -> Option<&str> {
        non_empty(self.conversation.as_ref().and_then(|c| c.id.as_deref()))
    }

    /// Id of the user that sent the activity.
    pub fn from_id(&self) -> Option<&str> {
        non_empty(self.from.as_ref().and_then(|f| f.id.as_deref()))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAccount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChannelAccount {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationAccount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_group: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

impl ConversationAccount {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}
