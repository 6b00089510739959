use crate::activity::Activity;

/// Per-turn context handed to bot handlers.
///
/// Wraps the incoming [`Activity`]; outgoing replies collected during the turn
/// are kept in order so callers (and tests) can inspect them.
#[derive(Debug, Clone)]
pub struct TurnContext {
    activity: Activity,
    responses: Vec<Activity>,
}

impl TurnContext {
    pub fn new(activity: Activity) -> Self {
        Self {
            activity,
            responses: Vec::new(),
        }
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    /// Queue a text reply addressed back to the sender.
    pub fn send_text(&mut self, text: impl Into<String>) -> &Activity {
        let mut reply = Activity::message(text);
        reply.channel_id = self.activity.channel_id.clone();
        reply.conversation = self.activity.conversation.clone();
        reply.from = self.activity.recipient.clone();
        reply.recipient = self.activity.from.clone();
        self.responses.push(reply);
        &self.responses[self.responses.len() - 1]
    }

    pub fn responses(&self) -> &[Activity] {
        &self.responses
    }
}

impl From<Activity> for TurnContext {
    fn from(activity: Activity) -> Self {
        Self::new(activity)
    }
}
