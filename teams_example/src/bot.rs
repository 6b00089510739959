use std::sync::Arc;

use teams_ai::{
    CancellationToken, SaveSummary, StateConfig, StateError, Storage, TurnContext, TurnState,
};

pub const RESET_COMMAND: &str = "/reset";
pub const FORGET_COMMAND: &str = "/forget";

/// Counts messages per conversation and per user.
///
/// `/reset` deletes the conversation scope, `/forget` deletes the user scope.
pub struct CounterBot {
    storage: Arc<dyn Storage>,
    state_config: StateConfig,
}

impl CounterBot {
    pub fn new(storage: Arc<dyn Storage>, state_config: StateConfig) -> Self {
        Self {
            storage,
            state_config,
        }
    }

    /// Run one turn: load state, reply, save state.
    pub async fn on_turn(
        &self,
        ctx: &mut TurnContext,
        cancel: &CancellationToken,
    ) -> Result<SaveSummary, StateError> {
        let mut state = TurnState::with_config(self.state_config.clone());
        state
            .load_state(Some(self.storage.as_ref()), ctx, cancel)
            .await?;

        if !ctx.activity().is_message() {
            tracing::debug!(
                activity_type = %ctx.activity().activity_type,
                "Ignoring non-message activity"
            );
            return state.save_state(Some(self.storage.as_ref()), ctx, cancel).await;
        }

        let text = ctx.activity().text.clone().unwrap_or_default();
        {
            let mut temp = state.temp_state()?;
            temp.set_original_input(text.as_str());
            temp.set_input(text.trim());
        }

        let reply = match text.trim() {
            RESET_COMMAND => {
                state.delete_conversation_state()?;
                "Conversation state cleared.".to_string()
            }
            FORGET_COMMAND => {
                state.delete_user_state()?;
                "I forgot everything about you.".to_string()
            }
            _ => {
                let count = state
                    .get_value_as::<u64>("conversation.count")?
                    .unwrap_or(0)
                    + 1;
                state.set_value("conversation.count", count)?;

                let turns = state.get_value_as::<u64>("user.turns")?.unwrap_or(0) + 1;
                state.set_value("user.turns", turns)?;

                format!("[{count}] You said: {text} (your message #{turns})")
            }
        };

        state.temp_state()?.set_last_output(reply.as_str());
        ctx.send_text(reply);

        state
            .save_state(Some(self.storage.as_ref()), ctx, cancel)
            .await
    }
}
