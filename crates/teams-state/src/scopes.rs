use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use serde_json::Value;

use crate::record::Record;

/// Typed view over the temp scope.
///
/// Names the well-known keys the SDK keeps in temp state during a turn; the
/// underlying [`Record`] stays reachable through `Deref`.
pub struct TempState<'a> {
    record: &'a mut Record,
}

impl<'a> TempState<'a> {
    pub const INPUT_KEY: &'static str = "input";
    pub const ORIGINAL_INPUT_KEY: &'static str = "originalInput";
    pub const LAST_OUTPUT_KEY: &'static str = "lastOutput";
    pub const ACTION_OUTPUTS_KEY: &'static str = "actionOutputs";
    pub const AUTH_TOKENS_KEY: &'static str = "authTokens";
    pub const DUPLICATE_TOKEN_EXCHANGE_KEY: &'static str = "duplicateTokenExchange";

    pub fn new(record: &'a mut Record) -> Self {
        Self { record }
    }

    /// Input passed to the model for this turn.
    pub fn input(&self) -> Option<&str> {
        self.str_value(Self::INPUT_KEY)
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.record.insert(Self::INPUT_KEY, Value::String(input.into()));
    }

    /// Text of the incoming activity before any rewriting.
    pub fn original_input(&self) -> Option<&str> {
        self.str_value(Self::ORIGINAL_INPUT_KEY)
    }

    pub fn set_original_input(&mut self, input: impl Into<String>) {
        self.record
            .insert(Self::ORIGINAL_INPUT_KEY, Value::String(input.into()));
    }

    pub fn last_output(&self) -> Option<&str> {
        self.str_value(Self::LAST_OUTPUT_KEY)
    }

    pub fn set_last_output(&mut self, output: impl Into<String>) {
        self.record
            .insert(Self::LAST_OUTPUT_KEY, Value::String(output.into()));
    }

    pub fn action_outputs(&self) -> HashMap<String, String> {
        self.string_map(Self::ACTION_OUTPUTS_KEY)
    }

    pub fn set_action_output(&mut self, action: impl Into<String>, output: impl Into<String>) {
        self.insert_into_map(Self::ACTION_OUTPUTS_KEY, action.into(), output.into());
    }

    /// Tokens obtained by sign-in flows, keyed by connection name.
    pub fn auth_tokens(&self) -> HashMap<String, String> {
        self.string_map(Self::AUTH_TOKENS_KEY)
    }

    pub fn set_auth_token(&mut self, connection: impl Into<String>, token: impl Into<String>) {
        self.insert_into_map(Self::AUTH_TOKENS_KEY, connection.into(), token.into());
    }

    pub fn duplicate_token_exchange(&self) -> Option<bool> {
        self.record
            .get(Self::DUPLICATE_TOKEN_EXCHANGE_KEY)
            .and_then(Value::as_bool)
    }

    pub fn set_duplicate_token_exchange(&mut self, duplicate: bool) {
        self.record
            .insert(Self::DUPLICATE_TOKEN_EXCHANGE_KEY, Value::Bool(duplicate));
    }

    fn str_value(&self, key: &str) -> Option<&str> {
        self.record.get(key).and_then(Value::as_str)
    }

    // Non-string members are skipped.
    fn string_map(&self, key: &str) -> HashMap<String, String> {
        match self.record.get(key) {
            Some(Value::Object(map)) => map
                .iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect(),
            _ => HashMap::new(),
        }
    }

    fn insert_into_map(&mut self, key: &str, name: String, value: String) {
        if !matches!(self.record.get(key), Some(Value::Object(_))) {
            self.record
                .insert(key, Value::Object(serde_json::Map::new()));
        }
        if let Some(Value::Object(map)) = self.record.get_mut(key) {
            map.insert(name, Value::String(value));
        }
    }
}

impl Deref for TempState<'_> {
    type Target = Record;

    fn deref(&self) -> &Record {
        self.record
    }
}

impl DerefMut for TempState<'_> {
    fn deref_mut(&mut self) -> &mut Record {
        self.record
    }
}
