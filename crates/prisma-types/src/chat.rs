//! Transcript message and exchange state types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Author of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Bot => write!(f, "bot"),
        }
    }
}

/// A single message in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            content: content.into(),
        }
    }
}

/// State of the single outstanding exchange.
///
/// `InFlight` carries the index of the bot placeholder being filled by a
/// streaming exchange. `AwaitingReply` is the single-shot equivalent: the
/// user message is in the transcript but no placeholder exists yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message_index", rename_all = "snake_case")]
pub enum ExchangeState {
    #[default]
    Idle,
    AwaitingReply,
    InFlight(usize),
}

impl ExchangeState {
    /// Whether an exchange is currently outstanding.
    pub fn is_active(&self) -> bool {
        !matches!(self, ExchangeState::Idle)
    }
}

/// How an exchange talks to the chat service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeMode {
    /// `POST /chat/stream`, deltas folded into a placeholder as they arrive.
    #[default]
    Streaming,
    /// `POST /chat`, one structured response.
    SingleShot,
}

impl fmt::Display for ExchangeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeMode::Streaming => write!(f, "stream"),
            ExchangeMode::SingleShot => write!(f, "single"),
        }
    }
}

impl FromStr for ExchangeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stream" | "streaming" => Ok(ExchangeMode::Streaming),
            "single" | "single-shot" | "single_shot" => Ok(ExchangeMode::SingleShot),
            other => Err(format!("invalid exchange mode: '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Bot.to_string(), "bot");
    }

    #[test]
    fn test_role_serde_lowercase() {
        let json = serde_json::to_string(&Message::bot("hola")).unwrap();
        assert_eq!(json, r#"{"role":"bot","content":"hola"}"#);
    }

    #[test]
    fn test_exchange_state_default_is_idle() {
        let state = ExchangeState::default();
        assert_eq!(state, ExchangeState::Idle);
        assert!(!state.is_active());
        assert!(ExchangeState::InFlight(1).is_active());
        assert!(ExchangeState::AwaitingReply.is_active());
    }

    #[test]
    fn test_exchange_mode_parse() {
        assert_eq!("stream".parse::<ExchangeMode>(), Ok(ExchangeMode::Streaming));
        assert_eq!("SINGLE".parse::<ExchangeMode>(), Ok(ExchangeMode::SingleShot));
        assert!("batch".parse::<ExchangeMode>().is_err());
    }
}
