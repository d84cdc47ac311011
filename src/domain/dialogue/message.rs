//! Message entity for dialogue sessions.
//!
//! A message is an immutable `(sender, content)` pair. The only permitted
//! change after acceptance is wholesale replacement of the latest patient
//! message during a plausibility rewrite.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four roles that take part in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// LLM-played patient, visible to the doctor.
    Patient,
    /// Internal oracle describing bodily sensations; never shown to the doctor.
    Body,
    /// Human player.
    Doctor,
    /// Referee and game announcements.
    System,
}

impl Sender {
    /// Returns true if messages from this sender may appear in a player view.
    pub fn is_player_visible(&self) -> bool {
        !matches!(self, Self::Body)
    }

    /// Lowercase tag used in logs and transcripts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Body => "body",
            Self::Doctor => "doctor",
            Self::System => "system",
        }
    }

    /// Chinese label used when rendering history into prompts.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            Self::Patient => "病人",
            Self::Body => "身体",
            Self::Doctor => "医生",
            Self::System => "系统",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single utterance in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub content: String,
}

impl Message {
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            sender,
            content: content.into(),
        }
    }

    pub fn patient(content: impl Into<String>) -> Self {
        Self::new(Sender::Patient, content)
    }

    pub fn body(content: impl Into<String>) -> Self {
        Self::new(Sender::Body, content)
    }

    pub fn doctor(content: impl Into<String>) -> Self {
        Self::new(Sender::Doctor, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Sender::System, content)
    }

    /// Returns true if this message was sent by the given role.
    pub fn is_from(&self, sender: Sender) -> bool {
        self.sender == sender
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sender::Patient).unwrap(), "\"patient\"");
        assert_eq!(serde_json::to_string(&Sender::Body).unwrap(), "\"body\"");
        let parsed: Sender = serde_json::from_str("\"doctor\"").unwrap();
        assert_eq!(parsed, Sender::Doctor);
    }

    #[test]
    fn only_body_is_hidden_from_players() {
        assert!(Sender::Patient.is_player_visible());
        assert!(Sender::Doctor.is_player_visible());
        assert!(Sender::System.is_player_visible());
        assert!(!Sender::Body.is_player_visible());
    }

    #[test]
    fn message_json_shape_is_sender_and_content() {
        let msg = Message::doctor("哪里不舒服？");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sender"], "doctor");
        assert_eq!(json["content"], "哪里不舒服？");
    }

    #[test]
    fn constructors_set_sender() {
        assert!(Message::patient("x").is_from(Sender::Patient));
        assert!(Message::body("x").is_from(Sender::Body));
        assert!(Message::system("x").is_from(Sender::System));
    }
}
