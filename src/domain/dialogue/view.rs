//! Player-facing projections of a session.
//!
//! Views never contain body messages or ask-body markers, and the diagnosis
//! only appears once the game is over.

use serde::{Deserialize, Serialize};

use super::markers::strip_markers;
use super::message::{Message, Sender};
use super::session::Session;
use crate::domain::foundation::SessionId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub game_id: SessionId,
    pub messages: Vec<Message>,
    pub current_sender: Sender,
    pub game_over: bool,
    pub turn_count: u32,
    /// Revealed only after the game ends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
}

impl SessionView {
    pub fn of(session: &Session) -> Self {
        Self {
            game_id: session.id(),
            messages: visible_messages(session),
            current_sender: session.current_sender(),
            game_over: session.is_game_over(),
            turn_count: session.turn_count(),
            diagnosis: session
                .is_game_over()
                .then(|| session.diagnosis().to_string()),
        }
    }
}

/// Row in the active games listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_id: SessionId,
    pub message_count: usize,
    pub game_over: bool,
    pub last_message: Option<Message>,
}

impl GameSummary {
    pub fn of(session: &Session) -> Self {
        let mut messages = visible_messages(session);
        Self {
            game_id: session.id(),
            message_count: messages.len(),
            game_over: session.is_game_over(),
            last_message: messages.pop(),
        }
    }
}

fn visible_messages(session: &Session) -> Vec<Message> {
    session
        .messages()
        .iter()
        .filter(|m| m.sender.is_player_visible())
        .filter_map(|m| {
            let content = strip_markers(&m.content);
            (!content.is_empty()).then(|| Message::new(m.sender, content))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialogue::DialoguePhase;
    use crate::domain::foundation::Timestamp;

    fn session_with_body_exchange() -> Session {
        let mut s = Session::new(SessionId::new(), "偏头痛", Timestamp::now()).unwrap();
        s.push(Message::patient("医生好，我头疼。"));
        s.push(Message::doctor("疼了多久？"));
        s.push(Message::patient("[询问身体:头疼多久了？]"));
        s.push(Message::body("- 头部：搏动性疼痛，持续两天"));
        s.push(Message::patient("[询问身体:还有呢] 大概两天了。"));
        s.enter_phase(DialoguePhase::DoctorTurn);
        s
    }

    #[test]
    fn view_hides_body_and_markers() {
        let view = SessionView::of(&session_with_body_exchange());
        assert!(view.messages.iter().all(|m| m.sender != Sender::Body));
        assert!(view
            .messages
            .iter()
            .all(|m| !m.content.contains("[询问身体") && !m.content.contains("【询问身体")));
        assert_eq!(view.messages.last().unwrap().content, "大概两天了。");
    }

    #[test]
    fn marker_only_patient_lines_are_dropped() {
        let view = SessionView::of(&session_with_body_exchange());
        // opening, greeting, doctor question, folded reply
        assert_eq!(view.messages.len(), 4);
    }

    #[test]
    fn diagnosis_hidden_until_game_over() {
        let mut s = session_with_body_exchange();
        assert_eq!(SessionView::of(&s).diagnosis, None);
        let json = serde_json::to_value(SessionView::of(&s)).unwrap();
        assert!(json.get("diagnosis").is_none());

        s.enter_phase(DialoguePhase::GameOver);
        assert_eq!(SessionView::of(&s).diagnosis.as_deref(), Some("偏头痛"));
    }

    #[test]
    fn summary_reports_last_visible_message() {
        let summary = GameSummary::of(&session_with_body_exchange());
        assert_eq!(summary.message_count, 4);
        assert!(!summary.game_over);
        assert_eq!(
            summary.last_message,
            Some(Message::patient("大概两天了。"))
        );
    }
}
