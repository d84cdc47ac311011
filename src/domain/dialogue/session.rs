//! Session aggregate.
//!
//! One playthrough: the ordered transcript, whose turn it is, the hidden
//! diagnosis and the progress counters.
//!
//! # Invariants
//!
//! - `messages` is never empty (the opening system message is added on creation)
//! - `game_over` only ever moves from false to true
//! - `turn_count` only ever increases, by one per accepted doctor utterance

use serde::{Deserialize, Serialize};

use super::message::{Message, Sender};
use super::phase::DialoguePhase;
use crate::domain::foundation::{SessionId, Timestamp, ValidationError};

/// System message that opens every game.
pub const OPENING_MESSAGE: &str = "游戏开始，病人即将进入诊室。";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    messages: Vec<Message>,
    current_sender: Sender,
    diagnosis: String,
    game_over: bool,
    turn_count: u32,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Session {
    /// Creates a session in `PatientTurn` holding only the opening system message.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the diagnosis is blank
    pub fn new(
        id: SessionId,
        diagnosis: impl Into<String>,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        let diagnosis = diagnosis.into().trim().to_string();
        if diagnosis.is_empty() {
            return Err(ValidationError::empty_field("diagnosis"));
        }

        Ok(Self {
            id,
            messages: vec![Message::system(OPENING_MESSAGE)],
            current_sender: DialoguePhase::PatientTurn.sender(),
            diagnosis,
            game_over: false,
            turn_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════════

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn current_sender(&self) -> Sender {
        self.current_sender
    }

    pub fn diagnosis(&self) -> &str {
        &self.diagnosis
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// The engine phase this session is resting in.
    pub fn phase(&self) -> DialoguePhase {
        DialoguePhase::from_session_fields(self.current_sender, self.game_over)
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Most recent message from the given sender.
    pub fn last_from(&self, sender: Sender) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_from(sender))
    }

    /// Number of messages a given sender has contributed.
    pub fn count_from(&self, sender: Sender) -> usize {
        self.messages.iter().filter(|m| m.is_from(sender)).count()
    }

    /// Returns true if the session has not been touched since `cutoff`.
    pub fn is_idle_since(&self, cutoff: &Timestamp) -> bool {
        self.updated_at.is_before(cutoff)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Mutations (engine only)
    // ═══════════════════════════════════════════════════════════════════════

    pub(crate) fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Replaces the content of the latest patient message in place.
    ///
    /// Returns false if the session has no patient message yet.
    pub(crate) fn replace_last_patient(&mut self, content: impl Into<String>) -> bool {
        match self.messages.iter_mut().rev().find(|m| m.is_from(Sender::Patient)) {
            Some(msg) => {
                msg.content = content.into();
                true
            }
            None => false,
        }
    }

    /// Replaces the content of the patient message at `index`.
    ///
    /// Returns false if there is no patient message at that position.
    pub(crate) fn replace_patient_at(&mut self, index: usize, content: impl Into<String>) -> bool {
        match self.messages.get_mut(index) {
            Some(msg) if msg.is_from(Sender::Patient) => {
                msg.content = content.into();
                true
            }
            _ => false,
        }
    }

    /// Moves to the given phase. Once over, the session stays over.
    pub(crate) fn enter_phase(&mut self, phase: DialoguePhase) {
        if self.game_over {
            return;
        }
        self.current_sender = phase.sender();
        if phase == DialoguePhase::GameOver {
            self.game_over = true;
        }
    }

    pub(crate) fn increment_turn(&mut self) {
        self.turn_count = self.turn_count.saturating_add(1);
    }

    pub(crate) fn touch(&mut self, now: Timestamp) {
        if self.updated_at.is_before(&now) {
            self.updated_at = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(SessionId::new(), "流感", Timestamp::from_unix_secs(1_000)).unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn starts_with_opening_message_in_patient_turn() {
            let s = session();
            assert_eq!(s.messages().len(), 1);
            assert_eq!(s.messages()[0], Message::system(OPENING_MESSAGE));
            assert_eq!(s.phase(), DialoguePhase::PatientTurn);
            assert_eq!(s.turn_count(), 0);
            assert!(!s.is_game_over());
        }

        #[test]
        fn rejects_blank_diagnosis() {
            let result = Session::new(SessionId::new(), "  ", Timestamp::now());
            assert_eq!(result, Err(ValidationError::empty_field("diagnosis")));
        }

        #[test]
        fn trims_diagnosis() {
            let s = Session::new(SessionId::new(), " 肺炎 ", Timestamp::now()).unwrap();
            assert_eq!(s.diagnosis(), "肺炎");
        }
    }

    mod mutation {
        use super::*;

        #[test]
        fn replace_last_patient_touches_only_latest_patient_message() {
            let mut s = session();
            s.push(Message::patient("first"));
            s.push(Message::doctor("question"));
            s.push(Message::patient("second"));
            assert!(s.replace_last_patient("rewritten"));
            assert_eq!(s.messages()[1].content, "first");
            assert_eq!(s.messages()[3].content, "rewritten");
            assert_eq!(s.messages().len(), 4);
        }

        #[test]
        fn replace_patient_at_refuses_other_senders() {
            let mut s = session();
            s.push(Message::patient("p"));
            assert!(!s.replace_patient_at(0, "x"));
            assert!(s.replace_patient_at(1, "q"));
            assert!(!s.replace_patient_at(9, "x"));
            assert_eq!(s.messages()[1].content, "q");
        }

        #[test]
        fn replace_last_patient_without_patient_returns_false() {
            let mut s = session();
            assert!(!s.replace_last_patient("x"));
        }

        #[test]
        fn game_over_is_monotonic() {
            let mut s = session();
            s.enter_phase(DialoguePhase::GameOver);
            assert!(s.is_game_over());
            s.enter_phase(DialoguePhase::DoctorTurn);
            assert!(s.is_game_over());
            assert_eq!(s.phase(), DialoguePhase::GameOver);
        }

        #[test]
        fn touch_never_moves_backwards() {
            let mut s = session();
            s.touch(Timestamp::from_unix_secs(2_000));
            s.touch(Timestamp::from_unix_secs(1_500));
            assert_eq!(s.updated_at().as_unix_secs(), 2_000);
            assert!(s.is_idle_since(&Timestamp::from_unix_secs(2_001)));
            assert!(!s.is_idle_since(&Timestamp::from_unix_secs(2_000)));
        }

        #[test]
        fn last_from_and_count_from() {
            let mut s = session();
            s.push(Message::patient("a"));
            s.push(Message::patient("b"));
            assert_eq!(s.last_from(Sender::Patient).unwrap().content, "b");
            assert_eq!(s.count_from(Sender::Patient), 2);
            assert!(s.last_from(Sender::Doctor).is_none());
        }
    }
}
