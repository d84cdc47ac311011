//! Dialogue phase state machine.
//!
//! A logical turn walks the phases `DoctorTurn → SystemCheck → PatientTurn
//! (→ BodyTurn → PatientTurn) → SystemCheck → DoctorTurn`, with `GameOver`
//! as the only terminal state.

use serde::{Deserialize, Serialize};

use super::message::Sender;
use crate::domain::foundation::StateMachine;

/// Phase of the dialogue engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DialoguePhase {
    /// Patient generator is producing the next patient message.
    #[default]
    PatientTurn,
    /// Body oracle is answering a patient sub-query.
    BodyTurn,
    /// Waiting for external doctor input.
    DoctorTurn,
    /// Referee judges the latest message.
    SystemCheck,
    /// Game finished; nothing else may run.
    GameOver,
}

impl DialoguePhase {
    /// The role that owns this phase, stored as the session's current sender.
    pub fn sender(&self) -> Sender {
        match self {
            Self::PatientTurn => Sender::Patient,
            Self::BodyTurn => Sender::Body,
            Self::DoctorTurn => Sender::Doctor,
            Self::SystemCheck | Self::GameOver => Sender::System,
        }
    }

    /// Reconstructs the resting phase from persisted session fields.
    pub fn from_session_fields(current_sender: Sender, game_over: bool) -> Self {
        if game_over {
            return Self::GameOver;
        }
        match current_sender {
            Sender::Patient => Self::PatientTurn,
            Sender::Body => Self::BodyTurn,
            Sender::Doctor => Self::DoctorTurn,
            Sender::System => Self::SystemCheck,
        }
    }

    /// Returns true if an external doctor utterance is accepted in this phase.
    pub fn accepts_doctor_input(&self) -> bool {
        matches!(self, Self::DoctorTurn)
    }
}

impl StateMachine for DialoguePhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use DialoguePhase::*;
        matches!(
            (self, target),
            (PatientTurn, SystemCheck)
                | (PatientTurn, BodyTurn)
                | (BodyTurn, PatientTurn)
                // Plausibility rewrite loops back onto the check
                | (SystemCheck, SystemCheck)
                | (SystemCheck, DoctorTurn)
                | (SystemCheck, PatientTurn)
                | (SystemCheck, GameOver)
                | (DoctorTurn, SystemCheck)
                // Turn limit
                | (DoctorTurn, GameOver)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use DialoguePhase::*;
        match self {
            PatientTurn => vec![SystemCheck, BodyTurn],
            BodyTurn => vec![PatientTurn],
            SystemCheck => vec![SystemCheck, DoctorTurn, PatientTurn, GameOver],
            DoctorTurn => vec![SystemCheck, GameOver],
            GameOver => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [DialoguePhase; 5] = [
        DialoguePhase::PatientTurn,
        DialoguePhase::BodyTurn,
        DialoguePhase::DoctorTurn,
        DialoguePhase::SystemCheck,
        DialoguePhase::GameOver,
    ];

    #[test]
    fn initial_phase_is_patient_turn() {
        assert_eq!(DialoguePhase::default(), DialoguePhase::PatientTurn);
    }

    #[test]
    fn game_over_is_the_only_terminal_phase() {
        for phase in ALL {
            assert_eq!(phase.is_terminal(), phase == DialoguePhase::GameOver);
        }
    }

    #[test]
    fn body_always_hands_back_to_patient() {
        assert_eq!(
            DialoguePhase::BodyTurn.valid_transitions(),
            vec![DialoguePhase::PatientTurn]
        );
    }

    #[test]
    fn doctor_cannot_skip_the_check() {
        assert!(DialoguePhase::DoctorTurn
            .transition_to(DialoguePhase::PatientTurn)
            .is_err());
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for from in ALL {
            for to in ALL {
                assert_eq!(
                    from.can_transition_to(&to),
                    from.valid_transitions().contains(&to),
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn session_fields_roundtrip_through_sender() {
        for phase in [
            DialoguePhase::PatientTurn,
            DialoguePhase::BodyTurn,
            DialoguePhase::DoctorTurn,
            DialoguePhase::SystemCheck,
        ] {
            assert_eq!(DialoguePhase::from_session_fields(phase.sender(), false), phase);
        }
        assert_eq!(
            DialoguePhase::from_session_fields(Sender::Doctor, true),
            DialoguePhase::GameOver
        );
    }

    #[test]
    fn only_doctor_turn_accepts_input() {
        for phase in ALL {
            assert_eq!(phase.accepts_doctor_input(), phase == DialoguePhase::DoctorTurn);
        }
    }
}
