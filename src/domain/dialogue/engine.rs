//! Dialogue engine.
//!
//! Drives one logical turn from a resting `DoctorTurn` (or the initial
//! `PatientTurn`) to the next resting state: `DoctorTurn` again or `GameOver`.
//! The engine works on a private copy of the session and only hands it back
//! on success, so a gateway failure part-way through commits nothing and
//! leaves `current_sender` where it was.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::errors::GameError;
use super::message::{Message, Sender};
use super::phase::DialoguePhase;
use super::roles::{looks_like_diagnosis, BodyOracle, PatientGenerator, PatientRoute, SystemReferee};
use super::session::Session;
use super::symptom_cache::SymptomHintCache;
use crate::domain::foundation::{StateMachine, Timestamp};
use crate::ports::JudgeGateway;

/// Engine switches projected from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialoguePolicy {
    /// Run the referee plausibility check on patient messages.
    pub check_patient_response: bool,
    /// Only ask the referee about diagnoses when the doctor's text looks like one.
    pub use_keyword_gate: bool,
    /// Accepted doctor utterances before the game ends unresolved.
    pub max_turns: u32,
    /// Rewrites attempted before an implausible patient message is force-accepted.
    pub max_plausibility_retries: u32,
    /// Maximum doctor input length in characters.
    pub max_input_length: usize,
}

impl Default for DialoguePolicy {
    fn default() -> Self {
        Self {
            check_patient_response: false,
            use_keyword_gate: false,
            max_turns: 20,
            max_plausibility_retries: 3,
            max_input_length: 100,
        }
    }
}

impl DialoguePolicy {
    /// Upper bound on sequential judge calls for one doctor turn: diagnosis
    /// check, symptom hint refill, reply, body, fold-in reply, plus the
    /// plausibility loop when enabled.
    pub fn max_judge_calls_per_turn(&self) -> u32 {
        let plausibility = if self.check_patient_response {
            2 * self.max_plausibility_retries + 1
        } else {
            0
        };
        5 + plausibility
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The doctor named the diagnosis.
    Correct,
    /// The turn ceiling was reached first.
    TurnLimit,
}

impl Resolution {
    pub fn is_correct(&self) -> bool {
        matches!(self, Resolution::Correct)
    }
}

/// Result of driving a turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The next session state, to be written back by the caller.
    pub session: Session,
    /// Audit notes for the conversation log.
    pub notes: Vec<String>,
    /// Set when this turn ended the game.
    pub resolution: Option<Resolution>,
}

pub fn congratulation_message(diagnosis: &str) -> String {
    format!("恭喜！你正确诊断出了病人的疾病：{}。", diagnosis)
}

pub fn turn_limit_message(max_turns: u32, diagnosis: &str) -> String {
    format!(
        "对话已达到{}轮上限，游戏结束。病人所患的疾病是：{}。",
        max_turns, diagnosis
    )
}

/// Fallback content for a blank patient message found before a referee check.
pub const BLANK_PATIENT_FALLBACK: &str = "医生，我能否再详细描述一下我的症状？";

pub struct DialogueEngine {
    patient: PatientGenerator,
    body: BodyOracle,
    referee: SystemReferee,
    policy: DialoguePolicy,
}

impl DialogueEngine {
    pub fn new(
        gateway: Arc<dyn JudgeGateway>,
        hints: Arc<SymptomHintCache>,
        policy: DialoguePolicy,
    ) -> Self {
        Self {
            patient: PatientGenerator::new(gateway.clone(), hints),
            body: BodyOracle::new(gateway.clone()),
            referee: SystemReferee::new(gateway),
            policy,
        }
    }

    /// Runs the opening patient cycle of a freshly created session.
    pub async fn start(&self, session: Session) -> Result<TurnOutcome, GameError> {
        if session.phase() != DialoguePhase::PatientTurn {
            return Err(GameError::WrongTurn);
        }
        let mut working = session;
        let mut notes = Vec::new();
        self.run_patient_cycle(&mut working, &mut notes).await?;
        working.touch(Timestamp::now());
        info!(session_id = %working.id(), "Game started");
        Ok(TurnOutcome {
            session: working,
            notes,
            resolution: None,
        })
    }

    /// Checks a doctor submission without touching the session.
    ///
    /// Order: AlreadyOver, WrongTurn, EmptyMessage, TooLong. Returns the trimmed text.
    pub fn validate_doctor_input(&self, session: &Session, text: &str) -> Result<String, GameError> {
        if session.is_game_over() {
            return Err(GameError::AlreadyOver);
        }
        if !session.phase().accepts_doctor_input() {
            return Err(GameError::WrongTurn);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(GameError::EmptyMessage);
        }
        let length = text.chars().count();
        if length > self.policy.max_input_length {
            return Err(GameError::too_long(self.policy.max_input_length, length));
        }
        Ok(text.to_string())
    }

    /// Processes one doctor utterance and returns the next session state.
    pub async fn handle_doctor_message(
        &self,
        session: &Session,
        text: &str,
    ) -> Result<TurnOutcome, GameError> {
        let text = self.validate_doctor_input(session, text)?;
        let mut working = session.clone();
        let mut notes = Vec::new();

        // Ceiling check comes before any generation work.
        if working.turn_count() >= self.policy.max_turns {
            advance(&mut working, DialoguePhase::GameOver);
            working.push(Message::system(turn_limit_message(
                self.policy.max_turns,
                working.diagnosis(),
            )));
            working.touch(Timestamp::now());
            notes.push(format!("达到{}轮上限，游戏结束", self.policy.max_turns));
            info!(
                session_id = %working.id(),
                turns = working.turn_count(),
                "Game ended at turn limit"
            );
            return Ok(TurnOutcome {
                session: working,
                notes,
                resolution: Some(Resolution::TurnLimit),
            });
        }

        working.increment_turn();
        working.push(Message::doctor(text.clone()));
        advance(&mut working, DialoguePhase::SystemCheck);

        if self.diagnosis_is_correct(&working, &text, &mut notes).await? {
            advance(&mut working, DialoguePhase::GameOver);
            working.push(Message::system(congratulation_message(working.diagnosis())));
            working.touch(Timestamp::now());
            notes.push(format!("医生正确诊断：{}", working.diagnosis()));
            info!(
                session_id = %working.id(),
                turns = working.turn_count(),
                "Game won"
            );
            return Ok(TurnOutcome {
                session: working,
                notes,
                resolution: Some(Resolution::Correct),
            });
        }

        advance(&mut working, DialoguePhase::PatientTurn);
        self.run_patient_cycle(&mut working, &mut notes).await?;
        working.touch(Timestamp::now());
        Ok(TurnOutcome {
            session: working,
            notes,
            resolution: None,
        })
    }

    async fn diagnosis_is_correct(
        &self,
        working: &Session,
        text: &str,
        notes: &mut Vec<String>,
    ) -> Result<bool, GameError> {
        if self.policy.use_keyword_gate && !looks_like_diagnosis(text, working.diagnosis()) {
            debug!(session_id = %working.id(), "No diagnosis intent, referee skipped");
            return Ok(false);
        }
        let judgment = self.referee.judge_diagnosis(working, text).await?;
        notes.push(format!("诊断判断：{}", judgment.raw.trim()));
        Ok(judgment.passed)
    }

    /// `PatientTurn (→ BodyTurn → PatientTurn) → SystemCheck → DoctorTurn`.
    async fn run_patient_cycle(
        &self,
        working: &mut Session,
        notes: &mut Vec<String>,
    ) -> Result<(), GameError> {
        let draft = self.patient.generate(working).await?;
        working.push(Message::patient(draft.content));

        if draft.route == PatientRoute::Body {
            advance(working, DialoguePhase::BodyTurn);
            notes.push(format!("病人询问身体：{}", BodyOracle::query_for(working)));
            let sensations = self.body.describe(working).await?;
            notes.push(format!("身体反馈：{}", sensations));
            working.push(Message::body(sensations));

            advance(working, DialoguePhase::PatientTurn);
            // The latest message is now Body, so this is always the fold-in reply.
            let reply = self.patient.generate(working).await?;
            working.push(Message::patient(reply.content));
        }

        advance(working, DialoguePhase::SystemCheck);
        if self.policy.check_patient_response {
            self.check_plausibility(working, notes).await?;
        }
        advance(working, DialoguePhase::DoctorTurn);
        Ok(())
    }

    /// Bounded rewrite loop. Exhausting the bound force-accepts the message.
    async fn check_plausibility(
        &self,
        working: &mut Session,
        notes: &mut Vec<String>,
    ) -> Result<(), GameError> {
        prepare_for_referee(working);

        let mut rewrites = 0;
        loop {
            let judgment = self.referee.judge_plausibility(working).await?;
            if judgment.passed {
                return Ok(());
            }
            if rewrites >= self.policy.max_plausibility_retries {
                warn!(
                    session_id = %working.id(),
                    rewrites,
                    "Plausibility retries exhausted, accepting patient message"
                );
                notes.push(format!("合理性检查{}次重写后仍未通过，强制接受", rewrites));
                return Ok(());
            }

            let content = self.patient.rewrite(working, &judgment.raw).await?;
            working.replace_last_patient(content);
            rewrites += 1;
            notes.push(format!("病人消息已修正。原因：{}", judgment.raw.trim()));
            advance(working, DialoguePhase::SystemCheck);
        }
    }
}

/// Strips markers from every patient message and backfills a blank latest one.
fn prepare_for_referee(working: &mut Session) {
    let cleaned: Vec<(usize, String)> = working
        .messages()
        .iter()
        .enumerate()
        .filter(|(_, m)| m.is_from(Sender::Patient))
        .map(|(i, m)| (i, super::markers::strip_markers(&m.content)))
        .collect();
    for (index, content) in cleaned {
        working.replace_patient_at(index, content);
    }
    let blank_latest = working
        .last_from(Sender::Patient)
        .map(|m| m.content.trim().is_empty())
        .unwrap_or(false);
    if blank_latest {
        working.replace_last_patient(BLANK_PATIENT_FALLBACK);
    }
}

fn advance(working: &mut Session, next: DialoguePhase) {
    let current = working.phase();
    debug_assert!(
        current.can_transition_to(&next),
        "illegal dialogue transition {:?} -> {:?}",
        current,
        next
    );
    debug!(session_id = %working.id(), from = ?current, to = ?next, "Dialogue phase change");
    working.enter_phase(next);
}
