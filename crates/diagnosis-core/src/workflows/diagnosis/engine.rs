use super::domain::{Answer, AnswerValue, Axis, Phase, Session, SessionId};
use super::scenario::{Question, ScenarioDefinition, ScenarioError, SkipCondition};
use super::scoring::ScoringModel;
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("diag-{id:06}"))
}

/// Mid-session axis scoring used by `score-threshold` skip conditions.
pub trait ProvisionalScorer: Send + Sync {
    fn provisional_axis_score(&self, session: &Session, axis: &Axis) -> f64;
}

impl ProvisionalScorer for ScoringModel {
    fn provisional_axis_score(&self, session: &Session, axis: &Axis) -> f64 {
        self.calculate_axis_score(session, axis).score
    }
}

/// Result of submitting one answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub success: bool,
    pub next_question: Option<Question>,
    pub session_completed: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("scenario configuration error: {0}")]
    Configuration(#[from] ScenarioError),
    #[error("question {0} is not part of the scenario")]
    UnknownQuestion(String),
    #[error("skip conditions looped past {limit} questions after {question_id}")]
    SkipLoop { question_id: String, limit: usize },
    #[error("session {0} is already completed")]
    SessionCompleted(SessionId),
}

/// Stateless branching controller. Sessions are passed in explicitly so one
/// engine can advance any number of sessions.
#[derive(Debug, Clone)]
pub struct ScenarioEngine<S = ScoringModel> {
    scenario: Arc<ScenarioDefinition>,
    scorer: S,
}

impl ScenarioEngine<ScoringModel> {
    pub fn new(scenario: Arc<ScenarioDefinition>) -> Self {
        let scorer = ScoringModel::new(Arc::clone(&scenario));
        Self { scenario, scorer }
    }
}

impl<S: ProvisionalScorer> ScenarioEngine<S> {
    pub fn with_scorer(scenario: Arc<ScenarioDefinition>, scorer: S) -> Self {
        Self { scenario, scorer }
    }

    pub fn scenario(&self) -> &ScenarioDefinition {
        &self.scenario
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    pub fn start_session(&self, metadata: BTreeMap<String, String>) -> Result<Session, EngineError> {
        let first_phase = Phase::ordered()[0];
        let first_question = self
            .scenario
            .phase_questions(first_phase)
            .first()
            .cloned()
            .ok_or(ScenarioError::EmptyPhase(first_phase))?;

        let session = Session {
            session_id: next_session_id(),
            started_at: Utc::now(),
            current_phase: first_phase,
            current_question_id: Some(first_question),
            answers: Vec::new(),
            progress: 0,
            completed_at: None,
            metadata,
            revision: 0,
        };
        info!(session_id = %session.session_id, scenario = %self.scenario.id, "diagnosis session started");

        Ok(session)
    }

    pub fn current_question(&self, session: &Session) -> Option<&Question> {
        session
            .current_question_id()
            .and_then(|id| self.scenario.question(id))
    }

    /// Records an answer and moves the session to the next applicable question.
    ///
    /// The answered question does not have to be the session's current one.
    pub fn answer_question(
        &self,
        session: &mut Session,
        question_id: &str,
        value: AnswerValue,
    ) -> Result<AnswerOutcome, EngineError> {
        if session.is_completed() {
            return Err(EngineError::SessionCompleted(session.session_id.clone()));
        }

        let question = self
            .scenario
            .question(question_id)
            .ok_or_else(|| EngineError::UnknownQuestion(question_id.to_string()))?;

        // Work on a copy so a failed transition leaves the caller's session as it was.
        let mut staged = session.clone();
        staged.answers.push(Answer {
            question_id: question.id.clone(),
            value: value.clone(),
            timestamp: Utc::now(),
            skipped: false,
        });

        let mut origin = question;
        let mut origin_value = value;
        let mut skipped = 0usize;
        let limit = self.scenario.total_questions();

        let next = loop {
            let Some(candidate_id) = self
                .resolve_next(origin, &origin_value)
                .or_else(|| self.scenario.first_question_after(origin.phase))
            else {
                break None;
            };

            let candidate = self.scenario.question(candidate_id).ok_or_else(|| {
                ScenarioError::DanglingReference {
                    from: format!("question {}", origin.id),
                    to: candidate_id.to_string(),
                }
            })?;

            if !self.should_skip(candidate, &staged) {
                break Some(candidate);
            }

            skipped += 1;
            if skipped > limit {
                warn!(session_id = %session.session_id, question_id = %candidate.id, "skip conditions never settle");
                return Err(EngineError::SkipLoop {
                    question_id: question.id.clone(),
                    limit,
                });
            }

            debug!(session_id = %session.session_id, question_id = %candidate.id, "question skipped");
            staged.answers.push(Answer {
                question_id: candidate.id.clone(),
                value: AnswerValue::empty(),
                timestamp: Utc::now(),
                skipped: true,
            });
            origin = candidate;
            origin_value = AnswerValue::empty();
        };

        staged.revision += 1;
        let outcome = match next {
            Some(next_question) => {
                if next_question.phase != staged.current_phase {
                    debug!(
                        session_id = %staged.session_id,
                        phase = next_question.phase.label(),
                        "entering phase"
                    );
                }
                staged.current_phase = next_question.phase;
                staged.current_question_id = Some(next_question.id.clone());
                staged.progress = staged.progress.max(self.progress_for(&staged));

                AnswerOutcome {
                    success: true,
                    next_question: Some(next_question.clone()),
                    session_completed: false,
                }
            }
            None => {
                staged.current_question_id = None;
                staged.progress = 100;
                staged.completed_at = Some(Utc::now());
                info!(
                    session_id = %staged.session_id,
                    answers = staged.answers.len(),
                    "diagnosis session completed"
                );

                AnswerOutcome {
                    success: true,
                    next_question: None,
                    session_completed: true,
                }
            }
        };

        *session = staged;
        Ok(outcome)
    }

    pub fn evaluate_skip_condition(&self, condition: &SkipCondition, session: &Session) -> bool {
        match condition {
            SkipCondition::AnswerEquals { question_id, value } => {
                session.has_answer_equal_to(question_id, value)
            }
            SkipCondition::ScoreThreshold { axis, threshold } => {
                self.scorer.provisional_axis_score(session, axis) >= *threshold
            }
            SkipCondition::PhaseComplete { .. } => false,
        }
    }

    fn should_skip(&self, question: &Question, session: &Session) -> bool {
        question
            .skip_condition
            .as_ref()
            .is_some_and(|condition| self.evaluate_skip_condition(condition, session))
    }

    /// Option branch, then the question's default, then the next question in its phase.
    fn resolve_next<'a>(&'a self, question: &'a Question, value: &AnswerValue) -> Option<&'a str> {
        let branch = value
            .as_text()
            .and_then(|option_id| question.option(option_id))
            .and_then(|option| option.next_question.as_deref());
        if let Some(target) = branch {
            debug!(question_id = %question.id, next_question = target, "option branch taken");
            return Some(target);
        }

        question
            .default_next_question
            .as_deref()
            .or_else(|| self.scenario.next_in_phase(question))
    }

    /// Answered share of the questionnaire. Stays below 100 until completion.
    fn progress_for(&self, session: &Session) -> u8 {
        let total = self.scenario.total_questions();
        if total == 0 {
            return 0;
        }
        let ratio = session.answers.len() as f64 / total as f64 * 100.0;
        ratio.round().min(99.0) as u8
    }
}
