use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use super::domain::{AnswerValue, Session, SessionId, SessionSnapshot};
use super::engine::{AnswerOutcome, EngineError, ScenarioEngine};
use super::report::DiagnosisReport;
use super::repository::{RepositoryError, SessionRepository};
use super::scenario::{Question, ScenarioDefinition};
use super::scoring::{DetailedRoi, RecommendedAvatar, ScoringModel, TotalScore};

/// Service composing the branching engine, the scoring model and session storage.
pub struct DiagnosisService<R> {
    engine: ScenarioEngine,
    scoring: ScoringModel,
    repository: Arc<R>,
}

impl<R> DiagnosisService<R>
where
    R: SessionRepository + 'static,
{
    pub fn new(scenario: Arc<ScenarioDefinition>, repository: Arc<R>) -> Self {
        let engine = ScenarioEngine::new(Arc::clone(&scenario));
        let scoring = engine.scorer().clone();
        Self {
            engine,
            scoring,
            repository,
        }
    }

    pub fn engine(&self) -> &ScenarioEngine {
        &self.engine
    }

    /// Start a session and persist it.
    pub fn start(&self, metadata: BTreeMap<String, String>) -> Result<Session, ServiceError> {
        let session = self.engine.start_session(metadata)?;
        let stored = self.repository.insert(session)?;
        Ok(stored)
    }

    /// Apply one answer to a stored session and persist the result.
    pub fn answer(
        &self,
        session_id: &SessionId,
        question_id: &str,
        value: AnswerValue,
    ) -> Result<AnswerOutcome, ServiceError> {
        let mut session = self.load(session_id)?;
        let outcome = self.engine.answer_question(&mut session, question_id, value)?;
        debug!(
            session_id = %session_id,
            progress = session.progress(),
            completed = outcome.session_completed,
            "answer recorded"
        );
        self.repository.update(session)?;
        Ok(outcome)
    }

    pub fn current_question(&self, session_id: &SessionId) -> Result<Option<Question>, ServiceError> {
        let session = self.load(session_id)?;
        Ok(self.engine.current_question(&session).cloned())
    }

    pub fn snapshot(&self, session_id: &SessionId) -> Result<SessionSnapshot, ServiceError> {
        Ok(self.load(session_id)?.snapshot())
    }

    /// Best-effort score; valid on incomplete sessions.
    pub fn score(&self, session_id: &SessionId) -> Result<TotalScore, ServiceError> {
        let session = self.load(session_id)?;
        Ok(self.scoring.calculate_total_score(&session))
    }

    pub fn recommendations(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<RecommendedAvatar>, ServiceError> {
        let total = self.score(session_id)?;
        Ok(self.scoring.determine_recommended_avatars(&total))
    }

    pub fn detailed_roi(
        &self,
        session_id: &SessionId,
        recommendation: &RecommendedAvatar,
    ) -> Result<DetailedRoi, ServiceError> {
        let session = self.load(session_id)?;
        Ok(self.scoring.calculate_detailed_roi(recommendation, &session))
    }

    pub fn report(&self, session_id: &SessionId) -> Result<DiagnosisReport, ServiceError> {
        let session = self.load(session_id)?;
        Ok(DiagnosisReport::build(&self.scoring, &session))
    }

    fn load(&self, session_id: &SessionId) -> Result<Session, ServiceError> {
        let session = self
            .repository
            .fetch(session_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(session)
    }
}

/// Error raised by the diagnosis service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
