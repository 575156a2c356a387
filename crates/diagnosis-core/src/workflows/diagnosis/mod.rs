//! Adaptive diagnostic questionnaire: branching interview engine and
//! weighted multi-axis scoring with ranked avatar recommendations.

mod blueprint;
pub mod domain;
pub mod engine;
pub mod report;
pub mod repository;
pub mod scenario;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use blueprint::COMPANY_SIZE_QUESTION;
pub use domain::{
    Answer, AnswerValue, Axis, Phase, QuestionType, Session, SessionId, SessionSnapshot,
    ValueDimension,
};
pub use engine::{AnswerOutcome, EngineError, ProvisionalScorer, ScenarioEngine};
pub use report::{DiagnosisReport, RecommendationView};
pub use repository::{InMemorySessionRepository, RepositoryError, SessionRepository};
pub use scenario::{
    AnswerOption, PhaseDefinition, Question, ScaleRange, ScenarioDefinition, ScenarioError,
    ScoringConfig, SkipCondition,
};
pub use scoring::{
    parse_employee_range, AvatarType, AxisScore, DetailedRoi, RecommendedAvatar, ScoreLevel,
    ScoringModel, TotalScore, ValueDimensionScore, EMPLOYEE_COUNT_METADATA_KEY,
};
pub use service::{DiagnosisService, ServiceError};
