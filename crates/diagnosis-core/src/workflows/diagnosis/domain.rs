use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Business problem category a question can score.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Axis(pub String);

impl Axis {
    pub const MANAGEMENT: &'static str = "management";
    pub const SALES: &'static str = "sales";
    pub const ORGANIZATION: &'static str = "organization";
    pub const MARKETING: &'static str = "marketing";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Axis {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Higher-level business value category derived from axis scores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueDimension(pub String);

impl From<&str> for ValueDimension {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ValueDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Initial,
    DeepDive,
    Priority,
    Summary,
}

impl Phase {
    pub const fn ordered() -> [Self; 4] {
        [Self::Initial, Self::DeepDive, Self::Priority, Self::Summary]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Initial => "Initial Assessment",
            Self::DeepDive => "Deep Dive",
            Self::Priority => "Priority",
            Self::Summary => "Summary",
        }
    }

    /// Phases that follow `self` in interview order.
    pub fn following(self) -> impl Iterator<Item = Phase> {
        Self::ordered().into_iter().skip_while(move |phase| *phase != self).skip(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    Scale,
    SingleChoice,
    MultipleChoice,
}

impl QuestionType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scale => "scale",
            Self::SingleChoice => "single-choice",
            Self::MultipleChoice => "multiple-choice",
        }
    }
}

/// Raw answer payload. Equality is strict: a number never equals its text spelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(f64),
    Text(String),
    Choices(Vec<String>),
}

impl AnswerValue {
    /// Placeholder value recorded for skipped questions.
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
            Self::Choices(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn choices(&self) -> &[String] {
        match self {
            Self::Choices(values) => values,
            _ => &[],
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Choices(values.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    pub value: AnswerValue,
    pub timestamp: DateTime<Utc>,
    pub skipped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mutable record of one diagnosis run. Only the engine advances it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub(crate) session_id: SessionId,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) current_phase: Phase,
    pub(crate) current_question_id: Option<String>,
    pub(crate) answers: Vec<Answer>,
    pub(crate) progress: u8,
    pub(crate) completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(crate) metadata: BTreeMap<String, String>,
    /// Number of accepted answers; repositories use it to reject stale writes.
    #[serde(default)]
    pub(crate) revision: u64,
}

impl Session {
    pub fn id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn current_phase(&self) -> Phase {
        self.current_phase
    }

    pub fn current_question_id(&self) -> Option<&str> {
        self.current_question_id.as_deref()
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// True when any recorded answer to `question_id` equals `value` exactly.
    pub fn has_answer_equal_to(&self, question_id: &str, value: &AnswerValue) -> bool {
        self.answers
            .iter()
            .any(|answer| answer.question_id == question_id && &answer.value == value)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            phase: self.current_phase,
            progress: self.progress,
            answers: self.answers.clone(),
        }
    }
}

/// Serializable view handed to the report and UI layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub phase: Phase,
    pub progress: u8,
    pub answers: Vec<Answer>,
}
