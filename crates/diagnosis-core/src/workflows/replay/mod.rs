//! Replays recorded answer logs (CSV exports with `Question,Answer` columns)
//! through the scenario engine.

mod parser;

use crate::workflows::diagnosis::{
    AnswerValue, EngineError, ProvisionalScorer, QuestionType, ScenarioDefinition,
    ScenarioEngine, Session,
};
use std::io::Read;
use std::path::Path;
use tracing::debug;

use parser::AnswerRecord;

const CHOICE_SEPARATOR: char = '|';

#[derive(Debug)]
pub enum ReplayError {
    Io(std::io::Error),
    Csv(csv::Error),
    Engine { row: usize, source: EngineError },
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplayError::Io(err) => write!(f, "failed to read answer log: {}", err),
            ReplayError::Csv(err) => write!(f, "invalid answer log CSV: {}", err),
            ReplayError::Engine { row, source } => {
                write!(f, "answer log row {} could not be applied: {}", row, source)
            }
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReplayError::Io(err) => Some(err),
            ReplayError::Csv(err) => Some(err),
            ReplayError::Engine { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for ReplayError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ReplayError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Ordered answers parsed from an export, not yet typed against a scenario.
#[derive(Debug, Clone, Default)]
pub struct AnswerLog {
    records: Vec<AnswerRecord>,
}

/// How much of a log made it into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    pub ignored: usize,
    pub completed: bool,
}

pub struct AnswerLogImporter;

impl AnswerLogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<AnswerLog, ReplayError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<AnswerLog, ReplayError> {
        let records = parser::parse_records(reader)?;
        Ok(AnswerLog { records })
    }
}

impl AnswerLog {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Question ids in log order.
    pub fn question_ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.question_id.as_str())
    }

    /// Applies each row in order. Rows after completion are counted as ignored.
    pub fn replay<S: ProvisionalScorer>(
        &self,
        engine: &ScenarioEngine<S>,
        session: &mut Session,
    ) -> Result<ReplaySummary, ReplayError> {
        let mut applied = 0;

        for (index, record) in self.records.iter().enumerate() {
            if session.is_completed() {
                break;
            }

            let value = coerce_value(engine.scenario(), record);
            engine
                .answer_question(session, &record.question_id, value)
                .map_err(|source| ReplayError::Engine {
                    row: index + 1,
                    source,
                })?;
            applied += 1;
        }

        debug!(
            session_id = %session.id(),
            applied,
            total = self.records.len(),
            "answer log replayed"
        );

        Ok(ReplaySummary {
            applied,
            ignored: self.records.len() - applied,
            completed: session.is_completed(),
        })
    }
}

fn coerce_value(scenario: &ScenarioDefinition, record: &AnswerRecord) -> AnswerValue {
    let raw = record.raw_value.as_str();
    match scenario
        .question(&record.question_id)
        .map(|question| question.question_type)
    {
        Some(QuestionType::Scale) => raw
            .parse::<f64>()
            .map(AnswerValue::Number)
            .unwrap_or_else(|_| AnswerValue::from(raw)),
        Some(QuestionType::MultipleChoice) => AnswerValue::Choices(
            raw.split(CHOICE_SEPARATOR)
                .map(str::trim)
                .filter(|choice| !choice.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        Some(QuestionType::SingleChoice) | None => AnswerValue::from(raw),
    }
}
