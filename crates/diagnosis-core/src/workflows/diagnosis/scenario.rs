use super::domain::{AnswerValue, Axis, Phase, QuestionType, ValueDimension};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

/// Immutable, externally authored questionnaire configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDefinition {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub phases: Vec<PhaseDefinition>,
    pub questions: Vec<Question>,
    #[serde(default)]
    pub scoring_config: ScoringConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseDefinition {
    #[serde(rename = "id")]
    pub phase: Phase,
    #[serde(default)]
    pub title: String,
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub phase: Phase,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub prompt: String,
    #[serde(default)]
    pub related_axes: Vec<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_range: Option<ScaleRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<AnswerOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_condition: Option<SkipCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_next_question: Option<String>,
}

impl Question {
    pub fn option(&self, option_id: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.id == option_id)
    }

    pub fn scores_axis(&self, axis: &Axis) -> bool {
        self.related_axes.contains(axis)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub id: String,
    #[serde(default)]
    pub label: String,
    /// Signed impact per axis. A missing axis means "not applicable", never zero.
    #[serde(default)]
    pub weight: BTreeMap<Axis, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_question: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SkipCondition {
    AnswerEquals {
        #[serde(rename = "questionId")]
        question_id: String,
        value: AnswerValue,
    },
    ScoreThreshold {
        axis: Axis,
        threshold: f64,
    },
    /// Reserved. Never triggers a skip.
    PhaseComplete {
        #[serde(default)]
        phase: Option<Phase>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    #[serde(default)]
    pub axis_weights: BTreeMap<Axis, f64>,
    #[serde(default)]
    pub value_dimension_mapping: BTreeMap<Axis, Vec<ValueDimension>>,
}

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid scenario JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("phase '{}' has no questions", .0.label())]
    EmptyPhase(Phase),
    #[error("question {0} is defined more than once")]
    DuplicateQuestion(String),
    #[error("question {question_id}: {detail}")]
    PhaseMembership { question_id: String, detail: String },
    #[error("{from} references unknown question {to}")]
    DanglingReference { from: String, to: String },
}

impl ScenarioDefinition {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScenarioError> {
        let scenario: Self = serde_json::from_reader(reader)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions
            .iter()
            .find(|question| question.id == question_id)
    }

    pub fn phase_questions(&self, phase: Phase) -> &[String] {
        self.phases
            .iter()
            .find(|definition| definition.phase == phase)
            .map(|definition| definition.questions.as_slice())
            .unwrap_or(&[])
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// The question listed directly after `question` in its own phase.
    pub fn next_in_phase(&self, question: &Question) -> Option<&str> {
        let ids = self.phase_questions(question.phase);
        ids.iter()
            .position(|id| *id == question.id)
            .and_then(|index| ids.get(index + 1))
            .map(String::as_str)
    }

    /// First question of the first non-empty phase after `phase`.
    pub fn first_question_after(&self, phase: Phase) -> Option<&str> {
        phase
            .following()
            .find_map(|next| self.phase_questions(next).first())
            .map(String::as_str)
    }

    /// Every scored axis once, ordered by first appearance in the questionnaire,
    /// followed by axes only named in the weight table.
    pub fn axes(&self) -> Vec<Axis> {
        let mut axes: Vec<Axis> = Vec::new();
        let related = self
            .questions
            .iter()
            .flat_map(|question| question.related_axes.iter());
        for axis in related.chain(self.scoring_config.axis_weights.keys()) {
            if !axes.contains(axis) {
                axes.push(axis.clone());
            }
        }
        axes
    }

    pub fn axis_weight(&self, axis: &Axis) -> f64 {
        self.scoring_config
            .axis_weights
            .get(axis)
            .copied()
            .unwrap_or(1.0)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        let first_phase = Phase::ordered()[0];
        if self.phase_questions(first_phase).is_empty() {
            return Err(ScenarioError::EmptyPhase(first_phase));
        }

        let mut by_id: HashMap<&str, &Question> = HashMap::new();
        for question in &self.questions {
            if by_id.insert(question.id.as_str(), question).is_some() {
                return Err(ScenarioError::DuplicateQuestion(question.id.clone()));
            }
        }

        let mut listed: HashMap<&str, Phase> = HashMap::new();
        for definition in &self.phases {
            for id in &definition.questions {
                let question = by_id.get(id.as_str()).ok_or_else(|| {
                    ScenarioError::DanglingReference {
                        from: format!("phase '{}'", definition.phase.label()),
                        to: id.clone(),
                    }
                })?;
                if listed.insert(id.as_str(), definition.phase).is_some() {
                    return Err(ScenarioError::PhaseMembership {
                        question_id: id.clone(),
                        detail: "listed by more than one phase".to_string(),
                    });
                }
                if question.phase != definition.phase {
                    return Err(ScenarioError::PhaseMembership {
                        question_id: id.clone(),
                        detail: format!(
                            "declares phase '{}' but is listed under '{}'",
                            question.phase.label(),
                            definition.phase.label()
                        ),
                    });
                }
            }
        }

        for question in &self.questions {
            if !listed.contains_key(question.id.as_str()) {
                return Err(ScenarioError::PhaseMembership {
                    question_id: question.id.clone(),
                    detail: "not listed by any phase".to_string(),
                });
            }

            let branch_targets = question
                .options
                .iter()
                .filter_map(|option| option.next_question.as_deref())
                .chain(question.default_next_question.as_deref());
            let skip_reference = match &question.skip_condition {
                Some(SkipCondition::AnswerEquals { question_id, .. }) => Some(question_id.as_str()),
                Some(SkipCondition::ScoreThreshold { .. })
                | Some(SkipCondition::PhaseComplete { .. })
                | None => None,
            };

            for target in branch_targets.chain(skip_reference) {
                if !by_id.contains_key(target) {
                    return Err(ScenarioError::DanglingReference {
                        from: format!("question {}", question.id),
                        to: target.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}
