//! Pure projections from a session's answer log to axis scores, an overall
//! health score, value dimensions and ranked avatar recommendations.
//!
//! Every function here is best effort: an incomplete or empty session yields
//! zeroed axes rather than an error, so the engine can score mid-session.

mod recommendation;
mod rules;

pub use recommendation::{
    parse_employee_range, AvatarType, DetailedRoi, RecommendedAvatar, EMPLOYEE_COUNT_METADATA_KEY,
};

use super::domain::{Axis, Session, ValueDimension};
use super::scenario::ScenarioDefinition;
use recommendation::{employee_count_for, match_score};
use rules::AxisAccumulator;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MAX_RECOMMENDATIONS: usize = 3;

/// Urgency bucket. `Low` means healthy, `Critical` means most in need of help.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl ScoreLevel {
    /// Buckets are applied to the raw score; values outside 0..=100 are not clamped.
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            Self::Low
        } else if score >= 50.0 {
            Self::Medium
        } else if score >= 30.0 {
            Self::High
        } else {
            Self::Critical
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    pub const fn needs_support(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisScore {
    pub axis: Axis,
    pub score: f64,
    pub level: ScoreLevel,
    pub key_issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueDimensionScore {
    pub dimension: ValueDimension,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalScore {
    pub axis_scores: Vec<AxisScore>,
    pub overall: f64,
    pub top_priority_axis: Option<Axis>,
    pub value_dimensions: Vec<ValueDimensionScore>,
}

impl TotalScore {
    pub fn axis_score(&self, axis: &Axis) -> Option<&AxisScore> {
        self.axis_scores.iter().find(|entry| &entry.axis == axis)
    }
}

/// Scores sessions against one scenario. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ScoringModel {
    scenario: Arc<ScenarioDefinition>,
}

impl ScoringModel {
    pub fn new(scenario: Arc<ScenarioDefinition>) -> Self {
        Self { scenario }
    }

    pub fn scenario(&self) -> &ScenarioDefinition {
        &self.scenario
    }

    pub fn calculate_axis_score(&self, session: &Session, axis: &Axis) -> AxisScore {
        let mut accumulator = AxisAccumulator::new(axis);
        for answer in session.answers() {
            if let Some(question) = self.scenario.question(&answer.question_id) {
                accumulator.accumulate(question, answer);
            }
        }
        accumulator.finish()
    }

    pub fn calculate_axis_scores(&self, session: &Session) -> Vec<AxisScore> {
        self.scenario
            .axes()
            .iter()
            .map(|axis| self.calculate_axis_score(session, axis))
            .collect()
    }

    /// Weighted average of axis scores, rounded to one decimal.
    pub fn calculate_overall_score(&self, axis_scores: &[AxisScore]) -> f64 {
        let (weighted_sum, total_weight) =
            axis_scores
                .iter()
                .fold((0.0, 0.0), |(sum, total), entry| {
                    let weight = self.scenario.axis_weight(&entry.axis);
                    (sum + entry.score * weight, total + weight)
                });

        if total_weight == 0.0 {
            return 0.0;
        }
        round_to_tenth(weighted_sum / total_weight)
    }

    /// Lowest-scoring axis; ties keep the earliest axis.
    pub fn determine_top_priority_axis(axis_scores: &[AxisScore]) -> Option<Axis> {
        let mut lowest: Option<&AxisScore> = None;
        for entry in axis_scores {
            match lowest {
                Some(current) if entry.score >= current.score => {}
                _ => lowest = Some(entry),
            }
        }
        lowest.map(|entry| entry.axis.clone())
    }

    /// Projects axis scores onto value dimensions.
    ///
    /// A dimension touched by several axes keeps a running pairwise average in
    /// axis order, so with three or more contributors later axes weigh more
    /// than a true mean would give them.
    pub fn evaluate_value_dimensions(&self, axis_scores: &[AxisScore]) -> Vec<ValueDimensionScore> {
        let mapping = &self.scenario.scoring_config.value_dimension_mapping;
        let mut dimensions: Vec<ValueDimensionScore> = Vec::new();

        for entry in axis_scores {
            let Some(targets) = mapping.get(&entry.axis) else {
                continue;
            };
            for dimension in targets {
                match dimensions
                    .iter_mut()
                    .find(|existing| &existing.dimension == dimension)
                {
                    Some(existing) => existing.score = (existing.score + entry.score) / 2.0,
                    None => dimensions.push(ValueDimensionScore {
                        dimension: dimension.clone(),
                        score: entry.score,
                    }),
                }
            }
        }

        dimensions
    }

    pub fn calculate_total_score(&self, session: &Session) -> TotalScore {
        let axis_scores = self.calculate_axis_scores(session);
        let overall = self.calculate_overall_score(&axis_scores);
        let top_priority_axis = Self::determine_top_priority_axis(&axis_scores);
        let value_dimensions = self.evaluate_value_dimensions(&axis_scores);

        TotalScore {
            axis_scores,
            overall,
            top_priority_axis,
            value_dimensions,
        }
    }

    /// Up to three avatars for axes at `High` or `Critical`, best match first.
    ///
    /// An unanswered axis scores 0 and therefore lands in `Critical`, so a fresh
    /// session recommends an avatar for every mapped axis.
    pub fn determine_recommended_avatars(&self, total: &TotalScore) -> Vec<RecommendedAvatar> {
        let mut candidates: Vec<RecommendedAvatar> = total
            .axis_scores
            .iter()
            .filter(|entry| entry.level.needs_support())
            .filter_map(|entry| {
                AvatarType::for_axis(&entry.axis).map(|avatar| {
                    RecommendedAvatar::new(
                        avatar,
                        entry.axis.clone(),
                        match_score(entry.score, total.overall),
                    )
                })
            })
            .collect();

        candidates.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
        candidates.truncate(MAX_RECOMMENDATIONS);
        candidates
    }

    /// Company-size based ROI estimate for one recommendation.
    pub fn calculate_detailed_roi(&self, avatar: &RecommendedAvatar, session: &Session) -> DetailedRoi {
        DetailedRoi::estimate(avatar.avatar, employee_count_for(session))
    }
}

pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
