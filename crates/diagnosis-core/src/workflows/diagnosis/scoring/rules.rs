use super::super::domain::{Answer, Axis, QuestionType};
use super::super::scenario::Question;
use super::{AxisScore, ScoreLevel};

const KEY_ISSUE_THRESHOLD: f64 = 40.0;
const MAX_KEY_ISSUES: usize = 3;

/// Weighted contribution of a single answer to one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Contribution {
    pub score: f64,
    pub weight: f64,
}

/// Running weighted average for one axis across the answer log.
pub(crate) struct AxisAccumulator<'a> {
    axis: &'a Axis,
    weighted_sum: f64,
    total_weight: f64,
    key_issues: Vec<String>,
}

impl<'a> AxisAccumulator<'a> {
    pub(crate) fn new(axis: &'a Axis) -> Self {
        Self {
            axis,
            weighted_sum: 0.0,
            total_weight: 0.0,
            key_issues: Vec::new(),
        }
    }

    pub(crate) fn accumulate(&mut self, question: &Question, answer: &Answer) {
        if answer.skipped || !question.scores_axis(self.axis) {
            return;
        }

        let Some(contribution) = contribution(question, answer, self.axis) else {
            return;
        };

        if question.question_type == QuestionType::SingleChoice
            && contribution.score < KEY_ISSUE_THRESHOLD
        {
            self.key_issues.push(question.prompt.clone());
        }

        self.weighted_sum += contribution.score * contribution.weight;
        self.total_weight += contribution.weight;
    }

    pub(crate) fn finish(mut self) -> AxisScore {
        let score = if self.total_weight > 0.0 {
            self.weighted_sum / self.total_weight
        } else {
            0.0
        };
        self.key_issues.truncate(MAX_KEY_ISSUES);

        AxisScore {
            axis: self.axis.clone(),
            score,
            level: ScoreLevel::from_score(score),
            key_issues: self.key_issues,
        }
    }
}

pub(crate) fn contribution(question: &Question, answer: &Answer, axis: &Axis) -> Option<Contribution> {
    match question.question_type {
        QuestionType::Scale => scale_contribution(question, answer),
        QuestionType::SingleChoice => single_choice_contribution(question, answer, axis),
        QuestionType::MultipleChoice => multiple_choice_contribution(question, answer, axis),
    }
}

fn scale_contribution(question: &Question, answer: &Answer) -> Option<Contribution> {
    let max = question.scale_range.map(|range| range.max)?;
    if max == 0.0 {
        return None;
    }
    let value = answer.value.as_number()?;

    Some(Contribution {
        score: value / max * 100.0,
        weight: 1.0,
    })
}

fn single_choice_contribution(
    question: &Question,
    answer: &Answer,
    axis: &Axis,
) -> Option<Contribution> {
    let chosen = question.option(answer.value.as_text()?)?;
    let weight = *chosen.weight.get(axis)?;

    Some(Contribution {
        score: weight * 100.0,
        weight: weight.abs(),
    })
}

fn multiple_choice_contribution(
    question: &Question,
    answer: &Answer,
    axis: &Axis,
) -> Option<Contribution> {
    let scores: Vec<f64> = answer
        .value
        .choices()
        .iter()
        .filter_map(|selected| question.option(selected))
        .filter_map(|option| option.weight.get(axis))
        .map(|weight| weight * 100.0)
        .collect();

    if scores.is_empty() {
        return None;
    }

    let count = scores.len() as f64;
    Some(Contribution {
        score: scores.iter().sum::<f64>() / count,
        weight: count,
    })
}
