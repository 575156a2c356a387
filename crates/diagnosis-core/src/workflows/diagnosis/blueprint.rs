use super::domain::{AnswerValue, Axis, Phase, QuestionType, ValueDimension};
use super::scenario::{
    AnswerOption, PhaseDefinition, Question, ScaleRange, ScenarioDefinition, ScoringConfig,
    SkipCondition,
};
use std::collections::BTreeMap;

/// Question whose option ids double as employee-count ranges for ROI estimates.
pub const COMPANY_SIZE_QUESTION: &str = "company_size";

impl ScenarioDefinition {
    /// Built-in business health triage questionnaire.
    pub fn standard() -> Self {
        let questions = standard_questions();
        let phases = Phase::ordered()
            .into_iter()
            .map(|phase| PhaseDefinition {
                phase,
                title: phase.label().to_string(),
                questions: questions
                    .iter()
                    .filter(|question| question.phase == phase)
                    .map(|question| question.id.clone())
                    .collect(),
            })
            .collect();

        Self {
            id: "business-health-standard".to_string(),
            name: "Business Health Diagnosis".to_string(),
            phases,
            questions,
            scoring_config: standard_scoring_config(),
        }
    }
}

fn axes(names: &[&str]) -> Vec<Axis> {
    names.iter().copied().map(Axis::from).collect()
}

fn option(id: &str, label: &str, weights: &[(&str, f64)]) -> AnswerOption {
    AnswerOption {
        id: id.to_string(),
        label: label.to_string(),
        weight: weights
            .iter()
            .map(|(axis, weight)| (Axis::from(*axis), *weight))
            .collect(),
        next_question: None,
    }
}

fn branch(option: AnswerOption, next: &str) -> AnswerOption {
    AnswerOption {
        next_question: Some(next.to_string()),
        ..option
    }
}

fn scale(id: &str, phase: Phase, prompt: &str, axis: &str) -> Question {
    Question {
        id: id.to_string(),
        phase,
        question_type: QuestionType::Scale,
        prompt: prompt.to_string(),
        related_axes: axes(&[axis]),
        scale_range: Some(ScaleRange { min: 1.0, max: 5.0 }),
        options: Vec::new(),
        skip_condition: None,
        default_next_question: None,
    }
}

fn choice(
    id: &str,
    phase: Phase,
    question_type: QuestionType,
    prompt: &str,
    related: &[&str],
    options: Vec<AnswerOption>,
) -> Question {
    Question {
        id: id.to_string(),
        phase,
        question_type,
        prompt: prompt.to_string(),
        related_axes: axes(related),
        scale_range: None,
        options,
        skip_condition: None,
        default_next_question: None,
    }
}

fn then(question: Question, next: &str) -> Question {
    Question {
        default_next_question: Some(next.to_string()),
        ..question
    }
}

fn skip_when(question: Question, condition: SkipCondition) -> Question {
    Question {
        skip_condition: Some(condition),
        ..question
    }
}

fn standard_questions() -> Vec<Question> {
    use QuestionType::{MultipleChoice, SingleChoice};

    vec![
        choice(
            COMPANY_SIZE_QUESTION,
            Phase::Initial,
            SingleChoice,
            "How many people work at your company?",
            &[],
            vec![
                option("1-10", "1 to 10", &[]),
                option("11-50", "11 to 50", &[]),
                option("51-200", "51 to 200", &[]),
                option("201-1000", "201 to 1000", &[]),
            ],
        ),
        scale(
            "overall_health",
            Phase::Initial,
            "How would you rate the overall health of your business today?",
            Axis::MANAGEMENT,
        ),
        choice(
            "revenue_trend",
            Phase::Initial,
            SingleChoice,
            "How has revenue developed over the past year?",
            &[Axis::SALES, Axis::MANAGEMENT],
            vec![
                option("growing", "Growing", &[("sales", 0.9), ("management", 0.7)]),
                option("flat", "Flat", &[("sales", 0.5)]),
                option("declining", "Declining", &[("sales", 0.2), ("management", 0.3)]),
            ],
        ),
        choice(
            "biggest_challenge",
            Phase::Initial,
            SingleChoice,
            "Which area is currently your biggest challenge?",
            &[Axis::MANAGEMENT, Axis::SALES, Axis::ORGANIZATION, Axis::MARKETING],
            vec![
                branch(
                    option("management", "Direction and planning", &[("management", 0.3)]),
                    "mgmt_vision",
                ),
                branch(
                    option("sales", "Winning customers", &[("sales", 0.3)]),
                    "sales_pipeline",
                ),
                branch(
                    option("organization", "People and structure", &[("organization", 0.3)]),
                    "org_roles",
                ),
                branch(
                    option("marketing", "Visibility and demand", &[("marketing", 0.3)]),
                    "mkt_channels",
                ),
            ],
        ),
        scale(
            "mgmt_vision",
            Phase::DeepDive,
            "How clearly is the company vision shared across the team?",
            Axis::MANAGEMENT,
        ),
        then(
            choice(
                "mgmt_planning",
                Phase::DeepDive,
                SingleChoice,
                "How are mid-term business plans set?",
                &[Axis::MANAGEMENT],
                vec![
                    option("documented", "Documented and reviewed", &[("management", 0.9)]),
                    option("informal", "Informally by the owner", &[("management", 0.5)]),
                    option("none", "No plan exists", &[("management", 0.1)]),
                ],
            ),
            "priority_focus",
        ),
        choice(
            "sales_pipeline",
            Phase::DeepDive,
            SingleChoice,
            "How is the sales pipeline managed?",
            &[Axis::SALES],
            vec![
                option("crm", "In a CRM", &[("sales", 0.9)]),
                option("spreadsheet", "In spreadsheets", &[("sales", 0.6)]),
                option("none", "It is not tracked", &[("sales", 0.1)]),
            ],
        ),
        then(
            skip_when(
                scale(
                    "sales_conversion",
                    Phase::DeepDive,
                    "How satisfied are you with your conversion rate?",
                    Axis::SALES,
                ),
                SkipCondition::AnswerEquals {
                    question_id: "sales_pipeline".to_string(),
                    value: AnswerValue::from("none"),
                },
            ),
            "priority_focus",
        ),
        choice(
            "org_roles",
            Phase::DeepDive,
            SingleChoice,
            "Are roles and responsibilities clearly defined?",
            &[Axis::ORGANIZATION],
            vec![
                option("clear", "Clearly defined", &[("organization", 0.9)]),
                option("partial", "Partially defined", &[("organization", 0.5)]),
                option("unclear", "Unclear", &[("organization", 0.1)]),
            ],
        ),
        then(
            choice(
                "org_practices",
                Phase::DeepDive,
                MultipleChoice,
                "Which people practices are in place?",
                &[Axis::ORGANIZATION],
                vec![
                    option("onboarding", "Structured onboarding", &[("organization", 0.8)]),
                    option("reviews", "Regular performance reviews", &[("organization", 0.7)]),
                    option("training", "Ongoing training", &[("organization", 0.9)]),
                    option("none", "None of these", &[("organization", 0.0)]),
                ],
            ),
            "priority_focus",
        ),
        choice(
            "mkt_channels",
            Phase::DeepDive,
            MultipleChoice,
            "Which channels bring in new customers?",
            &[Axis::MARKETING],
            vec![
                option("referral", "Referrals", &[("marketing", 0.5)]),
                option("web", "Website and search", &[("marketing", 0.8)]),
                option("social", "Social media", &[("marketing", 0.7)]),
                option("ads", "Paid advertising", &[("marketing", 0.6)]),
            ],
        ),
        then(
            scale(
                "mkt_brand",
                Phase::DeepDive,
                "How well known is your brand in your target market?",
                Axis::MARKETING,
            ),
            "priority_focus",
        ),
        choice(
            "priority_focus",
            Phase::Priority,
            SingleChoice,
            "Which outcome matters most over the next twelve months?",
            &[],
            vec![
                option("growth", "Top-line growth", &[]),
                option("efficiency", "Operational efficiency", &[]),
                option("team", "A stronger team", &[]),
            ],
        ),
        skip_when(
            choice(
                "priority_sales_recovery",
                Phase::Priority,
                SingleChoice,
                "Do you need support to recover lost sales momentum?",
                &[Axis::SALES],
                vec![
                    option("yes", "Yes, urgently", &[("sales", 0.2)]),
                    option("no", "No, momentum is fine", &[("sales", 0.6)]),
                ],
            ),
            SkipCondition::ScoreThreshold {
                axis: Axis::from(Axis::SALES),
                threshold: 70.0,
            },
        ),
        choice(
            "priority_budget",
            Phase::Priority,
            SingleChoice,
            "What monthly budget could you allocate to improvement?",
            &[],
            vec![
                option("low", "Under 1,000", &[]),
                option("medium", "1,000 to 5,000", &[]),
                option("high", "Over 5,000", &[]),
            ],
        ),
        scale(
            "summary_readiness",
            Phase::Summary,
            "How ready is leadership to act on these findings?",
            Axis::MANAGEMENT,
        ),
    ]
}

fn standard_scoring_config() -> ScoringConfig {
    let axis_weights = [
        (Axis::MANAGEMENT, 1.2),
        (Axis::SALES, 1.0),
        (Axis::ORGANIZATION, 0.9),
        (Axis::MARKETING, 0.9),
    ]
    .into_iter()
    .map(|(axis, weight)| (Axis::from(axis), weight))
    .collect();

    let value_dimension_mapping: BTreeMap<Axis, Vec<ValueDimension>> = [
        (Axis::MANAGEMENT, ["vision", "strategy"]),
        (Axis::SALES, ["strategy", "revenue"]),
        (Axis::ORGANIZATION, ["execution", "culture"]),
        (Axis::MARKETING, ["revenue", "brand"]),
    ]
    .into_iter()
    .map(|(axis, dimensions)| {
        (
            Axis::from(axis),
            dimensions.into_iter().map(ValueDimension::from).collect(),
        )
    })
    .collect();

    ScoringConfig {
        axis_weights,
        value_dimension_mapping,
    }
}
