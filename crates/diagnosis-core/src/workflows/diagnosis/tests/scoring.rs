use super::common::*;
use crate::workflows::diagnosis::domain::{AnswerValue, Axis, ValueDimension};
use crate::workflows::diagnosis::engine::ScenarioEngine;
use crate::workflows::diagnosis::scoring::{
    AvatarType, AxisScore, RecommendedAvatar, ScoreLevel, ScoringModel, TotalScore,
    EMPLOYEE_COUNT_METADATA_KEY,
};
use std::collections::BTreeMap;
use std::sync::Arc;

fn axis_score(axis: &str, score: f64) -> AxisScore {
    AxisScore {
        axis: Axis::from(axis),
        score,
        level: ScoreLevel::from_score(score),
        key_issues: Vec::new(),
    }
}

fn total(axis_scores: Vec<AxisScore>, overall: f64) -> TotalScore {
    TotalScore {
        axis_scores,
        overall,
        top_priority_axis: None,
        value_dimensions: Vec::new(),
    }
}

#[test]
fn score_levels_bucket_raw_scores() {
    assert_eq!(ScoreLevel::from_score(120.0), ScoreLevel::Low);
    assert_eq!(ScoreLevel::from_score(70.0), ScoreLevel::Low);
    assert_eq!(ScoreLevel::from_score(69.9), ScoreLevel::Medium);
    assert_eq!(ScoreLevel::from_score(50.0), ScoreLevel::Medium);
    assert_eq!(ScoreLevel::from_score(49.9), ScoreLevel::High);
    assert_eq!(ScoreLevel::from_score(30.0), ScoreLevel::High);
    assert_eq!(ScoreLevel::from_score(29.9), ScoreLevel::Critical);
    assert_eq!(ScoreLevel::from_score(-80.0), ScoreLevel::Critical);
}

#[test]
fn negative_option_weight_yields_unclamped_negative_score() {
    let scenario = triage();
    let engine = ScenarioEngine::new(scenario.clone());
    let scoring = ScoringModel::new(scenario);
    let session = answered_session(&engine, vec![("start", AnswerValue::from("tiny"))]);

    let sales = scoring.calculate_axis_score(&session, &Axis::from(Axis::SALES));
    assert_close(sales.score, -80.0);
    assert_eq!(sales.level, ScoreLevel::Critical);
    assert_eq!(sales.key_issues, vec!["How big is the team?".to_string()]);
}

#[test]
fn top_of_scale_scores_one_hundred() {
    let scenario = triage();
    let engine = ScenarioEngine::new(scenario.clone());
    let scoring = ScoringModel::new(scenario);
    let session = answered_session(&engine, vec![("a1", AnswerValue::from(5.0))]);

    let management = scoring.calculate_axis_score(&session, &Axis::from(Axis::MANAGEMENT));
    assert_close(management.score, 100.0);
    assert_eq!(management.level, ScoreLevel::Low);
    assert!(management.key_issues.is_empty());
}

#[test]
fn empty_session_scores_zero_and_recommends_every_mapped_axis() {
    let scenario = triage();
    let engine = ScenarioEngine::new(scenario.clone());
    let scoring = ScoringModel::new(scenario);
    let session = engine.start_session(BTreeMap::new()).expect("session starts");

    let total = scoring.calculate_total_score(&session);
    let axes: Vec<&str> = total.axis_scores.iter().map(|entry| entry.axis.as_str()).collect();
    assert_eq!(axes, vec!["sales", "management", "organization"]);
    assert!(total
        .axis_scores
        .iter()
        .all(|entry| entry.score == 0.0 && entry.level == ScoreLevel::Critical));
    assert_eq!(total.overall, 0.0);
    assert_eq!(total.top_priority_axis, Some(Axis::from(Axis::SALES)));

    let recommendations = scoring.determine_recommended_avatars(&total);
    let avatars: Vec<AvatarType> = recommendations.iter().map(|entry| entry.avatar).collect();
    assert_eq!(
        avatars,
        vec![
            AvatarType::SalesAccelerator,
            AvatarType::StrategyAdvisor,
            AvatarType::OrganizationArchitect,
        ]
    );
    assert!(recommendations.iter().all(|entry| entry.match_score == 100.0));
}

#[test]
fn total_score_combines_axes_overall_priority_and_dimensions() {
    let scenario = triage();
    let engine = ScenarioEngine::new(scenario.clone());
    let scoring = ScoringModel::new(scenario);
    let session = answered_session(
        &engine,
        vec![
            ("start", AnswerValue::from("small")),
            ("route", AnswerValue::from("a")),
            ("a1", AnswerValue::from(5.0)),
            ("a2", AnswerValue::from("yes")),
        ],
    );

    let total = scoring.calculate_total_score(&session);
    let score_of = |axis: &str| {
        total
            .axis_score(&Axis::from(axis))
            .map(|entry| entry.score)
            .expect("axis scored")
    };

    assert_close(score_of(Axis::SALES), 80.0);
    assert_close(score_of(Axis::MANAGEMENT), 104.0 / 1.2);
    assert_close(score_of(Axis::ORGANIZATION), 90.0);
    assert_eq!(total.overall, 85.3);
    assert_eq!(total.top_priority_axis, Some(Axis::from(Axis::SALES)));

    let dimensions: Vec<(&str, f64)> = total
        .value_dimensions
        .iter()
        .map(|entry| (entry.dimension.0.as_str(), entry.score))
        .collect();
    assert_eq!(dimensions.len(), 4);
    assert_eq!(dimensions[0].0, "strategy");
    assert_close(dimensions[0].1, (80.0 + 104.0 / 1.2) / 2.0);
    assert_eq!(dimensions[1].0, "revenue");
    assert_close(dimensions[1].1, 80.0);
    assert_eq!(dimensions[2].0, "vision");
    assert_close(dimensions[2].1, 104.0 / 1.2);
    assert_eq!(dimensions[3].0, "execution");
    assert_close(dimensions[3].1, 90.0);

    assert!(scoring.determine_recommended_avatars(&total).is_empty());
}

#[test]
fn skipped_answers_do_not_count() {
    let scenario = triage();
    let engine = ScenarioEngine::new(scenario.clone());
    let scoring = ScoringModel::new(scenario);
    let session = answered_session(
        &engine,
        vec![
            ("start", AnswerValue::from("tiny")),
            ("route", AnswerValue::from("a")),
            ("a1", AnswerValue::from(3.0)),
        ],
    );

    // a2 was skipped, so organization has no contributions.
    let organization = scoring.calculate_axis_score(&session, &Axis::from(Axis::ORGANIZATION));
    assert_eq!(organization.score, 0.0);
}

#[test]
fn key_issues_keep_first_three_low_single_choice_prompts() {
    let scenario = key_issues();
    let engine = ScenarioEngine::new(scenario.clone());
    let scoring = ScoringModel::new(scenario);
    let session = answered_session(
        &engine,
        vec![
            ("k1", AnswerValue::from("low")),
            ("k2", AnswerValue::from("low")),
            ("k3", AnswerValue::from("low")),
            ("k4", AnswerValue::from("low")),
        ],
    );
    assert!(session.is_completed());

    let sales = scoring.calculate_axis_score(&session, &Axis::from(Axis::SALES));
    assert_eq!(
        sales.key_issues,
        vec![
            "No CRM".to_string(),
            "No follow-up".to_string(),
            "No pricing policy".to_string(),
        ]
    );
    assert_close(sales.score, 15.0 / 0.7);
}

#[test]
fn multiple_choice_averages_recognised_selections() {
    let scenario = standard();
    let engine = ScenarioEngine::new(scenario.clone());
    let scoring = ScoringModel::new(scenario);
    let marketing = Axis::from(Axis::MARKETING);

    let both = answered_session(
        &engine,
        vec![("mkt_channels", AnswerValue::from(vec!["web", "ads"]))],
    );
    let entry = scoring.calculate_axis_score(&both, &marketing);
    assert_close(entry.score, 70.0);
    assert_eq!(entry.level, ScoreLevel::Low);
    assert!(entry.key_issues.is_empty());

    let with_unknown = answered_session(
        &engine,
        vec![("mkt_channels", AnswerValue::from(vec!["web", "billboards"]))],
    );
    assert_close(scoring.calculate_axis_score(&with_unknown, &marketing).score, 80.0);

    let none_recognised = answered_session(
        &engine,
        vec![("mkt_channels", AnswerValue::from(vec!["billboards"]))],
    );
    assert_eq!(scoring.calculate_axis_score(&none_recognised, &marketing).score, 0.0);
}

#[test]
fn multiple_choice_selections_weigh_by_count() {
    let scenario = standard();
    let engine = ScenarioEngine::new(scenario.clone());
    let scoring = ScoringModel::new(scenario);
    let session = answered_session(
        &engine,
        vec![
            ("org_roles", AnswerValue::from("unclear")),
            ("org_practices", AnswerValue::from(vec!["onboarding", "training"])),
        ],
    );

    // unclear: 10 at weight 0.1; practices: mean 85 at weight 2.
    let organization = scoring.calculate_axis_score(&session, &Axis::from(Axis::ORGANIZATION));
    assert_close(organization.score, (10.0 * 0.1 + 85.0 * 2.0) / 2.1);
}

#[test]
fn top_priority_axis_is_the_lowest_with_first_axis_winning_ties() {
    let scores = vec![
        axis_score(Axis::MANAGEMENT, 50.0),
        axis_score(Axis::SALES, 20.0),
        axis_score(Axis::ORGANIZATION, 35.0),
        axis_score(Axis::MARKETING, 20.0),
    ];
    assert_eq!(
        ScoringModel::determine_top_priority_axis(&scores),
        Some(Axis::from(Axis::SALES))
    );

    let negative_last = vec![axis_score(Axis::SALES, 5.0), axis_score(Axis::MARKETING, -10.0)];
    assert_eq!(
        ScoringModel::determine_top_priority_axis(&negative_last),
        Some(Axis::from(Axis::MARKETING))
    );

    assert_eq!(ScoringModel::determine_top_priority_axis(&[]), None);
}

#[test]
fn overall_score_uses_axis_weights_with_default_of_one() {
    let scoring = ScoringModel::new(triage());

    let weighted = scoring.calculate_overall_score(&[
        axis_score(Axis::MANAGEMENT, 100.0),
        axis_score(Axis::SALES, 50.0),
        axis_score(Axis::ORGANIZATION, 0.0),
    ]);
    assert_eq!(weighted, 56.7);

    let with_unweighted = scoring.calculate_overall_score(&[
        axis_score(Axis::MANAGEMENT, 100.0),
        axis_score(Axis::SALES, 50.0),
        axis_score(Axis::ORGANIZATION, 0.0),
        axis_score("finance", 10.0),
    ]);
    assert_eq!(with_unweighted, 45.0);

    assert_eq!(scoring.calculate_overall_score(&[]), 0.0);
}

#[test]
fn shared_dimensions_use_running_pairwise_average() {
    let mut scenario = (*triage()).clone();
    scenario.scoring_config.value_dimension_mapping = ["x", "y", "z"]
        .into_iter()
        .map(|axis| (Axis::from(axis), vec![ValueDimension::from("growth")]))
        .collect();
    let scoring = ScoringModel::new(Arc::new(scenario));

    let dimensions = scoring.evaluate_value_dimensions(&[
        axis_score("x", 10.0),
        axis_score("y", 30.0),
        axis_score("unmapped", 99.0),
        axis_score("z", 70.0),
    ]);

    assert_eq!(dimensions.len(), 1);
    assert_eq!(dimensions[0].dimension, ValueDimension::from("growth"));
    assert_close(dimensions[0].score, 45.0);
}

#[test]
fn recommendations_rank_by_match_score_and_cap_at_three() {
    let scoring = ScoringModel::new(standard());
    let total = total(
        vec![
            axis_score(Axis::MANAGEMENT, 10.0),
            axis_score(Axis::SALES, 40.0),
            axis_score(Axis::ORGANIZATION, 20.0),
            axis_score(Axis::MARKETING, 35.0),
            axis_score("finance", 0.0),
        ],
        26.3,
    );

    let recommendations = scoring.determine_recommended_avatars(&total);
    let avatars: Vec<AvatarType> = recommendations.iter().map(|entry| entry.avatar).collect();
    assert_eq!(
        avatars,
        vec![
            AvatarType::StrategyAdvisor,
            AvatarType::OrganizationArchitect,
            AvatarType::MarketingNavigator,
        ]
    );
    assert_eq!(recommendations[0].match_score, 85.1);
    assert!(recommendations
        .windows(2)
        .all(|pair| pair[0].match_score >= pair[1].match_score));
    assert_eq!(recommendations[0].name, "Strategy Advisor");
    assert_eq!(recommendations[0].expected_benefits.len(), 3);
}

#[test]
fn healthy_axes_are_not_recommended() {
    let scoring = ScoringModel::new(standard());
    let total = total(
        vec![
            axis_score(Axis::MANAGEMENT, 55.0),
            axis_score(Axis::SALES, 29.0),
            axis_score(Axis::ORGANIZATION, 70.0),
        ],
        51.3,
    );

    let recommendations = scoring.determine_recommended_avatars(&total);
    assert_eq!(recommendations.len(), 1);
    assert_eq!(recommendations[0].avatar, AvatarType::SalesAccelerator);
    assert_eq!(recommendations[0].axis, Axis::from(Axis::SALES));
}

#[test]
fn detailed_roi_prefers_metadata_then_company_size_then_default() {
    let scenario = standard();
    let engine = ScenarioEngine::new(scenario.clone());
    let scoring = ScoringModel::new(scenario);
    let avatar = RecommendedAvatar::new(
        AvatarType::SalesAccelerator,
        Axis::from(Axis::SALES),
        90.0,
    );

    let mut declared = engine
        .start_session(metadata(&[(EMPLOYEE_COUNT_METADATA_KEY, "51-200")]))
        .expect("session starts");
    engine
        .answer_question(&mut declared, "company_size", AnswerValue::from("1-10"))
        .expect("company size answered");
    let roi = scoring.calculate_detailed_roi(&avatar, &declared);
    assert_eq!(roi.employee_count, 125.5);
    assert_eq!(roi.monthly_roi, 18_825.0);
    assert_eq!(roi.yearly_roi, 225_900.0);
    assert_eq!(roi.payback_months, 1);

    let answered = answered_session(
        &engine,
        vec![("company_size", AnswerValue::from("11-50"))],
    );
    let roi = scoring.calculate_detailed_roi(&avatar, &answered);
    assert_eq!(roi.employee_count, 30.5);
    assert_eq!(roi.monthly_roi, 4_575.0);

    let fresh = engine.start_session(BTreeMap::new()).expect("session starts");
    let roi = scoring.calculate_detailed_roi(&avatar, &fresh);
    assert_eq!(roi.employee_count, 30.0);
    assert_eq!(roi.monthly_roi, 4_500.0);
}

#[test]
fn scoring_is_repeatable_for_the_same_session() {
    let scenario = standard();
    let engine = ScenarioEngine::new(scenario.clone());
    let scoring = ScoringModel::new(scenario);
    let session = answered_session(
        &engine,
        vec![
            ("company_size", AnswerValue::from("11-50")),
            ("overall_health", AnswerValue::from(2.0)),
            ("revenue_trend", AnswerValue::from("declining")),
        ],
    );

    let first = scoring.calculate_total_score(&session);
    let second = scoring.calculate_total_score(&session);
    assert_eq!(first, second);
    assert_eq!(
        scoring.determine_recommended_avatars(&first),
        scoring.determine_recommended_avatars(&second)
    );
}
