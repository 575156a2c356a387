use crate::infra::{employee_range_arg, load_scenario};
use chrono::SecondsFormat;
use clap::Args;
use diagnosis_core::config::AppConfig;
use diagnosis_core::error::AppError;
use diagnosis_core::telemetry;
use diagnosis_core::workflows::diagnosis::{
    DiagnosisReport, Phase, QuestionType, ScenarioDefinition, ScenarioEngine, ScoreLevel,
    TotalScore, EMPLOYEE_COUNT_METADATA_KEY,
};
use diagnosis_core::workflows::replay::{AnswerLogImporter, ReplaySummary};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct ScenarioArgs {
    /// Scenario JSON file. Defaults to DIAGNOSIS_SCENARIO_PATH, then the built-in scenario.
    #[arg(long)]
    pub(crate) scenario: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct DiagnoseArgs {
    #[command(flatten)]
    pub(crate) scenario: ScenarioArgs,
    /// CSV answer log with `Question,Answer` columns
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Employee range (e.g. 11-50) used for ROI estimates
    #[arg(long, value_parser = employee_range_arg)]
    pub(crate) employee_count: Option<String>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DiagnoseOutput<'a> {
    scenario_id: &'a str,
    rows_applied: usize,
    rows_ignored: usize,
    report: &'a DiagnosisReport,
}

fn prepare(scenario: Option<PathBuf>) -> Result<ScenarioDefinition, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    load_scenario(scenario, &config)
}

pub(crate) fn run_diagnose(args: DiagnoseArgs) -> Result<(), AppError> {
    let DiagnoseArgs {
        scenario,
        answers,
        employee_count,
        json,
    } = args;

    let scenario = Arc::new(prepare(scenario.scenario)?);
    let log = AnswerLogImporter::from_path(&answers)?;

    let mut metadata = BTreeMap::new();
    if let Some(range) = employee_count {
        metadata.insert(EMPLOYEE_COUNT_METADATA_KEY.to_string(), range);
    }

    let engine = ScenarioEngine::new(Arc::clone(&scenario));
    let mut session = engine.start_session(metadata)?;
    let summary = log.replay(&engine, &mut session)?;
    let report = DiagnosisReport::build(engine.scorer(), &session);
    info!(
        session_id = %session.id(),
        applied = summary.applied,
        completed = summary.completed,
        "answer log diagnosed"
    );

    if json {
        let output = DiagnoseOutput {
            scenario_id: &scenario.id,
            rows_applied: summary.applied,
            rows_ignored: summary.ignored,
            report: &report,
        };
        let rendered = serde_json::to_string_pretty(&output).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        render_report(&scenario, &report, &summary, session.completed_at());
    }

    Ok(())
}

pub(crate) fn run_validate(args: ScenarioArgs) -> Result<(), AppError> {
    let scenario = prepare(args.scenario)?;

    println!(
        "Scenario '{}' is valid: {} questions, {} scored axes",
        display_name(&scenario),
        scenario.total_questions(),
        scenario.axes().len()
    );
    for phase in Phase::ordered() {
        println!(
            "- {}: {} question(s)",
            phase.label(),
            scenario.phase_questions(phase).len()
        );
    }

    Ok(())
}

pub(crate) fn run_questions(args: ScenarioArgs) -> Result<(), AppError> {
    let scenario = prepare(args.scenario)?;

    println!("{}", display_name(&scenario));
    for phase in Phase::ordered() {
        let ids = scenario.phase_questions(phase);
        if ids.is_empty() {
            continue;
        }
        println!("\n{}", phase.label());
        for question in ids.iter().filter_map(|id| scenario.question(id)) {
            println!(
                "  [{}] {} ({})",
                question.id,
                question.prompt,
                question.question_type.label()
            );
            match (question.question_type, question.scale_range) {
                (QuestionType::Scale, Some(range)) => {
                    println!("      scale {} to {}", range.min, range.max)
                }
                _ => {
                    for option in &question.options {
                        let label = if option.label.is_empty() {
                            option.id.as_str()
                        } else {
                            option.label.as_str()
                        };
                        match &option.next_question {
                            Some(next) => println!("      - {}: {} -> {}", option.id, label, next),
                            None => println!("      - {}: {}", option.id, label),
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

fn display_name(scenario: &ScenarioDefinition) -> &str {
    if scenario.name.is_empty() {
        &scenario.id
    } else {
        &scenario.name
    }
}

/// Only High and Critical axes with an avatar mapping produce recommendations.
fn no_recommendation_note(total: &TotalScore) -> String {
    let unmapped: Vec<&str> = total
        .axis_scores
        .iter()
        .filter(|entry| matches!(entry.level, ScoreLevel::High | ScoreLevel::Critical))
        .map(|entry| entry.axis.as_str())
        .collect();
    if unmapped.is_empty() {
        "No avatar recommended: every axis is at Medium or better".to_string()
    } else {
        format!(
            "No avatar recommended: {} need(s) support but no avatar covers them",
            unmapped.join(", ")
        )
    }
}

fn render_report(
    scenario: &ScenarioDefinition,
    report: &DiagnosisReport,
    summary: &ReplaySummary,
    completed_at: Option<chrono::DateTime<chrono::Utc>>,
) {
    let snapshot = &report.session;
    let skipped = snapshot
        .answers
        .iter()
        .filter(|answer| answer.skipped)
        .count();

    println!("Diagnosis: {}", display_name(scenario));
    println!(
        "Session {} | phase {} | progress {}%",
        snapshot.session_id,
        snapshot.phase.label(),
        snapshot.progress
    );
    match completed_at {
        Some(at) => println!(
            "Completed at {}",
            at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
        None => println!("Session incomplete; scores are provisional"),
    }
    println!(
        "Answer log: {} row(s) applied, {} ignored | {} answer(s) recorded, {} skipped",
        summary.applied,
        summary.ignored,
        snapshot.answers.len() - skipped,
        skipped
    );

    let total = &report.total_score;
    println!("\nAxis scores");
    for entry in &total.axis_scores {
        println!(
            "  - {:<14} {:>6.1}  {}",
            entry.axis.as_str(),
            entry.score,
            entry.level.label()
        );
        for issue in &entry.key_issues {
            println!("      key issue: {issue}");
        }
    }

    println!("\n{}", report.headline());

    if !total.value_dimensions.is_empty() {
        println!("\nValue dimensions");
        for entry in &total.value_dimensions {
            println!("  - {}: {:.1}", entry.dimension, entry.score);
        }
    }

    if report.recommendations.is_empty() {
        println!("\n{}", no_recommendation_note(total));
        return;
    }

    println!("\nRecommended avatars");
    for (rank, view) in report.recommendations.iter().enumerate() {
        let recommendation = &view.recommendation;
        let roi = &view.detailed_roi;
        println!(
            "  {}. {} for {} (match {:.1})",
            rank + 1,
            recommendation.name,
            recommendation.axis,
            recommendation.match_score
        );
        println!("     Estimated ROI: {}", recommendation.estimated_roi);
        println!(
            "     {:.1} employees -> {:.0}/month, {:.0}/year, payback in {} month(s)",
            roi.employee_count, roi.monthly_roi, roi.yearly_roi, roi.payback_months
        );
        for benefit in &recommendation.expected_benefits {
            println!("     * {benefit}");
        }
    }
}
