use std::collections::BTreeMap;
use std::sync::Arc;

use crate::workflows::diagnosis::domain::{AnswerValue, Session};
use crate::workflows::diagnosis::engine::ScenarioEngine;
use crate::workflows::diagnosis::scenario::ScenarioDefinition;

/// Three-axis questionnaire touching every branching feature:
///
/// * `route` branches to `a1` or `b1`
/// * `a2` is skipped when `start` was answered `tiny`
/// * `p1` is skipped once the sales axis reaches 70
const TRIAGE: &str = r#"{
    "id": "triage",
    "name": "Triage fixture",
    "phases": [
        { "id": "initial", "questions": ["start", "route"] },
        { "id": "deep-dive", "questions": ["a1", "a2", "b1"] },
        { "id": "priority", "questions": ["p1"] },
        { "id": "summary", "questions": ["s1"] }
    ],
    "questions": [
        { "id": "start", "phase": "initial", "type": "single-choice",
          "prompt": "How big is the team?", "relatedAxes": ["sales"],
          "options": [
            { "id": "small", "weight": { "sales": 0.8 } },
            { "id": "tiny", "weight": { "sales": -0.8 } }
          ] },
        { "id": "route", "phase": "initial", "type": "single-choice",
          "prompt": "Where does it hurt?", "relatedAxes": ["management"],
          "options": [
            { "id": "a", "weight": { "management": 0.2 }, "nextQuestion": "a1" },
            { "id": "b", "weight": { "management": 0.6 }, "nextQuestion": "b1" }
          ] },
        { "id": "a1", "phase": "deep-dive", "type": "scale",
          "prompt": "Rate planning", "relatedAxes": ["management"],
          "scaleRange": { "min": 1, "max": 5 } },
        { "id": "a2", "phase": "deep-dive", "type": "single-choice",
          "prompt": "Are roles written down?", "relatedAxes": ["organization"],
          "options": [ { "id": "yes", "weight": { "organization": 0.9 } } ],
          "skipCondition": { "type": "answer-equals", "questionId": "start", "value": "tiny" },
          "defaultNextQuestion": "p1" },
        { "id": "b1", "phase": "deep-dive", "type": "scale",
          "prompt": "Rate team morale", "relatedAxes": ["organization"],
          "scaleRange": { "min": 1, "max": 5 } },
        { "id": "p1", "phase": "priority", "type": "single-choice",
          "prompt": "Is sales recovery urgent?", "relatedAxes": ["sales"],
          "options": [ { "id": "ok", "weight": { "sales": 0.5 } } ],
          "skipCondition": { "type": "score-threshold", "axis": "sales", "threshold": 70 } },
        { "id": "s1", "phase": "summary", "type": "scale",
          "prompt": "Readiness to act", "relatedAxes": ["management"],
          "scaleRange": { "min": 1, "max": 5 } }
    ],
    "scoringConfig": {
        "axisWeights": { "management": 1.2, "sales": 1.0, "organization": 0.8 },
        "valueDimensionMapping": {
            "management": ["vision", "strategy"],
            "sales": ["strategy", "revenue"],
            "organization": ["execution"]
        }
    }
}"#;

/// `y` and `z` skip each other forever once `x` is answered `go`.
const SKIP_CYCLE: &str = r#"{
    "id": "cycle",
    "phases": [ { "id": "initial", "questions": ["x", "y", "z"] } ],
    "questions": [
        { "id": "x", "phase": "initial", "type": "single-choice", "prompt": "Go?",
          "options": [ { "id": "go" }, { "id": "stop" } ] },
        { "id": "y", "phase": "initial", "type": "scale", "prompt": "Y",
          "scaleRange": { "min": 1, "max": 5 },
          "skipCondition": { "type": "answer-equals", "questionId": "x", "value": "go" },
          "defaultNextQuestion": "z" },
        { "id": "z", "phase": "initial", "type": "scale", "prompt": "Z",
          "scaleRange": { "min": 1, "max": 5 },
          "skipCondition": { "type": "answer-equals", "questionId": "x", "value": "go" },
          "defaultNextQuestion": "y" }
    ]
}"#;

/// Four low-scoring single-choice questions on the sales axis.
const KEY_ISSUES: &str = r#"{
    "id": "issues",
    "phases": [ { "id": "initial", "questions": ["k1", "k2", "k3", "k4"] } ],
    "questions": [
        { "id": "k1", "phase": "initial", "type": "single-choice", "prompt": "No CRM",
          "relatedAxes": ["sales"], "options": [ { "id": "low", "weight": { "sales": 0.1 } } ] },
        { "id": "k2", "phase": "initial", "type": "single-choice", "prompt": "No follow-up",
          "relatedAxes": ["sales"], "options": [ { "id": "low", "weight": { "sales": 0.2 } } ] },
        { "id": "k3", "phase": "initial", "type": "single-choice", "prompt": "No pricing policy",
          "relatedAxes": ["sales"], "options": [ { "id": "low", "weight": { "sales": 0.3 } } ] },
        { "id": "k4", "phase": "initial", "type": "single-choice", "prompt": "No forecast",
          "relatedAxes": ["sales"], "options": [ { "id": "low", "weight": { "sales": 0.1 } } ] }
    ]
}"#;

pub(super) fn triage() -> Arc<ScenarioDefinition> {
    Arc::new(ScenarioDefinition::from_json_str(TRIAGE).expect("triage fixture is valid"))
}

pub(super) fn skip_cycle() -> Arc<ScenarioDefinition> {
    Arc::new(ScenarioDefinition::from_json_str(SKIP_CYCLE).expect("cycle fixture is valid"))
}

pub(super) fn key_issues() -> Arc<ScenarioDefinition> {
    Arc::new(ScenarioDefinition::from_json_str(KEY_ISSUES).expect("issues fixture is valid"))
}

pub(super) fn standard() -> Arc<ScenarioDefinition> {
    Arc::new(ScenarioDefinition::standard())
}

pub(super) fn metadata(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Starts a session and feeds `answers` in order, asserting each one is accepted.
pub(super) fn answered_session(
    engine: &ScenarioEngine,
    answers: Vec<(&str, AnswerValue)>,
) -> Session {
    let mut session = engine
        .start_session(BTreeMap::new())
        .expect("session starts");
    for (question_id, value) in answers {
        engine
            .answer_question(&mut session, question_id, value)
            .unwrap_or_else(|err| panic!("answer to {question_id} rejected: {err}"));
    }
    session
}

pub(super) fn answered_ids(session: &Session) -> Vec<(&str, bool)> {
    session
        .answers()
        .iter()
        .map(|answer| (answer.question_id.as_str(), answer.skipped))
        .collect()
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
