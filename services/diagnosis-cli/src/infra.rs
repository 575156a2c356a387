use diagnosis_core::config::AppConfig;
use diagnosis_core::error::AppError;
use diagnosis_core::workflows::diagnosis::{parse_employee_range, ScenarioDefinition};
use std::path::PathBuf;
use tracing::debug;

/// Accepts exactly the employee ranges the ROI estimate can read, e.g. `11-50`.
pub(crate) fn employee_range_arg(raw: &str) -> Result<String, String> {
    match parse_employee_range(raw) {
        Some(_) => Ok(raw.trim().to_string()),
        None => Err(format!(
            "expected an employee range such as '11-50', got '{raw}'"
        )),
    }
}

/// `--scenario` wins over `DIAGNOSIS_SCENARIO_PATH`; the built-in scenario is the fallback.
pub(crate) fn load_scenario(
    path: Option<PathBuf>,
    config: &AppConfig,
) -> Result<ScenarioDefinition, AppError> {
    let scenario = match path {
        Some(path) => {
            debug!(path = %path.display(), "loading scenario from command line");
            ScenarioDefinition::from_path(path)?
        }
        None => config.diagnosis.load_scenario()?,
    };
    scenario.validate()?;
    Ok(scenario)
}
