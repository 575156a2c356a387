mod cli;
mod diagnose;
mod infra;

use diagnosis_core::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
