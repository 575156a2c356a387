use crate::diagnose::{run_diagnose, run_questions, run_validate, DiagnoseArgs, ScenarioArgs};
use clap::{Parser, Subcommand};
use diagnosis_core::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Business Diagnosis",
    about = "Run adaptive business health diagnoses from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a recorded answer log and print scores and recommendations
    Diagnose(DiagnoseArgs),
    /// Check a scenario definition for configuration errors
    Validate(ScenarioArgs),
    /// List the questionnaire phase by phase
    Questions(ScenarioArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Diagnose(args) => run_diagnose(args),
        Command::Validate(args) => run_validate(args),
        Command::Questions(args) => run_questions(args),
    }
}
