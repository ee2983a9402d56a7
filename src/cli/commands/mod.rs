//! Command execution and dispatch.

mod plan;
mod run;

use crate::cli::{Args, Command, OutputManager};
use crate::error::Result;

use plan::execute_plan;
use run::execute_run;

/// Execute the parsed command, returning the process exit code
pub async fn execute_command(args: Args) -> Result<i32> {
    if let Err(validation_error) = args.validate() {
        let output = OutputManager::new(false, false);
        output.error(&format!("Invalid arguments: {validation_error}"));
        return Ok(1);
    }

    let output = OutputManager::new(args.verbose, args.quiet);

    let result = match &args.command {
        Command::Run { .. } => execute_run(&args, &output).await,
        Command::Plan => execute_plan(&output).map(|()| 0),
    };

    match result {
        Ok(exit_code) => Ok(exit_code),
        Err(e) => {
            output.error(&format!("Command '{}' failed: {e}", args.command.name()));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                output.println("\nRecovery suggestions:");
                for suggestion in suggestions {
                    output.indent(&suggestion);
                }
            }

            Ok(1)
        }
    }
}
