//! Plan command: print the ordered stage list and exit.

use crate::cli::OutputManager;
use crate::error::Result;
use crate::pipeline::STAGES;

/// Print the pipeline plan; touches nothing
pub(super) fn execute_plan(output: &OutputManager) -> Result<()> {
    output.println("Release pipeline stages, in order:");
    for (index, descriptor) in STAGES.iter().enumerate() {
        output.println(&format!(
            "  {}. {:<10} {}",
            index + 1,
            descriptor.stage.as_str(),
            descriptor.summary
        ));
    }
    output.println("\nEach stage runs only if every earlier stage succeeded.");
    Ok(())
}
