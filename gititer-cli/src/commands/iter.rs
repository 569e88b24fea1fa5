use super::Workspace;
use anyhow::Result;
use colored::Colorize;
use gititer_core::{Command, Outcome};

pub fn run(mut workspace: Workspace) -> Result<()> {
    let mut assistant = workspace.assistant()?;
    let Some(outcome) = assistant.run_command(Command::Iterate, &mut workspace.repositories)?
    else {
        return Ok(());
    };

    match outcome {
        Outcome::Updated => println!("{}", "✓ Iteration updated".green().bold()),
        Outcome::Reverted => println!("{}", "No message in progress, tracking reset".yellow()),
        Outcome::Skipped => {
            println!("{}", "Nothing to iterate".yellow());
            return Ok(());
        }
    }

    super::print_tracking(assistant.store(), &workspace.repositories)
}
