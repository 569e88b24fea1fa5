use super::Workspace;
use anyhow::Result;
use colored::Colorize;
use gititer_core::Command;

pub fn run(mut workspace: Workspace) -> Result<()> {
    let mut assistant = workspace.assistant()?;
    if assistant
        .run_command(Command::Cancel, &mut workspace.repositories)?
        .is_none()
    {
        return Ok(());
    }

    println!("{}", "✓ Iteration cancelled".green().bold());
    super::print_tracking(assistant.store(), &workspace.repositories)
}
