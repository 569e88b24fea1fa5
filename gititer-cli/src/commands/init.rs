use super::Workspace;
use crate::display;
use anyhow::Result;
use colored::Colorize;
use gititer_core::{Command, Repository};

pub fn run(mut workspace: Workspace) -> Result<()> {
    let mut assistant = workspace.assistant()?;
    assistant.run_command(Command::Init, &mut workspace.repositories)?;

    for repo in &workspace.repositories {
        let state = if assistant.session().is_initialized(repo.id()) {
            "clean".green()
        } else {
            "needs a message".yellow()
        };
        println!("{} {}", repo.id().to_string().bold(), state);
        println!(
            "  {}: {}",
            "Message".bold(),
            display::message_line(&repo.message_input())
        );
    }

    Ok(())
}
