use super::Workspace;
use crate::display;
use anyhow::Result;
use colored::Colorize;
use gititer_core::Repository;

pub fn run(mut workspace: Workspace) -> Result<()> {
    let store = workspace.change_store()?;

    println!("{}", "Iteration Status".bold().cyan());
    println!("  {}: {}", "Workspace".bold(), workspace.root.display());
    println!("  {}: {}", "Database".bold(), workspace.db_path.display());
    if let Some(message) = store.initial_message()? {
        println!("  {}: {}", "Initial message".bold(), message.yellow());
    }
    println!();

    for repo in workspace.repositories.iter_mut() {
        repo.refresh_status()?;
        let pending = store.pending_changes(repo.id())?;
        let stored = store.iteration_message(repo.id())?.unwrap_or_default();

        let marker = if repo.is_selected() { "*" } else { " " };
        println!("{} {}", marker.green().bold(), repo.id().to_string().bold());
        println!(
            "  {}: {}",
            "Message".bold(),
            display::message_line(&repo.message_input())
        );
        if stored != repo.message_input() {
            println!("  {}: {}", "Stored".bold(), display::message_line(&stored));
        }

        let changes = repo.working_tree_changes();
        if changes.is_empty() {
            println!("  {}", "Working tree clean".green());
            println!();
            continue;
        }

        let covered = changes.iter().filter(|c| pending.contains(&c.path)).count();
        println!(
            "  {} {}",
            "Working tree changes:".bold(),
            format!("({} of {} covered)", covered, changes.len()).yellow()
        );

        for change in changes.iter().take(10) {
            let path = change.path.strip_prefix(repo.workdir()).unwrap_or(&change.path);
            let note = if pending.contains(&change.path) {
                "".normal()
            } else {
                "new".cyan()
            };
            println!(
                "    {} {} {}",
                display::change_icon(change.kind),
                path.display(),
                note
            );
        }

        if changes.len() > 10 {
            println!(
                "    {} and {} more...",
                "...".dimmed(),
                (changes.len() - 10).to_string().yellow()
            );
        }
        println!();
    }

    Ok(())
}
