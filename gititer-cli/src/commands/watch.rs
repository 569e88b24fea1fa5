use super::Workspace;
use anyhow::Result;
use colored::Colorize;
use gititer_watch::WatchServer;
use tokio_util::sync::CancellationToken;
use tracing::error;

pub async fn run(workspace: Workspace) -> Result<()> {
    let assistant = workspace.assistant()?;

    println!("{}", "Watching for changes...".bold().cyan());
    for repo in &workspace.repositories {
        println!("   {}: {:?}", "Repository".bold(), repo.workdir());
    }
    println!("   {}: {:?}", "Database".bold(), workspace.db_path);
    println!();
    println!("{}", "Press Ctrl+C to stop".dimmed());
    println!();

    let server = WatchServer::new(assistant, workspace.repositories, workspace.config);

    let shutdown = CancellationToken::new();
    let on_ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
        on_ctrl_c.cancel();
    });

    server.serve(shutdown).await?;

    Ok(())
}
