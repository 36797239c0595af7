//! Command-line front end for `learnpath`.
//!
//! Every command reads JSON documents from disk, runs one core operation and
//! prints the result as pretty JSON on stdout. Logs go to stderr and are
//! filtered with `RUST_LOG`.

pub mod cli;
pub mod commands;

use anyhow::Result;
use clap::Parser;
use learnpath_state::Settings;
use serde_json::Value;

use cli::{Cli, Commands};
use commands::{
    handle_complete_task_command, handle_fallback_tasks_command, handle_generate_tasks_command,
    handle_history_command, handle_obstacles_command, handle_recommend_command,
    handle_stale_tasks_command, handle_update_progress_command,
};

/// Parse arguments, run the command and print its output.
pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load();
    let output = dispatch(cli.command, &settings)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Run one command against `settings`.
pub fn dispatch(command: Commands, settings: &Settings) -> Result<Value> {
    match command {
        Commands::Recommend {
            resources,
            preferences,
            interactions,
            user,
            obstacle,
            limit,
        } => handle_recommend_command(
            settings,
            resources,
            preferences,
            interactions,
            user,
            obstacle,
            limit,
        ),
        Commands::CompleteTask { okr, task, history } => {
            handle_complete_task_command(settings, okr, task, history)
        }
        Commands::UpdateProgress {
            okr,
            updates,
            history,
        } => handle_update_progress_command(settings, okr, updates, history),
        Commands::History {
            okr_id,
            index,
            history,
        } => handle_history_command(settings, okr_id, index, history),
        Commands::FallbackTasks { okr } => handle_fallback_tasks_command(okr),
        Commands::GenerateTasks {
            okrs,
            previous,
            cadence,
            date,
        } => handle_generate_tasks_command(settings, okrs, previous, cadence, date),
        Commands::Obstacles { obstacle_type } => handle_obstacles_command(&obstacle_type),
        Commands::StaleTasks {
            tasks,
            obstacles,
            min_days,
        } => handle_stale_tasks_command(settings, tasks, obstacles, min_days),
    }
}
