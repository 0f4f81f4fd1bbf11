use anyhow::Result;

use league_standings::cli::Command;
use league_standings::{
    handle_completions, handle_crosstable, handle_import, handle_init, handle_pairings,
    handle_standings, handle_stats, handle_wallchart, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Init => handle_init(),
        Command::Import { file } => handle_import(file),
        Command::Standings {
            season,
            mode,
            include_current,
            section,
            no_cache,
        } => handle_standings(season, *mode, *include_current, section.as_deref(), *no_cache),
        Command::Wallchart { season } => handle_wallchart(season),
        Command::Pairings {
            season,
            round,
            privileged,
        } => handle_pairings(season, *round, *privileged),
        Command::Stats { season } => handle_stats(season),
        Command::Crosstable { season } => handle_crosstable(season),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
