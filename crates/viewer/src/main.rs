mod bootstrap;
mod cli;

use std::env;
use std::process::ExitCode;

use replay_engine::{run_viewer, Replay};
use tracing::{error, info};

use cli::CliCommand;

fn main() -> ExitCode {
    let args = env::args().skip(1).collect::<Vec<_>>();
    let options = match cli::parse_args(&args) {
        Ok(CliCommand::Help) => {
            println!("{}", cli::usage_text());
            return ExitCode::SUCCESS;
        }
        Ok(CliCommand::Run(options)) => options,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    bootstrap::init_tracing();
    info!("=== Ants Replay Viewer ===");

    let mut config = bootstrap::config_from_env();
    options.apply(&mut config);

    let replay = match Replay::from_path(&options.replay_path) {
        Ok(replay) => replay,
        Err(err) => {
            error!(error = %err, "replay_load_failed");
            return ExitCode::FAILURE;
        }
    };
    info!(
        path = %options.replay_path.display(),
        players = replay.players(),
        turns = replay.turns().len(),
        map_width = replay.map().width,
        map_height = replay.map().height,
        finished_reason = replay.finished_reason(),
        "replay_loaded"
    );

    if let Err(err) = run_viewer(config, replay) {
        error!(error = %err, "viewer_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
