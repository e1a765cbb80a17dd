//! slice4d - headless runner
//!
//! Reads key names and `wait <secs>` lines from stdin and plays the configured
//! levels. Panel messages and compass changes are printed to stdout.

use std::io::BufRead;
use std::process::ExitCode;

use slice4d::config::AppConfig;
use slice4d::session::{Flow, Session};

fn main() -> ExitCode {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    // RUST_LOG still wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();

    let mut session = match Session::start(config) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Aborting session: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("Failed to read input: {}", e);
                return ExitCode::FAILURE;
            }
        };
        match session.run_line(&line) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Stop) => break,
            Err(e) => {
                log::error!("Aborting session: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    log::info!("Session over after {} level(s)", session.levels_played());
    ExitCode::SUCCESS
}
